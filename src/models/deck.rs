//! Deck and slide shapes produced by the language model.
//!
//! These types describe the JSON contract of a generated presentation. The
//! bullet conventions (`>>` process steps, `[[icon]]` prefixes, two-column
//! layouts) are only classified here; rendering them is someone else's job.

use serde::{Deserialize, Deserializer, Serialize};

/// Marker that opens a sequential-process bullet.
pub const PROCESS_MARKER: &str = ">>";

/// A full generated presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub heading: String,
    #[serde(default)]
    pub bullet_points: Vec<BulletPoint>,
    #[serde(default)]
    pub key_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub img_keywords: String,
}

/// Models sometimes answer `null` for a field that has nothing to say.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of a slide's `bullet_points` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BulletPoint {
    Text(String),
    Nested(Vec<String>),
    Column(Column),
}

/// One side of a double-column slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub heading: String,
    #[serde(default)]
    pub bullet_points: Vec<BulletPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Standard,
    Icon,
    Process,
    DoubleColumn,
}

impl Deck {
    pub fn parse(json: &str) -> Result<Deck, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn count_kind(&self, kind: SlideKind) -> usize {
        self.slides.iter().filter(|s| s.kind() == kind).count()
    }
}

impl BulletPoint {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            BulletPoint::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_process_step(&self) -> bool {
        self.as_text()
            .is_some_and(|t| t.trim_start().starts_with(PROCESS_MARKER))
    }

    /// Icon name from a leading `[[name]]` token.
    pub fn icon_name(&self) -> Option<&str> {
        let text = self.as_text()?.trim_start();
        let rest = text.strip_prefix("[[")?;
        let end = rest.find("]]")?;
        let name = rest[..end].trim();
        (!name.is_empty()).then_some(name)
    }
}

impl Slide {
    /// Classify by bullet layout. A slide counts as icon/process only when
    /// every top-level bullet carries the marker.
    pub fn kind(&self) -> SlideKind {
        let bullets = &self.bullet_points;
        if bullets.len() == 2 && bullets.iter().all(|b| matches!(b, BulletPoint::Column(_))) {
            return SlideKind::DoubleColumn;
        }
        if bullets.is_empty() {
            return SlideKind::Standard;
        }
        if bullets.iter().all(|b| b.icon_name().is_some()) {
            SlideKind::Icon
        } else if bullets.iter().all(BulletPoint::is_process_step) {
            SlideKind::Process
        } else {
            SlideKind::Standard
        }
    }

    /// Key message with blank strings treated as absent.
    pub fn key_message(&self) -> Option<&str> {
        self.key_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
