//! Prompt templates and response clean-up.
//!
//! Templates live next to this file as plain text and are embedded at compile
//! time. The topic is interpolated verbatim.

const SLIDE_PROMPT: &str = include_str!("slide_prompt.txt");
const TITLE_PROMPT: &str = include_str!("title_prompt.txt");

/// Build the full slide-deck instruction for a topic.
pub fn build_slide_prompt(topic: &str) -> String {
    SLIDE_PROMPT.replacen("{topic}", topic, 1)
}

/// Prompt asking for a presentation title for a topic.
pub fn build_deck_title_prompt(topic: &str) -> String {
    let context = format!("A presentation on the topic: {topic}");
    TITLE_PROMPT.replacen("{context}", &context, 1)
}

/// Prompt asking for the title of the next slide of an existing deck.
pub fn build_slide_title_prompt(deck_title: &str, headings: &[String]) -> String {
    let mut context = format!("The next slide of the presentation \"{deck_title}\".");
    if !headings.is_empty() {
        context.push_str(" The presentation already has these slides, in order:");
        for (i, h) in headings.iter().enumerate() {
            context.push_str(&format!("\n{}. {h}", i + 1));
        }
        context.push_str("\nThe new slide must not repeat any of them.");
    }
    TITLE_PROMPT.replacen("{context}", &context, 1)
}

/// Remove markdown code-fence markers and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Reduce a model reply to a single bare title line.
pub fn clean_title(text: &str) -> String {
    let stripped = strip_code_fences(text);
    let line = stripped
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    let line = line.trim_start_matches('#').trim();
    line.trim_matches(|c| c == '"' || c == '\'' || c == '*').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_prompt_embeds_topic_once() {
        let prompt = build_slide_prompt("Quantum computing for bankers");
        assert_eq!(prompt.matches("Quantum computing for bankers").count(), 1);
        assert!(!prompt.contains("{topic}"));
    }

    #[test]
    fn slide_prompt_describes_policy_and_schema() {
        let prompt = build_slide_prompt("x");
        assert!(prompt.contains("10 TO 12 SLIDES"));
        assert!(prompt.contains("more than 15 slides"));
        assert!(prompt.contains("4 TO 6 icons"));
        assert!(prompt.contains(">>"));
        assert!(prompt.contains("double column"));
        assert!(prompt.contains("key takeaways"));
        assert!(prompt.contains("\"img_keywords\""));
        assert!(prompt.trim_end().ends_with("```json"));
    }

    #[test]
    fn topic_is_not_escaped() {
        let prompt = build_slide_prompt("<b>\"quoted\" {braces}</b>");
        assert!(prompt.contains("<b>\"quoted\" {braces}</b>"));
    }

    #[test]
    fn slide_title_prompt_lists_headings() {
        let prompt = build_slide_title_prompt("Rust", &["Intro".into(), "Ownership".into()]);
        assert!(prompt.contains("\"Rust\""));
        assert!(prompt.contains("1. Intro"));
        assert!(prompt.contains("2. Ownership"));
        assert!(!prompt.contains("{context}"));
    }

    #[test]
    fn strips_fences_and_whitespace() {
        let raw = "```json\n{\"title\":\"T\",\"slides\":[]}\n```\n";
        assert_eq!(strip_code_fences(raw), "{\"title\":\"T\",\"slides\":[]}");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[test]
    fn strips_inner_fences_too() {
        assert_eq!(strip_code_fences("a```b```json c"), "ab c");
    }

    #[test]
    fn clean_title_takes_first_line() {
        assert_eq!(clean_title("\"Rust at Scale\"\nsecond line"), "Rust at Scale");
        assert_eq!(clean_title("```\n## **Ownership Explained**\n```"), "Ownership Explained");
        assert_eq!(clean_title("   "), "");
    }
}
