pub mod deck;
pub mod project;
pub mod slide;
pub mod user;
