pub mod auth_handlers;
pub mod generate_handlers;
pub mod profile_handlers;
pub mod project_handlers;
pub mod slide_handlers;
