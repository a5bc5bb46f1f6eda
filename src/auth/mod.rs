pub mod google;
pub mod middleware;
pub mod session;
pub mod validate;
