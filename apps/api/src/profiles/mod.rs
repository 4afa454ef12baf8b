pub mod handlers;
pub mod projection;
