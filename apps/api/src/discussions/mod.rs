pub mod display;
pub mod handlers;
