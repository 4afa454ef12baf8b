pub mod admin;
pub mod application;
pub mod auth;
pub mod company;
pub mod forum;
pub mod job;
pub mod profile;
pub mod swipe;
