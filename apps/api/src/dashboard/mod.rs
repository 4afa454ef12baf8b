// Company dashboard: reachable only by the user named as a company's admin.

pub mod forms;
pub mod handlers;
pub mod service;
pub mod store;
