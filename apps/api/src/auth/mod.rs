// Identity lifecycle: sign-up, sign-in, sign-out and session resolution.
// Every state change is published on the auth event channel.

pub mod events;
pub mod handlers;
pub mod service;
