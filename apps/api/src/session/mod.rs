// Session/profile context: who is signed in, their profile, and whether
// they administer a company. Resolved per request, hydrated eagerly on
// sign-in events.

pub mod context;
pub mod directory;
pub mod extractor;
