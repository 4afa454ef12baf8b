// Match engine: one-listing-at-a-time deck, directional swipes, and the
// right-swipe -> pending application transition.

pub mod engine;
pub mod gate;
pub mod handlers;
pub mod store;
