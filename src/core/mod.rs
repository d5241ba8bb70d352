//! Core Module - client-side state components
//!
//! Each component owns one slice of remote data, fetches it through a
//! resource trait and degrades on failure instead of erroring.

pub mod lifecycle;
pub mod listings;
pub mod load_state;
pub mod offer_flow;
pub mod offers_feed;
pub mod settings;

#[cfg(test)]
pub mod test_support;

pub use lifecycle::*;
pub use listings::*;
pub use load_state::*;
pub use offer_flow::*;
pub use offers_feed::*;
pub use settings::*;
