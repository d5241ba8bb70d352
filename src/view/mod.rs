//! View Module - page composition and text rendering

pub mod format;
pub mod page;

pub use format::*;
pub use page::*;
