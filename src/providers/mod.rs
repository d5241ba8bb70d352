//! Providers Module - External Data Sources
//!
//! The OrangeBrick REST backend is the only collaborator.

pub mod backend;

pub use backend::*;
