//! Utils Module - Helper Functions & Shared Utilities

pub mod constants;
pub mod geo;

pub use constants::*;
pub use geo::*;
