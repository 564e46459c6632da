//! Core Module - Classification & Scoring Engine
//!
//! Zone lookup, factor scorers, the two scoring models, advisory helpers and
//! the batch driver.

pub mod advisory;
pub mod batch;
pub mod factors;
pub mod strategy;
pub mod threat_score;
pub mod zone_risk;
pub mod zones;

pub use advisory::*;
pub use batch::*;
pub use strategy::*;
pub use threat_score::*;
pub use zone_risk::*;
pub use zones::*;
