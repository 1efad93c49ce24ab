//! # Synapsys Sample Library
//!
//! This library exposes the sample's modules to the demo binary, the
//! integration tests and the benches.

pub mod counter_actor;
pub mod lifecycle;
pub mod model;
