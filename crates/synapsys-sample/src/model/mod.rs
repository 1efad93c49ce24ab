//! # Domain Models
//!
//! Pure data carried between the demo, the benches and the counter actors.
//! Nothing here knows about the runtime.

pub mod message;

pub use message::*;
