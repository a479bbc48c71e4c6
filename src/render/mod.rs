//! Export pipeline: frame sources, sinks, and the state machine walking
//! frames from one to the other.

pub mod pipeline;
pub mod sink;
pub mod source;
