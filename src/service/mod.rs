//! Generative service boundary: provider contracts, retry policy, and
//! serialized batch generation.

pub mod batch;
pub mod contract;
pub mod retry;
