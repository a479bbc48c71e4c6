//! Serialized multi-beat image generation.
//!
//! Requests run strictly one at a time with a fixed pause between them.
//! This is deliberate backpressure against provider rate limits, not a
//! throughput optimization. One beat's failure never aborts the batch; the
//! caller gets a per-beat outcome and decides what to surface.

use std::time::Duration;

use tracing::warn;

use crate::beat::model::BeatId;
use crate::foundation::error::ReelResult;
use crate::service::contract::{ImageGeneration, ImageRequest};
use crate::service::retry::{RetryConfig, with_backoff};

/// Pacing and retry policy for a generation batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Pause between consecutive requests, in milliseconds.
    pub inter_request_delay_ms: u64,
    /// Per-request retry policy.
    pub retry: RetryConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inter_request_delay_ms: 1_000,
            retry: RetryConfig::default(),
        }
    }
}

/// One beat's generation request.
#[derive(Clone, Debug)]
pub struct BatchItem {
    /// Beat the images are for.
    pub beat_id: BeatId,
    /// The generation request.
    pub request: ImageRequest,
}

/// One beat's generation result.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Beat the images are for.
    pub beat_id: BeatId,
    /// Generated candidate images, or the error that stopped this item.
    pub result: ReelResult<Vec<Vec<u8>>>,
}

/// Generate images for every item, serially, pausing between requests.
///
/// Each request runs under the batch's retry policy; a request that still
/// fails is recorded in its outcome and logged, and the batch continues.
pub fn generate_serially(
    provider: &dyn ImageGeneration,
    config: &BatchConfig,
    items: &[BatchItem],
) -> Vec<BatchOutcome> {
    let mut outcomes = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 && config.inter_request_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(config.inter_request_delay_ms));
        }
        let result = with_backoff(&config.retry, "generate_images", || {
            provider.generate_images(&item.request)
        });
        if let Err(err) = &result {
            warn!(beat = %item.beat_id, %err, "image generation failed for beat");
        }
        outcomes.push(BatchOutcome {
            beat_id: item.beat_id,
            result,
        });
    }
    outcomes
}
