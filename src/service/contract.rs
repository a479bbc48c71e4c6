//! Request/response contracts for the generative services.
//!
//! The engine never talks to a provider directly; embedders hand it trait
//! objects and keep transport, credentials, and provider choice on their
//! side. Contracts are synchronous: callers that need async wrap these in
//! their own executors.

use crate::beat::model::OverlayMode;
use crate::foundation::core::AspectPreset;
use crate::foundation::error::ReelResult;

/// One narration segment produced by script analysis, untimed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalyzedSegment {
    /// Narration text covered by the segment.
    pub text: String,
    /// Visual description to request B-roll for this segment.
    #[serde(default)]
    pub visual_prompt: String,
    /// Suggested overlay layout.
    #[serde(default)]
    pub overlay: OverlayMode,
}

/// An analyzed segment with service-provided timestamps, from audio
/// analysis. Timestamps are advisory; [`crate::beat::analysis`] snaps them
/// into a valid partition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedSegment {
    /// The segment content.
    #[serde(flatten)]
    pub segment: AnalyzedSegment,
    /// Segment start in seconds.
    pub start_sec: f64,
    /// Segment end in seconds.
    pub end_sec: f64,
}

/// Full result of analyzing an audio track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioAnalysisResult {
    /// Complete transcript of the narration.
    pub transcript: String,
    /// Timed narration segments in playback order.
    pub segments: Vec<TimedSegment>,
}

/// Speech synthesis request.
#[derive(Clone, Debug)]
pub struct SpeechRequest {
    /// Text to narrate.
    pub text: String,
    /// Provider-specific voice name, when the caller wants one.
    pub voice: Option<String>,
}

/// Synthesized narration audio.
#[derive(Clone, Debug)]
pub struct SynthesizedAudio {
    /// Encoded audio bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes` (for example `audio/wav`).
    pub mime_type: String,
}

/// Image generation request for one beat.
#[derive(Clone, Debug)]
pub struct ImageRequest {
    /// Visual prompt describing the desired image.
    pub prompt: String,
    /// Output aspect ratio.
    pub aspect: AspectPreset,
    /// Number of candidate images to produce, `1..=4`.
    pub image_count: u8,
    /// Style theme appended to the prompt, when set.
    pub theme_prompt: Option<String>,
    /// Encoded reference image conditioning the generation.
    pub reference_image: Option<Vec<u8>>,
    /// Encoded avatar image to feature in the result.
    pub avatar_image: Option<Vec<u8>>,
}

/// Video generation request.
#[derive(Clone, Debug)]
pub struct VideoRequest {
    /// Prompt describing the desired clip.
    pub prompt: String,
    /// Output aspect ratio.
    pub aspect: AspectPreset,
    /// Provider resolution label (for example `720p`).
    pub resolution: String,
    /// Encoded image used as the clip's first frame.
    pub start_frame: Option<Vec<u8>>,
}

/// Handle to an in-flight video generation, polled until done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoOperation {
    /// Provider-issued operation name.
    pub name: String,
}

/// One poll of a [`VideoOperation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoPoll {
    /// Still generating; poll again later.
    Pending,
    /// Finished; the clip is downloadable at this URI.
    Ready {
        /// Download URI for the finished clip.
        uri: String,
    },
}

/// Text-to-speech provider.
pub trait SpeechSynthesis {
    /// Synthesize narration audio for `request`.
    fn synthesize(&self, request: &SpeechRequest) -> ReelResult<SynthesizedAudio>;
}

/// Script-to-segments provider: splits narration text into visual beats
/// without timing.
pub trait ScriptAnalysis {
    /// Analyze `script` into ordered untimed segments.
    fn analyze_script(&self, script: &str) -> ReelResult<Vec<AnalyzedSegment>>;
}

/// Audio-to-segments provider: transcribes narration and returns timed
/// segments.
pub trait AudioAnalysis {
    /// Analyze WAV `audio` into a transcript plus timed segments.
    fn analyze_audio(&self, audio: &[u8]) -> ReelResult<AudioAnalysisResult>;
}

/// Still-image generation provider.
pub trait ImageGeneration {
    /// Generate `request.image_count` candidate images.
    fn generate_images(&self, request: &ImageRequest) -> ReelResult<Vec<Vec<u8>>>;
}

/// Video generation provider with a start/poll lifecycle.
pub trait VideoGeneration {
    /// Begin generating a clip.
    fn start_video(&self, request: &VideoRequest) -> ReelResult<VideoOperation>;

    /// Check whether `operation` has finished.
    fn poll_video(&self, operation: &VideoOperation) -> ReelResult<VideoPoll>;
}
