use crate::core::photo::PhotoTimeFallback;
use chrono::FixedOffset;

/// Everything an extractor needs besides its input bytes.
///
/// The owner is always passed in explicitly; extractors never look it up.
#[derive(Debug, Clone)]
pub struct IngestContext {
    pub owner: String,
    /// Zone naive local timestamps are interpreted in.
    pub local_zone: FixedOffset,
    pub photo_time_fallback: PhotoTimeFallback,
}

impl IngestContext {
    pub fn new(owner: &str, local_zone: FixedOffset) -> Self {
        Self {
            owner: owner.to_string(),
            local_zone,
            photo_time_fallback: PhotoTimeFallback::default(),
        }
    }

    pub fn with_photo_time_fallback(mut self, fallback: PhotoTimeFallback) -> Self {
        self.photo_time_fallback = fallback;
        self
    }
}
