//! Combining a video with a new audio track.

use async_trait::async_trait;

/// Produces the dubbed video from the original video and the new voiceover.
#[async_trait]
pub trait VideoMuxer: Send + Sync {
    /// Return the URL of the processed video.
    async fn mux(&self, video_url: &str, audio_url: &str) -> anyhow::Result<String>;
}

/// Does not touch the video: the processed video URL is the original upload.
///
/// The new voiceover is still stored separately on the dubbing record, so
/// clients can play it alongside the original.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughMuxer;

#[async_trait]
impl VideoMuxer for PassthroughMuxer {
    async fn mux(&self, video_url: &str, audio_url: &str) -> anyhow::Result<String> {
        tracing::debug!(video_url, audio_url, "Pass-through mux: returning original video");
        Ok(video_url.to_string())
    }
}
