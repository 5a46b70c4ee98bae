// SPDX-License-Identifier: MPL-2.0
//! Media resource descriptor.
//!
//! A [`MediaResource`] is produced by the content listing and handed to a
//! session on bind. The controller never mutates it.

/// Source types offered for video entries, in order of preference.
pub const VIDEO_MIME_CANDIDATES: &[&str] = &["video/mp4", "video/webm", "video/ogg"];

/// Source types offered for audio entries.
pub const AUDIO_MIME_CANDIDATES: &[&str] = &["audio/mpeg"];

/// Immutable descriptor of a playable media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResource {
    url: String,
    mime_candidates: Vec<String>,
}

impl MediaResource {
    /// Creates a resource with an explicit list of MIME candidates.
    pub fn new<I, S>(url: impl Into<String>, mime_candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            mime_candidates: mime_candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a video resource offering MP4, WebM and Ogg sources.
    pub fn video(url: impl Into<String>) -> Self {
        Self::new(url, VIDEO_MIME_CANDIDATES.iter().copied())
    }

    /// Creates an audio resource offering an MPEG source.
    pub fn audio(url: impl Into<String>) -> Self {
        Self::new(url, AUDIO_MIME_CANDIDATES.iter().copied())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// MIME types to try, most preferred first.
    pub fn mime_candidates(&self) -> &[String] {
        &self.mime_candidates
    }

    /// Returns true if the resource carries a non-blank URL.
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}
