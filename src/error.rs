// SPDX-License-Identifier: MPL-2.0
use crate::domain::playback::ExclusiveResource;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Load Error: {0}")]
    Load(#[from] LoadError),

    #[error("Platform Error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

/// Reasons a media resource could not be loaded.
/// Used to provide user-friendly, localized error messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The resource carries no URL to load.
    #[error("Media resource has no URL")]
    MissingUrl,

    /// None of the offered MIME types can be played by the platform.
    #[error("Unsupported media format")]
    UnsupportedFormat,

    /// Media codec is not supported by the platform.
    #[error("Unsupported media codec: {0}")]
    UnsupportedCodec(String),

    /// The resource does not exist or access was refused.
    #[error("Media not found: {0}")]
    NotFound(String),

    /// The resource could not be fetched.
    #[error("Network error: {0}")]
    Network(String),

    /// The resource appears corrupted or has invalid data.
    #[error("Media file is corrupted")]
    Corrupted,

    /// Generic error with raw message.
    #[error("{0}")]
    Other(String),
}

impl LoadError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            LoadError::MissingUrl => "error-load-media-missing-url",
            LoadError::UnsupportedFormat => "error-load-media-unsupported-format",
            LoadError::UnsupportedCodec(_) => "error-load-media-unsupported-codec",
            LoadError::NotFound(_) => "error-load-media-not-found",
            LoadError::Network(_) => "error-load-media-network",
            LoadError::Corrupted => "error-load-media-corrupted",
            LoadError::Other(_) => "error-load-media-general",
        }
    }

    /// Categorizes a raw failure message reported by the platform's media element.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Codec errors first, they often also say "not supported"
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return LoadError::UnsupportedCodec(codec);
            }
        }

        if msg_lower.contains("not supported")
            || msg_lower.contains("unsupported")
            || msg_lower.contains("no supported source")
            || msg_lower.contains("src_not_supported")
        {
            return LoadError::UnsupportedFormat;
        }

        if msg_lower.contains("404")
            || msg_lower.contains("not found")
            || msg_lower.contains("forbidden")
            || msg_lower.contains("permission denied")
        {
            return LoadError::NotFound(msg.to_string());
        }

        if msg_lower.contains("network")
            || msg_lower.contains("timeout")
            || msg_lower.contains("timed out")
            || msg_lower.contains("connection")
        {
            return LoadError::Network(msg.to_string());
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("malformed")
            || msg_lower.contains("decode")
        {
            return LoadError::Corrupted;
        }

        LoadError::Other(msg.to_string())
    }

    /// Tries to extract a codec name from an error message.
    fn extract_codec_name(msg: &str) -> Option<String> {
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "theora", "opus", "vorbis", "aac",
        ];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

/// A fullscreen or picture-in-picture request the platform could not honour.
///
/// Non-fatal: playback continues and the session's flags stay as they were.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapabilityError {
    /// The platform has no such capability (or the media element is gone).
    #[error("{0} is not supported on this platform")]
    Unsupported(ExclusiveResource),

    /// The platform or the user declined the transition.
    #[error("{resource} request was denied: {reason}")]
    Denied {
        resource: ExclusiveResource,
        reason: String,
    },
}

impl CapabilityError {
    /// Returns the resource the failed request was about.
    pub fn resource(&self) -> ExclusiveResource {
        match self {
            CapabilityError::Unsupported(resource) => *resource,
            CapabilityError::Denied { resource, .. } => *resource,
        }
    }

    /// Returns the i18n message key for this notice.
    pub fn i18n_key(&self) -> &'static str {
        match (self, self.resource()) {
            (CapabilityError::Unsupported(_), ExclusiveResource::Fullscreen) => {
                "notice-fullscreen-unsupported"
            }
            (CapabilityError::Unsupported(_), ExclusiveResource::PictureInPicture) => {
                "notice-pip-unsupported"
            }
            (CapabilityError::Denied { .. }, ExclusiveResource::Fullscreen) => {
                "notice-fullscreen-denied"
            }
            (CapabilityError::Denied { .. }, ExclusiveResource::PictureInPicture) => {
                "notice-pip-denied"
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn load_error_wraps_into_crate_error() {
        let err: Error = LoadError::Corrupted.into();
        assert_eq!(format!("{}", err), "Load Error: Media file is corrupted");
    }

    #[test]
    fn load_error_from_message_codec() {
        let err = LoadError::from_message("Decoder hevc not available");
        assert!(matches!(err, LoadError::UnsupportedCodec(codec) if codec == "HEVC"));
    }

    #[test]
    fn load_error_from_message_unsupported_source() {
        let err = LoadError::from_message("MEDIA_ERR_SRC_NOT_SUPPORTED");
        assert_eq!(err, LoadError::UnsupportedFormat);
    }

    #[test]
    fn load_error_from_message_not_found() {
        let err = LoadError::from_message("HTTP 404 for bad");
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn load_error_from_message_network() {
        let err = LoadError::from_message("MEDIA_ERR_NETWORK");
        assert!(matches!(err, LoadError::Network(_)));
    }

    #[test]
    fn load_error_from_message_corrupted() {
        let err = LoadError::from_message("File is corrupt");
        assert_eq!(err, LoadError::Corrupted);
    }

    #[test]
    fn load_error_from_message_fallback() {
        let err = LoadError::from_message("something odd");
        assert_eq!(err, LoadError::Other("something odd".to_string()));
    }

    #[test]
    fn load_error_i18n_keys_are_distinct() {
        let keys = [
            LoadError::MissingUrl.i18n_key(),
            LoadError::UnsupportedFormat.i18n_key(),
            LoadError::UnsupportedCodec("AV1".into()).i18n_key(),
            LoadError::NotFound(String::new()).i18n_key(),
            LoadError::Network(String::new()).i18n_key(),
            LoadError::Corrupted.i18n_key(),
            LoadError::Other(String::new()).i18n_key(),
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn capability_error_reports_resource() {
        let err = CapabilityError::Denied {
            resource: ExclusiveResource::PictureInPicture,
            reason: "user gesture required".into(),
        };
        assert_eq!(err.resource(), ExclusiveResource::PictureInPicture);
        assert_eq!(err.i18n_key(), "notice-pip-denied");
        assert_eq!(
            format!("{}", err),
            "picture-in-picture request was denied: user gesture required"
        );
    }

    #[test]
    fn capability_error_unsupported_message() {
        let err = CapabilityError::Unsupported(ExclusiveResource::Fullscreen);
        assert_eq!(format!("{}", err), "fullscreen is not supported on this platform");
        assert_eq!(err.i18n_key(), "notice-fullscreen-unsupported");
    }
}
