//! Channel form validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::channel::{ChannelDraft, ChannelType};

/// Accepted YouTube URL shapes, with or without scheme and `www.`.
#[allow(clippy::expect_used)]
static YOUTUBE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$")
        .expect("failed to compile YouTube URL regex")
});

/// Message for a missing or blank name.
pub const NAME_REQUIRED: &str = "Channel name is required";
/// Message for a missing or blank URL.
pub const URL_REQUIRED: &str = "Channel URL is required";
/// Message for a YouTube channel whose URL is not a YouTube link.
pub const INVALID_YOUTUBE_URL: &str = "Invalid YouTube URL format";
/// Message for a missing channel type.
pub const TYPE_REQUIRED: &str = "Channel type is required";

/// Outcome of [`validate_channel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// `true` iff `errors` is empty.
    pub is_valid: bool,
    /// Violations in rule order.
    pub errors: Vec<String>,
}

/// Returns `true` if `url` looks like a `youtube.com` or `youtu.be` link.
#[must_use]
pub fn is_youtube_url(url: &str) -> bool {
    YOUTUBE_URL_RE.is_match(url)
}

/// Checks required fields and URL format of a channel draft.
///
/// Every rule is evaluated; all violations are reported together.
#[must_use]
pub fn validate_channel(draft: &ChannelDraft) -> ValidationResult {
    let mut errors = Vec::new();

    if is_blank(draft.name.as_deref()) {
        errors.push(String::from(NAME_REQUIRED));
    }

    match draft.url.as_deref() {
        url if is_blank(url) => errors.push(String::from(URL_REQUIRED)),
        Some(url) if draft.channel_type == Some(ChannelType::Youtube) && !is_youtube_url(url) => {
            errors.push(String::from(INVALID_YOUTUBE_URL));
        }
        _ => {}
    }

    if draft.channel_type.is_none() {
        errors.push(String::from(TYPE_REQUIRED));
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: Option<&str>, url: Option<&str>, ty: Option<ChannelType>) -> ChannelDraft {
        ChannelDraft {
            name: name.map(String::from),
            url: url.map(String::from),
            channel_type: ty,
            ..ChannelDraft::default()
        }
    }

    #[test]
    fn test_valid_youtube_channel() {
        // Arrange
        let d = draft(
            Some("Lofi Girl"),
            Some("https://www.youtube.com/watch?v=jfKfPfyJRdk"),
            Some(ChannelType::Youtube),
        );

        // Act
        let result = validate_channel(&d);

        // Assert
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_short_youtube_link_is_accepted() {
        // Arrange
        let d = draft(Some("Short"), Some("https://youtu.be/abc"), Some(ChannelType::Youtube));

        // Act
        let result = validate_channel(&d);

        // Assert
        assert!(result.is_valid);
    }

    #[test]
    fn test_non_youtube_url_for_youtube_type() {
        // Arrange
        let d = draft(Some("FTP"), Some("ftp://x.com"), Some(ChannelType::Youtube));

        // Act
        let result = validate_channel(&d);

        // Assert
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![String::from(INVALID_YOUTUBE_URL)]);
    }

    #[test]
    fn test_image_type_accepts_any_url() {
        // Arrange
        let d = draft(Some("Art"), Some("ftp://x.com/a.png"), Some(ChannelType::Image));

        // Act
        let result = validate_channel(&d);

        // Assert
        assert!(result.is_valid);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        // Arrange
        let d = draft(Some("   "), Some("https://youtu.be/abc"), Some(ChannelType::Youtube));

        // Act
        let result = validate_channel(&d);

        // Assert
        assert_eq!(result.errors, vec![String::from(NAME_REQUIRED)]);
    }

    #[test]
    fn test_all_violations_are_collected() {
        // Arrange
        let d = draft(None, Some(" "), None);

        // Act
        let result = validate_channel(&d);

        // Assert
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                String::from(NAME_REQUIRED),
                String::from(URL_REQUIRED),
                String::from(TYPE_REQUIRED),
            ]
        );
    }

    #[test]
    fn test_missing_url_skips_youtube_check() {
        // Arrange
        let d = draft(Some("X"), None, Some(ChannelType::Youtube));

        // Act
        let result = validate_channel(&d);

        // Assert
        assert_eq!(result.errors, vec![String::from(URL_REQUIRED)]);
    }

    #[test]
    fn test_is_youtube_url_variants() {
        assert!(is_youtube_url("youtube.com/watch?v=1"));
        assert!(is_youtube_url("http://www.youtube.com/live/abc"));
        assert!(is_youtube_url("youtu.be/x"));
        assert!(!is_youtube_url("https://youtube.com/"));
        assert!(!is_youtube_url("https://vimeo.com/123"));
        assert!(!is_youtube_url("https://m.youtube.com/watch?v=1"));
    }
}
