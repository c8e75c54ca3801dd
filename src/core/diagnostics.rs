// Categorisation of runtime failures reported to the deploy diagnostics log.

/// Tags whose load failures are reported as resource errors.
pub const TRACKED_RESOURCE_TAGS: [&str; 5] = ["script", "link", "img", "audio", "video"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    AutoplayRestriction,
    CodecSupport,
    OperationAborted,
    NetworkFailure,
    AssetHtmlFallback,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::AutoplayRestriction => "autoplay-restriction",
            FailureCategory::CodecSupport => "codec-support",
            FailureCategory::OperationAborted => "operation-aborted",
            FailureCategory::NetworkFailure => "network-failure",
            FailureCategory::AssetHtmlFallback => "asset-load-html-fallback",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FailureCategory::AssetHtmlFallback => {
                Some("Asset likely missing - server returned HTML instead of expected resource")
            }
            _ => None,
        }
    }
}

/// Categorise an unhandled rejection from its error name and message.
pub fn categorize_rejection(name: &str, message: &str) -> Option<FailureCategory> {
    match name {
        "NotAllowedError" => Some(FailureCategory::AutoplayRestriction),
        "NotSupportedError" => Some(FailureCategory::CodecSupport),
        "AbortError" => Some(FailureCategory::OperationAborted),
        _ if message.contains("fetch") || message.contains("network") => {
            Some(FailureCategory::NetworkFailure)
        }
        _ if message.contains("HTML") || message.contains("text/html") => {
            Some(FailureCategory::AssetHtmlFallback)
        }
        _ => None,
    }
}

#[inline]
pub fn is_tracked_resource(tag_name: &str) -> bool {
    let lowered = tag_name.to_ascii_lowercase();
    TRACKED_RESOURCE_TAGS.contains(&lowered.as_str())
}

#[inline]
pub fn is_media_tag(tag_name: &str) -> bool {
    tag_name.eq_ignore_ascii_case("audio") || tag_name.eq_ignore_ascii_case("video")
}
