use super::error::ConfigError;

// Substrings that only appear when a relative prefix was glued onto a full URL.
const MALFORMED_PATTERNS: [&str; 2] = ["audio/http://", "audio/https://"];

/// Builds deployable asset URLs under a configurable base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    base: String,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new("/")
    }
}

impl AssetResolver {
    pub fn new(base_path: &str) -> Self {
        Self {
            base: normalize_base(base_path),
        }
    }

    /// Base path, always ending with exactly one slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `base + "assets/" + path` with any leading slash of `path` dropped.
    pub fn asset_url(&self, path: &str) -> String {
        let clean = path.strip_prefix('/').unwrap_or(path);
        format!("{}assets/{}", self.base, clean)
    }
}

#[inline]
pub fn normalize_base(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[inline]
pub fn is_external(source: &str) -> bool {
    let trimmed = source.trim();
    trimmed.starts_with("http://") || trimmed.starts_with("https://")
}

/// Turns a configured audio source into a URL the media element can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUrlResolver {
    assets: AssetResolver,
}

impl AudioUrlResolver {
    pub fn new(assets: AssetResolver) -> Self {
        Self { assets }
    }

    pub fn resolve(&self, source: &str) -> Result<String, ConfigError> {
        let trimmed = source.trim();
        if is_external(trimmed) {
            log::info!("[assets] external audio url {}", trimmed);
            return Ok(trimmed.to_string());
        }
        if MALFORMED_PATTERNS.iter().any(|p| trimmed.contains(p)) {
            log::error!(
                "[assets] malformed audio source {:?}: use either a relative path or an absolute URL, not both",
                trimmed
            );
            return Err(ConfigError::MalformedAudioSource {
                value: trimmed.to_string(),
            });
        }
        let resolved = self.assets.asset_url(trimmed);
        log::info!("[assets] audio source {} -> {}", trimmed, resolved);
        Ok(resolved)
    }
}
