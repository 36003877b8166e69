use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::decode::PostFilter;
use crate::foundation::error::{PhotocardError, PhotocardResult};
use crate::templates::Caption;

/// Extra font directory appended to [`FontConfig::dirs`] by [`ComposerConfig::with_env`].
pub const FONT_DIR_ENV: &str = "PHOTOCARD_FONT_DIR";

/// Composer settings. Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// Export file names are `<export_prefix>-<unix_ms>.png`.
    pub export_prefix: String,
    pub post_filter: PostFilter,
    /// Pins the scattered decorations; fresh per render pass when unset.
    pub decor_seed: Option<u64>,
    pub caption: CaptionConfig,
    pub fonts: FontConfig,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            export_prefix: "KKN-Photo".to_string(),
            post_filter: PostFilter::None,
            decor_seed: None,
            caption: CaptionConfig::default(),
            fonts: FontConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    pub event: String,
    pub location: String,
    /// Fixed footer date; today's local date (`d/m/yyyy`) when unset.
    pub date: Option<String>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            event: "KKN 2026".to_string(),
            location: "Piasa Kulon".to_string(),
            date: None,
        }
    }
}

impl CaptionConfig {
    pub fn resolve(&self, today: chrono::NaiveDate) -> Caption {
        Caption {
            event: self.event.clone(),
            location: self.location.clone(),
            date: self
                .date
                .clone()
                .unwrap_or_else(|| today.format("%-d/%-m/%Y").to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Load the platform's installed fonts.
    pub system: bool,
    pub dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            system: true,
            dirs: Vec::new(),
        }
    }
}

impl ComposerConfig {
    pub fn from_json_str(s: &str) -> PhotocardResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PhotocardError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PhotocardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PhotocardError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            PhotocardError::validation(format!("parse config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Append `PHOTOCARD_FONT_DIR` to the font directories when it is set.
    pub fn with_env(mut self) -> Self {
        if let Some(dir) = std::env::var_os(FONT_DIR_ENV).filter(|d| !d.is_empty()) {
            self.fonts.dirs.push(PathBuf::from(dir));
        }
        self
    }

    pub fn validate(&self) -> PhotocardResult<()> {
        let prefix = self.export_prefix.trim();
        if prefix.is_empty() {
            return Err(PhotocardError::validation("export_prefix must be non-empty"));
        }
        if prefix.contains(['/', '\\']) || prefix.starts_with('.') {
            return Err(PhotocardError::validation(
                "export_prefix must not contain path separators or start with '.'",
            ));
        }
        if self.caption.event.trim().is_empty() {
            return Err(PhotocardError::validation("caption.event must be non-empty"));
        }
        Ok(())
    }
}
