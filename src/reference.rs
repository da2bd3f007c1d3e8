//! Reference diagram - the static image shown next to the learner's render.
//!
//! The asset is opaque: it is read, embedded as a data URI and never
//! interpreted. A missing or unreadable asset turns into fallback text.

use crate::svg::escape_xml;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Text shown in place of an unavailable reference image
pub const FALLBACK_TEXT: &str = "Reference diagram not available";

/// Default alt text of the reference image
pub const DEFAULT_ALT: &str = "Expert Diarrhea Management Decision Map";

/// Location of the reference asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub path: PathBuf,
    #[serde(default = "default_alt")]
    pub alt: String,
}

fn default_alt() -> String {
    DEFAULT_ALT.to_string()
}

/// Outcome of loading the reference asset
#[derive(Debug, Clone, PartialEq)]
pub enum ReferencePanel {
    Loaded { data_uri: String, alt: String },
    Unavailable { reason: String },
}

impl ReferenceImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            alt: default_alt(),
        }
    }

    /// Load the asset. Never fails; errors become [`ReferencePanel::Unavailable`].
    pub fn load(&self) -> ReferencePanel {
        match self.try_load() {
            Ok(data_uri) => {
                info!(path = self.path.display().to_string(); "Loaded reference image");
                ReferencePanel::Loaded {
                    data_uri,
                    alt: self.alt.clone(),
                }
            }
            Err(reason) => {
                warn!(
                    path = self.path.display().to_string(),
                    reason = reason.as_str();
                    "Reference image unavailable"
                );
                ReferencePanel::Unavailable { reason }
            }
        }
    }

    fn try_load(&self) -> Result<String, String> {
        let mime_type = mime_type_for(&self.path)?;
        let data = fs::read(&self.path)
            .map_err(|e| format!("failed to read {}: {}", self.path.display(), e))?;
        if data.is_empty() {
            return Err(format!("{} is empty", self.path.display()));
        }
        let encoded = BASE64_STANDARD.encode(&data);
        Ok(format!("data:{};base64,{}", mime_type, encoded))
    }
}

/// Mime type of an image asset, from its file extension
pub fn mime_type_for(path: &Path) -> Result<&'static str, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| format!("{} has no file extension", path.display()))?;

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "svg" => Ok("image/svg+xml"),
        "webp" => Ok("image/webp"),
        other => Err(format!("unsupported image type '.{}'", other)),
    }
}

impl ReferencePanel {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ReferencePanel::Loaded { .. })
    }

    /// HTML fragment mounted in the reference panel
    pub fn to_html(&self) -> String {
        match self {
            ReferencePanel::Loaded { data_uri, alt } => format!(
                r#"<div style="text-align:center;padding:20px"><img src="{}" alt="{}" style="max-width:100%;height:auto;border:none;border-radius:8px" /></div>"#,
                data_uri,
                escape_xml(alt)
            ),
            ReferencePanel::Unavailable { .. } => format!(
                r#"<div style="text-align:center;padding:20px"><p style="color: #666;">{}</p></div>"#,
                FALLBACK_TEXT
            ),
        }
    }
}
