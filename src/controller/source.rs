use std::path::Path;
use std::sync::Arc;

use super::binding::DisplayImage;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// The photo the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl SourceImage {
    /// Wrap selected bytes. A missing or generic declared type is sniffed
    /// from the content; nothing is rejected.
    pub fn new(name: impl Into<String>, declared_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let media_type = declared_type
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != FALLBACK_MEDIA_TYPE)
            .map(str::to_string)
            .unwrap_or_else(|| sniff_media_type(&bytes).to_string());

        Self {
            name: name.into(),
            media_type,
            bytes: bytes.into(),
        }
    }

    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, None, bytes))
    }

    pub fn display(&self) -> DisplayImage {
        DisplayImage {
            media_type: self.media_type.clone(),
            bytes: Arc::clone(&self.bytes),
        }
    }
}

fn sniff_media_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}
