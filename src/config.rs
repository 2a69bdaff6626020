//! Process-wide configuration.
//!
//! The model identifier, the restoration prompt and the download name are
//! compile-time constants. Only the credential and the API base URL come from
//! the environment, and they are read once at startup.

use std::net::SocketAddr;

/// Generative image model every enhancement request is sent to.
pub const MODEL_NAME: &str = "gemini-2.5-flash-image-preview";

/// Public endpoint of the Generative Language API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default listen address of the web UI.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// File name offered for the restored image.
pub const DOWNLOAD_FILE_NAME: &str = "enhanced-photo.png";

/// Media type assumed when the model omits one for its image part.
pub const DEFAULT_RESULT_MEDIA_TYPE: &str = "image/png";

/// Largest upload accepted by the web UI.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Instruction sent alongside every photo.
pub const RESTORATION_PROMPT: &str = "\
You are an expert photo restoration specialist. Restore the attached photograph by following these steps in order:
1. Enhance the image: increase contrast and saturation and recover fine detail and sharpness without introducing artifacts.
2. Inpaint damage: detect scratches, tears, stains, creases and missing regions, and fill them in so they match the surrounding content and context.
3. Colorize: if the photo is black and white, sepia or faded, apply natural, historically plausible colors to skin, clothing, sky and background.
4. Final touch-up: balance the overall tone, remove remaining noise and make the result look like a high-quality modern photograph while preserving the identity and composition of the original.
Return the restored photograph as an image.";

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const API_BASE_VAR: &str = "GEMINI_API_BASE";

#[derive(Debug, Clone)]
pub struct Config {
    /// May be empty; a missing key only shows up as a failed request.
    pub api_key: String,
    pub api_base: String,
    pub bind: SocketAddr,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();
        if api_key.trim().is_empty() {
            tracing::warn!("{API_KEY_VAR} is not set; enhancement requests will be rejected");
        }

        let api_base = lookup(API_BASE_VAR)
            .map(|base| base.trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            api_key,
            api_base,
            bind: default_bind(),
        }
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}
