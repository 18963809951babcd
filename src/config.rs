//! Editor configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use canvas::consts::DEFAULT_MAX_IMAGES;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SLOT_PATH: &str = "saved_template.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Pixel budget for one export buffer (64 MP, 256 MiB of RGBA).
pub const DEFAULT_MAX_EXPORT_PIXELS: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The capacity ceiling must allow at least one image.
    #[error("DECORBOARD_MAX_IMAGES must be at least 1")]
    ZeroCapacity,

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroCapacity => "E_CONFIG_CAPACITY",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

impl HttpTimeouts {
    /// Build a reqwest client with these timeouts.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the TLS backend fails to initialize.
    pub fn client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_secs))
            .connect_timeout(Duration::from_secs(self.connect_secs))
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Persistence backend base URL, without a trailing slash.
    pub api_base_url: String,
    /// Image fetch proxy endpoint. URL ingestion is unavailable without it.
    pub fetch_proxy_url: Option<String>,
    /// Capacity ceiling for placed images.
    pub max_images: usize,
    /// Local durable slot used when no backend session exists.
    pub slot_path: PathBuf,
    pub timeouts: HttpTimeouts,
    /// Largest raster, in pixels, that export will allocate.
    pub max_export_pixels: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            fetch_proxy_url: None,
            max_images: DEFAULT_MAX_IMAGES,
            slot_path: PathBuf::from(DEFAULT_SLOT_PATH),
            timeouts: HttpTimeouts::default(),
            max_export_pixels: DEFAULT_MAX_EXPORT_PIXELS,
        }
    }
}

impl EditorConfig {
    /// Build typed editor config from environment variables.
    ///
    /// All optional:
    /// - `DECORBOARD_API_BASE_URL`: default `http://localhost:8000`
    /// - `DECORBOARD_FETCH_PROXY_URL`: no default
    /// - `DECORBOARD_MAX_IMAGES`: default 10
    /// - `DECORBOARD_SLOT_PATH`: default `saved_template.json`
    /// - `DECORBOARD_REQUEST_TIMEOUT_SECS`: default 30
    /// - `DECORBOARD_CONNECT_TIMEOUT_SECS`: default 10
    /// - `DECORBOARD_MAX_EXPORT_PIXELS`: default 67108864
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ZeroCapacity` if `DECORBOARD_MAX_IMAGES` is `0`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("DECORBOARD_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let fetch_proxy_url = std::env::var("DECORBOARD_FETCH_PROXY_URL")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());
        let max_images = env_parse("DECORBOARD_MAX_IMAGES", DEFAULT_MAX_IMAGES);
        if max_images == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let slot_path =
            std::env::var("DECORBOARD_SLOT_PATH").map_or_else(|_| PathBuf::from(DEFAULT_SLOT_PATH), PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: env_parse("DECORBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("DECORBOARD_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let max_export_pixels = env_parse("DECORBOARD_MAX_EXPORT_PIXELS", DEFAULT_MAX_EXPORT_PIXELS);

        Ok(Self { api_base_url, fetch_proxy_url, max_images, slot_path, timeouts, max_export_pixels })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
