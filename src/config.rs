use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Legalis";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Signed URLs for stored contract files expire after this many seconds.
/// All downstream extraction work must finish within this window.
pub const SIGNED_URL_TTL_SECS: u64 = 60;

/// Upload limits enforced before anything is written.
pub const MAX_UPLOAD_BYTES: usize = 6 * 1024 * 1024;
pub const ACCEPTED_UPLOAD_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// Get the application data directory
/// ~/Legalis/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Legalis")
}

/// Directory holding uploaded contract files
pub fn objects_dir() -> PathBuf {
    app_data_dir().join("objects")
}

/// Path of the sqlite database
pub fn db_path() -> PathBuf {
    app_data_dir().join("legalis.db")
}

/// Address the API server binds to
pub fn bind_addr() -> String {
    std::env::var("LEGALIS_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8088".to_string())
}

/// Base URL of the generative-language API
pub fn ai_base_url() -> String {
    std::env::var("LEGALIS_AI_BASE_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string())
}

/// Model used for reviews and document generation
pub fn ai_model() -> String {
    std::env::var("LEGALIS_AI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string())
}

/// API key for the generative-language API
pub fn ai_api_key() -> String {
    std::env::var("LEGALIS_AI_API_KEY").unwrap_or_default()
}

/// Base URL of the news API
pub fn news_base_url() -> String {
    std::env::var("LEGALIS_NEWS_BASE_URL").unwrap_or_else(|_| "https://gnews.io/api/v4".to_string())
}

/// API key for the news API
pub fn news_api_key() -> String {
    std::env::var("LEGALIS_NEWS_API_KEY").unwrap_or_default()
}

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    "legalis=info,tower_http=warn".to_string()
}
