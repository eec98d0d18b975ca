use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "AyurSync";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend origin used when `AYURSYNC_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://ayursync-backend.onrender.com";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Backend base URL. Single source of truth for every endpoint.
pub fn api_base_url() -> String {
    std::env::var("AYURSYNC_API_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Get the application data directory
/// ~/AyurSync/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("AyurSync")
}

/// Path of the local client store.
pub fn store_path() -> PathBuf {
    app_data_dir().join("client.db")
}
