use std::time::Duration;

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const PRODUCT_NAME: &str = "MetrixSight";
pub const DEFAULT_SHELL_LOCALE: &str = "fr-FR";

pub const DEV_SERVER_URL: &str = "http://localhost:5175/";
pub const DEV_SERVER_HOST: &str = "localhost:5175";
pub const DEV_ALLOWED_HOSTS: [&str; 3] = [
    "localhost:5175",
    "fonts.googleapis.com",
    "fonts.gstatic.com",
];
pub const ASSET_SCHEME: &str = "metrixsight";
pub const ASSET_SCHEME_HTTP_HOST: &str = "metrixsight.localhost";
pub const DEV_MODE_ENV: &str = "NODE_ENV";
pub const ROOT_DIR_ENV: &str = "METRIXSIGHT_ROOT";
pub const LOCALE_ENV: &str = "METRIXSIGHT_LOCALE";

pub const WINDOW_WIDTH: f64 = 1400.0;
pub const WINDOW_HEIGHT: f64 = 900.0;
pub const WINDOW_MIN_WIDTH: f64 = 1200.0;
pub const WINDOW_MIN_HEIGHT: f64 = 800.0;

pub const AUTO_UPDATE_CHECK_DELAY: Duration = Duration::from_secs(6);
pub const DESKTOP_LOG_FILE: &str = "desktop.log";
pub const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

pub const CONTENT_SECURITY_POLICY: [&str; 9] = [
    "default-src 'self'",
    "script-src 'self'",
    "style-src 'self' 'unsafe-inline' https://fonts.googleapis.com",
    "img-src 'self' data: blob:",
    "font-src 'self' https://fonts.gstatic.com",
    "connect-src 'self'",
    "object-src 'none'",
    "base-uri 'self'",
    "frame-ancestors 'none'",
];
