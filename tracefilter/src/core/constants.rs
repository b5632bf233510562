// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "tracefilter";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".tracefilter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tracefilter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TRACEFILTER_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TRACEFILTER_LOG";

/// Environment variable selecting JSON log output
pub const ENV_LOG_JSON: &str = "TRACEFILTER_LOG_JSON";

/// Environment variable for the value encoding (plain, url, base64)
pub const ENV_ENCODING: &str = "TRACEFILTER_ENCODING";

/// Environment variable for the timezone applied to offset-less timestamps
pub const ENV_TIMEZONE: &str = "TRACEFILTER_TIMEZONE";

/// Environment variable for the per-list filter limit
pub const ENV_MAX_FILTERS: &str = "TRACEFILTER_MAX_FILTERS";

/// Environment variable for the filter JSON size limit
pub const ENV_MAX_JSON_BYTES: &str = "TRACEFILTER_MAX_JSON_BYTES";

// =============================================================================
// Defaults
// =============================================================================

/// Default timezone for offset-less timestamps
pub const DEFAULT_TIMEZONE: &str = "UTC";
