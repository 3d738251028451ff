/// Application name
pub const APP_NAME: &str = "GeoResolve";

/// Path prefix of every REST endpoint, relative to the configured backend URL
pub const API_PREFIX: &str = "/api";

/// Maximum number of images attached to one complaint
pub const MAX_IMAGES: usize = 3;

/// Per-image size ceiling in bytes (5 MiB)
pub const MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

/// Map centre used when no device location is known (Takkellapadu, Andhra Pradesh)
pub const FALLBACK_CENTER: (f64, f64) = (16.5062, 80.6480);

/// Zoom level of the browsing maps (dashboards)
pub const BROWSE_ZOOM: u8 = 13;

/// Zoom level of the location picker on the report form
pub const PICKER_ZOOM: u8 = 15;

/// Default search radius for nearby complaints, in metres
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 5000.0;

/// Sentinel that disables a status or category filter dimension
pub const FILTER_ALL: &str = "all";

/// Durable store keys
pub const SESSION_TOKEN_KEY: &str = "token";
pub const SESSION_USER_KEY: &str = "user";

/// Marker colours per status (amber, blue, green)
pub const COLOR_PENDING: &str = "#f59e0b";
pub const COLOR_IN_PROGRESS: &str = "#3b82f6";
pub const COLOR_RESOLVED: &str = "#10b981";
