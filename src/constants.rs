/// Name reported to MCP clients
pub const SERVER_NAME: &str = "mcp-weather-safety";

/// Key of the persisted search history slot
pub const HISTORY_KEY: &str = "weatherSearchHistory";

/// Maximum number of places kept in the search history
pub const HISTORY_CAPACITY: usize = 10;

/// Directory holding the history file when none is configured
pub const DEFAULT_DATA_DIR: &str = ".mcp-weather-safety";

/// Environment variable overriding the history directory
pub const HISTORY_DIR_ENV: &str = "WEATHER_SAFETY_HISTORY_DIR";

/// Environment variable selecting an in-memory history
pub const EPHEMERAL_ENV: &str = "WEATHER_SAFETY_EPHEMERAL";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "mcp_weather_safety=info";

/// OpenWeatherMap icon base URL
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
