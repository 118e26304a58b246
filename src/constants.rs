//! Dashboard-wide constants
//!
//! String literals and default values shared by the object model,
//! kept in one place so the serialized output stays consistent.

/// Unit formats understood by the rendering service
pub mod format {
    /// Plain numbers with SI-ish suffixes (1K, 1M)
    pub const SHORT_FORMAT: &str = "short";

    /// No formatting applied
    pub const NO_FORMAT: &str = "none";

    pub const PERCENT_FORMAT: &str = "percent";

    /// Percent where 1.0 means 100%
    pub const PERCENT_UNIT_FORMAT: &str = "percentunit";

    pub const SECONDS_FORMAT: &str = "s";

    pub const MILLISECONDS_FORMAT: &str = "ms";

    pub const BYTES_FORMAT: &str = "bytes";

    pub const BITS_PER_SEC_FORMAT: &str = "bps";

    pub const OPS_FORMAT: &str = "ops";
}

/// Alert reducer types
pub mod reducer {
    pub const RTYPE_AVG: &str = "avg";
    pub const RTYPE_MIN: &str = "min";
    pub const RTYPE_MAX: &str = "max";
    pub const RTYPE_SUM: &str = "sum";
    pub const RTYPE_COUNT: &str = "count";
    pub const RTYPE_LAST: &str = "last";
    pub const RTYPE_MEDIAN: &str = "median";
}

/// Logical operators joining alert conditions
pub mod operator {
    pub const OP_AND: &str = "and";
    pub const OP_OR: &str = "or";
}

/// Alert states
pub mod alert_state {
    pub const STATE_NO_DATA: &str = "no_data";
    pub const STATE_ALERTING: &str = "alerting";
    pub const STATE_KEEP_LAST_STATE: &str = "keep_state";
    pub const STATE_OK: &str = "ok";
}

/// Target defaults
pub mod target {
    /// Default result format for a query
    pub const TIME_SERIES_FORMAT: &str = "time_series";

    pub const TABLE_FORMAT: &str = "table";

    pub const DEFAULT_INTERVAL_FACTOR: u32 = 2;

    pub const DEFAULT_STEP: u32 = 10;

    /// Pattern matching a symbolic `#<refId>` reference inside an expression
    pub const REFERENCE_PATTERN: &str = r"#([A-Z]+)";
}

/// Panel defaults
pub mod panel {
    pub const GRAPH_TYPE: &str = "graph";
    pub const SINGLESTAT_TYPE: &str = "singlestat";
    pub const TABLE_TYPE: &str = "table";
    pub const TEXT_TYPE: &str = "text";
    pub const ROW_TYPE: &str = "row";

    /// Title used when a row is built without one
    pub const DEFAULT_ROW_TITLE: &str = "New row";

    pub const DEFAULT_ROW_HEIGHT: u32 = 250;

    pub const DEFAULT_SPAN: u32 = 12;

    pub const DEFAULT_NULL_POINT_MODE: &str = "connected";

    /// Fill colour used for panel-level alert thresholds
    pub const THRESHOLD_COLOR_MODE: &str = "critical";
}

/// Dashboard defaults
pub mod dashboard {
    pub const SCHEMA_VERSION: u32 = 12;

    pub const DEFAULT_REFRESH: &str = "10s";

    pub const DEFAULT_STYLE: &str = "dark";

    pub const DEFAULT_TIMEZONE: &str = "utc";

    pub const DEFAULT_TIME_FROM: &str = "now-1h";

    pub const DEFAULT_TIME_TO: &str = "now";

    pub const DEFAULT_REFRESH_INTERVALS: &[&str] =
        &["5s", "10s", "30s", "1m", "5m", "15m", "30m", "1h", "2h", "1d"];

    pub const DEFAULT_TIME_OPTIONS: &[&str] =
        &["5m", "15m", "1h", "6h", "12h", "24h", "2d", "7d", "30d"];

    pub const ANNOTATION_ICON_COLOR: &str = "rgba(0, 211, 255, 1)";

    /// Link kinds: a fixed url, or dashboards matched by tag
    pub const LINK_TYPE_LINK: &str = "link";
    pub const LINK_TYPE_DASHBOARDS: &str = "dashboards";
}

/// Generator CLI constants
pub mod generator {
    /// Environment variable selecting the log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

    /// Prefix for environment overrides of the generator config
    pub const ENV_PREFIX: &str = "DASHGEN_";

    pub const DEFAULT_LOG_LEVEL: &str = "info";
}
