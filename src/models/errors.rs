//! Centralized Error Handling Module
//!
//! Every failure the engine can surface carries a unique error code so that
//! callers (request handlers, batch persistence) can map it without string
//! matching.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - INPUT_xxx: malformed observation or parameter
//! - CFG_xxx: zone catalog / weighting configuration errors
//! - IO_xxx: catalog file access

use std::fmt;

/// Failure surfaced by classification, scoring or configuration.
///
/// `code` is what callers branch on; `message` is for people and may carry
/// context prefixes added on the way up (e.g. the batch index).
#[derive(Debug)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Underlying I/O or parse failure, when there is one
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a lower-level failure (catalog file read, JSON parse)
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(code, message)
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Prefix the message with extra context, keeping code and source
    pub fn context(mut self, ctx: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", ctx, self.message);
        self
    }
}

// Rendered as "[CODE] message" so log lines stay greppable by code
impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|inner| inner as &(dyn std::error::Error + 'static))
    }
}

/// Stable codes; the string forms are part of the log and API contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors (1xx)
    // ============================================
    /// Latitude or longitude is NaN/infinite
    InputInvalidCoordinate,
    /// Speed is negative or non-finite
    InputInvalidSpeed,
    /// Timestamp cannot be represented as a wall-clock time
    InputInvalidTimestamp,
    /// High-risk circle radius is negative or non-finite
    InputInvalidRadius,

    // ============================================
    // Configuration Errors (2xx)
    // ============================================
    /// Zone catalog has no zones
    ConfigEmptyCatalog,
    /// Two zones share a name
    ConfigDuplicateZone,
    /// Invalid configuration value (weight out of range, bad center, ...)
    ConfigInvalidValue,
    /// Catalog JSON could not be parsed
    ConfigParseFailed,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Catalog file could not be read
    Io,
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Input Errors
            Self::InputInvalidCoordinate => "INPUT_INVALID_COORDINATE",
            Self::InputInvalidSpeed => "INPUT_INVALID_SPEED",
            Self::InputInvalidTimestamp => "INPUT_INVALID_TIMESTAMP",
            Self::InputInvalidRadius => "INPUT_INVALID_RADIUS",

            // Configuration Errors
            Self::ConfigEmptyCatalog => "CFG_EMPTY_CATALOG",
            Self::ConfigDuplicateZone => "CFG_DUPLICATE_ZONE",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigParseFailed => "CFG_PARSE_FAILED",

            // Generic
            Self::Io => "IO_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// HTTP status a request-handling layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InputInvalidCoordinate
            | Self::InputInvalidSpeed
            | Self::InputInvalidTimestamp
            | Self::InputInvalidRadius => 400,
            _ => 500,
        }
    }

    /// True for errors caused by the caller's observation rather than by
    /// engine configuration
    pub fn is_input_error(&self) -> bool {
        self.http_status() == 400
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Non-finite latitude/longitude
    pub fn invalid_coordinate(latitude: f64, longitude: f64) -> Self {
        Self::new(
            ErrorCode::InputInvalidCoordinate,
            format!("Coordinate must be finite, got ({}, {})", latitude, longitude),
        )
    }

    /// Negative or non-finite speed
    pub fn invalid_speed(speed_kmh: f64) -> Self {
        Self::new(
            ErrorCode::InputInvalidSpeed,
            format!("Speed must be a finite value >= 0 km/h, got {}", speed_kmh),
        )
    }

    /// Unrepresentable timestamp
    pub fn invalid_timestamp(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InputInvalidTimestamp, msg)
    }

    /// Bad high-risk circle radius
    pub fn invalid_radius(radius_km: f64) -> Self {
        Self::new(
            ErrorCode::InputInvalidRadius,
            format!("Radius must be a finite value >= 0 km, got {}", radius_km),
        )
    }

    /// Nearest-of-zero-zones is undefined
    pub fn empty_catalog() -> Self {
        Self::new(
            ErrorCode::ConfigEmptyCatalog,
            "Zone catalog is empty - at least one zone is required for classification",
        )
    }

    /// Zone name appears twice
    pub fn duplicate_zone(name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigDuplicateZone,
            format!("Duplicate zone name in catalog: {}", name),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Io, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ConfigParseFailed, "JSON parse error", err)
    }
}
