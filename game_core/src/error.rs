use std::fmt;

/// Invalid tuning values in a [`crate::Config`]
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f32 },
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },
    TooFewSpawnRows { rows: u32, tallest_shape: u32 },
    ObstacleDelayTooShort { ramp_max: f32, delay_ms: f32, min_ms: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "config field `{field}` must be positive, got {value}")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "config field `{field}` must be within [{min}, {max}], got {value}"
            ),
            Self::TooFewSpawnRows {
                rows,
                tallest_shape,
            } => write!(
                f,
                "{rows} spawn rows cannot fit a cluster {tallest_shape} cells tall"
            ),
            Self::ObstacleDelayTooShort {
                ramp_max,
                delay_ms,
                min_ms,
            } => write!(
                f,
                "rampMax {ramp_max} leaves {delay_ms}ms between obstacle clusters, minimum is {min_ms}ms"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Malformed or missing asset catalogs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    EmptyColorCatalog,
    EmptyObstacleCatalog,
    InvalidHexColor { key: String, value: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyColorCatalog => write!(f, "color catalog is empty"),
            Self::EmptyObstacleCatalog => write!(f, "obstacle catalog is empty"),
            Self::InvalidHexColor { key, value } => {
                write!(f, "color `{key}` has invalid hex value `{value}`")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Failure to build a session
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    Config(ConfigError),
    Registry(RegistryError),
    InvalidViewport { width: f32, height: f32 },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid config: {err}"),
            Self::Registry(err) => write!(f, "invalid assets: {err}"),
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport {width}x{height} has no area")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::InvalidViewport { .. } => None,
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<RegistryError> for SessionError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}
