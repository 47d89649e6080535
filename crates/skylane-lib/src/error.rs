use thiserror::Error;

/// Convenient result alias for the skylane library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a city name could not be found in the atlas.
    #[error("unknown city name: {name}{}", format_suggestions(.suggestions))]
    UnknownCity {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a plane name could not be found in the catalog.
    #[error("unknown plane name: {name}{}", format_suggestions(.suggestions))]
    UnknownPlane {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a unit name matched neither a unit nor any of its aliases.
    #[error("unknown unit: {name}{}", format_suggestions(.suggestions))]
    UnknownUnit {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a conversion names the same unit on both sides.
    #[error("cannot convert {name} to itself")]
    SameUnit { name: String },

    /// Raised when two units have no direct conversion between them.
    #[error("no conversion from {from} to {to}; units are not of the same type")]
    MismatchedUnits { from: String, to: String },

    /// Raised when an upgrade level falls outside the supported tiers.
    #[error("invalid upgrade level {level}; specify a number between 0 and 4")]
    InvalidUpgradeLevel { level: i64 },

    /// Raised when no flight path could be found between two cities.
    #[error("no route found between {origin} and {destination}")]
    RouteNotFound { origin: String, destination: String },

    /// Raised when a single leg of an explicit flight path exceeds the
    /// plane's effective range.
    #[error("{from} to {to} ({distance} mi.) is not possible with the given range ({range} mi.)")]
    LegOutOfRange {
        from: String,
        to: String,
        distance: u32,
        range: u32,
    },

    /// Raised when an explicit flight path is too short to fly.
    #[error("invalid flight path: {message}")]
    InvalidFlightPath { message: String },

    /// Raised when catalog data fails validation.
    #[error("invalid catalog data: {message}")]
    CatalogValidation { message: String },

    /// Raised when duplicate city names are encountered during atlas load.
    #[error("duplicate city name encountered: {name}")]
    DuplicateCityName { name: String },

    /// Raised when duplicate plane names are encountered during catalog load.
    #[error("duplicate plane name encountered: {name}")]
    DuplicatePlaneName { name: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
