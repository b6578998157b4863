//! Rate movement outcome.

use std::fmt;

use crate::config::GifConfig;

/// Direction of a rate between yesterday and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Risen,
    Fallen,
}

impl Outcome {
    /// `Risen` only when today is strictly greater than yesterday. Equal
    /// rates (and NaN) count as `Fallen`.
    pub fn from_rates(today: f64, yesterday: f64) -> Self {
        if today > yesterday {
            Outcome::Risen
        } else {
            Outcome::Fallen
        }
    }

    /// Search term configured for this outcome.
    pub fn search_term<'a>(&self, config: &'a GifConfig) -> &'a str {
        match self {
            Outcome::Risen => &config.risen_query,
            Outcome::Fallen => &config.fallen_query,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Risen => "risen",
            Outcome::Fallen => "fallen",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
