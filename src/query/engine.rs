//! Store query engines

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query execution strategy offered by the store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Scan every segment in process
    #[serde(rename = "naïve", alias = "naive")]
    #[value(name = "naïve", alias = "naive")]
    Naive,
    /// Delegate matching to ripgrep
    #[value(alias = "rg")]
    Ripgrep,
    /// Stream matches lazily as segments are read
    #[default]
    Lazy,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Naive => "naïve",
            Engine::Ripgrep => "ripgrep",
            Engine::Lazy => "lazy",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive" | "naïve" => Ok(Engine::Naive),
            "ripgrep" | "rg" => Ok(Engine::Ripgrep),
            "lazy" => Ok(Engine::Lazy),
            _ => Err(format!(
                "Invalid engine: {}. Use naïve, ripgrep, or lazy",
                s
            )),
        }
    }
}
