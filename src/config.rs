use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settings for the elimination solver.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SolverConfig {
    #[serde(default)]
    pub pivot: PivotRule,

    /// Pivots with `|p| <= tol * max|A|` are reported as singular, as are
    /// non-finite pivots. The default of `0.0` only rejects exact zeros. `None`
    /// skips the check and lets Inf/NaN propagate.
    #[serde(default = "default_singular_tolerance")]
    pub singular_tolerance: Option<f64>,
}

/// How the pivot row is chosen among the remaining rows of a column.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PivotRule {
    /// Largest signed value. Matches the historical output of the solver but
    /// is not numerically robust when the column holds large negative values.
    #[default]
    LargestValue,
    /// Largest absolute value (classic partial pivoting).
    LargestMagnitude,
}

fn default_singular_tolerance() -> Option<f64> {
    Some(SolverConfig::DEFAULT_SINGULAR_TOLERANCE)
}

impl SolverConfig {
    pub const DEFAULT_SINGULAR_TOLERANCE: f64 = 0.0;

    pub fn new(pivot: PivotRule, singular_tolerance: Option<f64>) -> Self {
        Self {
            pivot,
            singular_tolerance,
        }
    }

    pub fn with_pivot(mut self, pivot: PivotRule) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_singular_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.singular_tolerance = tolerance;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot: PivotRule::default(),
            singular_tolerance: default_singular_tolerance(),
        }
    }
}

impl FromStr for PivotRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "largest_value" | "value" => Ok(PivotRule::LargestValue),
            "largest_magnitude" | "magnitude" | "abs" => Ok(PivotRule::LargestMagnitude),
            _ => Err(format!(
                "Unknown pivot rule: {}. Expected `largest_value` or `largest_magnitude`",
                s
            )),
        }
    }
}
