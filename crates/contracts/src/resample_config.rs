//! Resampler configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Polynomial order used to build the per-axis interpolants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// C2 cubic spline (not-a-knot ends)
    #[default]
    Cubic,
    /// Piecewise linear
    Linear,
    /// Value of the nearest node
    Nearest,
}

impl InterpolationMethod {
    /// Minimum number of attitude samples the method needs
    pub const fn min_samples(&self) -> usize {
        match self {
            Self::Cubic => 4,
            Self::Linear => 2,
            Self::Nearest => 1,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Linear => "linear",
            Self::Nearest => "nearest",
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterpolationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cubic" => Ok(Self::Cubic),
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            other => Err(format!(
                "unknown interpolation method '{other}' (expected cubic, linear or nearest)"
            )),
        }
    }
}

/// Resampler configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Interpolation method
    #[serde(default)]
    pub method: InterpolationMethod,

    /// Unwrap ±180° jumps before fitting, wrap results back into (-180, 180]
    #[serde(default)]
    pub unwrap_angles: bool,
}

impl ResampleConfig {
    pub fn with_method(method: InterpolationMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_minimum_samples() {
        assert_eq!(InterpolationMethod::Cubic.min_samples(), 4);
        assert_eq!(InterpolationMethod::Linear.min_samples(), 2);
        assert_eq!(InterpolationMethod::Nearest.min_samples(), 1);
    }

    #[test]
    fn method_parses_case_insensitive() {
        assert_eq!(
            "Cubic".parse::<InterpolationMethod>(),
            Ok(InterpolationMethod::Cubic)
        );
        assert_eq!(
            "nearest".parse::<InterpolationMethod>(),
            Ok(InterpolationMethod::Nearest)
        );
        assert!("quadratic".parse::<InterpolationMethod>().is_err());
    }

    #[test]
    fn config_defaults_to_cubic() {
        let config: ResampleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.method, InterpolationMethod::Cubic);
        assert!(!config.unwrap_angles);

        let config: ResampleConfig = serde_json::from_str(r#"{"method":"linear"}"#).unwrap();
        assert_eq!(config.method, InterpolationMethod::Linear);
    }
}
