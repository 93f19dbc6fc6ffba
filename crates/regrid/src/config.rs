//! Options controlling a regrid transform.

use serde::{Deserialize, Serialize};

use crate::error::{RegridError, Result};

/// Options for [`Regridder::transform`](crate::Regridder::transform).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegridOptions {
    /// Correct destination values for missing (NaN) source cells.
    pub renormalize: bool,

    /// Set destination cells with mask 0 to NaN.
    pub apply_mask: bool,

    /// Destination cells whose remapped coverage does not exceed this
    /// fraction become NaN when renormalizing. 0 accepts any positive coverage.
    pub min_coverage: f64,
}

impl Default for RegridOptions {
    fn default() -> Self {
        Self {
            renormalize: true,
            apply_mask: true,
            min_coverage: 0.0,
        }
    }
}

impl RegridOptions {
    /// Load options from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(val) = std::env::var("REGRID_RENORMALIZE") {
            options.renormalize = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("REGRID_APPLY_MASK") {
            options.apply_mask = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("REGRID_MIN_COVERAGE") {
            if let Ok(threshold) = val.parse() {
                options.min_coverage = threshold;
            }
        }

        options
    }

    pub fn with_renormalize(mut self, renormalize: bool) -> Self {
        self.renormalize = renormalize;
        self
    }

    pub fn with_apply_mask(mut self, apply_mask: bool) -> Self {
        self.apply_mask = apply_mask;
        self
    }

    pub fn with_min_coverage(mut self, min_coverage: f64) -> Self {
        self.min_coverage = min_coverage;
        self
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if !self.min_coverage.is_finite() || !(0.0..1.0).contains(&self.min_coverage) {
            return Err(RegridError::config(format!(
                "min_coverage must be in [0, 1), got {}",
                self.min_coverage
            )));
        }
        Ok(())
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RegridOptions::default();
        assert!(options.renormalize);
        assert!(options.apply_mask);
        assert_eq!(options.min_coverage, 0.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_validation() {
        let mut options = RegridOptions::default().with_min_coverage(0.5);
        assert!(options.validate().is_ok());

        options.min_coverage = -0.1;
        assert!(options.validate().is_err());

        options.min_coverage = 1.0;
        assert!(options.validate().is_err());

        options.min_coverage = f64::NAN;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let options = RegridOptions::default()
            .with_renormalize(false)
            .with_apply_mask(false)
            .with_min_coverage(0.25);
        assert_eq!(
            options,
            RegridOptions {
                renormalize: false,
                apply_mask: false,
                min_coverage: 0.25
            }
        );
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("yes"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: RegridOptions = serde_json::from_str(r#"{"apply_mask": false}"#).unwrap();
        assert!(options.renormalize);
        assert!(!options.apply_mask);
        assert_eq!(options.min_coverage, 0.0);
    }

    // The only test touching these variables, so no other test races it.
    #[test]
    fn test_from_env() {
        const VARS: [&str; 3] = ["REGRID_RENORMALIZE", "REGRID_APPLY_MASK", "REGRID_MIN_COVERAGE"];
        for var in VARS {
            std::env::remove_var(var);
        }
        assert_eq!(RegridOptions::from_env(), RegridOptions::default());

        std::env::set_var("REGRID_RENORMALIZE", "0");
        std::env::set_var("REGRID_APPLY_MASK", "TRUE");
        std::env::set_var("REGRID_MIN_COVERAGE", "0.25");
        let options = RegridOptions::from_env();
        assert!(!options.renormalize);
        assert!(options.apply_mask);
        assert_eq!(options.min_coverage, 0.25);

        // Unparsable coverage keeps the default.
        std::env::set_var("REGRID_MIN_COVERAGE", "half");
        assert_eq!(RegridOptions::from_env().min_coverage, 0.0);

        for var in VARS {
            std::env::remove_var(var);
        }
    }
}
