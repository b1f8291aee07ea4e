//! Run configuration: window sizes, thread count, and which comparison
//! columns are enabled, validated up front before any work starts
//! (spec.md 7, "configuration" error kind).

use crate::compare::ComparisonColumns;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream/downstream flank window in base pairs (spec.md 4.3.3.1).
    pub flank_window: i64,
    /// `0` lets `rayon` pick its default (number of logical CPUs).
    pub threads: usize,
    pub comparison_columns: ComparisonColumns,
    /// Forces every comparison row through regardless of category visibility
    /// (spec.md 6, `--all`).
    pub show_all_categories: bool,
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            flank_window: crate::annotate::DEFAULT_FLANK_WINDOW,
            threads: 0,
            comparison_columns: ComparisonColumns::default(),
            show_all_categories: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.flank_window < 0 {
            return Err(ConfigError::OutOfRange {
                field: "flank_window",
                min: 0.0,
                max: f64::MAX,
                value: self.flank_window as f64,
            }
            .into());
        }
        if !self.comparison_columns.consequence && !self.comparison_columns.hgvsc && !self.comparison_columns.hgvsp {
            return Err(ConfigError::UnknownColumn("at least one of consequence/hgvsc/hgvsp must be enabled".to_string()).into());
        }
        Ok(())
    }

    /// Parses a comma-separated `--columns` flag value (e.g.
    /// `consequence,hgvsc`) into a `ComparisonColumns`, rejecting unknown
    /// names (spec.md 7: "unknown column requested for comparison").
    pub fn parse_columns(spec: &str) -> Result<ComparisonColumns, ConfigError> {
        let mut columns = ComparisonColumns {
            consequence: false,
            hgvsc: false,
            hgvsp: false,
        };
        for raw in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match raw {
                "consequence" => columns.consequence = true,
                "hgvsc" => columns.hgvsc = true,
                "hgvsp" => columns.hgvsp = true,
                other => return Err(ConfigError::UnknownColumn(other.to_string())),
            }
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn negative_flank_window_is_rejected() {
        let config = Config {
            flank_window: -1,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn disabling_every_comparison_column_is_rejected() {
        let config = Config {
            comparison_columns: ComparisonColumns {
                consequence: false,
                hgvsc: false,
                hgvsp: false,
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_columns_accepts_a_comma_separated_subset() {
        let columns = Config::parse_columns("consequence,hgvsp").unwrap();
        assert!(columns.consequence);
        assert!(!columns.hgvsc);
        assert!(columns.hgvsp);
    }

    #[test]
    fn parse_columns_rejects_unknown_names() {
        assert!(Config::parse_columns("consequence,bogus").is_err());
    }
}
