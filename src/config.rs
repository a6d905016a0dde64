//! Session configuration from environment variables.
//!
//! Every setting has a default; a set-but-malformed variable is a
//! configuration error rather than a silent fallback.

use std::env;
use std::path::PathBuf;

use crate::errors::CalcError;

/// Runtime configuration for one calculator session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the append-only log file (`TALLY_LOG_DIR`).
    pub log_dir: PathBuf,
    /// Directory for the persisted history table (`TALLY_HISTORY_DIR`).
    pub history_dir: PathBuf,
    /// Cap on retained history entries (`TALLY_MAX_HISTORY_SIZE`).
    pub max_history_size: usize,
    /// Whether an auto-save observer is registered (`TALLY_AUTO_SAVE`).
    pub auto_save: bool,
    /// Decimal places when displaying results (`TALLY_PRECISION`).
    pub precision: usize,
    /// Largest accepted operand magnitude (`TALLY_MAX_INPUT_VALUE`).
    pub max_input_value: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            history_dir: PathBuf::from("./history"),
            max_history_size: 50,
            auto_save: true,
            precision: 2,
            max_input_value: 1e6,
        }
    }
}

impl Config {
    /// Reads configuration from `TALLY_*` environment variables, falling
    /// back to defaults, and validates the result.
    pub fn from_env() -> Result<Self, CalcError> {
        let defaults = Self::default();
        let config = Self {
            log_dir: env::var("TALLY_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            history_dir: env::var("TALLY_HISTORY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_dir),
            max_history_size: read_var("TALLY_MAX_HISTORY_SIZE", parse_usize)?
                .unwrap_or(defaults.max_history_size),
            auto_save: read_var("TALLY_AUTO_SAVE", parse_bool)?.unwrap_or(defaults.auto_save),
            precision: read_var("TALLY_PRECISION", parse_usize)?.unwrap_or(defaults.precision),
            max_input_value: read_var("TALLY_MAX_INPUT_VALUE", parse_f64)?
                .unwrap_or(defaults.max_input_value),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        if self.max_history_size < 1 {
            return Err(CalcError::config("TALLY_MAX_HISTORY_SIZE must be at least 1"));
        }
        if !(self.max_input_value > 0.0) {
            return Err(CalcError::config(
                "TALLY_MAX_INPUT_VALUE must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Path of the persisted history table inside `history_dir`.
    pub fn history_file(&self) -> PathBuf {
        self.history_dir.join("tally_history.csv")
    }

    /// Path of the append-only log inside `log_dir`.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("tally.log")
    }
}

fn read_var<T>(
    name: &'static str,
    parse: fn(&'static str, &str) -> Result<T, CalcError>,
) -> Result<Option<T>, CalcError> {
    match env::var(name) {
        Ok(raw) => parse(name, raw.trim()).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_usize(name: &'static str, raw: &str) -> Result<usize, CalcError> {
    raw.parse()
        .map_err(|_| CalcError::config(format!("{} must be a non-negative integer, got '{}'", name, raw)))
}

fn parse_f64(name: &'static str, raw: &str) -> Result<f64, CalcError> {
    raw.parse()
        .map_err(|_| CalcError::config(format!("{} must be numeric, got '{}'", name, raw)))
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, CalcError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(CalcError::config(format!(
            "{} must be true or false, got '{}'",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        assert!(parse_bool("TALLY_AUTO_SAVE", "TRUE").unwrap());
        assert!(parse_bool("TALLY_AUTO_SAVE", "1").unwrap());
        assert!(!parse_bool("TALLY_AUTO_SAVE", "no").unwrap());
        assert!(parse_bool("TALLY_AUTO_SAVE", "sometimes").is_err());
    }

    #[test]
    fn malformed_numbers_are_config_errors() {
        assert!(matches!(
            parse_usize("TALLY_PRECISION", "two"),
            Err(CalcError::Config { .. })
        ));
        assert!(matches!(
            parse_f64("TALLY_MAX_INPUT_VALUE", "lots"),
            Err(CalcError::Config { .. })
        ));
    }

    #[test]
    fn validation_rejects_degenerate_limits() {
        let mut config = Config::default();
        config.max_history_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.max_input_value = 0.0;
        assert!(config.validate().is_err());
    }
}
