//! Runtime settings layered from defaults and `MEMPOOL_*` environment variables.

use std::path::PathBuf;

use serde_derive::Deserialize;

use crate::error::Result;
use crate::pool::DEFAULT_CAPACITY;

/// Prefix of the environment variables read by [`Settings::new`].
pub const ENV_PREFIX: &str = "MEMPOOL";

/// Input and output paths plus the pool bound.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Maximum number of transactions kept. Negative values fail to load.
    pub capacity: usize,
    /// File transactions are read from.
    pub input: PathBuf,
    /// File prioritized transactions are written to.
    pub output: PathBuf,
}

impl Settings {
    /// Loads settings from `MEMPOOL_*` environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if a variable does not
    /// fit its field.
    pub fn new() -> Result<Self> {
        Self::from_env(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("capacity", DEFAULT_CAPACITY as i64)?
            .set_default("input", "transactions.txt")?
            .set_default("output", "prioritized-transactions.txt")?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn load(vars: &[(&str, &str)]) -> Result<Settings> {
        let source = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_env(config::Environment::with_prefix(ENV_PREFIX).source(Some(source)))
    }

    #[test]
    fn defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(
            settings,
            Settings {
                capacity: 5000,
                input: "transactions.txt".into(),
                output: "prioritized-transactions.txt".into(),
            }
        );
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = load(&[
            ("MEMPOOL_CAPACITY", "10"),
            ("MEMPOOL_INPUT", "in.txt"),
            ("MEMPOOL_OUTPUT", "out.txt"),
        ])
        .unwrap();

        assert_eq!(settings.capacity, 10);
        assert_eq!(settings.input, PathBuf::from("in.txt"));
        assert_eq!(settings.output, PathBuf::from("out.txt"));
    }

    #[test]
    fn zero_capacity_is_allowed() {
        assert_eq!(load(&[("MEMPOOL_CAPACITY", "0")]).unwrap().capacity, 0);
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let err = load(&[("MEMPOOL_CAPACITY", "-5")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn non_numeric_capacity_is_rejected() {
        let err = load(&[("MEMPOOL_CAPACITY", "lots")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
