use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::Coords;

pub const SEED_VAR: &str = "SNAKE_SEED";
pub const LOG_VAR: &str = "SNAKE_LOG";

/// Tunables for a run. Defaults reproduce the classic look: a snake that
/// moves every heartbeat through a field of a hundred spinning eggs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Milliseconds between frames, also the step fed to every timer
    pub heartbeat_ms: u64,
    /// Size of the egg pool
    pub egg_count: usize,
    /// Milliseconds between animation phases of an egg
    pub egg_period_ms: u64,
    /// Milliseconds between snake moves
    pub snake_period_ms: u64,
    pub snake_start: Coords,
    /// Seed for egg placement, random when absent
    pub seed: Option<u64>,
    /// Where to write the log, logging is off when absent
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            heartbeat_ms: 15,
            egg_count: 100,
            egg_period_ms: 250,
            snake_period_ms: 15,
            snake_start: (5, 5),
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup(SEED_VAR) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid {} value {:?}", SEED_VAR, raw))?,
            ),
            None => None,
        };

        let log_file = lookup(LOG_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            seed,
            log_file,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.heartbeat_ms, 15);
        assert_eq!(settings.egg_count, 100);
        assert_eq!(settings.egg_period_ms, 250);
        assert_eq!(settings.snake_period_ms, 15);
        assert_eq!(settings.snake_start, (5, 5));
    }

    #[test]
    fn test_no_vars() {
        let settings = Settings::from_vars(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_seed_and_log_file() {
        let settings = Settings::from_vars(|key| match key {
            SEED_VAR => Some(" 42 ".to_string()),
            LOG_VAR => Some("snake.log".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.log_file, Some(PathBuf::from("snake.log")));
    }

    #[test]
    fn test_bad_seed() {
        let err = Settings::from_vars(|key| match key {
            SEED_VAR => Some("banana".to_string()),
            _ => None,
        })
        .unwrap_err();

        assert!(err.to_string().contains(SEED_VAR));
    }

    #[test]
    fn test_empty_log_path_disables_logging() {
        let settings = Settings::from_vars(|key| match key {
            LOG_VAR => Some(String::new()),
            _ => None,
        })
        .unwrap();

        assert!(settings.log_file.is_none());
    }
}
