//! Runtime configuration, read from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ITEMS_DATA_FILE` | `data/items.json` |
//! | `ITEMS_BIND_ADDR` | `0.0.0.0:8000` |
//! | `ITEMS_CHANNEL_CAPACITY` | `32` |
//!
//! Unset, empty or unparsable values fall back to the default.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "data/items.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The JSON file holding every item.
    pub data_file: PathBuf,
    pub bind_addr: String,
    /// Capacity of the repository actor's request channel.
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let text = |name: &str, default: &str| {
            var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let channel_capacity = var("ITEMS_CHANNEL_CAPACITY")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_CHANNEL_CAPACITY);

        Self {
            data_file: PathBuf::from(text("ITEMS_DATA_FILE", DEFAULT_DATA_FILE)),
            bind_addr: text("ITEMS_BIND_ADDR", DEFAULT_BIND_ADDR),
            channel_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config(&[]), Config::default());
    }

    #[test]
    fn test_values_are_read() {
        let cfg = config(&[
            ("ITEMS_DATA_FILE", "/tmp/catalog.json"),
            ("ITEMS_BIND_ADDR", "127.0.0.1:9000"),
            ("ITEMS_CHANNEL_CAPACITY", "8"),
        ]);
        assert_eq!(cfg.data_file, PathBuf::from("/tmp/catalog.json"));
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.channel_capacity, 8);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = config(&[
            ("ITEMS_DATA_FILE", "   "),
            ("ITEMS_CHANNEL_CAPACITY", "lots"),
        ]);
        assert_eq!(cfg.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(cfg.channel_capacity, DEFAULT_CHANNEL_CAPACITY);

        let cfg = config(&[("ITEMS_CHANNEL_CAPACITY", "0")]);
        assert_eq!(cfg.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }
}
