use std::str::FromStr;

use crate::errors::{NoteSearchError, NoteSearchResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MIN_BATCH: usize = 5;
const DEFAULT_MAX_PAGES: u32 = 100;
const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub proxy_url: Option<String>,
    pub timeout_secs: u64,
    pub min_batch_size: usize,
    pub max_pages: u32,
    pub utc_offset_hours: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_batch_size: DEFAULT_MIN_BATCH,
            max_pages: DEFAULT_MAX_PAGES,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> NoteSearchResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> NoteSearchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let proxy_url = lookup("NOTESEARCH_PROXY_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let timeout_secs = parse_var(&lookup, "NOTESEARCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let min_batch_size = parse_var(&lookup, "NOTESEARCH_MIN_BATCH", DEFAULT_MIN_BATCH)?;
        let max_pages = parse_var(&lookup, "NOTESEARCH_MAX_PAGES", DEFAULT_MAX_PAGES)?;
        let utc_offset_hours =
            parse_var(&lookup, "NOTESEARCH_UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS)?;

        if max_pages == 0 {
            return Err(NoteSearchError::Config(
                "NOTESEARCH_MAX_PAGES must be at least 1".to_string(),
            ));
        }

        if !(-23..=23).contains(&utc_offset_hours) {
            return Err(NoteSearchError::Config(format!(
                "NOTESEARCH_UTC_OFFSET_HOURS out of range: {}",
                utc_offset_hours
            )));
        }

        Ok(Self {
            proxy_url,
            timeout_secs,
            min_batch_size,
            max_pages,
            utc_offset_hours,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> NoteSearchResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            NoteSearchError::Config(format!("Invalid value for {}: {}", key, raw))
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.min_batch_size, 5);
        assert_eq!(config.max_pages, 100);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("NOTESEARCH_PROXY_URL", "https://corsproxy.io/?"),
            ("NOTESEARCH_TIMEOUT_SECS", "10"),
            ("NOTESEARCH_MIN_BATCH", "20"),
            ("NOTESEARCH_MAX_PAGES", "3"),
            ("NOTESEARCH_UTC_OFFSET_HOURS", "-5"),
        ]))
        .unwrap();

        assert_eq!(config.proxy_url.as_deref(), Some("https://corsproxy.io/?"));
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.min_batch_size, 20);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.utc_offset_hours, -5);
    }

    #[test]
    fn test_blank_proxy_means_direct() {
        let config = Config::from_lookup(lookup_from(&[("NOTESEARCH_PROXY_URL", "  ")])).unwrap();
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("NOTESEARCH_MAX_PAGES", "lots")])).unwrap_err();
        assert!(matches!(err, NoteSearchError::Config(_)));
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let err = Config::from_lookup(lookup_from(&[("NOTESEARCH_MAX_PAGES", "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let result = Config::from_lookup(lookup_from(&[("NOTESEARCH_UTC_OFFSET_HOURS", "30")]));
        assert!(result.is_err());
    }
}
