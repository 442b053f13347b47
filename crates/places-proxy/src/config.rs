use place_cache::CacheSettings;
use places_api::PlacesClient;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    /// Ask upstream for the canonical field set on every miss, not only the requested fields
    pub fetch_full_record: bool,
    pub cache: CacheSettings,
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from environment variables, filling gaps from a
    /// `.env` file in the working directory or its parents
    pub fn from_env() -> Self {
        let file: HashMap<String, String> = dotenvy::dotenv_iter()
            .map(|entries| entries.filter_map(|entry| entry.ok()).collect())
            .unwrap_or_default();

        Self::layered(|name| env::var(name).ok(), &file)
    }

    /// Process variables win over `.env` entries
    fn layered(get: impl Fn(&str) -> Option<String>, file: &HashMap<String, String>) -> Self {
        Self::from_lookup(|name| get(name).or_else(|| file.get(name).cloned()))
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |name: &str| get(name).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = CacheSettings::default();

        let port = get("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(3000);

        let upstream_base_url = get("UPSTREAM_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| PlacesClient::DEFAULT_BASE_URL.to_string());

        let upstream_timeout = parsed("UPSTREAM_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(PlacesClient::DEFAULT_TIMEOUT);

        let fetch_full_record = get("FETCH_FULL_RECORD")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let cache = CacheSettings {
            redis_url: get("REDIS_URL").filter(|s| !s.trim().is_empty()),
            probe_timeout: defaults.probe_timeout,
            op_timeout: parsed("CACHE_OP_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.op_timeout),
            redis_ttl: parsed("REDIS_TTL_SECS")
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
            memory_ttl: parsed("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.memory_ttl),
            memory_capacity: parsed("CACHE_MAX_ENTRIES").unwrap_or(defaults.memory_capacity),
        };

        let json_logs = get("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

        Self {
            port,
            upstream_base_url,
            upstream_timeout,
            fetch_full_record,
            cache,
            json_logs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_base_url, "https://maps.googleapis.com");
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert!(!config.fetch_full_record);
        assert!(config.cache.redis_url.is_none());
        assert_eq!(config.cache.memory_ttl, Duration::from_secs(30 * 24 * 60 * 60));
        assert_eq!(config.cache.probe_timeout, Duration::from_secs(5));
        assert!(config.cache.redis_ttl.is_none());
        assert!(!config.json_logs);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("REDIS_URL", "redis://cache:6379"),
            ("UPSTREAM_BASE_URL", "http://localhost:9000"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("CACHE_TTL_SECS", "60"),
            ("CACHE_MAX_ENTRIES", "500"),
            ("REDIS_TTL_SECS", "3600"),
            ("CACHE_OP_TIMEOUT_MS", "250"),
            ("FETCH_FULL_RECORD", "true"),
            ("LOG_FORMAT", "json"),
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.upstream_base_url, "http://localhost:9000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.cache.memory_ttl, Duration::from_secs(60));
        assert_eq!(config.cache.memory_capacity, 500);
        assert_eq!(config.cache.redis_ttl, Some(Duration::from_secs(3600)));
        assert_eq!(config.cache.op_timeout, Duration::from_millis(250));
        assert!(config.fetch_full_record);
        assert!(config.json_logs);
    }

    #[test]
    fn test_dotenv_entries_fill_unset_variables() {
        let dotenv = "# local overrides\nPORT=8081\nREDIS_URL=redis://from-file:6379\nLOG_FORMAT=\"json\"\n";
        let file: HashMap<String, String> = dotenvy::from_read_iter(dotenv.as_bytes())
            .map(|entry| entry.unwrap())
            .collect();

        let process: HashMap<&str, &str> = HashMap::from([("PORT", "9000")]);
        let config = Config::layered(|name| process.get(name).map(|v| v.to_string()), &file);

        assert_eq!(config.port, 9000);
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://from-file:6379"));
        assert!(config.json_logs);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("UPSTREAM_TIMEOUT_SECS", "soon"),
            ("REDIS_URL", "  "),
            ("REDIS_TTL_SECS", "0"),
        ]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert!(config.cache.redis_url.is_none());
        assert!(config.cache.redis_ttl.is_none());
    }
}
