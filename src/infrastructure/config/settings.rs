//! Application configuration loading and validation.
//!
//! [`Config`] is read from an optional TOML file, then overlaid with
//! environment variables. The environment always wins, so a deployment can
//! run on variables alone without any file.
//!
//! # Example
//!
//! ```no_run
//! use jobwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::alert::AlertConfig;
use super::env::EnvOverlay;
use super::listing::ListingConfig;
use super::logging::LoggingConfig;
use super::pool::PoolConfig;
use super::server::ServerConfig;
use super::stats::StatsConfig;
use super::telegram::TelegramConfig;
use crate::error::{ConfigError, Result};

/// Longest supported reset interval (one year).
const MAX_RESET_SECS: u64 = 366 * 86_400;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream listing, proxies and pagination limits.
    #[serde(default)]
    pub listing: ListingConfig,

    /// Player bounds, publish threshold and the downstream aggregator.
    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub alerts: AlertConfig,

    /// Detection statistics, history bound and reset cadence.
    #[serde(default)]
    pub stats: StatsConfig,

    /// Telegram snapshot and command bot.
    ///
    /// The token is loaded from `BOT_TOKEN` only.
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Parse configuration from TOML content, overlay the process
    /// environment, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an environment override does
    /// not parse, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::from_sources(content, |key| std::env::var(key).ok())
    }

    /// Load configuration from a TOML file. A missing file is treated as
    /// empty so the environment alone can configure the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if parsing
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(ConfigError::ReadFile(e).into()),
        };
        Self::parse_toml(&content)
    }

    /// Parse, overlay the variables resolved by `lookup`, and validate.
    ///
    /// # Errors
    ///
    /// Same as [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn from_sources<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_with(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables onto the parsed file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the variable when a
    /// numeric override does not parse.
    #[allow(clippy::result_large_err)]
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvOverlay::new(lookup);

        env.set_string("GAME_ID", &mut self.listing.game_id);
        env.set_string("LISTING_BASE_URL", &mut self.listing.base_url);
        env.set_parsed("REQUEST_TIMEOUT", &mut self.listing.request_timeout_secs)?;
        env.set_parsed("MAX_PAGES_PER_CYCLE", &mut self.listing.max_pages_per_cycle)?;
        if let Some(list) = env.get("PROXIES") {
            self.listing.proxies = list
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
        }

        env.set_opt_string("MAIN_API_URL", &mut self.pool.target_api);
        env.set_parsed("SEND_INTERVAL", &mut self.pool.send_interval_secs)?;
        env.set_parsed("SEND_MIN_SERVERS", &mut self.pool.send_min_servers)?;
        env.set_parsed("MIN_PLAYERS", &mut self.pool.min_players)?;
        env.set_parsed("MAX_PLAYERS", &mut self.pool.max_players)?;
        env.set_string("POOL_FILE", &mut self.pool.pool_file);

        env.set_opt_string("WEBHOOK_A1", &mut self.alerts.webhook_a1);
        env.set_opt_string("WEBHOOK_A2", &mut self.alerts.webhook_a2);
        env.set_opt_string("WEBHOOK_B", &mut self.alerts.webhook_b);
        env.set_opt_string("WEBHOOK_C", &mut self.alerts.webhook_c);
        env.set_opt_string("PLACE_ID", &mut self.alerts.place_id);

        env.set_string("CACHE_FILE", &mut self.stats.cache_file);
        env.set_parsed("MAX_HISTORY", &mut self.stats.max_history)?;
        env.set_parsed("RESET_INTERVAL", &mut self.stats.reset_interval_secs)?;

        // Never read from the file.
        self.telegram.bot_token = env.get("BOT_TOKEN");
        env.set_opt_parsed("STATS_CHAT_ID", &mut self.telegram.chat_id)?;

        env.set_parsed("PORT", &mut self.server.port)?;
        Ok(())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.listing.game_id.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "GAME_ID" }.into());
        }
        check_url("LISTING_BASE_URL", &self.listing.base_url)?;
        if self.listing.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "REQUEST_TIMEOUT",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.listing.max_pages_per_cycle == 0 {
            return Err(ConfigError::InvalidValue {
                field: "MAX_PAGES_PER_CYCLE",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.listing.retries_per_proxy == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retries_per_proxy",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if let Some(target_api) = self.pool.target_api.as_deref() {
            check_url("MAIN_API_URL", target_api)?;
        }
        if self.pool.publish_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "publish_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.pool.send_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "SEND_INTERVAL",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.pool.min_players > self.pool.max_players {
            return Err(ConfigError::InvalidValue {
                field: "MIN_PLAYERS",
                reason: format!(
                    "must be <= MAX_PLAYERS ({} > {})",
                    self.pool.min_players, self.pool.max_players
                ),
            }
            .into());
        }

        for (field, url) in self.alerts.urls() {
            if let Some(url) = url {
                check_url(field, url)?;
            }
        }
        if self.alerts.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "alerts.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.stats.max_history == 0 {
            return Err(ConfigError::InvalidValue {
                field: "MAX_HISTORY",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.stats.reset_interval_secs == 0 || self.stats.reset_interval_secs > MAX_RESET_SECS {
            return Err(ConfigError::InvalidValue {
                field: "RESET_INTERVAL",
                reason: format!("must be between 1 and {MAX_RESET_SECS} seconds"),
            }
            .into());
        }
        if self.stats.reset_check_secs == 0 || self.stats.snapshot_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stats",
                reason: "check and snapshot intervals must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Place id stamped on alerts; falls back to the listing game id.
    #[must_use]
    pub fn place_id(&self) -> &str {
        self.alerts
            .place_id
            .as_deref()
            .unwrap_or(&self.listing.game_id)
    }

    /// Downstream aggregator URL. Without one the pool is kept locally only.
    #[must_use]
    pub fn target_api(&self) -> Option<&str> {
        self.pool.target_api.as_deref()
    }

    /// Human-readable summary with every secret redacted.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let configured = |url: &Option<String>| {
            let state = if url.is_some() { "set" } else { "unset" };
            state.to_string()
        };
        vec![
            ("game_id", self.listing.game_id.clone()),
            ("place_id", self.place_id().to_string()),
            ("listing", self.listing.base_url.clone()),
            ("proxies", self.listing.proxies.len().to_string()),
            (
                "target_api",
                self.target_api()
                    .map_or_else(|| "unset".to_string(), redact_url),
            ),
            (
                "players",
                format!("{}..={}", self.pool.min_players, self.pool.max_players),
            ),
            ("send_interval_secs", self.pool.send_interval_secs.to_string()),
            ("send_min_servers", self.pool.send_min_servers.to_string()),
            ("max_pages_per_cycle", self.listing.max_pages_per_cycle.to_string()),
            ("webhook_a1", configured(&self.alerts.webhook_a1)),
            ("webhook_a2", configured(&self.alerts.webhook_a2)),
            ("webhook_b", configured(&self.alerts.webhook_b)),
            ("webhook_c", configured(&self.alerts.webhook_c)),
            (
                "telegram",
                if self.telegram.credentials().is_some() {
                    "enabled"
                } else {
                    "disabled"
                }
                .to_string(),
            ),
            ("pool_file", self.pool.pool_file.clone()),
            ("cache_file", self.stats.cache_file.clone()),
            ("listen", self.server.socket_addr().to_string()),
        ]
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn check_url(field: &'static str, value: &str) -> Result<()> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    Ok(())
}

fn redact_url(value: &str) -> String {
    match Url::parse(value) {
        Ok(url) => match url.host_str() {
            Some(host) => format!("{}://{host}{}", url.scheme(), url.path()),
            None => "<invalid>".to_string(),
        },
        Err(_) => "<invalid>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const TARGET: (&str, &str) = ("MAIN_API_URL", "https://aggregator.test/ingest");

    #[test]
    fn defaults_apply_with_only_target_set() {
        let config = Config::from_sources("", env(&[TARGET])).unwrap();
        assert_eq!(config.listing.game_id, "109983668079237");
        assert_eq!(config.place_id(), "109983668079237");
        assert_eq!(config.pool.send_interval_secs, 30);
        assert_eq!(config.pool.send_min_servers, 1);
        assert_eq!(config.listing.max_pages_per_cycle, 10);
        assert_eq!(config.stats.max_history, 50);
        assert_eq!(config.stats.reset_interval_secs, 86_400);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.target_api(), Some("https://aggregator.test/ingest"));
    }

    #[test]
    fn missing_target_api_still_loads() {
        let config = Config::from_sources(
            "",
            env(&[
                ("WEBHOOK_C", "https://hooks.test/c"),
                ("BOT_TOKEN", "secret"),
                ("STATS_CHAT_ID", "-100"),
            ]),
        )
        .unwrap();
        assert_eq!(config.target_api(), None);
        assert!(config.telegram.credentials().is_some());
        let summary = config.summary();
        assert!(summary.contains(&("target_api", "unset".to_string())));
    }

    #[test]
    fn zero_outbound_timeouts_are_rejected() {
        let err = Config::from_sources("[alerts]\ntimeout_secs = 0\n", env(&[TARGET])).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "alerts.timeout_secs",
                ..
            })
        ));

        let err =
            Config::from_sources("[pool]\npublish_timeout_secs = 0\n", env(&[TARGET])).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "publish_timeout_secs",
                ..
            })
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let toml = r#"
            [listing]
            game_id = "1"

            [pool]
            target_api = "https://file.test/"
            min_players = 2
        "#;
        let config = Config::from_sources(
            toml,
            env(&[
                ("GAME_ID", "42"),
                ("MIN_PLAYERS", "3"),
                ("MAX_PLAYERS", "7"),
                ("PROXIES", "1.2.3.4:80, ,5.6.7.8:81:u:p"),
                ("BOT_TOKEN", "secret"),
                ("STATS_CHAT_ID", "-100123"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listing.game_id, "42");
        assert_eq!(config.target_api(), Some("https://file.test/"));
        assert_eq!(config.pool.min_players, 3);
        assert_eq!(config.pool.max_players, 7);
        assert_eq!(config.listing.proxies.len(), 2);
        assert_eq!(config.telegram.credentials(), Some(("secret", -100_123)));
    }

    #[test]
    fn inverted_player_bounds_are_rejected() {
        let err = Config::from_sources(
            "",
            env(&[TARGET, ("MIN_PLAYERS", "10"), ("MAX_PLAYERS", "5")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "MIN_PLAYERS",
                ..
            })
        ));
    }

    #[test]
    fn unparseable_number_names_variable() {
        let err = Config::from_sources("", env(&[TARGET, ("SEND_INTERVAL", "soon")])).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "SEND_INTERVAL",
                ..
            })
        ));
    }

    #[test]
    fn invalid_webhook_url_is_rejected() {
        let err =
            Config::from_sources("", env(&[TARGET, ("WEBHOOK_B", "not a url")])).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "WEBHOOK_B",
                ..
            })
        ));
    }

    #[test]
    fn bot_token_is_ignored_in_file() {
        let toml = r#"
            [telegram]
            chat_id = 5
            bot_token = "from-file"
        "#;
        let config = Config::from_sources(toml, env(&[TARGET])).unwrap();
        assert!(config.telegram.bot_token.is_none());
        assert!(config.telegram.credentials().is_none());
    }

    #[test]
    fn summary_hides_secrets() {
        let config = Config::from_sources(
            "",
            env(&[
                ("MAIN_API_URL", "https://user:pw@aggregator.test/ingest?key=abc"),
                ("WEBHOOK_A1", "https://discord.test/api/webhooks/1/token"),
                ("BOT_TOKEN", "secret"),
            ]),
        )
        .unwrap();
        let rendered: Vec<String> = config
            .summary()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        let rendered = rendered.join("\n");
        assert!(rendered.contains("target_api=https://aggregator.test/ingest"));
        assert!(rendered.contains("webhook_a1=set"));
        assert!(!rendered.contains("pw"));
        assert!(!rendered.contains("token"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pool]\ntarget_api = \"https://file.test/\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert!(config.pool.target_api.is_some());
    }
}
