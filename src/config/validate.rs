use teloxide::types::ChatId;
use thiserror::Error;

use crate::fleet::engine::MAX_ROWS;

use super::schema::{Config, RemoteMode};

const MAX_CARD_HEIGHT_PX: u32 = 4_096;
const MAX_GAP_PX: u32 = 512;
const MAX_CARD_ASPECT: f64 = 10.0;
const MAX_VIEWPORT_PX: u32 = 16_384;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "inventory_path must not be empty".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }

        let url = self.prometheus.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "prometheus.url must start with http:// or https://".to_string(),
            ));
        }
        if self.prometheus.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "prometheus.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let layout = &self.layout;
        if !(1..=MAX_ROWS).contains(&layout.rows) {
            return Err(ConfigError::Validation(format!(
                "layout.rows must be between 1 and {}",
                MAX_ROWS
            )));
        }
        if layout.min_card_height == 0 {
            return Err(ConfigError::Validation(
                "layout.min_card_height must be greater than 0".to_string(),
            ));
        }
        if layout.min_card_height > layout.max_card_height {
            return Err(ConfigError::Validation(
                "layout.min_card_height must not exceed layout.max_card_height".to_string(),
            ));
        }
        if layout.max_card_height > MAX_CARD_HEIGHT_PX {
            return Err(ConfigError::Validation(format!(
                "layout.max_card_height must not exceed {}",
                MAX_CARD_HEIGHT_PX
            )));
        }
        validate_positive("layout.card_aspect", layout.card_aspect)?;
        if layout.card_aspect > MAX_CARD_ASPECT {
            return Err(ConfigError::Validation(format!(
                "layout.card_aspect must not exceed {}",
                MAX_CARD_ASPECT
            )));
        }
        if layout.base_gap > MAX_GAP_PX || layout.max_extra_gap > MAX_GAP_PX {
            return Err(ConfigError::Validation(format!(
                "layout.base_gap and layout.max_extra_gap must not exceed {}",
                MAX_GAP_PX
            )));
        }
        if layout.viewport_width == 0 || layout.viewport_height == 0 {
            return Err(ConfigError::Validation(
                "layout.viewport_width and layout.viewport_height must be greater than 0"
                    .to_string(),
            ));
        }
        if layout.viewport_width > MAX_VIEWPORT_PX || layout.viewport_height > MAX_VIEWPORT_PX {
            return Err(ConfigError::Validation(format!(
                "layout.viewport_width and layout.viewport_height must not exceed {}",
                MAX_VIEWPORT_PX
            )));
        }
        if !layout.sweep_speed_px_per_sec.is_finite() || layout.sweep_speed_px_per_sec < 0.0 {
            return Err(ConfigError::Validation(
                "layout.sweep_speed_px_per_sec must be a non-negative number".to_string(),
            ));
        }
        if layout.sweep_tick_ms == 0 {
            return Err(ConfigError::Validation(
                "layout.sweep_tick_ms must be greater than 0".to_string(),
            ));
        }

        match self.alerts.remote {
            RemoteMode::Webhook => {
                let has_url = self
                    .alerts
                    .webhook_url
                    .as_deref()
                    .is_some_and(|url| url.starts_with("http://") || url.starts_with("https://"));
                if !has_url {
                    return Err(ConfigError::Validation(
                        "alerts.webhook_url must be an http(s) URL when alerts.remote is webhook"
                            .to_string(),
                    ));
                }
            }
            RemoteMode::Telegram if self.telegram.is_none() => {
                return Err(ConfigError::Validation(
                    "[telegram] section is required when alerts.remote is telegram".to_string(),
                ));
            }
            RemoteMode::Telegram | RemoteMode::None => {}
        }
        if self.alerts.toast_lifetime_secs == 0 {
            return Err(ConfigError::Validation(
                "alerts.toast_lifetime_secs must be greater than 0".to_string(),
            ));
        }
        if self.alerts.toast_capacity == 0 {
            return Err(ConfigError::Validation(
                "alerts.toast_capacity must be greater than 0".to_string(),
            ));
        }

        if let Some(telegram) = &self.telegram {
            if telegram.bot_token.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "telegram.bot_token must not be empty".to_string(),
                ));
            }
            if telegram.owner_id == 0 {
                return Err(ConfigError::Validation(
                    "telegram.owner_id must be a positive integer".to_string(),
                ));
            }
        }

        if self.snapshot.enabled && self.snapshot.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "snapshot.path must not be empty when snapshot.enabled is true".to_string(),
            ));
        }
        Ok(())
    }

    pub fn owner_chat_id(&self) -> Result<ChatId, ConfigError> {
        let Some(telegram) = &self.telegram else {
            return Err(ConfigError::Validation(
                "[telegram] section is not configured".to_string(),
            ));
        };
        if telegram.owner_id == 0 {
            return Err(ConfigError::Validation(
                "telegram.owner_id must be a positive integer".to_string(),
            ));
        }

        let chat_id = i64::try_from(telegram.owner_id).map_err(|_| {
            ConfigError::Validation(
                "telegram.owner_id is too large to fit Telegram chat id".to_string(),
            )
        })?;
        Ok(ChatId(chat_id))
    }
}

fn validate_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a positive number",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ConfigError;
    use crate::config::Config;

    fn parse(raw: &str) -> Config {
        toml::from_str(raw).expect("config should parse")
    }

    fn rejection(raw: &str) -> String {
        match parse(raw).validate() {
            Err(ConfigError::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("");
        config.validate().expect("defaults are valid");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.layout.rows, 3);
        assert_eq!(config.layout.max_card_height, 155);
        assert!(config.telegram.is_none());
        assert!(config.owner_chat_id().is_err());
    }

    #[test]
    fn webhook_mode_needs_url() {
        let message = rejection("[alerts]\nremote = \"webhook\"\n");
        assert!(message.contains("webhook_url"));

        parse("[alerts]\nremote = \"webhook\"\nwebhook_url = \"http://alerts.local/api/alert\"\n")
            .validate()
            .expect("webhook with url is valid");
    }

    #[test]
    fn telegram_mode_needs_section() {
        let message = rejection("[alerts]\nremote = \"telegram\"\n");
        assert!(message.contains("[telegram]"));

        let config = parse(
            "[alerts]\nremote = \"telegram\"\n\n[telegram]\nbot_token = \"123:abc\"\nowner_id = 42\n",
        );
        config.validate().expect("telegram with section is valid");
        assert_eq!(config.owner_chat_id().expect("chat id").0, 42);
    }

    #[test]
    fn card_height_range_must_be_ordered() {
        let message = rejection("[layout]\nmin_card_height = 200\nmax_card_height = 100\n");
        assert!(message.contains("min_card_height"));
    }

    #[test]
    fn rows_out_of_range_are_rejected() {
        assert!(rejection("[layout]\nrows = 0\n").contains("layout.rows"));
        assert!(rejection("[layout]\nrows = 99\n").contains("layout.rows"));
    }

    #[test]
    fn oversized_layout_values_are_rejected() {
        assert!(rejection("[layout]\nbase_gap = 4294967295\n").contains("layout.base_gap"));
        assert!(rejection("[layout]\nmax_extra_gap = 100000\n").contains("layout.max_extra_gap"));
        assert!(rejection("[layout]\nmax_card_height = 100000\n").contains("layout.max_card_height"));
        assert!(rejection("[layout]\ncard_aspect = 1e9\n").contains("layout.card_aspect"));
        assert!(rejection("[layout]\nviewport_width = 4000000000\n").contains("layout.viewport_width"));
    }

    #[test]
    fn unknown_remote_mode_fails_to_parse() {
        assert!(toml::from_str::<Config>("[alerts]\nremote = \"pager\"\n").is_err());
    }
}
