use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides `telegram.bot_token`.
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Destination channel: a numeric chat id or an `@username`.
    pub channel: String,
    /// When set, only messages from this chat are processed; everything
    /// else is forwarded here verbatim.
    #[serde(default)]
    pub forward_to: Option<i64>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Where composed articles are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Id(i64),
    Username(String),
}

impl TelegramConfig {
    pub fn channel(&self) -> Channel {
        let channel = self.channel.trim();
        match channel.parse::<i64>() {
            Ok(id) => Channel::Id(id),
            Err(_) if channel.starts_with('@') => Channel::Username(channel.to_string()),
            Err(_) => Channel::Username(format!("@{}", channel)),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&content)?;

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.telegram.bot_token = token;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without validating it.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!(
                "telegram.bot_token is required (or set {} in the environment)",
                TOKEN_ENV
            );
        }
        if self.telegram.channel.trim().is_empty() {
            anyhow::bail!("telegram.channel is required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Tests touching TELEGRAM_BOT_TOKEN must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "wxrelay-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            channel = "@articles"
            "#,
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.telegram.forward_to, None);
        assert!(!config.telegram.dry_run);
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            channel = "-1001234"
            forward_to = 999
            dry_run = true
            "#,
        )
        .unwrap();

        assert_eq!(config.telegram.forward_to, Some(999));
        assert!(config.telegram.dry_run);
        assert_eq!(config.telegram.channel(), Channel::Id(-1001234));
    }

    #[test]
    fn test_missing_channel_rejected() {
        let result = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_token_rejected() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = " "
            channel = "@articles"
            "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bot_token"));
    }

    #[test]
    fn test_empty_channel_rejected() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            channel = ""
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_channel_username_gets_at_prefix() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "t"
            channel = "articles"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.telegram.channel(),
            Channel::Username("@articles".to_string())
        );
    }

    #[test]
    fn test_load_env_token_overrides_empty_file_token() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config(
            "env-override",
            r#"
            [telegram]
            bot_token = ""
            channel = "@articles"
            "#,
        );

        std::env::set_var(TOKEN_ENV, "456:from-env");
        let result = Config::load(&path);
        std::env::remove_var(TOKEN_ENV);
        std::fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.telegram.bot_token, "456:from-env");
    }

    #[test]
    fn test_load_blank_env_token_keeps_file_token() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config(
            "env-blank",
            r#"
            [telegram]
            bot_token = "123:from-file"
            channel = "@articles"
            "#,
        );

        std::env::set_var(TOKEN_ENV, "   ");
        let result = Config::load(&path);
        std::env::remove_var(TOKEN_ENV);
        std::fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.telegram.bot_token, "123:from-file");
    }

    #[test]
    fn test_load_empty_token_without_env_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_config(
            "no-token",
            r#"
            [telegram]
            channel = "@articles"
            "#,
        );

        std::env::remove_var(TOKEN_ENV);
        let result = Config::load(&path);
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("bot_token"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("wxrelay-does-not-exist.toml");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
