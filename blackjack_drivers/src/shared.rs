use std::fs;
use std::path::{Path, PathBuf};

use blackjack_trainer::{Rule, RuleError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE_NAME: &str = ".blackjack_trainer.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rule: ConfigRule,
    pub trainer: ConfigTrainer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub reshuffle_below: usize,
    pub dealer_stands_on: u8,
    pub drill_length: usize,
    pub seed: Option<u64>,
}

impl Default for ConfigRule {
    fn default() -> Self {
        let rule = Rule::default();
        ConfigRule {
            number_of_decks: rule.number_of_decks,
            reshuffle_below: rule.reshuffle_below,
            dealer_stands_on: rule.dealer_stands_on,
            drill_length: rule.drill_length,
            seed: rule.seed,
        }
    }
}

impl TryFrom<ConfigRule> for Rule {
    type Error = RuleError;

    fn try_from(config_rule: ConfigRule) -> Result<Rule, Self::Error> {
        let rule = Rule {
            number_of_decks: config_rule.number_of_decks,
            reshuffle_below: config_rule.reshuffle_below,
            dealer_stands_on: config_rule.dealer_stands_on,
            drill_length: config_rule.drill_length,
            seed: config_rule.seed,
        };
        rule.validate()?;

        Ok(rule)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigTrainer {
    /// Default `env_logger` filter, used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ConfigTrainer {
    fn default() -> Self {
        ConfigTrainer {
            log_level: String::from("warn"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid rule in config: {0}")]
    Rule(#[from] RuleError),
    #[error("cannot find home directory")]
    NoHomeDir,
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(path: &Path) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_from_str(&file_content)
}

/// Parses YAML config content. An empty document gives the defaults.
pub fn parse_config_from_str(content: &str) -> Result<Config, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home_dir = home::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home_dir.join(DEFAULT_CONFIG_FILE_NAME))
}

/// Loads the config from an explicit path, which must exist, or else from the
/// default path, falling back to the defaults when that file is absent.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit_path {
        return parse_config_from_file(path);
    }

    let path = match default_config_path() {
        Ok(path) => path,
        Err(err) => {
            log::debug!("{}, using built-in defaults", err);
            return Ok(Config::default());
        }
    };
    if !path.is_file() {
        log::debug!("no config at {}, using built-in defaults", path.display());
        return Ok(Config::default());
    }
    parse_config_from_file(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_typical_config_rule() -> ConfigRule {
        ConfigRule {
            number_of_decks: 8,
            reshuffle_below: 20,
            dealer_stands_on: 17,
            drill_length: 30,
            seed: Some(99),
        }
    }

    #[test]
    fn can_convert_rule() {
        let config_rule = get_typical_config_rule();
        let converted_rule: Rule = config_rule.try_into().unwrap();
        assert_eq!(converted_rule.number_of_decks, 8);
        assert_eq!(converted_rule.reshuffle_below, 20);
        assert_eq!(converted_rule.drill_length, 30);
        assert_eq!(converted_rule.seed, Some(99));
    }

    #[test]
    fn should_return_error_when_converting_rule() {
        let mut config_rule = get_typical_config_rule();
        config_rule.number_of_decks = 0;
        let convert_result: Result<Rule, RuleError> = config_rule.try_into();
        assert_eq!(convert_result, Err(RuleError::NoDecks));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = parse_config_from_str("rule:\n  number_of_decks: 2\n").unwrap();
        assert_eq!(config.rule.number_of_decks, 2);
        assert_eq!(config.rule.reshuffle_below, 15);
        assert_eq!(config.rule.seed, None);
        assert_eq!(config.trainer.log_level, "warn");

        assert_eq!(parse_config_from_str("").unwrap(), Config::default());
    }

    #[test]
    fn full_config_parses() {
        let content = "\
rule:
  number_of_decks: 1
  reshuffle_below: 10
  dealer_stands_on: 17
  drill_length: 52
  seed: 5
trainer:
  log_level: debug
";
        let config = parse_config_from_str(content).unwrap();
        assert_eq!(config.rule.seed, Some(5));
        assert_eq!(config.trainer.log_level, "debug");
        let rule: Rule = config.rule.try_into().unwrap();
        assert_eq!(rule.drill_length, 52);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let result = parse_config_from_str("rule:\n  number_of_decks: many\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/blackjack_trainer.yml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
