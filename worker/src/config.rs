use bingo_core::{
    BingoRules, DEV_SALT, DeckOptions, IdentityFallback, IdentityResolver, TileDeck,
};
use chrono::{DateTime, NaiveDate, TimeDelta};
use thiserror::Error;

const MAX_OFFSET_MINUTES: i64 = 14 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key}: {reason}")]
    InvalidVar { key: &'static str, reason: String },
}

/// Per-deployment settings read from the worker environment.
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    pub resolver: IdentityResolver,
    pub deck: TileDeck,
    pub rules: BingoRules,
    pub utc_offset_minutes: i64,
    pub log_level: log::Level,
}

impl WorkerConfig {
    /// Reads settings through `lookup`, which returns secrets and plain vars alike.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let salt = lookup("BINGO_SALT").unwrap_or_else(|| DEV_SALT.to_string());

        let fallback = match lookup("IDENTITY_FALLBACK") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::InvalidVar {
                key: "IDENTITY_FALLBACK",
                reason,
            })?,
            None => IdentityFallback::default(),
        };

        let center_is_fixed = match lookup("CENTER_IS_FIXED") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidVar {
                key: "CENTER_IS_FIXED",
                reason: format!("expected true or false, got {raw:?}"),
            })?,
            None => BingoRules::default().center_is_fixed,
        };

        let images: Vec<String> = match lookup("TILE_IMAGES") {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| ConfigError::InvalidVar {
                key: "TILE_IMAGES",
                reason: err.to_string(),
            })?,
            None => Vec::new(),
        };
        let mut options = DeckOptions::default();
        if let Some(base) = lookup("IMAGE_BASE") {
            options.image_base = base;
        }
        let deck = TileDeck::from_image_files(images, &options);

        let utc_offset_minutes = match lookup("UTC_OFFSET_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|offset| offset.abs() <= MAX_OFFSET_MINUTES)
                .ok_or_else(|| ConfigError::InvalidVar {
                    key: "UTC_OFFSET_MINUTES",
                    reason: format!("expected minutes within ±{MAX_OFFSET_MINUTES}, got {raw:?}"),
                })?,
            None => 0,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                key: "LOG_LEVEL",
                reason: format!("unknown level {raw:?}"),
            })?,
            None => log::Level::Info,
        };

        Ok(Self {
            resolver: IdentityResolver::new(salt, fallback),
            deck,
            rules: BingoRules::new(center_is_fixed),
            utc_offset_minutes,
            log_level,
        })
    }

    /// Calendar date at the booth for a UNIX timestamp in milliseconds.
    pub fn today(&self, now_ms: i64) -> NaiveDate {
        let now = DateTime::from_timestamp_millis(now_ms).unwrap_or_default();
        (now + TimeDelta::minutes(self.utc_offset_minutes)).date_naive()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
