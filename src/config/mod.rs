//! # Configuration Management Module
//!
//! Session tunables for Crypto Realm, read from a TOML file.
//!
//! ## Configuration Structure
//!
//! - [`SessionConfig`] - random seed, player health and opening balance
//! - [`BattleConfig`] - damage offsets, defend multiplier, pacing and log size
//! - [`CraftingConfig`] - craft pacing
//! - [`SeasonConfig`] - season start date and length
//! - [`LoggingConfig`] - log level and optional file sink
//!
//! ## Usage
//!
//! ```rust,no_run
//! use crypto_realm::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml").await?;
//!     let config = Config::load("config.toml").await?;
//!     let rules = config.battle_rules()?;
//!     println!("PvE offset: {}..={}", rules.pve_offset.low, rules.pve_offset.high);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [session]
//! seed = 42
//! player_max_hp = 100
//! starting_tokens = 0
//!
//! [battle]
//! pve_offset = { low = -3, high = 4 }
//! pvp_offset = { low = -4, high = 5 }
//! defend_multiplier = 1.5
//! opponent_delay_ms = 1000
//! log_capacity = 9
//! wager_options = [50, 100, 250, 500]
//!
//! [season]
//! start = "2026-02-01"
//! length_days = 30
//! ```
//!
//! Every section is optional; missing values take the defaults above.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::realm::battle::{BattleRules, OffsetRange};
use crate::realm::pacing::Pacing;
use crate::realm::season::SeasonClock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub battle: BattleConfig,
    #[serde(default)]
    pub crafting: CraftingConfig,
    #[serde(default)]
    pub season: SeasonConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed seed for reproducible sessions. Unset draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub player_max_hp: u32,
    pub starting_tokens: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_max_hp: 100,
            starting_tokens: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub pve_offset: OffsetRange,
    pub pvp_offset: OffsetRange,
    pub defend_multiplier: f64,
    /// Presentation delay before the opponent replies.
    pub opponent_delay_ms: u64,
    pub log_capacity: usize,
    /// Wagers offered in the arena.
    pub wager_options: Vec<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            pve_offset: OffsetRange::new(-3, 4),
            pvp_offset: OffsetRange::new(-4, 5),
            defend_multiplier: 1.5,
            opponent_delay_ms: 1000,
            log_capacity: 9,
            wager_options: vec![50, 100, 250, 500],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftingConfig {
    pub craft_delay_ms: u64,
}

impl Default for CraftingConfig {
    fn default() -> Self {
        Self { craft_delay_ms: 1500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    /// First day of season 1, `YYYY-MM-DD`.
    pub start: String,
    pub length_days: u32,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            start: "2026-02-01".to_string(),
            length_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.battle_rules()?;
        config.season_clock()?;
        if config.battle.wager_options.is_empty() || config.battle.wager_options.contains(&0) {
            return Err(anyhow!("battle.wager_options must list at least one positive wager"));
        }
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Battle engine rules. Offset ranges must satisfy `low <= high`.
    pub fn battle_rules(&self) -> Result<BattleRules> {
        for (name, range) in [("pve_offset", self.battle.pve_offset), ("pvp_offset", self.battle.pvp_offset)] {
            if range.low > range.high {
                return Err(anyhow!(
                    "battle.{}: low ({}) must not exceed high ({})",
                    name,
                    range.low,
                    range.high
                ));
            }
        }
        if !(self.battle.defend_multiplier.is_finite() && self.battle.defend_multiplier >= 1.0) {
            return Err(anyhow!(
                "battle.defend_multiplier must be at least 1.0 (got {})",
                self.battle.defend_multiplier
            ));
        }
        if self.session.player_max_hp == 0 {
            return Err(anyhow!("session.player_max_hp must be positive"));
        }
        Ok(BattleRules {
            pve_offset: self.battle.pve_offset,
            pvp_offset: self.battle.pvp_offset,
            defend_multiplier: self.battle.defend_multiplier,
            log_capacity: self.battle.log_capacity.max(1),
            player_max_hp: self.session.player_max_hp,
        })
    }

    /// Arena wagers are limited to `battle.wager_options`.
    pub fn check_wager(&self, wager: u64) -> Result<()> {
        if self.battle.wager_options.contains(&wager) {
            Ok(())
        } else {
            Err(anyhow!(
                "wager {} is not offered (choose one of {:?})",
                wager,
                self.battle.wager_options
            ))
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing::from_millis(self.battle.opponent_delay_ms, self.crafting.craft_delay_ms)
    }

    pub fn season_clock(&self) -> Result<SeasonClock> {
        let start = NaiveDate::parse_from_str(&self.season.start, "%Y-%m-%d")
            .map_err(|e| anyhow!("season.start '{}' is not a YYYY-MM-DD date: {}", self.season.start, e))?;
        if self.season.length_days == 0 {
            return Err(anyhow!("season.length_days must be positive"));
        }
        Ok(SeasonClock::new(start, self.season.length_days))
    }
}
