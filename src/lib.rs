//! # Crypto Realm - session core for a fantasy RPG
//!
//! Crypto Realm simulates one player's game session in memory: character
//! creation, turn-based PvE and PvP battles, crafting, guilds, a player
//! marketplace, daily quests, achievements and a seasonal leaderboard.
//!
//! ## Features
//!
//! - **Battle Engine**: PvE and PvP duels with configurable damage offsets, a defend stance and stale-turn protection.
//! - **Progression**: looping XP curve with capped stat growth.
//! - **Economy**: token ledger, guild vaults with conservation on deposit, marketplace with seller proceeds.
//! - **Quests & Achievements**: event-driven progress, each reward paid once.
//! - **Deterministic Sessions**: every roll flows through an injectable [`realm::RealmRng`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crypto_realm::realm::GameStore;
//!
//! fn main() -> Result<(), crypto_realm::realm::RealmError> {
//!     let mut store = GameStore::seeded(42);
//!     store.create_character("Aria", "warrior")?;
//!     store.start_battle("forest_wolf")?;
//!     let report = store.attack()?;
//!     println!("dealt {} damage", report.damage);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`realm`] - game data model, rules and the session store
//! - [`config`] - TOML configuration
//! - [`validation`] - character and guild name rules
//! - [`logutil`] - single-line log sanitising

pub mod config;
pub mod logutil;
pub mod realm;
pub mod validation;
