//! Crypto Realm game core.
//! Plain data types, free functions over them, and the [`GameStore`] that
//! owns a session and is the only entry point for mutation.

pub mod achievement;
pub mod battle;
pub mod crafting;
pub mod currency;
pub mod errors;
pub mod guild;
pub mod inventory;
pub mod loot;
pub mod market;
pub mod pacing;
pub mod progression;
pub mod quest;
pub mod rng;
pub mod season;
pub mod state;
pub mod store;
pub mod types;

pub use achievement::{check_progress, condition_met, format_achievement_list, unlock, ProgressFacts};
pub use battle::{
    compute_damage, pve_reward, pvp_reward, roll_damage, Battle, BattleMode, BattlePhase, BattleReward, BattleRules,
    EncounterPhase, OffsetRange, Strike, Turn, TurnResult, TurnTicket,
};
pub use crafting::{can_craft, craft, material_status};
pub use currency::{format_token_delta, format_tokens, group_thousands, TokenLedger, TOKEN_SYMBOL};
pub use errors::{RealmError, RealmResult};
pub use guild::{format_guild_line, guild_of};
pub use inventory::{format_inventory, has_items, item_quantity};
pub use loot::{rarity_for_roll, roll_loot, LootTable};
pub use market::{format_listing, Marketplace};
pub use pacing::{cancel_pair, paced_craft, paced_opponent_turn, PaceCanceller, PaceToken, Paced, Pacing};
pub use progression::{player_attack, player_defense, season_score, xp_to_next};
pub use quest::{advance_quests, format_quest_status};
pub use rng::{RealmRng, SeededRng, SequenceRng};
pub use season::{build_leaderboard, format_leaderboard_row, reward_for_rank, LeaderboardEntry, SeasonClock, SeasonReward};
pub use state::{seed_starter_achievements, seed_starter_quests, Catalog, STARTING_ITEMS};
pub use store::{ActionReport, BattleOutcome, GameStore, SessionSnapshot};
pub use types::*;
