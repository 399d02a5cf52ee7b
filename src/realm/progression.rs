//! Character progression: XP curve, level-ups and derived combat stats.

use log::debug;

use super::types::{Character, CharacterStats, BASE_XP_TO_NEXT, STAT_CAP};

/// Per-level stat growth.
pub const LEVEL_UP_STR: u32 = 2;
pub const LEVEL_UP_INT: u32 = 2;
pub const LEVEL_UP_DEX: u32 = 2;
pub const LEVEL_UP_HP: u32 = 3;

/// XP required to advance from `level` to `level + 1`:
/// `floor(100 * 1.5^(level - 1))`.
pub fn xp_to_next(level: u32) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    (BASE_XP_TO_NEXT as f64 * 1.5f64.powi(exponent)).floor() as u32
}

/// Apply one level's worth of stat growth, capped at [`STAT_CAP`].
pub fn apply_level_up_stats(stats: &mut CharacterStats) {
    stats.str = (stats.str + LEVEL_UP_STR).min(STAT_CAP);
    stats.int = (stats.int + LEVEL_UP_INT).min(STAT_CAP);
    stats.dex = (stats.dex + LEVEL_UP_DEX).min(STAT_CAP);
    stats.hp = (stats.hp + LEVEL_UP_HP).min(STAT_CAP);
}

/// Add XP and resolve every level-up it pays for. Returns levels gained.
///
/// Leaves `xp < xp_to_next` on return.
pub fn add_xp(character: &mut Character, amount: u32) -> u32 {
    character.xp = character.xp.saturating_add(amount);
    let mut gained = 0;
    while character.xp >= character.xp_to_next {
        character.xp -= character.xp_to_next;
        character.level += 1;
        character.xp_to_next = xp_to_next(character.level);
        apply_level_up_stats(&mut character.stats);
        gained += 1;
        debug!(
            "level up: now level {} ({} / {} xp)",
            character.level, character.xp, character.xp_to_next
        );
    }
    gained
}

/// Player attack: `floor(str * 0.4 + dex * 0.2)`.
pub fn player_attack(stats: &CharacterStats) -> u32 {
    (stats.str as f64 * 0.4 + stats.dex as f64 * 0.2).floor() as u32
}

/// Player defense: `floor(str * 0.1 + hp * 0.1)`.
pub fn player_defense(stats: &CharacterStats) -> u32 {
    (stats.str as f64 * 0.1 + stats.hp as f64 * 0.1).floor() as u32
}

/// Season score used on the leaderboard.
pub fn season_score(character: &Character) -> u64 {
    character.level as u64 * 100 + character.xp as u64
}
