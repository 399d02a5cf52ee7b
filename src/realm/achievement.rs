/// Achievement tracking: counter-driven checks plus direct event unlocks.
///
/// Checks run right after the state change that could satisfy them; each
/// achievement is timestamped once and never re-locked.
use chrono::{DateTime, Utc};
use log::info;

use super::errors::{RealmError, RealmResult};
use super::types::{Achievement, AchievementCondition};

/// Live counters an achievement condition is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressFacts {
    pub battle_wins: u32,
    pub pvp_wins: u32,
    pub craft_count: u32,
    pub total_earned: u64,
    pub level: u32,
}

/// Whether a counter condition holds. Event conditions (`LegendaryDrop`,
/// `GuildJoin`) never hold here; they unlock through [`unlock`] directly.
pub fn condition_met(condition: &AchievementCondition, facts: &ProgressFacts) -> bool {
    match condition {
        AchievementCondition::BattleWins { required } => facts.battle_wins >= *required,
        AchievementCondition::PvpWins { required } => facts.pvp_wins >= *required,
        AchievementCondition::CraftCount { required } => facts.craft_count >= *required,
        AchievementCondition::TotalEarned { amount } => facts.total_earned >= *amount,
        AchievementCondition::Level { required } => facts.level >= *required,
        AchievementCondition::LegendaryDrop | AchievementCondition::GuildJoin => false,
    }
}

/// Unlock by id. Returns `Ok(true)` on first unlock, `Ok(false)` if it was
/// already unlocked (the original timestamp is kept).
pub fn unlock(achievements: &mut [Achievement], id: &str, now: DateTime<Utc>) -> RealmResult<bool> {
    let achievement = achievements
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| RealmError::UnknownAchievement(id.to_string()))?;

    if achievement.is_unlocked() {
        return Ok(false);
    }
    achievement.unlocked_at = Some(now);
    info!("achievement unlocked: {} ({})", achievement.name, achievement.id);
    Ok(true)
}

/// Unlock every locked achievement whose condition now holds.
/// Returns the ids unlocked by this call.
pub fn check_progress(
    achievements: &mut [Achievement],
    facts: &ProgressFacts,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut awarded = Vec::new();
    for achievement in achievements.iter_mut() {
        if achievement.is_unlocked() || !condition_met(&achievement.condition, facts) {
            continue;
        }
        achievement.unlocked_at = Some(now);
        info!("achievement unlocked: {} ({})", achievement.name, achievement.id);
        awarded.push(achievement.id.clone());
    }
    awarded
}

/// Unlock the first locked achievement carrying an event condition.
pub fn unlock_event(
    achievements: &mut [Achievement],
    event: &AchievementCondition,
    now: DateTime<Utc>,
) -> Option<String> {
    let id = achievements
        .iter()
        .find(|a| !a.is_unlocked() && &a.condition == event)
        .map(|a| a.id.clone())?;
    match unlock(achievements, &id, now) {
        Ok(true) => Some(id),
        _ => None,
    }
}

pub fn earned(achievements: &[Achievement]) -> Vec<&Achievement> {
    achievements.iter().filter(|a| a.is_unlocked()).collect()
}

pub fn format_achievement_list(achievements: &[Achievement]) -> Vec<String> {
    let mut lines: Vec<String> = achievements
        .iter()
        .map(|a| {
            let mark = if a.is_unlocked() { "[x]" } else { "[ ]" };
            format!("{} {} {} - {}", mark, a.icon, a.name, a.description)
        })
        .collect();
    lines.push(format!("{}/{} unlocked", earned(achievements).len(), achievements.len()));
    lines
}
