//! Season clock and leaderboard ranking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::currency::group_thousands;

/// Fixed-length seasons counted from a start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonClock {
    pub start: NaiveDate,
    pub length_days: u32,
}

impl SeasonClock {
    pub fn new(start: NaiveDate, length_days: u32) -> Self {
        Self {
            start,
            length_days: length_days.max(1),
        }
    }

    /// Whole days since the start, zero before it.
    fn days_elapsed(&self, today: NaiveDate) -> u32 {
        (today - self.start).num_days().max(0) as u32
    }

    /// 1-based season number.
    pub fn season_number(&self, today: NaiveDate) -> u32 {
        self.days_elapsed(today) / self.length_days + 1
    }

    /// Days left in the current season, counting today.
    pub fn days_remaining(&self, today: NaiveDate) -> u32 {
        self.length_days - self.days_elapsed(today) % self.length_days
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub class_name: String,
    pub level: u32,
    pub score: u64,
    pub guild: Option<String>,
    pub is_player: bool,
}

/// Merge the player into the board, sort by score descending and
/// reassign ranks from 1. Ties keep their existing order.
pub fn build_leaderboard(seed: &[LeaderboardEntry], player: Option<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    let mut board: Vec<LeaderboardEntry> = seed.to_vec();
    board.extend(player);
    board.sort_by(|a, b| b.score.cmp(&a.score));
    for (idx, entry) in board.iter_mut().enumerate() {
        entry.rank = idx as u32 + 1;
    }
    board
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SeasonReward {
    pub tier: &'static str,
    pub tokens: u64,
    pub bonus: Option<&'static str>,
}

pub const SEASON_REWARDS: &[(u32, SeasonReward)] = &[
    (1, SeasonReward { tier: "1st", tokens: 5_000, bonus: Some("Legendary Crown") }),
    (2, SeasonReward { tier: "2nd", tokens: 3_000, bonus: Some("Epic Title") }),
    (3, SeasonReward { tier: "3rd", tokens: 1_500, bonus: Some("Rare Banner") }),
    (10, SeasonReward { tier: "Top 10", tokens: 500, bonus: Some("Season Badge") }),
    (50, SeasonReward { tier: "Top 50", tokens: 100, bonus: None }),
];

/// Reward tier for a final rank, `None` outside the top 50.
pub fn reward_for_rank(rank: u32) -> Option<SeasonReward> {
    if rank == 0 {
        return None;
    }
    SEASON_REWARDS
        .iter()
        .find(|(max_rank, _)| rank <= *max_rank)
        .map(|(_, reward)| *reward)
}

pub fn format_leaderboard_row(entry: &LeaderboardEntry) -> String {
    let guild = entry.guild.as_deref().map(|g| format!(" [{}]", g)).unwrap_or_default();
    let marker = if entry.is_player { " <- you" } else { "" };
    format!(
        "#{:<3} {}{} ({} L{}) {}{}",
        entry.rank,
        entry.name,
        guild,
        entry.class_name,
        entry.level,
        group_thousands(entry.score),
        marker
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> SeasonClock {
        SeasonClock::new(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(), 30)
    }

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            name: name.to_string(),
            class_name: "Mage".to_string(),
            level: 1,
            score,
            guild: None,
            is_player: false,
        }
    }

    #[test]
    fn first_day_of_first_season() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(clock().season_number(today), 1);
        assert_eq!(clock().days_remaining(today), 30);
    }

    #[test]
    fn rolls_over_every_thirty_days() {
        let c = clock();
        let day_29 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(c.season_number(day_29), 1);
        assert_eq!(c.days_remaining(day_29), 1);
        let day_30 = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        assert_eq!(c.season_number(day_30), 2);
        assert_eq!(c.days_remaining(day_30), 30);
        // 2026-10-19 is day 260: season 9, 10 days left
        let autumn = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(c.season_number(autumn), 9);
        assert_eq!(c.days_remaining(autumn), 10);
    }

    #[test]
    fn dates_before_start_count_as_first_day() {
        let early = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(clock().season_number(early), 1);
        assert_eq!(clock().days_remaining(early), 30);
    }

    #[test]
    fn player_is_ranked_in() {
        let seed = vec![entry("A", 900), entry("B", 500), entry("C", 100)];
        let mut me = entry("Aria", 600);
        me.is_player = true;
        let board = build_leaderboard(&seed, Some(me));
        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Aria", "B", "C"]);
        let ranks: Vec<_> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn reward_tiers() {
        assert_eq!(reward_for_rank(1).unwrap().tokens, 5_000);
        assert_eq!(reward_for_rank(3).unwrap().tier, "3rd");
        assert_eq!(reward_for_rank(4).unwrap().tier, "Top 10");
        assert_eq!(reward_for_rank(50).unwrap().tokens, 100);
        assert_eq!(reward_for_rank(51), None);
        assert_eq!(reward_for_rank(0), None);
    }

    #[test]
    fn row_format() {
        let mut e = entry("Aria", 1_250);
        e.rank = 11;
        e.guild = Some("DR".to_string());
        e.is_player = true;
        assert_eq!(format_leaderboard_row(&e), "#11  Aria [DR] (Mage L1) 1,250 <- you");
    }
}
