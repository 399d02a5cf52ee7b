//! Turn-based duel resolution shared by PvE and PvP.
//!
//! A [`Battle`] starts in `Fighting` with the player to move and ends in
//! `Victory` or `Defeat`. After each player action the opponent's reply is
//! owed; the caller receives a [`TurnTicket`] and resolves it with
//! [`Battle::opponent_turn`], usually after a presentation delay. A ticket
//! from a different battle instance, or one presented when no opponent turn
//! is owed, is rejected as stale.

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use super::errors::{RealmError, RealmResult};
use super::loot::{roll_loot, LootTable};
use super::rng::RealmRng;
use super::types::{Combatant, InventoryItem};

/// Inclusive bounds for the random damage offset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OffsetRange {
    pub low: i32,
    pub high: i32,
}

impl OffsetRange {
    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    pub fn roll<R: RealmRng + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.range_inclusive(self.low, self.high)
    }
}

/// Tunables for every battle in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleRules {
    pub pve_offset: OffsetRange,
    pub pvp_offset: OffsetRange,
    /// Applied to the player's defense against the next hit after defending.
    pub defend_multiplier: f64,
    /// Most recent battle log lines kept.
    pub log_capacity: usize,
    pub player_max_hp: u32,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            pve_offset: OffsetRange::new(-3, 4),
            pvp_offset: OffsetRange::new(-4, 5),
            defend_multiplier: 1.5,
            log_capacity: 9,
            player_max_hp: 100,
        }
    }
}

impl BattleRules {
    pub fn offset_for(&self, mode: &BattleMode) -> OffsetRange {
        match mode {
            BattleMode::Pve { .. } => self.pve_offset,
            BattleMode::Pvp { .. } => self.pvp_offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleMode {
    Pve { enemy_id: String },
    /// The wager has already been taken from the player when the fight starts.
    Pvp {
        opponent_id: String,
        opponent_level: u32,
        wager: u64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Fighting,
    Victory,
    Defeat,
}

impl BattlePhase {
    pub fn is_over(self) -> bool {
        !matches!(self, BattlePhase::Fighting)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    Player,
    Opponent,
}

/// Session-level encounter flow around a battle instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum EncounterPhase {
    Select,
    /// PvP opponent chosen, waiting for a wager.
    Wager { opponent_id: String },
    Fighting,
    Victory,
    Defeat,
}

/// Claim on the opponent's next move in one battle instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnTicket {
    pub battle_id: u64,
}

/// What happens next after a resolved action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    /// The opponent moves next; resolve the ticket to continue.
    OpponentTurn(TurnTicket),
    PlayerTurn,
    Victory,
    Defeat,
}

/// A resolved hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub damage: u32,
    pub next: TurnResult,
}

/// `max(1, floor(atk - def * multiplier + offset))`.
pub fn compute_damage(atk: u32, def: u32, defense_multiplier: f64, offset: i32) -> u32 {
    let raw = (atk as f64 - def as f64 * defense_multiplier + offset as f64).floor();
    if raw < 1.0 {
        1
    } else {
        raw as u32
    }
}

pub fn roll_damage<R: RealmRng + ?Sized>(
    rng: &mut R,
    atk: u32,
    def: u32,
    defense_multiplier: f64,
    offset: OffsetRange,
) -> u32 {
    compute_damage(atk, def, defense_multiplier, offset.roll(rng))
}

/// Victory payout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleReward {
    pub tokens: u64,
    pub xp: u32,
    pub loot: Vec<InventoryItem>,
}

/// PvE: tokens `floor(maxHp*0.5 + U[0,50))`, xp `floor(maxHp*0.3 + U[0,20))`,
/// then loot. Rolls are drawn in that order.
pub fn pve_reward<R: RealmRng + ?Sized>(rng: &mut R, enemy_max_hp: u32, loot: &LootTable) -> BattleReward {
    let tokens = (enemy_max_hp as f64 * 0.5 + rng.uniform(50.0)).floor() as u64;
    let xp = (enemy_max_hp as f64 * 0.3 + rng.uniform(20.0)).floor() as u32;
    BattleReward {
        tokens,
        xp,
        loot: roll_loot(rng, loot, enemy_max_hp),
    }
}

/// PvP: twice the wager back, xp `floor(level*15 + U[0,20))`.
pub fn pvp_reward<R: RealmRng + ?Sized>(rng: &mut R, wager: u64, opponent_level: u32) -> BattleReward {
    BattleReward {
        tokens: wager.saturating_mul(2),
        xp: (opponent_level as f64 * 15.0 + rng.uniform(20.0)).floor() as u32,
        loot: Vec::new(),
    }
}

/// One battle instance.
#[derive(Debug, Clone)]
pub struct Battle {
    id: u64,
    mode: BattleMode,
    phase: BattlePhase,
    turn: Turn,
    player: Combatant,
    opponent: Combatant,
    defending: bool,
    log: VecDeque<String>,
    rules: BattleRules,
}

impl Battle {
    /// Both sides at full health, player to move, fresh log.
    pub fn start(id: u64, mode: BattleMode, mut player: Combatant, mut opponent: Combatant, rules: BattleRules) -> Self {
        player.hp = player.max_hp;
        opponent.hp = opponent.max_hp;
        let mut battle = Self {
            id,
            mode,
            phase: BattlePhase::Fighting,
            turn: Turn::Player,
            player,
            opponent,
            defending: false,
            log: VecDeque::new(),
            rules,
        };
        let line = format!("{} faces {}!", battle.player.name, battle.opponent.name);
        battle.push_log(line);
        battle
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn mode(&self) -> &BattleMode {
        &self.mode
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn opponent(&self) -> &Combatant {
        &self.opponent
    }

    pub fn is_defending(&self) -> bool {
        self.defending
    }

    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    /// Ticket for the owed opponent turn, if any.
    pub fn pending_ticket(&self) -> Option<TurnTicket> {
        (self.phase == BattlePhase::Fighting && self.turn == Turn::Opponent).then_some(TurnTicket { battle_id: self.id })
    }

    fn push_log(&mut self, line: String) {
        self.log.push_back(line);
        while self.log.len() > self.rules.log_capacity {
            self.log.pop_front();
        }
    }

    fn ensure_player_turn(&self) -> RealmResult<()> {
        if self.phase.is_over() {
            return Err(RealmError::WrongPhase);
        }
        if self.turn != Turn::Player {
            return Err(RealmError::NotPlayerTurn);
        }
        Ok(())
    }

    pub fn player_attack<R: RealmRng + ?Sized>(&mut self, rng: &mut R) -> RealmResult<Strike> {
        self.ensure_player_turn()?;

        let offset = self.rules.offset_for(&self.mode);
        let damage = roll_damage(rng, self.player.atk, self.opponent.def, 1.0, offset);
        self.opponent.take_damage(damage);
        let line = format!("{} hits {} for {} damage", self.player.name, self.opponent.name, damage);
        self.push_log(line);
        debug!("battle {}: player dealt {} ({} hp left)", self.id, damage, self.opponent.hp);

        if self.opponent.is_down() {
            self.phase = BattlePhase::Victory;
            let line = format!("Victory! {} is defeated", self.opponent.name);
            self.push_log(line);
            return Ok(Strike {
                damage,
                next: TurnResult::Victory,
            });
        }

        self.turn = Turn::Opponent;
        Ok(Strike {
            damage,
            next: TurnResult::OpponentTurn(TurnTicket { battle_id: self.id }),
        })
    }

    /// Brace: the next incoming hit meets boosted defense.
    pub fn player_defend(&mut self) -> RealmResult<TurnTicket> {
        self.ensure_player_turn()?;
        self.defending = true;
        self.turn = Turn::Opponent;
        let line = format!("{} braces for the next attack", self.player.name);
        self.push_log(line);
        Ok(TurnTicket { battle_id: self.id })
    }

    /// Resolve the owed opponent move. The opponent always attacks.
    pub fn opponent_turn<R: RealmRng + ?Sized>(&mut self, ticket: TurnTicket, rng: &mut R) -> RealmResult<Strike> {
        if self.pending_ticket() != Some(ticket) {
            return Err(RealmError::StaleTurn {
                battle_id: ticket.battle_id,
            });
        }

        let multiplier = if self.defending {
            self.rules.defend_multiplier
        } else {
            1.0
        };
        self.defending = false;

        let offset = self.rules.offset_for(&self.mode);
        let damage = roll_damage(rng, self.opponent.atk, self.player.def, multiplier, offset);
        self.player.take_damage(damage);
        let line = format!("{} hits {} for {} damage", self.opponent.name, self.player.name, damage);
        self.push_log(line);
        debug!("battle {}: opponent dealt {} ({} hp left)", self.id, damage, self.player.hp);

        if self.player.is_down() {
            self.phase = BattlePhase::Defeat;
            let line = format!("Defeat... {} has fallen", self.player.name);
            self.push_log(line);
            return Ok(Strike {
                damage,
                next: TurnResult::Defeat,
            });
        }

        self.turn = Turn::Player;
        Ok(Strike {
            damage,
            next: TurnResult::PlayerTurn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::rng::SequenceRng;

    fn wolf_fight() -> Battle {
        Battle::start(
            1,
            BattleMode::Pve {
                enemy_id: "forest_wolf".to_string(),
            },
            Combatant::new("Aria", 100, 42, 18),
            Combatant::new("Forest Wolf", 60, 12, 3),
            BattleRules::default(),
        )
    }

    #[test]
    fn damage_floors_at_one() {
        assert_eq!(compute_damage(5, 100, 1.0, -4), 1);
        assert_eq!(compute_damage(0, 0, 1.0, 0), 1);
        assert_eq!(compute_damage(42, 3, 1.0, 0), 39);
        // 12 - 18 * 1.5 + 4 = -11
        assert_eq!(compute_damage(12, 18, 1.5, 4), 1);
        assert_eq!(compute_damage(30, 15, 1.5, 0), 7);
    }

    #[test]
    fn damage_is_at_least_one_for_any_offset() {
        for offset in -4..=5 {
            for def in [0u32, 18, 60, 200] {
                assert!(compute_damage(12, def, 1.5, offset) >= 1);
            }
        }
    }

    #[test]
    fn attack_flips_turn_and_hands_out_ticket() {
        let mut b = wolf_fight();
        // 0.4 of 8 offsets from -3 -> 0
        let mut rng = SequenceRng::constant(0.4);
        let strike = b.player_attack(&mut rng).unwrap();
        assert_eq!(strike.damage, 39);
        assert_eq!(b.opponent().hp, 21);
        assert_eq!(strike.next, TurnResult::OpponentTurn(TurnTicket { battle_id: 1 }));
        assert_eq!(b.player_attack(&mut rng), Err(RealmError::NotPlayerTurn));
    }

    #[test]
    fn second_hit_wins() {
        let mut b = wolf_fight();
        let mut rng = SequenceRng::constant(0.4);
        let ticket = match b.player_attack(&mut rng).unwrap().next {
            TurnResult::OpponentTurn(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        let reply = b.opponent_turn(ticket, &mut rng).unwrap();
        // 12 - 18 + 0 -> floored to 1
        assert_eq!(reply.damage, 1);
        assert_eq!(reply.next, TurnResult::PlayerTurn);
        let finish = b.player_attack(&mut rng).unwrap();
        assert_eq!(finish.next, TurnResult::Victory);
        assert_eq!(b.opponent().hp, 0);
        assert_eq!(b.phase(), BattlePhase::Victory);
        assert_eq!(b.player_attack(&mut rng), Err(RealmError::WrongPhase));
    }

    #[test]
    fn defend_boosts_only_the_next_hit() {
        let mut b = Battle::start(
            7,
            BattleMode::Pve {
                enemy_id: "shadow_drake".to_string(),
            },
            Combatant::new("Aria", 100, 42, 18),
            Combatant::new("Shadow Drake", 200, 30, 15),
            BattleRules::default(),
        );
        let mut rng = SequenceRng::constant(0.4);
        let ticket = b.player_defend().unwrap();
        assert!(b.is_defending());
        // 30 - 18 * 1.5 + 0 = 3
        assert_eq!(b.opponent_turn(ticket, &mut rng).unwrap().damage, 3);
        assert!(!b.is_defending());

        let ticket = b.player_defend().unwrap();
        b.opponent_turn(ticket, &mut rng).unwrap();
        let strike = b.player_attack(&mut rng).unwrap();
        let TurnResult::OpponentTurn(ticket) = strike.next else {
            panic!("expected opponent turn");
        };
        // 30 - 18 + 0 = 12
        assert_eq!(b.opponent_turn(ticket, &mut rng).unwrap().damage, 12);
    }

    #[test]
    fn stale_tickets_are_rejected() {
        let mut b = wolf_fight();
        let mut rng = SequenceRng::constant(0.4);
        // nothing owed yet
        assert_eq!(
            b.opponent_turn(TurnTicket { battle_id: 1 }, &mut rng),
            Err(RealmError::StaleTurn { battle_id: 1 })
        );
        let ticket = b.player_defend().unwrap();
        assert_eq!(
            b.opponent_turn(TurnTicket { battle_id: 99 }, &mut rng),
            Err(RealmError::StaleTurn { battle_id: 99 })
        );
        b.opponent_turn(ticket, &mut rng).unwrap();
        // already spent
        assert!(b.opponent_turn(ticket, &mut rng).is_err());
    }

    #[test]
    fn player_can_lose() {
        let mut b = Battle::start(
            3,
            BattleMode::Pvp {
                opponent_id: "darksorcerer".to_string(),
                opponent_level: 10,
                wager: 50,
            },
            Combatant::new("Aria", 100, 1, 0),
            Combatant::new("DarkSorcerer", 100, 40, 5),
            BattleRules::default(),
        );
        // offset -4 at 0.0
        let mut rng = SequenceRng::constant(0.0);
        let mut result = TurnResult::PlayerTurn;
        while result == TurnResult::PlayerTurn {
            let ticket = b.player_defend().unwrap();
            result = b.opponent_turn(ticket, &mut rng).unwrap().next;
        }
        assert_eq!(result, TurnResult::Defeat);
        assert_eq!(b.player().hp, 0);
        assert_eq!(b.phase(), BattlePhase::Defeat);
        assert_eq!(b.pending_ticket(), None);
    }

    #[test]
    fn log_keeps_most_recent_lines() {
        let rules = BattleRules {
            log_capacity: 3,
            ..BattleRules::default()
        };
        let mut b = Battle::start(
            2,
            BattleMode::Pve {
                enemy_id: "crystal_golem".to_string(),
            },
            Combatant::new("Aria", 100, 42, 18),
            Combatant::new("Crystal Golem", 150, 22, 12),
            rules,
        );
        let mut rng = SequenceRng::constant(0.4);
        for _ in 0..3 {
            let ticket = b.player_defend().unwrap();
            b.opponent_turn(ticket, &mut rng).unwrap();
        }
        let lines: Vec<_> = b.log().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("Crystal Golem hits Aria"));
    }

    #[test]
    fn pve_reward_for_wolf() {
        // tokens: 30 + 0.5*50 = 55; xp: 18 + 0.5*20 = 28; one common drop
        let loot = LootTable::new().with_item(crate::realm::types::ItemDef::new(
            "wolf_fang",
            "Wolf Fang",
            crate::realm::types::Rarity::Common,
            crate::realm::types::ItemType::Material,
        ));
        let mut rng = SequenceRng::new([0.5, 0.5, 0.9, 0.9, 0.0]);
        let reward = pve_reward(&mut rng, 60, &loot);
        assert_eq!(reward.tokens, 55);
        assert_eq!(reward.xp, 28);
        assert_eq!(reward.loot.len(), 1);
        assert_eq!(reward.loot[0].id, "wolf_fang");
    }

    #[test]
    fn pvp_reward_doubles_wager() {
        let mut rng = SequenceRng::constant(0.99);
        let reward = pvp_reward(&mut rng, 250, 8);
        assert_eq!(reward.tokens, 500);
        // 120 + 19.8
        assert_eq!(reward.xp, 139);
        assert!(reward.loot.is_empty());
    }
}
