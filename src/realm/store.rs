//! Session store: the single owner of all game state and the only place
//! it is mutated.
//!
//! Every operation either applies completely or returns a [`RealmError`]
//! with nothing changed. Derived effects run in a fixed order after the
//! change that causes them: a PvE victory pays tokens, then XP, then loot,
//! records the win and finally evaluates achievements.

use chrono::Utc;
use log::{debug, info, warn};
use serde::Serialize;

use super::achievement::{self, ProgressFacts};
use super::battle::{
    pve_reward, pvp_reward, Battle, BattleMode, BattlePhase, BattleReward, BattleRules, EncounterPhase,
    TurnResult, TurnTicket,
};
use super::crafting;
use super::currency::TokenLedger;
use super::errors::{RealmError, RealmResult};
use super::guild;
use super::inventory;
use super::market::Marketplace;
use super::progression::{self, player_attack, player_defense, season_score};
use super::quest;
use super::rng::{RealmRng, SeededRng};
use super::season::{build_leaderboard, LeaderboardEntry};
use super::state::{
    seed_guilds, seed_leaderboard, seed_market_listings, seed_starter_achievements, seed_starter_quests, Catalog,
    STARTING_ITEMS,
};
use super::types::{
    Achievement, AchievementCondition, Character, Combatant, Guild, InventoryItem, InventoryResult, ItemRequirement,
    MarketListing, Quest, QuestReward, QuestType, Rarity, SessionCounters,
};
use crate::logutil::escape_log;
use crate::validation::validate_character_name;

/// How a finished battle was settled.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BattleOutcome {
    pub battle_id: u64,
    pub victory: bool,
    pub mode: BattleMode,
    pub reward: Option<BattleReward>,
    pub levels_gained: u32,
    /// Achievements unlocked while settling.
    pub unlocked: Vec<String>,
}

/// Result of one battle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub damage: u32,
    pub next: TurnResult,
    /// Present when the action ended the battle.
    pub outcome: Option<BattleOutcome>,
}

/// Serializable view of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub character: Option<Character>,
    pub balance: u64,
    pub total_earned: u64,
    pub counters: SessionCounters,
    pub inventory: Vec<InventoryItem>,
    pub guild: Option<Guild>,
    pub quests: Vec<Quest>,
    pub achievements: Vec<Achievement>,
    pub encounter: EncounterPhase,
    pub last_outcome: Option<BattleOutcome>,
}

#[derive(Debug, Clone)]
enum Encounter {
    Select,
    Wager { opponent_id: String },
    Active(Battle),
}

/// One player's session state.
pub struct GameStore<R: RealmRng = SeededRng> {
    rng: R,
    rules: BattleRules,
    catalog: Catalog,
    character: Option<Character>,
    ledger: TokenLedger,
    inventory: Vec<InventoryItem>,
    counters: SessionCounters,
    guilds: Vec<Guild>,
    market: Marketplace,
    quests: Vec<Quest>,
    achievements: Vec<Achievement>,
    leaderboard_seed: Vec<LeaderboardEntry>,
    encounter: Encounter,
    next_battle_id: u64,
    last_outcome: Option<BattleOutcome>,
}

impl GameStore<SeededRng> {
    /// Fresh session with default rules and a seeded random source.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededRng::seed_from_u64(seed), BattleRules::default())
    }
}

impl<R: RealmRng> GameStore<R> {
    pub fn new(rng: R, rules: BattleRules) -> Self {
        let catalog = Catalog::standard();
        let market = Marketplace::with_listings(seed_market_listings(&catalog));
        Self {
            rng,
            rules,
            catalog,
            character: None,
            ledger: TokenLedger::default(),
            inventory: Vec::new(),
            counters: SessionCounters::default(),
            guilds: seed_guilds(),
            market,
            quests: seed_starter_quests(),
            achievements: seed_starter_achievements(),
            leaderboard_seed: seed_leaderboard(),
            encounter: Encounter::Select,
            next_battle_id: 1,
            last_outcome: None,
        }
    }

    /// Opening balance. Does not count as earned.
    pub fn with_starting_tokens(mut self, tokens: u64) -> Self {
        self.ledger = TokenLedger::new(tokens);
        self
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    pub fn total_earned(&self) -> u64 {
        self.ledger.total_earned()
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn item_quantity(&self, item_id: &str) -> u32 {
        inventory::item_quantity(&self.inventory, item_id)
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn guilds(&self) -> &[Guild] {
        &self.guilds
    }

    pub fn guild(&self, guild_id: &str) -> Option<&Guild> {
        self.guilds.iter().find(|g| g.id == guild_id)
    }

    /// The player's guild, if any.
    pub fn my_guild(&self) -> Option<&Guild> {
        let name = self.character.as_ref()?.name.as_str();
        guild::guild_of(&self.guilds, name)
    }

    pub fn market(&self) -> &Marketplace {
        &self.market
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    pub fn battle(&self) -> Option<&Battle> {
        match &self.encounter {
            Encounter::Active(battle) => Some(battle),
            _ => None,
        }
    }

    pub fn encounter_phase(&self) -> EncounterPhase {
        match &self.encounter {
            Encounter::Select => EncounterPhase::Select,
            Encounter::Wager { opponent_id } => EncounterPhase::Wager {
                opponent_id: opponent_id.clone(),
            },
            Encounter::Active(battle) => match battle.phase() {
                BattlePhase::Fighting => EncounterPhase::Fighting,
                BattlePhase::Victory => EncounterPhase::Victory,
                BattlePhase::Defeat => EncounterPhase::Defeat,
            },
        }
    }

    /// Ticket for the opponent turn currently owed, if any.
    pub fn pending_ticket(&self) -> Option<TurnTicket> {
        self.battle().and_then(Battle::pending_ticket)
    }

    pub fn last_outcome(&self) -> Option<&BattleOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            character: self.character.clone(),
            balance: self.ledger.balance(),
            total_earned: self.ledger.total_earned(),
            counters: self.counters,
            inventory: self.inventory.clone(),
            guild: self.my_guild().cloned(),
            quests: self.quests.clone(),
            achievements: self.achievements.clone(),
            encounter: self.encounter_phase(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    /// Seeded season board with the player ranked in by score.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let player = self.character.as_ref().map(|c| LeaderboardEntry {
            rank: 0,
            name: c.name.clone(),
            class_name: c.class_name.clone(),
            level: c.level,
            score: season_score(c),
            guild: self.my_guild().map(|g| g.tag.clone()),
            is_player: true,
        });
        build_leaderboard(&self.leaderboard_seed, player)
    }

    fn player_name(&self) -> RealmResult<String> {
        self.character
            .as_ref()
            .map(|c| c.name.clone())
            .ok_or(RealmError::NoCharacter)
    }

    // ------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------

    pub fn create_character(&mut self, name: &str, class_id: &str) -> RealmResult<&Character> {
        if self.character.is_some() {
            return Err(RealmError::CharacterExists);
        }
        let name = validate_character_name(name)?;
        if self.name_taken(&name) {
            return Err(RealmError::NameTaken(name));
        }
        let class = self
            .catalog
            .class(class_id)
            .ok_or_else(|| RealmError::UnknownClass(class_id.to_string()))?;

        let character = Character::new(&name, class);
        for (item_id, qty) in STARTING_ITEMS {
            if let Some(def) = self.catalog.item(item_id) {
                inventory::add_item(&mut self.inventory, def.with_qty(*qty))?;
            }
        }
        info!("character created: {} the {}", escape_log(&character.name), character.class_name);
        let character: &Character = self.character.insert(character);
        Ok(character)
    }

    /// Guild members, market sellers and ranked players all own state keyed
    /// by name, so the player may not reuse one. Compared case-insensitively.
    fn name_taken(&self, name: &str) -> bool {
        let same = |other: &str| other.eq_ignore_ascii_case(name);
        self.guilds.iter().any(|g| g.members.iter().any(|m| same(m.as_str())) || same(g.leader.as_str()))
            || self.market.listings().iter().any(|l| same(l.seller.as_str()))
            || self.leaderboard_seed.iter().any(|e| same(e.name.as_str()))
    }

    /// Grant XP, resolving every level-up. Returns levels gained.
    pub fn add_xp(&mut self, amount: u32) -> RealmResult<u32> {
        if self.character.is_none() {
            return Err(RealmError::NoCharacter);
        }
        let gained = self.grant_xp(amount);
        if gained > 0 {
            self.check_achievements();
        }
        Ok(gained)
    }

    fn grant_xp(&mut self, amount: u32) -> u32 {
        let Some(character) = self.character.as_mut() else {
            return 0;
        };
        let gained = progression::add_xp(character, amount);
        if gained > 0 {
            info!("{} reached level {}", escape_log(&character.name), character.level);
        }
        gained
    }

    // ------------------------------------------------------------------
    // Tokens & inventory
    // ------------------------------------------------------------------

    /// Signed balance change. Income counts toward lifetime earnings and
    /// earn quests; spending past zero is rejected.
    pub fn add_tokens(&mut self, amount: i64) -> RealmResult<u64> {
        if amount > 0 {
            self.credit_tokens(amount as u64);
            self.check_achievements();
        } else if amount < 0 {
            self.ledger.adjust(amount)?;
        }
        Ok(self.ledger.balance())
    }

    fn credit_tokens(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.ledger.credit(amount);
        quest::advance_quests(&mut self.quests, QuestType::Earn, amount);
        debug!("credited {} tokens (balance {})", amount, self.ledger.balance());
    }

    pub fn add_item(&mut self, item: InventoryItem) -> RealmResult<InventoryResult> {
        let (result, _) = self.grant_item(item)?;
        Ok(result)
    }

    /// Add to inventory; a Legendary item unlocks its achievement directly.
    fn grant_item(&mut self, item: InventoryItem) -> RealmResult<(InventoryResult, Option<String>)> {
        let legendary = item.rarity == Rarity::Legendary;
        let result = inventory::add_item(&mut self.inventory, item)?;
        let unlocked = if legendary {
            achievement::unlock_event(&mut self.achievements, &AchievementCondition::LegendaryDrop, Utc::now())
        } else {
            None
        };
        Ok((result, unlocked))
    }

    /// All-or-nothing removal.
    pub fn remove_items(&mut self, requirements: &[ItemRequirement]) -> RealmResult<()> {
        inventory::remove_items(&mut self.inventory, requirements)
    }

    // ------------------------------------------------------------------
    // Gameplay events
    // ------------------------------------------------------------------

    fn progress_facts(&self) -> ProgressFacts {
        ProgressFacts {
            battle_wins: self.counters.battle_wins,
            pvp_wins: self.counters.pvp_wins,
            craft_count: self.counters.craft_count,
            total_earned: self.ledger.total_earned(),
            level: self.character.as_ref().map(|c| c.level).unwrap_or(0),
        }
    }

    fn check_achievements(&mut self) -> Vec<String> {
        let facts = self.progress_facts();
        achievement::check_progress(&mut self.achievements, &facts, Utc::now())
    }

    pub fn unlock_achievement(&mut self, id: &str) -> RealmResult<bool> {
        achievement::unlock(&mut self.achievements, id, Utc::now())
    }

    /// Returns achievements unlocked by the new count.
    pub fn record_battle_win(&mut self) -> Vec<String> {
        self.bump_battle_wins();
        self.check_achievements()
    }

    pub fn record_pvp_win(&mut self) -> Vec<String> {
        self.bump_pvp_wins();
        self.check_achievements()
    }

    pub fn record_craft(&mut self) -> Vec<String> {
        self.counters.craft_count += 1;
        quest::advance_quests(&mut self.quests, QuestType::Craft, 1);
        self.check_achievements()
    }

    fn bump_battle_wins(&mut self) {
        self.counters.battle_wins += 1;
        quest::advance_quests(&mut self.quests, QuestType::Battle, 1);
    }

    fn bump_pvp_wins(&mut self) {
        self.counters.pvp_wins += 1;
        quest::advance_quests(&mut self.quests, QuestType::Pvp, 1);
    }

    /// Claim a completed quest's reward. Paid at most once.
    pub fn claim_quest(&mut self, quest_id: &str) -> RealmResult<QuestReward> {
        if self.character.is_none() {
            return Err(RealmError::NoCharacter);
        }
        let reward = quest::claim_quest(&mut self.quests, quest_id)?;
        self.credit_tokens(reward.tokens);
        self.grant_xp(reward.xp);
        self.check_achievements();
        Ok(reward)
    }

    // ------------------------------------------------------------------
    // Crafting
    // ------------------------------------------------------------------

    pub fn can_craft(&self, recipe_id: &str) -> RealmResult<bool> {
        let recipe = self
            .catalog
            .recipe(recipe_id)
            .ok_or_else(|| RealmError::UnknownRecipe(recipe_id.to_string()))?;
        Ok(crafting::can_craft(&self.inventory, recipe))
    }

    pub fn craft(&mut self, recipe_id: &str) -> RealmResult<InventoryItem> {
        if self.character.is_none() {
            return Err(RealmError::NoCharacter);
        }
        let recipe = self
            .catalog
            .recipe(recipe_id)
            .ok_or_else(|| RealmError::UnknownRecipe(recipe_id.to_string()))?;
        let crafted = crafting::craft(&mut self.inventory, recipe)?;
        if crafted.rarity == Rarity::Legendary {
            achievement::unlock_event(&mut self.achievements, &AchievementCondition::LegendaryDrop, Utc::now());
        }
        self.record_craft();
        Ok(crafted)
    }

    // ------------------------------------------------------------------
    // Guilds
    // ------------------------------------------------------------------

    pub fn create_guild(&mut self, name: &str, tag: &str) -> RealmResult<String> {
        let leader = self.player_name()?;
        let id = guild::create_guild(&mut self.guilds, &leader, name, tag, Utc::now())?;
        achievement::unlock_event(&mut self.achievements, &AchievementCondition::GuildJoin, Utc::now());
        Ok(id)
    }

    pub fn join_guild(&mut self, guild_id: &str) -> RealmResult<()> {
        let member = self.player_name()?;
        guild::join_guild(&mut self.guilds, guild_id, &member)?;
        achievement::unlock_event(&mut self.achievements, &AchievementCondition::GuildJoin, Utc::now());
        Ok(())
    }

    /// Returns the id of the guild left.
    pub fn leave_guild(&mut self) -> RealmResult<String> {
        let member = self.player_name()?;
        guild::leave_guild(&mut self.guilds, &member)
    }

    /// Returns the vault total after the deposit.
    pub fn deposit_to_vault(&mut self, amount: i64) -> RealmResult<u64> {
        let member = self.player_name()?;
        guild::deposit_to_vault(&mut self.guilds, &member, &mut self.ledger, amount)
    }

    // ------------------------------------------------------------------
    // Marketplace
    // ------------------------------------------------------------------

    pub fn list_item(&mut self, item_id: &str, qty: u32, price: u64) -> RealmResult<String> {
        let seller = self.player_name()?;
        if self.catalog.item(item_id).is_none() {
            return Err(RealmError::UnknownItem(item_id.to_string()));
        }
        self.market
            .create_listing(&seller, &mut self.inventory, item_id, qty, price, Utc::now())
    }

    pub fn buy_listing(&mut self, listing_id: &str) -> RealmResult<MarketListing> {
        let buyer = self.player_name()?;
        let listing = self
            .market
            .buy(&buyer, &mut self.ledger, &mut self.inventory, listing_id)?;
        if listing.item.rarity == Rarity::Legendary {
            achievement::unlock_event(&mut self.achievements, &AchievementCondition::LegendaryDrop, Utc::now());
        }
        Ok(listing)
    }

    pub fn cancel_listing(&mut self, listing_id: &str) -> RealmResult<MarketListing> {
        let caller = self.player_name()?;
        self.market.cancel(&caller, &mut self.inventory, listing_id)
    }

    // ------------------------------------------------------------------
    // Battles
    // ------------------------------------------------------------------

    fn ensure_not_fighting(&self) -> RealmResult<()> {
        match &self.encounter {
            Encounter::Active(battle) if battle.phase() == BattlePhase::Fighting => Err(RealmError::BattleInProgress),
            _ => Ok(()),
        }
    }

    fn player_combatant(&self) -> RealmResult<Combatant> {
        let character = self.character.as_ref().ok_or(RealmError::NoCharacter)?;
        Ok(Combatant::new(
            &character.name,
            self.rules.player_max_hp,
            player_attack(&character.stats),
            player_defense(&character.stats),
        ))
    }

    fn begin(&mut self, mode: BattleMode, player: Combatant, opponent: Combatant) -> u64 {
        let id = self.next_battle_id;
        self.next_battle_id += 1;
        info!("battle {} started: {} vs {}", id, escape_log(&player.name), opponent.name);
        self.encounter = Encounter::Active(Battle::start(id, mode, player, opponent, self.rules.clone()));
        id
    }

    /// Start a PvE fight. Returns the battle id.
    pub fn start_battle(&mut self, enemy_id: &str) -> RealmResult<u64> {
        let player = self.player_combatant()?;
        self.ensure_not_fighting()?;
        let enemy = self
            .catalog
            .enemy(enemy_id)
            .ok_or_else(|| RealmError::UnknownEnemy(enemy_id.to_string()))?;
        let opponent = enemy.combatant();
        let mode = BattleMode::Pve {
            enemy_id: enemy.id.clone(),
        };
        Ok(self.begin(mode, player, opponent))
    }

    /// Choose a PvP opponent; the fight starts once a wager is placed.
    pub fn select_opponent(&mut self, opponent_id: &str) -> RealmResult<()> {
        self.player_combatant()?;
        self.ensure_not_fighting()?;
        if self.catalog.opponent(opponent_id).is_none() {
            return Err(RealmError::UnknownOpponent(opponent_id.to_string()));
        }
        self.encounter = Encounter::Wager {
            opponent_id: opponent_id.to_string(),
        };
        Ok(())
    }

    /// Stake `wager` and start the PvP fight. The wager is taken now and
    /// not refunded on defeat.
    pub fn start_pvp(&mut self, wager: u64) -> RealmResult<u64> {
        let opponent_id = match &self.encounter {
            Encounter::Wager { opponent_id } => opponent_id.clone(),
            _ => return Err(RealmError::WrongPhase),
        };
        if wager == 0 {
            return Err(RealmError::InvalidAmount(0));
        }
        let player = self.player_combatant()?;
        let opponent = self
            .catalog
            .opponent(&opponent_id)
            .ok_or_else(|| RealmError::UnknownOpponent(opponent_id.clone()))?;
        let combatant = opponent.combatant();
        let mode = BattleMode::Pvp {
            opponent_id: opponent.id.clone(),
            opponent_level: opponent.level,
            wager,
        };

        self.ledger.debit(wager)?;
        Ok(self.begin(mode, player, combatant))
    }

    fn active_battle(&mut self) -> RealmResult<&mut Battle> {
        match &mut self.encounter {
            Encounter::Active(battle) => Ok(battle),
            _ => Err(RealmError::NoActiveBattle),
        }
    }

    pub fn attack(&mut self) -> RealmResult<ActionReport> {
        let strike = match &mut self.encounter {
            Encounter::Active(battle) => battle.player_attack(&mut self.rng)?,
            _ => return Err(RealmError::NoActiveBattle),
        };
        let outcome = match strike.next {
            TurnResult::Victory => Some(self.settle(true)?),
            _ => None,
        };
        Ok(ActionReport {
            damage: strike.damage,
            next: strike.next,
            outcome,
        })
    }

    pub fn defend(&mut self) -> RealmResult<TurnTicket> {
        self.active_battle()?.player_defend()
    }

    /// Apply the opponent's owed move. Tickets for battles that were left
    /// or replaced are rejected without effect.
    pub fn resolve_opponent_turn(&mut self, ticket: TurnTicket) -> RealmResult<ActionReport> {
        let result = match &mut self.encounter {
            Encounter::Active(battle) => battle.opponent_turn(ticket, &mut self.rng),
            _ => Err(RealmError::StaleTurn {
                battle_id: ticket.battle_id,
            }),
        };
        let strike = match result {
            Ok(strike) => strike,
            Err(e) => {
                if matches!(e, RealmError::StaleTurn { .. }) {
                    warn!("ignoring stale opponent turn for battle {}", ticket.battle_id);
                }
                return Err(e);
            }
        };
        let outcome = match strike.next {
            TurnResult::Defeat => Some(self.settle(false)?),
            _ => None,
        };
        Ok(ActionReport {
            damage: strike.damage,
            next: strike.next,
            outcome,
        })
    }

    /// Walk away from the current encounter, back to selection. A battle
    /// in progress is forfeited and any owed opponent turn goes stale.
    pub fn leave_battle(&mut self) -> Option<u64> {
        let left = match &self.encounter {
            Encounter::Active(battle) => {
                if battle.phase() == BattlePhase::Fighting {
                    info!("battle {} abandoned", battle.id());
                }
                Some(battle.id())
            }
            _ => None,
        };
        self.encounter = Encounter::Select;
        left
    }

    fn settle(&mut self, victory: bool) -> RealmResult<BattleOutcome> {
        let (battle_id, mode, opponent_max_hp) = match &self.encounter {
            Encounter::Active(battle) => (battle.id(), battle.mode().clone(), battle.opponent().max_hp),
            _ => return Err(RealmError::NoActiveBattle),
        };

        if !victory {
            self.counters.defeats += 1;
            info!("battle {} lost", battle_id);
            let outcome = BattleOutcome {
                battle_id,
                victory,
                mode,
                reward: None,
                levels_gained: 0,
                unlocked: Vec::new(),
            };
            self.last_outcome = Some(outcome.clone());
            return Ok(outcome);
        }

        let reward = match &mode {
            BattleMode::Pve { .. } => pve_reward(&mut self.rng, opponent_max_hp, &self.catalog.loot),
            BattleMode::Pvp {
                wager, opponent_level, ..
            } => pvp_reward(&mut self.rng, *wager, *opponent_level),
        };

        let mut unlocked = Vec::new();
        self.credit_tokens(reward.tokens);
        let levels_gained = self.grant_xp(reward.xp);
        for drop in &reward.loot {
            match self.grant_item(drop.clone()) {
                Ok((_, Some(id))) => unlocked.push(id),
                Ok(_) => {}
                Err(e) => warn!("dropping loot {}: {}", drop.id, e),
            }
        }
        match &mode {
            BattleMode::Pve { .. } => self.bump_battle_wins(),
            BattleMode::Pvp { .. } => self.bump_pvp_wins(),
        }
        unlocked.extend(self.check_achievements());

        info!(
            "battle {} won: +{} tokens, +{} xp, {} drops",
            battle_id,
            reward.tokens,
            reward.xp,
            reward.loot.len()
        );
        let outcome = BattleOutcome {
            battle_id,
            victory,
            mode,
            reward: Some(reward),
            levels_gained,
            unlocked,
        };
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::rng::SequenceRng;

    fn store(rolls: SequenceRng) -> GameStore<SequenceRng> {
        GameStore::new(rolls, BattleRules::default())
    }

    #[test]
    fn character_starts_with_kit() {
        let mut s = store(SequenceRng::constant(0.5));
        let c = s.create_character("Aria", "warrior").unwrap();
        assert_eq!(c.level, 1);
        assert_eq!(c.xp_to_next, 100);
        assert_eq!(s.item_quantity("iron_sword"), 1);
        assert_eq!(s.item_quantity("mana_potion"), 5);
        assert!(matches!(s.create_character("Bren", "mage"), Err(RealmError::CharacterExists)));
    }

    #[test]
    fn unknown_class_and_bad_name_rejected() {
        let mut s = store(SequenceRng::constant(0.5));
        assert_eq!(
            s.create_character("Aria", "bard").unwrap_err(),
            RealmError::UnknownClass("bard".to_string())
        );
        assert!(matches!(s.create_character("A", "mage"), Err(RealmError::InvalidName(_))));
        assert!(s.character().is_none());
        assert!(s.inventory().is_empty());
    }

    #[test]
    fn seeded_names_are_taken() {
        let mut s = store(SequenceRng::constant(0.5));
        for name in ["ArcaneQueen", "stormcaller", "MageKing"] {
            assert!(matches!(s.create_character(name, "mage"), Err(RealmError::NameTaken(_))));
        }
        assert!(s.character().is_none());
        assert!(s.create_character("Arcane", "mage").is_ok());
    }

    #[test]
    fn battles_need_a_character() {
        let mut s = store(SequenceRng::constant(0.5));
        assert_eq!(s.start_battle("forest_wolf"), Err(RealmError::NoCharacter));
        assert_eq!(s.attack().unwrap_err(), RealmError::NoActiveBattle);
    }

    #[test]
    fn defeat_counts_and_pays_nothing() {
        let mut s = store(SequenceRng::constant(0.0)).with_starting_tokens(100);
        s.create_character("Aria", "mage").unwrap();
        s.start_battle("shadow_drake").unwrap();
        let outcome = loop {
            let ticket = s.defend().unwrap();
            if let Some(outcome) = s.resolve_opponent_turn(ticket).unwrap().outcome {
                break outcome;
            }
        };
        assert!(!outcome.victory);
        assert_eq!(outcome.reward, None);
        assert_eq!(s.counters().defeats, 1);
        assert_eq!(s.balance(), 100);
        assert_eq!(s.encounter_phase(), EncounterPhase::Defeat);
    }

    #[test]
    fn leaving_makes_ticket_stale() {
        let mut s = store(SequenceRng::constant(0.4));
        s.create_character("Aria", "warrior").unwrap();
        let id = s.start_battle("crystal_golem").unwrap();
        let ticket = s.defend().unwrap();
        assert_eq!(s.leave_battle(), Some(id));
        assert_eq!(
            s.resolve_opponent_turn(ticket).unwrap_err(),
            RealmError::StaleTurn { battle_id: id }
        );
        assert_eq!(s.encounter_phase(), EncounterPhase::Select);
    }

    #[test]
    fn cannot_start_while_fighting() {
        let mut s = store(SequenceRng::constant(0.4));
        s.create_character("Aria", "warrior").unwrap();
        s.start_battle("forest_wolf").unwrap();
        assert_eq!(s.start_battle("forest_wolf"), Err(RealmError::BattleInProgress));
        assert_eq!(s.select_opponent("shadowblade"), Err(RealmError::BattleInProgress));
    }

    #[test]
    fn snapshot_serializes() {
        let mut s = store(SequenceRng::constant(0.5));
        s.create_character("Aria", "ranger").unwrap();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["character"]["name"], "Aria");
        assert_eq!(json["encounter"]["phase"], "select");
        assert_eq!(json["inventory"].as_array().unwrap().len(), 2);
    }
}
