use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// No character stat may grow beyond this value.
pub const STAT_CAP: u32 = 100;
/// XP needed to leave level 1.
pub const BASE_XP_TO_NEXT: u32 = 100;

/// Ordinal item quality class. Ordering follows rarity (Common lowest).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    Material,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Consumable => "consumable",
            ItemType::Material => "material",
        };
        f.write_str(label)
    }
}

/// Item identity without a quantity. Used by loot pools, recipes and listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub item_type: ItemType,
}

impl ItemDef {
    pub fn new(id: &str, name: &str, rarity: Rarity, item_type: ItemType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rarity,
            item_type,
        }
    }

    pub fn with_qty(&self, qty: u32) -> InventoryItem {
        InventoryItem {
            id: self.id.clone(),
            name: self.name.clone(),
            rarity: self.rarity,
            item_type: self.item_type,
            qty,
        }
    }
}

/// A stack of identical items held by the character. Unique by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub item_type: ItemType,
    pub qty: u32,
}

impl InventoryItem {
    pub fn def(&self) -> ItemDef {
        ItemDef {
            id: self.id.clone(),
            name: self.name.clone(),
            rarity: self.rarity,
            item_type: self.item_type,
        }
    }
}

/// `{itemId, qty}` pair used for recipe materials and bulk removal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRequirement {
    pub item_id: String,
    pub qty: u32,
}

impl ItemRequirement {
    pub fn new(item_id: &str, qty: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            qty,
        }
    }
}

/// Outcome of an inventory mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryResult {
    Added { quantity: u32, stacked: bool },
    Removed { quantity: u32 },
}

// ============================================================================
// Character
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterStats {
    pub str: u32,
    pub int: u32,
    pub dex: u32,
    pub hp: u32,
}

impl CharacterStats {
    pub fn new(str: u32, int: u32, dex: u32, hp: u32) -> Self {
        Self { str, int, dex, hp }
    }
}

/// A playable class offered at character creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub stats: CharacterStats,
}

impl ClassTemplate {
    pub fn new(id: &str, name: &str, description: &str, stats: CharacterStats) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            stats,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub name: String,
    pub class_id: String,
    pub class_name: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub stats: CharacterStats,
    pub created_at: DateTime<Utc>,
}

impl Character {
    pub fn new(name: &str, class: &ClassTemplate) -> Self {
        Self {
            name: name.to_string(),
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            level: 1,
            xp: 0,
            xp_to_next: BASE_XP_TO_NEXT,
            stats: class.stats,
            created_at: Utc::now(),
        }
    }
}

/// Gameplay counters that drive achievements.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCounters {
    pub battle_wins: u32,
    pub pvp_wins: u32,
    pub defeats: u32,
    pub craft_count: u32,
}

// ============================================================================
// Guilds
// ============================================================================

/// Maximum guild tag length.
pub const GUILD_TAG_MAX: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub leader: String,
    /// Unique member names in join order; always contains `leader`.
    pub members: Vec<String>,
    pub vault: u64,
    pub created_at: DateTime<Utc>,
}

impl Guild {
    pub fn new(id: &str, name: &str, tag: &str, leader: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
            leader: leader.to_string(),
            members: vec![leader.to_string()],
            vault: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_member(mut self, member: &str) -> Self {
        if !self.is_member(member) {
            self.members.push(member.to_string());
        }
        self
    }

    pub fn with_vault(mut self, vault: u64) -> Self {
        self.vault = vault;
        self
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

// ============================================================================
// Achievements & quests
// ============================================================================

/// Condition that unlocks an achievement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCondition {
    BattleWins { required: u32 },
    PvpWins { required: u32 },
    CraftCount { required: u32 },
    TotalEarned { amount: u64 },
    Level { required: u32 },
    /// Unlocked directly when a Legendary item enters the inventory.
    LegendaryDrop,
    /// Unlocked directly on joining or founding a guild.
    GuildJoin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition: AchievementCondition,
    /// Set once on unlock, never cleared.
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        icon: &str,
        condition: AchievementCondition,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            condition,
            unlocked_at: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Battle,
    Craft,
    Pvp,
    Earn,
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestType::Battle => "battle",
            QuestType::Craft => "craft",
            QuestType::Pvp => "pvp",
            QuestType::Earn => "earn",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quest_type: QuestType,
    pub target: u64,
    pub progress: u64,
    pub reward_tokens: u64,
    pub reward_xp: u32,
    pub completed: bool,
}

impl Quest {
    pub fn new(id: &str, name: &str, description: &str, quest_type: QuestType, target: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            quest_type,
            target,
            progress: 0,
            reward_tokens: 0,
            reward_xp: 0,
            completed: false,
        }
    }

    pub fn with_rewards(mut self, tokens: u64, xp: u32) -> Self {
        self.reward_tokens = tokens;
        self.reward_xp = xp;
        self
    }

    /// Advance progress, clamped to target. Completed quests do not move.
    pub fn advance(&mut self, amount: u64) {
        if !self.completed {
            self.progress = self.progress.saturating_add(amount).min(self.target);
        }
    }

    pub fn is_claimable(&self) -> bool {
        !self.completed && self.progress >= self.target
    }

    pub fn percent(&self) -> u64 {
        if self.target == 0 {
            return 100;
        }
        self.progress * 100 / self.target
    }
}

/// Rewards handed out by a successful quest claim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestReward {
    pub tokens: u64,
    pub xp: u32,
}

// ============================================================================
// Marketplace & crafting
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketListing {
    pub id: String,
    pub seller: String,
    pub item: ItemDef,
    pub qty: u32,
    /// Price for the whole listing.
    pub price: u64,
    pub listed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub materials: Vec<ItemRequirement>,
    pub result: ItemDef,
    pub result_qty: u32,
}

impl Recipe {
    pub fn new(id: &str, name: &str, result: ItemDef) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            materials: Vec::new(),
            result,
            result_qty: 1,
        }
    }

    pub fn with_material(mut self, item_id: &str, qty: u32) -> Self {
        self.materials.push(ItemRequirement::new(item_id, qty));
        self
    }
}

// ============================================================================
// Combat templates
// ============================================================================

/// Ephemeral battle participant. `0 <= hp <= max_hp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Combatant {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
}

impl Combatant {
    /// Fresh combatant at full health.
    pub fn new(name: &str, max_hp: u32, atk: u32, def: u32) -> Self {
        Self {
            name: name.to_string(),
            hp: max_hp,
            max_hp,
            atk,
            def,
        }
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    pub fn is_down(&self) -> bool {
        self.hp == 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// PvE enemy template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
}

impl EnemyTemplate {
    pub fn new(id: &str, name: &str, icon: &str, max_hp: u32, atk: u32, def: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            max_hp,
            atk,
            def,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        if self.max_hp > 150 {
            Difficulty::Hard
        } else if self.max_hp > 100 {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }

    pub fn combatant(&self) -> Combatant {
        Combatant::new(&self.name, self.max_hp, self.atk, self.def)
    }
}

/// Computed PvP arena opponent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PvpOpponent {
    pub id: String,
    pub name: String,
    pub class_name: String,
    pub level: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
}

impl PvpOpponent {
    pub fn new(
        id: &str,
        name: &str,
        class_name: &str,
        level: u32,
        max_hp: u32,
        atk: u32,
        def: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            class_name: class_name.to_string(),
            level,
            max_hp,
            atk,
            def,
        }
    }

    pub fn combatant(&self) -> Combatant {
        Combatant::new(&self.name, self.max_hp, self.atk, self.def)
    }
}
