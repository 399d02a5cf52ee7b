//! Static catalogs seeded into every new session: playable classes, the PvE
//! roster, arena opponents, items, recipes, loot pools, daily quests,
//! achievements, rival guilds, starter market listings and the season board.

use chrono::Utc;

use super::loot::LootTable;
use super::season::LeaderboardEntry;
use super::types::{
    Achievement, AchievementCondition, CharacterStats, ClassTemplate, EnemyTemplate, Guild, ItemDef,
    ItemType, MarketListing, PvpOpponent, Quest, QuestType, Rarity, Recipe,
};

/// Items every new character starts with, as `(item_id, qty)`.
pub const STARTING_ITEMS: &[(&str, u32)] = &[("iron_sword", 1), ("mana_potion", 5)];

/// Everything the store looks up by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub classes: Vec<ClassTemplate>,
    pub enemies: Vec<EnemyTemplate>,
    pub opponents: Vec<PvpOpponent>,
    pub items: Vec<ItemDef>,
    pub recipes: Vec<Recipe>,
    pub loot: LootTable,
}

impl Catalog {
    pub fn standard() -> Self {
        let items = seed_items();
        let loot = items
            .iter()
            .filter(|i| LOOT_ITEM_IDS.contains(&i.id.as_str()))
            .cloned()
            .fold(LootTable::new(), LootTable::with_item);
        Self {
            classes: seed_classes(),
            enemies: seed_enemies(),
            opponents: seed_pvp_opponents(),
            items,
            recipes: seed_recipes(),
            loot,
        }
    }

    pub fn class(&self, id: &str) -> Option<&ClassTemplate> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn opponent(&self, id: &str) -> Option<&PvpOpponent> {
        self.opponents.iter().find(|o| o.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.item(id).map(|i| i.name.as_str()).unwrap_or(id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn seed_classes() -> Vec<ClassTemplate> {
    vec![
        ClassTemplate::new(
            "warrior",
            "Warrior",
            "A mighty melee fighter with heavy armor and devastating attacks.",
            CharacterStats::new(85, 20, 40, 95),
        ),
        ClassTemplate::new(
            "mage",
            "Mage",
            "A master of arcane arts, wielding destructive spells from afar.",
            CharacterStats::new(15, 95, 30, 50),
        ),
        ClassTemplate::new(
            "ranger",
            "Ranger",
            "A swift hunter with deadly aim and nature-bound abilities.",
            CharacterStats::new(40, 35, 90, 65),
        ),
    ]
}

pub fn seed_enemies() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate::new("forest_wolf", "Forest Wolf", "🐺", 60, 12, 3),
        EnemyTemplate::new("dark_skeleton", "Dark Skeleton", "💀", 90, 18, 6),
        EnemyTemplate::new("crystal_golem", "Crystal Golem", "🗿", 150, 22, 12),
        EnemyTemplate::new("shadow_drake", "Shadow Drake", "🐉", 200, 30, 15),
    ]
}

pub fn seed_pvp_opponents() -> Vec<PvpOpponent> {
    vec![
        PvpOpponent::new("shadowblade", "ShadowBlade", "Warrior", 3, 90, 20, 8),
        PvpOpponent::new("frostmage42", "FrostMage42", "Mage", 5, 70, 28, 4),
        PvpOpponent::new("swiftarrow", "SwiftArrow", "Ranger", 4, 80, 24, 6),
        PvpOpponent::new("irontitan", "IronTitan", "Warrior", 8, 140, 32, 14),
        PvpOpponent::new("darksorcerer", "DarkSorcerer", "Mage", 10, 100, 40, 5),
    ]
}

/// Items that can drop from PvE victories.
const LOOT_ITEM_IDS: &[&str] = &[
    "wolf_fang",
    "iron_sword",
    "mana_potion",
    "leather_armor",
    "bone_staff",
    "healing_draught",
    "dragon_scale",
    "crystal_shield",
    "shadow_cloak",
    "arcane_blade",
    "dragon_heart",
    "phoenix_feather",
];

pub fn seed_items() -> Vec<ItemDef> {
    use ItemType::*;
    use Rarity::*;
    vec![
        ItemDef::new("wolf_fang", "Wolf Fang", Common, Material),
        ItemDef::new("iron_sword", "Iron Sword", Common, Weapon),
        ItemDef::new("mana_potion", "Mana Potion", Common, Consumable),
        ItemDef::new("leather_armor", "Leather Armor", Common, Armor),
        ItemDef::new("bone_staff", "Bone Staff", Uncommon, Weapon),
        ItemDef::new("healing_draught", "Healing Draught", Uncommon, Consumable),
        ItemDef::new("dragon_scale", "Dragon Scale", Rare, Material),
        ItemDef::new("crystal_shield", "Crystal Shield", Rare, Armor),
        ItemDef::new("shadow_cloak", "Shadow Cloak", Epic, Armor),
        ItemDef::new("arcane_blade", "Arcane Blade", Epic, Weapon),
        ItemDef::new("dragon_heart", "Dragon Heart", Legendary, Material),
        ItemDef::new("phoenix_feather", "Phoenix Feather", Legendary, Material),
        // crafted only
        ItemDef::new("fang_blade", "Fang Blade", Rare, Weapon),
        ItemDef::new("dragonscale_armor", "Dragonscale Armor", Epic, Armor),
        ItemDef::new("arcane_destroyer", "Arcane Destroyer", Legendary, Weapon),
        ItemDef::new("greater_mana_potion", "Greater Mana Potion", Rare, Consumable),
        ItemDef::new("shadow_dragon_cloak", "Shadow Dragon Cloak", Legendary, Armor),
        ItemDef::new("bone_shield", "Bone Shield", Epic, Armor),
    ]
}

pub fn seed_recipes() -> Vec<Recipe> {
    use ItemType::*;
    use Rarity::*;
    vec![
        Recipe::new("r1", "Fang Blade", ItemDef::new("fang_blade", "Fang Blade", Rare, Weapon))
            .with_material("wolf_fang", 2)
            .with_material("iron_sword", 1),
        Recipe::new(
            "r2",
            "Dragonscale Armor",
            ItemDef::new("dragonscale_armor", "Dragonscale Armor", Epic, Armor),
        )
        .with_material("dragon_scale", 2)
        .with_material("leather_armor", 1),
        Recipe::new(
            "r3",
            "Arcane Destroyer",
            ItemDef::new("arcane_destroyer", "Arcane Destroyer", Legendary, Weapon),
        )
        .with_material("arcane_blade", 1)
        .with_material("dragon_scale", 3),
        Recipe::new(
            "r4",
            "Greater Mana Potion",
            ItemDef::new("greater_mana_potion", "Greater Mana Potion", Rare, Consumable),
        )
        .with_material("mana_potion", 3),
        Recipe::new(
            "r5",
            "Shadow Dragon Cloak",
            ItemDef::new("shadow_dragon_cloak", "Shadow Dragon Cloak", Legendary, Armor),
        )
        .with_material("shadow_cloak", 1)
        .with_material("dragon_scale", 2),
        Recipe::new("r6", "Bone Shield", ItemDef::new("bone_shield", "Bone Shield", Epic, Armor))
            .with_material("bone_staff", 1)
            .with_material("crystal_shield", 1),
    ]
}

/// Daily quests offered at session start.
pub fn seed_starter_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "daily_hunt",
            "Monster Hunter",
            "Win 3 PvE battles",
            QuestType::Battle,
            3,
        )
        .with_rewards(100, 50),
        Quest::new(
            "daily_craft",
            "Apprentice Smith",
            "Craft 1 item",
            QuestType::Craft,
            1,
        )
        .with_rewards(75, 30),
        Quest::new(
            "daily_arena",
            "Arena Challenger",
            "Win 1 PvP match",
            QuestType::Pvp,
            1,
        )
        .with_rewards(150, 75),
        Quest::new(
            "daily_earn",
            "Treasure Seeker",
            "Earn 500 $REALM",
            QuestType::Earn,
            500,
        )
        .with_rewards(200, 100),
    ]
}

pub fn seed_starter_achievements() -> Vec<Achievement> {
    use AchievementCondition::*;
    vec![
        Achievement::new("first_blood", "First Blood", "Win your first battle", "⚔️", BattleWins { required: 1 }),
        Achievement::new("monster_slayer", "Monster Slayer", "Win 10 battles", "🐺", BattleWins { required: 10 }),
        Achievement::new("arena_debut", "Arena Debut", "Win your first PvP match", "🏆", PvpWins { required: 1 }),
        Achievement::new("gladiator", "Gladiator", "Win 5 PvP matches", "🛡️", PvpWins { required: 5 }),
        Achievement::new("first_craft", "Apprentice Crafter", "Craft your first item", "🔨", CraftCount { required: 1 }),
        Achievement::new("master_smith", "Master Smith", "Craft 10 items", "⚒️", CraftCount { required: 10 }),
        Achievement::new("wealthy", "Wealthy", "Earn 1,000 $REALM", "💰", TotalEarned { amount: 1_000 }),
        Achievement::new("tycoon", "Tycoon", "Earn 10,000 $REALM", "👑", TotalEarned { amount: 10_000 }),
        Achievement::new("level_5", "Seasoned", "Reach level 5", "⭐", Level { required: 5 }),
        Achievement::new("level_10", "Veteran", "Reach level 10", "🌟", Level { required: 10 }),
        Achievement::new("legendary_drop", "Legend Finder", "Obtain a Legendary item", "🐉", LegendaryDrop),
        Achievement::new("guild_member", "Brotherhood", "Join or found a guild", "🤝", GuildJoin),
    ]
}

/// Rival guilds that already exist when the session starts.
pub fn seed_guilds() -> Vec<Guild> {
    vec![
        Guild::new("guild_shw", "Shadow Wolves", "SHW", "DragonSlayer99")
            .with_member("BladeWalker")
            .with_member("ArrowStorm")
            .with_member("MageKing")
            .with_vault(12_500),
        Guild::new("guild_cro", "Crimson Order", "CRO", "ArcaneQueen")
            .with_member("RuneMaster")
            .with_member("IronFist")
            .with_vault(9_800),
        Guild::new("guild_flg", "Flame Legion", "FLG", "PhoenixRider")
            .with_member("ShadowMage")
            .with_vault(7_200),
    ]
}

/// Listings posted by other players before the session starts.
pub fn seed_market_listings(catalog: &Catalog) -> Vec<MarketListing> {
    let offers: &[(&str, &str, &str, u32, u64)] = &[
        ("seed_1", "ArcaneQueen", "dragon_scale", 2, 300),
        ("seed_2", "BladeWalker", "wolf_fang", 3, 45),
        ("seed_3", "RuneMaster", "mana_potion", 5, 60),
        ("seed_4", "StormCaller", "shadow_cloak", 1, 800),
        ("seed_5", "IronFist", "leather_armor", 1, 40),
    ];
    let now = Utc::now();
    offers
        .iter()
        .filter_map(|(id, seller, item_id, qty, price)| {
            catalog.item(item_id).map(|item| MarketListing {
                id: id.to_string(),
                seller: seller.to_string(),
                item: item.clone(),
                qty: *qty,
                price: *price,
                listed_at: now,
            })
        })
        .collect()
}

/// Season standings before the player is ranked in.
pub fn seed_leaderboard() -> Vec<LeaderboardEntry> {
    let rows: &[(&str, &str, u32, u64, Option<&str>)] = &[
        ("DragonSlayer99", "Warrior", 24, 18_750, Some("SHW")),
        ("ArcaneQueen", "Mage", 22, 16_200, Some("CRO")),
        ("PhoenixRider", "Ranger", 21, 15_800, Some("FLG")),
        ("BladeWalker", "Warrior", 19, 13_400, Some("SHW")),
        ("RuneMaster", "Mage", 18, 12_100, Some("CRO")),
        ("StormCaller", "Mage", 17, 10_800, None),
        ("IronFist", "Warrior", 16, 9_500, Some("CRO")),
        ("ShadowMage", "Mage", 15, 8_900, Some("FLG")),
        ("ArrowStorm", "Ranger", 14, 7_600, Some("SHW")),
        ("MageKing", "Mage", 13, 6_800, Some("SHW")),
    ];
    rows.iter()
        .enumerate()
        .map(|(idx, (name, class_name, level, score, guild))| LeaderboardEntry {
            rank: idx as u32 + 1,
            name: name.to_string(),
            class_name: class_name.to_string(),
            level: *level,
            score: *score,
            guild: guild.map(str::to_string),
            is_player: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn recipe_materials_and_results_are_known_items() {
        let catalog = Catalog::standard();
        for recipe in &catalog.recipes {
            assert!(catalog.item(&recipe.result.id).is_some(), "{}", recipe.result.id);
            for m in &recipe.materials {
                assert!(catalog.item(&m.item_id).is_some(), "{}", m.item_id);
            }
        }
    }

    #[test]
    fn every_rarity_has_loot() {
        let catalog = Catalog::standard();
        for rarity in Rarity::ALL {
            assert!(!catalog.loot.pool(rarity).is_empty(), "{:?}", rarity);
        }
        assert!(catalog.loot.pool(Rarity::Legendary).iter().all(|i| i.rarity == Rarity::Legendary));
    }

    #[test]
    fn ids_are_unique() {
        let catalog = Catalog::standard();
        let items: HashSet<_> = catalog.items.iter().map(|i| &i.id).collect();
        assert_eq!(items.len(), catalog.items.len());
        let achievements = seed_starter_achievements();
        let ids: HashSet<_> = achievements.iter().map(|a| &a.id).collect();
        assert_eq!(ids.len(), achievements.len());
    }

    #[test]
    fn seeded_guilds_keep_leader_as_member() {
        for guild in seed_guilds() {
            assert!(guild.is_member(&guild.leader));
            assert!(guild.tag.len() <= 4);
        }
    }

    #[test]
    fn leaderboard_guild_tags_match_membership() {
        let guilds = seed_guilds();
        for entry in seed_leaderboard() {
            let member_of = guilds.iter().find(|g| g.is_member(&entry.name)).map(|g| g.tag.clone());
            assert_eq!(entry.guild, member_of, "{}", entry.name);
        }
    }

    #[test]
    fn seeded_listings_resolve() {
        let catalog = Catalog::standard();
        let listings = seed_market_listings(&catalog);
        assert_eq!(listings.len(), 5);
        assert!(listings.iter().all(|l| l.qty > 0 && l.price > 0));
    }
}
