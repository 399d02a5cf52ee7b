//! PvE loot rolls.
//!
//! A victory drops one item, or two with probability [`DOUBLE_DROP_CHANCE`].
//! Each drop draws a rarity tier from a single unit roll and then a uniform
//! item from that tier's pool.

use std::collections::BTreeMap;

use super::rng::RealmRng;
use super::types::{InventoryItem, ItemDef, Rarity};

pub const DOUBLE_DROP_CHANCE: f64 = 0.3;
/// Legendary drops only come from enemies at least this tough.
pub const LEGENDARY_MIN_ENEMY_HP: u32 = 150;

/// Item pools keyed by rarity tier.
#[derive(Debug, Clone, Default)]
pub struct LootTable {
    pools: BTreeMap<Rarity, Vec<ItemDef>>,
}

impl LootTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to the pool matching its rarity.
    pub fn with_item(mut self, item: ItemDef) -> Self {
        self.pools.entry(item.rarity).or_default().push(item);
        self
    }

    pub fn pool(&self, rarity: Rarity) -> &[ItemDef] {
        self.pools.get(&rarity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(Vec::is_empty)
    }
}

/// Map a unit roll onto a rarity tier.
pub fn rarity_for_roll(roll: f64, enemy_max_hp: u32) -> Rarity {
    if roll < 0.01 && enemy_max_hp >= LEGENDARY_MIN_ENEMY_HP {
        Rarity::Legendary
    } else if roll < 0.08 {
        Rarity::Epic
    } else if roll < 0.25 {
        Rarity::Rare
    } else if roll < 0.5 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

pub fn roll_drop_count<R: RealmRng + ?Sized>(rng: &mut R) -> usize {
    if rng.next_unit() < DOUBLE_DROP_CHANCE {
        2
    } else {
        1
    }
}

/// Roll the drops for one defeated enemy. Each drop has quantity 1.
///
/// A tier with an empty pool falls back to the next lower tier.
pub fn roll_loot<R: RealmRng + ?Sized>(
    rng: &mut R,
    table: &LootTable,
    enemy_max_hp: u32,
) -> Vec<InventoryItem> {
    if table.is_empty() {
        return Vec::new();
    }

    let count = roll_drop_count(rng);
    let mut drops = Vec::with_capacity(count);
    for _ in 0..count {
        let tier = rarity_for_roll(rng.next_unit(), enemy_max_hp);
        let pool = Rarity::ALL
            .iter()
            .rev()
            .filter(|r| **r <= tier)
            .map(|r| table.pool(*r))
            .find(|p| !p.is_empty());
        if let Some(pool) = pool {
            let item = &pool[rng.pick_index(pool.len())];
            drops.push(item.with_qty(1));
        }
    }
    drops
}
