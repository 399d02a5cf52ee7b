//! Recipe checks and craft application.

use log::info;

use super::errors::{RealmError, RealmResult};
use super::inventory::{add_item, first_shortfall, item_quantity, remove_items};
use super::types::{InventoryItem, Recipe};

pub fn can_craft(inventory: &[InventoryItem], recipe: &Recipe) -> bool {
    first_shortfall(inventory, &recipe.materials).is_none()
}

/// Per-material `(item_id, have, need)` for a recipe card.
pub fn material_status(inventory: &[InventoryItem], recipe: &Recipe) -> Vec<(String, u32, u32)> {
    recipe
        .materials
        .iter()
        .map(|m| (m.item_id.clone(), item_quantity(inventory, &m.item_id), m.qty))
        .collect()
}

/// Consume the recipe's materials and add its result.
///
/// A recipe the inventory cannot cover is rejected as `NotCraftable` and
/// the inventory is left untouched.
pub fn craft(inventory: &mut Vec<InventoryItem>, recipe: &Recipe) -> RealmResult<InventoryItem> {
    if !can_craft(inventory, recipe) {
        return Err(RealmError::NotCraftable {
            recipe_id: recipe.id.clone(),
        });
    }

    remove_items(inventory, &recipe.materials)?;
    let crafted = recipe.result.with_qty(recipe.result_qty);
    add_item(inventory, crafted.clone())?;
    info!("crafted {}x {} ({})", crafted.qty, crafted.name, recipe.id);
    Ok(crafted)
}
