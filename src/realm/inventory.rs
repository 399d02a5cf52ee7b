/// Inventory management for the session character
use super::errors::{RealmError, RealmResult};
use super::types::{InventoryItem, InventoryResult, ItemRequirement};

// ============================================================================
// Inventory Operations
// ============================================================================

/// Add an item stack, merging into an existing stack with the same id.
pub fn add_item(inventory: &mut Vec<InventoryItem>, item: InventoryItem) -> RealmResult<InventoryResult> {
    if item.qty == 0 {
        return Err(RealmError::InvalidAmount(0));
    }

    let quantity = item.qty;
    if let Some(stack) = inventory.iter_mut().find(|s| s.id == item.id) {
        stack.qty = stack.qty.saturating_add(quantity);
        return Ok(InventoryResult::Added {
            quantity,
            stacked: true,
        });
    }

    inventory.push(item);
    Ok(InventoryResult::Added {
        quantity,
        stacked: false,
    })
}

/// First requirement the inventory cannot cover, as `(item_id, have, need)`.
///
/// Requirements naming the same item are summed.
pub fn first_shortfall(inventory: &[InventoryItem], requirements: &[ItemRequirement]) -> Option<(String, u32, u32)> {
    for (idx, req) in requirements.iter().enumerate() {
        let need: u32 = requirements[..=idx]
            .iter()
            .filter(|r| r.item_id == req.item_id)
            .map(|r| r.qty)
            .sum();
        let have = item_quantity(inventory, &req.item_id);
        if have < need {
            return Some((req.item_id.clone(), have, need));
        }
    }
    None
}

/// Check if every requirement is covered.
pub fn has_items(inventory: &[InventoryItem], requirements: &[ItemRequirement]) -> bool {
    first_shortfall(inventory, requirements).is_none()
}

/// Remove a list of `{item_id, qty}` all-or-nothing. Stacks that reach zero
/// are dropped. Nothing changes if any requirement is short.
pub fn remove_items(inventory: &mut Vec<InventoryItem>, requirements: &[ItemRequirement]) -> RealmResult<()> {
    if requirements.iter().any(|r| r.qty == 0) {
        return Err(RealmError::InvalidAmount(0));
    }
    if let Some((item_id, have, need)) = first_shortfall(inventory, requirements) {
        return Err(RealmError::InsufficientItems { item_id, have, need });
    }

    for req in requirements {
        if let Some(stack) = inventory.iter_mut().find(|s| s.id == req.item_id) {
            stack.qty -= req.qty;
        }
    }
    inventory.retain(|s| s.qty > 0);
    Ok(())
}

/// Remove a quantity of a single item.
pub fn remove_item(inventory: &mut Vec<InventoryItem>, item_id: &str, qty: u32) -> RealmResult<InventoryResult> {
    remove_items(inventory, &[ItemRequirement::new(item_id, qty)])?;
    Ok(InventoryResult::Removed { quantity: qty })
}

/// Get the quantity of an item in inventory
pub fn item_quantity(inventory: &[InventoryItem], item_id: &str) -> u32 {
    inventory
        .iter()
        .find(|s| s.id == item_id)
        .map(|s| s.qty)
        .unwrap_or(0)
}

/// Format inventory for display, one line per stack
pub fn format_inventory(inventory: &[InventoryItem]) -> Vec<String> {
    if inventory.is_empty() {
        return vec!["Empty".to_string()];
    }

    let mut lines: Vec<String> = inventory
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let qty_str = if item.qty > 1 {
                format!("{}x ", item.qty)
            } else {
                String::new()
            };
            format!("{}. {}{} [{} {}]", idx + 1, qty_str, item.name, item.rarity, item.item_type)
        })
        .collect();

    let total: u64 = inventory.iter().map(|i| i.qty as u64).sum();
    lines.push(format!("Total: {} stacks, {} items", inventory.len(), total));
    lines
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::types::{ItemDef, ItemType, Rarity};

    fn fang() -> ItemDef {
        ItemDef::new("wolf_fang", "Wolf Fang", Rarity::Common, ItemType::Material)
    }

    fn sword() -> ItemDef {
        ItemDef::new("iron_sword", "Iron Sword", Rarity::Common, ItemType::Weapon)
    }

    #[test]
    fn add_item_creates_new_stack() {
        let mut inv = Vec::new();
        let result = add_item(&mut inv, sword().with_qty(1)).unwrap();
        assert_eq!(
            result,
            InventoryResult::Added {
                quantity: 1,
                stacked: false
            }
        );
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn add_item_stacks_by_id() {
        let mut inv = Vec::new();
        add_item(&mut inv, fang().with_qty(3)).unwrap();
        let result = add_item(&mut inv, fang().with_qty(2)).unwrap();
        assert_eq!(
            result,
            InventoryResult::Added {
                quantity: 2,
                stacked: true
            }
        );
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].qty, 5);
    }

    #[test]
    fn add_zero_is_rejected() {
        let mut inv = Vec::new();
        assert_eq!(add_item(&mut inv, fang().with_qty(0)), Err(RealmError::InvalidAmount(0)));
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_items_drops_empty_stacks() {
        let mut inv = vec![fang().with_qty(2), sword().with_qty(1)];
        remove_items(
            &mut inv,
            &[ItemRequirement::new("wolf_fang", 2), ItemRequirement::new("iron_sword", 1)],
        )
        .unwrap();
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_items_is_all_or_nothing() {
        let mut inv = vec![fang().with_qty(1), sword().with_qty(1)];
        let before = inv.clone();
        let err = remove_items(
            &mut inv,
            &[ItemRequirement::new("iron_sword", 1), ItemRequirement::new("wolf_fang", 2)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RealmError::InsufficientItems {
                item_id: "wolf_fang".to_string(),
                have: 1,
                need: 2
            }
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn duplicate_requirements_are_summed() {
        let inv = vec![fang().with_qty(3)];
        let reqs = [ItemRequirement::new("wolf_fang", 2), ItemRequirement::new("wolf_fang", 2)];
        assert_eq!(first_shortfall(&inv, &reqs), Some(("wolf_fang".to_string(), 3, 4)));
    }

    #[test]
    fn remove_single_item_partial() {
        let mut inv = vec![fang().with_qty(10)];
        assert_eq!(remove_item(&mut inv, "wolf_fang", 3).unwrap(), InventoryResult::Removed { quantity: 3 });
        assert_eq!(item_quantity(&inv, "wolf_fang"), 7);
        assert!(remove_item(&mut inv, "dragon_scale", 1).is_err());
    }

    #[test]
    fn format_lists_stacks() {
        let inv = vec![fang().with_qty(2)];
        let lines = format_inventory(&inv);
        assert_eq!(lines[0], "1. 2x Wolf Fang [Common material]");
        assert_eq!(lines[1], "Total: 1 stacks, 2 items");
        assert_eq!(format_inventory(&[]), vec!["Empty".to_string()]);
    }
}
