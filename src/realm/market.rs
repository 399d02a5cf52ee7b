/// Player marketplace: list, buy and cancel item listings.
///
/// Sale proceeds are credited to the seller's proceeds account, so a
/// purchase moves tokens rather than destroying them.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use super::currency::TokenLedger;
use super::errors::{RealmError, RealmResult};
use super::inventory::{add_item, remove_item};
use super::types::{InventoryItem, MarketListing};
use crate::logutil::escape_log;

#[derive(Debug, Clone, Default)]
pub struct Marketplace {
    listings: Vec<MarketListing>,
    proceeds: HashMap<String, u64>,
}

impl Marketplace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: Vec<MarketListing>) -> Self {
        Self {
            listings,
            proceeds: HashMap::new(),
        }
    }

    pub fn listings(&self) -> &[MarketListing] {
        &self.listings
    }

    pub fn listing(&self, listing_id: &str) -> Option<&MarketListing> {
        self.listings.iter().find(|l| l.id == listing_id)
    }

    pub fn listings_by(&self, seller: &str) -> Vec<&MarketListing> {
        self.listings.iter().filter(|l| l.seller == seller).collect()
    }

    /// Listings a player can buy (everything not their own).
    pub fn listings_excluding(&self, name: &str) -> Vec<&MarketListing> {
        self.listings.iter().filter(|l| l.seller != name).collect()
    }

    /// Tokens earned from sales by `seller`.
    pub fn proceeds_of(&self, seller: &str) -> u64 {
        self.proceeds.get(seller).copied().unwrap_or(0)
    }

    /// Move `qty` of an item out of the seller's inventory into a new listing.
    pub fn create_listing(
        &mut self,
        seller: &str,
        inventory: &mut Vec<InventoryItem>,
        item_id: &str,
        qty: u32,
        price: u64,
        now: DateTime<Utc>,
    ) -> RealmResult<String> {
        if qty == 0 {
            return Err(RealmError::InvalidAmount(0));
        }
        if price == 0 {
            return Err(RealmError::InvalidAmount(0));
        }
        let item = inventory
            .iter()
            .find(|s| s.id == item_id)
            .map(InventoryItem::def)
            .ok_or_else(|| RealmError::InsufficientItems {
                item_id: item_id.to_string(),
                have: 0,
                need: qty,
            })?;

        remove_item(inventory, item_id, qty)?;

        let id = Uuid::new_v4().to_string();
        info!("{} listed {}x {} for {}", escape_log(seller), qty, item.name, price);
        self.listings.push(MarketListing {
            id: id.clone(),
            seller: seller.to_string(),
            item,
            qty,
            price,
            listed_at: now,
        });
        Ok(id)
    }

    /// Buy a whole listing. The buyer pays `price`, receives the items, and
    /// the seller's proceeds grow by `price`.
    pub fn buy(
        &mut self,
        buyer: &str,
        ledger: &mut TokenLedger,
        inventory: &mut Vec<InventoryItem>,
        listing_id: &str,
    ) -> RealmResult<MarketListing> {
        let idx = self
            .listings
            .iter()
            .position(|l| l.id == listing_id)
            .ok_or_else(|| RealmError::UnknownListing(listing_id.to_string()))?;
        let listing = &self.listings[idx];
        if listing.seller == buyer {
            return Err(RealmError::OwnListing);
        }
        if !ledger.can_afford(listing.price) {
            return Err(RealmError::InsufficientFunds {
                have: ledger.balance(),
                need: listing.price,
            });
        }

        add_item(inventory, listing.item.with_qty(listing.qty))?;
        ledger.debit(listing.price)?;
        let listing = self.listings.remove(idx);
        *self.proceeds.entry(listing.seller.clone()).or_insert(0) += listing.price;
        info!(
            "{} bought {}x {} from {} for {}",
            escape_log(buyer),
            listing.qty,
            listing.item.name,
            escape_log(&listing.seller),
            listing.price
        );
        Ok(listing)
    }

    /// Withdraw a listing and return its items to the seller.
    pub fn cancel(
        &mut self,
        caller: &str,
        inventory: &mut Vec<InventoryItem>,
        listing_id: &str,
    ) -> RealmResult<MarketListing> {
        let idx = self
            .listings
            .iter()
            .position(|l| l.id == listing_id)
            .ok_or_else(|| RealmError::UnknownListing(listing_id.to_string()))?;
        if self.listings[idx].seller != caller {
            return Err(RealmError::NotSeller);
        }

        add_item(inventory, self.listings[idx].item.with_qty(self.listings[idx].qty))?;
        let listing = self.listings.remove(idx);
        info!("{} cancelled listing {}", escape_log(caller), listing.id);
        Ok(listing)
    }
}

pub fn format_listing(listing: &MarketListing) -> String {
    format!(
        "{} | {}x {} [{}] by {} - {}",
        listing.id,
        listing.qty,
        listing.item.name,
        listing.item.rarity,
        listing.seller,
        super::currency::format_tokens(listing.price)
    )
}
