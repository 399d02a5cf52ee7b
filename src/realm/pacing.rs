//! Presentation pacing on tokio timers.
//!
//! The opponent's reply and a craft both complete after a short delay.
//! A pending delay can be cancelled through a [`PaceCanceller`]; a cancelled
//! opponent turn abandons the battle, so its ticket can never apply later.

use std::time::Duration;

use log::debug;
use tokio::sync::watch;

use super::battle::TurnTicket;
use super::errors::{RealmError, RealmResult};
use super::rng::RealmRng;
use super::store::{ActionReport, GameStore};
use super::types::InventoryItem;

/// Delays applied by the paced helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub opponent_delay: Duration,
    pub craft_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            opponent_delay: Duration::from_millis(1000),
            craft_delay: Duration::from_millis(1500),
        }
    }
}

impl Pacing {
    pub fn from_millis(opponent_delay_ms: u64, craft_delay_ms: u64) -> Self {
        Self {
            opponent_delay: Duration::from_millis(opponent_delay_ms),
            craft_delay: Duration::from_millis(craft_delay_ms),
        }
    }

    /// No waiting at all.
    pub fn immediate() -> Self {
        Self::from_millis(0, 0)
    }
}

/// Outcome of a paced step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paced<T> {
    Done(T),
    Cancelled,
}

/// Sender half: cancels every pending wait on its tokens.
#[derive(Debug)]
pub struct PaceCanceller {
    tx: watch::Sender<bool>,
}

/// Receiver half handed to the paced helpers.
#[derive(Debug, Clone)]
pub struct PaceToken {
    rx: watch::Receiver<bool>,
}

pub fn cancel_pair() -> (PaceCanceller, PaceToken) {
    let (tx, rx) = watch::channel(false);
    (PaceCanceller { tx }, PaceToken { rx })
}

impl PaceCanceller {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Clear a previous cancellation so the tokens can be reused.
    pub fn reset(&self) {
        let _ = self.tx.send(false);
    }
}

impl PaceToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Never resolves if the canceller is dropped
    /// without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Wait out the opponent delay, then resolve the owed turn. On
/// cancellation the battle is left and the ticket goes stale.
pub async fn paced_opponent_turn<R: RealmRng>(
    store: &mut GameStore<R>,
    ticket: TurnTicket,
    pacing: &Pacing,
    token: &mut PaceToken,
) -> RealmResult<Paced<ActionReport>> {
    tokio::select! {
        _ = tokio::time::sleep(pacing.opponent_delay) => {
            store.resolve_opponent_turn(ticket).map(Paced::Done)
        }
        _ = token.cancelled() => {
            debug!("opponent turn for battle {} cancelled", ticket.battle_id);
            store.leave_battle();
            Ok(Paced::Cancelled)
        }
    }
}

/// Check the recipe up front, wait out the craft delay, then craft.
/// A cancelled craft consumes nothing.
pub async fn paced_craft<R: RealmRng>(
    store: &mut GameStore<R>,
    recipe_id: &str,
    pacing: &Pacing,
    token: &mut PaceToken,
) -> RealmResult<Paced<InventoryItem>> {
    if !store.can_craft(recipe_id)? {
        return Err(RealmError::NotCraftable {
            recipe_id: recipe_id.to_string(),
        });
    }
    tokio::select! {
        _ = tokio::time::sleep(pacing.craft_delay) => {
            store.craft(recipe_id).map(Paced::Done)
        }
        _ = token.cancelled() => {
            debug!("craft {} cancelled", recipe_id);
            Ok(Paced::Cancelled)
        }
    }
}
