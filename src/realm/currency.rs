/// $REALM token ledger - balance bookkeeping and display formatting
use serde::{Deserialize, Serialize};

use super::errors::{RealmError, RealmResult};

/// Display symbol for the session currency.
pub const TOKEN_SYMBOL: &str = "$REALM";

/// Player token balance plus the lifetime-earned counter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenLedger {
    balance: u64,
    total_earned: u64,
}

impl TokenLedger {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            total_earned: 0,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Sum of every positive adjustment ever applied.
    pub fn total_earned(&self) -> u64 {
        self.total_earned
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.balance >= cost
    }

    /// Income. Counts toward `total_earned`.
    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
        self.total_earned = self.total_earned.saturating_add(amount);
    }

    /// Spend. Rejected without change when the balance is short.
    pub fn debit(&mut self, amount: u64) -> RealmResult<()> {
        if amount > self.balance {
            return Err(RealmError::InsufficientFunds {
                have: self.balance,
                need: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Signed adjustment: positive credits, negative debits.
    pub fn adjust(&mut self, amount: i64) -> RealmResult<()> {
        if amount >= 0 {
            self.credit(amount as u64);
            Ok(())
        } else {
            self.debit(amount.unsigned_abs())
        }
    }
}

// ============================================================================
// Display Formatting
// ============================================================================

/// Group digits in thousands: 18750 -> "18,750".
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a token amount for display, e.g. "1,500 $REALM".
pub fn format_tokens(amount: u64) -> String {
    format!("{} {}", group_thousands(amount), TOKEN_SYMBOL)
}

/// Format a signed change, e.g. "+120 $REALM" / "-50 $REALM".
pub fn format_token_delta(delta: i64) -> String {
    let sign = if delta < 0 { '-' } else { '+' };
    format!("{}{}", sign, format_tokens(delta.unsigned_abs()))
}

// ============================================================================
// Unit Tests
// ============================================================================
