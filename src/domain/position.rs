//! Single-security position and trade ledger entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Holding {
    #[default]
    Flat,
    Long,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    pub holding: Holding,
    pub shares: f64,
    pub cost_basis_per_share: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.holding == Holding::Long
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    /// Opens a long position by spending `cash` at `price`; returns shares bought.
    pub fn open(&mut self, cash: f64, price: f64) -> f64 {
        let shares = cash / price;
        self.holding = Holding::Long;
        self.shares = shares;
        self.cost_basis_per_share = price;
        shares
    }

    /// Closes the position at `price`; returns `(shares sold, proceeds)`.
    pub fn close(&mut self, price: f64) -> (f64, f64) {
        let shares = self.shares;
        *self = Position::default();
        (shares, shares * price)
    }

    /// Buys additional shares with `amount` of cash at `price` without
    /// changing the holding state. Cost basis becomes the weighted average.
    pub fn add_shares(&mut self, amount: f64, price: f64) -> f64 {
        let added = amount / price;
        let total_cost = self.shares * self.cost_basis_per_share + amount;
        self.shares += added;
        if self.shares > 0.0 {
            self.cost_basis_per_share = total_cost / self.shares;
        }
        added
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub shares: f64,
    /// Portfolio value immediately after the trade.
    pub notional_after: f64,
}
