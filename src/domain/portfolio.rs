//! Cash + position bookkeeping for one backtest run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::position::{Position, Trade, TradeAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityCurvePoint {
    pub date: NaiveDate,
    pub portfolio_value: f64,
}

/// What happens to a cash dividend received while LONG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividendMode {
    /// Buy more shares at the payment day's close.
    #[default]
    Reinvest,
    /// Hold as cash; swept into the next BUY.
    Accumulate,
    /// Keep in a side account that is never traded.
    Withhold,
}

impl std::str::FromStr for DividendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reinvest" => Ok(DividendMode::Reinvest),
            "accumulate" => Ok(DividendMode::Accumulate),
            "withhold" => Ok(DividendMode::Withhold),
            other => Err(format!(
                "unknown dividend mode '{other}' (expected reinvest, accumulate or withhold)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub withheld: f64,
    pub initial_capital: f64,
    pub position: Position,
    pub ledger: Vec<Trade>,
    pub equity_curve: Vec<EquityCurvePoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            withheld: 0.0,
            initial_capital,
            position: Position::default(),
            ledger: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn total_equity(&self, price: f64) -> f64 {
        self.cash + self.withheld + self.position.market_value(price)
    }

    /// Spends all tradeable cash on shares. No-op (returns false) when already long.
    pub fn buy(&mut self, date: NaiveDate, price: f64) -> bool {
        if self.position.is_long() {
            return false;
        }
        let shares = self.position.open(self.cash, price);
        self.cash = 0.0;
        self.ledger.push(Trade {
            date,
            action: TradeAction::Buy,
            price,
            shares,
            notional_after: self.total_equity(price),
        });
        true
    }

    /// Liquidates the position. No-op (returns false) when flat.
    pub fn sell(&mut self, date: NaiveDate, price: f64) -> bool {
        if !self.position.is_long() {
            return false;
        }
        let (shares, proceeds) = self.position.close(price);
        self.cash += proceeds;
        self.ledger.push(Trade {
            date,
            action: TradeAction::Sell,
            price,
            shares,
            notional_after: self.total_equity(price),
        });
        true
    }

    /// Applies a per-share dividend paid at `price`. Only a long position earns it.
    pub fn receive_dividend(&mut self, per_share: f64, price: f64, mode: DividendMode) {
        if !self.position.is_long() || per_share <= 0.0 {
            return;
        }
        let amount = self.position.shares * per_share;
        match mode {
            DividendMode::Reinvest => {
                self.position.add_shares(amount, price);
            }
            DividendMode::Accumulate => self.cash += amount,
            DividendMode::Withhold => self.withheld += amount,
        }
    }

    pub fn record_equity(&mut self, date: NaiveDate, price: f64) {
        let portfolio_value = self.total_equity(price);
        self.equity_curve.push(EquityCurvePoint {
            date,
            portfolio_value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn new_portfolio() {
        let portfolio = Portfolio::new(1.0);
        assert_abs_diff_eq!(portfolio.cash, 1.0);
        assert!(!portfolio.position.is_long());
        assert!(portfolio.ledger.is_empty());
        assert!(portfolio.equity_curve.is_empty());
    }

    #[test]
    fn buy_then_sell_round_trip() {
        let mut portfolio = Portfolio::new(1.0);
        assert!(portfolio.buy(date(2), 2.0));
        assert_abs_diff_eq!(portfolio.position.shares, 0.5);
        assert_abs_diff_eq!(portfolio.ledger[0].notional_after, 1.0);

        assert!(portfolio.sell(date(3), 3.0));
        assert_abs_diff_eq!(portfolio.cash, 1.5);
        assert_eq!(portfolio.ledger.len(), 2);
        assert_eq!(portfolio.ledger[1].action, TradeAction::Sell);
        assert_abs_diff_eq!(portfolio.ledger[1].notional_after, 1.5);
    }

    #[test]
    fn buy_while_long_is_ignored() {
        let mut portfolio = Portfolio::new(1.0);
        portfolio.buy(date(2), 2.0);
        assert!(!portfolio.buy(date(3), 1.0));
        assert_eq!(portfolio.ledger.len(), 1);
    }

    #[test]
    fn sell_while_flat_is_ignored() {
        let mut portfolio = Portfolio::new(1.0);
        assert!(!portfolio.sell(date(2), 2.0));
        assert!(portfolio.ledger.is_empty());
    }

    #[test]
    fn dividend_reinvest_adds_shares() {
        let mut portfolio = Portfolio::new(100.0);
        portfolio.buy(date(2), 10.0);
        portfolio.receive_dividend(0.5, 10.0, DividendMode::Reinvest);
        // 10 shares × 0.5 = 5.0 cash → 0.5 shares at 10
        assert_abs_diff_eq!(portfolio.position.shares, 10.5);
        assert_abs_diff_eq!(portfolio.total_equity(10.0), 105.0);
        assert_eq!(portfolio.ledger.len(), 1);
    }

    #[test]
    fn dividend_accumulate_is_swept_into_next_buy() {
        let mut portfolio = Portfolio::new(100.0);
        portfolio.buy(date(2), 10.0);
        portfolio.receive_dividend(0.5, 10.0, DividendMode::Accumulate);
        assert_abs_diff_eq!(portfolio.cash, 5.0);

        portfolio.sell(date(3), 10.0);
        assert_abs_diff_eq!(portfolio.cash, 105.0);
        portfolio.buy(date(4), 10.0);
        assert_abs_diff_eq!(portfolio.position.shares, 10.5);
    }

    #[test]
    fn dividend_withhold_is_never_traded() {
        let mut portfolio = Portfolio::new(100.0);
        portfolio.buy(date(2), 10.0);
        portfolio.receive_dividend(0.5, 10.0, DividendMode::Withhold);
        portfolio.sell(date(3), 10.0);
        portfolio.buy(date(4), 10.0);
        assert_abs_diff_eq!(portfolio.position.shares, 10.0);
        assert_abs_diff_eq!(portfolio.total_equity(10.0), 105.0);
    }

    #[test]
    fn dividend_while_flat_is_ignored() {
        let mut portfolio = Portfolio::new(100.0);
        portfolio.receive_dividend(1.0, 10.0, DividendMode::Reinvest);
        assert_abs_diff_eq!(portfolio.total_equity(10.0), 100.0);
    }

    #[test]
    fn record_equity_uses_close() {
        let mut portfolio = Portfolio::new(1.0);
        portfolio.record_equity(date(1), 5.0);
        portfolio.buy(date(2), 5.0);
        portfolio.record_equity(date(2), 5.0);
        portfolio.record_equity(date(3), 6.0);
        let values: Vec<f64> = portfolio
            .equity_curve
            .iter()
            .map(|p| p.portfolio_value)
            .collect();
        assert_abs_diff_eq!(values[0], 1.0);
        assert_abs_diff_eq!(values[1], 1.0);
        assert_abs_diff_eq!(values[2], 1.2, epsilon = 1e-12);
    }

    #[test]
    fn dividend_mode_parses() {
        assert_eq!("reinvest".parse::<DividendMode>(), Ok(DividendMode::Reinvest));
        assert_eq!(" Accumulate ".parse::<DividendMode>(), Ok(DividendMode::Accumulate));
        assert_eq!("withhold".parse::<DividendMode>(), Ok(DividendMode::Withhold));
        assert!("drip".parse::<DividendMode>().is_err());
    }
}
