use std::fmt;

use crate::config::SIMULATION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Bought"),
            TradeSide::Sell => write!(f, "Sold"),
        }
    }
}

/// A filled one-share trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub side: TradeSide,
    pub price: f64,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 1 share at ${:.2}", self.side, self.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeError {
    InsufficientCash { cash: f64, price: f64 },
    NoShares,
    InvalidPrice(f64),
    /// Live mode before the first bar for the current symbol has landed.
    NoQuote,
}

impl fmt::Display for TradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeError::InsufficientCash { cash, price } => {
                write!(f, "Insufficient cash: ${:.2} available, ${:.2} needed", cash, price)
            }
            TradeError::NoShares => write!(f, "No shares to sell"),
            TradeError::InvalidPrice(price) => write!(f, "Cannot trade at price {}", price),
            TradeError::NoQuote => write!(f, "No quote yet for this symbol"),
        }
    }
}

impl std::error::Error for TradeError {}

/// Single running position: cash, share count and a log of fills.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: f64,
    shares: u32,
    log: Vec<Transaction>,
}

impl Portfolio {
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            shares: 0,
            log: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn shares(&self) -> u32 {
        self.shares
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Cash plus shares marked at `price`.
    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    pub fn buy(&mut self, price: f64) -> Result<Transaction, TradeError> {
        Self::check_price(price)?;
        if self.cash < price {
            return Err(TradeError::InsufficientCash {
                cash: self.cash,
                price,
            });
        }
        self.cash -= price;
        self.shares += 1;
        Ok(self.record(TradeSide::Buy, price))
    }

    pub fn sell(&mut self, price: f64) -> Result<Transaction, TradeError> {
        Self::check_price(price)?;
        if self.shares == 0 {
            return Err(TradeError::NoShares);
        }
        self.cash += price;
        self.shares -= 1;
        Ok(self.record(TradeSide::Sell, price))
    }

    fn check_price(price: f64) -> Result<(), TradeError> {
        if price.is_finite() && price > 0.0 {
            Ok(())
        } else {
            Err(TradeError::InvalidPrice(price))
        }
    }

    fn record(&mut self, side: TradeSide, price: f64) -> Transaction {
        let tx = Transaction { side, price };
        self.log.push(tx.clone());
        tx
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(SIMULATION.initial_cash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_then_sell_round_trip() {
        let mut p = Portfolio::new(1_000.0);
        let bought = p.buy(250.0).unwrap();
        assert_eq!(bought.to_string(), "Bought 1 share at $250.00");
        assert_eq!(p.cash(), 750.0);
        assert_eq!(p.shares(), 1);
        assert_eq!(p.value(300.0), 1_050.0);

        let sold = p.sell(300.0).unwrap();
        assert_eq!(sold.to_string(), "Sold 1 share at $300.00");
        assert_eq!(p.cash(), 1_050.0);
        assert_eq!(p.shares(), 0);
        assert_eq!(p.transactions().len(), 2);
    }

    #[test]
    fn test_buy_without_cash_leaves_state_untouched() {
        let mut p = Portfolio::new(99.0);
        let before = p.clone();
        assert_eq!(
            p.buy(100.0),
            Err(TradeError::InsufficientCash {
                cash: 99.0,
                price: 100.0
            })
        );
        assert_eq!(p, before);
    }

    #[test]
    fn test_buy_with_exact_cash_is_allowed() {
        let mut p = Portfolio::new(100.0);
        assert!(p.buy(100.0).is_ok());
        assert_eq!(p.cash(), 0.0);
    }

    #[test]
    fn test_sell_without_shares_is_rejected() {
        let mut p = Portfolio::default();
        assert_eq!(p.sell(100.0), Err(TradeError::NoShares));
        assert_eq!(p.cash(), SIMULATION.initial_cash);
        assert!(p.transactions().is_empty());
    }

    #[test]
    fn test_non_finite_price_is_rejected() {
        let mut p = Portfolio::default();
        assert!(matches!(p.buy(f64::NAN), Err(TradeError::InvalidPrice(_))));
        assert!(p.transactions().is_empty());
    }
}
