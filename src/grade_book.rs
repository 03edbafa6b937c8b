//! Per-grade collection of trades and the queries that value it
use super::trade::{BuySellInd, Grade, Trade};
use std::cmp::Ordering;

/// Which step of the fallback chain produced a present value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationBasis {
    LatestTrade,
    BestBid,
    BestOffer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub value: f64,
    pub basis: ValuationBasis,
}

/// All trades recorded for one grade. Insertion order carries no meaning
/// beyond breaking ties between otherwise equal candidates.
#[derive(Debug, Clone)]
pub struct GradeBook {
    grade: Grade,
    trades: Vec<Trade>,
}

impl GradeBook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            grade: Grade::new(name),
            trades: vec![],
        }
    }
    pub fn name(&self) -> &str {
        self.grade.name()
    }
    pub fn grade(&self) -> &Grade {
        &self.grade
    }
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }
    pub fn len(&self) -> usize {
        self.trades.len()
    }
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn add_trade(&mut self, trade: Trade) {
        if trade.grade() != &self.grade {
            tracing::warn!(
                book = %self.grade,
                trade_grade = %trade.grade(),
                id = trade.id(),
                "Trade grade does not match its book"
            );
        }
        tracing::debug!(book = %self.grade, id = trade.id(), ind = %trade.buy_sell_ind(), "Added trade");
        self.trades.push(trade);
    }

    /// Most recently recorded event of any kind.
    pub fn get_latest_order(&self) -> Option<&Trade> {
        first_max_by(self.trades.iter(), |a, b| a.date().cmp(b.date()))
    }

    /// Most recent confirmed deal. Trades without a deal date never win.
    pub fn get_latest_trade(&self) -> Option<&Trade> {
        first_max_by(
            self.trades.iter().filter(|t| t.deal_date().is_some()),
            |a, b| a.deal_date().cmp(&b.deal_date()),
        )
    }

    /// Highest bid.
    pub fn get_best_bid(&self) -> Option<&Trade> {
        first_max_by(self.of_kind(BuySellInd::Bid), |a, b| {
            a.differential().total_cmp(&b.differential())
        })
    }

    /// Lowest offer.
    pub fn get_best_offer(&self) -> Option<&Trade> {
        self.of_kind(BuySellInd::Offer)
            .min_by(|a, b| a.differential().total_cmp(&b.differential()))
    }

    /// Latest trade, else best bid, else best offer.
    pub fn get_valuation(&self) -> Option<Valuation> {
        let valuation = if let Some(trade) = self.get_latest_trade() {
            Valuation {
                value: trade.differential(),
                basis: ValuationBasis::LatestTrade,
            }
        } else if let Some(bid) = self.get_best_bid() {
            Valuation {
                value: bid.differential(),
                basis: ValuationBasis::BestBid,
            }
        } else if let Some(offer) = self.get_best_offer() {
            Valuation {
                value: offer.differential(),
                basis: ValuationBasis::BestOffer,
            }
        } else {
            tracing::trace!(book = %self.grade, "No market data");
            return None;
        };

        tracing::trace!(book = %self.grade, value = valuation.value, basis = ?valuation.basis, "Valued grade");
        Some(valuation)
    }

    pub fn get_present_value(&self) -> Option<f64> {
        self.get_valuation().map(|v| v.value)
    }

    fn of_kind(&self, ind: BuySellInd) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(move |t| t.buy_sell_ind() == ind)
    }
}

// `Iterator::max_by` keeps the last of equal maxima, ties here go to the first
fn first_max_by<'a, I, F>(iter: I, mut cmp: F) -> Option<&'a Trade>
where
    I: Iterator<Item = &'a Trade>,
    F: FnMut(&Trade, &Trade) -> Ordering,
{
    iter.reduce(|best, t| {
        if cmp(t, best) == Ordering::Greater {
            t
        } else {
            best
        }
    })
}
