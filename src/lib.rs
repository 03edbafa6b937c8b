//! Over-the-counter crude market: bids, offers and confirmed trades grouped
//! by grade, and the present value derived from them.

pub mod error;
pub mod grade_book;
pub mod market;
pub mod report;
pub mod trade;
pub mod utils;

pub use error::{ConstructionError, MarketError};
pub use grade_book::{GradeBook, Valuation, ValuationBasis};
pub use market::{DuplicateGradePolicy, Market, MarketConfig};
pub use report::ValuationReport;
pub use trade::{BuySellInd, Grade, Terms, TimeStamp, Trade, TradeBuilder};
