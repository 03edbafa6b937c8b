//! The market: every registered grade book, keyed by grade name
use super::error::MarketError;
use super::grade_book::GradeBook;
use super::report::ValuationReport;
use super::trade::Trade;
use std::collections::HashMap;

/// What `add_grade` does when a book with the same name is already registered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateGradePolicy {
    /// Keep the registered book and return [`MarketError::DuplicateGrade`].
    #[default]
    Reject,
    /// Swap in the new book. Trades held by the old one are dropped.
    Replace,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    pub duplicate_grade: DuplicateGradePolicy,
}

#[derive(Debug, Default, Clone)]
pub struct Market {
    config: MarketConfig,
    grades: Vec<GradeBook>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_config(config: MarketConfig) -> Self {
        Self {
            config,
            grades: vec![],
        }
    }
    pub fn grades(&self) -> &[GradeBook] {
        &self.grades
    }
    pub fn len(&self) -> usize {
        self.grades.len()
    }
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Register a book under its own name, applying the configured duplicate policy.
    pub fn add_grade(&mut self, book: GradeBook) -> Result<(), MarketError> {
        let existing = self.grades.iter().position(|g| g.name() == book.name());

        match (existing, self.config.duplicate_grade) {
            (None, _) => {
                tracing::debug!(grade = book.name(), trades = book.len(), "Registered grade");
                self.grades.push(book);
            }
            (Some(_), DuplicateGradePolicy::Reject) => {
                return Err(MarketError::DuplicateGrade(book.name().to_string()));
            }
            (Some(idx), DuplicateGradePolicy::Replace) => {
                tracing::warn!(
                    grade = book.name(),
                    dropped_trades = self.grades[idx].len(),
                    "Replacing registered grade"
                );
                self.grades[idx] = book;
            }
        }
        Ok(())
    }

    pub fn find_grade(&self, name: &str) -> Option<&GradeBook> {
        self.grades.iter().find(|g| g.name() == name)
    }

    pub fn find_grade_mut(&mut self, name: &str) -> Option<&mut GradeBook> {
        self.grades.iter_mut().find(|g| g.name() == name)
    }

    /// Append a trade to the book registered under the trade's grade name.
    pub fn record_trade(&mut self, trade: Trade) -> Result<(), MarketError> {
        let name = trade.grade().name().to_string();
        match self.find_grade_mut(&name) {
            Some(book) => {
                book.add_trade(trade);
                Ok(())
            }
            None => Err(MarketError::UnknownGrade(name)),
        }
    }

    /// Present value of every registered grade, `None` where a grade has no market data.
    pub fn get_all_present_values(&self) -> HashMap<String, Option<f64>> {
        self.grades
            .iter()
            .map(|g| (g.name().to_string(), g.get_present_value()))
            .collect()
    }

    pub fn valuation_report(&self) -> ValuationReport {
        ValuationReport::from_present_values(self.get_all_present_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_rejected_by_default() {
        let mut market = Market::new();
        market.add_grade(GradeBook::new("Forcados")).unwrap();

        assert_eq!(
            market.add_grade(GradeBook::new("Forcados")),
            Err(MarketError::DuplicateGrade("Forcados".into()))
        );
        assert_eq!(market.len(), 1);
    }

    #[test]
    fn duplicate_replaced_when_configured() {
        let mut market = Market::with_config(MarketConfig {
            duplicate_grade: DuplicateGradePolicy::Replace,
        });
        market.add_grade(GradeBook::new("Forcados")).unwrap();
        market.add_grade(GradeBook::new("Forcados")).unwrap();

        assert_eq!(market.len(), 1);
    }

    #[test]
    fn find_grade_on_empty_market() {
        let market = Market::new();

        assert!(market.find_grade("Forcados").is_none());
        assert!(market.get_all_present_values().is_empty());
    }
}
