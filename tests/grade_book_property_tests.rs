//! Property-based tests for GradeBook queries
//!
//! Books are generated from random mixes of bids, offers and confirmed deals
//! and every selection query is checked against a brute-force scan of the
//! same trades.

use proptest::prelude::*;
use crude_market::{
    BuySellInd, Grade, GradeBook, Terms, TimeStamp, Trade, ValuationBasis,
    utils::SequentialIds,
};

// PROPERTY TEST STRATEGIES

#[derive(Debug, Clone)]
struct Event {
    ind: BuySellInd,
    differential: f64,
    day: u32,
    deal_day: Option<u32>,
}

fn indicator_strategy() -> impl Strategy<Value = BuySellInd> {
    prop_oneof![
        Just(BuySellInd::Bid),
        Just(BuySellInd::Offer),
        Just(BuySellInd::Buy),
        Just(BuySellInd::Sell),
    ]
}

/// Differentials on a cent grid, so ties between trades show up often
fn differential_strategy() -> impl Strategy<Value = f64> {
    (-500i32..=500).prop_map(|cents| cents as f64 / 100.0)
}

/// Bids and offers never carry a deal date; most buys and sells do, some
/// arrive without one
fn event_strategy() -> impl Strategy<Value = Event> {
    (
        indicator_strategy(),
        differential_strategy(),
        1u32..=28,
        1u32..=28,
        prop::bool::weighted(0.8),
    )
        .prop_map(|(ind, differential, day, deal_day, dated)| Event {
            ind,
            differential,
            day,
            deal_day: (ind.is_confirmed() && dated).then_some(deal_day),
        })
}

fn book_from(events: &[Event]) -> GradeBook {
    let mut ids = SequentialIds::new("p");
    let mut book = GradeBook::new("Forcados");

    for e in events {
        let mut builder = Trade::builder()
            .set_grade(Grade::new("Forcados"))
            .set_location("Forcados Terminal")
            .set_terms(Terms::FOB)
            .set_kb(500)
            .set_expiry(TimeStamp::new_with(2024, 12, 31, 0, 0, 0).unwrap())
            .set_formula("Dated Brent")
            .set_differential(e.differential)
            .set_buy_sell_ind(e.ind)
            .set_counterparty("cp")
            .set_date(TimeStamp::new_with(2024, 6, e.day, 0, 0, 0).unwrap());
        if let Some(deal_day) = e.deal_day {
            builder = builder.set_deal_date(TimeStamp::new_with(2024, 7, deal_day, 0, 0, 0).unwrap());
        }
        book.add_trade(builder.build_with(&mut ids).unwrap());
    }
    book
}

// PROPERTY TESTS
proptest! {
    /// Property: the latest order is dated no earlier than any other trade
    #[test]
    fn prop_latest_order_has_max_date(events in prop::collection::vec(event_strategy(), 1..40)) {
        let book = book_from(&events);
        let latest = book.get_latest_order().unwrap();

        for t in book.trades() {
            prop_assert!(latest.date() >= t.date());
        }
    }

    /// Property: the latest order is the first trade carrying the max date
    #[test]
    fn prop_latest_order_tie_goes_to_first(events in prop::collection::vec(event_strategy(), 1..40)) {
        let book = book_from(&events);
        let latest = book.get_latest_order().unwrap();
        let first = book.trades().iter().find(|t| t.date() == latest.date()).unwrap();

        prop_assert_eq!(latest.id(), first.id());
    }

    /// Property: books of bids and offers only have no latest trade
    #[test]
    fn prop_no_deal_dates_means_no_latest_trade(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let live: Vec<Event> = events.into_iter().filter(|e| !e.ind.is_confirmed()).collect();
        let book = book_from(&live);

        prop_assert!(book.get_latest_trade().is_none());
    }

    /// Property: the latest trade has the max deal date among dated trades
    #[test]
    fn prop_latest_trade_has_max_deal_date(events in prop::collection::vec(event_strategy(), 0..40)) {
        let book = book_from(&events);

        match book.get_latest_trade() {
            Some(latest) => {
                let deal = latest.deal_date().unwrap();
                for t in book.trades() {
                    if let Some(other) = t.deal_date() {
                        prop_assert!(deal >= other);
                    }
                }
            }
            None => prop_assert!(book.trades().iter().all(|t| t.deal_date().is_none())),
        }
    }

    /// Property: best bid dominates every bid, best offer undercuts every offer
    #[test]
    fn prop_best_bid_and_offer_bound_their_side(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let book = book_from(&events);

        if let Some(best) = book.get_best_bid() {
            prop_assert_eq!(best.buy_sell_ind(), BuySellInd::Bid);
            for t in book.trades().iter().filter(|t| t.buy_sell_ind() == BuySellInd::Bid) {
                prop_assert!(best.differential() >= t.differential());
            }
        } else {
            prop_assert!(!events.iter().any(|e| e.ind == BuySellInd::Bid));
        }

        if let Some(best) = book.get_best_offer() {
            prop_assert_eq!(best.buy_sell_ind(), BuySellInd::Offer);
            for t in book.trades().iter().filter(|t| t.buy_sell_ind() == BuySellInd::Offer) {
                prop_assert!(best.differential() <= t.differential());
            }
        } else {
            prop_assert!(!events.iter().any(|e| e.ind == BuySellInd::Offer));
        }
    }

    /// Property: present value follows trade, then bid, then offer
    #[test]
    fn prop_present_value_follows_fallback_chain(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let book = book_from(&events);
        let expected = book
            .get_latest_trade()
            .or_else(|| book.get_best_bid())
            .or_else(|| book.get_best_offer())
            .map(|t| t.differential());

        prop_assert_eq!(book.get_present_value(), expected);

        if let Some(valuation) = book.get_valuation() {
            let has_deal = events.iter().any(|e| e.deal_day.is_some());
            prop_assert_eq!(valuation.basis == ValuationBasis::LatestTrade, has_deal);
        }
    }

    /// Property: queries never mutate the book
    #[test]
    fn prop_queries_are_repeatable(events in prop::collection::vec(event_strategy(), 0..20)) {
        let book = book_from(&events);
        let first = book.get_present_value();

        prop_assert_eq!(book.get_present_value(), first);
        prop_assert_eq!(book.len(), events.len());
    }
}
