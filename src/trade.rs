//! Core market event types: grades, timestamps and trades
use super::error::ConstructionError;
use super::utils::{IdGenerator, Uuid7Ids};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Result<Self, ConstructionError> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
            .ok_or_else(|| {
                ConstructionError::InvalidDate(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{min:02}:{sec:02}"
                ))
            })
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
    /// `None` when the result falls outside chrono's representable range.
    pub fn checked_add(&self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Self)
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

// encoded as [secs, nanos] so every chrono-representable instant survives
impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.array(2)?
            .i64(self.0.timestamp())?
            .u32(self.0.timestamp_subsec_nanos())?
            .ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        if d.array()? != Some(2) {
            return Err(minicbor::decode::Error::message(
                "expected timestamp as [secs, nanos]",
            ));
        }
        let secs = d.i64()?;
        let nsecs = d.u32()?;

        DateTime::from_timestamp(secs, nsecs)
            .map(TimeStamp)
            .ok_or(minicbor::decode::Error::message(
                "timestamp out of range for utc",
            ))
    }
}

/// A named crude stream. Two grades are the same grade iff their names match.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grade {
    #[n(0)]
    name: String,
}

impl Grade {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Delivery terms
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Terms {
    #[n(0)]
    FOB,
    #[n(1)]
    CIF,
    #[n(2)]
    DAP,
}

/// What kind of event a trade records. Bids and offers are live interest,
/// buys and sells are confirmed deals.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BuySellInd {
    #[n(0)]
    Bid,
    #[n(1)]
    Offer,
    #[n(2)]
    Buy,
    #[n(3)]
    Sell,
}

impl BuySellInd {
    pub fn is_confirmed(self) -> bool {
        matches!(self, BuySellInd::Buy | BuySellInd::Sell)
    }
}

impl FromStr for Terms {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FOB" => Ok(Terms::FOB),
            "CIF" => Ok(Terms::CIF),
            "DAP" => Ok(Terms::DAP),
            _ => Err(ConstructionError::UnknownTerms(s.to_string())),
        }
    }
}

impl fmt::Display for Terms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Terms::FOB => "FOB",
            Terms::CIF => "CIF",
            Terms::DAP => "DAP",
        };
        f.write_str(s)
    }
}

impl FromStr for BuySellInd {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bid" => Ok(BuySellInd::Bid),
            "offer" => Ok(BuySellInd::Offer),
            "buy" => Ok(BuySellInd::Buy),
            "sell" => Ok(BuySellInd::Sell),
            _ => Err(ConstructionError::UnknownIndicator(s.to_string())),
        }
    }
}

impl fmt::Display for BuySellInd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuySellInd::Bid => "bid",
            BuySellInd::Offer => "offer",
            BuySellInd::Buy => "buy",
            BuySellInd::Sell => "sell",
        };
        f.write_str(s)
    }
}

/// One priced event for a grade. Only constructed through [`TradeBuilder`],
/// so every instance has a positive volume and a finite differential.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone)]
pub struct Trade {
    #[n(0)]
    id: String,
    #[n(1)]
    grade: Grade,
    #[n(2)]
    location: String, // delivery point
    #[n(3)]
    terms: Terms,
    #[n(4)]
    kb: i64, // thousand barrels
    #[n(5)]
    expiry: TimeStamp,
    #[n(6)]
    formula: String, // e.g. "Dated Brent"
    #[n(7)]
    differential: f64,
    #[n(8)]
    buy_sell_ind: BuySellInd,
    #[n(9)]
    counterparty: String,
    #[n(10)]
    date: TimeStamp, // when the event was recorded
    #[n(11)]
    deal_date: Option<TimeStamp>, // set once confirmed
}

impl Trade {
    pub fn builder() -> TradeBuilder {
        TradeBuilder::new()
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn grade(&self) -> &Grade {
        &self.grade
    }
    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn terms(&self) -> Terms {
        self.terms
    }
    pub fn kb(&self) -> i64 {
        self.kb
    }
    pub fn expiry(&self) -> &TimeStamp {
        &self.expiry
    }
    pub fn formula(&self) -> &str {
        &self.formula
    }
    pub fn differential(&self) -> f64 {
        self.differential
    }
    pub fn buy_sell_ind(&self) -> BuySellInd {
        self.buy_sell_ind
    }
    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }
    pub fn date(&self) -> &TimeStamp {
        &self.date
    }
    pub fn deal_date(&self) -> Option<&TimeStamp> {
        self.deal_date.as_ref()
    }
    pub fn is_confirmed(&self) -> bool {
        self.buy_sell_ind.is_confirmed()
    }

    /// Serialise into CBOR and return the sha256 hex digest alongside the bytes.
    pub fn finalise(&self) -> anyhow::Result<(String, Vec<u8>)> {
        let contents = minicbor::to_vec(self)?;
        let hash = sha256::digest(&contents);

        Ok((hash, contents))
    }

    /// Inverse of [`Trade::finalise`]. Volume and differential are checked again
    /// since the bytes may come from outside the crate.
    pub fn from_cbor(bytes: &[u8]) -> anyhow::Result<Trade> {
        let trade: Trade = minicbor::decode(bytes)?;
        check_volume(trade.kb)?;
        check_differential(trade.differential)?;

        Ok(trade)
    }
}

impl PartialEq for Trade {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Trade {}

fn check_volume(kb: i64) -> Result<(), ConstructionError> {
    if kb <= 0 {
        return Err(ConstructionError::InvalidVolume(kb));
    }
    Ok(())
}

fn check_differential(differential: f64) -> Result<(), ConstructionError> {
    if !differential.is_finite() {
        return Err(ConstructionError::InvalidDifferential(differential));
    }
    Ok(())
}

// used for constructing trades, every field is validated on build
#[derive(Debug, Default, Clone)]
pub struct TradeBuilder {
    id: Option<String>,
    grade: Option<Grade>,
    location: Option<String>,
    terms: Option<Terms>,
    kb: Option<i64>,
    expiry: Option<TimeStamp>,
    formula: Option<String>,
    differential: Option<f64>,
    buy_sell_ind: Option<BuySellInd>,
    counterparty: Option<String>,
    date: Option<TimeStamp>,
    deal_date: Option<TimeStamp>,
}

impl TradeBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
    pub fn set_grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }
    pub fn set_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
    pub fn set_terms(mut self, terms: Terms) -> Self {
        self.terms = Some(terms);
        self
    }
    pub fn set_kb(mut self, kb: i64) -> Self {
        self.kb = Some(kb);
        self
    }
    pub fn set_expiry(mut self, expiry: TimeStamp) -> Self {
        self.expiry = Some(expiry);
        self
    }
    pub fn set_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }
    pub fn set_differential(mut self, differential: f64) -> Self {
        self.differential = Some(differential);
        self
    }
    pub fn set_buy_sell_ind(mut self, ind: BuySellInd) -> Self {
        self.buy_sell_ind = Some(ind);
        self
    }
    pub fn set_counterparty(mut self, counterparty: impl Into<String>) -> Self {
        self.counterparty = Some(counterparty.into());
        self
    }
    pub fn set_date(mut self, date: TimeStamp) -> Self {
        self.date = Some(date);
        self
    }
    pub fn set_deal_date(mut self, date: TimeStamp) -> Self {
        self.deal_date = Some(date);
        self
    }

    /// Build with a fresh uuid7 id when none was set.
    pub fn build(self) -> Result<Trade, ConstructionError> {
        self.build_with(&mut Uuid7Ids)
    }

    /// Build, drawing an id from `ids` only if the caller did not supply one.
    pub fn build_with(self, ids: &mut impl IdGenerator) -> Result<Trade, ConstructionError> {
        let grade = self.grade.ok_or(ConstructionError::MissingField("grade"))?;
        let location = self
            .location
            .ok_or(ConstructionError::MissingField("location"))?;
        let terms = self.terms.ok_or(ConstructionError::MissingField("terms"))?;
        let kb = self.kb.ok_or(ConstructionError::MissingField("kb"))?;
        let expiry = self.expiry.ok_or(ConstructionError::MissingField("expiry"))?;
        let formula = self
            .formula
            .ok_or(ConstructionError::MissingField("formula"))?;
        let differential = self
            .differential
            .ok_or(ConstructionError::MissingField("differential"))?;
        let buy_sell_ind = self
            .buy_sell_ind
            .ok_or(ConstructionError::MissingField("buy_sell_ind"))?;
        let counterparty = self
            .counterparty
            .ok_or(ConstructionError::MissingField("counterparty"))?;

        check_volume(kb)?;
        check_differential(differential)?;

        let id = match self.id {
            Some(id) => id,
            None => ids.next_id()?,
        };

        // advisory only, deal_date belongs to confirmed trades
        match (buy_sell_ind.is_confirmed(), self.deal_date.is_some()) {
            (true, false) => {
                tracing::warn!(id = %id, grade = %grade, ind = %buy_sell_ind, "Confirmed trade has no deal date")
            }
            (false, true) => {
                tracing::warn!(id = %id, grade = %grade, ind = %buy_sell_ind, "Live order carries a deal date")
            }
            _ => {}
        }

        Ok(Trade {
            id,
            grade,
            location,
            terms,
            kb,
            expiry,
            formula,
            differential,
            buy_sell_ind,
            counterparty,
            date: self.date.unwrap_or_default(),
            deal_date: self.deal_date,
        })
    }
}
