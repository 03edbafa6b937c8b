//! Identifier generation for trades

use super::error::ConstructionError;
use bech32::Bech32m;
use uuid7::uuid7;

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Source of trade identifiers. Called once per trade that arrives without an id.
pub trait IdGenerator {
    fn next_id(&mut self) -> Result<String, ConstructionError>;
}

/// Time-ordered UUIDs in their hyphenated textual form.
#[derive(Debug, Default, Clone, Copy)]
pub struct Uuid7Ids;

impl IdGenerator for Uuid7Ids {
    fn next_id(&mut self) -> Result<String, ConstructionError> {
        Ok(uuid7().to_string())
    }
}

/// uuid7 bytes encoded as bech32m under a human readable prefix, e.g. `trade_1...`
#[derive(Debug, Clone)]
pub struct Bech32Ids {
    hrp: String,
}

impl Bech32Ids {
    pub fn new(hrp: impl Into<String>) -> Self {
        Self { hrp: hrp.into() }
    }
}

impl IdGenerator for Bech32Ids {
    fn next_id(&mut self) -> Result<String, ConstructionError> {
        new_uuid_to_bech32(&self.hrp).map_err(|e| ConstructionError::IdGeneration(e.to_string()))
    }
}

/// Deterministic `prefix-0`, `prefix-1`, ... ids. Handy in tests.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> Result<String, ConstructionError> {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        Ok(id)
    }
}
