//! Point-in-time snapshot of every grade's present value, in a form other
//! layers can store or ship.
use super::trade::TimeStamp;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode)]
pub struct ValuationReport {
    #[n(0)]
    pub generated_at: TimeStamp,
    #[n(1)]
    pub values: BTreeMap<String, Option<f64>>, // sorted so equal reports encode identically
}

impl ValuationReport {
    pub fn from_present_values(values: HashMap<String, Option<f64>>) -> Self {
        Self {
            generated_at: TimeStamp::new(),
            values: values.into_iter().collect(),
        }
    }

    pub fn get(&self, grade: &str) -> Option<Option<f64>> {
        self.values.get(grade).copied()
    }

    /// Grades with market data, in name order.
    pub fn priced(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter_map(|(name, value)| value.map(|v| (name.as_str(), v)))
    }

    /// CBOR encoding and its sha256 hex digest.
    pub fn finalise(&self) -> anyhow::Result<(String, Vec<u8>)> {
        let cbor = minicbor::to_vec(self)?;
        let hash = sha256::digest(&cbor);

        Ok((hash, cbor))
    }

    pub fn from_cbor(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(minicbor::decode(bytes)?)
    }
}
