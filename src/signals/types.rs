use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One batch of raw operational signals handed to the pipeline by a driver.
///
/// Every bucket is optional on the wire. Records are opaque JSON; the Observer only
/// reads the few fields it derives stats from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSignals {
    pub tickets: Option<Vec<Value>>,
    pub errors: Option<Vec<Value>>,
    pub checkouts: Option<Vec<Value>>,
    pub webhooks: Option<Vec<Value>>,
    pub migration_states: Option<Vec<Value>>,
}

impl RawSignals {
    pub fn tickets(mut self, records: Vec<Value>) -> Self {
        self.tickets = Some(records);
        self
    }

    pub fn errors(mut self, records: Vec<Value>) -> Self {
        self.errors = Some(records);
        self
    }

    pub fn checkouts(mut self, records: Vec<Value>) -> Self {
        self.checkouts = Some(records);
        self
    }

    pub fn webhooks(mut self, records: Vec<Value>) -> Self {
        self.webhooks = Some(records);
        self
    }

    pub fn migration_states(mut self, records: Vec<Value>) -> Self {
        self.migration_states = Some(records);
        self
    }
}
