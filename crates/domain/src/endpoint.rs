use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single network endpoint a DSN resolves to.
///
/// Load-balancing bookkeeping identifies endpoints by `host:port` (see
/// [`Endpoint::identity`]); two endpoints with the same identity are the same
/// endpoint even if their weights or metadata differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,

    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(default = "default_healthy")]
    pub healthy: bool,

    /// Unix milliseconds of the last health transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            weight: None,
            priority: None,
            healthy: true,
            last_checked: None,
            metadata: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_healthy(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    pub fn identity(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn same_identity(&self, other: &Endpoint) -> bool {
        self.host == other.host && self.port == other.port
    }

    /// Weight used by weighted selection; absent weights count as 1.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn default_healthy() -> bool {
    true
}
