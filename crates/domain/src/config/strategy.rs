use serde::{Deserialize, Serialize};
use std::fmt;

/// Endpoint selection algorithm.
///
/// Names are parsed leniently: anything not listed maps to
/// [`LoadBalanceStrategy::Unrecognized`], which selects the first healthy
/// endpoint instead of failing config loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum LoadBalanceStrategy {
    #[default]
    RoundRobin,

    Random,

    Weighted,

    LeastConnections,

    PowerOfTwo,

    Unrecognized,
}

impl LoadBalanceStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round-robin",
            Self::Random => "random",
            Self::Weighted => "weighted",
            Self::LeastConnections => "least-connections",
            Self::PowerOfTwo => "power-of-two",
            Self::Unrecognized => "unrecognized",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "round-robin" | "roundrobin" => Self::RoundRobin,
            "random" => Self::Random,
            "weighted" => Self::Weighted,
            "least-connections" | "leastconnections" => Self::LeastConnections,
            "power-of-two" | "poweroftwo" | "p2c" => Self::PowerOfTwo,
            _ => Self::Unrecognized,
        }
    }
}

impl From<String> for LoadBalanceStrategy {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<LoadBalanceStrategy> for String {
    fn from(strategy: LoadBalanceStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl fmt::Display for LoadBalanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
