use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// FearGreedReading - One day of the alternative.me Fear & Greed index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FearGreedReading {
    /// Index value, 0 (extreme fear) to 100 (extreme greed).
    pub value: u8,
    pub classification: String,
    pub timestamp: DateTime<Utc>,
}

/// Wire shape of one entry in the index's `data` array. Numbers arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FearGreedEntry {
    #[serde(deserialize_with = "number_or_string")]
    pub value: u64,
    pub value_classification: String,
    #[serde(deserialize_with = "number_or_string")]
    pub timestamp: u64,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// FlexReading - Output of the randomized flex meter widget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexReading {
    pub score: u8,
    pub label: String,
}
