//! Seeds serialize as strings so JavaScript-side tooling never truncates them.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text.parse::<u64>().map_err(D::Error::custom),
        Raw::Number(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Seeded {
        #[serde(with = "super")]
        seed: u64,
    }

    #[test]
    fn round_trips_as_string() {
        let seeded = Seeded { seed: 4242 };
        let raw = serde_json::to_string(&seeded).expect("serialize seed");
        assert_eq!(raw, r#"{"seed":"4242"}"#);
        let back: Seeded = serde_json::from_str(&raw).expect("string seed");
        assert_eq!(back, seeded);
    }

    #[test]
    fn accepts_bare_number() {
        let parsed: Seeded = serde_json::from_str(r#"{"seed":7}"#).expect("numeric seed");
        assert_eq!(parsed.seed, 7);
    }
}
