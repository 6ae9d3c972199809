//! Object-id shaped item identifiers.
//!
//! # Design
//! An `ItemId` is 12 bytes, rendered as 24 lowercase hex characters:
//!
//! | bytes | content                                   |
//! |-------|-------------------------------------------|
//! | 0..4  | unix seconds at creation, big-endian      |
//! | 4..9  | random value chosen once per process      |
//! | 9..12 | counter starting at zero, wraps at 2^24   |
//!
//! Timestamp then counter makes ids from one process sort in creation order
//! until the counter wraps after 2^24 ids, which the in-memory store relies
//! on for its listing order. Parsing is strict:
//! exactly 24 hex digits, either case, and nothing else.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::ItemError;

const ID_BYTES: usize = 12;
const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Unique, immutable identifier assigned to an item at creation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId([u8; ID_BYTES]);

struct ProcessSeed {
    random: [u8; 5],
    counter: AtomicU32,
}

fn process_seed() -> &'static ProcessSeed {
    static SEED: OnceLock<ProcessSeed> = OnceLock::new();
    SEED.get_or_init(|| {
        let bytes = *Uuid::new_v4().as_bytes();
        let mut random = [0u8; 5];
        random.copy_from_slice(&bytes[..5]);
        ProcessSeed {
            random,
            counter: AtomicU32::new(0),
        }
    })
}

impl ItemId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as u32)
            .unwrap_or_default();
        let seed = process_seed();
        let count = seed.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        Self::from_parts(secs, seed.random, count)
    }

    fn from_parts(secs: u32, random: [u8; 5], count: u32) -> Self {
        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&random);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse a request-supplied identifier.
    ///
    /// Fails with [`ItemError::MalformedIdentifier`] unless `raw` is exactly
    /// 24 hex characters. This never consults a store.
    pub fn parse(raw: &str) -> Result<Self, ItemError> {
        let mut bytes = [0u8; ID_BYTES];
        hex::decode_to_slice(raw, &mut bytes)
            .map_err(|_| ItemError::malformed_identifier(raw))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ID_BYTES] {
        &self.0
    }

    /// Unix seconds embedded at generation time.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({self})")
    }
}

impl FromStr for ItemId {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_24_lowercase_hex() {
        let id = ItemId::new().to_string();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: std::collections::HashSet<ItemId> = (0..1000).map(|_| ItemId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn generated_ids_sort_in_creation_order() {
        let ids: Vec<ItemId> = (0..1000).map(|_| ItemId::new()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(sorted, ids);
    }

    #[test]
    fn parse_accepts_display_output() {
        let id = ItemId::new();
        assert_eq!(ItemId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_accepts_uppercase_and_displays_lowercase() {
        let id = ItemId::parse("5F0C1A2B3C4D5E6F7A8B9C0D").unwrap();
        assert_eq!(id.to_string(), "5f0c1a2b3c4d5e6f7a8b9c0d");
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        for raw in [
            "",
            ":id",
            "not-an-id",
            "5f0c1a2b3c4d5e6f7a8b9c0",
            "5f0c1a2b3c4d5e6f7a8b9c0d0",
            "5f0c1a2b3c4d5e6f7a8b9c0g",
            "00000000-0000-0000-0000-000000000000",
        ] {
            let err = ItemId::parse(raw).unwrap_err();
            assert!(
                matches!(err, ItemError::MalformedIdentifier { ref value } if value == raw),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn layout_places_timestamp_first() {
        let id = ItemId::from_parts(0x5f0c_1a2b, [1, 2, 3, 4, 5], 0x0a0b0c);
        assert_eq!(id.to_string(), "5f0c1a2b01020304050a0b0c");
        assert_eq!(id.timestamp(), 0x5f0c_1a2b);
    }

    #[test]
    fn counter_wraps_within_three_bytes() {
        let id = ItemId::from_parts(0, [0; 5], 0x1ff_ffff & COUNTER_MASK);
        assert_eq!(&id.as_bytes()[9..], &[0xff, 0xff, 0xff]);
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = ItemId::from_bytes([0xab; 12]);
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, "abababababababababababab");
        let back: ItemId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_malformed_string() {
        let result: Result<ItemId, _> = serde_json::from_str(r#""zzz""#);
        assert!(result.is_err());
    }
}
