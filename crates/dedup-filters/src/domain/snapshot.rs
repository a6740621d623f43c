//! Persisted form of filter chains
//!
//! Each collection is stored as one bincode-encoded envelope:
//! `{ version, crc32(payload), payload }` where the payload is a
//! [`ChainSnapshot`]. Units are kept in creation order.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Current envelope format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One filter unit: `(m, k, capacity, p, n, bit-array bytes)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub size_bits: u64,
    pub hash_count: u32,
    pub capacity: u64,
    pub error_rate: f64,
    pub inserted: u64,
    pub bits: Vec<u8>,
}

/// One collection: chain parameters plus its units, oldest first
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub name: String,
    pub error_rate: f64,
    pub growth_ratio: u64,
    pub tightening_ratio: f64,
    pub units: Vec<UnitSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    checksum: u32,
    payload: Vec<u8>,
}

impl ChainSnapshot {
    /// Encode into the versioned, checksummed envelope
    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        let payload = bincode::serialize(self).map_err(|e| StoreError::Corrupt {
            name: self.name.clone(),
            reason: e.to_string(),
        })?;
        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            checksum: crc32fast::hash(&payload),
            payload,
        };
        bincode::serialize(&envelope).map_err(|e| StoreError::Corrupt {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }

    /// Decode an envelope; `label` names the source in errors
    pub fn decode(label: &str, bytes: &[u8]) -> Result<Self, StoreError> {
        let envelope: SnapshotEnvelope =
            bincode::deserialize(bytes).map_err(|e| StoreError::Corrupt {
                name: label.to_string(),
                reason: e.to_string(),
            })?;

        if envelope.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let found = crc32fast::hash(&envelope.payload);
        if found != envelope.checksum {
            return Err(StoreError::ChecksumMismatch {
                name: label.to_string(),
                expected: envelope.checksum,
                found,
            });
        }

        bincode::deserialize(&envelope.payload).map_err(|e| StoreError::Corrupt {
            name: label.to_string(),
            reason: e.to_string(),
        })
    }
}
