//! Hash functions for filter units
//!
//! Bit positions are derived with double hashing from a single 128-bit
//! MurmurHash3 digest. The seed is fixed so that positions computed today
//! match positions computed by a restarted process reading a persisted
//! bit array.

use std::io::Cursor;

/// Seed for the MurmurHash3 digest. Changing it invalidates every snapshot.
pub const HASH_SEED: u32 = 0x5eed_b10f;

/// Hash an item into the two 64-bit halves used for double hashing
pub fn base_hashes(item: &[u8]) -> (u64, u64) {
    let mut cursor = Cursor::new(item);
    // Reading from an in-memory cursor cannot fail.
    let hash = murmur3::murmur3_x64_128(&mut cursor, HASH_SEED).unwrap_or(0);
    let h1 = hash as u64;
    // An even stride would only ever visit half the positions of an even m.
    let h2 = ((hash >> 64) as u64) | 1;
    (h1, h2)
}

/// Compute k bit positions for an item in a unit of m bits
///
/// Uses double hashing: h(i) = h1 + i * h2 (mod m)
pub fn compute_hash_positions(item: &[u8], k: usize, m: usize) -> Vec<usize> {
    let (h1, h2) = base_hashes(item);

    (0..k)
        .map(|i| {
            let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (hash % m as u64) as usize
        })
        .collect()
}
