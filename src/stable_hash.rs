//! Stable id hashing and seed derivation.
//!
//! This module intentionally does **not** provide cryptographic guarantees; it maps
//! application ids and event keys to integers that are stable across processes,
//! platforms, and releases, so a decision can always be reproduced from its key.

/// MurmurHash3 (x86, 32-bit variant) over `data`.
#[must_use]
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h = seed;
    let mut blocks = data.chunks_exact(4);
    for block in blocks.by_ref() {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_k(k, C1, C2);
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k: u32 = 0;
        for (i, &b) in tail.iter().enumerate() {
            k ^= u32::from(b) << (8 * i);
        }
        h ^= mix_k(k, C1, C2);
    }

    h ^= data.len() as u32;
    fmix32(h)
}

#[inline]
fn mix_k(k: u32, c1: u32, c2: u32) -> u32 {
    k.wrapping_mul(c1).rotate_left(15).wrapping_mul(c2)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// Stable hash of an application id or event key.
///
/// - Surrounding whitespace is ignored.
/// - A non-empty, all-decimal-digit id hashes to its numeric value (wrapping on
///   overflow), so numeric ids produce predictable seeds.
/// - Anything else hashes to `murmur3_32(utf8, 0)` widened to 64 bits.
#[must_use]
pub fn compute_id_hash(id: &str) -> u64 {
    let trimmed = id.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.bytes().fold(0u64, |acc, b| {
            acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0'))
        });
    }
    u64::from(murmur3_32(trimmed.as_bytes(), 0))
}

/// PRG seed for one decision: `hash(app_id) + hash(event_key)` (wrapping).
#[must_use]
pub fn compute_seed(app_id: &str, event_key: &str) -> u64 {
    compute_id_hash(app_id).wrapping_add(compute_id_hash(event_key))
}
