//! MurmurHash64A implementation
//!
//! 64-bit variant of MurmurHash2. Distinct counting needs well-mixed 64-bit
//! hashes: the low bits pick a sketch register and the remaining bits feed the
//! leading-zero run.

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Compute MurmurHash64A for byte data with a given seed
pub fn murmurhash64a(data: &[u8], seed: u64) -> u64 {
    let mut h: u64 = seed ^ (data.len() as u64).wrapping_mul(M);

    // Process 8-byte chunks
    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        let mut k = u64::from_le_bytes(buf);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    // Handle remaining bytes
    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate() {
            h ^= (*byte as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^ (h >> R)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmurhash64a_consistency() {
        let data = b"hello world";
        assert_eq!(murmurhash64a(data, 42), murmurhash64a(data, 42));
    }

    #[test]
    fn test_murmurhash64a_different_inputs() {
        // Differ by 1 character
        assert_ne!(murmurhash64a(b"hello world", 42), murmurhash64a(b"hello worle", 42));
    }

    #[test]
    fn test_murmurhash64a_different_seeds() {
        let data = b"hello world";
        assert_ne!(murmurhash64a(data, 42), murmurhash64a(data, 43));
    }

    #[test]
    fn test_murmurhash64a_tail_lengths() {
        // Every tail length from 0 to 7 must contribute to the hash
        let data = b"abcdefghijklmno";
        let hashes: Vec<u64> = (8..=15).map(|len| murmurhash64a(&data[..len], 0)).collect();
        for i in 0..hashes.len() {
            for j in (i + 1)..hashes.len() {
                assert_ne!(hashes[i], hashes[j]);
            }
        }
    }

    #[test]
    fn test_murmurhash64a_empty() {
        assert_eq!(murmurhash64a(b"", 0), murmurhash64a(b"", 0));
        assert_ne!(murmurhash64a(b"", 0), murmurhash64a(b"", 1));
    }

    #[test]
    fn test_murmurhash64a_high_bits_spread() {
        // Sequential keys should not leave the top bits constant
        let tops: std::collections::HashSet<u64> = (0u32..256)
            .map(|i| murmurhash64a(&i.to_le_bytes(), 0) >> 60)
            .collect();
        assert!(tops.len() > 8);
    }
}
