//! Stable, order-sensitive hash accumulator.
//!
//! Implements Bob Jenkins' `lookup2` mixing function over a three word state.
//! Unlike [`std::hash::DefaultHasher`], the output only depends on the input
//! values and the seed, so hash codes agree between runs and between nodes.

/// The golden ratio; an arbitrary value.
const GOLDEN: u32 = 0x9E37_79B9;

/// Seeded hash accumulator producing a stable 32-bit hash code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StableHash {
  a: u32,
  b: u32,
  c: u32,
}

impl StableHash {
  /// Creates a new accumulator seeded with `seed`.
  ///
  /// The initial state is the `seed`-th multiple of the golden ratio.
  #[inline]
  pub const fn new(seed: u32) -> Self {
    let init: u32 = GOLDEN.wrapping_mul(seed);

    Self {
      a: init,
      b: init,
      c: 0,
    }
  }

  /// Folds a single word into the state.
  #[inline]
  pub const fn combine(mut self, value: u32) -> Self {
    self.a = self.a.wrapping_add(value);
    self.mix()
  }

  /// Folds two words into the state.
  #[inline]
  pub const fn combine2(mut self, a: u32, b: u32) -> Self {
    self.a = self.a.wrapping_add(a);
    self.b = self.b.wrapping_add(b);
    self.mix()
  }

  /// Folds a byte string into the state, twelve bytes per round.
  ///
  /// The final partial block is zero-padded.
  pub fn combine_bytes(mut self, bytes: &[u8]) -> Self {
    for block in bytes.chunks(12) {
      let mut words: [u8; 12] = [0; 12];

      words[..block.len()].copy_from_slice(block);

      self.a = self.a.wrapping_add(word(&words, 0));
      self.b = self.b.wrapping_add(word(&words, 4));
      self.c = self.c.wrapping_add(word(&words, 8));
      self = self.mix();
    }

    self
  }

  /// Returns the accumulated hash code.
  #[inline]
  pub const fn value(&self) -> u32 {
    self.c
  }

  const fn mix(self) -> Self {
    let Self { mut a, mut b, mut c } = self;

    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 13);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 8);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 13);
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 12);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 16);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 5);
    a = a.wrapping_sub(b).wrapping_sub(c) ^ (c >> 3);
    b = b.wrapping_sub(c).wrapping_sub(a) ^ (a << 10);
    c = c.wrapping_sub(a).wrapping_sub(b) ^ (b >> 15);

    Self { a, b, c }
  }
}

#[inline]
fn word(bytes: &[u8; 12], offset: usize) -> u32 {
  u32::from_le_bytes([
    bytes[offset],
    bytes[offset + 1],
    bytes[offset + 2],
    bytes[offset + 3],
  ])
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::StableHash;

  #[test]
  fn test_deterministic() {
    let a: u32 = StableHash::new(5).combine(42).value();
    let b: u32 = StableHash::new(5).combine(42).value();

    assert_eq!(a, b);
  }

  #[test]
  fn test_seed_matters() {
    let a: u32 = StableHash::new(1).combine(42).value();
    let b: u32 = StableHash::new(5).combine(42).value();

    assert_ne!(a, b);
  }

  #[test]
  fn test_scrambles_neighbours() {
    let a: u32 = StableHash::new(5).combine(1).value();
    let b: u32 = StableHash::new(5).combine(2).value();

    assert_ne!(a, b);
  }

  #[test]
  fn test_bytes_padding() {
    let a: u32 = StableHash::new(1).combine_bytes(b"abc").value();
    let b: u32 = StableHash::new(1).combine_bytes(b"abd").value();
    let c: u32 = StableHash::new(1).combine_bytes(b"abc").value();

    assert_ne!(a, b);
    assert_eq!(a, c);
  }

  #[test]
  fn test_bytes_multiple_blocks() {
    let a: u32 = StableHash::new(1).combine_bytes(b"node-one@host.example").value();
    let b: u32 = StableHash::new(1).combine_bytes(b"node-two@host.example").value();

    assert_ne!(a, b);
  }
}
