//! Bit-packed array for storing fixed-width integer values in a compact `Vec<u64>`.
//!
//! Each element occupies exactly `bits` bits (1..=16). Elements are packed
//! tightly and may straddle `u64` word boundaries, which the accessors
//! handle explicitly; palette index widths grow one bit at a time, so the
//! power-of-two-only fast path is not available here.

/// A compact array where each element is stored using a fixed number of bits.
#[derive(Clone, Debug)]
pub struct BitPackedArray {
    /// Raw storage. Elements are packed into 64-bit words.
    data: Vec<u64>,
    /// Bits per element (1..=16).
    bits: u8,
    /// Total number of logical elements.
    len: usize,
}

impl BitPackedArray {
    /// Creates a new array with `len` elements, all initialized to zero.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is outside `1..=16`.
    pub fn new(bits: u8, len: usize) -> Self {
        assert!((1..=16).contains(&bits), "bits must be in 1..=16");
        let total_bits = len as u64 * u64::from(bits);
        let word_count = total_bits.div_ceil(64) as usize;
        Self {
            data: vec![0u64; word_count],
            bits,
            len,
        }
    }

    /// Returns the value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn get(&self, index: usize) -> u16 {
        assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        let bit_index = index as u64 * u64::from(self.bits);
        let word = (bit_index / 64) as usize;
        let offset = (bit_index % 64) as u32;
        let mask = (1u64 << self.bits) - 1;

        let mut value = self.data[word] >> offset;
        if offset + u32::from(self.bits) > 64 {
            // Value straddles into the next word.
            value |= self.data[word + 1] << (64 - offset);
        }
        (value & mask) as u16
    }

    /// Sets the value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len` or if `value` does not fit in `bits` bits.
    pub fn set(&mut self, index: usize, value: u16) {
        assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        assert!(
            self.bits >= 16 || value < (1u16 << self.bits),
            "value {value} exceeds {}-bit capacity",
            self.bits
        );
        let bit_index = index as u64 * u64::from(self.bits);
        let word = (bit_index / 64) as usize;
        let offset = (bit_index % 64) as u32;
        let mask = (1u64 << self.bits) - 1;

        self.data[word] &= !(mask << offset);
        self.data[word] |= u64::from(value) << offset;
        if offset + u32::from(self.bits) > 64 {
            let spill = 64 - offset;
            self.data[word + 1] &= !(mask >> spill);
            self.data[word + 1] |= u64::from(value) >> spill;
        }
    }

    /// Returns the number of bits per element.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns the number of logical elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the size of the backing storage in bytes.
    pub fn storage_bytes(&self) -> usize {
        self.data.len() * 8
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
