// Licensed under the Apache-2.0 license

//! Address bus and register decode widths derived from a bank's size.

use crate::bank::REGISTER_BYTES;
use crate::error::{GlueError, GlueResult};
use crate::util::bit_length;

/// Width of the AXI data bus and of every register.
pub const DATA_BIT_WIDTH: u32 = 32;

/// Narrowest byte address bus generated (a 16 byte window).
pub const MIN_ADDR_BIT_WIDTH: u32 = 4;

/// Low address bits consumed by 32-bit word alignment.
const WORD_ALIGN_BITS: u32 = 2;

/// Bus geometry of a register bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusGeometry {
    /// Data bus width in bits (always 32).
    pub data_width: u32,
    /// Byte address bus width in bits.
    pub addr_width: u32,
    /// Number of word address bits used to select a register.
    pub decode_width: u32,
}

impl BusGeometry {
    /// Derive the geometry for a bank whose highest occupied byte is
    /// `max_offset_exclusive - 1`.
    ///
    /// ```
    /// use regbank_generator::BusGeometry;
    ///
    /// let g = BusGeometry::from_max_offset(16).unwrap();
    /// assert_eq!((g.addr_width, g.decode_width), (4, 2));
    ///
    /// let g = BusGeometry::from_max_offset(68).unwrap();
    /// assert_eq!((g.addr_width, g.decode_width), (7, 5));
    /// ```
    pub fn from_max_offset(max_offset_exclusive: u32) -> GlueResult<Self> {
        let unsupported = || GlueError::UnsupportedGeometry {
            max_offset_exclusive,
        };

        let last_byte = max_offset_exclusive.checked_sub(1).ok_or_else(unsupported)?;
        // A window of at least one addressable byte.
        let next_pow2 = (last_byte.max(1) as u64).next_power_of_two();
        let addr_width = bit_length(next_pow2 - 1).max(MIN_ADDR_BIT_WIDTH);
        let decode_width = addr_width
            .checked_sub(WORD_ALIGN_BITS)
            .ok_or_else(unsupported)?;

        Ok(Self {
            data_width: DATA_BIT_WIDTH,
            addr_width,
            decode_width,
        })
    }

    /// Number of registers the decoder can select between.
    pub fn register_slots(&self) -> u64 {
        1u64 << self.decode_width
    }

    /// Case label index of the register at `offset`, truncated to the decode
    /// width.
    pub fn register_index(&self, offset: u32) -> u32 {
        let mask = (self.register_slots() - 1) as u32;
        (offset / REGISTER_BYTES) & mask
    }

    /// Size in bytes of the decoded address window.
    pub fn window_bytes(&self) -> u64 {
        1u64 << self.addr_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(max_offset_exclusive: u32) -> (u32, u32) {
        let g = BusGeometry::from_max_offset(max_offset_exclusive).unwrap();
        (g.addr_width, g.decode_width)
    }

    #[test]
    fn test_minimum_window() {
        assert_eq!(widths(16), (4, 2));
        // Smaller banks are floored to the 16 byte window.
        assert_eq!(widths(4), (4, 2));
        assert_eq!(widths(1), (4, 2));
    }

    #[test]
    fn test_reference_geometries() {
        assert_eq!(widths(20), (5, 3));
        assert_eq!(widths(32), (5, 3));
        assert_eq!(widths(36), (6, 4));
        assert_eq!(widths(68), (7, 5));
        assert_eq!(widths(65540), (17, 15));
    }

    #[test]
    fn test_minimal_width_property() {
        for m in (16..=4096u32).step_by(4) {
            let g = BusGeometry::from_max_offset(m).unwrap();
            let last = (m - 1) as u64;
            assert!(g.window_bytes() > last, "window too small for {m}");
            if g.addr_width > MIN_ADDR_BIT_WIDTH {
                assert!(
                    (1u64 << (g.addr_width - 1)) <= last,
                    "width not minimal for {m}"
                );
            }
            assert_eq!(g.decode_width, g.addr_width - 2);
        }
    }

    #[test]
    fn test_zero_is_unsupported() {
        assert_eq!(
            BusGeometry::from_max_offset(0),
            Err(GlueError::UnsupportedGeometry {
                max_offset_exclusive: 0
            })
        );
    }

    #[test]
    fn test_full_address_space() {
        let g = BusGeometry::from_max_offset(u32::MAX).unwrap();
        assert_eq!(g.addr_width, 32);
    }

    #[test]
    fn test_register_index() {
        let g = BusGeometry::from_max_offset(68).unwrap();
        assert_eq!(g.register_index(0), 0);
        assert_eq!(g.register_index(64), 16);
        assert_eq!(g.register_slots(), 32);
        assert_eq!(g.data_width, 32);
    }
}
