// Licensed under the Apache-2.0 license

//! The register bank table.
//!
//! A [`RegisterBank`] accumulates [`RegisterDescriptor`]s in authoring order.
//! Offsets are assigned from an auto-incrementing cursor which callers may
//! reposition to leave holes in the address map:
//!
//! ```
//! use regbank_generator::{RegisterBank, RegisterMode};
//!
//! let mut bank = RegisterBank::new();
//! bank.add_register("ctrl", RegisterMode::Passive, "control").unwrap();
//! bank.set_offset_cursor(0x40).unwrap();
//! bank.add_register("status", RegisterMode::ReadThrough, "status").unwrap();
//! assert_eq!(bank.registers()[1].offset, 0x40);
//! assert_eq!(bank.max_offset_exclusive(), 0x44);
//! ```

use crate::error::{GlueError, GlueResult};
use crate::geometry::BusGeometry;
use crate::util::is_identifier;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Highest byte offset a register may be placed at.
pub const MAX_REGISTER_OFFSET: u32 = 65536;

/// Width of every register in the bank, in bytes.
pub const REGISTER_BYTES: u32 = 4;

/// Smallest decode window generated, even for a bank with a single register.
pub const MIN_WINDOW_BYTES: u32 = 16;

/// How a register is connected to the bus and to the logic around it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RegisterMode {
    /// Read/write from the bus. Downstream logic only observes the value.
    #[default]
    Passive,
    /// Read-only from the bus, refreshed every cycle from `<name>_rddata`.
    /// `<name>_rdtick` pulses when the bus reads it.
    ReadThrough,
    /// Read/write from the bus. `<name>_wrtick` pulses for one cycle after
    /// each bus write.
    WriteThrough,
}

impl RegisterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegisterMode::Passive => "passive",
            RegisterMode::ReadThrough => "readthrough",
            RegisterMode::WriteThrough => "writethrough",
        }
    }

    /// True if the bus write path updates this register.
    pub fn is_writable(&self) -> bool {
        !matches!(self, RegisterMode::ReadThrough)
    }
}

impl fmt::Display for RegisterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegisterMode {
    type Err = GlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "passive" => Ok(RegisterMode::Passive),
            "readthrough" => Ok(RegisterMode::ReadThrough),
            "writethrough" => Ok(RegisterMode::WriteThrough),
            _ => Err(GlueError::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// One 32-bit register of a bank. Immutable once added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Verilog signal name and C field name.
    pub name: String,
    /// Byte offset within the bank's address window.
    pub offset: u32,
    pub mode: RegisterMode,
    /// Single line of free text carried into both generated documents.
    pub comment: String,
}

impl RegisterDescriptor {
    /// Register index as seen by the address decoder (word address).
    pub fn word_index(&self) -> u32 {
        self.offset / REGISTER_BYTES
    }
}

/// Ordered collection of register descriptors plus the offset cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterBank {
    registers: Vec<RegisterDescriptor>,
    offset_cursor: u32,
    max_offset_exclusive: u32,
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBank {
    /// Create an empty bank, in the same state `start()` leaves it in.
    pub fn new() -> Self {
        Self {
            registers: Vec::new(),
            offset_cursor: 0,
            max_offset_exclusive: MIN_WINDOW_BYTES,
        }
    }

    /// Discard all registers and rewind the cursor and window size.
    pub fn start(&mut self) {
        self.registers.clear();
        self.offset_cursor = 0;
        self.max_offset_exclusive = MIN_WINDOW_BYTES;
    }

    /// Set the offset the next added register will use.
    pub fn set_offset_cursor(&mut self, offset: u32) -> GlueResult<()> {
        check_offset(offset)?;
        self.offset_cursor = offset;
        Ok(())
    }

    /// Add a register at the current cursor and advance the cursor by 4.
    ///
    /// On error the bank is left untouched.
    pub fn add_register(
        &mut self,
        name: &str,
        mode: RegisterMode,
        comment: &str,
    ) -> GlueResult<&RegisterDescriptor> {
        let offset = self.offset_cursor;
        check_offset(offset)?;
        if !is_identifier(name) {
            return Err(GlueError::InvalidName {
                name: name.to_string(),
            });
        }
        if comment.contains(['\r', '\n']) {
            return Err(GlueError::InvalidComment {
                name: name.to_string(),
                comment: comment.to_string(),
            });
        }

        for existing in &self.registers {
            if existing.offset == offset {
                return Err(GlueError::DuplicateOffset {
                    name: name.to_string(),
                    offset,
                    existing: existing.name.clone(),
                });
            }
            if existing.name == name {
                return Err(GlueError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        debug!("adding register {name} at offset 0x{offset:04x} ({mode})");
        self.registers.push(RegisterDescriptor {
            name: name.to_string(),
            offset,
            mode,
            comment: comment.to_string(),
        });
        self.max_offset_exclusive = self.max_offset_exclusive.max(offset + REGISTER_BYTES);
        // Past the last valid offset the cursor is only rejected when used.
        self.offset_cursor = offset + REGISTER_BYTES;

        Ok(&self.registers[self.registers.len() - 1])
    }

    /// Registers in insertion order.
    pub fn registers(&self) -> &[RegisterDescriptor] {
        &self.registers
    }

    pub fn offset_cursor(&self) -> u32 {
        self.offset_cursor
    }

    /// One past the highest occupied byte, never less than 16.
    pub fn max_offset_exclusive(&self) -> u32 {
        self.max_offset_exclusive
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// A snapshot of the registers sorted by ascending offset.
    pub fn sorted_by_offset(&self) -> Vec<&RegisterDescriptor> {
        let mut sorted: Vec<_> = self.registers.iter().collect();
        sorted.sort_by_key(|r| r.offset);
        sorted
    }

    /// Bus geometry needed to decode every register of this bank.
    pub fn geometry(&self) -> GlueResult<BusGeometry> {
        BusGeometry::from_max_offset(self.max_offset_exclusive)
    }
}

fn check_offset(offset: u32) -> GlueResult<()> {
    if offset > MAX_REGISTER_OFFSET || offset % REGISTER_BYTES != 0 {
        return Err(GlueError::InvalidOffset {
            offset: offset as i64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bank_state() {
        let bank = RegisterBank::new();
        assert!(bank.is_empty());
        assert_eq!(bank.offset_cursor(), 0);
        assert_eq!(bank.max_offset_exclusive(), 16);
    }

    #[test]
    fn test_auto_increment() {
        let mut bank = RegisterBank::new();
        for i in 0..17 {
            let reg = bank
                .add_register(&format!("r{i}"), RegisterMode::Passive, "")
                .unwrap();
            assert_eq!(reg.offset, 4 * i);
        }
        assert_eq!(bank.offset_cursor(), 4 * 17);
        assert_eq!(bank.max_offset_exclusive(), 68);
    }

    #[test]
    fn test_set_offset_cursor_validation() {
        let mut bank = RegisterBank::new();
        assert_eq!(
            bank.set_offset_cursor(6),
            Err(GlueError::InvalidOffset { offset: 6 })
        );
        assert_eq!(
            bank.set_offset_cursor(65540),
            Err(GlueError::InvalidOffset { offset: 65540 })
        );
        assert!(bank.set_offset_cursor(65536).is_ok());
        assert_eq!(bank.offset_cursor(), 65536);
        assert!(bank.set_offset_cursor(0).is_ok());
    }

    #[test]
    fn test_duplicate_offset_leaves_bank_unchanged() {
        let mut bank = RegisterBank::new();
        bank.add_register("a", RegisterMode::Passive, "").unwrap();
        bank.add_register("b", RegisterMode::Passive, "").unwrap();
        bank.set_offset_cursor(4).unwrap();
        let before = bank.clone();

        let err = bank
            .add_register("c", RegisterMode::Passive, "")
            .unwrap_err();
        assert_eq!(
            err,
            GlueError::DuplicateOffset {
                name: "c".into(),
                offset: 4,
                existing: "b".into(),
            }
        );
        assert_eq!(bank, before);
    }

    #[test]
    fn test_duplicate_name_leaves_bank_unchanged() {
        let mut bank = RegisterBank::new();
        bank.add_register("a", RegisterMode::Passive, "").unwrap();
        let before = bank.clone();

        let err = bank
            .add_register("a", RegisterMode::WriteThrough, "")
            .unwrap_err();
        assert_eq!(err, GlueError::DuplicateName { name: "a".into() });
        assert_eq!(bank, before);
    }

    #[test]
    fn test_invalid_name() {
        let mut bank = RegisterBank::new();
        assert!(matches!(
            bank.add_register("bad name", RegisterMode::Passive, ""),
            Err(GlueError::InvalidName { .. })
        ));
        assert!(bank.is_empty());
        assert_eq!(bank.offset_cursor(), 0);
    }

    #[test]
    fn test_multi_line_comment_rejected() {
        let mut bank = RegisterBank::new();
        for comment in ["first\nint x;", "dos\r\n", "\r"] {
            assert_eq!(
                bank.add_register("a", RegisterMode::Passive, comment),
                Err(GlueError::InvalidComment {
                    name: "a".into(),
                    comment: comment.into(),
                })
            );
        }
        assert!(bank.is_empty());
        assert_eq!(bank.offset_cursor(), 0);

        bank.add_register("a", RegisterMode::Passive, "path C:\\")
            .unwrap();
    }

    #[test]
    fn test_register_at_last_offset() {
        let mut bank = RegisterBank::new();
        bank.set_offset_cursor(65536).unwrap();
        bank.add_register("last", RegisterMode::Passive, "").unwrap();
        assert_eq!(bank.max_offset_exclusive(), 65540);

        // The cursor ran past the end; the next add must be rejected.
        let before = bank.clone();
        assert_eq!(
            bank.add_register("beyond", RegisterMode::Passive, ""),
            Err(GlueError::InvalidOffset { offset: 65540 })
        );
        assert_eq!(bank, before);
    }

    #[test]
    fn test_max_offset_is_monotonic() {
        let mut bank = RegisterBank::new();
        bank.set_offset_cursor(0x40).unwrap();
        bank.add_register("high", RegisterMode::Passive, "").unwrap();
        bank.set_offset_cursor(0).unwrap();
        bank.add_register("low", RegisterMode::Passive, "").unwrap();
        assert_eq!(bank.max_offset_exclusive(), 0x44);
    }

    #[test]
    fn test_start_resets_everything() {
        let mut bank = RegisterBank::new();
        bank.set_offset_cursor(0x100).unwrap();
        bank.add_register("a", RegisterMode::Passive, "").unwrap();
        bank.start();
        assert_eq!(bank, RegisterBank::new());
        // Names from the previous bank are free again.
        bank.add_register("a", RegisterMode::Passive, "").unwrap();
        assert_eq!(bank.registers()[0].offset, 0);
    }

    #[test]
    fn test_sorted_by_offset_does_not_mutate() {
        let mut bank = RegisterBank::new();
        bank.set_offset_cursor(8).unwrap();
        bank.add_register("c", RegisterMode::Passive, "").unwrap();
        bank.set_offset_cursor(0).unwrap();
        bank.add_register("a", RegisterMode::Passive, "").unwrap();

        let sorted: Vec<_> = bank.sorted_by_offset().iter().map(|r| r.offset).collect();
        assert_eq!(sorted, vec![0, 8]);
        assert_eq!(bank.registers()[0].name, "c");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("passive".parse::<RegisterMode>(), Ok(RegisterMode::Passive));
        assert_eq!("ReadThrough".parse::<RegisterMode>(), Ok(RegisterMode::ReadThrough));
        assert_eq!("write-through".parse::<RegisterMode>(), Ok(RegisterMode::WriteThrough));
        assert_eq!("read_through".parse::<RegisterMode>(), Ok(RegisterMode::ReadThrough));
        assert!("readonly".parse::<RegisterMode>().is_err());
        assert_eq!(RegisterMode::WriteThrough.to_string(), "writethrough");
    }
}
