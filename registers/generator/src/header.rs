// Licensed under the Apache-2.0 license

//! C structure declaration for a register bank.
//!
//! The structure mirrors the bus address map: one 32-bit field per register
//! at its byte offset, with padding arrays filling the holes between sparse
//! registers. For registers at 0x0, 0x4 and 0x10 the generated code looks
//! like:
//!
//! ```text
//! // structure declaration for register bank my_regs
//! #include <stdint.h>
//!
//! typedef struct
//! {
//!     /* offset 0x0000 */  uint32_t  ctrl;     /* control */
//!     /* offset 0x0004 */  uint32_t  status;   /* status */
//!     /* offset 0x0008 */  uint32_t  _pad_0x0008[2];
//!     /* offset 0x0010 */  uint32_t  cmd;      /* command */
//! } my_regs;
//!
//! _Static_assert(sizeof(my_regs) == 20, "my_regs must match the bus address map");
//! ```

use crate::bank::{RegisterBank, RegisterDescriptor, REGISTER_BYTES};
use crate::config::HeaderConfig;
use crate::error::{GlueError, GlueResult};
use crate::util::{c_block_comment, is_identifier, offset_hex};
use log::debug;
use std::fmt::Write;

/// One member of the generated structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutEntry<'a> {
    /// Filler covering `words` unused 32-bit words starting at `offset`.
    Padding { offset: u32, words: u32 },
    Register(&'a RegisterDescriptor),
}

impl LayoutEntry<'_> {
    pub fn offset(&self) -> u32 {
        match self {
            LayoutEntry::Padding { offset, .. } => *offset,
            LayoutEntry::Register(reg) => reg.offset,
        }
    }
}

/// Registers of a bank in ascending offset order with explicit padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLayout<'a> {
    pub entries: Vec<LayoutEntry<'a>>,
}

impl<'a> StructLayout<'a> {
    /// Lay out `bank` without modifying it.
    pub fn from_bank(bank: &'a RegisterBank) -> Self {
        let mut entries = Vec::new();
        // First byte not yet covered by a member.
        let mut unwritten = 0u32;

        for reg in bank.sorted_by_offset() {
            if reg.offset > unwritten {
                entries.push(LayoutEntry::Padding {
                    offset: unwritten,
                    words: (reg.offset - unwritten) / REGISTER_BYTES,
                });
            }
            entries.push(LayoutEntry::Register(reg));
            unwritten = reg.offset + REGISTER_BYTES;
        }

        Self { entries }
    }

    /// Size of the structure in bytes: the highest register offset plus 4.
    pub fn size_bytes(&self) -> u32 {
        match self.entries.last() {
            Some(LayoutEntry::Register(reg)) => reg.offset + REGISTER_BYTES,
            // Padding is only ever emitted ahead of a register.
            Some(LayoutEntry::Padding { offset, words }) => offset + words * REGISTER_BYTES,
            None => 0,
        }
    }

    pub fn padding_words(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| match e {
                LayoutEntry::Padding { words, .. } => *words,
                LayoutEntry::Register(_) => 0,
            })
            .sum()
    }
}

/// Generate the C structure declaration for `bank`.
///
/// ```
/// use regbank_generator::{generate_c_header, HeaderConfig, RegisterBank, RegisterMode};
///
/// let mut bank = RegisterBank::new();
/// bank.add_register("ctrl", RegisterMode::Passive, "control").unwrap();
/// let header = generate_c_header(&bank, "my_regs", &HeaderConfig::new()).unwrap();
/// assert!(header.contains("} my_regs;"));
/// ```
pub fn generate_c_header(
    bank: &RegisterBank,
    struct_name: &str,
    config: &HeaderConfig,
) -> GlueResult<String> {
    if !is_identifier(struct_name) {
        return Err(GlueError::InvalidName {
            name: struct_name.to_string(),
        });
    }

    let layout = StructLayout::from_bank(bank);
    let word = &config.word_type;
    let mut output = String::new();

    writeln!(output, "// structure declaration for register bank {struct_name}").unwrap();
    if config.include_stdint {
        writeln!(output, "#include <stdint.h>").unwrap();
        writeln!(output).unwrap();
    }
    writeln!(output, "typedef struct").unwrap();
    writeln!(output, "{{").unwrap();

    for entry in &layout.entries {
        let offset = offset_hex(entry.offset());
        match entry {
            LayoutEntry::Padding { words, .. } => {
                writeln!(
                    output,
                    "\t/* offset {offset} */\t{word}\t\t\t_pad_{offset}[{words}];"
                )
                .unwrap();
            }
            LayoutEntry::Register(reg) => {
                // The semicolon is padded along with the name so comments align.
                let field = format!("{};", reg.name);
                let line = if reg.comment.is_empty() {
                    format!("\t/* offset {offset} */\t{word}\t{field}")
                } else {
                    let comment = c_block_comment(&reg.comment);
                    format!("\t/* offset {offset} */\t{word}\t{field:<40}\t{comment}")
                };
                writeln!(output, "{}", line.trim_end()).unwrap();
            }
        }
    }

    writeln!(output, "}} {struct_name};").unwrap();
    if config.size_assert && !layout.entries.is_empty() {
        writeln!(output).unwrap();
        writeln!(
            output,
            "_Static_assert(sizeof({struct_name}) == {}, \"{struct_name} must match the bus address map\");",
            layout.size_bytes()
        )
        .unwrap();
    }
    writeln!(output).unwrap();

    debug!(
        "generated structure {struct_name}: {} registers, {} padding words, {} bytes",
        bank.len(),
        layout.padding_words(),
        layout.size_bytes()
    );
    Ok(output)
}
