// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors that can occur while building a register bank or generating its
/// glue and header documents.
///
/// None of these are transient: each one means the register definitions or
/// the base template need to be fixed before generation can succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlueError {
    #[error("register {name} at offset 0x{offset:04x} conflicts with register {existing}")]
    DuplicateOffset {
        name: String,
        offset: u32,
        existing: String,
    },

    #[error("register name {name} used more than once")]
    DuplicateName { name: String },

    #[error("register offset {offset} is no good: must be a multiple of 4 in 0..=65536")]
    InvalidOffset { offset: i64 },

    #[error("name {name:?} is not a valid Verilog/C identifier")]
    InvalidName { name: String },

    #[error("comment of register {name} must fit on one line: {comment:?}")]
    InvalidComment { name: String, comment: String },

    #[error("register mode {mode:?} is no good: expected passive, readthrough or writethrough")]
    InvalidMode { mode: String },

    #[error("cannot derive an address decode width for a bank ending at byte offset {max_offset_exclusive}")]
    UnsupportedGeometry { max_offset_exclusive: u32 },

    #[error("template marker {marker} not found in base template")]
    MissingTemplateMarker { marker: String },

    #[error("template marker {marker} appears {count} times in base template, expected once")]
    DuplicateTemplateMarker { marker: String, count: usize },

    #[error("template markers {first} and {second} overlap in base template")]
    OverlappingTemplateMarkers { first: String, second: String },
}

/// Result type for register bank operations.
pub type GlueResult<T> = std::result::Result<T, GlueError>;
