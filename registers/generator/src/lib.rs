// Licensed under the Apache-2.0 license

//! Register bank to AXI4-Lite glue and C structure generator.
//!
//! This crate turns a list of 32-bit registers into two documents that agree
//! on the address map: a Verilog AXI4-Lite slave register file, produced by
//! filling a marker-bearing base template, and a C structure overlaying the
//! same registers.
//!
//! ## Usage
//!
//! ```
//! use regbank_generator::{
//!     generate_c_header, generate_glue, GlueConfig, HeaderConfig, RegisterBank, RegisterMode,
//!     ResetPolicy, DEFAULT_AXI4_LITE_TEMPLATE,
//! };
//!
//! let mut bank = RegisterBank::new();
//! bank.add_register("ctrl", RegisterMode::Passive, "control").unwrap();
//! bank.add_register("status", RegisterMode::ReadThrough, "status").unwrap();
//! bank.add_register("cmd", RegisterMode::WriteThrough, "command").unwrap();
//!
//! let verilog = generate_glue(&bank, DEFAULT_AXI4_LITE_TEMPLATE, &GlueConfig::new()).unwrap();
//! let header = generate_c_header(&bank, "my_regs", &HeaderConfig::new()).unwrap();
//!
//! // Or reset every register to its own offset to check bus decoding
//! let config = GlueConfig::new().reset_policy(ResetPolicy::Offset);
//! let debug_verilog = generate_glue(&bank, DEFAULT_AXI4_LITE_TEMPLATE, &config).unwrap();
//! assert!(debug_verilog.contains("cmd <= 32'd8;"));
//! ```
//!
//! ## Module Organization
//!
//! - [`bank`]: Register descriptors and the bank table ([`RegisterBank`])
//! - [`geometry`]: Address and decode widths ([`BusGeometry`])
//! - [`template`]: Indentation-preserving marker substitution
//! - [`glue`]: Verilog fragment synthesis and template resolution
//! - [`header`]: Padded C structure layout and rendering
//! - [`config`]: Marker names, reset policy and header options
//! - [`util`]: Identifier checks and number formatting

pub mod bank;
pub mod config;
pub mod geometry;
pub mod glue;
pub mod header;
pub mod template;
pub mod util;

mod error;

// Re-export main public API
pub use bank::{RegisterBank, RegisterDescriptor, RegisterMode, MAX_REGISTER_OFFSET};
pub use config::{GlueConfig, HeaderConfig, MarkerConfig, ResetPolicy};
pub use error::{GlueError, GlueResult};
pub use geometry::BusGeometry;
pub use glue::{generate_glue, GlueFragments, DEFAULT_AXI4_LITE_TEMPLATE};
pub use header::{generate_c_header, LayoutEntry, StructLayout};
