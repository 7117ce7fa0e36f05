// Licensed under the Apache-2.0 license

//! Job runner for the register bank generator.
//!
//! Jobs are restricted programs over a fixed instruction set ([`Step`]):
//! build a register bank, emit its AXI4-Lite glue and C structure, and
//! manage the symbols shared with the Verilog and C sources.
//!
//! ## Module Organization
//!
//! - [`job`]: Job sources and the interpreter ([`JobRunner`])
//! - [`symbols`]: The symbol table ([`SymbolTable`])
//! - [`files`]: Template lookup and output writing
//! - [`oneshot`]: A single bank described on the command line ([`GlueRequest`])
//! - [`register_arg`]: `name[@offset][:mode[:comment]]` register arguments

pub mod files;
pub mod job;
pub mod oneshot;
pub mod register_arg;
pub mod symbols;

pub use job::{load_jobs, Job, JobRunner, Manifest, RunOptions, Step, AXI_DEBUG_SYMBOL};
pub use oneshot::GlueRequest;
pub use register_arg::RegisterArg;
pub use symbols::SymbolTable;
