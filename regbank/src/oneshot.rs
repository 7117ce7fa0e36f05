// Licensed under the Apache-2.0 license

//! Glue and C structure for a bank given directly, without a job file.

use crate::files::{resolve_template, write_all_or_nothing};
use crate::register_arg::RegisterArg;
use anyhow::{Context, Result};
use regbank_generator::{
    generate_c_header, generate_glue, GlueConfig, HeaderConfig, RegisterBank, ResetPolicy,
};
use std::path::PathBuf;

/// One bank, its two outputs and how to generate them.
#[derive(Clone, Debug)]
pub struct GlueRequest {
    pub verilog: PathBuf,
    pub header: PathBuf,
    pub struct_name: String,
    /// Base template; the built-in AXI4-Lite slave when `None`.
    pub template: Option<String>,
    pub reset_policy: ResetPolicy,
    /// Added in order, as consecutive `add-register` steps would be.
    pub registers: Vec<RegisterArg>,
}

impl GlueRequest {
    /// Build the bank and write both outputs. Nothing is written unless
    /// both documents generate.
    pub fn run(&self) -> Result<()> {
        let mut bank = RegisterBank::new();
        for register in &self.registers {
            register
                .add_to(&mut bank)
                .with_context(|| format!("register {}", register.name))?;
        }

        let template = resolve_template(self.template.as_deref(), None, &[])?;
        let config = GlueConfig::new().reset_policy(self.reset_policy);
        let glue = generate_glue(&bank, &template, &config)?;
        let header = generate_c_header(&bank, &self.struct_name, &HeaderConfig::new())?;

        write_all_or_nothing(&[(&self.verilog, glue.as_str()), (&self.header, header.as_str())])
    }
}
