// Licensed under the Apache-2.0 license

//! AXI4-Lite register glue generation.
//!
//! ## Generation Flow
//!
//! ```text
//! RegisterBank ─┬─ BusGeometry ──────────────► scalar markers (widths)
//!               └─ GlueFragments
//!                  ├── instances     ─► X_GLUE_REGISTER_INSTANCES_X
//!                  ├── resets        ─► X_GLUE_REGISTER_RESETS_X
//!                  ├── clear_wrticks ─► X_GLUE_REGISTER_CLEAR_WRTICKS_X
//!                  ├── write_cases   ─► X_GLUE_REGISTER_WRITECASES_X
//!                  ├── readthroughs  ─► X_GLUE_REGISTER_READTHROUGHS_X
//!                  └── read_cases    ─► X_GLUE_REGISTER_READCASES_X
//! ```
//!
//! The template is expected to declare `slv_reg_rden`, `axi_araddr`,
//! `ADDR_LSB`, `OPT_MEM_ADDR_BITS`, `byte_index`, `reg_data_out` and the
//! `S_AXI_*` write channel signals the fragments refer to. The built-in
//! [`DEFAULT_AXI4_LITE_TEMPLATE`] does.

use crate::bank::{RegisterBank, RegisterDescriptor, RegisterMode};
use crate::config::{GlueConfig, ResetPolicy};
use crate::error::GlueResult;
use crate::geometry::BusGeometry;
use crate::template::{indented_replace_all, replace_scalar};
use crate::util::offset_hex;
use log::debug;
use std::fmt::Write;

/// AXI4-Lite slave base template carrying the default markers.
pub const DEFAULT_AXI4_LITE_TEMPLATE: &str = include_str!("../templates/axi4_lite_slave.v");

/// Generated Verilog fragments, one buffer per structural marker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlueFragments {
    /// Register declarations plus readthrough/writethrough wires.
    pub instances: String,
    /// Reset assignments, including write tick resets.
    pub resets: String,
    /// Write tick clears run at the start of every write-handling cycle.
    pub clear_wrticks: String,
    /// Write case branches followed by the default branch.
    pub write_cases: String,
    /// Continuous refresh of readthrough registers.
    pub readthroughs: String,
    /// Read case branches followed by the default branch.
    pub read_cases: String,
}

impl GlueFragments {
    /// Build the fragments for every register of `bank`, in insertion order.
    pub fn build(bank: &RegisterBank, geometry: &BusGeometry, reset_policy: ResetPolicy) -> Self {
        let mut fragments = GlueFragments::default();

        for reg in bank.registers() {
            debug!("processing register '{}'", reg.name);
            fragments.push_register(reg, geometry, reset_policy);
        }

        fragments.push_write_default(bank);
        writeln!(fragments.read_cases, "default: reg_data_out <= 0;").unwrap();

        fragments
    }

    fn push_register(
        &mut self,
        reg: &RegisterDescriptor,
        geometry: &BusGeometry,
        reset_policy: ResetPolicy,
    ) {
        let name = &reg.name;
        let data_width = geometry.data_width;
        let decode_width = geometry.decode_width;
        let index = geometry.register_index(reg.offset);

        // Instance
        writeln!(self.instances, "reg [{data_width}-1:0] {name};").unwrap();
        if reg.mode == RegisterMode::ReadThrough {
            writeln!(self.instances, "\twire [{data_width}-1:0] {name}_rddata;").unwrap();
            writeln!(self.instances, "\twire {name}_rdtick;").unwrap();
            writeln!(
                self.instances,
                "\tassign {name}_rdtick = slv_reg_rden && (axi_araddr[ADDR_LSB+OPT_MEM_ADDR_BITS-1:ADDR_LSB]=={});",
                reg.word_index()
            )
            .unwrap();
        }

        // Reset
        match reset_policy {
            ResetPolicy::Zero => writeln!(self.resets, "{name} <= 0;").unwrap(),
            ResetPolicy::Offset => {
                writeln!(self.resets, "{name} <= {data_width}'d{};", reg.offset).unwrap()
            }
        }

        if reg.mode == RegisterMode::WriteThrough {
            writeln!(self.instances, "\treg {name}_wrtick;").unwrap();
            writeln!(self.resets, "{name}_wrtick <= 0;").unwrap();
            writeln!(self.clear_wrticks, "{name}_wrtick <= 0;").unwrap();
        }

        // Write path: readthrough registers are sourced from their rddata
        // wire instead of a write case.
        if reg.mode.is_writable() {
            writeln!(self.write_cases, "{decode_width}'h{index:x}:\t\t\t// {name}").unwrap();
            writeln!(self.write_cases, "begin").unwrap();
            writeln!(
                self.write_cases,
                "\tfor ( byte_index=0; byte_index <= ({data_width}/8)-1; byte_index = byte_index+1 )"
            )
            .unwrap();
            writeln!(
                self.write_cases,
                "\t\tif ( S_AXI_WSTRB[byte_index] == 1 ) begin"
            )
            .unwrap();
            writeln!(
                self.write_cases,
                "\t\t\t{name}[(byte_index*8) +: 8] <= S_AXI_WDATA[(byte_index*8) +: 8];"
            )
            .unwrap();
            if reg.mode == RegisterMode::WriteThrough {
                writeln!(self.write_cases, "\t\t\t{name}_wrtick <= 1;").unwrap();
            }
            writeln!(self.write_cases, "\tend").unwrap();
            writeln!(self.write_cases, "end").unwrap();
            writeln!(self.write_cases).unwrap();
        } else {
            writeln!(self.readthroughs, "{name} <=  {name}_rddata;").unwrap();
        }

        // Read path
        writeln!(
            self.read_cases,
            "{decode_width}'h{index:x}: reg_data_out <= {name};"
        )
        .unwrap();

        writeln!(self.instances).unwrap();
    }

    /// Default write branch: writable registers hold their value, readthrough
    /// registers are left to their continuous assignment.
    fn push_write_default(&mut self, bank: &RegisterBank) {
        writeln!(self.write_cases, "default:").unwrap();
        writeln!(self.write_cases, "begin").unwrap();
        for reg in bank.registers() {
            let name = &reg.name;
            if reg.mode.is_writable() {
                writeln!(self.write_cases, "\t{name} <= {name};").unwrap();
            } else {
                writeln!(
                    self.write_cases,
                    "\t// register {name} cannot be written because it is readthrough"
                )
                .unwrap();
            }
        }
        writeln!(self.write_cases, "end").unwrap();
    }

    /// Fragments in the order of [`MarkerConfig::structural`].
    ///
    /// [`MarkerConfig::structural`]: crate::config::MarkerConfig::structural
    pub fn payloads(&self) -> [&str; 6] {
        [
            &self.instances,
            &self.resets,
            &self.clear_wrticks,
            &self.write_cases,
            &self.readthroughs,
            &self.read_cases,
        ]
    }
}

/// One comment line per register listing name, offset, mode and comment.
pub fn inventory_comment(bank: &RegisterBank) -> String {
    let mut output = String::new();
    for reg in bank.registers() {
        let line = format!(
            "// reg: {:<20}  offset {}  mode: {:<20}    {}",
            reg.name,
            offset_hex(reg.offset),
            reg.mode.as_str(),
            reg.comment
        );
        writeln!(output, "{}", line.trim_end()).unwrap();
    }
    output
}

/// Resolve every marker of `template` for `bank`.
///
/// Scalar width markers are substituted first. All structural markers are
/// then located in that text and replaced together, each by its fragment at
/// the marker's indentation.
pub fn resolve_template(
    bank: &RegisterBank,
    template: &str,
    config: &GlueConfig,
) -> GlueResult<String> {
    let geometry = bank.geometry()?;
    let markers = &config.markers;

    let mut text = replace_scalar(template, &markers.data_width, geometry.data_width);
    text = replace_scalar(&text, &markers.addr_width, geometry.addr_width);
    text = replace_scalar(&text, &markers.decode_width, geometry.decode_width);

    let fragments = GlueFragments::build(bank, &geometry, config.reset_policy);
    let replacements: Vec<_> = config
        .markers
        .structural()
        .into_iter()
        .zip(fragments.payloads())
        .collect();
    let text = indented_replace_all(&text, &replacements, config.tab_size)?;

    debug!(
        "resolved glue template for {} registers: addr width {}, decode width {}",
        bank.len(),
        geometry.addr_width,
        geometry.decode_width
    );
    Ok(text)
}

/// Generate the finished glue document: the register inventory followed by
/// the resolved template.
///
/// ```
/// use regbank_generator::{generate_glue, GlueConfig, RegisterBank, RegisterMode};
/// use regbank_generator::DEFAULT_AXI4_LITE_TEMPLATE;
///
/// let mut bank = RegisterBank::new();
/// bank.add_register("ctrl", RegisterMode::Passive, "control").unwrap();
/// let glue = generate_glue(&bank, DEFAULT_AXI4_LITE_TEMPLATE, &GlueConfig::new()).unwrap();
/// assert!(glue.starts_with("// reg: ctrl"));
/// assert!(glue.contains("2'h0: reg_data_out <= ctrl;"));
/// ```
pub fn generate_glue(
    bank: &RegisterBank,
    template: &str,
    config: &GlueConfig,
) -> GlueResult<String> {
    let body = resolve_template(bank, template, config)?;
    Ok(inventory_comment(bank) + &body)
}
