// Licensed under the Apache-2.0 license

//! Configuration for glue and header generation.
//!
//! This module provides [`MarkerConfig`] which names the marker tokens the
//! glue synthesizer looks for in a base template, [`GlueConfig`] which
//! bundles the markers with the reset policy, and [`HeaderConfig`] which
//! controls how the C structure is rendered.

use crate::template::DEFAULT_TAB_SIZE;

/// Marker tokens resolved in the base template.
///
/// The three scalar markers are replaced everywhere by literal numbers. Each
/// structural marker must appear exactly once and is replaced by a block of
/// generated Verilog indented to the marker's column.
///
/// # Example
///
/// ```
/// use regbank_generator::config::MarkerConfig;
///
/// let markers = MarkerConfig::with_defaults();
/// assert_eq!(markers.data_width, "X_AXI_DATA_WIDTH_X");
///
/// let markers = MarkerConfig::with_defaults().read_cases("@READ_CASES@");
/// assert_eq!(markers.read_cases, "@READ_CASES@");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerConfig {
    /// Replaced by the data bus width.
    pub data_width: String,
    /// Replaced by the byte address bus width.
    pub addr_width: String,
    /// Replaced by the register decode width.
    pub decode_width: String,

    /// Register declarations and readthrough/writethrough wiring.
    pub instances: String,
    /// Reset assignments.
    pub resets: String,
    /// Unconditional clears of the write ticks.
    pub clear_wrticks: String,
    /// Write case branches, including the default branch.
    pub write_cases: String,
    /// Readthrough refresh assignments.
    pub readthroughs: String,
    /// Read case branches, including the default branch.
    pub read_cases: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl MarkerConfig {
    /// Marker names used by the built-in AXI4-Lite template.
    pub fn with_defaults() -> Self {
        Self {
            data_width: "X_AXI_DATA_WIDTH_X".to_string(),
            addr_width: "X_AXI_ADDR_WIDTH_X".to_string(),
            decode_width: "X_AXI_OPT_MEM_ADDR_BITS_X".to_string(),
            instances: "X_GLUE_REGISTER_INSTANCES_X".to_string(),
            resets: "X_GLUE_REGISTER_RESETS_X".to_string(),
            clear_wrticks: "X_GLUE_REGISTER_CLEAR_WRTICKS_X".to_string(),
            write_cases: "X_GLUE_REGISTER_WRITECASES_X".to_string(),
            readthroughs: "X_GLUE_REGISTER_READTHROUGHS_X".to_string(),
            read_cases: "X_GLUE_REGISTER_READCASES_X".to_string(),
        }
    }

    pub fn data_width(mut self, marker: &str) -> Self {
        self.data_width = marker.to_string();
        self
    }

    pub fn addr_width(mut self, marker: &str) -> Self {
        self.addr_width = marker.to_string();
        self
    }

    pub fn decode_width(mut self, marker: &str) -> Self {
        self.decode_width = marker.to_string();
        self
    }

    pub fn instances(mut self, marker: &str) -> Self {
        self.instances = marker.to_string();
        self
    }

    pub fn resets(mut self, marker: &str) -> Self {
        self.resets = marker.to_string();
        self
    }

    pub fn clear_wrticks(mut self, marker: &str) -> Self {
        self.clear_wrticks = marker.to_string();
        self
    }

    pub fn write_cases(mut self, marker: &str) -> Self {
        self.write_cases = marker.to_string();
        self
    }

    pub fn readthroughs(mut self, marker: &str) -> Self {
        self.readthroughs = marker.to_string();
        self
    }

    pub fn read_cases(mut self, marker: &str) -> Self {
        self.read_cases = marker.to_string();
        self
    }

    /// Structural markers in the order they are injected.
    pub fn structural(&self) -> [&str; 6] {
        [
            self.instances.as_str(),
            self.resets.as_str(),
            self.clear_wrticks.as_str(),
            self.write_cases.as_str(),
            self.readthroughs.as_str(),
            self.read_cases.as_str(),
        ]
    }
}

/// Value every register takes while the bus is in reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Reset to zero.
    #[default]
    Zero,
    /// Reset each register to its own byte offset, so a bus master can check
    /// it is reading the register it thinks it is.
    Offset,
}

/// Configuration for glue generation.
///
/// # Example
///
/// ```
/// use regbank_generator::config::{GlueConfig, ResetPolicy};
///
/// let config = GlueConfig::new().reset_policy(ResetPolicy::Offset);
/// assert_eq!(config.reset_policy, ResetPolicy::Offset);
/// assert_eq!(config.tab_size, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlueConfig {
    pub markers: MarkerConfig,
    pub reset_policy: ResetPolicy,
    /// Tab stop used when measuring the indentation of a marker line.
    pub tab_size: usize,
}

impl Default for GlueConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GlueConfig {
    pub fn new() -> Self {
        Self {
            markers: MarkerConfig::with_defaults(),
            reset_policy: ResetPolicy::Zero,
            tab_size: DEFAULT_TAB_SIZE,
        }
    }

    pub fn markers(mut self, markers: MarkerConfig) -> Self {
        self.markers = markers;
        self
    }

    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }
}

/// Configuration for the C structure emitter.
///
/// # Example
///
/// ```
/// use regbank_generator::config::HeaderConfig;
///
/// let config = HeaderConfig::new().word_type("unsigned long").include_stdint(false);
/// assert_eq!(config.word_type, "unsigned long");
/// assert!(config.size_assert);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderConfig {
    /// C type of every register and padding word. Must be 4 bytes wide on the
    /// target for the layout to match the bus.
    pub word_type: String,
    /// Emit `#include <stdint.h>` ahead of the structure.
    pub include_stdint: bool,
    /// Emit a `_Static_assert` on the structure size.
    pub size_assert: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderConfig {
    pub fn new() -> Self {
        Self {
            word_type: "uint32_t".to_string(),
            include_stdint: true,
            size_assert: true,
        }
    }

    pub fn word_type(mut self, word_type: &str) -> Self {
        self.word_type = word_type.to_string();
        self
    }

    pub fn include_stdint(mut self, include: bool) -> Self {
        self.include_stdint = include;
        self
    }

    pub fn size_assert(mut self, size_assert: bool) -> Self {
        self.size_assert = size_assert;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let markers = MarkerConfig::with_defaults();
        assert_eq!(markers.addr_width, "X_AXI_ADDR_WIDTH_X");
        assert_eq!(markers.decode_width, "X_AXI_OPT_MEM_ADDR_BITS_X");
        assert_eq!(
            markers.structural(),
            [
                "X_GLUE_REGISTER_INSTANCES_X",
                "X_GLUE_REGISTER_RESETS_X",
                "X_GLUE_REGISTER_CLEAR_WRTICKS_X",
                "X_GLUE_REGISTER_WRITECASES_X",
                "X_GLUE_REGISTER_READTHROUGHS_X",
                "X_GLUE_REGISTER_READCASES_X",
            ]
        );
    }

    #[test]
    fn test_custom_markers() {
        let markers = MarkerConfig::with_defaults()
            .instances("%INST%")
            .resets("%RST%");
        assert_eq!(markers.structural()[0], "%INST%");
        assert_eq!(markers.structural()[1], "%RST%");
        assert_eq!(markers.structural()[2], "X_GLUE_REGISTER_CLEAR_WRTICKS_X");
    }

    #[test]
    fn test_glue_config_defaults() {
        let config = GlueConfig::default();
        assert_eq!(config, GlueConfig::new());
        assert_eq!(config.reset_policy, ResetPolicy::Zero);
    }

    #[test]
    fn test_header_config_defaults() {
        let config = HeaderConfig::default();
        assert_eq!(config.word_type, "uint32_t");
        assert!(config.include_stdint);
        assert!(config.size_assert);
    }
}
