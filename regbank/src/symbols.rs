// Licensed under the Apache-2.0 license

//! Symbols shared between jobs and emitted as Verilog or C defines.
//!
//! Symbols defined on the command line are visible to every job. Symbols
//! defined by a job stay visible to the jobs after it in the same source
//! file; the runner checkpoints the table before a file and restores it
//! afterwards so files do not leak symbols into each other.

use std::fmt::Write;

/// Value given to a symbol defined without an explicit value.
pub const DEFAULT_SYMBOL_VALUE: &str = "1";

/// Insertion-ordered symbol table with a single checkpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<(String, String)>,
    checkpoint: Option<Vec<(String, String)>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `symbol` with the value `1`.
    pub fn define(&mut self, symbol: &str) {
        self.define_value(symbol, DEFAULT_SYMBOL_VALUE);
    }

    /// Define `symbol` with `value`. Redefining keeps the original position.
    pub fn define_value(&mut self, symbol: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == symbol) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((symbol.to_string(), value.to_string())),
        }
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.value(symbol).is_some()
    }

    pub fn value(&self, symbol: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == symbol)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remember the current symbols, replacing any earlier checkpoint.
    pub fn checkpoint(&mut self) {
        self.checkpoint = Some(self.entries.clone());
    }

    /// Rewind to the last checkpoint. Without one, nothing changes.
    pub fn restore(&mut self) {
        if let Some(saved) = &self.checkpoint {
            self.entries = saved.clone();
        }
    }

    /// One `` `define KEY VALUE `` line per symbol.
    pub fn verilog_defines(&self) -> String {
        let mut output = String::new();
        for (key, value) in self.iter() {
            writeln!(output, "`define {key} {value}").unwrap();
        }
        output
    }

    /// One `#define KEY VALUE` line per symbol.
    pub fn c_defines(&self) -> String {
        let mut output = String::new();
        for (key, value) in self.iter() {
            writeln!(output, "#define {key} {value}").unwrap();
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut symbols = SymbolTable::new();
        assert!(!symbols.is_defined("AXI_DEBUG"));
        assert_eq!(symbols.value("AXI_DEBUG"), None);

        symbols.define("AXI_DEBUG");
        symbols.define_value("FIFO_DEPTH", "16");
        assert!(symbols.is_defined("AXI_DEBUG"));
        assert_eq!(symbols.value("AXI_DEBUG"), Some("1"));
        assert_eq!(symbols.value("FIFO_DEPTH"), Some("16"));
    }

    #[test]
    fn test_redefine_keeps_order() {
        let mut symbols = SymbolTable::new();
        symbols.define("A");
        symbols.define("B");
        symbols.define_value("A", "7");
        let keys: Vec<_> = symbols.iter().collect();
        assert_eq!(keys, vec![("A", "7"), ("B", "1")]);
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut symbols = SymbolTable::new();
        symbols.define("FROM_CLI");
        symbols.checkpoint();

        symbols.define("FROM_JOB");
        symbols.define_value("FROM_CLI", "2");
        symbols.restore();

        assert!(!symbols.is_defined("FROM_JOB"));
        assert_eq!(symbols.value("FROM_CLI"), Some("1"));

        // The checkpoint survives a restore.
        symbols.define("AGAIN");
        symbols.restore();
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_restore_without_checkpoint() {
        let mut symbols = SymbolTable::new();
        symbols.define("A");
        symbols.restore();
        assert!(symbols.is_defined("A"));
    }

    #[test]
    fn test_define_text() {
        let mut symbols = SymbolTable::new();
        symbols.define("AXI_DEBUG");
        symbols.define_value("WIDTH", "32");
        assert_eq!(
            symbols.verilog_defines(),
            "`define AXI_DEBUG 1\n`define WIDTH 32\n"
        );
        assert_eq!(symbols.c_defines(), "#define AXI_DEBUG 1\n#define WIDTH 32\n");
        assert_eq!(SymbolTable::new().c_defines(), "");
    }
}
