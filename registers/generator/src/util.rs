// Licensed under the Apache-2.0 license

//! Utility functions for identifier checks, comments and number formatting.

/// Returns true if `name` can be used verbatim both as a Verilog signal name
/// and as a C structure field name.
///
/// # Examples
/// ```
/// use regbank_generator::util::is_identifier;
/// assert!(is_identifier("ctrl_reg0"));
/// assert!(!is_identifier("0ctrl"));
/// assert!(!is_identifier("ctrl-reg"));
/// ```
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Formats a byte offset the way the generated documents annotate it.
///
/// # Examples
/// ```
/// use regbank_generator::util::offset_hex;
/// assert_eq!(offset_hex(0), "0x0000");
/// assert_eq!(offset_hex(0x44), "0x0044");
/// assert_eq!(offset_hex(0x10000), "0x10000");
/// ```
pub fn offset_hex(offset: u32) -> String {
    format!("0x{offset:04x}")
}

/// Wraps free text in a C block comment, breaking up any `*/` inside it.
///
/// Unlike a `//` comment, a block comment stays closed on its own line even
/// if the text ends with a backslash.
///
/// # Examples
/// ```
/// use regbank_generator::util::c_block_comment;
/// assert_eq!(c_block_comment("control"), "/* control */");
/// assert_eq!(c_block_comment("a */ b"), "/* a * / b */");
/// ```
pub fn c_block_comment(text: &str) -> String {
    format!("/* {} */", text.replace("*/", "* /"))
}

/// Number of bits needed to represent `val` (0 needs 0 bits).
pub fn bit_length(val: u64) -> u32 {
    u64::BITS - val.leading_zeros()
}
