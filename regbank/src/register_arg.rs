// Licensed under the Apache-2.0 license

//! Register descriptions given on the command line.

use anyhow::{bail, Context, Result};
use regbank_generator::{RegisterBank, RegisterMode};
use std::str::FromStr;

/// A register written as `name[@offset][:mode[:comment]]`.
///
/// ```
/// use regbank::RegisterArg;
/// use regbank_generator::RegisterMode;
///
/// let arg: RegisterArg = "status@0x10:readthrough:link status".parse().unwrap();
/// assert_eq!(arg.name, "status");
/// assert_eq!(arg.offset, Some(0x10));
/// assert_eq!(arg.mode, RegisterMode::ReadThrough);
/// assert_eq!(arg.comment, "link status");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterArg {
    pub name: String,
    /// Explicit byte offset; otherwise the bank's cursor is used.
    pub offset: Option<u32>,
    pub mode: RegisterMode,
    pub comment: String,
}

impl RegisterArg {
    /// Add this register to `bank`, moving the cursor first if an offset was
    /// given.
    pub fn add_to(&self, bank: &mut RegisterBank) -> Result<()> {
        if let Some(offset) = self.offset {
            bank.set_offset_cursor(offset)?;
        }
        bank.add_register(&self.name, self.mode, &self.comment)?;
        Ok(())
    }
}

impl FromStr for RegisterArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (head, rest) = match s.split_once(':') {
            Some((head, rest)) => (head, Some(rest)),
            None => (s, None),
        };
        let (name, offset) = match head.split_once('@') {
            Some((name, offset)) => (name, Some(parse_offset(offset)?)),
            None => (head, None),
        };
        if name.is_empty() {
            bail!("register {s:?} has no name");
        }

        let (mode, comment) = match rest.map(|r| r.split_once(':').unwrap_or((r, ""))) {
            Some((mode, comment)) if !mode.is_empty() => (mode.parse()?, comment),
            Some((_, comment)) => (RegisterMode::default(), comment),
            None => (RegisterMode::default(), ""),
        };

        Ok(Self {
            name: name.to_string(),
            offset,
            mode,
            comment: comment.to_string(),
        })
    }
}

/// Decimal, or hexadecimal with a `0x` prefix.
fn parse_offset(s: &str) -> Result<u32> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.with_context(|| format!("invalid register offset {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let arg: RegisterArg = "ctrl".parse().unwrap();
        assert_eq!(
            arg,
            RegisterArg {
                name: "ctrl".into(),
                offset: None,
                mode: RegisterMode::Passive,
                comment: String::new(),
            }
        );
    }

    #[test]
    fn test_offsets() {
        let arg: RegisterArg = "a@16".parse().unwrap();
        assert_eq!(arg.offset, Some(16));
        let arg: RegisterArg = "a@0x40:writethrough".parse().unwrap();
        assert_eq!(arg.offset, Some(0x40));
        assert_eq!(arg.mode, RegisterMode::WriteThrough);
        assert!("a@ten".parse::<RegisterArg>().is_err());
    }

    #[test]
    fn test_comment_keeps_colons() {
        let arg: RegisterArg = "irq::mask: bit 0 = rx".parse().unwrap();
        assert_eq!(arg.mode, RegisterMode::Passive);
        assert_eq!(arg.comment, "mask: bit 0 = rx");
    }

    #[test]
    fn test_bad_input() {
        assert!("@4".parse::<RegisterArg>().is_err());
        assert!("r:sideways".parse::<RegisterArg>().is_err());
    }

    #[test]
    fn test_add_to_bank() {
        let mut bank = RegisterBank::new();
        for arg in ["ctrl", "status:readthrough", "irq@0x20:writethrough:irq"] {
            arg.parse::<RegisterArg>().unwrap().add_to(&mut bank).unwrap();
        }
        let offsets: Vec<_> = bank.registers().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 4, 0x20]);

        let dup: RegisterArg = "again@4".parse().unwrap();
        assert!(dup.add_to(&mut bank).is_err());
    }
}
