// Licensed under the Apache-2.0 license

//! Marker-based text substitution.
//!
//! A base template carries marker tokens on lines of their own. Injection
//! replaces a marker with a multi-line payload, indenting every payload line
//! after the first to the marker's column so the result reads as if it had
//! been written in place:
//!
//! ```
//! use regbank_generator::template::indented_replace;
//!
//! let text = "begin\n    MARKER\nend\n";
//! let out = indented_replace(text, "MARKER", "a <= 0;\nb <= 0;\n", 2).unwrap();
//! assert_eq!(out, "begin\n    a <= 0;\n    b <= 0;\nend\n");
//! ```

use crate::error::{GlueError, GlueResult};
use std::fmt::Display;

/// Tab stop used to measure marker indentation unless configured otherwise.
pub const DEFAULT_TAB_SIZE: usize = 2;

/// Expand tabs to spaces using tab stops every `tab_size` columns.
pub fn expand_tabs(s: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut out = String::with_capacity(s.len());
    let mut column = 0;
    for c in s.chars() {
        match c {
            '\t' => {
                let pad = tab_size - column % tab_size;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Number of columns of leading whitespace on `line`, counting tabs as
/// advancing to the next tab stop.
pub fn leading_indent(line: &str, tab_size: usize) -> usize {
    expand_tabs(line, tab_size)
        .chars()
        .take_while(|c| *c == ' ')
        .count()
}

/// Replace the single occurrence of `marker` in `text` with `payload`.
///
/// Every newline in the payload is followed by as many spaces as the marker
/// line is indented; leading and trailing whitespace of the payload is then
/// trimmed so the first line lands exactly where the marker was.
///
/// Fails if the marker is absent or appears more than once.
pub fn indented_replace(
    text: &str,
    marker: &str,
    payload: &str,
    tab_size: usize,
) -> GlueResult<String> {
    indented_replace_all(text, &[(marker, payload)], tab_size)
}

/// Replace several markers of `text` at once, each as [`indented_replace`]
/// would.
///
/// Every marker is located in `text` before anything is substituted, so a
/// payload that happens to contain marker text is never mistaken for a
/// marker.
pub fn indented_replace_all(
    text: &str,
    replacements: &[(&str, &str)],
    tab_size: usize,
) -> GlueResult<String> {
    let mut spans = Vec::with_capacity(replacements.len());
    for &(marker, payload) in replacements {
        let start = find_unique(text, marker)?;
        spans.push((start, marker, payload));
    }
    spans.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut previous: Option<&str> = None;
    for (start, marker, payload) in spans {
        if start < cursor {
            return Err(GlueError::OverlappingTemplateMarkers {
                first: previous.unwrap_or_default().to_string(),
                second: marker.to_string(),
            });
        }

        let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
        let indent = leading_indent(&text[line_start..start], tab_size);
        let indented = payload.replace('\n', &format!("\n{}", " ".repeat(indent)));

        out.push_str(&text[cursor..start]);
        out.push_str(indented.trim_matches(|c: char| c.is_ascii_whitespace()));
        cursor = start + marker.len();
        previous = Some(marker);
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}

/// Byte position of the only occurrence of `marker` in `text`.
fn find_unique(text: &str, marker: &str) -> GlueResult<usize> {
    let mut found = if marker.is_empty() {
        Vec::new()
    } else {
        text.match_indices(marker).map(|(i, _)| i).collect()
    };
    match found.len() {
        0 => Err(GlueError::MissingTemplateMarker {
            marker: marker.to_string(),
        }),
        1 => Ok(found.remove(0)),
        count => Err(GlueError::DuplicateTemplateMarker {
            marker: marker.to_string(),
            count,
        }),
    }
}

/// Replace every occurrence of `marker` with `value`.
pub fn replace_scalar(text: &str, marker: &str, value: impl Display) -> String {
    if marker.is_empty() {
        return text.to_string();
    }
    text.replace(marker, &value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tx", 2), "  x");
        assert_eq!(expand_tabs("\t\tx", 4), "        x");
        assert_eq!(expand_tabs(" \tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(expand_tabs("a\n\tb", 2), "a\n  b");
    }

    #[test]
    fn test_leading_indent() {
        assert_eq!(leading_indent("    MARKER", 2), 4);
        assert_eq!(leading_indent("\t\tMARKER", 2), 4);
        assert_eq!(leading_indent("\t  MARKER", 4), 6);
        assert_eq!(leading_indent("MARKER", 2), 0);
        assert_eq!(leading_indent("   ", 2), 3);
    }

    #[test]
    fn test_two_line_payload_keeps_indent() {
        let text = "module m;\n    MARKER\nendmodule\n";
        let out = indented_replace(text, "MARKER", "first;\nsecond;", 2).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[1], "    first;");
        assert_eq!(lines[2], "    second;");
        assert_eq!(lines[3], "endmodule");
    }

    #[test]
    fn test_payload_is_trimmed() {
        let text = "  X\n";
        let out = indented_replace(text, "X", "\n\na;\nb;\n\n", 2).unwrap();
        assert_eq!(out, "  a;\n  b;\n");
    }

    #[test]
    fn test_payload_keeps_own_indent() {
        let text = "\tX\n";
        let out = indented_replace(text, "X", "begin\n\tfoo;\nend\n", 2).unwrap();
        assert_eq!(out, "\tbegin\n  \tfoo;\n  end\n");
    }

    #[test]
    fn test_empty_payload() {
        let text = "a\n    X\nb\n";
        let out = indented_replace(text, "X", "", 2).unwrap();
        assert_eq!(out, "a\n    \nb\n");
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            indented_replace("nothing here", "X_MARK_X", "a", 2),
            Err(GlueError::MissingTemplateMarker {
                marker: "X_MARK_X".into()
            })
        );
        assert!(matches!(
            indented_replace("text", "", "a", 2),
            Err(GlueError::MissingTemplateMarker { .. })
        ));
    }

    #[test]
    fn test_duplicate_marker() {
        assert_eq!(
            indented_replace("X_MARK_X\n  X_MARK_X\n", "X_MARK_X", "a", 2),
            Err(GlueError::DuplicateTemplateMarker {
                marker: "X_MARK_X".into(),
                count: 2
            })
        );
    }

    #[test]
    fn test_replace_all_ignores_marker_text_in_payloads() {
        let text = "  A\n    B\n";
        let out = indented_replace_all(text, &[("A", "B;\nB;"), ("B", "A;")], 2).unwrap();
        assert_eq!(out, "  B;\n  B;\n    A;\n");
    }

    #[test]
    fn test_replace_all_in_text_order() {
        let text = "SECOND\nFIRST\n";
        let out = indented_replace_all(text, &[("FIRST", "1"), ("SECOND", "2")], 2).unwrap();
        assert_eq!(out, "2\n1\n");
    }

    #[test]
    fn test_overlapping_markers() {
        assert_eq!(
            indented_replace_all("ABC", &[("AB", "x"), ("BC", "y")], 2),
            Err(GlueError::OverlappingTemplateMarkers {
                first: "AB".into(),
                second: "BC".into()
            })
        );
    }

    #[test]
    fn test_replace_scalar() {
        let text = "[X_W_X-1:0] a; [X_W_X-1:0] b;";
        assert_eq!(replace_scalar(text, "X_W_X", 32), "[32-1:0] a; [32-1:0] b;");
        assert_eq!(replace_scalar("abc", "Q", 1), "abc");
    }
}
