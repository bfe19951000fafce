//! Multi-line pattern parsing with indentation stripping.
//!
//! A pattern is the inline text after `=` (or after a variant key) plus any
//! following lines indented relative to the entry's key line. The minimum
//! indentation common to all continuation lines is stripped; extra
//! indentation survives as literal text. Leading blank lines are dropped,
//! interior blank lines are kept as empty lines, and trailing whitespace is
//! trimmed from the end of the pattern.

use std::mem;

use super::Parser;
use super::ast::{Pattern, PatternElement};
use super::error::ErrorCode;

/// One source line of a pattern, collected before dedenting.
struct PendingLine {
    indent: usize,
    elements: Vec<PatternElement>,
    blank: bool,
    continuation: bool,
}

impl Parser<'_> {
    /// Parse a pattern. Returns `Ok(None)` when there is no content, which
    /// callers turn into "missing value" errors where a value is required.
    pub(super) fn parse_pattern(&mut self) -> Result<Option<Pattern>, ErrorCode> {
        let mut lines: Vec<PendingLine> = Vec::new();

        self.stream.skip_blank_inline();
        if !self.stream.at_eol() {
            let mut elements = Vec::new();
            self.parse_pattern_line(&mut elements)?;
            lines.push(PendingLine {
                indent: 0,
                elements,
                blank: false,
                continuation: false,
            });
        }

        loop {
            let marker = self.stream.mark();
            if !self.stream.skip_eol() {
                break;
            }
            let indent = self.stream.skip_blank_inline();
            if self.stream.at_eol() {
                lines.push(PendingLine {
                    indent: 0,
                    elements: Vec::new(),
                    blank: true,
                    continuation: true,
                });
                continue;
            }
            if indent == 0 {
                self.stream.reset(marker);
                break;
            }
            // An indented line starting with one of these characters belongs
            // to the surrounding entry machinery, not to the pattern text.
            if matches!(self.stream.peek(), Some(b'.' | b'[' | b'*' | b'}')) {
                self.stream.reset(marker);
                break;
            }
            let mut elements = Vec::new();
            self.parse_pattern_line(&mut elements)?;
            lines.push(PendingLine {
                indent,
                elements,
                blank: false,
                continuation: true,
            });
        }

        Ok(assemble(lines))
    }

    /// Parse one line's worth of text runs and placeables.
    fn parse_pattern_line(
        &mut self,
        elements: &mut Vec<PatternElement>,
    ) -> Result<(), ErrorCode> {
        loop {
            let run = self.stream.text_run();
            if !run.is_empty() {
                elements.push(PatternElement::Text(run.to_string()));
            }
            match self.stream.peek() {
                Some(b'{') => {
                    self.stream.advance(1);
                    let expression = self.parse_placeable()?;
                    elements.push(PatternElement::Placeable(expression));
                }
                Some(b'}') => return Err(ErrorCode::UnbalancedClosingBrace),
                _ => return Ok(()),
            }
        }
    }
}

/// Join collected lines into a pattern, applying the dedent rules.
fn assemble(lines: Vec<PendingLine>) -> Option<Pattern> {
    let common_indent = lines
        .iter()
        .filter(|line| line.continuation && !line.blank)
        .map(|line| line.indent)
        .min()
        .unwrap_or(0);

    let mut elements: Vec<PatternElement> = Vec::new();
    let mut text = String::new();
    let mut started = false;
    for line in lines {
        if !started && line.blank {
            continue;
        }
        if started {
            text.push('\n');
        }
        if line.continuation && !line.blank {
            for _ in common_indent..line.indent {
                text.push(' ');
            }
        }
        for element in line.elements {
            match element {
                PatternElement::Text(run) => text.push_str(&run),
                placeable => {
                    if !text.is_empty() {
                        elements.push(PatternElement::Text(mem::take(&mut text)));
                    }
                    elements.push(placeable);
                }
            }
        }
        started = true;
    }

    let trimmed = text.trim_end_matches([' ', '\n']);
    if !trimmed.is_empty() {
        elements.push(PatternElement::Text(trimmed.to_string()));
    }

    if elements.is_empty() {
        None
    } else {
        Some(Pattern { elements })
    }
}
