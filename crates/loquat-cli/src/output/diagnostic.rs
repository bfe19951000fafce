//! Miette diagnostic wrapper for parse errors.

use std::path::Path;

use loquat::ParserError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic for FTL syntax errors.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(loquat::syntax))]
pub struct SyntaxDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,
}

impl SyntaxDiagnostic {
    /// Create a diagnostic from a parse error with source context.
    pub fn from_parser_error(path: &Path, content: &str, error: &ParserError) -> Self {
        let offset = line_offset(content, error.line) + error.column.saturating_sub(1);

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = offset.min(content.len());

        SyntaxDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message: error.to_string(),
        }
    }
}

/// Byte offset of the start of a 1-based line, counting `\n`, `\r\n` and
/// bare `\r` as single line breaks like the parser does.
fn line_offset(content: &str, line: usize) -> usize {
    let bytes = content.as_bytes();
    let mut offset = 0;
    let mut current = 1;
    while current < line && offset < bytes.len() {
        match bytes[offset] {
            b'\n' => {
                offset += 1;
                current += 1;
            }
            b'\r' => {
                offset += 1;
                if bytes.get(offset) == Some(&b'\n') {
                    offset += 1;
                }
                current += 1;
            }
            _ => offset += 1,
        }
    }
    offset
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use loquat::{ErrorCode, ParserError};

    use super::{SyntaxDiagnostic, line_offset};

    #[test]
    fn line_offsets_count_crlf_as_one_break() {
        let content = "a = A\r\nb = B\r\n??? bad\r\n";
        assert_eq!(line_offset(content, 1), 0);
        assert_eq!(line_offset(content, 2), 7);
        assert_eq!(line_offset(content, 3), 14);
    }

    #[test]
    fn spans_point_at_the_reported_column() {
        let content = "a = A\r\n??? bad\r\n";
        let error = ParserError::new(ErrorCode::ExpectedEntry, 2, 1);
        let diagnostic = SyntaxDiagnostic::from_parser_error(Path::new("t.ftl"), content, &error);
        assert_eq!(diagnostic.span.offset(), 7);
    }
}
