//! Structured parse errors.
//!
//! Every error carries a stable code and the 1-based line it was detected
//! on. Errors never abort parsing of the rest of the resource; they are
//! collected on the [`Resource`](super::ast::Resource) alongside a `Junk`
//! entry covering the unparseable span.

use serde::Serialize;
use thiserror::Error;

/// Stable classification of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum ErrorCode {
    #[error("expected a message, term or comment")]
    ExpectedEntry,
    #[error("expected token `{0}`")]
    ExpectedToken(char),
    #[error("expected a character from range `{0}`")]
    ExpectedCharRange(String),
    #[error("message `{0}` must have a value or attributes")]
    ExpectedMessageField(String),
    #[error("term `-{0}` must have a value")]
    ExpectedTermField(String),
    #[error("expected a value")]
    MissingValue,
    #[error("a select expression must have at least one variant")]
    MissingVariants,
    #[error("expected a variant key")]
    MissingVariantKey,
    #[error("a select expression must have exactly one default variant")]
    MissingDefaultVariant,
    #[error("a select expression can only have one default variant")]
    MultipleDefaultVariants,
    #[error("unterminated string literal")]
    UnterminatedStringLiteral,
    #[error("unknown escape sequence `{0}`")]
    UnknownEscapeSequence(String),
    #[error("invalid unicode escape sequence `{0}`")]
    InvalidUnicodeEscapeSequence(String),
    #[error("expected a string or number literal")]
    ExpectedLiteral,
    #[error("positional arguments are not allowed in term references")]
    PositionalArgumentInTerm,
    #[error("positional arguments must come before named arguments")]
    PositionalArgumentFollowsNamed,
    #[error("the named argument `{0}` appears more than once")]
    DuplicatedNamedArgument(String),
    #[error("a message reference cannot be used as a selector")]
    MessageReferenceAsSelector,
    #[error("a term reference cannot be used as a selector without an attribute")]
    TermReferenceAsSelector,
    #[error("a message attribute cannot be used as a selector")]
    MessageAttributeAsSelector,
    #[error("a term attribute cannot be used as a placeable")]
    TermAttributeAsPlaceable,
    #[error("placeables cannot be nested")]
    NestedPlaceable,
    #[error("unbalanced closing brace in a pattern")]
    UnbalancedClosingBrace,
    #[error("expected an inline expression")]
    ExpectedInlineExpression,
}

impl ErrorCode {
    /// Stable short code for tooling, e.g. `E0010`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ExpectedEntry => "E0002",
            ErrorCode::ExpectedToken(_) => "E0003",
            ErrorCode::ExpectedCharRange(_) => "E0004",
            ErrorCode::ExpectedMessageField(_) => "E0005",
            ErrorCode::ExpectedTermField(_) => "E0006",
            ErrorCode::MissingValue => "E0007",
            ErrorCode::MissingVariants => "E0008",
            ErrorCode::MissingVariantKey => "E0009",
            ErrorCode::MissingDefaultVariant => "E0010",
            ErrorCode::MultipleDefaultVariants => "E0011",
            ErrorCode::UnterminatedStringLiteral => "E0012",
            ErrorCode::UnknownEscapeSequence(_) => "E0013",
            ErrorCode::InvalidUnicodeEscapeSequence(_) => "E0014",
            ErrorCode::ExpectedLiteral => "E0015",
            ErrorCode::PositionalArgumentInTerm => "E0016",
            ErrorCode::PositionalArgumentFollowsNamed => "E0017",
            ErrorCode::DuplicatedNamedArgument(_) => "E0018",
            ErrorCode::MessageReferenceAsSelector => "E0019",
            ErrorCode::TermReferenceAsSelector => "E0020",
            ErrorCode::MessageAttributeAsSelector => "E0021",
            ErrorCode::TermAttributeAsPlaceable => "E0022",
            ErrorCode::NestedPlaceable => "E0023",
            ErrorCode::UnbalancedClosingBrace => "E0024",
            ErrorCode::ExpectedInlineExpression => "E0025",
        }
    }
}

/// A parse error with its location and rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{line}:{column}: [{}] {message}", .code.code())]
pub struct ParserError {
    pub code: ErrorCode,
    /// 1-based line the error was detected on.
    pub line: usize,
    /// 1-based column the error was detected at.
    pub column: usize,
    pub message: String,
}

impl ParserError {
    pub fn new(code: ErrorCode, line: usize, column: usize) -> Self {
        let message = code.to_string();
        ParserError {
            code,
            line,
            column,
            message,
        }
    }
}
