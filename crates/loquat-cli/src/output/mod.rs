//! CLI output helpers.

mod diagnostic;

pub use diagnostic::SyntaxDiagnostic;
