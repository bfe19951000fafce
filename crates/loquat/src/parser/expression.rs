//! Placeable and inline expression parsing.
//!
//! Whitespace inside `{ ... }` is insignificant and may span lines.
//! Placeables are flat substitution points: a `{` inside a placeable is a
//! parse error rather than a nested placeable.

use super::Parser;
use super::ast::{CallArguments, Expression, NamedArgument, Variant, VariantKey};
use super::error::ErrorCode;
use crate::types::Number;

impl Parser<'_> {
    /// Parse a placeable body after the opening `{`, through the closing `}`.
    pub(super) fn parse_placeable(&mut self) -> Result<Expression, ErrorCode> {
        self.stream.skip_blank();
        if self.stream.peek() == Some(b'{') {
            return Err(ErrorCode::NestedPlaceable);
        }
        let expression = self.parse_inline_expression()?;
        self.stream.skip_blank();
        if self.stream.take_if("->") {
            self.validate_selector(&expression)?;
            self.stream.skip_blank_inline();
            if !self.stream.at_eol() {
                return Err(ErrorCode::ExpectedToken('\n'));
            }
            let (variants, default) = self.parse_variants()?;
            return Ok(Expression::Select {
                selector: Box::new(expression),
                variants,
                default,
            });
        }
        if let Expression::TermReference {
            attribute: Some(_), ..
        } = &expression
        {
            return Err(ErrorCode::TermAttributeAsPlaceable);
        }
        if !self.stream.take_byte_if(b'}') {
            return Err(ErrorCode::ExpectedToken('}'));
        }
        Ok(expression)
    }

    fn validate_selector(&self, expression: &Expression) -> Result<(), ErrorCode> {
        match expression {
            Expression::MessageReference {
                attribute: None, ..
            } => Err(ErrorCode::MessageReferenceAsSelector),
            Expression::MessageReference {
                attribute: Some(_), ..
            } => Err(ErrorCode::MessageAttributeAsSelector),
            Expression::TermReference {
                attribute: None, ..
            } => Err(ErrorCode::TermReferenceAsSelector),
            _ => Ok(()),
        }
    }

    fn parse_variants(&mut self) -> Result<(Vec<Variant>, usize), ErrorCode> {
        let mut variants = Vec::new();
        let mut default: Option<usize> = None;
        loop {
            self.stream.skip_blank();
            if self.stream.take_byte_if(b'}') {
                break;
            }
            if self.stream.is_eof() {
                return Err(ErrorCode::ExpectedToken('}'));
            }
            let is_default = self.stream.take_byte_if(b'*');
            if !self.stream.take_byte_if(b'[') {
                return Err(if is_default {
                    ErrorCode::ExpectedToken('[')
                } else {
                    ErrorCode::MissingVariantKey
                });
            }
            self.stream.skip_blank();
            let key = self.parse_variant_key()?;
            self.stream.skip_blank();
            if !self.stream.take_byte_if(b']') {
                return Err(ErrorCode::ExpectedToken(']'));
            }
            if is_default {
                if default.is_some() {
                    return Err(ErrorCode::MultipleDefaultVariants);
                }
                default = Some(variants.len());
            }
            let value = self.parse_pattern()?.ok_or(ErrorCode::MissingValue)?;
            variants.push(Variant { key, value });
        }
        if variants.is_empty() {
            return Err(ErrorCode::MissingVariants);
        }
        let default = default.ok_or(ErrorCode::MissingDefaultVariant)?;
        Ok((variants, default))
    }

    fn parse_variant_key(&mut self) -> Result<VariantKey, ErrorCode> {
        match self.stream.peek() {
            Some(b) if b.is_ascii_digit() || b == b'-' => {
                self.number_literal().map(VariantKey::Number)
            }
            Some(b) if b.is_ascii_alphabetic() => self.identifier().map(VariantKey::Identifier),
            _ => Err(ErrorCode::MissingVariantKey),
        }
    }

    pub(super) fn parse_inline_expression(&mut self) -> Result<Expression, ErrorCode> {
        match self.stream.peek() {
            Some(b'"') => self.string_literal().map(Expression::StringLiteral),
            Some(b'$') => {
                self.stream.advance(1);
                self.identifier()
                    .map(|name| Expression::VariableReference { name })
            }
            Some(b'-') if self.stream.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic()) => {
                self.term_reference()
            }
            Some(b) if b.is_ascii_digit() || b == b'-' => {
                self.number_literal().map(Expression::NumberLiteral)
            }
            Some(b) if b.is_ascii_alphabetic() => self.message_or_function_reference(),
            _ => Err(ErrorCode::ExpectedInlineExpression),
        }
    }

    fn term_reference(&mut self) -> Result<Expression, ErrorCode> {
        self.stream.advance(1);
        let id = self.identifier()?;
        let attribute = self.reference_attribute()?;
        let arguments = if self.stream.peek() == Some(b'(') {
            Some(self.call_arguments(true)?)
        } else {
            None
        };
        Ok(Expression::TermReference {
            id,
            attribute,
            arguments,
        })
    }

    fn message_or_function_reference(&mut self) -> Result<Expression, ErrorCode> {
        let id = self.identifier()?;
        if self.stream.peek() == Some(b'(') {
            let arguments = self.call_arguments(false)?;
            return Ok(Expression::FunctionReference {
                name: id,
                arguments,
            });
        }
        let attribute = self.reference_attribute()?;
        Ok(Expression::MessageReference { id, attribute })
    }

    fn reference_attribute(&mut self) -> Result<Option<String>, ErrorCode> {
        if self.stream.take_byte_if(b'.') {
            self.identifier().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parse `( ... )` call arguments. Named argument values must be
    /// literals; positional arguments are rejected in term references.
    fn call_arguments(&mut self, in_term: bool) -> Result<CallArguments, ErrorCode> {
        self.stream.advance(1);
        self.stream.skip_blank();
        let mut positional = Vec::new();
        let mut named: Vec<NamedArgument> = Vec::new();
        loop {
            if self.stream.take_byte_if(b')') {
                break;
            }
            if self.stream.is_eof() {
                return Err(ErrorCode::ExpectedToken(')'));
            }
            let expression = self.parse_inline_expression()?;
            self.stream.skip_blank();
            match expression {
                Expression::MessageReference {
                    id: name,
                    attribute: None,
                } if self.stream.peek() == Some(b':') => {
                    self.stream.advance(1);
                    self.stream.skip_blank();
                    let value = self.parse_inline_expression()?;
                    if !matches!(
                        value,
                        Expression::StringLiteral(_) | Expression::NumberLiteral(_)
                    ) {
                        return Err(ErrorCode::ExpectedLiteral);
                    }
                    if named.iter().any(|argument| argument.name == name) {
                        return Err(ErrorCode::DuplicatedNamedArgument(name));
                    }
                    named.push(NamedArgument { name, value });
                }
                expression => {
                    if !named.is_empty() {
                        return Err(ErrorCode::PositionalArgumentFollowsNamed);
                    }
                    if in_term {
                        return Err(ErrorCode::PositionalArgumentInTerm);
                    }
                    positional.push(expression);
                }
            }
            self.stream.skip_blank();
            if self.stream.take_byte_if(b',') {
                self.stream.skip_blank();
            } else if !self.stream.take_byte_if(b')') {
                return Err(ErrorCode::ExpectedToken(')'));
            } else {
                break;
            }
        }
        Ok(CallArguments { positional, named })
    }

    fn number_literal(&mut self) -> Result<Number, ErrorCode> {
        let start = self.stream.pos();
        self.stream.take_byte_if(b'-');
        if self.stream.skip_while(|b| b.is_ascii_digit()).is_empty() {
            return Err(ErrorCode::ExpectedCharRange("0-9".to_string()));
        }
        if self.stream.take_byte_if(b'.')
            && self.stream.skip_while(|b| b.is_ascii_digit()).is_empty()
        {
            return Err(ErrorCode::ExpectedCharRange("0-9".to_string()));
        }
        let raw = self.stream.slice(start, self.stream.pos());
        Number::parse(raw).ok_or_else(|| ErrorCode::ExpectedCharRange("0-9".to_string()))
    }

    /// Parse a quoted string literal with its escape sequences resolved.
    fn string_literal(&mut self) -> Result<String, ErrorCode> {
        self.stream.advance(1);
        let mut value = String::new();
        loop {
            let chunk = self.stream.skip_while(|b| b != b'"' && b != b'\\');
            value.push_str(chunk);
            match self.stream.peek() {
                Some(b'"') => {
                    self.stream.advance(1);
                    return Ok(value);
                }
                Some(b'\\') => {
                    self.stream.advance(1);
                    value.push(self.escape_sequence()?);
                }
                _ => return Err(ErrorCode::UnterminatedStringLiteral),
            }
        }
    }

    fn escape_sequence(&mut self) -> Result<char, ErrorCode> {
        match self.stream.peek() {
            Some(b'\\') => {
                self.stream.advance(1);
                Ok('\\')
            }
            Some(b'"') => {
                self.stream.advance(1);
                Ok('"')
            }
            Some(b'u') => {
                self.stream.advance(1);
                self.unicode_escape(4)
            }
            Some(b'U') => {
                self.stream.advance(1);
                self.unicode_escape(6)
            }
            Some(b) if !matches!(b, b'\n' | b'\r') => {
                let unknown = self.stream.peek_char().map_or_else(String::new, |c| {
                    format!("\\{c}")
                });
                Err(ErrorCode::UnknownEscapeSequence(unknown))
            }
            _ => Err(ErrorCode::UnterminatedStringLiteral),
        }
    }

    /// `\uXXXX` (4 hex digits) or `\UXXXXXX` (6 hex digits).
    fn unicode_escape(&mut self, len: usize) -> Result<char, ErrorCode> {
        let start = self.stream.pos();
        for _ in 0..len {
            match self.stream.peek() {
                Some(b) if b.is_ascii_hexdigit() => self.stream.advance(1),
                _ => {
                    let seen = self.stream.slice(start, self.stream.pos());
                    return Err(ErrorCode::InvalidUnicodeEscapeSequence(seen.to_string()));
                }
            }
        }
        let hex = self.stream.slice(start, self.stream.pos());
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| ErrorCode::InvalidUnicodeEscapeSequence(hex.to_string()))
    }
}
