//! Recursive-descent parser for FTL resource text.
//!
//! The top-level loop parses one entry at a time. A structural failure
//! never aborts the resource: the parser records a structured error, skips
//! to the next plausible entry boundary (a line starting with an identifier,
//! `-` or `#` in the first column) and stores the skipped span as a `Junk`
//! entry. The rest of the resource still parses.

pub mod ast;
mod error;
mod expression;
mod pattern;
mod stream;

pub use error::{ErrorCode, ParserError};
pub use stream::ScanMode;

use ast::{Comment, CommentLevel, Entry, Message, Resource, Term};
use stream::Stream;

/// Parse a source text into a [`Resource`] with the default scan mode.
pub fn parse(source: &str) -> Resource {
    Parser::new(source).parse()
}

pub struct Parser<'s> {
    stream: Stream<'s>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Parser::with_scan_mode(source, ScanMode::default())
    }

    pub fn with_scan_mode(source: &'s str, mode: ScanMode) -> Self {
        Parser {
            stream: Stream::new(source, mode),
        }
    }

    /// Parse the whole resource. Errors are collected, never thrown.
    pub fn parse(mut self) -> Resource {
        let mut entries = Vec::new();
        let mut errors = Vec::new();
        let mut pending_comment: Option<Comment> = None;

        self.stream.skip_blank_block();
        while !self.stream.is_eof() {
            let start = self.stream.mark();
            match self.parse_entry() {
                Ok(Entry::Comment(comment)) => {
                    if let Some(previous) = pending_comment.take() {
                        entries.push(Entry::Comment(previous));
                    }
                    if comment.level == CommentLevel::Standalone && self.at_entry_head() {
                        pending_comment = Some(comment);
                    } else {
                        entries.push(Entry::Comment(comment));
                    }
                }
                Ok(mut entry) => {
                    match &mut entry {
                        Entry::Message(message) => message.comment = pending_comment.take(),
                        Entry::Term(term) => term.comment = pending_comment.take(),
                        _ => {}
                    }
                    entries.push(entry);
                }
                Err(code) => {
                    errors.push(ParserError::new(
                        code,
                        self.stream.line(),
                        self.stream.column(),
                    ));
                    self.stream.reset(start);
                    let content = self.skip_to_next_entry().to_string();
                    if let Some(previous) = pending_comment.take() {
                        entries.push(Entry::Comment(previous));
                    }
                    entries.push(Entry::Junk { content });
                }
            }
            self.stream.skip_blank_block();
        }
        if let Some(comment) = pending_comment {
            entries.push(Entry::Comment(comment));
        }
        Resource { entries, errors }
    }

    fn parse_entry(&mut self) -> Result<Entry, ErrorCode> {
        match self.stream.peek() {
            Some(b'#') => self.parse_comment().map(Entry::Comment),
            Some(b'-') => self.parse_term().map(Entry::Term),
            Some(b) if b.is_ascii_alphabetic() => self.parse_message().map(Entry::Message),
            _ => Err(ErrorCode::ExpectedEntry),
        }
    }

    fn parse_message(&mut self) -> Result<Message, ErrorCode> {
        let id = self.identifier()?;
        self.stream.skip_blank_inline();
        if !self.stream.take_byte_if(b'=') {
            return Err(ErrorCode::ExpectedToken('='));
        }
        let value = self.parse_pattern()?;
        let attributes = self.parse_attributes()?;
        if value.is_none() && attributes.is_empty() {
            return Err(ErrorCode::ExpectedMessageField(id));
        }
        Ok(Message {
            id,
            value,
            attributes,
            comment: None,
        })
    }

    fn parse_term(&mut self) -> Result<Term, ErrorCode> {
        self.stream.advance(1);
        let id = self.identifier()?;
        self.stream.skip_blank_inline();
        if !self.stream.take_byte_if(b'=') {
            return Err(ErrorCode::ExpectedToken('='));
        }
        let value = self
            .parse_pattern()?
            .ok_or_else(|| ErrorCode::ExpectedTermField(id.clone()))?;
        let attributes = self.parse_attributes()?;
        Ok(Term {
            id,
            value,
            attributes,
            comment: None,
        })
    }

    /// Attributes are continuation lines: a line break, at least one column
    /// of indentation, then `.`. An unindented `.` ends the entry instead.
    fn parse_attributes(&mut self) -> Result<Vec<ast::Attribute>, ErrorCode> {
        let mut attributes = Vec::new();
        loop {
            let marker = self.stream.mark();
            if !self.stream.skip_eol()
                || self.stream.skip_blank_inline() == 0
                || !self.stream.take_byte_if(b'.')
            {
                self.stream.reset(marker);
                break;
            }
            let id = self.identifier()?;
            self.stream.skip_blank_inline();
            if !self.stream.take_byte_if(b'=') {
                return Err(ErrorCode::ExpectedToken('='));
            }
            let value = self.parse_pattern()?.ok_or(ErrorCode::MissingValue)?;
            attributes.push(ast::Attribute { id, value });
        }
        Ok(attributes)
    }

    /// `[a-zA-Z][a-zA-Z0-9_-]*`
    fn identifier(&mut self) -> Result<String, ErrorCode> {
        match self.stream.peek() {
            Some(b) if b.is_ascii_alphabetic() => {}
            _ => return Err(ErrorCode::ExpectedCharRange("a-zA-Z".to_string())),
        }
        let name = self
            .stream
            .skip_while(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        Ok(name.to_string())
    }

    fn parse_comment(&mut self) -> Result<Comment, ErrorCode> {
        let level = self.comment_prefix().ok_or(ErrorCode::ExpectedEntry)?;
        let mut content = vec![self.comment_line()?];
        loop {
            let marker = self.stream.mark();
            if !self.stream.skip_eol() {
                break;
            }
            match self.comment_prefix() {
                Some(next) if next == level => content.push(self.comment_line()?),
                _ => {
                    self.stream.reset(marker);
                    break;
                }
            }
        }
        Ok(Comment { level, content })
    }

    fn comment_prefix(&mut self) -> Option<CommentLevel> {
        let mut count = 0;
        while count < 3 && self.stream.take_byte_if(b'#') {
            count += 1;
        }
        match count {
            0 => None,
            1 => Some(CommentLevel::Standalone),
            2 => Some(CommentLevel::Group),
            _ => Some(CommentLevel::Resource),
        }
    }

    /// The remainder of a comment line: end of line, or one space + content.
    fn comment_line(&mut self) -> Result<String, ErrorCode> {
        if self.stream.at_eol() {
            return Ok(String::new());
        }
        if !self.stream.take_byte_if(b' ') {
            return Err(ErrorCode::ExpectedToken(' '));
        }
        Ok(self.stream.skip_while(|_| true).to_string())
    }

    /// Whether the next line begins a message or term, with no blank line
    /// in between. Used to attach `#` comments to the entry they precede.
    fn at_entry_head(&mut self) -> bool {
        let marker = self.stream.mark();
        let head = self.stream.skip_eol()
            && matches!(self.stream.peek(), Some(b) if b.is_ascii_alphabetic() || b == b'-');
        self.stream.reset(marker);
        head
    }

    /// Junk recovery: consume up to the next plausible entry start.
    fn skip_to_next_entry(&mut self) -> &'s str {
        let start = self.stream.pos();
        self.stream.skip_line();
        loop {
            match self.stream.peek() {
                None => break,
                Some(b) if b.is_ascii_alphabetic() || b == b'-' || b == b'#' => break,
                Some(_) => self.stream.skip_line(),
            }
        }
        self.stream.slice(start, self.stream.pos())
    }
}
