//! Cursor over source text with line tracking and backtracking.
//!
//! All structural characters of the grammar are ASCII, so the stream
//! operates on bytes; multi-byte UTF-8 sequences only ever appear inside
//! text runs and string literals, which are sliced wholesale. Line breaks
//! (`\n`, `\r\n` and bare `\r`) normalize to a single logical break without
//! rewriting the buffer.

/// Text-run traversal strategy.
///
/// Both strategies are behaviorally identical; `Bulk` scans with `memchr`
/// while `Scalar` walks one byte at a time. The parser produces
/// byte-identical results under either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Bulk,
    Scalar,
}

/// A saved stream position for backtracking.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pos: usize,
    line: usize,
    line_start: usize,
}

pub struct Stream<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    mode: ScanMode,
}

impl<'s> Stream<'s> {
    pub fn new(source: &'s str, mode: ScanMode) -> Self {
        Stream {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            mode,
        }
    }

    /// Current absolute byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current 1-based byte column within the line.
    pub fn column(&self) -> usize {
        self.pos - self.line_start + 1
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Byte at the cursor, if any.
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Byte at `offset` bytes past the cursor.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Full character at the cursor, for error messages.
    pub fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Save the current position for a later [`reset`](Stream::reset).
    pub fn mark(&self) -> Marker {
        Marker {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
        }
    }

    /// Rewind to a previously saved position.
    pub fn reset(&mut self, marker: Marker) {
        self.pos = marker.pos;
        self.line = marker.line;
        self.line_start = marker.line_start;
    }

    /// Advance over `n` bytes. Must not cross a line break; line breaks are
    /// consumed through [`skip_eol`](Stream::skip_eol) so line tracking
    /// stays exact.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(!self.source[self.pos..self.pos + n].contains(['\n', '\r']));
        self.pos += n;
    }

    /// Consume one byte if it equals `byte`.
    pub fn take_byte_if(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the literal ASCII `text` if the input starts with it.
    pub fn take_if(&mut self, text: &str) -> bool {
        if self.bytes[self.pos..].starts_with(text.as_bytes()) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    /// Whether the cursor sits on a line break or at end of input.
    pub fn at_eol(&self) -> bool {
        matches!(self.peek(), Some(b'\n' | b'\r') | None)
    }

    /// Consume one logical line break, normalizing `\r\n` and bare `\r`.
    pub fn skip_eol(&mut self) -> bool {
        match self.peek() {
            Some(b'\n') => {
                self.pos += 1;
            }
            Some(b'\r') => {
                self.pos += 1;
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            _ => return false,
        }
        self.line += 1;
        self.line_start = self.pos;
        true
    }

    /// Skip inline blanks (spaces). Returns the number of bytes skipped.
    pub fn skip_blank_inline(&mut self) -> usize {
        let start = self.pos;
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Skip blanks including line breaks.
    pub fn skip_blank(&mut self) {
        loop {
            self.skip_blank_inline();
            if !self.skip_eol() {
                break;
            }
        }
    }

    /// Skip fully blank lines, leaving the cursor at the start of the first
    /// line with content (or at a partial blank prefix before EOF).
    pub fn skip_blank_block(&mut self) {
        loop {
            let marker = self.mark();
            self.skip_blank_inline();
            if !self.skip_eol() {
                if !self.is_eof() {
                    self.reset(marker);
                }
                break;
            }
        }
    }

    /// Skip bytes while `predicate` holds. Stops at line breaks.
    pub fn skip_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'s str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'\n' || b == b'\r' || !predicate(b) {
                break;
            }
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    /// Consume a run of literal text, stopping before `{`, `}` or a line
    /// break. This is the hot path of pattern scanning and the only place
    /// the two traversal strategies differ.
    pub fn text_run(&mut self) -> &'s str {
        let start = self.pos;
        let rest = &self.bytes[start..];
        let end = match self.mode {
            ScanMode::Bulk => {
                let brace_or_lf = memchr::memchr3(b'{', b'}', b'\n', rest);
                let cr = memchr::memchr(b'\r', rest);
                match (brace_or_lf, cr) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                }
            }
            ScanMode::Scalar => rest
                .iter()
                .position(|&b| matches!(b, b'{' | b'}' | b'\n' | b'\r')),
        };
        self.pos += end.unwrap_or(rest.len());
        &self.source[start..self.pos]
    }

    /// Skip the rest of the current line and its line break.
    pub fn skip_line(&mut self) {
        match self.mode {
            ScanMode::Bulk => {
                let rest = &self.bytes[self.pos..];
                let lf = memchr::memchr(b'\n', rest);
                let cr = memchr::memchr(b'\r', rest);
                let end = match (lf, cr) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                self.pos += end.unwrap_or(rest.len());
            }
            ScanMode::Scalar => {
                while !self.at_eol() {
                    self.pos += 1;
                }
            }
        }
        self.skip_eol();
    }

    /// Slice of the source between two absolute positions.
    pub fn slice(&self, start: usize, end: usize) -> &'s str {
        &self.source[start..end]
    }
}
