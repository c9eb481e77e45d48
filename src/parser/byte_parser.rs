//! Low-level byte-by-byte parser for line-oriented ASCII text.
//!
//! This module provides [ByteParser] for parsing record-per-line text formats
//! with support for peeking, consuming, field splitting and number parsing.
//! Used as the foundation for the SWC record parser.

use crate::parser::buffered_byte_source::BufferedByteSource;
use crate::parser::byte_source::ByteSource;
use crate::parser::in_memory_byte_source::InMemoryByteSource;
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

/// Bytes separating fields of a record: space, tab, comma, carriage return
pub(crate) const FIELD_SEPARATORS: &[u8] = b" \t,\r";

/// Byte starting a comment that runs until the end of the line
pub(crate) const COMMENT_START: u8 = b'#';

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for line-oriented ASCII text.
///
/// [ByteParser] provides the operations needed by record-per-line formats
/// such as SWC. It operates on a [ByteSource], tracks the current line for
/// error reporting and understands `#` comments running to the end of a line.
///
/// # Example
/// ```
/// use swctree::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("1 1 0.0 0.0 0.0 5.0 -1 # soma\n");
/// assert_eq!(parser.parse_integer("id").unwrap(), 1);
/// assert_eq!(parser.parse_integer("tag").unwrap(), 1);
/// assert_eq!(parser.parse_real("x").unwrap(), 0.0);
/// assert_eq!(parser.line(), 1);
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
    line: usize,
    /// Bytes consumed so far on the current line
    line_start: Vec<u8>,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new `ByteParser` from a string by copying it into a Vec.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }

    /// Creates a new `ByteParser` reading the whole file into memory.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn from_file_in_memory<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

impl ByteParser<BufferedByteSource> {
    /// Creates a new `ByteParser` streaming the file through a buffered reader.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be opened.
    pub fn from_file_buffered<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(BufferedByteSource::from_file(path)?))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    ///
    /// # Arguments
    /// * `source` - The byte source to parse
    pub fn new(source: S) -> Self {
        Self {
            source,
            line: 1,
            line_start: Vec::new(),
        }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&mut self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// Consuming a newline advances the line counter.
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.source.next_byte()?;
        if byte == b'\n' {
            self.line += 1;
            self.line_start.clear();
        } else {
            self.line_start.push(byte);
        }
        Some(byte)
    }

    /// Returns the (1-based) line of the current position.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Skips (consumes) all consecutive field separators
    /// (space, tab, comma, carriage return), but not newlines.
    pub fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if FIELD_SEPARATORS.contains(&b) {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Returns whether the current line has no further fields, i.e.
    /// after skipping separators the parser is at a newline, a comment or EOF.
    pub fn at_line_end(&mut self) -> bool {
        self.skip_separators();
        matches!(self.peek(), None | Some(b'\n') | Some(COMMENT_START))
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return true;
            }
            self.next_byte();
        }
        false
    }

    /// Consumes the rest of the current line, including the newline,
    /// and returns its text without the newline (and without a trailing `\r`).
    pub fn consume_line(&mut self) -> String {
        let mut text = Vec::new();
        while let Some(b) = self.next_byte() {
            if b == b'\n' {
                break;
            }
            text.push(b);
        }
        if text.last() == Some(&b'\r') {
            text.pop();
        }
        String::from_utf8_lossy(&text).into_owned()
    }

    /// Finishes the current record line: only separators and an optional
    /// trailing comment may remain before the newline (or EOF).
    ///
    /// # Errors
    /// Returns [ParsingError] with a trailing-field error if another field follows.
    pub fn finish_line(&mut self) -> Result<(), ParsingError> {
        self.skip_separators();
        match self.peek() {
            None => Ok(()),
            Some(b'\n') | Some(COMMENT_START) => {
                self.consume_until(b'\n', ConsumeMode::Inclusive);
                Ok(())
            }
            Some(_) => {
                let field = self.parse_field()?.unwrap_or_default();
                Err(ParsingError::trailing_field(self, field))
            }
        }
    }

    /// Parses the next field on the current line.
    ///
    /// # Returns
    /// * `Ok(Some(field))` - the next field
    /// * `Ok(None)` - if the line has no further fields
    /// * `Err(ParsingError)` - if the field contains non-ASCII bytes
    pub fn parse_field(&mut self) -> Result<Option<String>, ParsingError> {
        if self.at_line_end() {
            return Ok(None);
        }

        let mut field = String::new();
        while let Some(b) = self.peek() {
            if FIELD_SEPARATORS.contains(&b) || b == b'\n' || b == COMMENT_START {
                break;
            }
            if !b.is_ascii() {
                return Err(ParsingError::invalid_encoding(self));
            }
            field.push(b as char);
            self.next_byte();
        }

        Ok(Some(field))
    }

    /// Parses the next field on the current line as integer.
    ///
    /// # Arguments
    /// * `name` - Name of the field, used in error messages
    pub fn parse_integer(&mut self, name: &'static str) -> Result<i64, ParsingError> {
        let field = self.expect_field(name)?;
        match field.parse::<i64>() {
            Ok(value) => Ok(value),
            Err(_) => Err(ParsingError::invalid_integer(self, name, field)),
        }
    }

    /// Parses the next field on the current line as finite real number.
    ///
    /// Supports scientific notation (e.g., `1.5e-10`).
    ///
    /// # Arguments
    /// * `name` - Name of the field, used in error messages
    pub fn parse_real(&mut self, name: &'static str) -> Result<f64, ParsingError> {
        let field = self.expect_field(name)?;
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParsingError::invalid_real(self, name, field)),
        }
    }

    fn expect_field(&mut self, name: &'static str) -> Result<String, ParsingError> {
        match self.parse_field()? {
            Some(field) => Ok(field),
            None => Err(ParsingError::missing_field(self, name)),
        }
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&mut self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current parser position (byte offset) in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Surfaces a read error of the underlying source, if one occurred.
    ///
    /// Should be called once EOF was reached, since a failing source
    /// looks like EOF to all other methods.
    pub fn check_io(&mut self) -> Result<(), ParsingError> {
        match self.source.take_io_error() {
            Some(err) => Err(ParsingError::from(err)),
            None => Ok(()),
        }
    }

    /// Returns up to `k` bytes from the current position for error context.
    pub fn get_context(&mut self, k: usize) -> Vec<u8> {
        self.source.get_context(k)
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Context stops at the end of the current line. Invalid UTF-8 sequences
    /// are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&mut self, k: usize) -> String {
        let context_bytes = self.get_context(k);
        let line_end = context_bytes
            .iter()
            .position(|&b| b == b'\n')
            .unwrap_or(context_bytes.len());
        String::from_utf8_lossy(&context_bytes[..line_end])
            .trim_end_matches('\r')
            .to_string()
    }

    /// Returns the text of the current line: the part already consumed
    /// plus up to `k` bytes of the rest.
    pub fn current_line(&mut self, k: usize) -> String {
        let consumed = String::from_utf8_lossy(&self.line_start).into_owned();
        consumed + &self.get_context_as_string(k)
    }
}

/// Specifies whether to consume or leave the target when using `consume_until`.
///
/// # Examples
/// ```
/// use swctree::parser::byte_parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::for_str("# created by hand\n1 1 0 0 0 1 -1");
///
/// // Inclusive: consume up to and including the newline, e.g. to skip a comment line
/// parser.consume_until(b'\n', ConsumeMode::Inclusive);
/// assert_eq!(parser.peek(), Some(b'1'));
/// assert_eq!(parser.line(), 2);
///
/// let mut parser = ByteParser::for_str("1 1 0 0 0 1 -1 # soma");
///
/// // Exclusive: consume up to but not including '#', e.g. to find a trailing comment
/// parser.consume_until(b'#', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b'#'));
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_counting() {
        let mut parser = ByteParser::for_str("a\nb\r\nc");
        assert_eq!(parser.line(), 1);
        assert_eq!(parser.consume_line(), "a");
        assert_eq!(parser.line(), 2);
        assert_eq!(parser.consume_line(), "b");
        assert_eq!(parser.line(), 3);
        assert_eq!(parser.consume_line(), "c");
        assert!(parser.is_eof());
    }

    #[test]
    fn test_context_stops_at_line_end() {
        let mut parser = ByteParser::for_str("2 3 1.0 x\n3 3 1 1 1 1 2");
        assert_eq!(parser.get_context_as_string(50), "2 3 1.0 x");
    }

    #[test]
    fn test_current_line_includes_consumed_part() {
        let mut parser = ByteParser::for_str("1 1 0 0 0 1 -1\n2 3 0 x 0 1 1\n");
        parser.consume_line();
        for _ in 0..3 {
            parser.parse_field().unwrap();
        }
        assert_eq!(parser.current_line(50), "2 3 0 x 0 1 1");
        assert_eq!(parser.current_line(2), "2 3 0 x");
    }
}
