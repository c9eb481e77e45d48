//! Buffered reader implementation of byte source for parser.
//!
//! This module provides [BufferedByteSource], which wraps a file in a [BufReader]
//! for streaming I/O. Use this for very large reconstructions where loading
//! everything into memory first is undesirable.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::parser::byte_source::ByteSource;

// =#========================================================================#=
// BUFFERED BYTE SOURCE
// =#========================================================================$=
/// A buffered byte source for streaming large files.
///
/// Uses [BufReader] for disk I/O. The first read error is kept and can be
/// retrieved with [ByteSource::take_io_error]; afterwards the source behaves
/// as if at EOF.
pub struct BufferedByteSource {
    /// Underlying reader of file, handles getting chunks from file
    reader: BufReader<File>,

    /// First I/O error encountered, if any
    io_error: Option<std::io::Error>,

    /// Current absolute position in the stream
    pos: usize,
}

impl BufferedByteSource {
    /// Creates a new buffered byte source from a file path.
    ///
    /// # Arguments
    /// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<BufferedByteSource> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            io_error: None,
            pos: 0,
        })
    }

    /// Returns the currently buffered bytes, filling the buffer if needed.
    fn buffer(&mut self) -> &[u8] {
        if self.io_error.is_some() {
            return &[];
        }
        match self.reader.fill_buf() {
            Ok(buf) => buf,
            Err(err) => {
                self.io_error = Some(err);
                &[]
            }
        }
    }
}

impl ByteSource for BufferedByteSource {
    fn peek(&mut self) -> Option<u8> {
        self.buffer().first().copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.reader.consume(1);
        self.pos += 1;
        Some(byte)
    }

    fn get_context(&mut self, k: usize) -> Vec<u8> {
        let buf = self.buffer();
        buf[..k.min(buf.len())].to_vec()
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_eof(&mut self) -> bool {
        self.buffer().is_empty()
    }

    fn take_io_error(&mut self) -> Option<std::io::Error> {
        self.io_error.take()
    }
}

// =#========================================================================#=
// TESTS - BUFFERED BYTE SOURCE
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use crate::parser::buffered_byte_source::BufferedByteSource;
    use crate::parser::byte_parser::ByteParser;
    use crate::swc::parser::{SwcMode, SwcParser};

    #[test]
    fn test_buffered_parse_swc_file() {
        let source = BufferedByteSource::from_file("tests/fixtures/y_shape.swc").unwrap();
        let mut byte_parser = ByteParser::new(source);

        let data = SwcParser::new(SwcMode::Strict).parse(&mut byte_parser).unwrap();
        assert_eq!(data.records().len(), 3);
    }

    #[test]
    fn test_buffered_missing_file() {
        assert!(BufferedByteSource::from_file("tests/fixtures/does_not_exist.swc").is_err());
    }
}
