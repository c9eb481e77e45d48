//! Byte source abstractions for parser.
//!
//! This module provides the [ByteSource] trait, implemented by
//! [InMemoryByteSource](crate::parser::in_memory_byte_source::InMemoryByteSource)
//! and [BufferedByteSource](crate::parser::buffered_byte_source::BufferedByteSource).

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Trait defining the interface for different byte sources used by ByteParser.
///
/// This trait abstracts over different ways of accessing byte data:
/// - In-memory byte vectors (whole file or string)
/// - Buffered reading from files (`BufReader<File>`)
///
/// By using this trait, the same record parser works with small files
/// loaded entirely into memory and large reconstructions streamed from disk.
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF) or reading failed
    fn peek(&mut self) -> Option<u8>;

    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF) or reading failed
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns up to `k` bytes from the current position for error context.
    ///
    /// May return fewer than `k` bytes even before EOF, e.g. at the
    /// boundary of an internal buffer.
    fn get_context(&mut self, k: usize) -> Vec<u8>;

    /// Returns the current position (byte offset) in the byte stream.
    fn position(&self) -> usize;

    /// Check if at end of data.
    fn is_eof(&mut self) -> bool;

    /// Takes the first I/O error encountered while reading, if any.
    ///
    /// Sources that cannot fail (in-memory) always return `None`.
    fn take_io_error(&mut self) -> Option<std::io::Error> {
        None
    }
}
