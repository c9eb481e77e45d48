//! Basic low-level byte parser functionality.
pub(crate) mod buffered_byte_source;
pub mod byte_parser;
pub mod byte_source;
pub(crate) mod in_memory_byte_source;
pub mod parsing_error;

pub use buffered_byte_source::BufferedByteSource;
pub use byte_parser::ByteParser;
pub use in_memory_byte_source::InMemoryByteSource;
pub use parsing_error::ParsingError;
