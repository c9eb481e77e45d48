//! SWC files: reading samples and interpreting them as a [SegmentTree].
//!
//! This module provides
//! - [SwcParser] - for reading SWC text into validated [SwcData]
//! - [SwcFlavor] and the conversions [as_segment_tree], [neuron_segment_tree]
//!   and [allen_segment_tree] - for turning samples into segments
//! - [SwcLoader] - for configuring all of the above for a file
//!
//! # Quick Start
//! ```
//! use swctree::swc::{SwcFlavor, segment_tree_from_str};
//!
//! let input = "\
//! ## soma and two dendrites
//! 1 1 0 0 0 5 -1
//! 2 3 -5 10 0 1 1
//! 3 3 5 10 0 1 1
//! ";
//! let tree = segment_tree_from_str(input, SwcFlavor::Arbor).unwrap();
//! assert_eq!(tree.size(), 2);
//! ```

pub mod defs;
pub mod flavor;
pub mod loader;
pub mod parser;
pub mod record;
pub mod swc_error;

pub use self::flavor::{
    GapPolicy, SwcFlavor, allen_segment_tree, as_segment_tree, neuron_segment_tree,
};
pub use self::loader::{ReadStrategy, SwcLoader};
pub use self::parser::{SwcMode, SwcParser};
pub use self::record::{SwcData, SwcRecord};
pub use self::swc_error::{SwcError, SwcErrorType};

use crate::error::LoadError;
use crate::model::SegmentTree;
use crate::parser::byte_parser::ByteParser;
use std::path::Path;

/// Parses and validates SWC text.
///
/// # Arguments
/// * `text` - SWC records, one per line
/// * `mode` - [SwcMode::Strict] for file order and a single root,
///   [SwcMode::Relaxed] for any order and forests
pub fn parse_str(text: &str, mode: SwcMode) -> Result<SwcData, SwcError> {
    SwcParser::new(mode)
        .with_input_size(text.len())
        .parse(&mut ByteParser::for_str(text))
}

/// Parses SWC text and converts it into a [SegmentTree] with `flavor`.
pub fn segment_tree_from_str(text: &str, flavor: SwcFlavor) -> Result<SegmentTree, SwcError> {
    let data = parse_str(text, flavor.mode())?;
    flavor.segment_tree(&data)
}

/// Loads the SWC file at `path` into a [SegmentTree] with `flavor`, using
/// the default [ReadStrategy].
pub fn load_file<P: AsRef<Path>>(path: P, flavor: SwcFlavor) -> Result<SegmentTree, LoadError> {
    SwcLoader::for_file(path).with_flavor(flavor).load()
}
