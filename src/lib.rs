//! Swctree is a library to read neuron morphologies from SWC files.
//!
//! This crate reads the samples of an SWC file, interprets them as an
//! append-only tree of cable segments, and decomposes that tree into the
//! unbranched branches of a morphology.
//! Core functionality provided:
//! - SWC: Parse and validate SWC records (file ending ignored), with
//!   comments, comma or whitespace separators and line-numbered errors.
//! - Flavors: Three conventions to turn samples into segments, see
//!   [SwcFlavor](crate::swc::SwcFlavor):
//!   - Arbor: strict file order, one root, one segment per non-root sample
//!   - NEURON: samples in any order, forests, single-sample somas as cylinders
//!   - Allen/Sonata: soma centred at the origin, neurites attached to the
//!     soma cylinder, configurable handling of gaps at the soma
//! - Models:
//!   - [SegmentTree]: Segments and their parents, parents before children.
//!   - [Morphology](crate::model::Morphology): Branches of a [SegmentTree]
//!     and how they connect.
//!   - Both models use arena pattern and so no direct references are
//!     stored, only indices.
//!   - See [crate::model] for more details.
//! - Configurability:
//!   - Flavor and, for Allen files, [GapPolicy](crate::swc::GapPolicy)
//!   - Loading full file in memory or buffered (for huge files)
//!
//! Limitations:
//! - Somas are cylinders, never spheres
//! - Only trees (and forests): cycles are rejected
//! - Sample ids are only used to reconstruct the topology
//!
//! # Usage patterns
//! Can load files in two main ways:
//! 1. Several methods provide quick access with default settings, see below
//!    and [crate::swc].
//! 2. Configure a [SwcLoader](crate::swc::SwcLoader) for full control over
//!    flavor and read strategy.
//!
//! ## Example Default Configuration
//!
//! ```no_run
//! use swctree::load_swc_allen;
//! use swctree::model::Morphology;
//!
//! let tree = load_swc_allen("cell.swc", true)?;
//! let morph = Morphology::new(tree);
//! println!("Loaded {} branches", morph.num_branches());
//! # Ok::<(), swctree::error::LoadError>(())
//! ```
//!
//! ## Example Loader Configuration
//!
//! ```no_run
//! use swctree::swc::SwcLoader;
//!
//! let morph = SwcLoader::for_file("reconstruction.swc")
//!     .neuron()                // Unordered samples, forests
//!     .with_buffered_source()  // Do not load the whole file
//!     .load_morphology()?;
//!
//! println!("{morph}");
//! # Ok::<(), swctree::error::LoadError>(())
//! ```

pub mod error;
pub mod model;
pub mod parser;
pub mod swc;

use crate::error::LoadError;
use crate::model::SegmentTree;
use crate::swc::{GapPolicy, SwcFlavor};
use std::path::Path;

// ============================================================================
// Quick SWC API
// ============================================================================
/// Loads an SWC file with [SwcFlavor::Arbor]: records in file order, a single
/// root, one segment per non-root sample.
///
/// Errors are reported as `"error parsing {path}: ..."`.
pub fn load_swc_raw<P: AsRef<Path>>(path: P) -> Result<SegmentTree, LoadError> {
    swc::load_file(path, SwcFlavor::Arbor)
}

/// Loads an SWC file with [SwcFlavor::Neuron]: records in any order,
/// forests allowed, single-sample somas expanded into cylinders.
///
/// Errors are reported as `"NEURON SWC: error parsing {path}: ..."`.
pub fn load_swc_relaxed<P: AsRef<Path>>(path: P) -> Result<SegmentTree, LoadError> {
    swc::load_file(path, SwcFlavor::Neuron)
}

/// Same as [load_swc_relaxed].
pub fn load_swc_neuron<P: AsRef<Path>>(path: P) -> Result<SegmentTree, LoadError> {
    load_swc_relaxed(path)
}

/// Loads an SWC file with [SwcFlavor::Allen], following AllenDB and Sonata.
///
/// # Arguments
/// * `path` - The SWC file
/// * `no_gaps` - Whether neurites are extended to touch the soma
///   ([GapPolicy::Bridge]) instead of starting at their first sample
///   ([GapPolicy::Preserve])
///
/// Errors are reported as `"Allen SWC: error parsing {path}: ..."`.
pub fn load_swc_allen<P: AsRef<Path>>(path: P, no_gaps: bool) -> Result<SegmentTree, LoadError> {
    let gaps = GapPolicy::from_no_gaps(no_gaps);
    swc::load_file(path, SwcFlavor::Allen { gaps })
}
