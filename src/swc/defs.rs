//! Tags and limits used when reading SWC files.

use crate::model::Tag;

/// Tag of soma samples
pub const SOMA_TAG: Tag = 1;

/// Tag of axon samples
pub const AXON_TAG: Tag = 2;

/// Tag of apical dendrite samples
pub const APICAL_DENDRITE_TAG: Tag = 3;

/// Tag of basal dendrite samples
pub const BASAL_DENDRITE_TAG: Tag = 4;

/// File size (in bytes) from which [ReadStrategy::Automatic](crate::swc::ReadStrategy::Automatic)
/// reads through a buffer instead of loading the whole file
pub(crate) const BUFFERED_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Rough number of bytes per SWC record, for capacity estimates
pub(crate) const BYTES_PER_RECORD_GUESS: usize = 40;
