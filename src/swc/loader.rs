//! This module provides [SwcLoader], a builder configuring how an SWC file is
//! read and interpreted, and [ReadStrategy].

use crate::error::LoadError;
use crate::model::{Morphology, SegmentTree};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::swc::defs::BUFFERED_THRESHOLD;
use crate::swc::flavor::{GapPolicy, SwcFlavor};
use crate::swc::parser::SwcParser;
use crate::swc::record::SwcData;
use std::path::{Path, PathBuf};

/// Name standing in for the path of SWC text given as string
pub(crate) const STRING_INPUT_NAME: &str = "<string>";

// =#========================================================================#=
// BYTE SOURCE SETTING
// =#========================================================================#=
/// Controls how the file is read during parsing.
///
/// By default, the [SwcLoader] uses [ReadStrategy::Automatic], which picks a
/// strategy based on file size. Use
/// [with_buffered_source()](SwcLoader::with_buffered_source) or
/// [with_in_memory_source()](SwcLoader::with_in_memory_source)
/// to override this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadStrategy {
    /// Read the file in chunks through a buffered I/O reader.
    Buffered,

    /// Load the entire file into a contiguous byte buffer before parsing.
    InMemory,

    /// Automatically choose between [ReadStrategy::Buffered] and
    /// [ReadStrategy::InMemory] based on file size.
    /// This is the default.
    #[default]
    Automatic,
}

#[derive(Debug, Clone)]
enum SwcInput {
    File(PathBuf),
    Text(String),
}

// =#========================================================================#=
// SWC LOADER
// =#========================================================================#=
/// Builder for loading an SWC file as [SegmentTree] or [Morphology].
///
/// # Configuration
/// * **Flavor**: How samples become segments, see [SwcFlavor]
///   - [`arbor()`](SwcLoader::arbor) - Strict file order, single root (default)
///   - [`neuron()`](SwcLoader::neuron) - Unordered samples, forests, single-sample somas
///   - [`allen()`](SwcLoader::allen) - Soma at the origin, with a [GapPolicy]
///
/// * **Read strategy**: How the file is read, see [ReadStrategy]
///   - [`with_buffered_source()`](SwcLoader::with_buffered_source)
///   - [`with_in_memory_source()`](SwcLoader::with_in_memory_source)
///
/// The file is only opened by [load()](SwcLoader::load) (and its siblings)
/// and closed before it returns.
///
/// # Example
/// ```no_run
/// use swctree::swc::{GapPolicy, SwcLoader};
///
/// let tree = SwcLoader::for_file("pyramidal.swc")
///     .allen(GapPolicy::Bridge)
///     .with_buffered_source()
///     .load()?;
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SwcLoader {
    input: SwcInput,
    flavor: SwcFlavor,
    read_strategy: ReadStrategy,
}

// ============================================================================
// Creation (pub)
// ============================================================================
impl SwcLoader {
    /// Creates a loader for the SWC file at `path`.
    pub fn for_file<P: AsRef<Path>>(path: P) -> Self {
        SwcLoader {
            input: SwcInput::File(path.as_ref().to_path_buf()),
            flavor: SwcFlavor::default(),
            read_strategy: ReadStrategy::default(),
        }
    }

    /// Creates a loader for SWC text.
    ///
    /// Errors name the input `<string>` in place of a path.
    pub fn for_str(text: &str) -> Self {
        SwcLoader {
            input: SwcInput::Text(text.to_string()),
            flavor: SwcFlavor::default(),
            read_strategy: ReadStrategy::InMemory,
        }
    }
}

// ============================================================================
// Configuration (pub)
// ============================================================================
impl SwcLoader {
    /// Interpret samples with [SwcFlavor::Arbor]. This is the default.
    pub fn arbor(self) -> Self {
        self.with_flavor(SwcFlavor::Arbor)
    }

    /// Interpret samples with [SwcFlavor::Neuron].
    pub fn neuron(self) -> Self {
        self.with_flavor(SwcFlavor::Neuron)
    }

    /// Interpret samples with [SwcFlavor::Allen], joining neurites to the
    /// soma according to `gaps`.
    pub fn allen(self, gaps: GapPolicy) -> Self {
        self.with_flavor(SwcFlavor::Allen { gaps })
    }

    /// Interpret samples with `flavor`.
    pub fn with_flavor(mut self, flavor: SwcFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Read the file through a **buffered reader**, keeping memory usage low
    /// regardless of file size.
    ///
    /// See also [with_in_memory_source()](Self::with_in_memory_source).
    pub fn with_buffered_source(mut self) -> Self {
        self.read_strategy = ReadStrategy::Buffered;
        self
    }

    /// Read the **entire file into memory** before parsing.
    ///
    /// See also [with_buffered_source()](Self::with_buffered_source).
    pub fn with_in_memory_source(mut self) -> Self {
        self.read_strategy = ReadStrategy::InMemory;
        self
    }

    /// The configured flavor.
    pub fn flavor(&self) -> SwcFlavor {
        self.flavor
    }
}

// ============================================================================
// Loading (pub)
// ============================================================================
impl SwcLoader {
    /// Reads and validates the samples, without converting them.
    ///
    /// # Errors
    /// * [LoadError::FileNotFound] if the file cannot be opened
    /// * [LoadError::Swc] if the file is not valid SWC for the flavor's
    ///   [SwcMode](crate::swc::SwcMode)
    pub fn load_data(&self) -> Result<SwcData, LoadError> {
        match &self.input {
            SwcInput::Text(text) => self.parse(&mut ByteParser::for_str(text), 0),
            SwcInput::File(path) => {
                let not_found = |source| LoadError::FileNotFound {
                    path: path.clone(),
                    source,
                };
                let file_size = std::fs::metadata(path).map_err(not_found)?.len();

                let use_buffered = match self.read_strategy {
                    ReadStrategy::Buffered => true,
                    ReadStrategy::InMemory => false,
                    ReadStrategy::Automatic => file_size >= BUFFERED_THRESHOLD,
                };
                tracing::debug!(
                    target: "swctree",
                    "reading {} ({} bytes, buffered: {})",
                    path.display(),
                    file_size,
                    use_buffered
                );

                let size_hint = usize::try_from(file_size).unwrap_or(usize::MAX);
                if use_buffered {
                    let mut byte_parser = ByteParser::from_file_buffered(path).map_err(not_found)?;
                    self.parse(&mut byte_parser, size_hint)
                } else {
                    let mut byte_parser = ByteParser::from_file_in_memory(path).map_err(not_found)?;
                    self.parse(&mut byte_parser, size_hint)
                }
            }
        }
    }

    /// Reads the samples and converts them into a [SegmentTree].
    ///
    /// # Errors
    /// As [load_data()](Self::load_data), and [LoadError::Swc] if the samples
    /// violate the rules of the flavor.
    pub fn load(&self) -> Result<SegmentTree, LoadError> {
        let data = self.load_data()?;
        self.flavor
            .segment_tree(&data)
            .map_err(|source| self.swc_error(source))
    }

    /// Reads the samples and decomposes their [SegmentTree] into branches.
    pub fn load_morphology(&self) -> Result<Morphology, LoadError> {
        Ok(Morphology::new(self.load()?))
    }

    fn parse<S: ByteSource>(
        &self,
        byte_parser: &mut ByteParser<S>,
        size_hint: usize,
    ) -> Result<SwcData, LoadError> {
        let mut swc_parser = SwcParser::new(self.flavor.mode());
        if size_hint > 0 {
            swc_parser = swc_parser.with_input_size(size_hint);
        }
        swc_parser
            .parse(byte_parser)
            .map_err(|source| self.swc_error(source))
    }

    fn swc_error(&self, source: crate::swc::SwcError) -> LoadError {
        let path = match &self.input {
            SwcInput::File(path) => path.clone(),
            SwcInput::Text(_) => PathBuf::from(STRING_INPUT_NAME),
        };
        LoadError::Swc {
            path,
            flavor: self.flavor,
            source,
        }
    }
}
