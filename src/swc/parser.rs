//! Provides [SwcParser], which reads SWC text into validated [SwcData].

use crate::model::Tag;
use crate::parser::byte_parser::{ByteParser, COMMENT_START, ConsumeMode};
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use crate::swc::defs::BYTES_PER_RECORD_GUESS;
use crate::swc::record::{SwcData, SwcRecord};
use crate::swc::swc_error::SwcError;

/// Default guess for number of records, when unknown
const DEFAULT_NUM_RECORDS_GUESS: usize = 256;

/// How strictly the order and roots of SWC records are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwcMode {
    /// Records are checked in file order, so every parent is listed before
    /// its children, and there is exactly one root.
    #[default]
    Strict,

    /// Records are sorted by id before checking, and any number of roots
    /// (a forest) is accepted.
    Relaxed,
}

/// Parser (configuration) for SWC files.
///
/// # Format
/// Every non-empty line that is not a comment is a record of seven fields:
/// * record ::= id tag x y z radius parent
/// * `id` is a non-negative integer, unique in the file
/// * `tag` is an integer labelling the structure (1 soma, 2 axon, ...)
/// * `x y z radius` are finite reals, `radius >= 0`
/// * `parent` is the id of another record, or negative for a root
///
/// Furthermore:
/// * Fields are separated by spaces, tabs and/or commas
/// * `#` starts a comment that runs to the end of the line, both as whole
///   line and after the fields of a record
/// * Comment lines before the first record are kept as metadata
///
/// # Example
/// ```
/// use swctree::parser::ByteParser;
/// use swctree::swc::parser::{SwcMode, SwcParser};
///
/// let input = "# made by hand\n1 1 0 0 0 5 -1\n2 3 0 10 0 1 1 # dendrite\n";
/// let mut byte_parser = ByteParser::for_str(input);
///
/// let data = SwcParser::new(SwcMode::Strict).parse(&mut byte_parser).unwrap();
/// assert_eq!(data.metadata(), "made by hand");
/// assert_eq!(data.records()[1].parent_id, Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct SwcParser {
    mode: SwcMode,
    num_records: Option<usize>,
}

impl SwcParser {
    /// Creates a new `SwcParser` checking records according to `mode`.
    pub fn new(mode: SwcMode) -> Self {
        Self {
            mode,
            num_records: None,
        }
    }

    /// Sets the expected number of records, for pre-allocation.
    pub fn with_num_records(mut self, num_records: usize) -> Self {
        self.num_records = Some(num_records);
        self
    }

    /// Sets the expected number of records from the input size in bytes.
    pub fn with_input_size(self, num_bytes: usize) -> Self {
        self.with_num_records(num_bytes / BYTES_PER_RECORD_GUESS + 1)
    }

    /// The mode records are checked in.
    pub fn mode(&self) -> SwcMode {
        self.mode
    }

    /// Parses all records until EOF and validates them.
    ///
    /// # Errors
    /// * [SwcError] with a malformed-record kind if a line cannot be read
    ///   as record, or the source fails
    /// * [SwcError] with a topology kind if the records do not form a
    ///   tree (or forest, in [SwcMode::Relaxed])
    pub fn parse<S: ByteSource>(
        &self,
        parser: &mut ByteParser<S>,
    ) -> Result<SwcData, SwcError> {
        let mut metadata: Vec<String> = Vec::new();
        let mut entries: Vec<(SwcRecord, usize)> =
            Vec::with_capacity(self.num_records.unwrap_or(DEFAULT_NUM_RECORDS_GUESS));

        loop {
            parser.skip_separators();
            match parser.peek() {
                None => break,
                Some(b'\n') => {
                    parser.next_byte();
                }
                Some(COMMENT_START) if entries.is_empty() => {
                    parser.next_byte();
                    metadata.push(parser.consume_line().trim().to_string());
                }
                Some(COMMENT_START) => {
                    parser.consume_until(b'\n', ConsumeMode::Inclusive);
                }
                Some(_) => {
                    let line = parser.line();
                    let record = parse_record(parser)?;
                    tracing::trace!(target: "swctree", "line {line}: {record}");
                    entries.push((record, line));
                }
            }
        }
        parser.check_io()?;

        tracing::debug!(
            target: "swctree",
            "parsed {} SWC records ({:?} mode)",
            entries.len(),
            self.mode
        );

        SwcData::validated(metadata.join("\n"), entries, self.mode)
    }
}

/// Parses the seven fields of a record and the rest of its line.
fn parse_record<S: ByteSource>(parser: &mut ByteParser<S>) -> Result<SwcRecord, ParsingError> {
    let id = parser.parse_integer("id")?;
    if id < 0 {
        return Err(ParsingError::negative_id(parser, id));
    }

    let tag = parser.parse_integer("tag")?;
    let tag = match Tag::try_from(tag) {
        Ok(tag) => tag,
        Err(_) => return Err(ParsingError::invalid_integer(parser, "tag", tag.to_string())),
    };

    let x = parser.parse_real("x")?;
    let y = parser.parse_real("y")?;
    let z = parser.parse_real("z")?;
    let r = parser.parse_real("radius")?;
    if r < 0.0 {
        return Err(ParsingError::negative_radius(parser, r));
    }

    let parent = parser.parse_integer("parent")?;
    parser.finish_line()?;

    let parent_id = (parent >= 0).then_some(parent);
    Ok(SwcRecord::new(id, tag, x, y, z, r, parent_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;
    use crate::swc::swc_error::SwcErrorType;

    fn parse(input: &str, mode: SwcMode) -> Result<SwcData, SwcError> {
        SwcParser::new(mode).parse(&mut ByteParser::for_str(input))
    }

    #[test]
    fn test_separators_and_comments() {
        let input = "#  header one\n# header two\n\n1,1,0,0,0,2,-1\n\t2 3 0.5 1e1 -2 1.5 1 # tip\n";
        let data = parse(input, SwcMode::Strict).unwrap();

        assert_eq!(data.metadata(), "header one\nheader two");
        assert_eq!(
            data.records(),
            &[
                SwcRecord::new(1, 1, 0.0, 0.0, 0.0, 2.0, None),
                SwcRecord::new(2, 3, 0.5, 10.0, -2.0, 1.5, Some(1)),
            ]
        );
    }

    #[test]
    fn test_later_comments_are_not_metadata() {
        let data = parse("1 1 0 0 0 1 -1\n# note\n2 3 0 1 0 1 1", SwcMode::Strict).unwrap();
        assert_eq!(data.metadata(), "");
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_any_negative_parent_is_root() {
        let input = "1 1 0 0 0 1 -5\n2 3 0 1 0 1 1\n3 3 0 2 0 1 -1";
        let data = parse(input, SwcMode::Relaxed).unwrap();
        assert!(data.records()[0].is_root());
        assert!(data.records()[2].is_root());
    }

    #[test]
    fn test_malformed_records() {
        let cases = [
            ("1 1 0 0 0 1", ParsingErrorType::MissingField("parent")),
            ("1 1 0 0 0 1 -1 7", ParsingErrorType::TrailingField("7".to_string())),
            ("-1 1 0 0 0 1 -1", ParsingErrorType::NegativeId(-1)),
            ("1 1 0 0 0 -1 -1", ParsingErrorType::NegativeRadius(-1.0)),
            (
                "1 1 0 nan 0 1 -1",
                ParsingErrorType::InvalidReal { field: "y", value: "nan".to_string() },
            ),
            (
                "1 soma 0 0 0 1 -1",
                ParsingErrorType::InvalidInteger { field: "tag", value: "soma".to_string() },
            ),
        ];

        for (input, expected) in cases {
            let err = parse(input, SwcMode::Strict).unwrap_err();
            assert_eq!(*err.kind(), SwcErrorType::MalformedRecord(expected), "input: {input}");
            assert_eq!(err.line(), Some(1));
        }
    }

    #[test]
    fn test_error_line_number() {
        let err = parse("# c\n1 1 0 0 0 1 -1\n2 3 0 x 0 1 1\n", SwcMode::Strict).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.context(), "2 3 0 x 0 1 1");
        assert!(err.to_string().ends_with("on line 3\n  Context: 2 3 0 x 0 1 1"));
    }

    #[test]
    fn test_relaxed_sorts_by_id() {
        let input = "3 3 0 2 0 1 2\n1 1 0 0 0 1 -1\n2 3 0 1 0 1 1\n";
        assert!(matches!(
            parse(input, SwcMode::Strict).unwrap_err().kind(),
            SwcErrorType::ParentAfterChild { id: 3, parent: 2 }
        ));

        let data = parse(input, SwcMode::Relaxed).unwrap();
        let ids: Vec<i64> = data.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("", SwcMode::Strict).unwrap().is_empty());
        assert!(parse("# only a comment\n\n", SwcMode::Relaxed).unwrap().is_empty());
    }
}
