//! Parsed SWC samples: [SwcRecord] and the validated collection [SwcData].

use crate::model::{Point, Tag};
use crate::swc::parser::SwcMode;
use crate::swc::swc_error::{SwcError, SwcErrorType};
use std::collections::{HashMap, HashSet};
use std::fmt;

// =#========================================================================#=
// SWC RECORD
// =#========================================================================#=
/// One sample (line) of an SWC file.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwcRecord {
    pub id: i64,
    pub tag: Tag,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: f64,
    /// `None` for roots (any negative parent id in the file)
    pub parent_id: Option<i64>,
}

impl SwcRecord {
    /// Creates a new record.
    pub fn new(id: i64, tag: Tag, x: f64, y: f64, z: f64, r: f64, parent_id: Option<i64>) -> Self {
        SwcRecord { id, tag, x, y, z, r, parent_id }
    }

    /// Position and radius of the sample.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y, self.z, self.r)
    }

    /// Whether the sample has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Renders the record as an SWC line, roots with parent `-1`.
impl fmt::Display for SwcRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.id,
            self.tag,
            self.x,
            self.y,
            self.z,
            self.r,
            self.parent_id.unwrap_or(-1)
        )
    }
}

// =#========================================================================#=
// SWC DATA
// =#========================================================================#=
/// Validated samples of an SWC file plus its leading comment block.
///
/// Instances are only obtained through validation, so every record's parent
/// (if any) is listed before it and ids are unique.
///
/// # Example
/// ```
/// use swctree::swc::{SwcData, SwcMode, SwcRecord};
///
/// let records = vec![
///     SwcRecord::new(2, 3, 0.0, 1.0, 0.0, 1.0, Some(1)),
///     SwcRecord::new(1, 1, 0.0, 0.0, 0.0, 1.0, None),
/// ];
/// assert!(SwcData::new(records.clone(), SwcMode::Strict).is_err());
///
/// let data = SwcData::new(records, SwcMode::Relaxed).unwrap();
/// assert_eq!(data.records()[0].id, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwcData {
    metadata: String,
    records: Vec<SwcRecord>,
}

impl SwcData {
    /// Validates `records` according to `mode`.
    ///
    /// In [SwcMode::Relaxed] the records are first sorted by id.
    ///
    /// # Errors
    /// [SwcError] for duplicate ids, self references, parents listed after
    /// (or missing from) the records, and, in [SwcMode::Strict], more than
    /// one root.
    pub fn new(records: Vec<SwcRecord>, mode: SwcMode) -> Result<Self, SwcError> {
        let entries = records.into_iter().map(|r| (r, 0)).collect();
        Self::validated(String::new(), entries, mode)
    }

    /// Validates records tagged with the line they were read from
    /// (0 if unknown).
    pub(crate) fn validated(
        metadata: String,
        mut entries: Vec<(SwcRecord, usize)>,
        mode: SwcMode,
    ) -> Result<Self, SwcError> {
        if mode == SwcMode::Relaxed {
            // Stable: among duplicates, the first listed is kept first
            entries.sort_by_key(|(record, _)| record.id);
        }

        let all_ids: HashSet<i64> = entries.iter().map(|(record, _)| record.id).collect();
        let mut seen: HashMap<i64, usize> = HashMap::with_capacity(entries.len());
        let mut root: Option<i64> = None;

        for (record, line) in &entries {
            let fail = |kind| Err(SwcError::at_line(kind, *line, record.to_string()));

            if seen.contains_key(&record.id) {
                return fail(SwcErrorType::DuplicateId(record.id));
            }
            match record.parent_id {
                None => match root {
                    Some(first) if mode == SwcMode::Strict => {
                        return fail(SwcErrorType::MultipleRoots { first, other: record.id });
                    }
                    Some(_) => {}
                    None => root = Some(record.id),
                },
                Some(parent) if parent == record.id => {
                    return fail(SwcErrorType::SelfParent(record.id));
                }
                Some(parent) if !seen.contains_key(&parent) => {
                    let kind = if all_ids.contains(&parent) {
                        SwcErrorType::ParentAfterChild { id: record.id, parent }
                    } else {
                        SwcErrorType::NoSuchParent { id: record.id, parent }
                    };
                    return fail(kind);
                }
                Some(_) => {}
            }
            seen.insert(record.id, *line);
        }

        Ok(SwcData {
            metadata,
            records: entries.into_iter().map(|(record, _)| record).collect(),
        })
    }

    /// Leading comment lines of the file, without `#`, joined by `\n`.
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    /// The records, parents before children.
    pub fn records(&self) -> &[SwcRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64, parent: Option<i64>) -> SwcRecord {
        SwcRecord::new(id, 3, id as f64, 0.0, 0.0, 1.0, parent)
    }

    #[test]
    fn test_display_uses_minus_one_for_roots() {
        assert_eq!(rec(1, None).to_string(), "1 3 1 0 0 1 -1");
        assert_eq!(rec(2, Some(1)).to_string(), "2 3 2 0 0 1 1");
    }

    #[test]
    fn test_forest_only_in_relaxed_mode() {
        let records = vec![rec(1, None), rec(2, Some(1)), rec(3, None), rec(4, Some(3))];
        let err = SwcData::new(records.clone(), SwcMode::Strict).unwrap_err();
        assert_eq!(*err.kind(), SwcErrorType::MultipleRoots { first: 1, other: 3 });
        assert_eq!(SwcData::new(records, SwcMode::Relaxed).unwrap().len(), 4);
    }

    #[test]
    fn test_topology_errors() {
        let dup = vec![rec(1, None), rec(1, Some(1))];
        assert_eq!(
            *SwcData::new(dup, SwcMode::Relaxed).unwrap_err().kind(),
            SwcErrorType::DuplicateId(1)
        );

        let self_parent = vec![rec(1, None), rec(2, Some(2))];
        assert_eq!(
            *SwcData::new(self_parent, SwcMode::Strict).unwrap_err().kind(),
            SwcErrorType::SelfParent(2)
        );

        let missing = vec![rec(1, None), rec(2, Some(7))];
        assert_eq!(
            *SwcData::new(missing, SwcMode::Strict).unwrap_err().kind(),
            SwcErrorType::NoSuchParent { id: 2, parent: 7 }
        );

        // Sorting by id cannot fix a parent with a larger id
        let backwards = vec![rec(2, None), rec(1, Some(2))];
        assert_eq!(
            *SwcData::new(backwards, SwcMode::Relaxed).unwrap_err().kind(),
            SwcErrorType::ParentAfterChild { id: 1, parent: 2 }
        );
    }
}
