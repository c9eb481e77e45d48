//! Geometry primitives: points with radius, segments, and positions on branches.
//!
//! * [Point] - 3D position with a cable radius
//! * [Segment] - directed frustum from a proximal to a distal [Point], with a [Tag]
//! * [Location] - a relative position on a branch
//! * [Cable] - a relative interval on a branch

use crate::model::BranchIndex;
use crate::model::invariant::InvariantViolation;
use std::fmt;

/// Integer label describing the anatomical structure of a segment or sample,
/// e.g. `1` for soma, `2` for axon.
pub type Tag = i32;

// =$========================================================================$=
// POINT
// =$========================================================================$=
/// A point in space with the radius of the cable centred on it.
///
/// All values share the same unit (μm by convention). A radius of zero is
/// permitted, e.g. for tapered tips.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Point { x, y, z, radius }
    }

    /// Euclidean distance between the positions of `self` and `other`,
    /// ignoring radii.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Returns the same position with another radius.
    pub fn with_radius(&self, radius: f64) -> Self {
        Point { radius, ..*self }
    }

    /// Returns the point shifted by `(dx, dy, dz)`, keeping the radius.
    pub fn translated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Point::new(self.x + dx, self.y + dy, self.z + dz, self.radius)
    }

    /// Whether `self` and `other` are at the same position (radii ignored).
    pub fn same_position(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(point {} {} {} {})", self.x, self.y, self.z, self.radius)
    }
}

// =$========================================================================$=
// SEGMENT
// =$========================================================================$=
/// A directed piece of cable between a proximal and a distal [Point].
///
/// The segment's parent is not stored here but in the parent array of the
/// [SegmentTree](crate::model::SegmentTree) holding it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub prox: Point,
    pub dist: Point,
    pub tag: Tag,
}

impl Segment {
    /// Creates a new segment.
    pub fn new(prox: Point, dist: Point, tag: Tag) -> Self {
        Segment { prox, dist, tag }
    }

    /// Length of the segment's axis.
    pub fn length(&self) -> f64 {
        self.prox.distance(&self.dist)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(segment {} {} {})", self.prox, self.dist, self.tag)
    }
}

/// Whether `pos` is a valid relative position on a branch.
fn is_relative_position(pos: f64) -> bool {
    (0.0..=1.0).contains(&pos)
}

// =$========================================================================$=
// LOCATION
// =$========================================================================$=
/// A location on a branch: branch index plus relative position
/// from `0.0` (proximal end) to `1.0` (distal end).
///
/// Only the range of `pos` is checked on construction; whether the branch
/// exists is checked by
/// [Morphology::validate_location](crate::model::Morphology::validate_location).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LocationRepr"))]
pub struct Location {
    branch: BranchIndex,
    pos: f64,
}

impl Location {
    /// Creates a new location.
    ///
    /// # Errors
    /// [InvariantViolation::InvalidLocation] if `pos` is not in `[0, 1]` (or NaN).
    ///
    /// # Example
    /// ```
    /// use swctree::model::Location;
    ///
    /// let loc = Location::new(2, 0.5).unwrap();
    /// assert_eq!((loc.branch(), loc.pos()), (2, 0.5));
    /// assert!(Location::new(2, 1.5).is_err());
    /// ```
    pub fn new(branch: BranchIndex, pos: f64) -> Result<Self, InvariantViolation> {
        if !is_relative_position(pos) {
            return Err(InvariantViolation::InvalidLocation { branch, pos });
        }
        Ok(Location { branch, pos })
    }

    /// The index of the branch.
    pub fn branch(&self) -> BranchIndex {
        self.branch
    }

    /// The relative position on the branch.
    pub fn pos(&self) -> f64 {
        self.pos
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(location {} {})", self.branch, self.pos)
    }
}

// =$========================================================================$=
// CABLE
// =$========================================================================$=
/// An interval of a branch between two relative positions.
///
/// Both ends must lie in `[0, 1]`; no order is imposed between them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CableRepr"))]
pub struct Cable {
    branch: BranchIndex,
    prox: f64,
    dist: f64,
}

impl Cable {
    /// Creates a new cable.
    ///
    /// # Errors
    /// [InvariantViolation::InvalidCable] if `prox` or `dist` is not in `[0, 1]`.
    pub fn new(branch: BranchIndex, prox: f64, dist: f64) -> Result<Self, InvariantViolation> {
        if !is_relative_position(prox) || !is_relative_position(dist) {
            return Err(InvariantViolation::InvalidCable { branch, prox, dist });
        }
        Ok(Cable { branch, prox, dist })
    }

    /// The index of the branch the cable lies on.
    pub fn branch(&self) -> BranchIndex {
        self.branch
    }

    /// Relative position of the proximal end.
    pub fn prox(&self) -> f64 {
        self.prox
    }

    /// Relative position of the distal end.
    pub fn dist(&self) -> f64 {
        self.dist
    }
}

impl fmt::Display for Cable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(cable {} {} {})", self.branch, self.prox, self.dist)
    }
}

// ============================================================================
// Deserializing
// ============================================================================
// Locations and cables are deserialized through their constructors so the
// range check on positions applies.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct LocationRepr {
    branch: BranchIndex,
    pos: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<LocationRepr> for Location {
    type Error = InvariantViolation;

    fn try_from(repr: LocationRepr) -> Result<Self, Self::Error> {
        Location::new(repr.branch, repr.pos)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CableRepr {
    branch: BranchIndex,
    prox: f64,
    dist: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<CableRepr> for Cable {
    type Error = InvariantViolation;

    fn try_from(repr: CableRepr) -> Result<Self, Self::Error> {
        Cable::new(repr.branch, repr.prox, repr.dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0, 0.0, 1.0);
        let b = Point::new(3.0, 4.0, 0.0, 2.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(Segment::new(a, b, 3).length(), 5.0);
    }

    #[test]
    fn test_location_bounds() {
        assert!(Location::new(0, 0.0).is_ok());
        assert!(Location::new(0, 1.0).is_ok());
        assert!(Location::new(0, -0.1).is_err());
        assert!(Location::new(0, f64::NAN).is_err());
    }

    #[test]
    fn test_cable_either_direction() {
        let cable = Cable::new(1, 0.8, 0.2).unwrap();
        assert_eq!((cable.prox(), cable.dist()), (0.8, 0.2));
        assert!(Cable::new(1, 0.2, 1.2).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Location::new(3, 0.25).unwrap().to_string(), "(location 3 0.25)");
        assert_eq!(Cable::new(0, 0.0, 1.0).unwrap().to_string(), "(cable 0 0 1)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_positions() {
        let loc: Location = serde_json::from_str(r#"{"branch":2,"pos":0.5}"#).unwrap();
        assert_eq!(loc, Location::new(2, 0.5).unwrap());
        let err = serde_json::from_str::<Location>(r#"{"branch":0,"pos":7.5}"#).unwrap_err();
        assert!(err.to_string().contains("position must lie in [0, 1]"));

        let cable = Cable::new(1, 0.8, 0.2).unwrap();
        let json = serde_json::to_string(&cable).unwrap();
        assert_eq!(serde_json::from_str::<Cable>(&json).unwrap(), cable);
        let bad = r#"{"branch":1,"prox":0.2,"dist":-1.0}"#;
        assert!(serde_json::from_str::<Cable>(bad).is_err());
    }
}
