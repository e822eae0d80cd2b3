use crate::coords::{Coord, CoordinateSystem};
use crate::error::ConstructionError;
use crate::factory::{GeometryFactory, TreeFactory};
use crate::kind::GeometryKind;
use serde::{Deserialize, Serialize};

/// The contents of a geometry node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// A point's coordinate, or `None` for an empty point.
    Point(Option<Coord>),
    /// The vertices of a LineString or CircularString.
    Coords(Vec<Coord>),
    /// The rings of a Polygon or Triangle.
    Rings(Vec<Vec<Coord>>),
    /// Sub-geometries of any composite kind.
    Children(Vec<Geometry>),
}

/// An owned, immutable geometry tree.
///
/// Geometries are built either by decoding (see [`Reader`][crate::Reader]) or through the
/// constructors here, which apply the same structural rules as [`TreeFactory`]. Deserializing
/// goes through the same rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct Geometry {
    kind: GeometryKind,
    cs: CoordinateSystem,
    payload: Payload,
}

impl Geometry {
    pub(crate) fn from_parts(kind: GeometryKind, cs: CoordinateSystem, payload: Payload) -> Self {
        Self { kind, cs, payload }
    }

    /// Build a Point, or an empty point if `coord` is `None`.
    pub fn point(
        coord: Option<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        TreeFactory.make_point(coord, cs)
    }

    /// Build a LineString or CircularString.
    pub fn curve(
        kind: GeometryKind,
        coords: Vec<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        TreeFactory.make_curve(kind, coords, cs)
    }

    /// Build a Polygon or Triangle from flat rings.
    pub fn polygon(
        kind: GeometryKind,
        rings: Vec<Vec<Coord>>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        TreeFactory.make_polygon(kind, rings, cs)
    }

    /// Build any geometry made of sub-geometries.
    pub fn composite(
        kind: GeometryKind,
        children: Vec<Geometry>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        TreeFactory.make_composite(kind, children, cs)
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.cs
    }

    pub fn srid(&self) -> u32 {
        self.cs.srid
    }

    pub fn has_z(&self) -> bool {
        self.cs.has_z
    }

    pub fn has_m(&self) -> bool {
        self.cs.has_m
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The coordinate of a non-empty point.
    pub fn as_point(&self) -> Option<&Coord> {
        match self.payload {
            Payload::Point(ref c) => c.as_ref(),
            _ => None,
        }
    }

    pub fn coords(&self) -> Option<&[Coord]> {
        match self.payload {
            Payload::Coords(ref c) => Some(c),
            _ => None,
        }
    }

    pub fn rings(&self) -> Option<&[Vec<Coord>]> {
        match self.payload {
            Payload::Rings(ref r) => Some(r),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[Geometry]> {
        match self.payload {
            Payload::Children(ref c) => Some(c),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.payload {
            Payload::Point(ref c) => c.is_none(),
            Payload::Coords(ref c) => c.is_empty(),
            Payload::Rings(ref r) => r.is_empty(),
            Payload::Children(ref c) => c.is_empty(),
        }
    }

    /// Maximum nesting depth of this tree. A lone point or polygon has depth 1.
    pub fn depth(&self) -> usize {
        match self.payload {
            Payload::Children(ref c) => 1 + c.iter().map(|g| g.depth()).max().unwrap_or(0),
            _ => 1,
        }
    }
}

/// Unchecked serde form of [`Geometry`].
#[derive(Deserialize)]
struct RawGeometry {
    kind: GeometryKind,
    cs: CoordinateSystem,
    payload: Payload,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = ConstructionError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        let RawGeometry { kind, cs, payload } = raw;
        match payload {
            Payload::Point(coord) => {
                if kind != GeometryKind::Point {
                    return Err(ConstructionError::Other(format!(
                        "{} can't hold a point payload",
                        kind
                    )));
                }
                TreeFactory.make_point(coord, cs)
            }
            Payload::Coords(coords) => TreeFactory.make_curve(kind, coords, cs),
            Payload::Rings(rings) => TreeFactory.make_polygon(kind, rings, cs),
            Payload::Children(children) => TreeFactory.make_composite(kind, children, cs),
        }
    }
}
