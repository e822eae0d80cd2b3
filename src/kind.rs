use serde::{Deserialize, Serialize};
use std::fmt;

/// The geometry types that can appear in a WKB stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    CircularString,
    CompoundCurve,
    CurvePolygon,
    PolyhedralSurface,
    Tin,
    Triangle,
}

/// How a kind's payload is laid out after its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// One coordinate tuple.
    Coord,
    /// A count, then that many raw coordinate tuples.
    Coords,
    /// A ring count, then per ring a count and raw coordinate tuples. No header per ring.
    FlatRings,
    /// A count, then that many fully headered geometries.
    Children,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 13] = [
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPoint,
        GeometryKind::MultiLineString,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
        GeometryKind::CircularString,
        GeometryKind::CompoundCurve,
        GeometryKind::CurvePolygon,
        GeometryKind::PolyhedralSurface,
        GeometryKind::Tin,
        GeometryKind::Triangle,
    ];

    /// Convert from a base type code. Returns `None` for unknown codes, including the reserved
    /// 11-14 range.
    pub fn from_code(code: u32) -> Option<GeometryKind> {
        match code {
            1 => Some(GeometryKind::Point),
            2 => Some(GeometryKind::LineString),
            3 => Some(GeometryKind::Polygon),
            4 => Some(GeometryKind::MultiPoint),
            5 => Some(GeometryKind::MultiLineString),
            6 => Some(GeometryKind::MultiPolygon),
            7 => Some(GeometryKind::GeometryCollection),
            8 => Some(GeometryKind::CircularString),
            9 => Some(GeometryKind::CompoundCurve),
            10 => Some(GeometryKind::CurvePolygon),
            15 => Some(GeometryKind::PolyhedralSurface),
            16 => Some(GeometryKind::Tin),
            17 => Some(GeometryKind::Triangle),
            _ => None,
        }
    }

    /// Return the base type code, without any dimension or SRID flags.
    pub fn code(self) -> u32 {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
            GeometryKind::MultiPoint => 4,
            GeometryKind::MultiLineString => 5,
            GeometryKind::MultiPolygon => 6,
            GeometryKind::GeometryCollection => 7,
            GeometryKind::CircularString => 8,
            GeometryKind::CompoundCurve => 9,
            GeometryKind::CurvePolygon => 10,
            GeometryKind::PolyhedralSurface => 15,
            GeometryKind::Tin => 16,
            GeometryKind::Triangle => 17,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
            GeometryKind::CircularString => "CircularString",
            GeometryKind::CompoundCurve => "CompoundCurve",
            GeometryKind::CurvePolygon => "CurvePolygon",
            GeometryKind::PolyhedralSurface => "PolyhedralSurface",
            GeometryKind::Tin => "TIN",
            GeometryKind::Triangle => "Triangle",
        }
    }

    pub fn layout(self) -> Layout {
        use self::GeometryKind::*;
        match self {
            Point => Layout::Coord,
            LineString | CircularString => Layout::Coords,
            Polygon | Triangle => Layout::FlatRings,
            CompoundCurve | CurvePolygon | PolyhedralSurface | Tin | MultiPoint
            | MultiLineString | MultiPolygon | GeometryCollection => Layout::Children,
        }
    }

    /// Curves are the kinds allowed as CompoundCurve segments and CurvePolygon rings.
    pub fn is_curve(self) -> bool {
        matches!(
            self,
            GeometryKind::LineString | GeometryKind::CircularString | GeometryKind::CompoundCurve
        )
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<GeometryKind> for u32 {
    fn from(val: GeometryKind) -> u32 {
        val.code()
    }
}
