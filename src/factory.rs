//! The construction interface between the decoder and whatever geometry types the caller wants.
//!
//! The decoder never builds geometry values itself. Once a node is fully read, its data goes to
//! one of the [`GeometryFactory`] methods, and whatever the factory returns becomes the child
//! handed to the parent node. A factory may refuse the data by returning a
//! [`ConstructionError`], which aborts the whole decode.

use crate::coords::{Coord, CoordinateSystem};
use crate::error::ConstructionError;
use crate::geometry::{Geometry, Payload};
use crate::kind::{GeometryKind, Layout};

pub trait GeometryFactory {
    type Output;

    /// A Point. `coord` is `None` for an empty point.
    fn make_point(
        &self,
        coord: Option<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError>;

    /// A LineString or CircularString.
    fn make_curve(
        &self,
        kind: GeometryKind,
        coords: Vec<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError>;

    /// A Polygon or Triangle, with flat rings.
    fn make_polygon(
        &self,
        kind: GeometryKind,
        rings: Vec<Vec<Coord>>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError>;

    /// Any kind built from headered sub-geometries.
    fn make_composite(
        &self,
        kind: GeometryKind,
        children: Vec<Self::Output>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError>;
}

impl<'a, F: GeometryFactory + ?Sized> GeometryFactory for &'a F {
    type Output = F::Output;

    fn make_point(
        &self,
        coord: Option<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError> {
        (**self).make_point(coord, cs)
    }

    fn make_curve(
        &self,
        kind: GeometryKind,
        coords: Vec<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError> {
        (**self).make_curve(kind, coords, cs)
    }

    fn make_polygon(
        &self,
        kind: GeometryKind,
        rings: Vec<Vec<Coord>>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError> {
        (**self).make_polygon(kind, rings, cs)
    }

    fn make_composite(
        &self,
        kind: GeometryKind,
        children: Vec<Self::Output>,
        cs: CoordinateSystem,
    ) -> Result<Self::Output, ConstructionError> {
        (**self).make_composite(kind, children, cs)
    }
}

/// Builds [`Geometry`] trees.
///
/// Only structural rules are enforced: which kinds may nest inside which, that children share
/// their parent's Z/M dimensions, and that a Triangle has at most one ring. Children may carry an
/// SRID different from their parent's. Ring closure, orientation, and similar geometric rules are
/// never checked.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeFactory;

fn allows_child(parent: GeometryKind, child: GeometryKind) -> bool {
    use GeometryKind::*;
    match parent {
        MultiPoint => child == Point,
        MultiLineString => child == LineString,
        MultiPolygon => child == Polygon,
        GeometryCollection => true,
        CompoundCurve => matches!(child, LineString | CircularString),
        CurvePolygon => child.is_curve(),
        PolyhedralSurface => child == Polygon,
        Tin => child == Triangle,
        Point | LineString | CircularString | Polygon | Triangle => false,
    }
}

fn check_coords<'a, I>(
    kind: GeometryKind,
    coords: I,
    cs: &CoordinateSystem,
) -> Result<(), ConstructionError>
where
    I: IntoIterator<Item = &'a Coord>,
{
    for c in coords {
        if c.z.is_some() != cs.has_z || c.m.is_some() != cs.has_m {
            return Err(ConstructionError::CoordinateDimensions {
                kind,
                has_z: cs.has_z,
                has_m: cs.has_m,
            });
        }
    }
    Ok(())
}

fn wrong_layout(kind: GeometryKind, wanted: &str) -> ConstructionError {
    ConstructionError::Other(format!("{} is not {}", kind, wanted))
}

impl GeometryFactory for TreeFactory {
    type Output = Geometry;

    fn make_point(
        &self,
        coord: Option<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        check_coords(GeometryKind::Point, coord.iter(), &cs)?;
        Ok(Geometry::from_parts(
            GeometryKind::Point,
            cs,
            Payload::Point(coord),
        ))
    }

    fn make_curve(
        &self,
        kind: GeometryKind,
        coords: Vec<Coord>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        if !matches!(kind, GeometryKind::LineString | GeometryKind::CircularString) {
            return Err(wrong_layout(kind, "a simple curve"));
        }
        check_coords(kind, coords.iter(), &cs)?;
        Ok(Geometry::from_parts(kind, cs, Payload::Coords(coords)))
    }

    fn make_polygon(
        &self,
        kind: GeometryKind,
        rings: Vec<Vec<Coord>>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        match kind {
            GeometryKind::Polygon => (),
            GeometryKind::Triangle => {
                if rings.len() > 1 {
                    return Err(ConstructionError::TooManyRings {
                        kind,
                        max: 1,
                        actual: rings.len(),
                    });
                }
            }
            _ => return Err(wrong_layout(kind, "a flat-ring polygon")),
        }
        check_coords(kind, rings.iter().flatten(), &cs)?;
        Ok(Geometry::from_parts(kind, cs, Payload::Rings(rings)))
    }

    fn make_composite(
        &self,
        kind: GeometryKind,
        children: Vec<Geometry>,
        cs: CoordinateSystem,
    ) -> Result<Geometry, ConstructionError> {
        if kind.layout() != Layout::Children {
            return Err(wrong_layout(kind, "a composite"));
        }
        for child in children.iter() {
            if !allows_child(kind, child.kind()) {
                return Err(ConstructionError::UnexpectedChild {
                    parent: kind,
                    child: child.kind(),
                });
            }
            if !child.coordinate_system().same_dimensions(&cs) {
                return Err(ConstructionError::MixedDimensionality {
                    parent: kind,
                    child: child.kind(),
                });
            }
        }
        Ok(Geometry::from_parts(kind, cs, Payload::Children(children)))
    }
}
