//! Recursive-descent reconstruction of a geometry tree.

use crate::coords::{Coord, CoordinateSystem};
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::factory::GeometryFactory;
use crate::header::HeaderDecoder;
use crate::kind::GeometryKind;
use crate::MAX_DEPTH;
use log::trace;

/// Smallest possible encoded node: byte order, type code, and a zero count.
const MIN_NODE_SIZE: usize = 1 + 4 + 4;
/// A flat ring is at least its point count.
const MIN_RING_SIZE: usize = 4;

/// Reads one geometry node per call, recursing into sub-geometries. The header dialect and the
/// geometry types produced are both pluggable; the recursion is shared.
#[derive(Clone, Debug)]
pub struct GeometryBuilder<H, F> {
    header: H,
    factory: F,
    max_depth: usize,
}

impl<H: HeaderDecoder, F: GeometryFactory> GeometryBuilder<H, F> {
    pub fn new(header: H, factory: F) -> Self {
        Self {
            header,
            factory,
            max_depth: MAX_DEPTH,
        }
    }

    /// Limit how deeply geometries may nest. A lone point has depth 1.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Read a single geometry node, starting at its byte order marker. `inherited_srid` applies
    /// unless the node's header carries its own.
    pub fn read_geometry(&self, cursor: &mut ByteCursor, inherited_srid: u32) -> Result<F::Output> {
        self.read_node(cursor, inherited_srid, 1)
    }

    fn read_node(&self, cursor: &mut ByteCursor, inherited_srid: u32, depth: usize) -> Result<F::Output> {
        if depth > self.max_depth {
            return Err(Error::DepthLimit {
                max: self.max_depth,
            });
        }
        let offset = cursor.position();
        cursor.read_byte_order()?;
        let header = self.header.decode(cursor, inherited_srid)?;
        let cs = header.coordinate_system();
        trace!(
            "{} at offset {}: depth={}, z={}, m={}, srid={}",
            header.kind,
            offset,
            depth,
            cs.has_z,
            cs.has_m,
            cs.srid
        );

        use self::GeometryKind::*;
        let node = match header.kind {
            Point => {
                let ords = cursor.read_f64s(cs.dimension())?;
                // All-NaN ordinates is how an empty point is written
                let coord = if ords.iter().all(|v| v.is_nan()) {
                    None
                } else {
                    Some(Coord::from_ordinates(&ords, &cs))
                };
                self.factory.make_point(coord, cs)?
            }
            LineString | CircularString => {
                let coords = read_coords(cursor, &cs, "read point count")?;
                self.factory.make_curve(header.kind, coords, cs)?
            }
            // Rings here are flat: no byte order or type code in front of each one.
            Polygon | Triangle => {
                let count = read_count(cursor, MIN_RING_SIZE, "read ring count")?;
                let mut rings = Vec::with_capacity(count);
                for _ in 0..count {
                    rings.push(read_coords(cursor, &cs, "read ring point count")?);
                }
                self.factory.make_polygon(header.kind, rings, cs)?
            }
            // Every segment, ring, or patch has its own full header, as it may itself be curved.
            CompoundCurve | CurvePolygon | PolyhedralSurface | Tin => {
                let children = self.read_children(cursor, cs.srid, depth)?;
                self.factory.make_composite(header.kind, children, cs)?
            }
            MultiPoint | MultiLineString | MultiPolygon | GeometryCollection => {
                let children = self.read_children(cursor, cs.srid, depth)?;
                self.factory.make_composite(header.kind, children, cs)?
            }
        };
        Ok(node)
    }

    fn read_children(&self, cursor: &mut ByteCursor, srid: u32, depth: usize) -> Result<Vec<F::Output>> {
        let count = read_count(cursor, MIN_NODE_SIZE, "read geometry count")?;
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(self.read_node(cursor, srid, depth + 1)?);
        }
        Ok(children)
    }
}

/// Read a count prefix, then make sure enough bytes remain to hold that many items of at least
/// `item_size` bytes each. A count that can't possibly fit fails here, before any allocation.
fn read_count(cursor: &mut ByteCursor, item_size: usize, step: &'static str) -> Result<usize> {
    let count = cursor.read_u32(step)? as usize;
    cursor.require(count.saturating_mul(item_size), step)?;
    Ok(count)
}

fn read_coords(
    cursor: &mut ByteCursor,
    cs: &CoordinateSystem,
    step: &'static str,
) -> Result<Vec<Coord>> {
    let dim = cs.dimension();
    let count = read_count(cursor, dim * 8, step)?;
    let ords = cursor.read_f64s(count * dim)?;
    Ok(ords
        .chunks_exact(dim)
        .map(|c| Coord::from_ordinates(c, cs))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::factory::TreeFactory;
    use crate::header::{ExtendedHeader, StandardHeader};

    fn le_header(buf: &mut Vec<u8>, code: u32) {
        buf.push(0x01);
        buf.extend_from_slice(&code.to_le_bytes());
    }

    fn le_f64s(buf: &mut Vec<u8>, vals: &[f64]) {
        for v in vals {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    #[test]
    fn polygon_rings_are_flat() {
        let mut data = Vec::new();
        le_header(&mut data, 3);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        le_f64s(&mut data, &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);

        let builder = GeometryBuilder::new(StandardHeader, TreeFactory);
        let mut cursor = ByteCursor::new(&data);
        let poly = builder.read_geometry(&mut cursor, 0).unwrap();
        assert!(cursor.at_end());
        assert_eq!(poly.kind(), GeometryKind::Polygon);
        let rings = poly.rings().unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0][2], Coord::xy(1.0, 1.0));
    }

    #[test]
    fn curve_polygon_rings_have_headers() {
        let mut data = Vec::new();
        le_header(&mut data, 10);
        data.extend_from_slice(&1u32.to_le_bytes());
        le_header(&mut data, 8);
        data.extend_from_slice(&3u32.to_le_bytes());
        le_f64s(&mut data, &[0.0, 0.0, 1.0, 1.0, 2.0, 0.0]);

        let builder = GeometryBuilder::new(StandardHeader, TreeFactory);
        let mut cursor = ByteCursor::new(&data);
        let poly = builder.read_geometry(&mut cursor, 0).unwrap();
        assert!(cursor.at_end());
        assert_eq!(poly.kind(), GeometryKind::CurvePolygon);
        let rings = poly.children().unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].kind(), GeometryKind::CircularString);
        assert_eq!(rings[0].coords().unwrap().len(), 3);
    }

    #[test]
    fn empty_point_is_nan() {
        let mut data = Vec::new();
        le_header(&mut data, 1);
        le_f64s(&mut data, &[f64::NAN, f64::NAN]);
        let builder = GeometryBuilder::new(StandardHeader, TreeFactory);
        let pt = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap();
        assert!(pt.is_empty());
    }

    #[test]
    fn half_nan_point_is_not_empty() {
        let mut data = Vec::new();
        le_header(&mut data, 1);
        le_f64s(&mut data, &[f64::NAN, 3.0]);
        let builder = GeometryBuilder::new(StandardHeader, TreeFactory);
        let pt = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap();
        assert!(!pt.is_empty());
        assert_eq!(pt.as_point().unwrap().y, 3.0);
    }

    #[test]
    fn child_srid_override() {
        use crate::header::EWKB_SRID_FLAG;
        let mut data = Vec::new();
        le_header(&mut data, 4 | EWKB_SRID_FLAG);
        data.extend_from_slice(&4326u32.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes());
        le_header(&mut data, 1);
        le_f64s(&mut data, &[1.0, 2.0]);
        le_header(&mut data, 1 | EWKB_SRID_FLAG);
        data.extend_from_slice(&3857u32.to_le_bytes());
        le_f64s(&mut data, &[3.0, 4.0]);

        let builder = GeometryBuilder::new(ExtendedHeader, TreeFactory);
        let multi = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap();
        let children = multi.children().unwrap();
        assert_eq!(multi.srid(), 4326);
        assert_eq!(children[0].srid(), 4326);
        assert_eq!(children[1].srid(), 3857);
    }

    #[test]
    fn depth_limit() {
        // Collections nested 5 deep, with an empty one at the bottom
        let mut data = Vec::new();
        for _ in 0..4 {
            le_header(&mut data, 7);
            data.extend_from_slice(&1u32.to_le_bytes());
        }
        le_header(&mut data, 7);
        data.extend_from_slice(&0u32.to_le_bytes());

        let builder = GeometryBuilder::new(StandardHeader, TreeFactory).max_depth(5);
        let tree = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap();
        assert_eq!(tree.depth(), 5);

        let builder = GeometryBuilder::new(StandardHeader, TreeFactory).max_depth(4);
        let err = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap_err();
        assert_eq!(err, Error::DepthLimit { max: 4 });
    }

    #[test]
    fn oversized_count_fails_fast() {
        let mut data = Vec::new();
        le_header(&mut data, 2);
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        le_f64s(&mut data, &[1.0, 2.0]);
        let builder = GeometryBuilder::new(StandardHeader, TreeFactory);
        let err = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                step: "read point count",
                actual: 16,
                ..
            }
        ));

        let mut data = Vec::new();
        le_header(&mut data, 7);
        data.extend_from_slice(&1_000_000u32.to_le_bytes());
        let err = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                step: "read geometry count",
                ..
            }
        ));
    }

    #[test]
    fn factory_rejection_propagates() {
        // MultiPoint holding a LineString
        let mut data = Vec::new();
        le_header(&mut data, 4);
        data.extend_from_slice(&1u32.to_le_bytes());
        le_header(&mut data, 2);
        data.extend_from_slice(&0u32.to_le_bytes());
        let builder = GeometryBuilder::new(StandardHeader, TreeFactory);
        let err = builder
            .read_geometry(&mut ByteCursor::new(&data), 0)
            .unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }
}
