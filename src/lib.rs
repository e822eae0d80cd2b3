//! wkb-codec reads and writes geometries in the OGC Well-Known Binary format and its common
//! extensions, producing an owned tree of geometry values without depending on a native geometry
//! engine.
//!
//! Supported header dialects:
//!
//! - Standard WKB, as defined by OGC Simple Feature Access. 2D only, no SRID.
//! - Extended WKB (EWKB), as produced by PostGIS. Z/M flags and an optional SRID live in the top
//!   bits of the type code.
//! - ISO WKB, where Z/M are encoded by adding 1000/2000/3000 to the type code.
//!
//! All the OGC geometry kinds are handled: points, line strings, circular strings, compound
//! curves, polygons, curve polygons, triangles, the multi-geometries, collections, polyhedral
//! surfaces, and TINs.
//!
//! Decoding is strict:
//!
//! - Every read is bounds-checked. Truncated input fails with [`Error::Truncated`], and counts that
//!   can't possibly fit in the remaining input fail before anything is allocated.
//! - Bytes left after the geometry fail with [`Error::TrailingData`].
//! - Nesting is limited to [`MAX_DEPTH`] by default.
//! - A decode returns either the complete tree or exactly one error, never a partial geometry.
//!
//! Geometric validity (ring closure, orientation, self-intersection) is never checked.
//!
//! ```
//! let pt = wkb_codec::read_hex_ewkb("0101000020E6100000000000000000F03F0000000000000040").unwrap();
//! assert_eq!(pt.srid(), 4326);
//! assert_eq!(pt.as_point().unwrap().x, 1.0);
//! ```
//!
//! Decoded nodes are assembled by a [`GeometryFactory`]. The default [`TreeFactory`] produces
//! [`Geometry`] values; callers with their own geometry types can implement the trait and use
//! [`Reader::read_with`].

mod builder;
mod coords;
mod cursor;
mod error;
mod factory;
mod geometry;
mod header;
mod kind;
mod reader;
mod writer;

pub use self::builder::GeometryBuilder;
pub use self::coords::{Coord, CoordinateSystem};
pub use self::cursor::{ByteCursor, ByteOrder};
pub use self::error::{ConstructionError, Error, Result};
pub use self::factory::{GeometryFactory, TreeFactory};
pub use self::geometry::{Geometry, Payload};
pub use self::header::{
    Dialect, ExtendedHeader, Header, HeaderDecoder, IsoHeader, StandardHeader, EWKB_M_FLAG,
    EWKB_SRID_FLAG, EWKB_Z_FLAG,
};
pub use self::kind::{GeometryKind, Layout};
pub use self::reader::{ReadOptions, Reader};
pub use self::writer::{WriteOptions, Writer};

/// Default limit on how deeply geometries may nest. Real data rarely goes past 3 or 4 levels
/// (a collection of multi-polygons, or a curve polygon of compound curves).
pub const MAX_DEPTH: usize = 64;

/// SRID assigned when neither the data nor the caller supplies one.
pub const DEFAULT_SRID: u32 = 0;

/// Decode standard OGC WKB.
pub fn read_wkb(data: &[u8]) -> Result<Geometry> {
    Reader::new(Dialect::Standard).read(data)
}

/// Decode PostGIS Extended WKB.
pub fn read_ewkb(data: &[u8]) -> Result<Geometry> {
    Reader::new(Dialect::Extended).read(data)
}

/// Decode ISO WKB.
pub fn read_iso_wkb(data: &[u8]) -> Result<Geometry> {
    Reader::new(Dialect::Iso).read(data)
}

/// Decode hex-encoded Extended WKB, the text form PostGIS uses for geometry columns.
pub fn read_hex_ewkb(text: &str) -> Result<Geometry> {
    Reader::new(Dialect::Extended).read_hex(text)
}

/// Encode as little-endian Extended WKB, including the SRID if it isn't zero.
pub fn write_ewkb(geom: &Geometry) -> Result<Vec<u8>> {
    Writer::new(Dialect::Extended).write(geom)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_type_code() {
        let mut data = vec![0x01];
        data.extend_from_slice(&999u32.to_le_bytes());
        data.extend_from_slice(&1.0f64.to_le_bytes());
        data.extend_from_slice(&2.0f64.to_le_bytes());
        assert_eq!(read_wkb(&data), Err(Error::UnsupportedGeometryType(999)));
        assert_eq!(read_ewkb(&data), Err(Error::UnsupportedGeometryType(999)));
    }

    #[test]
    fn empty_multipoint() {
        let data = [0x01, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let geom = read_wkb(&data).unwrap();
        assert_eq!(geom.kind(), GeometryKind::MultiPoint);
        assert_eq!(geom.children().unwrap().len(), 0);
        assert_eq!(geom.srid(), DEFAULT_SRID);
    }

    #[test]
    fn ewkb_roundtrip() {
        let cs = CoordinateSystem::new(true, false, 2154);
        let geom = Geometry::point(Some(Coord::xyz(1.0, 2.0, 3.0)), cs).unwrap();
        let enc = write_ewkb(&geom).unwrap();
        assert_eq!(read_ewkb(&enc).unwrap(), geom);
    }
}
