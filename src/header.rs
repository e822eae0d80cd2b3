//! Geometry header decoding.
//!
//! Every geometry node starts with a byte order marker and a 4-byte type code. How the type code
//! is interpreted depends on the dialect:
//!
//! - Standard (OGC WKB): the code is exactly one of the base geometry codes.
//! - Extended (PostGIS EWKB): the top three bits are flags. Bit 31 marks Z, bit 30 marks M, and
//!   bit 29 means a 4-byte SRID follows the type code.
//! - ISO (SQL/MM): dimensions are added to the base code in steps of 1000. 1000 means Z, 2000
//!   means M, 3000 means ZM.

use crate::coords::CoordinateSystem;
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::kind::GeometryKind;
use serde::{Deserialize, Serialize};

pub const EWKB_Z_FLAG: u32 = 0x8000_0000;
pub const EWKB_M_FLAG: u32 = 0x4000_0000;
pub const EWKB_SRID_FLAG: u32 = 0x2000_0000;
const EWKB_FLAG_MASK: u32 = EWKB_Z_FLAG | EWKB_M_FLAG | EWKB_SRID_FLAG;

const ISO_Z_OFFSET: u32 = 1000;
const ISO_M_OFFSET: u32 = 2000;

/// Everything a header says about the node that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub kind: GeometryKind,
    pub has_z: bool,
    pub has_m: bool,
    pub srid: u32,
}

impl Header {
    pub fn coordinate_system(&self) -> CoordinateSystem {
        CoordinateSystem::new(self.has_z, self.has_m, self.srid)
    }
}

/// Decodes the type code (and anything else the dialect stores in the header) for one node. The
/// byte order marker has already been consumed when this is called.
pub trait HeaderDecoder {
    fn decode(&self, cursor: &mut ByteCursor, inherited_srid: u32) -> Result<Header>;
}

fn lookup(code: u32, base: u32) -> Result<GeometryKind> {
    GeometryKind::from_code(base).ok_or(Error::UnsupportedGeometryType(code))
}

/// Plain OGC WKB. Always 2D, never carries an SRID.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardHeader;

impl HeaderDecoder for StandardHeader {
    fn decode(&self, cursor: &mut ByteCursor, inherited_srid: u32) -> Result<Header> {
        let code = cursor.read_u32("read type code")?;
        Ok(Header {
            kind: lookup(code, code)?,
            has_z: false,
            has_m: false,
            srid: inherited_srid,
        })
    }
}

/// PostGIS Extended WKB.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtendedHeader;

impl HeaderDecoder for ExtendedHeader {
    fn decode(&self, cursor: &mut ByteCursor, inherited_srid: u32) -> Result<Header> {
        let code = cursor.read_u32("read type code")?;
        let kind = lookup(code, code & !EWKB_FLAG_MASK)?;
        let srid = if code & EWKB_SRID_FLAG != 0 {
            cursor.read_u32("read SRID")?
        } else {
            inherited_srid
        };
        Ok(Header {
            kind,
            has_z: code & EWKB_Z_FLAG != 0,
            has_m: code & EWKB_M_FLAG != 0,
            srid,
        })
    }
}

/// ISO SQL/MM WKB, with dimensions encoded as thousands.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsoHeader;

impl HeaderDecoder for IsoHeader {
    fn decode(&self, cursor: &mut ByteCursor, inherited_srid: u32) -> Result<Header> {
        let code = cursor.read_u32("read type code")?;
        let (has_z, has_m) = match code / 1000 {
            0 => (false, false),
            1 => (true, false),
            2 => (false, true),
            3 => (true, true),
            _ => return Err(Error::UnsupportedGeometryType(code)),
        };
        Ok(Header {
            kind: lookup(code, code % 1000)?,
            has_z,
            has_m,
            srid: inherited_srid,
        })
    }
}

/// Which header format a stream uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    Standard,
    Extended,
    Iso,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Extended
    }
}

impl Dialect {
    /// Build the type code for a node written in this dialect. `with_srid` only has an effect for
    /// the Extended dialect.
    pub(crate) fn type_code(self, kind: GeometryKind, cs: &CoordinateSystem, with_srid: bool) -> u32 {
        let base = kind.code();
        match self {
            Dialect::Standard => base,
            Dialect::Extended => {
                let mut code = base;
                if cs.has_z {
                    code |= EWKB_Z_FLAG;
                }
                if cs.has_m {
                    code |= EWKB_M_FLAG;
                }
                if with_srid {
                    code |= EWKB_SRID_FLAG;
                }
                code
            }
            Dialect::Iso => {
                let mut code = base;
                if cs.has_z {
                    code += ISO_Z_OFFSET;
                }
                if cs.has_m {
                    code += ISO_M_OFFSET;
                }
                code
            }
        }
    }
}
