use crate::coords::{Coord, CoordinateSystem};
use crate::cursor::ByteOrder;
use crate::error::{Error, Result};
use crate::geometry::{Geometry, Payload};
use crate::header::Dialect;
use crate::kind::Layout;
use byteorder::ByteOrder as _;
use byteorder::{BigEndian, LittleEndian};
use serde::{Deserialize, Serialize};

/// Settings for encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    pub dialect: Dialect,
    /// Byte order used for every node.
    pub byte_order: ByteOrder,
    /// Write the top-level SRID when it is non-zero. Only the Extended dialect can carry one.
    pub include_srid: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            byte_order: ByteOrder::default(),
            include_srid: true,
        }
    }
}

/// Encodes [`Geometry`] trees back into WKB/EWKB.
///
/// With the Extended dialect, any child whose SRID differs from its parent's gets its own SRID
/// written, so decoding the output returns the same tree.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    options: WriteOptions,
}

struct Encoder {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl Encoder {
    fn put_u32(&mut self, v: u32) {
        let mut tmp = [0u8; 4];
        match self.order {
            ByteOrder::BigEndian => BigEndian::write_u32(&mut tmp, v),
            ByteOrder::LittleEndian => LittleEndian::write_u32(&mut tmp, v),
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn put_f64(&mut self, v: f64) {
        let mut tmp = [0u8; 8];
        match self.order {
            ByteOrder::BigEndian => BigEndian::write_f64(&mut tmp, v),
            ByteOrder::LittleEndian => LittleEndian::write_f64(&mut tmp, v),
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn put_count(&mut self, len: usize) -> Result<()> {
        if len > u32::MAX as usize {
            return Err(Error::BadEncode(format!(
                "{} elements don't fit in a 32-bit count",
                len
            )));
        }
        self.put_u32(len as u32);
        Ok(())
    }

    fn put_coords(&mut self, coords: &[Coord], cs: &CoordinateSystem) -> Result<()> {
        self.put_count(coords.len())?;
        for c in coords {
            for v in c.ordinates(cs) {
                self.put_f64(v);
            }
        }
        Ok(())
    }
}

impl Writer {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_options(WriteOptions {
            dialect,
            ..WriteOptions::default()
        })
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.options.byte_order = order;
        self
    }

    pub fn include_srid(mut self, include: bool) -> Self {
        self.options.include_srid = include;
        self
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    pub fn write(&self, geom: &Geometry) -> Result<Vec<u8>> {
        let mut enc = Encoder {
            buf: Vec::new(),
            order: self.options.byte_order,
        };
        self.write_node(&mut enc, geom, None)?;
        Ok(enc.buf)
    }

    /// Encode as uppercase hex text, the way PostGIS prints geometries.
    pub fn write_hex(&self, geom: &Geometry) -> Result<String> {
        Ok(hex::encode_upper(self.write(geom)?))
    }

    fn write_node(&self, enc: &mut Encoder, geom: &Geometry, parent_srid: Option<u32>) -> Result<()> {
        let cs = geom.coordinate_system();
        let layout = match geom.payload() {
            Payload::Point(_) => Layout::Coord,
            Payload::Coords(_) => Layout::Coords,
            Payload::Rings(_) => Layout::FlatRings,
            Payload::Children(_) => Layout::Children,
        };
        if layout != geom.kind().layout() {
            return Err(Error::BadEncode(format!(
                "{} can't be written with a {:?} payload",
                geom.kind(),
                layout
            )));
        }
        let dialect = self.options.dialect;
        if dialect == Dialect::Standard && (cs.has_z || cs.has_m) {
            return Err(Error::BadEncode(format!(
                "{} with Z or M ordinates can't be written as standard WKB",
                geom.kind()
            )));
        }
        let with_srid = dialect == Dialect::Extended
            && match parent_srid {
                None => self.options.include_srid && cs.srid != 0,
                Some(parent) => cs.srid != parent,
            };

        enc.buf.push(enc.order.into_u8());
        enc.put_u32(dialect.type_code(geom.kind(), &cs, with_srid));
        if with_srid {
            enc.put_u32(cs.srid);
        }

        match geom.payload() {
            Payload::Point(Some(c)) => {
                for v in c.ordinates(&cs) {
                    enc.put_f64(v);
                }
            }
            Payload::Point(None) => {
                for _ in 0..cs.dimension() {
                    enc.put_f64(f64::NAN);
                }
            }
            Payload::Coords(coords) => enc.put_coords(coords, &cs)?,
            Payload::Rings(rings) => {
                enc.put_count(rings.len())?;
                for ring in rings {
                    enc.put_coords(ring, &cs)?;
                }
            }
            Payload::Children(children) => {
                enc.put_count(children.len())?;
                for child in children {
                    self.write_node(enc, child, Some(cs.srid))?;
                }
            }
        }
        Ok(())
    }
}
