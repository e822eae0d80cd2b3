use crate::builder::GeometryBuilder;
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::factory::{GeometryFactory, TreeFactory};
use crate::geometry::Geometry;
use crate::header::{Dialect, ExtendedHeader, HeaderDecoder, IsoHeader, StandardHeader};
use crate::{DEFAULT_SRID, MAX_DEPTH};
use log::debug;
use serde::{Deserialize, Serialize};

/// Settings for decoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Header format expected on every node.
    pub dialect: Dialect,
    /// SRID given to the top-level geometry when its header doesn't carry one.
    pub default_srid: u32,
    /// Deepest nesting allowed before decoding fails.
    pub max_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            default_srid: DEFAULT_SRID,
            max_depth: MAX_DEPTH,
        }
    }
}

/// Decodes complete WKB/EWKB values.
///
/// A read either returns the whole geometry or a single error; nothing partial is ever handed
/// back. The reader holds no state between reads and can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct Reader {
    options: ReadOptions,
}

impl Reader {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_options(ReadOptions {
            dialect,
            ..ReadOptions::default()
        })
    }

    pub fn with_options(options: ReadOptions) -> Self {
        Self { options }
    }

    pub fn default_srid(mut self, srid: u32) -> Self {
        self.options.default_srid = srid;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Decode into a [`Geometry`] tree.
    pub fn read(&self, data: &[u8]) -> Result<Geometry> {
        self.read_with(data, &TreeFactory)
    }

    /// Decode, handing each finished node to `factory`.
    pub fn read_with<F: GeometryFactory>(&self, data: &[u8], factory: F) -> Result<F::Output> {
        let result = match self.options.dialect {
            Dialect::Standard => self.read_dialect(data, StandardHeader, factory),
            Dialect::Extended => self.read_dialect(data, ExtendedHeader, factory),
            Dialect::Iso => self.read_dialect(data, IsoHeader, factory),
        };
        if let Err(ref e) = result {
            debug!(
                "Failed to decode {:?} geometry from {} bytes: {}",
                self.options.dialect,
                data.len(),
                e
            );
        }
        result
    }

    /// Decode hex text, as PostGIS prints geometry columns. Case doesn't matter.
    pub fn read_hex(&self, text: &str) -> Result<Geometry> {
        let data = hex::decode(text.trim())?;
        self.read(&data)
    }

    fn read_dialect<H: HeaderDecoder, F: GeometryFactory>(
        &self,
        data: &[u8],
        header: H,
        factory: F,
    ) -> Result<F::Output> {
        let builder = GeometryBuilder::new(header, factory).max_depth(self.options.max_depth);
        let mut cursor = ByteCursor::new(data);
        let geom = builder.read_geometry(&mut cursor, self.options.default_srid)?;
        // The recursion alone can't notice extra bytes after a complete geometry
        if !cursor.at_end() {
            return Err(Error::TrailingData {
                remaining: cursor.remaining(),
            });
        }
        Ok(geom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coords::{Coord, CoordinateSystem};
    use crate::error::ConstructionError;
    use crate::kind::GeometryKind;

    // SELECT ST_AsEWKB('SRID=4326;POINT(1 2)'::geometry)
    const EWKB_POINT_4326: &str = "0101000020E6100000000000000000F03F0000000000000040";

    #[test]
    fn ewkb_point_with_srid() {
        let pt = Reader::default().read_hex(EWKB_POINT_4326).unwrap();
        assert_eq!(pt.kind(), GeometryKind::Point);
        assert_eq!(pt.as_point(), Some(&Coord::xy(1.0, 2.0)));
        assert_eq!(
            pt.coordinate_system(),
            CoordinateSystem::new(false, false, 4326)
        );
    }

    #[test]
    fn lowercase_hex() {
        let pt = Reader::default()
            .read_hex(&EWKB_POINT_4326.to_lowercase())
            .unwrap();
        assert_eq!(pt.srid(), 4326);
    }

    #[test]
    fn bad_hex() {
        let err = Reader::default().read_hex("01010zz0").unwrap_err();
        assert!(matches!(err, Error::BadHex(_)));
        let err = Reader::default().read_hex("010").unwrap_err();
        assert!(matches!(err, Error::BadHex(_)));
    }

    #[test]
    fn default_srid_applies_when_absent() {
        let mut data = vec![0x00];
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&5.0f64.to_be_bytes());
        data.extend_from_slice(&6.0f64.to_be_bytes());
        let pt = Reader::new(Dialect::Standard)
            .default_srid(4269)
            .read(&data)
            .unwrap();
        assert_eq!(pt.srid(), 4269);
        assert_eq!(pt.as_point(), Some(&Coord::xy(5.0, 6.0)));
    }

    #[test]
    fn trailing_byte() {
        let mut data = hex::decode(EWKB_POINT_4326).unwrap();
        data.push(0x00);
        let err = Reader::default().read(&data).unwrap_err();
        assert_eq!(err, Error::TrailingData { remaining: 1 });
    }

    #[test]
    fn empty_input() {
        let err = Reader::default().read(&[]).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    struct CountingFactory;

    impl GeometryFactory for CountingFactory {
        type Output = usize;

        fn make_point(&self, _: Option<Coord>, _: CoordinateSystem) -> Result<usize, ConstructionError> {
            Ok(1)
        }

        fn make_curve(
            &self,
            _: GeometryKind,
            coords: Vec<Coord>,
            _: CoordinateSystem,
        ) -> Result<usize, ConstructionError> {
            Ok(coords.len())
        }

        fn make_polygon(
            &self,
            _: GeometryKind,
            rings: Vec<Vec<Coord>>,
            _: CoordinateSystem,
        ) -> Result<usize, ConstructionError> {
            Ok(rings.iter().map(|r| r.len()).sum())
        }

        fn make_composite(
            &self,
            _: GeometryKind,
            children: Vec<usize>,
            _: CoordinateSystem,
        ) -> Result<usize, ConstructionError> {
            if children.is_empty() {
                return Err(ConstructionError::Other("empty composite".into()));
            }
            Ok(children.into_iter().sum())
        }
    }

    #[test]
    fn custom_factory() {
        // MULTIPOINT((1 2),(3 4)) in plain WKB
        let mut data = vec![0x01, 4, 0, 0, 0, 2, 0, 0, 0];
        for (x, y) in [(1.0f64, 2.0f64), (3.0, 4.0)].iter() {
            data.extend_from_slice(&[0x01, 1, 0, 0, 0]);
            data.extend_from_slice(&x.to_le_bytes());
            data.extend_from_slice(&y.to_le_bytes());
        }
        let reader = Reader::new(Dialect::Standard);
        assert_eq!(reader.read_with(&data, CountingFactory).unwrap(), 2);

        let empty = [0x01, 4, 0, 0, 0, 0, 0, 0, 0];
        let err = reader.read_with(&empty, &CountingFactory).unwrap_err();
        assert_eq!(
            err,
            Error::Construction(ConstructionError::Other("empty composite".into()))
        );
    }

    #[test]
    fn options_from_json() {
        let opts: ReadOptions = serde_json::from_str(r#"{"dialect": "Iso", "max_depth": 8}"#).unwrap();
        assert_eq!(opts.dialect, Dialect::Iso);
        assert_eq!(opts.max_depth, 8);
        assert_eq!(opts.default_srid, DEFAULT_SRID);
        let reader = Reader::with_options(opts.clone());
        assert_eq!(reader.options(), &opts);
    }
}
