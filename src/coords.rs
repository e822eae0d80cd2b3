use serde::{Deserialize, Serialize};

/// The coordinate dimensions and spatial reference shared by a geometry and, unless overridden,
/// all of its descendants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub has_z: bool,
    pub has_m: bool,
    pub srid: u32,
}

impl CoordinateSystem {
    pub fn new(has_z: bool, has_m: bool, srid: u32) -> Self {
        Self { has_z, has_m, srid }
    }

    pub fn xy(srid: u32) -> Self {
        Self::new(false, false, srid)
    }

    /// Number of ordinates in each coordinate tuple: 2, 3, or 4.
    pub fn dimension(&self) -> usize {
        2 + self.has_z as usize + self.has_m as usize
    }

    /// True if both systems carry the same Z/M ordinates, whatever their SRIDs.
    pub fn same_dimensions(&self, other: &CoordinateSystem) -> bool {
        self.has_z == other.has_z && self.has_m == other.has_m
    }

    pub fn with_srid(self, srid: u32) -> Self {
        Self { srid, ..self }
    }
}

/// A single coordinate tuple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coord {
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    pub fn xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: Some(m),
        }
    }

    pub fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: Some(m),
        }
    }

    /// Build a coordinate from ordinates laid out as x, y, [z], [m]. The slice must hold exactly
    /// `cs.dimension()` values.
    pub(crate) fn from_ordinates(ords: &[f64], cs: &CoordinateSystem) -> Self {
        debug_assert_eq!(ords.len(), cs.dimension());
        let mut rest = ords[2..].iter().copied();
        let z = if cs.has_z { rest.next() } else { None };
        let m = if cs.has_m { rest.next() } else { None };
        Self {
            x: ords[0],
            y: ords[1],
            z,
            m,
        }
    }

    /// Iterate over the ordinates this coordinate should carry in the given system. Missing Z/M
    /// values come out as NaN.
    pub(crate) fn ordinates(&self, cs: &CoordinateSystem) -> impl Iterator<Item = f64> {
        let z = if cs.has_z {
            Some(self.z.unwrap_or(f64::NAN))
        } else {
            None
        };
        let m = if cs.has_m {
            Some(self.m.unwrap_or(f64::NAN))
        } else {
            None
        };
        [self.x, self.y].into_iter().chain(z).chain(m)
    }
}
