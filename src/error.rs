use crate::kind::GeometryKind;
use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Input ended before a read could complete.
    Truncated {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// The type code, once any dialect flags are removed, isn't a known geometry type.
    UnsupportedGeometryType(u32),
    /// The byte order marker in front of a geometry was neither 0 nor 1.
    InvalidByteOrder(u8),
    /// Bytes remained after the top-level geometry was completely decoded.
    TrailingData { remaining: usize },
    /// The geometry factory refused the decoded structure.
    Construction(ConstructionError),
    /// Geometries were nested deeper than the reader allows.
    DepthLimit { max: usize },
    /// Hex-encoded input wasn't valid hex.
    BadHex(String),
    /// A geometry can't be written in the requested dialect.
    BadEncode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Truncated {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected {} more bytes, but only {} remain on step [{}]",
                expected, actual, step
            ),
            Error::UnsupportedGeometryType(code) => {
                write!(f, "Unsupported geometry type code {}", code)
            }
            Error::InvalidByteOrder(b) => {
                write!(f, "Invalid byte order marker 0x{:02x}, expected 0 or 1", b)
            }
            Error::TrailingData { remaining } => write!(
                f,
                "{} bytes left over after the geometry was fully decoded",
                remaining
            ),
            Error::Construction(ref err) => write!(f, "Failed to construct geometry: {}", err),
            Error::DepthLimit { max } => {
                write!(f, "Geometry nesting exceeds the maximum depth of {}", max)
            }
            Error::BadHex(ref err) => write!(f, "Invalid hex input: {}", err),
            Error::BadEncode(ref err) => write!(f, "Can't encode geometry: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Construction(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::convert::From<ConstructionError> for Error {
    fn from(e: ConstructionError) -> Self {
        Self::Construction(e)
    }
}

impl std::convert::From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Self::BadHex(e.to_string())
    }
}

/// Rejection raised by a [`GeometryFactory`][crate::GeometryFactory] when the decoded structure
/// can't form the requested geometry. The decoder passes these through untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstructionError {
    /// A composite held a child of a kind it doesn't allow.
    UnexpectedChild {
        parent: GeometryKind,
        child: GeometryKind,
    },
    /// A child's Z/M dimensionality didn't match its parent's.
    MixedDimensionality {
        parent: GeometryKind,
        child: GeometryKind,
    },
    /// A geometry had more rings than its kind permits.
    TooManyRings {
        kind: GeometryKind,
        max: usize,
        actual: usize,
    },
    /// A coordinate's Z/M ordinates didn't match the coordinate system it was given with.
    CoordinateDimensions {
        kind: GeometryKind,
        has_z: bool,
        has_m: bool,
    },
    /// Anything else a custom factory wants to refuse.
    Other(String),
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConstructionError::UnexpectedChild { parent, child } => {
                write!(f, "{} can't contain a {}", parent, child)
            }
            ConstructionError::MixedDimensionality { parent, child } => write!(
                f,
                "{} child has different Z/M dimensions than its parent {}",
                child, parent
            ),
            ConstructionError::TooManyRings { kind, max, actual } => write!(
                f,
                "{} allows at most {} rings, but got {}",
                kind, max, actual
            ),
            ConstructionError::CoordinateDimensions { kind, has_z, has_m } => write!(
                f,
                "{} coordinate doesn't match its coordinate system (z: {}, m: {})",
                kind, has_z, has_m
            ),
            ConstructionError::Other(ref err) => f.write_str(err),
        }
    }
}

impl std::error::Error for ConstructionError {}
