use crate::error::{Error, Result};
use byteorder::ByteOrder as _;
use byteorder::{BigEndian, LittleEndian};
use serde::{Deserialize, Serialize};

/// Byte order of a single geometry node. The marker is repeated in front of every node, so a
/// child may use a different order than its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    pub fn from_u8(n: u8) -> Option<ByteOrder> {
        match n {
            0 => Some(ByteOrder::BigEndian),
            1 => Some(ByteOrder::LittleEndian),
            _ => None,
        }
    }

    pub fn into_u8(self) -> u8 {
        match self {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::LittleEndian
    }
}

/// Read position over an encoded geometry.
///
/// Every read checks that enough bytes remain before touching the data, so a failed read leaves
/// the cursor exactly where it was.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        Self {
            data,
            pos: 0,
            order: ByteOrder::LittleEndian,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Fail unless at least `len` bytes remain. Doesn't advance.
    pub fn require(&self, len: usize, step: &'static str) -> Result<()> {
        if len > self.remaining() {
            return Err(Error::Truncated {
                step,
                actual: self.remaining(),
                expected: len,
            });
        }
        Ok(())
    }

    fn take(&mut self, len: usize, step: &'static str) -> Result<&'a [u8]> {
        self.require(len, step)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read the byte order marker and switch to that order for all following reads.
    pub fn read_byte_order(&mut self) -> Result<ByteOrder> {
        self.require(1, "read byte order")?;
        let marker = self.data[self.pos];
        let order = ByteOrder::from_u8(marker).ok_or(Error::InvalidByteOrder(marker))?;
        self.pos += 1;
        self.order = order;
        Ok(order)
    }

    pub fn read_u32(&mut self, step: &'static str) -> Result<u32> {
        let bytes = self.take(4, step)?;
        Ok(match self.order {
            ByteOrder::BigEndian => BigEndian::read_u32(bytes),
            ByteOrder::LittleEndian => LittleEndian::read_u32(bytes),
        })
    }

    pub fn read_u64(&mut self, step: &'static str) -> Result<u64> {
        let bytes = self.take(8, step)?;
        Ok(match self.order {
            ByteOrder::BigEndian => BigEndian::read_u64(bytes),
            ByteOrder::LittleEndian => LittleEndian::read_u64(bytes),
        })
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.take(8, "read f64")?;
        Ok(match self.order {
            ByteOrder::BigEndian => BigEndian::read_f64(bytes),
            ByteOrder::LittleEndian => LittleEndian::read_f64(bytes),
        })
    }

    /// Read `n` doubles in one go. The whole run is length-checked up front, so an oversized `n`
    /// fails before anything is allocated.
    pub fn read_f64s(&mut self, n: usize) -> Result<Vec<f64>> {
        let len = n.checked_mul(8).ok_or(Error::Truncated {
            step: "read f64 run",
            actual: self.remaining(),
            expected: usize::MAX,
        })?;
        let bytes = self.take(len, "read f64 run")?;
        let mut out = vec![0f64; n];
        match self.order {
            ByteOrder::BigEndian => BigEndian::read_f64_into(bytes, &mut out),
            ByteOrder::LittleEndian => LittleEndian::read_f64_into(bytes, &mut out),
        }
        Ok(out)
    }
}
