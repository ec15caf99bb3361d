use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::errors::ClientError;
use crate::engine::types::{Cell, Value};

/// Presence bitmap over a run of cells: bit `i` is set iff cell `i` holds a
/// value. Bits are packed LSB-first, so cell `i` lives in byte `i / 8` under
/// `1 << (i % 8)`. Padding bits past `len` are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MaskRepr", into = "MaskRepr")]
pub struct NullMask {
    len: usize,
    bits: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct MaskRepr {
    len: u32,
    bits: Vec<u8>,
}

impl NullMask {
    /// A mask of `len` cells, all absent.
    pub fn empty(len: usize) -> Self {
        Self {
            len,
            bits: vec![0; byte_len(len)],
        }
    }

    /// Splits owned cells into a mask and the dense run of present values.
    pub fn split(cells: Vec<Cell>) -> (Self, Vec<Value>) {
        let mut mask = Self::empty(cells.len());
        let mut dense = Vec::with_capacity(cells.len());
        for (i, cell) in cells.into_iter().enumerate() {
            if let Some(value) = cell {
                mask.set(i);
                dense.push(value);
            }
        }
        (mask, dense)
    }

    pub fn from_cells(cells: &[Cell]) -> (Self, Vec<Value>) {
        Self::split(cells.to_vec())
    }

    /// Rebuilds a mask from its packed bytes, rejecting a byte count that
    /// disagrees with `len` or set bits past the end.
    pub fn from_bytes(bits: Vec<u8>, len: usize) -> Result<Self, ClientError> {
        if bits.len() != byte_len(len) {
            return Err(ClientError::MalformedResponse(format!(
                "bitmap of {} cells needs {} bytes, got {}",
                len,
                byte_len(len),
                bits.len()
            )));
        }
        let tail = len % 8;
        if tail != 0 {
            if let Some(last) = bits.last() {
                if last >> tail != 0 {
                    return Err(ClientError::MalformedResponse(
                        "bitmap has bits set past its length".to_string(),
                    ));
                }
            }
        }
        Ok(Self { len, bits })
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        if index < self.len {
            self.bits[index / 8] |= 1 << (index % 8);
        }
    }

    #[inline]
    pub fn is_present(&self, index: usize) -> bool {
        index < self.len && self.bits[index / 8] & (1 << (index % 8)) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_present(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Inverse of `split`. The dense run must hold exactly one value per set
    /// bit; anything else is a corrupt batch.
    pub fn apply(&self, dense: Vec<Value>) -> Result<Vec<Cell>, ClientError> {
        let present = self.count_present();
        if present != dense.len() {
            return Err(ClientError::MalformedResponse(format!(
                "bitmap marks {} present cells but {} values were supplied",
                present,
                dense.len()
            )));
        }
        let mut values = dense.into_iter();
        let cells = (0..self.len)
            .map(|i| {
                if self.is_present(i) {
                    values.next()
                } else {
                    None
                }
            })
            .collect();
        Ok(cells)
    }
}

#[inline]
fn byte_len(len: usize) -> usize {
    len.div_ceil(8)
}

impl fmt::Display for NullMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.is_present(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl TryFrom<MaskRepr> for NullMask {
    type Error = ClientError;

    fn try_from(repr: MaskRepr) -> Result<Self, Self::Error> {
        NullMask::from_bytes(repr.bits, repr.len as usize)
    }
}

impl From<NullMask> for MaskRepr {
    fn from(mask: NullMask) -> Self {
        MaskRepr {
            len: mask.len as u32,
            bits: mask.bits,
        }
    }
}
