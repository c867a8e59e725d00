//! NDR array types
//!
//! NDR supports several array types:
//!
//! - Fixed arrays: size known at compile time
//! - Conformant arrays: size determined at runtime, transmitted as prefix
//! - Varying arrays: subset of elements transmitted
//! - Conformant varying arrays: both conformant and varying
//!
//! Conformant arrays map to `Vec<T>` and fixed arrays to `[T; N]`. Varying
//! arrays only appear as strings, see [`strings`](crate::strings).

use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};
use bytes::Bytes;

impl<'a> NdrWriter<'a> {
    /// Write a conformant array: max_count, then each element.
    ///
    /// `count` is the value of the array's `size_is` expression and must equal
    /// the number of items.
    pub fn write_conformant<T, F>(&mut self, count: usize, items: &'a [T], mut elem: F) -> Result<()>
    where
        F: FnMut(&mut NdrWriter<'a>, &'a T) -> Result<()>,
    {
        if count != items.len() {
            return Err(NdrError::ArraySizeMismatch {
                expected: count,
                got: items.len(),
            });
        }
        self.write_size(count)?;
        for item in items {
            elem(self, item)?;
        }
        Ok(())
    }

    /// Write a conformant byte array.
    pub fn write_conformant_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_size(data.len())?;
        self.write_bytes(data)
    }
}

impl<'a> NdrReader<'a> {
    /// Read a conformant array into `out`, replacing its contents, and
    /// return its count.
    ///
    /// Every element takes at least `elem_size` bytes. The count is checked
    /// against the remaining input before `out` grows.
    pub fn read_conformant<T, F>(&mut self, out: &'a mut Vec<T>, elem_size: usize, mut elem: F) -> Result<usize>
    where
        T: Default,
        F: FnMut(&mut NdrReader<'a>, &'a mut T) -> Result<()>,
    {
        let count = self.read_count(elem_size)?;
        out.clear();
        out.resize_with(count, T::default);
        for item in out.iter_mut() {
            elem(self, item)?;
        }
        Ok(count)
    }

    /// Read a conformant array of decodable elements and return its count.
    pub fn read_vec<T: NdrDecode + Default>(&mut self, out: &'a mut Vec<T>) -> Result<usize> {
        self.read_conformant(out, T::MIN_WIRE_SIZE, |r, v| v.ndr_decode(r))
    }

    /// Read a conformant byte array.
    pub fn read_conformant_bytes(&mut self) -> Result<Bytes> {
        let count = self.read_size()?;
        self.read_bytes(count)
    }
}

impl<T: NdrEncode> NdrEncode for Vec<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_conformant(self.len(), self, |w, v| v.ndr_encode(w))
    }
}

impl<T: NdrDecode + Default> NdrDecode for Vec<T> {
    const MIN_WIRE_SIZE: usize = 4;

    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        r.read_vec(self)?;
        Ok(())
    }
}

impl<T: NdrEncode, const N: usize> NdrEncode for [T; N] {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        for item in self {
            item.ndr_encode(w)?;
        }
        Ok(())
    }
}

impl<T: NdrDecode, const N: usize> NdrDecode for [T; N] {
    const MIN_WIRE_SIZE: usize = T::MIN_WIRE_SIZE * N;

    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        for item in self.iter_mut() {
            item.ndr_decode(r)?;
        }
        Ok(())
    }
}
