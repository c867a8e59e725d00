//! NDR decoding trait

use crate::{NdrContext, NdrReader, Result};
use bytes::Bytes;

/// Trait for types that can be decoded from NDR format
///
/// Decoding fills an existing value in place so that deferred pointer bodies
/// can write into the fields they belong to.
pub trait NdrDecode {
    /// Fewest bytes one value occupies on the wire. Bounds conformant counts.
    const MIN_WIRE_SIZE: usize = 1;

    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()>;
}

/// Decode a top-level value in place, reading its pointer bodies.
///
/// Returns the number of bytes consumed.
pub fn decode_into<T: NdrDecode + ?Sized>(value: &mut T, data: Bytes, ctx: NdrContext) -> Result<usize> {
    let mut r = NdrReader::new(data, ctx);
    value.ndr_decode(&mut r)?;
    r.read_deferred()?;
    Ok(r.position())
}

/// Decode a top-level value.
pub fn from_bytes<T: NdrDecode + Default>(data: Bytes, ctx: NdrContext) -> Result<T> {
    let mut value = T::default();
    decode_into(&mut value, data, ctx)?;
    Ok(value)
}
