//! NDR encoding trait

use crate::{NdrContext, NdrWriter, Result};
use bytes::Bytes;

/// Trait for types that can be encoded to NDR format
pub trait NdrEncode {
    /// Encode this value at the writer's current position.
    ///
    /// Embedded pointer bodies are queued on the writer, not written here;
    /// whoever owns the enclosing structure decides when to flush them.
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()>;
}

/// Encode a single top-level value, flushing its pointer bodies.
pub fn to_bytes<T: NdrEncode + ?Sized>(value: &T, ctx: NdrContext) -> Result<Bytes> {
    let mut w = NdrWriter::new(ctx);
    value.ndr_encode(&mut w)?;
    w.finish()
}
