//! Stub data writer
//!
//! The writer appends NDR-encoded data to a growable buffer. Pointer referents
//! are not written inline: [`NdrWriter::write_pointer`] emits the referent
//! marker and queues the body, and [`NdrWriter::write_deferred`] later emits
//! the queued bodies so that they trail the fixed-size part of the structure
//! that contained the pointers.

use crate::{NdrContext, NdrError, NdrScalar, Result, Uuid};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// Referent ID assigned to the first non-null pointer of a stub.
pub const FIRST_REFERENT_ID: u32 = 0x0002_0000;

pub(crate) type DeferredWrite<'a> = Box<dyn FnOnce(&mut NdrWriter<'a>) -> Result<()> + 'a>;

/// NDR stub writer
///
/// `'a` is the lifetime of the values whose pointer bodies are still queued.
pub struct NdrWriter<'a> {
    ctx: NdrContext,
    buf: BytesMut,
    pub(crate) deferred: Vec<DeferredWrite<'a>>,
    next_referent: u32,
}

impl<'a> NdrWriter<'a> {
    pub fn new(ctx: NdrContext) -> Self {
        Self::with_capacity(ctx, 256)
    }

    pub fn with_capacity(ctx: NdrContext, capacity: usize) -> Self {
        Self {
            ctx,
            buf: BytesMut::with_capacity(capacity),
            deferred: Vec::new(),
            next_referent: FIRST_REFERENT_ID,
        }
    }

    pub fn context(&self) -> &NdrContext {
        &self.ctx
    }

    /// Offset from the start of the stub; alignment is relative to it.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Number of pointer bodies waiting for [`write_deferred`](Self::write_deferred).
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Pad with zero bytes up to the given boundary.
    pub fn align(&mut self, alignment: usize) {
        let padding = NdrContext::align_padding(self.position(), alignment);
        self.buf.put_bytes(0, padding);
    }

    /// Write a naturally aligned scalar.
    pub fn write_scalar<T: NdrScalar>(&mut self, value: T) -> Result<()> {
        self.align(T::ALIGN);
        value.put(&self.ctx, &mut self.buf);
        Ok(())
    }

    /// Write raw bytes without alignment.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// Write a GUID (4-byte aligned).
    pub fn write_uuid(&mut self, uuid: &Uuid) -> Result<()> {
        self.write_scalar(uuid.time_low)?;
        self.write_scalar(uuid.time_mid)?;
        self.write_scalar(uuid.time_hi_and_version)?;
        self.write_scalar(uuid.clock_seq_hi_and_reserved)?;
        self.write_scalar(uuid.clock_seq_low)?;
        self.write_bytes(&uuid.node)
    }

    /// Write a conformant size (max_count) ahead of the elements it describes.
    pub fn write_size(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| NdrError::IntegerOverflow)?;
        self.write_scalar(count)
    }

    pub(crate) fn next_referent_id(&mut self) -> u32 {
        let id = self.next_referent;
        self.next_referent = self.next_referent.wrapping_add(4).max(FIRST_REFERENT_ID);
        id
    }

    /// Emit every queued pointer body.
    ///
    /// Bodies run in the order their pointers were written. Pointers written
    /// while a body runs are flushed right after that body, before the next
    /// sibling body.
    pub fn write_deferred(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.deferred);
        for body in pending {
            body(self)?;
            self.write_deferred()?;
        }
        Ok(())
    }

    /// Alias of [`write_deferred`](Self::write_deferred).
    pub fn flush_deferred(&mut self) -> Result<()> {
        self.write_deferred()
    }

    /// Flush remaining pointer bodies and return the encoded stub.
    pub fn finish(mut self) -> Result<Bytes> {
        self.write_deferred()?;
        Ok(std::mem::take(&mut self.buf).freeze())
    }
}

impl fmt::Debug for NdrWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdrWriter")
            .field("ctx", &self.ctx)
            .field("position", &self.buf.len())
            .field("pending", &self.deferred.len())
            .finish()
    }
}
