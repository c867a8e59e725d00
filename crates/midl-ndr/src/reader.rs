//! Stub data reader
//!
//! Mirror image of [`NdrWriter`](crate::NdrWriter). Every read checks the
//! remaining input first, and conformant counts are validated against the
//! remaining input before anything is allocated.

use crate::{NdrContext, NdrError, NdrScalar, Result, Uuid};
use bytes::{Buf, Bytes};
use std::fmt;

pub(crate) type DeferredRead<'a> = Box<dyn FnOnce(&mut NdrReader<'a>) -> Result<()> + 'a>;

/// NDR stub reader
///
/// `'a` is the lifetime of the destination fields of queued pointer bodies.
pub struct NdrReader<'a> {
    ctx: NdrContext,
    buf: Bytes,
    position: usize,
    pub(crate) deferred: Vec<DeferredRead<'a>>,
}

impl<'a> NdrReader<'a> {
    pub fn new(data: Bytes, ctx: NdrContext) -> Self {
        Self {
            ctx,
            buf: data,
            position: 0,
            deferred: Vec::new(),
        }
    }

    pub fn context(&self) -> &NdrContext {
        &self.ctx
    }

    /// Offset from the start of the stub.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(NdrError::BufferUnderflow {
                needed,
                have: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Skip padding up to the given boundary.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = NdrContext::align_padding(self.position, alignment);
        self.ensure(padding)?;
        self.buf.advance(padding);
        self.position += padding;
        Ok(())
    }

    /// Read a naturally aligned scalar.
    pub fn read_scalar<T: NdrScalar>(&mut self) -> Result<T> {
        self.align(T::ALIGN)?;
        self.ensure(T::SIZE)?;
        let value = T::get(&self.ctx, &mut self.buf);
        self.position += T::SIZE;
        Ok(value)
    }

    /// Read raw bytes without alignment.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        self.position += len;
        Ok(self.buf.split_to(len))
    }

    /// Read a GUID (4-byte aligned).
    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let time_low = self.read_scalar()?;
        let time_mid = self.read_scalar()?;
        let time_hi_and_version = self.read_scalar()?;
        let clock_seq_hi_and_reserved = self.read_scalar()?;
        let clock_seq_low = self.read_scalar()?;
        let mut node = [0u8; 6];
        node.copy_from_slice(&self.read_bytes(6)?);
        Ok(Uuid {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq_hi_and_reserved,
            clock_seq_low,
            node,
        })
    }

    /// Read a conformant size.
    ///
    /// Fails with [`NdrError::SizeExceedsInput`] when the count is larger than
    /// the number of bytes left, since every element occupies at least one.
    pub fn read_size(&mut self) -> Result<usize> {
        self.read_count(1)
    }

    /// Read a conformant size for elements of at least `elem_size` bytes.
    pub fn read_count(&mut self, elem_size: usize) -> Result<usize> {
        let count = self.read_scalar::<u32>()?;
        let count = usize::try_from(count).map_err(|_| NdrError::IntegerOverflow)?;
        let fits = count
            .checked_mul(elem_size.max(1))
            .is_some_and(|needed| needed <= self.remaining());
        if !fits {
            return Err(NdrError::SizeExceedsInput {
                count,
                remaining: self.remaining(),
            });
        }
        Ok(count)
    }

    pub fn read_deferred(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.deferred);
        for body in pending {
            body(self)?;
            self.read_deferred()?;
        }
        Ok(())
    }
}

impl fmt::Debug for NdrReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdrReader")
            .field("ctx", &self.ctx)
            .field("position", &self.position)
            .field("remaining", &self.buf.len())
            .field("pending", &self.deferred.len())
            .finish()
    }
}
