//! NDR pointer types
//!
//! NDR supports three pointer semantics:
//!
//! - Reference (`[ref]`): Non-null, data follows inline, no wire representation
//! - Unique (`[unique]`): Nullable, 4-byte referent ID, no aliasing
//! - Full (`[ptr]`): Nullable, 4-byte referent ID, aliasing allowed
//!
//! Only the embedded unique form needs support here. A non-null pointer is
//! written as a referent ID and its body is queued on the writer; a null
//! pointer is written as zero and queues nothing. `Option<T>` is the Rust
//! shape of a unique pointer.

use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

impl<'a> NdrWriter<'a> {
    /// Write a unique pointer.
    ///
    /// `body` encodes the pointee and runs on the next
    /// [`write_deferred`](NdrWriter::write_deferred).
    pub fn write_pointer<T, F>(&mut self, value: Option<&'a T>, body: F) -> Result<()>
    where
        T: ?Sized + 'a,
        F: FnOnce(&mut NdrWriter<'a>, &'a T) -> Result<()> + 'a,
    {
        let Some(value) = value else {
            return self.write_null();
        };
        let referent = self.next_referent_id();
        self.write_scalar(referent)?;
        self.deferred
            .push(Box::new(move |w: &mut NdrWriter<'a>| body(w, value)));
        Ok(())
    }

    /// Write the null referent.
    pub fn write_null(&mut self) -> Result<()> {
        self.write_scalar(0u32)
    }

    /// Write a unique pointer to a value with its own encoding.
    pub fn write_unique<T: NdrEncode + ?Sized + 'a>(&mut self, value: Option<&'a T>) -> Result<()> {
        self.write_pointer(value, |w, v| v.ndr_encode(w))
    }
}

impl<'a> NdrReader<'a> {
    /// Read a unique pointer into `slot`.
    ///
    /// A null referent leaves `None` in the slot. Otherwise the slot is filled
    /// with a default value and `body` decodes into it on the next
    /// [`read_deferred`](NdrReader::read_deferred).
    pub fn read_pointer<T, F>(&mut self, slot: &'a mut Option<T>, body: F) -> Result<()>
    where
        T: Default + 'a,
        F: FnOnce(&mut NdrReader<'a>, &'a mut T) -> Result<()> + 'a,
    {
        let referent: u32 = self.read_scalar()?;
        if referent == 0 {
            *slot = None;
            return Ok(());
        }
        let value = slot.insert(T::default());
        self.deferred
            .push(Box::new(move |r: &mut NdrReader<'a>| body(r, value)));
        Ok(())
    }

    /// Read a unique pointer whose null form maps to `T::default()`.
    pub fn read_referent<T, F>(&mut self, slot: &'a mut T, body: F) -> Result<()>
    where
        T: Default + 'a,
        F: FnOnce(&mut NdrReader<'a>, &'a mut T) -> Result<()> + 'a,
    {
        let referent: u32 = self.read_scalar()?;
        if referent == 0 {
            *slot = T::default();
            return Ok(());
        }
        self.deferred
            .push(Box::new(move |r: &mut NdrReader<'a>| body(r, slot)));
        Ok(())
    }

    /// Read a unique pointer to a value with its own decoding.
    pub fn read_unique<T: NdrDecode + Default + 'a>(&mut self, slot: &'a mut Option<T>) -> Result<()> {
        self.read_pointer(slot, |r, v| v.ndr_decode(r))
    }
}

impl<T: NdrEncode> NdrEncode for Option<T> {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_unique(self.as_ref())
    }
}

impl<T: NdrDecode + Default> NdrDecode for Option<T> {
    const MIN_WIRE_SIZE: usize = 4;

    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        r.read_unique(self)
    }
}
