//! MInterfacePointer (MS-DCOM 2.2.14)
//!
//! A marshaled interface pointer: a conformant byte array holding an OBJREF.
//! The payload is carried opaquely.

use bytes::Bytes;
use midl_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfacePointer {
    /// OBJREF bytes
    pub data: Bytes,
}

impl InterfacePointer {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl NdrEncode for InterfacePointer {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let count = u32::try_from(self.data.len()).map_err(|_| NdrError::IntegerOverflow)?;
        w.write_size(self.data.len())?;
        w.write_scalar(count)?;
        w.write_bytes(&self.data)
    }
}

impl NdrDecode for InterfacePointer {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let max = r.read_size()?;
        let count: u32 = r.read_scalar()?;
        if usize::try_from(count).ok() != Some(max) {
            return Err(NdrError::ConformanceMismatch {
                max_count: max as u32,
                actual_count: count,
            });
        }
        self.data = r.read_bytes(max)?;
        Ok(())
    }
}
