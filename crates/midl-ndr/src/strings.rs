//! NDR string types
//!
//! Wide strings (`[string] wchar_t*`) are conformant varying arrays of UTF-16
//! code units, terminator included:
//!
//! ```text
//! max_count: u32
//! offset: u32         # always 0
//! actual_count: u32
//! units[actual_count]
//! ```

use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

impl<'a> NdrWriter<'a> {
    /// Write a null-terminated wide string.
    pub fn write_wstring(&mut self, s: &str) -> Result<()> {
        let units: Vec<u16> = s.encode_utf16().chain(std::iter::once(0)).collect();
        self.write_size(units.len())?;
        self.write_scalar(0u32)?;
        self.write_size(units.len())?;
        for unit in units {
            self.write_scalar(unit)?;
        }
        Ok(())
    }
}

impl<'a> NdrReader<'a> {
    /// Read a wide string. Decoding stops at the first terminator.
    pub fn read_wstring(&mut self) -> Result<String> {
        let max_count: u32 = self.read_scalar()?;
        let offset: u32 = self.read_scalar()?;
        let actual_count: u32 = self.read_scalar()?;

        if offset != 0 {
            return Err(NdrError::InvalidString(format!("non-zero offset {}", offset)));
        }
        if actual_count > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count,
                actual_count,
            });
        }

        let count = usize::try_from(actual_count).map_err(|_| NdrError::IntegerOverflow)?;
        let byte_count = count.checked_mul(2).ok_or(NdrError::IntegerOverflow)?;
        if byte_count > self.remaining() {
            return Err(NdrError::SizeExceedsInput {
                count,
                remaining: self.remaining(),
            });
        }

        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            units.push(self.read_scalar::<u16>()?);
        }
        if let Some(end) = units.iter().position(|&u| u == 0) {
            units.truncate(end);
        }

        let s = char::decode_utf16(units).collect::<std::result::Result<String, _>>()?;
        Ok(s)
    }
}

impl NdrEncode for String {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_wstring(self)
    }
}

impl NdrDecode for String {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        *self = r.read_wstring()?;
        Ok(())
    }
}
