//! BSTR (MS-OAUT 2.2.23.2)
//!
//! On the wire a BSTR is a unique pointer to a FLAGGED_WORD_BLOB:
//! conformance, byte count, character count, then the UTF-16 characters
//! without a terminator. An empty string is sent as a null pointer.

use midl_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};
use std::fmt;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bstr(pub String);

impl Bstr {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn encode_blob(&self, w: &mut NdrWriter<'_>) -> midl_ndr::Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().collect();
        let chars = u32::try_from(units.len()).map_err(|_| NdrError::IntegerOverflow)?;
        let bytes = chars.checked_mul(2).ok_or(NdrError::IntegerOverflow)?;
        w.write_size(units.len())?;
        w.write_scalar(bytes)?;
        w.write_scalar(chars)?;
        for unit in units {
            w.write_scalar(unit)?;
        }
        Ok(())
    }

    fn decode_blob(&mut self, r: &mut NdrReader<'_>) -> midl_ndr::Result<()> {
        let max = r.read_size()?;
        let _bytes: u32 = r.read_scalar()?;
        let chars: u32 = r.read_scalar()?;
        if usize::try_from(chars).ok() != Some(max) {
            return Err(NdrError::ConformanceMismatch {
                max_count: max as u32,
                actual_count: chars,
            });
        }
        let units = (0..max)
            .map(|_| r.read_scalar::<u16>())
            .collect::<midl_ndr::Result<Vec<u16>>>()?;
        self.0 = char::decode_utf16(units).collect::<Result<String, _>>()?;
        Ok(())
    }
}

impl From<&str> for Bstr {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Bstr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for Bstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bstr({:?})", self.0)
    }
}

impl fmt::Display for Bstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl NdrEncode for Bstr {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let value = (!self.is_empty()).then_some(self);
        w.write_pointer(value, |w, s| s.encode_blob(w))
    }
}

impl NdrDecode for Bstr {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_referent(self, |r, s| s.decode_blob(r))
    }
}
