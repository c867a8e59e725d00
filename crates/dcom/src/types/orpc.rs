//! ORPC (Object RPC) header types (MS-DCOM 2.2.13, 2.2.14)
//!
//! ORPCTHIS is the first parameter of every ORPC request and ORPCTHAT the
//! first parameter of every ORPC response. Both may carry an optional array
//! of extensions, each identified by a GUID.

use super::identifiers::{generate_uuid, Cid};
use dcerpc::Uuid;
use midl_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// COM version structure (MS-DCOM 2.2.11)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ComVersion {
    /// Major version number
    pub major: u16,
    /// Minor version number
    pub minor: u16,
}

impl ComVersion {
    /// DCOM version 5.1 (Windows 2000)
    pub const DCOM_5_1: Self = Self { major: 5, minor: 1 };
    /// DCOM version 5.4 (Windows XP/2003)
    pub const DCOM_5_4: Self = Self { major: 5, minor: 4 };
    /// DCOM version 5.6 (Windows Vista)
    pub const DCOM_5_6: Self = Self { major: 5, minor: 6 };
    /// DCOM version 5.7 (Windows 7)
    pub const DCOM_5_7: Self = Self { major: 5, minor: 7 };

    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl NdrEncode for ComVersion {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.major.ndr_encode(w)?;
        self.minor.ndr_encode(w)
    }
}

impl NdrDecode for ComVersion {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.major.ndr_decode(r)?;
        self.minor.ndr_decode(r)
    }
}

/// ORPC extension entry (ORPC_EXTENT)
///
/// Conformant structure: the data is padded to a multiple of 8 on the wire
/// and `size` gives the meaningful length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtent {
    /// Extension UUID identifier
    pub id: Uuid,
    /// Extension data
    pub data: Vec<u8>,
}

impl OrpcExtent {
    pub fn new(id: Uuid, data: impl Into<Vec<u8>>) -> Self {
        Self { id, data: data.into() }
    }
}

impl NdrEncode for OrpcExtent {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let size = u32::try_from(self.data.len()).map_err(|_| NdrError::IntegerOverflow)?;
        let padded = (self.data.len() + 7) & !7;
        w.write_size(padded)?;
        self.id.ndr_encode(w)?;
        w.write_scalar(size)?;
        w.write_bytes(&self.data)?;
        w.write_bytes(&[0u8; 7][..padded - self.data.len()])
    }
}

impl NdrDecode for OrpcExtent {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let padded = r.read_size()?;
        self.id.ndr_decode(r)?;
        let size: u32 = r.read_scalar()?;
        let data = r.read_bytes(padded)?;
        let len = usize::try_from(size).map_err(|_| NdrError::IntegerOverflow)?;
        if len > padded {
            return Err(NdrError::ConformanceMismatch {
                max_count: padded as u32,
                actual_count: size,
            });
        }
        self.data = data[..len].to_vec();
        Ok(())
    }
}

/// ORPC extent array (ORPC_EXTENT_ARRAY)
///
/// The wire array holds an even number of unique pointers; entries past the
/// populated ones are null and decode as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtentArray {
    /// Reserved
    pub reserved: u32,
    /// Extent slots as transmitted
    pub extents: Vec<Option<OrpcExtent>>,
}

impl OrpcExtentArray {
    pub fn new(extents: impl IntoIterator<Item = OrpcExtent>) -> Self {
        Self {
            reserved: 0,
            extents: extents.into_iter().map(Some).collect(),
        }
    }

    /// Populated extents.
    pub fn iter(&self) -> impl Iterator<Item = &OrpcExtent> {
        self.extents.iter().flatten()
    }

    pub fn find(&self, id: &Uuid) -> Option<&OrpcExtent> {
        self.iter().find(|extent| extent.id == *id)
    }
}

impl NdrEncode for OrpcExtentArray {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let size = self.iter().count();
        w.write_size(size)?;
        self.reserved.ndr_encode(w)?;
        if self.extents.is_empty() {
            return w.write_null();
        }
        w.write_pointer(Some(&self.extents), |w, extents| {
            let slots = (extents.len() + 1) & !1;
            w.write_size(slots)?;
            for extent in extents {
                extent.ndr_encode(w)?;
            }
            for _ in extents.len()..slots {
                w.write_null()?;
            }
            Ok(())
        })
    }
}

impl NdrDecode for OrpcExtentArray {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        let _size: u32 = r.read_scalar()?;
        self.reserved.ndr_decode(r)?;
        r.read_referent(&mut self.extents, |r, extents| {
            r.read_vec(extents)?;
            Ok(())
        })
    }
}

/// ORPCTHIS structure (MS-DCOM 2.2.13)
///
/// Sent with every ORPC request from client to server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrpcThis {
    /// COM version
    pub version: ComVersion,
    /// Flags (must be 0)
    pub flags: u32,
    /// Reserved (must be 0)
    pub reserved1: u32,
    /// Causality ID (UUID identifying the call chain)
    pub causality_id: Cid,
    /// Optional extension array
    pub extensions: Option<OrpcExtentArray>,
}

impl OrpcThis {
    /// Create a new ORPCTHIS with a fresh causality ID
    pub fn new() -> Self {
        Self::with_causality(generate_uuid())
    }

    pub fn with_causality(causality_id: Cid) -> Self {
        Self {
            version: ComVersion::DCOM_5_7,
            flags: 0,
            reserved1: 0,
            causality_id,
            extensions: None,
        }
    }
}

impl Default for OrpcThis {
    fn default() -> Self {
        Self::with_causality(Uuid::NIL)
    }
}

impl NdrEncode for OrpcThis {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.version.ndr_encode(w)?;
        self.flags.ndr_encode(w)?;
        self.reserved1.ndr_encode(w)?;
        self.causality_id.ndr_encode(w)?;
        self.extensions.ndr_encode(w)
    }
}

impl NdrDecode for OrpcThis {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.version.ndr_decode(r)?;
        self.flags.ndr_decode(r)?;
        self.reserved1.ndr_decode(r)?;
        self.causality_id.ndr_decode(r)?;
        self.extensions.ndr_decode(r)
    }
}

/// ORPCTHAT structure (MS-DCOM 2.2.14)
///
/// Sent with every ORPC response from server to client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcThat {
    /// Flags (must be 0)
    pub flags: u32,
    /// Optional extension array
    pub extensions: Option<OrpcExtentArray>,
}

impl OrpcThat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NdrEncode for OrpcThat {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.flags.ndr_encode(w)?;
        self.extensions.ndr_encode(w)
    }
}

impl NdrDecode for OrpcThat {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.flags.ndr_decode(r)?;
        self.extensions.ndr_decode(r)
    }
}

/// Well-known extension UUIDs
pub mod extent_ids {
    use dcerpc::Uuid;

    /// Error info extension
    pub const ERROR_INFO: Uuid = Uuid::from_fields(0x0000_01ff, 0, 0, [0xc0, 0, 0, 0, 0, 0, 0, 0x46]);
}
