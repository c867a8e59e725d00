//! STDOBJREF structure (MS-DCOM 2.2.18.1) and the IRemUnknown records
//! built on it (REMQIRESULT, REMINTERFACEREF).

use super::identifiers::{Ipid, Oid, Oxid};
use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

/// STDOBJREF flags (SORF_*)
pub mod flags {
    /// Standard reference
    pub const SORF_NULL: u32 = 0x00000000;
    /// Reserved for OXID resolution
    pub const SORF_OXRES1: u32 = 0x00000001;
    /// The IPID is part of a machine-local interface
    pub const SORF_NOPING: u32 = 0x00001000;
}

/// Standard Object Reference (40 bytes)
///
/// Names one interface on one object inside one object exporter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StdObjRef {
    /// SORF_* flags
    pub flags: u32,
    /// Number of public references held
    pub public_refs: u32,
    /// Object Exporter ID
    pub oxid: Oxid,
    /// Object ID within the exporter
    pub oid: Oid,
    /// Interface Pointer ID
    pub ipid: Ipid,
}

impl StdObjRef {
    /// Size in bytes (4 + 4 + 8 + 8 + 16 = 40)
    pub const SIZE: usize = 40;

    pub fn new(oxid: Oxid, oid: Oid, ipid: Ipid, public_refs: u32) -> Self {
        Self {
            flags: flags::SORF_NULL,
            public_refs,
            oxid,
            oid,
            ipid,
        }
    }

    /// Create a STDOBJREF that doesn't require pinging
    pub fn new_noping(oxid: Oxid, oid: Oid, ipid: Ipid, public_refs: u32) -> Self {
        Self {
            flags: flags::SORF_NOPING,
            ..Self::new(oxid, oid, ipid, public_refs)
        }
    }

    /// Check if this reference requires pinging for GC
    pub fn requires_pinging(&self) -> bool {
        (self.flags & flags::SORF_NOPING) == 0
    }
}

impl NdrEncode for StdObjRef {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.align(8);
        self.flags.ndr_encode(w)?;
        self.public_refs.ndr_encode(w)?;
        self.oxid.ndr_encode(w)?;
        self.oid.ndr_encode(w)?;
        self.ipid.ndr_encode(w)
    }
}

impl NdrDecode for StdObjRef {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.align(8)?;
        self.flags.ndr_decode(r)?;
        self.public_refs.ndr_decode(r)?;
        self.oxid.ndr_decode(r)?;
        self.oid.ndr_decode(r)?;
        self.ipid.ndr_decode(r)
    }
}

/// REMQIRESULT structure (MS-DCOM 2.2.22)
///
/// The reference is only meaningful when `hresult` is zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemQiResult {
    pub hresult: i32,
    pub std: StdObjRef,
}

impl RemQiResult {
    pub fn success(std: StdObjRef) -> Self {
        Self { hresult: 0, std }
    }

    pub fn failure(hresult: i32) -> Self {
        Self {
            hresult,
            std: StdObjRef::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.hresult >= 0
    }
}

impl NdrEncode for RemQiResult {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.align(8);
        self.hresult.ndr_encode(w)?;
        self.std.ndr_encode(w)
    }
}

impl NdrDecode for RemQiResult {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.align(8)?;
        self.hresult.ndr_decode(r)?;
        self.std.ndr_decode(r)
    }
}

/// REMINTERFACEREF structure (MS-DCOM 2.2.23)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemInterfaceRef {
    /// IPID of the interface
    pub ipid: Ipid,
    /// Number of public references to add/release
    pub public_refs: u32,
    /// Number of private references to add/release
    pub private_refs: u32,
}

impl RemInterfaceRef {
    pub fn new(ipid: Ipid, public_refs: u32, private_refs: u32) -> Self {
        Self {
            ipid,
            public_refs,
            private_refs,
        }
    }
}

impl NdrEncode for RemInterfaceRef {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.ipid.ndr_encode(w)?;
        self.public_refs.ndr_encode(w)?;
        self.private_refs.ndr_encode(w)
    }
}

impl NdrDecode for RemInterfaceRef {
    const MIN_WIRE_SIZE: usize = 24;

    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.ipid.ndr_decode(r)?;
        self.public_refs.ndr_decode(r)?;
        self.private_refs.ndr_decode(r)
    }
}
