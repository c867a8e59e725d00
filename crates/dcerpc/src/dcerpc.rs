//! DCE RPC identity types
//!
//! Abstract syntax identifiers name an interface on a channel, fault status
//! codes are what a channel reports when a call cannot complete at the RPC
//! level (as opposed to a status returned by the operation itself).

use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};
pub use midl_ndr::Uuid;
use std::fmt;

/// NDR Transfer Syntax UUID
pub const NDR_SYNTAX_UUID: &str = "8a885d04-1ceb-11c9-9fe8-08002b104860";
pub const NDR_SYNTAX_VERSION: u32 = 2;

/// Syntax ID - interface UUID with version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SyntaxId {
    pub uuid: Uuid,
    pub version: u32, // major in lower 16 bits, minor in upper 16 bits
}

impl SyntaxId {
    pub const fn new(uuid: Uuid, major: u16, minor: u16) -> Self {
        Self {
            uuid,
            version: (major as u32) | ((minor as u32) << 16),
        }
    }

    pub fn major_version(&self) -> u16 {
        self.version as u16
    }

    pub fn minor_version(&self) -> u16 {
        (self.version >> 16) as u16
    }

    /// NDR 2.0 transfer syntax
    pub fn ndr() -> Self {
        Self {
            uuid: Uuid::parse(NDR_SYNTAX_UUID).unwrap_or_default(),
            version: NDR_SYNTAX_VERSION,
        }
    }
}

impl fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}.{}", self.uuid, self.major_version(), self.minor_version())
    }
}

impl NdrEncode for SyntaxId {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.uuid.ndr_encode(w)?;
        self.version.ndr_encode(w)
    }
}

impl NdrDecode for SyntaxId {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.uuid.ndr_decode(r)?;
        self.version.ndr_decode(r)
    }
}

/// Fault status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FaultStatus {
    /// No error
    None = 0,
    /// Operation not implemented
    OpRngError = 0x1c010002,
    /// Unknown interface
    UnkIf = 0x1c010003,
    /// Protocol version not supported
    NdrVersion = 0x1c000008,
    /// General RPC error
    RpcError = 0x1c000000,
    /// Access denied
    AccessDenied = 0x00000005,
    /// Stub could not unmarshal the call
    BadStubData = 0x000006f7,
    /// Call was cancelled
    Cancel = 0x1c00000d,
    /// Context mismatch
    ContextMismatch = 0x1c00001a,
}

impl FaultStatus {
    pub fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::None,
            0x1c010002 => Self::OpRngError,
            0x1c010003 => Self::UnkIf,
            0x1c000008 => Self::NdrVersion,
            0x1c000000 => Self::RpcError,
            0x00000005 => Self::AccessDenied,
            0x000006f7 => Self::BadStubData,
            0x1c00000d => Self::Cancel,
            0x1c00001a => Self::ContextMismatch,
            _ => return None,
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}
