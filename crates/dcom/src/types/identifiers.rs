//! DCOM identifier types (MS-DCOM 2.2.18)
//!
//! These are the core identifiers used throughout DCOM:
//! - OXID: Object Exporter Identifier
//! - OID: Object Identifier
//! - IPID: Interface Pointer Identifier
//! - IID / CID: interface and causality identifiers (plain GUIDs)

use dcerpc::{new_uuid, Uuid};
use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};
use std::fmt;

/// Interface identifier
pub type Iid = Uuid;

/// Causality identifier
pub type Cid = Uuid;

/// Generate a new random v4 UUID
pub fn generate_uuid() -> Uuid {
    new_uuid()
}

fn random_u64() -> u64 {
    let (hi, lo) = uuid::Uuid::new_v4().as_u64_pair();
    hi ^ lo
}

// 8-byte identifiers share their shape: a hyper on the wire, hex when shown
macro_rules! hyper_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Size in bytes
            pub const SIZE: usize = 8;

            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Generate a random identifier
            pub fn generate() -> Self {
                Self(random_u64())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({:016x})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:016x}", self.0)
            }
        }

        impl NdrEncode for $name {
            fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
                w.write_scalar(self.0)
            }
        }

        impl NdrDecode for $name {
            fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
                self.0 = r.read_scalar()?;
                Ok(())
            }
        }
    };
}

hyper_identifier!(
    /// Object Exporter Identifier
    ///
    /// Identifies the apartment or process that exports an object.
    Oxid,
    "OXID"
);

hyper_identifier!(
    /// Object Identifier
    ///
    /// Identifies a COM object within an object exporter.
    Oid,
    "OID"
);

/// Interface Pointer Identifier (16 bytes / UUID)
///
/// Uniquely identifies an interface pointer on a specific object. Every
/// ORPC call is addressed to one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Ipid(pub Uuid);

impl Ipid {
    /// Size of IPID in bytes (16 bytes, same as UUID)
    pub const SIZE: usize = 16;

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random IPID
    pub fn generate() -> Self {
        Self(generate_uuid())
    }

    pub fn nil() -> Self {
        Self(Uuid::NIL)
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Ipid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Debug for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPID({})", self.0)
    }
}

impl fmt::Display for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NdrEncode for Ipid {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_uuid(&self.0)
    }
}

impl NdrDecode for Ipid {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.0 = r.read_uuid()?;
        Ok(())
    }
}
