//! Core DCOM types (MS-DCOM 2.2)
//!
//! - Identifiers: OXID, OID, IPID, IID, CID
//! - ORPC headers: ORPCTHIS, ORPCTHAT and their extents
//! - Object references: STDOBJREF, REMQIRESULT, REMINTERFACEREF
//! - Marshaled interface pointers: MInterfacePointer

pub mod hresult;
mod identifiers;
mod interface_pointer;
mod orpc;
mod stdobjref;

pub use identifiers::{generate_uuid, Cid, Iid, Ipid, Oid, Oxid};
pub use interface_pointer::InterfacePointer;
pub use orpc::{extent_ids, ComVersion, OrpcExtent, OrpcExtentArray, OrpcThat, OrpcThis};
pub use stdobjref::{flags as sorf, RemInterfaceRef, RemQiResult, StdObjRef};

/// Well-known interface identifiers
pub mod iid {
    use super::Iid;

    const COM_TAIL: [u8; 8] = [0xc0, 0, 0, 0, 0, 0, 0, 0x46];

    /// IUnknown
    pub const IUNKNOWN: Iid = Iid::from_fields(0x0000_0000, 0, 0, COM_TAIL);
    /// IClassFactory
    pub const ICLASSFACTORY: Iid = Iid::from_fields(0x0000_0001, 0, 0, COM_TAIL);
    /// IRemUnknown
    pub const IREMUNKNOWN: Iid = Iid::from_fields(0x0000_0131, 0, 0, COM_TAIL);
    /// IRemUnknown2
    pub const IREMUNKNOWN2: Iid = Iid::from_fields(0x0000_0143, 0, 0, COM_TAIL);
    /// IDispatch
    pub const IDISPATCH: Iid = Iid::from_fields(0x0002_0400, 0, 0, COM_TAIL);
    /// Null IID, required as `riid` by IDispatch methods
    pub const IID_NULL: Iid = Iid::NIL;
}
