//! IUnknown wire protocol (MS-DCOM 3.1.1.5.8 IUnknown opnums 0-2)

use crate::operation::impl_orpc_operation;
use crate::types::{iid, Iid, InterfacePointer, OrpcThat, OrpcThis};
use dcerpc::{Operation, Request, Response, SyntaxId};
use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

/// IUnknown interface syntax
pub const UNKNOWN_SYNTAX: SyntaxId = SyntaxId::new(iid::IUNKNOWN, 0, 0);

/// Operation numbers for IUnknown
pub mod opnum {
    pub const QUERY_INTERFACE: u16 = 0;
    pub const ADD_REF: u16 = 1;
    pub const RELEASE: u16 = 2;
}

/// `HRESULT QueryInterface([in] REFIID riid, [out, iid_is(riid)] void** ppvObject)`
#[derive(Debug, Default)]
pub struct QueryInterfaceOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub iid: Iid,
    pub object: Option<InterfacePointer>,
    pub status: i32,
}

impl QueryInterfaceOp {
    pub const NAME: &'static str = "/IUnknown/v0/QueryInterface";
}

impl Operation for QueryInterfaceOp {
    fn opnum(&self) -> u16 {
        opnum::QUERY_INTERFACE
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        self.iid.ndr_encode(w)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.iid.ndr_decode(r)
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        self.object.ndr_encode(w)?;
        w.write_deferred()?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.object.ndr_decode(r)?;
        r.read_deferred()?;
        self.status.ndr_decode(r)
    }

    fn status(&self) -> i32 {
        self.status
    }

    fn set_status(&mut self, status: i32) {
        self.status = status;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryInterfaceRequest {
    pub iid: Iid,
}

impl Request for QueryInterfaceRequest {
    type Op = QueryInterfaceOp;

    fn into_op(self, op: &mut QueryInterfaceOp) {
        op.iid = self.iid;
    }

    fn from_op(op: &mut QueryInterfaceOp) -> Self {
        Self { iid: op.iid }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryInterfaceResponse {
    pub object: Option<InterfacePointer>,
    pub status: i32,
}

impl Response for QueryInterfaceResponse {
    type Op = QueryInterfaceOp;

    fn into_op(self, op: &mut QueryInterfaceOp) {
        op.object = self.object;
        op.status = self.status;
    }

    fn from_op(op: &mut QueryInterfaceOp) -> Self {
        Self {
            object: op.object.take(),
            status: op.status,
        }
    }
}

// AddRef and Release share their shape: no IN parameters, the new
// reference count as the return value.
macro_rules! ref_count_operation {
    ($op:ident, $req:ident, $resp:ident, $opnum:expr, $name:literal) => {
        #[derive(Debug, Default)]
        pub struct $op {
            pub this: OrpcThis,
            pub that: OrpcThat,
            /// Return value. A failed handler leaves its status here.
            pub ref_count: u32,
        }

        impl $op {
            pub const NAME: &'static str = $name;
        }

        impl Operation for $op {
            fn opnum(&self) -> u16 {
                $opnum
            }

            fn name(&self) -> &'static str {
                Self::NAME
            }

            fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
                self.this.ndr_encode(w)?;
                w.write_deferred()
            }

            fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
                self.this.ndr_decode(r)?;
                r.read_deferred()
            }

            fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
                self.that.ndr_encode(w)?;
                w.write_deferred()?;
                self.ref_count.ndr_encode(w)
            }

            fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
                self.that.ndr_decode(r)?;
                r.read_deferred()?;
                self.ref_count.ndr_decode(r)
            }

            // the ULONG return is a count, never a failure
            fn status(&self) -> i32 {
                0
            }

            fn set_status(&mut self, status: i32) {
                self.ref_count = status as u32;
            }
        }

        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $req;

        impl Request for $req {
            type Op = $op;

            fn into_op(self, _op: &mut $op) {}

            fn from_op(_op: &mut $op) -> Self {
                Self
            }
        }

        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $resp {
            pub ref_count: u32,
        }

        impl Response for $resp {
            type Op = $op;

            fn into_op(self, op: &mut $op) {
                op.ref_count = self.ref_count;
            }

            fn from_op(op: &mut $op) -> Self {
                Self {
                    ref_count: op.ref_count,
                }
            }
        }
    };
}

ref_count_operation!(AddRefOp, AddRefRequest, AddRefResponse, opnum::ADD_REF, "/IUnknown/v0/AddRef");
ref_count_operation!(ReleaseOp, ReleaseRequest, ReleaseResponse, opnum::RELEASE, "/IUnknown/v0/Release");

impl_orpc_operation!(QueryInterfaceOp, AddRefOp, ReleaseOp);
