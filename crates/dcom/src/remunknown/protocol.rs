//! IRemUnknown wire protocol (MS-DCOM 3.1.1.5.6, 3.1.1.5.7)
//!
//! IRemUnknown derives from IUnknown (opnums 0-2) and adds opnums 3-5;
//! IRemUnknown2 derives from IRemUnknown and adds opnum 6.

use crate::operation::{check_count, conform, impl_orpc_operation, wire_count};
use crate::types::{iid, Iid, InterfacePointer, Ipid, OrpcThat, OrpcThis, RemInterfaceRef, RemQiResult};
use dcerpc::{Operation, PreparePayload, Request, Response, SyntaxId};
use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

/// IRemUnknown interface syntax
pub const REMUNKNOWN_SYNTAX: SyntaxId = SyntaxId::new(iid::IREMUNKNOWN, 0, 0);

/// IRemUnknown2 interface syntax
pub const REMUNKNOWN2_SYNTAX: SyntaxId = SyntaxId::new(iid::IREMUNKNOWN2, 0, 0);

/// Operation numbers for IRemUnknown
pub mod opnum {
    pub const REM_QUERY_INTERFACE: u16 = 3;
    pub const REM_ADD_REF: u16 = 4;
    pub const REM_RELEASE: u16 = 5;
}

/// Operation numbers for IRemUnknown2 (extends IRemUnknown)
pub mod opnum2 {
    pub const REM_QUERY_INTERFACE2: u16 = 6;
}

// [in] unsigned short cIids, [in, size_is(cIids)] IID* iids
fn write_iids<'a>(w: &mut NdrWriter<'a>, count: u16, iids: &'a [Iid]) -> midl_ndr::Result<()> {
    w.write_scalar(count)?;
    w.write_conformant(usize::from(count), iids, |w, iid| iid.ndr_encode(w))
}

fn read_iids<'a>(r: &mut NdrReader<'a>, iids: &'a mut Vec<Iid>) -> midl_ndr::Result<u16> {
    let count: u16 = r.read_scalar()?;
    check_count(usize::from(count), r.read_vec(iids)?)?;
    Ok(count)
}

/// ```text
/// HRESULT RemQueryInterface([in] REFIPID ripid, [in] unsigned long cRefs,
///     [in] unsigned short cIids, [in, size_is(cIids)] IID* iids,
///     [out, size_is(,cIids)] REMQIRESULT** ppQIResults)
/// ```
#[derive(Debug, Default)]
pub struct RemQueryInterfaceOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub ipid: Ipid,
    pub refs: u32,
    pub iid_count: u16,
    pub iids: Vec<Iid>,
    pub results: Option<Vec<RemQiResult>>,
    pub status: i32,
}

impl RemQueryInterfaceOp {
    pub const NAME: &'static str = "/IRemUnknown/v0/RemQueryInterface";
}

impl PreparePayload for RemQueryInterfaceOp {
    fn prepare_request(&mut self) -> midl_ndr::Result<()> {
        if self.iid_count == 0 && !self.iids.is_empty() {
            self.iid_count = wire_count(self.iids.len())?;
        }
        Ok(())
    }

    fn prepare_response(&mut self) -> midl_ndr::Result<()> {
        if let Some(results) = &mut self.results {
            conform(results, usize::from(self.iid_count));
        }
        Ok(())
    }
}

impl Operation for RemQueryInterfaceOp {
    fn opnum(&self) -> u16 {
        opnum::REM_QUERY_INTERFACE
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        self.ipid.ndr_encode(w)?;
        self.refs.ndr_encode(w)?;
        write_iids(w, self.iid_count, &self.iids)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.ipid.ndr_decode(r)?;
        self.refs.ndr_decode(r)?;
        self.iid_count = read_iids(r, &mut self.iids)?;
        Ok(())
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        let count = usize::from(self.iid_count);
        w.write_pointer(self.results.as_ref(), move |w, results| {
            w.write_conformant(count, results, |w, result| result.ndr_encode(w))
        })?;
        w.write_deferred()?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.results.ndr_decode(r)?;
        r.read_deferred()?;
        self.status.ndr_decode(r)
    }

    fn status(&self) -> i32 {
        self.status
    }

    fn set_status(&mut self, status: i32) {
        self.status = status;
    }

    fn prepare(&mut self) -> Option<&mut dyn PreparePayload> {
        Some(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemQueryInterfaceRequest {
    pub ipid: Ipid,
    pub refs: u32,
    pub iids: Vec<Iid>,
}

impl Request for RemQueryInterfaceRequest {
    type Op = RemQueryInterfaceOp;

    fn into_op(self, op: &mut RemQueryInterfaceOp) {
        op.ipid = self.ipid;
        op.refs = self.refs;
        op.iids = self.iids;
    }

    fn from_op(op: &mut RemQueryInterfaceOp) -> Self {
        Self {
            ipid: op.ipid,
            refs: op.refs,
            iids: std::mem::take(&mut op.iids),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemQueryInterfaceResponse {
    pub results: Option<Vec<RemQiResult>>,
    pub status: i32,
}

impl Response for RemQueryInterfaceResponse {
    type Op = RemQueryInterfaceOp;

    fn into_op(self, op: &mut RemQueryInterfaceOp) {
        op.results = self.results;
        op.status = self.status;
    }

    fn from_op(op: &mut RemQueryInterfaceOp) -> Self {
        Self {
            results: op.results.take(),
            status: op.status,
        }
    }
}

fn write_interface_refs<'a>(w: &mut NdrWriter<'a>, count: u16, refs: &'a [RemInterfaceRef]) -> midl_ndr::Result<()> {
    w.write_scalar(count)?;
    w.write_conformant(usize::from(count), refs, |w, r| r.ndr_encode(w))
}

fn read_interface_refs<'a>(r: &mut NdrReader<'a>, refs: &'a mut Vec<RemInterfaceRef>) -> midl_ndr::Result<u16> {
    let count: u16 = r.read_scalar()?;
    check_count(usize::from(count), r.read_vec(refs)?)?;
    Ok(count)
}

/// ```text
/// HRESULT RemAddRef([in] unsigned short cInterfaceRefs,
///     [in, size_is(cInterfaceRefs)] REMINTERFACEREF InterfaceRefs[],
///     [out, size_is(cInterfaceRefs)] HRESULT* pResults)
/// ```
#[derive(Debug, Default)]
pub struct RemAddRefOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub ref_count: u16,
    pub refs: Vec<RemInterfaceRef>,
    pub results: Vec<i32>,
    pub status: i32,
}

impl RemAddRefOp {
    pub const NAME: &'static str = "/IRemUnknown/v0/RemAddRef";
}

impl PreparePayload for RemAddRefOp {
    fn prepare_request(&mut self) -> midl_ndr::Result<()> {
        if self.ref_count == 0 && !self.refs.is_empty() {
            self.ref_count = wire_count(self.refs.len())?;
        }
        Ok(())
    }

    fn prepare_response(&mut self) -> midl_ndr::Result<()> {
        conform(&mut self.results, usize::from(self.ref_count));
        Ok(())
    }
}

impl Operation for RemAddRefOp {
    fn opnum(&self) -> u16 {
        opnum::REM_ADD_REF
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        write_interface_refs(w, self.ref_count, &self.refs)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.ref_count = read_interface_refs(r, &mut self.refs)?;
        Ok(())
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        w.write_conformant(usize::from(self.ref_count), &self.results, |w, hr| hr.ndr_encode(w))?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.results.ndr_decode(r)?;
        self.status.ndr_decode(r)
    }

    fn status(&self) -> i32 {
        self.status
    }

    fn set_status(&mut self, status: i32) {
        self.status = status;
    }

    fn prepare(&mut self) -> Option<&mut dyn PreparePayload> {
        Some(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemAddRefRequest {
    pub refs: Vec<RemInterfaceRef>,
}

impl Request for RemAddRefRequest {
    type Op = RemAddRefOp;

    fn into_op(self, op: &mut RemAddRefOp) {
        op.refs = self.refs;
    }

    fn from_op(op: &mut RemAddRefOp) -> Self {
        Self {
            refs: std::mem::take(&mut op.refs),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemAddRefResponse {
    /// One status per interface reference
    pub results: Vec<i32>,
    pub status: i32,
}

impl Response for RemAddRefResponse {
    type Op = RemAddRefOp;

    fn into_op(self, op: &mut RemAddRefOp) {
        op.results = self.results;
        op.status = self.status;
    }

    fn from_op(op: &mut RemAddRefOp) -> Self {
        Self {
            results: std::mem::take(&mut op.results),
            status: op.status,
        }
    }
}

/// ```text
/// HRESULT RemRelease([in] unsigned short cInterfaceRefs,
///     [in, size_is(cInterfaceRefs)] REMINTERFACEREF InterfaceRefs[])
/// ```
#[derive(Debug, Default)]
pub struct RemReleaseOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub ref_count: u16,
    pub refs: Vec<RemInterfaceRef>,
    pub status: i32,
}

impl RemReleaseOp {
    pub const NAME: &'static str = "/IRemUnknown/v0/RemRelease";
}

impl PreparePayload for RemReleaseOp {
    fn prepare_request(&mut self) -> midl_ndr::Result<()> {
        if self.ref_count == 0 && !self.refs.is_empty() {
            self.ref_count = wire_count(self.refs.len())?;
        }
        Ok(())
    }
}

impl Operation for RemReleaseOp {
    fn opnum(&self) -> u16 {
        opnum::REM_RELEASE
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        write_interface_refs(w, self.ref_count, &self.refs)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.ref_count = read_interface_refs(r, &mut self.refs)?;
        Ok(())
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.status.ndr_decode(r)
    }

    fn status(&self) -> i32 {
        self.status
    }

    fn set_status(&mut self, status: i32) {
        self.status = status;
    }

    fn prepare(&mut self) -> Option<&mut dyn PreparePayload> {
        Some(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemReleaseRequest {
    pub refs: Vec<RemInterfaceRef>,
}

impl Request for RemReleaseRequest {
    type Op = RemReleaseOp;

    fn into_op(self, op: &mut RemReleaseOp) {
        op.refs = self.refs;
    }

    fn from_op(op: &mut RemReleaseOp) -> Self {
        Self {
            refs: std::mem::take(&mut op.refs),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemReleaseResponse {
    pub status: i32,
}

impl Response for RemReleaseResponse {
    type Op = RemReleaseOp;

    fn into_op(self, op: &mut RemReleaseOp) {
        op.status = self.status;
    }

    fn from_op(op: &mut RemReleaseOp) -> Self {
        Self { status: op.status }
    }
}

/// ```text
/// HRESULT RemQueryInterface2([in] REFIPID ripid, [in] unsigned short cIids,
///     [in, size_is(cIids)] IID* iids, [out, size_is(cIids)] HRESULT* phr,
///     [out, size_is(cIids)] MInterfacePointer** ppMIF)
/// ```
#[derive(Debug, Default)]
pub struct RemQueryInterface2Op {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub ipid: Ipid,
    pub iid_count: u16,
    pub iids: Vec<Iid>,
    pub results: Vec<i32>,
    pub interfaces: Vec<Option<InterfacePointer>>,
    pub status: i32,
}

impl RemQueryInterface2Op {
    pub const NAME: &'static str = "/IRemUnknown2/v0/RemQueryInterface2";
}

impl PreparePayload for RemQueryInterface2Op {
    fn prepare_request(&mut self) -> midl_ndr::Result<()> {
        if self.iid_count == 0 && !self.iids.is_empty() {
            self.iid_count = wire_count(self.iids.len())?;
        }
        Ok(())
    }

    fn prepare_response(&mut self) -> midl_ndr::Result<()> {
        let count = usize::from(self.iid_count);
        conform(&mut self.results, count);
        conform(&mut self.interfaces, count);
        Ok(())
    }
}

impl Operation for RemQueryInterface2Op {
    fn opnum(&self) -> u16 {
        opnum2::REM_QUERY_INTERFACE2
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        self.ipid.ndr_encode(w)?;
        write_iids(w, self.iid_count, &self.iids)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.ipid.ndr_decode(r)?;
        self.iid_count = read_iids(r, &mut self.iids)?;
        Ok(())
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let count = usize::from(self.iid_count);
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        w.write_conformant(count, &self.results, |w, hr| hr.ndr_encode(w))?;
        w.write_conformant(count, &self.interfaces, |w, ptr| ptr.ndr_encode(w))?;
        w.write_deferred()?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.results.ndr_decode(r)?;
        self.interfaces.ndr_decode(r)?;
        r.read_deferred()?;
        self.status.ndr_decode(r)
    }

    fn status(&self) -> i32 {
        self.status
    }

    fn set_status(&mut self, status: i32) {
        self.status = status;
    }

    fn prepare(&mut self) -> Option<&mut dyn PreparePayload> {
        Some(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemQueryInterface2Request {
    pub ipid: Ipid,
    pub iids: Vec<Iid>,
}

impl Request for RemQueryInterface2Request {
    type Op = RemQueryInterface2Op;

    fn into_op(self, op: &mut RemQueryInterface2Op) {
        op.ipid = self.ipid;
        op.iids = self.iids;
    }

    fn from_op(op: &mut RemQueryInterface2Op) -> Self {
        Self {
            ipid: op.ipid,
            iids: std::mem::take(&mut op.iids),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemQueryInterface2Response {
    /// One status per requested IID
    pub results: Vec<i32>,
    pub interfaces: Vec<Option<InterfacePointer>>,
    pub status: i32,
}

impl Response for RemQueryInterface2Response {
    type Op = RemQueryInterface2Op;

    fn into_op(self, op: &mut RemQueryInterface2Op) {
        op.results = self.results;
        op.interfaces = self.interfaces;
        op.status = self.status;
    }

    fn from_op(op: &mut RemQueryInterface2Op) -> Self {
        Self {
            results: std::mem::take(&mut op.results),
            interfaces: std::mem::take(&mut op.interfaces),
            status: op.status,
        }
    }
}

impl_orpc_operation!(RemQueryInterfaceOp, RemAddRefOp, RemReleaseOp, RemQueryInterface2Op);
