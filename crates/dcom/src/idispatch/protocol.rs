//! IDispatch wire protocol (MS-OAUT 3.1.4)
//!
//! IDispatch derives from IUnknown; its own methods start at opnum 3.

use crate::oaut::{DispParams, ExcepInfo, Variant};
use crate::operation::{check_count, conform, impl_orpc_operation, wire_count};
use crate::types::{iid, Iid, InterfacePointer, OrpcThat, OrpcThis};
use dcerpc::{Operation, PreparePayload, Request, Response, SyntaxId};
use midl_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// IDispatch interface syntax
pub const DISPATCH_SYNTAX: SyntaxId = SyntaxId::new(iid::IDISPATCH, 0, 0);

/// Upper bound of `cNames` in GetIDsOfNames
pub const MAX_NAMES: u32 = 16384;

/// Operation numbers for IDispatch
pub mod opnum {
    pub const GET_TYPE_INFO_COUNT: u16 = 3;
    pub const GET_TYPE_INFO: u16 = 4;
    pub const GET_IDS_OF_NAMES: u16 = 5;
    pub const INVOKE: u16 = 6;
}

/// `dwFlags` values for Invoke
pub mod dispatch_flags {
    pub const DISPATCH_METHOD: u32 = 0x1;
    pub const DISPATCH_PROPERTYGET: u32 = 0x2;
    pub const DISPATCH_PROPERTYPUT: u32 = 0x4;
    pub const DISPATCH_PROPERTYPUTREF: u32 = 0x8;
}

/// `HRESULT GetTypeInfoCount([out] UINT* pctinfo)`
#[derive(Debug, Default)]
pub struct GetTypeInfoCountOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub count: u32,
    pub status: i32,
}

impl GetTypeInfoCountOp {
    pub const NAME: &'static str = "/IDispatch/v0/GetTypeInfoCount";
}

impl Operation for GetTypeInfoCountOp {
    fn opnum(&self) -> u16 {
        opnum::GET_TYPE_INFO_COUNT
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
        self.count.ndr_encode(w)?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.count.ndr_decode(r)?;
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
pub struct GetTypeInfoCountRequest;

impl Request for GetTypeInfoCountRequest {
    type Op = GetTypeInfoCountOp;

    fn into_op(self, _op: &mut GetTypeInfoCountOp) {}

    fn from_op(_op: &mut GetTypeInfoCountOp) -> Self {
        Self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetTypeInfoCountResponse {
    pub count: u32,
    pub status: i32,
}

impl Response for GetTypeInfoCountResponse {
    type Op = GetTypeInfoCountOp;

    fn into_op(self, op: &mut GetTypeInfoCountOp) {
        op.count = self.count;
        op.status = self.status;
    }

    fn from_op(op: &mut GetTypeInfoCountOp) -> Self {
        Self {
            count: op.count,
            status: op.status,
        }
    }
}

/// `HRESULT GetTypeInfo([in] UINT iTInfo, [in] LCID lcid, [out] ITypeInfo** ppTInfo)`
#[derive(Debug, Default)]
pub struct GetTypeInfoOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub index: u32,
    pub lcid: u32,
    pub type_info: Option<InterfacePointer>,
    pub status: i32,
}

impl GetTypeInfoOp {
    pub const NAME: &'static str = "/IDispatch/v0/GetTypeInfo";
}

impl Operation for GetTypeInfoOp {
    fn opnum(&self) -> u16 {
        opnum::GET_TYPE_INFO
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        self.index.ndr_encode(w)?;
        self.lcid.ndr_encode(w)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.index.ndr_decode(r)?;
        self.lcid.ndr_decode(r)
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        self.type_info.ndr_encode(w)?;
        w.write_deferred()?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.type_info.ndr_decode(r)?;
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
pub struct GetTypeInfoRequest {
    pub index: u32,
    pub lcid: u32,
}

impl Request for GetTypeInfoRequest {
    type Op = GetTypeInfoOp;

    fn into_op(self, op: &mut GetTypeInfoOp) {
        op.index = self.index;
        op.lcid = self.lcid;
    }

    fn from_op(op: &mut GetTypeInfoOp) -> Self {
        Self {
            index: op.index,
            lcid: op.lcid,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetTypeInfoResponse {
    pub type_info: Option<InterfacePointer>,
    pub status: i32,
}

impl Response for GetTypeInfoResponse {
    type Op = GetTypeInfoOp;

    fn into_op(self, op: &mut GetTypeInfoOp) {
        op.type_info = self.type_info;
        op.status = self.status;
    }

    fn from_op(op: &mut GetTypeInfoOp) -> Self {
        Self {
            type_info: op.type_info.take(),
            status: op.status,
        }
    }
}

/// ```text
/// HRESULT GetIDsOfNames([in] REFIID riid,
///     [in, size_is(cNames)] LPOLESTR* rgszNames,
///     [in, range(0, 16384)] UINT cNames, [in] LCID lcid,
///     [out, size_is(cNames)] DISPID* rgDispId)
/// ```
#[derive(Debug, Default)]
pub struct GetIdsOfNamesOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub iid: Iid,
    pub names: Vec<String>,
    pub names_count: u32,
    pub lcid: u32,
    pub disp_ids: Vec<i32>,
    pub status: i32,
}

impl GetIdsOfNamesOp {
    pub const NAME: &'static str = "/IDispatch/v0/GetIDsOfNames";
}

fn wire_len(count: u32) -> midl_ndr::Result<usize> {
    usize::try_from(count).map_err(|_| NdrError::IntegerOverflow)
}

fn check_names_count(count: u32) -> midl_ndr::Result<()> {
    if count > MAX_NAMES {
        return Err(NdrError::OutOfRange {
            field: "cNames",
            value: u64::from(count),
            max: u64::from(MAX_NAMES),
        });
    }
    Ok(())
}

impl PreparePayload for GetIdsOfNamesOp {
    fn prepare_request(&mut self) -> midl_ndr::Result<()> {
        if self.names_count == 0 && !self.names.is_empty() {
            self.names_count = wire_count(self.names.len())?;
        }
        check_names_count(self.names_count)
    }

    fn prepare_response(&mut self) -> midl_ndr::Result<()> {
        let count = wire_len(self.names_count)?;
        conform(&mut self.disp_ids, count);
        Ok(())
    }
}

impl Operation for GetIdsOfNamesOp {
    fn opnum(&self) -> u16 {
        opnum::GET_IDS_OF_NAMES
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let count = wire_len(self.names_count)?;
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        self.iid.ndr_encode(w)?;
        w.write_conformant(count, &self.names, |w, name| {
            w.write_pointer(Some(name), |w, name| w.write_wstring(name))
        })?;
        w.write_deferred()?;
        self.names_count.ndr_encode(w)?;
        self.lcid.ndr_encode(w)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.iid.ndr_decode(r)?;
        let received = r.read_conformant(&mut self.names, 4, |r, name| {
            r.read_referent(name, |r, name| {
                *name = r.read_wstring()?;
                Ok(())
            })
        })?;
        r.read_deferred()?;
        let names_count: u32 = r.read_scalar()?;
        check_names_count(names_count)?;
        check_count(wire_len(names_count)?, received)?;
        self.names_count = names_count;
        self.lcid.ndr_decode(r)
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let count = wire_len(self.names_count)?;
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        w.write_conformant(count, &self.disp_ids, |w, id| id.ndr_encode(w))?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.disp_ids.ndr_decode(r)?;
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
pub struct GetIdsOfNamesRequest {
    pub iid: Iid,
    pub names: Vec<String>,
    pub lcid: u32,
}

impl Request for GetIdsOfNamesRequest {
    type Op = GetIdsOfNamesOp;

    fn into_op(self, op: &mut GetIdsOfNamesOp) {
        op.iid = self.iid;
        op.names = self.names;
        op.lcid = self.lcid;
    }

    fn from_op(op: &mut GetIdsOfNamesOp) -> Self {
        Self {
            iid: op.iid,
            names: std::mem::take(&mut op.names),
            lcid: op.lcid,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GetIdsOfNamesResponse {
    /// One DISPID per requested name
    pub disp_ids: Vec<i32>,
    pub status: i32,
}

impl Response for GetIdsOfNamesResponse {
    type Op = GetIdsOfNamesOp;

    fn into_op(self, op: &mut GetIdsOfNamesOp) {
        op.disp_ids = self.disp_ids;
        op.status = self.status;
    }

    fn from_op(op: &mut GetIdsOfNamesOp) -> Self {
        Self {
            disp_ids: std::mem::take(&mut op.disp_ids),
            status: op.status,
        }
    }
}

/// ```text
/// HRESULT Invoke([in] DISPID dispIdMember, [in] REFIID riid, [in] LCID lcid,
///     [in] DWORD dwFlags, [in] DISPPARAMS* pDispParams,
///     [out] VARIANT* pVarResult, [out] EXCEPINFO* pExcepInfo,
///     [out] UINT* pArgErr, [in] UINT cVarRef,
///     [in, size_is(cVarRef)] UINT* rgVarRefIdx,
///     [in, out, size_is(cVarRef)] VARIANT* rgVarRef)
/// ```
#[derive(Debug, Default)]
pub struct InvokeOp {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub disp_id: i32,
    pub iid: Iid,
    pub lcid: u32,
    pub flags: u32,
    pub params: DispParams,
    pub result: Variant,
    pub excep_info: ExcepInfo,
    pub arg_err: u32,
    pub var_ref_count: u32,
    pub var_ref_idx: Vec<u32>,
    pub var_ref: Vec<Variant>,
    pub status: i32,
}

impl InvokeOp {
    pub const NAME: &'static str = "/IDispatch/v0/Invoke";

    fn var_ref_len(&self) -> midl_ndr::Result<usize> {
        wire_len(self.var_ref_count)
    }
}

impl PreparePayload for InvokeOp {
    fn prepare_request(&mut self) -> midl_ndr::Result<()> {
        if self.var_ref_count == 0 && !self.var_ref.is_empty() {
            self.var_ref_count = wire_count(self.var_ref.len())?;
        }
        Ok(())
    }

    fn prepare_response(&mut self) -> midl_ndr::Result<()> {
        let count = self.var_ref_len()?;
        conform(&mut self.var_ref, count);
        Ok(())
    }
}

impl Operation for InvokeOp {
    fn opnum(&self) -> u16 {
        opnum::INVOKE
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let count = self.var_ref_len()?;
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        self.disp_id.ndr_encode(w)?;
        self.iid.ndr_encode(w)?;
        self.lcid.ndr_encode(w)?;
        self.flags.ndr_encode(w)?;
        self.params.ndr_encode(w)?;
        w.write_deferred()?;
        self.var_ref_count.ndr_encode(w)?;
        w.write_conformant(count, &self.var_ref_idx, |w, idx| idx.ndr_encode(w))?;
        w.write_conformant(count, &self.var_ref, |w, v| v.ndr_encode(w))?;
        w.write_deferred()
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.disp_id.ndr_decode(r)?;
        self.iid.ndr_decode(r)?;
        self.lcid.ndr_decode(r)?;
        self.flags.ndr_decode(r)?;
        self.params.ndr_decode(r)?;
        r.read_deferred()?;
        let var_ref_count: u32 = r.read_scalar()?;
        self.var_ref_count = var_ref_count;
        let count = wire_len(var_ref_count)?;
        check_count(count, r.read_vec(&mut self.var_ref_idx)?)?;
        check_count(count, r.read_vec(&mut self.var_ref)?)?;
        r.read_deferred()
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let count = self.var_ref_len()?;
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        self.result.ndr_encode(w)?;
        w.write_deferred()?;
        self.excep_info.ndr_encode(w)?;
        w.write_deferred()?;
        self.arg_err.ndr_encode(w)?;
        w.write_conformant(count, &self.var_ref, |w, v| v.ndr_encode(w))?;
        w.write_deferred()?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.result.ndr_decode(r)?;
        r.read_deferred()?;
        self.excep_info.ndr_decode(r)?;
        r.read_deferred()?;
        self.arg_err.ndr_decode(r)?;
        self.var_ref.ndr_decode(r)?;
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

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvokeRequest {
    pub disp_id: i32,
    pub iid: Iid,
    pub lcid: u32,
    pub flags: u32,
    pub params: DispParams,
    /// Positions in `params.args` passed by reference
    pub var_ref_idx: Vec<u32>,
    pub var_ref: Vec<Variant>,
}

impl Request for InvokeRequest {
    type Op = InvokeOp;

    fn into_op(self, op: &mut InvokeOp) {
        op.disp_id = self.disp_id;
        op.iid = self.iid;
        op.lcid = self.lcid;
        op.flags = self.flags;
        op.params = self.params;
        op.var_ref_idx = self.var_ref_idx;
        op.var_ref = self.var_ref;
    }

    fn from_op(op: &mut InvokeOp) -> Self {
        Self {
            disp_id: op.disp_id,
            iid: op.iid,
            lcid: op.lcid,
            flags: op.flags,
            params: std::mem::take(&mut op.params),
            var_ref_idx: std::mem::take(&mut op.var_ref_idx),
            var_ref: std::mem::take(&mut op.var_ref),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvokeResponse {
    pub result: Variant,
    pub excep_info: ExcepInfo,
    pub arg_err: u32,
    pub var_ref: Vec<Variant>,
    pub status: i32,
}

impl Response for InvokeResponse {
    type Op = InvokeOp;

    fn into_op(self, op: &mut InvokeOp) {
        op.result = self.result;
        op.excep_info = self.excep_info;
        op.arg_err = self.arg_err;
        op.var_ref = self.var_ref;
        op.status = self.status;
    }

    fn from_op(op: &mut InvokeOp) -> Self {
        Self {
            result: std::mem::take(&mut op.result),
            excep_info: std::mem::take(&mut op.excep_info),
            arg_err: op.arg_err,
            var_ref: std::mem::take(&mut op.var_ref),
            status: op.status,
        }
    }
}

impl_orpc_operation!(GetTypeInfoCountOp, GetTypeInfoOp, GetIdsOfNamesOp, InvokeOp);
