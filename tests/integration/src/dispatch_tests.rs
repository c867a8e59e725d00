//! Dispatch Tests - Opnum Routing Across Inherited Interfaces
//!
//! These tests exercise server-side dispatch:
//! - Base opnums forwarded down a three-level chain
//!   (IRemUnknown2 -> IRemUnknown -> IUnknown)
//! - IDispatch forwarding to IUnknown
//! - Unmapped opnums reported as an operation range fault
//! - Undecodable requests reported as bad stub data
//! - Binding by interface UUID and major version

mod common;

use std::sync::Arc;

use bytes::Bytes;

use common::*;
use dcerpc::{
    encode_request, CallContext, Conn, DispatchOutcome, Dispatcher, FaultStatus, Operation, RpcError, SyntaxId,
};
use dcom::hresult::{E_NOINTERFACE, E_NOTIMPL};
use dcom::idispatch::{
    dispatch_dispatcher, DispatchClient, GetIdsOfNamesRequest, GetTypeInfoCountRequest, InvokeOp,
};
use dcom::iunknown::{AddRefRequest, QueryInterfaceRequest, UNKNOWN_SYNTAX};
use dcom::oaut::Variant;
use dcom::remunknown::{
    rem_unknown2_dispatcher, RemAddRefRequest, RemQueryInterface2Request, RemUnknown2Client, REMUNKNOWN2_SYNTAX,
};
use dcom::{iid, OrpcThis, RemInterfaceRef};
use midl_ndr::{NdrContext, NdrEncode, NdrReader, NdrWriter};

/// Sends an ORPCTHIS and nothing else at any opnum, or a prepared stub.
#[derive(Debug, Default)]
struct RawCall {
    opnum: u16,
    this: OrpcThis,
    stub: Option<Bytes>,
}

impl RawCall {
    fn at(opnum: u16) -> Self {
        Self {
            opnum,
            ..Default::default()
        }
    }
}

impl Operation for RawCall {
    fn opnum(&self) -> u16 {
        self.opnum
    }

    fn name(&self) -> &'static str {
        "/IRaw/v0/RawCall"
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        if let Some(stub) = &self.stub {
            return w.write_bytes(stub);
        }
        self.this.ndr_encode(w)?;
        w.write_deferred()
    }

    fn unmarshal_request<'a>(&'a mut self, _r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        Ok(())
    }

    fn marshal_response<'a>(&'a self, _w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        Ok(())
    }

    fn unmarshal_response<'a>(&'a mut self, _r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        Ok(())
    }

    fn status(&self) -> i32 {
        0
    }

    fn set_status(&mut self, _status: i32) {}
}

async fn send_raw(conn: &dyn Conn, op: &mut RawCall) -> dcerpc::Result<()> {
    let ctx = CallContext::new().with_object(calculator_ipid().0);
    conn.invoke(&ctx, op).await
}

/// Test: IRemUnknown2 forwards 0-2 to IUnknown and 3-5 to IRemUnknown
#[tokio::test]
async fn test_three_level_chain() {
    init_logging();

    let (root, calculator) = start_calculator();
    let ctx = CallContext::new();
    let client = RemUnknown2Client::bind(&root, &ctx).await.unwrap().with_ipid(calculator_ipid());

    // opnum 1 on IRemUnknown2 lands in IUnknown
    let resp = client.rem_unknown().unknown().add_ref(&ctx, AddRefRequest).await.unwrap();
    assert_eq!(resp.ref_count, 2);

    // opnum 4 lands in IRemUnknown
    let refs = vec![RemInterfaceRef::new(calculator_ipid(), 3, 0)];
    let resp = client
        .rem_unknown()
        .rem_add_ref(&ctx, RemAddRefRequest { refs })
        .await
        .unwrap();
    assert_eq!(resp.results, vec![0]);
    assert_eq!(calculator.refs(), 5);

    // opnum 6 is IRemUnknown2's own, and the calculator leaves it unimplemented
    let err = client
        .rem_query_interface2(
            &ctx,
            RemQueryInterface2Request {
                ipid: calculator_ipid(),
                iids: vec![iid::IDISPATCH],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(E_NOTIMPL));

    assert_eq!(calculator.methods(), vec!["AddRef", "RemAddRef"]);
}

/// Test: IDispatch forwards 0-2 to IUnknown and handles 3-6 itself
#[tokio::test]
async fn test_dispatch_forwards_to_unknown() {
    init_logging();

    let (root, calculator) = start_calculator();
    let ctx = CallContext::new();
    let client = DispatchClient::bind(&root, &ctx).await.unwrap().with_ipid(calculator_ipid());

    let resp = client
        .unknown()
        .query_interface(&ctx, QueryInterfaceRequest { iid: iid::IDISPATCH })
        .await
        .unwrap();
    let object = resp.object.unwrap();
    assert_eq!(&object.data[..], &OBJREF_SIGNATURE);

    let err = client
        .unknown()
        .query_interface(&ctx, QueryInterfaceRequest { iid: iid::ICLASSFACTORY })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(E_NOINTERFACE));
    assert_eq!(err.partial.unwrap().object, None);

    let resp = client.get_type_info_count(&ctx, GetTypeInfoCountRequest).await.unwrap();
    assert_eq!(resp.count, 0);

    let resp = client
        .get_ids_of_names(
            &ctx,
            GetIdsOfNamesRequest {
                iid: iid::IID_NULL,
                names: vec!["Add".to_string(), "Negate".to_string()],
                lcid: 0,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.disp_ids, vec![DISPID_ADD, DISPID_NEGATE]);

    let resp = client
        .call_method(&ctx, DISPID_ADD, vec![Variant::from(40), Variant::from(2)])
        .await
        .unwrap();
    assert_eq!(resp.result, Variant::I4(42));

    assert_eq!(
        calculator.methods(),
        vec!["QueryInterface", "QueryInterface", "GetTypeInfoCount", "GetIDsOfNames", "Invoke"]
    );
}

/// Test: the dispatcher reports NoOperation past the last opnum of the chain
#[tokio::test]
async fn test_dispatcher_no_operation() {
    init_logging();

    let calculator = Arc::new(Calculator::new());
    let rem2 = rem_unknown2_dispatcher(Arc::clone(&calculator));
    assert_eq!(rem2.first_own_opnum(), 6);
    assert!(rem2.has_operation(6));
    assert!(!rem2.has_operation(3));

    let outcome = rem2
        .dispatch(CallContext::new(), 7, Bytes::new(), NdrContext::new())
        .await
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::NoOperation));

    let dispatch = dispatch_dispatcher(calculator);
    assert_eq!(dispatch.first_own_opnum(), 3);
    let outcome = dispatch
        .dispatch(CallContext::new(), 100, Bytes::new(), NdrContext::new())
        .await
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::NoOperation));
}

/// Test: an unmapped opnum reaches the client as an operation range fault
#[tokio::test]
async fn test_unmapped_opnum_faults() {
    init_logging();

    let (root, calculator) = start_calculator();
    let ctx = CallContext::new();

    let rem2 = root.bind(&ctx, REMUNKNOWN2_SYNTAX).await.unwrap();
    let err = send_raw(rem2.as_ref(), &mut RawCall::at(7)).await.unwrap_err();
    assert!(matches!(err, RpcError::Fault(code) if code == FaultStatus::OpRngError.code()));

    let dispatch = DispatchClient::bind(&root, &ctx).await.unwrap();
    let conn = dispatch.unknown().object().conn().clone();
    let err = send_raw(conn.as_ref(), &mut RawCall::at(7)).await.unwrap_err();
    assert!(matches!(err, RpcError::Fault(0x1c01_0002)));

    assert!(calculator.calls().is_empty());
    let stats = root.stats();
    assert_eq!(stats.faults_sent, 2);
}

/// Test: a request that does not decode reaches the client as bad stub data
#[tokio::test]
async fn test_undecodable_request_faults() {
    init_logging();

    let (root, calculator) = start_calculator();
    let conn = root.bind(&CallContext::new(), REMUNKNOWN2_SYNTAX).await.unwrap();

    let mut op = RawCall {
        opnum: 1,
        stub: Some(Bytes::from_static(&[0, 0])),
        ..Default::default()
    };
    let err = send_raw(conn.as_ref(), &mut op).await.unwrap_err();
    assert!(matches!(err, RpcError::Fault(code) if code == FaultStatus::BadStubData.code()));
    assert!(calculator.calls().is_empty());
}

/// Test: a by-reference count that disagrees with its arrays is rejected
/// before the handler runs or a response is sized from it
#[tokio::test]
async fn test_inflated_var_ref_count_faults() {
    init_logging();

    let (root, calculator) = start_calculator();
    let conn = DispatchClient::bind(&root, &CallContext::new())
        .await
        .unwrap()
        .unknown()
        .object()
        .conn()
        .clone();

    let mut invoke = InvokeOp::default();
    let stub = encode_request(&mut invoke, NdrContext::new()).unwrap();
    // cVarRef sits before the two empty array sizes
    let mut data = stub.to_vec();
    let at = data.len() - 12;
    data[at..at + 4].copy_from_slice(&20_000_000u32.to_le_bytes());

    let mut op = RawCall {
        opnum: InvokeOp::default().opnum(),
        stub: Some(Bytes::from(data)),
        ..Default::default()
    };
    let err = send_raw(conn.as_ref(), &mut op).await.unwrap_err();
    assert!(matches!(err, RpcError::Fault(code) if code == FaultStatus::BadStubData.code()));
    assert!(calculator.calls().is_empty());

    let stats = root.stats();
    assert_eq!(stats.faults_sent, 1);
    assert!(stats.bytes_sent < 1024);
}

/// Test: binding matches interface UUID and major version
#[tokio::test]
async fn test_bind_rules() {
    init_logging();

    let (root, _calculator) = start_calculator();
    let ctx = CallContext::new();

    let bound = root.bind(&ctx, REMUNKNOWN2_SYNTAX).await.unwrap();
    assert_eq!(bound.syntax(), Some(REMUNKNOWN2_SYNTAX));

    // plain IUnknown is not registered on its own
    let err = root.bind(&ctx, UNKNOWN_SYNTAX).await.err().unwrap();
    assert!(matches!(err, RpcError::BindFailed(_)));

    let err = root
        .bind(&ctx, SyntaxId::new(iid::IDISPATCH, 1, 0))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, RpcError::BindFailed(_)));

    // an unbound channel cannot carry calls
    let err = send_raw(&root, &mut RawCall::at(0)).await.unwrap_err();
    assert!(matches!(err, RpcError::NotBound));
}
