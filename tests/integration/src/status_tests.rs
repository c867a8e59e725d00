//! Status Tests - Call Outcomes Seen by the Client
//!
//! These tests cover how a call ends:
//! - A nonzero status comes back as an error that still carries the
//!   decoded response
//! - Methods a server does not override answer E_NOTIMPL
//! - Calls without an object identity fail before anything is sent
//! - Cancelled contexts stop a call
//! - Causality and object identity reach the handler

mod common;

use std::sync::Arc;

use common::*;
use dcerpc::{CallContext, LoopbackConn, RpcError};
use dcom::hresult::{DISP_E_BADPARAMCOUNT, DISP_E_MEMBERNOTFOUND, DISP_E_UNKNOWNNAME, E_NOTIMPL};
use dcom::idispatch::{
    register_dispatch_server, DispatchClient, GetIdsOfNamesRequest, GetTypeInfoCountRequest, GetTypeInfoRequest,
    InvokeRequest, UnimplementedDispatchServer,
};
use dcom::iunknown::{AddRefRequest, QueryInterfaceRequest, ReleaseRequest};
use dcom::oaut::Variant;
use dcom::remunknown::{RemReleaseRequest, RemUnknown2Client};
use dcom::{iid, RemInterfaceRef};

async fn dispatch_client(root: &LoopbackConn) -> DispatchClient {
    DispatchClient::bind(root, &CallContext::new())
        .await
        .unwrap()
        .with_ipid(calculator_ipid())
}

fn names(names: &[&str]) -> GetIdsOfNamesRequest {
    GetIdsOfNamesRequest {
        iid: iid::IID_NULL,
        names: names.iter().map(|n| n.to_string()).collect(),
        lcid: 0,
    }
}

/// Test: a failure status returns the response that came with it
#[tokio::test]
async fn test_failure_status_keeps_partial_response() {
    init_logging();

    let (root, _calculator) = start_calculator();
    let client = dispatch_client(&root).await;
    let ctx = CallContext::new();

    let err = client
        .get_ids_of_names(&ctx, names(&["Add", "Multiply", "negate"]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(DISP_E_UNKNOWNNAME));
    assert!(matches!(
        err.error,
        RpcError::Status {
            operation: "/IDispatch/v0/GetIDsOfNames",
            ..
        }
    ));
    let partial = err.partial.unwrap();
    assert_eq!(partial.disp_ids, vec![DISPID_ADD, -1, DISPID_NEGATE]);
    assert_eq!(partial.status, DISP_E_UNKNOWNNAME);
}

/// Test: a handler error still produces a decodable response
#[tokio::test]
async fn test_handler_error_carries_status() {
    init_logging();

    let (root, _calculator) = start_calculator();
    let client = dispatch_client(&root).await;
    let ctx = CallContext::new();

    let err = client.call_method(&ctx, 77, vec![Variant::from(1)]).await.unwrap_err();
    assert_eq!(err.status(), Some(DISP_E_MEMBERNOTFOUND));
    let partial = err.partial.unwrap();
    assert!(partial.result.is_empty());

    // by-reference slots keep their declared count on failure
    let req = InvokeRequest {
        disp_id: DISPID_ADD,
        params: dcom::oaut::DispParams::new(vec![Variant::from(1)]),
        var_ref_idx: vec![0, 1],
        var_ref: vec![Variant::from(1), Variant::from(2)],
        ..Default::default()
    };
    let err = client.invoke(&ctx, req).await.unwrap_err();
    assert_eq!(err.status(), Some(DISP_E_BADPARAMCOUNT));
    assert_eq!(err.partial.unwrap().var_ref, vec![Variant::Empty, Variant::Empty]);
}

/// Test: successful calls and AddRef/Release counts
#[tokio::test]
async fn test_success_and_reference_counts() {
    init_logging();

    let (root, calculator) = start_calculator();
    let client = dispatch_client(&root).await;
    let ctx = CallContext::new();

    let resp = client.call_method(&ctx, DISPID_NEGATE, vec![Variant::from(5)]).await.unwrap();
    assert_eq!(resp.result.as_i4(), Some(-5));
    assert_eq!(resp.status, 0);

    let unknown = client.unknown();
    assert_eq!(unknown.add_ref(&ctx, AddRefRequest).await.unwrap().ref_count, 2);
    assert_eq!(unknown.add_ref(&ctx, AddRefRequest).await.unwrap().ref_count, 3);
    assert_eq!(unknown.release(&ctx, ReleaseRequest).await.unwrap().ref_count, 2);
    assert_eq!(calculator.refs(), 2);

    let rem = RemUnknown2Client::bind(&root, &ctx).await.unwrap().with_ipid(calculator_ipid());
    let resp = rem
        .rem_unknown()
        .rem_release(
            &ctx,
            RemReleaseRequest {
                refs: vec![RemInterfaceRef::new(calculator_ipid(), 1, 0)],
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.status, 0);
    assert_eq!(calculator.refs(), 1);
}

/// Test: every method of a server that overrides nothing answers E_NOTIMPL
#[tokio::test]
async fn test_unimplemented_server() {
    init_logging();

    let root = LoopbackConn::new();
    register_dispatch_server(&root, Arc::new(UnimplementedDispatchServer));
    let client = dispatch_client(&root).await;
    let ctx = CallContext::new();

    let err = client
        .unknown()
        .query_interface(&ctx, QueryInterfaceRequest { iid: iid::IUNKNOWN })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(E_NOTIMPL));

    // AddRef and Release return a count, not a status: the failure code
    // arrives in the count slot
    let resp = client.unknown().add_ref(&ctx, AddRefRequest).await.unwrap();
    assert_eq!(resp.ref_count, E_NOTIMPL as u32);
    let resp = client.unknown().release(&ctx, ReleaseRequest).await.unwrap();
    assert_eq!(resp.ref_count, E_NOTIMPL as u32);

    assert_eq!(
        client.get_type_info_count(&ctx, GetTypeInfoCountRequest).await.unwrap_err().status(),
        Some(E_NOTIMPL)
    );
    assert_eq!(
        client
            .get_type_info(&ctx, GetTypeInfoRequest { index: 0, lcid: 0 })
            .await
            .unwrap_err()
            .status(),
        Some(E_NOTIMPL)
    );

    let err = client.get_ids_of_names(&ctx, names(&["a", "b"])).await.unwrap_err();
    assert_eq!(err.status(), Some(E_NOTIMPL));
    assert_eq!(err.partial.unwrap().disp_ids, vec![0, 0]);

    let err = client.call_method(&ctx, 1, Vec::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(E_NOTIMPL));

    // the server saw every call and failed each one
    let stats = root.stats();
    assert_eq!(stats.requests_received, 7);
    assert_eq!(stats.requests_failed, 7);
    assert_eq!(stats.faults_sent, 0);
}

/// Test: no IPID on the client or the context fails before any I/O
#[tokio::test]
async fn test_missing_identity() {
    init_logging();

    let (root, calculator) = start_calculator();
    let ctx = CallContext::new();
    let anonymous = DispatchClient::bind(&root, &ctx).await.unwrap();

    let err = anonymous.call_method(&ctx, DISPID_ADD, Vec::new()).await.unwrap_err();
    assert!(matches!(err.error, RpcError::MissingIdentity("/IDispatch/v0/Invoke")));
    assert!(err.partial.is_none());
    assert_eq!(err.status(), None);

    let err = anonymous.unknown().release(&ctx, ReleaseRequest).await.unwrap_err();
    assert!(matches!(err.error, RpcError::MissingIdentity("/IUnknown/v0/Release")));

    assert!(calculator.calls().is_empty());
    assert_eq!(root.stats().requests_received, 0);

    // an object named by the context is enough
    let target = calculator_ipid();
    let ctx = CallContext::new().with_object(target.0);
    anonymous.unknown().add_ref(&ctx, AddRefRequest).await.unwrap();
    assert_eq!(calculator.calls()[0].object, Some(target.0));
}

/// Test: causality and object identity travel with the call
#[tokio::test]
async fn test_call_identity_reaches_handler() {
    init_logging();

    let (root, calculator) = start_calculator();
    let ipid = calculator_ipid();
    let client = DispatchClient::bind(&root, &CallContext::new())
        .await
        .unwrap()
        .with_ipid(ipid);

    let first = CallContext::new();
    let second = CallContext::new();
    client.get_type_info_count(&first, GetTypeInfoCountRequest).await.unwrap();
    client.get_type_info_count(&second, GetTypeInfoCountRequest).await.unwrap();

    let calls = calculator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].causality, first.causality());
    assert_eq!(calls[1].causality, second.causality());
    assert_ne!(calls[0].causality, calls[1].causality);
    assert!(calls.iter().all(|c| c.object == Some(ipid.0)));
}

/// Test: a cancelled context stops the call before dispatch
#[tokio::test]
async fn test_cancelled_call() {
    init_logging();

    let (root, calculator) = start_calculator();
    let client = dispatch_client(&root).await;

    let ctx = CallContext::new();
    ctx.cancel();
    let err = client.call_method(&ctx, DISPID_ADD, vec![Variant::from(1), Variant::from(2)]).await.unwrap_err();
    assert!(matches!(err.error, RpcError::Cancelled));
    assert!(calculator.calls().is_empty());

    let err = DispatchClient::bind(&root, &ctx).await.unwrap_err();
    assert!(matches!(err, RpcError::Cancelled));
}
