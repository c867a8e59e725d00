//! Stress Tests - Concurrent Calls on Shared Channels
//!
//! These tests exercise races in dispatch and marshaling by:
//! - Running many concurrent clients against one object
//! - Mixing interfaces that share a base dispatcher
//! - Checking every result and the server counters afterwards

mod common;

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Barrier;

use common::*;
use dcerpc::CallContext;
use dcom::idispatch::DispatchClient;
use dcom::iunknown::AddRefRequest;
use dcom::oaut::Variant;
use dcom::remunknown::{RemAddRefRequest, RemUnknown2Client};
use dcom::RemInterfaceRef;

/// Test: many clients calling Invoke at once all get their own answer
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_invoke() {
    init_logging();

    const NUM_CLIENTS: usize = 32;
    const CALLS_PER_CLIENT: usize = 50;

    let (root, calculator) = start_calculator();
    let client = DispatchClient::bind(&root, &CallContext::new())
        .await
        .unwrap()
        .with_ipid(calculator_ipid());

    let stats = Arc::new(ConcurrentStats::new());
    let barrier = Arc::new(Barrier::new(NUM_CLIENTS));
    let start = Instant::now();

    let mut handles = Vec::new();
    for client_id in 0..NUM_CLIENTS {
        let client = client.clone();
        let stats = Arc::clone(&stats);
        let barrier = Arc::clone(&barrier);

        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            for call in 0..CALLS_PER_CLIENT {
                let a = (client_id * 1000 + call) as i32;
                let ctx = CallContext::new();
                match client
                    .call_method(&ctx, DISPID_ADD, vec![Variant::from(a), Variant::from(7)])
                    .await
                {
                    Ok(resp) if resp.result == Variant::I4(a + 7) => stats.record_success(),
                    Ok(resp) => {
                        eprintln!("Client {} call {}: wrong result {:?}", client_id, call, resp.result);
                        stats.record_failure();
                    }
                    Err(e) => {
                        eprintln!("Client {} call {}: {}", client_id, call, e);
                        stats.record_failure();
                    }
                }
            }
        }));
    }

    for result in join_all(handles).await {
        result.unwrap();
    }

    println!("Concurrent invoke: {}", stats.summary(start.elapsed()));
    let total = NUM_CLIENTS * CALLS_PER_CLIENT;
    assert_eq!(stats.successes.load(std::sync::atomic::Ordering::Relaxed), total);
    assert_eq!(calculator.calls().len(), total);

    let server = root.stats();
    assert_eq!(server.requests_received, total as u64);
    assert_eq!(server.requests_processed, total as u64);
    assert_eq!(server.requests_failed, 0);
}

/// Test: reference counting through two interfaces stays consistent under
/// concurrency
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reference_counting() {
    init_logging();

    const TASKS: usize = 16;
    const ROUNDS: usize = 25;

    let (root, calculator) = start_calculator();
    let ctx = CallContext::new();
    let ipid = calculator_ipid();
    let dispatch = DispatchClient::bind(&root, &ctx).await.unwrap().with_ipid(ipid);
    let rem = RemUnknown2Client::bind(&root, &ctx).await.unwrap().with_ipid(ipid);

    let futures = (0..TASKS).map(|task| {
        let dispatch = dispatch.clone();
        let rem = rem.clone();
        async move {
            for _ in 0..ROUNDS {
                let ctx = CallContext::new();
                if task % 2 == 0 {
                    dispatch.unknown().add_ref(&ctx, AddRefRequest).await.unwrap();
                } else {
                    let req = RemAddRefRequest {
                        refs: vec![RemInterfaceRef::new(ipid, 2, 0)],
                    };
                    let resp = rem.rem_unknown().rem_add_ref(&ctx, req).await.unwrap();
                    assert_eq!(resp.results, vec![0]);
                }
            }
        }
    });
    join_all(futures).await;

    // one initial reference, +1 per AddRef, +2 per RemAddRef
    let expected = 1 + (TASKS / 2 * ROUNDS) as u32 + (TASKS / 2 * ROUNDS * 2) as u32;
    assert_eq!(calculator.refs(), expected);
}
