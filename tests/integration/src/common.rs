//! Shared test infrastructure: logging, a sample object and counters.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use dcerpc::{CallContext, LoopbackConn, Result, RpcError, Uuid};
use dcom::hresult::{DISP_E_BADPARAMCOUNT, DISP_E_MEMBERNOTFOUND, DISP_E_UNKNOWNNAME, E_NOINTERFACE};
use dcom::idispatch::{
    register_dispatch_server, DispatchServer, GetIdsOfNamesRequest, GetIdsOfNamesResponse, GetTypeInfoCountRequest,
    GetTypeInfoCountResponse, InvokeOp, InvokeRequest, InvokeResponse,
};
use dcom::iunknown::{
    AddRefRequest, AddRefResponse, QueryInterfaceRequest, QueryInterfaceResponse, ReleaseRequest, ReleaseResponse,
    UnknownServer,
};
use dcom::oaut::Variant;
use dcom::remunknown::{
    register_rem_unknown2_server, RemAddRefRequest, RemAddRefResponse, RemReleaseRequest, RemReleaseResponse,
    RemUnknown2Server, RemUnknownServer,
};
use dcom::{iid, target_ipid, InterfacePointer, Ipid};
use parking_lot::Mutex;
use tracing::info;

static INIT: Once = Once::new();

/// Initialize test logging once per test binary; `RUST_LOG` overrides the
/// default `warn` level.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Marshaled interface pointers start with the OBJREF signature "MEOW".
pub const OBJREF_SIGNATURE: [u8; 4] = *b"MEOW";

/// DISPID of `Add(a, b)`
pub const DISPID_ADD: i32 = 1;
/// DISPID of `Negate(a)`
pub const DISPID_NEGATE: i32 = 2;

/// Calculator object exposing IUnknown, IRemUnknown2 and IDispatch.
///
/// IRemUnknown2's own method (RemQueryInterface2) is left unimplemented.
#[derive(Debug)]
pub struct Calculator {
    refs: AtomicU32,
    calls: Mutex<Vec<CallRecord>>,
}

/// One handled call as seen by the server
#[derive(Clone, Debug, PartialEq)]
pub struct CallRecord {
    pub method: &'static str,
    pub object: Option<Uuid>,
    pub causality: Uuid,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            refs: AtomicU32::new(1),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn refs(&self) -> u32 {
        self.refs.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().clone()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|c| c.method).collect()
    }

    fn record(&self, method: &'static str, ctx: &CallContext) {
        self.calls.lock().push(CallRecord {
            method,
            object: ctx.object(),
            causality: ctx.causality(),
        });
    }
}

#[async_trait]
impl UnknownServer for Calculator {
    async fn query_interface(&self, ctx: CallContext, req: QueryInterfaceRequest) -> Result<QueryInterfaceResponse> {
        self.record("QueryInterface", &ctx);
        if req.iid == iid::IDISPATCH || req.iid == iid::IUNKNOWN {
            self.refs.fetch_add(1, Ordering::SeqCst);
            return Ok(QueryInterfaceResponse {
                object: Some(InterfacePointer::new(OBJREF_SIGNATURE.to_vec())),
                status: 0,
            });
        }
        Ok(QueryInterfaceResponse {
            object: None,
            status: E_NOINTERFACE,
        })
    }

    async fn add_ref(&self, ctx: CallContext, _req: AddRefRequest) -> Result<AddRefResponse> {
        self.record("AddRef", &ctx);
        let ref_count = self.refs.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AddRefResponse { ref_count })
    }

    async fn release(&self, ctx: CallContext, _req: ReleaseRequest) -> Result<ReleaseResponse> {
        self.record("Release", &ctx);
        let ref_count = self.refs.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        Ok(ReleaseResponse { ref_count })
    }
}

#[async_trait]
impl RemUnknownServer for Calculator {
    async fn rem_add_ref(&self, ctx: CallContext, req: RemAddRefRequest) -> Result<RemAddRefResponse> {
        self.record("RemAddRef", &ctx);
        let results = req
            .refs
            .iter()
            .map(|r| {
                if r.ipid.is_nil() {
                    E_NOINTERFACE
                } else {
                    self.refs.fetch_add(r.public_refs, Ordering::SeqCst);
                    0
                }
            })
            .collect::<Vec<_>>();
        let status = results.iter().copied().find(|s| *s != 0).unwrap_or(0);
        Ok(RemAddRefResponse { results, status })
    }

    async fn rem_release(&self, ctx: CallContext, req: RemReleaseRequest) -> Result<RemReleaseResponse> {
        self.record("RemRelease", &ctx);
        for r in &req.refs {
            self.refs.fetch_sub(r.public_refs, Ordering::SeqCst);
        }
        Ok(RemReleaseResponse { status: 0 })
    }
}

impl RemUnknown2Server for Calculator {}

#[async_trait]
impl DispatchServer for Calculator {
    async fn get_type_info_count(
        &self,
        ctx: CallContext,
        _req: GetTypeInfoCountRequest,
    ) -> Result<GetTypeInfoCountResponse> {
        self.record("GetTypeInfoCount", &ctx);
        Ok(GetTypeInfoCountResponse { count: 0, status: 0 })
    }

    async fn get_ids_of_names(&self, ctx: CallContext, req: GetIdsOfNamesRequest) -> Result<GetIdsOfNamesResponse> {
        self.record("GetIDsOfNames", &ctx);
        let disp_ids = req
            .names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "add" => DISPID_ADD,
                "negate" => DISPID_NEGATE,
                _ => -1,
            })
            .collect::<Vec<_>>();
        let status = if disp_ids.contains(&-1) { DISP_E_UNKNOWNNAME } else { 0 };
        Ok(GetIdsOfNamesResponse { disp_ids, status })
    }

    async fn invoke(&self, ctx: CallContext, req: InvokeRequest) -> Result<InvokeResponse> {
        self.record("Invoke", &ctx);
        target_ipid(&ctx, InvokeOp::NAME)?;
        // arguments arrive last-to-first
        let args = req.params.args.iter().rev().map(Variant::as_i4).collect::<Option<Vec<_>>>();
        let result = match (req.disp_id, args.as_deref()) {
            (DISPID_ADD, Some([a, b])) => Variant::I4(a.wrapping_add(*b)),
            (DISPID_NEGATE, Some([a])) => Variant::I4(a.wrapping_neg()),
            (DISPID_ADD | DISPID_NEGATE, _) => {
                return Ok(InvokeResponse {
                    status: DISP_E_BADPARAMCOUNT,
                    ..Default::default()
                })
            }
            _ => {
                return Err(RpcError::Status {
                    operation: "Calculator::invoke",
                    status: DISP_E_MEMBERNOTFOUND,
                })
            }
        };
        Ok(InvokeResponse {
            result,
            ..Default::default()
        })
    }
}

/// A loopback channel with the calculator registered under IRemUnknown2
/// and IDispatch.
pub fn start_calculator() -> (LoopbackConn, Arc<Calculator>) {
    let root = LoopbackConn::new();
    let calculator = Arc::new(Calculator::new());
    register_rem_unknown2_server(&root, Arc::clone(&calculator));
    register_dispatch_server(&root, Arc::clone(&calculator));
    info!("Calculator registered");
    (root, calculator)
}

/// A fresh object identity for the calculator.
pub fn calculator_ipid() -> Ipid {
    Ipid::generate()
}

/// Counters shared by concurrent test clients
#[derive(Debug, Default)]
pub struct ConcurrentStats {
    pub successes: AtomicUsize,
    pub failures: AtomicUsize,
}

impl ConcurrentStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self, elapsed: Duration) -> String {
        let ok = self.successes.load(Ordering::Relaxed);
        let failed = self.failures.load(Ordering::Relaxed);
        let rate = ok as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        format!("{} ok, {} failed, {:.0} calls/s", ok, failed, rate)
    }
}
