//! DCE RPC server-side dispatch
//!
//! An [`InterfaceDispatcher`] owns the handler table of one interface. Its
//! handlers are registered by Operation type, so the opnum, the request
//! decoding and the response conversion all come from the type.
//!
//! Interface inheritance is composition: a derived interface's dispatcher
//! holds its base dispatcher and the first opnum it owns. Anything below that
//! boundary is forwarded to the base unchanged, recursively up the chain.
//!
//! ```text
//! IDispatch (3..=6) --opnum < 3--> IUnknown (0..=2)
//! ```

use crate::call_context::CallContext;
use crate::error::{Result, RpcError};
use crate::operation::{decode_request, error_status, Operation, Request, Response};
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use midl_ndr::NdrContext;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of dispatching one call
pub enum DispatchOutcome {
    /// The handler succeeded; the operation holds the response.
    Completed(Box<dyn Operation>),
    /// The handler failed. The operation carries the failure status and is
    /// still encoded so the status reaches the client.
    Failed {
        op: Box<dyn Operation>,
        error: RpcError,
    },
    /// No handler exists for the opnum.
    NoOperation,
}

impl fmt::Debug for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Completed(op) => f.debug_tuple("Completed").field(&op.name()).finish(),
            DispatchOutcome::Failed { op, error } => f
                .debug_struct("Failed")
                .field("op", &op.name())
                .field("error", error)
                .finish(),
            DispatchOutcome::NoOperation => f.write_str("NoOperation"),
        }
    }
}

/// Routes a call by opnum to a handler.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    fn name(&self) -> &str;

    /// Decode, run and collect one call.
    ///
    /// An error means the request could not be decoded; a handler failure is
    /// reported as [`DispatchOutcome::Failed`].
    async fn dispatch(
        &self,
        ctx: CallContext,
        opnum: u16,
        stub: Bytes,
        ndr: NdrContext,
    ) -> Result<DispatchOutcome>;
}

/// Handler glue for one opnum
pub type OperationHandler =
    Arc<dyn Fn(CallContext, Bytes, NdrContext) -> BoxFuture<'static, Result<DispatchOutcome>> + Send + Sync>;

/// Dispatcher for one interface, optionally derived from a base interface
pub struct InterfaceDispatcher {
    name: String,
    base: Option<(u16, Arc<dyn Dispatcher>)>,
    operations: HashMap<u16, OperationHandler>,
}

impl InterfaceDispatcher {
    pub fn builder(name: impl Into<String>) -> InterfaceDispatcherBuilder {
        InterfaceDispatcherBuilder {
            name: name.into(),
            base: None,
            operations: HashMap::new(),
        }
    }

    /// First opnum handled by this interface itself.
    pub fn first_own_opnum(&self) -> u16 {
        self.base.as_ref().map_or(0, |(boundary, _)| *boundary)
    }

    pub fn has_operation(&self, opnum: u16) -> bool {
        self.operations.contains_key(&opnum)
    }
}

#[async_trait]
impl Dispatcher for InterfaceDispatcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn dispatch(
        &self,
        ctx: CallContext,
        opnum: u16,
        stub: Bytes,
        ndr: NdrContext,
    ) -> Result<DispatchOutcome> {
        if let Some((boundary, base)) = &self.base {
            if opnum < *boundary {
                debug!("{}: forwarding opnum {} to {}", self.name, opnum, base.name());
                return base.dispatch(ctx, opnum, stub, ndr).await;
            }
        }

        let Some(handler) = self.operations.get(&opnum) else {
            warn!("{}: no operation for opnum {}", self.name, opnum);
            return Ok(DispatchOutcome::NoOperation);
        };
        handler(ctx, stub, ndr).await
    }
}

/// Builder for [`InterfaceDispatcher`]
pub struct InterfaceDispatcherBuilder {
    name: String,
    base: Option<(u16, Arc<dyn Dispatcher>)>,
    operations: HashMap<u16, OperationHandler>,
}

impl InterfaceDispatcherBuilder {
    /// Forward opnums below `first_own_opnum` to `base`.
    pub fn inherit(mut self, first_own_opnum: u16, base: Arc<dyn Dispatcher>) -> Self {
        self.base = Some((first_own_opnum, base));
        self
    }

    /// Register the handler for `Req::Op`.
    pub fn operation<Req, Resp, F, Fut>(mut self, handler: F) -> Self
    where
        Req: Request,
        Resp: Response<Op = Req::Op>,
        F: Fn(CallContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp>> + Send + 'static,
    {
        let opnum = Req::Op::default().opnum();
        let handler = Arc::new(handler);
        let glue: OperationHandler = Arc::new(move |ctx: CallContext, stub: Bytes, ndr: NdrContext| {
            let handler = Arc::clone(&handler);
            let call: BoxFuture<'static, Result<DispatchOutcome>> = Box::pin(async move {
                let mut op = Req::Op::default();
                decode_request(&mut op, stub, ndr)?;
                let req = Req::from_op(&mut op);
                match handler(ctx, req).await {
                    Ok(resp) => {
                        resp.into_op(&mut op);
                        Ok(DispatchOutcome::Completed(Box::new(op)))
                    }
                    Err(error) => {
                        op.set_status(error_status(&error));
                        Ok(DispatchOutcome::Failed {
                            op: Box::new(op),
                            error,
                        })
                    }
                }
            });
            call
        });
        self.operations.insert(opnum, glue);
        self
    }

    pub fn build(self) -> InterfaceDispatcher {
        InterfaceDispatcher {
            name: self.name,
            base: self.base,
            operations: self.operations,
        }
    }
}

/// Server statistics
#[derive(Debug, Default)]
pub struct ServerStats {
    pub requests_received: AtomicU64,
    pub requests_processed: AtomicU64,
    pub requests_failed: AtomicU64,
    pub faults_sent: AtomicU64,
    pub bytes_received: AtomicU64,
    pub bytes_sent: AtomicU64,
}

impl ServerStats {
    pub fn snapshot(&self) -> ServerStatsSnapshot {
        ServerStatsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            requests_processed: self.requests_processed.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            faults_sent: self.faults_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of server statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatsSnapshot {
    pub requests_received: u64,
    pub requests_processed: u64,
    pub requests_failed: u64,
    pub faults_sent: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}
