//! In-process channel
//!
//! `LoopbackConn` carries calls between a client and servers registered on
//! the same channel without any network transport. Requests and responses
//! are still fully marshaled, so everything above the channel behaves as it
//! would over a real connection.
//!
//! Unbound handles come from [`LoopbackConn::new`]; [`Conn::bind`] returns a
//! handle bound to one registered interface. All handles made from the same
//! root share the server registry and statistics.

use crate::call_context::CallContext;
use crate::dcerpc::{FaultStatus, SyntaxId, Uuid};
use crate::dcerpc_server::{DispatchOutcome, Dispatcher, ServerStats, ServerStatsSnapshot};
use crate::dcerpc_transport::{Conn, ConnConfig};
use crate::error::{Result, RpcError};
use crate::operation::{decode_response, encode_request, encode_response, Operation};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct Registration {
    syntax: SyntaxId,
    dispatcher: Arc<dyn Dispatcher>,
}

#[derive(Default)]
struct Shared {
    servers: RwLock<HashMap<Uuid, Registration>>,
    stats: ServerStats,
}

#[derive(Clone)]
pub struct LoopbackConn {
    shared: Arc<Shared>,
    config: ConnConfig,
    syntax: Option<SyntaxId>,
}

impl LoopbackConn {
    pub fn new() -> Self {
        Self::with_config(ConnConfig::default())
    }

    pub fn with_config(config: ConnConfig) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            config,
            syntax: None,
        }
    }

    pub fn config(&self) -> &ConnConfig {
        &self.config
    }

    /// Get server statistics
    pub fn stats(&self) -> ServerStatsSnapshot {
        self.shared.stats.snapshot()
    }

    fn dispatcher(&self, syntax: &SyntaxId) -> Result<Arc<dyn Dispatcher>> {
        self.shared
            .servers
            .read()
            .get(&syntax.uuid)
            .map(|registration| Arc::clone(&registration.dispatcher))
            .ok_or_else(|| RpcError::InterfaceNotFound(syntax.to_string()))
    }

    /// Server half of a call: dispatch the request stub, return the response stub.
    async fn serve(&self, ctx: &CallContext, dispatcher: &dyn Dispatcher, opnum: u16, stub: Bytes) -> Result<Bytes> {
        let stats = &self.shared.stats;
        let ndr = self.config.ndr;
        stats.requests_received.fetch_add(1, Ordering::Relaxed);
        stats.bytes_received.fetch_add(stub.len() as u64, Ordering::Relaxed);

        let outcome = match dispatcher.dispatch(ctx.clone(), opnum, stub, ndr).await {
            Ok(outcome) => outcome,
            Err(RpcError::Ndr(e)) => {
                warn!("{}: cannot decode request for opnum {}: {}", dispatcher.name(), opnum, e);
                stats.requests_failed.fetch_add(1, Ordering::Relaxed);
                stats.faults_sent.fetch_add(1, Ordering::Relaxed);
                return Err(RpcError::Fault(FaultStatus::BadStubData.code()));
            }
            Err(e) => {
                stats.requests_failed.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let response = match outcome {
            DispatchOutcome::Completed(mut op) => {
                stats.requests_processed.fetch_add(1, Ordering::Relaxed);
                encode_response(&mut *op, ndr)?
            }
            DispatchOutcome::Failed { mut op, error } => {
                warn!("{} failed: {}", op.name(), error);
                stats.requests_failed.fetch_add(1, Ordering::Relaxed);
                encode_response(&mut *op, ndr)?
            }
            DispatchOutcome::NoOperation => {
                stats.requests_failed.fetch_add(1, Ordering::Relaxed);
                stats.faults_sent.fetch_add(1, Ordering::Relaxed);
                return Err(RpcError::Fault(FaultStatus::OpRngError.code()));
            }
        };

        if response.len() > self.config.max_stub_size {
            return Err(RpcError::StubTooLarge {
                size: response.len(),
                max: self.config.max_stub_size,
            });
        }
        stats.bytes_sent.fetch_add(response.len() as u64, Ordering::Relaxed);
        Ok(response)
    }
}

impl Default for LoopbackConn {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Conn for LoopbackConn {
    async fn bind(&self, ctx: &CallContext, syntax: SyntaxId) -> Result<Arc<dyn Conn>> {
        ctx.check_cancelled()?;
        let registered = self
            .shared
            .servers
            .read()
            .get(&syntax.uuid)
            .map(|registration| registration.syntax);

        match registered {
            Some(server) if server.major_version() == syntax.major_version() => {
                debug!("Bound to {}", syntax);
                Ok(Arc::new(Self {
                    shared: Arc::clone(&self.shared),
                    config: self.config.clone(),
                    syntax: Some(syntax),
                }))
            }
            Some(server) => Err(RpcError::BindFailed(format!(
                "{} requested, server offers {}",
                syntax, server
            ))),
            None => Err(RpcError::BindFailed(format!("no server for {}", syntax))),
        }
    }

    async fn invoke(&self, ctx: &CallContext, op: &mut dyn Operation) -> Result<()> {
        let syntax = self.syntax.ok_or(RpcError::NotBound)?;
        ctx.check_cancelled()?;

        let stub = encode_request(op, self.config.ndr)?;
        if stub.len() > self.config.max_stub_size {
            return Err(RpcError::StubTooLarge {
                size: stub.len(),
                max: self.config.max_stub_size,
            });
        }

        let dispatcher = self.dispatcher(&syntax)?;
        debug!(
            "Invoking {} (opnum {}, {} bytes) on {}",
            op.name(),
            op.opnum(),
            stub.len(),
            dispatcher.name()
        );
        let response = self.serve(ctx, &*dispatcher, op.opnum(), stub).await?;

        ctx.check_cancelled()?;
        decode_response(op, response, self.config.ndr)
    }

    fn register_server(&self, syntax: SyntaxId, dispatcher: Arc<dyn Dispatcher>) {
        info!("Registering interface: {} ({})", syntax, dispatcher.name());
        self.shared
            .servers
            .write()
            .insert(syntax.uuid, Registration { syntax, dispatcher });
    }

    fn syntax(&self) -> Option<SyntaxId> {
        self.syntax
    }
}
