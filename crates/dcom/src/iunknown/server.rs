//! IUnknown server side

use super::protocol::*;
use async_trait::async_trait;
use dcerpc::{CallContext, Conn, InterfaceDispatcher, Result, RpcError};
use std::sync::Arc;
use tracing::info;

/// IUnknown implementation
///
/// Every method defaults to `NotImplemented`, which reaches the client as
/// `E_NOTIMPL`.
#[async_trait]
pub trait UnknownServer: Send + Sync {
    async fn query_interface(&self, _ctx: CallContext, _req: QueryInterfaceRequest) -> Result<QueryInterfaceResponse> {
        Err(RpcError::NotImplemented(QueryInterfaceOp::NAME))
    }

    async fn add_ref(&self, _ctx: CallContext, _req: AddRefRequest) -> Result<AddRefResponse> {
        Err(RpcError::NotImplemented(AddRefOp::NAME))
    }

    async fn release(&self, _ctx: CallContext, _req: ReleaseRequest) -> Result<ReleaseResponse> {
        Err(RpcError::NotImplemented(ReleaseOp::NAME))
    }
}

/// IUnknown server with no methods implemented
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedUnknownServer;

impl UnknownServer for UnimplementedUnknownServer {}

/// Build the IUnknown dispatcher (opnums 0-2).
pub fn unknown_dispatcher<T: UnknownServer + 'static>(server: Arc<T>) -> InterfaceDispatcher {
    let qi = Arc::clone(&server);
    let add_ref = Arc::clone(&server);
    let release = server;
    InterfaceDispatcher::builder("IUnknown")
        .operation(move |ctx, req: QueryInterfaceRequest| {
            let server = Arc::clone(&qi);
            async move { server.query_interface(ctx, req).await }
        })
        .operation(move |ctx, req: AddRefRequest| {
            let server = Arc::clone(&add_ref);
            async move { server.add_ref(ctx, req).await }
        })
        .operation(move |ctx, req: ReleaseRequest| {
            let server = Arc::clone(&release);
            async move { server.release(ctx, req).await }
        })
        .build()
}

/// Register an IUnknown server on a channel.
pub fn register_unknown_server<T: UnknownServer + 'static>(conn: &dyn Conn, server: Arc<T>) {
    info!("Registering IUnknown server");
    conn.register_server(UNKNOWN_SYNTAX, Arc::new(unknown_dispatcher(server)));
}
