//! IRemUnknown and IRemUnknown2 server side

use super::protocol::*;
use crate::iunknown::{unknown_dispatcher, UnknownServer};
use async_trait::async_trait;
use dcerpc::{CallContext, Conn, InterfaceDispatcher, Result, RpcError};
use std::sync::Arc;
use tracing::info;

/// IRemUnknown implementation (IUnknown methods come from the supertrait)
#[async_trait]
pub trait RemUnknownServer: UnknownServer {
    async fn rem_query_interface(
        &self,
        _ctx: CallContext,
        _req: RemQueryInterfaceRequest,
    ) -> Result<RemQueryInterfaceResponse> {
        Err(RpcError::NotImplemented(RemQueryInterfaceOp::NAME))
    }

    async fn rem_add_ref(&self, _ctx: CallContext, _req: RemAddRefRequest) -> Result<RemAddRefResponse> {
        Err(RpcError::NotImplemented(RemAddRefOp::NAME))
    }

    async fn rem_release(&self, _ctx: CallContext, _req: RemReleaseRequest) -> Result<RemReleaseResponse> {
        Err(RpcError::NotImplemented(RemReleaseOp::NAME))
    }
}

/// IRemUnknown2 implementation
#[async_trait]
pub trait RemUnknown2Server: RemUnknownServer {
    async fn rem_query_interface2(
        &self,
        _ctx: CallContext,
        _req: RemQueryInterface2Request,
    ) -> Result<RemQueryInterface2Response> {
        Err(RpcError::NotImplemented(RemQueryInterface2Op::NAME))
    }
}

/// IRemUnknown2 server with no methods implemented, usable at every level
/// of the chain
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedRemUnknownServer;

impl UnknownServer for UnimplementedRemUnknownServer {}
impl RemUnknownServer for UnimplementedRemUnknownServer {}
impl RemUnknown2Server for UnimplementedRemUnknownServer {}

/// Build the IRemUnknown dispatcher: opnums 3-5, IUnknown below.
pub fn rem_unknown_dispatcher<T: RemUnknownServer + 'static>(server: Arc<T>) -> InterfaceDispatcher {
    let base = Arc::new(unknown_dispatcher(Arc::clone(&server)));
    let qi = Arc::clone(&server);
    let add_ref = Arc::clone(&server);
    let release = server;
    InterfaceDispatcher::builder("IRemUnknown")
        .inherit(opnum::REM_QUERY_INTERFACE, base)
        .operation(move |ctx, req: RemQueryInterfaceRequest| {
            let server = Arc::clone(&qi);
            async move { server.rem_query_interface(ctx, req).await }
        })
        .operation(move |ctx, req: RemAddRefRequest| {
            let server = Arc::clone(&add_ref);
            async move { server.rem_add_ref(ctx, req).await }
        })
        .operation(move |ctx, req: RemReleaseRequest| {
            let server = Arc::clone(&release);
            async move { server.rem_release(ctx, req).await }
        })
        .build()
}

/// Build the IRemUnknown2 dispatcher: opnum 6, IRemUnknown below.
pub fn rem_unknown2_dispatcher<T: RemUnknown2Server + 'static>(server: Arc<T>) -> InterfaceDispatcher {
    let base = Arc::new(rem_unknown_dispatcher(Arc::clone(&server)));
    InterfaceDispatcher::builder("IRemUnknown2")
        .inherit(opnum2::REM_QUERY_INTERFACE2, base)
        .operation(move |ctx, req: RemQueryInterface2Request| {
            let server = Arc::clone(&server);
            async move { server.rem_query_interface2(ctx, req).await }
        })
        .build()
}

/// Register an IRemUnknown server on a channel.
pub fn register_rem_unknown_server<T: RemUnknownServer + 'static>(conn: &dyn Conn, server: Arc<T>) {
    info!("Registering IRemUnknown server");
    conn.register_server(REMUNKNOWN_SYNTAX, Arc::new(rem_unknown_dispatcher(server)));
}

/// Register an IRemUnknown2 server on a channel.
pub fn register_rem_unknown2_server<T: RemUnknown2Server + 'static>(conn: &dyn Conn, server: Arc<T>) {
    info!("Registering IRemUnknown2 server");
    conn.register_server(REMUNKNOWN2_SYNTAX, Arc::new(rem_unknown2_dispatcher(server)));
}
