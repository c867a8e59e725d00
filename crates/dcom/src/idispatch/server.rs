//! IDispatch server side

use super::protocol::*;
use crate::iunknown::{unknown_dispatcher, UnknownServer};
use async_trait::async_trait;
use dcerpc::{CallContext, Conn, InterfaceDispatcher, Result, RpcError};
use std::sync::Arc;
use tracing::info;

/// IDispatch implementation (IUnknown methods come from the supertrait)
#[async_trait]
pub trait DispatchServer: UnknownServer {
    async fn get_type_info_count(
        &self,
        _ctx: CallContext,
        _req: GetTypeInfoCountRequest,
    ) -> Result<GetTypeInfoCountResponse> {
        Err(RpcError::NotImplemented(GetTypeInfoCountOp::NAME))
    }

    async fn get_type_info(&self, _ctx: CallContext, _req: GetTypeInfoRequest) -> Result<GetTypeInfoResponse> {
        Err(RpcError::NotImplemented(GetTypeInfoOp::NAME))
    }

    async fn get_ids_of_names(&self, _ctx: CallContext, _req: GetIdsOfNamesRequest) -> Result<GetIdsOfNamesResponse> {
        Err(RpcError::NotImplemented(GetIdsOfNamesOp::NAME))
    }

    async fn invoke(&self, _ctx: CallContext, _req: InvokeRequest) -> Result<InvokeResponse> {
        Err(RpcError::NotImplemented(InvokeOp::NAME))
    }
}

/// IDispatch server with no methods implemented
#[derive(Clone, Copy, Debug, Default)]
pub struct UnimplementedDispatchServer;

impl UnknownServer for UnimplementedDispatchServer {}
impl DispatchServer for UnimplementedDispatchServer {}

/// Build the IDispatch dispatcher: opnums 3-6, IUnknown below.
pub fn dispatch_dispatcher<T: DispatchServer + 'static>(server: Arc<T>) -> InterfaceDispatcher {
    let base = Arc::new(unknown_dispatcher(Arc::clone(&server)));
    let count = Arc::clone(&server);
    let type_info = Arc::clone(&server);
    let names = Arc::clone(&server);
    let invoke = server;
    InterfaceDispatcher::builder("IDispatch")
        .inherit(opnum::GET_TYPE_INFO_COUNT, base)
        .operation(move |ctx, req: GetTypeInfoCountRequest| {
            let server = Arc::clone(&count);
            async move { server.get_type_info_count(ctx, req).await }
        })
        .operation(move |ctx, req: GetTypeInfoRequest| {
            let server = Arc::clone(&type_info);
            async move { server.get_type_info(ctx, req).await }
        })
        .operation(move |ctx, req: GetIdsOfNamesRequest| {
            let server = Arc::clone(&names);
            async move { server.get_ids_of_names(ctx, req).await }
        })
        .operation(move |ctx, req: InvokeRequest| {
            let server = Arc::clone(&invoke);
            async move { server.invoke(ctx, req).await }
        })
        .build()
}

/// Register an IDispatch server on a channel.
pub fn register_dispatch_server<T: DispatchServer + 'static>(conn: &dyn Conn, server: Arc<T>) {
    info!("Registering IDispatch server");
    conn.register_server(DISPATCH_SYNTAX, Arc::new(dispatch_dispatcher(server)));
}
