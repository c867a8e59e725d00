//! IDispatch client

use super::protocol::*;
use crate::client::ObjectClient;
use crate::iunknown::UnknownClient;
use crate::oaut::{DispParams, Variant};
use crate::types::{iid, Ipid};
use dcerpc::{CallContext, CallResult, Conn};

#[derive(Clone, Debug)]
pub struct DispatchClient {
    object: ObjectClient,
}

impl DispatchClient {
    pub fn new(object: ObjectClient) -> Self {
        Self { object }
    }

    /// Bind a channel to IDispatch.
    pub async fn bind(conn: &dyn Conn, ctx: &CallContext) -> dcerpc::Result<Self> {
        Ok(Self::new(ObjectClient::bind(conn, ctx, DISPATCH_SYNTAX).await?))
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self::new(self.object.with_ipid(ipid))
    }

    /// IUnknown methods of the same object
    pub fn unknown(&self) -> UnknownClient {
        UnknownClient::new(self.object.clone())
    }

    pub async fn get_type_info_count(
        &self,
        ctx: &CallContext,
        req: GetTypeInfoCountRequest,
    ) -> CallResult<GetTypeInfoCountResponse> {
        self.object.invoke(ctx, req).await
    }

    pub async fn get_type_info(&self, ctx: &CallContext, req: GetTypeInfoRequest) -> CallResult<GetTypeInfoResponse> {
        self.object.invoke(ctx, req).await
    }

    pub async fn get_ids_of_names(
        &self,
        ctx: &CallContext,
        req: GetIdsOfNamesRequest,
    ) -> CallResult<GetIdsOfNamesResponse> {
        self.object.invoke(ctx, req).await
    }

    pub async fn invoke(&self, ctx: &CallContext, req: InvokeRequest) -> CallResult<InvokeResponse> {
        self.object.invoke(ctx, req).await
    }

    /// Call a method by DISPID with positional arguments.
    ///
    /// `args` are given in call order; they are reversed for the wire.
    pub async fn call_method(&self, ctx: &CallContext, disp_id: i32, args: Vec<Variant>) -> CallResult<InvokeResponse> {
        let mut args = args;
        args.reverse();
        let req = InvokeRequest {
            disp_id,
            iid: iid::IID_NULL,
            flags: dispatch_flags::DISPATCH_METHOD,
            params: DispParams::new(args),
            ..Default::default()
        };
        self.invoke(ctx, req).await
    }
}
