//! IRemUnknown and IRemUnknown2 clients

use super::protocol::*;
use crate::client::ObjectClient;
use crate::iunknown::UnknownClient;
use crate::types::{Ipid, RemInterfaceRef};
use dcerpc::{CallContext, CallResult, Conn};

#[derive(Clone, Debug)]
pub struct RemUnknownClient {
    object: ObjectClient,
}

impl RemUnknownClient {
    pub fn new(object: ObjectClient) -> Self {
        Self { object }
    }

    /// Bind a channel to IRemUnknown.
    pub async fn bind(conn: &dyn Conn, ctx: &CallContext) -> dcerpc::Result<Self> {
        Ok(Self::new(ObjectClient::bind(conn, ctx, REMUNKNOWN_SYNTAX).await?))
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self::new(self.object.with_ipid(ipid))
    }

    /// IUnknown methods of the same object
    pub fn unknown(&self) -> UnknownClient {
        UnknownClient::new(self.object.clone())
    }

    pub async fn rem_query_interface(
        &self,
        ctx: &CallContext,
        req: RemQueryInterfaceRequest,
    ) -> CallResult<RemQueryInterfaceResponse> {
        self.object.invoke(ctx, req).await
    }

    pub async fn rem_add_ref(&self, ctx: &CallContext, req: RemAddRefRequest) -> CallResult<RemAddRefResponse> {
        self.object.invoke(ctx, req).await
    }

    pub async fn rem_release(&self, ctx: &CallContext, req: RemReleaseRequest) -> CallResult<RemReleaseResponse> {
        self.object.invoke(ctx, req).await
    }

    /// Release public references held on one interface.
    pub async fn release_single_ref(&self, ctx: &CallContext, ipid: Ipid, public_refs: u32) -> CallResult<RemReleaseResponse> {
        let refs = vec![RemInterfaceRef::new(ipid, public_refs, 0)];
        self.rem_release(ctx, RemReleaseRequest { refs }).await
    }
}

#[derive(Clone, Debug)]
pub struct RemUnknown2Client {
    object: ObjectClient,
}

impl RemUnknown2Client {
    pub fn new(object: ObjectClient) -> Self {
        Self { object }
    }

    /// Bind a channel to IRemUnknown2.
    pub async fn bind(conn: &dyn Conn, ctx: &CallContext) -> dcerpc::Result<Self> {
        Ok(Self::new(ObjectClient::bind(conn, ctx, REMUNKNOWN2_SYNTAX).await?))
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self::new(self.object.with_ipid(ipid))
    }

    /// IRemUnknown methods of the same object
    pub fn rem_unknown(&self) -> RemUnknownClient {
        RemUnknownClient::new(self.object.clone())
    }

    pub async fn rem_query_interface2(
        &self,
        ctx: &CallContext,
        req: RemQueryInterface2Request,
    ) -> CallResult<RemQueryInterface2Response> {
        self.object.invoke(ctx, req).await
    }
}
