//! IUnknown client

use super::protocol::*;
use crate::client::ObjectClient;
use crate::types::Ipid;
use dcerpc::{CallContext, CallResult, Conn};

#[derive(Clone, Debug)]
pub struct UnknownClient {
    object: ObjectClient,
}

impl UnknownClient {
    pub fn new(object: ObjectClient) -> Self {
        Self { object }
    }

    /// Bind a channel to IUnknown.
    pub async fn bind(conn: &dyn Conn, ctx: &CallContext) -> dcerpc::Result<Self> {
        Ok(Self::new(ObjectClient::bind(conn, ctx, UNKNOWN_SYNTAX).await?))
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self::new(self.object.with_ipid(ipid))
    }

    pub fn object(&self) -> &ObjectClient {
        &self.object
    }

    pub async fn query_interface(&self, ctx: &CallContext, req: QueryInterfaceRequest) -> CallResult<QueryInterfaceResponse> {
        self.object.invoke(ctx, req).await
    }

    pub async fn add_ref(&self, ctx: &CallContext, req: AddRefRequest) -> CallResult<AddRefResponse> {
        self.object.invoke(ctx, req).await
    }

    pub async fn release(&self, ctx: &CallContext, req: ReleaseRequest) -> CallResult<ReleaseResponse> {
        self.object.invoke(ctx, req).await
    }
}
