//! DCOM object client
//!
//! An [`ObjectClient`] is a bound channel plus the IPID of the object it
//! talks to. Every interface client wraps one; deriving a base interface's
//! client just shares it.

use crate::operation::OrpcOperation;
use crate::types::Ipid;
use dcerpc::{CallContext, CallResult, Conn, Operation, Request, Response, RpcError, SyntaxId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ObjectClient {
    conn: Arc<dyn Conn>,
    ipid: Option<Ipid>,
}

impl ObjectClient {
    /// Wrap a channel that is already bound to the interface.
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self { conn, ipid: None }
    }

    /// Bind `conn` to `syntax` and wrap the result.
    pub async fn bind(conn: &dyn Conn, ctx: &CallContext, syntax: SyntaxId) -> dcerpc::Result<Self> {
        let bound = conn.bind(ctx, syntax).await?;
        Ok(Self::new(bound))
    }

    /// Same channel, addressed to another object.
    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            ipid: Some(ipid),
        }
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    pub fn conn(&self) -> &Arc<dyn Conn> {
        &self.conn
    }

    /// Run one ORPC operation.
    ///
    /// The target IPID comes from the call context when it names an object,
    /// otherwise from this client. Without either the call fails before any
    /// I/O.
    pub async fn call<Resp>(&self, ctx: &CallContext, mut op: Resp::Op) -> CallResult<Resp>
    where
        Resp: Response,
        Resp::Op: OrpcOperation,
    {
        let Some(ipid) = ctx.object().map(Ipid::from).or(self.ipid) else {
            return Err(RpcError::MissingIdentity(op.name()).into());
        };
        op.this_mut().causality_id = ctx.causality();
        debug!("{} -> {}", op.name(), ipid);
        let ctx = ctx.clone().with_object(ipid.0);
        dcerpc::call(self.conn.as_ref(), &ctx, op).await
    }

    /// Move `req` into a fresh operation and run it.
    pub async fn invoke<Req, Resp>(&self, ctx: &CallContext, req: Req) -> CallResult<Resp>
    where
        Req: Request,
        Req::Op: OrpcOperation,
        Resp: Response<Op = Req::Op>,
    {
        let mut op = Req::Op::default();
        req.into_op(&mut op);
        self.call(ctx, op).await
    }
}

impl fmt::Debug for ObjectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectClient")
            .field("syntax", &self.conn.syntax())
            .field("ipid", &self.ipid)
            .finish()
    }
}
