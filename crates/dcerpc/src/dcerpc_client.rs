//! DCE RPC client stub
//!
//! One call is one round trip: the request is moved into a fresh operation,
//! the channel runs it, and the decoded response is handed back. A nonzero
//! status is an error, but the response that came with it is still returned
//! in [`CallError::partial`]. Nothing is retried.

use crate::call_context::CallContext;
use crate::dcerpc_transport::Conn;
use crate::error::RpcError;
use crate::operation::{Operation, Request, Response};
use std::fmt;
use tracing::debug;

/// Failed call, with whatever response data was decoded
pub struct CallError<T> {
    pub error: RpcError,
    pub partial: Option<T>,
}

impl<T> CallError<T> {
    pub fn new(error: RpcError) -> Self {
        Self {
            error,
            partial: None,
        }
    }

    /// Status of the call, when it completed with a failure status.
    pub fn status(&self) -> Option<i32> {
        self.error.status()
    }

    pub fn into_error(self) -> RpcError {
        self.error
    }
}

impl<T> fmt::Debug for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallError")
            .field("error", &self.error)
            .field("partial", &self.partial.is_some())
            .finish()
    }
}

impl<T> fmt::Display for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T> std::error::Error for CallError<T> {}

impl<T> From<RpcError> for CallError<T> {
    fn from(error: RpcError) -> Self {
        Self::new(error)
    }
}

impl<T> From<CallError<T>> for RpcError {
    fn from(error: CallError<T>) -> Self {
        error.error
    }
}

pub type CallResult<T> = std::result::Result<T, CallError<T>>;

/// Run a prepared operation and convert its result.
pub async fn call<Resp: Response>(conn: &dyn Conn, ctx: &CallContext, mut op: Resp::Op) -> CallResult<Resp> {
    debug!("Calling {} (opnum {})", op.name(), op.opnum());
    conn.invoke(ctx, &mut op).await?;

    let operation = op.name();
    let status = op.status();
    let response = Resp::from_op(&mut op);
    if status != 0 {
        debug!("{} returned status 0x{:08x}", operation, status);
        return Err(CallError {
            error: RpcError::Status { operation, status },
            partial: Some(response),
        });
    }
    Ok(response)
}

/// Move `req` into a fresh operation and run it.
pub async fn invoke<Req, Resp>(conn: &dyn Conn, ctx: &CallContext, req: Req) -> CallResult<Resp>
where
    Req: Request,
    Resp: Response<Op = Req::Op>,
{
    let mut op = Req::Op::default();
    req.into_op(&mut op);
    call(conn, ctx, op).await
}
