//! Server-side helpers shared by the interface modules

use crate::types::Ipid;
use dcerpc::{CallContext, Result, RpcError};

/// IPID of the object a call is addressed to.
pub fn target_ipid(ctx: &CallContext, operation: &'static str) -> Result<Ipid> {
    ctx.object()
        .map(Ipid::from)
        .ok_or(RpcError::MissingIdentity(operation))
}
