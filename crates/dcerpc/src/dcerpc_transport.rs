//! DCE RPC channel abstraction
//!
//! A [`Conn`] is what the operation layer needs from a transport: binding to
//! an interface, invoking an operation on the bound interface and accepting
//! server registrations. Connection establishment and authentication happen
//! below it.

use crate::call_context::CallContext;
use crate::dcerpc::SyntaxId;
use crate::dcerpc_server::Dispatcher;
use crate::error::Result;
use crate::operation::Operation;
use async_trait::async_trait;
use midl_ndr::NdrContext;
use std::sync::Arc;

/// Maximum stub size (4 MB default)
pub const DEFAULT_MAX_STUB_SIZE: usize = 4 * 1024 * 1024;

#[async_trait]
pub trait Conn: Send + Sync {
    /// Bind a channel for the given abstract syntax.
    async fn bind(&self, ctx: &CallContext, syntax: SyntaxId) -> Result<Arc<dyn Conn>>;

    /// Run one call: send the request half of `op`, fill in its response half.
    async fn invoke(&self, ctx: &CallContext, op: &mut dyn Operation) -> Result<()>;

    /// Route calls for `syntax` to `dispatcher`.
    fn register_server(&self, syntax: SyntaxId, dispatcher: Arc<dyn Dispatcher>);

    /// Syntax this channel is bound to.
    fn syntax(&self) -> Option<SyntaxId>;
}

/// Channel configuration
#[derive(Debug, Clone)]
pub struct ConnConfig {
    /// Data representation for stubs sent on this channel
    pub ndr: NdrContext,
    /// Largest request or response stub accepted
    pub max_stub_size: usize,
}

impl ConnConfig {
    pub fn with_ndr(mut self, ndr: NdrContext) -> Self {
        self.ndr = ndr;
        self
    }

    pub fn with_max_stub_size(mut self, max_size: usize) -> Self {
        self.max_stub_size = max_size;
        self
    }
}

impl Default for ConnConfig {
    fn default() -> Self {
        Self {
            ndr: NdrContext::new(),
            max_stub_size: DEFAULT_MAX_STUB_SIZE,
        }
    }
}
