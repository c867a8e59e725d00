//! Call-scoped context
//!
//! A [`CallContext`] travels with one logical call through the client stub,
//! the channel and the server handler. Clones share the cancellation flag,
//! so cancelling any clone cancels the call.

use crate::dcerpc::Uuid;
use crate::error::{Result, RpcError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Generate a random (version 4) UUID
pub fn new_uuid() -> Uuid {
    Uuid::from_bytes_be(*uuid::Uuid::new_v4().as_bytes())
}

#[derive(Debug, Clone)]
pub struct CallContext {
    causality: Uuid,
    object: Option<Uuid>,
    cancelled: Arc<AtomicBool>,
}

impl CallContext {
    pub fn new() -> Self {
        Self {
            causality: new_uuid(),
            object: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Identifier shared by every call made on behalf of one logical activity.
    pub fn causality(&self) -> Uuid {
        self.causality
    }

    /// Object the call is addressed to.
    pub fn object(&self) -> Option<Uuid> {
        self.object
    }

    pub fn with_object(mut self, object: Uuid) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_causality(mut self, causality: Uuid) -> Self {
        self.causality = causality;
        self
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`RpcError::Cancelled`] once the call has been cancelled.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(RpcError::Cancelled);
        }
        Ok(())
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}
