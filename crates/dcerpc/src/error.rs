//! Error types for DCE RPC

use midl_ndr::NdrError;
use thiserror::Error;

/// RPC error types
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("NDR error: {0}")]
    Ndr(#[from] NdrError),

    #[error("interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("bind failed: {0}")]
    BindFailed(String),

    #[error("channel is not bound to an interface")]
    NotBound,

    #[error("fault: status 0x{0:08x}")]
    Fault(u32),

    #[error("stub too large: {size} bytes exceeds maximum {max}")]
    StubTooLarge { size: usize, max: usize },

    #[error("call cancelled")]
    Cancelled,

    /// No object identity was available for an object-bound call
    #[error("{0}: ipid is missing")]
    MissingIdentity(&'static str),

    /// The method has no implementation on this server
    #[error("{0}: not implemented")]
    NotImplemented(&'static str),

    /// The operation completed with a nonzero status
    #[error("{operation}: status 0x{status:08x}")]
    Status { operation: &'static str, status: i32 },
}

impl RpcError {
    /// Status code of a completed call that failed, if that is what this is.
    pub fn status(&self) -> Option<i32> {
        match self {
            RpcError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, RpcError::NotImplemented(_))
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
