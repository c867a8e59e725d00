//! DCE RPC (MS-RPC) operation layer
//!
//! This crate turns a remote interface method into NDR stub data and back,
//! and routes an incoming call by opnum to the right handler across a chain
//! of inherited interfaces.
//!
//! # Architecture
//!
//! ```text
//! client                                     server
//! ------                                     ------
//! Request --into_op--> Operation             InterfaceDispatcher
//!                        | encode_request       | opnum < boundary -> base
//!                        v                      | own table -> handler
//!                      Conn::invoke ---stub---> | decode_request
//!                        ^                      | Request -> handler -> Response
//!                        | decode_response      | encode_response
//! Response <-from_op-- Operation <----stub------+
//! ```
//!
//! - [`Operation`]: one type per method; marshals its request and response
//!   halves independently
//! - [`Request`] / [`Response`]: call-site views of an operation
//! - [`call`] / [`invoke`]: the generic client stub
//! - [`InterfaceDispatcher`]: opnum routing with base interface delegation
//! - [`Conn`]: the channel below the stubs; [`LoopbackConn`] is an in-process
//!   implementation
//!
//! # Example
//!
//! ```
//! use dcerpc::{CallContext, Conn, InterfaceDispatcher, LoopbackConn, SyntaxId, Uuid};
//! use std::sync::Arc;
//!
//! # async fn run() -> dcerpc::Result<()> {
//! let root = LoopbackConn::new();
//! let syntax = SyntaxId::new(Uuid::parse("12345678-1234-1234-1234-123456789012").unwrap(), 1, 0);
//! root.register_server(syntax, Arc::new(InterfaceDispatcher::builder("IExample").build()));
//!
//! let conn = root.bind(&CallContext::new(), syntax).await?;
//! assert_eq!(conn.syntax(), Some(syntax));
//! # Ok(())
//! # }
//! ```

pub mod error;

pub mod call_context;
pub mod dcerpc;
pub mod dcerpc_client;
pub mod dcerpc_server;
pub mod dcerpc_transport;
pub mod loopback_transport;
pub mod operation;

// Re-export error types
pub use error::{Result, RpcError};

pub use call_context::{new_uuid, CallContext};
pub use dcerpc::{FaultStatus, SyntaxId, Uuid, NDR_SYNTAX_UUID, NDR_SYNTAX_VERSION};
pub use dcerpc_client::{call, invoke, CallError, CallResult};
pub use dcerpc_server::{
    DispatchOutcome, Dispatcher, InterfaceDispatcher, InterfaceDispatcherBuilder, OperationHandler,
    ServerStats, ServerStatsSnapshot,
};
pub use dcerpc_transport::{Conn, ConnConfig, DEFAULT_MAX_STUB_SIZE};
pub use loopback_transport::LoopbackConn;
pub use operation::{
    decode_request, decode_response, encode_request, encode_response, error_status, Operation,
    PreparePayload, Request, Response, E_FAIL, E_NOTIMPL,
};
