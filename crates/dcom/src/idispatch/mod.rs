//! IDispatch (MS-OAUT 3.1.4)
//!
//! Late-bound automation: GetTypeInfoCount (3), GetTypeInfo (4),
//! GetIDsOfNames (5) and Invoke (6), on top of IUnknown (0-2).

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
