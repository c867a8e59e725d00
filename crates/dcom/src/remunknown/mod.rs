//! IRemUnknown and IRemUnknown2 (MS-DCOM 3.1.1.5.6)
//!
//! Remote IUnknown interface for distributed reference counting:
//! - RemQueryInterface (3) - Query additional interfaces on remote object
//! - RemAddRef (4) - Increment remote reference counts
//! - RemRelease (5) - Decrement remote reference counts
//! - RemQueryInterface2 (6) - Query interfaces, returning marshaled pointers

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
