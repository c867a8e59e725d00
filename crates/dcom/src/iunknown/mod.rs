//! IUnknown (opnums 0-2)
//!
//! The root of every DCOM interface. Derived interfaces forward opnums 0-2
//! to an IUnknown dispatcher.

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
