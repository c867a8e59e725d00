//! DCOM (Distributed Component Object Model) interfaces over DCE RPC
//!
//! This crate binds the generic operation layer of the `dcerpc` crate to
//! DCOM: the ORPC envelope carried by every call, the identifiers and object
//! references exchanged by the object exporter, the OLE Automation types
//! used by IDispatch, and the interfaces themselves.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DCOM Layer (this crate)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IUnknown (0-2)  <─  IRemUnknown (3-5)  <─  IRemUnknown2 (6)│
//! │                  <─  IDispatch (3-6)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ObjectClient (IPID + causality)  │  ORPCTHIS / ORPCTHAT    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  DCE RPC Layer (dcerpc crate)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each interface module provides the Operation types, Request/Response
//! views, a server trait whose methods default to `E_NOTIMPL`, a dispatcher
//! constructor that forwards base opnums to the base interface, and a client.
//!
//! # Modules
//!
//! - [`types`]: Core DCOM data types
//! - [`oaut`]: BSTR, VARIANT, DISPPARAMS, EXCEPINFO
//! - [`iunknown`], [`remunknown`], [`idispatch`]: the interfaces

pub mod idispatch;
pub mod iunknown;
pub mod oaut;
pub mod remunknown;
pub mod types;

mod client;
mod operation;
mod server;

pub use client::ObjectClient;
pub use operation::OrpcOperation;
pub use server::target_ipid;
pub use types::{
    hresult, iid, ComVersion, Iid, InterfacePointer, Ipid, Oid, OrpcExtent, OrpcExtentArray, OrpcThat, OrpcThis,
    Oxid, RemInterfaceRef, RemQiResult, StdObjRef,
};

/// DCOM version supported by this implementation
pub const DCOM_VERSION: ComVersion = ComVersion::DCOM_5_7;
