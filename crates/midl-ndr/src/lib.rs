//! NDR (Network Data Representation) runtime library
//!
//! This crate implements the NDR20 transfer syntax used by DCE RPC and
//! MS-RPCE stubs.
//!
//! # NDR Wire Format
//!
//! NDR is the standard encoding for DCE RPC data. Key characteristics:
//! - Primitives align to their natural size (1, 2, 4, or 8 bytes), relative
//!   to the start of the stub
//! - Conformant arrays carry their element count (max_count) as a u32 prefix
//! - Embedded unique pointers are a 4-byte referent ID; the pointee follows
//!   the enclosing structure, in the order the pointers were written
//! - Strings are conformant varying arrays with null terminator
//!
//! # Example
//!
//! ```
//! use midl_ndr::{from_bytes, to_bytes, NdrContext};
//!
//! let names = vec![Some("a".to_string()), None];
//! let bytes = to_bytes(&names, NdrContext::new()).unwrap();
//! let back: Vec<Option<String>> = from_bytes(bytes, NdrContext::new()).unwrap();
//! assert_eq!(back, names);
//! ```

mod arrays;
mod context;
mod decode;
mod encode;
mod error;
mod pointers;
mod primitives;
mod reader;
pub mod strings;
mod writer;

pub use context::NdrContext;
pub use decode::{decode_into, from_bytes, NdrDecode};
pub use encode::{to_bytes, NdrEncode};
pub use error::{NdrError, Result};
pub use primitives::{NdrScalar, Uuid};
pub use reader::NdrReader;
pub use writer::{NdrWriter, FIRST_REFERENT_ID};

/// Re-export bytes for convenience
pub use bytes::{Buf, BufMut, Bytes, BytesMut};
