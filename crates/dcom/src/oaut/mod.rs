//! OLE Automation wire types (MS-OAUT)
//!
//! The subset of automation marshaling used by IDispatch: BSTR, VARIANT,
//! DISPPARAMS and EXCEPINFO.

mod bstr;
mod dispparams;
mod variant;

pub use bstr::Bstr;
pub use dispparams::{DispParams, ExcepInfo};
pub use variant::{vt, Variant};
