//! ORPC operations
//!
//! Every DCOM method carries ORPCTHIS as its first IN parameter and ORPCTHAT
//! as its first OUT parameter. [`OrpcOperation`] gives the object client
//! access to both so it can stamp the causality id before a call.

use crate::types::{OrpcThat, OrpcThis};
use dcerpc::Operation;

/// An [`Operation`] framed by the ORPC envelope
pub trait OrpcOperation: Operation + Default {
    fn this_mut(&mut self) -> &mut OrpcThis;

    fn that(&self) -> &OrpcThat;
}

// Operation types keep the envelope in `this` / `that` fields
macro_rules! impl_orpc_operation {
    ($($op:ty),+ $(,)?) => {
        $(
            impl $crate::operation::OrpcOperation for $op {
                fn this_mut(&mut self) -> &mut $crate::types::OrpcThis {
                    &mut self.this
                }

                fn that(&self) -> &$crate::types::OrpcThat {
                    &self.that
                }
            }
        )+
    };
}

pub(crate) use impl_orpc_operation;

/// Reject a `size_is` count that disagrees with the array sent with it.
pub(crate) fn check_count(count: usize, received: usize) -> midl_ndr::Result<()> {
    if count != received {
        return Err(midl_ndr::NdrError::ArraySizeMismatch {
            expected: count,
            got: received,
        });
    }
    Ok(())
}

/// Convert a collection length to a wire count.
pub(crate) fn wire_count<T: TryFrom<usize>>(len: usize) -> midl_ndr::Result<T> {
    T::try_from(len).map_err(|_| midl_ndr::NdrError::IntegerOverflow)
}

/// Resize an OUT array to the count announced by the request.
pub(crate) fn conform<T: Default>(items: &mut Vec<T>, count: usize) {
    items.resize_with(count, T::default);
}
