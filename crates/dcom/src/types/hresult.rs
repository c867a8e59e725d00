//! HRESULT codes commonly used in DCOM
//!
//! Statuses travel as signed 32-bit values; negative means failure.

/// Operation successful
pub const S_OK: i32 = 0x0000_0000;
/// Operation successful, returning false
pub const S_FALSE: i32 = 0x0000_0001;
/// Not implemented
pub const E_NOTIMPL: i32 = dcerpc::E_NOTIMPL;
/// Unspecified error
pub const E_FAIL: i32 = dcerpc::E_FAIL;
/// No such interface supported
pub const E_NOINTERFACE: i32 = 0x8000_4002_u32 as i32;
/// Invalid pointer
pub const E_POINTER: i32 = 0x8000_4003_u32 as i32;
/// Out of memory
pub const E_OUTOFMEMORY: i32 = 0x8007_000E_u32 as i32;
/// Invalid argument
pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;
/// Access denied
pub const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;
/// Object or server not available
pub const CO_E_OBJNOTCONNECTED: i32 = 0x8004_01FD_u32 as i32;
/// Unknown name passed to GetIDsOfNames
pub const DISP_E_UNKNOWNNAME: i32 = 0x8002_0006_u32 as i32;
/// Member not found
pub const DISP_E_MEMBERNOTFOUND: i32 = 0x8002_0003_u32 as i32;
/// Invoke raised an exception, see EXCEPINFO
pub const DISP_E_EXCEPTION: i32 = 0x8002_0009_u32 as i32;
/// Wrong number of parameters
pub const DISP_E_BADPARAMCOUNT: i32 = 0x8002_000E_u32 as i32;
/// Type mismatch in an argument, see ArgErr
pub const DISP_E_TYPEMISMATCH: i32 = 0x8002_0005_u32 as i32;
/// Invalid index
pub const DISP_E_BADINDEX: i32 = 0x8002_000B_u32 as i32;

pub fn succeeded(hr: i32) -> bool {
    hr >= 0
}

pub fn failed(hr: i32) -> bool {
    hr < 0
}
