//! VARIANT (MS-OAUT 2.2.29)
//!
//! A VARIANT travels as a unique pointer to a wireVARIANT: an 8-aligned
//! header carrying the type tag, then a union arm selected by that tag.
//! Only the automation types needed by IDispatch callers are modelled; any
//! other tag fails to decode with `InvalidDiscriminant`.

use super::Bstr;
use crate::types::InterfacePointer;
use midl_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// VARTYPE tags
pub mod vt {
    pub const VT_EMPTY: u16 = 0;
    pub const VT_NULL: u16 = 1;
    pub const VT_I4: u16 = 3;
    pub const VT_R8: u16 = 5;
    pub const VT_BSTR: u16 = 8;
    pub const VT_BOOL: u16 = 11;
    pub const VT_UNKNOWN: u16 = 13;
    pub const VT_I8: u16 = 20;
}

/// VARIANT_BOOL true
const VARIANT_TRUE: i16 = -1;

/// Fixed part of a wireVARIANT with an 8-byte arm, in 8-byte units.
const FIXED_UNITS: u32 = 3;

/// Tagged automation value
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Variant {
    #[default]
    Empty,
    Null,
    I4(i32),
    I8(i64),
    R8(f64),
    Bool(bool),
    Bstr(Bstr),
    Unknown(Option<InterfacePointer>),
}

impl Variant {
    /// The VARTYPE tag of this value.
    pub fn vt(&self) -> u16 {
        match self {
            Variant::Empty => vt::VT_EMPTY,
            Variant::Null => vt::VT_NULL,
            Variant::I4(_) => vt::VT_I4,
            Variant::I8(_) => vt::VT_I8,
            Variant::R8(_) => vt::VT_R8,
            Variant::Bool(_) => vt::VT_BOOL,
            Variant::Bstr(_) => vt::VT_BSTR,
            Variant::Unknown(_) => vt::VT_UNKNOWN,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    pub fn as_i4(&self) -> Option<i32> {
        match self {
            Variant::I4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::Bstr(s) => Some(s.as_str()),
            _ => None,
        }
    }

    // clSize: total wire size in 8-byte units, pointees included
    fn wire_units(&self) -> u32 {
        let extra = match self {
            Variant::Bstr(s) if !s.is_empty() => 12 + 2 * s.0.encode_utf16().count(),
            Variant::Unknown(Some(p)) => 8 + p.len(),
            _ => 0,
        };
        FIXED_UNITS.saturating_add(u32::try_from((extra + 7) / 8).unwrap_or(u32::MAX))
    }

    fn encode_body<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let tag = self.vt();
        w.align(8);
        w.write_scalar(self.wire_units())?;
        w.write_scalar(0u32)?;
        w.write_scalar(tag)?;
        for _ in 0..3 {
            w.write_scalar(0u16)?;
        }
        w.write_scalar(u32::from(tag))?;
        match self {
            Variant::Empty | Variant::Null => Ok(()),
            Variant::I4(v) => w.write_scalar(*v),
            Variant::I8(v) => w.write_scalar(*v),
            Variant::R8(v) => w.write_scalar(*v),
            Variant::Bool(v) => w.write_scalar(if *v { VARIANT_TRUE } else { 0i16 }),
            Variant::Bstr(s) => s.ndr_encode(w),
            Variant::Unknown(p) => p.ndr_encode(w),
        }
    }

    fn decode_body<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.align(8)?;
        let _units: u32 = r.read_scalar()?;
        let _reserved: u32 = r.read_scalar()?;
        let tag: u16 = r.read_scalar()?;
        for _ in 0..3 {
            let _: u16 = r.read_scalar()?;
        }
        let switch: u32 = r.read_scalar()?;
        if switch != u32::from(tag) {
            return Err(NdrError::InvalidDiscriminant(switch as i32));
        }
        *self = match tag {
            vt::VT_EMPTY => Variant::Empty,
            vt::VT_NULL => Variant::Null,
            vt::VT_I4 => Variant::I4(r.read_scalar()?),
            vt::VT_I8 => Variant::I8(r.read_scalar()?),
            vt::VT_R8 => Variant::R8(r.read_scalar()?),
            vt::VT_BOOL => Variant::Bool(r.read_scalar::<i16>()? != 0),
            vt::VT_BSTR => Variant::Bstr(Bstr::default()),
            vt::VT_UNKNOWN => Variant::Unknown(None),
            other => return Err(NdrError::InvalidDiscriminant(i32::from(other))),
        };
        match self {
            Variant::Bstr(s) => s.ndr_decode(r),
            Variant::Unknown(p) => p.ndr_decode(r),
            _ => Ok(()),
        }
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::I4(v)
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Variant::I8(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::R8(v)
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::Bstr(Bstr::from(v))
    }
}

impl NdrEncode for Variant {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_pointer(Some(self), |w, v| v.encode_body(w))
    }
}

impl NdrDecode for Variant {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_referent(self, |r, v| v.decode_body(r))
    }
}
