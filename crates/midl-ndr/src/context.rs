//! NDR data representation context
//!
//! The context carries the byte order negotiated for a call and provides the
//! alignment arithmetic and primitive transfer helpers used by
//! [`NdrWriter`](crate::NdrWriter) and [`NdrReader`](crate::NdrReader).

use bytes::{Buf, BufMut};

/// NDR data representation
///
/// Only the integer byte order varies in practice; characters are ASCII and
/// floating point is IEEE for every peer this crate talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdrContext {
    /// Whether to use little-endian byte order
    pub little_endian: bool,
}

macro_rules! byte_order_transfer {
    ($($put:ident, $put_le:ident, $put_be:ident, $get:ident, $get_le:ident, $get_be:ident, $ty:ty;)*) => {
        $(
            #[inline]
            pub fn $put<B: BufMut>(&self, buf: &mut B, value: $ty) {
                if self.little_endian {
                    buf.$put_le(value);
                } else {
                    buf.$put_be(value);
                }
            }

            #[inline]
            pub fn $get<B: Buf>(&self, buf: &mut B) -> $ty {
                if self.little_endian {
                    buf.$get_le()
                } else {
                    buf.$get_be()
                }
            }
        )*
    };
}

impl NdrContext {
    /// Create a new NDR context with little-endian byte order (default)
    pub const fn new() -> Self {
        Self { little_endian: true }
    }

    /// Create a context with big-endian byte order
    pub const fn big_endian() -> Self {
        Self { little_endian: false }
    }

    /// Create a context with specified byte order
    pub const fn with_byte_order(little_endian: bool) -> Self {
        Self { little_endian }
    }

    /// Data representation label as carried in a PDU header.
    pub fn data_representation(&self) -> [u8; 4] {
        if self.little_endian {
            [0x10, 0x00, 0x00, 0x00]
        } else {
            [0x00, 0x00, 0x00, 0x00]
        }
    }

    /// Recover the context from a PDU data representation label.
    pub fn from_data_representation(drep: [u8; 4]) -> Self {
        Self::with_byte_order(drep[0] & 0xf0 == 0x10)
    }

    /// Calculate padding needed to align to the given boundary
    #[inline]
    pub fn align_padding(position: usize, alignment: usize) -> usize {
        if alignment <= 1 {
            return 0;
        }
        let remainder = position % alignment;
        if remainder == 0 {
            0
        } else {
            alignment - remainder
        }
    }

    #[inline]
    pub fn put_u8<B: BufMut>(&self, buf: &mut B, value: u8) {
        buf.put_u8(value);
    }

    #[inline]
    pub fn get_u8<B: Buf>(&self, buf: &mut B) -> u8 {
        buf.get_u8()
    }

    #[inline]
    pub fn put_i8<B: BufMut>(&self, buf: &mut B, value: i8) {
        buf.put_i8(value);
    }

    #[inline]
    pub fn get_i8<B: Buf>(&self, buf: &mut B) -> i8 {
        buf.get_i8()
    }

    byte_order_transfer! {
        put_u16, put_u16_le, put_u16, get_u16, get_u16_le, get_u16, u16;
        put_i16, put_i16_le, put_i16, get_i16, get_i16_le, get_i16, i16;
        put_u32, put_u32_le, put_u32, get_u32, get_u32_le, get_u32, u32;
        put_i32, put_i32_le, put_i32, get_i32, get_i32_le, get_i32, i32;
        put_u64, put_u64_le, put_u64, get_u64, get_u64_le, get_u64, u64;
        put_i64, put_i64_le, put_i64, get_i64, get_i64_le, get_i64, i64;
        put_f32, put_f32_le, put_f32, get_f32, get_f32_le, get_f32, f32;
        put_f64, put_f64_le, put_f64, get_f64, get_f64_le, get_f64, f64;
    }
}

impl Default for NdrContext {
    fn default() -> Self {
        Self::new()
    }
}
