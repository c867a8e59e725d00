//! NDR primitive type implementations
//!
//! NDR primitive types and their encodings:
//!
//! | MIDL Type     | Rust Type | Size | Alignment |
//! |---------------|-----------|------|-----------|
//! | boolean       | bool      | 1    | 1         |
//! | byte/char     | u8        | 1    | 1         |
//! | small         | i8        | 1    | 1         |
//! | short         | i16       | 2    | 2         |
//! | long/int      | i32       | 4    | 4         |
//! | hyper         | i64       | 8    | 8         |
//! | unsigned short| u16       | 2    | 2         |
//! | unsigned long | u32       | 4    | 4         |
//! | unsigned hyper| u64       | 8    | 8         |
//! | float         | f32       | 4    | 4         |
//! | double        | f64       | 8    | 8         |
//! | GUID          | Uuid      | 16   | 4         |

use crate::{NdrContext, NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};
use bytes::{Buf, BufMut};
use std::fmt;

/// Fixed-width value transferred with natural alignment.
pub trait NdrScalar: Copy + Default {
    /// Encoded size in bytes.
    const SIZE: usize;
    /// Alignment boundary.
    const ALIGN: usize = Self::SIZE;

    fn put<B: BufMut>(self, ctx: &NdrContext, buf: &mut B);
    fn get<B: Buf>(ctx: &NdrContext, buf: &mut B) -> Self;
}

// Implements NdrScalar plus the NdrEncode/NdrDecode forwarding for one type
macro_rules! impl_ndr_primitive {
    ($($ty:ty, $size:expr, $put:ident, $get:ident;)*) => {
        $(
            impl NdrScalar for $ty {
                const SIZE: usize = $size;

                #[inline]
                fn put<B: BufMut>(self, ctx: &NdrContext, buf: &mut B) {
                    ctx.$put(buf, self);
                }

                #[inline]
                fn get<B: Buf>(ctx: &NdrContext, buf: &mut B) -> Self {
                    ctx.$get(buf)
                }
            }

            impl NdrEncode for $ty {
                fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
                    w.write_scalar(*self)
                }
            }

            impl NdrDecode for $ty {
                const MIN_WIRE_SIZE: usize = $size;

                fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
                    *self = r.read_scalar()?;
                    Ok(())
                }
            }
        )*
    };
}

impl_ndr_primitive! {
    u8, 1, put_u8, get_u8;
    i8, 1, put_i8, get_i8;
    u16, 2, put_u16, get_u16;
    i16, 2, put_i16, get_i16;
    u32, 4, put_u32, get_u32;
    i32, 4, put_i32, get_i32;
    u64, 8, put_u64, get_u64;
    i64, 8, put_i64, get_i64;
    f32, 4, put_f32, get_f32;
    f64, 8, put_f64, get_f64;
}

// NDR boolean is a single byte, any non-zero value is true
impl NdrScalar for bool {
    const SIZE: usize = 1;

    fn put<B: BufMut>(self, _ctx: &NdrContext, buf: &mut B) {
        buf.put_u8(self as u8);
    }

    fn get<B: Buf>(_ctx: &NdrContext, buf: &mut B) -> Self {
        buf.get_u8() != 0
    }
}

impl NdrEncode for bool {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_scalar(*self)
    }
}

impl NdrDecode for bool {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        *self = r.read_scalar()?;
        Ok(())
    }
}

/// GUID / UUID in its DCE field layout
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Uuid {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi_and_version: u16,
    pub clock_seq_hi_and_reserved: u8,
    pub clock_seq_low: u8,
    pub node: [u8; 6],
}

impl Uuid {
    /// Nil UUID (all zeros)
    pub const NIL: Self = Self::from_fields(0, 0, 0, [0; 8]);

    /// Build a UUID from its textual field groups; `tail` holds the clock
    /// sequence followed by the node.
    pub const fn from_fields(time_low: u32, time_mid: u16, time_hi_and_version: u16, tail: [u8; 8]) -> Self {
        Self {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq_hi_and_reserved: tail[0],
            clock_seq_low: tail[1],
            node: [tail[2], tail[3], tail[4], tail[5], tail[6], tail[7]],
        }
    }

    /// Build a UUID from its RFC 4122 big-endian byte form.
    pub fn from_bytes_be(bytes: [u8; 16]) -> Self {
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&bytes[8..]);
        Self::from_fields(
            u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            u16::from_be_bytes([bytes[4], bytes[5]]),
            u16::from_be_bytes([bytes[6], bytes[7]]),
            tail,
        )
    }

    /// Parse from string format "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() != 36 {
            return None;
        }
        let parts: Vec<&str> = s.split('-').collect();
        let lengths = parts.iter().map(|p| p.len());
        if parts.len() != 5 || !lengths.eq([8, 4, 4, 4, 12]) {
            return None;
        }
        // from_str_radix also takes a sign
        if !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_hexdigit())) {
            return None;
        }

        let time_low = u32::from_str_radix(parts[0], 16).ok()?;
        let time_mid = u16::from_str_radix(parts[1], 16).ok()?;
        let time_hi_and_version = u16::from_str_radix(parts[2], 16).ok()?;
        let clock = u16::from_str_radix(parts[3], 16).ok()?;

        let mut tail = [0u8; 8];
        tail[..2].copy_from_slice(&clock.to_be_bytes());
        for (i, byte) in tail[2..].iter_mut().enumerate() {
            *byte = u8::from_str_radix(parts[4].get(i * 2..i * 2 + 2)?, 16).ok()?;
        }

        Some(Self::from_fields(time_low, time_mid, time_hi_and_version, tail))
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-",
            self.time_low,
            self.time_mid,
            self.time_hi_and_version,
            self.clock_seq_hi_and_reserved,
            self.clock_seq_low,
        )?;
        for byte in &self.node {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({})", self)
    }
}

impl NdrEncode for Uuid {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_uuid(self)
    }
}

impl NdrDecode for Uuid {
    const MIN_WIRE_SIZE: usize = 16;

    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        *self = r.read_uuid()?;
        Ok(())
    }
}
