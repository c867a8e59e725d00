//! DISPPARAMS and EXCEPINFO (MS-OAUT 2.2.33, 2.2.36)

use super::{Bstr, Variant};
use midl_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// Arguments of an `IDispatch::Invoke` call.
///
/// Positional arguments are stored in reverse order, as on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispParams {
    pub args: Vec<Variant>,
    pub named_args: Vec<i32>,
}

impl DispParams {
    pub fn new(args: Vec<Variant>) -> Self {
        Self {
            args,
            named_args: Vec::new(),
        }
    }

    pub fn with_named(mut self, named_args: Vec<i32>) -> Self {
        self.named_args = named_args;
        self
    }
}

fn count(len: usize) -> midl_ndr::Result<u32> {
    u32::try_from(len).map_err(|_| NdrError::IntegerOverflow)
}

impl NdrEncode for DispParams {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        let args = (!self.args.is_empty()).then_some(&self.args);
        w.write_pointer(args, |w, args| args.ndr_encode(w))?;
        let named = (!self.named_args.is_empty()).then_some(&self.named_args);
        w.write_pointer(named, |w, named| named.ndr_encode(w))?;
        w.write_scalar(count(self.args.len())?)?;
        w.write_scalar(count(self.named_args.len())?)
    }
}

impl NdrDecode for DispParams {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        r.read_referent(&mut self.args, |r, args| args.ndr_decode(r))?;
        r.read_referent(&mut self.named_args, |r, named| named.ndr_decode(r))?;
        let _args: u32 = r.read_scalar()?;
        let _named: u32 = r.read_scalar()?;
        Ok(())
    }
}

/// Exception raised by `IDispatch::Invoke` (DISP_E_EXCEPTION).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExcepInfo {
    pub code: u16,
    pub source: Bstr,
    pub description: Bstr,
    pub help_file: Bstr,
    pub help_context: u32,
    pub scode: i32,
}

impl NdrEncode for ExcepInfo {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        w.write_scalar(self.code)?;
        w.write_scalar(0u16)?;
        self.source.ndr_encode(w)?;
        self.description.ndr_encode(w)?;
        self.help_file.ndr_encode(w)?;
        w.write_scalar(self.help_context)?;
        // pvReserved, pfnDeferredFillIn
        w.write_scalar(0u32)?;
        w.write_scalar(0u32)?;
        w.write_scalar(self.scode)
    }
}

impl NdrDecode for ExcepInfo {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.code.ndr_decode(r)?;
        let _reserved: u16 = r.read_scalar()?;
        self.source.ndr_decode(r)?;
        self.description.ndr_decode(r)?;
        self.help_file.ndr_decode(r)?;
        self.help_context.ndr_decode(r)?;
        let _reserved: u32 = r.read_scalar()?;
        let _fill_in: u32 = r.read_scalar()?;
        self.scode.ndr_decode(r)
    }
}
