//! Per-operation marshaling
//!
//! Every remote method is represented by one [`Operation`] type that owns all
//! of its parameters. The request half (IN and IN-OUT parameters) and the
//! response half (OUT and IN-OUT parameters plus the trailing status) are
//! marshaled independently, so the same type serves the client and the
//! server side of a call.
//!
//! [`Request`] and [`Response`] are the call-site views of an operation: they
//! carry only the parameters a caller or handler deals with and leave
//! envelopes and derived counts to the operation.

use crate::error::{Result, RpcError};
use bytes::Bytes;
use midl_ndr::{NdrContext, NdrReader, NdrWriter};
use tracing::debug;

/// Generic failure status.
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;
/// Status reported for methods without an implementation.
pub const E_NOTIMPL: i32 = 0x8000_4001_u32 as i32;

/// Optional hook run before an operation is marshaled.
///
/// Operations with derived fields (counts computed from array lengths,
/// range-checked sizes) expose it through [`Operation::prepare`].
pub trait PreparePayload {
    /// Compute derived IN fields and validate declared ranges.
    fn prepare_request(&mut self) -> midl_ndr::Result<()> {
        Ok(())
    }

    /// Compute derived OUT fields.
    fn prepare_response(&mut self) -> midl_ndr::Result<()> {
        Ok(())
    }
}

/// One remote method with all of its parameters.
///
/// Instances are created per call and never shared.
pub trait Operation: Send + 'static {
    /// Method index within the interface, base methods included.
    fn opnum(&self) -> u16;

    /// Stable name, `/Interface/v0/Method`.
    fn name(&self) -> &'static str;

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()>;
    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()>;
    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()>;
    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()>;

    /// Status of a completed call; zero is success.
    fn status(&self) -> i32;

    fn set_status(&mut self, status: i32);

    /// Pre-marshal hook, if the operation has one.
    fn prepare(&mut self) -> Option<&mut dyn PreparePayload> {
        None
    }
}

/// Call-site view of an operation's IN parameters.
pub trait Request: Sized + Send + 'static {
    type Op: Operation + Default;

    /// Move the parameters into the operation.
    fn into_op(self, op: &mut Self::Op);

    /// Take the parameters out of a decoded operation.
    fn from_op(op: &mut Self::Op) -> Self;
}

/// Call-site view of an operation's OUT parameters and status.
pub trait Response: Sized + Send + 'static {
    type Op: Operation + Default;

    fn into_op(self, op: &mut Self::Op);

    fn from_op(op: &mut Self::Op) -> Self;
}

/// Marshal the request half of an operation.
pub fn encode_request(op: &mut dyn Operation, ndr: NdrContext) -> Result<Bytes> {
    if let Some(hook) = op.prepare() {
        hook.prepare_request()?;
    }
    let op: &dyn Operation = op;
    let mut w = NdrWriter::new(ndr);
    op.marshal_request(&mut w)?;
    let stub = w.finish()?;
    debug!("Encoded request {} ({} bytes)", op.name(), stub.len());
    Ok(stub)
}

/// Unmarshal the request half of an operation.
pub fn decode_request(op: &mut dyn Operation, stub: Bytes, ndr: NdrContext) -> Result<()> {
    let mut r = NdrReader::new(stub, ndr);
    op.unmarshal_request(&mut r)?;
    r.read_deferred()?;
    Ok(())
}

/// Marshal the response half of an operation.
pub fn encode_response(op: &mut dyn Operation, ndr: NdrContext) -> Result<Bytes> {
    if let Some(hook) = op.prepare() {
        hook.prepare_response()?;
    }
    let op: &dyn Operation = op;
    let mut w = NdrWriter::new(ndr);
    op.marshal_response(&mut w)?;
    let stub = w.finish()?;
    debug!("Encoded response {} ({} bytes)", op.name(), stub.len());
    Ok(stub)
}

/// Unmarshal the response half of an operation.
pub fn decode_response(op: &mut dyn Operation, stub: Bytes, ndr: NdrContext) -> Result<()> {
    let mut r = NdrReader::new(stub, ndr);
    op.unmarshal_response(&mut r)?;
    r.read_deferred()?;
    Ok(())
}

/// Status stamped onto an operation whose handler failed.
pub fn error_status(error: &RpcError) -> i32 {
    match error {
        RpcError::Status { status, .. } => *status,
        RpcError::NotImplemented(_) => E_NOTIMPL,
        _ => E_FAIL,
    }
}
