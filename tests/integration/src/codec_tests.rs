//! Codec Tests - Operation Marshaling End to End
//!
//! These tests drive whole operations through the request and response
//! codecs:
//! - The ORPC envelope followed by pointer and conformant parameters
//! - Deferred pointer bodies emitted after each top-level parameter
//! - Bounds checking of announced sizes
//! - Both NDR byte orders

mod common;

use bytes::Bytes;

use common::*;
use dcerpc::{decode_request, decode_response, encode_request, encode_response, Operation, Request, RpcError};
use dcom::idispatch::{InvokeOp, InvokeRequest};
use dcom::oaut::{DispParams, Variant};
use dcom::{iid, OrpcExtent, OrpcExtentArray, OrpcThat, OrpcThis};
use midl_ndr::{NdrContext, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Uuid};

/// Optional annotation carried by reference
#[derive(Clone, Debug, Default, PartialEq)]
struct Label {
    id: u32,
    text: String,
}

impl NdrEncode for Label {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.id.ndr_encode(w)?;
        self.text.ndr_encode(w)
    }
}

impl NdrDecode for Label {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.id.ndr_decode(r)?;
        self.text.ndr_decode(r)
    }
}

/// `Annotate([in] ORPCTHIS, [in, unique] Label*, [in] byte payload[size])
///     -> ([out] ORPCTHAT, [out] byte echo[size], status)` at opnum 3.
#[derive(Debug, Default)]
struct Annotate {
    this: OrpcThis,
    label: Option<Label>,
    payload: Vec<u8>,
    that: OrpcThat,
    echo: Vec<u8>,
    status: i32,
}

impl Operation for Annotate {
    fn opnum(&self) -> u16 {
        3
    }

    fn name(&self) -> &'static str {
        "/IAnnotate/v0/Annotate"
    }

    fn marshal_request<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_encode(w)?;
        w.write_deferred()?;
        self.label.ndr_encode(w)?;
        w.write_deferred()?;
        self.payload.ndr_encode(w)
    }

    fn unmarshal_request<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.this.ndr_decode(r)?;
        r.read_deferred()?;
        self.label.ndr_decode(r)?;
        r.read_deferred()?;
        self.payload.ndr_decode(r)
    }

    fn marshal_response<'a>(&'a self, w: &mut NdrWriter<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_encode(w)?;
        w.write_deferred()?;
        self.echo.ndr_encode(w)?;
        self.status.ndr_encode(w)
    }

    fn unmarshal_response<'a>(&'a mut self, r: &mut NdrReader<'a>) -> midl_ndr::Result<()> {
        self.that.ndr_decode(r)?;
        r.read_deferred()?;
        self.echo.ndr_decode(r)?;
        self.status.ndr_decode(r)
    }

    fn status(&self) -> i32 {
        self.status
    }

    fn set_status(&mut self, status: i32) {
        self.status = status;
    }
}

fn decoded_request(stub: Bytes, ndr: NdrContext) -> dcerpc::Result<Annotate> {
    let mut op = Annotate::default();
    decode_request(&mut op, stub, ndr)?;
    Ok(op)
}

/// Test: envelope, null pointer and empty array encode to exactly 40 bytes
#[test]
fn test_envelope_null_and_empty_array() {
    init_logging();

    let mut op = Annotate::default();
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();

    // ORPCTHIS (32) + null referent (4) + size 0 (4)
    assert_eq!(stub.len(), 40);
    assert_eq!(&stub[..4], &[5, 0, 7, 0]);
    assert!(stub[4..].iter().all(|b| *b == 0));

    let decoded = decoded_request(stub, NdrContext::new()).unwrap();
    assert_eq!(decoded.this, OrpcThis::default());
    assert_eq!(decoded.label, None);
    assert!(decoded.payload.is_empty());
}

/// Test: a present pointer gets the first referent ID and its body follows
/// at once, ahead of the next parameter
#[test]
fn test_pointer_body_precedes_next_parameter() {
    init_logging();

    let mut op = Annotate {
        this: OrpcThis::new(),
        label: Some(Label {
            id: 9,
            text: "hi".to_string(),
        }),
        payload: vec![1, 2, 3],
        ..Default::default()
    };
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();

    assert_eq!(&stub[32..36], &0x0002_0000u32.to_le_bytes());
    assert_eq!(&stub[36..40], &9u32.to_le_bytes());
    assert_eq!(&stub[stub.len() - 3..], &[1, 2, 3]);

    let decoded = decoded_request(stub, NdrContext::new()).unwrap();
    assert_eq!(decoded.this, op.this);
    assert_eq!(decoded.label, op.label);
    assert_eq!(decoded.payload, op.payload);
}

/// Test: extension bodies are flushed before the following parameter
#[test]
fn test_envelope_extensions_roundtrip() {
    init_logging();

    let extension_id = Uuid::from_fields(0x1111_2222, 0x3333, 0x4444, [5, 5, 5, 5, 6, 6, 6, 6]);
    let mut this = OrpcThis::new();
    this.extensions = Some(OrpcExtentArray::new([OrpcExtent::new(extension_id, vec![0xAB; 5])]));
    let mut op = Annotate {
        this,
        label: Some(Label {
            id: 1,
            text: String::new(),
        }),
        ..Default::default()
    };

    let stub = encode_request(&mut op, NdrContext::new()).unwrap();
    let decoded = decoded_request(stub, NdrContext::new()).unwrap();

    let extensions = decoded.this.extensions.as_ref().unwrap();
    let extent = extensions.find(&extension_id).unwrap();
    assert_eq!(extent.data, vec![0xAB; 5]);
    assert_eq!(decoded.label, op.label);
}

/// Test: the same operation encodes in big-endian order
#[test]
fn test_big_endian_envelope() {
    init_logging();

    let ndr = NdrContext::big_endian();
    let mut op = Annotate {
        payload: vec![7],
        ..Default::default()
    };
    let stub = encode_request(&mut op, ndr).unwrap();
    assert_eq!(&stub[..4], &[0, 5, 0, 7]);
    assert_eq!(&stub[36..40], &[0, 0, 0, 1]);

    let decoded = decoded_request(stub, ndr).unwrap();
    assert_eq!(decoded.payload, vec![7]);
}

/// Test: a truncated stub fails to decode
#[test]
fn test_truncated_request() {
    init_logging();

    let mut op = Annotate::default();
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();
    let result = decoded_request(stub.slice(..38), NdrContext::new());
    assert!(matches!(
        result,
        Err(RpcError::Ndr(NdrError::BufferUnderflow { .. }))
    ));
}

/// Test: an announced size larger than the remaining input is rejected
/// before anything is allocated
#[test]
fn test_announced_size_exceeds_input() {
    init_logging();

    let mut op = Annotate::default();
    let mut stub = encode_request(&mut op, NdrContext::new()).unwrap().to_vec();
    stub[36..40].copy_from_slice(&1000u32.to_le_bytes());

    let result = decoded_request(Bytes::from(stub), NdrContext::new());
    assert!(matches!(
        result,
        Err(RpcError::Ndr(NdrError::SizeExceedsInput { count: 1000, .. }))
    ));
}

/// Test: response half carries the status after the OUT parameters
#[test]
fn test_response_with_status() {
    init_logging();

    let mut op = Annotate {
        echo: vec![4, 5],
        ..Default::default()
    };
    op.set_status(0x8000_4005_u32 as i32);
    let stub = encode_response(&mut op, NdrContext::new()).unwrap();
    // ORPCTHAT (8) + size (4) + bytes (2) + pad (2) + status (4)
    assert_eq!(stub.len(), 20);

    let mut decoded = Annotate::default();
    decode_response(&mut decoded, stub, NdrContext::new()).unwrap();
    assert_eq!(decoded.echo, vec![4, 5]);
    assert_eq!(decoded.status(), 0x8000_4005_u32 as i32);
}

/// Test: an IDispatch::Invoke request survives the codec with its derived
/// by-reference count
#[test]
fn test_invoke_request_roundtrip() {
    init_logging();

    let request = InvokeRequest {
        disp_id: DISPID_ADD,
        iid: iid::IID_NULL,
        lcid: 0x409,
        flags: 1,
        params: DispParams::new(vec![Variant::from("x"), Variant::from(2)]).with_named(vec![-3]),
        var_ref_idx: vec![1],
        var_ref: vec![Variant::from(2.5)],
    };
    let mut op = InvokeOp::default();
    request.clone().into_op(&mut op);
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();
    assert_eq!(op.var_ref_count, 1);

    let mut decoded = InvokeOp::default();
    decode_request(&mut decoded, stub, NdrContext::new()).unwrap();
    assert_eq!(decoded.var_ref_count, 1);
    assert_eq!(InvokeRequest::from_op(&mut decoded), request);
}
