//! Byte-exact check against the reference image produced by a classic C XDR
//! library encoding a fixed battery of values.

use xdr_codec::{Decoder, Encoder, Error, Result, XdrStream};

#[rustfmt::skip]
const REFERENCE: [u8; 240] = [
    // 0x00: int32 0, 1, -1
    0x00, 0x00, 0x00, 0x00,  0x00, 0x00, 0x00, 0x01,  0xFF, 0xFF, 0xFF, 0xFF,
    // 0x0C: uint32 0, 1
    0x00, 0x00, 0x00, 0x00,  0x00, 0x00, 0x00, 0x01,
    // 0x14: int64 0, 1, 2^32, -2^32, -1
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    // 0x3C: uint64 0, 1, 2^32
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    // 0x54: float 0, 1, -1, 2^28
    0x00, 0x00, 0x00, 0x00,  0x3F, 0x80, 0x00, 0x00,
    0xBF, 0x80, 0x00, 0x00,  0x4D, 0x80, 0x00, 0x00,
    // 0x64: double 0, 1, -1, 2^28
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xBF, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x41, 0xB0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // 0x84: string<256> "12341234", "123412341", "1234123"
    0x00, 0x00, 0x00, 0x08,  b'1', b'2', b'3', b'4',  b'1', b'2', b'3', b'4',
    0x00, 0x00, 0x00, 0x09,  b'1', b'2', b'3', b'4',  b'1', b'2', b'3', b'4',
    b'1', 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x07,  b'1', b'2', b'3', b'4',  b'1', b'2', b'3', 0x00,
    // 0xAC: opaque[8], opaque[9], opaque[7]
    0x00, 0x01, 0x02, 0x03,  0x00, 0x01, 0x02, 0x03,
    0x00, 0x01, 0x02, 0x03,  0x00, 0x01, 0x02, 0x03,  0x00, 0x00, 0x00, 0x00,
    0x00, 0x01, 0x02, 0x03,  0x00, 0x01, 0x02, 0x00,
    // 0xC8: opaque<128> of lengths 8, 9, 7
    0x00, 0x00, 0x00, 0x08,  0x00, 0x01, 0x02, 0x03,  0x00, 0x01, 0x02, 0x03,
    0x00, 0x00, 0x00, 0x09,  0x00, 0x01, 0x02, 0x03,  0x00, 0x01, 0x02, 0x03,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x07,  0x00, 0x01, 0x02, 0x03,  0x00, 0x01, 0x02, 0x00,
];

const PATTERN: [u8; 9] = [0, 1, 2, 3, 0, 1, 2, 3, 0];

#[derive(Debug, Default, PartialEq)]
struct Battery {
    ints: [i32; 3],
    uints: [u32; 2],
    hypers: [i64; 5],
    uhypers: [u64; 3],
    floats: [f32; 4],
    doubles: [f64; 4],
    strings: [String; 3],
    op8: [u8; 8],
    op9: [u8; 9],
    op7: [u8; 7],
    bytes: [Vec<u8>; 3],
}

impl Battery {
    fn reference() -> Self {
        let h = 1i64 << 32;
        Battery {
            ints: [0, 1, -1],
            uints: [0, 1],
            hypers: [0, 1, h, -h, -1],
            uhypers: [0, 1, 1 << 32],
            floats: [0.0, 1.0, -1.0, 268_435_456.0],
            doubles: [0.0, 1.0, -1.0, 268_435_456.0],
            strings: ["12341234".into(), "123412341".into(), "1234123".into()],
            op8: [0, 1, 2, 3, 0, 1, 2, 3],
            op9: PATTERN,
            op7: [0, 1, 2, 3, 0, 1, 2],
            bytes: [PATTERN[..8].to_vec(), PATTERN.to_vec(), PATTERN[..7].to_vec()],
        }
    }
}

fn xdr_battery<S: XdrStream>(xdr: &mut S, b: &mut Battery) -> Result<()> {
    xdr.fixed_array(&mut b.ints, |x, v| x.int32(v))?;
    xdr.fixed_array(&mut b.uints, |x, v| x.uint32(v))?;
    xdr.fixed_array(&mut b.hypers, |x, v| x.int64(v))?;
    xdr.fixed_array(&mut b.uhypers, |x, v| x.uint64(v))?;
    xdr.fixed_array(&mut b.floats, |x, v| x.float(v))?;
    xdr.fixed_array(&mut b.doubles, |x, v| x.double(v))?;
    xdr.fixed_array(&mut b.strings, |x, s| x.string(s, 256))?;
    xdr.opaque(&mut b.op8)?;
    xdr.opaque(&mut b.op9)?;
    xdr.opaque(&mut b.op7)?;
    xdr.fixed_array(&mut b.bytes, |x, buf| x.bytes(buf, 128))
}

#[test]
fn test_encode_matches_reference() {
    let mut enc = Encoder::new(Vec::new());
    xdr_battery(&mut enc, &mut Battery::reference()).unwrap();
    let wire = enc.into_inner();
    assert_eq!(wire.len(), 240);
    assert_eq!(wire, REFERENCE);
}

#[test]
fn test_decode_reference() {
    let mut dec = Decoder::new(&REFERENCE[..]);
    let mut decoded = Battery::default();
    xdr_battery(&mut dec, &mut decoded).unwrap();
    assert!(dec.get_ref().is_empty());

    let expected = Battery::reference();
    let bits32 = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    let bits64 = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits32(&decoded.floats), bits32(&expected.floats));
    assert_eq!(bits64(&decoded.doubles), bits64(&expected.doubles));
    assert_eq!(decoded, expected);
}

#[test]
fn test_direct_api_matches_reference() {
    let mut enc = Encoder::new(Vec::new());
    for v in [0, 1, -1] {
        enc.put_i32(v).unwrap();
    }
    enc.put_u32(0).unwrap();
    enc.put_u32(1).unwrap();
    for v in [0, 1, 1i64 << 32, -(1i64 << 32), -1] {
        enc.put_i64(v).unwrap();
    }
    for v in [0, 1, 1u64 << 32] {
        enc.put_u64(v).unwrap();
    }
    for v in [0.0f32, 1.0, -1.0, 268_435_456.0] {
        enc.put_f32(v).unwrap();
    }
    for v in [0.0f64, 1.0, -1.0, 268_435_456.0] {
        enc.put_f64(v).unwrap();
    }
    for s in ["12341234", "123412341", "1234123"] {
        enc.put_string(s, 256).unwrap();
    }
    for n in [8, 9, 7] {
        enc.put_opaque(&PATTERN[..n]).unwrap();
    }
    for n in [8, 9, 7] {
        enc.put_bytes(&PATTERN[..n], 128).unwrap();
    }
    assert_eq!(enc.into_inner(), REFERENCE);
}

#[test]
fn test_truncated_reference_poisons() {
    let mut dec = Decoder::new(&REFERENCE[..REFERENCE.len() - 1]);
    let mut decoded = Battery::default();
    assert!(matches!(
        xdr_battery(&mut dec, &mut decoded),
        Err(Error::ShortRead)
    ));
    assert!(dec.is_poisoned());
    assert_eq!(decoded.bytes[1], PATTERN);
}
