// File: crates/dashboard-core/tests/decode.rs
// Purpose: Encoded-array decoding: dtype round-trips, shape handling and permissive fallbacks.

mod support;

use dashboard_core::decode::is_truthy;
use dashboard_core::{
    decode_fields, decode_trace_arrays, decode_value, to_array, Decoded, Dtype, EncodedArray, FallbackReason, ShapeSpec,
};
use serde_json::{json, Value};
use support::trace;

fn encoded(values: &[f64], dtype: &str) -> EncodedArray {
    EncodedArray::encode(values, &Dtype::parse(dtype))
}

#[test]
fn every_dtype_round_trips() {
    let cases: [(&str, Vec<f64>); 8] = [
        ("f8", vec![0.1, -2.5, 1e300, 3.0]),
        ("f4", vec![0.5, -1.25, 1024.0]),
        ("i4", vec![-2_147_483_648.0, 0.0, 2_147_483_647.0]),
        ("i2", vec![-32768.0, -1.0, 32767.0]),
        ("i1", vec![-128.0, 0.0, 127.0]),
        ("u4", vec![0.0, 4_294_967_295.0]),
        ("u2", vec![0.0, 65535.0, 7.0]),
        ("u1", vec![0.0, 255.0, 42.0]),
    ];
    for (tag, values) in cases {
        let dtype = Dtype::parse(tag);
        assert!(dtype.is_known(), "{tag}");
        let bytes = dtype.write(&values);
        assert_eq!(bytes.len(), values.len() * dtype.width(), "{tag}");
        assert_eq!(dtype.read(&bytes), values, "{tag}");
        assert_eq!(dtype.write(&dtype.read(&bytes)), bytes, "{tag}");
        assert_eq!(encoded(&values, tag).decode(), Decoded::Flat(values.clone()), "{tag}");
    }
}

#[test]
fn known_payload_bytes_decode_little_endian() {
    // 1.5 and 2.0 as little-endian f8
    let value = json!({"bdata": "AAAAAAAA+D8AAAAAAAAAQA==", "dtype": "f8"});
    assert_eq!(decode_value(&value), json!([1.5, 2]));
    // [1, 258] as u2
    let value = json!({"bdata": "AQACAQ==", "dtype": "u2"});
    assert_eq!(decode_value(&value), json!([1, 258]));
}

#[test]
fn two_d_shape_reshapes_row_major() {
    let enc = encoded(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], "f8").with_shape(ShapeSpec::Text("2, 3".into()));
    assert_eq!(
        enc.try_decode(),
        Ok(Decoded::Matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]))
    );
    let as_json = decode_value(&serde_json::to_value(&enc).unwrap());
    assert_eq!(as_json, json!([[1, 2, 3], [4, 5, 6]]));
}

#[test]
fn numeric_shape_sequence_is_accepted() {
    let mut value = serde_json::to_value(encoded(&[1.0, 2.0, 3.0, 4.0], "i2")).unwrap();
    value["shape"] = json!([2, 2]);
    assert_eq!(decode_value(&value), json!([[1, 2], [3, 4]]));
}

#[test]
fn reshape_uses_leading_elements_when_data_is_longer() {
    let enc = encoded(&[1.0, 2.0, 3.0, 4.0, 5.0], "u1").with_shape(ShapeSpec::Text("2x2".into()));
    assert_eq!(enc.decode(), Decoded::Matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));
}

#[test]
fn shape_exceeding_data_returns_flat() {
    let flat = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let enc = encoded(&flat, "f8").with_shape(ShapeSpec::Text("2,3".into()));
    let err = enc.try_decode().unwrap_err();
    assert_eq!(err.reason, FallbackReason::ShapeExceedsData { rows: 2, cols: 3, len: 5 });
    assert_eq!(err.best_effort, Decoded::Flat(flat.clone()));
    assert_eq!(enc.decode(), Decoded::Flat(flat));
}

#[test]
fn one_d_shape_is_always_flat() {
    for shape in ["6", "(6,)", "100"] {
        let enc = encoded(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], "i4").with_shape(ShapeSpec::Text(shape.into()));
        assert_eq!(enc.try_decode(), Ok(Decoded::Flat(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])), "{shape}");
    }
}

#[test]
fn invalid_shape_entries_are_discarded() {
    // zero and negatives drop out, leaving a 1-D shape
    let mut value = serde_json::to_value(encoded(&[1.0, 2.0, 3.0, 4.0], "u1")).unwrap();
    value["shape"] = json!([0, 4, -2, 1.5, "x"]);
    assert_eq!(decode_value(&value), json!([1, 2, 3, 4]));

    let enc = encoded(&[1.0, 2.0], "u1").with_shape(ShapeSpec::Text("0, 2".into()));
    assert_eq!(enc.try_decode(), Ok(Decoded::Flat(vec![1.0, 2.0])));

    let enc = encoded(&[1.0, 2.0], "u1").with_shape(ShapeSpec::Text("n/a".into()));
    assert_eq!(enc.try_decode(), Ok(Decoded::Flat(vec![1.0, 2.0])));
}

#[test]
fn three_d_shapes_are_not_reshaped() {
    let values: Vec<f64> = (1..=8).map(f64::from).collect();
    let enc = encoded(&values, "u1").with_shape(ShapeSpec::Text("2, 2, 2".into()));
    let err = enc.try_decode().unwrap_err();
    assert_eq!(err.reason, FallbackReason::UnsupportedRank(3));
    assert_eq!(enc.decode(), Decoded::Flat(values));
}

#[test]
fn unknown_dtype_reads_unsigned_bytes() {
    let value = json!({"bdata": "AQL/", "dtype": "c16"});
    assert_eq!(decode_value(&value), json!([1, 2, 255]));

    let enc = EncodedArray::from_value(&value).unwrap();
    let err = enc.try_decode().unwrap_err();
    assert_eq!(err.reason, FallbackReason::UnknownDtype("c16".into()));
}

#[test]
fn trailing_bytes_are_dropped() {
    // five bytes as i2 -> two elements
    let enc = EncodedArray::new("AQACAAM=", "i2");
    let err = enc.try_decode().unwrap_err();
    assert_eq!(err.reason, FallbackReason::TrailingBytes { dtype: "i2".into(), extra: 1 });
    assert_eq!(err.best_effort, Decoded::Flat(vec![1.0, 2.0]));
}

#[test]
fn missing_bdata_or_dtype_returns_value_unchanged() {
    for value in [
        json!({"dtype": "f8"}),
        json!({"bdata": "AAAA"}),
        json!({"bdata": "", "dtype": "f8"}),
        json!({"bdata": "AAAA", "dtype": ""}),
        json!({"other": 1}),
        json!("plain text"),
        json!(7),
    ] {
        assert_eq!(decode_value(&value), value);
    }
}

#[test]
fn invalid_base64_returns_value_unchanged() {
    let value = json!({"bdata": "***not base64***", "dtype": "f8"});
    assert_eq!(decode_value(&value), value);
    assert!(to_array(&value).is_empty());
    let err = EncodedArray::from_value(&value).unwrap().try_decode().unwrap_err();
    assert!(matches!(err.reason, FallbackReason::InvalidBase64(_)));
}

#[test]
fn unpadded_and_wrapped_base64_is_accepted() {
    let value = json!({"bdata": "AQ\nIDBA", "dtype": "u1"});
    assert_eq!(decode_value(&value), json!([1, 2, 3, 4]));
}

#[test]
fn arrays_pass_through() {
    let value = json!([1, "two", [3]]);
    assert_eq!(decode_value(&value), value);
    assert_eq!(to_array(&value), vec![json!(1), json!("two"), json!([3])]);
}

#[test]
fn to_array_treats_falsy_and_scalars_as_empty() {
    for value in [Value::Null, json!(false), json!(0), json!(""), json!("abc"), json!(3.5), json!({"a": 1})] {
        assert!(to_array(&value).is_empty(), "{value}");
    }
    assert!(!is_truthy(&json!(0.0)));
    assert!(is_truthy(&json!([])));
}

#[test]
fn decode_fields_handles_whole_field_and_per_element_blocks() {
    let block = serde_json::to_value(encoded(&[1.0, 2.0], "u1")).unwrap();
    let mut t = trace(json!({
        "name": "A",
        "x": block.clone(),
        "y": [block.clone(), 5],
        "marker": block.clone(),
    }));
    decode_fields(&mut t, &["x", "y"]);
    assert_eq!(t["x"], json!([1, 2]));
    assert_eq!(t["y"], json!([[1, 2], 5]));
    // untouched field
    assert_eq!(t["marker"], block);
}

#[test]
fn decode_trace_arrays_covers_all_array_fields() {
    let enc = |v: &[f64]| serde_json::to_value(encoded(v, "f4")).unwrap();
    let mut t = trace(json!({
        "x": enc(&[1.0]),
        "y": enc(&[2.0]),
        "z": enc(&[3.0]),
        "text": ["a", "b"],
        "customdata": enc(&[0.5]),
    }));
    decode_trace_arrays(&mut t);
    assert_eq!(t["x"], json!([1]));
    assert_eq!(t["y"], json!([2]));
    assert_eq!(t["z"], json!([3]));
    assert_eq!(t["text"], json!(["a", "b"]));
    assert_eq!(t["customdata"], json!([0.5]));
}

#[test]
fn matrix_flattens_row_major() {
    let decoded = Decoded::Matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.flatten(), vec![1.0, 2.0, 3.0, 4.0]);
    assert!(Decoded::Flat(Vec::new()).is_empty());
}

#[test]
fn decode_value_falsy_is_empty() {
    for value in [Value::Null, json!(false), json!(0), json!(0.0), json!("")] {
        assert_eq!(decode_value(&value), json!([]), "{value}");
    }
}

#[test]
fn decode_fields_keeps_falsy_elements_but_empties_falsy_fields() {
    let block = serde_json::to_value(encoded(&[7.0], "u1")).unwrap();
    let mut t = trace(json!({"y": [0, block, null, ""], "text": null, "x": 0}));
    decode_fields(&mut t, &["x", "y", "text"]);
    assert_eq!(t["y"], json!([0, [7], null, ""]));
    assert_eq!(t["text"], json!([]));
    assert_eq!(t["x"], json!([]));
}
