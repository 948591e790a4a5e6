//! Conversions into the integer family, driven through the public factory
//! against a mock decoder.

mod common;

use common::*;
use orc_core::col_type::{ColumnType, ColumnTypeTag};
use orcr::time::Timestamp;

fn t(tag: ColumnTypeTag) -> ColumnType {
    ColumnType::new(tag)
}

#[test]
fn long_to_byte_overflow_nulls() {
    // File LONG [1, 300, -1, null, 128] read as BYTE.
    let column = MockColumn::Longs(vec![Some(1), Some(300), Some(-1), None, Some(128)]);
    let mut out = long_output(5);
    convert_batch(t(ColumnTypeTag::Long), t(ColumnTypeTag::Byte), column, &mut out, 5);
    assert_eq!(
        longs_out(&out, 5),
        vec![Some(1), None, Some(-1), None, None]
    );
}

#[test]
fn long_to_int_boundaries() {
    let column = MockColumn::Longs(vec![
        Some(i32::MAX as i64),
        Some(i32::MIN as i64),
        Some(i32::MAX as i64 + 1),
        Some(i32::MIN as i64 - 1),
    ]);
    let mut out = long_output(4);
    convert_batch(t(ColumnTypeTag::Long), t(ColumnTypeTag::Int), column, &mut out, 4);
    assert_eq!(
        longs_out(&out, 4),
        vec![
            Some(i32::MAX as i64),
            Some(i32::MIN as i64),
            None,
            None
        ]
    );
}

#[test]
fn byte_to_long_widening_is_identity() {
    let column = MockColumn::Longs(vec![Some(-128), Some(127), None]);
    let mut out = long_output(3);
    convert_batch(t(ColumnTypeTag::Byte), t(ColumnTypeTag::Long), column, &mut out, 3);
    assert_eq!(longs_out(&out, 3), vec![Some(-128), Some(127), None]);
}

#[test]
fn int_to_boolean_never_nulls() {
    let column = MockColumn::Longs(vec![Some(0), Some(5), Some(-5), None]);
    let mut out = long_output(4);
    convert_batch(t(ColumnTypeTag::Int), t(ColumnTypeTag::Boolean), column, &mut out, 4);
    assert_eq!(longs_out(&out, 4), vec![Some(0), Some(1), Some(1), None]);
}

#[test]
fn double_to_long_range_and_truncation() {
    // File DOUBLE [1e20, NaN, -0.5, 2^63 as double] read as LONG.
    let column = MockColumn::Doubles(vec![
        Some(1e20),
        Some(f64::NAN),
        Some(-0.5),
        Some(9.223372036854776e18),
    ]);
    let mut out = long_output(4);
    convert_batch(t(ColumnTypeTag::Double), t(ColumnTypeTag::Long), column, &mut out, 4);
    assert_eq!(longs_out(&out, 4), vec![None, None, Some(0), None]);
}

#[test]
fn double_to_long_edge_of_range() {
    let column = MockColumn::Doubles(vec![
        // The largest double strictly below 2^63.
        Some(9223372036854774784.0),
        Some(-9223372036854775808.0),
        Some(2.9),
        Some(-2.9),
        Some(f64::INFINITY),
        Some(f64::NEG_INFINITY),
    ]);
    let mut out = long_output(6);
    convert_batch(t(ColumnTypeTag::Double), t(ColumnTypeTag::Long), column, &mut out, 6);
    assert_eq!(
        longs_out(&out, 6),
        vec![
            Some(9223372036854774784),
            Some(i64::MIN),
            Some(2),
            Some(-2),
            None,
            None
        ]
    );
}

#[test]
fn float_file_to_int_truncates_toward_zero() {
    let column = MockColumn::Doubles(vec![Some(1.75), Some(-1.75), Some(3e10)]);
    let mut out = long_output(3);
    convert_batch(t(ColumnTypeTag::Float), t(ColumnTypeTag::Int), column, &mut out, 3);
    assert_eq!(longs_out(&out, 3), vec![Some(1), Some(-1), None]);
}

#[test]
fn decimal_to_integers() {
    let file = ColumnType::decimal(10, 2).unwrap();
    let column = MockColumn::Decimals(vec![
        Some(dec("127.99")),
        Some(dec("128.01")),
        Some(dec("-3.5")),
        Some(dec("0")),
        None,
    ]);

    let mut out = long_output(5);
    convert_batch(file, t(ColumnTypeTag::Byte), column.clone(), &mut out, 5);
    assert_eq!(
        longs_out(&out, 5),
        vec![Some(127), None, Some(-3), Some(0), None]
    );

    let mut out = long_output(5);
    convert_batch(file, t(ColumnTypeTag::Boolean), column, &mut out, 5);
    assert_eq!(
        longs_out(&out, 5),
        vec![Some(1), Some(1), Some(1), Some(0), None]
    );
}

#[test]
fn decimal_to_long_extremes() {
    let file = ColumnType::decimal(38, 0).unwrap();
    let column = MockColumn::Decimals(vec![
        Some(dec("9223372036854775807")),
        Some(dec("9223372036854775808")),
        Some(dec("-9223372036854775808")),
        Some(dec("-9223372036854775809")),
    ]);
    let mut out = long_output(4);
    convert_batch(file, t(ColumnTypeTag::Long), column, &mut out, 4);
    assert_eq!(
        longs_out(&out, 4),
        vec![Some(i64::MAX), None, Some(i64::MIN), None]
    );
}

#[test]
fn string_to_integers() {
    let column = bytes_rows(&[
        Some("42"),
        Some("-7"),
        Some("300"),
        Some("nope"),
        Some(""),
        Some(" 5"),
        Some("5.0"),
        None,
    ]);
    let mut out = long_output(8);
    convert_batch(t(ColumnTypeTag::String), t(ColumnTypeTag::Byte), column, &mut out, 8);
    assert_eq!(
        longs_out(&out, 8),
        vec![Some(42), Some(-7), None, None, None, None, None, None]
    );
}

#[test]
fn varchar_to_long_round_trip() {
    let values = [0i64, 1, -1, i64::MIN, i64::MAX];
    let texts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let column = bytes_rows(&texts.iter().map(|s| Some(s.as_str())).collect::<Vec<_>>());
    let mut out = long_output(values.len());
    convert_batch(
        ColumnType::varchar(30).unwrap(),
        t(ColumnTypeTag::Long),
        column,
        &mut out,
        values.len(),
    );
    assert_eq!(
        longs_out(&out, values.len()),
        values.iter().map(|&v| Some(v)).collect::<Vec<_>>()
    );
}

#[test]
fn timestamp_to_integers_floors_seconds() {
    let column = MockColumn::Timestamps(vec![
        Some(Timestamp::from_millis(1500)),
        Some(Timestamp::from_millis(-500)),
        Some(Timestamp::from_millis(0)),
        None,
    ]);
    let mut out = long_output(4);
    convert_batch(
        t(ColumnTypeTag::Timestamp),
        t(ColumnTypeTag::Long),
        column,
        &mut out,
        4,
    );
    assert_eq!(
        longs_out(&out, 4),
        vec![Some(1), Some(-1), Some(0), None]
    );
}

#[test]
fn timestamp_to_byte_down_casts() {
    let column = MockColumn::Timestamps(vec![
        Some(Timestamp::from_millis(127_000)),
        Some(Timestamp::from_millis(128_000)),
    ]);
    let mut out = long_output(2);
    convert_batch(
        t(ColumnTypeTag::Timestamp),
        t(ColumnTypeTag::Byte),
        column,
        &mut out,
        2,
    );
    assert_eq!(longs_out(&out, 2), vec![Some(127), None]);
}

#[test]
fn repeating_input_converts_index_zero_only() {
    let fixture = Fixture::new(
        t(ColumnTypeTag::Double),
        MockColumn::Doubles(vec![Some(7.9), Some(0.0), Some(0.0)]),
    )
    .repeating();
    let mut reader = fixture.reader(t(ColumnTypeTag::Int), 3).unwrap();
    let mut out = long_output(3);
    reader.next_batch(&mut out, None, 3).unwrap();

    let v = out.as_longs().unwrap();
    assert!(v.mask.is_repeating);
    assert!(v.mask.no_nulls);
    assert_eq!(v.values[0], 7);
}

#[test]
fn repeating_null_input_stays_null() {
    let fixture = Fixture::new(
        t(ColumnTypeTag::Double),
        MockColumn::Doubles(vec![None, None]),
    )
    .repeating();
    let mut reader = fixture.reader(t(ColumnTypeTag::Long), 2).unwrap();
    let mut out = long_output(2);
    reader.next_batch(&mut out, None, 2).unwrap();

    let v = out.as_longs().unwrap();
    assert!(v.mask.is_repeating);
    assert!(v.mask.is_null(0));
}

#[test]
fn purity_same_input_same_output() {
    let column = MockColumn::Longs(vec![Some(1), Some(300), None]);
    let mut first = long_output(3);
    let mut second = long_output(3);
    convert_batch(
        t(ColumnTypeTag::Long),
        t(ColumnTypeTag::Byte),
        column.clone(),
        &mut first,
        3,
    );
    convert_batch(t(ColumnTypeTag::Long), t(ColumnTypeTag::Byte), column, &mut second, 3);
    assert_eq!(longs_out(&first, 3), longs_out(&second, 3));
}
