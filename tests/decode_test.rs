/*!
 * Integration tests for response decoding
 */

use serde_json::{json, Value as Json};
use std::time::Duration;

use turingdb::table::{decode, execution_time};
use turingdb::{ColumnData, ColumnType, TuringError, Value};

/// Build a payload with one Int64 column `n` and one String column `s`,
/// split into chunks of the given sizes, numbering rows from 0.
fn chunked_payload(sizes: &[usize]) -> Json {
    let mut next = 0i64;
    let chunks: Vec<Json> = sizes
        .iter()
        .map(|&size| {
            let ints: Vec<i64> = (next..next + size as i64).collect();
            let strings: Vec<String> = ints.iter().map(|i| format!("row{}", i)).collect();
            next += size as i64;
            json!([ints, strings])
        })
        .collect();

    json!({
        "header": {"column_names": ["n", "s"], "column_types": ["Int64", "String"]},
        "data": chunks
    })
}

#[test]
fn test_reference_payload() {
    let payload = json!({
        "header": {"column_names": ["a", "b"], "column_types": ["Int64", "String"]},
        "data": [[[1, 2], ["x", "y"]]],
        "time": 3.5
    });

    let table = decode(&payload).unwrap();
    assert_eq!(table.num_rows(), 2);
    assert_eq!(table.num_columns(), 2);

    let a = table.column("a").unwrap();
    assert_eq!(a.column_type(), &ColumnType::Int64);
    assert_eq!(a.data(), &ColumnData::Int64(vec![1, 2]));

    let b = table.column("b").unwrap();
    assert_eq!(b.column_type(), &ColumnType::String);
    assert_eq!(
        b.data(),
        &ColumnData::String(vec![Some("x".to_string()), Some("y".to_string())])
    );

    assert_eq!(execution_time(&payload), Some(Duration::from_micros(3500)));
}

#[test]
fn test_row_count_is_sum_of_chunks() {
    for sizes in [vec![], vec![0], vec![3], vec![1, 1, 1], vec![5, 0, 2, 7]] {
        let table = decode(&chunked_payload(&sizes)).unwrap();
        let expected: usize = sizes.iter().sum();

        assert_eq!(table.num_rows(), expected, "chunks {:?}", sizes);

        let n = table.column("n").unwrap().data().as_i64().unwrap();
        let in_order: Vec<i64> = (0..expected as i64).collect();
        assert_eq!(n, in_order.as_slice(), "chunks {:?}", sizes);
    }
}

#[test]
fn test_rows_line_up_across_columns() {
    let table = decode(&chunked_payload(&[2, 3])).unwrap();

    for index in 0..table.num_rows() {
        let row = table.row(index).unwrap();
        let expected = format!("row{}", index);
        assert_eq!(row[0], Value::Int64(index as i64));
        assert_eq!(row[1], Value::String(&expected));
    }
    assert!(table.row(5).is_none());
}

#[test]
fn test_mixed_known_and_unknown_types() {
    let payload = json!({
        "header": {
            "column_names": ["id", "score", "active", "node"],
            "column_types": ["UInt64", "Double", "Boolean", "NodeRef"]
        },
        "data": [
            [[1], [0.5], [true], [{"labels": ["Person"]}]],
            [[2], [1], [false], ["opaque"]]
        ]
    });

    let table = decode(&payload).unwrap();
    assert_eq!(table.num_rows(), 2);
    assert_eq!(
        table.column("score").unwrap().data().as_f64(),
        Some(&[0.5, 1.0][..])
    );
    assert_eq!(
        table.column("active").unwrap().data().as_bools(),
        Some(&[true, false][..])
    );
    assert!(matches!(
        table.column("node").unwrap().data(),
        ColumnData::Object(values) if values.len() == 2
    ));
}

#[test]
fn test_mismatched_header_is_malformed() {
    let payload = json!({
        "header": {"column_names": ["a"], "column_types": ["Int64", "String"]},
        "data": []
    });

    assert!(matches!(
        decode(&payload),
        Err(TuringError::MalformedResponse(_))
    ));
}
