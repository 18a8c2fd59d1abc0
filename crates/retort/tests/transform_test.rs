//! Behavioral tests for the transformation operation catalog.

use retort::{
    ArithmeticOp, Column, ColumnType, FilterOp, RetortError, Table, TextKind, TransformEngine,
    TransformOperation, Value,
};

fn ints(name: &str, values: &[Option<i64>]) -> Column {
    Column::with_values(
        name,
        ColumnType::Integer,
        values
            .iter()
            .map(|v| v.map(Value::Int).unwrap_or(Value::Null))
            .collect(),
    )
}

fn floats(name: &str, values: &[Option<f64>]) -> Column {
    Column::with_values(
        name,
        ColumnType::Float,
        values
            .iter()
            .map(|v| v.map(Value::Float).unwrap_or(Value::Null))
            .collect(),
    )
}

fn strings(name: &str, values: &[Option<&str>]) -> Column {
    Column::with_values(
        name,
        ColumnType::String,
        values
            .iter()
            .map(|v| v.map(|s| Value::Str(s.to_string())).unwrap_or(Value::Null))
            .collect(),
    )
}

fn apply(op: TransformOperation, table: &Table) -> retort::Result<Table> {
    TransformEngine::new().apply(&op, table).map(|a| a.table)
}

// =============================================================================
// Cleaning Operations
// =============================================================================

#[test]
fn test_drop_nulls_removes_rows_with_any_null() {
    let table = Table::from_columns(vec![
        ints("a", &[Some(1), Some(2), None]),
        strings("b", &[Some("x"), None, Some("z")]),
    ])
    .unwrap();

    let result = apply(TransformOperation::DropNulls, &table).unwrap();
    assert_eq!(result.row_count(), 1);
    assert_eq!(result.column("a").unwrap().values, vec![Value::Int(1)]);
}

#[test]
fn test_replace_zero_spec_example() {
    // price = [10, 0, 20, 0] with replacement 5 becomes [10, 5, 20, 5].
    let table =
        Table::from_columns(vec![ints("price", &[Some(10), Some(0), Some(20), Some(0)])]).unwrap();

    let result = apply(TransformOperation::ReplaceZero { replacement: 5.0 }, &table).unwrap();
    assert_eq!(
        result.column("price").unwrap().values,
        vec![Value::Int(10), Value::Int(5), Value::Int(20), Value::Int(5)]
    );
}

#[test]
fn test_replace_zero_fractional_promotes_integer_column() {
    let table = Table::from_columns(vec![ints("n", &[Some(0), Some(3)])]).unwrap();

    let result = apply(TransformOperation::ReplaceZero { replacement: 0.5 }, &table).unwrap();
    let column = result.column("n").unwrap();
    assert_eq!(column.dtype, ColumnType::Float);
    assert_eq!(column.values, vec![Value::Float(0.5), Value::Float(3.0)]);
}

#[test]
fn test_replace_zero_skips_text_columns() {
    let table = Table::from_columns(vec![strings("s", &[Some("0"), Some("x")])]).unwrap();
    let result = apply(TransformOperation::ReplaceZero { replacement: 9.0 }, &table).unwrap();
    assert_eq!(
        result.column("s").unwrap().values,
        vec![Value::Str("0".into()), Value::Str("x".into())]
    );
}

#[test]
fn test_drop_duplicates_spec_example() {
    // Rows [(1,"a"), (2,"b"), (1,"a")] keep the first occurrence only.
    let table = Table::from_columns(vec![
        ints("n", &[Some(1), Some(2), Some(1)]),
        strings("s", &[Some("a"), Some("b"), Some("a")]),
    ])
    .unwrap();

    let result = apply(TransformOperation::DropDuplicates, &table).unwrap();
    assert_eq!(result.row_count(), 2);
    assert_eq!(
        result.column("n").unwrap().values,
        vec![Value::Int(1), Value::Int(2)]
    );
}

#[test]
fn test_drop_duplicates_is_idempotent() {
    let table = Table::from_columns(vec![ints("n", &[Some(1), Some(1), Some(2), Some(2)])]).unwrap();

    let once = apply(TransformOperation::DropDuplicates, &table).unwrap();
    let twice = apply(TransformOperation::DropDuplicates, &once).unwrap();
    assert_eq!(once, twice);
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_normalize_numeric_bounds() {
    let table = Table::from_columns(vec![
        ints("a", &[Some(10), Some(20), Some(30)]),
        strings("s", &[Some("x"), Some("y"), Some("z")]),
    ])
    .unwrap();

    let result = apply(TransformOperation::NormalizeNumeric, &table).unwrap();
    let column = result.column("a").unwrap();
    assert_eq!(column.dtype, ColumnType::Float);
    assert_eq!(
        column.values,
        vec![Value::Float(0.0), Value::Float(0.5), Value::Float(1.0)]
    );
    // Text columns untouched.
    assert_eq!(result.column("s").unwrap().values[0], Value::Str("x".into()));
}

#[test]
fn test_normalize_numeric_preserves_nulls() {
    let table = Table::from_columns(vec![floats("a", &[Some(0.0), None, Some(2.0)])]).unwrap();
    let result = apply(TransformOperation::NormalizeNumeric, &table).unwrap();
    assert_eq!(
        result.column("a").unwrap().values,
        vec![Value::Float(0.0), Value::Null, Value::Float(1.0)]
    );
}

#[test]
fn test_normalize_numeric_constant_column_fails() {
    let table = Table::from_columns(vec![ints("a", &[Some(5), Some(5)])]).unwrap();
    let err = apply(TransformOperation::NormalizeNumeric, &table).unwrap_err();
    assert!(matches!(err, RetortError::Arithmetic(_)));
}

// =============================================================================
// Filtering and Outliers
// =============================================================================

#[test]
fn test_filter_rows_operators() {
    let table = Table::from_columns(vec![ints("n", &[Some(1), Some(5), Some(10), None])]).unwrap();

    let gt = apply(
        TransformOperation::FilterRows {
            column: "n".into(),
            op: FilterOp::GreaterThan,
            value: 4.0,
        },
        &table,
    )
    .unwrap();
    assert_eq!(gt.row_count(), 2);

    let lt = apply(
        TransformOperation::FilterRows {
            column: "n".into(),
            op: FilterOp::LessThan,
            value: 4.0,
        },
        &table,
    )
    .unwrap();
    assert_eq!(lt.row_count(), 1);

    let eq = apply(
        TransformOperation::FilterRows {
            column: "n".into(),
            op: FilterOp::EqualTo,
            value: 5.0,
        },
        &table,
    )
    .unwrap();
    assert_eq!(eq.row_count(), 1);
}

#[test]
fn test_filter_rows_drops_nulls_and_rejects_text() {
    let table = Table::from_columns(vec![
        ints("n", &[Some(10), None]),
        strings("s", &[Some("a"), Some("b")]),
    ])
    .unwrap();

    let kept = apply(
        TransformOperation::FilterRows {
            column: "n".into(),
            op: FilterOp::GreaterThan,
            value: 0.0,
        },
        &table,
    )
    .unwrap();
    assert_eq!(kept.row_count(), 1);

    let err = apply(
        TransformOperation::FilterRows {
            column: "s".into(),
            op: FilterOp::EqualTo,
            value: 0.0,
        },
        &table,
    )
    .unwrap_err();
    assert!(matches!(err, RetortError::Schema(_)));
}

#[test]
fn test_remove_outliers_iqr() {
    // 1..=9 plus an extreme value; with threshold 1.5 only 100 is outside.
    let mut values: Vec<Option<i64>> = (1..=9).map(Some).collect();
    values.push(Some(100));
    let table = Table::from_columns(vec![ints("n", &values)]).unwrap();

    let result = apply(
        TransformOperation::RemoveOutliers {
            column: "n".into(),
            threshold: 1.5,
        },
        &table,
    )
    .unwrap();
    assert_eq!(result.row_count(), 9);
    assert!(result
        .column("n")
        .unwrap()
        .values
        .iter()
        .all(|v| v != &Value::Int(100)));
}

#[test]
fn test_remove_outliers_keeps_null_rows() {
    let table = Table::from_columns(vec![ints("n", &[Some(1), None, Some(2), Some(3)])]).unwrap();
    let result = apply(
        TransformOperation::RemoveOutliers {
            column: "n".into(),
            threshold: 1.5,
        },
        &table,
    )
    .unwrap();
    assert_eq!(result.row_count(), 4);
}

// =============================================================================
// Splitting and Combining
// =============================================================================

#[test]
fn test_split_column_part_count_is_max_tokens() {
    let table = Table::from_columns(vec![strings(
        "tags",
        &[Some("a,b,c"), Some("d"), None],
    )])
    .unwrap();

    let result = apply(
        TransformOperation::SplitColumn {
            column: "tags".into(),
            delimiter: ",".into(),
        },
        &table,
    )
    .unwrap();

    assert_eq!(result.column_count(), 4); // tags + 3 parts
    assert_eq!(
        result.column("tags_part_1").unwrap().values,
        vec![
            Value::Str("a".into()),
            Value::Str("d".into()),
            Value::Null
        ]
    );
    assert_eq!(
        result.column("tags_part_3").unwrap().values,
        vec![Value::Str("c".into()), Value::Null, Value::Null]
    );
}

#[test]
fn test_split_column_empty_delimiter_fails() {
    let table = Table::from_columns(vec![strings("s", &[Some("ab")])]).unwrap();
    let err = apply(
        TransformOperation::SplitColumn {
            column: "s".into(),
            delimiter: String::new(),
        },
        &table,
    )
    .unwrap_err();
    assert!(matches!(err, RetortError::Schema(_)));
}

#[test]
fn test_combine_columns_renders_values() {
    let table = Table::from_columns(vec![
        strings("city", &[Some("Quito"), Some("Lima")]),
        ints("zone", &[Some(4), None]),
    ])
    .unwrap();

    let result = apply(
        TransformOperation::CombineColumns {
            columns: vec!["city".into(), "zone".into()],
            separator: "_".into(),
        },
        &table,
    )
    .unwrap();

    assert_eq!(
        result.column("combined_column").unwrap().values,
        vec![Value::Str("Quito_4".into()), Value::Str("Lima_".into())]
    );
}

// =============================================================================
// Calculated Columns
// =============================================================================

#[test]
fn test_calculated_column_integer_arithmetic() {
    let table = Table::from_columns(vec![
        ints("a", &[Some(4), Some(9)]),
        ints("b", &[Some(2), Some(3)]),
    ])
    .unwrap();

    let result = apply(
        TransformOperation::CalculatedColumn {
            left: "a".into(),
            op: ArithmeticOp::Multiply,
            right: "b".into(),
            name: "product".into(),
        },
        &table,
    )
    .unwrap();

    let column = result.column("product").unwrap();
    assert_eq!(column.dtype, ColumnType::Integer);
    assert_eq!(column.values, vec![Value::Int(8), Value::Int(27)]);
}

#[test]
fn test_calculated_column_division_is_float() {
    let table = Table::from_columns(vec![
        ints("a", &[Some(9)]),
        ints("b", &[Some(2)]),
    ])
    .unwrap();

    let result = apply(
        TransformOperation::CalculatedColumn {
            left: "a".into(),
            op: ArithmeticOp::Divide,
            right: "b".into(),
            name: "ratio".into(),
        },
        &table,
    )
    .unwrap();

    let column = result.column("ratio").unwrap();
    assert_eq!(column.dtype, ColumnType::Float);
    assert_eq!(column.values, vec![Value::Float(4.5)]);
}

#[test]
fn test_calculated_column_division_by_zero_spec_example() {
    // [4, 9] / [2, 0] fails on the second row.
    let table = Table::from_columns(vec![
        ints("colA", &[Some(4), Some(9)]),
        ints("colB", &[Some(2), Some(0)]),
    ])
    .unwrap();

    let err = apply(
        TransformOperation::CalculatedColumn {
            left: "colA".into(),
            op: ArithmeticOp::Divide,
            right: "colB".into(),
            name: "r".into(),
        },
        &table,
    )
    .unwrap_err();
    match err {
        RetortError::Arithmetic(message) => assert!(message.contains("row 1")),
        other => panic!("expected arithmetic error, got {other:?}"),
    }
}

#[test]
fn test_calculated_column_null_propagates() {
    let table = Table::from_columns(vec![
        ints("a", &[Some(1), None]),
        ints("b", &[Some(2), Some(3)]),
    ])
    .unwrap();

    let result = apply(
        TransformOperation::CalculatedColumn {
            left: "a".into(),
            op: ArithmeticOp::Add,
            right: "b".into(),
            name: "sum".into(),
        },
        &table,
    )
    .unwrap();
    assert_eq!(
        result.column("sum").unwrap().values,
        vec![Value::Int(3), Value::Null]
    );
}

#[test]
fn test_calculated_column_rejects_text_operands() {
    let table = Table::from_columns(vec![
        strings("a", &[Some("x")]),
        ints("b", &[Some(1)]),
    ])
    .unwrap();

    let err = apply(
        TransformOperation::CalculatedColumn {
            left: "a".into(),
            op: ArithmeticOp::Add,
            right: "b".into(),
            name: "out".into(),
        },
        &table,
    )
    .unwrap_err();
    assert!(matches!(err, RetortError::Arithmetic(_)));
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_sort_rows_is_stable() {
    let table = Table::from_columns(vec![
        ints("key", &[Some(2), Some(1), Some(2), Some(1)]),
        strings("tag", &[Some("first2"), Some("first1"), Some("second2"), Some("second1")]),
    ])
    .unwrap();

    let result = apply(
        TransformOperation::SortRows {
            column: "key".into(),
            ascending: true,
        },
        &table,
    )
    .unwrap();

    assert_eq!(
        result.column("tag").unwrap().values,
        vec![
            Value::Str("first1".into()),
            Value::Str("second1".into()),
            Value::Str("first2".into()),
            Value::Str("second2".into()),
        ]
    );
}

#[test]
fn test_sort_rows_nulls_last_both_directions() {
    let table = Table::from_columns(vec![ints("n", &[None, Some(3), Some(1)])]).unwrap();

    let ascending = apply(
        TransformOperation::SortRows {
            column: "n".into(),
            ascending: true,
        },
        &table,
    )
    .unwrap();
    assert_eq!(
        ascending.column("n").unwrap().values,
        vec![Value::Int(1), Value::Int(3), Value::Null]
    );

    let descending = apply(
        TransformOperation::SortRows {
            column: "n".into(),
            ascending: false,
        },
        &table,
    )
    .unwrap();
    assert_eq!(
        descending.column("n").unwrap().values,
        vec![Value::Int(3), Value::Int(1), Value::Null]
    );
}

// =============================================================================
// Text Transformations
// =============================================================================

#[test]
fn test_text_transform_kinds() {
    let table = Table::from_columns(vec![strings(
        "s",
        &[Some("  Hello, World!  "), None],
    )])
    .unwrap();

    let lower = apply(
        TransformOperation::TextTransform {
            column: "s".into(),
            kind: TextKind::Lowercase,
        },
        &table,
    )
    .unwrap();
    assert_eq!(
        lower.column("s").unwrap().values[0],
        Value::Str("  hello, world!  ".into())
    );

    let trimmed = apply(
        TransformOperation::TextTransform {
            column: "s".into(),
            kind: TextKind::Trim,
        },
        &table,
    )
    .unwrap();
    assert_eq!(
        trimmed.column("s").unwrap().values[0],
        Value::Str("Hello, World!".into())
    );

    let stripped = apply(
        TransformOperation::TextTransform {
            column: "s".into(),
            kind: TextKind::StripSpecialChars,
        },
        &table,
    )
    .unwrap();
    assert_eq!(
        stripped.column("s").unwrap().values[0],
        Value::Str("  Hello World  ".into())
    );
    // Nulls pass through untouched.
    assert_eq!(stripped.column("s").unwrap().values[1], Value::Null);
}

#[test]
fn test_text_transform_rejects_numeric_column() {
    let table = Table::from_columns(vec![ints("n", &[Some(1)])]).unwrap();
    let err = apply(
        TransformOperation::TextTransform {
            column: "n".into(),
            kind: TextKind::Lowercase,
        },
        &table,
    )
    .unwrap_err();
    assert!(matches!(err, RetortError::Schema(_)));
}

// =============================================================================
// Type Conversion and Change Records
// =============================================================================

#[test]
fn test_convert_type_through_catalog() {
    let table = Table::from_columns(vec![strings("n", &[Some("1"), Some("2")])]).unwrap();
    let result = apply(
        TransformOperation::ConvertType {
            column: "n".into(),
            target: ColumnType::Integer,
        },
        &table,
    )
    .unwrap();
    assert_eq!(result.column("n").unwrap().dtype, ColumnType::Integer);
}

#[test]
fn test_change_record_reports_rows_and_columns() {
    let table = Table::from_columns(vec![strings("tags", &[Some("a,b"), Some("c")])]).unwrap();
    let applied = TransformEngine::new()
        .apply(
            &TransformOperation::SplitColumn {
                column: "tags".into(),
                delimiter: ",".into(),
            },
            &table,
        )
        .unwrap();

    assert_eq!(applied.change.rows_before, 2);
    assert_eq!(applied.change.rows_after, 2);
    assert_eq!(
        applied.change.columns_added,
        vec!["tags_part_1".to_string(), "tags_part_2".to_string()]
    );
}

#[test]
fn test_missing_column_is_reported() {
    let table = Table::from_columns(vec![ints("n", &[Some(1)])]).unwrap();
    let err = apply(
        TransformOperation::SortRows {
            column: "ghost".into(),
            ascending: true,
        },
        &table,
    )
    .unwrap_err();
    assert!(matches!(err, RetortError::ColumnNotFound(_)));
}
