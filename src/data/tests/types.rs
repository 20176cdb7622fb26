use crate::data::*;
use crate::error::TidyError;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_dataset_rejects_ragged_columns() {
    let err = Dataset::new(vec![
        Series::new("a".into(), [1.0, 2.0]).into(),
        Series::new("b".into(), [1.0]).into(),
    ])
    .unwrap_err();
    assert!(matches!(err, TidyError::InvalidInput(_)));
}

#[test]
fn test_dataset_rejects_duplicate_names() {
    let err = Dataset::new(vec![
        Series::new("a".into(), [1.0]).into(),
        Series::new("a".into(), [2.0]).into(),
    ])
    .unwrap_err();
    assert!(matches!(err, TidyError::InvalidInput(_)));
}

#[test]
fn test_columns_are_normalised_to_their_kind() -> Result<()> {
    let df = Dataset::new(vec![
        Series::new("ints".into(), [1_i64, 2]).into(),
        Series::new("flags".into(), [true, false]).into(),
    ])?;
    assert_eq!(df.column("ints").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.kind("flags"), Some(ColumnKind::Text));
    assert_eq!(labels(df.column("flags").unwrap())?[0].as_deref(), Some("true"));
    Ok(())
}

#[test]
fn test_head_and_tail() -> Result<()> {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let df = Dataset::new(vec![Series::new("n".into(), values).into()])?;

    assert_eq!(numbers(df.head(3).column("n").unwrap())?, vec![1.0, 2.0, 3.0]);
    assert_eq!(numbers(df.tail(2).column("n").unwrap())?, vec![9.0, 10.0]);
    assert_eq!(df.head(50).row_count(), 10);
    assert_eq!(df.tail(0).row_count(), 0);
    Ok(())
}

#[test]
fn test_equality_ignores_categorical_encoding() -> Result<()> {
    let text: Column = Series::new("c".into(), ["x", "y", "x"]).into();
    let a = Dataset::new(vec![text.cast(&ColumnKind::Categorical.dtype())?])?;
    let b = Dataset::new(vec![
        Series::new("c".into(), ["x", "y", "x"])
            .cast(&ColumnKind::Categorical.dtype())?
            .into(),
    ])?;
    assert_eq!(a, b);

    let plain = Dataset::new(vec![text])?;
    assert_ne!(a, plain);
    Ok(())
}

#[test]
fn test_value_counts_break_ties_by_first_appearance() -> Result<()> {
    let col: Column = Series::new("v".into(), [Some("b"), Some("a"), None, Some("a"), Some("b"), Some("c")]).into();
    assert_eq!(
        value_counts(&col)?,
        vec![("b".to_owned(), 2), ("a".to_owned(), 2), ("c".to_owned(), 1)]
    );

    let empty: Column = Series::new("v".into(), [None::<&str>]).into();
    assert!(value_counts(&empty)?.is_empty());
    Ok(())
}

#[test]
fn test_labels_render_numbers_without_trailing_zeros() -> Result<()> {
    let col: Column = Series::new("n".into(), [Some(1.0), None, Some(2.5)]).into();
    assert_eq!(
        labels(&col)?,
        vec![Some("1".to_owned()), None, Some("2.5".to_owned())]
    );
    Ok(())
}

#[test]
fn test_column_kind_display() {
    assert_eq!(ColumnKind::Numeric.to_string(), "Numeric");
    assert_eq!(ColumnKind::Categorical.to_string(), "Categorical");
    assert_eq!(ColumnKind::Timestamp.to_string(), "Timestamp");
}
