use crate::data::*;
use crate::error::TidyError;
use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_temp(text: &str) -> Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("input.csv");
    std::fs::write(&path, text)?;
    Ok((dir, path))
}

fn read(text: &str) -> Result<Dataset> {
    let (_dir, path) = write_temp(text)?;
    Ok(load_csv(&path, &CsvOptions::default())?)
}

fn to_text(dataset: &Dataset) -> Result<String> {
    let mut out = Vec::new();
    write_csv(dataset, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_load_infers_numeric_and_text() -> Result<()> {
    let df = read("id,name,score\n1,Alice,9.5\n2,Bob,\n3,NA,7\n")?;

    assert_eq!(df.column_names(), vec!["id", "name", "score"]);
    assert_eq!(df.row_count(), 3);
    assert_eq!(df.kind("id"), Some(ColumnKind::Numeric));
    assert_eq!(df.kind("name"), Some(ColumnKind::Text));
    assert_eq!(df.kind("score"), Some(ColumnKind::Numeric));

    assert_eq!(df.column("score").unwrap().null_count(), 1);
    assert_eq!(numbers(df.column("id").unwrap())?, vec![1.0, 2.0, 3.0]);
    assert_eq!(labels(df.column("name").unwrap())?[2], None);
    Ok(())
}

#[test]
fn test_load_header_only() -> Result<()> {
    let df = read("a,b\n")?;
    assert_eq!(df.column_count(), 2);
    assert_eq!(df.row_count(), 0);
    Ok(())
}

#[test]
fn test_load_empty_file_is_invalid() -> Result<()> {
    let (_dir, path) = write_temp("")?;
    let err = load_csv(&path, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, TidyError::InvalidInput(_)), "{err}");
    Ok(())
}

#[test]
fn test_duplicate_headers_stay_distinct() -> Result<()> {
    let df = read("x,x,x\n1,2,3\n")?;
    let names = df.column_names();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0], "x");
    assert!(names[1] != names[0] && names[2] != names[1] && names[2] != names[0]);
    Ok(())
}

#[test]
fn test_custom_null_tokens() -> Result<()> {
    let (_dir, path) = write_temp("v\n-\nNA\n")?;
    let options = CsvOptions {
        null_tokens: vec!["-".to_owned()],
        ..Default::default()
    };
    let df = load_csv(&path, &options)?;
    let v = labels(df.column("v").unwrap())?;
    assert_eq!(v, vec![None, Some("NA".to_owned())]);
    Ok(())
}

#[test]
fn test_write_csv_keeps_order_and_blanks() -> Result<()> {
    let df = read("b,a\n1,x\n,y\n2.5,\n")?;
    let text = to_text(&df)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "b,a");
    assert_eq!(lines[2], ",y");
    assert_eq!(lines[3], "2.5,");
    Ok(())
}

#[test]
fn test_write_date_only_timestamps() -> Result<()> {
    let df = read("d\n2024-01-01\n2024-02-01\n")?;
    let (cleaned, _) = clean(
        &df,
        &CleaningOptions {
            coerce_types: true,
            ..Default::default()
        },
    )?;
    assert_eq!(cleaned.kind("d"), Some(ColumnKind::Timestamp));
    assert_eq!(to_text(&cleaned)?, "d\n2024-01-01\n2024-02-01\n");
    Ok(())
}

#[test]
fn test_fractional_seconds_survive_a_round_trip() -> Result<()> {
    let df = read("t\n2024-01-01 12:00:00.5\n2024-01-02 08:00:00\n")?;
    let coerce = CleaningOptions {
        coerce_types: true,
        ..Default::default()
    };
    let (cleaned, _) = clean(&df, &coerce)?;
    let text = to_text(&cleaned)?;
    assert!(text.contains("2024-01-01 12:00:00.500"), "{text}");

    let (reloaded, _) = clean(&read(&text)?, &coerce)?;
    assert_eq!(reloaded, cleaned);
    Ok(())
}

#[test]
fn test_save_and_load_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");

    let df = read("k,v\na,1\nb,2\n")?;
    save_csv(&df, &path)?;
    let back = load_csv(&path, &CsvOptions::default())?;
    assert_eq!(back, df);
    Ok(())
}

#[test]
fn test_load_missing_file_fails() {
    let result = load_csv(
        std::path::Path::new("definitely/not/here.csv"),
        &CsvOptions::default(),
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to open"), "{err}");
}
