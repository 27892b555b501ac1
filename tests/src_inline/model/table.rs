use super::*;
use crate::model::value::Value;

fn sample_table() -> Table {
    Table::new(
        vec!["fullname".to_string(), "score".to_string()],
        vec![
            vec![Value::Text("Ana".to_string()), Value::parse("10")],
            vec![Value::Text("Budi".to_string()), Value::Missing],
            vec![Value::Text("Citra".to_string())],
        ],
    )
}

#[test]
fn test_short_rows_are_padded() {
    let table = sample_table();
    assert_eq!(table.row(2).len(), 2);
    assert_eq!(table.cell(2, "score"), &Value::Missing);
}

#[test]
fn test_unknown_column_reads_missing() {
    let table = sample_table();
    assert_eq!(table.cell(0, "nope"), &Value::Missing);
    assert!(!table.has_column("nope"));
}

#[test]
fn test_duplicate_header_keeps_first() {
    let table = Table::new(
        vec!["a".to_string(), "a".to_string()],
        vec![vec![Value::parse("1"), Value::parse("2")]],
    );
    assert_eq!(table.column_index("a"), Some(0));
    assert_eq!(table.cell(0, "a").as_f64(), Some(1.0));
}

#[test]
fn test_view_derived_values_follow_rows() {
    let table = sample_table();
    let mut view = table.view_all();
    view.attach("double", vec![Some(20.0), None, Some(1.0)]);

    let sub = view.select(&[2, 0]);
    assert_eq!(sub.source_rows(), &[2, 0]);
    assert_eq!(sub.derived("double"), Some(&[Some(1.0), Some(20.0)][..]));
    assert_eq!(sub.text(0, "fullname"), Some("Citra"));
    assert_eq!(sub.number(1, "double"), Some(20.0));
    assert_eq!(sub.number(1, "score"), Some(10.0));
}

#[test]
fn test_attach_replaces_existing_column() {
    let table = sample_table();
    let mut view = table.view_all();
    view.attach("x", vec![None, None, None]);
    view.attach("x", vec![Some(1.0), Some(2.0), Some(3.0)]);
    assert_eq!(view.derived_columns().len(), 1);
    assert_eq!(view.present_numbers("x"), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_display_skips_missing() {
    let table = sample_table();
    let view = table.view_all();
    assert_eq!(view.display(0, "score").as_deref(), Some("10"));
    assert_eq!(view.display(1, "score"), None);
}

#[test]
fn test_selecting_does_not_touch_source() {
    let table = sample_table();
    let view = table.view_all();
    let mut sub = view.select(&[1]);
    sub.attach("extra", vec![Some(5.0)]);
    assert_eq!(table.columns().len(), 2);
    assert_eq!(table.n_rows(), 3);
    assert!(view.derived("extra").is_none());
}
