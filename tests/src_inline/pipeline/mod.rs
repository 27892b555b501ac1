use super::*;
use crate::input::csv_table::read_table;
use crate::input::schema::discover;

fn dataset(text: &str) -> LoadedDataset {
    let table = read_table(text.as_bytes(), b',').unwrap();
    let schema = discover(table.columns());
    LoadedDataset { table, schema }
}

const CSV: &str = "\
position_name,fullname,final_match_rate,grade_name,tv_excel,bench_excel,tv_sql,bench_sql
Analyst,Ana,90,III,80,60,,70
Analyst,Budi,70,IV,60,60,50,70
Engineer,Citra,50,III,55,50,60,60
";

#[test]
fn test_empty_query_awaits_input() {
    let ds = dataset(CSV);
    let params = QueryParams::default();
    assert!(matches!(run_query(&ds, "", &params), QueryOutcome::AwaitingInput));
    assert!(matches!(run_query(&ds, "  \t", &params), QueryOutcome::AwaitingInput));
}

#[test]
fn test_no_match_outcome() {
    let ds = dataset(CSV);
    match run_query(&ds, " Designer ", &QueryParams::default()) {
        QueryOutcome::NoMatch { query } => assert_eq!(query, "Designer"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_full_pass() {
    let ds = dataset(CSV);
    let QueryOutcome::Report(report) = run_query(&ds, "analyst", &QueryParams::default()) else {
        panic!("expected a report");
    };
    assert_eq!(report.employees.len(), 2);
    assert_eq!(report.employees.number(0, "gap_tv"), Some(20.0));
    assert_eq!(report.employees.number(1, "gap_tv"), Some(-10.0));
    // No tgv_ columns: one advisory for the whole query.
    assert_eq!(report.advisories, vec![Advisory::NoDimensionsFound]);
    assert_eq!(report.employees.derived("tgv_avg"), Some(&[None, None][..]));

    assert_eq!(report.aggregates.match_rate.mean, Some(80.0));
    assert!((report.aggregates.match_rate.stddev.unwrap() - 14.1421).abs() < 1e-3);
    assert_eq!(report.ranked.top[0].name.as_deref(), Some("Ana"));
    assert_eq!(report.ranked.bottom[0].name.as_deref(), Some("Budi"));
    assert!(report.aggregates.tgv_profile.is_empty());
    assert_eq!(report.aggregates.by_grade.as_ref().map(Vec::len), Some(2));
}

#[test]
fn test_queries_do_not_leak_into_each_other() {
    let ds = dataset(CSV);
    let params = QueryParams { top_n: 1, bins: 5 };
    let QueryOutcome::Report(first) = run_query(&ds, "Engineer", &params) else {
        panic!("expected a report");
    };
    let QueryOutcome::Report(second) = run_query(&ds, "Analyst", &params) else {
        panic!("expected a report");
    };
    assert_eq!(first.employees.len(), 1);
    assert_eq!(second.ranked.top.len(), 1);
    assert_eq!(ds.table.columns().len(), 8);
    assert!(!ds.table.has_column("gap_tv"));
}
