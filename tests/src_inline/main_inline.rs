use std::fs;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("talent_match_main_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const CSV: &str = "\
position_name,fullname,final_match_rate,tgv_drive
Data Analyst,Ana,90,80
data analyst,Budi,70,60
Engineer,Citra,50,40
";

fn write_dataset() -> PathBuf {
    let path = make_temp_dir().join("df_final_fix.csv");
    fs::write(&path, CSV).unwrap();
    path
}

fn config_for(path: &Path, out_dir: Option<PathBuf>, layout: OutputLayout) -> RunConfig {
    RunConfig {
        input: path.to_path_buf(),
        delimiter: b',',
        out_dir,
        layout,
        params: QueryParams::default(),
    }
}

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::try_parse_from(["talent-match", "run", "--position", "Data Analyst"]).unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.position, "Data Analyst");
    assert_eq!(args.input.input, PathBuf::from(DEFAULT_INPUT));
    assert_eq!(args.report.top_n, 10);
    assert_eq!(args.report.bins, 20);
    assert_eq!(cli.verbose, 0);
}

#[test]
fn test_parse_session_with_verbosity() {
    let cli = Cli::try_parse_from([
        "talent-match",
        "-vv",
        "session",
        "--input",
        "data.csv.gz",
        "--out",
        "reports",
        "--top-n",
        "5",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 2);
    let Command::Session(args) = cli.command else {
        panic!("expected session");
    };
    let config = build_config(&args.input, Some(&args.report), OutputLayout::PerQuery).unwrap();
    assert_eq!(config.params.top_n, 5);
    assert_eq!(config.out_dir, Some(PathBuf::from("reports")));
}

#[test]
fn test_bins_and_top_n_bounds() {
    for args in [
        ["talent-match", "run", "--bins", "0"],
        ["talent-match", "run", "--bins", "18446744073709551615"],
        ["talent-match", "run", "--top-n", "0"],
        ["talent-match", "session", "--top-n", "0"],
    ] {
        assert!(Cli::try_parse_from(args).is_err(), "accepted {args:?}");
    }

    let max_bins = MAX_BINS.to_string();
    let cli = Cli::try_parse_from(["talent-match", "run", "--bins", max_bins.as_str()]).unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.report.bins, MAX_BINS);
}

#[test]
fn test_non_ascii_delimiter_rejected() {
    let args = InputArgs {
        input: PathBuf::from("x.csv"),
        delimiter: '§',
    };
    let err = build_config(&args, None, OutputLayout::Flat).unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_resolve_output_dir() {
    let base = Path::new("/tmp/out");
    assert_eq!(
        resolve_output_dir(base, "Data Analyst", OutputLayout::Flat),
        PathBuf::from("/tmp/out")
    );
    assert_eq!(
        resolve_output_dir(base, "Data Analyst", OutputLayout::PerQuery),
        PathBuf::from("/tmp/out/data-analyst")
    );
}

#[test]
fn test_run_no_match_exit_code() {
    let path = write_dataset();
    let mut out = Vec::new();
    let cli = Cli::try_parse_from([
        "talent-match",
        "run",
        "--position",
        "Designer",
        "--input",
        path.to_str().unwrap(),
    ])
    .unwrap();
    let err = dispatch(cli.command, &mut out).unwrap_err();
    assert!(matches!(err, AppError::NoMatch(ref q) if q == "Designer"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_run_missing_dataset() {
    let dir = make_temp_dir();
    let missing = dir.join("nope.csv");
    let cli = Cli::try_parse_from([
        "talent-match",
        "run",
        "--position",
        "Analyst",
        "--input",
        missing.to_str().unwrap(),
    ])
    .unwrap();
    let err = dispatch(cli.command, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, AppError::DataUnavailable(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_run_empty_position_prompts() {
    let path = write_dataset();
    let cli = Cli::try_parse_from(["talent-match", "run", "--input", path.to_str().unwrap()])
        .unwrap();
    let mut out = Vec::new();
    dispatch(cli.command, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), prompt_text());
}

#[test]
fn test_positions_listing() {
    let path = write_dataset();
    let cli = Cli::try_parse_from(["talent-match", "positions", "--input", path.to_str().unwrap()])
        .unwrap();
    let mut out = Vec::new();
    dispatch(cli.command, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "1\tData Analyst\n1\tEngineer\n1\tdata analyst\n"
    );
}

#[test]
fn test_session_answers_each_line() {
    let path = write_dataset();
    let out_dir = make_temp_dir().join("reports");
    let config = config_for(&path, Some(out_dir.clone()), OutputLayout::PerQuery);
    let store = DatasetStore::new(&path, b',');

    let input = Cursor::new("\nDATA ANALYST\nDesigner\nengineer\n");
    let mut out = Vec::new();
    let stats = run_session(&store, &config, input, &mut out).unwrap();

    assert_eq!(
        stats,
        SessionStats {
            queries: 4,
            reports: 2,
            no_match: 1,
            prompts: 1,
        }
    );
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Found 2 employees with position Data Analyst"));
    assert!(text.contains("Position 'Designer' not found in the dataset."));
    assert!(text.contains("Found 1 employees with position Engineer"));
    assert!(out_dir.join("data-analyst").join("summary.json").exists());
    assert!(out_dir.join("engineer").join("employees.tsv").exists());
}

#[test]
fn test_session_uses_one_load() {
    let path = write_dataset();
    let config = config_for(&path, None, OutputLayout::PerQuery);
    let store = DatasetStore::new(&path, b',');
    let first = store.load().unwrap();

    fs::remove_file(&path).unwrap();
    let mut out = Vec::new();
    let stats = run_session(&store, &config, Cursor::new("engineer\n"), &mut out).unwrap();
    assert_eq!(stats.reports, 1);
    assert!(std::sync::Arc::ptr_eq(&first, &store.load().unwrap()));
}

#[test]
fn test_session_halts_when_dataset_unavailable() {
    let dir = make_temp_dir();
    let path = dir.join("absent.csv");
    let config = config_for(&path, None, OutputLayout::PerQuery);
    let store = DatasetStore::new(&path, b',');
    let mut out = Vec::new();
    let err = run_session(&store, &config, Cursor::new("engineer\n"), &mut out).unwrap_err();
    assert!(matches!(err, AppError::DataUnavailable(_)));
    assert!(out.is_empty());
}
