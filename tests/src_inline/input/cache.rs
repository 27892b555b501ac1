use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("talent_match_cache_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_load_is_memoized() {
    let dir = make_temp_dir();
    let path = dir.join("df.csv");
    fs::write(&path, "position_name,fullname,final_match_rate\nAnalyst,Ana,90\n").unwrap();

    let store = DatasetStore::new(&path, b',');
    assert!(!store.is_loaded());
    let first = store.load().unwrap();
    assert!(store.is_loaded());

    // The file is gone; a second load must not touch storage.
    fs::remove_file(&path).unwrap();
    let second = store.load().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.table.n_rows(), 1);
}

#[test]
fn test_failed_load_not_cached() {
    let dir = make_temp_dir();
    let path = dir.join("late.csv");
    let store = DatasetStore::new(&path, b',');

    let err = store.load().unwrap_err();
    assert!(matches!(err, InputError::MissingInput(_)));
    assert!(!store.is_loaded());

    fs::write(&path, "position_name,fullname,final_match_rate\nAnalyst,Ana,90\n").unwrap();
    assert!(store.load().is_ok());
    assert_eq!(store.path(), path.as_path());
}
