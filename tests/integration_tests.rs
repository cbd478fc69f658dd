use calibration_tools::aggregator::run;
use calibration_tools::config::AggregatorConfig;
use calibration_tools::error::{AggregateError, ErrorKind};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "Date,Time,Sensor,Temperature,Humidity\n";

fn fresh_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("calibration_tools_it_{}", name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_log(dir: &Path, name: &str, rows: &[&str]) {
    let mut content = HEADER.to_string();
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_full_pipeline() {
    let dir = fresh_dir("pipeline");
    write_log(
        &dir,
        "log.csv",
        &[
            "02/01/2023,08:00:00,X,20.0,50.0",
            "02/01/2023,09:00:00,X,22.0,54.0",
        ],
    );
    let output = dir.join("Output.txt");

    let rows = run(&AggregatorConfig::new(&dir, &output)).expect("pipeline should succeed");

    assert_eq!(rows.len(), 1);
    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "date\tave temperature\tave humidity\n02/01/2023\t21.0\t52.0\n"
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_dates_across_files_keep_first_seen_order() {
    let dir = fresh_dir("order");
    write_log(
        &dir,
        "a.csv",
        &["03/15/2023,23:00:00,X,18.0,40.0", "01/02/2023,07:00:00,X,10.0,30.0"],
    );
    write_log(
        &dir,
        "b.csv",
        &["01/02/2023,06:00:00,X,12.0,34.0", "03/15/2023,22:00:00,X,20.0,42.0"],
    );
    let output = dir.join("Output.txt");

    run(&AggregatorConfig::new(&dir, &output)).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "date\tave temperature\tave humidity",
            "03/15/2023\t19.0\t41.0",
            "01/02/2023\t11.0\t32.0",
        ]
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = fresh_dir("idempotent");
    write_log(
        &dir,
        "one.csv",
        &[
            "04/01/2023,08:00:00,X,21.13,47.9",
            "04/01/2023,08:05:00,X,21.19,48.3",
            "04/02/2023,08:00:00,X,19.87,51.05",
        ],
    );
    write_log(&dir, "two.csv", &["04/02/2023,09:00:00,X,20.4,50.5"]);
    let output = dir.join("Output.txt");
    let config = AggregatorConfig::new(&dir, &output);

    run(&config).unwrap();
    let first = fs::read(&output).unwrap();
    run(&config).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_malformed_row_writes_no_output() {
    let dir = fresh_dir("malformed");
    write_log(
        &dir,
        "log.csv",
        &["02/01/2023,08:00:00,X,20.0,50.0", "02/01/2023,09:00:00,X,N/A,54.0"],
    );
    let output = dir.join("Output.txt");

    let err = run(&AggregatorConfig::new(&dir, &output)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("log.csv:3"));
    assert!(!output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_bad_timestamp_writes_no_output() {
    let dir = fresh_dir("timestamp");
    write_log(&dir, "log.csv", &["2023-02-01,08:00:00,X,20.0,50.0"]);
    let output = dir.join("Output.txt");

    let err = run(&AggregatorConfig::new(&dir, &output)).unwrap_err();

    assert!(matches!(err, AggregateError::InvalidTimestamp { .. }));
    assert!(err.to_string().contains("log.csv:2"));
    assert!(!output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_nonexistent_date_names_file_and_line() {
    let dir = fresh_dir("nonexistent_date");
    write_log(
        &dir,
        "day7.csv",
        &["02/28/2023,08:00:00,X,1,1", "02/30/2023,08:00:00,X,1,1"],
    );
    let output = dir.join("Output.txt");

    let err = run(&AggregatorConfig::new(&dir, &output)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    let message = err.to_string();
    assert!(message.contains("day7.csv:3: invalid timestamp"), "{message}");
    assert!(!output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unwritable_output_is_io_error() {
    let dir = fresh_dir("unwritable");
    write_log(&dir, "log.csv", &["02/01/2023,08:00:00,X,20.0,50.0"]);
    let output = dir.join("missing").join("Output.txt");

    let err = run(&AggregatorConfig::new(&dir, &output)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err, AggregateError::Io { .. }));
    assert!(!output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_empty_directory_is_input_error() {
    let dir = fresh_dir("nofiles");
    let output = dir.join("Output.txt");

    let err = run(&AggregatorConfig::new(&dir, &output)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(!output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_recursive_collects_subdirectories() {
    let dir = fresh_dir("recursive");
    write_log(&dir, "top.csv", &["05/01/2023,08:00:00,X,20.0,50.0"]);
    let nested = dir.join("week2");
    fs::create_dir_all(&nested).unwrap();
    write_log(&nested, "nested.csv", &["05/08/2023,08:00:00,X,24.0,60.0"]);
    let output = dir.join("Output.txt");

    let flat = run(&AggregatorConfig::new(&dir, &output)).unwrap();
    assert_eq!(flat.len(), 1);

    let deep = run(&AggregatorConfig::new(&dir, &output).with_recursive(true)).unwrap();
    assert_eq!(deep.len(), 2);

    fs::remove_dir_all(&dir).unwrap();
}
