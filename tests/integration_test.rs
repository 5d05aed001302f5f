//! Integration tests for csvfold

use csvfold::{CsvFoldError, CsvFolder, FoldConfig, HeaderMode, Record};
use flate2::write::GzEncoder;
use flate2::Compression;
use s_zip::{CompressionMethod, StreamingZipWriter};
use std::collections::HashMap;
use std::convert::Infallible;
use std::error::Error as _;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(content: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(content.as_bytes()).unwrap();
    temp.flush().unwrap();
    temp
}

fn collect(folder: &CsvFolder) -> csvfold::Result<Vec<Record>> {
    folder.fold_default(|acc: &mut Vec<Record>, record| {
        acc.push(record);
        Ok::<_, Infallible>(())
    })
}

#[test]
fn test_header_derivation() {
    let temp = csv_file("id,scale\nA,1\nB,2\n");
    let folder = CsvFolder::new(temp.path());

    let records = collect(&folder).unwrap();
    assert_eq!(
        records,
        vec![
            Record::from_iter([("id", "A"), ("scale", "1")]),
            Record::from_iter([("id", "B"), ("scale", "2")]),
        ]
    );

    let mut iter = folder.records().unwrap();
    assert!(iter.headers().is_none());
    iter.next();
    assert_eq!(
        iter.headers().unwrap().names(),
        &["id".to_string(), "scale".to_string()]
    );
}

#[test]
fn test_supplied_headers_keep_every_line() {
    let temp = csv_file("id,scale\nA,1\nB,2\n");
    let records = collect(&CsvFolder::new(temp.path()).headers(["x", "y"])).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0], Record::from_iter([("x", "id"), ("y", "scale")]));
    assert_eq!(records[2].get("x"), Some("B"));
}

#[test]
fn test_one_invocation_per_data_line() {
    let mut content = String::from("id,a,b\n");
    for i in 0..250 {
        content.push_str(&format!("row{i},{i},\"{i},{i}\"\n"));
    }
    let temp = csv_file(&content);

    let mut calls = 0;
    let keys_ok = CsvFolder::new(temp.path())
        .fold(true, |ok, record| {
            calls += 1;
            Ok::<_, Infallible>(ok && record.keys().eq(["id", "a", "b"]))
        })
        .unwrap();

    assert_eq!(calls, 250);
    assert!(keys_ok);
}

#[test]
fn test_quote_aware_split() {
    let temp = csv_file("p,q,r\na,\"b,c\",d\n");
    let records = collect(&CsvFolder::new(temp.path())).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("q"), Some("b,c"));
    assert_eq!(records[0].get("r"), Some("d"));
}

#[test]
fn test_blank_lines_skipped() {
    let temp = csv_file("id,scale\n, , ,\nA,1\n\n   \nB,2\n");
    let mut calls = 0;
    CsvFolder::new(temp.path())
        .fold_in_place((), |_, _| {
            calls += 1;
            Ok::<_, Infallible>(())
        })
        .unwrap();
    assert_eq!(calls, 2);
}

#[test]
fn test_reducer_failure_attributes_line() {
    let temp = csv_file("id,scale\nA,1\nB,2\nC,3\n");
    let mut seen = Vec::new();

    let err = CsvFolder::new(temp.path())
        .fold_in_place(0u32, |acc, record| {
            seen.push(record.get("id").unwrap_or_default().to_string());
            if record.get("id") == Some("B") {
                return Err(format!("cannot scale {}", &record["id"]));
            }
            *acc += 1;
            Ok(())
        })
        .unwrap_err();

    match &err {
        CsvFoldError::RecordProcessingFailed {
            path, line_index, ..
        } => {
            assert_eq!(path, temp.path());
            assert_eq!(*line_index, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.source().unwrap().to_string(), "cannot scale B");
    // aborted: the record after the failing one is never seen
    assert_eq!(seen, vec!["A", "B"]);
}

#[test]
fn test_line_index_counts_blank_lines() {
    let temp = csv_file("id\n\nA\n\nB\n");
    let err = CsvFolder::new(temp.path())
        .fold((), |_, record| match record.get("id") {
            Some("B") => Err("no"),
            _ => Ok(()),
        })
        .unwrap_err();
    assert_eq!(err.line_index(), Some(5));
}

#[test]
fn test_missing_headers_checked_before_io() {
    // the path does not exist, so any I/O attempt would report SourceUnavailable
    let folder = CsvFolder::new("does/not/exist.csv").headers(Vec::<String>::new());
    let err = collect(&folder).unwrap_err();
    assert!(matches!(err, CsvFoldError::MissingHeaders));
    assert!(matches!(folder.records().err(), Some(CsvFoldError::MissingHeaders)));
}

#[test]
fn test_source_unavailable() {
    let err = collect(&CsvFolder::new("does/not/exist.csv")).unwrap_err();
    assert!(matches!(err, CsvFoldError::SourceUnavailable { .. }));
    assert!(err.to_string().contains("exist.csv"));
}

#[test]
fn test_invalid_delimiter() {
    let temp = csv_file("a,b\n1,2\n");
    let err = collect(&CsvFolder::new(temp.path()).delimiter("")).unwrap_err();
    assert!(matches!(err, CsvFoldError::InvalidDelimiter(_)));
}

#[test]
fn test_idempotent_reads() {
    let temp = csv_file("id,scale\nA,1\nB,2\nA,5\n");
    let folder = CsvFolder::new(temp.path());
    let tally = |acc: &mut HashMap<String, u32>, record: Record| {
        let n: u32 = record.get("scale").unwrap_or("0").parse()?;
        *acc.entry(record["id"].to_string()).or_default() += n;
        Ok::<_, std::num::ParseIntError>(())
    };

    let first: HashMap<String, u32> = folder.fold_default(tally).unwrap();
    let second: HashMap<String, u32> = folder.fold_default(tally).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.get("A"), Some(&6));
}

#[test]
fn test_ragged_lines_zip_by_position() {
    let temp = csv_file("a,b,c\n1\n1,2,3,4\n");
    let records = collect(&CsvFolder::new(temp.path())).unwrap();

    assert_eq!(records[0].len(), 1);
    assert!(!records[0].contains_key("b"));
    assert_eq!(records[1], Record::from_iter([("a", "1"), ("b", "2"), ("c", "3")]));
}

#[test]
fn test_crlf_and_custom_delimiter() {
    let temp = csv_file("id;name\r\n1;\"Doe; John\"\r\n2; Smith \r\n");
    let records = collect(&CsvFolder::new(temp.path()).delimiter(";")).unwrap();

    assert_eq!(records[0].get("name"), Some("Doe; John"));
    assert_eq!(records[1].get("name"), Some("Smith"));
}

#[test]
fn test_config_struct() {
    let temp = csv_file("1|2\n");
    let config = FoldConfig {
        delimiter: "|".to_string(),
        header_mode: HeaderMode::Supplied(vec!["l".into(), "r".into()]),
        ..FoldConfig::default()
    };
    let records = collect(&CsvFolder::new(temp.path()).with_config(config)).unwrap();
    assert_eq!(records, vec![Record::from_iter([("l", "1"), ("r", "2")])]);
}

#[test]
fn test_records_iterator_stops_on_drop() {
    let temp = csv_file("n\n1\n2\n3\n");
    let folder = CsvFolder::new(temp.path());

    let first_two: Vec<Record> = folder
        .records()
        .unwrap()
        .take(2)
        .collect::<csvfold::Result<_>>()
        .unwrap();
    assert_eq!(first_two.len(), 2);

    // a fresh read starts from the top again
    assert_eq!(collect(&folder).unwrap().len(), 3);
}

#[test]
fn test_empty_file() {
    let temp = csv_file("");
    assert!(collect(&CsvFolder::new(temp.path())).unwrap().is_empty());
}

fn write_archive(path: &std::path::Path, method: CompressionMethod, entries: &[(&str, &str)]) {
    let mut zip = StreamingZipWriter::with_method(path, method, 3).unwrap();
    for (name, content) in entries {
        zip.start_entry(name).unwrap();
        zip.write_data(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn test_zstd_archive_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv.zst");
    write_archive(&path, CompressionMethod::Zstd, &[("data.csv", "id,scale\nA,1\nB,2\n")]);

    let records = collect(&CsvFolder::new(&path)).unwrap();
    assert_eq!(
        records,
        vec![
            Record::from_iter([("id", "A"), ("scale", "1")]),
            Record::from_iter([("id", "B"), ("scale", "2")]),
        ]
    );
}

#[test]
fn test_zip_archive_prefers_csv_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.csv.zip");
    write_archive(
        &path,
        CompressionMethod::Deflate,
        &[("README.txt", "not,a\nrecord,file\n"), ("rows.csv", "n\n1\n2\n3\n")],
    );

    let records = collect(&CsvFolder::new(&path)).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["n"]);
}

#[test]
fn test_zip_archive_falls_back_to_first_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv.zip");
    write_archive(&path, CompressionMethod::Deflate, &[("export.dat", "k;v\nx;1\n")]);

    let records = collect(&CsvFolder::new(&path).delimiter(";")).unwrap();
    assert_eq!(records, vec![Record::from_iter([("k", "x"), ("v", "1")])]);
}

#[test]
fn test_corrupt_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv.zip");
    std::fs::write(&path, b"this is not a zip archive").unwrap();

    let err = collect(&CsvFolder::new(&path)).unwrap_err();
    assert!(matches!(err, CsvFoldError::Archive { .. }));
}

#[test]
fn test_gzip_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("d.csv.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b"id,scale\r\nA,1\r\nB,2\r\n").unwrap();
    encoder.finish().unwrap();

    let records = collect(&CsvFolder::new(&path)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1], Record::from_iter([("id", "B"), ("scale", "2")]));
}

#[test]
fn test_directory_path_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = collect(&CsvFolder::new(dir.path())).unwrap_err();
    assert!(matches!(err, CsvFoldError::SourceUnavailable { .. }));
    assert_eq!(err.line_index(), None);
}

#[test]
fn test_header_line_ending_in_lone_cr() {
    let temp = csv_file("id,scale\r");
    let folder = CsvFolder::new(temp.path());
    let mut records = folder.records().unwrap();

    assert!(records.next().is_none());
    assert_eq!(
        records.headers().unwrap().names(),
        &["id".to_string(), "scale".to_string()]
    );
}
