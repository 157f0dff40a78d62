use devdash::export::to_csv;
use devdash::filter::filter_window;
use devdash::ingest::{IngestError, ingest};
use devdash::record::RecordStore;

const SAMPLE: &str = "\
date,developer,status,new_tasks,completed_tasks,effort_hours
2024-01-01,alice,open,3,1,4.5
2024-01-01,bob,done,0,2,6.0
2024-01-08,alice,done,1,1,2.0
";

// Test that a well-formed upload parses into typed records
fn test_ingest_well_formed() {
    println!("\n====== Testing ingest with well-formed CSV ======");
    let records = ingest(SAMPLE.as_bytes()).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].developer, "alice");
    assert_eq!(records[0].status, "open");
    assert_eq!(records[0].new_tasks, 3);
    assert_eq!(records[1].effort_hours, 6.0);
    assert_eq!(records[2].date.to_string(), "2024-01-08");
    println!("✓ All 3 rows parsed with the expected field values");
}

// Test that ingest then export then ingest reproduces the same records,
// and that filtering with window 0 returns the input unchanged
fn test_round_trip() {
    println!("\n====== Testing ingest/export round trip ======");
    let records = ingest(SAMPLE.as_bytes()).unwrap();

    let unfiltered = filter_window(&records, 0);
    assert_eq!(unfiltered, records);
    println!("✓ filter(window=0) returns the record set unchanged");

    let exported = to_csv(&records).unwrap();
    let reparsed = ingest(exported.as_bytes()).unwrap();
    assert_eq!(reparsed, records);
    println!("✓ Exported CSV re-ingests to an equal record set");
}

// Test that slash-separated dates are accepted
fn test_slash_dates() {
    println!("\n====== Testing slash date format ======");
    let csv = "date,developer,status,new_tasks,completed_tasks,effort_hours\n\
               2024/02/29,carol,open,1,0,1.0\n";
    let records = ingest(csv.as_bytes()).unwrap();
    assert_eq!(records[0].date.to_string(), "2024-02-29");
    println!("✓ 2024/02/29 parsed as a calendar date");
}

// Test that one bad date rejects the whole upload and leaves a previously
// stored dataset untouched
fn test_malformed_date_rejection() {
    println!("\n====== Testing malformed date rejection ======");
    let mut store = RecordStore::new();
    store.replace(ingest(SAMPLE.as_bytes()).unwrap(), "good.csv");
    assert_eq!(store.len(), 3);

    let bad = "date,developer,status,new_tasks,completed_tasks,effort_hours\n\
               2024-01-01,alice,open,1,0,1.0\n\
               not-a-date,bob,open,1,0,1.0\n";
    let err = ingest(bad.as_bytes()).unwrap_err();
    assert!(matches!(err, IngestError::ParseFailure(_)));
    println!("✓ Upload with one unparseable date fails with ParseFailure");

    // Ingestion never touched the store, so the previous dataset survives
    assert_eq!(store.len(), 3);
    assert_eq!(store.meta().unwrap().filename, "good.csv");
    println!("✓ Previous record set left untouched after the failed upload");
}

// Test that a missing required column is reported eagerly
fn test_missing_column() {
    println!("\n====== Testing missing column detection ======");
    let csv = "date,developer,status,new_tasks,completed_tasks\n\
               2024-01-01,alice,open,1,0\n";
    let err = ingest(csv.as_bytes()).unwrap_err();
    match err {
        IngestError::MissingColumn(name) => assert_eq!(name, "effort_hours"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
    println!("✓ Missing `effort_hours` column reported at ingestion time");
}

// Test that non-numeric counts are rejected
fn test_non_numeric_counts() {
    println!("\n====== Testing non-numeric count rejection ======");
    let csv = "date,developer,status,new_tasks,completed_tasks,effort_hours\n\
               2024-01-01,alice,open,many,0,1.0\n";
    let err = ingest(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, IngestError::ParseFailure(_)));
    println!("✓ Non-numeric `new_tasks` value fails with ParseFailure");
}

// Test that non-UTF-8 bytes are rejected
fn test_invalid_utf8() {
    println!("\n====== Testing invalid UTF-8 rejection ======");
    let err = ingest(&[0xff, 0xfe, 0x00, 0x41]).unwrap_err();
    assert!(matches!(err, IngestError::ParseFailure(_)));
    println!("✓ Non-UTF-8 upload fails with ParseFailure");
}

// Test that a header-only file is a valid empty record set
fn test_header_only() {
    println!("\n====== Testing header-only upload ======");
    let csv = "date,developer,status,new_tasks,completed_tasks,effort_hours\n";
    let records = ingest(csv.as_bytes()).unwrap();
    assert!(records.is_empty());
    println!("✓ Header-only CSV yields an empty record set, not an error");
}

// Test that extra columns and padding whitespace are tolerated
fn test_extra_columns_and_whitespace() {
    println!("\n====== Testing extra columns and whitespace ======");
    let csv = "team,date , developer,status,new_tasks,completed_tasks,effort_hours\n\
               core, 2024-01-01 , alice ,open, 2 ,1, 3.5 \n";
    let records = ingest(csv.as_bytes()).unwrap();
    assert_eq!(records[0].developer, "alice");
    assert_eq!(records[0].new_tasks, 2);
    assert_eq!(records[0].effort_hours, 3.5);
    println!("✓ Unknown columns ignored and padded fields trimmed");
}

fn main() {
    test_ingest_well_formed();
    test_round_trip();
    test_slash_dates();
    test_malformed_date_rejection();
    test_missing_column();
    test_non_numeric_counts();
    test_invalid_utf8();
    test_header_only();
    test_extra_columns_and_whitespace();

    println!("\nAll ingest tests passed!");
}
