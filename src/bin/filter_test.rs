use chrono::NaiveDate;
use devdash::filter::filter_window;
use devdash::record::ActivityRecord;

// Helper to build a record on a given date; the other fields are irrelevant
// to the filter
fn record(date: &str) -> ActivityRecord {
    ActivityRecord {
        date: date.parse::<NaiveDate>().unwrap(),
        developer: "alice".to_string(),
        status: "open".to_string(),
        new_tasks: 1,
        completed_tasks: 0,
        effort_hours: 1.0,
    }
}

fn sample() -> Vec<ActivityRecord> {
    vec![
        record("2024-01-01"),
        record("2024-02-15"),
        record("2024-03-01"),
        record("2024-03-25"),
        record("2024-03-31"),
    ]
}

// Test that window 0 returns the input unchanged
fn test_window_zero_identity() {
    println!("\n====== Testing window 0 (all data) ======");
    let records = sample();
    let filtered = filter_window(&records, 0);
    assert_eq!(filtered, records);
    println!("✓ Window 0 keeps all {} records", records.len());
}

// Test that the cutoff is anchored at the latest date, boundary inclusive
fn test_cutoff_inclusive() {
    println!("\n====== Testing cutoff inclusivity ======");
    let records = sample();

    // Latest date is 2024-03-31, so a 30-day window cuts at 2024-03-01
    // exactly; the record on the boundary must survive
    let filtered = filter_window(&records, 30);
    let dates: Vec<String> = filtered.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, ["2024-03-01", "2024-03-25", "2024-03-31"]);
    println!("✓ Record on the exact cutoff date 2024-03-01 is included");
}

// Test that widening the window never drops records
fn test_monotonicity() {
    println!("\n====== Testing filter monotonicity ======");
    let records = sample();

    for (narrow, wide) in [(1, 7), (7, 30), (30, 60), (60, 90), (90, 365)] {
        let narrower = filter_window(&records, narrow);
        let wider = filter_window(&records, wide);
        assert!(
            narrower.len() <= wider.len(),
            "window {wide} returned fewer records than window {narrow}"
        );
        // Every record in the narrower window is present in the wider one
        for r in &narrower {
            assert!(wider.contains(r));
        }
    }
    println!("✓ Result only grows as the window widens");
}

// Test that filtering is idempotent under re-filtering with the same window
fn test_idempotent() {
    println!("\n====== Testing filter idempotence ======");
    let records = sample();
    let once = filter_window(&records, 30);
    let twice = filter_window(&once, 30);
    assert_eq!(once, twice);
    println!("✓ Re-filtering with the same window is a no-op");
}

// Test that a window too large for the calendar keeps everything instead of
// overflowing the date subtraction; the value arrives unchecked from the
// `?window=` query parameter
fn test_oversized_window() {
    println!("\n====== Testing oversized window ======");
    let records = sample();
    let filtered = filter_window(&records, u32::MAX);
    assert_eq!(filtered, records);

    let single = vec![record("2024-01-01")];
    assert_eq!(filter_window(&single, u32::MAX), single);
    println!("✓ Window of u32::MAX keeps all records without panicking");
}

// Test that an empty record set filters to empty without error
fn test_empty_input() {
    println!("\n====== Testing empty input ======");
    assert!(filter_window(&[], 0).is_empty());
    assert!(filter_window(&[], 30).is_empty());
    println!("✓ Empty input yields empty output for any window");
}

fn main() {
    test_window_zero_identity();
    test_cutoff_inclusive();
    test_monotonicity();
    test_idempotent();
    test_oversized_window();
    test_empty_input();

    println!("\nAll filter tests passed!");
}
