use devdash::aggregate::{Bucket, developer_effort, status_distribution, time_series};
use devdash::graph::{
    GraphOptions, effort_bar_chart, placeholder_chart, status_pie_chart, time_series_chart,
};
use devdash::ingest::ingest;

const SAMPLE: &str = "\
date,developer,status,new_tasks,completed_tasks,effort_hours
2024-01-01,alice,open,3,1,4.5
2024-01-01,bob,done,0,2,6.0
2024-01-08,alice,done,1,1,2.0
";

// PNG files start with an 8-byte signature; checking the first four bytes is
// enough to know the backend produced a real image
fn assert_png(bytes: &[u8], what: &str) {
    assert!(bytes.len() > 8, "{what} produced no data");
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G'], "{what} is not a PNG");
    println!("✓ {what} rendered as {} PNG bytes", bytes.len());
}

// Test that each chart renders the worked-example aggregates to PNG bytes
fn test_charts_from_sample() {
    println!("\n====== Testing chart rendering from sample data ======");
    let records = ingest(SAMPLE.as_bytes()).unwrap();
    let options = GraphOptions::default();

    let points = time_series(&records, Bucket::Day);
    assert_png(
        &time_series_chart(&points, &options).unwrap(),
        "time-series chart",
    );

    let counts = status_distribution(&records);
    assert_png(
        &status_pie_chart(&counts, &options).unwrap(),
        "status pie chart",
    );

    let rows = developer_effort(&records).unwrap();
    assert_png(
        &effort_bar_chart(&rows, &options).unwrap(),
        "effort bar chart",
    );
}

// Test that empty aggregates fall back to the placeholder image instead of
// failing; this is what the dashboard shows before any upload
fn test_empty_input_placeholders() {
    println!("\n====== Testing empty-input placeholders ======");
    let options = GraphOptions::default();

    assert_png(
        &time_series_chart(&[], &options).unwrap(),
        "empty time-series chart",
    );
    assert_png(
        &status_pie_chart(&[], &options).unwrap(),
        "empty status pie chart",
    );
    assert_png(
        &effort_bar_chart(&[], &options).unwrap(),
        "empty effort bar chart",
    );
    assert_png(
        &placeholder_chart("No data for the selected period", &options).unwrap(),
        "placeholder image",
    );
}

fn main() {
    test_charts_from_sample();
    test_empty_input_placeholders();

    println!("\nAll graph tests passed!");
}
