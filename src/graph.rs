use plotters::element::Pie;
use plotters::prelude::*;
use std::error::Error;

use crate::aggregate::{DeveloperEffort, StatusCount, TimeSeriesPoint};

/// Fixed palette for categorical series (status slices, developer bars)
const PALETTE: [RGBColor; 8] = [
    RGBColor(66, 133, 244),
    RGBColor(219, 68, 55),
    RGBColor(244, 180, 0),
    RGBColor(15, 157, 88),
    RGBColor(171, 71, 188),
    RGBColor(0, 172, 193),
    RGBColor(255, 112, 67),
    RGBColor(158, 157, 36),
];

/// Configuration options for chart generation
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            width: 800,
            height: 480,
        }
    }
}

/// Render the new-vs-completed time series as a PNG line chart
///
/// Buckets are laid out on the X axis in the order given (chronological when
/// the data comes from [`crate::aggregate::time_series`]); two lines are
/// drawn, one per counter, with a legend.
pub fn time_series_chart(
    points: &[TimeSeriesPoint],
    options: &GraphOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if points.is_empty() {
        return placeholder_chart("No data for the selected period", options);
    }

    render_png(options, |root| {
        let max_y = points
            .iter()
            .map(|p| p.new_tasks.max(p.completed_tasks))
            .max()
            .unwrap_or(0);

        let mut chart = ChartBuilder::on(root)
            .caption(&options.title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(45)
            .build_cartesian_2d(-0.5..points.len() as f64 - 0.5, 0.0..max_y as f64 + 1.0)?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .x_labels(points.len().min(12))
            .x_label_formatter(&|x| {
                let index = x.round();
                if index < 0.0 {
                    return String::new();
                }
                points
                    .get(index as usize)
                    .map(|p| p.bucket.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (i as f64, p.new_tasks as f64)),
                &BLUE,
            ))?
            .label("New tasks")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_series(LineSeries::new(
                points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (i as f64, p.completed_tasks as f64)),
                &GREEN,
            ))?
            .label("Completed tasks")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;

        Ok(())
    })
}

/// Render the status frequency table as a PNG pie chart
pub fn status_pie_chart(
    counts: &[StatusCount],
    options: &GraphOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if counts.is_empty() {
        return placeholder_chart("No data for the selected period", options);
    }

    render_png(options, |root| {
        let root = root.titled(&options.title, ("sans-serif", 24).into_font())?;

        let sizes: Vec<f64> = counts.iter().map(|c| c.count as f64).collect();
        let labels: Vec<String> = counts
            .iter()
            .map(|c| format!("{} ({})", c.status, c.count))
            .collect();
        let colors: Vec<RGBColor> = counts
            .iter()
            .enumerate()
            .map(|(i, _)| PALETTE[i % PALETTE.len()])
            .collect();

        let center = (options.width as i32 / 2, options.height as i32 / 2 + 10);
        let radius = (options.width.min(options.height) as f64) / 2.0 - 60.0;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 16).into_font());
        root.draw(&pie)?;

        Ok(())
    })
}

/// Render per-developer effort totals as a PNG bar chart
pub fn effort_bar_chart(
    rows: &[DeveloperEffort],
    options: &GraphOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if rows.is_empty() {
        return placeholder_chart("No data for the selected period", options);
    }

    render_png(options, |root| {
        let max_y = rows.iter().map(|r| r.effort_hours).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(&options.title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(45)
            .build_cartesian_2d(0.0..rows.len() as f64, 0.0..max_y + 1.0)?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .x_labels(rows.len())
            .x_label_formatter(&|x| {
                if *x < 0.0 {
                    return String::new();
                }
                rows.get(x.floor() as usize)
                    .map(|r| r.developer.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(rows.iter().enumerate().map(|(i, row)| {
            let color = PALETTE[i % PALETTE.len()];
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, row.effort_hours)],
                color.filled(),
            )
        }))?;

        Ok(())
    })
}

/// A white image with a centered message, shown before any upload or when
/// the filter leaves nothing to plot
pub fn placeholder_chart(
    message: &str,
    options: &GraphOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    render_png(options, |root| {
        let position = (
            options.width as i32 / 2 - (message.len() as i32 * 4),
            options.height as i32 / 2,
        );
        root.draw(&Text::new(
            message.to_string(),
            position,
            ("sans-serif", 18)
                .into_font()
                .color(&RGBColor(120, 120, 120)),
        ))?;
        Ok(())
    })
}

/// Draw into a temporary PNG file and hand back its bytes
///
/// The bitmap backend wants a file path, so the chart is written to a
/// uniquely named temp file which is removed once read.
fn render_png<F>(options: &GraphOptions, draw: F) -> Result<Vec<u8>, Box<dyn Error>>
where
    F: FnOnce(&DrawingArea<BitMapBackend, plotters::coord::Shift>) -> Result<(), Box<dyn Error>>,
{
    let file = tempfile::Builder::new().suffix(".png").tempfile()?;
    {
        let root =
            BitMapBackend::new(file.path(), (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    let buffer = std::fs::read(file.path())?;
    Ok(buffer)
}
