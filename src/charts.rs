use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use tracing::{info, warn};

use crate::stats;
use crate::table::{BookTable, PriceRange, RatingCategory};

const CHART_SIZE: (u32, u32) = (1000, 600);
const HIST_BINS: usize = 30;

/// Render the four report charts as SVG files under `dir`.
pub fn render_all(table: &BookTable, dir: &Path) -> Result<()> {
    if table.is_empty() {
        warn!("no rows scraped, skipping charts");
        return Ok(());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("create charts dir: {}", dir.display()))?;

    price_histogram(table, &dir.join("price_distribution.svg"))?;
    rating_bars(table, &dir.join("rating_distribution.svg"))?;
    rating_category_bars(table, &dir.join("rating_category_distribution.svg"))?;
    mean_rating_bars(table, &dir.join("mean_rating_per_price_range.svg"))?;

    info!("Wrote 4 charts to {}", dir.display());
    Ok(())
}

/// Price histogram (30 bins) with a Gaussian kernel density overlay scaled
/// to the count axis.
fn price_histogram(table: &BookTable, path: &Path) -> Result<()> {
    let prices: Vec<f64> = table.rows().iter().filter_map(|r| r.price).collect();
    if prices.is_empty() {
        warn!("no parsed prices, skipping price histogram");
        return Ok(());
    }

    let mut min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        min -= 1.0;
        max += 1.0;
    }

    let bin_width = (max - min) / HIST_BINS as f64;
    let mut counts = vec![0usize; HIST_BINS];
    for p in &prices {
        let bin = ((p - min) / bin_width) as usize;
        counts[bin.min(HIST_BINS - 1)] += 1;
    }

    let y_max = counts.iter().copied().max().unwrap_or(1).max(1) as f64 * 1.1;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Book Prices (£)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(min..max, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Book Price (£)")
        .y_desc("Number of Books")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
        let x0 = min + i as f64 * bin_width;
        let x1 = x0 + bin_width;
        Rectangle::new([(x0, 0.0), (x1, *c as f64)], BLUE.mix(0.4).filled())
    }))?;

    if let Some(points) = kde_curve(&prices, min, max, bin_width) {
        chart.draw_series(LineSeries::new(points, RED.stroke_width(2)))?;
    }

    root.present().context("write price histogram")?;
    Ok(())
}

/// Gaussian KDE with Scott's-rule bandwidth, scaled from density to the
/// count axis of the histogram.
fn kde_curve(values: &[f64], min: f64, max: f64, bin_width: f64) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = variance.sqrt();
    if std <= 0.0 {
        return None;
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let steps = 200;
    let step = (max - min) / steps as f64;
    let scale = n as f64 * bin_width;

    let points = (0..=steps)
        .map(|i| {
            let x = min + i as f64 * step;
            let density = values
                .iter()
                .map(|v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                / (n as f64 * bandwidth * (2.0 * PI).sqrt());
            (x, density * scale)
        })
        .collect();
    Some(points)
}

/// Book count per star rating, 0 through 5.
fn rating_bars(table: &BookTable, path: &Path) -> Result<()> {
    let counts = stats::star_rating_counts(table);
    let y_max = bar_axis_max(counts.iter().copied().max().unwrap_or(0));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Book Ratings", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..6u32).into_segmented(), 0u32..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Star Rating")
        .y_desc("Number of Books")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.6).filled())
            .margin(10)
            .data(counts.iter().enumerate().map(|(r, c)| (r as u32, *c as u32))),
    )?;

    root.present().context("write rating bar chart")?;
    Ok(())
}

/// Book count per rating category, ordered Low / Average / High.
fn rating_category_bars(table: &BookTable, path: &Path) -> Result<()> {
    let mut counts = stats::rating_category_counts(table);
    // Chart order is the bucket order, not the descending count order the
    // console report uses.
    counts.sort_by_key(|(bucket, _)| {
        RatingCategory::ALL.iter().position(|b| b == bucket).unwrap_or(0)
    });
    let y_max = bar_axis_max(counts.iter().map(|(_, c)| *c).max().unwrap_or(0));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Book Rating Categories", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..3u32).into_segmented(), 0u32..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Rating Category")
        .y_desc("Number of Books")
        .x_label_formatter(&category_label::<RatingCategory>)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(GREEN.mix(0.6).filled())
            .margin(20)
            .data(
                counts
                    .iter()
                    .enumerate()
                    .map(|(i, (_, c))| (i as u32, *c as u32)),
            ),
    )?;

    root.present().context("write rating category bar chart")?;
    Ok(())
}

/// Mean book rating per price range, ordered Cheap / Medium / Expensive.
fn mean_rating_bars(table: &BookTable, path: &Path) -> Result<()> {
    let means = stats::mean_rating_by_price_range(table);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Average Book Rating per Price Range", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..3u32).into_segmented(), 0f64..5.5f64)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Price Range")
        .y_desc("Average Book Rating")
        .x_label_formatter(&category_label::<PriceRange>)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(MAGENTA.mix(0.6).filled())
            .margin(20)
            .data(
                means
                    .iter()
                    .enumerate()
                    .filter_map(|(i, (_, mean))| mean.map(|m| (i as u32, m))),
            ),
    )?;

    root.present().context("write mean rating bar chart")?;
    Ok(())
}

trait BucketLabels {
    fn label(index: usize) -> String;
}

impl BucketLabels for RatingCategory {
    fn label(index: usize) -> String {
        RatingCategory::ALL
            .get(index)
            .map(|b| b.to_string())
            .unwrap_or_default()
    }
}

impl BucketLabels for PriceRange {
    fn label(index: usize) -> String {
        PriceRange::ALL
            .get(index)
            .map(|b| b.to_string())
            .unwrap_or_default()
    }
}

fn category_label<B: BucketLabels>(value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(v) | SegmentValue::Exact(v) => B::label(*v as usize),
        SegmentValue::Last => String::new(),
    }
}

fn bar_axis_max(max_count: usize) -> u32 {
    ((max_count.max(1) as f64) * 1.1).ceil() as u32
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::BookTable;

    #[test]
    fn kde_curve_is_dense_and_finite() {
        let values: Vec<f64> = (0..100).map(|i| 10.0 + (i % 50) as f64).collect();
        let points = kde_curve(&values, 10.0, 60.0, 1.0).unwrap();
        assert_eq!(points.len(), 201);
        assert!(points.iter().all(|(_, y)| y.is_finite() && *y >= 0.0));
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde_curve(&[5.0], 0.0, 10.0, 1.0).is_none());
        assert!(kde_curve(&[5.0, 5.0, 5.0], 0.0, 10.0, 1.0).is_none());
    }

    #[test]
    fn render_all_writes_four_svgs() {
        let names = (0..20).map(|i| format!("Book {i}")).collect();
        let prices = (0..20).map(|i| Some(5.0 + 3.0 * i as f64)).collect();
        let ratings = (0..20).map(|i| (i % 6) as u8).collect();
        let mut table = BookTable::from_columns(names, prices, ratings).unwrap();
        table.derive_features();

        let dir = std::env::temp_dir().join(format!("bookscrape-charts-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        render_all(&table, &dir).unwrap();

        for file in [
            "price_distribution.svg",
            "rating_distribution.svg",
            "rating_category_distribution.svg",
            "mean_rating_per_price_range.svg",
        ] {
            assert!(dir.join(file).is_file(), "missing chart {file}");
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_table_renders_nothing() {
        let table = BookTable::from_columns(vec![], vec![], vec![]).unwrap();
        let dir = std::env::temp_dir().join(format!("bookscrape-empty-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        render_all(&table, &dir).unwrap();
        assert!(!dir.exists());
    }
}
