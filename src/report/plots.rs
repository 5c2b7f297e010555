//! PNG charts for the EDA step and for training histories

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::PipelineError;
use crate::model::TrainingHistory;
use crate::pipeline::{CategoryCount, CorrelationMatrix, EdaReport, ScatterGroup};

type DrawResult = std::result::Result<(), Box<dyn Error>>;

const CHART_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (1200, 1000);

pub const DISTRIBUTION_FILE: &str = "burnout_distribution.png";
pub const HEATMAP_FILE: &str = "correlation_heatmap.png";
pub const SCATTER_FILE: &str = "sleep_vs_motivation.png";

/// Write the three EDA charts into `dir`, creating it if needed
pub fn render_eda_plots(eda: &EdaReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create EDA directory: {}", dir.display()))?;

    let distribution = dir.join(DISTRIBUTION_FILE);
    plot_risk_distribution(&eda.risk_distribution, &distribution)?;

    let heatmap = dir.join(HEATMAP_FILE);
    plot_correlation_heatmap(&eda.correlation, &heatmap)?;

    let scatter = dir.join(SCATTER_FILE);
    plot_sleep_vs_motivation(&eda.sleep_vs_motivation, &scatter)?;

    Ok(vec![distribution, heatmap, scatter])
}

/// File names the learning curves of `title` are written to
pub fn history_plot_paths(title: &str, dir: &Path) -> (PathBuf, PathBuf) {
    let stem = title.to_lowercase();
    (
        dir.join(format!("{}_metrics.png", stem)),
        dir.join(format!("{}_loss.png", stem)),
    )
}

/// Write `{title}_metrics.png` and `{title}_loss.png` (lowercased) into `dir`.
///
/// An empty history produces no files.
pub fn plot_training_history(history: &TrainingHistory, title: &str, dir: &Path) -> Result<Vec<PathBuf>> {
    if history.is_empty() {
        tracing::warn!(title, "no epochs recorded, skipping learning curves");
        return Ok(Vec::new());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model plot directory: {}", dir.display()))?;

    let (metrics_path, loss_path) = history_plot_paths(title, dir);
    let label = history.metric.label();

    wrap(
        &metrics_path,
        draw_curves(
            &metrics_path,
            &format!("{} {}", title, label),
            label,
            &history.metric_values(),
            &history.val_metric_values(),
        ),
    )?;
    wrap(
        &loss_path,
        draw_curves(
            &loss_path,
            &format!("{} Loss", title),
            "Loss",
            &history.loss(),
            &history.val_loss(),
        ),
    )?;

    Ok(vec![metrics_path, loss_path])
}

pub fn plot_risk_distribution(counts: &[CategoryCount], path: &Path) -> Result<(), PipelineError> {
    wrap(path, draw_distribution(counts, path))
}

pub fn plot_correlation_heatmap(matrix: &CorrelationMatrix, path: &Path) -> Result<(), PipelineError> {
    wrap(path, draw_heatmap(matrix, path))
}

pub fn plot_sleep_vs_motivation(groups: &[ScatterGroup], path: &Path) -> Result<(), PipelineError> {
    wrap(path, draw_scatter(groups, path))
}

fn wrap(path: &Path, result: DrawResult) -> Result<(), PipelineError> {
    result.map_err(|e| PipelineError::Plot {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn draw_distribution(counts: &[CategoryCount], path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = counts.len().max(1) as u32;
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0) as u32;
    let y_max = max + max / 10 + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Burnout Risk Distribution", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Burnout_Risk")
        .y_desc("Count")
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => counts
                .get(*i as usize)
                .map(|c| c.category.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(RGBColor(76, 114, 176).filled())
            .margin(30)
            .data(counts.iter().enumerate().map(|(i, c)| (i as u32, c.count as u32))),
    )?;

    root.present()?;
    Ok(())
}

/// Diverging blue-white-red scale for values in [-1, 1]
fn coolwarm(value: f64) -> RGBColor {
    if !value.is_finite() {
        return RGBColor(200, 200, 200);
    }
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let (cold, mid, warm) = ((59, 76, 192), (221, 221, 221), (180, 4, 38));
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 { (cold, mid, v + 1.0) } else { (mid, warm, v) };
    RGBColor(lerp(from.0, to.0, t), lerp(from.1, to.1, t), lerp(from.2, to.2, t))
}

fn draw_heatmap(matrix: &CorrelationMatrix, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = matrix.len() as i32;
    let label = |v: &SegmentValue<i32>, flip: bool| match v {
        SegmentValue::CenterOf(i) => {
            let idx = if flip { n - 1 - *i } else { *i };
            matrix.columns.get(idx as usize).cloned().unwrap_or_default()
        }
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Heatmap", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(180)
        .y_label_area_size(200)
        .build_cartesian_2d((0..n.max(1)).into_segmented(), (0..n.max(1)).into_segmented())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(matrix.len())
        .y_labels(matrix.len())
        .x_label_style(
            ("sans-serif", 13)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_label_formatter(&|v| label(v, false))
        .y_label_formatter(&|v| label(v, true))
        .draw()?;

    // Row 0 is drawn at the top
    let cells = matrix.values.iter().enumerate().flat_map(|(i, row)| {
        let y = n - 1 - i as i32;
        row.iter().enumerate().map(move |(j, &value)| (j as i32, y, value))
    });

    chart.draw_series(cells.clone().map(|(x, y, value)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ],
            coolwarm(value).filled(),
        )
    }))?;

    chart.draw_series(cells.map(|(x, y, value)| {
        let text = if value.is_finite() {
            format!("{:.2}", value)
        } else {
            "nan".to_string()
        };
        Text::new(
            text,
            (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
            ("sans-serif", 12)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// `[min, max]` padded by 5% of the span, never degenerate
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad)..(hi + pad)
}

fn draw_scatter(groups: &[ScatterGroup], path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(groups.iter().flat_map(|g| g.points.iter().map(|p| p.0)));
    let y_range = padded_range(groups.iter().flat_map(|g| g.points.iter().map(|p| p.1)));

    let mut chart = ChartBuilder::on(&root)
        .caption("Sleep Quality vs Motivation", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Sleep_Quality_Score")
        .y_desc("Motivation_Level")
        .draw()?;

    for (i, group) in groups.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(
                group
                    .points
                    .iter()
                    .map(|&p| Circle::new(p, 3, color.mix(0.6).filled())),
            )?
            .label(group.category.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_curves(path: &Path, caption: &str, y_desc: &str, train: &[f64], validation: &[f64]) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let epochs = train.len().max(validation.len()).max(2) as f64;
    let y_range = padded_range(train.iter().chain(validation).copied());

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(1.0..epochs, y_range)?;

    chart.configure_mesh().x_desc("Epoch").y_desc(y_desc).draw()?;

    let series = [("Train", train, BLUE), ("Validation", validation, RED)];
    for (name, values, color) in series {
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, &v)| ((i + 1) as f64, v)),
                color.stroke_width(2),
            ))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
