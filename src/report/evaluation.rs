//! Test-set evaluation reports for both trained models

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use ndarray::Array1;
use serde::Serialize;

use crate::error::PipelineError;

/// Precision, recall and F1 of one class (or one average)
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class report over integer class predictions.
///
/// Precision or recall with an empty denominator is reported as 0.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    /// `confusion[true][predicted]`
    pub confusion: Vec<Vec<usize>>,
}

impl ClassificationReport {
    pub fn from_predictions(
        y_true: &[usize],
        y_pred: &[usize],
        class_names: &[String],
    ) -> Result<Self, PipelineError> {
        if y_true.len() != y_pred.len() {
            return Err(PipelineError::ShapeMismatch {
                context: "classification predictions".to_string(),
                expected: y_true.len(),
                actual: y_pred.len(),
            });
        }
        if y_true.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        let k = class_names.len();
        let mut confusion = vec![vec![0usize; k]; k];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            let bad = t.max(p);
            if bad >= k {
                return Err(PipelineError::ShapeMismatch {
                    context: format!("class id {} against {} class name(s)", bad, k),
                    expected: k,
                    actual: bad + 1,
                });
            }
            confusion[t][p] += 1;
        }

        let total = y_true.len();
        let correct: usize = (0..k).map(|c| confusion[c][c]).sum();

        let classes: Vec<ClassMetrics> = class_names
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let tp = confusion[c][c] as f64;
                let support: usize = confusion[c].iter().sum();
                let predicted: usize = confusion.iter().map(|row| row[c]).sum();
                let precision = ratio(tp, predicted as f64);
                let recall = ratio(tp, support as f64);
                ClassMetrics {
                    label: name.clone(),
                    precision,
                    recall,
                    f1: ratio(2.0 * precision * recall, precision + recall),
                    support,
                }
            })
            .collect();

        let macro_avg = average(&classes, "macro avg", |_| 1.0 / k.max(1) as f64);
        let weighted_avg = average(&classes, "weighted avg", |m| m.support as f64 / total as f64);

        Ok(Self {
            classes,
            accuracy: correct as f64 / total as f64,
            macro_avg,
            weighted_avg,
            confusion,
        })
    }

    pub fn support(&self) -> usize {
        self.classes.iter().map(|c| c.support).sum()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Class").add_attribute(Attribute::Bold),
            Cell::new("Precision").add_attribute(Attribute::Bold),
            Cell::new("Recall").add_attribute(Attribute::Bold),
            Cell::new("F1").add_attribute(Attribute::Bold),
            Cell::new("Support").add_attribute(Attribute::Bold),
        ]);

        for m in &self.classes {
            table.add_row(metric_row(m, false));
        }
        table.add_row(vec![
            Cell::new("accuracy").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            Cell::new(format!("{:.4}", self.accuracy))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new(self.support()).set_alignment(CellAlignment::Right),
        ]);
        table.add_row(metric_row(&self.macro_avg, true));
        table.add_row(metric_row(&self.weighted_avg, true));
        table
    }

    pub fn confusion_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);

        let mut header = vec![Cell::new("true \\ pred").add_attribute(Attribute::Bold)];
        header.extend(
            self.classes
                .iter()
                .map(|m| Cell::new(&m.label).add_attribute(Attribute::Bold)),
        );
        table.set_header(header);

        for (i, row) in self.confusion.iter().enumerate() {
            let mut cells = vec![Cell::new(&self.classes[i].label).add_attribute(Attribute::Bold)];
            cells.extend(row.iter().enumerate().map(|(j, &n)| {
                let cell = Cell::new(n).set_alignment(CellAlignment::Right);
                if i == j {
                    cell.fg(Color::Green)
                } else if n > 0 {
                    cell.fg(Color::Red)
                } else {
                    cell
                }
            }));
            table.add_row(cells);
        }
        table
    }

    pub fn display(&self, title: &str) {
        print_heading("🧾", title);
        print_indented(&self.to_table());
        println!();
        println!("    {}", style("Confusion matrix").dim());
        print_indented(&self.confusion_table());
    }
}

/// Error metrics of a regression model on held-out data
#[derive(Debug, Clone, Serialize)]
pub struct RegressionReport {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    /// 1 - SS_res / SS_tot; 1 for a perfect fit of a constant target, else 0
    pub r2: f64,
    pub samples: usize,
}

impl RegressionReport {
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self, PipelineError> {
        if y_true.len() != y_pred.len() {
            return Err(PipelineError::ShapeMismatch {
                context: "regression predictions".to_string(),
                expected: y_true.len(),
                actual: y_pred.len(),
            });
        }
        let n = y_true.len();
        if n == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        let residuals = y_true - y_pred;
        let mae = residuals.mapv(f64::abs).sum() / n as f64;
        let ss_res = residuals.mapv(|r| r * r).sum();
        let mse = ss_res / n as f64;

        let mean = y_true.sum() / n as f64;
        let ss_tot = y_true.mapv(|y| (y - mean).powi(2)).sum();
        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(Self {
            mae,
            mse,
            rmse: mse.sqrt(),
            r2,
            samples: n,
        })
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        let r2_color = if self.r2 > 0.7 {
            Color::Green
        } else if self.r2 > 0.3 {
            Color::Yellow
        } else {
            Color::Red
        };

        table.add_row(vec![Cell::new("MAE"), value_cell(self.mae)]);
        table.add_row(vec![Cell::new("MSE"), value_cell(self.mse)]);
        table.add_row(vec![Cell::new("RMSE"), value_cell(self.rmse)]);
        table.add_row(vec![
            Cell::new("R²"),
            value_cell(self.r2).fg(r2_color).add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Samples"),
            Cell::new(self.samples).set_alignment(CellAlignment::Right),
        ]);
        table
    }

    pub fn display(&self, title: &str) {
        print_heading("📐", title);
        print_indented(&self.to_table());
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

fn average(classes: &[ClassMetrics], label: &str, weight: impl Fn(&ClassMetrics) -> f64) -> ClassMetrics {
    let mut avg = ClassMetrics {
        label: label.to_string(),
        precision: 0.0,
        recall: 0.0,
        f1: 0.0,
        support: 0,
    };
    for m in classes {
        let w = weight(m);
        avg.precision += w * m.precision;
        avg.recall += w * m.recall;
        avg.f1 += w * m.f1;
        avg.support += m.support;
    }
    avg
}

fn value_cell(value: f64) -> Cell {
    Cell::new(format!("{:.4}", value)).set_alignment(CellAlignment::Right)
}

fn metric_row(m: &ClassMetrics, bold: bool) -> Vec<Cell> {
    let label = Cell::new(&m.label);
    vec![
        if bold { label.add_attribute(Attribute::Bold) } else { label },
        value_cell(m.precision),
        value_cell(m.recall),
        value_cell(m.f1),
        Cell::new(m.support).set_alignment(CellAlignment::Right),
    ]
}

fn print_heading(icon: &str, title: &str) {
    println!();
    println!(
        "    {} {}",
        style(icon).cyan(),
        style(title.to_uppercase()).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
