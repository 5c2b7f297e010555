//! Dataset and preprocessing summaries for the console

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{EdaReport, PreparedData};

/// Per-column descriptive statistics plus the risk class balance
pub fn dataset_summary_table(eda: &EdaReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Mean").add_attribute(Attribute::Bold),
        Cell::new("Std").add_attribute(Attribute::Bold),
        Cell::new("Min").add_attribute(Attribute::Bold),
        Cell::new("Max").add_attribute(Attribute::Bold),
    ]);

    for stats in &eda.numeric_summary {
        table.add_row(vec![
            Cell::new(&stats.name),
            number(stats.mean),
            number(stats.std),
            number(stats.min),
            number(stats.max),
        ]);
    }

    table
}

pub fn risk_distribution_table(eda: &EdaReport) -> Table {
    let total: usize = eda.risk_distribution.iter().map(|c| c.count).sum();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Burnout_Risk").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("Share").add_attribute(Attribute::Bold),
    ]);

    for entry in &eda.risk_distribution {
        let share = if total > 0 {
            entry.count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(&entry.category),
            Cell::new(entry.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share))
                .fg(Color::Cyan)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

pub fn display_dataset_summary(eda: &EdaReport) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("DATASET SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!(
        "      {} rows × {} columns",
        style(eda.rows).yellow().bold(),
        style(eda.columns).yellow().bold()
    );
    println!();

    indent(&risk_distribution_table(eda));
    println!();
    indent(&dataset_summary_table(eda));
}

/// Feature set and class mapping after encoding
pub fn display_preprocess_summary(prepared: &PreparedData) {
    println!(
        "      {} feature(s): {}",
        style(prepared.feature_names.len()).yellow().bold(),
        style(prepared.feature_names.join(", ")).dim()
    );

    let mapping: Vec<String> = prepared
        .class_names()
        .iter()
        .enumerate()
        .map(|(code, name)| format!("{}={}", name, code))
        .collect();
    println!(
        "      {} class(es): {}",
        style(prepared.num_classes).yellow().bold(),
        mapping.join(", ")
    );

    for encoder in &prepared.feature_encoders {
        println!(
            "        {} {} {}",
            style("•").dim(),
            encoder.column(),
            style(format!("({} categories)", encoder.num_classes())).dim()
        );
    }
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{:.3}", value)).set_alignment(CellAlignment::Right)
}

fn indent(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
