//! Terminal styling for the pipeline's console output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::PipelineConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static SEED: Emoji<'_, '_> = Emoji("🎲 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ██╗    ██╗███████╗██╗     ██╗      ██████╗ █████╗ ███████╗████████╗
    ██║    ██║██╔════╝██║     ██║     ██╔════╝██╔══██╗██╔════╝╚══██╔══╝
    ██║ █╗ ██║█████╗  ██║     ██║     ██║     ███████║███████╗   ██║
    ██║███╗██║██╔══╝  ██║     ██║     ██║     ██╔══██║╚════██║   ██║
    ╚███╔███╔╝███████╗███████╗███████╗╚██████╗██║  ██║███████║   ██║
     ╚══╝╚══╝ ╚══════╝╚══════╝╚══════╝ ╚═════╝╚═╝  ╚═╝╚══════╝   ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Burnout risk and wellbeing models from survey data").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(config: &PipelineConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:  {:<39}│", FOLDER, truncate_path(&config.input, 38));
    println!("    │  {} EDA:    {:<39}│", CHART, truncate_path(&config.eda_dir, 38));
    println!("    │  {} Models: {:<39}│", SAVE, truncate_path(&config.model_dir, 38));
    println!("    ├{}┤", line);
    println!(
        "    │  {} Epochs / batch / lr: {:<25}│",
        BRAIN,
        style(format!(
            "{} / {} / {}",
            config.training.epochs, config.training.batch_size, config.training.learning_rate
        ))
        .yellow()
    );
    println!(
        "    │  {} Seed / test size:    {:<25}│",
        SEED,
        style(format!("{} / {:.2}", config.training.seed, config.test_size)).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion(total: Duration) {
    println!();
    println!(
        "    {} {} {}",
        ROCKET,
        style("Wellcast run complete!").green().bold(),
        style(format!("({:.1}s)", total.as_secs_f64())).dim()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

/// Keep the tail of `s`, respecting char boundaries
fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("abcdefghijkl", 8), "...hijkl");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        let truncated = truncate_string("ééééééééé", 5);
        assert_eq!(truncated, "...éé");
    }
}
