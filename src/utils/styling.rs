//! Terminal styling utilities for step-by-step run output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static DICE: Emoji<'_, '_> = Emoji("🎲 ", "");

/// Values shown in the configuration card.
pub struct ConfigCard<'a> {
    pub input: &'a Path,
    pub target: &'a str,
    pub scaler_output: &'a Path,
    pub pca_output: &'a Path,
    pub manifest_output: Option<&'a Path>,
    pub test_size: f64,
    pub seed: u64,
    pub variance_target: f64,
    pub impute_mode: &'a str,
}

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("◆ scalepca").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("impute · encode · split · standardize · reduce").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(card: &ConfigCard<'_>) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:    {:<37}│", FOLDER, truncate_path(card.input, 36));
    println!(
        "    │  {} Target:   {:<37}│",
        TARGET,
        truncate_string(card.target, 36)
    );
    println!(
        "    │  {} Scaler:   {:<37}│",
        SAVE,
        truncate_path(card.scaler_output, 36)
    );
    println!(
        "    │  {} PCA:      {:<37}│",
        SAVE,
        truncate_path(card.pca_output, 36)
    );
    let manifest = card
        .manifest_output
        .map(|p| truncate_path(p, 36))
        .unwrap_or_else(|| "(disabled)".to_string());
    println!("    │  {} Manifest: {:<37}│", SAVE, manifest);
    println!("    ├{}┤", line);
    println!(
        "    │  {} Test size / seed:  {:<28}│",
        DICE,
        style(format!("{:.0}% / {}", card.test_size * 100.0, card.seed)).yellow()
    );
    println!(
        "    │  {} Variance target:   {:<28}│",
        CHART,
        style(format!("{:.1}%", card.variance_target * 100.0)).yellow()
    );
    println!(
        "    │  {} Impute means from: {:<28}│",
        CHART,
        style(card.impute_mode).yellow()
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

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print elapsed time for a step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Preprocessing complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
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
}
