//! Run summary report generation

use std::path::PathBuf;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of one preprocessing run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: usize,
    pub columns: usize,
    pub imputed_cells: usize,
    pub encoded_columns: Vec<String>,
    pub features: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub constant_features: Vec<String>,
    pub components: usize,
    pub cumulative_variance: f64,
    pub variance_target: f64,
    pub variance_target_met: bool,
    pub artifacts: Vec<PathBuf>,
    pub step_times: Vec<(&'static str, Duration)>,
}

impl RunSummary {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn record_step(&mut self, name: &'static str, elapsed: Duration) {
        self.step_times.push((name, elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.step_times.iter().map(|(_, d)| *d).sum()
    }

    /// Fraction of feature dimensions removed by the PCA.
    pub fn reduction_pct(&self) -> f64 {
        if self.features == 0 {
            0.0
        } else {
            (self.features.saturating_sub(self.components)) as f64 / self.features as f64 * 100.0
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows × Columns"),
            Cell::new(format!("{} × {}", self.rows, self.columns)),
        ]);

        table.add_row(vec![
            Cell::new("🩹 Imputed Cells"),
            Cell::new(self.imputed_cells).fg(if self.imputed_cells == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        table.add_row(vec![
            Cell::new("🔤 Encoded Columns"),
            Cell::new(self.encoded_columns.len()),
        ]);

        table.add_row(vec![
            Cell::new("🎲 Train / Test Rows"),
            Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
        ]);

        table.add_row(vec![
            Cell::new("📐 Features"),
            Cell::new(self.features),
        ]);

        table.add_row(vec![
            Cell::new("✅ Components Kept"),
            Cell::new(self.components)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📈 Explained Variance"),
            Cell::new(format!(
                "{:.1}% (target {:.1}%)",
                self.cumulative_variance * 100.0,
                self.variance_target * 100.0
            ))
            .fg(if self.variance_target_met {
                Color::Green
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("📉 Dimension Reduction"),
            Cell::new(format!("{:.1}%", self.reduction_pct())).fg(Color::Cyan),
        ]);

        for (name, elapsed) in &self.step_times {
            table.add_row(vec![
                Cell::new(format!("   ↳ {}", name)),
                Cell::new(format!("{:.2}s", elapsed.as_secs_f64())).fg(Color::DarkGrey),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱  Total Time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        if !self.constant_features.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Constant Features (not rescaled)").yellow(),
                style(format!("({})", self.constant_features.len())).dim()
            );
            for feature in &self.constant_features {
                println!("        {} {}", style("•").dim(), feature);
            }
        }

        if !self.artifacts.is_empty() {
            println!();
            println!("      {}:", style("Artifacts").cyan());
            for path in &self.artifacts {
                println!("        {} {}", style("•").dim(), path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction_pct() {
        let mut summary = RunSummary::new(100, 5);
        summary.features = 4;
        summary.components = 3;
        assert!((summary.reduction_pct() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_reduction_pct_no_features() {
        let summary = RunSummary::new(0, 0);
        assert_eq!(summary.reduction_pct(), 0.0);
    }

    #[test]
    fn test_total_time_sums_steps() {
        let mut summary = RunSummary::new(10, 3);
        summary.record_step("load", Duration::from_millis(200));
        summary.record_step("fit", Duration::from_millis(300));
        assert_eq!(summary.total_time(), Duration::from_millis(500));
    }

    #[test]
    fn test_table_mentions_components() {
        let mut summary = RunSummary::new(10, 3);
        summary.components = 2;
        summary.variance_target = 0.8;
        let rendered = summary.to_table().to_string();
        assert!(rendered.contains("Components Kept"));
    }

    #[test]
    fn test_table_lists_each_step_time() {
        let mut summary = RunSummary::new(10, 3);
        summary.record_step("impute", Duration::from_millis(250));
        summary.record_step("pca", Duration::from_millis(1500));
        let rendered = summary.to_table().to_string();
        assert!(rendered.contains("impute"));
        assert!(rendered.contains("0.25s"));
        assert!(rendered.contains("pca"));
        assert!(rendered.contains("1.50s"));
    }
}
