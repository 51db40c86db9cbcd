// src/graph/bowtie/report.rs
//! Console output for bow-tie reports.

use colored::Colorize;

use super::types::{BowtieReport, Region, RegionStats};

/// Prints one run: a header line and a row per region.
pub fn print_report(title: &str, report: &BowtieReport) {
    print_summary(title, report);
    for stats in &report.regions {
        print_region(stats);
    }
}

fn print_summary(title: &str, report: &BowtieReport) {
    println!(
        "\n{} {} nodes | {} edges | {} isolated | {:.0} views",
        title.cyan().bold(),
        report.graph_nodes,
        report.graph_edges,
        format_isolated(report.isolated_nodes),
        report.total_attention,
    );
}

fn format_isolated(n: usize) -> String {
    if n == 0 {
        n.to_string().green().to_string()
    } else {
        n.to_string().yellow().to_string()
    }
}

fn print_region(stats: &RegionStats) {
    println!(
        "  {:<13} {:>8} ({:>6.2}%)  {:>6} scc  {:>14.0} views ({:>6.2}%)",
        colored_label(stats.region),
        stats.node_count,
        stats.node_pct * 100.0,
        stats.scc_count,
        stats.attention_sum,
        stats.attention_pct * 100.0,
    );
}

fn colored_label(region: Region) -> String {
    let label = format!("{:<13}", region.label());
    match region {
        Region::Lscc => label.green().bold().to_string(),
        Region::In => label.cyan().to_string(),
        Region::Out => label.blue().to_string(),
        Region::Tendrils => label.yellow().to_string(),
        Region::Disconnected => label.dimmed().to_string(),
    }
}

/// Prints a one-line failure for a run that did not complete.
pub fn print_failure(title: &str, error: &str) {
    println!("\n{} {}", title.red().bold(), error.red());
}

/// Prints the sweep footer.
pub fn print_sweep_footer(completed: usize, failed: usize) {
    let failed_label = if failed == 0 {
        failed.to_string().green()
    } else {
        failed.to_string().red()
    };
    println!(
        "\n{} {} completed | {} failed",
        "SWEEP".cyan().bold(),
        completed.to_string().green(),
        failed_label,
    );
}
