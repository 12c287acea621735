//! Text summary of a run: top routes and most common apps per mode.

use std::fmt::Write;

use crate::logic::catalog::LoadReport;
use crate::logic::engine::{EngineReport, ModeReport};

fn mode_title(mode: &ModeReport) -> &'static str {
    if mode.mode.is_cluster_aware() {
        "WITH clusters"
    } else {
        "WITHOUT clusters"
    }
}

/// Top-K route and application tables for one mode
pub fn render_mode(mode: &ModeReport, target: u32, top_k: usize) -> String {
    let mut out = String::new();
    let title = mode_title(mode);

    let _ = writeln!(out, "Top {} shortest routes {}:", top_k, title);
    if mode.top_routes.is_empty() {
        let _ = writeln!(out, "  (no asset reaches {})", target);
    }
    for r in &mode.top_routes {
        let _ = writeln!(
            out,
            "  {} → {} | path: {:?} | hops: {}",
            r.origin, target, r.path, r.hops
        );
    }

    let _ = writeln!(out, "Most common applications on attack routes {}:", title);
    for a in &mode.top_apps {
        let _ = writeln!(out, "  {}: {} times", a.app, a.count);
    }

    let _ = writeln!(
        out,
        "Graph: {} nodes, {} edges, {} isolated, {} reach the target",
        mode.stats.nodes, mode.stats.edges, mode.stats.isolated, mode.stats.reachable_to_target
    );
    out
}

/// Full run summary
pub fn render(report: &EngineReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Run {} | target {} | threshold {:.2} ({}) | {} assets, {} rows skipped",
        report.run_id,
        report.target,
        report.severity_threshold,
        report.severity_gate,
        report.assets_loaded,
        report.rows_skipped
    );
    for mode in &report.modes {
        out.push('\n');
        out.push_str(&render_mode(mode, report.target, report.top_k));
    }
    out
}

/// Accepted/skipped rows and skip reasons
pub fn render_load(report: &LoadReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Accepted rows: {}", report.accepted);
    let _ = writeln!(out, "Skipped rows: {}", report.skipped);
    if report.synthesized_ids {
        let _ = writeln!(out, "No id column: ids assigned from row order");
    }
    for (reason, count) in report.skips_by_kind() {
        let _ = writeln!(out, "  {}: {}", reason, count);
    }
    out
}
