//! Report Exporter
//!
//! Writes an [`EngineReport`] to an output directory:
//! - `report.json`: full report, pretty printed
//! - `<mode>_edges.csv`, `<mode>_routes.csv`, `<mode>_top_apps.csv`, `<mode>_spg.csv`

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::EngineResult;
use crate::logic::engine::{EngineReport, ModeReport};

/// Join ids as `a>b>c` for a single CSV cell
fn join_path(path: &[u32]) -> String {
    path.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(">")
}

/// Write all exports; returns the files written
pub fn export_report(report: &EngineReport, out_dir: &Path) -> EngineResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let json_path = out_dir.join("report.json");
    write_json(report, &json_path)?;
    written.push(json_path);

    for mode in &report.modes {
        written.extend(export_mode(mode, out_dir)?);
    }

    tracing::info!("Exported {} files to {}", written.len(), out_dir.display());
    Ok(written)
}

pub fn write_json(report: &EngineReport, path: &Path) -> EngineResult<()> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, report)?;
    file.write_all(b"\n")?;
    Ok(())
}

fn export_mode(mode: &ModeReport, out_dir: &Path) -> EngineResult<Vec<PathBuf>> {
    let prefix = mode.mode.as_str();

    let edges = out_dir.join(format!("{}_edges.csv", prefix));
    let mut w = csv::Writer::from_path(&edges)?;
    w.write_record(["a", "b", "weight", "shared_apps"])?;
    for e in &mode.edges {
        w.write_record([
            e.a.to_string(),
            e.b.to_string(),
            e.weight.to_string(),
            e.shared_apps.join(","),
        ])?;
    }
    w.flush()?;

    let routes = out_dir.join(format!("{}_routes.csv", prefix));
    let mut w = csv::Writer::from_path(&routes)?;
    w.write_record(["origin", "hops", "weight", "path"])?;
    for r in mode.routes.values() {
        w.write_record([
            r.origin.to_string(),
            r.hops.to_string(),
            r.weight().to_string(),
            join_path(&r.path),
        ])?;
    }
    w.flush()?;

    let apps = out_dir.join(format!("{}_top_apps.csv", prefix));
    let mut w = csv::Writer::from_path(&apps)?;
    w.write_record(["app", "count"])?;
    for a in &mode.top_apps {
        w.write_record([a.app.clone(), a.count.to_string()])?;
    }
    w.flush()?;

    let spg = out_dir.join(format!("{}_spg.csv", prefix));
    let mut w = csv::Writer::from_path(&spg)?;
    w.write_record(["from", "to"])?;
    for (from, to) in &mode.spg.edges {
        w.write_record([from.to_string(), to.to_string()])?;
    }
    w.flush()?;

    Ok(vec![edges, routes, apps, spg])
}
