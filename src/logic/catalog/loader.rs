//! Catalog Loader
//!
//! Reads the joined + clustered asset table (CSV) into an [`AssetCatalog`].
//! Bad rows are skipped and counted, never fatal.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::types::{
    parse_app_list, Asset, AssetCatalog, AssetId, ClusterId, LoadReport, RowError, RowErrorKind,
};
use crate::constants::MAX_SEVERITY;
use crate::error::{EngineError, EngineResult};

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

const ID_COLUMNS: &[&str] = &["id"];
const APPS_COLUMNS: &[&str] = &["apps"];
const OS_COLUMNS: &[&str] = &["os", "so"];
const SEVERITY_COLUMNS: &[&str] = &["cvss_media", "severity"];
const CLUSTER_COLUMNS: &[&str] = &["cluster"];

/// Position of each known column in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    id: Option<usize>,
    apps: usize,
    os: Option<usize>,
    severity: usize,
    cluster: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> EngineResult<Self> {
        let required = |names: &[&str]| {
            find_column(headers, names).ok_or_else(|| EngineError::MissingColumn(names[0].to_string()))
        };

        Ok(Self {
            id: find_column(headers, ID_COLUMNS),
            apps: required(APPS_COLUMNS)?,
            os: find_column(headers, OS_COLUMNS),
            severity: required(SEVERITY_COLUMNS)?,
            cluster: required(CLUSTER_COLUMNS)?,
        })
    }
}

/// Case-insensitive header lookup, first alias that matches wins
fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Load a catalog from a CSV file on disk
pub fn load_catalog(path: &Path) -> EngineResult<(AssetCatalog, LoadReport)> {
    let file = std::fs::File::open(path)?;
    let (catalog, report) = read_catalog(file)?;
    tracing::info!(
        "Catalog loaded from {}: {} accepted, {} skipped",
        path.display(),
        report.accepted,
        report.skipped
    );
    Ok((catalog, report))
}

/// Load a catalog from any CSV reader
pub fn read_catalog<R: Read>(reader: R) -> EngineResult<(AssetCatalog, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(rdr.headers()?)?;
    let mut report = LoadReport {
        synthesized_ids: columns.id.is_none(),
        ..Default::default()
    };

    let mut assets = Vec::new();
    let mut seen: HashSet<AssetId> = HashSet::new();

    for (index, result) in rdr.records().enumerate() {
        // Header is line 1, so the first data row is line 2
        let fallback_line = index as u64 + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                skip(&mut report, line, RowErrorKind::Malformed, e.to_string());
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        match parse_row(&record, &columns, index) {
            Ok(asset) => {
                if !seen.insert(asset.id) {
                    skip(&mut report, line, RowErrorKind::DuplicateId, asset.id.to_string());
                    continue;
                }
                assets.push(asset);
                report.accepted += 1;
            }
            Err((kind, detail)) => skip(&mut report, line, kind, detail),
        }
    }

    if report.skipped > 0 {
        tracing::warn!("{} catalog rows skipped", report.skipped);
    }

    Ok((AssetCatalog::from_assets(assets), report))
}

fn skip(report: &mut LoadReport, line: u64, kind: RowErrorKind, detail: String) {
    let error = RowError { line, kind, detail };
    tracing::warn!("Skipping catalog row: {}", error);
    report.record_skip(error);
}

// ============================================================================
// ROW PARSING
// ============================================================================

type RowResult<T> = Result<T, (RowErrorKind, String)>;

fn cell<'a>(record: &'a StringRecord, index: Option<usize>) -> Option<&'a str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_row(record: &StringRecord, columns: &ColumnMap, index: usize) -> RowResult<Asset> {
    let id = match columns.id {
        Some(_) => parse_id(cell(record, columns.id))?,
        // Ids follow row order, including rows that get skipped
        None => index as AssetId + 1,
    };

    let apps = cell(record, Some(columns.apps))
        .map(parse_app_list)
        .filter(|set| !set.is_empty())
        .ok_or((RowErrorKind::MissingApps, String::new()))?;

    let severity = parse_severity(cell(record, Some(columns.severity)))?;
    let cluster = parse_cluster(cell(record, Some(columns.cluster)))?;
    let os = cell(record, columns.os).unwrap_or("");

    Ok(Asset::new(id, apps, os, severity, cluster))
}

fn parse_id(raw: Option<&str>) -> RowResult<AssetId> {
    let raw = raw.ok_or((RowErrorKind::BadId, "empty".to_string()))?;
    match raw.parse::<AssetId>() {
        Ok(0) | Err(_) => Err((RowErrorKind::BadId, raw.to_string())),
        Ok(id) => Ok(id),
    }
}

fn parse_severity(raw: Option<&str>) -> RowResult<f64> {
    let raw = raw.ok_or((RowErrorKind::BadSeverity, "empty".to_string()))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| (RowErrorKind::BadSeverity, raw.to_string()))?;

    if !value.is_finite() {
        return Err((RowErrorKind::BadSeverity, raw.to_string()));
    }
    if !(0.0..=MAX_SEVERITY).contains(&value) {
        return Err((RowErrorKind::SeverityOutOfRange, raw.to_string()));
    }
    Ok(value)
}

fn parse_cluster(raw: Option<&str>) -> RowResult<ClusterId> {
    let raw = raw.ok_or((RowErrorKind::MissingCluster, String::new()))?;
    raw.parse()
        .map_err(|_| (RowErrorKind::BadCluster, raw.to_string()))
}
