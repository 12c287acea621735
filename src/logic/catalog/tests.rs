use super::loader::{load_catalog, read_catalog};
use super::types::{Asset, AssetCatalog, RowErrorKind};
use crate::error::EngineError;
use std::io::Write;

const HEADER: &str = "id,so,apps,cvss_media,cvss_max,Cluster\n";

fn read(body: &str) -> (AssetCatalog, super::LoadReport) {
    read_catalog(body.as_bytes()).unwrap()
}

#[test]
fn test_asset_normalizes_apps_and_os() {
    let asset = Asset::new(1, [" Nginx ", "OpenSSL", ""], "  Linux ", 7.0, 0);
    assert_eq!(asset.os, "linux");
    assert!(asset.apps.contains("nginx"));
    assert!(asset.apps.contains("openssl"));
    assert_eq!(asset.apps.len(), 2);
}

#[test]
fn test_shared_apps_sorted() {
    let a = Asset::new(1, ["zlib", "nginx", "openssl"], "linux", 7.0, 0);
    let b = Asset::new(2, ["openssl", "zlib"], "linux", 7.0, 0);
    assert_eq!(a.shared_apps(&b), vec!["openssl".to_string(), "zlib".to_string()]);
    assert!(a.shares_any_app(&b));
}

#[test]
fn test_load_valid_rows() {
    let body = format!(
        "{HEADER}1,Linux,\"nginx, openssl\",7.0,9.1,0\n2,Windows,\"IIS\",5.5,6.0,1\n"
    );
    let (catalog, report) = read(&body);

    assert_eq!(report.accepted, 2);
    assert_eq!(report.skipped, 0);
    assert!(!report.synthesized_ids);

    let first = catalog.get(1).unwrap();
    assert_eq!(first.os, "linux");
    assert_eq!(first.apps.len(), 2);
    assert_eq!(first.severity, 7.0);
    assert_eq!(catalog.get(2).unwrap().cluster, 1);
}

#[test]
fn test_malformed_rows_skipped_with_count() {
    let body = format!(
        "{HEADER}1,linux,nginx,7.0,7.0,0\n\
         2,linux,,7.0,7.0,0\n\
         3,linux,nginx,high,7.0,0\n\
         4,linux,nginx,11.5,7.0,0\n\
         5,linux,nginx,6.0,7.0,\n\
         1,linux,nginx,6.0,7.0,0\n\
         0,linux,nginx,6.0,7.0,0\n"
    );
    let (catalog, report) = read(&body);

    assert_eq!(catalog.len(), 1);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.skipped, 6);

    let kinds: Vec<_> = report.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            RowErrorKind::MissingApps,
            RowErrorKind::BadSeverity,
            RowErrorKind::SeverityOutOfRange,
            RowErrorKind::MissingCluster,
            RowErrorKind::DuplicateId,
            RowErrorKind::BadId,
        ]
    );
    // Line numbers count the header
    assert_eq!(report.errors[0].line, 3);
}

#[test]
fn test_missing_id_column_assigns_row_order() {
    let body = "so,apps,cvss_media,Cluster\n\
                linux,nginx,7.0,0\n\
                linux,,7.0,0\n\
                linux,openssl,8.0,1\n";
    let (catalog, report) = read(body);

    assert!(report.synthesized_ids);
    assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_missing_required_column_is_fatal() {
    let body = "id,so,apps,Cluster\n1,linux,nginx,0\n";
    let result = read_catalog(body.as_bytes());
    match result {
        Err(EngineError::MissingColumn(col)) => assert_eq!(col, "cvss_media"),
        other => panic!("Expected MissingColumn, got {:?}", other.map(|(c, _)| c.len())),
    }
}

#[test]
fn test_missing_os_column_defaults_empty() {
    let body = "id,apps,severity,cluster\n7,nginx,7.0,2\n";
    let (catalog, _) = read(body);
    assert_eq!(catalog.get(7).unwrap().os, "");
}

#[test]
fn test_load_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{HEADER}10,linux,nginx,7.0,7.0,3\n").unwrap();
    file.flush().unwrap();

    let (catalog, report) = load_catalog(file.path()).unwrap();
    assert_eq!(report.accepted, 1);
    assert!(catalog.contains(10));
}

#[test]
fn test_cluster_sizes_and_fingerprint() {
    let catalog = AssetCatalog::from_assets(vec![
        Asset::new(1, ["a"], "linux", 7.0, 0),
        Asset::new(2, ["b"], "linux", 7.0, 0),
        Asset::new(3, ["c"], "linux", 7.0, 4),
    ]);
    let sizes = catalog.cluster_sizes();
    assert_eq!(sizes[&0], 2);
    assert_eq!(sizes[&4], 1);

    let same = AssetCatalog::from_assets(vec![
        Asset::new(3, ["c"], "linux", 7.0, 4),
        Asset::new(2, ["b"], "linux", 7.0, 0),
        Asset::new(1, ["a"], "linux", 7.0, 0),
    ]);
    assert_eq!(catalog.fingerprint(), same.fingerprint());
    assert_eq!(catalog.fingerprint().len(), 64);

    let changed = AssetCatalog::from_assets(vec![Asset::new(1, ["a"], "linux", 7.5, 0)]);
    assert_ne!(catalog.fingerprint(), changed.fingerprint());
}
