use std::io::Write;
use std::time::Duration;

use super::*;

#[test]
fn test_empty_file_gives_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.catalog.column, "drug");
    assert_eq!(config.resolver.max_retries, 3);
    assert_eq!(config.embedding.model_id, "DeepChem/ChemBERTa-77M-MTR");
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let config: Config = toml::from_str(
        r#"
        [resolver]
        query_rate = 0.5
        max_retries = 5

        [embedding]
        normalize = true

        [catalog]
        path = "/data/tahoe"
        "#,
    )
    .unwrap();

    assert_eq!(config.resolver.query_delay(), Duration::from_millis(500));
    assert_eq!(config.resolver.max_retries, 5);
    assert_eq!(config.resolver.base_url, ResolverConfig::default().base_url);
    assert!(config.embedding.normalize);
    assert_eq!(config.embedding.max_length, 512);
    assert_eq!(config.catalog.column, "drug");
}

#[test]
fn test_catalog_file_for_dataset_root() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = CatalogConfig { path: Some(dir.path().to_path_buf()), column: "drug".into() };
    assert_eq!(
        catalog.file(),
        Some(dir.path().join("metadata").join("obs_metadata.parquet"))
    );

    let file = CatalogConfig { path: Some(PathBuf::from("/tmp/obs.parquet")), ..Default::default() };
    assert_eq!(file.file(), Some(PathBuf::from("/tmp/obs.parquet")));
    assert_eq!(CatalogConfig::default().file(), None);
}

#[test]
fn test_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[catalog]\ncolumn = \"compound\"").unwrap();

    let config = Config::from_path(file.path()).unwrap();
    assert_eq!(config.catalog.column, "compound");
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    assert!(Config::load(Some(Path::new("/nonexistent/sugarloaf.toml"))).is_err());
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[resolver]\nmax_retries = \"many\"").unwrap();
    assert!(Config::from_path(file.path()).is_err());
}
