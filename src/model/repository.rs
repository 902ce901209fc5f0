//! File-backed access to reference models.
//!
//! A repository is a root directory plus a [`ModelCatalog`]. For a model key
//! `k` the data records live at `<root>/<k>.alleles` and `<root>/<k>.F`.
//! Nothing is cached: every call re-reads the records and every metadata
//! accessor hands out an owned copy.
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::model::{
    data::{parse_alleles, parse_frequencies, ModelData},
    errors::{ModelError, ModelResult},
    metadata::{ModelCatalog, ModelMetadata},
};

/// File name of an optional catalog override inside the repository root.
pub const CATALOG_FILE_NAME: &str = "catalog.json";
/// Extension of allele records.
pub const ALLELES_EXT: &str = "alleles";
/// Extension of frequency records.
pub const FREQUENCY_EXT: &str = "F";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRepository {
    root: PathBuf,
    catalog: ModelCatalog,
}

impl ModelRepository {
    pub fn new(root: impl Into<PathBuf>, catalog: ModelCatalog) -> Self {
        Self { root: root.into(), catalog }
    }

    /// Open `root`, using `<root>/catalog.json` if present and the built-in
    /// catalog otherwise.
    ///
    /// # Errors
    /// - Catalog read or parse errors from [`ModelCatalog`].
    pub fn open(root: impl Into<PathBuf>) -> ModelResult<Self> {
        let root = root.into();
        let override_path = root.join(CATALOG_FILE_NAME);
        let catalog = if override_path.is_file() {
            debug!(path = %override_path.display(), "loading model catalog");
            ModelCatalog::from_path(&override_path)?
        } else {
            ModelCatalog::builtin()?
        };
        Ok(Self::new(root, catalog))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Model keys in catalog order.
    pub fn model_keys(&self) -> Vec<String> {
        self.catalog.keys()
    }

    /// Owned copy of the metadata for `key` (case-insensitive).
    ///
    /// # Errors
    /// - [`ModelError::UnsupportedModel`] if no entry matches.
    pub fn get_metadata(&self, key: &str) -> ModelResult<ModelMetadata> {
        self.catalog
            .get(key)
            .cloned()
            .ok_or_else(|| ModelError::UnsupportedModel { key: key.to_string() })
    }

    /// Read and align the data records of `key`.
    ///
    /// `key` is used verbatim in the file names.
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`ModelError::MissingDataFile`] if either record is absent.
    /// - Parse and I/O errors from the record parsers.
    /// - [`ModelError::EmptyDataFile`] if the allele record has no rows.
    /// - [`ModelError::RowCountMismatch`] if the row counts differ.
    pub fn get_model_data(&self, key: &str) -> ModelResult<ModelData> {
        let alleles_path = self.data_path(key, ALLELES_EXT);
        let frequency_path = self.data_path(key, FREQUENCY_EXT);
        for path in [&alleles_path, &frequency_path] {
            if !path.is_file() {
                return Err(ModelError::MissingDataFile { path: path.display().to_string() });
            }
        }

        let alleles = parse_alleles(open_reader(&alleles_path)?, &display(&alleles_path))?;
        let frequency =
            parse_frequencies(open_reader(&frequency_path)?, &display(&frequency_path))?;

        if alleles.is_empty() {
            return Err(ModelError::EmptyDataFile { key: key.to_string() });
        }
        if alleles.len() != frequency.nrows() {
            return Err(ModelError::RowCountMismatch {
                key: key.to_string(),
                alleles: alleles.len(),
                frequencies: frequency.nrows(),
            });
        }
        debug!(
            model = key,
            snps = alleles.len(),
            populations = frequency.ncols(),
            "loaded reference model"
        );

        Ok(ModelData {
            rsids: alleles.rsids,
            major: alleles.major,
            minor: alleles.minor,
            frequency,
        })
    }

    fn data_path(&self, key: &str, ext: &str) -> PathBuf {
        self.root.join(format!("{key}.{ext}"))
    }
}

fn open_reader(path: &Path) -> ModelResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ModelError::ReadFailed { path: display(path), message: e.to_string() })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::fs;

    fn write_model(dir: &Path, key: &str, alleles: &str, freq: &str) {
        fs::write(dir.join(format!("{key}.alleles")), alleles).expect("write alleles");
        fs::write(dir.join(format!("{key}.F")), freq).expect("write frequencies");
    }

    #[test]
    // Purpose
    // -------
    // Allele columns are `rsid minor major`; the repository must expose them
    // as separate major/minor arrays aligned with the frequency rows.
    fn loads_aligned_arrays() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path(), "wbbc", "rs1 A G\nrs2 C T\n", "0.9 0.1\n0.8 0.2\n");
        let repo = ModelRepository::open(dir.path()).expect("open");

        // Act
        let data = repo.get_model_data("wbbc").expect("load");

        // Assert
        assert_eq!(data.rsids, vec!["rs1", "rs2"]);
        assert_eq!(data.minor, vec!['A', 'C']);
        assert_eq!(data.major, vec!['G', 'T']);
        assert_eq!(data.frequency, array![[0.9, 0.1], [0.8, 0.2]]);
        assert_eq!(data.snp_count(), 2);
        assert_eq!(data.population_count(), 2);
    }

    #[test]
    fn missing_records_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = ModelRepository::open(dir.path()).expect("open");
        assert!(matches!(
            repo.get_model_data("wbbc"),
            Err(ModelError::MissingDataFile { path }) if path.ends_with("wbbc.alleles")
        ));

        fs::write(dir.path().join("wbbc.alleles"), "rs1 A G\n").expect("write alleles");
        assert!(matches!(
            repo.get_model_data("wbbc"),
            Err(ModelError::MissingDataFile { path }) if path.ends_with("wbbc.F")
        ));
    }

    #[test]
    fn empty_allele_record_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path(), "wbbc", "\n", "");
        let repo = ModelRepository::open(dir.path()).expect("open");
        assert_eq!(
            repo.get_model_data("wbbc"),
            Err(ModelError::EmptyDataFile { key: "wbbc".into() })
        );
    }

    #[test]
    fn row_count_mismatch_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path(), "wbbc", "rs1 A G\nrs2 C T\n", "0.9 0.1\n");
        let repo = ModelRepository::open(dir.path()).expect("open");
        assert_eq!(
            repo.get_model_data("wbbc"),
            Err(ModelError::RowCountMismatch { key: "wbbc".into(), alleles: 2, frequencies: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Metadata is handed out as independent copies: mutating one must not
    // affect the catalog or later calls.
    fn metadata_copies_are_independent() {
        // Arrange
        let repo = ModelRepository::open("unused-root").expect("builtin catalog");

        // Act
        let mut first = repo.get_metadata("WBBC").expect("known key");
        first.populations[0].name = "changed".into();
        first.populations.clear();
        let second = repo.get_metadata("wbbc").expect("known key");

        // Assert
        assert_eq!(second.populations.len(), 4);
        assert_eq!(second.populations[0].name, "North Han Chinese");
    }

    #[test]
    fn unknown_key_is_unsupported() {
        let repo = ModelRepository::open("unused-root").expect("builtin catalog");
        assert_eq!(
            repo.get_metadata("k13"),
            Err(ModelError::UnsupportedModel { key: "k13".into() })
        );
    }

    #[test]
    fn catalog_file_in_root_overrides_builtin() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CATALOG_FILE_NAME),
            r#"[{"key": "toy", "name": "Toy", "populations": [{"name": "A"}, {"name": "B"}]}]"#,
        )
        .expect("write catalog");
        let repo = ModelRepository::open(dir.path()).expect("open");
        assert_eq!(repo.model_keys(), vec!["toy".to_string()]);
        assert!(repo.get_metadata("wbbc").is_err());
    }
}
