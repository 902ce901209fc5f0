//! model — reference-model catalog and data records.
//!
//! Purpose
//! -------
//! Load the immutable inputs of an admixture calculation: descriptive
//! metadata for each model (from a JSON catalog) and, per model, the SNP
//! list with major/minor alleles and the per-population major-allele
//! frequency matrix.
//!
//! Key behaviors
//! -------------
//! - [`ModelCatalog`]: ordered entries with unique, case-insensitive keys;
//!   a built-in catalog ships with the crate, `<root>/catalog.json`
//!   overrides it.
//! - [`ModelRepository`]: resolves `<root>/<key>.alleles` and
//!   `<root>/<key>.F`, parses them, and checks their alignment.
//! - Metadata is returned as owned clones, so callers may mutate freely.
//!
//! Invariants
//! ----------
//! - A returned [`ModelData`] has `len(rsids) == len(major) == len(minor) ==
//!   rows(frequency) > 0` and every frequency in [0, 1].
//! - The repository keeps no mutable state and is `Send + Sync`.
//!
//! Conventions
//! -----------
//! - Failures surface as [`ModelError`]; nothing here panics.
//! - Loads are logged at `debug` level through `tracing`.

pub mod data;
pub mod errors;
pub mod metadata;
pub mod repository;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::ModelData;
pub use self::errors::{ModelError, ModelResult};
pub use self::metadata::{ModelCatalog, ModelMetadata, PopulationInfo};
pub use self::repository::ModelRepository;

pub mod prelude {
    pub use super::data::ModelData;
    pub use super::errors::{ModelError, ModelResult};
    pub use super::metadata::{ModelCatalog, ModelMetadata, PopulationInfo};
    pub use super::repository::ModelRepository;
}
