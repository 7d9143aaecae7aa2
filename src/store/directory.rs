//! Directory-backed parameter set store.
//!
//! Optimization results are laid out as one numeric subdirectory per run
//! under a common root:
//!
//! ```text
//! out/
//!   1/
//!     generation.json      <- best generation index; marks the run complete
//!     fit_param24.json     <- fitted vector of generation 24
//!   2/
//!     ...
//! ```
//!
//! A run without a `generation.json` record has not finished optimizing and
//! is skipped at listing time, shrinking the first dimension of the
//! sensitivity tensors. The fitted vector only covers the searched entries;
//! [`SearchIndices`] maps its leading part onto parameter indices and its
//! trailing part onto initial-state indices, applied over the model's
//! default vectors.

use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use super::paramset::{Paramset, ParamsetStore};

const GENERATION_FILE: &str = "generation.json";

/// Positions in the parameter and initial-state vectors that were subject
/// to fitting, in the order the fitted vector stores them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIndices {
    pub parameters: Vec<usize>,
    pub initial_state: Vec<usize>,
}

impl SearchIndices {
    /// Fits every parameter and no initial concentrations.
    pub fn all_parameters(num_parameters: usize) -> Self {
        Self {
            parameters: (0..num_parameters).collect(),
            initial_state: Vec::new(),
        }
    }

    /// Expected length of a fitted vector.
    pub fn len(&self) -> usize {
        self.parameters.len() + self.initial_state.len()
    }

    /// Whether nothing was searched.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.initial_state.is_empty()
    }
}

/// Store over a results directory of numeric run folders.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    defaults: Paramset,
    search: SearchIndices,
}

impl DirectoryStore {
    /// Creates a store rooted at `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - the results directory holding numeric run folders
    /// * `defaults` - model default parameters and initial state, used for
    ///   every entry the optimization did not search
    /// * `search` - mapping of fitted-vector entries onto the defaults
    pub fn new(root: impl Into<PathBuf>, defaults: Paramset, search: SearchIndices) -> Self {
        Self {
            root: root.into(),
            defaults,
            search,
        }
    }

    /// The results directory this store reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether run `id` carries a completed-optimization marker.
    pub fn is_complete(&self, id: u32) -> bool {
        self.run_dir(id).join(GENERATION_FILE).is_file()
    }

    fn run_dir(&self, id: u32) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    fn apply(
        defaults: &Array1<f64>,
        indices: &[usize],
        fitted: &[f64],
    ) -> Result<Array1<f64>, StoreError> {
        let mut values = defaults.clone();
        for (&index, &value) in indices.iter().zip(fitted) {
            if index >= values.len() {
                return Err(StoreError::SearchIndexOutOfBounds {
                    index,
                    len: values.len(),
                });
            }
            values[index] = value;
        }
        Ok(values)
    }
}

impl ParamsetStore for DirectoryStore {
    fn list_paramsets(&self) -> Result<Vec<u32>, StoreError> {
        let numeric = Regex::new(r"^\d+$").unwrap();

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !numeric.is_match(name) || !entry.path().is_dir() {
                continue;
            }
            let Ok(id) = name.parse::<u32>() else {
                continue;
            };
            if self.is_complete(id) {
                ids.push(id);
            } else {
                log::warn!("run {id} has no generation record yet, skipping");
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    fn load_paramset(&self, id: u32) -> Result<Paramset, StoreError> {
        let run_dir = self.run_dir(id);
        let generation_path = run_dir.join(GENERATION_FILE);
        if !generation_path.is_file() {
            return Err(StoreError::MissingOptimizationResult(id));
        }

        let generation: u32 = Self::read_json(&generation_path)?;
        let fitted: Vec<f64> = Self::read_json(&run_dir.join(format!("fit_param{generation}.json")))?;

        if fitted.len() != self.search.len() {
            return Err(StoreError::FittedVectorLength {
                id,
                expected: self.search.len(),
                found: fitted.len(),
            });
        }

        let (fitted_params, fitted_state) = fitted.split_at(self.search.parameters.len());
        Ok(Paramset {
            parameters: Self::apply(
                &self.defaults.parameters,
                &self.search.parameters,
                fitted_params,
            )?,
            initial_state: Self::apply(
                &self.defaults.initial_state,
                &self.search.initial_state,
                fitted_state,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::fs;

    fn defaults() -> Paramset {
        Paramset {
            parameters: array![1.0, 2.0, 3.0],
            initial_state: array![10.0, 0.0],
        }
    }

    fn write_run(root: &Path, id: u32, generation: u32, fitted: &[f64]) {
        let dir = root.join(id.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(GENERATION_FILE),
            serde_json::to_string(&generation).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.join(format!("fit_param{generation}.json")),
            serde_json::to_string(fitted).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_list_skips_incomplete_and_foreign_entries() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), 3, 5, &[0.5]);
        write_run(tmp.path(), 1, 2, &[0.7]);
        // incomplete run: directory without a generation record
        fs::create_dir_all(tmp.path().join("2")).unwrap();
        // non-numeric entries are not runs
        fs::create_dir_all(tmp.path().join("figure")).unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let store = DirectoryStore::new(
            tmp.path(),
            defaults(),
            SearchIndices {
                parameters: vec![1],
                initial_state: vec![],
            },
        );

        assert_eq!(store.list_paramsets().unwrap(), vec![1, 3]);
        assert!(!store.is_complete(2));
    }

    #[test]
    fn test_load_applies_search_indices_over_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), 7, 12, &[9.0, 8.0, 100.0]);

        let store = DirectoryStore::new(
            tmp.path(),
            defaults(),
            SearchIndices {
                parameters: vec![0, 2],
                initial_state: vec![0],
            },
        );

        let paramset = store.load_paramset(7).unwrap();
        assert_eq!(paramset.parameters, array![9.0, 2.0, 8.0]);
        assert_eq!(paramset.initial_state, array![100.0, 0.0]);
    }

    #[test]
    fn test_load_incomplete_run_fails() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("4")).unwrap();

        let store = DirectoryStore::new(tmp.path(), defaults(), SearchIndices::default());
        assert!(matches!(
            store.load_paramset(4),
            Err(StoreError::MissingOptimizationResult(4))
        ));
    }

    #[test]
    fn test_load_rejects_wrong_vector_length() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), 1, 0, &[1.0, 2.0]);

        let store = DirectoryStore::new(
            tmp.path(),
            defaults(),
            SearchIndices {
                parameters: vec![0],
                initial_state: vec![],
            },
        );
        assert!(matches!(
            store.load_paramset(1),
            Err(StoreError::FittedVectorLength {
                id: 1,
                expected: 1,
                found: 2
            })
        ));
    }
}
