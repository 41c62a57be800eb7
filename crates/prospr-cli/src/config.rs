use crate::error::{CliError, Result};
use prospr_core::core::models::model::ModelTable;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// An explicit energy model loaded from a TOML file.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModelFile {
    /// Residue-pair keys to integer bond energies, e.g. `HH = -4`.
    pub bonds: BTreeMap<String, i32>,

    /// Mirror each pair into its reverse unless that entry already exists.
    #[serde(default = "default_bond_symmetry")]
    pub bond_symmetry: bool,
}

fn default_bond_symmetry() -> bool {
    true
}

pub fn load_model_table(path: &Path) -> Result<ModelTable> {
    let text = std::fs::read_to_string(path)?;
    let model_file: ModelFile =
        toml::from_str(&text).map_err(|source| CliError::ModelFileParsing {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ModelTable::from_bonds(model_file.bonds, model_file.bond_symmetry)?)
}
