use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::LoadError;
use crate::domain::{Award, Catalog, EssayPrompt};

/// The on-disk layout of a catalog file.
///
/// ```yaml
/// awards:
///   - id: 1
///     identifier: pledge
///     name: Pledge Award
/// prompts:
///   - id: 201
///     identifier: involvement_outside
///     prompt: Describe your involvement outside the chapter.
///     word_limit: 500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Every award revision.
    #[serde(default)]
    pub awards: Vec<Award>,

    /// Every essay prompt revision.
    #[serde(default)]
    pub prompts: Vec<EssayPrompt>,
}

/// Reads a catalog file into a [`Catalog`].
///
/// Version chains are not checked here. A file with broken chains loads
/// fine and fails later, when the broken identifier is resolved.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed, or if two
/// records of the same kind share an identity.
#[instrument(level = "debug")]
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let file: CatalogFile = serde_yaml::from_str(&text).map_err(|e| LoadError::yaml(path, e))?;

    tracing::debug!(
        "read {} award and {} prompt revision(s)",
        file.awards.len(),
        file.prompts.len()
    );

    Catalog::new(file.awards, file.prompts).map_err(|source| LoadError::Duplicate {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::{RecordId, Slug};

    const CATALOG: &str = r"
awards:
  - id: 1
    identifier: pledge
    name: Pledge Award
  - id: 2
    identifier: pledge
    previous_version: 1
    name: Pledge Award
    description: Renamed criteria.
prompts:
  - id: 201
    identifier: involvement_outside
    prompt: Describe your involvement outside the chapter.
    word_limit: 500
";

    fn write(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_resolves_latest() {
        let dir = TempDir::new().unwrap();
        let catalog = load_catalog(&write(&dir, CATALOG)).unwrap();

        let pledge = catalog
            .awards
            .latest(&Slug::try_from("pledge").unwrap())
            .unwrap();
        assert_eq!(pledge.id, RecordId::new(2));
        assert_eq!(pledge.description, "Renamed criteria.");
        assert_eq!(catalog.prompts.len(), 1);
    }

    #[test]
    fn empty_file_is_an_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let catalog = load_catalog(&write(&dir, "{}")).unwrap();
        assert!(catalog.awards.is_empty());
        assert!(catalog.prompts.is_empty());
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "awards:\n  - {id: 1, identifier: a, name: A}\n  - {id: 1, identifier: b, name: B}\n",
        );
        assert!(matches!(
            load_catalog(&path),
            Err(LoadError::Duplicate { source, .. }) if source.0 == RecordId::new(1)
        ));
    }

    #[test]
    fn invalid_identifier_is_a_yaml_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "awards:\n  - {id: 1, identifier: Not A Slug, name: A}\n");
        assert!(matches!(load_catalog(&path), Err(LoadError::Yaml { .. })));
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_catalog(&dir.path().join("nope.yaml")),
            Err(LoadError::NotFound(_))
        ));
    }
}
