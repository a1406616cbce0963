//! Entity tree discovery.
//!
//! The entity tree holds one record per file, grouped by kind under the
//! first directory below the root:
//!
//! ```text
//! entities/
//!   valid_values.json          (ignored: not below a kind directory)
//!   specialist/
//!     uk/london-sleep-centre.json
//!   software/
//!     sleep-diary.yaml
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use entities_model::SourceKind;

use crate::document::DocumentFormat;
use crate::error::{IngestError, Result};

/// Lists record files below `root`, grouped by kind.
///
/// Files are sorted by path within each kind so runs are reproducible.
/// Hidden entries (names starting with `.`) are skipped, as are files whose
/// extension is not a supported document format.
pub fn discover_entity_files(root: &Path) -> Result<BTreeMap<SourceKind, Vec<PathBuf>>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut discovered: BTreeMap<SourceKind, Vec<PathBuf>> = BTreeMap::new();

    let walker = WalkDir::new(root)
        .min_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name().to_str()));

    for entry in walker {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if DocumentFormat::from_path(path).is_none() {
            debug!(path = %path.display(), "skipping non-document file");
            continue;
        }
        let Some(kind) = kind_for(root, path) else {
            debug!(path = %path.display(), "skipping file outside a kind directory");
            continue;
        };
        discovered.entry(kind).or_default().push(path.to_path_buf());
    }

    for files in discovered.values_mut() {
        files.sort();
    }

    Ok(discovered)
}

fn is_hidden(name: Option<&str>) -> bool {
    name.is_some_and(|name| name.starts_with('.') && name.len() > 1)
}

/// Kind named by the first path component below `root`.
fn kind_for(root: &Path, path: &Path) -> Option<SourceKind> {
    let relative = path.strip_prefix(root).ok()?;
    let first = relative.components().next()?;
    SourceKind::from_stem(first.as_os_str().to_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_comes_from_first_component() {
        let root = Path::new("/data/entities");
        assert_eq!(
            kind_for(root, Path::new("/data/entities/specialist/uk/a.json")),
            Some(SourceKind::Specialist)
        );
        assert_eq!(
            kind_for(root, Path::new("/data/entities/software/a.yaml")),
            Some(SourceKind::Software)
        );
        assert_eq!(kind_for(root, Path::new("/data/entities/drafts/a.json")), None);
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden(Some(".git")));
        assert!(!is_hidden(Some(".")));
        assert!(!is_hidden(Some("specialist")));
        assert!(!is_hidden(None));
    }
}
