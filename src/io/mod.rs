// src/io/mod.rs
pub mod fdf;
pub mod locate;
pub mod mde;
pub mod registry;
pub mod xyz;

pub use locate::{locate, FileHint};
pub use registry::{FileContent, FileReader, ReaderFactory, Registry};

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::OnceLock;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Registers every reader shipped with the crate.
pub fn register_builtin(registry: &mut Registry) -> Result<()> {
    fdf::register(registry)?;
    mde::register(registry)?;
    xyz::register(registry)
}

/// Process-wide reader registry, built on first use.
///
/// # Panics
/// If two built-in readers claim the same key.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut registry = Registry::new();
        if let Err(e) = register_builtin(&mut registry) {
            panic!("built-in reader table is inconsistent: {}", e);
        }
        registry
    })
}

/// Extension of `path` without the dot, as written (case kept).
pub fn extension_of(path: &Path) -> Result<&str> {
    path.extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::UnsupportedFormat {
            extension: path.display().to_string(),
        })
}

fn resolve(path: &Path, application: &str) -> Result<Box<dyn FileReader>> {
    let ext = extension_of(path)?;
    let factory = if application.is_empty() {
        registry().resolve(ext)?
    } else {
        registry().resolve_in(application, ext)?
    };
    let reader = factory();
    log::debug!("{} -> {}", path.display(), reader.key());
    Ok(reader)
}

/// Reads `path` with the reader registered for its extension.
///
/// An empty `application` searches every namespace and fails if the
/// extension is unknown or registered more than once.
pub fn read(path: impl AsRef<Path>, application: &str) -> Result<FileContent> {
    let path = path.as_ref();
    resolve(path, application)?.read(path)
}

pub fn write(path: impl AsRef<Path>, content: &FileContent, application: &str) -> Result<()> {
    let path = path.as_ref();
    resolve(path, application)?.write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FdfValue, ParameterMap};
    use std::fs;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ccmp_io_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_builtin_registrations() {
        assert_eq!(
            registry().keys(),
            vec!["siesta_ANI", "siesta_MDE", "siesta_fdf", "xyz_xyz"]
        );
    }

    #[test]
    fn test_builtin_registration_twice_is_a_duplicate() {
        let mut fresh = Registry::new();
        register_builtin(&mut fresh).unwrap();
        assert_eq!(fresh.len(), 4);

        let err = register_builtin(&mut fresh).unwrap_err();
        assert!(matches!(err, Error::DuplicateReader { ref key } if key == "siesta_fdf"));
    }

    #[test]
    fn test_every_reader_reports_its_key() {
        for key in registry().keys() {
            let (ns, ext) = key.split_once('_').unwrap();
            let reader = registry().resolve_in(ns, ext).unwrap()();
            assert_eq!(reader.key(), key);
        }
    }

    #[test]
    fn test_read_dispatches_by_extension() {
        let path = scratch("dispatch.fdf");
        fs::write(&path, "SystemLabel si\n").unwrap();

        let bare = read(&path, "").unwrap();
        let namespaced = read(&path, "siesta").unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(bare, namespaced);
        assert!(matches!(bare, FileContent::Parameters(_)));
    }

    #[test]
    fn test_read_unknown_extension() {
        let err = read("run.castep", "").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "castep"));
    }

    #[test]
    fn test_read_wrong_namespace() {
        let err = read("run.fdf", "xyz").unwrap_err();
        assert!(matches!(err, Error::NotImplementedForNamespace { .. }));
    }

    #[test]
    fn test_write_then_read_fdf() {
        let path = scratch("written.fdf");
        let mut params = ParameterMap::new();
        params.insert("MeshCutoff", FdfValue::Quantity(300.0, "Ry".into()));

        write(&path, &FileContent::Parameters(params.clone()), "siesta").unwrap();
        let back = read(&path, "").unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(back, FileContent::Parameters(params));
    }
}
