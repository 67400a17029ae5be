// src/io/registry.rs

use crate::error::{Error, Result};
use crate::model::{ParameterMap, PropertyTable, Structure};
use std::collections::BTreeMap;
use std::path::Path;

/// What a reader hands back. Each format produces exactly one kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FileContent {
    Snapshots(Vec<Structure>),
    Parameters(ParameterMap),
    Properties(PropertyTable),
}

impl FileContent {
    pub fn kind(&self) -> &'static str {
        match self {
            FileContent::Snapshots(_) => "snapshots",
            FileContent::Parameters(_) => "parameters",
            FileContent::Properties(_) => "properties",
        }
    }
}

/// Capability of a registered format: read is required, write is optional.
pub trait FileReader {
    fn read(&self, path: &Path) -> Result<FileContent>;

    fn write(&self, _path: &Path, _content: &FileContent) -> Result<()> {
        Err(Error::WriteNotSupported {
            key: self.key().to_string(),
        })
    }

    /// Registry key, e.g. `siesta_fdf`
    fn key(&self) -> &'static str;
}

pub type ReaderFactory = fn() -> Box<dyn FileReader>;

/// Maps `(namespace, extension)` to a reader factory.
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<(String, String), ReaderFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, namespace: &str, extension: &str, factory: ReaderFactory) -> Result<()> {
        let key = (namespace.to_string(), extension.to_string());
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateReader {
                key: format!("{}_{}", namespace, extension),
            });
        }
        log::debug!("registered reader {}_{}", namespace, extension);
        self.entries.insert(key, factory);
        Ok(())
    }

    /// Bare lookup: the extension must be registered under exactly one namespace.
    pub fn resolve(&self, extension: &str) -> Result<ReaderFactory> {
        let matches: Vec<(&String, &ReaderFactory)> = self
            .entries
            .iter()
            .filter(|((_, ext), _)| ext == extension)
            .map(|((ns, _), factory)| (ns, factory))
            .collect();

        match matches.as_slice() {
            [] => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
            [(_, factory)] => Ok(**factory),
            many => Err(Error::AmbiguousFormat {
                extension: extension.to_string(),
                namespaces: many.iter().map(|(ns, _)| ns.to_string()).collect(),
            }),
        }
    }

    pub fn resolve_in(&self, namespace: &str, extension: &str) -> Result<ReaderFactory> {
        self.entries
            .get(&(namespace.to_string(), extension.to_string()))
            .copied()
            .ok_or_else(|| Error::NotImplementedForNamespace {
                namespace: namespace.to_string(),
                extension: extension.to_string(),
            })
    }

    /// All keys as `namespace_extension`, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .keys()
            .map(|(ns, ext)| format!("{}_{}", ns, ext))
            .collect()
    }

    pub fn extensions(&self, namespace: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, ext)| ext.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
