// src/config.rs

use crate::error::Result;
use crate::io::fdf;
use crate::model::ParameterMap;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  /// Namespace used by `ccmp read` when none is given ("" = any)
  #[serde(default)]
  pub default_application: String,

  /// Extra parameter defaults, written as fdf values ("MD.LengthTimeStep" -> "1.0 fs")
  #[serde(default)]
  pub parameter_defaults: BTreeMap<String, String>,

  #[serde(default = "default_log_level")]
  pub log_level: String,
}

fn default_log_level() -> String {
  "warn".to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      default_application: String::new(),
      parameter_defaults: BTreeMap::new(),
      log_level: default_log_level(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/ccmp-tools/settings.json)
  ///
  /// Never fails: returns defaults plus a message saying what happened, so the
  /// caller can log it once a logger exists.
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  pub fn load_from(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader(reader) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> Result<PathBuf> {
    let path = Self::get_path();
    self.save_to(&path)?;
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(())
  }

  /// `parameter_defaults` run through the fdf coercion chain
  pub fn parameter_map(&self) -> ParameterMap {
    self
      .parameter_defaults
      .iter()
      .map(|(key, raw)| (key.to_lowercase(), fdf::coerce(raw.trim())))
      .collect()
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "ccmp", "ccmp-tools") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
