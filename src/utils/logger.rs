// src/utils/logger.rs

use log::{LevelFilter, SetLoggerError};

/// Installs env_logger at `level`. `RUST_LOG`, when set, takes precedence.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  env_logger::Builder::new()
    .filter_level(level)
    .parse_default_env()
    .format_timestamp(None)
    .try_init()
}

/// "error" | "warn" | "info" | "debug" | "trace"; anything else is Warn
pub fn parse_level(name: &str) -> LevelFilter {
  name.parse().unwrap_or(LevelFilter::Warn)
}

/// Raise `base` by one step per `-v`
pub fn bump_level(base: LevelFilter, verbosity: u8) -> LevelFilter {
  let mut level = base;
  for _ in 0..verbosity {
    level = match level {
      LevelFilter::Off => LevelFilter::Error,
      LevelFilter::Error => LevelFilter::Warn,
      LevelFilter::Warn => LevelFilter::Info,
      LevelFilter::Info => LevelFilter::Debug,
      LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
    };
  }
  level
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_level() {
    assert_eq!(parse_level("debug"), LevelFilter::Debug);
    assert_eq!(parse_level("INFO"), LevelFilter::Info);
    assert_eq!(parse_level("loud"), LevelFilter::Warn);
  }

  #[test]
  fn test_bump_level() {
    assert_eq!(bump_level(LevelFilter::Warn, 0), LevelFilter::Warn);
    assert_eq!(bump_level(LevelFilter::Warn, 2), LevelFilter::Debug);
    assert_eq!(bump_level(LevelFilter::Info, 9), LevelFilter::Trace);
  }

  #[test]
  fn test_second_init_is_refused() {
    // Whichever call comes first in this process wins; the next must fail
    let _ = init(LevelFilter::Warn);
    assert!(init(LevelFilter::Debug).is_err());
  }
}
