// Engine configuration.
// =====================
// Plays the role the teacher's `clap`-derived `RuntimeOpts`/`RunArgs` play
// for the `hvmc` binary — same fields in spirit (memory size, thread
// count) — but built programmatically, since argv parsing belongs to the
// out-of-scope launch/teardown surface (spec.md §0.2).

use crate::error::ConfigError;
use crate::util::parse_abbrev_number;

/// Sizes the arenas and thread pool before `Engine::run` starts.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
  /// Worker thread count. Must be a power of two (the work-stealing
  /// tournament tree is a balanced binary tree); `1` disables stealing.
  pub threads: usize,
  /// Size of the shared node arena.
  pub node_capacity: usize,
  /// Size of the shared variable arena.
  pub vars_capacity: usize,
  /// Capacity of each thread's redex bag (the spec's `R`).
  pub rbag_capacity: usize,
}

impl EngineConfig {
  /// Builds a config from the same kind of strings the teacher's `-t`/`-s`/
  /// `-m` flags carried (`"8"`, `"400M"`, `"4G"`), without a CLI framework
  /// driving the parse. Validates before returning.
  pub fn try_from_strs(
    threads: &str,
    node_capacity: &str,
    vars_capacity: &str,
    rbag_capacity: &str,
  ) -> Result<Self, ConfigError> {
    let config = EngineConfig {
      threads: parse_abbrev_number(threads).map_err(ConfigError::InvalidSize)?,
      node_capacity: parse_abbrev_number(node_capacity).map_err(ConfigError::InvalidSize)?,
      vars_capacity: parse_abbrev_number(vars_capacity).map_err(ConfigError::InvalidSize)?,
      rbag_capacity: parse_abbrev_number(rbag_capacity).map_err(ConfigError::InvalidSize)?,
    };
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.threads == 0 || !self.threads.is_power_of_two() {
      return Err(ConfigError::ThreadsNotPowerOfTwo(self.threads));
    }
    if self.node_capacity == 0 {
      return Err(ConfigError::ZeroNodeCapacity);
    }
    if self.vars_capacity == 0 {
      return Err(ConfigError::ZeroVarsCapacity);
    }
    if self.rbag_capacity == 0 {
      return Err(ConfigError::ZeroBagCapacity);
    }
    Ok(())
  }
}

impl Default for EngineConfig {
  /// A single-threaded, modestly sized default — enough for the bundled
  /// demo book, not tuned for any particular workload.
  fn default() -> Self {
    EngineConfig { threads: 1, node_capacity: 1 << 20, vars_capacity: 1 << 20, rbag_capacity: 1 << 16 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_non_power_of_two_threads() {
    let cfg = EngineConfig { threads: 3, ..EngineConfig::default() };
    assert!(matches!(cfg.validate(), Err(ConfigError::ThreadsNotPowerOfTwo(3))));
  }

  #[test]
  fn rejects_zero_capacities() {
    let cfg = EngineConfig { node_capacity: 0, ..EngineConfig::default() };
    assert!(matches!(cfg.validate(), Err(ConfigError::ZeroNodeCapacity)));
  }

  #[test]
  fn default_config_validates() {
    assert!(EngineConfig::default().validate().is_ok());
  }

  #[test]
  fn try_from_strs_parses_abbreviated_sizes() {
    let cfg = EngineConfig::try_from_strs("4", "400M", "1G", "65536").unwrap();
    assert_eq!(cfg.threads, 4);
    assert_eq!(cfg.node_capacity, 400 << 20);
    assert_eq!(cfg.vars_capacity, 1 << 30);
    assert_eq!(cfg.rbag_capacity, 65536);
  }

  #[test]
  fn try_from_strs_rejects_garbage() {
    assert!(matches!(
      EngineConfig::try_from_strs("nope", "400M", "1G", "65536"),
      Err(ConfigError::InvalidSize(_))
    ));
  }

  #[test]
  fn try_from_strs_still_validates_the_result() {
    assert!(matches!(
      EngineConfig::try_from_strs("3", "400M", "1G", "65536"),
      Err(ConfigError::ThreadsNotPowerOfTwo(3))
    ));
  }
}
