//! Animation tuning configuration.
//!
//! Settings are read from the `[animation]` table of `rune.toml`, with
//! environment variables taking precedence. Every field has a default, so an
//! absent file or table yields [`AnimationConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

const CONFIG_FILE: &str = "rune.toml";

/// Tolerances and bounds used by keyframe timelines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Minimum time gap (seconds) between bracket keys; below it the blend factor is 0.
    pub bracket_epsilon: f32,
    /// Transform reconciliation may evaluate at most this many pairs per key.
    pub reconcile_passes_per_key: usize,
    /// Determinant magnitude under which a matrix is treated as singular.
    pub decompose_epsilon: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            bracket_epsilon: 1e-3,
            reconcile_passes_per_key: 3,
            decompose_epsilon: 1e-6,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    animation: AnimationConfig,
}

impl AnimationConfig {
    /// Parse the `[animation]` table out of TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.animation)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from `rune.toml` in the current directory, or fall back to defaults.
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(CONFIG_FILE)
    }

    /// Load from `path`; a missing file gives defaults silently, a malformed
    /// one gives defaults with a warning.
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path.as_ref()) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(err) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    %err,
                    "ignoring malformed animation config"
                );
                Self::default()
            }
        }
    }

    /// Override fields from `RUNE_ANIM_*` environment variables.
    pub fn merge_with_env(&mut self) {
        if let Some(eps) = env_parse::<f32>("RUNE_ANIM_BRACKET_EPSILON") {
            self.bracket_epsilon = eps;
        }
        if let Some(passes) = env_parse::<usize>("RUNE_ANIM_RECONCILE_PASSES") {
            self.reconcile_passes_per_key = passes;
        }
        if let Some(eps) = env_parse::<f32>("RUNE_ANIM_DECOMPOSE_EPSILON") {
            self.decompose_epsilon = eps;
        }
    }

    /// Load from `rune.toml` and apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AnimationConfig::default();
        assert_eq!(config.bracket_epsilon, 1e-3);
        assert_eq!(config.reconcile_passes_per_key, 3);
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let config = AnimationConfig::from_toml_str(
            r#"
            [animation]
            reconcile_passes_per_key = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.reconcile_passes_per_key, 5);
        assert_eq!(config.bracket_epsilon, 1e-3);
    }

    #[test]
    fn test_missing_table() {
        let config = AnimationConfig::from_toml_str("[demo]\nscene = \"zones\"\n").unwrap();
        assert_eq!(config, AnimationConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\nbracket_epsilon = 0.01").unwrap();

        let config = AnimationConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.bracket_epsilon, 0.01);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = AnimationConfig::load_from_file("/nonexistent/rune.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnimationConfig::load_or_default_from(dir.path().join(CONFIG_FILE));
        assert_eq!(config, AnimationConfig::default());
    }

    #[test]
    fn test_load_or_default_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation\nbracket_epsilon = 0.5").unwrap();

        let config = AnimationConfig::load_or_default_from(file.path());
        assert_eq!(config, AnimationConfig::default());
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[animation]\nreconcile_passes_per_key = 7\n").unwrap();

        let config = AnimationConfig::load_or_default_from(&path);
        assert_eq!(config.reconcile_passes_per_key, 7);
        assert_eq!(config.decompose_epsilon, 1e-6);
    }

    #[test]
    fn test_load_or_default() {
        // No rune.toml next to the crate manifest.
        assert_eq!(AnimationConfig::load_or_default(), AnimationConfig::default());
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("RUNE_ANIM_BRACKET_EPSILON", "0.05");
            std::env::set_var("RUNE_ANIM_RECONCILE_PASSES", " 4 ");
            std::env::set_var("RUNE_ANIM_DECOMPOSE_EPSILON", "tiny");
        }

        let mut config = AnimationConfig::default();
        config.merge_with_env();
        assert_eq!(config.bracket_epsilon, 0.05);
        assert_eq!(config.reconcile_passes_per_key, 4);
        // Unparsable values are ignored.
        assert_eq!(config.decompose_epsilon, 1e-6);

        assert_eq!(AnimationConfig::load(), config);

        unsafe {
            std::env::remove_var("RUNE_ANIM_BRACKET_EPSILON");
            std::env::remove_var("RUNE_ANIM_RECONCILE_PASSES");
            std::env::remove_var("RUNE_ANIM_DECOMPOSE_EPSILON");
        }
    }

    #[test]
    fn test_malformed_file() {
        let err = AnimationConfig::from_toml_str("[animation]\nbracket_epsilon = \"wide\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
