//! Diff options and their YAML form.

use camino::Utf8Path;
use facet::Facet;

use crate::{Error, Result};

/// Tuning knobs for a diff.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Largest number of words compared as one block when matching.
    /// Larger values find long runs faster; 1 compares word by word.
    pub match_granularity_maximum: usize,

    /// Blocks occurring more than `new words * accuracy` times are skipped
    /// during matching. 1.0 never skips anything, 0.0 skips everything.
    pub repeating_words_accuracy: f64,

    /// Treat every whitespace word as the same word
    pub ignore_whitespace_differences: bool,

    /// Matches shorter than this fraction of the surrounding gap are merged
    /// into the change around them. 0.0 disables orphan removal.
    pub orphan_match_threshold: f64,

    /// Regular expressions whose matches diff as single words
    pub block_expressions: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            match_granularity_maximum: 4,
            repeating_words_accuracy: 1.0,
            ignore_whitespace_differences: true,
            orphan_match_threshold: 0.0,
            block_expressions: Vec::new(),
        }
    }
}

impl DiffOptions {
    /// Check every option against its domain.
    pub fn validate(&self) -> Result<()> {
        if self.match_granularity_maximum == 0 {
            return Err(Error::InvalidOption {
                name: "match_granularity_maximum",
                reason: "must be at least 1".to_string(),
            });
        }

        check_fraction("repeating_words_accuracy", self.repeating_words_accuracy)?;
        check_fraction("orphan_match_threshold", self.orphan_match_threshold)?;
        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            name,
            reason: format!("must be between 0 and 1, got {value}"),
        })
    }
}

/// Diff settings as read from a YAML file, e.g.:
///
/// ```yaml
/// match_granularity_maximum: 2
/// orphan_match_threshold: 0.2
/// block_expressions:
///   - '\d{1,2}\s*(Jan|Feb|Mar)\s*\d{4}'
/// ```
///
/// Unset keys take the [`DiffOptions`] defaults.
#[derive(Debug, Clone, Default, Facet)]
#[facet(rename_all = "snake_case")]
pub struct DiffConfig {
    #[facet(default)]
    pub match_granularity_maximum: Option<usize>,

    #[facet(default)]
    pub repeating_words_accuracy: Option<f64>,

    #[facet(default)]
    pub ignore_whitespace_differences: Option<bool>,

    #[facet(default)]
    pub orphan_match_threshold: Option<f64>,

    #[facet(default)]
    pub block_expressions: Option<Vec<String>>,
}

impl DiffConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        facet_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)?;
        let config: Self = facet_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {path}: {e}")))?;
        debug!(%path, ?config, "loaded diff config");
        Ok(config)
    }

    /// Resolve into validated options.
    pub fn into_options(self) -> Result<DiffOptions> {
        let options = DiffOptions::from(self);
        options.validate()?;
        Ok(options)
    }
}

impl From<DiffConfig> for DiffOptions {
    fn from(config: DiffConfig) -> Self {
        let defaults = DiffOptions::default();
        Self {
            match_granularity_maximum: config
                .match_granularity_maximum
                .unwrap_or(defaults.match_granularity_maximum),
            repeating_words_accuracy: config
                .repeating_words_accuracy
                .unwrap_or(defaults.repeating_words_accuracy),
            ignore_whitespace_differences: config
                .ignore_whitespace_differences
                .unwrap_or(defaults.ignore_whitespace_differences),
            orphan_match_threshold: config
                .orphan_match_threshold
                .unwrap_or(defaults.orphan_match_threshold),
            block_expressions: config.block_expressions.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_defaults_are_valid() {
        let options = DiffOptions::default();
        assert_eq!(options.match_granularity_maximum, 4);
        assert_eq!(options.repeating_words_accuracy, 1.0);
        assert!(options.ignore_whitespace_differences);
        assert_eq!(options.orphan_match_threshold, 0.0);
        assert!(options.block_expressions.is_empty());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let zero_granularity = DiffOptions {
            match_granularity_maximum: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_granularity.validate(),
            Err(Error::InvalidOption { name: "match_granularity_maximum", .. })
        ));

        let accuracy = DiffOptions {
            repeating_words_accuracy: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            accuracy.validate(),
            Err(Error::InvalidOption { name: "repeating_words_accuracy", .. })
        ));

        let threshold = DiffOptions {
            orphan_match_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            threshold.validate(),
            Err(Error::InvalidOption { name: "orphan_match_threshold", .. })
        ));
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
match_granularity_maximum: 2
"#;

        let config = DiffConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.match_granularity_maximum, Some(2));
        assert!(config.orphan_match_threshold.is_none());

        let options = config.into_options().unwrap();
        assert_eq!(options.match_granularity_maximum, 2);
        assert_eq!(options.repeating_words_accuracy, 1.0);
        assert!(options.ignore_whitespace_differences);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
match_granularity_maximum: 1
repeating_words_accuracy: 0.5
ignore_whitespace_differences: false
orphan_match_threshold: 0.2
block_expressions:
  - '\d{4}'
  - '\[\[.*?\]\]'
"#;

        let options = DiffConfig::from_yaml(yaml).unwrap().into_options().unwrap();
        assert_eq!(
            options,
            DiffOptions {
                match_granularity_maximum: 1,
                repeating_words_accuracy: 0.5,
                ignore_whitespace_differences: false,
                orphan_match_threshold: 0.2,
                block_expressions: vec![r"\d{4}".to_string(), r"\[\[.*?\]\]".to_string()],
            }
        );
    }

    #[test]
    fn test_invalid_config_values() {
        let config = DiffConfig::from_yaml("orphan_match_threshold: 2.0\n").unwrap();
        assert!(matches!(
            config.into_options(),
            Err(Error::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("diff.yaml")).unwrap();
        fs_err::write(&path, "ignore_whitespace_differences: false\n").unwrap();

        let config = DiffConfig::load(&path).unwrap();
        assert_eq!(config.ignore_whitespace_differences, Some(false));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("missing.yaml")).unwrap();
        assert!(matches!(DiffConfig::load(&path), Err(Error::Io(_))));
    }
}
