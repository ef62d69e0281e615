use crate::utils::slash_path;
use glob::Pattern;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/.venv/**",
    "**/venv/**",
    "**/site-packages/**",
    "**/__pycache__/**",
    "**/node_modules/**",
];

/// Glob patterns for resolved paths that must not be pulled into the bundle.
pub struct IgnorePatterns {
    patterns: Vec<Pattern>,
}

impl IgnorePatterns {
    pub fn new(patterns: Option<Vec<String>>) -> Self {
        let patterns_to_use = patterns.unwrap_or_else(|| {
            DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        let compiled_patterns = patterns_to_use
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid ignore pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        debug!("Using ignore patterns: {:?}", patterns_to_use);

        IgnorePatterns {
            patterns: compiled_patterns,
        }
    }

    pub fn none() -> Self {
        IgnorePatterns {
            patterns: Vec::new(),
        }
    }

    pub fn should_ignore<P: AsRef<Path>>(&self, path: P) -> bool {
        let path_str = slash_path(path.as_ref());
        self.patterns.iter().any(|pattern| pattern.matches(&path_str))
    }
}
