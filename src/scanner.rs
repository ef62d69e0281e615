use crate::errors::ConcatError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, trace};

static IMPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bimport\s+([\w.]+(?:\s+as\s+\w+)?(?:[ \t]*,[ \t]*[\w.]+(?:\s+as\s+\w+)?)*)")
        .expect("import pattern is valid")
});

static FROM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfrom\s+(\.*)([\w.]*)\s+import\b").expect("from-import pattern is valid")
});

/// A raw reference pulled out of source text that may name another file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyCandidate {
    /// Absolute dotted module name, e.g. `pkg.helpers`.
    Module { name: String },
    /// Relative import: `dots` leading dots followed by an optional dotted
    /// module path (empty for `from . import x`).
    Relative { dots: usize, module: String },
    /// Quoted literal path ending in a secondary extension.
    Secondary { path: String },
}

/// Text-pattern scanner for import statements and secondary file references.
///
/// Matching is purely lexical, so statements inside comments or string
/// literals are picked up as well.
pub struct DependencyScanner {
    secondary_regex: Option<Regex>,
}

impl DependencyScanner {
    pub fn new(secondary_extensions: &[String]) -> Result<Self, ConcatError> {
        let extensions: Vec<String> = secondary_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(regex::escape)
            .collect();

        let secondary_regex = if extensions.is_empty() {
            None
        } else {
            let pattern = format!(r#"['"]([^'"\r\n]+\.(?:{}))['"]"#, extensions.join("|"));
            debug!("Secondary reference pattern: {}", pattern);
            Some(Regex::new(&pattern)?)
        };

        Ok(DependencyScanner { secondary_regex })
    }

    /// Extracts candidates in order of first appearance, without duplicates.
    pub fn scan(&self, content: &str) -> Vec<DependencyCandidate> {
        let mut found: Vec<(usize, DependencyCandidate)> = Vec::new();

        for caps in IMPORT_REGEX.captures_iter(content) {
            let Some(names) = caps.get(1) else { continue };
            for part in names.as_str().split(',') {
                let name = part
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .trim_end_matches('.');
                if name.is_empty() || name.starts_with('.') {
                    continue;
                }
                found.push((
                    names.start(),
                    DependencyCandidate::Module {
                        name: name.to_string(),
                    },
                ));
            }
        }

        for caps in FROM_REGEX.captures_iter(content) {
            let start = caps.get(0).map_or(0, |m| m.start());
            let dots = caps.get(1).map_or(0, |m| m.as_str().len());
            let module = caps
                .get(2)
                .map_or("", |m| m.as_str())
                .trim_matches('.')
                .to_string();

            let candidate = if dots > 0 {
                DependencyCandidate::Relative { dots, module }
            } else if module.is_empty() {
                continue;
            } else {
                DependencyCandidate::Module { name: module }
            };
            found.push((start, candidate));
        }

        if let Some(regex) = &self.secondary_regex {
            for caps in regex.captures_iter(content) {
                if let Some(path) = caps.get(1) {
                    found.push((
                        path.start(),
                        DependencyCandidate::Secondary {
                            path: path.as_str().to_string(),
                        },
                    ));
                }
            }
        }

        found.sort_by_key(|(offset, _)| *offset);

        let mut seen = HashSet::new();
        let candidates: Vec<DependencyCandidate> = found
            .into_iter()
            .map(|(_, candidate)| candidate)
            .filter(|candidate| seen.insert(candidate.clone()))
            .collect();

        trace!("Scanned {} candidates: {:?}", candidates.len(), candidates);
        candidates
    }

    /// Only the quoted secondary-file references, for non-source files such
    /// as YAML that include one another.
    pub fn scan_secondary_references(&self, content: &str) -> Vec<DependencyCandidate> {
        self.scan(content)
            .into_iter()
            .filter(|candidate| matches!(candidate, DependencyCandidate::Secondary { .. }))
            .collect()
    }
}
