use crate::scanner::DependencyCandidate;
use crate::utils::{ascend, normalize_path};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Extension of files scanned for imports, without the dot.
    pub primary_extension: String,
    /// Extensions picked up from quoted path literals.
    pub secondary_extensions: Vec<String>,
    /// File stem that marks a directory as a package.
    pub package_marker: String,
    /// Also probe relative to the project root for absolute imports.
    pub project_root_probing: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            primary_extension: "py".to_string(),
            secondary_extensions: vec!["yaml".to_string()],
            package_marker: "__init__".to_string(),
            project_root_probing: true,
        }
    }
}

/// Maps candidates to existing files by probing a fixed, ordered list of
/// locations and taking the first hit.
pub struct PathResolver {
    config: ResolverConfig,
}

impl PathResolver {
    pub fn new(config: ResolverConfig) -> Self {
        PathResolver { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(
        &self,
        candidate: &DependencyCandidate,
        scanning_dir: &Path,
        project_root: &Path,
    ) -> Option<PathBuf> {
        let probes = self.probe_paths(candidate, scanning_dir, project_root);
        for probe in &probes {
            trace!("Probing {:?} for {:?}", probe, candidate);
            if probe.is_file() {
                return Some(normalize_path(probe));
            }
        }
        debug!("Dropping unresolved candidate {:?}", candidate);
        None
    }

    /// Locations tried for `candidate`, most preferred first.
    pub fn probe_paths(
        &self,
        candidate: &DependencyCandidate,
        scanning_dir: &Path,
        project_root: &Path,
    ) -> Vec<PathBuf> {
        match candidate {
            DependencyCandidate::Relative { dots, module } => {
                let mut base = ascend(scanning_dir, dots.saturating_sub(1));
                for segment in module.split('.').filter(|s| !s.is_empty()) {
                    base.push(segment);
                }
                self.module_variants(&base).to_vec()
            }
            DependencyCandidate::Module { name } => {
                let module_path: PathBuf = name.split('.').filter(|s| !s.is_empty()).collect();
                if module_path.as_os_str().is_empty() {
                    return Vec::new();
                }

                let mut probes = Vec::with_capacity(6);
                probes.extend(self.module_variants(&scanning_dir.join(&module_path)));
                if self.config.project_root_probing {
                    probes.extend(self.module_variants(&project_root.join(&module_path)));
                }
                probes.extend(
                    self.module_variants(&scanning_dir.join("..").join(&module_path)),
                );
                probes
            }
            DependencyCandidate::Secondary { path } => vec![scanning_dir.join(path)],
        }
    }

    /// `<base>.<ext>` then `<base>/<marker>.<ext>`.
    fn module_variants(&self, base: &Path) -> [PathBuf; 2] {
        let extension = self.config.primary_extension.trim_start_matches('.');
        let mut file: OsString = base.as_os_str().to_owned();
        file.push(".");
        file.push(extension);

        let package = base.join(format!("{}.{}", self.config.package_marker, extension));

        [PathBuf::from(file), package]
    }
}
