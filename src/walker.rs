use crate::errors::ConcatError;
use crate::ignore::IgnorePatterns;
use crate::resolver::{PathResolver, ResolverConfig};
use crate::scanner::DependencyScanner;
use crate::utils::{normalize_path, parent_dir, read_file_content};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{debug, info, trace};

/// Follows scanner + resolver results from a root file until no new files
/// turn up.
pub struct DependencyWalker {
    scanner: DependencyScanner,
    resolver: PathResolver,
    ignore: IgnorePatterns,
}

impl DependencyWalker {
    pub fn new(config: ResolverConfig, ignore: IgnorePatterns) -> Result<Self, ConcatError> {
        if config.primary_extension.trim_start_matches('.').is_empty() {
            return Err(ConcatError::ConfigError(
                "primary extension must not be empty".to_string(),
            ));
        }
        let scanner = DependencyScanner::new(&config.secondary_extensions)?;
        Ok(DependencyWalker {
            scanner,
            resolver: PathResolver::new(config),
            ignore,
        })
    }

    /// Returns every file reachable from `root_file`, excluding the root, in
    /// depth-first discovery order. Files are identified by their canonical
    /// path, so one file reached through different relative spellings is
    /// read and scanned once; the returned paths keep the spelling that
    /// first reached it.
    pub async fn walk(
        &self,
        root_file: &Path,
        project_root: &Path,
    ) -> Result<Vec<PathBuf>, ConcatError> {
        let root = normalize_path(root_file);
        debug!("Walking dependencies of {:?} (project root {:?})", root, project_root);

        let mut visited: HashSet<PathBuf> = HashSet::from([file_identity(&root).await?]);
        let mut resolved: Vec<PathBuf> = Vec::new();

        // The root is scanned whatever its extension.
        let root_deps = self
            .direct_dependencies(&root, project_root, ScanScope::Full)
            .await?;
        let mut stack = vec![root_deps.into_iter()];

        while let Some(frame) = stack.last_mut() {
            let Some(dep) = frame.next() else {
                stack.pop();
                continue;
            };
            if self.ignore.should_ignore(&dep) {
                debug!("Ignoring dependency {:?}", dep);
                continue;
            }
            if !visited.insert(file_identity(&dep).await?) {
                trace!("Already visited {:?}", dep);
                continue;
            }

            resolved.push(dep.clone());

            if let Some(scope) = self.scan_scope(&dep) {
                let deps = self.direct_dependencies(&dep, project_root, scope).await?;
                stack.push(deps.into_iter());
            }
        }

        info!("Resolved {} dependencies for {}", resolved.len(), root.display());
        Ok(resolved)
    }

    /// Reads `file` and resolves the candidates found in it.
    async fn direct_dependencies(
        &self,
        file: &Path,
        project_root: &Path,
        scope: ScanScope,
    ) -> Result<Vec<PathBuf>, ConcatError> {
        let content = read_file_content(file).await?;
        let scanning_dir = parent_dir(file);

        let candidates = match scope {
            ScanScope::Full => self.scanner.scan(&content),
            ScanScope::SecondaryOnly => self.scanner.scan_secondary_references(&content),
        };

        let mut seen = HashSet::new();
        let deps: Vec<PathBuf> = candidates
            .iter()
            .filter_map(|candidate| self.resolver.resolve(candidate, &scanning_dir, project_root))
            .filter(|path| seen.insert(path.clone()))
            .collect();

        debug!("{} -> {:?}", file.display(), deps);
        Ok(deps)
    }

    /// Source files get a full scan; secondary files only follow their
    /// quoted references to other secondary files.
    fn scan_scope(&self, path: &Path) -> Option<ScanScope> {
        let config = self.resolver.config();
        let ext = path.extension()?.to_str()?;
        if ext == config.primary_extension.trim_start_matches('.') {
            Some(ScanScope::Full)
        } else if config
            .secondary_extensions
            .iter()
            .any(|secondary| secondary.trim_start_matches('.') == ext)
        {
            Some(ScanScope::SecondaryOnly)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanScope {
    Full,
    SecondaryOnly,
}

/// Canonical path used as the visited key.
async fn file_identity(path: &Path) -> Result<PathBuf, ConcatError> {
    async_fs::canonicalize(path)
        .await
        .map_err(|err| ConcatError::file_read(path, err))
}
