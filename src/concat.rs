use crate::document::{assemble, OutputDocument, OutputFormat};
use crate::errors::ConcatError;
use crate::ignore::IgnorePatterns;
use crate::reporting::{count_tokens, load_tokenizer, print_stats};
use crate::resolver::ResolverConfig;
use crate::sink::OutputSink;
use crate::utils::parent_dir;
use crate::walker::DependencyWalker;
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Debug, Clone)]
pub struct ConcatConfig {
    pub root_file: PathBuf,
    /// Base for absolute-import probing; the root file's directory if unset.
    pub project_root: Option<PathBuf>,
    pub resolver: ResolverConfig,
    /// Replaces the default ignore patterns when set.
    pub ignore_patterns: Option<Vec<String>>,
    pub format: OutputFormat,
    pub model: String,
    pub no_stats: bool,
}

impl ConcatConfig {
    pub fn new(root_file: impl Into<PathBuf>) -> Self {
        ConcatConfig {
            root_file: root_file.into(),
            project_root: None,
            resolver: ResolverConfig::default(),
            ignore_patterns: None,
            format: OutputFormat::default(),
            model: "gpt-4o".to_string(),
            no_stats: false,
        }
    }

    pub fn effective_project_root(&self) -> PathBuf {
        self.project_root
            .clone()
            .unwrap_or_else(|| parent_dir(&self.root_file))
    }
}

#[derive(Debug)]
pub struct Bundle {
    pub document: OutputDocument,
    pub rendered: String,
}

/// Walks the root file's dependencies and renders them into one document.
/// Any unreadable file aborts the run before anything is rendered.
pub async fn bundle_dependencies(config: &ConcatConfig) -> Result<Bundle, ConcatError> {
    // Resolved up front so a bad model name fails before any file is read.
    let tokenizer = if config.no_stats {
        None
    } else {
        Some(load_tokenizer(&config.model)?)
    };

    let project_root = config.effective_project_root();
    let walker = DependencyWalker::new(
        config.resolver.clone(),
        IgnorePatterns::new(config.ignore_patterns.clone()),
    )?;

    let dependencies = walker.walk(&config.root_file, &project_root).await?;

    let mut files = Vec::with_capacity(dependencies.len() + 1);
    files.push(config.root_file.clone());
    files.extend(dependencies);
    debug!("Assembling {} files", files.len());

    let document = assemble(&files).await?;
    let rendered = document.render(config.format)?;
    trace!("Rendered document length: {}", rendered.len());

    if let Some(tokenizer) = &tokenizer {
        print_stats(&count_tokens(&document, tokenizer));
    }

    Ok(Bundle { document, rendered })
}

/// Bundles and delivers. A sink failure comes back as
/// `ConcatError::DeliveryError` still holding the rendered document.
pub async fn concat_to_sink(
    config: &ConcatConfig,
    sink: &dyn OutputSink,
) -> Result<Bundle, ConcatError> {
    let bundle = bundle_dependencies(config).await?;
    if let Err(e) = sink.deliver(&bundle.rendered).await {
        return Err(ConcatError::DeliveryError {
            source: Box::new(e),
            rendered: bundle.rendered,
        });
    }
    info!(
        "Delivered {} files from {}",
        bundle.document.documents.len(),
        config.root_file.display()
    );
    Ok(bundle)
}
