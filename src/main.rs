use clap::Parser;
use depconcat::concat::{concat_to_sink, ConcatConfig};
use depconcat::document::OutputFormat;
use depconcat::logger::initialize_logger;
use depconcat::resolver::ResolverConfig;
use depconcat::sink::{ClipboardSink, OutputSink, StdoutSink};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[arg(required = true, help = "The main script to bundle")]
    file: PathBuf,
    #[arg(
        long,
        env = "DEPCONCAT_PROJECT_ROOT",
        help = "Root directory of the project (defaults to the directory containing FILE)"
    )]
    project_root: Option<PathBuf>,
    #[arg(long, help = "Do not probe the project root when resolving absolute imports")]
    no_project_root_probing: bool,
    #[arg(long, default_value = "py")]
    primary_ext: String,
    #[arg(long = "secondary-ext", default_value = "yaml")]
    secondary_ext: Vec<String>,
    #[arg(long, default_value = "__init__")]
    package_marker: String,
    #[arg(long = "ignore", help = "Patterns to ignore (e.g., '**/.venv/**', 'tests/**')")]
    ignore_patterns: Option<Vec<String>>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,
    #[arg(long, help = "Write the document to stdout instead of the clipboard")]
    stdout: bool,
    #[arg(short = 's', long)]
    no_stats: bool,
    #[arg(short = 'M', long, default_value = "gpt-4o")]
    model: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    initialize_logger();

    let config = ConcatConfig {
        root_file: args.file,
        project_root: args.project_root,
        resolver: ResolverConfig {
            primary_extension: args.primary_ext.trim_start_matches('.').to_owned(),
            secondary_extensions: args.secondary_ext,
            package_marker: args.package_marker,
            project_root_probing: !args.no_project_root_probing,
        },
        ignore_patterns: args.ignore_patterns,
        format: args.format,
        model: args.model,
        no_stats: args.no_stats,
    };

    let sink: Box<dyn OutputSink> = if args.stdout {
        Box::new(StdoutSink)
    } else {
        Box::new(ClipboardSink)
    };

    match concat_to_sink(&config, sink.as_ref()).await {
        Ok(_) => {
            if let Some(message) = sink.confirmation() {
                println!("{}", message);
            }
            ExitCode::SUCCESS
        }
        Err(e) if e.is_sink_error() => {
            error!("{}", e);
            // The document is still good; hand it over on stdout unless
            // stdout itself was the sink that failed.
            if let (Some(document), false) = (e.undelivered_document(), args.stdout) {
                print!("{}", document);
            }
            ExitCode::from(2)
        }
        Err(e) => {
            error!("Failed to bundle {}: {}", config.root_file.display(), e);
            ExitCode::from(1)
        }
    }
}
