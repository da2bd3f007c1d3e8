use std::{
    fs,
    path::{Path, PathBuf},
    process,
    str::FromStr,
};

use clap::{Parser, ValueEnum};
use log::{debug, error, info, warn, LevelFilter};

use clinmap::config::{load_config, AppConfig};
use clinmap::editor::{parse_script, Action, Editor, MemoryHost};
use clinmap::page::{ComparisonPage, PAGE_TITLE};
use clinmap::reference::{ReferenceImage, ReferencePanel};
use clinmap::{render_comparison, MemoryGraph, Snapshot, Variant};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The comparison SVG of one variant
    Svg,
    /// The full comparison page
    Html,
    /// The snapshot as JSON
    Json,
}

/// Render clinical decision maps for side-by-side comparison
#[derive(Debug, Parser)]
#[command(name = "clinmap", version, about)]
struct Args {
    /// Snapshot JSON to render directly
    #[arg(long, conflicts_with = "script")]
    snapshot: Option<PathBuf>,

    /// Action script to apply to the template diagram
    #[arg(long)]
    script: Option<PathBuf>,

    /// Which rendering to produce (learner or reference)
    #[arg(long, default_value = "learner", value_parser = Variant::from_str)]
    variant: Variant,

    /// Reference image, overrides the configured one
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting clinmap");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = run(&args) {
        error!("Failed: {err}");
        process::exit(1);
    }

    info!("Completed successfully");
}

fn run(args: &Args) -> clinmap::Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(path) = &args.reference {
        config.reference = Some(ReferenceImage::new(path));
    }

    let output = match &args.snapshot {
        Some(path) => render_snapshot_file(path, args, &config)?,
        None => run_editor(args, &config)?,
    };

    fs::write(&args.output, output)?;
    info!(output_file = args.output.display().to_string(); "Exported");
    Ok(())
}

fn render_snapshot_file(
    path: &Path,
    args: &Args,
    config: &AppConfig,
) -> clinmap::Result<String> {
    info!(input_path = path.display().to_string(); "Rendering snapshot");
    let snapshot = Snapshot::from_json(&fs::read_to_string(path)?)?;

    Ok(match args.format {
        Format::Svg => render_comparison(&snapshot, args.variant, &config.canvas),
        Format::Json => snapshot.to_json()?,
        Format::Html => {
            let panel = match &config.reference {
                Some(reference) => reference.load(),
                None => ReferencePanel::Unavailable {
                    reason: "no reference image configured".to_string(),
                },
            };
            let page = ComparisonPage {
                title: PAGE_TITLE.to_string(),
                learner: render_comparison(&snapshot, Variant::Learner, &config.canvas),
                reference: panel.to_html(),
                messages: String::new(),
            };
            page.to_html()
        }
    })
}

fn run_editor(args: &Args, config: &AppConfig) -> clinmap::Result<String> {
    let actions = match &args.script {
        Some(path) => {
            info!(input_path = path.display().to_string(); "Loading action script");
            parse_script(&fs::read_to_string(path)?)?
        }
        None => Vec::new(),
    };

    let host = MemoryHost::full(config.editor.container_width, config.editor.container_height);
    let mut editor = Editor::initialize(Some(MemoryGraph::new()), host, config)?;
    editor.settle();

    let mut failed = 0;
    for action in actions {
        if editor.perform(action).is_err() {
            failed += 1;
        }
        editor.settle();
    }
    if failed > 0 {
        warn!(failed = failed; "Some actions failed");
    }

    Ok(match args.format {
        Format::Svg => render_comparison(editor.snapshot(), args.variant, &config.canvas),
        Format::Json => editor.snapshot().to_json()?,
        Format::Html => {
            editor.perform(Action::ShowComparison)?;
            ComparisonPage::from_host(editor.host()).to_html()
        }
    })
}
