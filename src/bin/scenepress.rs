use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use scenepress::{ExportConfig, ExportFormat, GenerationMode, LocalResolver, Scene};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scenepress", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a project into a PDF, ZIP or PNG artifact.
    Export(ExportArgs),
    /// Print the layout plan of an export as JSON without assembling it.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct ProjectArgs {
    /// Input project JSON (`title`, `mode`, `scenes`, `config`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Override the project's export format.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Bake narrative text into the images.
    #[arg(long, default_value_t = false)]
    with_text: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Skip system fonts (text renders only with configured font files).
    #[arg(long, default_value_t = false)]
    no_system_fonts: bool,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Outline panels and margins on raster outputs.
    #[arg(long, default_value_t = false)]
    debug_guides: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Pretty-print the plan.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Document,
    Bundle,
    Raster,
}

impl From<FormatArg> for ExportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Document => ExportFormat::Document,
            FormatArg::Bundle => ExportFormat::Bundle,
            FormatArg::Raster => ExportFormat::CompositeRaster,
        }
    }
}

#[derive(serde::Deserialize, Debug)]
struct Project {
    #[serde(default)]
    title: String,
    #[serde(default)]
    mode: GenerationMode,
    scenes: Vec<Scene>,
    #[serde(default)]
    config: Option<ExportConfig>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let (project, mut config) = load_project(&args.project)?;
    config.options.debug_guides |= args.debug_guides;
    let resolver = LocalResolver::new(assets_root(&args.project.in_path));

    let artifact = scenepress::export(
        &project.scenes,
        &config,
        &project.title,
        project.mode,
        &resolver,
    )?;
    let Some(artifact) = artifact else {
        eprintln!("no scenes with images, nothing written");
        return Ok(());
    };
    if artifact.is_empty() {
        anyhow::bail!("export of '{}' produced no content", artifact.file_name);
    }

    let path = artifact.write_to_dir(&args.out)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (project, config) = load_project(&args.project)?;
    let resolver = LocalResolver::new(assets_root(&args.project.in_path));

    let Some(plan) = scenepress::plan_export(
        &project.scenes,
        &config,
        &project.title,
        project.mode,
        &resolver,
    )?
    else {
        eprintln!("no scenes with images, nothing to plan");
        return Ok(());
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&plan)
    } else {
        serde_json::to_string(&plan)
    }
    .context("serialize plan")?;
    println!("{json}");
    eprintln!("fingerprint {:016x}", plan.fingerprint()?);
    Ok(())
}

fn load_project(args: &ProjectArgs) -> anyhow::Result<(Project, ExportConfig)> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read project '{}'", args.in_path.display()))?;
    let mut project: Project = serde_json::from_str(&text)
        .with_context(|| format!("parse project '{}'", args.in_path.display()))?;

    let mut config = project
        .config
        .take()
        .unwrap_or_else(|| ExportConfig::new(ExportFormat::CompositeRaster, false));
    if let Some(format) = args.format {
        config.format = format.into();
    }
    config.with_text |= args.with_text;
    if args.threads.is_some() {
        config.options.threading.threads = args.threads;
    }
    if args.no_system_fonts {
        config.options.fonts.load_system_fonts = false;
    }
    Ok((project, config))
}

fn assets_root(in_path: &Path) -> &Path {
    in_path.parent().unwrap_or_else(|| Path::new("."))
}
