//! CLI binary for R4Mvc: generate strongly typed helpers for an MVC project.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use r4mvc_core::config::R4MvcConfig;
use r4mvc_core::model::{ControllerDescriptor, StaticFile, View};
use r4mvc_gen::synthesis::{VIEWS_CLASS_RESERVED, member_identifier, shadowed_members};
use r4mvc_locators::{
    RazorViewLocator, StaticFileLocator, ViewLocator, WebRootLocator, discover_static_files,
    discover_views,
};
use r4mvc_parser::{DefaultConvention, ProgramSnapshot, analyze, collect_sources};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "r4mvc", about = "Strongly typed helpers for ASP.NET MVC projects")]
struct Cli {
    /// Project file (.csproj) or directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the project and write the generated helpers
    Generate {
        /// Output file, relative to the project directory
        #[arg(short, long)]
        output: Option<String>,

        /// Namespace for the root and links classes
        #[arg(long)]
        namespace: Option<String>,

        /// Print the generated source instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the discovered controllers, views and static files as JSON
    Inspect {
        /// Print the synthesized declaration tree instead
        #[arg(long)]
        tree: bool,
    },
}

/// Everything discovered in one project.
struct Discovery {
    controllers: Vec<ControllerDescriptor>,
    views: Vec<View>,
    static_files: Vec<StaticFile>,
}

/// Resolve `--project` to the project directory. A `.csproj` path means its
/// parent directory.
fn get_project_dir(cli: &Cli) -> Result<PathBuf> {
    let path = match &cli.project {
        Some(p) => p.clone(),
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let dir = if path.is_file() {
        if path.extension().and_then(|e| e.to_str()) != Some("csproj") {
            anyhow::bail!("{} is not a .csproj file", path.display());
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    } else {
        path
    };
    if !dir.is_dir() {
        anyhow::bail!("project directory {} does not exist", dir.display());
    }
    Ok(dir)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_dir = get_project_dir(&cli)?;
    let mut config = R4MvcConfig::load(&project_dir)
        .with_context(|| format!("failed to load configuration for {}", project_dir.display()))?;

    match cli.command {
        Commands::Generate {
            output,
            namespace,
            dry_run,
        } => {
            if let Some(output) = output {
                config.generation.output_file = output;
            }
            if let Some(namespace) = namespace {
                config.generation.namespace = namespace;
            }
            config.validate()?;
            cmd_generate(&project_dir, &config, dry_run)
        }
        Commands::Inspect { tree } => cmd_inspect(&project_dir, &config, tree),
    }
}

fn discover(project_dir: &Path, config: &R4MvcConfig) -> Result<Discovery> {
    use indicatif::{ProgressBar, ProgressStyle};

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("invalid progress template")?,
    );
    spinner.set_message("Scanning sources...");

    let sources = collect_sources(
        project_dir,
        &config.analysis.exclude,
        &config.generation.output_file,
    )?;
    spinner.set_message(format!("Parsing {} files...", sources.len()));
    spinner.tick();
    let snapshot = ProgramSnapshot::from_sources(&sources)?;
    spinner.finish_and_clear();

    for diagnostic in snapshot.diagnostics() {
        tracing::warn!(
            "{}:{}: {}",
            diagnostic.file.display(),
            diagnostic.line,
            diagnostic.message
        );
    }

    let convention = DefaultConvention::new(&config.generation.controller_suffix);
    let controllers = analyze(&snapshot, &convention);
    for controller in &controllers {
        if !controller.is_partial {
            tracing::warn!(
                "{} is not declared partial; the generated members will not compile against it",
                controller.qualified_reference
            );
        }
        for member in shadowed_members(controller) {
            tracing::warn!(
                "{} has an action named {}; the generated members sharing it are left out",
                controller.qualified_reference,
                member
            );
        }
        for name in controller.overloaded_actions() {
            tracing::warn!(
                "{} has overloads of {}; one action name is generated",
                controller.qualified_reference,
                name
            );
        }
    }

    let view_locators: Vec<Box<dyn ViewLocator>> =
        vec![Box::new(RazorViewLocator::from_config(&config.locators))];
    let static_locators: Vec<Box<dyn StaticFileLocator>> =
        vec![Box::new(WebRootLocator::from_config(&config.locators))];
    let views = discover_views(project_dir, &view_locators);
    let static_files = discover_static_files(project_dir, &static_locators);

    report_unmatched_views(&controllers, &views);
    report_dropped_duplicates(&controllers, &views, &static_files, &config.generation.links_class);

    tracing::info!(
        "{} controllers, {} actions, {} views, {} static files",
        controllers.len(),
        controllers.iter().map(|c| c.actions.len()).sum::<usize>(),
        views.len(),
        static_files.len()
    );

    Ok(Discovery {
        controllers,
        views,
        static_files,
    })
}

fn report_unmatched_views(controllers: &[ControllerDescriptor], views: &[View]) {
    for view in views {
        if !controllers.iter().any(|c| c.owns_view(view)) {
            tracing::debug!("view {} matches no controller", view.relative_path);
        }
    }
}

/// Warn about members that collapse onto an identifier already used.
fn report_dropped_duplicates(
    controllers: &[ControllerDescriptor],
    views: &[View],
    static_files: &[StaticFile],
    links_class: &str,
) {
    for controller in controllers {
        let mut seen: Vec<String> = VIEWS_CLASS_RESERVED.iter().map(|r| (*r).to_string()).collect();
        for view in views.iter().filter(|v| controller.owns_view(v)) {
            let ident = member_identifier(&view.view_name);
            if seen.contains(&ident) {
                tracing::warn!(
                    "view {} dropped: {} already has a view or member named {}",
                    view.relative_path,
                    controller.name,
                    ident
                );
            } else {
                seen.push(ident);
            }
        }
    }

    let mut seen: Vec<String> = vec![links_class.to_string()];
    for file in static_files {
        let ident = member_identifier(&file.file_name);
        if seen.contains(&ident) {
            tracing::warn!(
                "static file {} dropped: field {} already exists",
                file.relative_path,
                ident
            );
        } else {
            seen.push(ident);
        }
    }
}

fn cmd_generate(project_dir: &Path, config: &R4MvcConfig, dry_run: bool) -> Result<()> {
    let discovery = discover(project_dir, config)?;
    let unit = r4mvc_gen::generate(
        &discovery.controllers,
        &discovery.views,
        &discovery.static_files,
        &config.generation,
    )?;
    let text = r4mvc_gen::render(&unit);

    if dry_run {
        print!("{text}");
        return Ok(());
    }

    let destination = r4mvc_gen::emit::output_path(project_dir, &config.generation);
    if r4mvc_gen::emit::write(&text, &destination)? {
        tracing::info!("wrote {}", destination.display());
    } else {
        tracing::info!("{} is up to date", destination.display());
    }
    Ok(())
}

fn cmd_inspect(project_dir: &Path, config: &R4MvcConfig, tree: bool) -> Result<()> {
    let discovery = discover(project_dir, config)?;
    let json = if tree {
        let unit = r4mvc_gen::generate(
            &discovery.controllers,
            &discovery.views,
            &discovery.static_files,
            &config.generation,
        )?;
        serde_json::to_string_pretty(&unit)?
    } else {
        serde_json::to_string_pretty(&serde_json::json!({
            "controllers": discovery.controllers,
            "views": discovery.views,
            "static_files": discovery.static_files,
        }))?
    };
    println!("{json}");
    Ok(())
}
