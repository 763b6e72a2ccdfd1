use anyhow::{Context, Result};
use clap::Parser;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use walkdir::WalkDir;

use std::path::PathBuf;

use imageconfig::{ImageConfig, Namespace, OsFs, Settings};

#[derive(Parser)]
#[command(name = "imageconfig-cli")]
#[command(about = "Print the dimensions and color model of images", long_about = None)]
#[command(version)]
struct Args {
    /// Image paths, relative to the working directory
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<String>,

    /// Working directory image paths are resolved against
    #[arg(short, long, value_name = "DIR")]
    working_dir: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Descend into directories
    #[arg(short, long, default_value_t)]
    recursive: bool,

    /// Print one JSON object per line
    #[arg(long, default_value_t)]
    json: bool,

    /// Verbose output
    #[arg(short, long, default_value_t)]
    verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, default_value_t)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose, args.quiet);

    let settings = load_settings(&args)?;
    if !settings.working_dir.is_dir() {
        anyhow::bail!(
            "Working directory does not exist: {}",
            settings.working_dir.display()
        );
    }

    let namespace = Namespace::from_settings(&settings);
    let paths = collect_paths(&args.paths, namespace.fs(), args.recursive)?;
    log::debug!("Looking up {} paths", paths.len());

    let mut results: Vec<_> = paths
        .into_par_iter()
        .map(|path| {
            let result = namespace.config(path.as_str());
            (path, result)
        })
        .collect();
    results.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut failures = 0;
    for (path, result) in &results {
        if result.is_err() {
            failures += 1;
        }
        println!("{}", render(path, result, args.json));
    }

    if !args.quiet {
        log::info!("Cache: {}", namespace.stats());
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} lookups failed", results.len());
    }

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => match Settings::default_path().filter(|path| path.exists()) {
            Some(path) => Settings::load(&path)?,
            None => Settings::default(),
        },
    };

    if let Some(dir) = &args.working_dir {
        settings.working_dir = dir.clone();
    }

    Ok(settings)
}

/// Expand directories into the files below them when `recursive` is set.
///
/// Returned paths stay relative to the working directory, sorted and
/// without duplicates.
fn collect_paths(inputs: &[String], fs: &OsFs, recursive: bool) -> Result<Vec<String>> {
    let mut paths = Vec::with_capacity(inputs.len());

    for input in inputs {
        let dir = match fs.resolve(input) {
            Ok(resolved) if recursive && resolved.is_dir() => resolved,
            // anything else is left for the lookup to report
            _ => {
                paths.push(input.clone());
                continue;
            }
        };

        for entry in WalkDir::new(&dir).follow_links(true) {
            let entry =
                entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(fs.working_dir())
                .context("Walked outside the working directory")?;
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            paths.push(relative);
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn render(path: &str, result: &imageconfig::Result<ImageConfig>, json: bool) -> String {
    match (result, json) {
        (Ok(config), false) => format!(
            "{path}: {}x{} {}",
            config.width, config.height, config.color_model
        ),
        (Err(e), false) => format!("{path}: error: {e}"),
        (Ok(config), true) => serde_json::json!({
            "path": path,
            "width": config.width,
            "height": config.height,
            "color_model": config.color_model,
        })
        .to_string(),
        (Err(e), true) => serde_json::json!({
            "path": path,
            "error": e.to_string(),
        })
        .to_string(),
    }
}
