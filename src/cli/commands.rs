//! Command handlers for Almanac Fetcher CLI
//!
//! This module resolves invocation options into an immutable plan, then
//! drives the three-stage update pipeline, emitting the user-facing
//! messages between stage transitions. Cache maintenance handlers live
//! here too.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use crate::app::cache::{default_root, CacheDir};
use crate::app::fetcher::{ArtifactFetcher, HttpFetcher};
use crate::app::pipeline::{UpdateOutcome, UpdatePipeline, UpdatePlan};
use crate::cli::args::{CacheAction, CacheArgs, GlobalArgs, UpdateArgs};
use crate::cli::startup::running_under_ci;
use crate::config::AppConfig;
use crate::constants::repo;
use crate::errors::{AppError, ConfigError, Result};

/// Handle the update command
///
/// Resolves configuration once, builds the HTTP fetcher, and runs the
/// pipeline to completion or the first stage failure.
pub async fn handle_update(global: &GlobalArgs, args: UpdateArgs) -> Result<()> {
    let config = AppConfig::load(global.config.clone()).await?;
    let plan = resolve_plan(global, &args, &config)?;
    let fetcher = HttpFetcher::with_config(config.fetch.to_fetcher_config());

    run_update(plan, &fetcher).await.map(|_| ())
}

/// Resolve defaults, config file, environment, and flags into an update
/// plan. Runs exactly once, before the pipeline starts; nothing queries
/// ambient state afterwards.
pub fn resolve_plan(
    global: &GlobalArgs,
    args: &UpdateArgs,
    config: &AppConfig,
) -> Result<UpdatePlan> {
    let descriptor = args
        .artifact
        .clone()
        .or_else(|| config.artifact.descriptor.clone())
        .unwrap_or_else(|| repo::DEFAULT_ARTIFACT.to_string());
    let artifact = descriptor.parse().map_err(AppError::Config)?;

    let repository_raw = args
        .repository
        .clone()
        .or_else(|| config.artifact.repository.clone())
        .unwrap_or_else(|| repo::DEFAULT_REPOSITORY.to_string());
    let repository = Url::parse(&repository_raw).map_err(|source| {
        AppError::Config(ConfigError::InvalidRepository {
            url: repository_raw.clone(),
            source,
        })
    })?;

    let cache_dir = resolve_cache_root(global, config)?;
    let ignore_ssl = args.ignore_ssl || config.fetch.ignore_ssl;
    let show_progress = args.progress.unwrap_or_else(|| !running_under_ci());

    let plan = UpdatePlan {
        artifact,
        cache_dir,
        repository,
        ignore_ssl,
        show_progress,
    };
    debug!(
        "resolved plan: artifact {}, cache {}, repository {}",
        plan.artifact,
        plan.cache_dir.display(),
        plan.repository
    );
    Ok(plan)
}

/// Run the three-stage pipeline against the given fetch capability.
///
/// Stages run strictly in order; the first failure is returned with its
/// stage-specific error and no later stage executes.
pub async fn run_update<F: ArtifactFetcher>(
    plan: UpdatePlan,
    fetcher: &F,
) -> Result<UpdateOutcome> {
    info!(
        "updating {} in {}",
        plan.artifact,
        plan.cache_dir.display()
    );
    let pipeline = UpdatePipeline::new(plan);

    let cache = pipeline
        .ensure_directory()
        .await
        .map_err(AppError::Directory)?;

    let report = pipeline
        .check_presence(&cache)
        .await
        .map_err(AppError::Access)?;

    if report.missing {
        println!(
            "⬇️  Looks like you need the latest {} build. Let me download it for you...",
            pipeline.plan().artifact.name
        );
    } else {
        println!("✅ {} is up to date", pipeline.plan().artifact.name);
    }

    match pipeline
        .fetch_if_missing(&cache, &report, fetcher)
        .await
        .map_err(AppError::Fetch)?
    {
        Some(path) => {
            println!("✅ Downloaded to {}", path.display());
            Ok(UpdateOutcome::Downloaded { path })
        }
        None => Ok(UpdateOutcome::UpToDate { path: report.path }),
    }
}

/// Handle cache maintenance commands
pub async fn handle_cache(global: &GlobalArgs, args: CacheArgs) -> Result<()> {
    let config = AppConfig::load(global.config.clone()).await?;
    let root = resolve_cache_root(global, &config)?;

    match args.action {
        CacheAction::Info => handle_cache_info(&root).await,
        CacheAction::Clear => handle_cache_clear(&root).await,
    }
}

/// Handle cache info display
async fn handle_cache_info(root: &Path) -> Result<()> {
    let cache = CacheDir::ensure(root).await.map_err(AppError::Directory)?;
    let stats = cache.stats().await?;

    println!("💾 Cache Information");
    println!("===================");
    println!("Location: {}", cache.root().display());
    println!("Cached artifacts: {}", stats.file_count);
    println!(
        "Cache size: {:.1} MB",
        stats.total_size as f64 / (1024.0 * 1024.0)
    );

    Ok(())
}

/// Handle cache cleanup
async fn handle_cache_clear(root: &Path) -> Result<()> {
    let cache = CacheDir::ensure(root).await.map_err(AppError::Directory)?;
    let removed = cache.clear_artifacts().await?;

    if removed == 0 {
        println!("Cache is already empty.");
    } else {
        println!("🗑️  Removed {} cached artifact file(s)", removed);
    }

    Ok(())
}

/// Cache directory from flags, then config file, then the platform default
fn resolve_cache_root(global: &GlobalArgs, config: &AppConfig) -> Result<PathBuf> {
    if let Some(dir) = &global.cache_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = &config.cache.dir {
        return Ok(dir.clone());
    }
    default_root().map_err(AppError::Directory)
}
