//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, RunOverrides};
use contracts::SyncBlueprint;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let blueprint = resolve_blueprint(args)?;

    info!(
        attitude = %blueprint.inputs.attitude.display(),
        frame_times = %blueprint.inputs.frame_times.display(),
        method = %blueprint.resample.method,
        unwrap_angles = blueprint.resample.unwrap_angles,
        sinks = blueprint.sinks.len(),
        "Configuration resolved"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let stats = Pipeline::new(PipelineConfig { blueprint })
        .run()
        .await
        .context("Pipeline execution failed")?;

    info!(
        retained = stats.summary.retained,
        dropped_before = stats.summary.dropped_before,
        dropped_after = stats.summary.dropped_after,
        duration_secs = stats.duration.as_secs_f64(),
        "Pipeline completed"
    );
    stats.print_summary();

    let failed: Vec<String> = stats
        .failed_sinks()
        .map(|s| format!("{} ({})", s.name, s.errors.join("; ")))
        .collect();
    if !failed.is_empty() {
        return Err(CliError::SinkFailures {
            count: failed.len(),
            details: failed.join(", "),
        }
        .into());
    }

    Ok(())
}

/// Config file (if any) + command-line overrides
fn resolve_blueprint(args: &RunArgs) -> Result<SyncBlueprint> {
    let overrides = RunOverrides {
        attitude: args.attitude.clone(),
        frame_times: args.frame_times.clone(),
        output: args.output.clone(),
        method: args.method.map(Into::into),
        unwrap_angles: args.unwrap_angles,
        plot_dir: args.plot.clone(),
        echo: args.echo,
    };

    match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            let blueprint = ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            overrides
                .apply(blueprint)
                .context("Invalid command-line overrides")
        }
        None => overrides
            .into_blueprint()
            .context("Either --config or both --attitude and --frame-times are required"),
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &SyncBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Inputs:");
    println!("  Attitude: {}", blueprint.inputs.attitude.display());
    println!("  Frame times: {}", blueprint.inputs.frame_times.display());
    println!("\nResample:");
    println!("  Method: {}", blueprint.resample.method);
    println!("  Unwrap angles: {}", blueprint.resample.unwrap_angles);

    println!("\nSinks ({}):", blueprint.sinks.len());
    for sink in &blueprint.sinks {
        let mut params: Vec<_> = sink.params.iter().collect();
        params.sort();
        let params = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  - {} ({:?}) {}", sink.name, sink.sink_type, params);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{InterpolationMethod, SinkType};
    use std::path::PathBuf;

    fn args() -> RunArgs {
        RunArgs {
            config: None,
            attitude: Some("pass.att".into()),
            frame_times: Some("pass.time".into()),
            output: None,
            method: None,
            unwrap_angles: false,
            plot: None,
            echo: false,
            dry_run: true,
        }
    }

    #[test]
    fn test_resolve_without_config() {
        let bp = resolve_blueprint(&args()).unwrap();
        assert_eq!(bp.inputs.attitude, PathBuf::from("pass.att"));
        assert_eq!(bp.resample.method, InterpolationMethod::Cubic);
        assert_eq!(bp.sinks.len(), 1);
        assert_eq!(bp.sinks[0].sink_type, SinkType::Tsv);
    }

    #[test]
    fn test_resolve_requires_inputs() {
        let mut args = args();
        args.frame_times = None;
        assert!(resolve_blueprint(&args).is_err());
    }

    #[test]
    fn test_resolve_config_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            r#"
[inputs]
attitude = "a.att"
frame_times = "a.time"

[resample]
method = "linear"
"#,
        )
        .unwrap();

        let mut args = args();
        args.config = Some(config);
        args.attitude = None;
        args.frame_times = None;
        args.method = Some(crate::cli::MethodArg::Nearest);

        let bp = resolve_blueprint(&args).unwrap();
        assert_eq!(bp.inputs.attitude, PathBuf::from("a.att"));
        assert_eq!(bp.resample.method, InterpolationMethod::Nearest);
    }

    #[test]
    fn test_missing_config_file() {
        let mut args = args();
        args.config = Some("does-not-exist.toml".into());
        let err = resolve_blueprint(&args).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
