//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{AttitudeSeries, AttitudeSource, FrameSeries, FrameTimeSource, InterpolationMethod};
use ingestion::{AttXmlReader, TimeXmlReader};
use observability::{SeriesStats, StatsSummary};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Input info for JSON output
#[derive(Serialize)]
struct InputInfo {
    attitude: SeriesInfo,
    /// Interpolation methods with enough samples
    supported_methods: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frames: Option<SeriesInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlap: Option<OverlapInfo>,
}

#[derive(Serialize)]
struct SeriesInfo {
    path: String,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval: Option<IntervalInfo>,
}

#[derive(Serialize)]
struct IntervalInfo {
    min: f64,
    max: f64,
    mean: f64,
    std_dev: f64,
}

impl IntervalInfo {
    fn from_summary(summary: &StatsSummary) -> Option<Self> {
        (summary.count > 0).then(|| Self {
            min: summary.min,
            max: summary.max,
            mean: summary.mean,
            std_dev: summary.std_dev,
        })
    }
}

#[derive(Serialize)]
struct OverlapInfo {
    retained: usize,
    dropped_before: usize,
    dropped_after: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(attitude = %args.attitude.display(), "Loading input info");

    if !args.attitude.exists() {
        return Err(CliError::input_not_found(args.attitude.display().to_string()).into());
    }
    let attitude = AttXmlReader::new()
        .read(&args.attitude)
        .with_context(|| format!("Failed to read attitude from {}", args.attitude.display()))?;

    let frames = match &args.frame_times {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::input_not_found(path.display().to_string()).into());
            }
            let frames = TimeXmlReader::new()
                .read(path)
                .with_context(|| format!("Failed to read frame times from {}", path.display()))?;
            Some((path.display().to_string(), frames))
        }
        None => None,
    };

    let input_info = build_input_info(
        &args.attitude.display().to_string(),
        &attitude,
        frames.as_ref().map(|(path, series)| (path.as_str(), series)),
    );

    if args.json {
        let json = serde_json::to_string_pretty(&input_info)
            .context("Failed to serialize input info")?;
        println!("{}", json);
    } else {
        print_input_info(&input_info);
    }

    Ok(())
}

fn series_info(path: &str, timestamps: &[f64]) -> SeriesInfo {
    let stats = SeriesStats::from_timestamps(timestamps);
    SeriesInfo {
        path: path.to_string(),
        count: stats.count,
        start: stats.first,
        end: stats.last,
        interval: IntervalInfo::from_summary(&stats.interval),
    }
}

fn build_input_info(
    attitude_path: &str,
    attitude: &AttitudeSeries,
    frames: Option<(&str, &FrameSeries)>,
) -> InputInfo {
    let supported_methods = [
        InterpolationMethod::Cubic,
        InterpolationMethod::Linear,
        InterpolationMethod::Nearest,
    ]
    .into_iter()
    .filter(|m| attitude.len() >= m.min_samples())
    .map(|m| m.to_string())
    .collect();

    let overlap = frames.and_then(|(_, series)| {
        let domain = attitude.time_domain()?;
        let filtered = sync_engine::filter_to_domain(series, domain);
        Some(OverlapInfo {
            retained: filtered.retained.len(),
            dropped_before: filtered.dropped_before,
            dropped_after: filtered.dropped_after,
        })
    });

    InputInfo {
        attitude: series_info(attitude_path, &attitude.timestamps()),
        supported_methods,
        frames: frames.map(|(path, series)| series_info(path, &series.timestamps())),
        overlap,
    }
}

fn print_series(label: &str, series: &SeriesInfo) {
    println!("{label}: {}", series.path);
    println!("  Samples: {}", series.count);
    if let (Some(start), Some(end)) = (series.start, series.end) {
        println!("  Span: [{start:.6}, {end:.6}] ({:.6}s)", end - start);
    }
    if let Some(ref interval) = series.interval {
        println!(
            "  Interval (s): min={:.6}, max={:.6}, mean={:.6}, std={:.6}",
            interval.min, interval.max, interval.mean, interval.std_dev
        );
    }
}

fn print_input_info(info: &InputInfo) {
    println!("\n=== Input Information ===\n");
    print_series("Attitude", &info.attitude);
    if info.supported_methods.is_empty() {
        println!("  Methods: none (no samples)");
    } else {
        println!("  Methods: {}", info.supported_methods.join(", "));
    }

    if let Some(ref frames) = info.frames {
        println!();
        print_series("Frame times", frames);
    }

    if let Some(ref overlap) = info.overlap {
        println!("\nOverlap:");
        println!("  Retained: {}", overlap.retained);
        println!("  Dropped before: {}", overlap.dropped_before);
        println!("  Dropped after: {}", overlap.dropped_after);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AttitudeSample, FrameTime};

    #[test]
    fn test_build_input_info() {
        let attitude = AttitudeSeries::new(vec![
            AttitudeSample::new(0.0, 0.0, 0.0, 0.0),
            AttitudeSample::new(1.0, 1.0, 1.0, 1.0),
            AttitudeSample::new(2.0, 2.0, 2.0, 2.0),
        ]);
        let frames = FrameSeries::new(vec![
            FrameTime::new(1, -1.0),
            FrameTime::new(2, 0.5),
            FrameTime::new(3, 2.0),
            FrameTime::new(4, 2.5),
        ]);

        let info = build_input_info("a.att", &attitude, Some(("a.time", &frames)));

        assert_eq!(info.attitude.count, 3);
        assert_eq!(info.supported_methods, vec!["linear", "nearest"]);
        let overlap = info.overlap.unwrap();
        assert_eq!(overlap.retained, 2);
        assert_eq!(overlap.dropped_before, 1);
        assert_eq!(overlap.dropped_after, 1);

        let interval = info.attitude.interval.unwrap();
        assert!((interval.mean - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_info_without_frames() {
        let attitude = AttitudeSeries::new(vec![AttitudeSample::new(5.0, 0.0, 0.0, 0.0)]);
        let info = build_input_info("a.att", &attitude, None);
        assert!(info.frames.is_none());
        assert!(info.overlap.is_none());
        assert!(info.attitude.interval.is_none());
    }
}
