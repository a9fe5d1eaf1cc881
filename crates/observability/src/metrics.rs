//! 同步指标收集模块
//!
//! 基于 SyncMeta 收集和统计一次重采样的运行指标。

use contracts::{SyncMeta, SyncedTable};
use metrics::{counter, gauge, histogram};

/// 从 SyncMeta 记录指标
///
/// 每次重采样完成后调用一次。
pub fn record_sync_metrics(meta: &SyncMeta) {
    counter!("att_syncer_runs_total", "method" => meta.method.to_string()).increment(1);

    gauge!("att_syncer_attitude_samples").set(meta.attitude_samples as f64);
    gauge!("att_syncer_frames_total").set(meta.total_frames as f64);
    gauge!("att_syncer_frames_retained").set(meta.retained as f64);

    // 插值域长度 (秒)
    histogram!("att_syncer_domain_seconds").record(meta.domain.duration());

    if meta.dropped_before > 0 {
        counter!("att_syncer_frames_dropped_total", "side" => "before")
            .increment(meta.dropped_before as u64);
    }
    if meta.dropped_after > 0 {
        counter!("att_syncer_frames_dropped_total", "side" => "after")
            .increment(meta.dropped_after as u64);
    }
}

/// 记录 sink 写出结果
pub fn record_sink_result(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "att_syncer_sink_runs_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// 一次运行的摘要
#[derive(Debug, Clone, Default)]
pub struct SyncMetricsSummary {
    pub method: String,
    pub attitude_samples: usize,
    pub total_frames: usize,
    pub retained: usize,
    pub dropped_before: usize,
    pub dropped_after: usize,
    /// 保留率 (%)
    pub retention_rate: f64,
    /// 保留帧的采样间隔 (秒)
    pub frame_interval: StatsSummary,
    pub roll: StatsSummary,
    pub pitch: StatsSummary,
    pub yaw: StatsSummary,
}

impl SyncMetricsSummary {
    pub fn from_table(table: &SyncedTable) -> Self {
        let meta = &table.meta;
        let mut roll = RunningStats::default();
        let mut pitch = RunningStats::default();
        let mut yaw = RunningStats::default();
        for r in &table.records {
            roll.push(r.roll);
            pitch.push(r.pitch);
            yaw.push(r.yaw);
        }
        let timestamps: Vec<f64> = table.records.iter().map(|r| r.timestamp).collect();

        Self {
            method: meta.method.to_string(),
            attitude_samples: meta.attitude_samples,
            total_frames: meta.total_frames,
            retained: meta.retained,
            dropped_before: meta.dropped_before,
            dropped_after: meta.dropped_after,
            retention_rate: if meta.total_frames > 0 {
                meta.retained as f64 / meta.total_frames as f64 * 100.0
            } else {
                0.0
            },
            frame_interval: SeriesStats::from_timestamps(&timestamps).interval,
            roll: StatsSummary::from(&roll),
            pitch: StatsSummary::from(&pitch),
            yaw: StatsSummary::from(&yaw),
        }
    }
}

impl std::fmt::Display for SyncMetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Sync Summary ===")?;
        writeln!(f, "Method: {}", self.method)?;
        writeln!(f, "Attitude samples: {}", self.attitude_samples)?;
        writeln!(
            f,
            "Frames retained: {}/{} ({:.2}%)",
            self.retained, self.total_frames, self.retention_rate
        )?;
        writeln!(
            f,
            "Frames dropped: {} before, {} after",
            self.dropped_before, self.dropped_after
        )?;
        writeln!(f, "Frame interval (s): {}", self.frame_interval)?;
        writeln!(f, "Roll: {}", self.roll)?;
        writeln!(f, "Pitch: {}", self.pitch)?;
        writeln!(f, "Yaw: {}", self.yaw)?;
        Ok(())
    }
}

/// 时间序列概况：跨度 + 相邻采样间隔统计
#[derive(Debug, Clone, Default)]
pub struct SeriesStats {
    pub count: usize,
    pub first: Option<f64>,
    pub last: Option<f64>,
    pub interval: StatsSummary,
}

impl SeriesStats {
    pub fn from_timestamps(timestamps: &[f64]) -> Self {
        let mut interval = RunningStats::default();
        for w in timestamps.windows(2) {
            interval.push(w[1] - w[0]);
        }
        Self {
            count: timestamps.len(),
            first: timestamps.first().copied(),
            last: timestamps.last().copied(),
            interval: StatsSummary::from(&interval),
        }
    }

    /// 时间跨度 (秒)
    pub fn span(&self) -> Option<f64> {
        Some(self.last? - self.first?)
    }
}

impl std::fmt::Display for SeriesStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.first, self.last) {
            (Some(first), Some(last)) => write!(
                f,
                "n={}, [{:.6}, {:.6}], interval: {}",
                self.count, first, last, self.interval
            ),
            _ => write!(f, "n=0"),
        }
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
