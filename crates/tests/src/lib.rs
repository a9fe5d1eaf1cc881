//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - e2e 测试：XML 文本 → readers → Resampler → Dispatcher sinks

#[cfg(test)]
mod contract_tests {
    use contracts::{InterpolationMethod, ResampleConfig, SinkType};

    #[test]
    fn test_contracts_defaults() {
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(ResampleConfig::default().method, InterpolationMethod::Cubic);
        assert_eq!(
            serde_json::to_string(&SinkType::Tsv).unwrap(),
            "\"tsv\"".to_string()
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;

    use config_loader::{ConfigLoader, ConfigFormat, RunOverrides};
    use contracts::{
        AttitudeSource, ContractError, FrameTimeSource, InterpolationMethod, ResampleConfig,
        SinkConfig, SinkType, SyncRun, SyncedTable,
    };
    use dispatcher::create_dispatcher;
    use ingestion::{parse_att_str, parse_time_str, AttXmlReader, TimeXmlReader};
    use sync_engine::Resampler;

    /// 线性真值：roll = 10t, pitch = 5t, yaw = -5t
    const ATT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Satellite>
  <AttitudeParameter>
    <AttData><UTC>0.0</UTC><Roll>0</Roll><Pitch>0</Pitch><Yaw>0</Yaw></AttData>
    <AttData><UTC>1.0</UTC><Roll>10</Roll><Pitch>5</Pitch><Yaw>-5</Yaw></AttData>
    <AttData><UTC>2.0</UTC><Roll>20</Roll><Pitch>10</Pitch><Yaw>-10</Yaw></AttData>
    <AttData><UTC>3.0</UTC><Roll>30</Roll><Pitch>15</Pitch><Yaw>-15</Yaw></AttData>
  </AttitudeParameter>
</Satellite>"#;

    const TIME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Camera>
  <TimeParams>
    <LineParam><FrameNum>1</FrameNum><UTC>-0.5</UTC></LineParam>
    <LineParam><FrameNum>2</FrameNum><UTC>0.0</UTC></LineParam>
    <LineParam><FrameNum>3</FrameNum><UTC>1.5</UTC></LineParam>
    <LineParam><FrameNum>4</FrameNum><UTC>3.0</UTC></LineParam>
    <LineParam><FrameNum>5</FrameNum><UTC>3.5</UTC></LineParam>
  </TimeParams>
</Camera>"#;

    fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let att = dir.join("pass.att");
        let time = dir.join("pass.time");
        std::fs::write(&att, ATT_XML).unwrap();
        std::fs::write(&time, TIME_XML).unwrap();
        (att, time)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{actual} != {expected}"
        );
    }

    /// 具体场景：帧 1、5 越界被丢弃，帧 2、3、4 保留
    #[test]
    fn test_concrete_scenario_all_methods() {
        let attitude = parse_att_str(ATT_XML, "pass.att").unwrap();
        let frames = parse_time_str(TIME_XML, "pass.time").unwrap();

        for method in [
            InterpolationMethod::Cubic,
            InterpolationMethod::Linear,
            InterpolationMethod::Nearest,
        ] {
            let table = Resampler::new(ResampleConfig::with_method(method))
                .synchronize(&attitude, &frames)
                .unwrap();

            assert_eq!(table.frame_indices(), vec![2, 3, 4], "{method}");
            assert_eq!(table.meta.dropped_before, 1);
            assert_eq!(table.meta.dropped_after, 1);

            // nearest 在 1.5 处取较早的节点 (t=1.0)
            let mid = if method == InterpolationMethod::Nearest {
                10.0
            } else {
                15.0
            };
            let rolls: Vec<f64> = table.records.iter().map(|r| r.roll).collect();
            assert_close(rolls[0], 0.0);
            assert_close(rolls[1], mid);
            assert_close(rolls[2], 30.0);
        }
    }

    #[test]
    fn test_cubic_matches_linear_ground_truth() {
        let attitude = parse_att_str(ATT_XML, "pass.att").unwrap();
        let frames = parse_time_str(TIME_XML, "pass.time").unwrap();
        let table = sync_engine::synchronize(&attitude, &frames).unwrap();

        for record in &table.records {
            let t = record.timestamp;
            assert_close(record.roll, 10.0 * t);
            assert_close(record.pitch, 5.0 * t);
            assert_close(record.yaw, -5.0 * t);
        }
    }

    /// XML → Resampler → tsv + json + log sinks
    #[tokio::test]
    async fn test_e2e_files_to_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let (att, time) = write_inputs(dir.path());
        let table_path = dir.path().join("att.txt");
        let json_path = dir.path().join("att.json");

        let attitude = AttXmlReader::new().read(&att).unwrap();
        let frames = TimeXmlReader::new().read(&time).unwrap();
        let table = Resampler::default().synchronize(&attitude, &frames).unwrap();

        let sinks = vec![
            SinkConfig::new("table", SinkType::Tsv)
                .with_param("path", table_path.display().to_string()),
            SinkConfig::new("json", SinkType::Json)
                .with_param("path", json_path.display().to_string()),
            SinkConfig::new("log", SinkType::Log),
        ];
        let report = create_dispatcher(sinks)
            .unwrap()
            .dispatch(SyncRun::new(attitude, table.clone()))
            .await;
        assert!(report.is_success(), "{:?}", report.outcomes);

        let text = std::fs::read_to_string(&table_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "FrameNum\tUTC\tRoll\tPitch\tYaw");
        let frame_nums: Vec<&str> = lines[1..]
            .iter()
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(frame_nums, vec!["2", "3", "4"]);

        let json: SyncedTable =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json, table);
    }

    /// 配置文件 + 命令行覆盖 → plot sink 输出三张图
    #[tokio::test]
    async fn test_e2e_config_with_plots() {
        let dir = tempfile::tempdir().unwrap();
        let (att, time) = write_inputs(dir.path());
        let plot_dir = dir.path().join("plots");
        let table_path = dir.path().join("out").join("att.txt");

        let toml = format!(
            r#"
[inputs]
attitude = "{}"
frame_times = "{}"

[resample]
method = "linear"

[[sinks]]
name = "table"
sink_type = "tsv"
params = {{ path = "{}" }}
"#,
            att.display(),
            time.display(),
            table_path.display()
        );
        let blueprint = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        let blueprint = RunOverrides {
            plot_dir: Some(plot_dir.clone()),
            ..Default::default()
        }
        .apply(blueprint)
        .unwrap();
        assert_eq!(blueprint.sinks.len(), 2);

        let attitude = AttXmlReader::new().read(&blueprint.inputs.attitude).unwrap();
        let frames = TimeXmlReader::new()
            .read(&blueprint.inputs.frame_times)
            .unwrap();
        let table = Resampler::new(blueprint.resample.clone())
            .synchronize(&attitude, &frames)
            .unwrap();
        observability::record_sync_metrics(&table.meta);

        let report = create_dispatcher(blueprint.sinks)
            .unwrap()
            .dispatch(SyncRun::new(attitude, table))
            .await;
        assert!(report.is_success(), "{:?}", report.outcomes);

        assert!(table_path.exists());
        for axis in ["roll", "pitch", "yaw"] {
            assert!(plot_dir.join(format!("{axis}.png")).exists(), "{axis}");
        }
    }

    /// 全部帧越界：成功，表格只有表头
    #[tokio::test]
    async fn test_e2e_empty_result_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let attitude = parse_att_str(ATT_XML, "pass.att").unwrap();
        let frames = parse_time_str(
            r#"<Root><TimeParams>
                <LineParam><FrameNum>1</FrameNum><UTC>10.0</UTC></LineParam>
                <LineParam><FrameNum>2</FrameNum><UTC>11.0</UTC></LineParam>
            </TimeParams></Root>"#,
            "late.time",
        )
        .unwrap();

        let table = Resampler::default().synchronize(&attitude, &frames).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.meta.dropped_after, 2);

        let table_path = dir.path().join("att.txt");
        let plot_dir = dir.path().join("plots");
        let sinks = vec![
            SinkConfig::new("table", SinkType::Tsv)
                .with_param("path", table_path.display().to_string()),
            SinkConfig::new("plots", SinkType::Plot)
                .with_param("dir", plot_dir.display().to_string()),
        ];
        let report = create_dispatcher(sinks)
            .unwrap()
            .dispatch(SyncRun::new(attitude, table))
            .await;
        assert!(report.is_success());

        let text = std::fs::read_to_string(&table_path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(!plot_dir.join("roll.png").exists());
    }

    /// 输入错误在任何 sink 之前终止
    #[test]
    fn test_fatal_input_errors() {
        let frames = parse_time_str(TIME_XML, "pass.time").unwrap();

        let three = parse_att_str(
            r#"<R><AttitudeParameter>
                <AttData><UTC>0</UTC><Roll>0</Roll><Pitch>0</Pitch><Yaw>0</Yaw></AttData>
                <AttData><UTC>1</UTC><Roll>1</Roll><Pitch>1</Pitch><Yaw>1</Yaw></AttData>
                <AttData><UTC>2</UTC><Roll>2</Roll><Pitch>2</Pitch><Yaw>2</Yaw></AttData>
            </AttitudeParameter></R>"#,
            "short.att",
        )
        .unwrap();
        let err = sync_engine::synchronize(&three, &frames).unwrap_err();
        assert!(matches!(
            err,
            ContractError::InsufficientData {
                required: 4,
                actual: 3,
                ..
            }
        ));
        assert!(err.is_fatal_input());

        let unordered = parse_att_str(
            r#"<R><AttitudeParameter>
                <AttData><UTC>0</UTC><Roll>0</Roll><Pitch>0</Pitch><Yaw>0</Yaw></AttData>
                <AttData><UTC>2</UTC><Roll>1</Roll><Pitch>1</Pitch><Yaw>1</Yaw></AttData>
                <AttData><UTC>1</UTC><Roll>2</Roll><Pitch>2</Pitch><Yaw>2</Yaw></AttData>
                <AttData><UTC>3</UTC><Roll>3</Roll><Pitch>3</Pitch><Yaw>3</Yaw></AttData>
            </AttitudeParameter></R>"#,
            "unordered.att",
        )
        .unwrap();
        assert!(matches!(
            sync_engine::synchronize(&unordered, &frames),
            Err(ContractError::NonMonotonicTime { index: 2, .. })
        ));

        let missing = parse_att_str(
            r#"<R><AttitudeParameter>
                <AttData><UTC>0</UTC><Roll>0</Roll><Pitch>0</Pitch></AttData>
            </AttitudeParameter></R>"#,
            "missing.att",
        )
        .unwrap_err();
        let err = ContractError::from(missing);
        assert!(matches!(err, ContractError::Parse { .. }));
        assert!(err.to_string().contains("Yaw"));

        let non_finite = parse_att_str(
            r#"<R><AttitudeParameter>
                <AttData><UTC>0</UTC><Roll>0</Roll><Pitch>0</Pitch><Yaw>0</Yaw></AttData>
                <AttData><UTC>1</UTC><Roll>1</Roll><Pitch>inf</Pitch><Yaw>1</Yaw></AttData>
            </AttitudeParameter></R>"#,
            "non_finite.att",
        )
        .unwrap_err();
        let err = ContractError::from(non_finite);
        assert!(matches!(err, ContractError::Parse { .. }));
        assert!(err.is_fatal_input());
        assert!(err.to_string().contains("Pitch"));
    }
}
