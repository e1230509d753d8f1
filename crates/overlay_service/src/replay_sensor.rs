//! Replay sensor - plays back recorded motion samples
//!
//! Reads a JSONL recording, one sample per line:
//!
//! ```text
//! {"timestamp": 0.016, "values": [0.12, -0.03, 9.79]}
//! {"timestamp": 0.033, "values": [0.15, -0.02, 9.80], "kind": "accelerometer"}
//! ```
//!
//! and delivers samples at their recorded spacing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use contracts::{MotionSample, MotionSampleCallback, MotionSensorSource, SensorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, ServiceError};
use crate::sensors::WorkerCell;

/// Replay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Playback speed multiplier (1.0 = recorded speed)
    pub speed_multiplier: f64,
    /// Restart from the first record at the end
    pub loop_playback: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            loop_playback: false,
        }
    }
}

/// One line of a recording
#[derive(Debug, Clone, Deserialize)]
struct ReplayRecord {
    timestamp: f64,
    values: Vec<f32>,
    #[serde(default)]
    kind: Option<SensorKind>,
}

/// Sensor that replays a JSONL recording
pub struct ReplayMotionSensor {
    name: String,
    kind: SensorKind,
    records: Arc<Vec<MotionSample>>,
    config: ReplayConfig,
    worker: WorkerCell,
}

impl ReplayMotionSensor {
    /// Load a recording
    ///
    /// The sensor kind is taken from the first record that names one, else
    /// linear acceleration.
    pub fn load(path: &Path, config: ReplayConfig) -> Result<Self> {
        let path_label = path.display().to_string();
        let reader = BufReader::new(File::open(path)?);

        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: ReplayRecord = serde_json::from_str(&line)
                .map_err(|e| ServiceError::replay_format(&path_label, index + 1, e.to_string()))?;
            if !record.timestamp.is_finite() {
                return Err(ServiceError::replay_format(
                    &path_label,
                    index + 1,
                    "timestamp is not finite",
                ));
            }
            records.push(record);
        }

        let kind = records
            .iter()
            .find_map(|r| r.kind)
            .unwrap_or(SensorKind::LinearAcceleration);
        let samples = records
            .into_iter()
            .map(|r| MotionSample {
                kind,
                timestamp: r.timestamp,
                values: r.values,
            })
            .collect();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("replay")
            .to_string();
        let sensor = Self::from_samples(name, kind, samples, config);
        info!(path = %path_label, records = sensor.len(), kind = ?kind, "loaded replay sensor");
        Ok(sensor)
    }

    /// Build from in-memory samples; they are sorted by timestamp
    pub fn from_samples(
        name: impl Into<String>,
        kind: SensorKind,
        mut samples: Vec<MotionSample>,
        config: ReplayConfig,
    ) -> Self {
        samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self {
            name: name.into(),
            kind,
            records: Arc::new(samples),
            config,
            worker: WorkerCell::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recording length at recorded speed (s)
    pub fn duration(&self) -> f64 {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }
}

impl MotionSensorSource for ReplayMotionSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn listen(&self, callback: MotionSampleCallback) {
        let records = Arc::clone(&self.records);
        let name = self.name.clone();
        let speed = self.config.speed_multiplier.max(0.1);
        let loop_playback = self.config.loop_playback;

        self.worker.start(&self.name, callback, move |emitter| {
            debug!(sensor = %name, "replay thread started");

            'playback: loop {
                let Some(first) = records.first() else {
                    warn!(sensor = %name, "no records to replay");
                    break;
                };
                let start = Instant::now();

                for sample in records.iter() {
                    let offset = (sample.timestamp - first.timestamp).max(0.0);
                    let target = Duration::from_secs_f64(offset / speed);
                    let elapsed = start.elapsed();
                    if target > elapsed {
                        thread::sleep(target - elapsed);
                    }

                    if !emitter.emit(sample.clone()) {
                        debug!(sensor = %name, "replay stopped");
                        return;
                    }
                }

                if !loop_playback {
                    info!(sensor = %name, "replay completed");
                    break 'playback;
                }
                debug!(sensor = %name, "looping replay");
            }

            emitter.finish();
        });
    }

    fn stop(&self) {
        self.worker.stop();
    }

    fn is_listening(&self) -> bool {
        self.worker.is_running()
    }
}
