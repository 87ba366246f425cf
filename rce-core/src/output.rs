//! Persistence of the model trajectory.
//!
//! The controller only needs two operations from an output target:
//! create it (with a schema and the first record) and append a record at a timestamp.
//! Records are a merged, flat view of the state: heating-rate fields, then atmospheric
//! fields (so that the humidity always comes from the atmosphere), then surface fields.

use crate::atmosphere::Atmosphere;
use crate::errors::{RCEError, RCEResult};
use crate::heating_rates::HeatingRates;
use crate::profile::{FloatValue, Profile};
use crate::surface::SurfaceState;
use crate::variable::{describe, VariableDescription};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// A single value in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Scalar(FloatValue),
    Profile(Vec<FloatValue>),
}

/// Snapshot of the model state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Hours since model start
    pub time: FloatValue,
    pub variables: BTreeMap<String, RecordValue>,
}

impl Record {
    pub fn snapshot(
        time: FloatValue,
        atmosphere: &Atmosphere,
        heatingrates: Option<&HeatingRates>,
        surface: &SurfaceState,
    ) -> Self {
        let mut variables = BTreeMap::new();
        let mut insert_profile = |name: &str, values: &Profile| {
            variables.insert(name.to_string(), RecordValue::Profile(values.to_vec()));
        };

        if let Some(heatingrates) = heatingrates {
            for (name, values) in heatingrates.fluxes() {
                insert_profile(name, values);
            }
            for (name, values) in heatingrates.heating() {
                insert_profile(name, values);
            }
            for (name, values) in heatingrates.extra.iter() {
                insert_profile(name, values);
            }
        }
        insert_profile("plev", atmosphere.plev());
        insert_profile("phlev", atmosphere.phlev());
        for (name, values) in atmosphere.iter() {
            insert_profile(name, values);
        }

        for (name, value) in surface.fields() {
            variables.insert(name.to_string(), RecordValue::Scalar(value));
        }
        if let Some(heatingrates) = heatingrates {
            variables.insert(
                "toa".to_string(),
                RecordValue::Scalar(heatingrates.toa_imbalance()),
            );
        }

        Self { time, variables }
    }

    pub fn profile(&self, name: &str) -> Option<&[FloatValue]> {
        match self.variables.get(name) {
            Some(RecordValue::Profile(values)) => Some(values),
            _ => None,
        }
    }

    pub fn scalar(&self, name: &str) -> Option<FloatValue> {
        match self.variables.get(name) {
            Some(RecordValue::Scalar(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Attributes stored once per output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub experiment: String,
    /// Local time of creation, formatted as `%Y-%m-%d %H:%M`
    pub creation_date: String,
    /// Only present for radiation schemes which have a solar constant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_constant: Option<FloatValue>,
}

impl Metadata {
    pub fn now(experiment: &str, solar_constant: Option<FloatValue>) -> Self {
        Self {
            experiment: experiment.to_string(),
            creation_date: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
            solar_constant,
        }
    }
}

/// First line of a JSON-lines output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub metadata: Metadata,
    pub variables: Vec<VariableDescription>,
}

/// An append-only output target.
pub trait OutputSink: Debug + Send {
    /// Create the output, replacing any existing content, and store the first record.
    fn create(&mut self, record: &Record, metadata: &Metadata) -> RCEResult<()>;

    /// Append a record to an output created earlier.
    fn append(&mut self, record: &Record) -> RCEResult<()>;
}

/// Writes a trajectory as JSON lines: a [`Header`] followed by one [`Record`] per line.
///
/// Every append reopens the file so that the written trajectory is complete up to the last
/// write, even if the run is aborted.
#[derive(Debug, Clone)]
pub struct JsonLinesWriter {
    path: PathBuf,
}

impl JsonLinesWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line<T: Serialize>(writer: &mut impl Write, value: &T) -> RCEResult<()> {
        serde_json::to_writer(&mut *writer, value)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl OutputSink for JsonLinesWriter {
    fn create(&mut self, record: &Record, metadata: &Metadata) -> RCEResult<()> {
        let header = Header {
            metadata: metadata.clone(),
            variables: describe(record.variables.keys().map(|name| name.as_str())),
        };

        let mut writer = BufWriter::new(File::create(&self.path)?);
        Self::write_line(&mut writer, &header)?;
        Self::write_line(&mut writer, record)?;
        writer.flush()?;
        Ok(())
    }

    fn append(&mut self, record: &Record) -> RCEResult<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        Self::write_line(&mut writer, record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read a trajectory written by [`JsonLinesWriter`].
pub fn read_trajectory(path: impl AsRef<Path>) -> RCEResult<(Header, Vec<Record>)> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut lines = reader.lines();

    let header: Header = match lines.next() {
        Some(line) => serde_json::from_str(&line?)?,
        None => {
            return Err(RCEError::Error(format!(
                "{} is empty",
                path.as_ref().display()
            )))
        }
    };

    let mut records = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok((header, records))
}

#[derive(Debug, Default)]
struct Trajectory {
    metadata: Option<Metadata>,
    records: Vec<Record>,
}

/// Keeps the trajectory in memory.
///
/// Clones share the same storage, so a handle can be kept to inspect what a controller
/// wrote after the sink has been moved into it.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    trajectory: Arc<Mutex<Trajectory>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Trajectory> {
        // A poisoned lock only means a writer panicked mid-push; the data is still usable.
        self.trajectory
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn metadata(&self) -> Option<Metadata> {
        self.lock().metadata.clone()
    }

    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    /// Timestamps (hours) of all stored records
    pub fn times(&self) -> Vec<FloatValue> {
        self.lock().records.iter().map(|record| record.time).collect()
    }
}

impl OutputSink for MemorySink {
    fn create(&mut self, record: &Record, metadata: &Metadata) -> RCEResult<()> {
        let mut trajectory = self.lock();
        trajectory.metadata = Some(metadata.clone());
        trajectory.records = vec![record.clone()];
        Ok(())
    }

    fn append(&mut self, record: &Record) -> RCEResult<()> {
        let mut trajectory = self.lock();
        if trajectory.metadata.is_none() {
            return Err(RCEError::Error(
                "cannot append to an output that was never created".to_string(),
            ));
        }
        trajectory.records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    fn snapshot(time: FloatValue) -> Record {
        let atmosphere = Atmosphere::new(
            array![90000.0, 50000.0],
            array![100000.0, 70000.0, 20000.0],
            array![280.0, 250.0],
            array![1e-2, 1e-3],
        )
        .unwrap();
        let mut heatingrates = HeatingRates::zeros(2);
        heatingrates
            .extra
            .insert("H2O".to_string(), array![0.5, 0.5]);
        Record::snapshot(
            time,
            &atmosphere,
            Some(&heatingrates),
            &SurfaceState::default(),
        )
    }

    #[test]
    fn test_snapshot_merges_fields() {
        let record = snapshot(0.0);

        // Humidity comes from the atmosphere, not from the heating rates.
        assert_eq!(record.profile("H2O"), Some(&[1e-2, 1e-3][..]));
        assert_eq!(record.profile("T"), Some(&[280.0, 250.0][..]));
        assert_eq!(record.profile("lw_flxu").map(|v| v.len()), Some(3));
        assert_eq!(record.scalar("temperature"), Some(288.0));
        assert_eq!(record.scalar("toa"), Some(0.0));
        assert!(record.profile("plev").is_some());
    }

    #[test]
    fn test_json_lines_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rce.jsonl");
        let mut writer = JsonLinesWriter::new(&path);
        let metadata = Metadata::now("control", Some(551.58));

        writer.create(&snapshot(0.0), &metadata).unwrap();
        writer.append(&snapshot(24.0)).unwrap();
        writer.append(&snapshot(48.0)).unwrap();

        let (header, records) = read_trajectory(&path).unwrap();
        assert_eq!(header.metadata, metadata);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].time, 48.0);
        assert_eq!(records[1].profile("T"), Some(&[280.0, 250.0][..]));
        assert_eq!(records[1].scalar("heat_capacity"), Some(1025.0 * 4185.5));

        let temperature = header
            .variables
            .iter()
            .find(|var| var.name == "T")
            .unwrap();
        assert_eq!(temperature.unit, "K");
    }

    #[test]
    fn test_create_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rce.jsonl");
        let mut writer = JsonLinesWriter::new(&path);
        let metadata = Metadata::now("", None);

        writer.create(&snapshot(0.0), &metadata).unwrap();
        writer.append(&snapshot(24.0)).unwrap();
        writer.create(&snapshot(0.0), &metadata).unwrap();

        let (_, records) = read_trajectory(&path).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_append_without_create_fails() {
        let dir = tempdir().unwrap();
        let mut writer = JsonLinesWriter::new(dir.path().join("missing.jsonl"));
        assert!(matches!(
            writer.append(&snapshot(0.0)),
            Err(RCEError::Io(_))
        ));

        let mut sink = MemorySink::new();
        assert!(sink.append(&snapshot(0.0)).is_err());
    }

    #[test]
    fn test_memory_sink_shares_storage() {
        let handle = MemorySink::new();
        let mut sink: Box<dyn OutputSink> = Box::new(handle.clone());

        sink.create(&snapshot(0.0), &Metadata::now("shared", None))
            .unwrap();
        sink.append(&snapshot(12.0)).unwrap();

        assert_eq!(handle.times(), vec![0.0, 12.0]);
        assert_eq!(handle.metadata().unwrap().experiment, "shared");
    }
}
