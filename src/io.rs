use crate::profile_scope;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::SimulationParameters;
use crate::error::{SimError, SimResult};
use crate::search::SearchReport;
use crate::trajectory::Trajectory;

/// Everything needed to redraw or re-check one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedRun {
    pub parameters: SimulationParameters,
    #[serde(default)]
    pub search: Option<SearchReport>,
    #[serde(default)]
    pub trajectory: Option<Trajectory>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    Json,
    Binary,
}

impl SaveFormat {
    /// `.bin` / `.bin.gz` select bincode, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".bin") || name.ends_with(".bin.gz") {
            SaveFormat::Binary
        } else {
            SaveFormat::Json
        }
    }
}

fn wants_gzip(path: &Path) -> bool {
    path.extension().map(|e| e == "gz").unwrap_or(false)
}

pub fn save_run<P: AsRef<Path>>(path: P, run: &SavedRun) -> SimResult<()> {
    profile_scope!("save_run");
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let format = SaveFormat::from_path(path);
    let use_gzip = wants_gzip(path);

    // Write to a temporary file first so an interrupted save never truncates the target
    let tmp_path = temp_path_for(path);
    let written = write_run(&tmp_path, run, format, use_gzip)
        .and_then(|()| std::fs::rename(&tmp_path, path).map_err(SimError::from));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    log::info!("[io] saved run to {} ({:?}, gzip={})", path.display(), format, use_gzip);
    Ok(())
}

/// `run.bin.gz` -> `run.bin.gz.tmp`, `run` -> `run.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "run".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_run(tmp_path: &Path, run: &SavedRun, format: SaveFormat, use_gzip: bool) -> SimResult<()> {
    let file = std::fs::File::create(tmp_path)?;
    let writer = BufWriter::new(file);
    match (format, use_gzip) {
        (SaveFormat::Json, false) => {
            let mut writer = writer;
            serde_json::to_writer(&mut writer, run)?;
            writer.flush()?;
        }
        (SaveFormat::Json, true) => {
            let mut encoder = GzEncoder::new(writer, Compression::fast());
            serde_json::to_writer(&mut encoder, run)?;
            let mut writer = encoder.finish()?;
            writer.flush()?;
        }
        (SaveFormat::Binary, false) => {
            let mut writer = writer;
            bincode::serialize_into(&mut writer, run)?;
            writer.flush()?;
        }
        (SaveFormat::Binary, true) => {
            let mut encoder = GzEncoder::new(writer, Compression::fast());
            bincode::serialize_into(&mut encoder, run)?;
            let mut writer = encoder.finish()?;
            writer.flush()?;
        }
    }
    Ok(())
}

pub fn load_run<P: AsRef<Path>>(path: P) -> SimResult<SavedRun> {
    profile_scope!("load_run");
    let data = std::fs::read(path.as_ref())?;
    if let Some(decoded) = maybe_decompress_gzip(&data)? {
        parse_saved_run_bytes(&decoded)
    } else {
        parse_saved_run_bytes(&data)
    }
}

fn parse_saved_run_bytes(bytes: &[u8]) -> SimResult<SavedRun> {
    if let Ok(run) = serde_json::from_slice::<SavedRun>(bytes) {
        return Ok(run);
    }
    if let Ok(run) = bincode::deserialize::<SavedRun>(bytes) {
        return Ok(run);
    }
    Err(SimError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "failed to parse saved run: not valid JSON or binary format",
    )))
}

fn maybe_decompress_gzip(data: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
    if data.len() < 2 || data[0] != 0x1f || data[1] != 0x8b {
        return Ok(None);
    }

    let mut decoder = GzDecoder::new(Cursor::new(data));
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Some(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::CriticalVoltageSearch;
    use crate::simulation::Integrator;

    fn sample_run() -> SavedRun {
        let params = SimulationParameters::new(0.01, 0.02, 1e6, 0.1).unwrap();
        let integrator = Integrator::new(params.clone()).unwrap();
        let search = CriticalVoltageSearch::new(&integrator).run().unwrap();
        let trajectory = integrator.record(search.voltage).unwrap();
        SavedRun {
            parameters: params,
            search: Some(search),
            trajectory: Some(trajectory),
        }
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("coax_sim_io_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(SaveFormat::from_path(Path::new("run.json")), SaveFormat::Json);
        assert_eq!(SaveFormat::from_path(Path::new("run.json.gz")), SaveFormat::Json);
        assert_eq!(SaveFormat::from_path(Path::new("run.bin")), SaveFormat::Binary);
        assert_eq!(SaveFormat::from_path(Path::new("run.BIN.gz")), SaveFormat::Binary);
        assert!(wants_gzip(Path::new("run.bin.gz")));
        assert!(!wants_gzip(Path::new("run.json")));
    }

    #[test]
    fn compressed_binary_run_reloads() {
        let run = sample_run();
        let path = scratch("run.bin.gz");
        save_run(&path, &run).unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
        assert_eq!(load_run(&path).unwrap(), run);
        assert!(!path.with_extension("gz.tmp").exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn json_without_trajectory_reloads() {
        let mut run = sample_run();
        run.trajectory = None;
        let path = scratch("summary.json");
        save_run(&path, &run).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"inner_radius\""));
        let loaded = load_run(&path).unwrap();
        assert!(loaded.trajectory.is_none());
        let (a, b) = (loaded.search.unwrap(), run.search.unwrap());
        assert_eq!(a.iterations, b.iterations);
        assert!((a.voltage - b.voltage).abs() <= 1e-12 * b.voltage.abs());
        assert!((loaded.parameters.dt - run.parameters.dt).abs() <= 1e-24);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn temp_name_appends_to_full_file_name() {
        assert_eq!(temp_path_for(Path::new("out/run.bin.gz")), Path::new("out/run.bin.gz.tmp"));
        assert_eq!(temp_path_for(Path::new("out/run")), Path::new("out/run.tmp"));
    }

    #[test]
    fn run_without_extension_saves_as_json() {
        let mut run = sample_run();
        run.trajectory = None;
        let path = scratch("plain_run");
        save_run(&path, &run).unwrap();
        assert!(load_run(&path).unwrap().search.is_some());
        assert!(!scratch("plain_run.tmp").exists());
        assert!(!scratch("plain_run..tmp").exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let mut run = sample_run();
        run.trajectory = None;
        // A directory at the target path makes the final rename fail.
        let path = scratch("occupied.json");
        std::fs::create_dir_all(&path).unwrap();
        assert!(save_run(&path, &run).is_err());
        assert!(!scratch("occupied.json.tmp").exists());
        assert!(path.is_dir());
        std::fs::remove_dir_all(&path).ok();
    }

    #[test]
    fn garbage_is_rejected() {
        let path = scratch("garbage.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not a run").unwrap();
        assert!(load_run(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
