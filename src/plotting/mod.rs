// plotting/mod.rs
// Chart data built from sampled trajectories

use crate::error::SimResult;
use crate::trajectory::{PlotSink, TrajectorySeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod export;

pub use export::export_plot_data;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChartKind {
    PositionVsDisplacement, // y(x)
    PositionVsTime,         // y(t)
    VelocityVsTime,         // Vy(t)
    AccelerationVsTime,     // a(t)
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::PositionVsDisplacement,
        ChartKind::PositionVsTime,
        ChartKind::VelocityVsTime,
        ChartKind::AccelerationVsTime,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::PositionVsDisplacement => "graph_y_x",
            ChartKind::PositionVsTime => "graph_y_t",
            ChartKind::VelocityVsTime => "graph_vy_t",
            ChartKind::AccelerationVsTime => "graph_a_t",
        }
    }

    pub fn config(self) -> PlotConfig {
        let (title, x_label, y_label) = match self {
            ChartKind::PositionVsDisplacement => ("y(x)", "x, m", "y, m"),
            ChartKind::PositionVsTime => ("y(t)", "t, s", "y, m"),
            ChartKind::VelocityVsTime => ("Vy(t)", "t, s", "Vy, m/s"),
            ChartKind::AccelerationVsTime => ("a(t)", "t, s", "a, m/s²"),
        };
        PlotConfig {
            chart: self,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotConfig {
    pub chart: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotData {
    pub config: PlotConfig,
    pub x_data: Vec<f64>,
    pub y_data: Vec<f64>,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    CSV,
    JSON,
    TSV,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::CSV => "csv",
            ExportFormat::JSON => "json",
            ExportFormat::TSV => "tsv",
        }
    }
}

/// Pair the series columns for one chart.
pub fn build_chart(kind: ChartKind, series: &TrajectorySeries) -> PlotData {
    let (x, y) = match kind {
        ChartKind::PositionVsDisplacement => (&series.lateral_displacements, &series.positions),
        ChartKind::PositionVsTime => (&series.times, &series.positions),
        ChartKind::VelocityVsTime => (&series.times, &series.velocities),
        ChartKind::AccelerationVsTime => (&series.times, &series.accelerations),
    };
    let mut metadata = BTreeMap::new();
    metadata.insert("Voltage_V".to_string(), series.voltage.to_string());
    metadata.insert("Samples".to_string(), series.len().to_string());
    PlotData {
        config: kind.config(),
        x_data: x.clone(),
        y_data: y.clone(),
        metadata,
    }
}

pub fn build_charts(series: &TrajectorySeries) -> Vec<PlotData> {
    ChartKind::ALL
        .iter()
        .map(|&kind| build_chart(kind, series))
        .collect()
}

/// Writes the four trajectory charts into a directory, one file per chart.
pub struct ChartExporter {
    output_dir: PathBuf,
    format: ExportFormat,
    written: Vec<PathBuf>,
}

impl ChartExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P, format: ExportFormat) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            format,
            written: Vec::new(),
        }
    }

    /// Paths written so far, in chart order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PlotSink for ChartExporter {
    fn accept(&mut self, series: &TrajectorySeries) -> SimResult<()> {
        for data in build_charts(series) {
            let path = export_plot_data(&data, self.format, &self.output_dir)?;
            self.written.push(path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
