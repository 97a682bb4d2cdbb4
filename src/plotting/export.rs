// plotting/export.rs
// Data export functionality for plots

use super::{ExportFormat, PlotData};
use crate::error::SimResult;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn export_plot_data(
    data: &PlotData,
    format: ExportFormat,
    output_dir: &Path,
) -> SimResult<PathBuf> {
    let filename = format!("{}.{}", data.config.chart.file_stem(), format.extension());

    let content = match format {
        ExportFormat::CSV => export_csv(data),
        ExportFormat::JSON => export_json(data)?,
        ExportFormat::TSV => export_tsv(data),
    };

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(filename);
    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;

    log::debug!("[plot] wrote {} ({} points)", path.display(), data.x_data.len());
    Ok(path)
}

pub(crate) fn export_csv(data: &PlotData) -> String {
    export_delimited(data, ',')
}

fn export_json(data: &PlotData) -> SimResult<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

fn export_tsv(data: &PlotData) -> String {
    export_delimited(data, '\t')
}

fn export_delimited(data: &PlotData, sep: char) -> String {
    let mut content = String::new();

    content.push_str("# Plot Data Export\n");
    content.push_str(&format!("# Title: {}\n", data.config.title));
    content.push_str(&format!("# Chart: {:?}\n", data.config.chart));
    for (key, value) in &data.metadata {
        content.push_str(&format!("# {}: {}\n", key, value));
    }

    // Axis labels carry units after a comma ("t, s").
    content.push_str(&format!(
        "\"{}\"{}\"{}\"\n",
        data.config.x_label, sep, data.config.y_label
    ));
    for (x, y) in data.x_data.iter().zip(&data.y_data) {
        content.push_str(&format!("{:e}{}{:e}\n", x, sep, y));
    }

    content
}
