#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::SimulationParameters;
    use crate::simulation::Integrator;
    use crate::trajectory::TrajectorySampler;

    fn sample_series() -> TrajectorySeries {
        let params = SimulationParameters::new(0.01, 0.02, 1e6, 0.1).unwrap();
        let integrator = Integrator::new(params).unwrap();
        TrajectorySampler::new(&integrator).sample(0.06).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("coax_sim_{}_{}", name, std::process::id()))
    }

    #[test]
    fn charts_pair_the_expected_columns() {
        let series = sample_series();
        let charts = build_charts(&series);
        assert_eq!(charts.len(), 4);

        let y_x = &charts[0];
        assert_eq!(y_x.config.title, "y(x)");
        assert_eq!(y_x.x_data, series.lateral_displacements);
        assert_eq!(y_x.y_data, series.positions);

        let a_t = &charts[3];
        assert_eq!(a_t.config.chart, ChartKind::AccelerationVsTime);
        assert_eq!(a_t.x_data, series.times);
        assert_eq!(a_t.y_data, series.accelerations);
        assert_eq!(a_t.metadata["Samples"], series.len().to_string());
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let series = sample_series();
        let data = build_chart(ChartKind::VelocityVsTime, &series);
        let csv = export::export_csv(&data);
        let rows: Vec<&str> = csv.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(rows[0], "\"t, s\",\"Vy, m/s\"");
        assert_eq!(rows.len(), series.len() + 1);
        let first: Vec<f64> = rows[1].split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(first, vec![0.0, 0.0]);
    }

    #[test]
    fn exporter_writes_one_file_per_chart() {
        let dir = scratch_dir("charts");
        let mut exporter = ChartExporter::new(&dir, ExportFormat::JSON);
        exporter.accept(&sample_series()).unwrap();

        let names: Vec<String> = exporter
            .written()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["graph_y_x.json", "graph_y_t.json", "graph_vy_t.json", "graph_a_t.json"]
        );

        let text = std::fs::read_to_string(&exporter.written()[1]).unwrap();
        let parsed: PlotData = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.config.chart, ChartKind::PositionVsTime);
        std::fs::remove_dir_all(&dir).ok();
    }
}
