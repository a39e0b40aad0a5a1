//! Built-in comparisons for the files the integrator demos write,
//! so the usual plots need no config file. Paths are relative to the data directory.

use crate::config::{BatchConfig, FigureConfig, SeriesConfig};
use crate::figure::Coordinates;
use crate::{CompareError, CompareResult};
use std::path::PathBuf;

pub const PRESET_NAMES: [&str; 4] = ["schemes", "circuit", "newmark", "alpha2"];

/// Figure list of the named preset.
pub fn build(name: &str) -> CompareResult<BatchConfig> {
    let figures = match name {
        "schemes" => vec![time_figure(
            "First order and implicit schemes",
            "schemes",
            &[
                ("output_ie.txt", "Implicit Euler", "r-"),
                ("output_ee.txt", "Explicit Euler", "b-"),
                ("output_cn.txt", "Crank-Nicolson", "g-"),
                ("output_rk.txt", "RK2/impl. midpoint", "c-"),
                ("output_rad.txt", "Radau IIA", "m-"),
            ],
        )],
        "circuit" => vec![time_figure(
            "Electric circuit",
            "circuit",
            &[("output_circuit.txt", "Voltage U(t)", "k-")],
        )],
        "newmark" => vec![
            time_figure("Newmark", "newmark", &[("output_newmark.txt", "Newmark Method", "r-")]),
            time_figure("Generalized alpha", "alpha", &[("output_alpha.txt", "alpha Method", "b-")]),
        ],
        "alpha2" => {
            let mut figure = time_figure("Two masses, generalized alpha", "alpha2", &[]);
            figure.coordinates = Coordinates::PhasePlane;
            figure.x_label = Some("x".to_string());
            figure.y_label = Some("y".to_string());
            figure.series = vec![
                series("output_alpha_2.txt", 1, 2, "Mass 1", "b-"),
                series("output_alpha_2.txt", 3, 4, "Mass 2", "r-"),
            ];
            vec![figure]
        }
        other => return Err(CompareError::UnknownPreset(other.to_string())),
    };
    Ok(BatchConfig {
        data_dir: None,
        figures,
    })
}

fn time_figure(title: &str, name: &str, runs: &[(&str, &str, &str)]) -> FigureConfig {
    FigureConfig {
        title: title.to_string(),
        name: Some(name.to_string()),
        coordinates: Coordinates::TimeDomain,
        x_label: Some("t".to_string()),
        y_label: None,
        legend: true,
        grid: true,
        series: runs
            .iter()
            .map(|(file, label, style)| series(file, 0, 1, label, style))
            .collect(),
    }
}

fn series(file: &str, x: usize, y: usize, label: &str, style: &str) -> SeriesConfig {
    SeriesConfig {
        file: Some(PathBuf::from(file)),
        x_file: None,
        y_file: None,
        x,
        y,
        label: Some(label.to_string()),
        style: Some(style.to_string()),
        width: None,
    }
}
