//! Declarative figure lists, read from YAML or JSON.
//!
//! ```yaml
//! data_dir: runs
//! figures:
//!   - title: Mass-spring, Euler schemes
//!     series:
//!       - { file: output_ie.txt, x: 0, y: 1, label: Implicit Euler, style: r- }
//!       - { file: output_ee.txt, x: 0, y: 1, label: Explicit Euler, style: b- }
//!   - title: Mass 1 trajectory
//!     coordinates: phase
//!     series:
//!       - { file: output_alpha_2.txt, x: 1, y: 2, label: Mass 1 }
//! ```

use crate::figure::{ColumnRef, Coordinates, Figure, SeriesSpec};
use crate::present::SkippedFigure;
use crate::style::{Color, LineStyle};
use crate::table::TableSet;
use crate::{CompareError, CompareResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// directory that relative data file paths start from
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    pub figures: Vec<FigureConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureConfig {
    pub title: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    #[serde(default = "enabled")]
    pub legend: bool,
    #[serde(default = "enabled")]
    pub grid: bool,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

/// One curve. `file` serves both axes unless `x_file` or `y_file` overrides it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub x_file: Option<PathBuf>,
    #[serde(default)]
    pub y_file: Option<PathBuf>,
    #[serde(default)]
    pub x: usize,
    pub y: usize,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}

fn enabled() -> bool {
    true
}

/// Read a figure list, the format follows the file extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> CompareResult<BatchConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| CompareError::from_io(path.to_path_buf(), e))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let parsed = match ext.as_str() {
        "yaml" | "yml" => BatchConfig::from_yaml(&text),
        "json" => BatchConfig::from_json(&text),
        other => Err(CompareError::Config(format!("unsupported config extension '.{}'", other))),
    };
    parsed.map_err(|e| CompareError::Config(format!("{}: {}", path.display(), e)))
}

impl BatchConfig {
    pub fn from_yaml(text: &str) -> CompareResult<BatchConfig> {
        serde_yaml::from_str(text).map_err(|e| CompareError::Config(e.to_string()))
    }

    pub fn from_json(text: &str) -> CompareResult<BatchConfig> {
        serde_json::from_str(text).map_err(|e| CompareError::Config(e.to_string()))
    }

    /// Where relative data paths are resolved, given the directory of the config file.
    pub fn base_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(d) if d.is_absolute() => d.clone(),
            Some(d) => config_dir.join(d),
            None => config_dir.to_path_buf(),
        }
    }

    /// Load the tables and build every figure in declaration order.
    /// Figures that cannot be built come back as skipped, a fatal error aborts.
    pub fn build_figures(&self, base_dir: &Path) -> CompareResult<Vec<Result<Figure, SkippedFigure>>> {
        let mut tables = TableSet::new();
        let mut planned = Vec::with_capacity(self.figures.len());
        for fc in self.figures.iter() {
            match fc.build(&mut tables, base_dir) {
                Ok(figure) => planned.push(Ok(figure)),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!("skipping figure '{}': {}", fc.title, e);
                    planned.push(Err(SkippedFigure {
                        title: fc.title.clone(),
                        error: e,
                    }));
                }
            }
        }
        log::debug!("{} tables loaded for {} figures", tables.len(), self.figures.len());
        Ok(planned)
    }
}

impl FigureConfig {
    pub fn build(&self, tables: &mut TableSet, base_dir: &Path) -> CompareResult<Figure> {
        let mut figure = Figure::new(self.title.as_str())
            .coordinates(self.coordinates)
            .legend(self.legend)
            .grid(self.grid);
        figure.name = self.name.clone();
        figure.x_label = self.x_label.clone();
        figure.y_label = self.y_label.clone();
        for (k, sc) in self.series.iter().enumerate() {
            figure = figure.with_series(sc.build(tables, base_dir, k)?);
        }
        Ok(figure)
    }
}

impl SeriesConfig {
    /// `k` is the position in the figure, it picks the palette color when no style is given.
    pub fn build(&self, tables: &mut TableSet, base_dir: &Path, k: usize) -> CompareResult<SeriesSpec> {
        let x_file = self.x_file.as_ref().or_else(|| self.file.as_ref());
        let y_file = self.y_file.as_ref().or_else(|| self.file.as_ref());
        let (x_file, y_file) = match (x_file, y_file) {
            (Some(xf), Some(yf)) => (xf, yf),
            _ => {
                return Err(CompareError::Config(format!(
                    "series {} of the figure names no data file",
                    k + 1
                )))
            }
        };
        let x_table = tables.get(base_dir.join(x_file))?;
        let y_table = tables.get(base_dir.join(y_file))?;
        let mut style = LineStyle::from_format(self.style.as_deref().unwrap_or(""), Color::palette(k))?;
        if let Some(width) = self.width {
            style = style.with_width(width);
        }
        Ok(SeriesSpec::paired(
            ColumnRef::new(&x_table, self.x),
            ColumnRef::new(&y_table, self.y),
            self.label_or_default(y_file),
            style,
        ))
    }

    fn label_or_default(&self, y_file: &Path) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => {
                let stem = y_file.file_stem().and_then(|s| s.to_str()).unwrap_or("series");
                format!("{} [{}]", stem, self.y)
            }
        }
    }

    /// Parse the command line form `file:x:y[:label[:style]]`.
    pub fn from_cli_spec(spec: &str) -> CompareResult<SeriesConfig> {
        // a windows drive letter stays attached to its path
        let drive = match spec.as_bytes() {
            [d, b':', sep, ..] if d.is_ascii_alphabetic() && (*sep == b'\\' || *sep == b'/') => 2,
            _ => 0,
        };
        let mut parts: Vec<&str> = spec[drive..].split(':').collect();
        parts[0] = &spec[..drive + parts[0].len()];
        SeriesConfig::from_parts(spec, &parts)
    }

    fn from_parts(spec: &str, parts: &[&str]) -> CompareResult<SeriesConfig> {
        if parts.len() < 3 || parts.len() > 5 {
            return Err(CompareError::Config(format!(
                "series '{}' should read file:x:y[:label[:style]]",
                spec
            )));
        }
        let column = |s: &str| {
            s.trim()
                .parse::<usize>()
                .map_err(|_| CompareError::Config(format!("'{}' is not a column index in series '{}'", s, spec)))
        };
        Ok(SeriesConfig {
            file: Some(PathBuf::from(parts[0])),
            x_file: None,
            y_file: None,
            x: column(parts[1])?,
            y: column(parts[2])?,
            label: parts.get(3).filter(|l| !l.is_empty()).map(|l| l.to_string()),
            style: parts.get(4).map(|s| s.to_string()),
            width: None,
        })
    }
}
