use crate::style::LineStyle;
use crate::table::ResultTable;
use crate::{min_and_max, padded_range, CompareError, CompareResult};
use serde::Deserialize;
use std::rc::Rc;

/// fraction of the data span left free around the curves
pub const AXIS_MARGIN: f64 = 0.05;

/// One column of a loaded table.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    pub table: Rc<ResultTable>,
    pub index: usize,
}

impl ColumnRef {
    pub fn new(table: &Rc<ResultTable>, index: usize) -> ColumnRef {
        ColumnRef {
            table: Rc::clone(table),
            index,
        }
    }

    pub fn values(&self) -> CompareResult<Vec<f64>> {
        self.table.column(self.index)
    }
}

/// A single curve: where its x and y come from, how it is called and drawn.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub x: ColumnRef,
    pub y: ColumnRef,
    pub label: String,
    pub style: LineStyle,
}

impl SeriesSpec {
    /// x and y from the same table
    pub fn new<S: Into<String>>(
        table: &Rc<ResultTable>,
        x_index: usize,
        y_index: usize,
        label: S,
        style: LineStyle,
    ) -> SeriesSpec {
        SeriesSpec {
            x: ColumnRef::new(table, x_index),
            y: ColumnRef::new(table, y_index),
            label: label.into(),
            style,
        }
    }

    /// x and y from possibly different tables
    pub fn paired<S: Into<String>>(x: ColumnRef, y: ColumnRef, label: S, style: LineStyle) -> SeriesSpec {
        SeriesSpec {
            x,
            y,
            label: label.into(),
            style,
        }
    }

    pub fn resolve(&self) -> CompareResult<ResolvedSeries> {
        let xs = self.x.values()?;
        let ys = self.y.values()?;
        if xs.len() != ys.len() {
            return Err(CompareError::LengthMismatch {
                label: self.label.clone(),
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        Ok(ResolvedSeries {
            label: self.label.clone(),
            style: self.style,
            points: xs.into_iter().zip(ys).collect(),
        })
    }
}

/// What the axes of a figure mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Coordinates {
    /// quantities against the independent variable
    #[serde(rename = "time")]
    TimeDomain,
    /// one state variable against another, drawn with equal axis spans
    #[serde(rename = "phase")]
    PhasePlane,
}

impl Default for Coordinates {
    fn default() -> Self {
        Coordinates::TimeDomain
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    /// file stem for the rendered image, derived from the title when unset
    pub name: Option<String>,
    pub coordinates: Coordinates,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub legend: bool,
    pub grid: bool,
    pub series: Vec<SeriesSpec>,
}

impl Figure {
    pub fn new<S: Into<String>>(title: S) -> Figure {
        Figure {
            title: title.into(),
            name: None,
            coordinates: Coordinates::TimeDomain,
            x_label: None,
            y_label: None,
            legend: true,
            grid: true,
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: SeriesSpec) -> Figure {
        self.series.push(series);
        self
    }

    pub fn coordinates(mut self, coordinates: Coordinates) -> Figure {
        self.coordinates = coordinates;
        self
    }

    pub fn legend(mut self, on: bool) -> Figure {
        self.legend = on;
        self
    }

    pub fn grid(mut self, on: bool) -> Figure {
        self.grid = on;
        self
    }

    pub fn labels<S: Into<String>>(mut self, x_label: S, y_label: S) -> Figure {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Figure {
        self.name = Some(name.into());
        self
    }

    /// File stem used when the figure is written to disk.
    pub fn file_stem(&self, index: usize) -> String {
        let base = self.name.as_deref().unwrap_or(&self.title);
        let mut slug = String::with_capacity(base.len());
        for c in base.chars() {
            if c.is_ascii_alphanumeric() || c == '-' {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('_') {
                slug.push('_');
            }
        }
        let slug = slug.trim_end_matches('_');
        if slug.is_empty() {
            format!("figure_{}", index + 1)
        } else {
            slug.to_string()
        }
    }

    /// Extract every series and the axis ranges.
    /// Fails on the first bad series, so a figure is either complete or not drawn at all.
    pub fn resolve(&self) -> CompareResult<ResolvedFigure> {
        if self.series.is_empty() {
            return Err(CompareError::EmptyFigure {
                title: self.title.clone(),
            });
        }
        let series = self
            .series
            .iter()
            .map(SeriesSpec::resolve)
            .collect::<CompareResult<Vec<ResolvedSeries>>>()?;

        let (xs, ys): (Vec<f64>, Vec<f64>) = series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .copied()
            .unzip();
        let mut x_range = axis_range(&xs);
        let mut y_range = axis_range(&ys);
        if self.coordinates == Coordinates::PhasePlane {
            let half = (x_range.1 - x_range.0).max(y_range.1 - y_range.0) / 2.;
            x_range = centered(x_range, half);
            y_range = centered(y_range, half);
        }

        let (default_x, default_y) = match self.coordinates {
            Coordinates::TimeDomain => ("t".to_string(), "value".to_string()),
            Coordinates::PhasePlane => (
                format!("column {}", self.series[0].x.index),
                format!("column {}", self.series[0].y.index),
            ),
        };
        Ok(ResolvedFigure {
            title: self.title.clone(),
            coordinates: self.coordinates,
            x_label: self.x_label.clone().unwrap_or(default_x),
            y_label: self.y_label.clone().unwrap_or(default_y),
            legend: self.legend,
            grid: self.grid,
            x_range,
            y_range,
            series,
        })
    }
}

fn axis_range(values: &[f64]) -> (f64, f64) {
    match min_and_max(values) {
        Some((min, max)) => padded_range(min, max, AXIS_MARGIN),
        None => (0., 1.),
    }
}

fn centered(range: (f64, f64), half: f64) -> (f64, f64) {
    let mid = (range.0 + range.1) / 2.;
    (mid - half, mid + half)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSeries {
    pub label: String,
    pub style: LineStyle,
    pub points: Vec<(f64, f64)>,
}

impl ResolvedSeries {
    /// Runs of finite points; a NAN or infinite sample breaks the line.
    pub fn segments(&self) -> impl Iterator<Item = &[(f64, f64)]> + '_ {
        self.points
            .split(|(x, y)| !x.is_finite() || !y.is_finite())
            .filter(|chunk| !chunk.is_empty())
    }
}

/// A figure with its data pulled out of the tables, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFigure {
    pub title: String,
    pub coordinates: Coordinates,
    pub x_label: String,
    pub y_label: String,
    pub legend: bool,
    pub grid: bool,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub series: Vec<ResolvedSeries>,
}
