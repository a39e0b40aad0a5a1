use crate::figure::{Coordinates, ResolvedFigure, ResolvedSeries};
use crate::style::{LineDash, LineStyle};
use crate::{CompareError, CompareResult};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use std::str::FromStr;

pub const TIME_FIGURE_SIZE: (u32, u32) = (1600, 900);
pub const PHASE_FIGURE_SIZE: (u32, u32) = (1100, 1100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(CompareError::Config(format!("unsupported image format '{}'", other))),
        }
    }
}

pub fn figure_size(coordinates: Coordinates) -> (u32, u32) {
    match coordinates {
        Coordinates::TimeDomain => TIME_FIGURE_SIZE,
        Coordinates::PhasePlane => PHASE_FIGURE_SIZE,
    }
}

/// plots the figure to an image file of the given format
pub fn write_figure(figure: &ResolvedFigure, fout: &Path, format: ImageFormat) -> CompareResult<()> {
    let size = figure_size(figure.coordinates);
    match format {
        ImageFormat::Svg => draw_figure(SVGBackend::new(fout, size).into_drawing_area(), figure),
        ImageFormat::Png => draw_figure(BitMapBackend::new(fout, size).into_drawing_area(), figure),
    }
}

/// Draw the figure on any plotters drawing area and flush it.
pub fn draw_figure<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, figure: &ResolvedFigure) -> CompareResult<()> {
    draw(&root, figure).map_err(|e| CompareError::Render(e.to_string()))?;
    root.present().map_err(|e| CompareError::Render(e.to_string()))?;
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &ResolvedFigure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (xmin, xmax) = figure.x_range;
    let (ymin, ymax) = figure.y_range;
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

    let y_fmt = |y: &f64| tick_label(*y);
    {
        let mut mesh = chart.configure_mesh();
        mesh.set_all_tick_mark_size(2)
            .label_style(("sans-serif", 22))
            .x_labels(12)
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .y_label_formatter(&y_fmt);
        if figure.grid {
            mesh.light_line_style(&TRANSPARENT)
                .bold_line_style(RGBColor(180, 180, 180).stroke_width(1))
                .draw()?;
        } else {
            mesh.disable_mesh().draw()?;
        }
    }

    for series in figure.series.iter() {
        draw_segments(&mut chart, series)?;
        if figure.legend {
            let line = series.style;
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
                .label(series.label.as_str())
                .legend(move |(x, y)| {
                    let [a, b, c, d] = legend_dashes(line.dash);
                    EmptyElement::at((x, y))
                        + PathElement::new(vec![a, b], shape_style(&line))
                        + PathElement::new(vec![c, d], shape_style(&line))
                });
        }
    }

    if figure.legend {
        chart
            .configure_series_labels()
            .label_font(("sans-serif", 22))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// one line per run of finite points
fn draw_segments<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    series: &ResolvedSeries,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for segment in series.segments() {
        let points = segment.iter().copied();
        let style = shape_style(&series.style);
        match series.style.dash {
            LineDash::Solid => {
                chart.draw_series(LineSeries::new(points, style))?;
            }
            LineDash::Dashed => {
                chart.draw_series(DashedLineSeries::new(points, 12, 6, style))?;
            }
            LineDash::Dotted => {
                chart.draw_series(DashedLineSeries::new(points, 2, 5, style))?;
            }
            LineDash::DashDot => {
                // a dot centered in every gap between the dashes
                let dot = style.filled();
                let radius = (series.style.width / 2).max(1);
                chart.draw_series(DashedLineSeries::new(points.clone(), 12, 10, style))?;
                chart.draw_series(DottedLineSeries::new(points, 17, 22, move |c| {
                    Circle::new(c, radius, dot)
                }))?;
            }
        }
    }
    Ok(())
}

/// fixed notation for the usual magnitudes, scientific for error columns and blow-ups
fn tick_label(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude != 0. && !(1e-3..1e6).contains(&magnitude) {
        format!("{:.2e}", v)
    } else {
        format!("{:.3}", v)
    }
}

fn shape_style(style: &LineStyle) -> ShapeStyle {
    let (r, g, b) = (style.color.0, style.color.1, style.color.2);
    RGBColor(r, g, b).stroke_width(style.width)
}

/// two strokes of the legend sample, relative to the legend anchor
fn legend_dashes(dash: LineDash) -> [(i32, i32); 4] {
    match dash {
        LineDash::Solid => [(0, 0), (12, 0), (12, 0), (24, 0)],
        LineDash::Dashed => [(0, 0), (9, 0), (15, 0), (24, 0)],
        LineDash::Dotted => [(0, 0), (3, 0), (10, 0), (13, 0)],
        LineDash::DashDot => [(0, 0), (14, 0), (19, 0), (21, 0)],
    }
}
