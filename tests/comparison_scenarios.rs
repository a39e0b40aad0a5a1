use ode_compare::config::BatchConfig;
use ode_compare::{
    render_all, Color, CompareError, CompareResult, Figure, LineStyle, Presenter, ResolvedFigure, ResultTable,
    SeriesSpec,
};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// keeps what would have been drawn instead of drawing it
#[derive(Default)]
struct Recorder {
    figures: Vec<ResolvedFigure>,
}

impl Presenter for Recorder {
    fn present(&mut self, figure: &ResolvedFigure, stem: &str) -> CompareResult<PathBuf> {
        self.figures.push(figure.clone());
        Ok(PathBuf::from(format!("{}.svg", stem)))
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, file: &str, text: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn two_quantities_share_the_time_axis() {
    let dir = scratch_dir("ode_compare_scenario_shared_axis");
    let path = write(&dir, "a.txt", "0 1 2\n1 3 4\n2 5 6\n");
    let a = Rc::new(ResultTable::load(&path).unwrap());
    assert_eq!(a.row(0).unwrap(), &[0., 1., 2.]);
    assert_eq!(a.row(2).unwrap(), &[2., 5., 6.]);

    let figure = Figure::new("a.txt")
        .with_series(SeriesSpec::new(&a, 0, 1, "x", LineStyle::solid(Color::RED)))
        .with_series(SeriesSpec::new(&a, 0, 2, "y", LineStyle::solid(Color::BLUE)));
    let mut recorder = Recorder::default();
    let report = render_all(&[figure], &mut recorder).unwrap();
    assert!(report.is_complete());

    let drawn = &recorder.figures[0];
    assert!(drawn.legend && drawn.grid);
    let xs: Vec<Vec<f64>> = drawn.series.iter().map(|s| s.points.iter().map(|p| p.0).collect()).collect();
    let ys: Vec<Vec<f64>> = drawn.series.iter().map(|s| s.points.iter().map(|p| p.1).collect()).collect();
    assert_eq!(xs, vec![vec![0., 1., 2.], vec![0., 1., 2.]]);
    assert_eq!(ys, vec![vec![1., 3., 5.], vec![2., 4., 6.]]);
    let labels: Vec<&str> = drawn.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["x", "y"]);
}

#[test]
fn mismatched_runs_are_skipped_and_the_rest_still_render() {
    let dir = scratch_dir("ode_compare_scenario_mismatch");
    write(&dir, "five.txt", "0 0\n1 1\n2 4\n3 9\n4 16\n");
    write(&dir, "seven.txt", "0 0\n1 1\n2 8\n3 27\n4 64\n5 125\n6 216\n");
    let yaml = r#"
figures:
  - title: mixed runs
    series:
      - { x_file: five.txt, y_file: seven.txt, x: 0, y: 1, label: mixed }
  - title: squares
    series:
      - { file: five.txt, y: 1, label: squares, style: "k:" }
  - title: cubes
    series:
      - { file: seven.txt, y: 1, label: cubes, style: g-. }
"#;
    let config = BatchConfig::from_yaml(yaml).unwrap();
    let planned = config.build_figures(&dir).unwrap();
    let figures: Vec<Figure> = planned.into_iter().map(|p| p.unwrap()).collect();

    let mut recorder = Recorder::default();
    let report = render_all(&figures, &mut recorder).unwrap();
    assert_eq!(report.rendered, vec![PathBuf::from("squares.svg"), PathBuf::from("cubes.svg")]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].title, "mixed runs");
    match &report.skipped[0].error {
        CompareError::LengthMismatch { x_len, y_len, .. } => assert_eq!((*x_len, *y_len), (5, 7)),
        other => panic!("unexpected error {:?}", other),
    }
    let titles: Vec<&str> = recorder.figures.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["squares", "cubes"]);
}

#[test]
fn out_of_range_column_draws_nothing() {
    let a: Rc<ResultTable> = Rc::new("0 1 2\n1 3 4\n".parse().unwrap());
    let figure = Figure::new("too wide")
        .with_series(SeriesSpec::new(&a, 0, 1, "fine", LineStyle::default()))
        .with_series(SeriesSpec::new(&a, 0, 5, "too far", LineStyle::default()));
    let mut recorder = Recorder::default();
    for _ in 0..2 {
        let report = render_all(std::slice::from_ref(&figure), &mut recorder).unwrap();
        assert!(matches!(
            report.skipped[0].error,
            CompareError::ColumnOutOfRange { index: 5, width: 3, .. }
        ));
    }
    assert!(recorder.figures.is_empty());
}

#[test]
fn empty_series_still_renders() {
    let blank = Rc::new(ResultTable::from_columns("blank", vec![vec![], vec![]]).unwrap());
    let figure = Figure::new("blank").with_series(SeriesSpec::new(&blank, 0, 1, "nothing", LineStyle::default()));
    let mut recorder = Recorder::default();
    let report = render_all(&[figure, Figure::new("no series")], &mut recorder).unwrap();
    assert_eq!(report.rendered.len(), 1);
    assert!(recorder.figures[0].series[0].points.is_empty());
    assert!(matches!(report.skipped[0].error, CompareError::EmptyFigure { .. }));
}

#[test]
fn preset_reads_the_demo_file_names() {
    let dir = scratch_dir("ode_compare_scenario_preset");
    write(&dir, "output_alpha_2.txt", "0 1 0 2 0\n0.01 0.99 -0.01 1.98 -0.03\n0.02 0.97 -0.02 1.95 -0.06\n");
    let config = ode_compare::presets::build("alpha2").unwrap();
    let figures: Vec<Figure> = config
        .build_figures(&dir)
        .unwrap()
        .into_iter()
        .map(|p| p.unwrap())
        .collect();
    let mut recorder = Recorder::default();
    render_all(&figures, &mut recorder).unwrap();
    let drawn = &recorder.figures[0];
    assert_eq!(drawn.series[0].points[1], (0.99, -0.01));
    assert_eq!(drawn.series[1].points[2], (1.95, -0.06));
    let x_span = drawn.x_range.1 - drawn.x_range.0;
    let y_span = drawn.y_range.1 - drawn.y_range.0;
    assert!((x_span - y_span).abs() < 1e-9);
}
