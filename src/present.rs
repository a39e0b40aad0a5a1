use crate::figure::{Figure, ResolvedFigure};
use crate::plot::{write_figure, ImageFormat};
use crate::{CompareError, CompareResult};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where a finished figure goes.
pub trait Presenter {
    /// Show or store one figure and return the file it was written to.
    /// Interactive presenters block here until the user is done with it.
    fn present(&mut self, figure: &ResolvedFigure, stem: &str) -> CompareResult<PathBuf>;
}

/// Headless mode: one image per figure in a directory.
#[derive(Debug, Clone)]
pub struct SaveToDir {
    dir: PathBuf,
    format: ImageFormat,
}

impl SaveToDir {
    pub fn new<P: Into<PathBuf>>(dir: P, format: ImageFormat) -> CompareResult<SaveToDir> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| CompareError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(SaveToDir { dir, format })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Presenter for SaveToDir {
    fn present(&mut self, figure: &ResolvedFigure, stem: &str) -> CompareResult<PathBuf> {
        let fout = self.dir.join(format!("{}.{}", stem, self.format.extension()));
        write_figure(figure, &fout, self.format)?;
        Ok(fout)
    }
}

/// Interactive mode: render to a scratch file, hand it to an image viewer
/// and wait for the user to confirm on the terminal before moving on.
/// The scratch directory is removed when the viewer is dropped.
#[derive(Debug)]
pub struct Viewer {
    scratch: PathBuf,
    format: ImageFormat,
    command: Vec<String>,
}

impl Viewer {
    /// `command` is split on whitespace, the image path is appended as last argument
    pub fn new(command: Option<&str>, format: ImageFormat) -> CompareResult<Viewer> {
        let command: Vec<String> = match command {
            Some(c) => c.split_whitespace().map(String::from).collect(),
            None => default_viewer().iter().map(|s| s.to_string()).collect(),
        };
        if command.is_empty() {
            return Err(CompareError::Config("empty viewer command".to_string()));
        }
        let scratch = std::env::temp_dir().join(format!("ode_compare_{}", std::process::id()));
        std::fs::create_dir_all(&scratch).map_err(|e| CompareError::Io {
            path: scratch.clone(),
            source: e,
        })?;
        Ok(Viewer {
            scratch,
            format,
            command,
        })
    }

    /// Directory the images are written to before the viewer opens them.
    pub fn scratch(&self) -> &Path {
        &self.scratch
    }

    fn open(&self, fout: &Path) -> CompareResult<()> {
        let status = Command::new(&self.command[0])
            .args(&self.command[1..])
            .arg(fout)
            .status()
            .map_err(|e| CompareError::Render(format!("could not start viewer '{}': {}", self.command[0], e)))?;
        if !status.success() {
            log::warn!("viewer '{}' exited with {}", self.command[0], status);
        }
        Ok(())
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.scratch) {
            log::debug!("could not remove {}: {}", self.scratch.display(), e);
        }
    }
}

fn default_viewer() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["open", "-W"]
    } else if cfg!(target_os = "windows") {
        &["cmd", "/C", "start", "/WAIT", ""]
    } else {
        &["xdg-open"]
    }
}

impl Presenter for Viewer {
    fn present(&mut self, figure: &ResolvedFigure, stem: &str) -> CompareResult<PathBuf> {
        let fout = self.scratch.join(format!("{}.{}", stem, self.format.extension()));
        write_figure(figure, &fout, self.format)?;
        self.open(&fout)?;
        print!("showing '{}', press Enter for the next figure ", figure.title);
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        // EOF on stdin (no terminal) simply continues
        if let Err(e) = std::io::stdin().read_line(&mut answer) {
            log::warn!("could not read from stdin: {}", e);
        }
        Ok(fout)
    }
}

#[derive(Debug)]
pub struct SkippedFigure {
    pub title: String,
    pub error: CompareError,
}

#[derive(Debug, Default)]
pub struct RenderReport {
    pub rendered: Vec<PathBuf>,
    pub skipped: Vec<SkippedFigure>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Render the figures in order, one at a time.
/// A figure that fails is logged and skipped, only a fatal error stops the batch.
pub fn render_all<P: Presenter + ?Sized>(figures: &[Figure], presenter: &mut P) -> CompareResult<RenderReport> {
    let mut report = RenderReport::default();
    let mut stems: HashSet<String> = HashSet::new();
    for (i, figure) in figures.iter().enumerate() {
        let stem = unique_stem(figure.file_stem(i), &mut stems);
        let outcome = figure
            .resolve()
            .and_then(|resolved| presenter.present(&resolved, &stem));
        match outcome {
            Ok(fout) => {
                log::info!("figure '{}' written to {}", figure.title, fout.display());
                report.rendered.push(fout);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log::warn!("skipping figure '{}': {}", figure.title, e);
                report.skipped.push(SkippedFigure {
                    title: figure.title.clone(),
                    error: e,
                });
            }
        }
    }
    Ok(report)
}

fn unique_stem(stem: String, taken: &mut HashSet<String>) -> String {
    let mut candidate = stem.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}_{}", stem, n);
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::SeriesSpec;
    use crate::style::LineStyle;
    use crate::table::ResultTable;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        shown: Vec<(String, Vec<String>)>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, figure: &ResolvedFigure, stem: &str) -> CompareResult<PathBuf> {
            let labels = figure.series.iter().map(|s| s.label.clone()).collect();
            self.shown.push((stem.to_string(), labels));
            Ok(PathBuf::from(stem))
        }
    }

    struct Broken;

    impl Presenter for Broken {
        fn present(&mut self, _figure: &ResolvedFigure, _stem: &str) -> CompareResult<PathBuf> {
            Err(CompareError::Io {
                path: PathBuf::from("/plots"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn table(text: &str) -> Rc<ResultTable> {
        Rc::new(text.parse().unwrap())
    }

    #[test]
    fn failing_figures_are_skipped_in_order() {
        let a = table("0 1 2\n1 3 4\n2 5 6\n");
        let figures = vec![
            Figure::new("first").with_series(SeriesSpec::new(&a, 0, 1, "x", LineStyle::default())),
            Figure::new("empty"),
            Figure::new("out of range").with_series(SeriesSpec::new(&a, 0, 5, "bad", LineStyle::default())),
            Figure::new("last").with_series(SeriesSpec::new(&a, 0, 2, "y", LineStyle::default())),
        ];
        let mut recorder = Recorder::default();
        let report = render_all(&figures, &mut recorder).unwrap();
        let stems: Vec<&str> = recorder.shown.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(stems, vec!["first", "last"]);
        assert_eq!(report.rendered.len(), 2);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(report.skipped[0].error, CompareError::EmptyFigure { .. }));
        assert!(matches!(report.skipped[1].error, CompareError::ColumnOutOfRange { .. }));
        assert!(!report.is_complete());
    }

    #[test]
    fn fatal_errors_stop_the_batch() {
        let a = table("0 1\n");
        let figures = vec![Figure::new("one").with_series(SeriesSpec::new(&a, 0, 1, "x", LineStyle::default()))];
        let err = render_all(&figures, &mut Broken).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn repeated_titles_get_distinct_stems() {
        let a = table("0 1\n");
        let figure = Figure::new("same").with_series(SeriesSpec::new(&a, 0, 1, "x", LineStyle::default()));
        let figures = vec![figure.clone(), figure];
        let mut recorder = Recorder::default();
        render_all(&figures, &mut recorder).unwrap();
        assert_eq!(recorder.shown[0].0, "same");
        assert_eq!(recorder.shown[1].0, "same_2");
    }

    #[test]
    fn save_to_dir_creates_the_directory() {
        let dir = std::env::temp_dir().join("ode_compare_present_test").join("nested");
        let _ = std::fs::remove_dir_all(&dir);
        let saver = SaveToDir::new(&dir, ImageFormat::Svg).unwrap();
        assert!(saver.dir().is_dir());
    }

    #[test]
    fn viewer_rejects_empty_command() {
        assert!(Viewer::new(Some("   "), ImageFormat::Png).is_err());
    }

    #[test]
    fn viewer_removes_its_scratch_directory() {
        let viewer = Viewer::new(Some("true"), ImageFormat::Svg).unwrap();
        let scratch = viewer.scratch().to_path_buf();
        std::fs::write(scratch.join("leftover.svg"), "<svg/>").unwrap();
        assert!(scratch.is_dir());
        drop(viewer);
        assert!(!scratch.exists());
    }
}
