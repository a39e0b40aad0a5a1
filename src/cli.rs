use super::VERSION;
use crate::config::{load_config, BatchConfig, FigureConfig, SeriesConfig};
use crate::figure::Coordinates;
use crate::plot::ImageFormat;
use crate::present::{render_all, Presenter, RenderReport, SaveToDir, Viewer};
use crate::presets::{self, PRESET_NAMES};
use crate::{CompareError, CompareResult, OUTDIR_STAMP};
use chrono::prelude::*;
use clap::{App, Arg, ArgGroup, ArgMatches};
use std::path::{Path, PathBuf};

/// Where the figures are defined.
#[derive(Debug, Clone)]
pub enum FigureSource {
    Config(PathBuf),
    Preset { name: String, datadir: PathBuf },
    Adhoc(FigureConfig),
}

/// What happens to a rendered figure.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Save(PathBuf),
    Show { viewer: Option<String> },
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub source: FigureSource,
    pub output: Output,
    pub format: ImageFormat,
    pub verbose: bool,
}

fn app<'a, 'b>() -> App<'a, 'b> {
    let arg_config = Arg::with_name("config")
        .help("YAML or JSON file listing the figures and their series")
        .short("c")
        .long("config")
        .takes_value(true);
    let arg_preset = Arg::with_name("preset")
        .help("built-in comparison of the integrator demo outputs")
        .short("p")
        .long("preset")
        .takes_value(true)
        .possible_values(&PRESET_NAMES);
    let arg_datadir = Arg::with_name("datadir")
        .help("directory holding the preset's output files [default: .]")
        .short("d")
        .long("datadir")
        .takes_value(true)
        .requires("preset");
    let arg_series = Arg::with_name("series")
        .help("series as file:x:y[:label[:style]], style like r-, b--, k:, g-.")
        .short("s")
        .long("series")
        .takes_value(true)
        .multiple(true)
        .number_of_values(1);
    let arg_title = Arg::with_name("title")
        .help("title of the figure built from --series [default: comparison]")
        .short("t")
        .long("title")
        .takes_value(true)
        .requires("series");
    let arg_phase = Arg::with_name("phase")
        .help("plot the --series figure as a phase plane")
        .long("phase")
        .requires("series");
    let arg_no_legend = Arg::with_name("no_legend")
        .help("hide the legend of the --series figure")
        .long("no-legend")
        .requires("series");
    let arg_no_grid = Arg::with_name("no_grid")
        .help("hide the grid of the --series figure")
        .long("no-grid")
        .requires("series");
    let arg_outdir = Arg::with_name("outdir")
        .help("directory for the images, default plots_<timestamp>")
        .short("o")
        .long("outdir")
        .takes_value(true)
        .conflicts_with("show");
    let arg_format = Arg::with_name("format")
        .help("image format")
        .short("f")
        .long("format")
        .takes_value(true)
        .possible_values(&["svg", "png"])
        .default_value("svg");
    let arg_show = Arg::with_name("show")
        .help("open each figure in a viewer and wait before showing the next")
        .long("show");
    let arg_viewer = Arg::with_name("viewer")
        .help("viewer command for --show, the image path is appended")
        .long("viewer")
        .takes_value(true)
        .requires("show");
    let arg_verbose = Arg::with_name("verbose")
        .help("print debug information")
        .short("v")
        .long("verbose")
        .takes_value(false);
    App::new("ode_compare")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot and compare ODE integrator result tables")
        .arg(arg_config)
        .arg(arg_preset)
        .arg(arg_datadir)
        .arg(arg_series)
        .arg(arg_title)
        .arg(arg_phase)
        .arg(arg_no_legend)
        .arg(arg_no_grid)
        .arg(arg_outdir)
        .arg(arg_format)
        .arg(arg_show)
        .arg(arg_viewer)
        .arg(arg_verbose)
        .group(
            ArgGroup::with_name("source")
                .args(&["config", "preset", "series"])
                .required(true),
        )
}

/// Takes the CLI arguments that select the figures and where they go.
pub fn parse_cli() -> Invocation {
    let cli_args = app().get_matches();
    match invocation_from(&cli_args) {
        Ok(invocation) => invocation,
        Err(e) => clap::Error::with_description(&e.to_string(), clap::ErrorKind::InvalidValue).exit(),
    }
}

/// Same as `parse_cli` for an explicit argument list, the first item is the program name.
pub fn parse_from<I, T>(args: I) -> CompareResult<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli_args = app()
        .get_matches_from_safe(args)
        .map_err(|e| CompareError::Config(e.message))?;
    invocation_from(&cli_args)
}

fn invocation_from(cli_args: &ArgMatches) -> CompareResult<Invocation> {
    let source = if let Some(config) = cli_args.value_of("config") {
        FigureSource::Config(PathBuf::from(config))
    } else if let Some(name) = cli_args.value_of("preset") {
        FigureSource::Preset {
            name: name.to_string(),
            datadir: PathBuf::from(cli_args.value_of("datadir").unwrap_or(".")),
        }
    } else {
        let series = cli_args
            .values_of("series")
            .map(|specs| specs.map(SeriesConfig::from_cli_spec).collect::<CompareResult<Vec<_>>>())
            .unwrap_or_else(|| Ok(Vec::new()))?;
        let coordinates = if cli_args.is_present("phase") {
            Coordinates::PhasePlane
        } else {
            Coordinates::TimeDomain
        };
        FigureSource::Adhoc(FigureConfig {
            title: cli_args.value_of("title").unwrap_or("comparison").to_string(),
            name: None,
            coordinates,
            x_label: None,
            y_label: None,
            legend: !cli_args.is_present("no_legend"),
            grid: !cli_args.is_present("no_grid"),
            series,
        })
    };
    let output = if cli_args.is_present("show") {
        Output::Show {
            viewer: cli_args.value_of("viewer").map(String::from),
        }
    } else {
        let outdir = match cli_args.value_of("outdir") {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(format!("plots_{}", Local::now().format(OUTDIR_STAMP))),
        };
        Output::Save(outdir)
    };
    let format = cli_args.value_of("format").unwrap_or("svg").parse()?;
    Ok(Invocation {
        source,
        output,
        format,
        verbose: cli_args.is_present("verbose"),
    })
}

/// Build the figures of the invocation and render them in order.
/// Figures that fail while loading are reported together with those failing at render time.
pub fn run(invocation: &Invocation) -> CompareResult<RenderReport> {
    let (config, base_dir) = match &invocation.source {
        FigureSource::Config(path) => {
            let config = load_config(path)?;
            let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
            let base_dir = config.base_dir(config_dir);
            (config, base_dir)
        }
        FigureSource::Preset { name, datadir } => (presets::build(name)?, datadir.clone()),
        FigureSource::Adhoc(figure) => (
            BatchConfig {
                data_dir: None,
                figures: vec![figure.clone()],
            },
            PathBuf::from("."),
        ),
    };
    log::debug!("data files are read relative to {}", base_dir.display());

    let mut figures = Vec::new();
    let mut skipped = Vec::new();
    for planned in config.build_figures(&base_dir)? {
        match planned {
            Ok(figure) => figures.push(figure),
            Err(s) => skipped.push(s),
        }
    }

    let mut presenter: Box<dyn Presenter> = match &invocation.output {
        Output::Save(dir) => Box::new(SaveToDir::new(dir.as_path(), invocation.format)?),
        Output::Show { viewer } => Box::new(Viewer::new(viewer.as_deref(), invocation.format)?),
    };
    let mut report = render_all(&figures, presenter.as_mut())?;
    skipped.append(&mut report.skipped);
    report.skipped = skipped;
    Ok(report)
}
