use areamap::render::raster::{self, RasterError, RasterOptions};
use areamap::render::{HeadlessError, MapFormat, MapRenderOptions};
use areamap::stages::{self, RouteOutcome};
use areamap::{Landmarks, PipelineConfig};
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io { path: PathBuf, source: std::io::Error },
    Pipeline(areamap::Error),
    Render(HeadlessError),
    Raster(RasterError),
    NoPath(Landmarks),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io { path, source } => {
                write!(f, "I/O error writing {}: {source}", path.display())
            }
            CliError::Pipeline(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::NoPath(landmarks) => write!(
                f,
                "no path from {} to {}: every route is blocked",
                landmarks.home, landmarks.destination
            ),
        }
    }
}

impl From<areamap::Error> for CliError {
    fn from(value: areamap::Error) -> Self {
        Self::Pipeline(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Prepare,
    Path,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Option<Command>,
    config: Option<PathBuf>,
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    home: Option<String>,
    destination: Option<String>,
    with_path: bool,
    show_regions: bool,
    format: Option<MapFormat>,
    scale: f32,
    background: Option<String>,
    cell_size: Option<f64>,
    title: Option<String>,
    out: Option<PathBuf>,
    verbose: bool,
}

fn usage() -> &'static str {
    "areamap\n\
\n\
USAGE:\n\
  areamap prepare [--input-dir <dir>] [--output-dir <dir>] [--config <file.json>]\n\
  areamap path [--output-dir <dir>] [--home <name>] [--destination <name>] [--config <file.json>]\n\
  areamap render [--with-path] [--show-regions] [--format png|jpg|svg] [--scale <n>] [--background <color>] [--cell-size <n>] [--title <text>] [--out <path>] [--output-dir <dir>] [--config <file.json>]\n\
\n\
GLOBAL FLAGS:\n\
  --verbose    log at debug level (otherwise RUST_LOG, default warn)\n\
\n\
NOTES:\n\
  - prepare merges the source tables, writes area_merged.csv and report.txt, and prints the report.\n\
  - path reads area_merged.csv and writes home_to_cafe.csv; exits with 3 when no path exists.\n\
  - render writes map.png, or map_final.png with --with-path, unless --out is given.\n\
"
}

fn usage_error(msg: impl std::fmt::Display) -> CliError {
    CliError::Usage(format!("{msg}\n\n{}", usage()))
}

fn next_value<'a>(
    it: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a String, CliError> {
    it.next()
        .ok_or_else(|| usage_error(format!("missing value for {flag}")))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage().to_string())),
            "prepare" | "path" | "render" if args.command.is_none() => {
                args.command = Some(match a.as_str() {
                    "prepare" => Command::Prepare,
                    "path" => Command::Path,
                    _ => Command::Render,
                });
            }
            "--config" => args.config = Some(PathBuf::from(next_value(&mut it, a)?)),
            "--input-dir" => args.input_dir = Some(PathBuf::from(next_value(&mut it, a)?)),
            "--output-dir" => args.output_dir = Some(PathBuf::from(next_value(&mut it, a)?)),
            "--home" => args.home = Some(next_value(&mut it, a)?.clone()),
            "--destination" => args.destination = Some(next_value(&mut it, a)?.clone()),
            "--with-path" => args.with_path = true,
            "--show-regions" => args.show_regions = true,
            "--verbose" | "-v" => args.verbose = true,
            "--format" => {
                let fmt = next_value(&mut it, a)?;
                args.format = Some(fmt.parse::<MapFormat>().map_err(usage_error)?);
            }
            "--scale" => {
                let scale = next_value(&mut it, a)?;
                args.scale = scale
                    .parse::<f32>()
                    .map_err(|_| usage_error(format!("invalid --scale value: {scale}")))?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(usage_error(format!("--scale must be positive, got {scale}")));
                }
            }
            "--cell-size" => {
                let size = next_value(&mut it, a)?;
                let parsed = size
                    .parse::<f64>()
                    .map_err(|_| usage_error(format!("invalid --cell-size value: {size}")))?;
                if !(parsed.is_finite() && parsed > 0.0) {
                    return Err(usage_error(format!(
                        "--cell-size must be positive, got {size}"
                    )));
                }
                args.cell_size = Some(parsed);
            }
            "--background" => {
                let bg = next_value(&mut it, a)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--title" => args.title = Some(next_value(&mut it, a)?.clone()),
            "--out" => args.out = Some(PathBuf::from(next_value(&mut it, a)?)),
            other => return Err(usage_error(format!("unexpected argument: {other}"))),
        }
    }

    if args.command.is_none() {
        return Err(usage_error("missing command"));
    }
    Ok(args)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(args: &Args) -> Result<PipelineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &args.input_dir {
        config.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(home) = &args.home {
        config.landmarks.home = home.clone();
    }
    if let Some(destination) = &args.destination {
        config.landmarks.destination = destination.clone();
    }
    Ok(config)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run_prepare(config: &PipelineConfig) -> Result<(), CliError> {
    let prepared = stages::prepare(config)?;
    print!("{}", prepared.report);
    println!("merged grid: {}", prepared.merged_path.display());
    println!("report: {}", prepared.report_path.display());
    Ok(())
}

fn run_path(config: &PipelineConfig) -> Result<(), CliError> {
    match stages::compute_path(config)? {
        RouteOutcome::Found { path, written_to } => {
            println!(
                "path from {} to {}: {} steps",
                path.start(),
                path.end(),
                path.steps()
            );
            println!("path: {}", written_to.display());
            Ok(())
        }
        RouteOutcome::Unreachable => Err(CliError::NoPath(config.landmarks.clone())),
    }
}

fn run_render(config: &PipelineConfig, args: &Args) -> Result<(), CliError> {
    let format = args.format.unwrap_or(MapFormat::Png);
    let mut map = MapRenderOptions {
        show_regions: args.show_regions,
        title: args.title.clone(),
        ..Default::default()
    };
    if let Some(size) = args.cell_size {
        map.cell_size = size;
    }
    let raster_opts = RasterOptions {
        scale: args.scale,
        background: args
            .background
            .clone()
            .or_else(|| RasterOptions::default().background),
        ..Default::default()
    };

    let bytes = match format {
        MapFormat::Svg => {
            areamap::render::render_stage_svg(config, args.with_path, &map)?.into_bytes()
        }
        MapFormat::Png => raster::render_stage_png(config, args.with_path, &map, &raster_opts)?,
        MapFormat::Jpeg => raster::render_stage_jpeg(config, args.with_path, &map, &raster_opts)?,
    };

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| areamap::render::map_output_path(config, args.with_path, format));
    write_bytes(&out, &bytes)?;
    println!("map: {}", out.display());
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    tracing::debug!(
        target: "areamap::cli",
        input_dir = %config.input_dir.display(),
        output_dir = %config.output_dir.display(),
        command = ?args.command,
        "starting stage"
    );
    match args.command {
        Some(Command::Prepare) => run_prepare(&config),
        Some(Command::Path) => run_path(&config),
        Some(Command::Render) => run_render(&config, &args),
        None => Err(usage_error("missing command")),
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::NoPath(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
