use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miny::{
    BarcodeOptions, ColorSample, FfmpegLogLevel, LayoutKind, ProgressInfo, RunObserver, Session,
    VideoFile,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  miny probe input.mp4 --json\n  miny generate input.mp4 --out miny.png --progress\n  miny generate input.mp4 --out strip.png --layout strip --palette colors.json\n  miny completions zsh > _miny";

#[derive(Debug, Parser)]
#[command(
    name = "miny",
    version,
    about = "Turn a video into a colour barcode",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar while sampling.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print source metadata.
    #[command(
        about = "Print video metadata",
        visible_alias = "info",
        after_help = "Examples:\n  miny probe input.mp4\n  miny probe input.mp4 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Sample the video and paint a barcode.
    #[command(
        about = "Generate a colour barcode",
        after_help = "Examples:\n  miny generate input.mp4 --out miny.png\n  miny generate input.mp4 --out bars.png --layout linear --frames 120 --size 1200x300\n  miny generate input.mp4 --out grid.png --layout grid --progress"
    )]
    Generate {
        /// Input video path.
        input: PathBuf,
        /// Output image path (format from extension).
        #[arg(long)]
        out: PathBuf,
        /// Layout preset: hex | linear | strip | grid.
        #[arg(long, default_value = "hex")]
        layout: String,
        /// Number of frames to sample.
        #[arg(long)]
        frames: Option<usize>,
        /// Frames fetched per batch.
        #[arg(long)]
        batch: Option<usize>,
        /// Raster size as WIDTHxHEIGHT.
        #[arg(long)]
        size: Option<String>,
        /// Also write the colour sequence as JSON.
        #[arg(long)]
        palette: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_preset(value: &str) -> Option<BarcodeOptions> {
    match value.to_ascii_lowercase().as_str() {
        "strip" | "batched" => Some(BarcodeOptions::strip()),
        other => LayoutKind::parse(other).map(BarcodeOptions::for_layout),
    }
}

fn parse_size(value: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let (width, height) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or(format!("invalid size: {value} (expected WIDTHxHEIGHT)"))?;
    let width = width.trim().parse::<u32>()?;
    let height = height.trim().parse::<u32>()?;
    if width == 0 || height == 0 {
        return Err(format!("invalid size: {value} (dimensions must be positive)").into());
    }
    Ok((width, height))
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    FfmpegLogLevel::parse(value)
}

fn format_eta(seconds: Option<f64>) -> String {
    match seconds {
        Some(seconds) => format!("~{}s left", seconds.round() as u64),
        None => "estimating".to_string(),
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        miny::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

/// Forwards run updates to the terminal.
struct TerminalObserver {
    bar: Option<ProgressBar>,
    verbose: bool,
    error: Mutex<Option<String>>,
}

impl TerminalObserver {
    fn new(show_progress: bool, verbose: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = if show_progress {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
            )?;
            bar.set_style(style.progress_chars("##-"));
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };

        Ok(Self {
            bar,
            verbose,
            error: Mutex::new(None),
        })
    }

    fn take_error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }
}

impl RunObserver for TerminalObserver {
    fn on_progress(&self, colors: &[ColorSample], info: &ProgressInfo) {
        if let Some(bar) = &self.bar {
            bar.set_length(info.total as u64);
            bar.set_position(info.completed as u64);
            bar.set_message(format_eta(info.estimated_seconds_remaining()));
        }
        if self.verbose {
            if let Some(color) = colors.last() {
                let line = format!("sample {}/{} {color}", info.completed, info.total);
                match &self.bar {
                    Some(bar) => bar.println(line),
                    None => eprintln!("{line}"),
                }
            }
        }
    }

    fn on_error(&self, message: &str) {
        *self
            .error
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(message.to_string());
    }

    fn on_processing_change(&self, processing: bool) {
        if let (false, Some(bar)) = (processing, &self.bar) {
            bar.finish_and_clear();
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Probe { input, json } => {
            let metadata = VideoFile::probe(&input)?;
            if json {
                let payload = json!({
                    "format": metadata.format,
                    "codec": metadata.codec,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "duration_in_frames": metadata.duration_in_frames,
                    "fps": metadata.frames_per_second,
                    "width": metadata.width,
                    "height": metadata.height,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                println!(
                    "Video: {}x{} @ {:.2} fps [{}], ~{} frames",
                    metadata.width,
                    metadata.height,
                    metadata.frames_per_second,
                    metadata.codec,
                    metadata.duration_in_frames,
                );
            }
        }
        Commands::Generate {
            input,
            out,
            layout,
            frames,
            batch,
            size,
            palette,
        } => {
            let mut options =
                parse_preset(&layout).ok_or(format!("unsupported --layout: {layout}"))?;
            if let Some(frames) = frames {
                options = options.with_frame_count(frames);
            }
            if let Some(batch) = batch {
                options = options.with_batch_size(batch);
            }
            if let Some(size) = &size {
                let (width, height) = parse_size(size)?;
                options = options.with_raster_size(width, height);
            }
            options.validate()?;

            ensure_writable_path(&out, cli.global.overwrite)?;
            if let Some(palette) = &palette {
                ensure_writable_path(palette, cli.global.overwrite)?;
            }

            if cli.global.verbose {
                eprintln!("{} {options:?}", "options".cyan().bold());
            }

            let video = VideoFile::open(&input)?;
            let observer = TerminalObserver::new(cli.global.progress, cli.global.verbose)?;
            let session = Session::new();

            let Some(barcode) = session.run(video, &options, &observer) else {
                let message = observer
                    .take_error()
                    .unwrap_or_else(|| "run was cancelled".to_string());
                return Err(message.into());
            };

            barcode.raster.save(&out)?;
            println!("{} {}", "saved".green().bold(), out.display());

            if let Some(palette) = palette {
                let payload = json!({
                    "source": input.display().to_string(),
                    "layout": format!("{:?}", options.layout()),
                    "colors": barcode.color_strings(),
                });
                fs::write(&palette, serde_json::to_string_pretty(&payload)?)?;
                println!("{} {}", "saved".green().bold(), palette.display());
            }

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Sampled {} colour(s)", barcode.colors.len()).green()
            );
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "miny", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
