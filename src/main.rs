use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use blockfir::config::FilterConfig;
use blockfir::signal_processing::{FilterKind, Window, filter_in_blocks, response_db};
use blockfir::{read_wav, save_wav};

#[derive(Parser, Debug)]
#[command(name = "blockfir")]
#[command(about = "Design windowed-sinc FIR filters and stream WAV files through them", long_about = None)]
struct Cli {
    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the designed kernel taps
    Design {
        #[command(flatten)]
        design: DesignArgs,

        /// Output format: text, json
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the magnitude response of the designed kernel
    Response {
        #[command(flatten)]
        design: DesignArgs,

        /// Number of frequencies from DC to Nyquist
        #[arg(short = 'p', long, default_value_t = 33)]
        points: usize,

        /// Output format: text, json
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Filter every channel of a WAV file block by block
    Filter {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file (32-bit float)
        output: PathBuf,

        #[command(flatten)]
        design: DesignArgs,

        /// Frames per block (overrides the config file)
        #[arg(short = 'b', long)]
        block_size: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct DesignArgs {
    /// TOML filter configuration file (flags below are ignored when given)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Filter class
    #[arg(short = 'k', long, value_enum, default_value = "lowpass")]
    kind: KindArg,

    /// Normalized cutoff for lowpass/highpass (fraction of sample rate)
    #[arg(long, default_value_t = 0.1)]
    cutoff: f32,

    /// Bandpass lowpass-prototype cutoff (upper band edge)
    #[arg(long, default_value_t = 0.2)]
    lowpass_cutoff: f32,

    /// Bandpass highpass-prototype cutoff (lower band edge)
    #[arg(long, default_value_t = 0.05)]
    highpass_cutoff: f32,

    /// Half length h; windowed designs have 2h+1 taps
    #[arg(long, default_value_t = 16)]
    half_length: usize,

    /// Kernel length for the mean filter
    #[arg(long, default_value_t = 8)]
    length: usize,

    /// Window applied to windowed-sinc designs
    #[arg(short = 'w', long, value_enum, default_value = "hamming")]
    window: Window,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum KindArg {
    Mean,
    Lowpass,
    Highpass,
    Bandpass,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct KernelReport<'a> {
    filter: FilterKind,
    num_taps: usize,
    group_delay_samples: usize,
    taps: &'a [f32],
}

#[derive(Debug, Serialize)]
struct ResponsePoint {
    frequency: f32,
    magnitude_db: f32,
}

impl DesignArgs {
    fn filter_kind(&self) -> FilterKind {
        match self.kind {
            KindArg::Mean => FilterKind::Mean {
                length: self.length,
            },
            KindArg::Lowpass => FilterKind::Lowpass {
                cutoff: self.cutoff,
                half_length: self.half_length,
                window: self.window,
            },
            KindArg::Highpass => FilterKind::Highpass {
                cutoff: self.cutoff,
                half_length: self.half_length,
                window: self.window,
            },
            KindArg::Bandpass => FilterKind::Bandpass {
                lowpass_cutoff: self.lowpass_cutoff,
                highpass_cutoff: self.highpass_cutoff,
                half_length: self.half_length,
                window: self.window,
            },
        }
    }

    fn resolve(&self) -> Result<FilterConfig> {
        let config = match &self.config {
            Some(path) => FilterConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => FilterConfig {
                filter: self.filter_kind(),
                ..FilterConfig::default()
            },
        };
        if let Err(e) = config.validate() {
            log::warn!("Rejected filter design {:?}: {}", config.filter, e);
            return Err(e).context("Invalid filter design");
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Command::Design { design, format } => run_design(&design, format),
        Command::Response {
            design,
            points,
            format,
        } => run_response(&design, points, format),
        Command::Filter {
            input,
            output,
            design,
            block_size,
        } => run_filter(&input, &output, &design, block_size),
    }
}

fn run_design(design: &DesignArgs, format: OutputFormat) -> Result<()> {
    let config = design.resolve()?;
    let filter = config.build().context("Failed to design filter")?;

    match format {
        OutputFormat::Text => {
            println!("{:?}", config.filter);
            println!(
                "{} taps, group delay {} samples",
                filter.num_taps(),
                filter.group_delay_samples()
            );
            for (i, tap) in filter.taps().iter().enumerate() {
                println!("{:>5} {:>14.8}", i, tap);
            }
        }
        OutputFormat::Json => {
            let report = KernelReport {
                filter: config.filter,
                num_taps: filter.num_taps(),
                group_delay_samples: filter.group_delay_samples(),
                taps: filter.taps(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize kernel")?
            );
        }
    }
    Ok(())
}

fn run_response(design: &DesignArgs, points: usize, format: OutputFormat) -> Result<()> {
    let config = design.resolve()?;
    let filter = config.build().context("Failed to design filter")?;
    let response = response_db(filter.taps(), points);

    match format {
        OutputFormat::Text => {
            println!("{:<12} {:<15}", "Freq (fs)", "Magnitude (dB)");
            println!("{}", "-".repeat(28));
            for (f, db) in response {
                println!("{:<12.4} {:<15.2}", f, db);
            }
        }
        OutputFormat::Json => {
            let points: Vec<ResponsePoint> = response
                .into_iter()
                .map(|(frequency, magnitude_db)| ResponsePoint {
                    frequency,
                    magnitude_db,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&points).context("Failed to serialize response")?
            );
        }
    }
    Ok(())
}

fn run_filter(
    input: &Path,
    output: &Path,
    design: &DesignArgs,
    block_size: Option<usize>,
) -> Result<()> {
    let mut config = design.resolve()?;
    if let Some(block_size) = block_size {
        config.block_size = block_size;
    }

    let data = read_wav(input).with_context(|| format!("Failed to read {}", input.display()))?;
    config.channels = data.channels as usize;
    log::info!(
        "{}: {} frames, {} channels, {} Hz",
        input.display(),
        data.frames(),
        data.channels,
        data.sample_rate
    );

    let mut filter = config.build().context("Failed to design filter")?;
    let filtered = filter_in_blocks(&mut filter, &data.samples, config.block_size)
        .context("Failed to filter samples")?;

    save_wav(output, &filtered, data.channels, data.sample_rate)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!(
        "Filtered {} frames in blocks of {} through {} taps -> {}",
        data.frames(),
        config.block_size,
        filter.num_taps(),
        output.display()
    );
    Ok(())
}
