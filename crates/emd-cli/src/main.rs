//! CLI front-end for `emd-core` (§4.I).
//!
//! Thin by design: argument parsing, CSV I/O, and subcommand dispatch only.
//! All decomposition logic lives in the `emd-core` library crate.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use emd_core::{
    bemd, ceemdan, eemd, emd, BemdConfig, CeemdanConfig, Complex64, EemdConfig, EmdConfig,
};

/// CLI entrypoint.
#[derive(Parser)]
#[command(name = "emd", about = "Empirical Mode Decomposition family CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plain EMD over a real-valued signal.
    Emd(EmdArgs),
    /// Ensemble EMD: average EMD over Gaussian-noise-perturbed realisations.
    Eemd(EemdArgs),
    /// Complete ensemble EMD with adaptive noise.
    Ceemdan(CeemdanArgs),
    /// Bivariate EMD over a complex-valued signal and a set of projection directions.
    Bemd(BemdArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to a CSV file, one sample per line.
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Path to write the IMF matrix CSV to (defaults to stdout).
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Number of IMF rows to produce; 0 uses the default rule (§3).
    #[arg(short = 'm', long, default_value_t = 0)]
    modes: usize,
}

#[derive(Args, Debug)]
struct SiftArgs {
    /// S-number stopping criterion; 0 disables it.
    #[arg(long, default_value_t = 4)]
    s_number: u32,

    /// Fixed sift iteration cap; 0 disables it.
    #[arg(long, default_value_t = 0)]
    num_siftings: u32,

    /// Diagnostic iteration bound for the divergence warning.
    #[arg(long, default_value_t = 10_000)]
    max_sift_iterations: u32,
}

impl From<&SiftArgs> for EmdConfig {
    fn from(a: &SiftArgs) -> Self {
        EmdConfig {
            s_number: a.s_number,
            num_siftings: a.num_siftings,
            max_sift_iterations: a.max_sift_iterations,
        }
    }
}

#[derive(Args, Debug)]
struct EmdArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    sift: SiftArgs,
}

#[derive(Args, Debug)]
struct EnsembleArgs {
    /// Number of ensemble realisations.
    #[arg(long, default_value_t = 100)]
    ensemble_size: usize,

    /// Gaussian noise standard deviation as a multiple of the input's stddev.
    #[arg(long, default_value_t = 0.2)]
    noise_strength: f64,

    /// Base RNG seed; ensemble member `i` draws from `seed(rng_seed + i)`.
    #[arg(long, default_value_t = 0)]
    rng_seed: u64,
}

#[derive(Args, Debug)]
struct EemdArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    sift: SiftArgs,
    #[command(flatten)]
    ensemble: EnsembleArgs,
}

#[derive(Args, Debug)]
struct CeemdanArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    sift: SiftArgs,
    #[command(flatten)]
    ensemble: EnsembleArgs,
}

#[derive(Args, Debug)]
struct BemdArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Fixed sift iteration count per IMF.
    #[arg(long, default_value_t = 10)]
    num_siftings: u32,

    /// Number of evenly spaced projection directions over `[0, 2*pi)`.
    #[arg(long, default_value_t = 64)]
    num_directions: usize,

    /// Reduce the direction loop with rayon instead of running it sequentially.
    #[arg(long)]
    parallel_directions: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Emd(args) => run_emd(args),
        Commands::Eemd(args) => run_eemd(args),
        Commands::Ceemdan(args) => run_ceemdan(args),
        Commands::Bemd(args) => run_bemd(args),
    }
}

fn run_emd(args: &EmdArgs) -> Result<()> {
    let input = read_real_csv(&args.common.input)?;
    let config: EmdConfig = (&args.sift).into();
    let out = emd(&input, &config, args.common.modes).context("emd failed")?;
    write_real_matrix(&out, args.common.output.as_deref())
}

fn run_eemd(args: &EemdArgs) -> Result<()> {
    let input = read_real_csv(&args.common.input)?;
    let config = EemdConfig {
        base: (&args.sift).into(),
        ensemble_size: args.ensemble.ensemble_size,
        noise_strength: args.ensemble.noise_strength,
        rng_seed: args.ensemble.rng_seed,
    };
    let out = eemd(&input, &config, args.common.modes).context("eemd failed")?;
    write_real_matrix(&out, args.common.output.as_deref())
}

fn run_ceemdan(args: &CeemdanArgs) -> Result<()> {
    let input = read_real_csv(&args.common.input)?;
    let config = CeemdanConfig {
        base: (&args.sift).into(),
        ensemble_size: args.ensemble.ensemble_size,
        noise_strength: args.ensemble.noise_strength,
        rng_seed: args.ensemble.rng_seed,
    };
    let out = ceemdan(&input, &config, args.common.modes).context("ceemdan failed")?;
    write_real_matrix(&out, args.common.output.as_deref())
}

fn run_bemd(args: &BemdArgs) -> Result<()> {
    let input = read_complex_csv(&args.common.input)?;
    let config = BemdConfig::uniform(args.num_directions, args.num_siftings);
    let config = BemdConfig {
        parallel_directions: args.parallel_directions,
        ..config
    };
    let out = bemd(&input, &config, args.common.modes).context("bemd failed")?;
    write_complex_matrix(&out, args.common.output.as_deref())
}

/// Read one real sample per line from `path`.
fn read_real_csv(path: &PathBuf) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            l.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid sample: {l:?}"))
        })
        .collect()
}

/// Read `re,im` pairs, one per line, from `path`.
fn read_complex_csv(path: &PathBuf) -> Result<Vec<Complex64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            let mut parts = l.trim().splitn(2, ',');
            let re: f64 = parts
                .next()
                .with_context(|| format!("missing real part: {l:?}"))?
                .trim()
                .parse()
                .with_context(|| format!("invalid real part: {l:?}"))?;
            let im: f64 = parts
                .next()
                .unwrap_or("0")
                .trim()
                .parse()
                .with_context(|| format!("invalid imaginary part: {l:?}"))?;
            Ok(Complex64::new(re, im))
        })
        .collect()
}

fn write_real_matrix(out: &emd_core::Array2<f64>, output: Option<&std::path::Path>) -> Result<()> {
    let mut buf = String::new();
    for row in out.rows() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        buf.push_str(&line);
        buf.push('\n');
    }
    write_output(&buf, output)
}

fn write_complex_matrix(
    out: &emd_core::Array2<Complex64>,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let mut buf = String::new();
    for row in out.rows() {
        let line = row
            .iter()
            .map(|v| format!("{},{}", v.re, v.im))
            .collect::<Vec<_>>()
            .join(";");
        buf.push_str(&line);
        buf.push('\n');
    }
    write_output(&buf, output)
}

fn write_output(buf: &str, output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, buf)
                .with_context(|| format!("failed to write output file {}", path.display()))?;
        }
        None => {
            std::io::stdout().write_all(buf.as_bytes())?;
        }
    }
    Ok(())
}
