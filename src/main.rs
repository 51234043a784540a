//! Tonecheck CLI - spectral anomaly check for a captured test tone
//!
//! Prints the text (or JSON) report for one audio file and exits with 0 on
//! PASS, 1 on FAIL and 2 on any error.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tonecheck::analysis::report::TextReport;
use tonecheck::preprocessing::normalization::NormalizationMethod;
use tonecheck::{analyze_file, AnalysisConfig, AnalysisError, FrequencyScale, PlotTrigger};

/// Check a captured sustained tone for dropouts, clicks and out-of-band spikes
#[derive(Parser, Debug)]
#[command(name = "tonecheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Audio file to analyse (any format Symphonia can decode)
    input: PathBuf,

    /// Analyse at the file's native sample rate instead of resampling
    #[arg(long, conflicts_with = "sample_rate")]
    native_rate: bool,

    /// Sample rate the clip is resampled to before analysis
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,

    /// FFT size in samples
    #[arg(long, default_value_t = 1024)]
    fft_size: usize,

    /// Hop length in samples
    #[arg(long, default_value_t = 512)]
    hop_size: usize,

    /// Frames excluded at the end of the clip
    #[arg(long, default_value_t = 8)]
    frame_skip: usize,

    /// Out-of-band bin magnitude that counts as an error
    #[arg(long)]
    energy_threshold: Option<f32>,

    /// Squared frame-energy deviation that counts as an error
    #[arg(long, default_value_t = 9.0)]
    max_delta_energy_sqr: f32,

    /// Multiple of the fundamental above which energy is out of band
    #[arg(long, default_value_t = 4.0)]
    harmonic_multiple: f32,

    /// Analyse at the recorded level (energy threshold defaults to 0.2)
    #[arg(long)]
    no_normalize: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Spectrogram image path (default: <input>_spectrogram.png)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// When to write the spectrogram image
    #[arg(long, default_value = "never", value_parser = ["never", "on-fail", "always"])]
    plot_when: String,

    /// Frequency axis of the spectrogram image
    #[arg(long, default_value = "log", value_parser = ["linear", "log"])]
    plot_scale: String,
}

impl Cli {
    fn to_config(&self) -> AnalysisConfig {
        let base = if self.no_normalize {
            AnalysisConfig::unnormalized()
        } else {
            AnalysisConfig::default()
        };

        // --plot alone implies always
        let plot_trigger = match self.plot_when.as_str() {
            "on-fail" => PlotTrigger::OnFail,
            "always" => PlotTrigger::Always,
            _ if self.plot.is_some() => PlotTrigger::Always,
            _ => PlotTrigger::Never,
        };

        AnalysisConfig {
            target_sample_rate: if self.native_rate {
                None
            } else {
                Some(self.sample_rate)
            },
            normalization: if self.no_normalize {
                NormalizationMethod::None
            } else {
                NormalizationMethod::Peak
            },
            fft_size: self.fft_size,
            hop_size: self.hop_size,
            frame_skip: self.frame_skip,
            energy_threshold: self.energy_threshold.unwrap_or(base.energy_threshold),
            max_delta_energy_sqr: self.max_delta_energy_sqr,
            harmonic_multiple: self.harmonic_multiple,
            plot_trigger,
            plot_scale: match self.plot_scale.as_str() {
                "linear" => FrequencyScale::Linear,
                _ => FrequencyScale::Log,
            },
        }
    }
}

/// `sounds/tone.wav` → `sounds/tone_spectrogram.png`
fn default_plot_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tonecheck".to_string());
    input.with_file_name(format!("{}_spectrogram.png", stem))
}

fn run(cli: &Cli) -> Result<bool, AnalysisError> {
    let config = cli.to_config();
    let analysis = analyze_file(&cli.input, &config)?;
    let report = &analysis.report;

    if cli.json {
        let json = serde_json::to_string_pretty(report).map_err(|e| {
            AnalysisError::ProcessingError(format!("JSON serialization failed: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", TextReport(report));
    }

    let failed = !report.verdict.is_pass();
    if config.plot_trigger.should_plot(failed) {
        let path = cli
            .plot
            .clone()
            .unwrap_or_else(|| default_plot_path(&cli.input));
        tonecheck::plot::render_spectrogram_png(&analysis.spectrogram, config.plot_scale, &path)?;
        log::info!("Spectrogram written to {}", path.display());
    }

    Ok(!failed)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
