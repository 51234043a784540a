//! Plain-text report rendering
//!
//! The text report is the tool's primary output. Rendering is a pure function
//! of the [`AnomalyReport`], so identical input gives identical bytes.

use super::result::AnomalyReport;
use std::fmt;

/// Format seconds as `H:MM:SS[.ffffff]`
///
/// The fractional part is omitted for whole seconds.
///
/// # Example
///
/// ```
/// use tonecheck::analysis::report::format_timestamp;
///
/// assert_eq!(format_timestamp(0.96), "0:00:00.960000");
/// assert_eq!(format_timestamp(3725.0), "1:02:05");
/// ```
pub fn format_timestamp(seconds: f32) -> String {
    let micros = (seconds.max(0.0) as f64 * 1e6).round() as u64;
    let whole = micros / 1_000_000;
    let frac = micros % 1_000_000;
    let (h, m, s) = (whole / 3600, (whole / 60) % 60, whole % 60);

    if frac == 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}:{:02}.{:06}", h, m, s, frac)
    }
}

/// Text view of an [`AnomalyReport`]
///
/// Sections: clip summary, fundamental, one line per variance error, energy
/// statistics, one line per harmonic error, and the verdict line last.
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a>(pub &'a AnomalyReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let clip = &report.clip;

        writeln!(f, "Sample Rate: {}", clip.sample_rate)?;
        writeln!(f, "Length (H:M:S): {}", format_timestamp(clip.duration_seconds))?;
        writeln!(f, "Time (seconds) of last sample: {:.2}", clip.duration_seconds)?;
        writeln!(f, "Time (seconds) of last frame:  {:.2}", clip.last_frame_seconds)?;
        writeln!(f, "Frequency (Hz) of last bin:   {:.0}", clip.last_bin_hz)?;
        writeln!(f, "Time (samples): {}", clip.num_samples)?;
        writeln!(f, "Number of frames: {}", clip.num_frames)?;
        writeln!(f, "Number of bins: {}", clip.num_bins)?;
        writeln!(f)?;

        writeln!(
            f,
            "Approx. Fundamental: {:.1}Hz, Max Allowed Freq: {:.1}Hz, Energy Error Threshold: {:.2}",
            report.fundamental_hz, report.max_allowed_hz, report.energy_threshold
        )?;
        writeln!(f)?;
        writeln!(f, "Ave. Frame Energy: {:.3}", report.average_frame_energy)?;

        for err in &report.variance_errors {
            writeln!(
                f,
                "*** DeltaE Error: {} : {:.1}",
                format_timestamp(err.time_seconds),
                err.deviation
            )?;
        }

        writeln!(
            f,
            "Energy Standard Deviation: {:.1}, MaxErrorFrameE/SD: {:.1}",
            report.energy_std_dev, report.deviation_to_std_ratio
        )?;

        for err in &report.harmonic_errors {
            writeln!(
                f,
                "*** Error Time {}: AveFreq: {:.1}Hz, MaxFreq: {:.1}Hz, MaxErrorEnergy: {:.3}",
                format_timestamp(err.time_seconds),
                err.average_frequency,
                err.max_frequency,
                err.max_energy
            )?;
        }

        writeln!(f)?;
        writeln!(f, "{}", report.verdict)
    }
}

/// Render the full text report
pub fn render_text(report: &AnomalyReport) -> String {
    TextReport(report).to_string()
}
