//! Epoch-averaged ADC time-course figures.
//!
//! Draws the mean time course over all stimulation epochs, the way the
//! block-design figure of a diffusion fMRI paper looks: a shaded stimulus-on
//! window, the epoch mean with either per-sample error bars or a 95%
//! confidence band, and a dashed reference line at baseline level 1. The
//! chart is drawn glyph-only; no text is rendered.

use ndarray::{Array2, Axis};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use std::path::Path;

use crate::error::{DfmriError, Result};

/// Spread annotation around the epoch mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EpochAnnotation {
    /// Per-sample error bars of one standard deviation.
    Std,
    /// Shaded 95% confidence band of the mean (Student t).
    Ci95,
}

/// Settings of the epoch figure.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Seconds between consecutive samples of an epoch (the TR).
    pub sample_period_s: f64,
    /// Time at which the stimulus switches off, in seconds from epoch start.
    pub stim_off_s: f64,
    /// Output bitmap size in pixels.
    pub size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> PlotConfig {
        PlotConfig {
            sample_period_s: 2.0,
            stim_off_s: 12.0,
            size: (800, 600),
        }
    }
}


/// Draw the epoch-averaged time course into a bitmap file.
///
/// `epochs` is the `(n_epochs, epoch_len)` matrix produced by
/// [`crate::epoch::reshape_by_epoch`], typically baseline-normalized first.
pub fn plot_epoch_timecourse<P: AsRef<Path>>(
    epochs: &Array2<f64>,
    annotation: EpochAnnotation,
    cfg: &PlotConfig,
    path: P,
) -> Result<()> {
    let n_epochs = epochs.nrows();
    let epoch_len = epochs.ncols();
    if n_epochs == 0 || epoch_len == 0 {
        return Err(DfmriError::EmptyInput);
    }
    if annotation == EpochAnnotation::Ci95 && n_epochs < 2 {
        return Err(DfmriError::TooFewEpochs(n_epochs));
    }

    let mean = epochs.mean_axis(Axis(0)).ok_or(DfmriError::EmptyInput)?;
    let xs: Vec<f64> = (0..epoch_len)
        .map(|i| i as f64 * cfg.sample_period_s)
        .collect();

    let (lower, upper): (Vec<f64>, Vec<f64>) = match annotation {
        EpochAnnotation::Std => {
            let std = epochs.std_axis(Axis(0), 0.0);
            mean.iter()
                .zip(std.iter())
                .map(|(&m, &s)| (m - s, m + s))
                .unzip()
        }
        EpochAnnotation::Ci95 => {
            // standard error of the mean with the sample std (ddof = 1)
            let std = epochs.std_axis(Axis(0), 1.0);
            let t_crit = t_critical_975(n_epochs - 1);
            mean.iter()
                .zip(std.iter())
                .map(|(&m, &s)| {
                    let half_width = t_crit * s / (n_epochs as f64).sqrt();
                    (m - half_width, m + half_width)
                })
                .unzip()
        }
    };

    let y_min = lower.iter().cloned().fold(f64::INFINITY, f64::min);
    let y_max = upper.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + 1e-4;
    if !y_min.is_finite() || !y_max.is_finite() {
        return Err(DfmriError::EmptyInput);
    }
    let x_max = epoch_len as f64 * cfg.sample_period_s;

    let root = BitMapBackend::new(path.as_ref(), cfg.size).into_drawing_area();
    let to_render = |e: DrawingAreaErrorKind<_>| DfmriError::Render(e.to_string());

    root.fill(&WHITE).map_err(to_render)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(to_render)?;

    // stimulus windows: dark while on, light after switch-off
    let stim_off = cfg.stim_off_s.clamp(0.0, x_max);
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(0.0, y_min), (stim_off, y_max)],
            RGBColor(110, 110, 110).mix(0.5).filled(),
        )))
        .map_err(to_render)?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(stim_off, y_min), (x_max, y_max)],
            BLACK.mix(0.1).filled(),
        )))
        .map_err(to_render)?;

    // baseline reference at 1.0
    if y_min <= 1.0 && 1.0 <= y_max {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(0.0, 1.0), (x_max, 1.0)],
                6,
                4,
                BLACK.stroke_width(1),
            ))
            .map_err(to_render)?;
    }

    let points: Vec<(f64, f64)> = xs.iter().cloned().zip(mean.iter().cloned()).collect();
    match annotation {
        EpochAnnotation::Std => {
            chart
                .draw_series(
                    xs.iter()
                        .zip(lower.iter())
                        .zip(mean.iter())
                        .zip(upper.iter())
                        .map(|(((&x, &lo), &m), &hi)| {
                            ErrorBar::new_vertical(x, lo, m, hi, BLACK.filled(), 6)
                        }),
                )
                .map_err(to_render)?;
            chart
                .draw_series(LineSeries::new(points.clone(), &BLACK))
                .map_err(to_render)?;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, BLACK.filled())),
                )
                .map_err(to_render)?;
        }
        EpochAnnotation::Ci95 => {
            let band: Vec<(f64, f64)> = xs
                .iter()
                .zip(upper.iter())
                .map(|(&x, &hi)| (x, hi))
                .chain(
                    xs.iter()
                        .zip(lower.iter())
                        .rev()
                        .map(|(&x, &lo)| (x, lo)),
                )
                .collect();
            chart
                .draw_series(std::iter::once(Polygon::new(band, BLUE.mix(0.1))))
                .map_err(to_render)?;
            chart
                .draw_series(LineSeries::new(points, &BLUE))
                .map_err(to_render)?;
        }
    }

    root.present().map_err(to_render)?;
    Ok(())
}


/// Two-sided 97.5% critical value of the Student t distribution.
///
/// Table lookup for small degrees of freedom, the normal limit beyond.
pub fn t_critical_975(df: usize) -> f64 {
    const TABLE: [f64; 30] = [
        12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179,
        2.160, 2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064,
        2.060, 2.056, 2.052, 2.048, 2.045, 2.042,
    ];
    match df {
        0 => f64::INFINITY,
        1..=30 => TABLE[df - 1],
        31..=40 => 2.021,
        41..=60 => 2.000,
        61..=120 => 1.980,
        _ => 1.960,
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn critical_values_shrink_towards_the_normal_limit() {
        assert!(t_critical_975(1) > t_critical_975(2));
        assert!(t_critical_975(10) > t_critical_975(30));
        assert!(t_critical_975(30) > 1.960);
        assert_eq!(1.960, t_critical_975(1000));
        assert!(t_critical_975(0).is_infinite());
    }

    #[test]
    fn a_single_epoch_cannot_carry_a_confidence_band() {
        let epochs = Array2::from_elem((1, 15), 1.0);
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ci.png");
        let result = plot_epoch_timecourse(
            &epochs,
            EpochAnnotation::Ci95,
            &PlotConfig::default(),
            &target,
        );
        assert!(result.is_err());
    }
}
