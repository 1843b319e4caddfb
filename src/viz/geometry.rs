//! Chart-independent shapes: histogram bins, density curve, box-plot
//! statistics and the heatmap colour ramp.

use plotters::style::RGBColor;

use crate::stats::{quantile, sample_std, IqrFences};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Equal-width bins spanning the data; the last bin is closed on the right.
/// A constant sample gets a unit-wide range centred on its value.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let (mut lo, mut hi) = min_max(values);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate sampled at `points` evenly spaced
/// positions across the data range, bandwidth by Scott's rule.
pub fn kde_curve(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let Some(std) = sample_std(values) else {
        return Vec::new();
    };
    if std == 0.0 || points < 2 {
        return Vec::new();
    }
    let n = values.len() as f64;
    let bw = std * n.powf(-0.2);
    let norm = n * bw * (2.0 * std::f64::consts::PI).sqrt();
    let (lo, hi) = min_max(values);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bw).powi(2)).exp())
                .sum::<f64>()
                / norm;
            (x, density)
        })
        .collect()
}

/// Box, median, whiskers reaching the furthest points inside the IQR fences,
/// and the points beyond them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_lo: f64,
    pub whisker_hi: f64,
    pub fliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let fences = IqrFences::from_sorted(&sorted)?;
        let median = quantile(&sorted, 0.5)?;

        let inside: Vec<f64> = sorted.iter().copied().filter(|v| fences.contains(*v)).collect();
        let fliers = sorted.iter().copied().filter(|v| !fences.contains(*v)).collect();
        Some(Self {
            q1: fences.q1,
            median,
            q3: fences.q3,
            whisker_lo: inside.first().copied().unwrap_or(fences.q1),
            whisker_hi: inside.last().copied().unwrap_or(fences.q3),
            fliers,
        })
    }

    /// Horizontal extent including fliers.
    pub fn span(&self) -> (f64, f64) {
        let lo = self.fliers.iter().copied().fold(self.whisker_lo, f64::min);
        let hi = self.fliers.iter().copied().fold(self.whisker_hi, f64::max);
        (lo, hi)
    }
}

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Diverging blue-grey-red ramp over `[-1, 1]`; NaN is a flat grey.
pub fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(160, 160, 160);
    }
    let t = (value.clamp(-1.0, 1.0) + 1.0) / 2.0;
    let (from, to, f) = if t < 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Smallest and largest value; callers guarantee a non-empty slice.
pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}
