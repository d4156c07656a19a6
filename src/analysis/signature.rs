use crate::foundation::error::{LyricDanceError, LyricDanceResult};
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Seconds covered by one energy-curve sample.
pub const ENERGY_WINDOW_SEC: f64 = 0.5;

const FFT_SIZE: usize = 2048;
const FFT_HOP: usize = 4096;

/// Coarse audio signature used by section detection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSignature {
    /// RMS energy per 0.5 s window, normalized so the loudest window is `1`.
    #[serde(default)]
    pub energy_curve: Vec<f64>,
    /// Average spectral centroid in Hz.
    #[serde(default)]
    pub spectral_centroid_hz: f64,
    /// Spectral centroid per 0.5 s window in Hz, aligned with `energy_curve`.
    ///
    /// Empty when only the song average is known; `0` marks a silent window.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub centroid_curve: Vec<f64>,
}

impl SongSignature {
    /// Build a signature from an energy curve and a centroid.
    pub fn new(energy_curve: Vec<f64>, spectral_centroid_hz: f64) -> Self {
        Self {
            energy_curve,
            spectral_centroid_hz,
            centroid_curve: Vec::new(),
        }
    }

    /// Attach a per-window centroid curve.
    pub fn with_centroid_curve(mut self, centroid_curve: Vec<f64>) -> Self {
        self.centroid_curve = centroid_curve;
        self
    }

    /// Analyse mono PCM samples.
    ///
    /// Empty input yields an empty signature. A zero sample rate is rejected.
    #[tracing::instrument(skip(samples), fields(n = samples.len()))]
    pub fn from_pcm(samples: &[f32], sample_rate: u32) -> LyricDanceResult<Self> {
        if sample_rate == 0 {
            return Err(LyricDanceError::analysis("sample rate must be > 0"));
        }
        if samples.is_empty() {
            return Ok(Self::default());
        }

        let window = ((f64::from(sample_rate) * ENERGY_WINDOW_SEC).round() as usize).max(1);
        let mut energy_curve: Vec<f64> = samples
            .chunks(window)
            .map(|chunk| {
                let sum_sq: f64 = chunk.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
                (sum_sq / chunk.len() as f64).sqrt()
            })
            .collect();
        let peak = energy_curve.iter().copied().fold(0.0_f64, f64::max);
        if peak > 0.0 {
            for e in &mut energy_curve {
                *e /= peak;
            }
        }

        let mut analyzer = CentroidAnalyzer::new(sample_rate);
        let spectral_centroid_hz = analyzer.average(samples);
        let centroid_curve: Vec<f64> = samples
            .chunks(window)
            .map(|chunk| analyzer.average(chunk))
            .collect();
        tracing::debug!(
            windows = energy_curve.len(),
            centroid = spectral_centroid_hz,
            "song signature extracted"
        );
        Ok(Self {
            energy_curve,
            spectral_centroid_hz,
            centroid_curve,
        })
    }

    /// Return `true` when no energy samples are present.
    pub fn is_empty(&self) -> bool {
        self.energy_curve.is_empty()
    }

    /// Time in seconds of sample `i`.
    pub fn sample_time(i: usize) -> f64 {
        i as f64 * ENERGY_WINDOW_SEC
    }

    /// Nearest energy sample at `t` (`0` when the curve is empty).
    pub fn energy_at(&self, t: f64) -> f64 {
        if self.energy_curve.is_empty() || !t.is_finite() {
            return 0.0;
        }
        let i = (t.max(0.0) / ENERGY_WINDOW_SEC).floor() as usize;
        self.energy_curve[i.min(self.energy_curve.len() - 1)]
    }

    /// Energy samples whose window start lies in `[a, b)`.
    pub fn samples_in(&self, a: f64, b: f64) -> &[f64] {
        if self.energy_curve.is_empty() || !(a.is_finite() && b.is_finite()) || b <= a {
            return &[];
        }
        let n = self.energy_curve.len();
        let lo = ((a.max(0.0) / ENERGY_WINDOW_SEC).ceil() as usize).min(n);
        let hi = ((b.max(0.0) / ENERGY_WINDOW_SEC).ceil() as usize).min(n);
        &self.energy_curve[lo..hi.max(lo)]
    }

    /// Mean non-silent centroid of the windows starting in `[a, b)`.
    ///
    /// Falls back to the nearest window, then to the song average when no curve is present.
    pub fn centroid_in(&self, a: f64, b: f64) -> f64 {
        let curve = &self.centroid_curve;
        if curve.is_empty() || !(a.is_finite() && b.is_finite()) {
            return self.spectral_centroid_hz;
        }
        let n = curve.len();
        let lo = ((a.max(0.0) / ENERGY_WINDOW_SEC).ceil() as usize).min(n);
        let hi = ((b.max(0.0) / ENERGY_WINDOW_SEC).ceil() as usize).min(n);
        let voiced: Vec<f64> = curve[lo..hi.max(lo)]
            .iter()
            .copied()
            .filter(|c| *c > 0.0)
            .collect();
        if !voiced.is_empty() {
            return voiced.iter().sum::<f64>() / voiced.len() as f64;
        }
        let mid = ((a + b) * 0.5).max(0.0);
        let nearest = curve[((mid / ENERGY_WINDOW_SEC).floor() as usize).min(n - 1)];
        if nearest > 0.0 {
            nearest
        } else {
            self.spectral_centroid_hz
        }
    }
}

struct CentroidAnalyzer {
    fft: std::sync::Arc<dyn rustfft::Fft<f32>>,
    hann: Vec<f32>,
    buf: Vec<Complex<f32>>,
    bin_hz: f64,
}

impl CentroidAnalyzer {
    fn new(sample_rate: u32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let hann = (0..FFT_SIZE)
            .map(|i| {
                0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / (FFT_SIZE as f32 - 1.0)).cos())
            })
            .collect();
        Self {
            fft: planner.plan_fft_forward(FFT_SIZE),
            hann,
            buf: vec![Complex { re: 0.0, im: 0.0 }; FFT_SIZE],
            bin_hz: f64::from(sample_rate) / FFT_SIZE as f64,
        }
    }

    /// Mean centroid over frames hopped through `samples`; `0` when nothing is audible.
    ///
    /// Input shorter than one frame is analysed zero-padded.
    fn average(&mut self, samples: &[f32]) -> f64 {
        let mut acc = 0.0;
        let mut frames = 0usize;
        let mut start = 0usize;
        loop {
            if let Some(c) = self.frame(&samples[start.min(samples.len())..]) {
                acc += c;
                frames += 1;
            }
            start += FFT_HOP;
            if start + FFT_SIZE > samples.len() {
                break;
            }
        }
        if frames == 0 { 0.0 } else { acc / frames as f64 }
    }

    fn frame(&mut self, samples: &[f32]) -> Option<f64> {
        for (i, c) in self.buf.iter_mut().enumerate() {
            *c = Complex {
                re: samples.get(i).copied().unwrap_or(0.0) * self.hann[i],
                im: 0.0,
            };
        }
        self.fft.process(&mut self.buf);

        let mut weighted = 0.0f64;
        let mut total = 0.0f64;
        for (k, c) in self.buf.iter().take(FFT_SIZE / 2).enumerate().skip(1) {
            let mag = f64::from(c.norm());
            weighted += mag * k as f64 * self.bin_hz;
            total += mag;
        }
        (total > 1e-9).then_some(weighted / total)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/signature.rs"]
mod tests;
