//! Modified Bark-scale band table.
//!
//! Higher frequencies are compressed into fewer bands than a true Bark scale
//! would give them. The constants below are empirical and have no derivation
//! beyond "looks right on the matrix".

use crate::{bin_frequency, error::DspError, Bands, N_BANDS, N_BINS};

/// Reference frequency of the Bark approximation.
pub const BARK_REFERENCE_FREQUENCY: f32 = 600.0;
/// Divisor turning the reference frequency into the sinh curve multiplier.
pub const BARK_BASE_DIVISOR: f32 = 3.3;
/// Offset added to the 6.0 Bark divisor when computing the step.
pub const BARK_STEP_OFFSET: f32 = 1.7;

const FIRST_BIN: usize = 1;

/// Upper frequency bound of every band.
///
/// `threshold[i] = (reference / 3.3) · sinh(step · (i + 1) / 6)` with
/// `step = (6 + 1.7) · asinh(sample_rate / 2 / reference) / N_BANDS`.
/// The asinh argument divides by `reference` itself, not by the scaled
/// base frequency; the latter makes the curve so steep that the top three
/// bands stay empty.
/// With these constants the last threshold always lies above Nyquist, so
/// every band receives bins.
pub fn bark_thresholds(sample_rate: f32, reference_frequency: f32) -> Bands {
    let base_frequency = reference_frequency / BARK_BASE_DIVISOR;
    let step = (6.0 + BARK_STEP_OFFSET) * libm::asinhf(sample_rate / 2.0 / reference_frequency)
        / N_BANDS as f32;
    let mut thresholds = [0.0; N_BANDS];
    for (i, threshold) in thresholds.iter_mut().enumerate() {
        *threshold = base_frequency * libm::sinhf(step * (i + 1) as f32 / 6.0);
    }
    thresholds
}

/// Thresholds plus the contiguous FFT bin range `[start, end)` owned by each band.
#[derive(Clone, Debug, PartialEq)]
pub struct BarkBandTable {
    thresholds: Bands,
    band_ranges: [(u16, u16); N_BANDS],
}

impl BarkBandTable {
    pub fn new(sample_rate: f32, reference_frequency: f32) -> Result<Self, DspError> {
        Self::from_thresholds(sample_rate, bark_thresholds(sample_rate, reference_frequency))
    }

    /// Assign bins 1..N_BINS to bands by walking the thresholds forward.
    ///
    /// The band index only ever advances. A bin above the last threshold is a
    /// configuration fault.
    pub fn from_thresholds(sample_rate: f32, thresholds: Bands) -> Result<Self, DspError> {
        let mut band_ranges = [(N_BINS as u16, N_BINS as u16); N_BANDS];
        let mut band = 0;
        let mut start = FIRST_BIN;

        for bin in FIRST_BIN..N_BINS {
            let frequency = bin_frequency(bin, sample_rate);
            while frequency > thresholds[band] {
                if band == N_BANDS - 1 {
                    return Err(DspError::BandOverflow {
                        bin,
                        frequency_hz: frequency as u32,
                    });
                }
                band_ranges[band] = (start as u16, bin as u16);
                start = bin;
                band += 1;
            }
        }
        band_ranges[band] = (start as u16, N_BINS as u16);

        Ok(Self {
            thresholds,
            band_ranges,
        })
    }

    pub fn thresholds(&self) -> &Bands {
        &self.thresholds
    }

    pub fn band_ranges(&self) -> &[(u16, u16); N_BANDS] {
        &self.band_ranges
    }

    /// Band whose threshold range contains `frequency`.
    pub fn band_of_frequency(&self, frequency: f32) -> Option<usize> {
        self.thresholds.iter().position(|&t| frequency <= t)
    }

    /// Sum the magnitudes of every bin into its band.
    pub fn accumulate(&self, magnitude: &[f32; N_BINS], bands: &mut Bands) {
        for (band, &(start, end)) in bands.iter_mut().zip(self.band_ranges.iter()) {
            *band = magnitude[start as usize..end as usize].iter().sum();
        }
    }
}
