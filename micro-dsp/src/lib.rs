#![no_std]

use microfft::Complex32;
#[allow(unused_imports)]
use micromath::F32Ext;

pub mod bands;
pub mod calibration;
pub mod error;
pub mod extractor;
pub mod gain;
pub mod window;

pub use bands::{bark_thresholds, BarkBandTable, BARK_REFERENCE_FREQUENCY};
pub use calibration::{AudioSource, CalibrationProfile, GainCalibrator, NoiseFloorRecorder};
pub use error::DspError;
pub use extractor::{BandExtractor, ExtractorConfig};
pub use gain::{GainConfig, GainController};
pub use window::{Window, WindowFunction};

/// Samples per frame, fixed by the FFT size.
pub const N_SAMPLES: usize = 1024;
/// Usable magnitude bins. Bin 0 (DC) is never assigned to a band.
pub const N_BINS: usize = N_SAMPLES / 2;
/// Perceptual bands produced per frame.
pub const N_BANDS: usize = 16;
pub const SAMPLE_RATE_HZ: u32 = 44_100;

/// One frame of mono samples as delivered by the capture collaborator.
pub type SampleFrame = [i32; N_SAMPLES];

/// Per-band energies. Used both for raw band energies and, after gain
/// control, for normalized levels in `[0, 1]`.
pub type Bands = [f32; N_BANDS];

/// Centre frequency of an FFT bin.
pub fn bin_frequency(bin: usize, sample_rate: f32) -> f32 {
    bin as f32 * sample_rate / N_SAMPLES as f32
}

/// Subtract the frame mean from every sample, writing floats into `out`.
pub fn remove_dc(samples: &SampleFrame, out: &mut [f32; N_SAMPLES]) {
    let sum: i64 = samples.iter().map(|&s| s as i64).sum();
    let mean = sum as f32 / N_SAMPLES as f32;
    for (o, &s) in out.iter_mut().zip(samples.iter()) {
        *o = s as f32 - mean;
    }
}

/// Compute the magnitude of the FFT output.
///
/// `microfft` packs the Nyquist component into the imaginary part of bin 0,
/// so bin 0 is reported as the DC magnitude only.
pub fn compute_magnitude(fft_output: &[Complex32; N_BINS], magnitude: &mut [f32; N_BINS]) {
    magnitude[0] = fft_output[0].re.abs();
    for i in 1..N_BINS {
        let component = fft_output[i];
        magnitude[i] = (component.re * component.re + component.im * component.im).sqrt();
    }
}
