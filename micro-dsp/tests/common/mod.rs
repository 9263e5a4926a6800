#![allow(dead_code)]

use micro_dsp::{bin_frequency, SampleFrame, N_SAMPLES, SAMPLE_RATE_HZ};
use rand::{rngs::StdRng, Rng, SeedableRng};
use wavegen::{sine, wf};

pub const AMPLITUDE: f32 = 1_000_000.0;

/// Frequency that lands exactly on an FFT bin.
pub fn bin_centered(bin: usize) -> f32 {
    bin_frequency(bin, SAMPLE_RATE_HZ as f32)
}

pub fn sine_frame(frequency: f32, amplitude: f32) -> SampleFrame {
    let waveform = wf!(f32, SAMPLE_RATE_HZ as f32, sine!(frequency, amplitude));
    let mut frame = [0i32; N_SAMPLES];
    for (s, v) in frame.iter_mut().zip(waveform.iter()) {
        *s = v as i32;
    }
    frame
}

pub fn noise_frame(seed: u64, amplitude: i32) -> SampleFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut frame = [0i32; N_SAMPLES];
    for s in frame.iter_mut() {
        *s = rng.random_range(-amplitude..=amplitude);
    }
    frame
}

pub fn silence() -> SampleFrame {
    [0; N_SAMPLES]
}

pub fn loudest_band(bands: &[f32]) -> usize {
    let mut best = 0;
    for (i, &b) in bands.iter().enumerate() {
        if b > bands[best] {
            best = i;
        }
    }
    best
}
