//! Per-source calibration profiles and the accumulators used to produce them.

use crate::{Bands, N_BANDS};

/// Audio inputs the controller can switch between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioSource {
    Microphone,
    LineIn,
}

impl AudioSource {
    pub const ALL: [AudioSource; 2] = [AudioSource::Microphone, AudioSource::LineIn];

    /// Next source in the fixed cycle order.
    pub fn next(self) -> Self {
        match self {
            AudioSource::Microphone => AudioSource::LineIn,
            AudioSource::LineIn => AudioSource::Microphone,
        }
    }

    pub fn profile(self) -> CalibrationProfile {
        match self {
            AudioSource::Microphone => MICROPHONE_PROFILE,
            AudioSource::LineIn => LINE_IN_PROFILE,
        }
    }
}

impl Default for AudioSource {
    fn default() -> Self {
        AudioSource::LineIn
    }
}

/// Noise floor and gain per band for one audio source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationProfile {
    pub noise_floor: Bands,
    pub gain: Bands,
    /// Reference level the gain controller starts from after switching to this source.
    pub initial_reference: f32,
}

impl CalibrationProfile {
    /// No noise subtraction, unity gain.
    pub const FLAT: CalibrationProfile = CalibrationProfile {
        noise_floor: [0.0; N_BANDS],
        gain: [1.0; N_BANDS],
        initial_reference: 1.0,
    };

    /// Subtract the noise floor, clamp at zero and apply the calibration gain.
    pub fn apply(&self, bands: &mut Bands) {
        for ((band, &noise), &gain) in bands
            .iter_mut()
            .zip(self.noise_floor.iter())
            .zip(self.gain.iter())
        {
            *band = (*band - noise).max(0.0) * gain;
        }
    }
}

// Recorded with nothing plugged in, which is when the line-in noise is loudest.
const LINE_IN_PROFILE: CalibrationProfile = CalibrationProfile {
    noise_floor: [
        293809.03, 443322.09, 134940.98, 80323.16, 103227.42, 79087.91, 78232.05, 68127.78,
        61421.70, 58895.67, 67339.95, 85825.51, 105689.73, 147244.81, 307407.16, 947407.88,
    ],
    gain: [
        1.43, 1.39, 2.88, 3.81, 2.72, 2.91, 2.89, 2.65, 2.79, 2.34, 2.22, 1.89, 1.46, 1.21, 1.00,
        1.03,
    ],
    initial_reference: 500_000.0,
};

// The microphone shares the line-in gain table until it gets its own noise run.
const MICROPHONE_PROFILE: CalibrationProfile = CalibrationProfile {
    noise_floor: [
        36412.93, 48928.23, 73170.5, 73419.59, 75094.67, 37057.88, 32166.15, 25044.71, 24497.23,
        28754.62, 34169.77, 41103.89, 49424.59, 65262.34, 85037.69, 194271.53,
    ],
    gain: LINE_IN_PROFILE.gain,
    initial_reference: 200_000.0,
};

/// Frames accumulated per calibration run.
pub const CALIBRATION_FRAMES: usize = 512;
/// Safety margin applied on top of the recorded noise maxima.
pub const NOISE_MARGIN: f32 = 0.5;

const MIN_CALIBRATION_SUM: f32 = 0.00001;

/// Tracks per-band maxima while the input is silent.
#[derive(Clone, Debug, Default)]
pub struct NoiseFloorRecorder {
    maxima: Bands,
    frames: usize,
}

impl NoiseFloorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, bands: &Bands) {
        for (max, &value) in self.maxima.iter_mut().zip(bands.iter()) {
            if value > *max {
                *max = value;
            }
        }
        self.frames += 1;
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Noise floor table: recorded maxima scaled by `1 + margin`.
    pub fn finish(&self, margin: f32) -> Bands {
        let mut table = self.maxima;
        for value in table.iter_mut() {
            *value *= 1.0 + margin;
        }
        table
    }
}

/// Sums per-band energy under a reference noise stimulus.
#[derive(Clone, Debug, Default)]
pub struct GainCalibrator {
    sums: Bands,
    frames: usize,
}

impl GainCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, bands: &Bands) {
        for (sum, &value) in self.sums.iter_mut().zip(bands.iter()) {
            *sum += value;
        }
        self.frames += 1;
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Gain table `max(sums) / sums[i]`, so the strongest band gets unity gain.
    pub fn finish(&self) -> Bands {
        let mut sums = self.sums;
        for sum in sums.iter_mut() {
            if *sum == 0.0 {
                *sum = MIN_CALIBRATION_SUM;
            }
        }
        let max = sums.iter().copied().fold(0.0f32, f32::max);

        let mut gain = [0.0; N_BANDS];
        for (g, &sum) in gain.iter_mut().zip(sums.iter()) {
            *g = max / sum;
        }
        gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_source_cycle() {
        assert_eq!(AudioSource::Microphone.next(), AudioSource::LineIn);
        assert_eq!(AudioSource::LineIn.next(), AudioSource::Microphone);
        assert_eq!(AudioSource::default(), AudioSource::LineIn);
    }

    #[test]
    fn test_profile_lookup_is_by_value() {
        let mut profile = AudioSource::Microphone.profile();
        profile.gain[0] = 100.0;
        assert_eq!(AudioSource::Microphone.profile().gain[0], 1.43);
        assert_ne!(
            AudioSource::Microphone.profile(),
            AudioSource::LineIn.profile()
        );
    }

    #[test]
    fn test_apply_subtracts_clamps_and_scales() {
        let mut profile = CalibrationProfile::FLAT;
        profile.noise_floor[0] = 10.0;
        profile.noise_floor[1] = 10.0;
        profile.gain[0] = 2.0;
        profile.gain[1] = 2.0;

        let mut bands = [0.0; N_BANDS];
        bands[0] = 15.0;
        bands[1] = 5.0;
        profile.apply(&mut bands);

        assert_eq!(bands[0], 10.0);
        assert_eq!(bands[1], 0.0);
    }

    #[test]
    fn test_noise_floor_recorder_keeps_maxima_with_margin() {
        let mut recorder = NoiseFloorRecorder::new();
        let mut a = [1.0; N_BANDS];
        let mut b = [2.0; N_BANDS];
        a[3] = 8.0;
        b[3] = 4.0;
        recorder.record(&a);
        recorder.record(&b);

        let table = recorder.finish(NOISE_MARGIN);
        assert_eq!(recorder.frames(), 2);
        assert_relative_eq!(table[0], 3.0);
        assert_relative_eq!(table[3], 12.0);
    }

    #[test]
    fn test_gain_calibrator_normalizes_to_strongest_band() {
        let mut calibrator = GainCalibrator::new();
        let mut bands = [1.0; N_BANDS];
        bands[2] = 4.0;
        bands[5] = 2.0;
        for _ in 0..CALIBRATION_FRAMES {
            calibrator.record(&bands);
        }

        let gain = calibrator.finish();
        assert_relative_eq!(gain[2], 1.0);
        assert_relative_eq!(gain[5], 2.0);
        assert_relative_eq!(gain[0], 4.0);
    }

    #[test]
    fn test_gain_calibrator_survives_silent_band() {
        let mut calibrator = GainCalibrator::new();
        let mut bands = [1.0; N_BANDS];
        bands[7] = 0.0;
        calibrator.record(&bands);

        let gain = calibrator.finish();
        assert!(gain[7].is_finite());
        assert_relative_eq!(gain[7], 1.0 / MIN_CALIBRATION_SUM);
    }
}
