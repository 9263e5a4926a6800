//! Frame to band energy pipeline: DC removal, window, FFT, magnitude, Bark binning
//! and calibration.

#[cfg(feature = "logging")]
use defmt::info;
use microfft::real::rfft_1024;

use crate::{
    bands::{BarkBandTable, BARK_REFERENCE_FREQUENCY},
    calibration::CalibrationProfile,
    compute_magnitude,
    error::DspError,
    remove_dc,
    window::{Window, WindowFunction},
    Bands, SampleFrame, N_BANDS, N_BINS, N_SAMPLES, SAMPLE_RATE_HZ,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractorConfig {
    pub sample_rate: f32,
    pub bark_reference_hz: f32,
    pub window: WindowFunction,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE_HZ as f32,
            bark_reference_hz: BARK_REFERENCE_FREQUENCY,
            window: WindowFunction::default(),
        }
    }
}

/// Turns one frame of samples into 16 calibrated band energies.
///
/// All scratch buffers live inside the extractor, so `process` never
/// allocates and the struct can sit in a `static`.
pub struct BandExtractor {
    table: BarkBandTable,
    window: Window,
    profile: CalibrationProfile,
    samples: [f32; N_SAMPLES],
    magnitude: [f32; N_BINS],
}

impl BandExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, DspError> {
        let table = BarkBandTable::new(config.sample_rate, config.bark_reference_hz)?;
        #[cfg(feature = "logging")]
        info!("band ranges: {}", table.band_ranges());
        Ok(Self::with_table(table, config.window))
    }

    pub fn with_table(table: BarkBandTable, window: WindowFunction) -> Self {
        Self {
            table,
            window: Window::new(window),
            profile: CalibrationProfile::FLAT,
            samples: [0.0; N_SAMPLES],
            magnitude: [0.0; N_BINS],
        }
    }

    pub fn table(&self) -> &BarkBandTable {
        &self.table
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: CalibrationProfile) {
        self.profile = profile;
    }

    /// Magnitude spectrum of the last processed frame.
    pub fn magnitude(&self) -> &[f32; N_BINS] {
        &self.magnitude
    }

    /// Raw band energies, before the calibration profile is applied.
    pub fn raw_bands(&mut self, frame: &SampleFrame) -> Bands {
        remove_dc(frame, &mut self.samples);
        self.window.apply(&mut self.samples);
        let spectrum = rfft_1024(&mut self.samples);
        compute_magnitude(spectrum, &mut self.magnitude);

        let mut bands = [0.0; N_BANDS];
        self.table.accumulate(&self.magnitude, &mut bands);
        bands
    }

    pub fn process(&mut self, frame: &SampleFrame) -> Bands {
        let mut bands = self.raw_bands(frame);
        self.profile.apply(&mut bands);
        bands
    }
}
