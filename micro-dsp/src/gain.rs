use crate::{error::DspError, Bands, N_BANDS};

/// Tunables of the adaptive gain controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainConfig {
    /// Averaging factor while the frame maximum is above the reference.
    pub rise_factor: f32,
    /// Averaging factor otherwise. Must be larger than `rise_factor`.
    pub decay_factor: f32,
    /// Fraction of the frame maximum the reference rises towards.
    pub rise_target: f32,
    /// The reference is scaled by this before dividing, so a single peak
    /// does not pin every band at 1.0.
    pub headroom: f32,
    /// Weight of the previous normalized value in the inter-frame smoothing.
    pub smoothing: f32,
    /// Lowest value the reference may reach, so silence never divides by zero.
    pub reference_floor: f32,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            rise_factor: 4.0,
            decay_factor: 128.0,
            rise_target: 0.85,
            headroom: 0.95,
            smoothing: 0.4,
            reference_floor: 1.0,
        }
    }
}

impl GainConfig {
    pub fn validate(&self) -> Result<(), DspError> {
        if self.rise_factor < 1.0 {
            return Err(DspError::InvalidGainConfig("rise factor must be at least 1"));
        }
        if self.decay_factor <= self.rise_factor {
            return Err(DspError::InvalidGainConfig(
                "decay factor must be larger than rise factor",
            ));
        }
        if !(self.headroom > 0.0 && self.headroom <= 1.0) {
            return Err(DspError::InvalidGainConfig("headroom must be in (0, 1]"));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(DspError::InvalidGainConfig("smoothing must be in [0, 1)"));
        }
        if self.reference_floor <= 0.0 {
            return Err(DspError::InvalidGainConfig("reference floor must be positive"));
        }
        Ok(())
    }
}

/// Normalizes band energies against a slowly adapting reference level.
pub struct GainController {
    config: GainConfig,
    /// Current reference level, never below `config.reference_floor`.
    reference: f32,
    /// Normalized output of the previous frame, used for smoothing.
    previous: Bands,
}

impl GainController {
    /// Create a controller starting at the reference floor.
    ///
    /// # Arguments
    ///
    /// * `config` - Tunables, checked with [`GainConfig::validate`].
    pub fn new(config: GainConfig) -> Result<Self, DspError> {
        config.validate()?;
        Ok(Self {
            reference: config.reference_floor,
            previous: [0.0; N_BANDS],
            config,
        })
    }

    pub fn config(&self) -> &GainConfig {
        &self.config
    }

    pub fn reference(&self) -> f32 {
        self.reference
    }

    pub fn previous(&self) -> &Bands {
        &self.previous
    }

    /// Forget the smoothing history and restart the reference.
    pub fn reset(&mut self, initial_reference: f32) {
        self.reference = initial_reference.max(self.config.reference_floor);
        self.previous = [0.0; N_BANDS];
    }

    /// Move the reference towards `max`, the loudest band of this frame.
    pub fn update_reference(&mut self, max: f32) {
        let c = &self.config;
        if max > self.reference {
            let risen = (max * c.rise_target + self.reference * (c.rise_factor - 1.0)) / c.rise_factor;
            self.reference = self.reference.max(risen);
        } else {
            self.reference = (max + self.reference * (c.decay_factor - 1.0)) / c.decay_factor;
        }
        self.reference = self.reference.max(c.reference_floor);
    }

    /// Normalize one frame of band energies into `[0, 1]` and smooth it
    /// against the previous frame.
    pub fn process(&mut self, bands: &Bands) -> Bands {
        let max = bands.iter().copied().fold(0.0f32, f32::max);
        self.update_reference(max);

        let scale = self.reference * self.config.headroom;
        let w = self.config.smoothing;
        let mut normalized = [0.0; N_BANDS];
        for ((n, &band), &previous) in normalized
            .iter_mut()
            .zip(bands.iter())
            .zip(self.previous.iter())
        {
            let level = (band / scale).clamp(0.0, 1.0);
            *n = previous * w + level * (1.0 - w);
        }
        self.previous = normalized;
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn controller() -> GainController {
        GainController::new(GainConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_rise_slower_than_decay() {
        let config = GainConfig {
            rise_factor: 200.0,
            ..GainConfig::default()
        };
        assert!(GainController::new(config).is_err());
        assert!(GainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reference_rises_monotonically_without_overshoot() {
        let mut gain = controller();
        let mut bands = [0.0; N_BANDS];
        bands[4] = 1000.0;

        let mut last = gain.reference();
        for _ in 0..200 {
            gain.process(&bands);
            assert!(gain.reference() >= last);
            assert!(gain.reference() <= 1000.0);
            last = gain.reference();
        }
        assert_relative_eq!(gain.reference(), 850.0, max_relative = 1e-3);
    }

    #[test]
    fn test_reference_decays_geometrically_to_floor() {
        let mut gain = controller();
        gain.reset(10_000.0);
        let silence = [0.0; N_BANDS];

        let ratio = 127.0 / 128.0;
        let mut expected = 10_000.0f32;
        for _ in 0..50 {
            let normalized = gain.process(&silence);
            expected *= ratio;
            assert_relative_eq!(gain.reference(), expected, max_relative = 1e-4);
            assert!(normalized.iter().all(|&n| (0.0..=1.0).contains(&n)));
        }

        for _ in 0..5000 {
            gain.process(&silence);
        }
        assert_eq!(gain.reference(), 1.0);
    }

    #[test]
    fn test_normalized_values_stay_in_unit_range() {
        let mut gain = controller();
        let mut bands = [0.0; N_BANDS];
        for frame in 0..100 {
            for (i, b) in bands.iter_mut().enumerate() {
                *b = ((frame * 7919 + i * 104_729) % 5000) as f32 * (frame % 3) as f32;
            }
            let normalized = gain.process(&bands);
            assert!(normalized.iter().all(|&n| (0.0..=1.0).contains(&n)));
            assert!(gain.reference() >= 1.0);
        }
    }

    #[test]
    fn test_smoothing_blends_with_previous_frame() {
        let mut gain = controller();
        let mut bands = [0.0; N_BANDS];
        bands[0] = 100.0;

        // Reference stays below the band, so the raw level saturates at 1.0.
        let first = gain.process(&bands);
        assert_relative_eq!(first[0], 0.6);
        let second = gain.process(&bands);
        assert_relative_eq!(second[0], 0.6 * 0.4 + 0.6);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut gain = controller();
        let mut bands = [0.0; N_BANDS];
        bands[0] = 100.0;
        gain.process(&bands);

        gain.reset(0.5);
        assert_eq!(gain.reference(), 1.0);
        assert_eq!(gain.previous(), &[0.0; N_BANDS]);
    }
}
