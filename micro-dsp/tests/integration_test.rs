use micro_dsp::{
    AudioSource, BandExtractor, CalibrationProfile, ExtractorConfig, GainConfig, GainController,
    WindowFunction, N_BANDS,
};
pub mod common;
use common::*;

fn extractor() -> BandExtractor {
    BandExtractor::new(ExtractorConfig::default()).unwrap()
}

#[test]
fn test_zero_frame_gives_zero_bands_for_every_source() {
    let mut extractor = extractor();
    for source in AudioSource::ALL {
        extractor.set_profile(source.profile());
        assert_eq!(extractor.process(&silence()), [0.0; N_BANDS]);
    }
}

#[test]
fn test_tones_land_in_expected_bands() {
    let mut extractor = extractor();
    let cases = [(bin_centered(7), 3), (bin_centered(23), 6), (15_029.3, 14)];

    for (frequency, expected) in cases {
        let bands = extractor.process(&sine_frame(frequency, AMPLITUDE));
        assert_eq!(
            loudest_band(&bands),
            expected,
            "{} Hz produced {:?}",
            frequency,
            bands
        );
    }
}

#[test]
fn test_extraction_is_deterministic() {
    let frame = noise_frame(42, 500_000);
    let mut a = extractor();
    let mut b = extractor();
    let first = a.process(&frame);
    assert_eq!(first, a.process(&frame));
    assert_eq!(first, b.process(&frame));
}

#[test]
fn test_window_choice_keeps_band_assignment() {
    let frame = sine_frame(bin_centered(23), AMPLITUDE);
    for window in [
        WindowFunction::Rectangular,
        WindowFunction::Hann,
        WindowFunction::BlackmanHarrisSquarified,
    ] {
        let config = ExtractorConfig {
            window,
            ..ExtractorConfig::default()
        };
        let mut extractor = BandExtractor::new(config).unwrap();
        assert_eq!(loudest_band(&extractor.process(&frame)), 6, "{:?}", window);
    }
}

#[test]
fn test_tone_then_silence_scenario() {
    let mut extractor = extractor();
    extractor.set_profile(CalibrationProfile::FLAT);
    let mut gain = GainController::new(GainConfig::default()).unwrap();

    let tone = sine_frame(bin_centered(23), AMPLITUDE);
    let mut levels = [0.0; N_BANDS];
    for _ in 0..100 {
        levels = gain.process(&extractor.process(&tone));
        assert!(levels.iter().all(|&l| (0.0..=1.0).contains(&l)));
    }
    assert!(levels[6] > 0.9, "{:?}", levels);
    assert_eq!(loudest_band(&levels), 6);

    let reference = gain.reference();
    let mut cycles = 0;
    while levels[6] >= 0.05 {
        levels = gain.process(&extractor.process(&silence()));
        cycles += 1;
        assert!(cycles <= 15, "still at {} after {} cycles", levels[6], cycles);
    }
    assert!(gain.reference() < reference);
}

#[test]
fn test_noise_keeps_levels_in_unit_range() {
    let mut extractor = extractor();
    extractor.set_profile(AudioSource::LineIn.profile());
    let mut gain = GainController::new(GainConfig::default()).unwrap();
    gain.reset(AudioSource::LineIn.profile().initial_reference);

    for seed in 0..64 {
        let amplitude = if seed % 8 == 0 { 0 } else { 1 << (seed % 24) };
        let levels = gain.process(&extractor.process(&noise_frame(seed, amplitude)));
        assert!(
            levels.iter().all(|&l| (0.0..=1.0).contains(&l)),
            "seed {}: {:?}",
            seed,
            levels
        );
        assert!(gain.reference() >= 1.0);
    }
}
