/// Errors raised while building or running the band extraction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DspError {
    /// The Bark table ran out of bands before the last usable FFT bin.
    /// No valid band vector can be produced with this table.
    #[error("frequency bin {bin} ({frequency_hz} Hz) lies above the last band threshold")]
    BandOverflow { bin: usize, frequency_hz: u32 },

    #[error("invalid gain configuration: {0}")]
    InvalidGainConfig(&'static str),
}
