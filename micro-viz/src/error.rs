use crate::engine::VisualizationMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VizError {
    #[error("lane layout has no LEDs")]
    EmptyLayout,

    #[error("{0:?} is already active, deactivate it first")]
    AlreadyActive(VisualizationMode),

    #[error("no visualization is active")]
    Inactive,

    #[error("palette {palette} does not exist for {mode:?}")]
    InvalidPalette { mode: VisualizationMode, palette: u8 },

    #[error("LED buffer holds {available} bytes, {needed} needed")]
    BufferTooSmall { needed: usize, available: usize },
}
