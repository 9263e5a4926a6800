use micro_dsp::AudioSource;
use micro_viz::{PaletteId, VisualizationMode};

/// Reconfiguration request sent from the input task to the pipeline task.
///
/// Carried by value through the queue, nothing else crosses the task boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetAudioSource(AudioSource),
    SetVisualizationMode(VisualizationMode),
    SetPalette(PaletteId),
}
