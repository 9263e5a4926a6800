use core::convert::Infallible;

#[cfg(feature = "logging")]
use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::RawMutex;
use micro_dsp::{
    AudioSource, BandExtractor, Bands, DspError, ExtractorConfig, GainConfig, GainController,
    SampleFrame, N_BANDS, N_SAMPLES,
};
use micro_viz::{VisualizationConfig, VisualizationEngine, VisualizationMode, VizError};

use crate::{
    command::Command,
    io::{CaptureError, PixelSink, SampleSource},
    queue::CommandQueue,
};

/// Fatal pipeline failures. Anything reaching the task loop halts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PipelineError {
    #[error(transparent)]
    Dsp(#[from] DspError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Visualization(#[from] VizError),
}

/// Everything needed to build a [`Pipeline`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineSettings {
    /// Sample rate, Bark reference and window of the band extractor.
    pub extractor: ExtractorConfig,
    /// Rise, decay, headroom and smoothing of the gain controller.
    pub gain: GainConfig,
    /// Lane layout and brightness of the visualization engine.
    pub visualization: VisualizationConfig,
    /// Audio input captured at startup.
    pub source: AudioSource,
    /// Visualization activated at startup, with palette 0.
    pub mode: VisualizationMode,
}

/// One capture → bands → levels → pixels pass per frame, with commands
/// applied between passes.
pub struct Pipeline<S, P> {
    source: S,
    sink: P,
    extractor: BandExtractor,
    gain: GainController,
    engine: VisualizationEngine,
    audio_source: AudioSource,
    frame: SampleFrame,
    levels: Bands,
}

impl<S: SampleSource, P: PixelSink> Pipeline<S, P> {
    /// Build every stage and start capturing from the configured source.
    pub fn new(settings: PipelineSettings, mut source: S, sink: P) -> Result<Self, PipelineError> {
        let extractor = BandExtractor::new(settings.extractor)?;
        let gain = GainController::new(settings.gain)?;
        let mut engine = VisualizationEngine::new(settings.visualization);
        engine.activate(settings.mode)?;
        source.reconfigure(settings.source)?;

        let mut pipeline = Self {
            source,
            sink,
            extractor,
            gain,
            engine,
            audio_source: settings.source,
            frame: [0; N_SAMPLES],
            levels: [0.0; N_BANDS],
        };
        pipeline.select_profile(settings.source);
        Ok(pipeline)
    }

    pub fn audio_source(&self) -> AudioSource {
        self.audio_source
    }

    pub fn extractor(&self) -> &BandExtractor {
        &self.extractor
    }

    pub fn gain(&self) -> &GainController {
        &self.gain
    }

    pub fn engine(&self) -> &VisualizationEngine {
        &self.engine
    }

    /// Normalized levels of the last frame.
    pub fn levels(&self) -> &Bands {
        &self.levels
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    fn select_profile(&mut self, source: AudioSource) {
        let profile = source.profile();
        self.extractor.set_profile(profile);
        self.gain.reset(profile.initial_reference);
    }

    /// Apply a single command. Invalid palettes are reported and ignored.
    pub fn apply(&mut self, command: Command) -> Result<(), PipelineError> {
        match command {
            Command::SetAudioSource(source) => {
                self.source.reconfigure(source)?;
                self.audio_source = source;
                self.select_profile(source);
                #[cfg(feature = "logging")]
                info!("audio source {}", source);
            }
            Command::SetVisualizationMode(mode) => {
                self.engine.switch_mode(mode)?;
            }
            Command::SetPalette(palette) => {
                if let Err(_e) = self.engine.set_palette(palette) {
                    #[cfg(feature = "logging")]
                    warn!("ignoring palette change: {}", _e);
                }
            }
        }
        Ok(())
    }

    /// Apply every queued command in arrival order. Returns how many ran.
    pub fn apply_pending<M: RawMutex, const N: usize>(
        &mut self,
        queue: &CommandQueue<M, N>,
    ) -> Result<usize, PipelineError> {
        let mut applied = 0;
        for command in queue.drain() {
            self.apply(command)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Drain commands, wait for a frame and push it through every stage.
    pub async fn cycle<M: RawMutex, const N: usize>(
        &mut self,
        queue: &CommandQueue<M, N>,
    ) -> Result<(), PipelineError> {
        self.apply_pending(queue)?;
        self.source.next_frame(&mut self.frame).await?;

        let bands = self.extractor.process(&self.frame);
        self.levels = self.gain.process(&bands);
        let pixels = self.engine.render(&self.levels);
        if let Err(_e) = self.sink.present(pixels) {
            #[cfg(feature = "logging")]
            warn!("dropped frame: {}", defmt::Debug2Format(&_e));
        }
        Ok(())
    }

    /// Run until a fatal error occurs.
    pub async fn run<M: RawMutex, const N: usize>(
        &mut self,
        queue: &CommandQueue<M, N>,
    ) -> Result<Infallible, PipelineError> {
        loop {
            self.cycle(queue).await?;
        }
    }
}
