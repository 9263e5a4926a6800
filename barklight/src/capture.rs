//! I2S capture for both audio inputs.
//!
//! Each input owns its own I2S peripheral and keeps its DMA ring drained at
//! all times. Only the input named by [`SELECTED_SOURCE`] assembles frames.

use defmt::{error, info};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal, watch::Watch};
use esp_hal::{i2s::master::I2sRx, Async};
use micro_control::{CaptureError, CaptureStatus, SampleSource, StereoFrameAssembler};
use micro_dsp::{AudioSource, SampleFrame};

use crate::config::DMA_CHUNK_SIZE;

pub type FrameSignal = Signal<CriticalSectionRawMutex, Result<(AudioSource, SampleFrame), CaptureError>>;

/// Latest assembled frame, tagged with the input it came from.
pub static FRAMES: FrameSignal = Signal::new();

/// Input the pipeline wants frames from. One receiver per capture task.
pub static SELECTED_SOURCE: Watch<CriticalSectionRawMutex, AudioSource, 2> = Watch::new();

/// Inputs whose capture task has stopped.
pub static CAPTURE_STATUS: CaptureStatus<CriticalSectionRawMutex> = CaptureStatus::new();

/// Record a dead input and wake the pipeline if it is waiting on it.
fn report_failure(source: AudioSource, selected: Option<AudioSource>, failure: CaptureError) {
    CAPTURE_STATUS.fail(source, failure);
    if selected == Some(source) {
        FRAMES.signal(Err(failure));
    }
}

#[embassy_executor::task(pool_size = 2)]
pub async fn capture_task(source: AudioSource, mut rx: I2sRx<'static, Async>, buffer: &'static mut [u8]) {
    info!("Starting capture task for {}", source);

    let Some(mut selection) = SELECTED_SOURCE.receiver() else {
        error!("no receiver left for {} capture", source);
        CAPTURE_STATUS.fail(source, CaptureError::Setup(source));
        return;
    };

    let mut transaction = match rx.read_dma_circular_async(buffer) {
        Ok(transaction) => transaction,
        Err(e) => {
            error!("{} capture setup failed: {:?}", source, e);
            report_failure(source, selection.try_get(), CaptureError::Setup(source));
            return;
        }
    };

    let mut chunk = [0u8; DMA_CHUNK_SIZE];
    let mut assembler = StereoFrameAssembler::new();
    loop {
        let count = match transaction.pop(&mut chunk).await {
            Ok(count) => count,
            Err(e) => {
                error!("{} capture stopped: {:?}", source, e);
                report_failure(source, selection.try_get(), CaptureError::Delivery);
                return;
            }
        };

        // Unselected inputs still go through the assembler to stay byte aligned.
        let active = selection.try_get() == Some(source);
        if !active {
            assembler.restart_frame();
        }
        assembler.extend(&chunk[..count], |frame| {
            if active {
                FRAMES.signal(Ok((source, *frame)));
            }
        });
    }
}

/// Pipeline side of the capture tasks.
pub struct SignalSource {
    active: AudioSource,
}

impl SignalSource {
    pub const fn new() -> Self {
        Self {
            active: AudioSource::LineIn,
        }
    }
}

impl SampleSource for SignalSource {
    async fn next_frame(&mut self, frame: &mut SampleFrame) -> Result<(), CaptureError> {
        loop {
            CAPTURE_STATUS.check(self.active)?;
            let (source, samples) = FRAMES.wait().await?;
            // A frame from the previous input can still be in flight after a switch.
            if source == self.active {
                *frame = samples;
                return Ok(());
            }
        }
    }

    fn reconfigure(&mut self, source: AudioSource) -> Result<(), CaptureError> {
        self.active = source;
        SELECTED_SOURCE.sender().send(source);
        FRAMES.reset();
        // Checked after selecting, so a task failing from here on signals the error.
        CAPTURE_STATUS.check(source)
    }
}
