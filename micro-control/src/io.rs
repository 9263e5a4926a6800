//! Collaborators at the edges of the pipeline: audio capture and LED output.

use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embedded_graphics::pixelcolor::Rgb888;
use micro_dsp::{AudioSource, SampleFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureError {
    #[error("could not start capture from {0:?}")]
    Setup(AudioSource),
    #[error("could not stop the running capture")]
    Teardown,
    #[error("frame delivery failed")]
    Delivery,
}

/// Failures of capture drivers that run independently of the pipeline.
///
/// A driver that dies while its input is not selected records the failure
/// here, so selecting that input later reports it instead of waiting for
/// frames that never come. Failures are permanent.
pub struct CaptureStatus<M: RawMutex> {
    failures: Mutex<M, Cell<[Option<CaptureError>; 2]>>,
}

impl<M: RawMutex> Default for CaptureStatus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> CaptureStatus<M> {
    pub const fn new() -> Self {
        Self {
            failures: Mutex::new(Cell::new([None; 2])),
        }
    }

    fn slot(source: AudioSource) -> usize {
        match source {
            AudioSource::Microphone => 0,
            AudioSource::LineIn => 1,
        }
    }

    /// Record that capture from `source` is gone. The first failure is kept.
    pub fn fail(&self, source: AudioSource, error: CaptureError) {
        self.failures.lock(|failures| {
            let mut all = failures.get();
            let slot = &mut all[Self::slot(source)];
            if slot.is_none() {
                *slot = Some(error);
            }
            failures.set(all);
        });
    }

    /// `Err` with the recorded failure if capture from `source` is gone.
    pub fn check(&self, source: AudioSource) -> Result<(), CaptureError> {
        let failure = self.failures.lock(|failures| failures.get()[Self::slot(source)]);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Delivers frames of mono samples at the capture cadence.
///
/// Samples are pre-scaled so that every source covers a comparable range.
/// DC offset may still be present.
#[allow(async_fn_in_trait)]
pub trait SampleSource {
    /// Wait for the next full frame.
    async fn next_frame(&mut self, frame: &mut SampleFrame) -> Result<(), CaptureError>;

    /// Tear down the running capture and start capturing from `source`.
    fn reconfigure(&mut self, source: AudioSource) -> Result<(), CaptureError>;
}

/// Pushes a finished pixel buffer to the strip.
pub trait PixelSink {
    type Error: core::fmt::Debug;

    fn present(&mut self, pixels: &[Rgb888]) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_failures_are_kept_per_source() {
        let status = CaptureStatus::<NoopRawMutex>::new();
        assert_eq!(status.check(AudioSource::Microphone), Ok(()));

        status.fail(AudioSource::Microphone, CaptureError::Delivery);
        assert_eq!(
            status.check(AudioSource::Microphone),
            Err(CaptureError::Delivery)
        );
        assert_eq!(status.check(AudioSource::LineIn), Ok(()));
    }

    #[test]
    fn test_first_failure_wins() {
        let status = CaptureStatus::<NoopRawMutex>::new();
        status.fail(AudioSource::LineIn, CaptureError::Setup(AudioSource::LineIn));
        status.fail(AudioSource::LineIn, CaptureError::Delivery);
        assert_eq!(
            status.check(AudioSource::LineIn),
            Err(CaptureError::Setup(AudioSource::LineIn))
        );
    }
}
