#![no_std]

//! Task-level plumbing: the command protocol between the input task and the
//! pipeline task, and the per-frame pipeline itself.

pub mod command;
pub mod debounce;
pub mod frame;
pub mod input;
pub mod io;
pub mod pipeline;
pub mod queue;

pub use command::Command;
pub use debounce::{Debouncer, DEBOUNCE_MS};
pub use frame::{stereo_to_mono, StereoFrameAssembler, BYTES_PER_STEREO_SAMPLE, SAMPLE_SHIFT};
pub use input::{Button, InputController};
pub use io::{CaptureError, CaptureStatus, PixelSink, SampleSource};
pub use pipeline::{Pipeline, PipelineError, PipelineSettings};
pub use queue::{CommandQueue, QueueError, COMMAND_QUEUE_CAPACITY};
