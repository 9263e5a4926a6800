//! Bounded command FIFO between the input task and the pipeline task.

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, TrySendError},
};

use crate::command::Command;

pub const COMMAND_QUEUE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// The queue was saturated and the command was dropped.
    #[error("command queue full, dropped {0:?}")]
    Full(Command),
}

pub struct CommandQueue<M: RawMutex, const N: usize = COMMAND_QUEUE_CAPACITY> {
    channel: Channel<M, Command, N>,
}

impl<M: RawMutex, const N: usize> Default for CommandQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> CommandQueue<M, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Enqueue without waiting. On a full queue the command is handed back.
    pub fn try_enqueue(&self, command: Command) -> Result<(), QueueError> {
        self.channel.try_send(command).map_err(|e| match e {
            TrySendError::Full(command) => QueueError::Full(command),
        })
    }

    /// Enqueue, waiting for space. Callers bound the wait with a timeout.
    pub async fn enqueue(&self, command: Command) {
        self.channel.send(command).await
    }

    pub fn try_dequeue(&self) -> Option<Command> {
        self.channel.try_receive().ok()
    }

    /// Take every pending command in arrival order without waiting.
    pub fn drain(&self) -> Drain<'_, M, N> {
        Drain { queue: self }
    }
}

pub struct Drain<'a, M: RawMutex, const N: usize> {
    queue: &'a CommandQueue<M, N>,
}

impl<M: RawMutex, const N: usize> Iterator for Drain<'_, M, N> {
    type Item = Command;

    fn next(&mut self) -> Option<Command> {
        self.queue.try_dequeue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use micro_dsp::AudioSource;
    use micro_viz::{PaletteId, VisualizationMode};

    fn palette(i: usize) -> Command {
        Command::SetPalette(PaletteId(i as u8))
    }

    #[test]
    fn test_drain_returns_commands_in_order() {
        let queue: CommandQueue<NoopRawMutex> = CommandQueue::new();
        for i in 0..10 {
            queue.try_enqueue(palette(i)).unwrap();
        }
        assert_eq!(queue.len(), 10);

        for (i, command) in queue.drain().enumerate() {
            assert_eq!(command, palette(i));
        }
        assert!(queue.is_empty());
        assert_eq!(queue.drain().next(), None);
    }

    #[test]
    fn test_overflow_drops_only_the_excess() {
        let queue: CommandQueue<NoopRawMutex> = CommandQueue::new();
        for i in 0..COMMAND_QUEUE_CAPACITY {
            queue.try_enqueue(palette(i)).unwrap();
        }
        let extra = Command::SetAudioSource(AudioSource::Microphone);
        assert_eq!(queue.try_enqueue(extra), Err(QueueError::Full(extra)));
        assert_eq!(queue.len(), COMMAND_QUEUE_CAPACITY);

        let mut count = 0;
        for (i, command) in queue.drain().enumerate() {
            assert_eq!(command, palette(i));
            count += 1;
        }
        assert_eq!(count, COMMAND_QUEUE_CAPACITY);
    }

    #[test]
    fn test_async_enqueue_with_room() {
        let queue: CommandQueue<NoopRawMutex, 2> = CommandQueue::new();
        block_on(queue.enqueue(Command::SetVisualizationMode(VisualizationMode::Fire)));
        assert_eq!(
            queue.try_dequeue(),
            Some(Command::SetVisualizationMode(VisualizationMode::Fire))
        );
        assert_eq!(queue.capacity(), 2);
    }
}
