//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

use super::types::GameEvent;

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;

/// Capacity of the broadcast channels views subscribe to
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Create a new game event channel with the default buffer size
pub fn create_event_channel() -> (mpsc::Sender<GameEvent>, mpsc::Receiver<GameEvent>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}

/// Create a new game event channel with a custom buffer size
pub fn create_event_channel_with_size(
    size: usize,
) -> (mpsc::Sender<GameEvent>, mpsc::Receiver<GameEvent>) {
    mpsc::channel(size)
}
