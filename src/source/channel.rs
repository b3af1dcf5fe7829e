//! Channel-based data source.

use tokio::sync::watch;

use super::DataSource;
use crate::data::Board;

/// A data source that receives boards pushed through a watch channel.
///
/// # Example
///
/// ```
/// use connect_wallboard::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Board>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    pub fn new(receiver: watch::Receiver<Board>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            initial_returned: false,
        }
    }

    /// Create a channel pair. The initial board is `Loading...`.
    pub fn create(source_description: &str) -> (watch::Sender<Board>, Self) {
        let (tx, rx) = watch::channel(Board::default());
        (tx, Self::new(rx, source_description))
    }
}

/// Shared polling logic for watch-backed sources.
pub(super) fn poll_watch(receiver: &mut watch::Receiver<Board>, initial_returned: &mut bool) -> Option<Board> {
    if !*initial_returned {
        *initial_returned = true;
        receiver.mark_changed();
    }

    if receiver.has_changed().unwrap_or(false) {
        Some(receiver.borrow_and_update().clone())
    } else {
        None
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Board> {
        poll_watch(&mut self.receiver, &mut self.initial_returned)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StatusMessage;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the loading board
        assert_eq!(source.poll(), Some(Board::Status(StatusMessage::Loading)));

        // No change, so poll returns None
        assert!(source.poll().is_none());

        tx.send(Board::Status(StatusMessage::NoQueues)).unwrap();
        assert_eq!(source.poll(), Some(Board::Status(StatusMessage::NoQueues)));
        assert!(source.poll().is_none());
        assert_eq!(source.description(), "channel: test");
    }
}
