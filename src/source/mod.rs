//! Data source abstraction for receiving wallboard updates.
//!
//! The terminal loop is synchronous; sources hand it the latest [`Board`]
//! without blocking. [`PipelineSource`] drives the refresh pipeline on a
//! tokio task, [`ChannelSource`] wraps a bare watch channel for embedding
//! and tests.

mod channel;
mod pipeline;

pub use channel::ChannelSource;
pub use pipeline::PipelineSource;

use std::fmt::Debug;

use crate::data::Board;

/// Trait for receiving wallboard state.
///
/// # Example
///
/// ```
/// use connect_wallboard::{ChannelSource, DataSource};
///
/// let (_tx, mut source) = ChannelSource::create("test");
/// if let Some(board) = source.poll() {
///     println!("{:?}", board);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest board.
    ///
    /// Returns `Some(board)` if it changed since the last poll, `None`
    /// otherwise. This method should be non-blocking.
    fn poll(&mut self) -> Option<Board>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the error message if the source itself has failed.
    fn error(&self) -> Option<&str>;
}
