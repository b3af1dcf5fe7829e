//! # connect-wallboard
//!
//! A terminal wallboard for Amazon Connect real-time metrics.
//!
//! The wallboard polls the Connect API on a fixed heartbeat, flattens the
//! current metric snapshot into a name→value mapping, and shows a grid of
//! quadrants. Each quadrant substitutes metric values into a display
//! template and three threshold expressions; the expressions decide whether
//! the quadrant is green, yellow or red.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────┐   ┌──────────┐   ┌────────┐   ┌─────┐
//! │  clock  │──▶│ pipeline │──▶│   data   │──▶│ source │──▶│ app │──▶ ui
//! └─────────┘   └────┬─────┘   │(quadrants)│   │(watch) │   └─────┘
//!                    │         └──────────┘   └────────┘
//!                    ▼
//!               ┌──────────┐
//!               │ provider │ ◀── ConnectClient (SigV4 + reqwest)
//!               └──────────┘
//! ```
//!
//! - **[`config`]**: Settings from an optional file plus `WALLBOARD_*` environment variables
//! - **[`provider`]**: The [`MetricsProvider`] trait and the Amazon Connect client
//! - **[`pipeline`]**: The refresh state machine that owns the session state
//! - **[`data`]**: Metric flattening, templates, threshold expressions and the [`Board`]
//! - **[`clock`]**: The non-overlapping refresh heartbeat
//! - **[`source`]**: Bridges the async pipeline to the synchronous terminal loop
//! - **[`app`]**, **[`ui`]**, **[`events`]**: The ratatui front end
//!
//! ## Usage
//!
//! ### Evaluating a quadrant
//!
//! ```
//! use std::collections::BTreeMap;
//! use connect_wallboard::data::{ColorState, QuadrantConfig};
//!
//! let quadrant = QuadrantConfig {
//!     display: "CONTACTS_IN_QUEUE".into(),
//!     description: "Contacts waiting".into(),
//!     green: "CONTACTS_IN_QUEUE < 5".into(),
//!     yellow: "CONTACTS_IN_QUEUE < 10".into(),
//!     red: "CONTACTS_IN_QUEUE >= 10".into(),
//! };
//!
//! let values = BTreeMap::from([("CONTACTS_IN_QUEUE".to_string(), 7.0)]);
//! let view = quadrant.evaluate(1, &values);
//! assert_eq!(view.display_text, "7");
//! assert_eq!(view.color, ColorState::Yellow);
//! ```
//!
//! ### Running the pipeline
//!
//! ```no_run
//! use connect_wallboard::{Clock, ConnectClient, Pipeline, PipelineSource, WallboardConfig};
//!
//! # tokio_test::block_on(async {
//! let config = WallboardConfig::load(None).unwrap();
//! let pipeline = Pipeline::new(ConnectClient::from_config(&config), &config);
//! let source = PipelineSource::spawn(pipeline, Clock::new(config.update_frequency));
//! # });
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod provider;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use clock::Clock;
pub use config::{Credentials, WallboardConfig};
pub use data::{Board, BoardView, ColorState, QuadrantConfig, QuadrantView, StatusMessage};
pub use error::{ConfigError, ExpressionError, ProviderError};
pub use pipeline::{Phase, Pipeline};
pub use provider::{ConnectClient, MetricsProvider};
pub use source::{ChannelSource, DataSource, PipelineSource};
