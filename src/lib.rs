//! Gangway — chat front-end adapter for checkpoint-threaded agent runs.
//!
//! Maps an incoming chat turn (a growing, possibly edited message history)
//! onto a run against a remote stateful agent service, reconciling the
//! remote thread's checkpoint chain with the local history, polling the run
//! to completion within a time budget, and streaming progress text, the
//! final answer, and citation events back to the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::StreamExt;
//! use gangway::prelude::*;
//!
//! # async fn example() -> gangway::error::Result<()> {
//! let config = GangwayConfig {
//!     base_url: "http://localhost:8123".into(),
//!     ..GangwayConfig::default()
//! };
//! let pipeline = Pipeline::new(config)?;
//!
//! let mut turn = pipeline.turn(vec![ChatMessage::user("hi")], None);
//! while let Some(chunk) = turn.next().await {
//!     match chunk {
//!         OutputChunk::Text(text) => print!("{text}"),
//!         OutputChunk::Citation(event) => println!("{event:?}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod prelude;
pub mod progress;
pub mod reconcile;
pub mod run;
pub mod store;
pub mod types;
