//! Cue Client - HTTP client for the billiard occupancy backend
//!
//! Table and occupation endpoints, the active-occupation resolver and the
//! live countdown built on top of it.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod generation;
pub mod http;
pub mod query;
pub mod resolver;
pub mod watcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use generation::{RequestGeneration, Ticket};
pub use http::HttpClient;
pub use query::{InMemoryOccupations, OccupationQuery};
pub use resolver::{ActiveOccupationResolver, Resolution};
pub use watcher::{CountdownFrame, OccupationWatcher, WatchHandle};
