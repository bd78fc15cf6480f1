//! Client library for the archive indexing backend's matching dashboard.
//!
//! Data models for the REST API, a typed client, and the pure view logic
//! (filtering, completion scoring, folder aggregates, view state) shared by
//! the CLI and the live terminal view.

pub mod api;
pub mod completion;
pub mod config;
pub mod filter;
pub mod folders;
pub mod models;
pub mod poll;
pub mod schema;
pub mod state;

pub use api::{ApiClient, ApiError, ErrorBody};
pub use config::{ConfigError, Settings};
pub use filter::{filter_and_sort, FilterSpec, SortKey, SortOrder, StatusFilter};
pub use poll::{LatestSlot, Poller, RequestTicket, TicketIssuer};
pub use state::DashboardState;
