//! Typed client and state store for the shop-floor management API.
//!
//! The crate is three collaborating pieces: a request client (GraphQL or
//! REST behind one trait), a field mapper that pins the wire format's
//! inconsistent key casing to one canonical shape, and a store that wraps
//! loading/error bookkeeping around the client for UI layers to read.
//!
//! ```no_run
//! use shopfloor_client::{ApiConfig, ShopFloorStore, build_api};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::from_env()?;
//! let store = ShopFloorStore::new(build_api(&config));
//! let departments = store.fetch_departments(Default::default()).await?;
//! println!("{} departments", departments.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod mapper;
pub mod models;
pub mod store;

pub use client::{GraphqlClient, RestClient, ShopFloorApi, build_api};
pub use config::{ApiConfig, Protocol};
pub use errors::{ApiError, ConfigError};
pub use store::{ShopFloorStore, Snapshot, Status};
