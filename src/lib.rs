//! # stockroom
//!
//! A small product catalogue over HTTP, held entirely in process memory.
//!
//! ## Routes
//!
//! | Method | Path | Key | Success | Failure |
//! |---|---|---|---|---|
//! | GET | `/` | | 200 welcome text | |
//! | GET | `/api/products` | | 200 array | |
//! | GET | `/api/products/{id}` | | 200 object | 404 |
//! | POST | `/api/products` | yes | 201 created object | 400, 401 |
//! | PUT | `/api/products/{id}` | yes | 200 updated object | 404, 401 |
//! | DELETE | `/api/products/{id}` | yes | 204 | 404, 401 |
//!
//! Mutating requests carry the pre-shared key in the `x-api-key` header.
//!
//! ## Layers
//!
//! Underneath sits a minimal HTTP layer: radix-tree routing via [`matchit`],
//! hyper for the wire, and an ordered [`middleware`] chain. Every request
//! passes the request log, then panic recovery, then the api-key gate, then
//! the matched handler.
//!
//! ```rust,no_run
//! use stockroom::{app, Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let store = app::initial_store(&config)?;
//!     Server::bind(config.socket_addr()).serve(app::build(&config, store)).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod middleware;
pub mod products;

pub use config::Config;
pub use error::{ApiError, Error, INTERNAL_ERROR_BODY};
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
