// Life of a request:
// 1. Trace span opens, request statistics start timing
// 2. Protected routes verify the bearer token and attach the subject
// 3. Handler runs:
//     - Country CRUD reads/writes the registry under its RwLock,
//       copies out, releases the lock, then serializes
//     - Auth endpoints mint or refresh tokens
//     - /stream spawns a producer feeding the response body
// 4. Errors become `ApiError` responses; panics become 500s
//
// System components:
//  - Country registry
//  - Auth gate
//  - Stream producer
//  - Request statistics

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod stats;
pub mod stream;
pub mod time;


pub use app::{AppOptions, AppState, router};
pub use registry::{Country, CountryRegistry};
