//! Concrete [`GameApi`](crate::GameApi) backends.
//!
//! Backends live behind feature gates. Enable the corresponding Cargo feature
//! to pull one in:
//!
//! | Feature          | Backend     |
//! |------------------|-------------|
//! | `transport-http` | [`HttpApi`] |

#[cfg(feature = "transport-http")]
pub mod http;

#[cfg(feature = "transport-http")]
pub use http::HttpApi;
