//! Client-facing transports

mod stdio;

pub use self::stdio::{serve, serve_stdio};
