//! Playwright Runtime - connection seam, channels and errors
//!
//! This crate provides the low-level runtime infrastructure that protocol
//! objects use to talk to the Playwright server:
//!
//! - **Connection**: the [`ConnectionLike`] seam a transport implements
//! - **Channel**: per-object RPC proxy that serializes option bags
//! - **Errors**: the shared [`Error`] type, including wire transcoding errors
//!
//! Process lifecycle and the transports themselves are not part of this
//! crate; anything implementing [`ConnectionLike`] can back a [`Channel`].

pub mod channel;
pub mod connection;
pub mod error;

// Re-export key types at crate root
pub use channel::Channel;
pub use connection::{ConnectionLike, SendFuture};
pub use error::{Error, Result};
