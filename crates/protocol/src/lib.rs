//! Wire types for the Playwright protocol.
//!
//! This crate contains the types used for communication with the Playwright
//! server, and the transcoder that turns typed option structs into the
//! loosely-typed payloads the server expects:
//!
//! - [`wire`]: the generic [`WireValue`] model, [`to_wire`] / [`from_wire`],
//!   [`Nullable`] fields and opaque [`ObjectRef`] handles
//! - [`options`]: option structs sent with individual commands
//! - [`types`]: enums and small value types shared by the options
//!
//! Types here are pure data. Behavior that needs a connection lives in
//! `pw-runtime` and `pw-rs`.

pub mod options;
pub mod types;
pub mod wire;

pub use options::*;
pub use types::*;
pub use wire::{
	NULL_MARKER, Nullable, ObjectRef, WireError, WireMap, WireSerializer, WireValue, from_wire,
	to_wire,
};
