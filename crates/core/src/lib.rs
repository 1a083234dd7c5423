//! pw: option marshalling and request routing for Playwright bindings
//!
//! This crate sits between typed API calls and the loosely-typed protocol:
//!
//! - [`options!`] flattens option structs into the [`OptionBag`] a command sends
//! - [`assign_struct_fields`] copies same-named fields between option structs
//! - [`RouteTable`] registers, removes and dispatches request interception
//!   handlers matched by glob, regex or predicate
//! - [`TimeoutSettings`] and [`SafeStringSet`] hold shared per-object state
//!
//! # Examples
//!
//! ## Routing
//!
//! ```ignore
//! use pw::{FulfillOptions, RouteTable, route_handler};
//!
//! let table = RouteTable::new(page_channel, Some("https://app.test/".into()));
//! table.route("api/users", route_handler(|route| {
//!     tokio::spawn(async move {
//!         let body = FulfillOptions::builder().status(200).body("[]").build();
//!         route.fulfill(body).await
//!     });
//! }), Some(1)).await?;
//!
//! // For each `route` event from the server:
//! table.dispatch(route).await?;
//! ```
//!
//! ## Options
//!
//! ```ignore
//! let params = pw::options!(json!({"selector": "#go"}), [click_options])?;
//! channel.send_no_result("click", params).await?;
//! ```

pub mod assign;
pub mod handlers;
pub mod har;
pub mod headers;
pub mod matcher;
pub mod options;
pub mod route;
pub mod routing;
pub mod select;
pub mod string_set;
pub mod timeout;

pub use assign::{assign_struct_fields, struct_fields};
pub use handlers::{HandlerId, RouteHandler, RouteHandlerEntry, route_handler};
pub use har::{
	HarRecordingMetadata, RecordHarInputOptions, UrlFilter, prepare_record_har_options,
};
pub use headers::{deserialize_headers, serialize_headers};
pub use matcher::{UrlMatcher, UrlPattern, UrlPredicate};
pub use options::{OptionBag, compose_options, merge_options, transform_options};
pub use pw_protocol::{
	ContinueOptions, DEFAULT_TIMEOUT_MS, EmulateMediaOptions, FulfillOptions, HarContentPolicy,
	HarMode, NameValue, Nullable, ObjectRef, RecordHarOptions, SelectOption, WireValue, from_wire,
	to_wire,
};
pub use pw_runtime::{Channel, ConnectionLike, Error, Result, SendFuture};
pub use route::Route;
pub use routing::{RouteTable, unroute};
pub use select::{SelectOptionValues, convert_select_option_set};
pub use string_set::SafeStringSet;
pub use timeout::TimeoutSettings;
