//! Public runtime API surface.
//!
//! Types the chat adapter exchanges with the runtime: inbound requests, the
//! response builder it renders from, the notifier port for unsolicited
//! messages, and the error type.

pub mod errors;
pub mod inbound;
pub mod notifier;
pub mod response;

pub use errors::{Result, RuntimeError};
pub use inbound::{Inbound, Target};
pub use notifier::{LogNotifier, Notifier};
pub use response::{Button, RecordedResponse, Reply, ResponseBuilder};
