//! Notification sender adapters.
//!
//! - [`HttpMailRelay`] posts rendered messages to a mail relay as JSON.
//! - [`LoggingNotificationSender`] writes messages to the log; used when no
//!   relay is configured.

mod http_relay;
mod logging;

pub use http_relay::{HttpMailRelay, MailRelayPayload};
pub use logging::LoggingNotificationSender;
