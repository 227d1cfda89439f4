//! Backoff-controlled dispatch of outbound API requests.
//!
//! Every request issued through an [`Api`] handle goes through
//! [`request_with_backoff`]: a failed attempt (transport error or HTTP 429)
//! closes a cooldown gate shared by all clones of the handle, and the request
//! is retried once the gate opens. Cooldowns grow quadratically with the
//! attempt number (1s, 4s, 9s, 16s, 25s); a failure after the fifth attempt is
//! returned to the caller.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod cooldown;
mod dispatcher;
mod policy;

pub use cooldown::CooldownSlot;
pub use dispatcher::{request_with_backoff, request_with_backoff_from, Api, ApiBuilder};
pub use policy::{BackoffPolicy, RetryDecision};
