//! Report delivery.
//!
//! A [`Notifier`] takes a fully rendered report and delivers it. Delivery is
//! best effort: implementations log failures and never return them, so a
//! messaging outage can not stop the polling loop.

mod telegram;

use async_trait::async_trait;

pub use telegram::TelegramNotifier;

/// Delivers rendered reports to an external channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `message`. Failures are logged by the implementation.
    async fn notify(&self, message: &str);
}
