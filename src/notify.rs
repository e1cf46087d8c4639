// SPDX-License-Identifier: GPL-3.0-only

//! Notification channel from the page to the coordinator.
//!
//! The page side reports failures (typically an address too long to encode)
//! as [`Notification`] records. Delivery is fire-and-forget: the controller
//! never waits for, or branches on, an acknowledgment.
//!
//! # Channel
//!
//! The usual transport is an unbounded `futures` mpsc channel. A plain sender
//! implements [`Notifier`]; the coordinator hands each page a
//! [`PageNotifier`](crate::coordinator::PageNotifier) that tags messages with
//! their page, and drains the receiver with
//! [`Coordinator::drain`](crate::coordinator::Coordinator::drain).
//!
//! ```rust,ignore
//! use futures::channel::mpsc;
//! use printqr::notify::{Notification, Notifier};
//!
//! let (tx, rx) = mpsc::unbounded::<Notification>();
//! tx.notify(Notification::error("address too long"));
//! ```

use futures::channel::mpsc;
use serde::{Deserialize, Serialize};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

/// A message sent to the coordinator for logging and toolbar management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// Asks the coordinator to disable the toolbar action for this page.
    #[serde(default)]
    pub disable_requested: bool,
}

impl Notification {
    /// Creates a new notification.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            disable_requested: false,
        }
    }

    /// Creates an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Creates a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Requests the toolbar action be disabled for the page.
    #[must_use]
    pub fn with_disable_request(mut self) -> Self {
        self.disable_requested = true;
        self
    }
}

/// Sink for notifications.
pub trait Notifier {
    /// Sends a notification without waiting for delivery.
    fn notify(&self, notification: Notification);
}

impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.unbounded_send(notification) {
            tracing::warn!("Failed to deliver notification: {}", e);
        }
    }
}

/// Notifier that only logs, for pages without a coordinator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => tracing::info!("{}", notification.message),
            Severity::Warning => tracing::warn!("{}", notification.message),
            Severity::Error => tracing::error!("{}", notification.message),
        }
    }
}
