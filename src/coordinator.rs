// SPDX-License-Identifier: GPL-3.0-only

//! Extension-side coordinator.
//!
//! The coordinator is the long-lived counterpart of the per-page
//! controllers. It tracks whether the toolbar action is usable on each page
//! and consumes the notifications pages send it.
//!
//! # Architecture
//!
//! - **Pages**: each controller gets a [`PageNotifier`], which tags its
//!   notifications with the page they came from and forwards them over a
//!   shared unbounded channel.
//! - **Coordinator**: drains the channel with [`Coordinator::drain`], logs
//!   each notification by severity and disables the toolbar action when a
//!   page asks for it. Toggle results and page update checks are fed in
//!   directly by the host.
//!
//! A page whose action is disabled stays disabled until its next update
//! check succeeds, which in practice means until it is reloaded.

use std::collections::HashMap;
use std::fmt;

use futures::StreamExt;
use futures::channel::mpsc;

use crate::controller::{ToggleError, ToggleOutcome};
use crate::fl;
use crate::notify::{Notification, Notifier, Severity};

/// Identifies a browser page (tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page #{}", self.0)
    }
}

/// Whether the toolbar action can be used on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Enabled,
    Disabled,
}

/// A notification tagged with its source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNotification {
    pub page: PageId,
    pub notification: Notification,
}

/// Creates the channel shared by all pages and the coordinator.
pub fn channel() -> (
    mpsc::UnboundedSender<PageNotification>,
    mpsc::UnboundedReceiver<PageNotification>,
) {
    mpsc::unbounded()
}

// ============================================================================
// Page Notifier
// ============================================================================

/// [`Notifier`] for one page.
#[derive(Debug, Clone)]
pub struct PageNotifier {
    page: PageId,
    tx: mpsc::UnboundedSender<PageNotification>,
}

impl PageNotifier {
    pub fn new(page: PageId, tx: mpsc::UnboundedSender<PageNotification>) -> Self {
        Self { page, tx }
    }

    pub fn page(&self) -> PageId {
        self.page
    }
}

impl Notifier for PageNotifier {
    fn notify(&self, notification: Notification) {
        let message = PageNotification {
            page: self.page,
            notification,
        };
        if let Err(e) = self.tx.unbounded_send(message) {
            tracing::warn!("Failed to deliver notification from {}: {}", self.page, e);
        }
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// Per-page toolbar state and notification sink.
#[derive(Debug, Default)]
pub struct Coordinator {
    actions: HashMap<PageId, ActionState>,
    received: usize,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toolbar state for `page`. Unknown pages are enabled.
    pub fn action_state(&self, page: PageId) -> ActionState {
        self.actions.get(&page).copied().unwrap_or_default()
    }

    /// Number of notifications handled so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Applies the result of the check run when a page finishes loading.
    ///
    /// A page that accepts the overlay gets its action enabled; a page that
    /// refuses it gets it disabled.
    pub fn handle_page_update(&mut self, page: PageId, check: Result<(), ToggleError>) {
        match check {
            Ok(()) => self.set_action(page, ActionState::Enabled),
            Err(e) => {
                tracing::info!("Overlay unavailable on {}: {}", page, e);
                self.set_action(page, ActionState::Disabled);
            }
        }
    }

    /// Applies the result of a toolbar toggle.
    pub fn handle_toggle_result(
        &mut self,
        page: PageId,
        result: &Result<ToggleOutcome, ToggleError>,
    ) {
        match result {
            Ok(outcome) => tracing::debug!("Toggle on {}: {:?}", page, outcome),
            Err(e) => {
                tracing::warn!("{} ({}: {})", fl!("toggle-denied"), page, e);
                self.set_action(page, ActionState::Disabled);
            }
        }
    }

    /// Logs a notification and honors its disable request.
    pub fn handle_notification(&mut self, message: PageNotification) {
        let PageNotification { page, notification } = message;
        self.received += 1;

        match notification.severity {
            Severity::Info => tracing::info!("{}: {}", page, notification.message),
            Severity::Warning => tracing::warn!("{}: {}", page, notification.message),
            Severity::Error => tracing::error!("{}: {}", page, notification.message),
        }

        if notification.disable_requested {
            self.set_action(page, ActionState::Disabled);
        }
    }

    /// Forgets a closed page.
    pub fn page_closed(&mut self, page: PageId) {
        self.actions.remove(&page);
    }

    /// Handles notifications until every sender is dropped.
    ///
    /// Returns the number handled by this call.
    pub async fn drain(&mut self, rx: &mut mpsc::UnboundedReceiver<PageNotification>) -> usize {
        let mut count = 0;
        while let Some(message) = rx.next().await {
            self.handle_notification(message);
            count += 1;
        }
        tracing::debug!("Notification channel closed after {} messages", count);
        count
    }

    /// Handles the notifications already queued, without waiting.
    pub fn drain_pending(&mut self, rx: &mut mpsc::UnboundedReceiver<PageNotification>) -> usize {
        let mut count = 0;
        while let Ok(Some(message)) = rx.try_next() {
            self.handle_notification(message);
            count += 1;
        }
        count
    }

    /// Message shown once after installation.
    pub fn on_installed(&self) -> String {
        let message = fl!("install-message");
        tracing::info!("{}", message);
        message
    }

    fn set_action(&mut self, page: PageId, state: ActionState) {
        let previous = self.actions.insert(page, state).unwrap_or_default();
        if previous != state {
            tracing::debug!("Toolbar action on {} is now {:?}", page, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageId = PageId(7);

    /// Test 1: Unknown pages are enabled
    #[test]
    fn test_default_enabled() {
        let coordinator = Coordinator::new();
        assert_eq!(coordinator.action_state(PAGE), ActionState::Enabled);
    }

    /// Test 2: Update checks enable or disable the action
    #[test]
    fn test_page_update_check() {
        let mut coordinator = Coordinator::new();

        coordinator.handle_page_update(PAGE, Err(ToggleError::ScriptInjectionDenied));
        assert_eq!(coordinator.action_state(PAGE), ActionState::Disabled);

        coordinator.handle_page_update(PAGE, Ok(()));
        assert_eq!(
            coordinator.action_state(PAGE),
            ActionState::Enabled,
            "A reload that accepts the overlay re-enables the action"
        );
    }

    /// Test 3: A denied toggle disables only that page
    #[test]
    fn test_denied_toggle_disables() {
        let mut coordinator = Coordinator::new();
        let other = PageId(8);

        coordinator.handle_toggle_result(PAGE, &Ok(ToggleOutcome::Shown));
        assert_eq!(coordinator.action_state(PAGE), ActionState::Enabled);

        coordinator.handle_toggle_result(PAGE, &Err(ToggleError::ScriptInjectionDenied));
        assert_eq!(coordinator.action_state(PAGE), ActionState::Disabled);
        assert_eq!(coordinator.action_state(other), ActionState::Enabled);

        coordinator.page_closed(PAGE);
        assert_eq!(coordinator.action_state(PAGE), ActionState::Enabled);
    }

    /// Test 4: Disable requests in notifications are honored
    #[test]
    fn test_notification_disable_request() {
        let (tx, mut rx) = channel();
        let notifier = PageNotifier::new(PAGE, tx);
        let mut coordinator = Coordinator::new();

        notifier.notify(Notification::error("too long"));
        assert_eq!(coordinator.drain_pending(&mut rx), 1);
        assert_eq!(coordinator.action_state(PAGE), ActionState::Enabled);

        notifier.notify(Notification::warning("no access").with_disable_request());
        assert_eq!(coordinator.drain_pending(&mut rx), 1);
        assert_eq!(coordinator.action_state(PAGE), ActionState::Disabled);
        assert_eq!(coordinator.received(), 2);
    }

    /// Test 5: Drain consumes every message until the senders are gone
    #[tokio::test]
    async fn test_drain_until_closed() {
        let (tx, mut rx) = channel();
        let first = PageNotifier::new(PageId(1), tx.clone());
        let second = PageNotifier::new(PageId(2), tx);

        let producer = tokio::spawn(async move {
            first.notify(Notification::info("one"));
            second.notify(Notification::error("two").with_disable_request());
            first.notify(Notification::info("three"));
        });
        producer.await.unwrap();

        let mut coordinator = Coordinator::new();
        let count = coordinator.drain(&mut rx).await;

        assert_eq!(count, 3);
        assert_eq!(coordinator.action_state(PageId(1)), ActionState::Enabled);
        assert_eq!(coordinator.action_state(PageId(2)), ActionState::Disabled);
    }

    /// Test 6: Install message is localized text
    #[test]
    fn test_install_message() {
        let coordinator = Coordinator::new();
        assert!(!coordinator.on_installed().is_empty());
    }

    /// Test 7: Page ids display for logs
    #[test]
    fn test_page_id_display() {
        assert_eq!(PageId(3).to_string(), "page #3");
    }
}
