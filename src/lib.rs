// SPDX-License-Identifier: GPL-3.0-only

//! printqr - A printable QR code of the page address
//!
//! This crate places a small draggable, resizable overlay in a corner of a
//! web page. The overlay holds a QR code of the page address, so a printed
//! copy of the page links back to its source.
//!
//! # Architecture
//!
//! The crate consists of two sides:
//!
//! 1. **Page side** ([`controller::OverlayController`]): one per page. Reacts
//!    to print signals, the toolbar toggle, pointer gestures, viewport
//!    resizes and same-page navigation.
//!
//! 2. **Coordinator** ([`coordinator::Coordinator`]): long-lived. Tracks the
//!    toolbar action state per page and consumes page notifications.
//!
//! The two sides communicate over a `futures` mpsc channel. The page is
//! reached through the [`document::HostDocument`] trait, with
//! [`document::MemoryDocument`] as the in-memory implementation.
//!
//! # Modules
//!
//! - `app_settings`: Centralized constants
//! - `config`: User settings, persistence and resolution
//! - `controller`: Print lifecycle controller
//! - `coordinator`: Per-page toolbar state and notification sink
//! - `document`: Host document boundary
//! - `geometry`: Clamping and rescaling math
//! - `gesture`: Drag, wheel and zoom control state machine
//! - `i18n`: Localization support using fluent translations
//! - `notify`: Notification channel
//! - `overlay`: Overlay element presence
//! - `renderer`: Code generation and overlay content
//! - `state`: Overlay geometry state
//! - `timer`: Deadlines and resize debouncing

pub mod app_settings;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod document;
pub mod geometry;
pub mod gesture;
pub mod i18n;
pub mod notify;
pub mod overlay;
pub mod renderer;
pub mod state;
pub mod timer;

pub use crate::i18n::LANGUAGE_LOADER;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use crate::app_settings::{ERROR_CLASS, OVERLAY_ID, PRIMARY_BUTTON};
    use crate::config::{MemoryStore, Settings, SettingsStore};
    use crate::controller::{OverlayController, PrintEvent, ToggleError, ToggleOutcome};
    use crate::coordinator::{self, ActionState, Coordinator, PageId, PageNotifier};
    use crate::document::{Content, Display, HostDocument, MemoryDocument};
    use crate::gesture::{PointerEvent, PointerTarget};
    use crate::state::{Position, Viewport};
    use std::time::{Duration, Instant};

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 800.0)
    }

    /// Integration Test 1: Short address printed with default settings
    ///
    /// The overlay appears at the top-right corner with a graphic sized from
    /// the configured size.
    #[test]
    fn test_scenario_short_address() {
        let (tx, _rx) = coordinator::channel();
        let document = MemoryDocument::new("https://example.com/a", viewport());
        let mut ctrl = OverlayController::from_settings(
            document,
            &Settings::default(),
            Box::new(PageNotifier::new(PageId(1), tx)),
        );

        ctrl.on_print(PrintEvent::BeforePrint, Instant::now());

        let element = ctrl.document().find_element(OVERLAY_ID).unwrap();
        let node = ctrl.document().element(element).unwrap();
        assert_eq!(node.display, Display::Block);
        assert_eq!(node.position, Position::new(0.0, 0.0));
        assert_eq!(node.anchor, Some(ctrl.config().anchor));

        match &node.children[0] {
            Content::Graphic(graphic) => {
                assert!(graphic.size <= 120, "Graphic must fit the content area");
                assert!(120 - graphic.size < graphic.modules);
            }
            other => panic!("Expected a graphic, got {:?}", other),
        }
        assert!(!node.has_class(ERROR_CLASS));
    }

    /// Integration Test 2: Address too long to encode
    ///
    /// The overlay shows the error text, the coordinator receives the error
    /// and the overlay hides itself after the delay.
    #[test]
    fn test_scenario_long_address() {
        let (tx, mut rx) = coordinator::channel();
        let long_url = format!("https://example.com/{}", "a".repeat(5000));
        let document = MemoryDocument::new(long_url, viewport());
        let mut ctrl = OverlayController::from_settings(
            document,
            &Settings::default(),
            Box::new(PageNotifier::new(PageId(2), tx)),
        );
        let mut coordinator = Coordinator::new();
        let now = Instant::now();

        ctrl.on_print(PrintEvent::BeforePrint, now);

        let element = ctrl.element().unwrap();
        let node = ctrl.document().element(element).unwrap();
        assert_eq!(node.children.len(), 1);
        assert!(matches!(node.children[0], Content::Text(_)));
        assert!(node.has_class(ERROR_CLASS));
        assert!(ctrl.is_visible());

        assert_eq!(coordinator.drain_pending(&mut rx), 1);
        assert_eq!(coordinator.received(), 1);

        ctrl.poll(now + Duration::from_millis(5000));
        assert!(!ctrl.is_visible(), "Error hides itself after the delay");
    }

    /// Integration Test 3: Toggling twice keeps the geometry
    #[test]
    fn test_scenario_toggle_twice() {
        let (tx, _rx) = coordinator::channel();
        let settings = Settings {
            auto_display: false,
            ..Settings::default()
        };
        let document = MemoryDocument::new("https://example.com/a", viewport());
        let mut ctrl = OverlayController::from_settings(
            document,
            &settings,
            Box::new(PageNotifier::new(PageId(3), tx)),
        );
        let now = Instant::now();
        let geometry = *ctrl.geometry();

        assert_eq!(ctrl.toggle(now), Ok(ToggleOutcome::Shown));
        assert!(ctrl.is_visible());
        assert_eq!(ctrl.toggle(now), Ok(ToggleOutcome::Hidden));
        assert!(!ctrl.is_visible());

        assert_eq!(*ctrl.geometry(), geometry);
        assert_eq!(ctrl.document().count_with_id(OVERLAY_ID), 1);
    }

    /// Integration Test 4: Stored settings flow into the overlay
    #[test]
    fn test_stored_settings_resolution() {
        let store = MemoryStore::with_value(serde_json::json!({
            "size": "200",
            "color": "336699",
            "verticalPosition": "bottom",
            "horizontalPosition": "left"
        }));
        let settings = store.load().unwrap();

        let document = MemoryDocument::new("https://example.com/a", viewport())
            .with_theme_color("#ff0000");
        let (tx, _rx) = coordinator::channel();
        let mut ctrl = OverlayController::from_settings(
            document,
            &settings,
            Box::new(PageNotifier::new(PageId(4), tx)),
        );

        assert_eq!(ctrl.config().color, "#336699", "Explicit color wins over theme");
        ctrl.toggle(Instant::now()).unwrap();

        let node = ctrl.document().element(ctrl.element().unwrap()).unwrap();
        match &node.children[0] {
            Content::Graphic(graphic) => {
                assert!(graphic.size <= 200 && 200 - graphic.size < graphic.modules);
                assert!(graphic.svg.contains("#336699"));
            }
            other => panic!("Expected a graphic, got {:?}", other),
        }
    }

    /// Integration Test 5: Drag then print session keeps the placement
    #[test]
    fn test_drag_survives_print_sessions() {
        let (tx, _rx) = coordinator::channel();
        let document = MemoryDocument::new("https://example.com/a", viewport());
        let mut ctrl = OverlayController::from_settings(
            document,
            &Settings::default(),
            Box::new(PageNotifier::new(PageId(5), tx)),
        );
        let now = Instant::now();

        ctrl.on_print(PrintEvent::BeforePrint, now);
        ctrl.handle_pointer(
            PointerEvent::Down {
                target: PointerTarget::Overlay,
                button: PRIMARY_BUTTON,
                x: 1200.0,
                y: 40.0,
            },
            now,
        );
        ctrl.handle_pointer(
            PointerEvent::Move {
                target: PointerTarget::Document,
                x: 1150.0,
                y: 90.0,
            },
            now,
        );
        ctrl.handle_pointer(
            PointerEvent::Up {
                target: PointerTarget::Document,
                button: PRIMARY_BUTTON,
            },
            now,
        );
        ctrl.on_print(PrintEvent::AfterPrint, now);

        ctrl.on_print(PrintEvent::BeforePrint, now);
        let node = ctrl.document().element(ctrl.element().unwrap()).unwrap();
        assert_eq!(node.position, Position::new(50.0, 50.0));
    }

    /// Integration Test 6: Notifications and denied toggles reach the coordinator
    #[tokio::test]
    async fn test_coordinator_flow() {
        let (tx, mut rx) = coordinator::channel();
        let mut coordinator = Coordinator::new();

        let long_url = format!("https://example.com/{}", "z".repeat(5000));
        let mut failing = OverlayController::from_settings(
            MemoryDocument::new(long_url, viewport()),
            &Settings::default(),
            Box::new(PageNotifier::new(PageId(10), tx.clone())),
        );
        let mut locked = OverlayController::from_settings(
            MemoryDocument::new("https://example.com/", viewport()).deny_scripting(),
            &Settings::default(),
            Box::new(PageNotifier::new(PageId(11), tx)),
        );
        let now = Instant::now();

        let result = failing.toggle(now);
        assert_eq!(result, Ok(ToggleOutcome::Error));
        coordinator.handle_toggle_result(PageId(10), &result);

        let result = locked.toggle(now);
        assert_eq!(result, Err(ToggleError::ScriptInjectionDenied));
        coordinator.handle_toggle_result(PageId(11), &result);

        // Dropping the controllers closes the channel
        drop(failing);
        drop(locked);
        let count = coordinator.drain(&mut rx).await;

        assert_eq!(count, 1);
        assert_eq!(coordinator.action_state(PageId(10)), ActionState::Enabled);
        assert_eq!(coordinator.action_state(PageId(11)), ActionState::Disabled);
    }
}
