// SPDX-License-Identifier: GPL-3.0-only

//! printqr demo session
//!
//! Replays a scripted browsing session against in-memory pages and logs
//! every overlay transition. An optional argument names a JSON settings file.

use std::time::Instant;

use printqr::app_settings::PRIMARY_BUTTON;
use printqr::config::{JsonFileStore, Settings, SettingsStore};
use printqr::controller::{OverlayController, PageEvent, PrintEvent, ToggleError};
use printqr::coordinator::{self, Coordinator, PageId, PageNotifier};
use printqr::document::MemoryDocument;
use printqr::gesture::{PointerEvent, PointerTarget};
use printqr::i18n;
use printqr::state::Viewport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("printqr=info")),
        )
        .init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    let settings = match std::env::args().nth(1) {
        Some(path) => JsonFileStore::new(path).load()?,
        None => Settings::default(),
    };
    for warning in settings.validate() {
        tracing::warn!("{}", warning.message());
    }

    let (tx, mut rx) = coordinator::channel();
    let coordinator = tokio::spawn(async move {
        let mut coordinator = Coordinator::new();
        coordinator.on_installed();
        coordinator.drain(&mut rx).await;
        coordinator
    });

    let viewport = Viewport::new(1280.0, 800.0);
    let start = Instant::now();
    let mut toggles: Vec<(PageId, Result<_, ToggleError>)> = Vec::new();

    // A regular article: print, drag, zoom, resize the window, toggle
    let article = PageId(1);
    let mut page = OverlayController::from_settings(
        MemoryDocument::new("https://example.com/articles/42", viewport),
        &settings,
        Box::new(PageNotifier::new(article, tx.clone())),
    );
    let session = [
        PageEvent::Print(PrintEvent::BeforePrint),
        PageEvent::Pointer(PointerEvent::Down {
            target: PointerTarget::Overlay,
            button: PRIMARY_BUTTON,
            x: 1200.0,
            y: 40.0,
        }),
        PageEvent::Pointer(PointerEvent::Move {
            target: PointerTarget::Document,
            x: 1100.0,
            y: 140.0,
        }),
        PageEvent::Pointer(PointerEvent::Up {
            target: PointerTarget::Document,
            button: PRIMARY_BUTTON,
        }),
        PageEvent::Pointer(PointerEvent::Wheel {
            target: PointerTarget::Overlay,
            delta_y: -1.0,
        }),
        PageEvent::Print(PrintEvent::AfterPrint),
    ];
    for event in session {
        page.dispatch(event, start)?;
    }

    page.document_mut().set_viewport(Viewport::new(960.0, 600.0));
    page.dispatch(PageEvent::ViewportResized, start)?;
    while let Some(deadline) = page.next_deadline() {
        page.dispatch(PageEvent::Tick, deadline)?;
    }
    tracing::info!(
        "Overlay settled at {:?} with size {:?}",
        page.geometry().position(),
        page.geometry().dimension()
    );

    toggles.push((article, page.toggle(start)));
    page.document_mut().set_location("https://example.com/articles/42#comments");
    page.on_navigation(start);
    toggles.push((article, page.toggle(start)));
    drop(page);

    // An address too long to encode
    let long_page = PageId(2);
    let mut page = OverlayController::from_settings(
        MemoryDocument::new(
            format!("https://example.com/search?q={}", "printqr".repeat(600)),
            viewport,
        ),
        &settings,
        Box::new(PageNotifier::new(long_page, tx.clone())),
    );
    page.on_print(PrintEvent::BeforePrint, start);
    if let Some(deadline) = page.next_deadline() {
        tracing::info!("Error auto-hide in {:?}", deadline - start);
        page.poll(deadline);
    }
    tracing::info!("Long address overlay visible: {}", page.is_visible());
    drop(page);

    // A page that forbids scripts
    let locked_page = PageId(3);
    let mut page = OverlayController::from_settings(
        MemoryDocument::new("https://example.com/locked", viewport).deny_scripting(),
        &settings,
        Box::new(PageNotifier::new(locked_page, tx)),
    );
    toggles.push((locked_page, page.toggle(start)));

    // Close the channel so the coordinator finishes
    drop(page);

    let mut coordinator = coordinator.await?;
    for (id, result) in &toggles {
        coordinator.handle_toggle_result(*id, result);
    }
    for id in [article, long_page, locked_page] {
        tracing::info!("Toolbar action on {}: {:?}", id, coordinator.action_state(id));
    }

    Ok(())
}
