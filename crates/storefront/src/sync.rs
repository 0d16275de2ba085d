//! Picks up cart changes made outside this process.
//!
//! The CLI (or a second storefront) can write the same cart file. A
//! background task watches the file's modification time and, when it moves,
//! asks the store to refresh. The store only re-notifies if the persisted
//! cart actually differs, so our own writes are ignored.
//!
//! File timestamps are coarse, so two writes close together can share one.
//! A stamp younger than [`RACY_WINDOW`] is not trusted and the file is
//! re-read on every tick until it ages out.

use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use warung_core::cart::FileStorage;

use crate::state::AppState;

/// How long after a write its modification time is considered ambiguous.
pub const RACY_WINDOW: Duration = Duration::from_secs(2);

/// Poll `storage` every `interval` and refresh the store on change.
#[must_use]
pub fn spawn_storage_sync(
    state: AppState,
    storage: FileStorage,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last_seen: Option<SystemTime> = None;

        loop {
            ticker.tick().await;
            sync_once(&state, &storage, &mut last_seen);
        }
    })
}

/// One polling step. Returns true if the in-memory cart was replaced.
pub fn sync_once(
    state: &AppState,
    storage: &FileStorage,
    last_seen: &mut Option<SystemTime>,
) -> bool {
    let Ok(mut store) = state.cart() else {
        tracing::error!("cart lock poisoned, storage sync skipped");
        return false;
    };

    let stamp = match storage.modified(store.key()) {
        Ok(stamp) => stamp,
        Err(e) => {
            tracing::warn!(error = %e, "failed to stat cart file");
            return false;
        }
    };
    if stamp == *last_seen && !is_racy(stamp) {
        return false;
    }
    *last_seen = stamp;

    let changed = store.refresh();
    if changed {
        tracing::info!(lines = store.items().len(), "cart reloaded after external change");
    }
    changed
}

fn is_racy(stamp: Option<SystemTime>) -> bool {
    stamp.is_some_and(|modified| {
        SystemTime::now()
            .duration_since(modified)
            .map_or(true, |age| age < RACY_WINDOW)
    })
}
