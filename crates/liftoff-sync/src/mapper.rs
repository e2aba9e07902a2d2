//! Pure normalization of raw launches into stored records.
//!
//! No I/O happens here. The status precedence rule lives in exactly one
//! place, [`resolve_status`]: `upcoming` overrides `success`, whatever
//! `success` contains.

use liftoff_core::launch::{LaunchRecord, LaunchStatus};

use crate::source::RawLaunch;

/// Derives the stored status from the raw `upcoming`/`success` flags.
///
/// An `upcoming` launch is `Upcoming` regardless of `success`; otherwise
/// `success` decides: `true` → `Success`, `false` → `Failed`, absent/null →
/// `Unknown`.
#[must_use]
pub fn resolve_status(raw: &RawLaunch) -> LaunchStatus {
    if raw.upcoming.unwrap_or(false) {
        return LaunchStatus::Upcoming;
    }
    match raw.success {
        Some(true) => LaunchStatus::Success,
        Some(false) => LaunchStatus::Failed,
        None => LaunchStatus::Unknown,
    }
}

/// Maps a raw launch to the normalized storage schema.
///
/// Absent or null optional fields become empty strings (empty list for
/// `payloads`), including link fields behind any missing nesting level.
/// `flight_number` is coerced to its decimal string form. The mapping is
/// deterministic and idempotent.
#[must_use]
pub fn map_launch(raw: &RawLaunch) -> LaunchRecord {
    let links = raw.links.as_ref();
    let patch = links.and_then(|l| l.patch.as_ref());

    LaunchRecord {
        launch_id: raw.id.clone(),
        mission_name: raw.name.clone().unwrap_or_default(),
        rocket_name: raw.rocket.clone().unwrap_or_default(),
        launch_date: raw.date_utc.clone().unwrap_or_default(),
        status: resolve_status(raw),
        launchpad: raw.launchpad.clone().unwrap_or_default(),
        flight_number: raw.flight_number.map(|n| n.to_string()).unwrap_or_default(),
        details: raw.details.clone().unwrap_or_default(),
        payloads: raw.payloads.clone().unwrap_or_default(),
        webcast_url: links.and_then(|l| l.webcast.clone()).unwrap_or_default(),
        article_url: links.and_then(|l| l.article.clone()).unwrap_or_default(),
        wikipedia_url: links.and_then(|l| l.wikipedia.clone()).unwrap_or_default(),
        patch_small: patch.and_then(|p| p.small.clone()).unwrap_or_default(),
        patch_large: patch.and_then(|p| p.large.clone()).unwrap_or_default(),
    }
}
