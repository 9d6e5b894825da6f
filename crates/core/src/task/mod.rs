//! Task directory naming
//!
//! Every pipeline run writes below its own directory named
//! `YYYYMMDD_HHMMSS_<adjective>-<noun>`. The timestamp uses UTC+8; the slug
//! keeps concurrent runs started in the same second apart. Any path below a
//! task directory can be mapped back to it with [`extract_task_dir`].

mod words;

use std::sync::LazyLock;

use jiff::Timestamp;
use jiff::tz::{self, TimeZone};
use rand::Rng;
use rand::seq::SliceRandom;
use regex_lite::Regex;

use crate::error::Result;
use crate::path::{RemotePath, SEPARATOR};
use crate::traits::ObjectStore;

/// Hours east of UTC used for the timestamp part of task names
pub const TASK_TZ_OFFSET_HOURS: i8 = 8;

static TASK_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{8}_\d{6}_[a-z]+(?:-[a-z]+)*$").expect("valid task name pattern")
});

/// Generate a fresh task directory name
pub fn generate_name() -> String {
    generate_name_at(Timestamp::now(), &mut rand::thread_rng())
}

/// Generate a task directory name for the given instant
pub fn generate_name_at<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> String {
    let zone = TimeZone::fixed(tz::offset(TASK_TZ_OFFSET_HOURS));
    let stamp = now.to_zoned(zone).strftime("%Y%m%d_%H%M%S").to_string();
    format!("{stamp}_{}", generate_slug(rng))
}

fn generate_slug<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = words::ADJECTIVES.choose(rng).copied().unwrap_or("quiet");
    let noun = words::NOUNS.choose(rng).copied().unwrap_or("otter");
    format!("{adjective}-{noun}")
}

/// Returns true if `name` has the shape of a task directory name
pub fn is_task_name(name: &str) -> bool {
    TASK_NAME.is_match(name)
}

/// Create a new task directory below `base` and return its path
///
/// Failing to create the directory marker is logged, not returned: the
/// directory may already exist and object stores do not need markers for
/// writes below it.
pub async fn create_task_directory<S>(store: &S, base: &str) -> Result<RemotePath>
where
    S: ObjectStore + ?Sized,
{
    let base = RemotePath::parse(base)?.as_dir();
    let task_dir = base.join(&format!("{}{SEPARATOR}", generate_name()));

    tracing::info!(dir = %task_dir, "Creating task directory");
    match store.make_dirs(&task_dir).await {
        Ok(()) => tracing::info!(dir = %task_dir, "Task directory created"),
        Err(e) => tracing::warn!(dir = %task_dir, error = %e, "Failed to create task directory"),
    }

    Ok(task_dir)
}

/// Recover the task directory containing `full_path`
///
/// Returns the directory made of `base_path` plus the first segment after
/// it, if that segment is a task name. Paths outside `base_path`, local
/// paths and non-task segments give `None`.
pub fn extract_task_dir(full_path: &str, base_path: &str) -> Option<RemotePath> {
    if !crate::path::is_remote_path(full_path) {
        return None;
    }

    let full = RemotePath::parse(full_path).ok()?;
    let base = RemotePath::parse(base_path).ok()?.as_dir();
    let remaining = full.relative_to(&base)?;

    let segment = remaining.split(SEPARATOR).next()?;
    if !is_task_name(segment) {
        return None;
    }

    Some(base.join(&format!("{segment}{SEPARATOR}")))
}
