//! In-memory store and log capture shared by the unit tests

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::{Error, Result};
use crate::path::RemotePath;
use crate::traits::ObjectStore;

/// Failure count meaning "fail every attempt"
pub const ALWAYS: u32 = u32::MAX;

/// Object store held in memory, keyed by the full `obs://` path
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    failures: Mutex<HashMap<String, u32>>,
    calls: Mutex<HashMap<String, u32>>,
    broken_listings: Mutex<HashSet<String>>,
    truncated: Mutex<HashSet<String>>,
    /// Report directory children without their trailing separator
    pub bare_dir_names: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bare_dir_names() -> Self {
        Self {
            bare_dir_names: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, path: &str, data: &[u8]) {
        let path = RemotePath::parse(path).unwrap();
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
    }

    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        let path = RemotePath::parse(path).unwrap();
        self.objects.lock().unwrap().get(&path.to_string()).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Make the next `times` transfers of `path` fail
    pub fn fail(&self, path: &str, times: u32) {
        let path = RemotePath::parse(path).unwrap();
        self.failures.lock().unwrap().insert(path.to_string(), times);
    }

    /// Make every download of `path` write half the object, then fail
    pub fn truncate(&self, path: &str) {
        let path = RemotePath::parse(path).unwrap();
        self.truncated.lock().unwrap().insert(path.to_string());
    }

    /// Make listing `dir` fail
    pub fn break_listing(&self, dir: &str) {
        let dir = RemotePath::parse(dir).unwrap();
        self.broken_listings.lock().unwrap().insert(dir.to_string());
    }

    /// Number of get/put transfers attempted for `path`
    pub fn calls(&self, path: &str) -> u32 {
        let path = RemotePath::parse(path).unwrap();
        self.calls
            .lock()
            .unwrap()
            .get(&path.to_string())
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, key: &str) -> Result<()> {
        *self.calls.lock().unwrap().entry(key.to_string()).or_default() += 1;

        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(key) {
            Some(0) | None => Ok(()),
            Some(remaining) => {
                if *remaining != ALWAYS {
                    *remaining -= 1;
                }
                Err(Error::Network(format!("injected failure for {key}")))
            }
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_dir(&self, dir: &RemotePath) -> Result<Vec<String>> {
        let prefix = dir.as_dir().to_string();
        if self.broken_listings.lock().unwrap().contains(&prefix) {
            return Err(Error::Network(format!("listing failed for {prefix}")));
        }

        let objects = self.objects.lock().unwrap();
        let mut children = BTreeSet::new();
        for key in objects.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let child = match rest.find('/') {
                Some(idx) if self.bare_dir_names => rest[..idx].to_string(),
                Some(idx) => rest[..=idx].to_string(),
                None => rest.to_string(),
            };
            children.insert(child);
        }
        Ok(children.into_iter().collect())
    }

    async fn exists(&self, path: &RemotePath) -> Result<bool> {
        let key = path.to_string();
        let objects = self.objects.lock().unwrap();
        if path.is_dir() {
            Ok(objects.keys().any(|k| k.starts_with(&key)))
        } else {
            Ok(objects.contains_key(&key))
        }
    }

    async fn get_file(&self, src: &RemotePath, dst: &Path) -> Result<()> {
        let key = src.to_string();
        self.record(&key)?;
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.clone()))?;

        if self.truncated.lock().unwrap().contains(&key) {
            tokio::fs::write(dst, &data[..data.len() / 2]).await?;
            return Err(Error::Network(format!("body stream reset for {key}")));
        }

        tokio::fs::write(dst, data).await?;
        Ok(())
    }

    async fn put_file(&self, src: &Path, dst: &RemotePath) -> Result<()> {
        let key = dst.to_string();
        self.record(&key)?;
        let data = tokio::fs::read(src).await?;
        self.objects.lock().unwrap().insert(key, data);
        Ok(())
    }

    async fn make_dirs(&self, dir: &RemotePath) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .entry(dir.as_dir().to_string())
            .or_default();
        Ok(())
    }

    async fn get_object(&self, path: &RemotePath) -> Result<Vec<u8>> {
        let key = path.to_string();
        self.objects
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(Error::NotFound(key))
    }
}

/// Counts WARN events seen while installed as the thread default
#[derive(Clone, Default)]
pub struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Install a warning counter for the current thread
pub fn capture_warnings() -> (WarnCounter, tracing::subscriber::DefaultGuard) {
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (counter, guard)
}
