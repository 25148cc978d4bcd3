//! Two engines syncing through one shared store fake: the full
//! publish → store → pull → apply path, including echo suppression.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::time::sleep;

use cs_app::engine::SyncEngine;
use cs_core::config::SyncTuning;
use cs_core::device::DeviceId;
use cs_core::error::SyncError;
use cs_core::ports::{LocalClipboardPort, SyncTransport};
use cs_core::protocol::RemoteRecord;

struct InMemoryClipboard {
    text: StdMutex<String>,
    write_count: AtomicUsize,
}

impl InMemoryClipboard {
    fn new(initial: &str) -> Arc<Self> {
        Arc::new(Self {
            text: StdMutex::new(initial.to_string()),
            write_count: AtomicUsize::new(0),
        })
    }

    fn set(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    fn get(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    fn writes(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

impl LocalClipboardPort for InMemoryClipboard {
    fn read_text(&self) -> Result<String> {
        let text = self
            .text
            .lock()
            .map_err(|_| anyhow!("clipboard lock poisoned"))?;
        Ok(text.clone())
    }

    fn write_text(&self, text: &str) -> Result<()> {
        let mut guard = self
            .text
            .lock()
            .map_err(|_| anyhow!("clipboard lock poisoned"))?;
        *guard = text.to_string();
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone)]
struct StoredRecord {
    id: i64,
    device_id: String,
    content: String,
}

/// Both devices talk to this one fake store, the way real agents share a
/// central service.
#[derive(Default)]
struct SharedStore {
    records: StdMutex<Vec<StoredRecord>>,
}

impl SharedStore {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn contents_by(&self, device_id: &str) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.device_id == device_id)
            .map(|r| r.content.clone())
            .collect()
    }
}

#[async_trait]
impl SyncTransport for SharedStore {
    async fn publish(&self, device_id: &DeviceId, content: &str) -> Result<i64, SyncError> {
        if content.is_empty() {
            return Err(SyncError::Validation("Missing content".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let id = records.len() as i64 + 1;
        records.push(StoredRecord {
            id,
            device_id: device_id.as_str().to_string(),
            content: content.to_string(),
        });
        Ok(id)
    }

    async fn fetch_latest(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<RemoteRecord>, SyncError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .find(|r| r.device_id == device_id.as_str())
            .map(|r| RemoteRecord {
                id: r.id,
                content: r.content.clone(),
                device_id: r.device_id.clone(),
                timestamp: chrono::Utc::now(),
            }))
    }
}

fn engine(
    clipboard: &Arc<InMemoryClipboard>,
    store: &Arc<SharedStore>,
    device: &str,
    watch: Option<&str>,
) -> Arc<SyncEngine> {
    Arc::new(SyncEngine::new(
        DeviceId::from(device),
        watch.map(DeviceId::from),
        Arc::clone(clipboard) as Arc<dyn LocalClipboardPort>,
        Arc::clone(store) as Arc<dyn SyncTransport>,
        SyncTuning::default(),
    ))
}

#[tokio::test(start_paused = true)]
async fn two_devices_replicate_without_echo() {
    let store = SharedStore::new();

    let clipboard_a = InMemoryClipboard::new("");
    let clipboard_b = InMemoryClipboard::new("");

    let device_a = engine(&clipboard_a, &store, "aaaa1111", None);
    // Device B follows device A's stream.
    let device_b = engine(&clipboard_b, &store, "bbbb2222", Some("aaaa1111"));

    let handle_a = device_a.clone().start();
    let handle_b = device_b.clone().start();

    // Device A copies "hello".
    sleep(Duration::from_millis(100)).await;
    clipboard_a.set("hello");

    // Within one pull interval device B has the value locally.
    sleep(Duration::from_secs(3)).await;
    assert_eq!(clipboard_b.get(), "hello");

    // ...and does not re-publish it as its own.
    assert!(store.contents_by("bbbb2222").is_empty());
    assert_eq!(store.contents_by("aaaa1111"), vec!["hello".to_string()]);

    // A later unrelated edit on device A still flows through normally.
    clipboard_a.set("world");
    sleep(Duration::from_secs(4)).await;
    assert_eq!(
        store.contents_by("aaaa1111"),
        vec!["hello".to_string(), "world".to_string()]
    );
    assert_eq!(clipboard_b.get(), "world");
    assert!(store.contents_by("bbbb2222").is_empty());

    device_a.stop();
    device_b.stop();
    handle_a.join().await;
    handle_b.join().await;
}

#[tokio::test(start_paused = true)]
async fn an_idle_pair_settles_with_no_redundant_writes() {
    let store = SharedStore::new();

    let clipboard_a = InMemoryClipboard::new("");
    let clipboard_b = InMemoryClipboard::new("");

    let device_a = engine(&clipboard_a, &store, "aaaa1111", None);
    let device_b = engine(&clipboard_b, &store, "bbbb2222", Some("aaaa1111"));

    let handle_a = device_a.clone().start();
    let handle_b = device_b.clone().start();

    sleep(Duration::from_millis(100)).await;
    clipboard_a.set("steady state");
    sleep(Duration::from_secs(20)).await;

    // Fetching the same record over and over applies it exactly once.
    assert_eq!(clipboard_b.writes(), 1);
    assert_eq!(clipboard_b.get(), "steady state");

    device_a.stop();
    device_b.stop();
    handle_a.join().await;
    handle_b.join().await;
}
