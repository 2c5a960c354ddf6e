// Shared stubs for integration tests
#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use daily_insights::{
    AnalyzerClient, DailyBuffer, LinkKind, Orchestrator, ServiceError, SharedBuffer,
    StorageClient, StorageLink,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const ALLOWED_CHAT: i64 = 4242;
pub const OTHER_CHAT: i64 = 1313;

/// 2025-10-28 at the given UTC time
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 28, hour, minute, 0).unwrap()
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

pub fn shared_buffer() -> SharedBuffer {
    DailyBuffer::shared(utc())
}

/// Analyzer returning a canned result and recording its inputs
pub struct StubAnalyzer {
    response: Result<String, ServiceError>,
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
}

impl StubAnalyzer {
    pub fn ok(summary: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(summary.to_string()),
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(ServiceError::new("stub", message)),
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AnalyzerClient for StubAnalyzer {
    async fn analyze(&self, text: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        self.response.clone()
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Analyzer that blocks until released, for interleaving tests
pub struct GatedAnalyzer {
    pub entered: Notify,
    pub release: Notify,
}

impl GatedAnalyzer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait::async_trait]
impl AnalyzerClient for GatedAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<String, ServiceError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("gated summary".to_string())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Storage handing out `L1`, `L2`, ... or failing selected kinds
pub struct StubStorage {
    fail_kinds: Vec<LinkKind>,
    pub calls: AtomicUsize,
    pub uploads: Mutex<Vec<(String, String, LinkKind)>>,
}

impl StubStorage {
    pub fn ok() -> Arc<Self> {
        Self::failing_for(&[])
    }

    pub fn failing() -> Arc<Self> {
        Self::failing_for(&[LinkKind::RawInput, LinkKind::Insight])
    }

    pub fn failing_for(kinds: &[LinkKind]) -> Arc<Self> {
        Arc::new(Self {
            fail_kinds: kinds.to_vec(),
            calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StorageClient for StubStorage {
    async fn upload(
        &self,
        content: &str,
        name: &str,
        kind: LinkKind,
    ) -> Result<StorageLink, ServiceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.uploads
            .lock()
            .unwrap()
            .push((content.to_string(), name.to_string(), kind));

        if self.fail_kinds.contains(&kind) {
            return Err(ServiceError::new("stub storage", "quota exceeded"));
        }

        Ok(StorageLink {
            url: format!("L{}", n),
            kind,
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

pub fn orchestrator(
    buffer: &SharedBuffer,
    analyzer: Arc<dyn AnalyzerClient>,
    storage: Arc<dyn StorageClient>,
) -> Orchestrator {
    Orchestrator::new(Arc::clone(buffer), analyzer, storage, ALLOWED_CHAT)
}

/// Serve `router` on an ephemeral local port, returning its base URL
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
