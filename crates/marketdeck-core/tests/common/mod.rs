#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use marketdeck_core::api::{ApiClient, EventKind, EventSink, LogEvent, LogFields, Severity};
use marketdeck_core::{MemorySessionStore, Navigator, ServiceOrigins};

/// Owned copy of a log event
#[derive(Debug, Clone)]
pub struct Recorded {
    pub kind: EventKind,
    pub severity: Severity,
    pub message: &'static str,
    pub fields: LogFields,
    pub failure: Option<String>,
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    pub fn terminal(&self) -> Vec<Recorded> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.is_terminal())
            .collect()
    }

    pub fn of_kind(&self, kind: EventKind) -> Vec<Recorded> {
        self.events().into_iter().filter(|e| e.kind == kind).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &LogEvent<'_>) {
        self.events.lock().unwrap().push(Recorded {
            kind: event.kind,
            severity: event.severity,
            message: event.message,
            fields: event.fields.clone(),
            failure: event.failure.map(|e| e.to_string()),
        });
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: AtomicUsize,
}

impl RecordingNavigator {
    pub fn visits(&self) -> usize {
        self.visits.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn go_to_login(&self) {
        self.visits.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub session: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(origins: ServiceOrigins) -> Self {
        let session = Arc::new(MemorySessionStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let sink = Arc::new(RecordingSink::default());
        let client = ApiClient::builder(origins)
            .session(session.clone())
            .navigator(navigator.clone())
            .event_sink(sink.clone())
            .build()
            .expect("client builds");
        Self {
            client,
            session,
            navigator,
            sink,
        }
    }

    /// Both services on the same mock server
    pub fn single(uri: &str) -> Self {
        Self::new(ServiceOrigins::new(uri, uri))
    }

    pub fn with_token(self, token: &str) -> Self {
        use marketdeck_core::SessionStore;
        self.session.set(token).unwrap();
        self
    }
}

pub fn duration_of(event: &Recorded) -> Duration {
    event.fields.duration.expect("terminal events carry a duration")
}
