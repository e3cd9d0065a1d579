//! Structured request logging.
//!
//! Every dispatched request produces one `Dispatched` event and then exactly
//! one terminal event, `Succeeded` or `Failed`. Events go to an
//! [`EventSink`]; [`TracingSink`] forwards them to `tracing`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::field::display;
use tracing::Level;

use super::pipeline::{RequestContext, ResponseMeta, Stage};
use super::ApiError;

/// Target used for all client log events
pub const LOG_TARGET: &str = "marketdeck::api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Dispatched,
    Succeeded,
    Failed,
    SessionExpired,
}

impl EventKind {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::Succeeded | EventKind::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFields {
    pub method: String,
    pub path: String,
    pub origin: Option<String>,
    pub params: Option<String>,
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub duration: Option<Duration>,
    pub correlation_id: Option<String>,
    pub error_message: Option<String>,
}

impl LogFields {
    pub fn for_request(ctx: &RequestContext) -> Self {
        Self {
            method: ctx.method.to_string(),
            path: ctx.path.clone(),
            ..Default::default()
        }
    }
}

/// One structured log record. `failure` carries the original error on
/// failure events so sinks can inspect it.
#[derive(Debug)]
pub struct LogEvent<'a> {
    pub kind: EventKind,
    pub severity: Severity,
    pub message: &'static str,
    pub fields: LogFields,
    pub failure: Option<&'a ApiError>,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &LogEvent<'_>);
}

/// Sends events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

macro_rules! trace_event {
    ($level:expr, $event:expr) => {{
        let event = $event;
        let f = &event.fields;
        tracing::event!(
            target: LOG_TARGET,
            $level,
            method = %f.method,
            path = %f.path,
            origin = f.origin.as_deref(),
            params = f.params.as_deref(),
            status = f.status,
            status_text = f.status_text.as_deref(),
            duration_ms = f.duration.map(duration_ms),
            correlation_id = f.correlation_id.as_deref(),
            error_message = f.error_message.as_deref(),
            error = event.failure.map(display),
            "{}",
            event.message
        );
    }};
}

impl EventSink for TracingSink {
    fn emit(&self, event: &LogEvent<'_>) {
        match event.severity {
            Severity::Debug => trace_event!(Level::DEBUG, event),
            Severity::Warn => trace_event!(Level::WARN, event),
            Severity::Error => trace_event!(Level::ERROR, event),
        }
    }
}

/// Milliseconds rounded to two decimals
fn duration_ms(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 100_000.0).round() / 100.0
}

/// Stamps requests on dispatch and logs how they ended.
pub struct ObservabilityInterceptor {
    sink: Arc<dyn EventSink>,
}

impl ObservabilityInterceptor {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl Stage for ObservabilityInterceptor {
    fn name(&self) -> &'static str {
        "observability"
    }

    fn on_request(&self, ctx: &mut RequestContext) {
        ctx.dispatched_at = Some(Instant::now());
        self.sink.emit(&LogEvent {
            kind: EventKind::Dispatched,
            severity: Severity::Debug,
            message: "API request",
            fields: LogFields {
                origin: Some(ctx.origin.clone()),
                params: ctx.params_display(),
                ..LogFields::for_request(ctx)
            },
            failure: None,
        });
    }

    fn on_success(&self, ctx: &RequestContext, response: &ResponseMeta) {
        self.sink.emit(&LogEvent {
            kind: EventKind::Succeeded,
            severity: Severity::Debug,
            message: "API response",
            fields: LogFields {
                status: Some(response.status.as_u16()),
                duration: Some(ctx.elapsed()),
                correlation_id: response.correlation_id.clone(),
                ..LogFields::for_request(ctx)
            },
            failure: None,
        });
    }

    fn on_failure(&self, ctx: &RequestContext, error: &ApiError) {
        self.sink.emit(&LogEvent {
            kind: EventKind::Failed,
            severity: Severity::Error,
            message: "API request failed",
            fields: LogFields {
                status: error.status().map(|s| s.as_u16()),
                status_text: error.status_text().map(str::to_string),
                duration: Some(ctx.elapsed()),
                correlation_id: error.correlation_id().map(str::to_string),
                error_message: Some(error.message()),
                ..LogFields::for_request(ctx)
            },
            failure: Some(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::pipeline::Service;
    use reqwest::{Method, StatusCode};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(EventKind, Severity, LogFields, bool)>>,
    }

    impl EventSink for Recorder {
        fn emit(&self, event: &LogEvent<'_>) {
            self.events.lock().unwrap().push((
                event.kind,
                event.severity,
                event.fields.clone(),
                event.failure.is_some(),
            ));
        }
    }

    fn setup() -> (Arc<Recorder>, ObservabilityInterceptor, RequestContext) {
        let recorder = Arc::new(Recorder::default());
        let interceptor = ObservabilityInterceptor::new(recorder.clone());
        let ctx = RequestContext::new(Method::GET, Service::Analytics, "http://localhost:8086", "/summary")
            .query(vec![("tenant_id".to_string(), "t0".to_string())]);
        (recorder, interceptor, ctx)
    }

    #[test]
    fn test_dispatch_stamps_and_logs_request() {
        let (recorder, interceptor, mut ctx) = setup();
        interceptor.on_request(&mut ctx);

        assert!(ctx.dispatched_at.is_some());
        let events = recorder.events.lock().unwrap();
        let (kind, severity, fields, _) = &events[0];
        assert_eq!(*kind, EventKind::Dispatched);
        assert_eq!(*severity, Severity::Debug);
        assert_eq!(fields.method, "GET");
        assert_eq!(fields.origin.as_deref(), Some("http://localhost:8086"));
        assert_eq!(fields.params.as_deref(), Some("tenant_id=t0"));
    }

    #[test]
    fn test_success_logs_status_and_correlation_id() {
        let (recorder, interceptor, mut ctx) = setup();
        interceptor.on_request(&mut ctx);
        let meta = ResponseMeta {
            status: StatusCode::OK,
            correlation_id: Some("req-42".to_string()),
        };
        interceptor.on_success(&ctx, &meta);

        let events = recorder.events.lock().unwrap();
        let (kind, _, fields, failure) = &events[1];
        assert_eq!(*kind, EventKind::Succeeded);
        assert_eq!(fields.status, Some(200));
        assert_eq!(fields.correlation_id.as_deref(), Some("req-42"));
        assert!(fields.duration.is_some());
        assert!(!failure);
    }

    #[test]
    fn test_failure_without_dispatch_stamp_reports_zero_duration() {
        let (recorder, interceptor, ctx) = setup();
        let error = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Invalid agent"}"#,
            None,
        );
        interceptor.on_failure(&ctx, &error);

        let events = recorder.events.lock().unwrap();
        let (kind, severity, fields, failure) = &events[0];
        assert_eq!(*kind, EventKind::Failed);
        assert_eq!(*severity, Severity::Error);
        assert_eq!(fields.duration, Some(Duration::ZERO));
        assert_eq!(fields.status, Some(400));
        assert_eq!(fields.status_text.as_deref(), Some("Bad Request"));
        assert_eq!(fields.error_message.as_deref(), Some("Invalid agent"));
        assert!(failure);
    }

    #[test]
    fn test_tracing_sink_accepts_every_severity() {
        let ctx = RequestContext::new(Method::DELETE, Service::Primary, "http://x", "/campaigns/1");
        let error = ApiError::from_status(StatusCode::NOT_FOUND, "", None);
        for (severity, failure) in [
            (Severity::Debug, None),
            (Severity::Warn, None),
            (Severity::Error, Some(&error)),
        ] {
            TracingSink.emit(&LogEvent {
                kind: EventKind::Failed,
                severity,
                message: "test",
                fields: LogFields::for_request(&ctx),
                failure,
            });
        }
    }

    #[test]
    fn test_duration_ms_rounding() {
        assert_eq!(duration_ms(Duration::from_micros(1_234_567)), 1234.57);
        assert_eq!(duration_ms(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_only_outcomes_are_terminal() {
        assert!(EventKind::Succeeded.is_terminal());
        assert!(EventKind::Failed.is_terminal());
        assert!(!EventKind::Dispatched.is_terminal());
        assert!(!EventKind::SessionExpired.is_terminal());
    }
}
