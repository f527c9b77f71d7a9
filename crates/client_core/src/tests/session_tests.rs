use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use shared::{
    error::DEFAULT_FAILURE_MESSAGE,
    protocol::{SearchRequest, SearchResponse},
};
use tokio::sync::Notify;

use super::*;
use crate::{
    form::{FormSnapshot, LEVEL_FIELD, OBJECTIVES_FIELD, SESSION_MINUTES_FIELD},
    SearchError,
};

#[derive(Debug, Clone, PartialEq)]
enum SurfaceEvent {
    Busy(bool),
    Cleared,
    Results(DisplayTree),
    Error(String),
}

#[derive(Default)]
struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().expect("surface lock").clone()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().expect("surface lock").push(event);
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_busy(&self, busy: bool) {
        self.push(SurfaceEvent::Busy(busy));
    }

    fn clear(&self) {
        self.push(SurfaceEvent::Cleared);
    }

    fn show_results(&self, tree: DisplayTree) {
        self.push(SurfaceEvent::Results(tree));
    }

    fn show_error(&self, message: String) {
        self.push(SurfaceEvent::Error(message));
    }
}

enum Reply {
    Ok(SearchResponse),
    Service(Option<String>),
}

struct FakeBackend {
    reply: Reply,
    requests: Mutex<Vec<SearchRequest>>,
    gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    fn gated(reply: Reply, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(reply)
        }
    }

    fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Reply::Ok(response) => Ok(response.clone()),
            Reply::Service(detail) => Err(SearchError::Service {
                status: 400,
                detail: detail.clone(),
            }),
        }
    }
}

fn valid_form() -> FormSnapshot {
    let mut form = FormSnapshot::new();
    form.append(OBJECTIVES_FIELD, "fuerza")
        .set(SESSION_MINUTES_FIELD, "45")
        .set(LEVEL_FIELD, "alto");
    form
}

fn one_routine() -> SearchResponse {
    serde_json::from_value(json!({
        "ok": true,
        "results": [{
            "name": "Fuerza base",
            "objective": "fuerza",
            "minutes_target": 45,
            "level": "alto",
            "sections": {"warmup": {"minutes": 5, "items": [{"name": "Movilidad", "minutes": 5}]}},
        }],
    }))
    .expect("response")
}

#[tokio::test]
async fn successful_search_is_bracketed_by_busy_state() {
    let controller = SearchController::new(FakeBackend::new(Reply::Ok(one_routine())));
    let surface = RecordingSurface::default();

    let outcome = controller.submit(&valid_form(), &surface).await;
    assert_eq!(outcome, SubmitOutcome::Rendered { cards: 1 });

    let events = surface.events();
    assert_eq!(events.first(), Some(&SurfaceEvent::Busy(true)));
    assert_eq!(events.get(1), Some(&SurfaceEvent::Cleared));
    assert!(matches!(&events[2], SurfaceEvent::Results(tree) if tree.cards().len() == 1));
    assert_eq!(events.last(), Some(&SurfaceEvent::Busy(false)));
    assert!(!controller.busy_flag().is_busy());
}

#[tokio::test]
async fn empty_results_are_not_an_error() {
    let response = serde_json::from_value(json!({"ok": true, "results": []})).expect("response");
    let controller = SearchController::new(FakeBackend::new(Reply::Ok(response)));
    let surface = RecordingSurface::default();

    assert_eq!(
        controller.submit(&valid_form(), &surface).await,
        SubmitOutcome::Empty
    );
    assert!(surface
        .events()
        .iter()
        .all(|event| !matches!(event, SurfaceEvent::Error(_))));
}

#[tokio::test]
async fn service_detail_reaches_the_error_surface() {
    let controller = SearchController::new(FakeBackend::new(Reply::Service(Some(
        "Unsupported objective 'yoga'.".to_string(),
    ))));
    let surface = RecordingSurface::default();

    let outcome = controller.submit(&valid_form(), &surface).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Unsupported objective 'yoga'.".to_string())
    );
    assert_eq!(
        surface.events(),
        [
            SurfaceEvent::Busy(true),
            SurfaceEvent::Cleared,
            SurfaceEvent::Error("Unsupported objective 'yoga'.".to_string()),
            SurfaceEvent::Busy(false),
        ]
    );
}

#[tokio::test]
async fn service_failure_without_detail_uses_default_message() {
    let controller = SearchController::new(FakeBackend::new(Reply::Service(None)));
    let surface = RecordingSurface::default();

    assert_eq!(
        controller.submit(&valid_form(), &surface).await,
        SubmitOutcome::Failed(DEFAULT_FAILURE_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn invalid_minutes_are_rejected_before_sending() {
    let backend = FakeBackend::new(Reply::Ok(one_routine()));
    let controller = SearchController::new(backend);
    let surface = RecordingSurface::default();

    let mut form = valid_form();
    form.set(SESSION_MINUTES_FIELD, "abc");

    let outcome = controller.submit(&form, &surface).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(RequestError::InvalidSessionMinutes)
    );
    assert!(controller.backend.requests().is_empty());
    assert_eq!(surface.events().last(), Some(&SurfaceEvent::Busy(false)));
    assert!(!controller.busy_flag().is_busy());
}

#[tokio::test]
async fn negative_minutes_are_rejected_with_the_range_message() {
    let controller = SearchController::new(FakeBackend::new(Reply::Ok(one_routine())));
    let surface = RecordingSurface::default();

    let mut form = valid_form();
    form.set(SESSION_MINUTES_FIELD, "-5");

    assert_eq!(
        controller.submit(&form, &surface).await,
        SubmitOutcome::Rejected(RequestError::InvalidSessionMinutes)
    );
    assert!(surface.events().contains(&SurfaceEvent::Error(
        "Session minutes must be a number between 10 and 180.".to_string()
    )));
    assert!(controller.backend.requests().is_empty());
}

#[tokio::test]
async fn submit_while_busy_is_ignored() {
    let gate = Arc::new(Notify::new());
    let controller = SearchController::new(FakeBackend::gated(
        Reply::Ok(one_routine()),
        Arc::clone(&gate),
    ));
    let first_surface = RecordingSurface::default();
    let second_surface = RecordingSurface::default();
    let form = valid_form();

    let first = controller.submit(&form, &first_surface);
    let second = async {
        while !controller.busy_flag().is_busy() {
            tokio::task::yield_now().await;
        }
        let outcome = controller.submit(&form, &second_surface).await;
        gate.notify_one();
        outcome
    };

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first, SubmitOutcome::Rendered { cards: 1 });
    assert_eq!(second, SubmitOutcome::Ignored);
    assert!(second_surface.events().is_empty());
    assert_eq!(controller.backend.requests().len(), 1);
}

#[test]
fn busy_guard_releases_on_drop() {
    let flag = BusyFlag::default();
    let surface = RecordingSurface::default();

    let guard = flag.acquire(&surface).expect("first acquire");
    assert!(flag.is_busy());
    assert!(flag.acquire(&surface).is_none());
    drop(guard);

    assert!(!flag.is_busy());
    assert_eq!(
        surface.events(),
        [SurfaceEvent::Busy(true), SurfaceEvent::Busy(false)]
    );
}
