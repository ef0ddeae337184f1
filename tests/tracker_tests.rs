use pixel_relay::common::events::{ContentItem, ConversionEvent, EventName, Parameters};
use pixel_relay::tracking::{
    AnalyticsClient, Delivery, NoopAnalytics, RelayAnalytics, SelectedItems, TrackOutcome,
    Tracker,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RecordingAnalytics {
    emitted: Arc<Mutex<Vec<ConversionEvent>>>,
}

impl RecordingAnalytics {
    fn emitted(&self) -> Vec<ConversionEvent> {
        self.emitted.lock().unwrap().clone()
    }
}

impl AnalyticsClient for RecordingAnalytics {
    fn emit(&self, event: ConversionEvent) -> anyhow::Result<Delivery> {
        self.emitted.lock().unwrap().push(event);
        Ok(Delivery::Dispatched)
    }
}

struct FailingAnalytics;

impl AnalyticsClient for FailingAnalytics {
    fn emit(&self, _event: ConversionEvent) -> anyhow::Result<Delivery> {
        anyhow::bail!("transport unavailable")
    }
}

struct PanickingAnalytics;

impl AnalyticsClient for PanickingAnalytics {
    fn emit(&self, _event: ConversionEvent) -> anyhow::Result<Delivery> {
        panic!("analytics exploded")
    }
}

fn params(value: Value) -> Parameters {
    match value {
        Value::Object(map) => map,
        _ => Parameters::new(),
    }
}

fn no_selection() -> Vec<ContentItem> {
    Vec::new()
}

fn fixed_clock() -> i64 {
    1_700_000_000_000
}

#[test]
fn add_to_cart_twice_emits_once_with_default_currency() {
    let recorder = RecordingAnalytics::default();
    let mut tracker = Tracker::new(Box::new(recorder.clone()), "BDT");

    let first = tracker.track(
        EventName::AddToCart,
        params(json!({ "value": 750 })),
        "p1",
        &no_selection(),
    );
    let second = tracker.track(
        EventName::AddToCart,
        params(json!({ "value": 750 })),
        "p1",
        &no_selection(),
    );

    assert_eq!(first, TrackOutcome::Sent);
    assert_eq!(second, TrackOutcome::Duplicate);
    let emitted = recorder.emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].name(), EventName::AddToCart);
    assert_eq!(emitted[0].dedupe_key(), "AddToCart-p1");
    assert_eq!(emitted[0].parameters()["currency"], "BDT");
    assert_eq!(emitted[0].parameters()["value"], json!(750));
}

#[test]
fn different_identifiers_are_tracked_separately() {
    let recorder = RecordingAnalytics::default();
    let mut tracker = Tracker::new(Box::new(recorder.clone()), "BDT");

    tracker.track(EventName::AddToCart, Parameters::new(), "p1", &no_selection());
    tracker.track(EventName::AddToCart, Parameters::new(), "p2", &no_selection());
    tracker.track(EventName::Purchase, Parameters::new(), "p1", &no_selection());

    assert_eq!(recorder.emitted().len(), 3);
    assert_eq!(tracker.seen().len(), 3);
}

#[test]
fn missing_identifier_collapses_within_same_millisecond() {
    let recorder = RecordingAnalytics::default();
    let mut tracker = Tracker::new(Box::new(recorder.clone()), "BDT").with_clock(fixed_clock);

    tracker.track(EventName::AddToCart, Parameters::new(), "", &no_selection());
    let again = tracker.track(EventName::AddToCart, Parameters::new(), "", &no_selection());

    assert_eq!(again, TrackOutcome::Duplicate);
    assert_eq!(recorder.emitted().len(), 1);
    assert_eq!(recorder.emitted()[0].dedupe_key(), "AddToCart-1700000000000");
}

#[test]
fn initiate_checkout_derives_contents_from_selection() {
    let recorder = RecordingAnalytics::default();
    let mut tracker = Tracker::new(Box::new(recorder.clone()), "BDT");
    let selection = vec![
        ContentItem {
            id: "Abaya Black".into(),
            quantity: 2,
            item_price: 1050,
        },
        ContentItem {
            id: "Abaya Maroon".into(),
            quantity: 3,
            item_price: 750,
        },
    ];

    tracker.track(
        EventName::InitiateCheckout,
        params(json!({ "value": "4350" })),
        "form-validation",
        &selection,
    );

    let emitted = recorder.emitted();
    let parameters = emitted[0].parameters();
    assert_eq!(parameters["contents"].as_array().unwrap().len(), selection.len());
    assert_eq!(parameters["num_items"], json!(5));
    assert_eq!(parameters["content_type"], "product");
    assert_eq!(parameters["value"], json!(4350));
    assert_eq!(
        parameters["contents"][0],
        json!({ "id": "Abaya Black", "quantity": 2, "item_price": 1050 })
    );
}

#[test]
fn purchase_derives_contents_when_missing() {
    let recorder = RecordingAnalytics::default();
    let mut tracker = Tracker::new(Box::new(recorder.clone()), "BDT");
    let selection = vec![
        ContentItem {
            id: "Abaya Black".into(),
            quantity: 1,
            item_price: 750,
        },
        ContentItem {
            id: "Abaya Maroon".into(),
            quantity: 2,
            item_price: 1050,
        },
    ];

    let outcome = tracker.track(
        EventName::Purchase,
        params(json!({ "value": 2930 })),
        "order-submit",
        &selection,
    );

    assert_eq!(outcome, TrackOutcome::Sent);
    let emitted = recorder.emitted();
    let parameters = emitted[0].parameters();
    assert_eq!(parameters["contents"].as_array().unwrap().len(), 2);
    assert_eq!(parameters["num_items"], json!(3));
    assert_eq!(parameters["content_type"], "product");
    assert_eq!(
        parameters["contents"][1],
        json!({ "id": "Abaya Maroon", "quantity": 2, "item_price": 1050 })
    );
}

struct PanickingSelection;

impl SelectedItems for PanickingSelection {
    fn selected_contents(&self) -> Vec<ContentItem> {
        panic!("selection unavailable")
    }
}

#[test]
fn panics_while_normalizing_are_swallowed() {
    let recorder = RecordingAnalytics::default();
    let mut tracker = Tracker::new(Box::new(recorder.clone()), "BDT");

    let outcome = tracker.track(
        EventName::InitiateCheckout,
        Parameters::new(),
        "form-validation",
        &PanickingSelection,
    );

    assert_eq!(outcome, TrackOutcome::Failed);
    assert!(recorder.emitted().is_empty());
    assert!(tracker.seen().is_empty());
}

#[test]
fn unavailable_client_does_not_record_key() {
    let mut tracker = Tracker::new(Box::new(NoopAnalytics), "BDT");

    let outcome = tracker.track(EventName::Purchase, Parameters::new(), "order-submit", &no_selection());

    assert_eq!(outcome, TrackOutcome::Unavailable);
    assert!(tracker.seen().is_empty());
}

#[test]
fn client_errors_and_panics_are_swallowed() {
    let mut failing = Tracker::new(Box::new(FailingAnalytics), "BDT");
    assert_eq!(
        failing.track(EventName::AddToCart, Parameters::new(), "p1", &no_selection()),
        TrackOutcome::Failed
    );
    assert!(failing.seen().is_empty());

    let mut panicking = Tracker::new(Box::new(PanickingAnalytics), "BDT");
    assert_eq!(
        panicking.track(EventName::AddToCart, Parameters::new(), "p1", &no_selection()),
        TrackOutcome::Failed
    );
}

#[test]
fn string_names_are_validated() {
    let recorder = RecordingAnalytics::default();
    let mut tracker = Tracker::new(Box::new(recorder.clone()), "BDT");

    assert_eq!(
        tracker.track_by_name("", Parameters::new(), "x", &no_selection()),
        TrackOutcome::Rejected
    );
    assert_eq!(
        tracker.track_by_name("Purchase", Parameters::new(), "x", &no_selection()),
        TrackOutcome::Sent
    );
    assert_eq!(recorder.emitted().len(), 1);
}

#[tokio::test]
async fn relay_client_posts_envelope_without_blocking() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let client = RelayAnalytics::new(&format!("{}/relay", server.uri()), "123", "tok")
        .expect("client");
    let mut tracker = Tracker::new(Box::new(client), "BDT");
    let outcome = tracker.track(
        EventName::AddToCart,
        params(json!({ "value": 750 })),
        "p1",
        &no_selection(),
    );
    assert_eq!(outcome, TrackOutcome::Sent);

    let mut requests = Vec::new();
    for _ in 0..50 {
        requests = server.received_requests().await.unwrap_or_default();
        if !requests.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["pixelId"], "123");
    assert_eq!(body["accessToken"], "tok");
    let record = &body["data"][0];
    assert_eq!(record["event_name"], "AddToCart");
    assert_eq!(record["event_id"], "AddToCart-p1");
    assert_eq!(record["action_source"], "website");
    assert_eq!(record["custom_data"], json!({ "currency": "BDT", "value": 750 }));
    assert!(record["event_time"].as_i64().unwrap() > 0);
}

#[test]
fn relay_client_requires_runtime() {
    assert!(RelayAnalytics::new("http://127.0.0.1:9/relay", "1", "tok").is_err());
}

#[test]
fn settings_without_credentials_disable_tracking() {
    let settings = pixel_relay::config::TrackingSettings {
        currency: "BDT".into(),
        relay_url: "http://127.0.0.1:9/relay".into(),
        pixel_id: None,
        access_token: Some("tok".into()),
    };
    let client = pixel_relay::tracking::client::from_settings(&settings).expect("client");
    let mut tracker = Tracker::new(client, settings.currency.clone());

    assert_eq!(
        tracker.track(EventName::AddToCart, Parameters::new(), "p1", &no_selection()),
        TrackOutcome::Unavailable
    );
}
