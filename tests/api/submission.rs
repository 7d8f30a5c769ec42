use std::time::Duration;

use taxieria::{
    configuration::get_configuration,
    domain::{FieldName, FormFieldSet},
    gateway_client::{GatewayClient, TransportError},
    submission::{Outcome, SubmissionController, SubmissionEvent, SubmissionState, Submitted},
};
use tokio::sync::broadcast;
use wiremock::{matchers, Mock, MockBuilder, MockServer, ResponseTemplate};

use crate::helpers::spawn_app;

fn ride_request_form() -> FormFieldSet {
    FormFieldSet {
        email: "rider@example.com".into(),
        pickup_location: "Main Station".into(),
        drop_location: "Airport Terminal 2".into(),
        datetime: "2025-03-14T07:30".into(),
        number_of_passenger: "2".into(),
        special_requirements: Some("Child seat".into()),
    }
}

fn when_posting_a_ride_request() -> MockBuilder {
    Mock::given(matchers::path("/api/mail")).and(matchers::method("POST"))
}

fn controller_for(server: &MockServer) -> SubmissionController<GatewayClient> {
    let client = GatewayClient::new(&server.uri(), Duration::from_secs(2))
        .expect("Failed to build the gateway client");
    SubmissionController::new(client)
}

fn states(events: &mut broadcast::Receiver<SubmissionEvent>) -> Vec<SubmissionState> {
    std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            SubmissionEvent::StateChanged(state) => Some(state),
            SubmissionEvent::FieldErrors(_) => None,
        })
        .collect()
}

#[tokio::test]
async fn a_delivered_request_passes_through_pending_and_success() {
    let mock_server = MockServer::start().await;
    let controller = controller_for(&mock_server);
    let mut events = controller.subscribe();

    when_posting_a_ride_request()
        .and(matchers::body_json(serde_json::json!({
            "email": "rider@example.com",
            "pickupLocation": "Main Station",
            "dropLocation": "Airport Terminal 2",
            "datetime": "2025-03-14T07:30:00",
            "numberOfPassenger": "2",
            "specialRequirements": "Child seat",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "OK" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = controller.submit(&ride_request_form()).await;

    assert!(matches!(outcome, Submitted::Delivered(ref message) if message == "OK"));
    assert_eq!(
        states(&mut events),
        vec![
            SubmissionState::Pending,
            SubmissionState::Settled(Outcome::Success),
            SubmissionState::Idle,
        ]
    );
}

#[tokio::test]
async fn a_gateway_error_settles_as_failure_without_field_errors() {
    let mock_server = MockServer::start().await;
    let controller = controller_for(&mock_server);
    let mut events = controller.subscribe();

    when_posting_a_ride_request()
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({ "message": "SMTP error" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = controller.submit(&ride_request_form()).await;

    match outcome {
        Submitted::Failed(TransportError::Rejected { message, .. }) => {
            assert_eq!(message, "SMTP error")
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(states(&mut events).contains(&SubmissionState::Settled(Outcome::Failure)));
    assert!(controller.errors().is_empty());
    assert_eq!(controller.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn a_second_submit_while_pending_sends_nothing() {
    let mock_server = MockServer::start().await;
    let controller = controller_for(&mock_server);

    when_posting_a_ride_request()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "OK" }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let form = ride_request_form();
    let (first, second) = tokio::join!(controller.submit(&form), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.submit(&form).await
    });

    assert!(matches!(first, Submitted::Delivered(_)));
    assert!(matches!(second, Submitted::Ignored));
}

#[tokio::test]
async fn an_invalid_form_never_reaches_the_gateway() {
    let mock_server = MockServer::start().await;
    let controller = controller_for(&mock_server);
    let mut events = controller.subscribe();

    when_posting_a_ride_request()
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let form = FormFieldSet {
        email: "".into(),
        datetime: "14/03/2025".into(),
        ..ride_request_form()
    };
    let outcome = controller.submit(&form).await;

    let Submitted::Invalid(errors) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(errors.get(FieldName::Email), Some("Email is required"));
    assert_eq!(errors.get(FieldName::Datetime), Some("Invalid datetime"));
    assert_eq!(errors.len(), 2);
    assert_eq!(
        events.try_recv().unwrap(),
        SubmissionEvent::FieldErrors(errors)
    );
    assert_eq!(controller.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn field_errors_are_cleared_by_a_valid_resubmit() {
    let mock_server = MockServer::start().await;
    let controller = controller_for(&mock_server);

    when_posting_a_ride_request()
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "OK" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let invalid = FormFieldSet {
        drop_location: " ".into(),
        ..ride_request_form()
    };
    assert!(matches!(controller.submit(&invalid).await, Submitted::Invalid(_)));
    assert!(controller.errors().contains(FieldName::DropLocation));

    let outcome = controller.submit(&ride_request_form()).await;

    assert!(matches!(outcome, Submitted::Delivered(_)));
    assert!(controller.errors().is_empty());
}

#[tokio::test]
async fn a_slow_gateway_times_out_as_failure() {
    let mock_server = MockServer::start().await;
    let client = GatewayClient::new(&mock_server.uri(), Duration::from_millis(100)).unwrap();
    let controller = SubmissionController::new(client);

    when_posting_a_ride_request()
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let outcome = controller.submit(&ride_request_form()).await;

    assert!(matches!(outcome, Submitted::Failed(TransportError::Request(_))));
    assert_eq!(controller.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn a_submitted_form_is_emailed_by_the_gateway_service() {
    let app = spawn_app().await;
    let client = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.gateway.base_url = app.address.clone();
        c.gateway.client().expect("Failed to build the gateway client")
    };
    let controller = SubmissionController::new(client);

    let outcome = controller.submit(&ride_request_form()).await;

    assert!(matches!(outcome, Submitted::Delivered(ref message) if message == "250 OK"));
    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text_body.contains("Datetime: 2025-03-14 07:30\n"));
}
