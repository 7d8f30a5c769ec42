use hyper::StatusCode;
use taxieria::{domain::FieldName, mailer::RideNotification, routes::MailReply};

use crate::helpers::{ride_request_body, spawn_app, spawn_app_with_failing_mailer};

#[tokio::test]
async fn health_check_answers_200_on_the_bound_port() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{}/health_check", app.port))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn a_valid_ride_request_is_emailed_to_the_rider() {
    let app = spawn_app().await;

    let response = app.post_mail(&ride_request_body()).await;

    assert_eq!(StatusCode::OK, response.status());
    let reply: MailReply = response.json().await.unwrap();
    assert_eq!(reply.message, "250 OK");
    assert!(reply.errors.is_empty());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.as_ref(), "rider@example.com");
    assert_eq!(sent[0].subject, RideNotification::SUBJECT);
    assert_eq!(
        sent[0].text_body,
        "Pickup location: Main Station\n\
         Drop location: Airport Terminal 2\n\
         Number of passenger: 2\n\
         Datetime: 2025-03-14 07:30\n\
         Special requirements: Child seat\n"
    );
}

#[tokio::test]
async fn a_numeric_passenger_count_is_accepted() {
    let app = spawn_app().await;
    let mut body = ride_request_body();
    body["numberOfPassenger"] = serde_json::json!(4);

    let response = app.post_mail(&body).await;

    assert_eq!(StatusCode::OK, response.status());
    assert!(app.mailer.sent()[0]
        .text_body
        .contains("Number of passenger: 4\n"));
}

#[tokio::test]
async fn missing_special_requirements_read_as_none() {
    let app = spawn_app().await;
    let mut body = ride_request_body();
    body.as_object_mut().unwrap().remove("specialRequirements");

    let response = app.post_mail(&body).await;

    assert_eq!(StatusCode::OK, response.status());
    assert!(app.mailer.sent()[0]
        .text_body
        .ends_with("Special requirements: None\n"));
}

#[tokio::test]
async fn an_invalid_ride_request_returns_422_with_field_errors() {
    let app = spawn_app().await;
    let test_cases = [
        (
            serde_json::json!({ "pickupLocation": "" }),
            FieldName::PickupLocation,
            "Pickup Location is required",
        ),
        (
            serde_json::json!({ "email": "not-an-email" }),
            FieldName::Email,
            "Invalid email",
        ),
        (
            serde_json::json!({ "email": "a..b@example.com" }),
            FieldName::Email,
            "Invalid email",
        ),
        (
            serde_json::json!({ "email": "a@[127.0.0.1]" }),
            FieldName::Email,
            "Invalid email",
        ),
        (
            serde_json::json!({ "numberOfPassenger": null }),
            FieldName::NumberOfPassenger,
            "Number of Passenger is required",
        ),
        (
            serde_json::json!({ "datetime": "tomorrow morning" }),
            FieldName::Datetime,
            "Invalid datetime",
        ),
        (
            serde_json::json!({ "numberOfPassenger": "0" }),
            FieldName::NumberOfPassenger,
            "Number of Passenger must be a whole number of at least 1",
        ),
    ];

    for (overrides, field, message) in test_cases {
        let mut body = ride_request_body();
        for (key, value) in overrides.as_object().unwrap() {
            body[key] = value.clone();
        }

        let response = app.post_mail(&body).await;

        assert_eq!(
            StatusCode::UNPROCESSABLE_ENTITY,
            response.status(),
            "The API did not fail with 422 when {field} was invalid"
        );
        let reply: MailReply = response.json().await.unwrap();
        assert_eq!(reply.errors.len(), 1);
        assert_eq!(reply.errors.get(field), Some(message));
    }

    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn an_empty_form_reports_every_required_field() {
    let app = spawn_app().await;

    let response = app.post_mail(&serde_json::json!({})).await;

    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"],
        serde_json::json!({
            "email": "Email is required",
            "pickupLocation": "Pickup Location is required",
            "dropLocation": "Drop Location is required",
            "datetime": "Invalid datetime",
            "numberOfPassenger": "Number of Passenger is required",
        })
    );
}

#[tokio::test]
async fn a_body_that_is_not_json_returns_400() {
    let app = spawn_app().await;

    let response = app.post_raw_mail("email=rider@example.com").await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    let reply: MailReply = response.json().await.unwrap();
    assert!(reply.errors.is_empty());
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn a_failing_mailer_returns_502_with_the_smtp_message() {
    let app = spawn_app_with_failing_mailer().await;

    let response = app.post_mail(&ride_request_body()).await;

    assert_eq!(StatusCode::BAD_GATEWAY, response.status());
    let reply: MailReply = response.json().await.unwrap();
    assert_eq!(reply.message, "SMTP error: 554 Transaction failed");
}

#[tokio::test]
async fn an_unknown_route_returns_404_json() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/nope", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::NOT_FOUND, response.status());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No route for /api/nope");
}
