pub mod appstate;
pub mod configuration;
pub mod domain;
pub mod gateway_client;
pub mod mailer;
pub mod routes;
pub mod startup;
pub mod submission;
pub mod telemetry;
