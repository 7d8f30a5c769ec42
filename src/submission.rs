//! Lifecycle of one ride request form: idle, pending while the gateway works,
//! settled for a moment with the outcome, idle again.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::instrument;

use crate::{
    domain::{ErrorMap, FormFieldSet},
    gateway_client::{MailerGateway, TransportError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Settled(Outcome),
}

/// What subscribers of a form session see, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    StateChanged(SubmissionState),
    /// The messages to show beneath each field, replacing the previous ones.
    FieldErrors(ErrorMap),
}

/// Result of a single `submit` call.
#[derive(Debug)]
pub enum Submitted {
    /// The gateway accepted the request and answered with this text.
    Delivered(String),
    Failed(TransportError),
    /// Nothing was sent; the map says why per field.
    Invalid(ErrorMap),
    /// A request was already in flight. Nothing happened.
    Ignored,
}

#[derive(Debug, Default)]
struct Session {
    state: SubmissionState,
    errors: ErrorMap,
}

/// Drives one form session. Create one per form, never share between users.
pub struct SubmissionController<G> {
    gateway: G,
    session: Mutex<Session>,
    events: broadcast::Sender<SubmissionEvent>,
}

impl<G: MailerGateway> SubmissionController<G> {
    const EVENT_CAPACITY: usize = 32;

    pub fn new(gateway: G) -> Self {
        let (events, _) = broadcast::channel(Self::EVENT_CAPACITY);
        Self {
            gateway,
            session: Mutex::new(Session::default()),
            events,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.session().state
    }

    /// The messages currently shown beneath the fields.
    pub fn errors(&self) -> ErrorMap {
        self.session().errors.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    /// Validates `form` and, if it holds, sends it through the gateway.
    ///
    /// At most one request is in flight per controller: a call made while
    /// another is pending returns [`Submitted::Ignored`] without touching
    /// anything. There is no retry; resubmitting is up to the user.
    #[instrument(name = "Submit a ride request", skip_all)]
    pub async fn submit(&self, form: &FormFieldSet) -> Submitted {
        let request = {
            let mut session = self.session();
            if session.state == SubmissionState::Pending {
                tracing::debug!("A ride request is already pending, ignoring submit");
                return Submitted::Ignored;
            }
            match crate::domain::validate(form) {
                Ok(request) => {
                    session.errors = ErrorMap::new();
                    self.publish(SubmissionEvent::FieldErrors(ErrorMap::new()));
                    session.state = SubmissionState::Pending;
                    self.publish(SubmissionEvent::StateChanged(SubmissionState::Pending));
                    request
                }
                Err(errors) => {
                    tracing::info!(%errors, "Ride request failed validation");
                    session.errors = errors.clone();
                    self.publish(SubmissionEvent::FieldErrors(errors.clone()));
                    return Submitted::Invalid(errors);
                }
            }
        };

        let pending = PendingGuard {
            controller: self,
            outcome: None,
        };
        let result = self.gateway.send(&request).await;
        pending.settle(match &result {
            Ok(_) => Outcome::Success,
            Err(_) => Outcome::Failure,
        });

        match result {
            Ok(message) => {
                tracing::info!(%message, "Ride request delivered");
                Submitted::Delivered(message)
            }
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, error.message = %e, "Failed to deliver ride request");
                Submitted::Failed(e)
            }
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SubmissionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Puts the session back to idle, including when the submit future is
/// dropped before the gateway answers.
struct PendingGuard<'a, G: MailerGateway> {
    controller: &'a SubmissionController<G>,
    outcome: Option<Outcome>,
}

impl<G: MailerGateway> PendingGuard<'_, G> {
    fn settle(mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}

impl<G: MailerGateway> Drop for PendingGuard<'_, G> {
    fn drop(&mut self) {
        let controller = self.controller;
        let mut session = controller.session();
        if let Some(outcome) = self.outcome {
            session.state = SubmissionState::Settled(outcome);
            controller.publish(SubmissionEvent::StateChanged(session.state));
        }
        session.state = SubmissionState::Idle;
        controller.publish(SubmissionEvent::StateChanged(session.state));
    }
}
