use crate::domain::{RiderEmail, ValidatedRequest};

/// The confirmation email sent to a rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideNotification {
    pub to: RiderEmail,
    pub subject: &'static str,
    pub text_body: String,
}

impl RideNotification {
    pub const SUBJECT: &'static str = "Your ride request is being processed";

    pub fn for_request(request: &ValidatedRequest) -> Self {
        let special_requirements = request
            .special_requirements()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("None");

        let text_body = format!(
            "Pickup location: {}\n\
             Drop location: {}\n\
             Number of passenger: {}\n\
             Datetime: {}\n\
             Special requirements: {}\n",
            request.pickup_location(),
            request.drop_location(),
            request.number_of_passenger(),
            request.datetime(),
            special_requirements,
        );

        Self {
            to: request.email().clone(),
            subject: Self::SUBJECT,
            text_body,
        }
    }
}
