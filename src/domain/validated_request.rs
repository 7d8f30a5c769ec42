use serde::Serialize;

use super::{Location, PassengerCount, PickupDateTime, RiderEmail};

/// A ride request whose every field passed the schema.
///
/// Only [`Schema::validate`](super::Schema::validate) builds one. Serializes to
/// the body the mailer gateway expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRequest {
    email: RiderEmail,
    pickup_location: Location,
    drop_location: Location,
    datetime: PickupDateTime,
    number_of_passenger: PassengerCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    special_requirements: Option<String>,
}

impl ValidatedRequest {
    pub(super) fn new(
        email: RiderEmail,
        pickup_location: Location,
        drop_location: Location,
        datetime: PickupDateTime,
        number_of_passenger: PassengerCount,
        special_requirements: Option<String>,
    ) -> Self {
        Self {
            email,
            pickup_location,
            drop_location,
            datetime,
            number_of_passenger,
            special_requirements,
        }
    }

    pub fn email(&self) -> &RiderEmail {
        &self.email
    }

    pub fn pickup_location(&self) -> &Location {
        &self.pickup_location
    }

    pub fn drop_location(&self) -> &Location {
        &self.drop_location
    }

    pub fn datetime(&self) -> PickupDateTime {
        self.datetime
    }

    pub fn number_of_passenger(&self) -> PassengerCount {
        self.number_of_passenger
    }

    pub fn special_requirements(&self) -> Option<&str> {
        self.special_requirements.as_deref()
    }
}
