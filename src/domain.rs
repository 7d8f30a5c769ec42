mod error_map;
mod field_name;
mod form_field_set;
mod location;
mod passenger_count;
mod pickup_datetime;
mod rider_email;
mod schema;
mod validated_request;
mod validation;

pub use error_map::ErrorMap;
pub use field_name::FieldName;
pub use form_field_set::FormFieldSet;
pub use location::Location;
pub use passenger_count::PassengerCount;
pub use pickup_datetime::PickupDateTime;
pub use rider_email::RiderEmail;
pub use schema::{FieldRules, Rule, Schema};
pub use validated_request::ValidatedRequest;
pub use validation::{validate, validate_field};
