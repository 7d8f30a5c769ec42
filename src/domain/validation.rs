use super::{
    ErrorMap, FieldName, FormFieldSet, Location, PassengerCount, PickupDateTime, RiderEmail,
    Schema, ValidatedRequest,
};

/// Validates a submitted form against the ride request schema.
///
/// # Errors
/// An [`ErrorMap`] with one message per invalid field.
pub fn validate(form: &FormFieldSet) -> Result<ValidatedRequest, ErrorMap> {
    Schema::ride_request().validate(form)
}

/// Validates a single field of the ride request form.
///
/// # Errors
/// The message the form shows beneath that field.
pub fn validate_field(field: FieldName, value: Option<&str>) -> Result<(), &'static str> {
    Schema::ride_request().validate_field(field, value)
}

/// Applies `schema`, then turns the raw text into typed values.
pub(super) fn coerce(schema: &Schema, form: &FormFieldSet) -> Result<ValidatedRequest, ErrorMap> {
    let mut errors = schema.check(form);

    let email = accept(
        &mut errors,
        schema,
        FieldName::Email,
        RiderEmail::parse(form.email.clone()),
    );
    let pickup_location = accept(
        &mut errors,
        schema,
        FieldName::PickupLocation,
        Location::parse(form.pickup_location.clone()),
    );
    let drop_location = accept(
        &mut errors,
        schema,
        FieldName::DropLocation,
        Location::parse(form.drop_location.clone()),
    );
    let datetime = accept(
        &mut errors,
        schema,
        FieldName::Datetime,
        PickupDateTime::parse(&form.datetime),
    );
    let number_of_passenger = accept(
        &mut errors,
        schema,
        FieldName::NumberOfPassenger,
        PassengerCount::parse(&form.number_of_passenger),
    );

    match (
        email,
        pickup_location,
        drop_location,
        datetime,
        number_of_passenger,
    ) {
        (
            Some(email),
            Some(pickup_location),
            Some(drop_location),
            Some(datetime),
            Some(number_of_passenger),
        ) if errors.is_empty() => Ok(ValidatedRequest::new(
            email,
            pickup_location,
            drop_location,
            datetime,
            number_of_passenger,
            form.special_requirements.clone(),
        )),
        _ => Err(errors),
    }
}

/// Keeps a coerced value, or records why it could not be coerced when the
/// rules did not already say so.
fn accept<T>(
    errors: &mut ErrorMap,
    schema: &Schema,
    field: FieldName,
    parsed: Result<T, String>,
) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            if !errors.contains(field) {
                tracing::warn!(%field, error = %e, "Coercion failed after the rules passed");
                errors.insert(field, schema.format_message(field));
            }
            None
        }
    }
}
