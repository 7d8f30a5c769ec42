use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::field_attributes::{deserialize_default_from_null, deserialize_string_from_number};

use super::FieldName;

/// Raw values as captured from the form controls.
///
/// Every field is text, even the numeric and temporal ones. Missing required
/// fields deserialize as empty strings so that they are reported per field by
/// the schema instead of rejecting the whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormFieldSet {
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub email: String,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub pickup_location: String,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub drop_location: String,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub datetime: String,
    #[serde(deserialize_with = "deserialize_passenger_count")]
    pub number_of_passenger: String,
    #[serde(
        deserialize_with = "deserialize_default_from_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub special_requirements: Option<String>,
}

impl FormFieldSet {
    /// The raw value of `field`, `None` only for an absent optional field.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::Email => Some(&self.email),
            FieldName::PickupLocation => Some(&self.pickup_location),
            FieldName::DropLocation => Some(&self.drop_location),
            FieldName::Datetime => Some(&self.datetime),
            FieldName::NumberOfPassenger => Some(&self.number_of_passenger),
            FieldName::SpecialRequirements => self.special_requirements.as_deref(),
        }
    }
}

/// Text or a JSON number, with `null` read as empty like the other fields.
fn deserialize_passenger_count<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Text(#[serde(deserialize_with = "deserialize_string_from_number")] String);

    Ok(Option::<Text>::deserialize(deserializer)?
        .map(|Text(text)| text)
        .unwrap_or_default())
}
