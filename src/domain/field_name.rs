use serde::{Deserialize, Serialize};

/// The fields of a ride request form, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Email,
    PickupLocation,
    DropLocation,
    Datetime,
    NumberOfPassenger,
    SpecialRequirements,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::Email,
        FieldName::PickupLocation,
        FieldName::DropLocation,
        FieldName::Datetime,
        FieldName::NumberOfPassenger,
        FieldName::SpecialRequirements,
    ];

    /// The name used on the wire and by the form controls.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Email => "email",
            FieldName::PickupLocation => "pickupLocation",
            FieldName::DropLocation => "dropLocation",
            FieldName::Datetime => "datetime",
            FieldName::NumberOfPassenger => "numberOfPassenger",
            FieldName::SpecialRequirements => "specialRequirements",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
