//! Declarative rules for the ride request form.
//!
//! Each field owns an ordered list of predicate/message pairs. The first rule
//! that does not hold decides the message, so presence checks come before
//! format checks. Whole-form and single-field validation read the same table.

use unicode_segmentation::UnicodeSegmentation;

use super::{
    validation, ErrorMap, FieldName, FormFieldSet, Location, PassengerCount, PickupDateTime,
    RiderEmail, ValidatedRequest,
};

/// A predicate over the raw text of a field and the message shown when it fails.
#[derive(Clone, Copy)]
pub struct Rule {
    predicate: fn(&str) -> bool,
    message: &'static str,
}

impl Rule {
    pub const fn new(predicate: fn(&str) -> bool, message: &'static str) -> Self {
        Self { predicate, message }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn holds(&self, value: &str) -> bool {
        (self.predicate)(value)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    field: FieldName,
    optional: bool,
    rules: &'static [Rule],
}

impl FieldRules {
    pub const fn required(field: FieldName, rules: &'static [Rule]) -> Self {
        Self {
            field,
            optional: false,
            rules,
        }
    }

    /// Absent values pass; present values still go through `rules`.
    pub const fn optional(field: FieldName, rules: &'static [Rule]) -> Self {
        Self {
            field,
            optional: true,
            rules,
        }
    }

    /// # Errors
    /// The message of the first rule `value` does not satisfy.
    pub fn check(&self, value: Option<&str>) -> Result<(), &'static str> {
        let value = match value {
            Some(value) => value,
            None if self.optional => return Ok(()),
            None => "",
        };
        match self.rules.iter().find(|rule| !rule.holds(value)) {
            Some(rule) => Err(rule.message),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldRules],
}

const SPECIAL_REQUIREMENTS_MAX_GRAPHEMES: usize = 1024;

fn is_present(s: &str) -> bool {
    !s.trim().is_empty()
}

fn special_requirements_fit(s: &str) -> bool {
    s.graphemes(true).count() <= SPECIAL_REQUIREMENTS_MAX_GRAPHEMES
}

const EMAIL_RULES: &[Rule] = &[
    Rule::new(is_present, "Email is required"),
    Rule::new(RiderEmail::is_valid, "Invalid email"),
];

const PICKUP_LOCATION_RULES: &[Rule] = &[
    Rule::new(Location::is_present, "Pickup Location is required"),
    Rule::new(Location::fits, "Pickup Location is too long"),
];

const DROP_LOCATION_RULES: &[Rule] = &[
    Rule::new(Location::is_present, "Drop Location is required"),
    Rule::new(Location::fits, "Drop Location is too long"),
];

const DATETIME_RULES: &[Rule] = &[Rule::new(PickupDateTime::is_valid, "Invalid datetime")];

const NUMBER_OF_PASSENGER_RULES: &[Rule] = &[
    Rule::new(is_present, "Number of Passenger is required"),
    Rule::new(
        PassengerCount::is_valid,
        "Number of Passenger must be a whole number of at least 1",
    ),
];

const SPECIAL_REQUIREMENTS_RULES: &[Rule] = &[Rule::new(
    special_requirements_fit,
    "Special Requirements are too long",
)];

const RIDE_REQUEST_FIELDS: &[FieldRules] = &[
    FieldRules::required(FieldName::Email, EMAIL_RULES),
    FieldRules::required(FieldName::PickupLocation, PICKUP_LOCATION_RULES),
    FieldRules::required(FieldName::DropLocation, DROP_LOCATION_RULES),
    FieldRules::required(FieldName::Datetime, DATETIME_RULES),
    FieldRules::required(FieldName::NumberOfPassenger, NUMBER_OF_PASSENGER_RULES),
    FieldRules::optional(FieldName::SpecialRequirements, SPECIAL_REQUIREMENTS_RULES),
];

impl Schema {
    pub const fn new(fields: &'static [FieldRules]) -> Self {
        Self { fields }
    }

    /// The rules of the ride request form.
    pub const fn ride_request() -> Self {
        Self::new(RIDE_REQUEST_FIELDS)
    }

    pub fn rules_for(&self, field: FieldName) -> Option<&'static FieldRules> {
        self.fields.iter().find(|rules| rules.field == field)
    }

    /// Validates one field in isolation, e.g. when its control loses focus.
    ///
    /// # Errors
    /// The message of the first failing rule for `field`.
    pub fn validate_field(&self, field: FieldName, value: Option<&str>) -> Result<(), &'static str> {
        match self.rules_for(field) {
            Some(rules) => rules.check(value),
            None => Ok(()),
        }
    }

    /// Runs every field's rules and collects the failures.
    pub fn check(&self, form: &FormFieldSet) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for rules in self.fields {
            if let Err(message) = rules.check(form.get(rules.field)) {
                errors.insert(rules.field, message);
            }
        }
        errors
    }

    /// # Errors
    /// An [`ErrorMap`] naming every field that failed, and only those.
    pub fn validate(&self, form: &FormFieldSet) -> Result<ValidatedRequest, ErrorMap> {
        validation::coerce(self, form)
    }

    /// The message reported when coercing `field` fails: its last, most
    /// specific rule.
    pub(crate) fn format_message(&self, field: FieldName) -> &'static str {
        self.rules_for(field)
            .and_then(|rules| rules.rules.last())
            .map(Rule::message)
            .unwrap_or("Invalid value")
    }
}
