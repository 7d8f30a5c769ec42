use lettre::Address;
use serde::Serialize;
use validator::ValidateEmail;

/// The address the ride confirmation is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RiderEmail(String);

impl RiderEmail {
    pub fn parse(s: String) -> Result<Self, String> {
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{s} is not a valid rider email"))
        }
    }

    /// `local@domain` with a dot inside the domain and no whitespace anywhere.
    /// It must also be an address the SMTP transport can send to, so dotted
    /// local parts like `a..b` and domain literals like `[127.0.0.1]` fail.
    pub fn is_valid(s: &str) -> bool {
        if s.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = s.rsplit_once('@') else {
            return false;
        };
        let dotted_domain = domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.starts_with('[');

        !local.is_empty() && dotted_domain && s.validate_email() && s.parse::<Address>().is_ok()
    }
}

impl AsRef<str> for RiderEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RiderEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
