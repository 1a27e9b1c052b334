use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized tax id: digits only, unique per holder within a branch.
/// Formatted input like "111.222.333-44" and the bare "11122233344"
/// normalize to the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Strip every non-digit character. Returns `None` when nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            None
        } else {
            Some(Self(digits))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Postal address, kept as the free-form trimmed fields the teller collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        district: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            number: number.into(),
            district: district.into(),
            city: city.into(),
            state: state.into().to_uppercase(),
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {} - {} - {}/{}",
            self.street, self.number, self.district, self.city, self.state
        )
    }
}

/// An account holder. Immutable after registration; uniqueness by tax id
/// is enforced by the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holder {
    pub tax_id: TaxId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub address: Address,
}

impl Holder {
    pub fn new(tax_id: TaxId, name: impl Into<String>, birth_date: NaiveDate, address: Address) -> Self {
        Self {
            tax_id,
            name: name.into(),
            birth_date,
            address,
        }
    }
}
