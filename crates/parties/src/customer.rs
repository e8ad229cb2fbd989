use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ultimosalto_core::{CustomerId, DomainError, DomainResult, Entity};

/// Gender category (closed set, enforced by a `CHECK` constraint in storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "Otro")]
    Other,
}

impl Gender {
    /// Every category, in the order the generator draws from.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Code stored in `clientes.genero`.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "Otro",
        }
    }
}

impl core::fmt::Display for Gender {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "Otro" => Ok(Gender::Other),
            other => Err(DomainError::validation(format!("unknown gender code: {other}"))),
        }
    }
}

/// A customer that has not been stored yet (no identity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl NewCustomer {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        birth_date: NaiveDate,
        gender: Gender,
    ) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if !is_plausible_email(&email) {
            return Err(DomainError::validation(format!(
                "customer email is not an address: {email:?}"
            )));
        }

        Ok(Self {
            name,
            email,
            birth_date,
            gender,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// A stored customer. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
    birth_date: NaiveDate,
    gender: Gender,
}

impl Customer {
    pub fn from_new(id: CustomerId, new: NewCustomer) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            birth_date: new.birth_date,
            gender: new.gender,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Age in whole 365-day blocks as of `today`.
    pub fn age_on(&self, today: NaiveDate) -> i64 {
        ultimosalto_core::whole_years_floor365(self.birth_date, today)
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birth() -> NaiveDate {
        NaiveDate::from_ymd_opt(1960, 5, 1).unwrap()
    }

    #[test]
    fn gender_codes_round_trip_through_from_str() {
        for gender in Gender::ALL {
            assert_eq!(gender.code().parse::<Gender>().unwrap(), gender);
        }
        assert!("X".parse::<Gender>().is_err());
    }

    #[test]
    fn new_customer_rejects_blank_name() {
        let err = NewCustomer::new("  ", "a@b.com", birth(), Gender::Female).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("name") => {}
            _ => panic!("Expected Validation error for blank name"),
        }
    }

    #[test]
    fn new_customer_rejects_malformed_email() {
        assert!(NewCustomer::new("Ana", "ana.example.com", birth(), Gender::Female).is_err());
        assert!(NewCustomer::new("Ana", "@example.com", birth(), Gender::Female).is_err());
        assert!(NewCustomer::new("Ana", "ana@localhost", birth(), Gender::Female).is_err());
    }

    #[test]
    fn stored_customer_reports_floor365_age() {
        let new = NewCustomer::new("Ana", "ana@example.com", birth(), Gender::Other).unwrap();
        let customer = Customer::from_new(CustomerId::new(3).unwrap(), new);
        let today = birth() + chrono::Duration::days(65 * 365 + 10);
        assert_eq!(customer.age_on(today), 65);
        assert_eq!(customer.id().get(), 3);
        assert_eq!(customer.gender(), Gender::Other);
    }
}
