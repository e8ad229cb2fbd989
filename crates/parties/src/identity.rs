//! Synthetic identities (name + email) for generated customers.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::name::raw::Name;
use fake::locales::EN;

use ultimosalto_core::{SeedRng, seeded_rng};

/// A realistic-looking name/email pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Source of synthetic identities.
///
/// The only contract the generator relies on: emails never repeat within one
/// provider's lifetime. How collisions are avoided is up to the provider.
pub trait IdentityProvider {
    fn next_identity(&mut self) -> Identity;
}

/// How many fresh draws to try before suffixing the local part.
const MAX_FRESH_DRAWS: usize = 16;

/// `fake`-backed provider with its own seeded stream.
///
/// Seeded independently from the customer generator so that identity draws do
/// not shift age or gender draws.
#[derive(Debug, Clone)]
pub struct FakeIdentityProvider {
    rng: SeedRng,
    issued: HashSet<String>,
}

impl FakeIdentityProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(seed),
            issued: HashSet::new(),
        }
    }

    /// Number of distinct emails handed out so far.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    fn unique_email(&mut self) -> String {
        let mut candidate: String = SafeEmail(EN).fake_with_rng(&mut self.rng);
        for _ in 0..MAX_FRESH_DRAWS {
            if !self.issued.contains(&candidate) {
                return candidate;
            }
            tracing::debug!(email = %candidate, "email collision, drawing again");
            candidate = SafeEmail(EN).fake_with_rng(&mut self.rng);
        }
        self.disambiguate(&candidate)
    }

    fn disambiguate(&self, email: &str) -> String {
        let (local, domain) = email.split_once('@').unwrap_or((email, "example.com"));
        let mut n = 1u32;
        loop {
            let candidate = format!("{local}{n}@{domain}");
            if !self.issued.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl IdentityProvider for FakeIdentityProvider {
    fn next_identity(&mut self) -> Identity {
        let name: String = Name(EN).fake_with_rng(&mut self.rng);
        let email = self.unique_email();
        self.issued.insert(email.clone());
        Identity { name, email }
    }
}
