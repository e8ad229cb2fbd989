//! The store's fixed catalog: parachutes first, then accessories.

use ultimosalto_core::{DomainResult, Money};

use crate::product::{Category, NewProduct};

const ENTRIES: &[(&str, Category, u64)] = &[
    ("Paracaídas Militar Pro", Category::Parachutes, 350_000),
    ("Paracaídas Deportivo Elite", Category::Parachutes, 280_000),
    ("Paracaídas de Emergencia Compacto", Category::Parachutes, 150_000),
    ("Paracaídas Tandem para Instructor", Category::Parachutes, 520_000),
    ("Paracaídas de Precisión Racing", Category::Parachutes, 410_000),
    ("Casco Integral Carbon Fiber", Category::Accessories, 85_000),
    ("Casco Abierto Ligero", Category::Accessories, 45_000),
    ("Altímetro Digital Precisión", Category::Accessories, 28_000),
    ("Altímetro Analógico Confiable", Category::Accessories, 15_000),
    ("Traje de Vuelo Aerodinámico XL", Category::Accessories, 120_000),
    ("Traje de Vuelo Estándar M/L", Category::Accessories, 90_000),
    ("Gafas Panorámicas Anti-reflejo", Category::Accessories, 32_000),
    ("Gafas de Noche Infra-ventiladas", Category::Accessories, 58_000),
    ("Guantes Térmicos Profesionales", Category::Accessories, 24_000),
    ("Mochila de Reserva Compacta", Category::Accessories, 180_000),
];

/// The catalog in insertion order (prices in cents).
pub fn catalog() -> DomainResult<Vec<NewProduct>> {
    ENTRIES
        .iter()
        .map(|&(name, category, cents)| NewProduct::new(name, category, Money::from_cents(cents)))
        .collect()
}
