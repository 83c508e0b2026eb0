//! Loads offered on the carrier board

use std::str::FromStr;

use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

/// City plus street address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub city: String,
    #[serde(default)]
    pub address: String,
}

impl Place {
    pub fn new(city: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoType {
    General,
    Refrigerated,
    Dangerous,
    Fragile,
}

impl CargoType {
    pub const ALL: [CargoType; 4] = [
        CargoType::General,
        CargoType::Refrigerated,
        CargoType::Dangerous,
        CargoType::Fragile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CargoType::General => "general",
            CargoType::Refrigerated => "refrigerated",
            CargoType::Dangerous => "dangerous",
            CargoType::Fragile => "fragile",
        }
    }

    /// Human label shown on cards
    pub fn label(&self) -> &'static str {
        match self {
            CargoType::General => "Carga General",
            CargoType::Refrigerated => "Refrigerada",
            CargoType::Dangerous => "Mercancía Peligrosa",
            CargoType::Fragile => "Frágil",
        }
    }
}

impl FromStr for CargoType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CargoType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidEnumValue {
                kind: "cargo type",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for CargoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    Fixed,
    Negotiable,
    Certification,
    Special,
}

impl PriceType {
    pub fn label(&self) -> &'static str {
        match self {
            PriceType::Fixed => "Precio fijo",
            PriceType::Negotiable => "Negociable",
            PriceType::Certification => "Requiere certificación",
            PriceType::Special => "Manejo especial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Sort rank, higher is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Urgency::High => 3,
            Urgency::Medium => 2,
            Urgency::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Urgency::High),
            "medium" => Ok(Urgency::Medium),
            "low" => Ok(Urgency::Low),
            _ => Err(Error::InvalidEnumValue {
                kind: "urgency",
                value: s.to_string(),
            }),
        }
    }
}

/// A load available for carriers to accept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub id: u32,
    pub origin: Place,
    pub destination: Place,
    /// Kilograms
    pub weight_kg: u32,
    /// Cubic meters
    pub volume_m3: f64,
    pub cargo_type: CargoType,
    pub pickup_time: String,
    pub delivery_time: String,
    /// Offered price in COP
    pub price: u64,
    pub price_type: PriceType,
    /// Kilometers from the carrier's current position
    pub distance_km: u32,
    pub urgency: Urgency,
    #[serde(default)]
    pub matches_route: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_express: bool,
}

impl Load {
    /// Requirements listed on the details view
    pub fn requirements(&self) -> Vec<&'static str> {
        let mut requirements = Vec::new();
        match self.cargo_type {
            CargoType::Refrigerated => requirements.push("Vehículo refrigerado"),
            CargoType::Dangerous => requirements.push("Certificación para mercancía peligrosa"),
            CargoType::Fragile => requirements.push("Manejo cuidadoso"),
            CargoType::General => {}
        }
        if self.urgency == Urgency::High {
            requirements.push("Entrega urgente");
        }
        requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_type_parse_is_case_insensitive() {
        assert_eq!("Refrigerated".parse::<CargoType>().unwrap(), CargoType::Refrigerated);
        assert!("liquid".parse::<CargoType>().is_err());
    }

    #[test]
    fn test_urgency_rank() {
        assert!(Urgency::High.rank() > Urgency::Medium.rank());
        assert!(Urgency::Medium.rank() > Urgency::Low.rank());
    }
}
