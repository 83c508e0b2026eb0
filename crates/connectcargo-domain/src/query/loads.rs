//! Carrier load board criteria and sort keys

use std::cmp::Ordering;
use std::str::FromStr;

use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

use super::{active, contains_ci, cmp_f64, Criteria, SortKey};
use crate::model::{CargoType, Load, Urgency};
use crate::wizard::format_budget;

/// Loads within this distance count as nearby
pub const NEARBY_KM: u32 = 20;

/// Tag filters above the load list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickFilter {
    #[default]
    All,
    Nearby,
    Urgent,
    Matching,
}

impl QuickFilter {
    pub fn label(&self) -> &'static str {
        match self {
            QuickFilter::All => "Todas",
            QuickFilter::Nearby => "Cercanas",
            QuickFilter::Urgent => "Urgentes",
            QuickFilter::Matching => "Coincide con mi ruta",
        }
    }
}

impl FromStr for QuickFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(QuickFilter::All),
            "nearby" => Ok(QuickFilter::Nearby),
            "urgent" => Ok(QuickFilter::Urgent),
            "matching" => Ok(QuickFilter::Matching),
            other => Err(Error::InvalidEnumValue {
                kind: "quick filter",
                value: other.to_string(),
            }),
        }
    }
}

/// Quick filter plus the advanced filter sidebar and search box
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadCriteria {
    pub quick: QuickFilter,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub weight_min: Option<u32>,
    pub weight_max: Option<u32>,
    pub price_min: Option<u64>,
    pub price_max: Option<u64>,
    /// Empty means any type
    pub cargo_types: Vec<CargoType>,
    pub search: Option<String>,
}

/// One removable constraint of a [`LoadCriteria`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Quick,
    Origin,
    Destination,
    WeightMin,
    WeightMax,
    PriceMin,
    PriceMax,
    CargoTypes,
    Search,
}

/// Chip shown above the list for an active constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterTag {
    pub key: FilterKey,
    pub label: String,
}

impl FilterTag {
    fn new(key: FilterKey, label: String) -> Self {
        Self { key, label }
    }
}

fn pesos(amount: u64) -> String {
    format!("${}", format_budget(&amount.to_string()))
}

impl LoadCriteria {
    /// Clear every constraint
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drop a single constraint, leaving the rest in place
    pub fn remove(&mut self, key: FilterKey) {
        match key {
            FilterKey::Quick => self.quick = QuickFilter::All,
            FilterKey::Origin => self.origin = None,
            FilterKey::Destination => self.destination = None,
            FilterKey::WeightMin => self.weight_min = None,
            FilterKey::WeightMax => self.weight_max = None,
            FilterKey::PriceMin => self.price_min = None,
            FilterKey::PriceMax => self.price_max = None,
            FilterKey::CargoTypes => self.cargo_types.clear(),
            FilterKey::Search => self.search = None,
        }
    }

    /// Tags for every constraint in effect, in sidebar order. Blank text
    /// fields are not constraints and get no tag.
    pub fn active_tags(&self) -> Vec<FilterTag> {
        let mut tags = Vec::new();
        if self.quick != QuickFilter::All {
            tags.push(FilterTag::new(FilterKey::Quick, self.quick.label().to_string()));
        }
        if let Some(origin) = active(&self.origin) {
            tags.push(FilterTag::new(FilterKey::Origin, format!("Origen: {}", origin)));
        }
        if let Some(destination) = active(&self.destination) {
            tags.push(FilterTag::new(
                FilterKey::Destination,
                format!("Destino: {}", destination),
            ));
        }
        if let Some(min) = self.weight_min {
            tags.push(FilterTag::new(FilterKey::WeightMin, format!("Peso mínimo: {}kg", min)));
        }
        if let Some(max) = self.weight_max {
            tags.push(FilterTag::new(FilterKey::WeightMax, format!("Peso máximo: {}kg", max)));
        }
        if let Some(min) = self.price_min {
            tags.push(FilterTag::new(FilterKey::PriceMin, format!("Precio mínimo: {}", pesos(min))));
        }
        if let Some(max) = self.price_max {
            tags.push(FilterTag::new(FilterKey::PriceMax, format!("Precio máximo: {}", pesos(max))));
        }
        if !self.cargo_types.is_empty() {
            tags.push(FilterTag::new(
                FilterKey::CargoTypes,
                format!("Tipo: {}", self.type_labels()),
            ));
        }
        if let Some(term) = active(&self.search) {
            tags.push(FilterTag::new(FilterKey::Search, format!("Búsqueda: {}", term)));
        }
        tags
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_tags().is_empty()
    }

    /// One-line description of the filters in effect
    pub fn summary(&self) -> String {
        let tags = self.active_tags();
        if tags.is_empty() {
            return "Mostrando todas las cargas disponibles".to_string();
        }

        let mut parts = Vec::new();
        if let Some(origin) = active(&self.origin) {
            parts.push(format!("origen: {}", origin));
        }
        if let Some(destination) = active(&self.destination) {
            parts.push(format!("destino: {}", destination));
        }
        if !self.cargo_types.is_empty() {
            parts.push(format!("tipos: {}", self.type_labels()));
        }
        let price: Vec<String> = [
            self.price_min.map(|min| format!("desde {}", pesos(min))),
            self.price_max.map(|max| format!("hasta {}", pesos(max))),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !price.is_empty() {
            parts.push(format!("precio: {}", price.join(" - ")));
        }

        if parts.is_empty() {
            format!("{} filtro(s) activo(s)", tags.len())
        } else {
            format!("Filtros: {}", parts.join("; "))
        }
    }

    fn type_labels(&self) -> String {
        self.cargo_types
            .iter()
            .map(CargoType::label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn matches_quick(&self, load: &Load) -> bool {
        match self.quick {
            QuickFilter::All => true,
            QuickFilter::Nearby => load.distance_km <= NEARBY_KM,
            QuickFilter::Urgent => load.urgency == Urgency::High,
            QuickFilter::Matching => load.matches_route,
        }
    }

    fn matches_search(&self, load: &Load) -> bool {
        match active(&self.search) {
            None => true,
            Some(term) => {
                contains_ci(&load.origin.city, term)
                    || contains_ci(&load.destination.city, term)
                    || contains_ci(load.cargo_type.as_str(), term)
            }
        }
    }
}

impl Criteria<Load> for LoadCriteria {
    fn matches(&self, load: &Load) -> bool {
        if !self.matches_quick(load) {
            return false;
        }
        if let Some(origin) = active(&self.origin) {
            if !contains_ci(&load.origin.city, origin) {
                return false;
            }
        }
        if let Some(destination) = active(&self.destination) {
            if !contains_ci(&load.destination.city, destination) {
                return false;
            }
        }
        if self.weight_min.is_some_and(|min| load.weight_kg < min) {
            return false;
        }
        if self.weight_max.is_some_and(|max| load.weight_kg > max) {
            return false;
        }
        if !self.cargo_types.is_empty() && !self.cargo_types.contains(&load.cargo_type) {
            return false;
        }
        if self.price_min.is_some_and(|min| load.price < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| load.price > max) {
            return false;
        }
        self.matches_search(load)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSort {
    /// Highest id first
    #[default]
    Newest,
    PriceHigh,
    PriceLow,
    Distance,
    Urgency,
    /// Extra key: largest volume first
    Volume,
}

impl FromStr for LoadSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "newest" => Ok(LoadSort::Newest),
            "price_high" => Ok(LoadSort::PriceHigh),
            "price_low" => Ok(LoadSort::PriceLow),
            "distance" => Ok(LoadSort::Distance),
            "urgency" => Ok(LoadSort::Urgency),
            "volume" => Ok(LoadSort::Volume),
            _ => Err(Error::InvalidSortKey(s.to_string())),
        }
    }
}

impl SortKey<Load> for LoadSort {
    fn compare(&self, a: &Load, b: &Load) -> Ordering {
        match self {
            LoadSort::Newest => b.id.cmp(&a.id),
            LoadSort::PriceHigh => b.price.cmp(&a.price),
            LoadSort::PriceLow => a.price.cmp(&b.price),
            LoadSort::Distance => a.distance_km.cmp(&b.distance_km),
            LoadSort::Urgency => b.urgency.rank().cmp(&a.urgency.rank()),
            LoadSort::Volume => cmp_f64(b.volume_m3, a.volume_m3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Place, PriceType};
    use crate::query::{run_query, InputOrder};

    fn load(id: u32, origin: &str, price: u64, cargo_type: CargoType, urgency: Urgency) -> Load {
        Load {
            id,
            origin: Place::new(origin, ""),
            destination: Place::new("Medellín, ANT", ""),
            weight_kg: 1000 * id,
            volume_m3: 10.0,
            cargo_type,
            pickup_time: "Hoy 14:00".to_string(),
            delivery_time: "Mañana 10:00".to_string(),
            price,
            price_type: PriceType::Fixed,
            distance_km: 10 * id,
            urgency,
            matches_route: id % 2 == 0,
            is_new: false,
            is_express: false,
        }
    }

    fn board() -> Vec<Load> {
        vec![
            load(1, "Bogotá D.C.", 100, CargoType::General, Urgency::High),
            load(2, "Cali", 50, CargoType::Refrigerated, Urgency::Low),
            load(3, "Barranquilla", 200, CargoType::Dangerous, Urgency::Medium),
        ]
    }

    fn prices(loads: &[Load]) -> Vec<u64> {
        loads.iter().map(|l| l.price).collect()
    }

    #[test]
    fn test_price_low_orders_ascending() {
        let out = run_query(&board(), &LoadCriteria::default(), &LoadSort::PriceLow);
        assert_eq!(prices(&out), vec![50, 100, 200]);
    }

    #[test]
    fn test_price_low_is_reverse_of_price_high() {
        let low = run_query(&board(), &LoadCriteria::default(), &LoadSort::PriceLow);
        let mut high = run_query(&board(), &LoadCriteria::default(), &LoadSort::PriceHigh);
        high.reverse();
        assert_eq!(low, high);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let criteria = LoadCriteria {
            search: Some("bogotá".to_string()),
            ..Default::default()
        };
        let out = run_query(&board(), &criteria, &InputOrder);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].origin.city, "Bogotá D.C.");
    }

    #[test]
    fn test_quick_filters() {
        let nearby = LoadCriteria {
            quick: QuickFilter::Nearby,
            ..Default::default()
        };
        assert_eq!(run_query(&board(), &nearby, &InputOrder).len(), 2);

        let urgent = LoadCriteria {
            quick: QuickFilter::Urgent,
            ..Default::default()
        };
        assert_eq!(run_query(&board(), &urgent, &InputOrder)[0].id, 1);

        let matching = LoadCriteria {
            quick: QuickFilter::Matching,
            ..Default::default()
        };
        assert_eq!(run_query(&board(), &matching, &InputOrder)[0].id, 2);
    }

    #[test]
    fn test_conjunction_of_advanced_filters() {
        let criteria = LoadCriteria {
            weight_min: Some(1500),
            price_max: Some(150),
            ..Default::default()
        };
        let out = run_query(&board(), &criteria, &InputOrder);
        assert_eq!(out.iter().map(|l| l.id).collect::<Vec<_>>(), vec![2]);

        let criteria = LoadCriteria {
            cargo_types: vec![CargoType::Dangerous, CargoType::General],
            origin: Some("  ".to_string()),
            ..Default::default()
        };
        let out = run_query(&board(), &criteria, &InputOrder);
        assert_eq!(out.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_urgency_sort_keeps_ties_in_input_order() {
        let mut loads = board();
        loads.push(load(4, "Bucaramanga", 450, CargoType::Fragile, Urgency::High));
        let out = run_query(&loads, &LoadCriteria::default(), &LoadSort::Urgency);
        assert_eq!(out.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 4, 3, 2]);
    }

    #[test]
    fn test_tags_follow_active_constraints() {
        let mut criteria = LoadCriteria {
            quick: QuickFilter::Matching,
            origin: Some("Bogotá".to_string()),
            destination: Some("  ".to_string()),
            weight_min: Some(500),
            price_max: Some(2_000_000),
            cargo_types: vec![CargoType::General, CargoType::Fragile],
            ..LoadCriteria::default()
        };
        let labels: Vec<String> = criteria.active_tags().into_iter().map(|t| t.label).collect();
        assert_eq!(
            labels,
            vec![
                "Coincide con mi ruta",
                "Origen: Bogotá",
                "Peso mínimo: 500kg",
                "Precio máximo: $2.000.000",
                "Tipo: Carga General, Frágil",
            ]
        );

        criteria.remove(FilterKey::PriceMax);
        criteria.remove(FilterKey::Quick);
        assert_eq!(criteria.active_tags().len(), 3);
        assert_eq!(criteria.origin.as_deref(), Some("Bogotá"));
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            LoadCriteria::default().summary(),
            "Mostrando todas las cargas disponibles"
        );
        assert!(LoadCriteria::default().is_unconstrained());

        let criteria = LoadCriteria {
            origin: Some("Bogotá".to_string()),
            destination: Some("Medellín".to_string()),
            price_min: Some(800_000),
            price_max: Some(1_500_000),
            ..LoadCriteria::default()
        };
        assert_eq!(
            criteria.summary(),
            "Filtros: origen: Bogotá; destino: Medellín; precio: desde $800.000 - hasta $1.500.000"
        );

        let criteria = LoadCriteria {
            quick: QuickFilter::Urgent,
            weight_max: Some(3000),
            ..LoadCriteria::default()
        };
        assert_eq!(criteria.summary(), "2 filtro(s) activo(s)");
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("price-high".parse::<LoadSort>().unwrap(), LoadSort::PriceHigh);
        assert!(matches!("cheapest".parse::<LoadSort>(), Err(Error::InvalidSortKey(_))));
    }
}
