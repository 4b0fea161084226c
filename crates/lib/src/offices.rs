use serde::Serialize;

use crate::model::{Coordinates, GovernmentId, Office};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Default)]
pub struct OfficeQuery {
    /// Case-insensitive match on name or address.
    pub search: Option<String>,
    pub government_id: Option<GovernmentId>,
    /// When set, results carry their distance and come nearest first.
    pub origin: Option<Coordinates>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OfficeMatch {
    pub office: Office,
    pub distance_km: Option<f64>,
}

impl OfficeQuery {
    fn matches(&self, office: &Office) -> bool {
        if let Some(government) = self.government_id {
            if office.government_id != Some(government) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => {
                let search = search.to_lowercase();
                office.name.to_lowercase().contains(&search)
                    || office.address.to_lowercase().contains(&search)
            }
            _ => true,
        }
    }

    pub fn apply(&self, offices: &[Office]) -> Vec<OfficeMatch> {
        let mut matches: Vec<OfficeMatch> = offices
            .iter()
            .filter(|office| self.matches(office))
            .map(|office| OfficeMatch {
                office: office.clone(),
                distance_km: match (self.origin, office.location) {
                    (Some(origin), Some(location)) => Some(haversine_km(origin, location)),
                    _ => None,
                },
            })
            .collect();

        if self.origin.is_some() {
            // Offices without coordinates go last.
            matches.sort_by(|a, b| {
                let a = a.distance_km.unwrap_or(f64::INFINITY);
                let b = b.distance_km.unwrap_or(f64::INFINITY);
                a.total_cmp(&b)
            });
        }
        matches
    }
}
