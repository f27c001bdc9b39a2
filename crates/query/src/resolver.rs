use ingest::Coordinates;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

use crate::candidate::MigrantCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Distances at or below this many kilometres are measurement noise.
    pub threshold_km: f64,
    /// Decimal places kept on every coordinate.
    pub precision: u32,
    /// Mean Earth radius used by the haversine formula.
    pub earth_radius_km: f64,
    /// Drop candidates whose distance cannot be computed.
    pub require_distance: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold_km: 10.0,
            precision: 3,
            earth_radius_km: 6371.0088,
            require_distance: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveTrace {
    pub candidates: usize,
    pub with_distance: usize,
    pub too_close: usize,
    pub without_distance_dropped: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveResult {
    pub migrants: Vec<MigrantCandidate>,
    pub trace: ResolveTrace,
}

/// Great-circle distance in kilometres.
pub fn haversine(a: Coordinates, b: Coordinates, radius_km: f64) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlong = (b.long - a.long).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlong / 2.0).sin().powi(2);
    2.0 * radius_km * h.sqrt().asin()
}

/// Picks the single best-supported origin per inscription.
#[derive(Debug, Clone, Default)]
pub struct GeoResolver {
    config: ResolverConfig,
}

impl GeoResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Whether a distance is large enough to claim a migration.
    pub fn is_credible(&self, distance_km: f64) -> bool {
        distance_km > self.config.threshold_km
    }

    /// Round coordinates and attach the find-spot to origin distance.
    pub fn measure(&self, mut candidate: MigrantCandidate) -> MigrantCandidate {
        let precision = self.config.precision;
        candidate.origin_coords = candidate.origin_coords.map(|c| c.rounded(precision));
        candidate.find_coords = candidate.find_coords.map(|c| c.rounded(precision));
        candidate.distance = match (candidate.find_coords, candidate.origin_coords) {
            (Some(find), Some(origin)) => Some(haversine(find, origin, self.config.earth_radius_km)),
            _ => None,
        };
        candidate
    }

    /// Keep at most one candidate per inscription, ordered by inscription id.
    ///
    /// The closest credible origin wins; candidates without a distance rank
    /// after all measured ones, and ties keep scan order.
    pub fn resolve(&self, candidates: Vec<MigrantCandidate>) -> ResolveResult {
        let mut trace = ResolveTrace {
            candidates: candidates.len(),
            ..Default::default()
        };

        // Step 1: Round and measure
        let measured: Vec<MigrantCandidate> =
            candidates.into_iter().map(|c| self.measure(c)).collect();
        trace.with_distance = measured.iter().filter(|c| c.distance.is_some()).count();

        // Step 2: Drop co-located and, if asked, unmeasurable candidates
        let mut kept: Vec<MigrantCandidate> = Vec::with_capacity(measured.len());
        for candidate in measured {
            match candidate.distance {
                Some(d) if !self.is_credible(d) => trace.too_close += 1,
                None if self.config.require_distance => trace.without_distance_dropped += 1,
                _ => kept.push(candidate),
            }
        }

        // Step 3: Stable sort, then first per inscription
        kept.sort_by(|a, b| {
            a.inscription_id
                .cmp(&b.inscription_id)
                .then_with(|| compare_distance(a.distance, b.distance))
        });
        kept.dedup_by(|later, earlier| later.inscription_id == earlier.inscription_id);
        trace.resolved = kept.len();

        info!(
            candidates = trace.candidates,
            too_close = trace.too_close,
            resolved = trace.resolved,
            "Resolved migrant origins"
        );

        ResolveResult {
            migrants: kept,
            trace,
        }
    }
}

/// Measured before unmeasured, shorter before longer.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, pid: &str, origin: Option<(f64, f64)>) -> MigrantCandidate {
        MigrantCandidate {
            inscription_id: id.to_string(),
            pid: pid.to_string(),
            origin: pid.to_string(),
            forms: vec!["Emeritensi".to_string()],
            origin_coords: origin.map(|(lat, long)| Coordinates::new(lat, long)),
            find_coords: Some(Coordinates::new(0.0, 0.0)),
            distance: None,
            located: origin.is_some(),
        }
    }

    /// Latitude at which the meridian distance from the equator is `km`.
    fn lat_for(km: f64) -> f64 {
        (km / 6371.0088).to_degrees()
    }

    #[test]
    fn test_haversine() {
        let rome = Coordinates::new(41.893, 12.483);
        let merida = Coordinates::new(38.916, -6.344);
        let d = haversine(rome, merida, 6371.0088);
        assert!((d - 1624.6).abs() < 1.0, "got {}", d);
        assert_eq!(haversine(rome, rome, 6371.0088), 0.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let resolver = GeoResolver::default();
        assert!(!resolver.is_credible(10.0));
        assert!(resolver.is_credible(10.01));
        assert!(!resolver.is_credible(3.2));
    }

    #[test]
    fn test_close_origins_discarded() {
        let result = GeoResolver::default().resolve(vec![candidate("a", "/near", Some((0.05, 0.0)))]);
        assert!(result.migrants.is_empty());
        assert_eq!(result.trace.too_close, 1);
    }

    #[test]
    fn test_keeps_minimum_distance() {
        let result = GeoResolver::default().resolve(vec![
            candidate("a", "/far", Some((lat_for(50.2), 0.0))),
            candidate("a", "/near", Some((lat_for(12.7), 0.0))),
        ]);
        assert_eq!(result.migrants.len(), 1);
        assert_eq!(result.migrants[0].pid, "/near");
        let d = result.migrants[0].distance.unwrap();
        assert!((d - 12.7).abs() < 0.2, "got {}", d);
    }

    #[test]
    fn test_unmeasured_ranks_last() {
        let result = GeoResolver::default().resolve(vec![
            candidate("a", "/unknown", None),
            candidate("a", "/far", Some((lat_for(800.0), 0.0))),
            candidate("b", "/unknown", None),
        ]);
        let picked: Vec<(&str, &str)> = result
            .migrants
            .iter()
            .map(|c| (c.inscription_id.as_str(), c.pid.as_str()))
            .collect();
        assert_eq!(picked, vec![("a", "/far"), ("b", "/unknown")]);
    }

    #[test]
    fn test_ties_keep_scan_order() {
        let result = GeoResolver::default().resolve(vec![
            candidate("a", "/first", Some((1.0, 1.0))),
            candidate("a", "/second", Some((1.0, 1.0))),
        ]);
        assert_eq!(result.migrants[0].pid, "/first");
    }

    #[test]
    fn test_require_distance() {
        let resolver = GeoResolver::new(ResolverConfig {
            require_distance: true,
            ..Default::default()
        });
        let result = resolver.resolve(vec![candidate("a", "/unknown", None)]);
        assert!(result.migrants.is_empty());
        assert_eq!(result.trace.without_distance_dropped, 1);
    }

    #[test]
    fn test_coordinates_rounded() {
        let c = GeoResolver::default().measure(candidate("a", "/x", Some((38.91649, -6.34371))));
        assert_eq!(c.origin_coords, Some(Coordinates::new(38.916, -6.344)));
    }
}
