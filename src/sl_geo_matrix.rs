// Reference inter-region latency table
//
// Round-trip figures per region pair, loosely following public cloud
// inter-region ping data. The Geo model draws synthetic latencies; this table
// is what those links would look like on a real WAN.

use std::fmt;

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
    UsEast,
    UsWest,
    EuWest,
    EuCentral,
    ApSouth,
    ApNortheast,
    SaEast,
    AfSouth,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::UsEast,
        Region::UsWest,
        Region::EuWest,
        Region::EuCentral,
        Region::ApSouth,
        Region::ApNortheast,
        Region::SaEast,
        Region::AfSouth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Region::UsEast => "US-East",
            Region::UsWest => "US-West",
            Region::EuWest => "EU-West",
            Region::EuCentral => "EU-Central",
            Region::ApSouth => "AP-South",
            Region::ApNortheast => "AP-Northeast",
            Region::SaEast => "SA-East",
            Region::AfSouth => "AF-South",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Latency used for a pair missing from the table
pub const DEFAULT_LATENCY_MS: u64 = 100;

/// Latency inside one region
pub const INTRA_REGION_LATENCY_MS: u64 = 1;

/// Symmetric region-to-region latency lookup (milliseconds)
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoLatencyMatrix;

impl GeoLatencyMatrix {
    pub fn new() -> Self {
        Self
    }

    /// ```
    /// use sublyne::sl_geo_matrix::{GeoLatencyMatrix, Region};
    ///
    /// let matrix = GeoLatencyMatrix::new();
    /// assert_eq!(matrix.latency_ms(Region::EuWest, Region::EuWest), 1);
    /// assert_eq!(
    ///     matrix.latency_ms(Region::UsEast, Region::EuWest),
    ///     matrix.latency_ms(Region::EuWest, Region::UsEast)
    /// );
    /// ```
    pub fn latency_ms(&self, from: Region, to: Region) -> u64 {
        if from == to {
            return INTRA_REGION_LATENCY_MS;
        }
        let (a, b) = if from <= to { (from, to) } else { (to, from) };
        Self::one_way_table(a, b).unwrap_or(DEFAULT_LATENCY_MS)
    }

    // pairs are listed with the first region ordered before the second
    fn one_way_table(a: Region, b: Region) -> Option<u64> {
        use Region::*;
        let ms = match (a, b) {
            (UsEast, UsWest) => 60,
            (UsEast, EuWest) => 75,
            (UsEast, EuCentral) => 85,
            (UsEast, ApSouth) => 200,
            (UsEast, ApNortheast) => 150,
            (UsEast, SaEast) => 110,
            (UsEast, AfSouth) => 210,
            (UsWest, EuWest) => 140,
            (UsWest, EuCentral) => 150,
            (UsWest, ApSouth) => 180,
            (UsWest, ApNortheast) => 100,
            (UsWest, SaEast) => 180,
            (UsWest, AfSouth) => 280,
            (EuWest, EuCentral) => 15,
            (EuWest, ApSouth) => 120,
            (EuWest, ApNortheast) => 220,
            (EuWest, SaEast) => 180,
            (EuWest, AfSouth) => 160,
            (EuCentral, ApSouth) => 110,
            (EuCentral, ApNortheast) => 210,
            (EuCentral, SaEast) => 190,
            (EuCentral, AfSouth) => 150,
            (ApSouth, ApNortheast) => 90,
            (ApSouth, SaEast) => 310,
            (ApSouth, AfSouth) => 140,
            (ApNortheast, SaEast) => 280,
            (ApNortheast, AfSouth) => 250,
            (SaEast, AfSouth) => 270,
            _ => return None,
        };
        Some(ms)
    }

    /// Mean latency over every distinct pair in a validator set
    pub fn average_latency(&self, regions: &[Region]) -> f64 {
        if regions.len() < 2 {
            return 0.0;
        }

        let mut total = 0u64;
        let mut count = 0u64;
        for (i, &r1) in regions.iter().enumerate() {
            for &r2 in &regions[i + 1..] {
                total += self.latency_ms(r1, r2);
                count += 1;
            }
        }

        total as f64 / count as f64
    }

    /// Slowest link in a validator set (critical path)
    pub fn max_latency(&self, regions: &[Region]) -> u64 {
        let mut max = 0u64;
        for &r1 in regions {
            for &r2 in regions {
                max = max.max(self.latency_ms(r1, r2));
            }
        }
        max
    }
}
