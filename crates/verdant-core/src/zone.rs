//! # Shipping Zones
//!
//! Distance-based pricing tiers. Each zone owns a set of region codes and a
//! multiplier applied to base + weight cost.
//!
//! ## Zone Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      resolve(" ca ")                                    │
//! │                                                                         │
//! │  normalize → "CA"                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  zone1 Local ×0.8 ──► zone2 Regional ×1.0 ──► ... ──► zone6 West ×1.8  │
//! │    (no)                  (no)                           (yes) ✔        │
//! │                                                                         │
//! │  No match anywhere ("ZZ") → last zone, the catch-all (most expensive)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Zones are checked for overlap when the table is built, so the scan order
//! never changes the answer.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::types::normalize_region;

/// A pricing tier for a group of destination regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: String,
    pub name: String,

    /// Member region codes (US state codes in the reference table).
    #[serde(default)]
    pub regions: Vec<String>,

    /// 1.0 = baseline cost, 1.2 = 20% more, 0.8 = 20% less.
    pub multiplier: Decimal,
}

impl ShippingZone {
    /// Creates a zone.
    pub fn new<R>(id: impl Into<String>, name: impl Into<String>, regions: R, multiplier: Decimal) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        ShippingZone {
            id: id.into(),
            name: name.into(),
            regions: regions
                .into_iter()
                .map(|r| normalize_region(r.as_ref()))
                .collect(),
            multiplier,
        }
    }

    /// Whether an already-normalized region code belongs to this zone.
    pub fn contains(&self, normalized_region: &str) -> bool {
        self.regions.iter().any(|r| r == normalized_region)
    }
}

/// Ordered, validated zone table. The last zone is the catch-all.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    zones: Vec<ShippingZone>,
}

impl ZoneTable {
    /// Builds the table and checks its invariants.
    ///
    /// ## Rejected Configurations
    /// - empty table
    /// - multiplier ≤ 0
    /// - a region listed in two zones
    /// - a zone pricier than the catch-all (last) zone
    pub fn new(zones: Vec<ShippingZone>) -> Result<Self, TableError> {
        let Some(catch_all) = zones.last() else {
            return Err(TableError::NoZones);
        };

        let mut owners: HashMap<String, &str> = HashMap::new();
        for zone in &zones {
            if zone.multiplier <= Decimal::ZERO {
                return Err(TableError::InvalidMultiplier {
                    zone_id: zone.id.clone(),
                    multiplier: zone.multiplier,
                });
            }

            if zone.multiplier > catch_all.multiplier {
                return Err(TableError::CatchAllNotMostExpensive {
                    catch_all: catch_all.id.clone(),
                    zone_id: zone.id.clone(),
                });
            }

            for region in &zone.regions {
                let region = normalize_region(region);
                if let Some(first) = owners.insert(region.clone(), &zone.id) {
                    if first != zone.id {
                        return Err(TableError::OverlappingZones {
                            region,
                            first_zone: first.to_string(),
                            second_zone: zone.id.clone(),
                        });
                    }
                }
            }
        }

        // Stored normalized so lookups only normalize the query.
        let zones = zones
            .into_iter()
            .map(|z| ShippingZone::new(z.id, z.name, z.regions, z.multiplier))
            .collect();

        Ok(ZoneTable { zones })
    }

    /// Zone for a region code; unknown regions get the catch-all zone.
    ///
    /// ```rust
    /// use verdant_core::reference;
    ///
    /// let zones = reference::zone_table().unwrap();
    /// assert_eq!(zones.resolve(" nc ").id, "zone1");
    /// assert_eq!(zones.resolve("ZZ").id, "zone7");
    /// ```
    pub fn resolve(&self, region_code: &str) -> &ShippingZone {
        let region = normalize_region(region_code);
        self.zones
            .iter()
            .find(|zone| zone.contains(&region))
            .unwrap_or_else(|| self.catch_all())
    }

    /// Whether some zone lists the region explicitly.
    pub fn is_known_region(&self, region_code: &str) -> bool {
        let region = normalize_region(region_code);
        self.zones.iter().any(|zone| zone.contains(&region))
    }

    /// The fallback zone for unknown regions.
    pub fn catch_all(&self) -> &ShippingZone {
        // Non-empty is checked in `new`.
        &self.zones[self.zones.len() - 1]
    }

    /// All zones in configured order.
    pub fn zones(&self) -> &[ShippingZone] {
        &self.zones
    }
}
