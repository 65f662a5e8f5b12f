//! Country calling code to region code reduction.
//!
//! The phone number metadata collection is converted from XML elsewhere and
//! handed over as JSON. Only three fields per territory matter here.

use crate::Result;
use crate::tables::{LabelTable, Prefix, PrefixTable};
use ohno::{IntoAppError, app_err};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Already-converted phone number metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataCollection {
    #[serde(default)]
    pub metadata: Vec<TerritoryMetadata>,
}

/// The parts of one territory's metadata used to build the region map.
#[derive(Debug, Clone, Deserialize)]
pub struct TerritoryMetadata {
    /// Region code, such as `US` or `001` for non-geographic entities
    pub id: String,

    pub country_code: Prefix,

    #[serde(default)]
    pub main_country_for_code: bool,
}

impl MetadataCollection {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).into_app_err("parsing metadata collection")
    }

    /// Every region sharing each country code, main region first, the rest in listed order.
    #[must_use]
    pub fn regions_by_country_code(&self) -> BTreeMap<Prefix, Vec<String>> {
        let mut map: BTreeMap<Prefix, Vec<String>> = BTreeMap::new();
        for territory in &self.metadata {
            let regions = map.entry(territory.country_code).or_default();
            if territory.main_country_for_code {
                regions.insert(0, territory.id.clone());
            } else {
                regions.push(territory.id.clone());
            }
        }
        map
    }
}

/// Reduce the collection to one region per country code: the main region, or the
/// first region listed when none is marked as main.
pub fn main_region_by_country_code(collection: &MetadataCollection) -> Result<LabelTable> {
    let mut table = LabelTable::new();
    for (code, regions) in collection.regions_by_country_code() {
        let main = regions
            .into_iter()
            .next()
            .ok_or_else(|| app_err!("no region for country code {code}"))?;
        table.try_insert(code, main)?;
    }
    Ok(table)
}

/// Reduce the collection to every region per country code, main region first.
#[expect(clippy::unnecessary_wraps, reason = "shares the extractor signature with main_region_by_country_code")]
pub fn all_regions_by_country_code(collection: &MetadataCollection) -> Result<PrefixTable<Vec<String>>> {
    Ok(collection.regions_by_country_code().into_iter().collect())
}
