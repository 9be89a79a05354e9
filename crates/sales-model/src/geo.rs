//! Static subregion -> coordinate reference table.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoCoordinate {
    #[serde(alias = "State", alias = "state", alias = "Subregion")]
    pub subregion: String,
    #[serde(alias = "lat", alias = "Latitude")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng", alias = "Longitude")]
    pub longitude: f64,
}

#[derive(Debug, Error)]
pub enum GeoTableError {
    #[error("geo table entry has an empty subregion name")]
    EmptyKey,
    #[error("geo table key {0:?} has leading or trailing whitespace")]
    UntrimmedKey(String),
    #[error("duplicate geo table entry for {0:?}")]
    Duplicate(String),
    #[error("invalid coordinate for {subregion:?}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        subregion: String,
        latitude: f64,
        longitude: f64,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Read-only lookup from subregion name (exact match) to a coordinate pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoTable {
    entries: Vec<GeoCoordinate>,
    index: HashMap<String, usize>,
}

impl GeoTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = GeoCoordinate>,
    ) -> Result<Self, GeoTableError> {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }

    /// Load a headered CSV with `subregion,latitude,longitude` columns (`State`, `lat`, `lon`
    /// and similar spellings are accepted).
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, GeoTableError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut table = Self::new();
        for entry in csv_reader.deserialize::<GeoCoordinate>() {
            table.insert(entry?)?;
        }
        Ok(table)
    }

    /// Centroids of the 50 US states and the District of Columbia, which order exports also
    /// spell `Washington DC`.
    pub fn us_states() -> Self {
        let mut table = Self {
            entries: Vec::with_capacity(US_STATE_CENTROIDS.len()),
            index: HashMap::with_capacity(US_STATE_CENTROIDS.len()),
        };
        for &(name, latitude, longitude) in US_STATE_CENTROIDS.iter() {
            table.index.insert(name.to_string(), table.entries.len());
            table.entries.push(GeoCoordinate {
                subregion: name.to_string(),
                latitude,
                longitude,
            });
        }
        table
    }

    /// Add one entry. Keys are stored verbatim, so they must already be trimmed; lookups never
    /// normalize either side.
    pub fn insert(&mut self, entry: GeoCoordinate) -> Result<(), GeoTableError> {
        let GeoCoordinate {
            subregion,
            latitude,
            longitude,
        } = entry;
        if subregion.trim().is_empty() {
            return Err(GeoTableError::EmptyKey);
        }
        if subregion.trim().len() != subregion.len() {
            return Err(GeoTableError::UntrimmedKey(subregion));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoTableError::InvalidCoordinate {
                subregion,
                latitude,
                longitude,
            });
        }
        if self.index.contains_key(&subregion) {
            return Err(GeoTableError::Duplicate(subregion));
        }

        self.index.insert(subregion.clone(), self.entries.len());
        self.entries.push(GeoCoordinate {
            subregion,
            latitude,
            longitude,
        });
        Ok(())
    }

    pub fn get(&self, subregion: &str) -> Option<&GeoCoordinate> {
        self.index.get(subregion).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoCoordinate> {
        self.entries.iter()
    }
}

const US_STATE_CENTROIDS: [(&str, f64, f64); 52] = [
    ("Alabama", 32.806671, -86.791130),
    ("Alaska", 61.370716, -152.404419),
    ("Arizona", 33.729759, -111.431221),
    ("Arkansas", 34.969704, -92.373123),
    ("California", 36.116203, -119.681564),
    ("Colorado", 39.059811, -105.311104),
    ("Connecticut", 41.597782, -72.755371),
    ("Delaware", 39.318523, -75.507141),
    ("District of Columbia", 38.897438, -77.026817),
    ("Washington DC", 38.897438, -77.026817),
    ("Florida", 27.766279, -81.686783),
    ("Georgia", 33.040619, -83.643074),
    ("Hawaii", 21.094318, -157.498337),
    ("Idaho", 44.240459, -114.478828),
    ("Illinois", 40.349457, -88.986137),
    ("Indiana", 39.849426, -86.258278),
    ("Iowa", 42.011539, -93.210526),
    ("Kansas", 38.526600, -96.726486),
    ("Kentucky", 37.668140, -84.670067),
    ("Louisiana", 31.169546, -91.867805),
    ("Maine", 44.693947, -69.381927),
    ("Maryland", 39.063946, -76.802101),
    ("Massachusetts", 42.230171, -71.530106),
    ("Michigan", 43.326618, -84.536095),
    ("Minnesota", 45.694454, -93.900192),
    ("Mississippi", 32.741646, -89.678696),
    ("Missouri", 38.456085, -92.288368),
    ("Montana", 46.921925, -110.454353),
    ("Nebraska", 41.125370, -98.268082),
    ("Nevada", 38.313515, -117.055374),
    ("New Hampshire", 43.452492, -71.563896),
    ("New Jersey", 40.298904, -74.521011),
    ("New Mexico", 34.840515, -106.248482),
    ("New York", 42.165726, -74.948051),
    ("North Carolina", 35.630066, -79.806419),
    ("North Dakota", 47.528912, -99.784012),
    ("Ohio", 40.388783, -82.764915),
    ("Oklahoma", 35.565342, -96.928917),
    ("Oregon", 44.572021, -122.070938),
    ("Pennsylvania", 40.590752, -77.209755),
    ("Rhode Island", 41.680893, -71.511780),
    ("South Carolina", 33.856892, -80.945007),
    ("South Dakota", 44.299782, -99.438828),
    ("Tennessee", 35.747845, -86.692345),
    ("Texas", 31.054487, -97.563461),
    ("Utah", 40.150032, -111.862434),
    ("Vermont", 44.045876, -72.710686),
    ("Virginia", 37.769337, -78.169968),
    ("Washington", 47.400902, -121.490494),
    ("West Virginia", 38.491226, -80.954453),
    ("Wisconsin", 44.268543, -89.616508),
    ("Wyoming", 42.755966, -107.302490),
];
