//! Partitioned resource DTOs.
//!
//! - `Area`: a named parcel with a relative size
//! - `AreaInfo`: the ordered parcels of one region
//! - `AreaAssignment`: the outcome of allocating one parcel

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
    pub size: f64,
}

impl Area {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaInfo {
    pub region: String,
    /// Allocation order; must not be re-sorted
    pub areas: Vec<Area>,
}

impl AreaInfo {
    pub fn new(region: impl Into<String>, areas: Vec<Area>) -> Self {
        Self {
            region: region.into(),
            areas,
        }
    }

    pub fn total_size(&self) -> f64 {
        self.areas.iter().map(|area| area.size).sum()
    }

    /// Built-in region data.
    pub fn for_region(region: &str) -> Result<Self> {
        let sizes: &[(&str, f64)] = match region {
            "JP" => JP_PREFECTURES,
            _ => return Err(AppError::RegionNotFound(region.to_string())),
        };

        Ok(Self::new(
            region,
            sizes
                .iter()
                .map(|(name, size)| Area::new(*name, *size))
                .collect(),
        ))
    }
}

/// One allocated (or unallocated) parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaAssignment {
    pub area: Area,
    /// Share of the total area, rounded to 3 decimals
    pub ratio: f64,
    pub author: Option<String>,
    /// 1-based rank of `author`, 0 when unassigned
    pub rank: usize,
}

/// Prefectures of Japan in km², north to south.
const JP_PREFECTURES: &[(&str, f64)] = &[
    ("Hokkaido", 83424.0),
    ("Aomori", 9646.0),
    ("Iwate", 15275.0),
    ("Miyagi", 7282.0),
    ("Akita", 11638.0),
    ("Yamagata", 9323.0),
    ("Fukushima", 13784.0),
    ("Ibaraki", 6097.0),
    ("Tochigi", 6408.0),
    ("Gunma", 6362.0),
    ("Saitama", 3798.0),
    ("Chiba", 5158.0),
    ("Tokyo", 2191.0),
    ("Kanagawa", 2416.0),
    ("Niigata", 12584.0),
    ("Toyama", 4248.0),
    ("Ishikawa", 4186.0),
    ("Fukui", 4190.0),
    ("Yamanashi", 4465.0),
    ("Nagano", 13562.0),
    ("Gifu", 10621.0),
    ("Shizuoka", 7777.0),
    ("Aichi", 5172.0),
    ("Mie", 5774.0),
    ("Shiga", 4017.0),
    ("Kyoto", 4612.0),
    ("Osaka", 1905.0),
    ("Hyogo", 8401.0),
    ("Nara", 3691.0),
    ("Wakayama", 4725.0),
    ("Tottori", 3507.0),
    ("Shimane", 6708.0),
    ("Okayama", 7115.0),
    ("Hiroshima", 8479.0),
    ("Yamaguchi", 6112.0),
    ("Tokushima", 4147.0),
    ("Kagawa", 1877.0),
    ("Ehime", 5676.0),
    ("Kouchi", 7104.0),
    ("Fukuoka", 4986.0),
    ("Saga", 2441.0),
    ("Nagasaki", 4132.0),
    ("Kumamoto", 7409.0),
    ("Oita", 6341.0),
    ("Miyazaki", 7735.0),
    ("Kagoshima", 9187.0),
    ("Okinawa", 2281.0),
];
