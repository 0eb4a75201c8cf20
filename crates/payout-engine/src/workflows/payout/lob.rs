use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineOfBusiness {
    #[serde(rename = "TW")]
    TwoWheeler,
    #[serde(rename = "PVT CAR")]
    PrivateCar,
    #[serde(rename = "CV")]
    CommercialVehicle,
    #[serde(rename = "BUS")]
    Bus,
    #[serde(rename = "TAXI")]
    Taxi,
    #[serde(rename = "MISD")]
    Miscellaneous,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Keyword sets in resolution order. A segment can carry several keywords
/// ("PCV CAR CARRIER"), so the first set that hits decides.
const KEYWORDS: [(LineOfBusiness, &[&str]); 6] = [
    (LineOfBusiness::Bus, &["BUS"]),
    (LineOfBusiness::TwoWheeler, &["TW", "2W", "MC", "SC", "1+5"]),
    (LineOfBusiness::PrivateCar, &["PVT CAR", "CAR", "PCI"]),
    (LineOfBusiness::CommercialVehicle, &["CV", "GVW", "PCV", "GCV"]),
    (LineOfBusiness::Taxi, &["TAXI"]),
    (LineOfBusiness::Miscellaneous, &["MISD", "TRACTOR"]),
];

impl LineOfBusiness {
    pub fn resolve(segment: &str) -> Self {
        let upper = segment.to_uppercase();
        KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| upper.contains(keyword)))
            .map(|(lob, _)| *lob)
            .unwrap_or(Self::Unknown)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TwoWheeler => "TW",
            Self::PrivateCar => "PVT CAR",
            Self::CommercialVehicle => "CV",
            Self::Bus => "BUS",
            Self::Taxi => "TAXI",
            Self::Miscellaneous => "MISD",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for LineOfBusiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
