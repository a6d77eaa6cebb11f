use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Carriers operating out of the airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Airline {
    Jetstar,
    Qantas,
    RegionalExpress,
    Virgin,
    FlyPelican,
}

impl Airline {
    /// Three-letter carrier code used in flight and plane codes.
    pub fn code(&self) -> &'static str {
        match self {
            Airline::Jetstar => "JST",
            Airline::Qantas => "QFA",
            Airline::RegionalExpress => "RXA",
            Airline::Virgin => "VOZ",
            Airline::FlyPelican => "FRE",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Airline::Jetstar => "Jetstar",
            Airline::Qantas => "Qantas",
            Airline::RegionalExpress => "Regional Express",
            Airline::Virgin => "Virgin",
            Airline::FlyPelican => "Fly Pelican",
        }
    }
}

impl fmt::Display for Airline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Airline {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JST" => Ok(Airline::Jetstar),
            "QFA" => Ok(Airline::Qantas),
            "RXA" => Ok(Airline::RegionalExpress),
            "VOZ" => Ok(Airline::Virgin),
            "FRE" => Ok(Airline::FlyPelican),
            _ => Err(()),
        }
    }
}

/// Loyalty points credited per leg, keyed on the served city.
/// A fixed lookup, not a distance computation; unknown cities earn the base rate.
pub fn city_points(city: &str) -> u64 {
    match city {
        "Sydney" => 1200,
        "Melbourne" => 1750,
        "Rockhampton" => 1400,
        "Adelaide" => 1950,
        "Perth" => 3375,
        _ => 1000,
    }
}
