//! CIE standard illuminant white points (2° observer).

use serde::{Deserialize, Serialize};

use super::chromaticity::ChromaticityXY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardIlluminant {
    /// Incandescent / tungsten
    A,
    D50,
    D55,
    D65,
    D75,
    /// Equal energy
    E,
}

impl StandardIlluminant {
    pub const ALL: [StandardIlluminant; 6] = [
        Self::A,
        Self::D50,
        Self::D55,
        Self::D65,
        Self::D75,
        Self::E,
    ];

    pub fn xy(self) -> ChromaticityXY {
        match self {
            Self::A => ChromaticityXY::new(0.44757, 0.40745),
            Self::D50 => ChromaticityXY::new(0.34567, 0.35851),
            Self::D55 => ChromaticityXY::new(0.33242, 0.34743),
            Self::D65 => ChromaticityXY::new(0.31271, 0.32902),
            Self::D75 => ChromaticityXY::new(0.29902, 0.31485),
            Self::E => ChromaticityXY::new(1.0 / 3.0, 1.0 / 3.0),
        }
    }

    /// Nominal correlated color temperature in Kelvin.
    pub fn nominal_kelvin(self) -> f64 {
        match self {
            Self::A => 2856.0,
            Self::D50 => 5003.0,
            Self::D55 => 5503.0,
            Self::D65 => 6504.0,
            Self::D75 => 7504.0,
            Self::E => 5455.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::D50 => "D50",
            Self::D55 => "D55",
            Self::D65 => "D65",
            Self::D75 => "D75",
            Self::E => "E",
        }
    }
}

impl std::str::FromStr for StandardIlluminant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "tungsten" | "incandescent" => Ok(Self::A),
            "d50" => Ok(Self::D50),
            "d55" => Ok(Self::D55),
            "d65" => Ok(Self::D65),
            "d75" => Ok(Self::D75),
            "e" | "equal-energy" => Ok(Self::E),
            _ => Err(format!(
                "Unknown illuminant: {} (expected A, D50, D55, D65, D75 or E)",
                s
            )),
        }
    }
}
