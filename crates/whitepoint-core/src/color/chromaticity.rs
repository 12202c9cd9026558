//! Chromaticity coordinate types and the conversions between them.

use serde::{Deserialize, Serialize};

use super::matrix::{mul_vec, Matrix3};

/// Denominators below this are treated as zero.
const EPSILON: f64 = 1e-12;

/// linear sRGB (D65) -> XYZ, IEC 61966-2-1.
pub const SRGB_TO_XYZ: Matrix3 = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// XYZ -> linear sRGB (D65).
pub const XYZ_TO_SRGB: Matrix3 = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// CIE 1931 chromaticity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaticityXY {
    pub x: f64,
    pub y: f64,
}

/// CIE XYZ tristimulus values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TristimulusXYZ {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Which uniform chromaticity space a `UvCoordinate` lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvSpace {
    /// CIE 1960 UCS (u, v), the space Duv is measured in.
    Uv1960,
    /// CIE 1976 UCS (u', v'), where v' = 1.5 v.
    UvPrime1976,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvCoordinate {
    pub u: f64,
    pub v: f64,
    pub space: UvSpace,
}

impl ChromaticityXY {
    /// Standard D65 white point, the fallback for every degenerate conversion.
    pub const D65: ChromaticityXY = ChromaticityXY {
        x: 0.3127,
        y: 0.3290,
    };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// XYZ with Y = 1. Fails softly to zero when `y` is (near) zero.
    pub fn to_xyz(self) -> TristimulusXYZ {
        if self.y.abs() < EPSILON {
            return TristimulusXYZ::ZERO;
        }
        TristimulusXYZ {
            x: self.x / self.y,
            y: 1.0,
            z: (1.0 - self.x - self.y) / self.y,
        }
    }

    /// CIE 1960 uv.
    pub fn to_uv(self) -> UvCoordinate {
        let denom = -2.0 * self.x + 12.0 * self.y + 3.0;
        if denom.abs() < EPSILON {
            return UvCoordinate::new_1960(0.0, 0.0);
        }
        UvCoordinate::new_1960(4.0 * self.x / denom, 6.0 * self.y / denom)
    }

    /// Inside the plausible white-point box `[0.2, 0.5]` on both axes.
    pub fn in_white_box(self) -> bool {
        (0.2..=0.5).contains(&self.x) && (0.2..=0.5).contains(&self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for ChromaticityXY {
    fn default() -> Self {
        Self::D65
    }
}

impl TristimulusXYZ {
    pub const ZERO: TristimulusXYZ = TristimulusXYZ {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Project to xy. Returns D65 when the sum is (near) zero.
    pub fn to_xy(self) -> ChromaticityXY {
        let sum = self.x + self.y + self.z;
        if sum.abs() < EPSILON || !sum.is_finite() {
            return ChromaticityXY::D65;
        }
        ChromaticityXY::new(self.x / sum, self.y / sum)
    }

    /// Scale so that Y = 1. Leaves the value untouched when Y is (near) zero.
    pub fn normalized_luminance(self) -> Self {
        if self.y.abs() < EPSILON {
            return self;
        }
        Self::new(self.x / self.y, 1.0, self.z / self.y)
    }

    /// CIE 1976 u'v'. Zero when the denominator vanishes.
    pub fn to_uv_prime(self) -> UvCoordinate {
        let denom = self.x + 15.0 * self.y + 3.0 * self.z;
        if denom <= EPSILON {
            return UvCoordinate::new_1976(0.0, 0.0);
        }
        UvCoordinate::new_1976(4.0 * self.x / denom, 9.0 * self.y / denom)
    }

    pub fn to_linear_srgb(self) -> [f64; 3] {
        mul_vec(&XYZ_TO_SRGB, self.to_array())
    }

    pub fn from_linear_srgb(rgb: [f64; 3]) -> Self {
        Self::from_array(mul_vec(&SRGB_TO_XYZ, rgb))
    }
}

impl UvCoordinate {
    pub const fn new_1960(u: f64, v: f64) -> Self {
        Self {
            u,
            v,
            space: UvSpace::Uv1960,
        }
    }

    pub const fn new_1976(u: f64, v: f64) -> Self {
        Self {
            u,
            v,
            space: UvSpace::UvPrime1976,
        }
    }

    pub fn to_1960(self) -> Self {
        match self.space {
            UvSpace::Uv1960 => self,
            UvSpace::UvPrime1976 => Self::new_1960(self.u, self.v / 1.5),
        }
    }

    pub fn to_1976(self) -> Self {
        match self.space {
            UvSpace::UvPrime1976 => self,
            UvSpace::Uv1960 => Self::new_1976(self.u, self.v * 1.5),
        }
    }

    /// Euclidean distance, measured in this coordinate's space.
    pub fn distance(self, other: UvCoordinate) -> f64 {
        let other = match self.space {
            UvSpace::Uv1960 => other.to_1960(),
            UvSpace::UvPrime1976 => other.to_1976(),
        };
        (self.u - other.u).hypot(self.v - other.v)
    }

    /// Back to xy through the 1960 inverse. D65 when the denominator vanishes.
    pub fn to_xy(self) -> ChromaticityXY {
        let uv = self.to_1960();
        let denom = 2.0 * uv.u - 8.0 * uv.v + 4.0;
        if denom.abs() < EPSILON {
            return ChromaticityXY::D65;
        }
        ChromaticityXY::new(3.0 * uv.u / denom, 2.0 * uv.v / denom)
    }

    /// XYZ with Y = 1, computed from u'v'.
    pub fn to_xyz(self) -> TristimulusXYZ {
        let p = self.to_1976();
        if p.v.abs() < EPSILON {
            return TristimulusXYZ::ZERO;
        }
        TristimulusXYZ::new(
            9.0 * p.u / (4.0 * p.v),
            1.0,
            (12.0 - 3.0 * p.u - 20.0 * p.v) / (4.0 * p.v),
        )
    }
}
