//! Base parsing functions for chromaticities and named options.

use std::str::FromStr;

use whitepoint_core::ChromaticityXY;

/// Parse a chromaticity in format "x,y"
///
/// Both coordinates must lie in (0, 1) and `x + y` must stay below 1.
pub fn parse_xy(xy_str: &str) -> Result<ChromaticityXY, String> {
    let parts: Vec<&str> = xy_str.split(',').collect();
    if parts.len() != 2 {
        return Err(format!(
            "xy must be in format x,y (e.g., 0.3127,0.3290), got: {}",
            xy_str
        ));
    }

    let x = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid x value: {}", parts[0]))?;
    let y = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid y value: {}", parts[1]))?;

    for (val, name) in [(x, "x"), (y, "y")] {
        if !(val > 0.0 && val < 1.0) {
            return Err(format!("{} value {} must be in range (0.0, 1.0)", name, val));
        }
    }
    if x + y >= 1.0 {
        return Err(format!("x + y must be below 1.0, got {}", x + y));
    }

    Ok(ChromaticityXY::new(x, y))
}

/// Parse a named option, falling back to `default` when absent.
pub fn parse_named<T>(value: Option<&str>, default: T) -> Result<T, String>
where
    T: FromStr<Err = String>,
{
    match value {
        Some(s) => s.parse(),
        None => Ok(default),
    }
}

/// JPEG quality, 1-100
pub fn parse_quality(quality: u8) -> Result<u8, String> {
    if (1..=100).contains(&quality) {
        Ok(quality)
    } else {
        Err(format!("JPEG quality must be 1-100, got {}", quality))
    }
}
