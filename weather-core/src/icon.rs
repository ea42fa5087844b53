use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon classification of WMO weather codes.
///
/// Many codes collapse onto one tag; snow intentionally shares the rain icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconTag {
    Sun,
    Moon,
    Cloud,
    CloudRain,
    CloudLightning,
}

impl IconTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconTag::Sun => "Sun",
            IconTag::Moon => "Moon",
            IconTag::Cloud => "Cloud",
            IconTag::CloudRain => "CloudRain",
            IconTag::CloudLightning => "CloudLightning",
        }
    }

    pub const fn all() -> &'static [IconTag] {
        &[
            IconTag::Sun,
            IconTag::Moon,
            IconTag::Cloud,
            IconTag::CloudRain,
            IconTag::CloudLightning,
        ]
    }
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IconTag {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase().replace(['-', '_'], "");

        match lower.as_str() {
            "sun" => Ok(IconTag::Sun),
            "moon" => Ok(IconTag::Moon),
            "cloud" => Ok(IconTag::Cloud),
            "cloudrain" | "rain" => Ok(IconTag::CloudRain),
            "cloudlightning" | "lightning" | "storm" => Ok(IconTag::CloudLightning),
            _ => Err(anyhow::anyhow!(
                "Unknown condition '{value}'. Supported: sun, moon, cloud, cloud-rain, cloud-lightning."
            )),
        }
    }
}

/// Classify a WMO weather code. Unknown codes fall back to [`IconTag::Cloud`].
///
/// See <https://open-meteo.com/en/docs#weathervariables>.
pub fn classify(code: i32, is_day: bool) -> IconTag {
    match code {
        0 | 1 if is_day => IconTag::Sun,
        0 | 1 => IconTag::Moon,
        2 | 3 | 45 | 48 => IconTag::Cloud,
        51 | 53 | 55 | 56 | 57 => IconTag::CloudRain,
        61 | 63 | 65 | 66 | 67 => IconTag::CloudRain,
        71 | 73 | 75 | 77 => IconTag::CloudRain,
        80 | 81 | 82 | 85 | 86 => IconTag::CloudRain,
        95 | 96 | 99 => IconTag::CloudLightning,
        _ => IconTag::Cloud,
    }
}
