//! Content library object types.

use serde::{Deserialize, Serialize};

/// Which kind of entity a library object describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Country,
    City,
}

/// The type of a content library object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    CountryStory,
    CityStory,
    PracticalFinance,
    PracticalEmergency,
    PracticalTransport,
    CultureSpecial,
}

impl ContentType {
    /// Every type, in menu order.
    pub const ALL: [Self; 6] = [
        Self::CountryStory,
        Self::CityStory,
        Self::PracticalFinance,
        Self::PracticalEmergency,
        Self::PracticalTransport,
        Self::CultureSpecial,
    ];

    /// The stored key, e.g. `country-story`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CountryStory => "country-story",
            Self::CityStory => "city-story",
            Self::PracticalFinance => "practical-finance",
            Self::PracticalEmergency => "practical-emergency",
            Self::PracticalTransport => "practical-transport",
            Self::CultureSpecial => "culture-special",
        }
    }

    /// Display label stored alongside the object as `typeName`.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::CountryStory => "Country Story",
            Self::CityStory => "City Story",
            Self::PracticalFinance => "Practical Info: Money",
            Self::PracticalEmergency => "Practical Info: Emergency",
            Self::PracticalTransport => "Practical Info: Transport",
            Self::CultureSpecial => "Culture Special",
        }
    }

    /// The kind of entity `targetId` must point at.
    #[must_use]
    pub const fn target_kind(self) -> TargetKind {
        match self {
            Self::CountryStory
            | Self::PracticalFinance
            | Self::PracticalEmergency
            | Self::CultureSpecial => TargetKind::Country,
            Self::CityStory | Self::PracticalTransport => TargetKind::City,
        }
    }

    /// Type-specific field keys accepted besides title, tagline and description.
    #[must_use]
    pub const fn extra_fields(self) -> &'static [&'static str] {
        match self {
            Self::CountryStory => &["culturalFeatures", "historicalBackground"],
            Self::CityStory => &["highlights", "bestSeason"],
            Self::PracticalFinance => &["currency", "exchangeFee", "tippingCulture"],
            Self::PracticalEmergency => &["emergencyNumber", "embassyContact", "hospitalInfo"],
            Self::PracticalTransport => &["airportAccess", "publicTransport", "taxiInfo"],
            Self::CultureSpecial => &["etiquette", "festivals"],
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("invalid content type: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_str_and_json() {
        for ty in ContentType::ALL {
            assert_eq!(ty.as_str().parse::<ContentType>().unwrap(), ty);
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn test_target_kinds() {
        assert_eq!(ContentType::CountryStory.target_kind(), TargetKind::Country);
        assert_eq!(ContentType::CityStory.target_kind(), TargetKind::City);
        assert_eq!(ContentType::PracticalEmergency.target_kind(), TargetKind::Country);
    }

    #[test]
    fn test_extra_fields_are_type_specific() {
        assert!(ContentType::PracticalFinance.extra_fields().contains(&"exchangeFee"));
        assert!(!ContentType::CityStory.extra_fields().contains(&"exchangeFee"));
    }

    #[test]
    fn test_unknown_type() {
        assert!("hotel-story".parse::<ContentType>().is_err());
    }
}
