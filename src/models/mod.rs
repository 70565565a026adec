use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod item;
pub mod outfit;

pub use item::{ItemDraft, ItemFilter, WardrobeItem};
pub use outfit::{AcceptOutcome, Direction, GenerationFailure, HistoryView, Outfit, WearFailure};

/// Garment category assigned at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Shoes => "shoes",
            Category::Accessory => "accessory",
        }
    }

    /// The outfit slot this category fills, if any. Accessories never fill one.
    pub fn slot(&self) -> Option<Slot> {
        match self {
            Category::Top => Some(Slot::Top),
            Category::Bottom => Some(Slot::Bottom),
            Category::Shoes => Some(Slot::Shoes),
            Category::Accessory => None,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Category::Top),
            "bottom" => Ok(Category::Bottom),
            "shoes" => Ok(Category::Shoes),
            "accessory" => Ok(Category::Accessory),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

/// Occasion tag. Matching is exact, so `Casual` is not `casual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Formal,
    Casual,
    Sport,
    Family,
    Informal,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Formal => "formal",
            Occasion::Casual => "casual",
            Occasion::Sport => "sport",
            Occasion::Family => "family",
            Occasion::Informal => "informal",
        }
    }
}

impl Display for Occasion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Occasion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "formal" => Ok(Occasion::Formal),
            "casual" => Ok(Occasion::Casual),
            "sport" => Ok(Occasion::Sport),
            "family" => Ok(Occasion::Family),
            "informal" => Ok(Occasion::Informal),
            other => Err(format!("Unknown occasion: {}", other)),
        }
    }
}

/// One of the three positions an outfit must fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Top,
    Bottom,
    Shoes,
}

impl Slot {
    /// Slots in the order items appear in an outfit
    pub const ALL: [Slot; 3] = [Slot::Top, Slot::Bottom, Slot::Shoes];
}

/// Which required slots had no candidates when an outfit was requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSlots {
    pub tops: bool,
    pub bottoms: bool,
    pub shoes: bool,
}

impl MissingSlots {
    pub fn mark(&mut self, slot: Slot) {
        match slot {
            Slot::Top => self.tops = true,
            Slot::Bottom => self.bottoms = true,
            Slot::Shoes => self.shoes = true,
        }
    }

    pub fn any(&self) -> bool {
        self.tops || self.bottoms || self.shoes
    }
}

impl Display for MissingSlots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (self.tops, "top"),
            (self.bottoms, "bottom"),
            (self.shoes, "shoes"),
        ]
        .iter()
        .filter(|(missing, _)| *missing)
        .map(|(_, name)| *name)
        .collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessory_has_no_slot() {
        assert_eq!(Category::Accessory.slot(), None);
        assert_eq!(Category::Shoes.slot(), Some(Slot::Shoes));
    }

    #[test]
    fn test_occasion_parse_is_case_sensitive() {
        assert_eq!("casual".parse::<Occasion>(), Ok(Occasion::Casual));
        assert!("Casual".parse::<Occasion>().is_err());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Bottom).unwrap();
        assert_eq!(json, r#""bottom""#);

        let parsed: Category = serde_json::from_str(r#""accessory""#).unwrap();
        assert_eq!(parsed, Category::Accessory);
    }

    #[test]
    fn test_missing_slots_display() {
        let mut missing = MissingSlots::default();
        assert!(!missing.any());

        missing.mark(Slot::Top);
        missing.mark(Slot::Shoes);
        assert!(missing.any());
        assert_eq!(missing.to_string(), "top, shoes");
    }
}
