//! Static HSV color catalogue and the runtime team filter registry.
//!
//! Channels follow the 8-bit convention used by most vision libraries:
//! hue in `0..=179`, saturation and value in `0..=255`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An `(h, s, v)` triple
pub type Hsv = (u8, u8, u8);

/// A named inclusive HSV range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvColor {
    pub name: &'static str,
    pub lower_hsv: Hsv,
    pub upper_hsv: Hsv,
}

impl HsvColor {
    /// Per-channel inclusive containment
    pub fn contains(&self, (h, s, v): Hsv) -> bool {
        let (lh, ls, lv) = self.lower_hsv;
        let (uh, us, uv) = self.upper_hsv;
        (lh..=uh).contains(&h) && (ls..=us).contains(&s) && (lv..=uv).contains(&v)
    }
}

pub const WHITE: HsvColor = HsvColor {
    name: "white",
    lower_hsv: (0, 0, 184),
    upper_hsv: (179, 39, 255),
};

// Red sits on both ends of the hue circle, so it takes two ranges.
pub const RED: HsvColor = HsvColor {
    name: "red",
    lower_hsv: (0, 100, 0),
    upper_hsv: (8, 255, 255),
};

pub const BLUEISH_RED: HsvColor = HsvColor {
    name: "blueish_red",
    lower_hsv: (170, 0, 0),
    upper_hsv: (178, 255, 255),
};

pub const ORANGE: HsvColor = HsvColor {
    name: "orange",
    lower_hsv: (7, 178, 0),
    upper_hsv: (15, 255, 255),
};

pub const YELLOW: HsvColor = HsvColor {
    name: "yellow",
    lower_hsv: (23, 0, 0),
    upper_hsv: (29, 255, 255),
};

pub const GREEN: HsvColor = HsvColor {
    name: "green",
    lower_hsv: (48, 50, 0),
    upper_hsv: (55, 255, 255),
};

pub const SKY_BLUE: HsvColor = HsvColor {
    name: "sky_blue",
    lower_hsv: (95, 38, 0),
    upper_hsv: (111, 190, 255),
};

pub const BLUE: HsvColor = HsvColor {
    name: "blue",
    lower_hsv: (112, 80, 0),
    upper_hsv: (126, 255, 255),
};

pub const BLACK: HsvColor = HsvColor {
    name: "black",
    lower_hsv: (0, 0, 0),
    upper_hsv: (179, 255, 49),
};

pub const ALL_COLORS: [HsvColor; 9] = [
    WHITE,
    RED,
    ORANGE,
    YELLOW,
    GREEN,
    SKY_BLUE,
    BLUE,
    BLUEISH_RED,
    BLACK,
];

/// Looks up a catalogue color by name
pub fn color_by_name(name: &str) -> Result<HsvColor> {
    ALL_COLORS
        .iter()
        .find(|c| c.name == name)
        .copied()
        .ok_or_else(|| Error::UnknownColor(name.to_string()))
}

/// Converts an 8-bit RGB pixel to 8-bit HSV (hue halved to fit `0..=179`)
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta) + 120.0
    } else {
        60.0 * ((r - g) / delta) + 240.0
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };

    let saturation = if max == 0.0 { 0.0 } else { delta / max * 255.0 };

    let h = ((hue / 2.0).round() as u16 % 180) as u8;
    (h, saturation.round() as u8, max as u8)
}

/// A team matched by any one of several color ranges
#[derive(Debug, Clone, PartialEq)]
pub struct TeamFilter {
    pub name: String,
    pub colors: Vec<HsvColor>,
}

impl TeamFilter {
    pub fn new(name: impl Into<String>, colors: Vec<HsvColor>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }
}

/// Declarative form of a team filter: color names from the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFilterConfig {
    pub name: String,
    pub colors: Vec<String>,
}

impl TryFrom<TeamFilterConfig> for TeamFilter {
    type Error = Error;

    fn try_from(config: TeamFilterConfig) -> Result<Self> {
        let colors = config
            .colors
            .iter()
            .map(|c| color_by_name(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(TeamFilter::new(config.name, colors))
    }
}

/// Ordered set of team filters consulted by the classifier.
///
/// Registration order is the classifier's tie-break order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamFilterRegistry {
    filters: Vec<TeamFilter>,
}

impl TeamFilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with the Chelsea / Man City / referee kits
    pub fn with_defaults() -> Self {
        Self {
            filters: vec![
                TeamFilter::new("Chelsea", vec![BLUE, GREEN]),
                TeamFilter::new("Man City", vec![SKY_BLUE]),
                TeamFilter::new("Referee", vec![BLACK]),
            ],
        }
    }

    /// Builds a registry from declarative entries, failing on unknown colors
    pub fn from_configs(configs: Vec<TeamFilterConfig>) -> Result<Self> {
        let mut registry = Self::new();
        for config in configs {
            registry.add(TeamFilter::try_from(config)?)?;
        }
        Ok(registry)
    }

    pub fn add(&mut self, filter: TeamFilter) -> Result<()> {
        if self.get(&filter.name).is_some() {
            return Err(Error::DuplicateTeam(filter.name));
        }
        debug!("registered team filter '{}'", filter.name);
        self.filters.push(filter);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<TeamFilter> {
        let index = self
            .filters
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| Error::UnknownTeamFilter(name.to_string()))?;
        Ok(self.filters.remove(index))
    }

    pub fn update_colors(&mut self, name: &str, colors: Vec<HsvColor>) -> Result<()> {
        let filter = self
            .filters
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownTeamFilter(name.to_string()))?;
        filter.colors = colors;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TeamFilter> {
        self.filters.iter().find(|f| f.name == name)
    }

    pub fn team_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TeamFilter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lookup() {
        assert_eq!(color_by_name("sky_blue").unwrap(), SKY_BLUE);
        assert!(matches!(color_by_name("magenta"), Err(Error::UnknownColor(n)) if n == "magenta"));
    }

    #[test]
    fn test_catalogue_channels_in_range() {
        for color in ALL_COLORS {
            assert!(color.upper_hsv.0 <= 179, "{}", color.name);
            assert!(color.lower_hsv.0 <= color.upper_hsv.0, "{}", color.name);
            assert!(color.lower_hsv.1 <= color.upper_hsv.1, "{}", color.name);
            assert!(color.lower_hsv.2 <= color.upper_hsv.2, "{}", color.name);
        }
    }

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), (0, 255, 255));
        assert_eq!(rgb_to_hsv([0, 255, 0]), (60, 255, 255));
        assert_eq!(rgb_to_hsv([0, 0, 255]), (120, 255, 255));
        assert_eq!(rgb_to_hsv([255, 255, 255]), (0, 0, 255));
        assert_eq!(rgb_to_hsv([0, 0, 0]), (0, 0, 0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        assert!(BLUE.contains((112, 80, 0)));
        assert!(BLUE.contains((126, 255, 255)));
        assert!(!BLUE.contains((127, 200, 200)));
        assert!(BLACK.contains(rgb_to_hsv([10, 10, 10])));
        assert!(WHITE.contains(rgb_to_hsv([250, 250, 250])));
    }

    #[test]
    fn test_registry_add_remove_update() {
        let mut registry = TeamFilterRegistry::new();
        registry.add(TeamFilter::new("Home", vec![RED])).unwrap();
        registry.add(TeamFilter::new("Away", vec![BLUE])).unwrap();
        assert_eq!(registry.team_names(), vec!["Home", "Away"]);

        assert!(matches!(
            registry.add(TeamFilter::new("Home", vec![WHITE])),
            Err(Error::DuplicateTeam(_))
        ));

        registry.update_colors("Home", vec![RED, BLUEISH_RED]).unwrap();
        assert_eq!(registry.get("Home").unwrap().colors, vec![RED, BLUEISH_RED]);

        let removed = registry.remove("Away").unwrap();
        assert_eq!(removed.name, "Away");
        assert_eq!(registry.len(), 1);
        assert!(matches!(registry.remove("Away"), Err(Error::UnknownTeamFilter(_))));
    }

    #[test]
    fn test_registry_from_configs_rejects_unknown_color() {
        let configs = vec![TeamFilterConfig {
            name: "Home".to_string(),
            colors: vec!["red".to_string(), "purple".to_string()],
        }];
        let err = TeamFilterRegistry::from_configs(configs).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, Error::UnknownColor(n) if n == "purple"));
    }

    #[test]
    fn test_default_registry() {
        let registry = TeamFilterRegistry::with_defaults();
        assert_eq!(registry.team_names(), vec!["Chelsea", "Man City", "Referee"]);
    }
}
