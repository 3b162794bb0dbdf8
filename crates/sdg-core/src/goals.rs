//! The 17 UN Sustainable Development Goals.
//!
//! Goal numbers, display names and the official goal colours are fixed; the
//! classifier's output vector is indexed in this order (goal 1 at index 0).

use serde::{Deserialize, Serialize};

use crate::CoreError;

pub const GOAL_COUNT: usize = 17;

/// Base URI of the UN SDG metadata vocabulary.
pub const SDG_URI_BASE: &str = "https://metadata.un.org/sdg/";

/// A single goal from the canonical list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    pub number: u8,
    pub name: &'static str,
    /// Official goal colour as `#RRGGBB`.
    pub colour: &'static str,
}

pub const GOALS: [Goal; GOAL_COUNT] = [
    Goal {
        number: 1,
        name: "No poverty",
        colour: "#E5243B",
    },
    Goal {
        number: 2,
        name: "Zero hunger",
        colour: "#DDA63A",
    },
    Goal {
        number: 3,
        name: "Good health and well-being",
        colour: "#4C9F38",
    },
    Goal {
        number: 4,
        name: "Quality Education",
        colour: "#C5192D",
    },
    Goal {
        number: 5,
        name: "Gender equality",
        colour: "#FF3A21",
    },
    Goal {
        number: 6,
        name: "Clean water and sanitation",
        colour: "#26BDE2",
    },
    Goal {
        number: 7,
        name: "Affordable and clean energy",
        colour: "#FCC30B",
    },
    Goal {
        number: 8,
        name: "Decent work and economic growth",
        colour: "#A21942",
    },
    Goal {
        number: 9,
        name: "Industry, innovation and infrastructure",
        colour: "#FD6925",
    },
    Goal {
        number: 10,
        name: "Reduced inequalities",
        colour: "#DD1367",
    },
    Goal {
        number: 11,
        name: "Sustainable cities and communities",
        colour: "#FD9D24",
    },
    Goal {
        number: 12,
        name: "Responsible consumption and production",
        colour: "#BF8B2E",
    },
    Goal {
        number: 13,
        name: "Climate action",
        colour: "#3F7E44",
    },
    Goal {
        number: 14,
        name: "Life below water",
        colour: "#0A97D9",
    },
    Goal {
        number: 15,
        name: "Life on Land",
        colour: "#56C02B",
    },
    Goal {
        number: 16,
        name: "Peace, Justice and strong institutions",
        colour: "#00689D",
    },
    Goal {
        number: 17,
        name: "Partnerships for the goals",
        colour: "#19486A",
    },
];

impl Goal {
    /// Look up a goal by its 1-based number.
    pub fn from_number(number: u8) -> Result<&'static Goal, CoreError> {
        number
            .checked_sub(1)
            .and_then(|i| GOALS.get(i as usize))
            .ok_or_else(|| CoreError::UnknownGoal(number.to_string()))
    }

    /// Look up a goal by its string code ("1" ..= "17").
    pub fn from_code(code: &str) -> Result<&'static Goal, CoreError> {
        code.trim()
            .parse::<u8>()
            .map_err(|_| CoreError::UnknownGoal(code.to_string()))
            .and_then(Self::from_number)
    }

    pub fn id(&self) -> String {
        format!("{SDG_URI_BASE}{}", self.number)
    }

    pub fn label(&self) -> String {
        format!("Goal {}", self.number)
    }

    pub fn code(&self) -> String {
        self.number.to_string()
    }

    /// `colour` as an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.colour.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }

    /// Icon file name used by the chart renderer, e.g. `E_SDG_icons-07.jpg`.
    pub fn icon_file_name(&self) -> String {
        format!("E_SDG_icons-{:02}.jpg", self.number)
    }
}

/// Wire representation of a goal inside a prediction.
///
/// ```json
/// {"@type": "sdg", "id": "https://metadata.un.org/sdg/7", "label": "Goal 7",
///  "code": "7", "name": "Affordable and clean energy", "type": "Goal"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdgGoal {
    #[serde(rename = "@type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_goal_type")]
    pub goal_type: String,
}

fn default_kind() -> String {
    "sdg".to_string()
}

fn default_goal_type() -> String {
    "Goal".to_string()
}

impl SdgGoal {
    /// Resolve the referenced goal from `code`.
    pub fn goal(&self) -> Result<&'static Goal, CoreError> {
        Goal::from_code(&self.code)
    }
}

impl From<&Goal> for SdgGoal {
    fn from(goal: &Goal) -> Self {
        Self {
            kind: default_kind(),
            id: goal.id(),
            label: goal.label(),
            code: goal.code(),
            name: goal.name.to_string(),
            goal_type: default_goal_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_are_numbered_in_order() {
        for (i, goal) in GOALS.iter().enumerate() {
            assert_eq!(goal.number as usize, i + 1);
            assert!(goal.colour.starts_with('#') && goal.colour.len() == 7);
        }
    }

    #[test]
    fn colours_decode_to_rgb() {
        assert_eq!(GOALS[0].rgb(), (0xE5, 0x24, 0x3B));
        assert_eq!(GOALS[16].rgb(), (0x19, 0x48, 0x6A));
    }

    #[test]
    fn lookup_by_number_and_code() {
        assert_eq!(Goal::from_number(7).unwrap().name, "Affordable and clean energy");
        assert_eq!(Goal::from_code(" 13 ").unwrap().number, 13);
        assert!(Goal::from_number(0).is_err());
        assert!(Goal::from_number(18).is_err());
        assert_eq!(
            Goal::from_code("x"),
            Err(CoreError::UnknownGoal("x".to_string()))
        );
    }

    #[test]
    fn wire_format_matches_un_vocabulary() {
        let goal = SdgGoal::from(Goal::from_number(4).unwrap());
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "@type": "sdg",
                "id": "https://metadata.un.org/sdg/4",
                "label": "Goal 4",
                "code": "4",
                "name": "Quality Education",
                "type": "Goal",
            })
        );
    }

    #[test]
    fn minimal_goal_reference_deserializes() {
        let goal: SdgGoal = serde_json::from_str(r#"{"code": "16"}"#).unwrap();
        assert_eq!(goal.kind, "sdg");
        assert_eq!(goal.goal_type, "Goal");
        assert_eq!(goal.goal().unwrap().number, 16);
    }

    #[test]
    fn icon_file_names_are_zero_padded() {
        assert_eq!(GOALS[0].icon_file_name(), "E_SDG_icons-01.jpg");
        assert_eq!(GOALS[16].icon_file_name(), "E_SDG_icons-17.jpg");
    }
}
