//! Scenario table
//!
//! A scenario is one of a fixed set of high-status settings. Each one resolves to a
//! prompt fragment describing where the subject of the photo is placed.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed set of lifestyle scenarios offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    #[default]
    UrbanCeo,
    SilentElite,
    InternationalFreedom,
}

/// Returned when a key does not name any known scenario.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown scenario '{0}'")]
pub struct UnknownScenario(pub String);

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::UrbanCeo,
        Scenario::SilentElite,
        Scenario::InternationalFreedom,
    ];

    /// Wire key, as sent by the client in the `scenario` field.
    pub fn key(&self) -> &'static str {
        match self {
            Scenario::UrbanCeo => "urban-ceo",
            Scenario::SilentElite => "silent-elite",
            Scenario::InternationalFreedom => "international-freedom",
        }
    }

    /// Label shown next to the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::UrbanCeo => "CEO Urbano",
            Scenario::SilentElite => "Elite Silenciosa",
            Scenario::InternationalFreedom => "Liberdade Internacional",
        }
    }

    /// Setting description inserted into the generation prompt.
    pub fn prompt_fragment(&self) -> &'static str {
        match self {
            Scenario::UrbanCeo => {
                "a powerful CEO in a glass-walled corner office at the top of a skyscraper, \
                 wearing a tailored designer suit, with a city skyline at dusk behind them"
            }
            Scenario::SilentElite => {
                "a member of the discreet old-money elite, dressed in understated cashmere \
                 and quiet luxury, relaxing in the library of a private countryside estate"
            }
            Scenario::InternationalFreedom => {
                "a wealthy world traveler stepping off a private jet onto a sunny tropical \
                 runway, in elegant resort wear, with turquoise sea and a yacht in the distance"
            }
        }
    }

    /// Full instruction sent to the image provider together with the photo.
    pub fn prompt(&self) -> String {
        format!(
            "Transform this photo into a photorealistic image of the same person as {}. \
             Preserve the person's face, identity and expression exactly. \
             Return only the generated image, without any text, captions or watermarks.",
            self.prompt_fragment()
        )
    }
}

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.key() == s)
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.key())
    }
}
