//! Best/base/worst overlays sharing one axis.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::{Result, WaterfallError};
use crate::item::WaterfallItem;
use crate::reduce::{Waterfall, reduce};

/// Named forecast band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Best,
    Base,
    Worst,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Best, Scenario::Base, Scenario::Worst];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Base => "base",
            Self::Worst => "worst",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reduced band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub scenario: Scenario,
    pub waterfall: Waterfall,
}

/// Every band of an overlay plus the axis they share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverlay {
    pub bands: Vec<Band>,
    pub domain: Domain,
}

impl ScenarioOverlay {
    #[must_use]
    pub fn band(&self, scenario: Scenario) -> Option<&Waterfall> {
        self.bands
            .iter()
            .find(|b| b.scenario == scenario)
            .map(|b| &b.waterfall)
    }
}

/// Reduce each band independently and size one shared axis over all of them.
pub fn reduce_scenarios(
    bands: &[(Scenario, Vec<WaterfallItem>)],
    headroom: f64,
) -> Result<ScenarioOverlay> {
    if bands.is_empty() {
        return Err(WaterfallError::EmptyInput);
    }
    let bands = bands
        .iter()
        .map(|(scenario, items)| {
            reduce(items).map(|waterfall| Band {
                scenario: *scenario,
                waterfall,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&Waterfall> = bands.iter().map(|b| &b.waterfall).collect();
    let domain = Domain::union(&refs, headroom)?;
    Ok(ScenarioOverlay { bands, domain })
}
