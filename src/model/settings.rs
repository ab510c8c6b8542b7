use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::model::money::Percent;
use crate::model::team::Team;

/// Team labor-cost ratio applied when an update leaves it out.
pub const DEFAULT_TEAM_LABOR_COST_RATIO: Percent = Percent::whole(20);

/// The singleton ratio configuration, as stored in the `settings` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioSettings {
    pub labor_cost_ratio: Percent,
    pub incentive_ratio: Percent,
    pub design_team_labor_cost_ratio: Percent,
    pub design_team_incentive_ratio: Percent,
    pub field_team_labor_cost_ratio: Percent,
    pub field_team_incentive_ratio: Percent,
    pub sales_team_labor_cost_ratio: Percent,
    pub sales_team_incentive_ratio: Percent,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamRatios {
    pub labor_cost_ratio: Percent,
    pub incentive_ratio: Percent,
}

impl RatioSettings {
    /// Company ratios, with every team copying them.
    pub fn uniform(labor_cost_ratio: Percent, incentive_ratio: Percent) -> Self {
        RatioSettings {
            labor_cost_ratio,
            incentive_ratio,
            design_team_labor_cost_ratio: labor_cost_ratio,
            design_team_incentive_ratio: incentive_ratio,
            field_team_labor_cost_ratio: labor_cost_ratio,
            field_team_incentive_ratio: incentive_ratio,
            sales_team_labor_cost_ratio: labor_cost_ratio,
            sales_team_incentive_ratio: incentive_ratio,
            updated_at: None,
        }
    }

    pub fn team(&self, team: Team) -> TeamRatios {
        let (labor_cost_ratio, incentive_ratio) = match team {
            Team::Design => (self.design_team_labor_cost_ratio, self.design_team_incentive_ratio),
            Team::Field => (self.field_team_labor_cost_ratio, self.field_team_incentive_ratio),
            Team::Sales => (self.sales_team_labor_cost_ratio, self.sales_team_incentive_ratio),
        };
        TeamRatios {
            labor_cost_ratio,
            incentive_ratio,
        }
    }

    pub fn set_team(&mut self, team: Team, ratios: TeamRatios) {
        let (labor, incentive) = match team {
            Team::Design => (
                &mut self.design_team_labor_cost_ratio,
                &mut self.design_team_incentive_ratio,
            ),
            Team::Field => (
                &mut self.field_team_labor_cost_ratio,
                &mut self.field_team_incentive_ratio,
            ),
            Team::Sales => (
                &mut self.sales_team_labor_cost_ratio,
                &mut self.sales_team_incentive_ratio,
            ),
        };
        *labor = ratios.labor_cost_ratio;
        *incentive = ratios.incentive_ratio;
    }
}

/// Admin update payload. Company ratios are required, team ratios optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SettingsUpdate {
    pub labor_cost_ratio: Option<Percent>,
    pub incentive_ratio: Option<Percent>,
    pub design_team_labor_cost_ratio: Option<Percent>,
    pub design_team_incentive_ratio: Option<Percent>,
    pub field_team_labor_cost_ratio: Option<Percent>,
    pub field_team_incentive_ratio: Option<Percent>,
    pub sales_team_labor_cost_ratio: Option<Percent>,
    pub sales_team_incentive_ratio: Option<Percent>,
}

impl SettingsUpdate {
    pub fn from_json(payload: &serde_json::Value) -> CoreResult<Self> {
        SettingsUpdate::deserialize(payload).map_err(|e| CoreError::validation(e.to_string()))
    }

    /// Resolves defaults: team labor-cost ratios fall back to 20.00, team
    /// incentive ratios to the company incentive ratio.
    pub fn into_settings(self) -> CoreResult<RatioSettings> {
        let (Some(labor_cost_ratio), Some(incentive_ratio)) =
            (self.labor_cost_ratio, self.incentive_ratio)
        else {
            return Err(CoreError::validation(
                "labor_cost_ratio and incentive_ratio are required",
            ));
        };

        let team = |labor: Option<Percent>, incentive: Option<Percent>| TeamRatios {
            labor_cost_ratio: labor.unwrap_or(DEFAULT_TEAM_LABOR_COST_RATIO),
            incentive_ratio: incentive.unwrap_or(incentive_ratio),
        };

        let mut settings = RatioSettings::uniform(labor_cost_ratio, incentive_ratio);
        settings.set_team(
            Team::Design,
            team(self.design_team_labor_cost_ratio, self.design_team_incentive_ratio),
        );
        settings.set_team(
            Team::Field,
            team(self.field_team_labor_cost_ratio, self.field_team_incentive_ratio),
        );
        settings.set_team(
            Team::Sales,
            team(self.sales_team_labor_cost_ratio, self.sales_team_incentive_ratio),
        );
        Ok(settings)
    }
}
