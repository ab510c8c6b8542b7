use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Teams as labelled in the employee roster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
pub enum Team {
    #[strum(to_string = "디자인팀", serialize = "design")]
    #[serde(rename = "디자인팀", alias = "design")]
    Design,
    #[strum(to_string = "현장팀", serialize = "field")]
    #[serde(rename = "현장팀", alias = "field")]
    Field,
    #[strum(to_string = "영업팀", serialize = "sales")]
    #[serde(rename = "영업팀", alias = "sales")]
    Sales,
}

impl Team {
    pub const ALL: [Team; 3] = [Team::Design, Team::Field, Team::Sales];

    /// Prefix of the flat output fields, e.g. `designTeam` in `designTeamIncentive`.
    pub fn field_prefix(self) -> &'static str {
        match self {
            Team::Design => "designTeam",
            Team::Field => "fieldTeam",
            Team::Sales => "salesTeam",
        }
    }

    fn slot(self) -> usize {
        match self {
            Team::Design => 0,
            Team::Field => 1,
            Team::Sales => 2,
        }
    }
}

/// One value per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerTeam<T>([T; 3]);

impl<T> PerTeam<T> {
    pub fn from_fn(f: impl FnMut(Team) -> T) -> Self {
        PerTeam(Team::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        Team::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(self, mut f: impl FnMut(Team, T) -> U) -> PerTeam<U> {
        let [design, field, sales] = self.0;
        PerTeam([
            f(Team::Design, design),
            f(Team::Field, field),
            f(Team::Sales, sales),
        ])
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T> Index<Team> for PerTeam<T> {
    type Output = T;

    fn index(&self, team: Team) -> &T {
        &self.0[team.slot()]
    }
}

impl<T> IndexMut<Team> for PerTeam<T> {
    fn index_mut(&mut self, team: Team) -> &mut T {
        &mut self.0[team.slot()]
    }
}
