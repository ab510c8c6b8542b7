use serde::{Deserialize, Serialize};

use crate::model::{role::Role, team::Team};

/// Roster entry. Team membership is whatever the roster says *now*.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub team: Option<Team>,
}
