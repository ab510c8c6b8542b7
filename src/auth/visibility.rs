use crate::model::{team::Team, user::Employee};

/// Row-level scope for salary and incentive listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    Team(Team),
    User(u64),
}

impl Visibility {
    pub fn admits(&self, employee: &Employee) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Team(team) => employee.team == Some(*team),
            Visibility::User(user_id) => employee.id == *user_id,
        }
    }
}
