use crate::auth::visibility::Visibility;
use crate::error::{CoreError, CoreResult};
use crate::model::{role::Role, team::Team};

/// The caller as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
    pub team: Option<Team>,
}

impl AuthUser {
    pub fn require_admin(&self) -> CoreResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Admin only"))
        }
    }

    /// Which salary/incentive rows this caller may list. `requested_team` is
    /// only honoured for admins.
    pub fn visibility(&self, requested_team: Option<Team>) -> Visibility {
        match (self.role, requested_team, self.team) {
            (Role::Admin, Some(team), _) => Visibility::Team(team),
            (Role::Admin, None, _) => Visibility::All,
            (Role::TeamLeader, _, Some(team)) => Visibility::Team(team),
            _ => Visibility::User(self.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role, team: Option<Team>) -> AuthUser {
        AuthUser {
            user_id: 7,
            email: "kim@example.com".to_string(),
            role,
            team,
        }
    }

    #[test]
    fn admin_sees_everything_or_the_requested_team() {
        let admin = caller(Role::Admin, None);
        assert_eq!(admin.visibility(None), Visibility::All);
        assert_eq!(admin.visibility(Some(Team::Field)), Visibility::Team(Team::Field));
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn team_leader_is_pinned_to_own_team() {
        let leader = caller(Role::TeamLeader, Some(Team::Design));
        assert_eq!(leader.visibility(Some(Team::Sales)), Visibility::Team(Team::Design));
        assert!(matches!(leader.require_admin(), Err(CoreError::Forbidden(_))));
    }

    #[test]
    fn team_leader_without_team_and_employees_see_own_rows() {
        assert_eq!(caller(Role::TeamLeader, None).visibility(None), Visibility::User(7));
        let employee = caller(Role::Employee, Some(Team::Field));
        assert_eq!(employee.visibility(Some(Team::Field)), Visibility::User(7));
    }
}
