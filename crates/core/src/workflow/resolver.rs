//! Hierarchy-based approver selection.
//!
//! Given the organization's people and a step's requirements, picks the
//! single user who must approve that step.

use uuid::Uuid;

use crate::workflow::types::TeamScope;

/// A user considered for approver selection.
///
/// Candidates are loaded per organization; the resolver itself is pure
/// and deterministic over whatever slice it is handed.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// User id.
    pub id: Uuid,
    /// Team the user belongs to.
    pub team_id: Uuid,
    /// The user's hierarchy level row.
    pub hierarchy_level_id: Uuid,
    /// Seniority number of that level. Lower = more senior.
    pub level_number: i32,
    /// Display name of the level (e.g. "Director").
    pub level_name: String,
    /// The user's display name.
    pub name: String,
    /// Deactivated users keep their history but never approve.
    pub active: bool,
}

/// Stateless engine for selecting approvers from an organization hierarchy.
pub struct HierarchyResolver;

impl HierarchyResolver {
    /// Find the approver for one step.
    ///
    /// Eligible candidates are active, at or above the required seniority
    /// (`level_number <= required_level`), not the submitter, and inside
    /// `team_id` when the step is team-scoped. Among eligible candidates
    /// the most senior wins; ties on seniority break by id so selection
    /// stays deterministic across runs.
    ///
    /// # Arguments
    /// * `candidates` - Users of the organization to choose from
    /// * `exclude_user` - The submitter, who can never approve themselves
    /// * `required_level` - Seniority floor for the step
    /// * `team_id` - Restrict to this team, if the step is team-scoped
    ///
    /// # Returns
    /// The chosen candidate, or `None` when no one is eligible. An empty
    /// result is a hard failure for the step, not a skip.
    #[must_use]
    pub fn find_approver<'a>(
        candidates: &'a [Candidate],
        exclude_user: Uuid,
        required_level: i32,
        team_id: Option<Uuid>,
    ) -> Option<&'a Candidate> {
        candidates
            .iter()
            .filter(|c| c.active)
            .filter(|c| c.id != exclude_user)
            .filter(|c| c.level_number <= required_level)
            .filter(|c| team_id.is_none_or(|t| c.team_id == t))
            .min_by_key(|c| (c.level_number, c.id))
    }

    /// Resolve the team restriction for a step scope.
    #[must_use]
    pub const fn team_restriction(scope: TeamScope, submitter_team: Uuid) -> Option<Uuid> {
        match scope {
            TeamScope::SubmitterTeam => Some(submitter_team),
            TeamScope::OrgWide => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u128, team: u128, level: i32) -> Candidate {
        Candidate {
            id: Uuid::from_u128(id),
            team_id: Uuid::from_u128(team),
            hierarchy_level_id: Uuid::from_u128(u128::from(level.unsigned_abs())),
            level_number: level,
            level_name: format!("L{level}"),
            name: format!("user-{id}"),
            active: true,
        }
    }

    #[test]
    fn test_picks_most_senior_eligible() {
        let candidates = vec![
            candidate(1, 10, 5),
            candidate(2, 10, 3),
            candidate(3, 10, 4),
        ];

        let picked = HierarchyResolver::find_approver(&candidates, Uuid::from_u128(99), 6, None)
            .expect("approver");
        assert_eq!(picked.id, Uuid::from_u128(2));
    }

    #[test]
    fn test_respects_seniority_floor() {
        let candidates = vec![candidate(1, 10, 7), candidate(2, 10, 6)];

        // Level 6 or more senior required; the level-7 user is ineligible.
        let picked = HierarchyResolver::find_approver(&candidates, Uuid::from_u128(99), 6, None)
            .expect("approver");
        assert_eq!(picked.id, Uuid::from_u128(2));
    }

    #[test]
    fn test_excludes_submitter() {
        let candidates = vec![candidate(1, 10, 2)];

        let picked = HierarchyResolver::find_approver(&candidates, Uuid::from_u128(1), 6, None);
        assert!(picked.is_none());
    }

    #[test]
    fn test_excludes_inactive() {
        let mut inactive = candidate(1, 10, 2);
        inactive.active = false;
        let candidates = vec![inactive, candidate(2, 10, 4)];

        let picked = HierarchyResolver::find_approver(&candidates, Uuid::from_u128(99), 6, None)
            .expect("approver");
        assert_eq!(picked.id, Uuid::from_u128(2));
    }

    #[test]
    fn test_team_restriction_filters() {
        let candidates = vec![candidate(1, 10, 2), candidate(2, 20, 3)];

        let picked = HierarchyResolver::find_approver(
            &candidates,
            Uuid::from_u128(99),
            6,
            Some(Uuid::from_u128(20)),
        )
        .expect("approver");
        assert_eq!(picked.id, Uuid::from_u128(2));
    }

    #[test]
    fn test_tie_breaks_by_id() {
        let candidates = vec![candidate(7, 10, 3), candidate(3, 10, 3)];

        let picked = HierarchyResolver::find_approver(&candidates, Uuid::from_u128(99), 6, None)
            .expect("approver");
        assert_eq!(picked.id, Uuid::from_u128(3));
    }

    #[test]
    fn test_empty_candidate_set() {
        let picked = HierarchyResolver::find_approver(&[], Uuid::from_u128(99), 6, None);
        assert!(picked.is_none());
    }

    #[test]
    fn test_team_restriction_for_scope() {
        let team = Uuid::from_u128(42);
        assert_eq!(
            HierarchyResolver::team_restriction(TeamScope::SubmitterTeam, team),
            Some(team)
        );
        assert_eq!(
            HierarchyResolver::team_restriction(TeamScope::OrgWide, team),
            None
        );
    }
}
