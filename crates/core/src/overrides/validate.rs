//! The override validation pipeline.
//!
//! [`validate`] is a pure function over a fully-populated candidate and a
//! [`ValidationContext`] the manager resolves up front. Checks run in a
//! fixed order and the first failure wins, so callers can assert on a
//! specific failing rule deterministically. Cross-field rules (scope
//! exclusivity, close-after-open, scope immutability) live here rather
//! than in per-field hooks because each one reads several fields at once.

use crate::directory::GroupRef;
use crate::quiz::QuizSettings;

use super::model::{OverrideData, OverrideScope, QuizOverride};

/// One specific reason a candidate override was rejected.
///
/// Every rule failure is a distinct variant with a stable user-facing
/// message, so callers surface precise errors without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OverrideViolation {
    #[error("a quiz id must be given")]
    MissingQuiz,

    #[error("at least one quiz setting must be changed by the override")]
    NothingChanged,

    #[error("the quiz does not exist")]
    InvalidQuiz,

    #[error("a user and a group cannot both be set on one override")]
    BothUserAndGroup,

    #[error("either a user or a group must be set")]
    MissingUserAndGroup,

    #[error("the user does not exist")]
    InvalidUser,

    #[error("the group does not exist")]
    InvalidGroup,

    #[error("the group does not belong to the course of the quiz")]
    GroupNotInCourse,

    #[error("the close time must be after the open time")]
    CloseBeforeOpen,

    #[error("the number of attempts must not be negative")]
    NegativeAttempts,

    #[error("the time limit must not be negative")]
    NegativeTimeLimit,

    #[error("an override already exists for this user in this quiz")]
    DuplicateForUser,

    #[error("an override already exists for this group in this quiz")]
    DuplicateForGroup,

    #[error("no override exists with the given id")]
    UnknownOverride,

    #[error("the user or group of an existing override cannot be changed")]
    CannotChangeScope,
}

/// Everything the validator needs that requires a lookup.
///
/// The manager resolves these before calling [`validate`], which keeps the
/// pipeline itself synchronous and trivially testable.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext<'a> {
    /// The parent quiz, when it exists.
    pub parent: Option<&'a QuizSettings>,
    /// Whether the candidate's user scope references a real account.
    /// Only consulted for user-scoped candidates.
    pub user_exists: bool,
    /// The candidate's group, when it exists.
    /// Only consulted for group-scoped candidates.
    pub group: Option<GroupRef>,
    /// Whether another override (excluding the candidate itself) already
    /// exists for the same quiz and scope.
    pub duplicate_exists: bool,
    /// The stored record the candidate's id references, when updating.
    pub existing: Option<&'a QuizOverride>,
}

/// Validate a candidate override. First failure wins.
pub fn validate(candidate: &OverrideData, ctx: &ValidationContext<'_>) -> Result<(), OverrideViolation> {
    // 1. An override that changes nothing is the most common caller error,
    //    so it is reported ahead of everything else.
    if candidate.settings.is_empty() {
        return Err(OverrideViolation::NothingChanged);
    }

    // 2. Parent quiz must exist.
    let parent = ctx.parent.ok_or(OverrideViolation::InvalidQuiz)?;

    // 3. Exactly one scope.
    let scope = match (candidate.user_id, candidate.group_id) {
        (Some(_), Some(_)) => return Err(OverrideViolation::BothUserAndGroup),
        (None, None) => return Err(OverrideViolation::MissingUserAndGroup),
        (Some(user), None) => OverrideScope::User(user),
        (None, Some(group)) => OverrideScope::Group(group),
    };

    // 4. The scoped member must be real, and a group must sit in the same
    //    course as the quiz.
    match scope {
        OverrideScope::User(_) => {
            if !ctx.user_exists {
                return Err(OverrideViolation::InvalidUser);
            }
        }
        OverrideScope::Group(_) => {
            let group = ctx.group.ok_or(OverrideViolation::InvalidGroup)?;
            if group.course_id != parent.course_id {
                return Err(OverrideViolation::GroupNotInCourse);
            }
        }
    }

    // 5. Close strictly after open when both are set. Equal is invalid.
    if let (Some(open), Some(close)) = (candidate.settings.time_open, candidate.settings.time_close) {
        if close <= open {
            return Err(OverrideViolation::CloseBeforeOpen);
        }
    }

    // 6. Non-negative numeric settings. Zero never reaches this point, it
    //    is coerced to unset at the boundary.
    if matches!(candidate.settings.attempts, Some(a) if a < 0) {
        return Err(OverrideViolation::NegativeAttempts);
    }
    if matches!(candidate.settings.time_limit, Some(l) if l < 0) {
        return Err(OverrideViolation::NegativeTimeLimit);
    }

    // 7. Only one override per (quiz, scope). This is an optimistic
    //    pre-check; the storage layer's unique indexes are authoritative.
    if ctx.duplicate_exists {
        return Err(match scope {
            OverrideScope::User(_) => OverrideViolation::DuplicateForUser,
            OverrideScope::Group(_) => OverrideViolation::DuplicateForGroup,
        });
    }

    // 8. Updates must reference an existing record of this quiz and must
    //    not move it to another user or group.
    if candidate.id.is_some() {
        let existing = ctx.existing.ok_or(OverrideViolation::UnknownOverride)?;
        if existing.quiz_id != candidate.quiz_id {
            return Err(OverrideViolation::UnknownOverride);
        }
        if existing.scope != scope {
            return Err(OverrideViolation::CannotChangeScope);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::quiz::OverridableSettings;
    use crate::types::DbId;

    const QUIZ_ID: DbId = 100;
    const COURSE_ID: DbId = 7;

    fn quiz() -> QuizSettings {
        QuizSettings {
            id: QUIZ_ID,
            course_id: COURSE_ID,
            name: "Week 1 quiz".into(),
            settings: OverridableSettings {
                time_open: Some(1000),
                time_close: Some(2000),
                time_limit: Some(3600),
                attempts: Some(3),
                password: Some("quizpass".into()),
            },
        }
    }

    fn user_candidate() -> OverrideData {
        OverrideData {
            id: None,
            quiz_id: QUIZ_ID,
            user_id: Some(42),
            group_id: None,
            settings: OverridableSettings {
                attempts: Some(5),
                ..Default::default()
            },
        }
    }

    fn ctx(quiz: &QuizSettings) -> ValidationContext<'_> {
        ValidationContext {
            parent: Some(quiz),
            user_exists: true,
            group: Some(GroupRef { id: 5, course_id: COURSE_ID }),
            duplicate_exists: false,
            existing: None,
        }
    }

    #[test]
    fn valid_user_candidate_passes() {
        let quiz = quiz();
        assert_matches!(validate(&user_candidate(), &ctx(&quiz)), Ok(()));
    }

    #[test]
    fn empty_settings_rejected_first() {
        // Even with every other rule violated, the empty submission wins.
        let mut candidate = user_candidate();
        candidate.settings = OverridableSettings::default();
        candidate.user_id = None;

        let ctx = ValidationContext::default();
        assert_matches!(validate(&candidate, &ctx), Err(OverrideViolation::NothingChanged));
    }

    #[test]
    fn unknown_quiz_rejected_before_scope_rules() {
        let mut candidate = user_candidate();
        candidate.user_id = None;

        let ctx = ValidationContext::default();
        assert_matches!(validate(&candidate, &ctx), Err(OverrideViolation::InvalidQuiz));
    }

    #[test]
    fn both_scopes_rejected() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.group_id = Some(5);
        assert_matches!(
            validate(&candidate, &ctx(&quiz)),
            Err(OverrideViolation::BothUserAndGroup)
        );
    }

    #[test]
    fn missing_scope_rejected() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.user_id = None;
        assert_matches!(
            validate(&candidate, &ctx(&quiz)),
            Err(OverrideViolation::MissingUserAndGroup)
        );
    }

    #[test]
    fn unknown_user_rejected() {
        let quiz = quiz();
        let mut ctx = ctx(&quiz);
        ctx.user_exists = false;
        assert_matches!(
            validate(&user_candidate(), &ctx),
            Err(OverrideViolation::InvalidUser)
        );
    }

    #[test]
    fn unknown_group_rejected() {
        let quiz = quiz();
        let mut ctx = ctx(&quiz);
        ctx.group = None;

        let mut candidate = user_candidate();
        candidate.user_id = None;
        candidate.group_id = Some(5);
        assert_matches!(validate(&candidate, &ctx), Err(OverrideViolation::InvalidGroup));
    }

    #[test]
    fn group_from_another_course_rejected() {
        let quiz = quiz();
        let mut ctx = ctx(&quiz);
        ctx.group = Some(GroupRef { id: 6, course_id: 99 });

        let mut candidate = user_candidate();
        candidate.user_id = None;
        candidate.group_id = Some(6);
        assert_matches!(
            validate(&candidate, &ctx),
            Err(OverrideViolation::GroupNotInCourse)
        );
    }

    #[test]
    fn close_before_open_rejected() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.settings.time_open = Some(50);
        candidate.settings.time_close = Some(49);
        assert_matches!(
            validate(&candidate, &ctx(&quiz)),
            Err(OverrideViolation::CloseBeforeOpen)
        );
    }

    #[test]
    fn close_equal_to_open_rejected() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.settings.time_open = Some(50);
        candidate.settings.time_close = Some(50);
        assert_matches!(
            validate(&candidate, &ctx(&quiz)),
            Err(OverrideViolation::CloseBeforeOpen)
        );
    }

    #[test]
    fn close_without_open_is_not_checked() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.settings.time_close = Some(49);
        assert_matches!(validate(&candidate, &ctx(&quiz)), Ok(()));
    }

    #[test]
    fn negative_attempts_rejected() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.settings.attempts = Some(-1);
        assert_matches!(
            validate(&candidate, &ctx(&quiz)),
            Err(OverrideViolation::NegativeAttempts)
        );
    }

    #[test]
    fn negative_time_limit_rejected() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.settings.time_limit = Some(-60);
        assert_matches!(
            validate(&candidate, &ctx(&quiz)),
            Err(OverrideViolation::NegativeTimeLimit)
        );
    }

    #[test]
    fn duplicate_scope_rejected_per_kind() {
        let quiz = quiz();
        let mut ctx = ctx(&quiz);
        ctx.duplicate_exists = true;

        assert_matches!(
            validate(&user_candidate(), &ctx),
            Err(OverrideViolation::DuplicateForUser)
        );

        let mut candidate = user_candidate();
        candidate.user_id = None;
        candidate.group_id = Some(5);
        assert_matches!(validate(&candidate, &ctx), Err(OverrideViolation::DuplicateForGroup));
    }

    #[test]
    fn update_with_unknown_id_rejected() {
        let quiz = quiz();
        let mut candidate = user_candidate();
        candidate.id = Some(999);
        assert_matches!(
            validate(&candidate, &ctx(&quiz)),
            Err(OverrideViolation::UnknownOverride)
        );
    }

    #[test]
    fn update_referencing_another_quiz_rejected() {
        let quiz = quiz();
        let existing = QuizOverride {
            id: 9,
            quiz_id: QUIZ_ID + 1,
            scope: OverrideScope::User(42),
            settings: Default::default(),
        };
        let mut ctx = ctx(&quiz);
        ctx.existing = Some(&existing);

        let mut candidate = user_candidate();
        candidate.id = Some(9);
        assert_matches!(validate(&candidate, &ctx), Err(OverrideViolation::UnknownOverride));
    }

    #[test]
    fn update_changing_scope_rejected() {
        let quiz = quiz();
        let existing = QuizOverride {
            id: 9,
            quiz_id: QUIZ_ID,
            scope: OverrideScope::User(42),
            settings: Default::default(),
        };
        let mut ctx = ctx(&quiz);
        ctx.existing = Some(&existing);

        // Same kind, different member.
        let mut candidate = user_candidate();
        candidate.id = Some(9);
        candidate.user_id = Some(43);
        assert_matches!(validate(&candidate, &ctx), Err(OverrideViolation::CannotChangeScope));

        // Different kind entirely.
        let mut candidate = user_candidate();
        candidate.id = Some(9);
        candidate.user_id = None;
        candidate.group_id = Some(5);
        assert_matches!(validate(&candidate, &ctx), Err(OverrideViolation::CannotChangeScope));
    }

    #[test]
    fn update_keeping_scope_passes() {
        let quiz = quiz();
        let existing = QuizOverride {
            id: 9,
            quiz_id: QUIZ_ID,
            scope: OverrideScope::User(42),
            settings: Default::default(),
        };
        let mut ctx = ctx(&quiz);
        ctx.existing = Some(&existing);

        let mut candidate = user_candidate();
        candidate.id = Some(9);
        assert_matches!(validate(&candidate, &ctx), Ok(()));
    }
}
