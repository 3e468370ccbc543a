//! In-memory fakes for the collaborator seams, shared by the engine tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::capability::{AccessPolicy, Capability};
use crate::directory::{GroupRef, MemberDirectory};
use crate::error::CoreError;
use crate::quiz::{OverridableSettings, QuizProvider, QuizSettings};
use crate::types::DbId;

use super::cache::{MemoryCache, OverrideCache};
use super::calendar::CalendarSync;
use super::events::{EventSink, OverrideEvent};
use super::manager::OverrideManager;
use super::model::{OverrideScope, QuizOverride};
use super::store::OverrideStore;
use super::validate::OverrideViolation;

pub(crate) const TEACHER_ID: DbId = 1;
pub(crate) const QUIZ_ID: DbId = 100;
pub(crate) const COURSE_ID: DbId = 7;
pub(crate) const USER_ID: DbId = 42;
pub(crate) const OTHER_USER_ID: DbId = 43;
pub(crate) const GROUP_ID: DbId = 5;
pub(crate) const OTHER_COURSE_GROUP_ID: DbId = 6;

pub(crate) fn quiz_fixture() -> QuizSettings {
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

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Map-backed override store.
///
/// Mirrors the storage layer's uniqueness guard: inserting a second record
/// for an occupied (quiz, scope) pair fails the way the Postgres unique
/// indexes would, even if the caller skipped the validator.
#[derive(Default)]
pub(crate) struct MemoryOverrideStore {
    rows: Mutex<BTreeMap<DbId, QuizOverride>>,
    next_id: AtomicI64,
}

impl MemoryOverrideStore {
    pub(crate) async fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub(crate) async fn get(&self, id: DbId) -> Option<QuizOverride> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    fn scope_taken(
        rows: &BTreeMap<DbId, QuizOverride>,
        quiz_id: DbId,
        scope: OverrideScope,
        excluding: Option<DbId>,
    ) -> bool {
        rows.values().any(|row| {
            row.quiz_id == quiz_id && row.scope == scope && Some(row.id) != excluding
        })
    }
}

#[async_trait]
impl OverrideStore for MemoryOverrideStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<QuizOverride>, CoreError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_quiz(&self, quiz_id: DbId) -> Result<Vec<QuizOverride>, CoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn exists_for_scope(
        &self,
        quiz_id: DbId,
        scope: OverrideScope,
        excluding: Option<DbId>,
    ) -> Result<bool, CoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::scope_taken(&rows, quiz_id, scope, excluding))
    }

    async fn insert(
        &self,
        quiz_id: DbId,
        scope: OverrideScope,
        settings: &OverridableSettings,
    ) -> Result<DbId, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        if Self::scope_taken(&rows, quiz_id, scope, None) {
            return Err(match scope {
                OverrideScope::User(_) => OverrideViolation::DuplicateForUser.into(),
                OverrideScope::Group(_) => OverrideViolation::DuplicateForGroup.into(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        rows.insert(
            id,
            QuizOverride {
                id,
                quiz_id,
                scope,
                settings: settings.clone(),
            },
        );
        Ok(id)
    }

    async fn update(&self, id: DbId, settings: &OverridableSettings) -> Result<(), CoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(row) => {
                row.settings = settings.clone();
                Ok(())
            }
            None => Err(CoreError::store(format!("update of missing override {id}"))),
        }
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn delete_all_for_quiz(&self, quiz_id: DbId) -> Result<u64, CoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, row| row.quiz_id != quiz_id);
        Ok((before - rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Quizzes and members
// ---------------------------------------------------------------------------

pub(crate) struct StaticQuizzes {
    quizzes: HashMap<DbId, QuizSettings>,
}

#[async_trait]
impl QuizProvider for StaticQuizzes {
    async fn find_quiz(&self, id: DbId) -> Result<Option<QuizSettings>, CoreError> {
        Ok(self.quizzes.get(&id).cloned())
    }
}

pub(crate) struct StaticDirectory {
    users: HashSet<DbId>,
    groups: HashMap<DbId, GroupRef>,
}

#[async_trait]
impl MemberDirectory for StaticDirectory {
    async fn user_exists(&self, user_id: DbId) -> Result<bool, CoreError> {
        Ok(self.users.contains(&user_id))
    }

    async fn find_group(&self, group_id: DbId) -> Result<Option<GroupRef>, CoreError> {
        Ok(self.groups.get(&group_id).copied())
    }
}

// ---------------------------------------------------------------------------
// Recording side-effect fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CalendarCall {
    Scope(DbId, OverrideScope),
    All(DbId),
    Remove(DbId, OverrideScope),
}

#[derive(Default)]
pub(crate) struct RecordingCalendar {
    calls: Mutex<Vec<CalendarCall>>,
}

impl RecordingCalendar {
    pub(crate) fn take(&self) -> Vec<CalendarCall> {
        std::mem::take(&mut self.calls.lock().unwrap())
    }
}

#[async_trait]
impl CalendarSync for RecordingCalendar {
    async fn sync_scope(&self, quiz: &QuizSettings, scope: OverrideScope) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(CalendarCall::Scope(quiz.id, scope));
        Ok(())
    }

    async fn sync_all(&self, quiz: &QuizSettings) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(CalendarCall::All(quiz.id));
        Ok(())
    }

    async fn remove_scope(&self, quiz_id: DbId, scope: OverrideScope) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(CalendarCall::Remove(quiz_id, scope));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<OverrideEvent>>,
}

impl RecordingSink {
    pub(crate) fn take(&self) -> Vec<OverrideEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: OverrideEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub(crate) struct StaticPolicy {
    read: bool,
    manage: bool,
}

#[async_trait]
impl AccessPolicy for StaticPolicy {
    async fn allows(
        &self,
        _actor: DbId,
        _course_id: DbId,
        capability: Capability,
    ) -> Result<bool, CoreError> {
        Ok(match capability {
            Capability::ReadOverrides => self.read,
            Capability::ManageOverrides => self.manage,
        })
    }
}

// ---------------------------------------------------------------------------
// Assembled test world
// ---------------------------------------------------------------------------

pub(crate) struct TestWorld {
    pub(crate) store: Arc<MemoryOverrideStore>,
    pub(crate) cache: Arc<MemoryCache>,
    pub(crate) calendar: Arc<RecordingCalendar>,
    pub(crate) sink: Arc<RecordingSink>,
    pub(crate) manager: OverrideManager,
}

/// A manager wired against fakes with one quiz, two users and two groups.
pub(crate) fn world() -> TestWorld {
    world_with_policy(true, true)
}

pub(crate) fn world_with_policy(read: bool, manage: bool) -> TestWorld {
    let store = Arc::new(MemoryOverrideStore::default());
    let cache = Arc::new(MemoryCache::new());
    let calendar = Arc::new(RecordingCalendar::default());
    let sink = Arc::new(RecordingSink::default());

    let quizzes = Arc::new(StaticQuizzes {
        quizzes: HashMap::from([(QUIZ_ID, quiz_fixture())]),
    });
    let directory = Arc::new(StaticDirectory {
        users: HashSet::from([USER_ID, OTHER_USER_ID]),
        groups: HashMap::from([
            (GROUP_ID, GroupRef { id: GROUP_ID, course_id: COURSE_ID }),
            (
                OTHER_COURSE_GROUP_ID,
                GroupRef { id: OTHER_COURSE_GROUP_ID, course_id: COURSE_ID + 1 },
            ),
        ]),
    });
    let policy = Arc::new(StaticPolicy { read, manage });

    let manager = OverrideManager::new(
        Arc::clone(&store) as Arc<dyn OverrideStore>,
        quizzes,
        directory,
        Arc::clone(&cache) as Arc<dyn OverrideCache>,
        Arc::clone(&calendar) as Arc<dyn CalendarSync>,
        policy,
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );

    TestWorld {
        store,
        cache,
        calendar,
        sink,
        manager,
    }
}
