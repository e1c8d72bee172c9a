use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::domain::SurveyKind;
use super::progress::ProgressionRecord;

/// Shared by every caller that arrives without any identifier.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Identifier wrapper for chat users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub String);

impl UserId {
    /// First non-empty candidate wins; callers with no identifier all map
    /// onto [`ANONYMOUS_USER`] and therefore share one session.
    pub fn resolve<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        candidates
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.as_ref().is_empty())
            .map(|candidate| Self(candidate.as_ref().to_string()))
            .unwrap_or_else(Self::anonymous)
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_USER.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_USER
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Time source for session bookkeeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One progression record per survey plus the last time the user was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    progressions: BTreeMap<SurveyKind, ProgressionRecord>,
    last_activity_at: DateTime<Utc>,
}

impl UserSession {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            progressions: SurveyKind::ordered()
                .into_iter()
                .map(|kind| (kind, ProgressionRecord::default()))
                .collect(),
            last_activity_at: now,
        }
    }

    pub fn progression(&self, survey: SurveyKind) -> &ProgressionRecord {
        static UNSTARTED: ProgressionRecord = ProgressionRecord::unstarted();
        self.progressions.get(&survey).unwrap_or(&UNSTARTED)
    }

    /// Replaces the survey's record wholesale.
    pub fn install(&mut self, survey: SurveyKind, record: ProgressionRecord) {
        self.progressions.insert(survey, record);
    }

    pub fn reset_survey(&mut self, survey: SurveyKind) -> &ProgressionRecord {
        self.progressions
            .entry(survey)
            .and_modify(|record| *record = ProgressionRecord::started())
            .or_insert_with(ProgressionRecord::started)
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now;
    }
}

/// In-memory session map with per-session mutual exclusion.
///
/// Each access holds the map entry's lock for the duration of the closure,
/// so two requests for the same user never interleave their mutations.
/// Closures must not call back into the store.
pub struct SessionStore {
    sessions: DashMap<UserId, UserSession>,
    clock: Arc<dyn Clock>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            clock,
        }
    }

    /// Runs `f` against the user's session, creating it if absent and
    /// marking it active first.
    pub fn with_session<T>(&self, user_id: &UserId, f: impl FnOnce(&mut UserSession) -> T) -> T {
        let now = self.clock.now();
        let mut entry = self
            .sessions
            .entry(user_id.clone())
            .or_insert_with(|| UserSession::new(now));
        entry.touch(now);
        f(entry.value_mut())
    }

    /// Snapshot of the user's session; creates a fresh one if absent.
    pub fn get_or_create(&self, user_id: &UserId) -> UserSession {
        self.with_session(user_id, |session| session.clone())
    }

    pub fn reset_survey(&self, user_id: &UserId, survey: SurveyKind) -> ProgressionRecord {
        self.with_session(user_id, |session| session.reset_survey(survey).clone())
    }

    /// Marks an existing session active; returns false when there is none.
    pub fn touch(&self, user_id: &UserId) -> bool {
        let now = self.clock.now();
        match self.sessions.get_mut(user_id) {
            Some(mut session) => {
                session.touch(now);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, user_id: &UserId) -> Option<UserSession> {
        self.sessions
            .get(user_id)
            .map(|session| session.value().clone())
    }

    /// Drops every session idle for longer than `ttl`, returning how many
    /// were evicted.
    pub fn sweep(&self, ttl: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.clock.now().checked_sub_signed(ttl))
        else {
            return 0;
        };

        let mut evicted = 0;
        self.sessions.retain(|_, session| {
            let keep = session.last_activity_at >= cutoff;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.sessions.contains_key(user_id)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
