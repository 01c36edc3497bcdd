//! Per-session ownership of the two resolvers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use super::{ArchetypeResolver, ProphecyResolver, ResolutionSettings};
use crate::domain::archetype::{Category, ProphecyOutcome, QuizAnswer, ResolutionOutcome};
use crate::domain::foundation::SessionId;
use crate::ports::AIProvider;

/// The archetype and prophecy resolvers of one onboarding session.
pub struct ResolutionSession {
    pub archetype: ArchetypeResolver,
    pub prophecy: ProphecyResolver,
}

impl ResolutionSession {
    pub fn new(
        session_id: SessionId,
        provider: Arc<dyn AIProvider>,
        settings: Arc<ResolutionSettings>,
    ) -> Self {
        Self {
            archetype: ArchetypeResolver::new(session_id, provider.clone(), settings.clone()),
            prophecy: ProphecyResolver::new(session_id, provider, settings),
        }
    }

    /// Clears both guards and all intermediate state.
    pub fn reset(&mut self) {
        self.archetype.reset();
        self.prophecy.reset();
    }
}

struct SessionEntry {
    session: Arc<Mutex<ResolutionSession>>,
    last_used: Instant,
}

impl SessionEntry {
    /// A session is idle when nothing outside the registry holds it and it
    /// has not been handed out for at least `ttl`.
    fn is_idle(&self, ttl: Duration) -> bool {
        Arc::strong_count(&self.session) == 1 && self.last_used.elapsed() >= ttl
    }
}

struct Sessions {
    entries: HashMap<SessionId, SessionEntry>,
    last_sweep: Instant,
}

/// Sessions keyed by id.
///
/// Calls for the same session are serialized on that session's mutex, so a
/// duplicate request waits for the first one and then receives its landed
/// outcome instead of issuing a second remote call.
///
/// Sessions unused for `session_idle_ttl` are dropped the next time the
/// registry hands out a session, at most once per TTL period.
#[derive(Clone)]
pub struct SessionRegistry {
    provider: Arc<dyn AIProvider>,
    settings: Arc<ResolutionSettings>,
    sessions: Arc<RwLock<Sessions>>,
}

impl SessionRegistry {
    pub fn new(provider: Arc<dyn AIProvider>, settings: ResolutionSettings) -> Self {
        Self {
            provider,
            settings: Arc::new(settings),
            sessions: Arc::new(RwLock::new(Sessions {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Returns the session, creating it on first use.
    pub async fn session(&self, id: SessionId) -> Arc<Mutex<ResolutionSession>> {
        let ttl = self.settings.session_idle_ttl;
        let mut sessions = self.sessions.write().await;

        if sessions.last_sweep.elapsed() >= ttl {
            let before = sessions.entries.len();
            sessions.entries.retain(|_, entry| !entry.is_idle(ttl));
            sessions.last_sweep = Instant::now();
            let evicted = before - sessions.entries.len();
            if evicted > 0 {
                tracing::info!(evicted, remaining = sessions.entries.len(), "evicted idle sessions");
            }
        }

        let entry = sessions.entries.entry(id).or_insert_with(|| {
            tracing::debug!(session_id = %id, "creating resolution session");
            SessionEntry {
                session: Arc::new(Mutex::new(ResolutionSession::new(
                    id,
                    self.provider.clone(),
                    self.settings.clone(),
                ))),
                last_used: Instant::now(),
            }
        });
        entry.last_used = Instant::now();
        entry.session.clone()
    }

    /// `resolveArchetype` for one session.
    pub async fn resolve_archetype(
        &self,
        id: SessionId,
        answers: &[QuizAnswer],
    ) -> ResolutionOutcome {
        let session = self.session(id).await;
        let mut session = session.lock().await;
        session.archetype.resolve(answers).await
    }

    /// `resolveProphecy` for one session.
    pub async fn resolve_prophecy(&self, id: SessionId, category: Category) -> ProphecyOutcome {
        let session = self.session(id).await;
        let mut session = session.lock().await;
        session.prophecy.resolve(category).await
    }

    /// Drops all state of a session. Returns true if it existed.
    pub async fn reset(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.entries.remove(&id);
        if removed.is_some() {
            tracing::info!(session_id = %id, "resolution session reset");
        }
        removed.is_some()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
