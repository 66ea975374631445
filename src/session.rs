//! Per-session UI state.
//!
//! The circle-size counter is cosmetic: it is shown next to the maps but does
//! not take part in bubble sizing.

use std::time::Duration;
use moka::sync::Cache;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "dashboard_session";
const MAX_SESSIONS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleSize(u32);

impl CircleSize {
    pub const INITIAL: u32 = 30;
    pub const STEP: u32 = 5;
    pub const MIN: u32 = 5;

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn increase(self) -> Self {
        CircleSize(self.0.saturating_add(Self::STEP))
    }

    pub fn decrease(self) -> Self {
        CircleSize(self.0.saturating_sub(Self::STEP).max(Self::MIN))
    }
}

impl Default for CircleSize {
    fn default() -> Self {
        CircleSize(Self::INITIAL)
    }
}

pub struct SessionStore {
    circle_sizes: Cache<String, CircleSize>,
}

impl SessionStore {
    pub fn new(idle: Duration) -> Self {
        Self {
            circle_sizes: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(idle)
                .build(),
        }
    }

    pub fn circle_size(&self, session_id: &str) -> CircleSize {
        self.circle_sizes.get(session_id).unwrap_or_default()
    }

    /// Mutators run one at a time per session, so read-then-write is enough.
    pub fn update_circle_size(
        &self,
        session_id: &str,
        change: impl FnOnce(CircleSize) -> CircleSize,
    ) -> CircleSize {
        let updated = change(self.circle_size(session_id));
        self.circle_sizes.insert(session_id.to_string(), updated);
        tracing::debug!("Session {} circle size is now {}", session_id, updated.value());
        updated
    }
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Pulls the session id out of a `Cookie` header, ignoring anything that is not a UUID.
pub fn session_id_from_cookies(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| id.to_string())
}

pub fn session_cookie(session_id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_steps_by_five_and_floors_at_five() {
        let size = CircleSize::default();
        assert_eq!(size.value(), 30);
        assert_eq!(size.increase().value(), 35);

        let mut size = size;
        for _ in 0..10 {
            size = size.decrease();
        }
        assert_eq!(size.value(), 5);
        assert_eq!(size.decrease().value(), 5);
    }

    #[test]
    fn store_keeps_counters_per_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = new_session_id();
        let b = new_session_id();

        store.update_circle_size(&a, CircleSize::increase);
        store.update_circle_size(&a, CircleSize::increase);
        store.update_circle_size(&b, CircleSize::decrease);

        assert_eq!(store.circle_size(&a).value(), 40);
        assert_eq!(store.circle_size(&b).value(), 25);
        assert_eq!(store.circle_size("unknown").value(), 30);
    }

    #[test]
    fn session_cookie_is_parsed_back() {
        let id = new_session_id();
        let header = format!("theme=dark; {}={}; other=1", SESSION_COOKIE, id);
        assert_eq!(session_id_from_cookies(&header), Some(id.clone()));
        assert!(session_cookie(&id).starts_with(&format!("{}={}", SESSION_COOKIE, id)));
    }

    #[test]
    fn forged_session_values_are_ignored() {
        let header = format!("{}=not-a-uuid", SESSION_COOKIE);
        assert_eq!(session_id_from_cookies(&header), None);
        assert_eq!(session_id_from_cookies(""), None);
    }
}
