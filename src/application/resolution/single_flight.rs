//! SingleFlightGuard - at most one remote resolution per session.

/// Latch over one resolution.
///
/// `begin` sets it before the first attempt, `land` stores the final value.
/// Once landed, callers get the stored value back instead of a new remote
/// call. Only [`reset`](Self::reset) clears it.
#[derive(Debug, Clone)]
pub struct SingleFlightGuard<T> {
    flight: Flight<T>,
}

#[derive(Debug, Clone)]
enum Flight<T> {
    Idle,
    InFlight,
    Landed(T),
}

impl<T> Default for SingleFlightGuard<T> {
    fn default() -> Self {
        Self {
            flight: Flight::Idle,
        }
    }
}

impl<T> SingleFlightGuard<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `begin` has been called and until `reset`.
    pub fn is_set(&self) -> bool {
        !matches!(self.flight, Flight::Idle)
    }

    /// The landed value, if any.
    pub fn landed(&self) -> Option<&T> {
        match &self.flight {
            Flight::Landed(value) => Some(value),
            _ => None,
        }
    }

    /// Marks a resolution as started.
    ///
    /// Returns false if a value already landed. A flight left `InFlight` by a
    /// cancelled caller is restarted rather than blocking the session.
    pub fn begin(&mut self) -> bool {
        match self.flight {
            Flight::Landed(_) => false,
            Flight::InFlight => {
                tracing::warn!("previous resolution was abandoned mid-flight; restarting");
                true
            }
            Flight::Idle => {
                self.flight = Flight::InFlight;
                true
            }
        }
    }

    /// Stores the final value.
    pub fn land(&mut self, value: T) {
        self.flight = Flight::Landed(value);
    }

    /// Clears the latch (explicit session reset).
    pub fn reset(&mut self) {
        self.flight = Flight::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_guard_is_clear() {
        let guard: SingleFlightGuard<u8> = SingleFlightGuard::new();
        assert!(!guard.is_set());
        assert!(guard.landed().is_none());
    }

    #[test]
    fn begin_sets_guard_before_landing() {
        let mut guard = SingleFlightGuard::new();
        assert!(guard.begin());
        assert!(guard.is_set());
        assert!(guard.landed().is_none());

        guard.land(7u8);
        assert_eq!(guard.landed(), Some(&7));
    }

    #[test]
    fn begin_after_landing_is_refused() {
        let mut guard = SingleFlightGuard::new();
        guard.begin();
        guard.land("done");
        assert!(!guard.begin());
        assert_eq!(guard.landed(), Some(&"done"));
    }

    #[test]
    fn abandoned_flight_can_restart() {
        let mut guard: SingleFlightGuard<u8> = SingleFlightGuard::new();
        guard.begin();
        assert!(guard.begin());
        assert!(guard.is_set());
    }

    #[test]
    fn reset_clears_landed_value() {
        let mut guard = SingleFlightGuard::new();
        guard.begin();
        guard.land(1u8);
        guard.reset();
        assert!(!guard.is_set());
        assert!(guard.begin());
    }
}
