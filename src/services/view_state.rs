use std::collections::HashMap;

/// Client-held membership knowledge for one displayed movie
///
/// `Unknown` until the first membership check resolves; afterward tracks what
/// the server last confirmed, adjusted optimistically while a mutation is in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Unknown,
    Absent,
    Present,
}

/// A watchlist mutation the UI wants to start for one movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingMutation {
    Add,
    Remove,
    SetWatched(bool),
}

/// Why a mutation could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BeginError {
    /// A mutation for this movie is already in flight; the UI must wait for
    /// it to complete before issuing another
    #[error("a watchlist mutation for this movie is already in flight")]
    AlreadyInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MovieViewState {
    membership: Membership,
    watched: bool,
    /// Set while a mutation is in flight, together with the state to restore
    /// if the server rejects it
    in_flight: Option<(Membership, bool)>,
}

impl Default for MovieViewState {
    fn default() -> Self {
        Self {
            membership: Membership::Unknown,
            watched: false,
            in_flight: None,
        }
    }
}

/// Per-movie reconciliation of UI state against the persisted watchlist
///
/// Tracks, for each displayed movie, a three-valued membership flag and a
/// loading flag that serializes mutations: at most one add/remove/toggle per
/// movie may be in flight, and a second attempt is rejected until the first
/// completes. Mutations apply optimistically at `begin_mutation`; the server
/// response then either confirms the optimistic state (`complete_mutation`)
/// or rolls it back (`fail_mutation`). Both paths clear the loading flag.
///
/// This is pure client-side state: nothing here is persisted, and different
/// movies are fully independent.
#[derive(Debug, Default)]
pub struct ViewStateTracker {
    movies: HashMap<i64, MovieViewState>,
}

impl ViewStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the result of a server membership check
    ///
    /// Ignored while a mutation is in flight so a slow check cannot clobber
    /// an optimistic update.
    pub fn note_membership(&mut self, tmdb_id: i64, in_watchlist: bool) {
        let state = self.movies.entry(tmdb_id).or_default();
        if state.in_flight.is_some() {
            return;
        }
        state.membership = if in_watchlist {
            Membership::Present
        } else {
            Membership::Absent
        };
    }

    /// Records the watched flag from a server response
    pub fn note_watched(&mut self, tmdb_id: i64, watched: bool) {
        let state = self.movies.entry(tmdb_id).or_default();
        if state.in_flight.is_some() {
            return;
        }
        state.watched = watched;
    }

    pub fn membership(&self, tmdb_id: i64) -> Membership {
        self.movies
            .get(&tmdb_id)
            .map(|s| s.membership)
            .unwrap_or(Membership::Unknown)
    }

    pub fn watched(&self, tmdb_id: i64) -> bool {
        self.movies.get(&tmdb_id).map(|s| s.watched).unwrap_or(false)
    }

    pub fn is_loading(&self, tmdb_id: i64) -> bool {
        self.movies
            .get(&tmdb_id)
            .map(|s| s.in_flight.is_some())
            .unwrap_or(false)
    }

    /// Starts a mutation, applying its optimistic state
    ///
    /// Fails when another mutation for the same movie has not completed yet;
    /// mutations for other movies are unaffected.
    pub fn begin_mutation(
        &mut self,
        tmdb_id: i64,
        mutation: PendingMutation,
    ) -> Result<(), BeginError> {
        let state = self.movies.entry(tmdb_id).or_default();
        if state.in_flight.is_some() {
            return Err(BeginError::AlreadyInFlight);
        }

        state.in_flight = Some((state.membership, state.watched));
        match mutation {
            PendingMutation::Add => {
                state.membership = Membership::Present;
                state.watched = false;
            }
            PendingMutation::Remove => {
                state.membership = Membership::Absent;
                state.watched = false;
            }
            PendingMutation::SetWatched(watched) => {
                state.watched = watched;
            }
        }
        Ok(())
    }

    /// Confirms the in-flight mutation; the optimistic state becomes real
    pub fn complete_mutation(&mut self, tmdb_id: i64) {
        if let Some(state) = self.movies.get_mut(&tmdb_id) {
            state.in_flight = None;
        }
    }

    /// Rolls back the in-flight mutation to the pre-mutation state
    pub fn fail_mutation(&mut self, tmdb_id: i64) {
        if let Some(state) = self.movies.get_mut(&tmdb_id) {
            if let Some((membership, watched)) = state.in_flight.take() {
                state.membership = membership;
                state.watched = watched;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_starts_unknown() {
        let tracker = ViewStateTracker::new();
        assert_eq!(tracker.membership(603), Membership::Unknown);
        assert!(!tracker.is_loading(603));
    }

    #[test]
    fn test_note_membership_resolves_unknown() {
        let mut tracker = ViewStateTracker::new();

        tracker.note_membership(603, true);
        assert_eq!(tracker.membership(603), Membership::Present);

        tracker.note_membership(604, false);
        assert_eq!(tracker.membership(604), Membership::Absent);
    }

    #[test]
    fn test_add_applies_optimistically() {
        let mut tracker = ViewStateTracker::new();
        tracker.note_membership(603, false);

        tracker.begin_mutation(603, PendingMutation::Add).unwrap();
        assert_eq!(tracker.membership(603), Membership::Present);
        assert!(tracker.is_loading(603));

        tracker.complete_mutation(603);
        assert_eq!(tracker.membership(603), Membership::Present);
        assert!(!tracker.is_loading(603));
    }

    #[test]
    fn test_failed_add_rolls_back() {
        let mut tracker = ViewStateTracker::new();
        tracker.note_membership(603, false);

        tracker.begin_mutation(603, PendingMutation::Add).unwrap();
        tracker.fail_mutation(603);

        assert_eq!(tracker.membership(603), Membership::Absent);
        assert!(!tracker.is_loading(603));
    }

    #[test]
    fn test_second_mutation_rejected_while_in_flight() {
        let mut tracker = ViewStateTracker::new();
        tracker.note_membership(603, false);

        tracker.begin_mutation(603, PendingMutation::Add).unwrap();
        let err = tracker
            .begin_mutation(603, PendingMutation::Remove)
            .unwrap_err();
        assert_eq!(err, BeginError::AlreadyInFlight);

        // State still reflects the first, in-flight mutation
        assert_eq!(tracker.membership(603), Membership::Present);
    }

    #[test]
    fn test_mutation_allowed_again_after_completion() {
        let mut tracker = ViewStateTracker::new();

        tracker.begin_mutation(603, PendingMutation::Add).unwrap();
        tracker.complete_mutation(603);

        tracker.begin_mutation(603, PendingMutation::Remove).unwrap();
        assert_eq!(tracker.membership(603), Membership::Absent);
    }

    #[test]
    fn test_different_movies_are_independent() {
        let mut tracker = ViewStateTracker::new();

        tracker.begin_mutation(603, PendingMutation::Add).unwrap();
        tracker.begin_mutation(27205, PendingMutation::Add).unwrap();

        assert!(tracker.is_loading(603));
        assert!(tracker.is_loading(27205));
    }

    #[test]
    fn test_toggle_rollback_restores_watched() {
        let mut tracker = ViewStateTracker::new();
        tracker.note_membership(603, true);
        tracker.note_watched(603, false);

        tracker
            .begin_mutation(603, PendingMutation::SetWatched(true))
            .unwrap();
        assert!(tracker.watched(603));

        tracker.fail_mutation(603);
        assert!(!tracker.watched(603));
        assert_eq!(tracker.membership(603), Membership::Present);
    }

    #[test]
    fn test_slow_membership_check_cannot_clobber_optimistic_state() {
        let mut tracker = ViewStateTracker::new();
        tracker.note_membership(603, false);

        tracker.begin_mutation(603, PendingMutation::Add).unwrap();
        // A check issued before the add resolves now
        tracker.note_membership(603, false);

        assert_eq!(tracker.membership(603), Membership::Present);
    }
}
