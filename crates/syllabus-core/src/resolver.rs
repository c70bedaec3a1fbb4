//! Enrollment state derivation and the enroll/withdraw transitions.
//!
//! The resolver keeps one [`EnrollmentState`] per `(user, course)` pair. The
//! pair starts out [`Unknown`](EnrollmentState::Unknown) and then cycles
//! between `NotEnrolled` and `Enrolled` for the life of the session:
//!
//! ```text
//! Unknown     --resolve, not member-->  NotEnrolled
//! Unknown     --resolve, member------>  Enrolled(p)
//! NotEnrolled --enroll ok------------>  Enrolled(0 or backend p)
//! NotEnrolled --enroll err----------->  NotEnrolled
//! Enrolled(p) --withdraw ok---------->  NotEnrolled
//! Enrolled(p) --withdraw err--------->  Enrolled(p)
//! Enrolled(p) --enroll--------------->  Enrolled(p)   (no request issued)
//! ```
//!
//! Enrollment is optimistic: the pair reads as enrolled as soon as the create
//! request is issued, and is rolled back to its prior state if the backend
//! declines or every caller gives up on the request. Overlapping `enroll`
//! calls for one pair share a single request.
//!
//! The resolver never holds an ambient "current user". Every operation takes
//! the viewer's id explicitly; `None` means the viewer is not known yet.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures::future::{BoxFuture, FutureExt as _, Shared, WeakShared};
use tracing::{debug, warn};

use crate::{
  ResolveError,
  enrollment::EnrollmentState,
  id::{CourseId, UserId},
  store::EnrollmentStore,
};

type Pair = (UserId, CourseId);
type Outcome = Result<EnrollmentState, ResolveError>;
type EnrollRequest = Shared<BoxFuture<'static, Outcome>>;

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// An enroll request as seen by the ledger. Only the waiters own the request;
/// the ledger keeps a weak handle so late callers can join it.
struct InFlightEnroll {
  id:      u64,
  prior:   EnrollmentState,
  request: WeakShared<BoxFuture<'static, Outcome>>,
}

/// Per-pair state plus the operations currently in flight.
#[derive(Default)]
struct Ledger {
  states:      HashMap<Pair, EnrollmentState>,
  enrolling:   HashMap<Pair, InFlightEnroll>,
  withdrawing: HashSet<Pair>,
  next_id:     u64,
}

impl Ledger {
  fn state(&self, pair: Pair) -> EnrollmentState {
    self.states.get(&pair).copied().unwrap_or_default()
  }
}

fn lock(ledger: &Mutex<Ledger>) -> MutexGuard<'_, Ledger> {
  ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the withdraw marker for a pair however the withdraw future ends,
/// including when the caller drops it mid-request.
struct WithdrawGuard {
  ledger: Arc<Mutex<Ledger>>,
  pair:   Pair,
}

impl Drop for WithdrawGuard {
  fn drop(&mut self) { lock(&self.ledger).withdrawing.remove(&self.pair); }
}

/// Owned by an enroll request. Applies the outcome when the request
/// finishes, or restores the prior state when the request is dropped first.
struct EnrollGuard {
  ledger:  Arc<Mutex<Ledger>>,
  pair:    Pair,
  id:      u64,
  prior:   EnrollmentState,
  settled: bool,
}

impl EnrollGuard {
  fn settle(mut self, outcome: &Outcome) {
    self.settled = true;
    let (user, course) = self.pair;
    let mut ledger = lock(&self.ledger);
    if ledger.enrolling.get(&self.pair).is_some_and(|f| f.id == self.id) {
      ledger.enrolling.remove(&self.pair);
    }
    match outcome {
      Ok(state) => {
        debug!(%user, %course, "enrolled");
        ledger.states.insert(self.pair, *state);
      }
      Err(e) => {
        warn!(%user, %course, "enrollment rejected, rolling back: {e}");
        ledger.states.insert(self.pair, self.prior);
      }
    }
  }
}

impl Drop for EnrollGuard {
  fn drop(&mut self) {
    if self.settled {
      return;
    }
    let mut ledger = lock(&self.ledger);
    // A newer request may already own the pair.
    if ledger.enrolling.get(&self.pair).is_some_and(|f| f.id == self.id) {
      let (user, course) = self.pair;
      warn!(%user, %course, "enrollment abandoned, rolling back");
      ledger.enrolling.remove(&self.pair);
      ledger.states.insert(self.pair, self.prior);
    }
  }
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Derives and transitions [`EnrollmentState`] for user/course pairs, backed
/// by an [`EnrollmentStore`].
///
/// Cloning is cheap and clones share state.
pub struct EnrollmentStateResolver<S> {
  store:  Arc<S>,
  ledger: Arc<Mutex<Ledger>>,
}

impl<S> Clone for EnrollmentStateResolver<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      ledger: Arc::clone(&self.ledger),
    }
  }
}

impl<S> EnrollmentStateResolver<S>
where
  S: EnrollmentStore + 'static,
{
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      ledger: Arc::default(),
    }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// The last known state of a pair; `Unknown` if the pair was never
  /// resolved or the user is absent.
  pub fn state(&self, user: Option<UserId>, course: CourseId) -> EnrollmentState {
    match user {
      Some(user) => lock(&self.ledger).state((user, course)),
      None => EnrollmentState::Unknown,
    }
  }

  /// Derive the state of a pair from an already-fetched membership set.
  ///
  /// A member course keeps whatever progress was last observed for the pair
  /// (0 if none was).
  pub fn resolve(
    &self,
    user: Option<UserId>,
    course: CourseId,
    enrolled: &HashSet<CourseId>,
  ) -> EnrollmentState {
    let Some(user) = user else {
      return EnrollmentState::Unknown;
    };
    let pair = (user, course);
    let mut ledger = lock(&self.ledger);
    let state = if enrolled.contains(&course) {
      EnrollmentState::enrolled(ledger.state(pair).progress().unwrap_or(0))
    } else {
      EnrollmentState::NotEnrolled
    };
    ledger.states.insert(pair, state);
    state
  }

  /// Fetch membership and progress from the store, then resolve.
  ///
  /// A failed progress fetch for a member course reads as 0%.
  pub async fn load(
    &self,
    user: Option<UserId>,
    course: CourseId,
  ) -> Result<EnrollmentState, ResolveError> {
    let Some(user) = user else {
      return Ok(EnrollmentState::Unknown);
    };

    let enrolled: HashSet<CourseId> = self
      .store
      .list_enrolled_course_ids(user)
      .await
      .map_err(|e| ResolveError::RemoteRejected(e.to_string()))?
      .into_iter()
      .collect();

    let state = if enrolled.contains(&course) {
      let progress = match self.store.get_progress(user, course).await {
        Ok(p) => p.progress_percentage,
        Err(e) => {
          debug!(%user, %course, "progress unavailable, showing 0%: {e}");
          0
        }
      };
      EnrollmentState::enrolled(progress)
    } else {
      EnrollmentState::NotEnrolled
    };

    lock(&self.ledger).states.insert((user, course), state);
    Ok(state)
  }

  /// Re-read the progress of an enrolled pair. Other states are returned
  /// unchanged without contacting the store.
  pub async fn refresh_progress(
    &self,
    user: Option<UserId>,
    course: CourseId,
  ) -> Result<EnrollmentState, ResolveError> {
    let Some(user) = user else {
      return Ok(EnrollmentState::Unknown);
    };
    let pair = (user, course);
    let current = lock(&self.ledger).state(pair);
    if !current.is_enrolled() {
      return Ok(current);
    }

    let progress = self
      .store
      .get_progress(user, course)
      .await
      .map_err(|e| ResolveError::RemoteRejected(e.to_string()))?;

    let mut ledger = lock(&self.ledger);
    let current = ledger.state(pair);
    if current.is_enrolled() {
      let state = EnrollmentState::enrolled(progress.progress_percentage);
      ledger.states.insert(pair, state);
      Ok(state)
    } else {
      Ok(current)
    }
  }

  /// Enroll the user in a course.
  ///
  /// - No user: fails with [`ResolveError::IdentityRequired`] without
  ///   contacting the store.
  /// - Already enrolled: returns the current state, no request.
  /// - Enrollment already in flight for the pair: waits on that request.
  /// - A withdraw in flight for the pair: [`ResolveError::InvalidTransition`].
  ///
  /// The returned future may be dropped at any point. Once every caller
  /// waiting on a request has dropped it, the request is cancelled and the
  /// pair returns to its prior state.
  pub async fn enroll(
    &self,
    user: Option<UserId>,
    course: CourseId,
  ) -> Result<EnrollmentState, ResolveError> {
    let user = user.ok_or(ResolveError::IdentityRequired)?;
    let pair = (user, course);

    let request = {
      let mut ledger = lock(&self.ledger);

      let live = ledger
        .enrolling
        .get(&pair)
        .and_then(|f| f.request.upgrade());
      if let Some(pending) = live {
        debug!(%user, %course, "joining in-flight enrollment");
        pending
      } else {
        // A request whose last waiter is being dropped; its guard will find
        // the entry gone and leave the pair alone.
        if let Some(stale) = ledger.enrolling.remove(&pair) {
          ledger.states.insert(pair, stale.prior);
        }
        let prior = ledger.state(pair);
        if prior.is_enrolled() {
          debug!(%user, %course, "already enrolled");
          return Ok(prior);
        }
        if ledger.withdrawing.contains(&pair) {
          warn!(%user, %course, "enroll requested while withdrawal in flight");
          return Err(ResolveError::InvalidTransition {
            from: prior.label(),
            op:   "enroll",
          });
        }

        ledger.next_id += 1;
        let id = ledger.next_id;
        let guard = EnrollGuard {
          ledger: Arc::clone(&self.ledger),
          pair,
          id,
          prior,
          settled: false,
        };
        let request = self.enroll_request(guard);
        if let Some(weak) = request.downgrade() {
          ledger.enrolling.insert(pair, InFlightEnroll {
            id,
            prior,
            request: weak,
          });
        }
        ledger.states.insert(pair, EnrollmentState::enrolled(0));
        request
      }
    };

    request.await
  }

  /// Build the shared create-then-refresh request for a pair. The request
  /// settles the ledger through its guard, so whichever waiter drives it to
  /// completion applies the outcome exactly once.
  fn enroll_request(&self, guard: EnrollGuard) -> EnrollRequest {
    let store = Arc::clone(&self.store);
    let (user, course) = guard.pair;

    async move {
      debug!(%user, %course, "requesting enrollment");
      let outcome = match store.create(user, course).await {
        Ok(created) => {
          let initial =
            EnrollmentState::enrolled(created.progress_percentage.unwrap_or(0));
          match store.get_progress(user, course).await {
            Ok(p) => Ok(EnrollmentState::enrolled(p.progress_percentage)),
            Err(e) => {
              debug!(%user, %course, "progress refresh failed: {e}");
              Ok(initial)
            }
          }
        }
        Err(e) => Err(ResolveError::RemoteRejected(e.to_string())),
      };

      guard.settle(&outcome);
      outcome
    }
    .boxed()
    .shared()
  }

  /// Withdraw the user from a course, discarding their progress.
  ///
  /// Only valid while the pair is `Enrolled` with no other operation in
  /// flight; anything else is [`ResolveError::InvalidTransition`]. On failure
  /// the pair stays enrolled with its progress intact.
  pub async fn withdraw(
    &self,
    user: Option<UserId>,
    course: CourseId,
  ) -> Result<EnrollmentState, ResolveError> {
    let user = user.ok_or(ResolveError::IdentityRequired)?;
    let pair = (user, course);

    let _guard = {
      let mut ledger = lock(&self.ledger);
      let current = ledger.state(pair);
      let busy =
        ledger.enrolling.contains_key(&pair) || ledger.withdrawing.contains(&pair);
      if busy || !current.is_enrolled() {
        warn!(%user, %course, state = current.label(), busy, "invalid withdraw");
        return Err(ResolveError::InvalidTransition {
          from: if busy { "busy" } else { current.label() },
          op:   "withdraw",
        });
      }
      ledger.withdrawing.insert(pair);
      WithdrawGuard {
        ledger: Arc::clone(&self.ledger),
        pair,
      }
    };

    debug!(%user, %course, "requesting withdrawal");
    match self.store.delete(user, course).await {
      Ok(()) => {
        lock(&self.ledger)
          .states
          .insert(pair, EnrollmentState::NotEnrolled);
        debug!(%user, %course, "withdrawn");
        Ok(EnrollmentState::NotEnrolled)
      }
      Err(e) => {
        warn!(%user, %course, "withdrawal rejected: {e}");
        Err(ResolveError::RemoteRejected(e.to_string()))
      }
    }
  }

  /// Drop every cached state for a user, e.g. on logout. Requests already in
  /// flight still settle.
  pub fn forget(&self, user: UserId) {
    lock(&self.ledger).states.retain(|(u, _), _| *u != user);
  }
}
