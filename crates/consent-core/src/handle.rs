use crate::controller::{ConsentController, Init, Outcome};
use crate::gate::AnalyticsGate;
use crate::state::{ConsentSnapshot, Phase};
use crate::store::ConsentStore;
use crate::timer::TimerToken;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Identifies a listener registered with [`ConsentHandle::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ConsentSnapshot)>;

/// Bound on redelivery rounds when listeners keep changing state.
const MAX_ROUNDS: usize = 16;

struct Shared<S, G> {
    controller: RefCell<ConsentController<S, G>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    // Listeners taken out of `listeners` while a round is delivered.
    checked_out: RefCell<Vec<SubscriptionId>>,
    // Checked-out listeners unsubscribed during that round.
    removed: RefCell<Vec<SubscriptionId>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
    // State changed while a round was being delivered.
    dirty: Cell<bool>,
}

/// Shared, single-threaded access to the one controller of a page session.
///
/// Every view (banner, settings panel, "manage cookies" link) holds a clone
/// and forwards intents through it. Listeners receive a snapshot after each
/// change that was not ignored. A listener may call back into the handle;
/// a change made from inside a listener is delivered to every listener once
/// the current round finishes, so all views end on the latest state. The
/// analytics gate runs while the controller is borrowed and must not call
/// back into the handle.
pub struct ConsentHandle<S, G> {
    inner: Rc<Shared<S, G>>,
}

impl<S, G> Clone for ConsentHandle<S, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: ConsentStore, G: AnalyticsGate> ConsentHandle<S, G> {
    pub fn new(controller: ConsentController<S, G>) -> Self {
        Self {
            inner: Rc::new(Shared {
                controller: RefCell::new(controller),
                listeners: RefCell::new(Vec::new()),
                checked_out: RefCell::new(Vec::new()),
                removed: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                notifying: Cell::new(false),
                dirty: Cell::new(false),
            }),
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(&ConsentSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        if let Some(pos) = listeners.iter().position(|(lid, _)| *lid == id) {
            listeners.remove(pos);
            return true;
        }
        drop(listeners);
        let mut removed = self.inner.removed.borrow_mut();
        if self.inner.checked_out.borrow().contains(&id) && !removed.contains(&id) {
            removed.push(id);
            return true;
        }
        false
    }

    pub fn init(&self) -> Init {
        let init = self.inner.controller.borrow_mut().init();
        if matches!(init, Init::Adopted(_)) {
            self.notify();
        }
        init
    }

    pub fn banner_timer_fired(&self, token: TimerToken) -> Outcome {
        self.apply(|c| c.banner_timer_fired(token))
    }

    pub fn accept_all(&self) -> Outcome {
        self.apply(|c| c.accept_all())
    }

    pub fn open_settings(&self) -> Outcome {
        self.apply(|c| c.open_settings())
    }

    pub fn close_settings(&self) -> Outcome {
        self.apply(|c| c.close_settings())
    }

    pub fn toggle_analytics(&self, value: bool) -> Outcome {
        self.apply(|c| c.toggle_analytics(value))
    }

    pub fn save_preferences(&self) -> Outcome {
        self.apply(|c| c.save_preferences())
    }

    pub fn snapshot(&self) -> ConsentSnapshot {
        self.inner.controller.borrow().snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.inner.controller.borrow().phase()
    }

    /// Run `f` against the controller, e.g. to inspect its store.
    pub fn with_controller<R>(&self, f: impl FnOnce(&ConsentController<S, G>) -> R) -> R {
        f(&self.inner.controller.borrow())
    }

    fn apply(&self, f: impl FnOnce(&mut ConsentController<S, G>) -> Outcome) -> Outcome {
        let outcome = f(&mut self.inner.controller.borrow_mut());
        if !outcome.is_ignored() {
            self.notify();
        }
        outcome
    }

    /// Deliver the current state to every listener. A change made by a
    /// listener marks the round dirty and triggers another round with the
    /// newer snapshot, until the state settles.
    fn notify(&self) {
        if self.inner.notifying.get() {
            self.inner.dirty.set(true);
            return;
        }
        self.inner.notifying.set(true);

        let mut delivered: Option<ConsentSnapshot> = None;
        for round in 0.. {
            let snapshot = self.snapshot();
            if delivered.as_ref() == Some(&snapshot) {
                break;
            }
            if round == MAX_ROUNDS {
                tracing::warn!(rounds = round, "consent listeners keep changing state; stopped redelivery");
                break;
            }
            self.inner.dirty.set(false);
            self.deliver(&snapshot);
            delivered = Some(snapshot);
            if !self.inner.dirty.get() {
                break;
            }
        }

        self.inner.notifying.set(false);
    }

    fn deliver(&self, snapshot: &ConsentSnapshot) {
        let mut active = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        *self.inner.checked_out.borrow_mut() = active.iter().map(|(id, _)| *id).collect();

        for (_, listener) in active.iter_mut() {
            listener(snapshot);
        }

        self.inner.checked_out.borrow_mut().clear();
        {
            let mut removed = self.inner.removed.borrow_mut();
            active.retain(|(id, _)| !removed.contains(id));
            removed.clear();
        }

        // Keep listeners subscribed during the round, after the existing ones
        let mut listeners = self.inner.listeners.borrow_mut();
        active.append(&mut listeners);
        *listeners = active;
    }
}
