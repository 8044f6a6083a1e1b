//! Drop-tracking element type.
//!
//! [`Tracked`] records every construction and destruction in a
//! thread-local [`DropLedger`]. Tests run one per thread, so each test
//! sees only its own instances. A container that leaks shows up as
//! [`DropLedger::live`] > 0 after it is gone; one that drops twice
//! panics inside `Drop`.

use std::cell::RefCell;
use std::fmt;

use indexmap::IndexSet;

thread_local! {
    static LEDGER: RefCell<LedgerState> = RefCell::new(LedgerState::default());
}

#[derive(Default)]
struct LedgerState {
    next_id: u64,
    created: u64,
    dropped: u64,
    /// Ids of instances not yet dropped, in creation order.
    live: IndexSet<u64>,
}

/// Counters reported by [`DropLedger::counts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    pub created: u64,
    pub dropped: u64,
}

impl LedgerCounts {
    pub fn live(&self) -> u64 {
        self.created - self.dropped
    }
}

/// Access to the current thread's instance ledger.
pub struct DropLedger;

impl DropLedger {
    /// Forget every recorded instance. Call at the start of a test.
    pub fn reset() {
        LEDGER.with(|ledger| *ledger.borrow_mut() = LedgerState::default());
    }

    pub fn counts() -> LedgerCounts {
        LEDGER.with(|ledger| {
            let ledger = ledger.borrow();
            LedgerCounts {
                created: ledger.created,
                dropped: ledger.dropped,
            }
        })
    }

    /// Number of instances alive right now.
    pub fn live() -> usize {
        LEDGER.with(|ledger| ledger.borrow().live.len())
    }

    /// Ids of the instances alive right now, oldest first.
    pub fn live_ids() -> Vec<u64> {
        LEDGER.with(|ledger| ledger.borrow().live.iter().copied().collect())
    }

    fn register() -> u64 {
        LEDGER.with(|ledger| {
            let mut ledger = ledger.borrow_mut();
            let id = ledger.next_id;
            ledger.next_id += 1;
            ledger.created += 1;
            ledger.live.insert(id);
            id
        })
    }

    fn unregister(id: u64) {
        let was_live = LEDGER.with(|ledger| {
            let mut ledger = ledger.borrow_mut();
            ledger.dropped += 1;
            ledger.live.shift_remove(&id)
        });
        assert!(was_live, "Tracked instance {id} dropped twice");
    }
}

/// A value whose lifetime is recorded in the thread's [`DropLedger`].
///
/// Equality and `Debug` look only at `value`; the
/// identity is an implementation detail of the ledger.
pub struct Tracked {
    id: u64,
    pub value: i64,
}

impl Tracked {
    pub fn new(value: i64) -> Self {
        Self {
            id: DropLedger::register(),
            value,
        }
    }

    /// Ledger identity of this instance.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Default for Tracked {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        DropLedger::unregister(self.id);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl PartialEq<i64> for Tracked {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}
