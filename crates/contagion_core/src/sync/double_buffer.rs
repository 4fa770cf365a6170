//! # State Buffers
//!
//! Current/previous node-state buffers with an index-flip swap.
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │        StateBuffers         │
//!                    │                             │
//!                    │  ┌─────────┐  ┌─────────┐  │
//!                    │  │ Buffer 0│  │ Buffer 1│  │
//!                    │  └────┬────┘  └────┬────┘  │
//!                    │       │            │       │
//!                    │  ┌────┴────────────┴────┐  │
//!                    │  │ Atomic Index (0/1)   │  │
//!                    │  └──────────────────────┘  │
//!                    └─────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//!      ┌──────────────┐ ┌────────────┐ ┌────────────┐
//!      │  StepHandle  │ │  snapshot  │ │   commit   │
//!      │ (one at once)│ │ (any time) │ │  (flip)    │
//!      └──────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! - `StepHandle`: shared lock on current, exclusive lock on the scratch buffer
//! - `snapshot`: shared lock on whichever buffer is current when it lands
//! - `commit`/`swap`: atomic index flip, refused while another step is held

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StateError, StateResult};
use crate::state::{initial_states, NodeState};

/// Two node-state buffers whose roles are exchanged by flipping an index.
///
/// The buffer at `current_index()` is authoritative: it holds the seeded
/// state before the first step and the output of the last committed step
/// afterwards. The other buffer is scratch space for the step in flight.
///
/// ## Usage
///
/// ```rust
/// use contagion_core::StateBuffers;
///
/// let buffers = StateBuffers::initialize(8, 0).unwrap();
///
/// let mut step = buffers.begin_step().unwrap();
/// let (previous, next) = step.split();
/// next.copy_from_slice(previous);
/// step.commit();
///
/// assert_eq!(buffers.swap_count(), 1);
/// ```
#[derive(Debug)]
pub struct StateBuffers {
    /// The two buffers, each `node_count` long.
    buffers: [RwLock<Vec<NodeState>>; 2],

    /// Index of the current (authoritative) buffer.
    current: AtomicUsize,

    /// Whether a step handle is currently held.
    stepping: AtomicBool,

    /// Number of swaps so far.
    swap_count: AtomicUsize,

    node_count: usize,
    start_node: usize,
}

impl StateBuffers {
    /// Allocates both buffers and seeds the current one.
    ///
    /// Current starts fully susceptible except the seed nodes of
    /// `start_node`; previous starts all zero.
    ///
    /// # Errors
    ///
    /// Returns an error if `node_count` is zero or `start_node >= node_count`.
    pub fn initialize(node_count: usize, start_node: usize) -> StateResult<Self> {
        let current = initial_states(node_count, start_node)?;
        let previous = vec![NodeState::ZERO; node_count];

        tracing::debug!(node_count, start_node, "state buffers initialized");

        Ok(Self {
            buffers: [RwLock::new(current), RwLock::new(previous)],
            current: AtomicUsize::new(0),
            stepping: AtomicBool::new(false),
            swap_count: AtomicUsize::new(0),
            node_count,
            start_node,
        })
    }

    /// Number of nodes in each buffer.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The start node the buffers were seeded from.
    #[inline]
    #[must_use]
    pub fn start_node(&self) -> usize {
        self.start_node
    }

    /// Index (0 or 1) of the current buffer.
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// Number of swaps performed so far.
    #[inline]
    #[must_use]
    pub fn swap_count(&self) -> usize {
        self.swap_count.load(Ordering::Acquire)
    }

    /// Returns whether a step handle is currently held.
    #[inline]
    #[must_use]
    pub fn is_stepping(&self) -> bool {
        self.stepping.load(Ordering::Acquire)
    }

    /// Starts a step.
    ///
    /// The handle reads the current buffer and writes the other one. Nothing
    /// becomes visible until [`StepHandle::commit`]; dropping the handle
    /// without committing discards the scratch contents.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::StepActive`] if another handle is still held.
    pub fn begin_step(&self) -> StateResult<StepHandle<'_>> {
        if self
            .stepping
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StateError::StepActive);
        }

        let current = self.current.load(Ordering::Acquire);
        let next_index = current ^ 1;

        Ok(StepHandle {
            buffers: self,
            previous: self.buffers[current].read(),
            next: self.buffers[next_index].write(),
            next_index,
        })
    }

    /// Exchanges the current/previous roles without copying.
    ///
    /// After the first committed step the previous buffer holds the state one
    /// step older than current. Before that it is all zero.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::StepActive`] while a step handle is held.
    pub fn swap(&self) -> StateResult<()> {
        if self
            .stepping
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StateError::StepActive);
        }
        self.current.fetch_xor(1, Ordering::AcqRel);
        self.swap_count.fetch_add(1, Ordering::AcqRel);
        self.stepping.store(false, Ordering::Release);
        Ok(())
    }

    /// Copies the current buffer.
    ///
    /// Never observes a scratch buffer: the index is re-checked once the
    /// buffer lock is held, and the read retries if a commit landed between.
    #[must_use]
    pub fn snapshot(&self) -> Vec<NodeState> {
        self.with_current(<[NodeState]>::to_vec)
    }

    /// Runs `f` against the current buffer while holding its shared lock.
    ///
    /// Does not wait for a step in flight.
    ///
    /// Keep `f` short: the next step cannot write this buffer until it returns.
    pub fn with_current<R>(&self, f: impl FnOnce(&[NodeState]) -> R) -> R {
        self.with_buffer_from(self.current.load(Ordering::Acquire), f)
    }

    /// Reads starting from `index`, which may already be stale.
    ///
    /// Never parks on a buffer lock: a stale index can name the buffer the
    /// next step is writing, so a failed `try_read` reloads the index.
    fn with_buffer_from<R>(&self, mut index: usize, f: impl FnOnce(&[NodeState]) -> R) -> R {
        loop {
            if let Some(guard) = self.buffers[index].try_read() {
                let current = self.current.load(Ordering::Acquire);
                if current == index {
                    return f(guard.as_slice());
                }
                index = current;
                continue;
            }
            let current = self.current.load(Ordering::Acquire);
            if current == index {
                // Commit published this buffer; its write guard is being released.
                std::hint::spin_loop();
            }
            index = current;
        }
    }

    fn publish(&self, index: usize) -> usize {
        self.current.store(index, Ordering::Release);
        self.swap_count.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Exclusive access to one step's input and output buffers.
///
/// Only one handle can exist at a time.
///
/// ## Usage
///
/// ```rust
/// use contagion_core::{NodeState, StateBuffers};
///
/// let buffers = StateBuffers::initialize(4, 0).unwrap();
/// {
///     let mut step = buffers.begin_step().unwrap();
///     let (_, next) = step.split();
///     next.fill(NodeState::ZERO);
///     // dropped without commit: nothing published
/// }
/// assert_eq!(buffers.snapshot()[0], NodeState::INFECTED);
/// ```
pub struct StepHandle<'a> {
    buffers: &'a StateBuffers,
    previous: RwLockReadGuard<'a, Vec<NodeState>>,
    next: RwLockWriteGuard<'a, Vec<NodeState>>,
    next_index: usize,
}

impl StepHandle<'_> {
    /// The last completed state.
    #[inline]
    #[must_use]
    pub fn previous(&self) -> &[NodeState] {
        self.previous.as_slice()
    }

    /// Borrows the input and the output buffer together.
    #[inline]
    pub fn split(&mut self) -> (&[NodeState], &mut [NodeState]) {
        (self.previous.as_slice(), self.next.as_mut_slice())
    }

    /// Index of the buffer this handle writes to.
    #[inline]
    #[must_use]
    pub fn buffer_index(&self) -> usize {
        self.next_index
    }

    /// Publishes the written buffer as current and returns the new swap count.
    ///
    /// Call only after every output cell has been written.
    pub fn commit(self) -> usize {
        let swaps = self.buffers.publish(self.next_index);
        tracing::trace!(buffer = self.next_index, swaps, "state buffers swapped");
        swaps
    }
}

impl Drop for StepHandle<'_> {
    fn drop(&mut self) {
        self.buffers.stepping.store(false, Ordering::Release);
    }
}
