//! Stack-safe evaluation via trampolining.
//!
//! This module provides the `Trampoline<T>` type, the evaluation engine that
//! every effect type in this crate is built on. A trampoline is either
//! `Finished` with a value or a `Step` that still has work to do. Chains of
//! `and_then` and `map` are stored as data and driven by a loop, so the
//! native call stack does not grow with the length of a chain.
//!
//! # Motivation
//!
//! Rust does not guarantee tail call optimization (TCO). Composing a long
//! chain of monadic binds naively nests one native frame per bind. The
//! trampoline converts that nesting into iteration.
//!
//! # Examples
//!
//! ## Mutual Recursion
//!
//! ```rust
//! use bindery::control::Trampoline;
//!
//! fn is_even(n: u64) -> Trampoline<bool> {
//!     if n == 0 {
//!         Trampoline::finished(true)
//!     } else {
//!         Trampoline::suspend(move || is_odd(n - 1))
//!     }
//! }
//!
//! fn is_odd(n: u64) -> Trampoline<bool> {
//!     if n == 0 {
//!         Trampoline::finished(false)
//!     } else {
//!         Trampoline::suspend(move || is_even(n - 1))
//!     }
//! }
//!
//! assert!(is_even(100_000).run());
//! ```
//!
//! ## Left-Nested Binds
//!
//! ```rust
//! use bindery::control::Trampoline;
//!
//! let chain = (0..100_000).fold(Trampoline::finished(0_u64), |trampoline, _| {
//!     trampoline.and_then(|value| Trampoline::finished(value + 1))
//! });
//! assert_eq!(chain.run(), 100_000);
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use smallvec::SmallVec;

use super::error::TrampolineError;
use crate::typeclass::{Effect, Family, RunEffect};

/// Continuations kept inline before the pending stack spills to the heap.
const CONTINUATION_INLINE_CAPACITY: usize = 8;

/// A value whose type is known only to the code that produced it.
pub(crate) type ErasedValue = Box<dyn Any>;

type ErasedContinuation = Box<dyn FnOnce(ErasedValue) -> Work>;

/// One unit of work for the evaluation machine, with its result type erased.
///
/// Erasure lets a single loop drive binds whose intermediate types differ.
enum Work {
    Value(ErasedValue),
    Thunk(Box<dyn FnOnce() -> Self>),
    Chain(Box<dyn Chain>),
    Machine(Box<Machine>),
}

impl Work {
    /// Takes the work out, leaving a unit value that owns nothing.
    fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Value(Box::new(())))
    }
}

/// A pending `and_then` or `map` node.
trait Chain {
    /// Splits the node into the work to evaluate first and the continuation
    /// to apply to its result.
    fn split(self: Box<Self>) -> (Work, ErasedContinuation);

    /// Discards the function and hands back the source work.
    fn detach(self: Box<Self>) -> Work;
}

struct BindNode<A, B, F> {
    source: Trampoline<A>,
    function: F,
    _result: PhantomData<fn() -> B>,
}

impl<A: 'static, B: 'static, F> Chain for BindNode<A, B, F>
where
    F: FnOnce(A) -> Trampoline<B> + 'static,
{
    fn split(self: Box<Self>) -> (Work, ErasedContinuation) {
        let Self {
            source, function, ..
        } = *self;
        (
            source.into_work(),
            Box::new(move |value| function(unerase(value)).into_work()),
        )
    }

    fn detach(self: Box<Self>) -> Work {
        let Self { source, .. } = *self;
        source.into_work()
    }
}

struct MapNode<A, B, F> {
    source: Trampoline<A>,
    function: F,
    _result: PhantomData<fn() -> B>,
}

impl<A: 'static, B: 'static, F> Chain for MapNode<A, B, F>
where
    F: FnOnce(A) -> B + 'static,
{
    fn split(self: Box<Self>) -> (Work, ErasedContinuation) {
        let Self {
            source, function, ..
        } = *self;
        (
            source.into_work(),
            Box::new(move |value| Work::Value(Box::new(function(unerase::<A>(value))))),
        )
    }

    fn detach(self: Box<Self>) -> Work {
        let Self { source, .. } = *self;
        source.into_work()
    }
}

/// The state of a partially driven trampoline: the work in hand plus the
/// continuations still waiting for its result (top of stack applies first).
struct Machine {
    current: Work,
    pending: SmallVec<[ErasedContinuation; CONTINUATION_INLINE_CAPACITY]>,
}

enum Progress {
    Finished(ErasedValue),
    Running(Machine),
}

impl Machine {
    fn new(current: Work) -> Self {
        Self {
            current,
            pending: SmallVec::new(),
        }
    }

    /// Performs exactly one transition. Never recurses.
    fn step(mut self) -> Progress {
        self.current = match self.current.take() {
            Work::Value(value) => match self.pending.pop() {
                Some(continuation) => continuation(value),
                None => return Progress::Finished(value),
            },
            Work::Thunk(thunk) => thunk(),
            Work::Chain(chain) => {
                let (source, continuation) = chain.split();
                self.pending.push(continuation);
                source
            }
            Work::Machine(mut inner) => {
                self.pending.extend(std::mem::take(&mut inner.pending));
                inner.current.take()
            }
        };
        Progress::Running(self)
    }

    /// Returns the final value if nothing is left to do.
    fn settled(mut self) -> Result<ErasedValue, Self> {
        if !self.pending.is_empty() {
            return Err(self);
        }
        match self.current.take() {
            Work::Value(value) => Ok(value),
            current => {
                self.current = current;
                Err(self)
            }
        }
    }

    fn into_work(mut self) -> Work {
        if self.pending.is_empty() {
            self.current.take()
        } else {
            Work::Machine(Box::new(self))
        }
    }

    fn run_to_end(mut self) -> (ErasedValue, u64) {
        let mut steps: u64 = 0;
        loop {
            steps += 1;
            match self.step() {
                Progress::Finished(value) => return (value, steps),
                Progress::Running(next) => self = next,
            }
        }
    }

    fn run_within(mut self, limit: u64) -> Result<(ErasedValue, u64), TrampolineError> {
        for steps in 1..=limit {
            match self.step() {
                Progress::Finished(value) => return Ok((value, steps)),
                Progress::Running(next) => self = next,
            }
        }
        Err(TrampolineError::StepLimitExceeded { limit })
    }
}

impl Drop for Machine {
    // An unrun chain nests one node per bind. Unlinking the nodes one at a
    // time keeps the drop of any chain in constant native stack.
    fn drop(&mut self) {
        let mut next = self.current.take();
        loop {
            next = match next {
                Work::Chain(chain) => chain.detach(),
                Work::Machine(mut inner) => inner.current.take(),
                Work::Value(_) | Work::Thunk(_) => return,
            };
        }
    }
}

/// Recovers a value erased by the code that built the enclosing chain.
pub(crate) fn unerase<T: 'static>(value: ErasedValue) -> T {
    match value.downcast::<T>() {
        Ok(value) => *value,
        Err(_) => unreachable!("erased value has an unexpected type"),
    }
}

/// A suspended computation: the payload of [`Trampoline::Step`].
///
/// Calling [`Suspended::resume`] performs one step and yields the next
/// trampoline state.
pub struct Suspended<T> {
    machine: Machine,
    _result: PhantomData<fn() -> T>,
}

impl<T> Suspended<T> {
    fn from_work(work: Work) -> Self {
        Self::from_machine(Machine::new(work))
    }

    const fn from_machine(machine: Machine) -> Self {
        Self {
            machine,
            _result: PhantomData,
        }
    }
}

impl<T: 'static> Suspended<T> {
    /// Performs one step of evaluation and returns the next state.
    ///
    /// Repeatedly resuming until `Finished` is what [`Trampoline::run`]
    /// does; each call uses a constant amount of native stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Trampoline;
    ///
    /// let mut state = Trampoline::suspend(|| Trampoline::finished(42));
    /// let result = loop {
    ///     match state {
    ///         Trampoline::Finished(value) => break value,
    ///         Trampoline::Step(suspended) => state = suspended.resume(),
    ///     }
    /// };
    /// assert_eq!(result, 42);
    /// ```
    pub fn resume(self) -> Trampoline<T> {
        match self.machine.step() {
            Progress::Finished(value) => Trampoline::Finished(unerase(value)),
            Progress::Running(machine) => match machine.settled() {
                Ok(value) => Trampoline::Finished(unerase(value)),
                Err(machine) => Trampoline::Step(Self::from_machine(machine)),
            },
        }
    }
}

/// A data structure for stack-safe evaluation of composed computations.
///
/// `Trampoline<T>` is either a finished value or a suspended step. Binding
/// with [`and_then`](Trampoline::and_then) and [`map`](Trampoline::map) never
/// evaluates anything; only [`run`](Trampoline::run) does, in a loop that
/// keeps pending continuations on an explicit heap stack.
///
/// # Type Parameters
///
/// * `T` - The type of the final result. Must be `'static` for suspension
///   because steps are boxed closures.
///
/// # Laws
///
/// - **Left Identity**: `Trampoline::finished(a).and_then(f).run() == f(a).run()`
/// - **Right Identity**: `m.and_then(Trampoline::finished).run() == m.run()`
/// - **Associativity**: `m.and_then(f).and_then(g).run() == m.and_then(|x| f(x).and_then(g)).run()`
///
/// # Non-termination
///
/// A trampoline that never reaches `Finished` makes `run` loop forever.
/// Use [`run_bounded`](Trampoline::run_bounded) to cap the number of steps.
pub enum Trampoline<T> {
    /// The computation has completed with this value.
    Finished(T),
    /// The computation still has work to do.
    Step(Suspended<T>),
}

impl<T> Trampoline<T> {
    /// Creates a finished trampoline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Trampoline;
    ///
    /// assert_eq!(Trampoline::finished(42).run(), 42);
    /// ```
    #[inline]
    pub const fn finished(value: T) -> Self {
        Self::Finished(value)
    }

    /// Alias for [`finished`](Trampoline::finished).
    #[inline]
    pub const fn pure(value: T) -> Self {
        Self::finished(value)
    }

    /// Returns `true` if no work is left.
    #[inline]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

impl<T: 'static> Trampoline<T> {
    /// Creates a suspended trampoline that continues with `thunk`.
    ///
    /// The thunk is not called until the trampoline is driven.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Trampoline;
    ///
    /// fn count_down(n: u64) -> Trampoline<u64> {
    ///     if n == 0 {
    ///         Trampoline::finished(0)
    ///     } else {
    ///         Trampoline::suspend(move || count_down(n - 1))
    ///     }
    /// }
    ///
    /// assert_eq!(count_down(100_000).run(), 0);
    /// ```
    pub fn suspend<F>(thunk: F) -> Self
    where
        F: FnOnce() -> Self + 'static,
    {
        Self::Step(Suspended::from_work(Work::Thunk(Box::new(move || {
            thunk().into_work()
        }))))
    }

    /// Sequentially composes this trampoline with `function`.
    ///
    /// `function` is called once, with the result of `self`, when the
    /// returned trampoline is driven.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Trampoline;
    ///
    /// let result = Trampoline::finished(21).and_then(|x| Trampoline::finished(x * 2));
    /// assert_eq!(result.run(), 42);
    /// ```
    pub fn and_then<B, F>(self, function: F) -> Trampoline<B>
    where
        B: 'static,
        F: FnOnce(T) -> Trampoline<B> + 'static,
    {
        Trampoline::Step(Suspended::from_work(Work::Chain(Box::new(BindNode {
            source: self,
            function,
            _result: PhantomData,
        }))))
    }

    /// Alias for [`and_then`](Trampoline::and_then).
    #[inline]
    pub fn flat_map<B, F>(self, function: F) -> Trampoline<B>
    where
        B: 'static,
        F: FnOnce(T) -> Trampoline<B> + 'static,
    {
        self.and_then(function)
    }

    /// Transforms the eventual result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Trampoline;
    ///
    /// let doubled = Trampoline::finished(21).map(|x| x * 2);
    /// assert_eq!(doubled.run(), 42);
    /// ```
    pub fn map<B, F>(self, function: F) -> Trampoline<B>
    where
        B: 'static,
        F: FnOnce(T) -> B + 'static,
    {
        Trampoline::Step(Suspended::from_work(Work::Chain(Box::new(MapNode {
            source: self,
            function,
            _result: PhantomData,
        }))))
    }

    /// Sequences two trampolines, discarding the result of the first.
    #[inline]
    #[must_use]
    pub fn then<B: 'static>(self, next: Trampoline<B>) -> Trampoline<B> {
        self.and_then(move |_| next)
    }

    /// Performs one step of evaluation. A finished trampoline is returned
    /// unchanged.
    #[must_use]
    pub fn resume(self) -> Self {
        match self {
            Self::Finished(value) => Self::Finished(value),
            Self::Step(suspended) => suspended.resume(),
        }
    }

    /// Runs the trampoline to completion and returns the final value.
    ///
    /// Uses constant native stack regardless of how many steps or binds
    /// the computation contains. Panics raised by thunks or continuations
    /// propagate out of this call unchanged.
    pub fn run(self) -> T {
        let machine = match self {
            Self::Finished(value) => return value,
            Self::Step(suspended) => suspended.machine,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!("trampoline run started");

        let (value, _steps) = machine.run_to_end();

        #[cfg(feature = "tracing")]
        tracing::trace!(steps = _steps, "trampoline run finished");

        unerase(value)
    }

    /// Runs the trampoline for at most `max_steps` steps.
    ///
    /// # Errors
    ///
    /// Returns [`TrampolineError::StepLimitExceeded`] if the computation
    /// has not finished after `max_steps` steps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::{Trampoline, TrampolineError};
    ///
    /// fn forever() -> Trampoline<()> {
    ///     Trampoline::suspend(forever)
    /// }
    ///
    /// assert_eq!(
    ///     forever().run_bounded(1_000),
    ///     Err(TrampolineError::StepLimitExceeded { limit: 1_000 })
    /// );
    /// assert_eq!(Trampoline::finished(1).run_bounded(0), Ok(1));
    /// ```
    pub fn run_bounded(self, max_steps: u64) -> Result<T, TrampolineError> {
        let machine = match self {
            Self::Finished(value) => return Ok(value),
            Self::Step(suspended) => suspended.machine,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(limit = max_steps, "bounded trampoline run started");

        match machine.run_within(max_steps) {
            Ok((value, _steps)) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(steps = _steps, "bounded trampoline run finished");
                Ok(unerase(value))
            }
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(limit = max_steps, "trampoline step limit exceeded");
                Err(error)
            }
        }
    }

    fn into_work(self) -> Work {
        match self {
            Self::Finished(value) => Work::Value(Box::new(value)),
            Self::Step(suspended) => suspended.machine.into_work(),
        }
    }
}

// =============================================================================
// Effect Instance
// =============================================================================

/// The [`Family`] of [`Trampoline`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TrampolineFamily;

impl Family for TrampolineFamily {
    type Member<A: 'static> = Trampoline<A>;
}

impl<T: 'static> Effect for Trampoline<T> {
    type Output = T;
    type Family = TrampolineFamily;

    fn and_then<B, F>(self, function: F) -> Trampoline<B>
    where
        B: 'static,
        F: FnOnce(T) -> Trampoline<B> + 'static,
    {
        Self::and_then(self, function)
    }

    fn map<B, F>(self, function: F) -> Trampoline<B>
    where
        B: 'static,
        F: FnOnce(T) -> B + 'static,
    {
        Self::map(self, function)
    }
}

impl<T: 'static> RunEffect for Trampoline<T> {
    type Ambient = ();
    type Outcome = T;

    fn run_effect(self, (): ()) -> T {
        self.run()
    }
}

// =============================================================================
// Debug Implementation
// =============================================================================

impl<T: fmt::Debug> fmt::Debug for Trampoline<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished(value) => formatter.debug_tuple("Finished").field(value).finish(),
            Self::Step(suspended) => formatter.debug_tuple("Step").field(suspended).finish(),
        }
    }
}

impl<T> fmt::Debug for Suspended<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Suspended")
            .field("pending", &self.machine.pending.len())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_not_impl_any!(Trampoline<i32>: Send, Sync);
