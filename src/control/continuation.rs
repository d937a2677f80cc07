//! Continuation monad for continuation-passing style (CPS).
//!
//! This module provides the `Continuation<R, A>` type. A continuation value
//! represents a computation producing an `A` that, given "the rest of the
//! computation" `(A -> R)`, produces the final `R`.
//!
//! Internally every continuation returns a [`Trampoline<R>`] instead of a
//! bare `R`. The maps and binds composed onto a continuation are kept in a
//! flat list, and the rest of the computation is one explicit stack of
//! them rather than a closure nested once per bind. Each bind defers its
//! next step through [`Trampoline::suspend`], so chains of any length run
//! in bounded native stack, and a chain that is abandoned or never run is
//! dropped without recursion.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```rust
//! use bindery::control::Continuation;
//!
//! let cont: Continuation<i32, i32> = Continuation::wrap(1).and_then(|i| Continuation::wrap(i + 1));
//! assert_eq!(cont.run(|x| x), 2);
//! ```
//!
//! ## Early Return with `call_with_current_continuation_once`
//!
//! ```rust
//! use bindery::control::Continuation;
//!
//! let cont = Continuation::call_with_current_continuation_once(|exit| {
//!     Continuation::wrap(20).and_then(move |x| {
//!         if x > 10 {
//!             exit(x * 100)
//!         } else {
//!             Continuation::wrap(x + 5)
//!         }
//!     })
//! });
//!
//! assert_eq!(cont.run(|x| x), 2000);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::{ErasedValue, Trampoline, unerase};
use crate::typeclass::{Effect, Family, RunEffect};

/// The rest of a computation: receives an `A` and yields the trampolined
/// final result.
pub type ContinuationFunction<A, R> = Box<dyn FnOnce(A) -> Trampoline<R>>;

/// A shared, take-once holder for the continuation captured by call/cc.
type ContinuationHolder<A, R> = Rc<RefCell<Option<ContinuationFunction<A, R>>>>;

/// The first CPS function of a continuation, over erased values.
type CpsHead<R> = Box<dyn FnOnce(ContinuationFunction<ErasedValue, R>) -> Trampoline<R>>;

/// A step composed after the head.
enum Link<R> {
    Map(Box<dyn FnOnce(ErasedValue) -> ErasedValue>),
    Bind(Box<dyn FnOnce(ErasedValue) -> Program<R>>),
}

/// A continuation with its result type erased.
struct Program<R> {
    head: CpsHead<R>,
    links: Vec<Link<R>>,
}

/// Everything that still has to happen to a value: the links left to
/// apply (top of stack first) and then the final continuation.
struct Rest<R> {
    links: Vec<Link<R>>,
    last: ContinuationFunction<ErasedValue, R>,
}

impl<R: 'static> Program<R> {
    fn enter(self, mut rest: Rest<R>) -> Trampoline<R> {
        let Self { head, links } = self;
        rest.links.extend(links.into_iter().rev());
        head(Box::new(move |value| rest.resume(value)))
    }
}

impl<R: 'static> Rest<R> {
    /// Applies maps in a loop until a bind needs the trampoline or nothing
    /// is left.
    fn resume(mut self, mut value: ErasedValue) -> Trampoline<R> {
        loop {
            match self.links.pop() {
                Some(Link::Map(function)) => value = function(value),
                Some(Link::Bind(function)) => {
                    return Trampoline::suspend(move || function(value).enter(self));
                }
                None => return (self.last)(value),
            }
        }
    }
}

/// A continuation monad representing computations in CPS.
///
/// # Type Parameters
///
/// * `R` - The type of the final result of the whole computation
/// * `A` - The type of the intermediate value this continuation produces
///
/// # Laws
///
/// - **Left Identity**: `Continuation::wrap(a).and_then(f).run(k) == f(a).run(k)`
/// - **Right Identity**: `m.and_then(Continuation::wrap).run(k) == m.run(k)`
/// - **Associativity**: `m.and_then(f).and_then(g).run(k) == m.and_then(|x| f(x).and_then(g)).run(k)`
///
/// # Examples
///
/// ```rust
/// use bindery::control::Continuation;
///
/// // The handler decides what to do with the rest of the computation.
/// let double: Continuation<i32, i32> = Continuation::new(|k| k(21) * 2);
/// assert_eq!(double.run(|x| x), 42);
/// ```
pub struct Continuation<R, A> {
    program: Program<R>,
    _result: PhantomData<fn() -> A>,
}

impl<R: 'static, A: 'static> Continuation<R, A> {
    /// Creates a continuation from a direct-style handler `(A -> R) -> R`.
    ///
    /// The continuation handed to `handler` evaluates the rest of the
    /// computation in its own trampoline run, so deeply nested chains of
    /// handlers built this way use native stack per handler. Use
    /// [`from_trampoline`](Continuation::from_trampoline) for primitives
    /// that appear in long chains.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let cont: Continuation<String, i32> = Continuation::new(|k| k(42));
    /// assert_eq!(cont.run(|x| x.to_string()), "42");
    /// ```
    pub fn new<F>(handler: F) -> Self
    where
        F: FnOnce(Box<dyn FnOnce(A) -> R>) -> R + 'static,
    {
        Self::from_trampoline(move |continuation: ContinuationFunction<A, R>| {
            Trampoline::suspend(move || {
                Trampoline::finished(handler(Box::new(move |value| continuation(value).run())))
            })
        })
    }

    /// Creates a continuation from its trampolined CPS function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let cont: Continuation<i32, i32> = Continuation::from_trampoline(|k| k(41));
    /// assert_eq!(cont.run(|x| x + 1), 42);
    /// ```
    pub fn from_trampoline<F>(function: F) -> Self
    where
        F: FnOnce(ContinuationFunction<A, R>) -> Trampoline<R> + 'static,
    {
        Self::from_head(Box::new(move |rest: ContinuationFunction<ErasedValue, R>| {
            function(Box::new(move |value: A| rest(Box::new(value) as ErasedValue)))
        }))
    }

    fn from_head(head: CpsHead<R>) -> Self {
        Self {
            program: Program {
                head,
                links: Vec::new(),
            },
            _result: PhantomData,
        }
    }

    fn push<B>(self, link: Link<R>) -> Continuation<R, B> {
        let Program { head, mut links } = self.program;
        links.push(link);
        Continuation {
            program: Program { head, links },
            _result: PhantomData,
        }
    }

    /// Feeds the result to `continuation` without driving the trampoline.
    fn continue_with(self, continuation: ContinuationFunction<A, R>) -> Trampoline<R> {
        self.program.enter(Rest {
            links: Vec::new(),
            last: Box::new(move |value| continuation(unerase::<A>(value))),
        })
    }

    /// Lifts a pure value: passes `value` straight to the continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let cont: Continuation<i32, i32> = Continuation::wrap(42);
    /// assert_eq!(cont.run(|x| x), 42);
    /// ```
    pub fn wrap(value: A) -> Self {
        Self::from_head(Box::new(move |continuation: ContinuationFunction<ErasedValue, R>| {
            continuation(Box::new(value) as ErasedValue)
        }))
    }

    /// Alias for [`wrap`](Continuation::wrap).
    #[inline]
    pub fn pure(value: A) -> Self {
        Self::wrap(value)
    }

    /// Runs the continuation with the given final continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let cont: Continuation<String, i32> = Continuation::wrap(42);
    /// assert_eq!(cont.run(|x| format!("The answer is {x}")), "The answer is 42");
    /// ```
    pub fn run<K>(self, continuation: K) -> R
    where
        K: FnOnce(A) -> R + 'static,
    {
        self.into_trampoline(continuation).run()
    }

    /// Applies the final continuation without driving the result.
    pub fn into_trampoline<K>(self, continuation: K) -> Trampoline<R>
    where
        K: FnOnce(A) -> R + 'static,
    {
        self.continue_with(Box::new(move |value| Trampoline::finished(continuation(value))))
    }

    /// Applies a function to the result of this continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let cont: Continuation<i32, i32> = Continuation::wrap(21).map(|x| x * 2);
    /// assert_eq!(cont.run(|x| x), 42);
    /// ```
    pub fn map<B: 'static, F>(self, function: F) -> Continuation<R, B>
    where
        F: FnOnce(A) -> B + 'static,
    {
        self.push(Link::Map(Box::new(move |value: ErasedValue| -> ErasedValue {
            Box::new(function(unerase::<A>(value)))
        })))
    }

    /// Chains a function producing the next continuation.
    ///
    /// The returned continuation runs `self` first; once `self` hands its
    /// result forward, `function` builds the next continuation, which is
    /// run with the outer continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let cont: Continuation<i32, i32> = Continuation::wrap(21);
    /// let result = cont.and_then(|x| Continuation::wrap(x * 2));
    /// assert_eq!(result.run(|x| x), 42);
    /// ```
    pub fn and_then<B: 'static, F>(self, function: F) -> Continuation<R, B>
    where
        F: FnOnce(A) -> Continuation<R, B> + 'static,
    {
        self.push(Link::Bind(Box::new(move |value: ErasedValue| {
            function(unerase::<A>(value)).program
        })))
    }

    /// Alias for [`and_then`](Continuation::and_then).
    #[inline]
    pub fn flat_map<B: 'static, F>(self, function: F) -> Continuation<R, B>
    where
        F: FnOnce(A) -> Continuation<R, B> + 'static,
    {
        self.and_then(function)
    }

    /// Sequences two continuations, discarding the result of the first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let first: Continuation<i32, &str> = Continuation::wrap("ignored");
    /// let second: Continuation<i32, i32> = Continuation::wrap(42);
    /// assert_eq!(first.then(second).run(|x| x), 42);
    /// ```
    #[inline]
    #[must_use]
    pub fn then<B: 'static>(self, next: Continuation<R, B>) -> Continuation<R, B> {
        self.and_then(move |_| next)
    }

    /// Captures the current continuation (call/cc, one-shot version).
    ///
    /// `function` receives `exit`; calling `exit(value)` abandons the rest
    /// of the computation built inside `function` and delivers `value` as
    /// the result of the whole `call_with_current_continuation_once`.
    /// If `exit` is never called, the computation proceeds normally.
    ///
    /// # Panics
    ///
    /// Panics if the captured continuation is used twice, for example when
    /// the normal path finishes and `exit` is called afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::control::Continuation;
    ///
    /// let cont = Continuation::call_with_current_continuation_once(|exit| {
    ///     Continuation::wrap(1).and_then(move |x| {
    ///         if x > 10 { exit(x * 100) } else { Continuation::wrap(x + 5) }
    ///     })
    /// });
    /// assert_eq!(cont.run(|x| x), 6);
    /// ```
    pub fn call_with_current_continuation_once<F>(function: F) -> Self
    where
        F: FnOnce(Box<dyn FnOnce(A) -> Self>) -> Self + 'static,
    {
        Self::from_trampoline(move |outer_continuation: ContinuationFunction<A, R>| {
            let continuation_holder: ContinuationHolder<A, R> =
                Rc::new(RefCell::new(Some(outer_continuation)));
            let holder_for_exit = Rc::clone(&continuation_holder);

            let exit: Box<dyn FnOnce(A) -> Self> = Box::new(move |value: A| {
                Self::from_trampoline(move |_abandoned: ContinuationFunction<A, R>| {
                    let continuation = holder_for_exit.borrow_mut().take();
                    match continuation {
                        Some(continuation) => continuation(value),
                        None => panic!("continuation already consumed"),
                    }
                })
            });

            Trampoline::suspend(move || {
                function(exit).continue_with(Box::new(move |value| {
                    let continuation = continuation_holder.borrow_mut().take();
                    match continuation {
                        Some(continuation) => continuation(value),
                        None => panic!("continuation was consumed by exit"),
                    }
                }))
            })
        })
    }
}

// =============================================================================
// Effect Instance
// =============================================================================

/// The [`Family`] of [`Continuation`] values with final result `R`.
pub struct ContinuationFamily<R>(PhantomData<fn() -> R>);

impl<R: 'static> Family for ContinuationFamily<R> {
    type Member<A: 'static> = Continuation<R, A>;
}

impl<R: 'static, A: 'static> Effect for Continuation<R, A> {
    type Output = A;
    type Family = ContinuationFamily<R>;

    fn and_then<B, F>(self, function: F) -> Continuation<R, B>
    where
        B: 'static,
        F: FnOnce(A) -> Continuation<R, B> + 'static,
    {
        Self::and_then(self, function)
    }

    fn map<B, F>(self, function: F) -> Continuation<R, B>
    where
        B: 'static,
        F: FnOnce(A) -> B + 'static,
    {
        Self::map(self, function)
    }
}

impl<R: 'static, A: 'static> RunEffect for Continuation<R, A> {
    type Ambient = Box<dyn FnOnce(A) -> R>;
    type Outcome = R;

    fn run_effect(self, continuation: Box<dyn FnOnce(A) -> R>) -> R {
        self.run(continuation)
    }
}

// =============================================================================
// Debug Implementation
// =============================================================================

impl<R, A> fmt::Debug for Continuation<R, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Continuation")
            .finish_non_exhaustive()
    }
}

static_assertions::assert_not_impl_any!(Continuation<i32, i32>: Send, Sync);
