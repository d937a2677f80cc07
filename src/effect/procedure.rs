//! Procedure-driven interpretation of effects.
//!
//! A [`Procedure`] is a resumable state machine. Each time it is started or
//! resumed it either yields the next effect to run or returns its final
//! value. [`interpret`] turns a procedure into a single effect by binding
//! every yielded effect to the resumption of the procedure, so the result
//! behaves exactly like the equivalent hand-written `and_then` chain.
//!
//! For trampolined effects ([`Reader`](super::Reader),
//! [`Continuation`](crate::control::Continuation),
//! [`Trampoline`](crate::control::Trampoline)) the resumption happens inside
//! the `and_then` closure, which the trampoline loop calls, so procedures of
//! any length run in bounded stack. Eager effects (`Option`, `Result`) hand
//! out their value through [`Effect::try_ready`] and the interpreter resumes
//! the procedure in a loop, which is just as stack-safe.
//!
//! # Examples
//!
//! ```rust
//! use bindery::effect::{with_effect, Reader, Steps};
//!
//! // Reads the context twice and adds the readings.
//! let add_context = with_effect(
//!     |offset: i32| {
//!         Steps::new(move |values: Vec<i32>| values[0] + values[1] + offset)
//!             .step(|_| Reader::ask())
//!             .step(|_| Reader::ask())
//!     },
//!     Reader::wrap,
//! );
//!
//! assert_eq!(add_context(0).run(2), 4);
//! assert_eq!(add_context(1).run(2), 5);
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::typeclass::{Effect, Rebind};

/// What a procedure wants to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next<E, T> {
    /// Run this effect and resume the procedure with its result.
    Yield(E),
    /// The procedure is done.
    Return(T),
}

/// A resumable computation that yields effects of one type.
///
/// After returning [`Next::Return`] a procedure is never resumed again.
pub trait Procedure: 'static {
    /// The effect type this procedure yields.
    type Effect: Effect;

    /// The final value of the procedure.
    type Output: 'static;

    /// Runs the procedure up to its first yield or return.
    fn start(&mut self) -> Next<Self::Effect, Self::Output>;

    /// Resumes the procedure with the result of the last yielded effect.
    fn resume(
        &mut self,
        value: <Self::Effect as Effect>::Output,
    ) -> Next<Self::Effect, Self::Output>;
}

/// The effect produced by interpreting procedure `P`.
pub type Interpreted<P> = Rebind<<P as Procedure>::Effect, <P as Procedure>::Output>;

/// Interprets a procedure as one effect.
///
/// On [`Next::Return`] the result is `wrap(value)`. On [`Next::Yield`] the
/// yielded effect is bound to a function that resumes the procedure with
/// its result and interprets what comes next. A yielded effect that already
/// holds its value resumes the procedure right away.
///
/// # Examples
///
/// ```rust
/// use bindery::effect::{interpret, Next, Procedure};
///
/// // Keeps doubling until the value passes a limit.
/// struct DoubleUntil {
///     limit: i32,
/// }
///
/// impl Procedure for DoubleUntil {
///     type Effect = Option<i32>;
///     type Output = i32;
///
///     fn start(&mut self) -> Next<Option<i32>, i32> {
///         Next::Yield(Some(1))
///     }
///
///     fn resume(&mut self, value: i32) -> Next<Option<i32>, i32> {
///         if value > self.limit { Next::Return(value) } else { Next::Yield(Some(value * 2)) }
///     }
/// }
///
/// assert_eq!(interpret(DoubleUntil { limit: 10 }, Some), Some(16));
/// ```
pub fn interpret<P, W>(mut procedure: P, wrap: W) -> Interpreted<P>
where
    P: Procedure,
    W: FnOnce(P::Output) -> Interpreted<P> + 'static,
{
    #[cfg(feature = "tracing")]
    tracing::trace!(procedure = std::any::type_name::<P>(), "interpreting procedure");

    let next = procedure.start();
    continue_with(procedure, next, wrap)
}

fn continue_with<P, W>(mut procedure: P, mut next: Next<P::Effect, P::Output>, wrap: W) -> Interpreted<P>
where
    P: Procedure,
    W: FnOnce(P::Output) -> Interpreted<P> + 'static,
{
    loop {
        match next {
            Next::Return(value) => return wrap(value),
            Next::Yield(effect) => match effect.try_ready() {
                Ok(value) => next = procedure.resume(value),
                Err(effect) => {
                    return effect.and_then(move |value| {
                        let next = procedure.resume(value);
                        continue_with(procedure, next, wrap)
                    });
                }
            },
        }
    }
}

/// Builds a function that interprets a fresh procedure per call.
///
/// `constructor` turns the call's arguments into a procedure; the returned
/// function interprets it with `wrap`. Nothing runs until the resulting
/// effect is run.
///
/// # Examples
///
/// ```rust
/// use bindery::effect::{with_effect, Steps};
///
/// let checked_div = with_effect(
///     |(dividend, divisor): (i32, i32)| {
///         Steps::new(|values: Vec<i32>| values[0])
///             .step(move |_| dividend.checked_div(divisor).ok_or("division by zero"))
///     },
///     Ok,
/// );
///
/// assert_eq!(checked_div((8, 2)), Ok(4));
/// assert_eq!(checked_div((8, 0)), Err("division by zero"));
/// ```
pub fn with_effect<Arguments, P, C, W>(constructor: C, wrap: W) -> impl Fn(Arguments) -> Interpreted<P>
where
    P: Procedure,
    C: Fn(Arguments) -> P,
    W: FnOnce(P::Output) -> Interpreted<P> + Clone + 'static,
{
    move |arguments| interpret(constructor(arguments), wrap.clone())
}

// =============================================================================
// Steps
// =============================================================================

type StepFunction<E> = Box<dyn FnOnce(&[<E as Effect>::Output]) -> E>;

type FinishFunction<A, T> = Box<dyn FnOnce(Vec<A>) -> T>;

/// A procedure assembled from closures.
///
/// Each step receives the results of all earlier steps and returns the
/// next effect to run. Once every step has run, the finishing closure
/// receives all results in order and computes the output.
///
/// All steps yield the same effect type, so their results share one type.
///
/// # Examples
///
/// ```rust
/// use bindery::effect::{interpret, Reader, Steps};
///
/// let procedure = Steps::new(|values: Vec<i32>| values.iter().sum::<i32>())
///     .step(|_| Reader::ask())
///     .step(|seen: &[i32]| Reader::wrap(seen[0] * 10));
///
/// assert_eq!(interpret(procedure, Reader::wrap).run(3), 33);
/// ```
pub struct Steps<E: Effect, T> {
    steps: VecDeque<StepFunction<E>>,
    values: Vec<E::Output>,
    finish: Option<FinishFunction<E::Output, T>>,
}

impl<E: Effect, T: 'static> Steps<E, T> {
    /// Creates a procedure with no steps and the given finishing closure.
    pub fn new<F>(finish: F) -> Self
    where
        F: FnOnce(Vec<E::Output>) -> T + 'static,
    {
        Self {
            steps: VecDeque::new(),
            values: Vec::new(),
            finish: Some(Box::new(finish)),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn step<F>(mut self, step: F) -> Self
    where
        F: FnOnce(&[E::Output]) -> E + 'static,
    {
        self.steps.push_back(Box::new(step));
        self
    }

    /// The number of steps that have not run yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    fn advance(&mut self) -> Next<E, T> {
        if let Some(step) = self.steps.pop_front() {
            return Next::Yield(step(&self.values));
        }
        match self.finish.take() {
            Some(finish) => Next::Return(finish(std::mem::take(&mut self.values))),
            None => panic!("procedure resumed after returning"),
        }
    }
}

impl<E: Effect, T: 'static> Procedure for Steps<E, T> {
    type Effect = E;
    type Output = T;

    fn start(&mut self) -> Next<E, T> {
        self.advance()
    }

    fn resume(&mut self, value: E::Output) -> Next<E, T> {
        self.values.push(value);
        self.advance()
    }
}

impl<E: Effect, T> fmt::Debug for Steps<E, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Steps")
            .field("remaining", &self.steps.len())
            .field("collected", &self.values.len())
            .finish_non_exhaustive()
    }
}
