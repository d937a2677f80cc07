//! Effect type class - the capability contract shared by every effect type.
//!
//! An effect value wraps a deferred computation. Every effect type provides
//! sequential composition ([`Effect::and_then`]) and result transformation
//! ([`Effect::map`]). Together with an explicitly passed `wrap` function,
//! that is all the generic combinators in
//! [`combinators`](super::combinators) need.
//!
//! ## Higher-Kinded Types Emulation
//!
//! Rust has no higher-kinded types, so an effect names "itself with a
//! different output type" through its [`Family`]: a marker type with a
//! generic associated type `Member<A>`. [`Rebind<E, B>`] is shorthand for
//! that lookup, e.g. `Rebind<Reader<Config, i32>, String>` is
//! `Reader<Config, String>`.
//!
//! # Laws
//!
//! With `wrap` the effect type's lift function:
//!
//! - **Left Identity**: `wrap(a).and_then(f)` runs like `f(a)`
//! - **Right Identity**: `m.and_then(wrap)` runs like `m`
//! - **Associativity**: `m.and_then(f).and_then(g)` runs like
//!   `m.and_then(|x| f(x).and_then(g))`
//!
//! # Examples
//!
//! ```rust
//! use bindery::typeclass::{Effect, Rebind};
//!
//! fn increment<E>(effect: E) -> Rebind<E, i32>
//! where
//!     E: Effect<Output = i32>,
//! {
//!     effect.map(|value| value + 1)
//! }
//!
//! assert_eq!(increment(Some(41)), Some(42));
//! assert_eq!(increment(Err::<i32, &str>("boom")), Err("boom"));
//! ```

use std::marker::PhantomData;

/// A type-level effect constructor.
///
/// `Member<A>` is the effect type of this family producing an `A`.
pub trait Family: 'static {
    /// The member of this family whose output is `A`.
    type Member<A: 'static>: Effect<Output = A, Family = Self> + 'static;
}

/// The effect of family `E::Family` producing `B`.
pub type Rebind<E, B> = <<E as Effect>::Family as Family>::Member<B>;

/// The capability contract every effect type implements.
///
/// Construction is referentially transparent for deferred effects:
/// neither `and_then` nor `map` calls the given function; only running
/// the effect does. Eager effects such as `Option` and `Result` call it
/// immediately, which is the same observable behaviour for pure functions.
pub trait Effect: Sized + 'static {
    /// The value this effect eventually produces.
    type Output: 'static;

    /// The family this effect belongs to.
    type Family: Family;

    /// Sequentially composes this effect with a function producing the
    /// next effect.
    ///
    /// `self` fully resolves before `function` is called.
    fn and_then<B, F>(self, function: F) -> Rebind<Self, B>
    where
        B: 'static,
        F: FnOnce(Self::Output) -> Rebind<Self, B> + 'static;

    /// Transforms the eventual result without changing the structure.
    fn map<B, F>(self, function: F) -> Rebind<Self, B>
    where
        B: 'static,
        F: FnOnce(Self::Output) -> B + 'static;

    /// Sequences two effects, discarding the result of the first.
    #[inline]
    fn then<B>(self, next: Rebind<Self, B>) -> Rebind<Self, B>
    where
        B: 'static,
    {
        self.and_then(move |_| next)
    }

    /// Returns the output if it is already present, or the effect itself.
    ///
    /// Eager effects that already hold a value hand it out here, so an
    /// interpreter can continue in a loop instead of calling itself from
    /// inside `and_then`. Deferred effects keep the default and always
    /// return `Err(self)`; extracting from them would run user code while
    /// the effect is still being built.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::typeclass::Effect;
    ///
    /// assert_eq!(Some(1).try_ready(), Ok(1));
    /// assert_eq!(None::<i32>.try_ready(), Err(None));
    /// assert_eq!(Err::<i32, &str>("failed").try_ready(), Err(Err("failed")));
    /// ```
    #[inline]
    fn try_ready(self) -> Result<Self::Output, Self> {
        Err(self)
    }
}

/// Effects that can be run against an ambient argument.
///
/// The ambient argument is the context for a reader, the final
/// continuation for a continuation, and `()` for everything else.
pub trait RunEffect: Effect {
    /// The argument needed to run the effect.
    type Ambient;

    /// What running the effect produces.
    type Outcome;

    /// Runs the effect to completion.
    fn run_effect(self, ambient: Self::Ambient) -> Self::Outcome;
}

// =============================================================================
// Option
// =============================================================================

/// The [`Family`] of `Option`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionFamily;

impl Family for OptionFamily {
    type Member<A: 'static> = Option<A>;
}

impl<T: 'static> Effect for Option<T> {
    type Output = T;
    type Family = OptionFamily;

    #[inline]
    fn and_then<B, F>(self, function: F) -> Option<B>
    where
        B: 'static,
        F: FnOnce(T) -> Option<B> + 'static,
    {
        Self::and_then(self, function)
    }

    #[inline]
    fn map<B, F>(self, function: F) -> Option<B>
    where
        B: 'static,
        F: FnOnce(T) -> B + 'static,
    {
        Self::map(self, function)
    }

    #[inline]
    fn try_ready(self) -> Result<T, Self> {
        self.ok_or(None)
    }
}

impl<T: 'static> RunEffect for Option<T> {
    type Ambient = ();
    type Outcome = Self;

    #[inline]
    fn run_effect(self, (): ()) -> Self {
        self
    }
}

// =============================================================================
// Result
// =============================================================================

/// The [`Family`] of `Result` with error type `E`.
pub struct ResultFamily<E>(PhantomData<fn() -> E>);

impl<E: 'static> Family for ResultFamily<E> {
    type Member<A: 'static> = Result<A, E>;
}

impl<T: 'static, E: 'static> Effect for Result<T, E> {
    type Output = T;
    type Family = ResultFamily<E>;

    #[inline]
    fn and_then<B, F>(self, function: F) -> Result<B, E>
    where
        B: 'static,
        F: FnOnce(T) -> Result<B, E> + 'static,
    {
        Self::and_then(self, function)
    }

    #[inline]
    fn map<B, F>(self, function: F) -> Result<B, E>
    where
        B: 'static,
        F: FnOnce(T) -> B + 'static,
    {
        Self::map(self, function)
    }

    #[inline]
    fn try_ready(self) -> Result<T, Self> {
        self.map_err(Err)
    }
}

impl<T: 'static, E: 'static> RunEffect for Result<T, E> {
    type Ambient = ();
    type Outcome = Self;

    #[inline]
    fn run_effect(self, (): ()) -> Self {
        self
    }
}
