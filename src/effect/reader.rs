//! Reader effect - computations that read a shared context.
//!
//! A `Reader<R, A>` wraps a one-shot function from a context `R` to a
//! trampolined result `A`. Composing readers threads the same context
//! through every step without passing it by hand.
//!
//! A reader keeps its first computation plus a flat list of the maps and
//! binds composed onto it. Running turns that list into one trampoline
//! chain, so a reader built from any number of `and_then` calls runs, and
//! is dropped, in bounded native stack.
//!
//! # Laws
//!
//! ## Monad Laws
//!
//! - Left Identity: `Reader::wrap(a).and_then(f).run(r) == f(a).run(r)`
//! - Right Identity: `m.and_then(Reader::wrap).run(r) == m.run(r)`
//! - Associativity: `m.and_then(f).and_then(g).run(r) == m.and_then(|x| f(x).and_then(g)).run(r)`
//!
//! ## Context Laws
//!
//! - Ask Retrieval: `Reader::ask().run(r) == r`
//! - Local Identity: `Reader::local(|r| r, m).run(r) == m.run(r)`
//!
//! # Examples
//!
//! ```rust
//! use bindery::effect::Reader;
//!
//! let reader: Reader<i32, i32> = Reader::ask().and_then(|context| Reader::wrap(context + 1));
//! assert_eq!(reader.run(41), 42);
//! ```
//!
//! Dependency injection:
//!
//! ```rust
//! use bindery::effect::Reader;
//!
//! #[derive(Clone)]
//! struct Config {
//!     port: u16,
//!     host: String,
//! }
//!
//! fn address() -> Reader<Config, String> {
//!     Reader::asks(|config: Config| config.host).and_then(|host| {
//!         Reader::asks(move |config: Config| format!("{host}:{}", config.port))
//!     })
//! }
//!
//! let config = Config { port: 8080, host: "localhost".to_string() };
//! assert_eq!(address().run(config), "localhost:8080");
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::control::{ErasedValue, Trampoline, unerase};
use crate::typeclass::{Effect, Family, RunEffect};

/// The first computation of a reader, applied to the context.
type ReaderHead<R> = Box<dyn FnOnce(R) -> Trampoline<ErasedValue>>;

/// A step composed after the head. Binds receive their own copy of the
/// context.
enum Link<R> {
    Map(Box<dyn FnOnce(ErasedValue) -> ErasedValue>),
    Bind(Box<dyn FnOnce(ErasedValue, R) -> Trampoline<ErasedValue>>),
}

/// An effect for computations that depend on a read-only context.
///
/// # Type Parameters
///
/// - `R`: The context type
/// - `A`: The result type
///
/// A reader is consumed by running or composing it. The context must be
/// `Clone` because every bind hands it to both sides; a reader with `n`
/// binds clones it `n` times per run.
pub struct Reader<R, A> {
    head: ReaderHead<R>,
    links: Vec<Link<R>>,
    _result: PhantomData<fn() -> A>,
}

impl<R: Clone + 'static, A: 'static> Reader<R, A> {
    /// Creates a reader from a plain function of the context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::new(|context| context * 2);
    /// assert_eq!(reader.run(21), 42);
    /// ```
    pub fn new<F>(function: F) -> Self
    where
        F: FnOnce(R) -> A + 'static,
    {
        Self::from_head(Box::new(move |context| {
            Trampoline::finished(Box::new(function(context)) as ErasedValue)
        }))
    }

    /// Creates a reader from a function returning a trampoline.
    pub fn from_trampoline<F>(function: F) -> Self
    where
        F: FnOnce(R) -> Trampoline<A> + 'static,
    {
        Self::from_head(Box::new(move |context| {
            function(context).map(|value| Box::new(value) as ErasedValue)
        }))
    }

    fn from_head(head: ReaderHead<R>) -> Self {
        Self {
            head,
            links: Vec::new(),
            _result: PhantomData,
        }
    }

    /// Lifts a pure value, ignoring the context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::effect::Reader;
    ///
    /// let reader: Reader<i32, &str> = Reader::wrap("constant");
    /// assert_eq!(reader.run(0), "constant");
    /// ```
    pub fn wrap(value: A) -> Self {
        Self::from_head(Box::new(move |_| Trampoline::finished(Box::new(value) as ErasedValue)))
    }

    /// Alias for [`wrap`](Reader::wrap).
    #[inline]
    pub fn pure(value: A) -> Self {
        Self::wrap(value)
    }

    /// Creates a reader that projects a value out of the context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::effect::Reader;
    ///
    /// #[derive(Clone)]
    /// struct Config { port: u16 }
    ///
    /// let reader: Reader<Config, u16> = Reader::asks(|config: Config| config.port);
    /// assert_eq!(reader.run(Config { port: 8080 }), 8080);
    /// ```
    pub fn asks<F>(projection: F) -> Self
    where
        F: FnOnce(R) -> A + 'static,
    {
        Self::new(projection)
    }

    /// Runs `computation` against a context transformed by `modifier`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::new(|context| context * 2);
    /// let local_reader = Reader::local(|context| context + 10, reader);
    /// assert_eq!(local_reader.run(5), 30);
    /// ```
    pub fn local<F>(modifier: F, computation: Self) -> Self
    where
        F: FnOnce(R) -> R + 'static,
    {
        Self::from_head(Box::new(move |context: R| computation.into_erased(modifier(context))))
    }

    /// Runs the reader against `context`.
    pub fn run(self, context: R) -> A {
        self.into_trampoline(context).run()
    }

    /// Applies the context without driving the result.
    pub fn into_trampoline(self, context: R) -> Trampoline<A> {
        self.into_erased(context).map(unerase::<A>)
    }

    /// Lays the head and every link out as one trampoline chain.
    ///
    /// The context is shared until a bind runs; the last holder gets the
    /// original instead of a clone.
    fn into_erased(self, context: R) -> Trampoline<ErasedValue> {
        let Self { head, links, .. } = self;
        let shared = Rc::new(context);
        let head_context = Rc::clone(&shared);
        links.into_iter().fold(
            Trampoline::suspend(move || head(take_context(head_context))),
            |trampoline, link| match link {
                Link::Map(function) => trampoline.map(function),
                Link::Bind(function) => {
                    let context = Rc::clone(&shared);
                    trampoline.and_then(move |value| function(value, take_context(context)))
                }
            },
        )
    }

    fn push<B>(self, link: Link<R>) -> Reader<R, B> {
        let Self {
            head, mut links, ..
        } = self;
        links.push(link);
        Reader {
            head,
            links,
            _result: PhantomData,
        }
    }

    /// Transforms the result of this reader.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::effect::Reader;
    ///
    /// let reader = Reader::new(|context: i32| context).map(|value| value.to_string());
    /// assert_eq!(reader.run(42), "42");
    /// ```
    pub fn map<B: 'static, F>(self, function: F) -> Reader<R, B>
    where
        F: FnOnce(A) -> B + 'static,
    {
        self.push(Link::Map(Box::new(move |value: ErasedValue| -> ErasedValue {
            Box::new(function(unerase::<A>(value)))
        })))
    }

    /// Chains a function producing the next reader.
    ///
    /// Both readers see the same context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::ask();
    /// let chained = reader.and_then(|value| Reader::new(move |context| value + context));
    /// assert_eq!(chained.run(10), 20);
    /// ```
    pub fn and_then<B: 'static, F>(self, function: F) -> Reader<R, B>
    where
        F: FnOnce(A) -> Reader<R, B> + 'static,
    {
        self.push(Link::Bind(Box::new(move |value: ErasedValue, context: R| {
            function(unerase::<A>(value)).into_erased(context)
        })))
    }

    /// Alias for [`and_then`](Reader::and_then).
    #[inline]
    pub fn flat_map<B: 'static, F>(self, function: F) -> Reader<R, B>
    where
        F: FnOnce(A) -> Reader<R, B> + 'static,
    {
        self.and_then(function)
    }

    /// Sequences two readers, discarding the result of the first.
    #[inline]
    #[must_use]
    pub fn then<B: 'static>(self, next: Reader<R, B>) -> Reader<R, B> {
        self.and_then(move |_| next)
    }
}

impl<R: Clone + 'static> Reader<R, R> {
    /// Creates a reader that yields the whole context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::ask();
    /// assert_eq!(reader.run(42), 42);
    /// ```
    #[must_use]
    pub fn ask() -> Self {
        Self::new(|context| context)
    }
}

fn take_context<R: Clone>(shared: Rc<R>) -> R {
    Rc::try_unwrap(shared).unwrap_or_else(|shared| R::clone(&shared))
}

// =============================================================================
// Effect Instance
// =============================================================================

/// The [`Family`] of [`Reader`] values over context `R`.
pub struct ReaderFamily<R>(PhantomData<fn() -> R>);

impl<R: Clone + 'static> Family for ReaderFamily<R> {
    type Member<A: 'static> = Reader<R, A>;
}

impl<R: Clone + 'static, A: 'static> Effect for Reader<R, A> {
    type Output = A;
    type Family = ReaderFamily<R>;

    fn and_then<B, F>(self, function: F) -> Reader<R, B>
    where
        B: 'static,
        F: FnOnce(A) -> Reader<R, B> + 'static,
    {
        Self::and_then(self, function)
    }

    fn map<B, F>(self, function: F) -> Reader<R, B>
    where
        B: 'static,
        F: FnOnce(A) -> B + 'static,
    {
        Self::map(self, function)
    }
}

impl<R: Clone + 'static, A: 'static> RunEffect for Reader<R, A> {
    type Ambient = R;
    type Outcome = A;

    fn run_effect(self, context: R) -> A {
        self.run(context)
    }
}

impl<R, A> fmt::Debug for Reader<R, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Reader").finish_non_exhaustive()
    }
}

static_assertions::assert_not_impl_any!(Reader<i32, i32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;
    use std::rc::Rc;

    #[rstest]
    fn reader_new_and_run() {
        let reader: Reader<i32, i32> = Reader::new(|context| context * 2);
        assert_eq!(reader.run(21), 42);
    }

    #[rstest]
    fn reader_wrap_ignores_context() {
        let reader: Reader<i32, &str> = Reader::wrap("constant");
        assert_eq!(reader.run(0), "constant");
    }

    #[rstest]
    fn reader_ask_then_wrap() {
        let reader: Reader<i32, i32> = Reader::ask().and_then(|context| Reader::wrap(context + 1));
        assert_eq!(reader.run(41), 42);
    }

    #[rstest]
    fn reader_asks_projects_context() {
        let reader: Reader<i32, String> = Reader::asks(|context: i32| context.to_string());
        assert_eq!(reader.run(42), "42");
    }

    #[rstest]
    fn reader_local_modifies_context_for_inner_only() {
        let inner: Reader<i32, i32> = Reader::ask();
        let reader = Reader::local(|context| context * 10, inner)
            .and_then(|scaled| Reader::new(move |context: i32| (scaled, context)));
        assert_eq!(reader.run(3), (30, 3));
    }

    #[rstest]
    fn reader_then_discards_first() {
        let reader: Reader<i32, i32> = Reader::wrap("ignored").then(Reader::ask());
        assert_eq!(reader.run(7), 7);
    }

    #[rstest]
    fn reader_composition_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let reader: Reader<i32, i32> = Reader::ask()
            .map(move |context| {
                counter.set(counter.get() + 1);
                context
            })
            .and_then(|context| Reader::wrap(context + 1));
        assert_eq!(calls.get(), 0);
        assert_eq!(reader.run(1), 2);
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn reader_into_trampoline_defers_evaluation() {
        let trampoline = Reader::<i32, i32>::ask().map(|context| context + 1).into_trampoline(1);
        assert!(!trampoline.is_finished());
        assert_eq!(trampoline.run(), 2);
    }

    #[rstest]
    fn reader_long_chain_is_stack_safe() {
        let chain = (0..100_000).fold(Reader::<u64, u64>::ask(), |reader, _| {
            reader.and_then(|value| Reader::new(move |step: u64| value + step))
        });
        assert_eq!(chain.run(1), 100_001);
    }

    #[rstest]
    fn reader_dropped_without_running_is_stack_safe() {
        let chain = (0..100_000).fold(Reader::<u64, u64>::wrap(0), |reader, _| {
            reader.and_then(|value| Reader::wrap(value + 1)).map(|value| value + 1)
        });
        drop(chain);
    }

    #[rstest]
    fn reader_without_binds_never_clones_context() {
        #[derive(Debug)]
        struct NoClones;

        impl Clone for NoClones {
            fn clone(&self) -> Self {
                panic!("context was cloned")
            }
        }

        let reader: Reader<NoClones, i32> = Reader::new(|_| 1).map(|value| value + 1);
        assert_eq!(reader.run(NoClones), 2);
    }

    #[rstest]
    fn reader_debug_is_opaque() {
        let reader: Reader<i32, i32> = Reader::ask();
        assert_eq!(format!("{reader:?}"), "Reader { .. }");
    }
}
