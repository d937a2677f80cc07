//! Generic monadic combinators over any [`Effect`].
//!
//! Each combinator is written once against the [`Effect`] contract and a
//! caller-supplied `wrap` function for the target effect type. There is no
//! registry of lift functions: passing `Reader::wrap`, `Continuation::wrap`,
//! `Trampoline::finished`, `Some` or `Ok` selects the effect type.
//!
//! Results are gathered into a `Vec` in input order. Short-circuiting is
//! whatever the effect's own `and_then` does: a `None`, an `Err`, or a
//! continuation that never calls forward stops the remaining steps.
//!
//! # Examples
//!
//! ```rust
//! use bindery::control::Continuation;
//! use bindery::typeclass::{filter_m, map_m, sequence};
//!
//! type Cont<A> = Continuation<Vec<i32>, A>;
//!
//! let all = sequence(vec![Cont::wrap(1), Cont::wrap(2)], Cont::wrap);
//! assert_eq!(all.run(|values| values), vec![1, 2]);
//!
//! let squares = map_m(|x: i32| Some(x * x), vec![1, 2, 3], Some);
//! assert_eq!(squares, Some(vec![1, 4, 9]));
//!
//! let evens = filter_m(|v: &i32| Cont::wrap(v % 2 == 0), vec![0, 1, 2, 3], Cont::wrap);
//! assert_eq!(evens.run(|values| values), vec![0, 2]);
//! ```

use super::effect::{Effect, Rebind};

/// Composes a sequence of effects into one effect producing all their
/// results, in input order.
///
/// Folds left to right with `and_then`, starting from `wrap(Vec::new())`.
/// An empty input yields `wrap(vec![])`.
///
/// # Examples
///
/// ```rust
/// use bindery::effect::Reader;
/// use bindery::typeclass::sequence;
///
/// let readers: Vec<Reader<i32, i32>> = vec![Reader::ask(), Reader::wrap(2), Reader::asks(|c: i32| c * 10)];
/// assert_eq!(sequence(readers, Reader::wrap).run(3), vec![3, 2, 30]);
///
/// assert_eq!(sequence(vec![Some(1), None, Some(3)], Some), None);
/// ```
pub fn sequence<E, I, W>(effects: I, wrap: W) -> Rebind<E, Vec<E::Output>>
where
    E: Effect,
    I: IntoIterator<Item = E>,
    W: FnOnce(Vec<E::Output>) -> Rebind<E, Vec<E::Output>>,
{
    effects
        .into_iter()
        .fold(wrap(Vec::new()), |accumulated, effect| {
            accumulated.and_then(move |mut values| {
                effect.map(move |value| {
                    values.push(value);
                    values
                })
            })
        })
}

/// Applies an effectful function to every value and gathers the results.
///
/// Equivalent to `sequence(values.map(function), wrap)`.
///
/// # Examples
///
/// ```rust
/// use bindery::typeclass::map_m;
///
/// let parse = |text: &str| text.parse::<i32>().map_err(|_| text.to_string());
/// assert_eq!(map_m(parse, vec!["1", "2"], Ok), Ok(vec![1, 2]));
/// assert_eq!(map_m(parse, vec!["1", "x"], Ok), Err("x".to_string()));
/// ```
pub fn map_m<T, E, I, F, W>(function: F, values: I, wrap: W) -> Rebind<E, Vec<E::Output>>
where
    E: Effect,
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> E,
    W: FnOnce(Vec<E::Output>) -> Rebind<E, Vec<E::Output>>,
{
    sequence(values.into_iter().map(function), wrap)
}

/// Keeps the values whose effectful predicate yields `true`.
///
/// The predicate effects are composed in input order and the kept values
/// keep their relative order.
///
/// # Examples
///
/// ```rust
/// use bindery::effect::Reader;
/// use bindery::typeclass::filter_m;
///
/// // Keep the values above a threshold read from the context.
/// let above = filter_m(
///     |value: &i32| {
///         let value = *value;
///         Reader::asks(move |threshold: i32| value > threshold)
///     },
///     vec![5, 1, 7, 3],
///     Reader::wrap,
/// );
/// assert_eq!(above.run(4), vec![5, 7]);
/// ```
pub fn filter_m<T, E, I, P, W>(mut predicate: P, values: I, wrap: W) -> Rebind<E, Vec<T>>
where
    T: 'static,
    E: Effect<Output = bool>,
    I: IntoIterator<Item = T>,
    P: FnMut(&T) -> E,
    W: FnOnce(Vec<T>) -> Rebind<E, Vec<T>>,
{
    values
        .into_iter()
        .fold(wrap(Vec::new()), |accumulated, value| {
            let keep = predicate(&value);
            accumulated.and_then(move |mut kept| {
                keep.map(move |keep| {
                    if keep {
                        kept.push(value);
                    }
                    kept
                })
            })
        })
}

/// Runs a sequence of effects in order, discarding their results.
///
/// # Examples
///
/// ```rust
/// use bindery::typeclass::sequence_;
///
/// assert_eq!(sequence_(vec![Ok::<i32, &str>(1), Ok(2)], Ok), Ok(()));
/// assert_eq!(sequence_(vec![Ok(1), Err("second")], Ok), Err("second"));
/// ```
pub fn sequence_<E, I, W>(effects: I, wrap: W) -> Rebind<E, ()>
where
    E: Effect,
    I: IntoIterator<Item = E>,
    W: FnOnce(()) -> Rebind<E, ()>,
{
    effects
        .into_iter()
        .fold(wrap(()), |accumulated, effect| {
            accumulated.and_then(move |()| effect.map(|_| ()))
        })
}

/// Applies an effectful function to every value, discarding the results.
pub fn map_m_<T, E, I, F, W>(function: F, values: I, wrap: W) -> Rebind<E, ()>
where
    E: Effect,
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> E,
    W: FnOnce(()) -> Rebind<E, ()>,
{
    sequence_(values.into_iter().map(function), wrap)
}
