//! `eff!` macro for do-notation over any effect.
//!
//! # Syntax
//!
//! - `pattern <= expression;` binds the result of an effect
//! - `let pattern = expression;` is a pure binding
//! - `expression` is the final effect
//!
//! `<-` is not a single token in Rust macros, so binds are written `<=`.
//!
//! Every bind expands to [`Effect::and_then`](crate::typeclass::Effect::and_then)
//! called through the trait, so the same syntax works for `Option`,
//! `Result`, [`Reader`](crate::effect::Reader),
//! [`Continuation`](crate::control::Continuation) and
//! [`Trampoline`](crate::control::Trampoline).
//!
//! # Examples
//!
//! ```rust
//! use bindery::eff;
//! use bindery::effect::Reader;
//!
//! let computation: Reader<i32, i32> = eff! {
//!     context <= Reader::ask();
//!     let doubled = context * 2;
//!     Reader::wrap(doubled + 1)
//! };
//!
//! assert_eq!(computation.run(10), 21);
//! ```

/// Do-notation over any type implementing
/// [`Effect`](crate::typeclass::Effect).
///
/// ```text
/// eff! {
///     pattern <= effect;        // and_then
///     let pattern = expression; // pure binding
///     effect                    // final effect
/// }
/// ```
///
/// # Examples
///
/// ```rust
/// use bindery::eff;
///
/// let result = eff! {
///     x <= Some(5);
///     y <= Some(10);
///     Some(x + y)
/// };
/// assert_eq!(result, Some(15));
///
/// let result: Option<i32> = eff! {
///     x <= Some(5);
///     y <= None::<i32>;
///     Some(x + y)
/// };
/// assert_eq!(result, None);
/// ```
#[macro_export]
macro_rules! eff {
    // Bind with identifier pattern
    ($pattern:ident <= $effect:expr ; $($rest:tt)+) => {
        $crate::typeclass::Effect::and_then($effect, move |$pattern| {
            $crate::eff!($($rest)+)
        })
    };

    // Bind with tuple pattern
    (($($pattern:tt)*) <= $effect:expr ; $($rest:tt)+) => {
        $crate::typeclass::Effect::and_then($effect, move |($($pattern)*)| {
            $crate::eff!($($rest)+)
        })
    };

    // Bind discarding the result
    (_ <= $effect:expr ; $($rest:tt)+) => {
        $crate::typeclass::Effect::and_then($effect, move |_| {
            $crate::eff!($($rest)+)
        })
    };

    // Pure let binding with identifier
    (let $pattern:ident = $expression:expr ; $($rest:tt)+) => {
        {
            let $pattern = $expression;
            $crate::eff!($($rest)+)
        }
    };

    // Pure let binding with tuple pattern
    (let ($($pattern:tt)*) = $expression:expr ; $($rest:tt)+) => {
        {
            let ($($pattern)*) = $expression;
            $crate::eff!($($rest)+)
        }
    };

    // Final effect
    ($result:expr) => {
        $result
    };
}

#[cfg(test)]
mod tests {
    use crate::control::{Continuation, Trampoline};
    use crate::effect::Reader;

    #[test]
    fn basic_option_bind() {
        let result = eff! {
            x <= Some(5);
            y <= Some(10);
            Some(x + y)
        };
        assert_eq!(result, Some(15));
    }

    #[test]
    fn option_with_let() {
        let result = eff! {
            x <= Some(5);
            let doubled = x * 2;
            Some(doubled)
        };
        assert_eq!(result, Some(10));
    }

    #[test]
    fn option_short_circuit() {
        let result: Option<i32> = eff! {
            x <= Some(5);
            y <= None::<i32>;
            Some(x + y)
        };
        assert_eq!(result, None);
    }

    #[test]
    fn result_bind() {
        let result: Result<i32, &str> = eff! {
            x <= Ok::<i32, &str>(5);
            y <= Ok(10);
            Ok(x + y)
        };
        assert_eq!(result, Ok(15));
    }

    #[test]
    fn single_expression() {
        let result = eff! {
            Some(42)
        };
        assert_eq!(result, Some(42));
    }

    #[test]
    fn wildcard_pattern() {
        let result = eff! {
            _ <= Some(5);
            Some(42)
        };
        assert_eq!(result, Some(42));
    }

    #[test]
    fn tuple_pattern() {
        let result = eff! {
            (a, b) <= Some((1, 2));
            Some(a + b)
        };
        assert_eq!(result, Some(3));
    }

    #[test]
    fn reader_reads_context_twice() {
        let reader: Reader<i32, i32> = eff! {
            a <= Reader::ask();
            b <= Reader::ask();
            Reader::wrap(a + b)
        };
        assert_eq!(reader.run(2), 4);
    }

    #[test]
    fn continuation_bind() {
        let cont: Continuation<i32, i32> = eff! {
            x <= Continuation::wrap(1);
            Continuation::wrap(x + 1)
        };
        assert_eq!(cont.run(|x| x), 2);
    }

    #[test]
    fn trampoline_bind_is_lazy() {
        let trampoline: Trampoline<i32> = eff! {
            x <= Trampoline::suspend(|| Trampoline::finished(20));
            let y = x + 1;
            Trampoline::finished(y * 2)
        };
        assert!(!trampoline.is_finished());
        assert_eq!(trampoline.run(), 42);
    }
}
