//! Lifting functions that may panic into the `Result` effect.
//!
//! [`catching`] turns a plain function into one that returns `Ok` with its
//! value, or `Err(Panicked)` when it panics. The lifted function composes
//! with [`Effect::and_then`](crate::typeclass::Effect::and_then), the
//! combinators and [`eff!`](crate::eff) like any other `Result`-returning
//! function.
//!
//! The panic hook still runs before the panic is caught, so the default
//! hook prints the message to standard error.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// The error produced when a function lifted by [`catching`] panicked.
///
/// # Examples
///
/// ```rust
/// use bindery::effect::Panicked;
///
/// let error = Panicked { message: "index out of bounds".to_string() };
/// assert_eq!(format!("{error}"), "function panicked: index out of bounds");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked {
    /// The panic message, or `"unknown panic"` when the payload was not a
    /// string.
    pub message: String,
}

impl Panicked {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { message }
    }
}

impl std::fmt::Display for Panicked {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "function panicked: {}", self.message)
    }
}

impl std::error::Error for Panicked {}

/// Lifts `function` into the `Result` effect, turning a panic into
/// `Err(Panicked)`.
///
/// # Examples
///
/// ```rust
/// use bindery::effect::catching;
///
/// let parse = catching(|text: &str| text.parse::<i32>().expect("not a number"));
///
/// assert_eq!(parse("12"), Ok(12));
/// assert!(parse("twelve").unwrap_err().message.contains("not a number"));
/// ```
pub fn catching<A, B, F>(function: F) -> impl Fn(A) -> Result<B, Panicked>
where
    F: Fn(A) -> B,
{
    move |argument| {
        catch_unwind(AssertUnwindSafe(|| function(argument)))
            .map_err(|payload| Panicked::from_payload(payload.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeclass::Effect;
    use rstest::rstest;

    fn checked_index(index: usize) -> i32 {
        [10, 20, 30][index]
    }

    #[rstest]
    #[case(0, Ok(10))]
    #[case(2, Ok(30))]
    fn lifted_function_returns_its_value(#[case] index: usize, #[case] expected: Result<i32, Panicked>) {
        assert_eq!(catching(checked_index)(index), expected);
    }

    #[rstest]
    fn panic_becomes_error_with_message() {
        let error = catching(checked_index)(5).unwrap_err();
        assert!(error.message.contains("index out of bounds"));
    }

    #[rstest]
    fn formatted_panic_message_is_kept() {
        let divide = catching(|divisor: i32| {
            if divisor == 0 {
                panic!("cannot divide {} by zero", 12);
            }
            12 / divisor
        });
        assert_eq!(divide(4), Ok(3));
        assert_eq!(
            divide(0),
            Err(Panicked {
                message: "cannot divide 12 by zero".to_string()
            })
        );
    }

    #[rstest]
    fn non_string_payload_is_reported_as_unknown() {
        let lifted = catching(|()| -> i32 { std::panic::panic_any(7_u8) });
        assert_eq!(lifted(()).unwrap_err().message, "unknown panic");
    }

    fn halve() -> impl Fn(i32) -> Result<i32, Panicked> {
        catching(|value: i32| {
            assert!(value % 2 == 0, "odd value");
            value / 2
        })
    }

    #[rstest]
    fn lifted_function_composes_as_result_effect() {
        let quarter = Effect::and_then(halve()(8), |half| halve()(half));
        assert_eq!(quarter, Ok(2));
        let failed = Effect::and_then(halve()(6), |half| halve()(half));
        assert_eq!(failed.unwrap_err().message, "odd value");
    }
}
