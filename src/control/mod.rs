//! Control structures for stack-safe evaluation.
//!
//! - [`Trampoline`]: Deferred computations driven by an iterative loop
//! - [`Continuation`]: Continuation-passing computations built on the trampoline
//! - [`TrampolineError`]: Failure of bounded evaluation
//!
//! # Examples
//!
//! ## Stack-Safe Recursion
//!
//! ```rust
//! use bindery::control::Trampoline;
//!
//! fn factorial(n: u64) -> Trampoline<u64> {
//!     factorial_helper(n, 1)
//! }
//!
//! fn factorial_helper(n: u64, accumulator: u64) -> Trampoline<u64> {
//!     if n <= 1 {
//!         Trampoline::finished(accumulator)
//!     } else {
//!         Trampoline::suspend(move || factorial_helper(n - 1, n * accumulator))
//!     }
//! }
//!
//! assert_eq!(factorial(10).run(), 3_628_800);
//! ```
//!
//! ## Bounded Evaluation
//!
//! ```rust
//! use bindery::control::{Trampoline, TrampolineError};
//!
//! fn forever() -> Trampoline<()> {
//!     Trampoline::suspend(forever)
//! }
//!
//! assert_eq!(
//!     forever().run_bounded(1_000),
//!     Err(TrampolineError::StepLimitExceeded { limit: 1_000 })
//! );
//! ```

mod continuation;
mod error;
mod trampoline;

pub use continuation::{Continuation, ContinuationFamily, ContinuationFunction};
pub use error::TrampolineError;
pub use trampoline::{Suspended, Trampoline, TrampolineFamily};

pub(crate) use trampoline::{ErasedValue, unerase};
