//! Effect types and effect-generic interpretation.
//!
//! - [`Reader`]: Computations that read a shared context
//! - [`Procedure`], [`interpret`] and [`with_effect`]: Resumable procedures
//!   interpreted as a single effect
//! - [`catching`]: Lifts a function that may panic into the `Result` effect
//! - [`eff!`](crate::eff): Do-notation over any effect
//!
//! # Examples
//!
//! ```rust
//! use bindery::effect::{with_effect, Reader, Steps};
//!
//! let sum_of_two_reads = with_effect(
//!     |()| {
//!         Steps::new(|values: Vec<i32>| values[0] + values[1])
//!             .step(|_| Reader::ask())
//!             .step(|_| Reader::ask())
//!     },
//!     Reader::wrap,
//! );
//! assert_eq!(sum_of_two_reads(()).run(2), 4);
//! ```

mod catching;
mod eff_macro;
mod procedure;
mod reader;

pub use catching::{Panicked, catching};
pub use procedure::{Interpreted, Next, Procedure, Steps, interpret, with_effect};
pub use reader::{Reader, ReaderFamily};
