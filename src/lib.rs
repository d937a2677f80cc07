//! # bindery
//!
//! Stack-safe effect composition for Rust.
//!
//! ## Overview
//!
//! - **Trampoline**: Deferred computations evaluated by an iterative loop,
//!   so arbitrarily long `and_then` chains never overflow the stack
//! - **Effect contract**: One trait ([`typeclass::Effect`]) with bind and map,
//!   implemented by every effect type
//! - **Combinators**: `sequence`, `map_m`, `filter_m` and procedure
//!   interpretation, written once for every effect
//! - **Effects**: Reader and Continuation, both built on the trampoline
//!
//! ## Feature Flags
//!
//! - `typeclass`: The effect contract and generic combinators
//! - `control`: Trampoline and Continuation
//! - `effect`: Reader, procedures and the `eff!` macro
//! - `tracing`: Emit `tracing` events from the trampoline runner
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use bindery::prelude::*;
//!
//! let reader: Reader<i32, Vec<i32>> = sequence(
//!     vec![Reader::ask(), Reader::wrap(2), Reader::asks(|context: i32| context * 10)],
//!     Reader::wrap,
//! );
//! assert_eq!(reader.run(3), vec![3, 2, 30]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports every public item of the enabled modules.
///
/// # Usage
///
/// ```rust
/// use bindery::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "effect")]
    pub use crate::effect::*;

    #[cfg(feature = "effect")]
    pub use crate::eff;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "effect")]
pub mod effect;
