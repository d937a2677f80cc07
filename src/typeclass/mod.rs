//! The effect capability contract and the combinators written against it.
//!
//! - [`Effect`] and [`RunEffect`]: What every effect type provides
//! - [`Family`] and [`Rebind`]: Naming an effect type with another output
//! - [`sequence`], [`map_m`], [`filter_m`], [`sequence_`], [`map_m_`]:
//!   Generic combinators taking an explicit `wrap` function
//!
//! # Examples
//!
//! ```rust
//! use bindery::typeclass::sequence;
//!
//! let all = sequence(vec![Ok::<i32, String>(1), Ok(2)], Ok);
//! assert_eq!(all, Ok(vec![1, 2]));
//! ```

mod combinators;
mod effect;

pub use combinators::{filter_m, map_m, map_m_, sequence, sequence_};
pub use effect::{Effect, Family, OptionFamily, Rebind, ResultFamily, RunEffect};
