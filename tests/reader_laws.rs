//! Property-based tests for Reader<R, A> laws.
//!
//! - **Functor Laws**: identity and composition
//! - **Monad Laws**: left identity, right identity, associativity
//! - **Context Laws**: ask retrieval, local identity, local composition

#![cfg(feature = "effect")]

use bindery::effect::Reader;
use proptest::prelude::*;

fn reader_add(x: i32) -> Reader<i32, i32> {
    Reader::new(move |context: i32| x.wrapping_add(context))
}

fn reader_multiply(x: i32) -> Reader<i32, i32> {
    Reader::new(move |context: i32| x.wrapping_mul(context))
}

// =============================================================================
// Functor Laws
// =============================================================================

proptest! {
    /// Functor Identity: reader.map(|x| x).run(r) == reader.run(r)
    #[test]
    fn prop_reader_functor_identity(context in any::<i32>()) {
        let left = reader_add(1).map(|x| x).run(context);
        let right = reader_add(1).run(context);

        prop_assert_eq!(left, right);
    }
}

proptest! {
    /// Functor Composition: reader.map(f).map(g) == reader.map(|x| g(f(x)))
    #[test]
    fn prop_reader_functor_composition(context in any::<i32>()) {
        fn function1(n: i32) -> i32 { n.wrapping_add(1) }
        fn function2(n: i32) -> String { n.to_string() }

        let left = reader_add(0).map(function1).map(function2).run(context);
        let right = reader_add(0).map(|x| function2(function1(x))).run(context);

        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    /// Left Identity: Reader::wrap(a).and_then(f).run(r) == f(a).run(r)
    #[test]
    fn prop_reader_monad_left_identity(value in any::<i32>(), context in any::<i32>()) {
        let left = Reader::wrap(value).and_then(reader_add).run(context);
        let right = reader_add(value).run(context);

        prop_assert_eq!(left, right);
    }
}

proptest! {
    /// Right Identity: m.and_then(Reader::wrap).run(r) == m.run(r)
    #[test]
    fn prop_reader_monad_right_identity(value in any::<i32>(), context in any::<i32>()) {
        let left = reader_multiply(value).and_then(Reader::wrap).run(context);
        let right = reader_multiply(value).run(context);

        prop_assert_eq!(left, right);
    }
}

proptest! {
    /// Associativity:
    /// m.and_then(f).and_then(g) == m.and_then(|x| f(x).and_then(g))
    #[test]
    fn prop_reader_monad_associativity(value in any::<i32>(), context in any::<i32>()) {
        let left = reader_add(value)
            .and_then(reader_multiply)
            .and_then(reader_add)
            .run(context);
        let right = reader_add(value)
            .and_then(|x| reader_multiply(x).and_then(reader_add))
            .run(context);

        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Context Laws
// =============================================================================

proptest! {
    /// Ask Retrieval: Reader::ask().run(r) == r
    #[test]
    fn prop_reader_ask_retrieval(context in any::<i32>()) {
        prop_assert_eq!(Reader::<i32, i32>::ask().run(context), context);
    }
}

proptest! {
    /// Local Identity: Reader::local(|r| r, m).run(r) == m.run(r)
    #[test]
    fn prop_reader_local_identity(value in any::<i32>(), context in any::<i32>()) {
        let left = Reader::local(|r| r, reader_add(value)).run(context);
        let right = reader_add(value).run(context);

        prop_assert_eq!(left, right);
    }
}

proptest! {
    /// Local Composition:
    /// Reader::local(f, Reader::local(g, m)) == Reader::local(|r| g(f(r)), m)
    #[test]
    fn prop_reader_local_composition(context in -1000i32..1000i32) {
        fn outer(r: i32) -> i32 { r + 1 }
        fn inner(r: i32) -> i32 { r * 2 }

        let left = Reader::local(outer, Reader::local(inner, Reader::ask())).run(context);
        let right = Reader::local(|r| inner(outer(r)), Reader::ask()).run(context);

        prop_assert_eq!(left, right);
    }
}

proptest! {
    /// asks is ask followed by map
    #[test]
    fn prop_reader_ask_asks_equivalence(context in any::<i32>()) {
        let from_asks = Reader::asks(|r: i32| r.wrapping_mul(3)).run(context);
        let from_ask = Reader::ask().map(|r: i32| r.wrapping_mul(3)).run(context);

        prop_assert_eq!(from_asks, from_ask);
    }
}

proptest! {
    /// then discards the first result but still sees the context
    #[test]
    fn prop_reader_then_discards_first(context in any::<i32>(), value in any::<i32>()) {
        let reader = reader_add(value).then(Reader::ask());

        prop_assert_eq!(reader.run(context), context);
    }
}
