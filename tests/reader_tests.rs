//! Unit tests for Reader<R, A>.

#![cfg(feature = "effect")]

use bindery::effect::Reader;
use bindery::typeclass::{Effect, RunEffect};
use rstest::rstest;

#[derive(Clone, Debug, PartialEq)]
struct AppConfig {
    database_url: String,
    max_connections: u32,
    debug: bool,
}

fn config() -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost".to_string(),
        max_connections: 10,
        debug: true,
    }
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn reader_new_with_struct_context() {
    let reader: Reader<AppConfig, u32> = Reader::new(|config: AppConfig| config.max_connections);
    assert_eq!(reader.run(config()), 10);
}

#[rstest]
fn reader_pure_is_alias_for_wrap() {
    let reader: Reader<AppConfig, i32> = Reader::pure(42);
    assert_eq!(reader.run(config()), 42);
}

#[rstest]
fn reader_ask_returns_whole_context() {
    let reader: Reader<AppConfig, AppConfig> = Reader::ask();
    assert_eq!(reader.run(config()), config());
}

#[rstest]
fn reader_from_trampoline_runs_deferred_function() {
    use bindery::control::Trampoline;

    let reader: Reader<i32, i32> =
        Reader::from_trampoline(|context| Trampoline::suspend(move || Trampoline::finished(context + 1)));
    assert_eq!(reader.run(41), 42);
}

// =============================================================================
// Composition
// =============================================================================

#[rstest]
fn reader_ask_and_then_wrap() {
    let reader: Reader<i32, i32> = Reader::ask().and_then(|context| Reader::wrap(context + 1));
    assert_eq!(reader.run(41), 42);
}

#[rstest]
fn reader_flat_map_is_alias_for_and_then() {
    let left: Reader<i32, i32> = Reader::ask().flat_map(|context| Reader::wrap(context * 2));
    let right: Reader<i32, i32> = Reader::ask().and_then(|context| Reader::wrap(context * 2));
    assert_eq!(left.run(21), right.run(21));
}

#[rstest]
fn reader_map_changes_type() {
    let reader: Reader<i32, String> = Reader::ask().map(|context: i32| format!("value={context}"));
    assert_eq!(reader.run(7), "value=7");
}

#[rstest]
fn reader_dependency_injection_pattern() {
    fn connection_string() -> Reader<AppConfig, String> {
        Reader::asks(|config: AppConfig| {
            format!("{}?max={}", config.database_url, config.max_connections)
        })
    }

    fn status() -> Reader<AppConfig, String> {
        connection_string().and_then(|connection| {
            Reader::asks(move |config: AppConfig| {
                if config.debug {
                    format!("[debug] {connection}")
                } else {
                    connection
                }
            })
        })
    }

    assert_eq!(status().run(config()), "[debug] postgres://localhost?max=10");
}

#[rstest]
fn reader_local_applies_only_to_inner_reader() {
    let debug_flag = Reader::asks(|config: AppConfig| config.debug);
    let reader = Reader::local(
        |config: AppConfig| AppConfig {
            debug: false,
            ..config
        },
        debug_flag,
    )
    .and_then(|inner_debug| Reader::asks(move |config: AppConfig| (inner_debug, config.debug)));

    assert_eq!(reader.run(config()), (false, true));
}

#[rstest]
fn reader_local_nested() {
    let reader: Reader<i32, i32> = Reader::local(|r| r + 1, Reader::local(|r| r * 10, Reader::ask()));
    assert_eq!(reader.run(2), 30);
}

// =============================================================================
// Through the Effect trait
// =============================================================================

#[rstest]
fn reader_runs_through_run_effect() {
    let reader: Reader<i32, i32> = Effect::map(Reader::ask(), |context: i32| context + 1);
    assert_eq!(reader.run_effect(1), 2);
}

// =============================================================================
// Edge cases
// =============================================================================

#[rstest]
fn reader_with_unit_context() {
    let reader: Reader<(), i32> = Reader::new(|()| 42);
    assert_eq!(reader.run(()), 42);
}

#[rstest]
fn reader_context_cloned_once_per_bind() {
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Counted(Rc<Cell<u32>>);

    impl Clone for Counted {
        fn clone(&self) -> Self {
            self.0.set(self.0.get() + 1);
            Self(Rc::clone(&self.0))
        }
    }

    let clones = Rc::new(Cell::new(0));
    let reader: Reader<Counted, u32> = Reader::wrap(1)
        .and_then(|a| Reader::wrap(a + 1))
        .and_then(|b| Reader::wrap(b + 1));

    assert_eq!(reader.run(Counted(Rc::clone(&clones))), 3);
    assert_eq!(clones.get(), 2);
}

#[rstest]
#[should_panic(expected = "reader failed")]
fn reader_panic_propagates() {
    let reader: Reader<i32, i32> =
        Reader::ask().and_then(|_| -> Reader<i32, i32> { panic!("reader failed") });
    let _ = reader.run(1);
}
