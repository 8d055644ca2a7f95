use proptest::prelude::*;

/// Asserts that every argument equals the first.
#[allow(unused_macros)]
macro_rules! assert_eq_all {
    ($first:expr, $($rest:expr),+ $(,)?) => {{
        let first = $first;
        $(assert_eq!(first, $rest);)+
    }};
}

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

/// Routes `tracing` output from the map to the test harness.  Filter with
/// `RUST_LOG`, e.g. `RUST_LOG=avl_cursor_map=debug`.
#[allow(dead_code)]
pub(super) fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub(super) type SmallIntPairs = Vec<(u16, u16)>;

#[allow(dead_code)]
pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

// few distinct keys, so that erasures and duplicates hit often
#[allow(dead_code)]
pub(super) fn tiny_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..64u16, 0u16..1024u16), 0..48)
}

#[allow(dead_code)]
pub(super) fn string_u16_pairs() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{0,2}", 0u16..1024u16), 0..512)
}

/// An edit applied to both a map under test and a reference map.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub(super) enum Op {
    Insert(u16, u16),
    Erase(u16),
    Remove(u16),
    EraseAt(u16),
}

#[allow(dead_code)]
pub(super) fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (0u16..128, any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => (0u16..128).prop_map(Op::Erase),
        1 => (0u16..128).prop_map(Op::Remove),
        1 => (0u16..128).prop_map(Op::EraseAt),
    ];
    prop::collection::vec(op, 0..256)
}
