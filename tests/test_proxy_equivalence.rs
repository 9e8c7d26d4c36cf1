use guile_shim::heap::{abi::*, global, Heap};
use guile_shim::{Primitives, Scm};
use proptest::prelude::*;

/// One value of every shape the heap can hold.
fn sample_values(heap: &Heap) -> Vec<Scm> {
    let class = heap.make_class("<sample>", None);
    vec![
        heap.bool_t(),
        heap.bool_f(),
        heap.eol(),
        heap.undefined(),
        heap.unspecified(),
        heap.symbol("sample"),
        heap.string("sample"),
        heap.cons(heap.bool_t(), heap.eol()),
        heap.cons(heap.symbol("k"), heap.string("v")),
        class,
        heap.make_instance(class),
    ]
}

#[test]
fn test_constants_are_idempotent() {
    assert!(gu_scm_is_eq(gu_SCM_BOOL_T(), gu_SCM_BOOL_T()));
    assert!(gu_scm_is_eq(gu_SCM_BOOL_F(), gu_SCM_BOOL_F()));
    assert!(gu_scm_is_eq(gu_SCM_UNDEFINED(), gu_SCM_UNDEFINED()));
    assert!(gu_scm_is_eq(gu_SCM_UNSPECIFIED(), gu_SCM_UNSPECIFIED()));
    assert!(gu_scm_is_eq(gu_SCM_EOL(), gu_SCM_EOL()));
    assert!(gu_scm_is_eq(gu_SCM_UNBOUND(), gu_SCM_UNBOUND()));
}

#[test]
fn test_constants_match_backend() {
    let heap = global();
    assert_eq!(gu_SCM_BOOL_T(), heap.bool_t());
    assert_eq!(gu_SCM_BOOL_F(), heap.bool_f());
    assert_eq!(gu_SCM_UNDEFINED(), heap.undefined());
    assert_eq!(gu_SCM_EOL(), heap.eol());
    assert!(!gu_scm_is_eq(gu_SCM_BOOL_T(), gu_SCM_BOOL_F()));
}

#[test]
fn test_unary_proxies_match_primitives() {
    let heap = global();
    for x in sample_values(heap) {
        assert_eq!(gu_SCM_UNPACK(x), heap.unpack(x));
        assert_eq!(gu_scm_is_false(x), heap.is_false(x));
        assert_eq!(gu_scm_is_true(x), heap.is_true(x));
        assert_eq!(gu_scm_is_bool(x), heap.is_bool(x));
        assert_eq!(gu_scm_is_null(x), heap.is_null(x));
        assert_eq!(gu_scm_is_pair(x), heap.is_pair(x));
        assert_eq!(gu_scm_is_symbol(x), heap.is_symbol(x));
        assert_eq!(gu_scm_is_string(x), heap.is_string(x));
        assert_eq!(gu_SCM_UNBNDP(x), heap.is_unbound(x));
        if heap.is_pair(x) {
            assert_eq!(gu_scm_car(x), heap.car(x));
            assert_eq!(gu_scm_cdr(x), heap.cdr(x));
        }
    }
}

#[test]
fn test_binary_proxies_match_primitives() {
    let heap = global();
    let values = sample_values(heap);
    for &x in &values {
        for &y in &values {
            assert_eq!(gu_scm_is_eq(x, y), heap.is_eq(x, y));
            assert_eq!(gu_SCM_IS_A_P(x, y), heap.is_a(x, y));
        }
    }
}

#[test]
fn test_predicate_precision() {
    let heap = global();
    let f = gu_SCM_BOOL_F();
    let t = gu_SCM_BOOL_T();
    let pair = gu_scm_cons(t, f);
    let sym = heap.symbol("precision");
    let s = heap.string("precision");

    assert!(gu_scm_is_false(f));
    assert!(!gu_scm_is_true(f));
    for truthy in [t, pair, sym, s] {
        assert!(gu_scm_is_true(truthy));
        assert!(!gu_scm_is_false(truthy));
    }

    assert!(gu_scm_is_pair(pair) && !gu_scm_is_symbol(pair) && !gu_scm_is_string(pair));
    assert!(gu_scm_is_symbol(sym) && !gu_scm_is_pair(sym) && !gu_scm_is_string(sym));
    assert!(gu_scm_is_string(s) && !gu_scm_is_pair(s) && !gu_scm_is_symbol(s));

    // '() and the undefined object are well-formed inputs too
    assert!(gu_scm_is_null(gu_SCM_EOL()));
    assert!(!gu_scm_is_pair(gu_SCM_EOL()));
    assert!(!gu_scm_is_null(gu_SCM_UNDEFINED()));
    assert!(!gu_scm_is_bool(gu_SCM_UNDEFINED()));

    assert!(gu_SCM_UNBNDP(gu_SCM_UNDEFINED()));
    assert!(!gu_SCM_UNBNDP(gu_SCM_UNBOUND()));
    assert!(!gu_SCM_UNBNDP(gu_SCM_EOL()));
}

#[test]
fn test_eq_is_identity_not_structure() {
    let heap = global();
    let a = heap.string("text");
    let b = heap.string("text");
    assert!(!gu_scm_is_eq(a, b));
    assert!(gu_scm_is_eq(a, a));

    let p = gu_scm_cons(gu_SCM_BOOL_T(), gu_SCM_EOL());
    let q = gu_scm_cons(gu_SCM_BOOL_T(), gu_SCM_EOL());
    assert!(!gu_scm_is_eq(p, q));
}

#[test]
fn test_is_a_proxy() {
    let heap = global();
    let base = heap.make_class("<base>", None);
    let derived = heap.make_class("<derived>", Some(base));
    let obj = heap.make_instance(derived);

    assert!(gu_SCM_IS_A_P(obj, derived));
    assert!(gu_SCM_IS_A_P(obj, base));
    assert!(!gu_SCM_IS_A_P(gu_SCM_BOOL_T(), base));
}

#[test]
fn test_setcdr_proxy() {
    let pair = gu_scm_cons(gu_SCM_BOOL_T(), gu_SCM_EOL());
    gu_SCM_SETCDR(pair, gu_SCM_BOOL_F());
    assert!(gu_scm_is_false(gu_scm_cdr(pair)));
}

#[test]
fn test_diagnostic_entry_point() {
    let entry: extern "C" fn() = guile_shim::gu_test_func;
    entry();
    entry();
}

fn atom(heap: &Heap, pick: u8, text: &str) -> Scm {
    match pick % 6 {
        0 => heap.bool_t(),
        1 => heap.bool_f(),
        2 => heap.eol(),
        3 => heap.undefined(),
        4 => heap.symbol(text),
        _ => heap.string(text),
    }
}

proptest! {
    #[test]
    fn prop_cons_round_trip(pa in any::<u8>(), pb in any::<u8>(), text in "[a-z]{1,8}") {
        let heap = global();
        let a = atom(heap, pa, &text);
        let b = atom(heap, pb, &text);
        let pair = gu_scm_cons(a, b);

        prop_assert!(gu_scm_is_eq(gu_scm_car(pair), a));
        prop_assert!(gu_scm_is_eq(gu_scm_cdr(pair), b));
    }

    #[test]
    fn prop_predicates_agree(pick in any::<u8>(), text in "[a-z]{1,8}") {
        let heap = global();
        let x = atom(heap, pick, &text);

        prop_assert_eq!(gu_scm_is_true(x), heap.is_true(x));
        prop_assert_eq!(gu_scm_is_symbol(x), heap.is_symbol(x));
        prop_assert_eq!(gu_scm_is_string(x), heap.is_string(x));
        prop_assert_eq!(gu_scm_is_true(x), !gu_scm_is_false(x));
    }
}
