use progress_core::demangle::{demangle, demangle_segments, is_mangled};

fn joined(raw: &str) -> String {
    demangle(raw).to_string()
}

#[test]
fn plain_names_are_returned_unchanged() {
    for plain in ["nnMain", "sinit", "ksys::act::Foo", "operator new", "x"] {
        let name = demangle(plain);
        assert_eq!(name.len(), 1, "{plain} should stay a single segment");
        assert_eq!(name.to_string(), plain);
    }
}

#[test]
fn empty_input_is_a_plain_name() {
    let name = demangle("");
    assert_eq!(name.len(), 1);
    assert_eq!(name.to_string(), "");
    assert!(!is_mangled(""));
}

#[test]
fn golden_table_of_encoding_shapes() {
    let cases = [
        ("_ZN3Foo3barEv", "Foo::bar"),
        ("_ZN4ksys3act12BaseProcLink4initEv", "ksys::act::BaseProcLink::init"),
        ("_ZNK4ksys3res6Handle7isReadyEv", "ksys::res::Handle::isReady"),
        ("_Z6nnMainv", "nnMain"),
        ("_ZN4ksys3act12BaseProcLinkC2Ev", "ksys::act::BaseProcLink::BaseProcLink"),
        ("_ZN4ksys3act12BaseProcLinkC1ERKS1_", "ksys::act::BaseProcLink::BaseProcLink"),
        ("_ZN4ksys3act12BaseProcLinkD0Ev", "ksys::act::BaseProcLink::~BaseProcLink"),
        ("_ZN5uking2ui9PauseMenuD2Ev", "uking::ui::PauseMenu::~PauseMenu"),
    ];
    for (raw, expected) in cases {
        assert_eq!(joined(raw), expected, "demangling {raw}");
    }
}

#[test]
fn constructor_and_destructor_add_a_segment() {
    let ctor = demangle("_ZN4ksys3FooC1Ev");
    assert_eq!(ctor.segments(), ["ksys", "Foo", "Foo"]);
    assert_eq!(ctor.owner(), Some("Foo"));

    let dtor = demangle("_ZN4ksys3FooD1Ev");
    assert_eq!(dtor.segments(), ["ksys", "Foo", "~Foo"]);
    assert_eq!(dtor.owner(), Some("Foo"));
}

#[test]
fn truncated_length_prefix_keeps_complete_segments() {
    // "3ac" promises three characters but only two remain.
    assert_eq!(demangle("_ZN4ksys3ac").segments(), ["ksys"]);
    assert_eq!(demangle("_ZN4ksys3act99").segments(), ["ksys", "act"]);
    assert_eq!(demangle("_ZN4ksys3act12Base").segments(), ["ksys", "act"]);
}

#[test]
fn truncated_output_never_exceeds_complete_runs() {
    let raw = "_ZN4ksys3act12BaseProcLink4in";
    let segments = demangle_segments(raw);
    assert!(segments.len() <= 3);
    assert_eq!(segments, ["ksys", "act", "BaseProcLink"]);
}

#[test]
fn mangled_input_without_segments_degrades_to_raw() {
    for raw in ["_Z", "_Zv", "_ZN9Ev", "_Z99999999999999999999999999abc"] {
        let name = demangle(raw);
        assert_eq!(name.len(), 1, "{raw}");
        assert_eq!(name.to_string(), raw);
    }
}

#[test]
fn type_codes_after_the_nested_name_are_ignored() {
    assert_eq!(joined("_ZN4ksys3Foo3setEib"), "ksys::Foo::set");
    assert_eq!(joined("_ZN4ksys3Foo3setERKN4sead14SafeStringBaseIcEE"), "ksys::Foo::set");
}

#[test]
fn demangling_is_deterministic() {
    let raw = "_ZN5uking6action13SetFlagAction8oneShot_Ev";
    assert_eq!(demangle(raw), demangle(raw));
    assert_eq!(joined(raw), "uking::action::SetFlagAction::oneShot_");
}
