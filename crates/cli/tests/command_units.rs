use std::fs;

use decomp_progress::commands::{
    classify_class, demangle_symbols, init_project_command, parse_report_format, run_report,
    write_report,
};
use progress_core::model::ClassStatusKind;
use progress_core::report::ReportFormat;
use tempfile::tempdir;

fn project_with_inputs() -> tempfile::TempDir {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path().to_str().expect("utf-8 path").to_string();
    init_project_command(&root, Some("units".into())).expect("init project");

    let data = tmp.path().join("data");
    fs::write(
        data.join("classes.json"),
        r#"["ksys::act::Foo", "ksys::act::Bar", "uking::Foo", "nn::os::Mutex"]"#,
    )
    .unwrap();
    fs::write(
        data.join("functions.csv"),
        "Address,Quality,Size,Name\n\
         0x10,O,32,_ZN4ksys3act3Foo4initEv\n\
         0x30,O,16,_ZN4ksys3act3Bar4calcEv\n\
         0x40,U,16,_ZN4ksys3act3Bar4drawEv\n",
    )
    .unwrap();
    fs::write(
        data.join("overrides").join("ksys.json"),
        r#"{"ksys::act":{"Bar":{"status":"done"}}}"#,
    )
    .unwrap();
    tmp
}

#[test]
fn parse_report_format_accepts_known_values() {
    assert_eq!(parse_report_format("tree").unwrap(), ReportFormat::Tree);
    assert_eq!(parse_report_format("graph").unwrap(), ReportFormat::Graph);
    assert_eq!(parse_report_format("both").unwrap(), ReportFormat::Both);
    let err = parse_report_format("svg").unwrap_err();
    assert!(err.to_string().contains("Allowed: tree, graph, both"));
}

#[test]
fn demangle_symbols_marks_plain_names() {
    let symbols = vec!["_ZN4ksys3act3FooD2Ev".to_string(), "plain::Name".to_string()];
    let out = demangle_symbols(&symbols);
    assert!(out[0].mangled);
    assert_eq!(out[0].segments, ["ksys", "act", "Foo", "~Foo"]);
    assert!(!out[1].mangled);
    assert_eq!(out[1].segments, ["plain::Name"]);
}

#[test]
fn classify_class_applies_overrides_and_short_name_matching() {
    let tmp = project_with_inputs();
    let root = tmp.path().to_str().unwrap();

    let bar = classify_class(root, "ksys::act::Bar").expect("classify Bar");
    assert_eq!(bar.status, ClassStatusKind::Decompiled);
    assert_eq!(bar.method_count, 2);
    assert_eq!(bar.total_binary_size, 32);

    // Short-name matching: uking::Foo sees ksys::act::Foo's methods.
    let foo = classify_class(root, "uking::Foo").expect("classify uking::Foo");
    assert_eq!(foo.status, ClassStatusKind::Decompiled);
    assert_eq!(foo.method_count, 1);

    let missing = classify_class(root, "ksys::Nothing").expect("classify missing");
    assert_eq!(missing.status, ClassStatusKind::Undecompiled);
    assert_eq!(missing.method_count, 0);
}

#[test]
fn run_report_filters_namespaces_and_writes_artifacts() {
    let tmp = project_with_inputs();
    let (ctx, report) = run_report(tmp.path(), ReportFormat::Both).expect("report");

    let names: Vec<String> = report.statuses.iter().map(|s| s.class.to_string()).collect();
    assert_eq!(names, ["ksys::act::Bar", "ksys::act::Foo", "uking::Foo"]);
    assert_eq!(report.summary.counts.decompiled, 3);
    assert_eq!(report.summary.per_namespace["ksys"].decompiled, 2);

    let tree = report.tree.as_ref().expect("tree");
    assert_eq!(tree.class_count(), 3);

    let written = write_report(&ctx, &report).expect("write");
    assert!(written.tree.expect("tree path").is_file());
    assert!(written.graph.expect("graph path").is_file());
    assert!(written.summary.is_file());
}

#[test]
fn run_report_graph_only() {
    let tmp = project_with_inputs();
    let (_, report) = run_report(tmp.path(), ReportFormat::Graph).expect("report");
    assert!(report.tree.is_none());
    let graph = report.graph.expect("graph");
    // ksys, act, Bar, Foo, uking, Foo
    assert_eq!(graph.nodes.len(), 6);
}
