//! End-to-end analyzer runs.

mod common;

use bytemetrics_analysis::{
    Analyzer, Artifact, DecodedUnit, Granularity, KeyLayout, Metric, UnitLocation, UsageKind,
};
use bytemetrics_core::config::{AnalysisConfig, BytemetricsConfig};
use bytemetrics_core::errors::{DecodeError, ErrorCode, IndexError, PipelineError};
use common::{ClassFileBuilder, Insn, MethodSpec};

fn tag_project() -> Vec<ClassFileBuilder> {
    vec![
        ClassFileBuilder::interface("tags/Tag")
            .source_file("Tag.java")
            .abstract_method("name", "()Ltags/TagName;"),
        ClassFileBuilder::class("tags/File").source_file("File.java"),
        ClassFileBuilder::class("tags/TagName").source_file("TagName.java"),
        ClassFileBuilder::class("tags/SourceFile").source_file("SourceFile.java"),
        ClassFileBuilder::class("tags/TagException")
            .extends("java/lang/Exception")
            .source_file("TagException.java"),
        ClassFileBuilder::class("tags/impl/Todo")
            .implements("tags/Tag")
            .source_file("Todo.java")
            .field("file", "Ltags/File;")
            .method_spec(
                MethodSpec::new("getName", "(Ltags/SourceFile;)Ltags/TagName;")
                    .code(vec![Insn::Aload0, Insn::Areturn])
                    .throws("tags/TagException"),
            )
            .method(
                "describe",
                "()V",
                vec![
                    Insn::InvokeStatic("tags/TagName", "of", "()V"),
                    Insn::InvokeStatic("tags/TagName", "of", "()V"),
                    Insn::Aload0,
                    Insn::GetField("tags/impl/Todo", "file", "Ltags/File;"),
                    Insn::InvokeVirtual("tags/File", "path", "()V"),
                    Insn::Return,
                ],
            ),
    ]
}

#[test]
fn test_todo_edges() {
    let analysis = common::analyze(&tag_project());

    let edges: Vec<(String, UsageKind)> = analysis
        .edges_from("tags/impl/Todo")
        .into_iter()
        .map(|e| (e.target, e.kind))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("tags/File".to_string(), UsageKind::Uses),
            ("tags/SourceFile".to_string(), UsageKind::Uses),
            ("tags/Tag".to_string(), UsageKind::Implements),
            ("tags/TagException".to_string(), UsageKind::Uses),
            ("tags/TagName".to_string(), UsageKind::Uses),
        ]
    );
    // Return type of getName plus the invocation owner in describe.
    assert_eq!(analysis.edge("tags/impl/Todo", "tags/TagName").unwrap().weight, 2);
}

#[test]
fn test_todo_metrics() {
    let analysis = common::analyze(&tag_project());

    // getName, describe, TagName#of()V, File#path()V.
    assert_eq!(analysis.metric("tags/impl/Todo", Metric::Rfc), Some(4));
    assert_eq!(analysis.metric("tags/impl/Todo", Metric::Dit), Some(1));
    assert_eq!(analysis.metric("tags/impl/Todo", Metric::Ce), Some(4));
    assert_eq!(analysis.metric("tags/Tag", Metric::Noc), Some(1));
    assert_eq!(analysis.metric("tags/Tag", Metric::Ca), Some(0));
    assert_eq!(analysis.metric("tags/TagName", Metric::Ca), Some(2));
    assert_eq!(analysis.metric("tags/impl/Todo", Metric::Lcom4), Some(2));
}

#[test]
fn test_ownership_keys() {
    let analysis = common::analyze(&tag_project());

    let todo = analysis.search("tags/impl/Todo").unwrap();
    let file = analysis.search("tags/impl/Todo.java").unwrap();
    let package = analysis.search("tags/impl").unwrap();
    assert_eq!(todo.parent, Some(file.id));
    assert_eq!(file.parent, Some(package.id));
    assert_eq!(file.granularity, Granularity::File);

    assert_eq!(analysis.nodes(Granularity::Unit).count(), 6);
    assert_eq!(analysis.nodes(Granularity::File).count(), 6);
    assert_eq!(analysis.nodes(Granularity::Package).count(), 2);
    assert_eq!(
        analysis.unit("tags/impl/Todo").map(|u| u.methods.len()),
        Some(2)
    );
    assert!(analysis.unit("tags/impl").is_none());
}

#[test]
fn test_default_package_and_missing_source_file() {
    let analysis = common::analyze(&[
        ClassFileBuilder::class("Main"),
        ClassFileBuilder::class("Main$Inner"),
    ]);
    let file = analysis.search("Main.java").unwrap();
    assert_eq!(file.children.len(), 2);
    assert_eq!(analysis.search("[default]").unwrap().children, vec![file.id]);
}

#[test]
fn test_decode_failures_are_isolated() {
    let mut artifacts = common::artifacts(&tag_project());
    artifacts.insert(0, Artifact::new("broken.class", vec![0xde, 0xad, 0xbe, 0xef, 0, 0]));
    let mut truncated = artifacts[1].bytes.clone();
    truncated.truncate(20);
    artifacts.push(Artifact::new("truncated.class", truncated));

    let result = Analyzer::default().analyze(&artifacts);
    assert_eq!(result.error_count(), 2);
    match &result.errors[0] {
        PipelineError::Decode { origin, source } => {
            assert_eq!(origin, "broken.class");
            assert!(matches!(source, DecodeError::BadMagic { found: 0xdeadbeef }));
        }
        other => panic!("unexpected error: {other}"),
    }
    match &result.errors[1] {
        PipelineError::Decode { origin, source } => {
            assert_eq!(origin, "truncated.class");
            assert!(matches!(source, DecodeError::Truncated { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(result.errors[0].error_code(), "DECODE_ERROR");

    assert_eq!(result.data.nodes(Granularity::Unit).count(), 6);
    assert!(result.data.edge("tags/impl/Todo", "tags/Tag").is_some());
}

#[test]
fn test_deeply_nested_types_fail_only_their_unit() {
    let deep_array = format!("{}I", "[".repeat(60_000));
    let deep_generic = format!(
        "{}Ltags/Good;{}",
        "Ljava/util/List<".repeat(2_000),
        ">;".repeat(2_000)
    );
    let builders = [
        ClassFileBuilder::class("tags/Evil").field("deep", &deep_array),
        ClassFileBuilder::class("tags/Generic").generic_field(
            "nested",
            "Ljava/util/List;",
            &deep_generic,
        ),
        ClassFileBuilder::class("tags/Good").field("size", "I"),
    ];

    let result = Analyzer::default().analyze(&common::artifacts(&builders));
    assert_eq!(result.error_count(), 2);
    let origins: Vec<&str> = result
        .errors
        .iter()
        .map(|error| match error {
            PipelineError::Decode { origin, source } => {
                assert!(matches!(source, DecodeError::MalformedDescriptor { .. }));
                origin.as_str()
            }
            other => panic!("unexpected error: {other}"),
        })
        .collect();
    assert_eq!(origins, vec!["tags/Evil.class", "tags/Generic.class"]);

    assert!(result.data.unit("tags/Good").is_some());
    assert!(result.data.unit("tags/Evil").is_none());
    assert_eq!(result.data.nodes(Granularity::Unit).count(), 1);
}

#[test]
fn test_duplicate_unit_keeps_first() {
    let first = ClassFileBuilder::class("tags/File").field("path", "Ltags/Line;");
    let second = ClassFileBuilder::class("tags/File").field("other", "Ltags/Other;");
    let line = ClassFileBuilder::class("tags/Line");
    let other = ClassFileBuilder::class("tags/Other");

    let result = Analyzer::default().analyze(&common::artifacts(&[first, second, line, other]));
    assert_eq!(result.error_count(), 1);
    assert!(matches!(
        &result.errors[0],
        PipelineError::Index(IndexError::DuplicateKey { key }) if key == "tags/File"
    ));

    let analysis = &result.data;
    assert_eq!(analysis.unit("tags/File").unwrap().fields[0].name, "path");
    assert!(analysis.edge("tags/File", "tags/Line").is_some());
    assert!(analysis.edge("tags/File", "tags/Other").is_none());
}

struct ModuleLayout;

impl KeyLayout for ModuleLayout {
    fn locate(&self, unit: &DecodedUnit) -> UnitLocation {
        UnitLocation {
            file: format!("src/{}.kt", unit.outer_simple_name()),
            package: "module".to_string(),
        }
    }
}

#[test]
fn test_custom_layout() {
    let analyzer = Analyzer::default().with_layout(ModuleLayout);
    let result = analyzer.analyze(&common::artifacts(&tag_project()));
    assert!(result.is_clean());

    let analysis = result.data;
    let file = analysis.search("src/Todo.kt").unwrap();
    assert_eq!(file.granularity, Granularity::File);
    assert_eq!(analysis.nodes(Granularity::Package).count(), 1);
    assert_eq!(
        analysis.edge("src/Todo.kt", "src/Tag.kt").map(|e| e.kind),
        Some(UsageKind::Implements)
    );
    assert!(analysis.search("tags/impl/Todo.java").is_none());
}

#[test]
fn test_thread_count_does_not_change_results() {
    let config = BytemetricsConfig {
        analysis: AnalysisConfig {
            threads: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let pooled = Analyzer::new(config).analyze(&common::artifacts(&tag_project()));
    let global = common::analyze(&tag_project());
    assert!(pooled.is_clean());

    for key in ["tags/impl/Todo", "tags/impl/Todo.java", "tags/impl", "tags/Tag"] {
        assert_eq!(pooled.data.edges_from(key), global.edges_from(key), "{key}");
        assert_eq!(pooled.data.metrics(key), global.metrics(key), "{key}");
    }
    assert_eq!(pooled.data.stats(), global.stats());
}

#[test]
fn test_unresolved_references_counted() {
    let analysis = common::analyze(&[ClassFileBuilder::class("tags/Lonely")
        .field("name", "Ljava/lang/String;")
        .field("size", "I")]);
    let stats = analysis.stats();
    // java/lang/Object and java/lang/String.
    assert_eq!(stats.unresolved, 2);
    assert_eq!(stats.recorded, 0);
    assert!(analysis.edges_from("tags/Lonely").is_empty());
}

#[test]
fn test_empty_run() {
    let result = Analyzer::default().analyze(&[]);
    assert!(result.is_clean());
    assert_eq!(result.data.index().len(), 0);
    assert_eq!(result.data.graph().edge_count(), 0);
}
