//! Tests for the hdkb error handling system.

use std::path::PathBuf;

use hdkb_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let config = ConfigError::MissingValue {
        field: "paths.output_dir".into(),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");

    let reference = ReferenceError::SelfOpposite { gate: 1 };
    assert_eq!(reference.error_code(), "REFERENCE_ERROR");

    let io = ArticleError::Io {
        path: PathBuf::from("a.md"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(io.error_code(), "ARTICLE_IO");

    let policy = ArticleError::UnknownPolicy {
        name: "medium".into(),
    };
    assert_eq!(policy.error_code(), "POLICY_ERROR");

    let output = OutputError::Serialize {
        path: PathBuf::from("out.json"),
        message: "bad".into(),
    };
    assert_eq!(output.error_code(), "OUTPUT_ERROR");
}

#[test]
fn test_from_conversions() {
    let pipeline: PipelineError = ConfigError::FileNotFound {
        path: "/tmp/hdkb.toml".into(),
    }
    .into();
    assert!(matches!(pipeline, PipelineError::Config(_)));
    assert_eq!(pipeline.error_code(), "CONFIG_ERROR");

    let pipeline: PipelineError = ReferenceError::MissingGate { gate: 12 }.into();
    assert!(matches!(pipeline, PipelineError::Reference(_)));

    let pipeline: PipelineError = ArticleError::UnknownPolicy { name: "x".into() }.into();
    assert_eq!(pipeline.error_code(), "POLICY_ERROR");
}

#[test]
fn test_input_error_distinguishes_not_found() {
    let missing = PipelineError::input(
        "crosses.txt",
        std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    );
    assert!(matches!(missing, PipelineError::InputMissing { .. }));
    assert_eq!(missing.tagged(), "[INPUT_MISSING] Input not found: crosses.txt");

    let unreadable = PipelineError::input(
        "crosses.txt",
        std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8"),
    );
    assert!(matches!(unreadable, PipelineError::InputRead { .. }));
}

#[test]
fn test_display_is_human_readable() {
    let err = ReferenceError::AsymmetricOpposite {
        gate: 3,
        opposite: 50,
        back: 4,
    };
    assert_eq!(
        err.to_string(),
        "Gate 3 has opposite 50, but 50 has opposite 4"
    );

    let err = ReferenceError::CenterSizeMismatch {
        center: "ajna".into(),
        expected: 6,
        actual: 5,
    };
    assert_eq!(err.to_string(), "Center ajna has 5 gates, expected 6");
}

#[test]
fn test_pipeline_result_collects_non_fatal_errors() {
    let mut result: PipelineResult<Vec<u32>> = PipelineResult::new(vec![1, 2]);
    assert!(result.is_clean());

    result.add_error(ArticleError::Io {
        path: PathBuf::from("broken.md"),
        source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
    });
    result.add_error(OutputError::Write {
        path: PathBuf::from("report.txt"),
        source: std::io::Error::new(std::io::ErrorKind::Other, "disk"),
    });

    assert!(!result.is_clean());
    assert_eq!(result.error_count(), 2);
    assert_eq!(result.data, vec![1, 2]);
}
