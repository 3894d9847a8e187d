//! Tests for solver configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "reproducible"
        random_seed = 42

        [pairwise]
        initial = "random"

        [exact]
        job_order = "interlaced"

        [tuplewise]
        k = 6
        restarts = 25
        attempts = 8
        anchor_heaviest = true
        thread_count = "none"
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.pairwise.initial, InitialAssignment::Random);
    assert!(config.exact.enabled);
    assert_eq!(config.exact.job_order, JobOrder::Interlaced);
    assert_eq!(config.tuplewise.k, 6);
    assert_eq!(config.tuplewise.restarts, 25);
    assert_eq!(config.tuplewise.attempts, 8);
    assert!(config.tuplewise.anchor_heaviest);
    assert_eq!(config.tuplewise.thread_count, ThreadCount::None);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: full_assert
        tuplewise:
          k: 5
          thread_count: none
        exact:
          enabled: false
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.tuplewise.k, 5);
    assert_eq!(config.tuplewise.restarts, 0);
    assert_eq!(config.tuplewise.thread_count, ThreadCount::None);
    assert!(!config.exact.enabled);
    assert_eq!(config.exact.job_order, JobOrder::Auto);
}

#[test]
fn test_empty_toml_is_default() {
    let config = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolverConfig::default());
    assert_eq!(config.tuplewise.k, 4);
    assert_eq!(config.tuplewise.attempts, 16);
}

#[test]
fn test_validation_rejects_small_k() {
    let err = SolverConfig::from_toml_str("[tuplewise]\nk = 1\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_validation_rejects_zero_threads() {
    let toml = "[tuplewise]\nthread_count = { count = 0 }\n";
    assert!(matches!(
        SolverConfig::from_toml_str(toml),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SolverConfig::load("/nonexistent/pcmax.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_environment_mode(EnvironmentMode::FullAssert)
        .with_tuplewise(TuplewiseConfig {
            k: 3,
            ..TuplewiseConfig::default()
        });

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.tuplewise.k, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_effective_seed() {
    assert_eq!(SolverConfig::new().effective_seed(), None);
    assert_eq!(SolverConfig::new().with_random_seed(9).effective_seed(), Some(9));
    assert_eq!(
        SolverConfig::new()
            .with_environment_mode(EnvironmentMode::Reproducible)
            .effective_seed(),
        Some(0)
    );
}

#[test]
fn test_thread_count_resolve() {
    assert_eq!(ThreadCount::Count(4).resolve(10), 4);
    assert_eq!(ThreadCount::Count(10).resolve(4), 4);
    assert_eq!(ThreadCount::None.resolve(10), 1);
    assert!(ThreadCount::Auto.resolve(100) > 0);
    assert_eq!(ThreadCount::Auto.resolve(0), 1);
}

#[test]
fn test_thread_count_display() {
    assert_eq!(format!("{}", ThreadCount::Auto), "Auto");
    assert_eq!(format!("{}", ThreadCount::Count(4)), "4");
}
