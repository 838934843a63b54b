use std::cell::Cell;
use std::fs;

use generoo::config::{load_run_configuration, ConfigValue, Configuration, TemplateConfig};
use generoo::context::{ContextBuilder, DerivedRule};
use generoo::error::{Error, Result};
use generoo::processor::{RenderResult, RenderedFile};
use generoo::prompt::Prompter;
use generoo::writer::{ensure_output_dir, write_result, write_run_configuration};
use tempfile::TempDir;

struct MockPrompter {
    answer: bool,
    asked: Cell<usize>,
}

impl MockPrompter {
    fn new(answer: bool) -> Self {
        Self { answer, asked: Cell::new(0) }
    }
}

impl Prompter for MockPrompter {
    fn confirm(&self, _prompt: String, _default: bool) -> Result<bool> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answer)
    }
}

#[test]
fn test_ensure_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    // Non-existent directory: no question asked
    let declining = MockPrompter::new(false);
    assert!(ensure_output_dir(&declining, path.join("new_dir"), false).is_ok());
    assert_eq!(declining.asked.get(), 0);

    // Existing directory, overwrite declined
    assert!(matches!(
        ensure_output_dir(&declining, path, false),
        Err(Error::OutputDirectoryExistsError { .. })
    ));
    assert_eq!(declining.asked.get(), 1);

    // Existing directory, overwrite confirmed
    let accepting = MockPrompter::new(true);
    assert!(ensure_output_dir(&accepting, path, false).is_ok());

    // Existing directory with force
    let untouched = MockPrompter::new(false);
    assert!(ensure_output_dir(&untouched, path, true).is_ok());
    assert_eq!(untouched.asked.get(), 0);
}

#[test]
fn test_write_result() {
    let temp_dir = TempDir::new().unwrap();
    let result = RenderResult {
        directories: vec!["empty/dir".to_string()],
        files: vec![RenderedFile {
            path: "src/main/App.java".to_string(),
            content: "class App {}\n".to_string(),
            source: "src/main/{{name}}.java".to_string(),
        }],
    };

    write_result(&result, temp_dir.path()).unwrap();

    assert!(temp_dir.path().join("empty/dir").is_dir());
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("src/main/App.java")).unwrap(),
        "class App {}\n"
    );
}

#[test]
fn test_write_run_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let config: Configuration = [
        ("artifact_id".to_string(), ConfigValue::from("my-service")),
        ("hibernate".to_string(), ConfigValue::from(true)),
    ]
    .into_iter()
    .collect();
    let env = ContextBuilder::default().build(&config).unwrap();

    let path = write_run_configuration(&env, temp_dir.path()).unwrap();
    assert_eq!(path, temp_dir.path().join(".generoo/run-configuration.json"));

    let stored: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(stored, serde_json::json!({"artifact_id": "my-service", "hibernate": true}));
}

#[test]
fn test_run_configuration_can_be_reused() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = TemplateConfig {
        transformations: DerivedRule::standard_set("artifact_id"),
        ..TemplateConfig::default()
    };
    config.variables.insert("artifact_id".to_string(), ConfigValue::from("my-service"));
    config.variables.insert("hibernate".to_string(), ConfigValue::from(true));
    let builder = ContextBuilder::new(config.transformations.clone());
    let first = builder.build(&config.variables).unwrap();
    let path = write_run_configuration(&first, temp_dir.path()).unwrap();

    // a fresh run with template defaults, answered from the stored file
    let mut next = TemplateConfig {
        transformations: DerivedRule::standard_set("artifact_id"),
        ..TemplateConfig::default()
    };
    next.variables.insert("artifact_id".to_string(), ConfigValue::from("placeholder"));
    next.variables.insert("hibernate".to_string(), ConfigValue::from(false));
    let stored = next.retain_base_values(load_run_configuration(&path).unwrap());
    assert_eq!(stored.len(), 2);
    next.apply_overrides(stored);

    let second = builder.build(&next.variables).unwrap();
    assert_eq!(second, first);
}

#[test]
fn test_load_yaml_run_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("run-configuration.yml");
    fs::write(&path, "artifact_id: my-service\nhibernate: false\n").unwrap();

    assert_eq!(
        load_run_configuration(&path).unwrap(),
        vec![
            ("artifact_id".to_string(), ConfigValue::from("my-service")),
            ("hibernate".to_string(), ConfigValue::from(false)),
        ]
    );
}
