use std::path::{Path, PathBuf};

use generoo::config::{find_config, load_config, ConfigValue};
use generoo::constants::CONFIG_FILES;
use generoo::context::ContextBuilder;
use generoo::error::Error;
use generoo::ignore::parse_ignore_file;
use generoo::loader::load_template_tree;
use generoo::processor::{Processor, TreeEntry};
use generoo::renderer::SectionRenderer;
use generoo::writer::write_result;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn test_load_template_tree() {
    let template = fixture("spring/template");
    let ignored = parse_ignore_file(&template).unwrap();
    let tree = load_template_tree(&template, &ignored).unwrap();

    let paths: Vec<&str> = tree.entries().iter().map(TreeEntry::path).collect();
    assert!(paths.contains(&"README.md"));
    assert!(paths.contains(&"{{artifact_id}}-api/config/{{#hibernate}}DataConfig.java"));
    assert!(!paths.contains(&"generoo.json"));
    assert!(!paths.contains(&".generooignore"));
    assert!(!paths.contains(&"notes.bak"));

    let entity_dir = tree
        .entries()
        .iter()
        .find(|entry| entry.path() == "{{#hibernate}}{{artifact_id}}-entity")
        .unwrap();
    assert!(entity_dir.is_directory());
}

#[test]
fn test_load_is_sorted_and_parents_come_first() {
    let template = fixture("spring/template");
    let ignored = parse_ignore_file(&template).unwrap();
    let first = load_template_tree(&template, &ignored).unwrap();
    let second = load_template_tree(&template, &ignored).unwrap();
    assert_eq!(first, second);

    let paths: Vec<&str> = first.entries().iter().map(TreeEntry::path).collect();
    let api = paths.iter().position(|p| *p == "{{artifact_id}}-api").unwrap();
    let config = paths.iter().position(|p| *p == "{{artifact_id}}-api/config").unwrap();
    assert!(api < config);
}

#[test]
fn test_missing_template_dir() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");
    let ignored = parse_ignore_file(temp_dir.path()).unwrap();
    assert!(matches!(
        load_template_tree(&missing, &ignored),
        Err(Error::TemplateDoesNotExistsError { .. })
    ));
}

#[test]
fn test_render_fixture_matches_expected_tree() {
    let template = fixture("spring/template");
    let config = load_config(find_config(&template, &CONFIG_FILES).unwrap()).unwrap();
    let env = ContextBuilder::new(config.transformations.clone()).build(&config.variables).unwrap();
    let engine = SectionRenderer::from_options(&config.options).unwrap();

    let ignored = parse_ignore_file(&template).unwrap();
    let tree = load_template_tree(&template, &ignored).unwrap();
    let result = Processor::new(&engine).render(&tree, &env).unwrap();

    let output = TempDir::new().unwrap();
    write_result(&result, output.path()).unwrap();

    assert!(!dir_diff::is_different(output.path(), fixture("spring/expected")).unwrap());
}

#[test]
fn test_render_fixture_with_flag_enabled() {
    let template = fixture("spring/template");
    let mut config = load_config(find_config(&template, &CONFIG_FILES).unwrap()).unwrap();
    config.apply_overrides(vec![("hibernate".to_string(), ConfigValue::Bool(true))]);
    let env = ContextBuilder::new(config.transformations.clone()).build(&config.variables).unwrap();
    let engine = SectionRenderer::from_options(&config.options).unwrap();

    let ignored = parse_ignore_file(&template).unwrap();
    let tree = load_template_tree(&template, &ignored).unwrap();
    let result = Processor::new(&engine).render(&tree, &env).unwrap();

    assert_eq!(
        result.get("my-service-entity/src/MyServiceEntity.java").unwrap().content,
        "public class MyServiceEntity {}\n"
    );
    assert_eq!(
        result.get("my-service-api/config/DataConfig.java").unwrap().content,
        "package com.example.my.service.config;\n"
    );
    assert_eq!(result.get("README.md").unwrap().content, "# MyService\nUses Hibernate.\n");
}
