use generoo::config::{ConfigValue, Configuration};
use generoo::context::{ContextBuilder, DerivedRule, Environment};
use generoo::error::Error;
use generoo::parser::Parser;
use generoo::path::render_path;
use generoo::renderer::{MissingPolicy, SectionRenderer};

fn spring_env(hibernate: bool) -> Environment {
    let mut rules = DerivedRule::standard_set("artifact_id");
    rules.extend(DerivedRule::standard_set("group_id"));
    let config: Configuration = [
        ("artifact_id", ConfigValue::from("my-service")),
        ("group_id", ConfigValue::from("com.example")),
        ("hibernate", ConfigValue::from(hibernate)),
        ("blank", ConfigValue::from("")),
        ("up", ConfigValue::from("..")),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();
    ContextBuilder::new(rules).build(&config).unwrap()
}

fn render(template: &str, env: &Environment) -> generoo::error::Result<Option<String>> {
    render_path(&SectionRenderer::default(), template, env)
}

#[test]
fn test_plain_path() {
    let env = spring_env(false);
    assert_eq!(render("src/main/App.java", &env).unwrap().as_deref(), Some("src/main/App.java"));
}

#[test]
fn test_variables_in_segments() {
    let env = spring_env(false);
    let rendered = render(
        "{{artifact_id}}-api/src/main/java/{{group_id_slashes}}/{{artifact_id_periods}}/{{artifact_id_capitalized}}Application.java",
        &env,
    )
    .unwrap();
    assert_eq!(
        rendered.as_deref(),
        Some("my-service-api/src/main/java/com/example/my.service/MyServiceApplication.java")
    );
}

#[test]
fn test_whole_segment_section_gates_path() {
    let template = "{{#hibernate}}entity{{/hibernate}}/Entity.java";
    assert_eq!(render(template, &spring_env(true)).unwrap().as_deref(), Some("entity/Entity.java"));
    assert_eq!(render(template, &spring_env(false)).unwrap(), None);
}

#[test]
fn test_inverted_segment_section() {
    let template = "{{^hibernate}}memory{{/hibernate}}/Store.java";
    assert_eq!(render(template, &spring_env(true)).unwrap(), None);
    assert_eq!(render(template, &spring_env(false)).unwrap().as_deref(), Some("memory/Store.java"));
}

#[test]
fn test_unclosed_leading_gate() {
    let template = "{{#hibernate}}{{artifact_id}}-entity/src/{{artifact_id_capitalized}}Entity.java";
    assert_eq!(
        render(template, &spring_env(true)).unwrap().as_deref(),
        Some("my-service-entity/src/MyServiceEntity.java")
    );
    assert_eq!(render(template, &spring_env(false)).unwrap(), None);

    let file_gate = "config/{{#hibernate}}DataConfig.java";
    assert_eq!(render(file_gate, &spring_env(false)).unwrap(), None);
    assert_eq!(
        render(file_gate, &spring_env(true)).unwrap().as_deref(),
        Some("config/DataConfig.java")
    );
}

#[test]
fn test_partial_section_does_not_gate() {
    let template = "app{{#hibernate}}-db{{/hibernate}}/Main.java";
    assert_eq!(render(template, &spring_env(false)).unwrap().as_deref(), Some("app/Main.java"));
    assert_eq!(render(template, &spring_env(true)).unwrap().as_deref(), Some("app-db/Main.java"));
}

#[test]
fn test_empty_segment_is_an_error() {
    let env = spring_env(false);
    match render("src/{{blank}}/Main.java", &env) {
        Err(Error::EmptyPathSegmentError { template, index }) => {
            assert_eq!(template, "src/{{blank}}/Main.java");
            assert_eq!(index, 1);
        }
        other => panic!("Expected EmptyPathSegmentError, got {other:?}"),
    }
    assert!(matches!(render("a//b", &env), Err(Error::EmptyPathSegmentError { .. })));
    assert!(matches!(render("/abs", &env), Err(Error::EmptyPathSegmentError { index: 0, .. })));
    assert!(matches!(render("", &env), Err(Error::EmptyPathSegmentError { .. })));
}

#[test]
fn test_open_section_rendering_empty_is_an_error() {
    let env = spring_env(true);
    assert!(matches!(
        render("{{#hibernate}}{{/hibernate}}/x", &env),
        Err(Error::EmptyPathSegmentError { index: 0, .. })
    ));
}

#[test]
fn test_traversal_is_rejected() {
    let env = spring_env(false);
    assert!(matches!(
        render("src/{{up}}/x", &env),
        Err(Error::InvalidPathSegmentError { segment, .. }) if segment == ".."
    ));
}

#[test]
fn test_missing_gate_follows_policy() {
    let env = spring_env(false);
    assert!(matches!(
        render("{{#unknown}}dir{{/unknown}}/file", &env),
        Err(Error::MissingVariableError { .. })
    ));

    let lenient = SectionRenderer::new(Parser::default(), MissingPolicy::Lenient);
    assert_eq!(render_path(&lenient, "{{#unknown}}dir/file", &env).unwrap(), None);
}

#[test]
fn test_segment_syntax_errors() {
    let env = spring_env(false);
    assert!(matches!(
        render("src/{{#hibernate}}x{{/other}}/y", &env),
        Err(Error::TemplateSyntaxError { .. })
    ));
    assert!(matches!(render("src/{{name", &env), Err(Error::TemplateSyntaxError { .. })));
}

#[test]
fn test_leading_gate_with_inner_same_name_section() {
    let template = "{{#hibernate}}db{{#hibernate}}-jpa{{/hibernate}}/Repo.java";
    assert_eq!(render(template, &spring_env(true)).unwrap().as_deref(), Some("db-jpa/Repo.java"));
    assert_eq!(render(template, &spring_env(false)).unwrap(), None);
}
