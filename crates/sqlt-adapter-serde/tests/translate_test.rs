//! Class model to document translation through the plugin registry

use sqlt_pipeline::{Input, Outcome, PluginRegistry, Role, TranslateArgs, Translator};

fn registry() -> PluginRegistry {
    let registry = PluginRegistry::with_builtins();
    sqlt_uml::register(&registry).unwrap();
    sqlt_adapter_serde::register(&registry).unwrap();
    registry
}

#[test]
fn test_uml_to_yaml() -> anyhow::Result<()> {
    let model = r#"
classes:
  - name: Customer
    attributes:
      - { name: id, type: integer, stereotype: PK }
      - { name: name, type: string }
"#;
    let mut translator = Translator::new(registry());
    let outcome = translator.translate(TranslateArgs::from_pairs([
        ("data", model),
        ("from", "uml"),
        ("to", "yaml"),
    ]))?;

    let Outcome::Produced(ir) = outcome else {
        panic!("expected output");
    };
    let text = ir.into_text().expect("yaml producer renders text");
    let value: serde_yaml::Value = serde_yaml::from_str(&text)?;
    assert_eq!(value["tables"][0]["name"].as_str(), Some("Customer"));
    assert_eq!(value["tables"][0]["primary_key"].as_str(), Some("id"));
    Ok(())
}

#[test]
fn test_json_to_yaml_via_alias() -> anyhow::Result<()> {
    let json = r#"{"tables":[{"name":"T","fields":[{"name":"a","type":"int"}]}]}"#;
    let mut translator = Translator::new(registry());
    translator.set_parser("json")?;
    translator.set_producer("yml")?;

    let outcome = translator.translate(Input::Text(json.to_string()))?;
    let text = outcome.into_ir().and_then(|ir| ir.into_text()).unwrap();
    assert!(text.contains("name: T"));
    Ok(())
}

#[test]
fn test_registered_names() {
    let registry = registry();
    assert_eq!(
        registry.names(Role::Producer),
        vec![
            "sqlt::producer::identity",
            "sqlt::producer::json",
            "sqlt::producer::yaml",
        ]
    );
    assert!(registry.contains(Role::Parser, "sqlt::parser::uml"));
}
