mod common;

use common::accepts;
use thompson_nfa::error_handling::Result;
use thompson_nfa::nfa::compile;
use thompson_nfa::parser::SchemaConfig;

#[test]
fn test_compile_demo_schema() -> Result<()> {
    let project_root = env!("CARGO_MANIFEST_DIR");
    let schema_path = std::path::Path::new(project_root)
        .join("demos")
        .join("expressions.yaml");
    let schema_config = SchemaConfig::parse_from_file(schema_path.to_str().unwrap())?;

    let cases: Vec<(&str, Vec<&str>, Vec<&str>)> = vec![
        ("a_then_bs", vec!["a", "ab", "abbb"], vec!["", "b", "ba"]),
        ("a_or_b", vec!["a", "b"], vec!["", "ab", "c"]),
        ("nothing", vec![""], vec!["a"]),
        ("binary_words", vec!["", "0", "1", "0110"], vec!["2", "01a"]),
        ("identifier", vec!["x", "y_0", "zz1_"], vec!["", "_x", "0", "xa"]),
    ];

    for (name, accepted, rejected) in cases {
        let expression = schema_config.get_expression(name).unwrap();
        let nfa = compile(expression);
        println!("{}: {}\n{:?}", name, expression, nfa);

        for input in accepted {
            assert!(accepts(&nfa, input), "{} should accept {:?}", name, input);
        }
        for input in rejected {
            assert!(!accepts(&nfa, input), "{} should reject {:?}", name, input);
        }
    }

    Ok(())
}

#[test]
fn test_yaml_dump_round_trips_through_serde_yaml() -> Result<()> {
    let schema_config = SchemaConfig::parse_from_str(
        "expressions:\n  star:\n    iterate:\n      symbol: a\n",
    )?;
    let nfa = compile(schema_config.get_expression("star").unwrap());
    let yaml = nfa.to_yaml()?;

    let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml)?;
    assert_eq!(parsed["start"], serde_yaml::Value::from(2));
    assert_eq!(parsed["accept"], serde_yaml::Value::from(3));

    let states = parsed["states"].as_sequence().unwrap();
    assert_eq!(states.len(), nfa.get_num_states());
    assert_eq!(states[0]["source"], serde_yaml::Value::from("Symbol"));
    assert_eq!(states[2]["source"], serde_yaml::Value::from("Iteration"));
    assert_eq!(
        states[0]["transitions"][0]["symbol"],
        serde_yaml::Value::from("a")
    );
    assert_eq!(states[2]["transitions"].as_sequence().unwrap().len(), 2);

    Ok(())
}
