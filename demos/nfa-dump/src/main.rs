use thompson_nfa::error_handling::Result;
use thompson_nfa::nfa::compile;
use thompson_nfa::parser::SchemaConfig;

use clap::{Arg, Command};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let matches = Command::new("nfa-dump")
        .version(thompson_nfa::version())
        .about("Compiles the expressions of a schema file into NFAs and prints them")
        .arg(
            Arg::new("schema")
                .help("Path to the expression schema file")
                .required(true)
                .value_name("SCHEMA_FILE"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .help("Only compile the expression with this name")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format")
                .value_parser(["yaml", "debug"])
                .default_value("yaml"),
        )
        .get_matches();

    let schema_path: &String = matches.get_one("schema").expect("schema is required");
    let name: Option<&String> = matches.get_one("name");
    let format: &String = matches.get_one("format").expect("format has a default");

    let schema_config = SchemaConfig::parse_from_file(schema_path.as_str())?;
    let mut num_compiled = 0;
    for schema in schema_config.get_expression_schemas() {
        if name.is_some_and(|name| name != schema.get_name()) {
            continue;
        }

        let nfa = compile(schema.get_expression());
        println!("# {}: {}", schema.get_name(), schema.get_expression());
        match format.as_str() {
            "debug" => println!("{:?}", nfa),
            _ => print!("---\n{}", nfa.to_yaml()?),
        }
        num_compiled += 1;
    }

    if num_compiled == 0 {
        tracing::warn!(schema = %schema_path, "no expression matched");
    }

    Ok(())
}
