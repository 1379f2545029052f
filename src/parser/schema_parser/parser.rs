use crate::error_handling::Error::{InvalidSchema, MissingSchemaKey, UnsupportedExpression};
use crate::error_handling::Result;
use crate::parser::ast_node::ast_node::Expression;
use crate::parser::ast_node::builder::Builder;
use indexmap::IndexMap;
use serde_yaml::Value;
use std::sync::Arc;
use tracing::debug;

pub struct ExpressionSchema {
    name: String,
    expression: Arc<Expression>,
}

impl ExpressionSchema {
    pub fn new(name: String, expression: Arc<Expression>) -> ExpressionSchema {
        Self { name, expression }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_expression(&self) -> &Arc<Expression> {
        &self.expression
    }
}

/// Named expressions loaded from YAML, in document order.
///
/// ```yaml
/// expressions:
///   a_then_bs:
///     concat:
///       - symbol: a
///       - iterate:
///           symbol: b
///   nothing: empty
/// ```
pub struct SchemaConfig {
    expression_schemas: Vec<ExpressionSchema>,
}

impl SchemaConfig {
    pub fn get_expression_schemas(&self) -> &Vec<ExpressionSchema> {
        &self.expression_schemas
    }

    pub fn get_expression(&self, name: &str) -> Option<&Arc<Expression>> {
        self.expression_schemas
            .iter()
            .find(|schema| schema.get_name() == name)
            .map(ExpressionSchema::get_expression)
    }
}

impl SchemaConfig {
    const EXPRESSIONS_KEY: &'static str = "expressions";

    const EMPTY_KIND: &'static str = "empty";
    const SYMBOL_KIND: &'static str = "symbol";
    const ITERATE_KIND: &'static str = "iterate";
    const UNION_KIND: &'static str = "union";
    const CONCAT_KIND: &'static str = "concat";

    pub fn parse_from_file(yaml_file_path: &str) -> Result<SchemaConfig> {
        let contents = std::fs::read_to_string(yaml_file_path)?;
        let config = Self::parse_from_str(contents.as_str())?;
        debug!(
            path = yaml_file_path,
            num_expressions = config.expression_schemas.len(),
            "loaded expression schema"
        );
        Ok(config)
    }

    pub fn parse_from_str(yaml_content: &str) -> Result<SchemaConfig> {
        let kv_pairs: IndexMap<String, Value> = serde_yaml::from_str(yaml_content)?;
        Self::load_from_kv_pairs(kv_pairs)
    }

    fn get_key_value<'a>(
        kv_map: &'a IndexMap<String, Value>,
        key: &'static str,
    ) -> Result<&'a Value> {
        kv_map.get(key).ok_or(MissingSchemaKey(key))
    }

    fn load_from_kv_pairs(kv_pairs: IndexMap<String, Value>) -> Result<Self> {
        let expressions = Self::get_key_value(&kv_pairs, Self::EXPRESSIONS_KEY)?;
        let Value::Mapping(map) = expressions else {
            return Err(InvalidSchema("`expressions` must be a mapping"));
        };

        let mut expression_schemas: Vec<ExpressionSchema> = Vec::new();
        for (key, value) in map {
            let Value::String(name) = key else {
                return Err(InvalidSchema("expression names must be strings"));
            };
            let builder = Self::load_expression(value)?;
            debug!(name = %name, expression = %builder.expression(), "loaded expression");
            expression_schemas.push(ExpressionSchema::new(
                name.clone(),
                builder.into_expression(),
            ));
        }

        Ok(Self { expression_schemas })
    }

    fn load_expression(value: &Value) -> Result<Builder> {
        match value {
            Value::String(kind) if kind == Self::EMPTY_KIND => Ok(Builder::empty()),
            Value::String(kind) => Err(UnsupportedExpression(kind.clone())),
            Value::Mapping(map) => {
                if map.len() != 1 {
                    return Err(InvalidSchema(
                        "an expression node must have exactly one kind key",
                    ));
                }
                let Some((Value::String(kind), operand)) = map.iter().next() else {
                    return Err(InvalidSchema("expression kinds must be strings"));
                };
                match kind.as_str() {
                    Self::SYMBOL_KIND => match operand {
                        Value::String(s) => Builder::try_symbol(s),
                        _ => Err(InvalidSchema("`symbol` takes a one-character string")),
                    },
                    Self::ITERATE_KIND => Ok(Self::load_expression(operand)?.iterate()),
                    Self::UNION_KIND => {
                        Self::fold_operands(operand, |acc, next| acc.union(next))
                    }
                    Self::CONCAT_KIND => {
                        Self::fold_operands(operand, |acc, next| acc.concat(next))
                    }
                    _ => Err(UnsupportedExpression(kind.clone())),
                }
            }
            _ => Err(InvalidSchema(
                "an expression node must be `empty` or a single-key mapping",
            )),
        }
    }

    // Left-folds `[e1, e2, e3]` into `op(op(e1, e2), e3)`.
    fn fold_operands(
        operands: &Value,
        op: impl Fn(Builder, Builder) -> Builder,
    ) -> Result<Builder> {
        let Value::Sequence(sequence) = operands else {
            return Err(InvalidSchema("`union` and `concat` take a sequence"));
        };
        if sequence.len() < 2 {
            return Err(InvalidSchema(
                "`union` and `concat` take at least two operands",
            ));
        }

        let mut operands = sequence.iter();
        let mut builder = match operands.next() {
            Some(first) => Self::load_expression(first)?,
            None => return Err(InvalidSchema("`union` and `concat` take a sequence")),
        };
        for operand in operands {
            builder = op(builder, Self::load_expression(operand)?);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::Error;

    #[test]
    fn test_read_example_schema_file() -> Result<()> {
        let project_root = env!("CARGO_MANIFEST_DIR");
        let schema_path = std::path::Path::new(project_root)
            .join("demos")
            .join("expressions.yaml");
        let parsed_schema = SchemaConfig::parse_from_file(schema_path.to_str().unwrap())?;

        let expected_names: Vec<String> = vec![
            "a_then_bs".to_string(),
            "a_or_b".to_string(),
            "nothing".to_string(),
            "binary_words".to_string(),
            "identifier".to_string(),
        ];
        let actual_names: Vec<String> = parsed_schema
            .get_expression_schemas()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect();
        assert_eq!(expected_names, actual_names);

        assert_eq!(
            parsed_schema.get_expression("a_then_bs").unwrap().to_string(),
            "ab*"
        );
        assert_eq!(
            parsed_schema.get_expression("binary_words").unwrap().to_string(),
            "(0|1)*"
        );
        assert_eq!(**parsed_schema.get_expression("nothing").unwrap(), Expression::Empty);
        assert!(parsed_schema.get_expression("missing").is_none());

        Ok(())
    }

    #[test]
    fn test_variadic_operators_fold_left() -> Result<()> {
        let schema = SchemaConfig::parse_from_str(
            r"
expressions:
  abc:
    union:
      - symbol: a
      - symbol: b
      - symbol: c
",
        )?;
        let expected = Builder::symbol('a')
            .union(Builder::symbol('b'))
            .union(Builder::symbol('c'))
            .into_expression();
        assert_eq!(schema.get_expression("abc").unwrap(), &expected);
        Ok(())
    }

    #[test]
    fn test_missing_expressions_key() {
        let result = SchemaConfig::parse_from_str("variables: {}\n");
        assert!(matches!(result, Err(Error::MissingSchemaKey("expressions"))));
    }

    #[test]
    fn test_unsupported_expression_kind() {
        let yaml = "expressions:\n  x:\n    plus:\n      symbol: a\n";
        let result = SchemaConfig::parse_from_str(yaml);
        assert!(matches!(result, Err(Error::UnsupportedExpression(kind)) if kind == "plus"));

        let result = SchemaConfig::parse_from_str("expressions:\n  x: anything\n");
        assert!(matches!(result, Err(Error::UnsupportedExpression(kind)) if kind == "anything"));
    }

    #[test]
    fn test_invalid_symbol() {
        let result = SchemaConfig::parse_from_str("expressions:\n  x:\n    symbol: ab\n");
        assert!(matches!(result, Err(Error::InvalidSymbol(s)) if s == "ab"));

        let result = SchemaConfig::parse_from_str("expressions:\n  x:\n    symbol: ''\n");
        assert!(matches!(result, Err(Error::InvalidSymbol(s)) if s.is_empty()));
    }

    #[test]
    fn test_invalid_shapes() {
        for yaml in [
            "expressions: [a, b]\n",
            "expressions:\n  x: 3\n",
            "expressions:\n  x:\n    symbol: a\n    iterate: empty\n",
            "expressions:\n  x:\n    union:\n      - symbol: a\n",
            "expressions:\n  x:\n    concat:\n      symbol: a\n",
            "expressions:\n  x:\n    symbol: [a]\n",
        ] {
            let result = SchemaConfig::parse_from_str(yaml);
            assert!(matches!(result, Err(Error::InvalidSchema(_))), "{}", yaml);
        }
    }

    #[test]
    fn test_yaml_syntax_error() {
        let result = SchemaConfig::parse_from_str("expressions: [unclosed\n");
        assert!(matches!(result, Err(Error::YamlParsingError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = SchemaConfig::parse_from_file("/nonexistent/expressions.yaml");
        assert!(matches!(result, Err(Error::IOError(_))));
    }
}
