pub(crate) mod ast_node;

mod schema_parser;

pub use ast_node::Builder;
pub use ast_node::Expression;
pub use schema_parser::parser::ExpressionSchema;
pub use schema_parser::parser::SchemaConfig;
