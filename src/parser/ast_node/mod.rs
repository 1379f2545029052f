pub(crate) mod ast_node;
pub(crate) mod builder;

pub use ast_node::Expression;
pub use builder::Builder;
