//! Thompson's construction: compiles regular expression trees into epsilon-NFAs.
//!
//! ```
//! use thompson_nfa::nfa::compile;
//! use thompson_nfa::parser::Builder;
//!
//! let exp = Builder::symbol('a').union(Builder::symbol('b')).into_expression();
//! let nfa = compile(&exp);
//! assert_eq!(nfa.get_num_states(), 6);
//! ```

pub mod error_handling;
pub mod nfa;
pub mod parser;

const VERSION: &str = "0.0.1";

pub fn version() -> &'static str {
    VERSION
}
