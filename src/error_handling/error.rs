#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A symbol payload was not exactly one character.
    #[error("invalid symbol {0:?}: expected exactly one character")]
    InvalidSymbol(String),

    /// An expression kind that the compiler does not know how to lower.
    #[error("unsupported expression kind `{0}`")]
    UnsupportedExpression(String),

    #[error("failed to parse YAML: {0}")]
    YamlParsingError(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("missing schema key `{0}`")]
    MissingSchemaKey(&'static str),

    #[error("invalid schema: {0}")]
    InvalidSchema(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
