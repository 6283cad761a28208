// Sat Jan 17 2026 - Alex

pub mod type_spec;
pub mod node;
pub mod literal;
pub mod loader;

pub use type_spec::TypeSpec;
pub use node::{
    BaseSyntax, DeclSyntax, EnumeratorSyntax, FieldSyntax, FunctionSyntax, Initializer, MethodSyntax,
    ParamSyntax, RecordSyntax, SyntaxNode,
};
pub use literal::{parse_integer_value, parse_literal, parse_literal_list, ParsedLiteral};
pub use loader::SourceVersion;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed declaration stream in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
