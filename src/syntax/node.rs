// Sat Jan 17 2026 - Alex

use crate::model::RecordTag;
use crate::syntax::TypeSpec;
use serde::{Deserialize, Serialize};

/// One declaration handed over by the lexer/parser front end.
///
/// `scope` is the enclosing namespace path; an empty segment stands for an
/// unnamed namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// `static` at namespace scope.
    #[serde(default)]
    pub internal_linkage: bool,
    #[serde(flatten)]
    pub decl: DeclSyntax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclSyntax {
    Namespace {
        #[serde(default)]
        name: Option<String>,
    },
    Typedef {
        name: String,
        target: TypeSpec,
    },
    Enum {
        name: String,
        #[serde(default)]
        underlying: Option<String>,
        members: Vec<EnumeratorSyntax>,
    },
    Variable {
        name: String,
        ty: TypeSpec,
        #[serde(default)]
        initializer: Option<Initializer>,
    },
    Macro {
        name: String,
        #[serde(default)]
        body: Option<String>,
    },
    Record(RecordSyntax),
    Function(FunctionSyntax),
}

impl DeclSyntax {
    pub fn name(&self) -> Option<&str> {
        match self {
            DeclSyntax::Namespace { name } => name.as_deref(),
            DeclSyntax::Typedef { name, .. }
            | DeclSyntax::Enum { name, .. }
            | DeclSyntax::Variable { name, .. }
            | DeclSyntax::Macro { name, .. } => Some(name),
            DeclSyntax::Record(record) => Some(&record.name),
            DeclSyntax::Function(function) => Some(&function.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumeratorSyntax {
    pub name: String,
    /// Raw literal token of an explicit initializer.
    #[serde(default)]
    pub value: Option<String>,
}

/// Literal tokens of a variable initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Initializer {
    Scalar(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSyntax {
    pub name: String,
    #[serde(default)]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSyntax {
    pub name: String,
    pub ty: TypeSpec,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSyntax {
    #[serde(default)]
    pub name: Option<String>,
    pub ty: TypeSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSyntax {
    pub name: String,
    #[serde(default = "TypeSpec::void")]
    pub ret: TypeSpec,
    #[serde(default)]
    pub params: Vec<ParamSyntax>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_pure: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_override: bool,
}

impl MethodSyntax {
    pub fn new(name: &str, ret: TypeSpec) -> Self {
        Self {
            name: name.to_string(),
            ret,
            params: Vec::new(),
            is_virtual: false,
            is_pure: false,
            is_static: false,
            is_const: false,
            is_override: false,
        }
    }

    pub fn param(mut self, ty: TypeSpec) -> Self {
        self.params.push(ParamSyntax { name: None, ty });
        self
    }

    pub fn virtual_(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn pure(mut self) -> Self {
        self.is_virtual = true;
        self.is_pure = true;
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn override_(mut self) -> Self {
        self.is_override = true;
        self
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSyntax {
    pub name: String,
    pub tag: RecordTag,
    #[serde(default)]
    pub bases: Vec<BaseSyntax>,
    #[serde(default)]
    pub fields: Vec<FieldSyntax>,
    #[serde(default)]
    pub methods: Vec<MethodSyntax>,
    #[serde(default = "default_true")]
    pub is_definition: bool,
}

impl RecordSyntax {
    pub fn new(tag: RecordTag, name: &str) -> Self {
        Self {
            name: name.to_string(),
            tag,
            bases: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            is_definition: true,
        }
    }

    pub fn base(mut self, name: &str) -> Self {
        self.bases.push(BaseSyntax {
            name: name.to_string(),
            is_virtual: false,
        });
        self
    }

    pub fn field(mut self, name: &str, ty: TypeSpec) -> Self {
        self.fields.push(FieldSyntax {
            name: name.to_string(),
            ty,
            is_static: false,
        });
        self
    }

    pub fn method(mut self, method: MethodSyntax) -> Self {
        self.methods.push(method);
        self
    }

    pub fn forward(mut self) -> Self {
        self.is_definition = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSyntax {
    pub name: String,
    pub ret: TypeSpec,
    #[serde(default)]
    pub params: Vec<ParamSyntax>,
}

impl SyntaxNode {
    pub fn new(scope: &[&str], decl: DeclSyntax) -> Self {
        Self {
            scope: scope.iter().map(|s| s.to_string()).collect(),
            doc: None,
            internal_linkage: false,
            decl,
        }
    }

    pub fn namespace(scope: &[&str], name: Option<&str>) -> Self {
        Self::new(scope, DeclSyntax::Namespace {
            name: name.map(str::to_string),
        })
    }

    pub fn typedef(scope: &[&str], name: &str, target: TypeSpec) -> Self {
        Self::new(scope, DeclSyntax::Typedef {
            name: name.to_string(),
            target,
        })
    }

    pub fn enumeration(scope: &[&str], name: &str, members: &[(&str, Option<&str>)]) -> Self {
        Self::new(scope, DeclSyntax::Enum {
            name: name.to_string(),
            underlying: None,
            members: members
                .iter()
                .map(|(name, value)| EnumeratorSyntax {
                    name: name.to_string(),
                    value: value.map(str::to_string),
                })
                .collect(),
        })
    }

    pub fn variable(scope: &[&str], name: &str, ty: TypeSpec, initializer: Option<&str>) -> Self {
        Self::new(scope, DeclSyntax::Variable {
            name: name.to_string(),
            ty,
            initializer: initializer.map(|t| Initializer::Scalar(t.to_string())),
        })
    }

    pub fn macro_def(name: &str, body: &str) -> Self {
        Self::new(&[], DeclSyntax::Macro {
            name: name.to_string(),
            body: Some(body.to_string()),
        })
    }

    pub fn record(scope: &[&str], record: RecordSyntax) -> Self {
        Self::new(scope, DeclSyntax::Record(record))
    }

    pub fn function(scope: &[&str], name: &str, ret: TypeSpec, params: Vec<TypeSpec>) -> Self {
        Self::new(scope, DeclSyntax::Function(FunctionSyntax {
            name: name.to_string(),
            ret,
            params: params
                .into_iter()
                .map(|ty| ParamSyntax { name: None, ty })
                .collect(),
        }))
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal_linkage = true;
        self
    }
}
