// Tue Jan 13 2026 - Alex

//! Syntax-node fixtures mirroring the evolving `for_test.hpp` header.

use crate::builder::ModelBuilder;
use crate::config::Config;
use crate::model::{DeclarationModel, RecordTag};
use crate::structure::{AnnotatedModel, LayoutEstimator};
use crate::syntax::{
    DeclSyntax, EnumeratorSyntax, Initializer, MethodSyntax, RecordSyntax, SourceVersion, SyntaxNode, TypeSpec,
};

pub const NS: &str = "for_test_namespace";
pub const INNER: &str = "inner_namespace";

/// Successive snapshots of the fixture header; each stage keeps everything
/// the previous one declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ForTestStage {
    /// Namespaces, typedefs, enum, constants and `struct S1`.
    Plain,
    /// Adds `S1 build_s1(int, const char*)`.
    BuildFunction,
    /// Adds the abstract `class C2`.
    PureVirtual,
    /// Adds `class C1` holding a `C2*`.
    Composition,
    /// Adds by-value, by-pointer and by-reference `S1` consumers.
    PassVariants,
    /// Gives `C1` a non-trivial destructor.
    Destructor,
}

pub fn s1(fields: &[(&str, TypeSpec)]) -> SyntaxNode {
    let mut record = RecordSyntax::new(RecordTag::Struct, "S1");
    for (name, ty) in fields {
        record = record.field(name, ty.clone());
    }
    SyntaxNode::record(&[NS], record)
}

pub fn default_s1() -> SyntaxNode {
    s1(&[("a", TypeSpec::new("int")), ("b", TypeSpec::new("CharsType"))])
}

pub fn c2(methods: Vec<MethodSyntax>) -> SyntaxNode {
    let mut record = RecordSyntax::new(RecordTag::Class, "C2");
    for method in methods {
        record = record.method(method);
    }
    SyntaxNode::record(&[NS], record)
}

pub fn pure_virtual_method() -> MethodSyntax {
    MethodSyntax::new("pure_virtual_method", TypeSpec::new("int")).pure()
}

pub fn c1(with_destructor: bool) -> SyntaxNode {
    let mut record = RecordSyntax::new(RecordTag::Class, "C1")
        .field("c2_", TypeSpec::new("C2").pointer(1))
        .method(MethodSyntax::new("C1", TypeSpec::void()).param(TypeSpec::new("C2").pointer(1)))
        .method(MethodSyntax::new("call_c2", TypeSpec::new("int")).constant());
    if with_destructor {
        record = record.method(MethodSyntax::new("~C1", TypeSpec::void()));
    }
    SyntaxNode::record(&[NS], record)
}

/// Declarations shared by every stage, up to and including `struct S1`.
pub fn header_nodes() -> Vec<SyntaxNode> {
    vec![
        SyntaxNode::macro_def("_FOR_TEST_HPP_8469114_", ""),
        SyntaxNode::typedef(&[NS, INNER], "IntType", TypeSpec::new("int")).with_doc("comment for IntType"),
        SyntaxNode::new(
            &[NS, INNER],
            DeclSyntax::Enum {
                name: "EnumType".into(),
                underlying: None,
                members: vec![
                    EnumeratorSyntax {
                        name: "ENUM_START".into(),
                        value: Some("0".into()),
                    },
                    EnumeratorSyntax {
                        name: "ENUM_MIDDLE".into(),
                        value: None,
                    },
                    EnumeratorSyntax {
                        name: "ENUM_END".into(),
                        value: Some("3".into()),
                    },
                ],
            },
        ),
        SyntaxNode::variable(&[NS, INNER], "CONST_1", TypeSpec::new("int").constant(), Some("1")),
        SyntaxNode::variable(&[NS], "CONST_2", TypeSpec::new("unsigned long").constant(), Some("0x0A")),
        SyntaxNode::typedef(&[NS], "CharsType", TypeSpec::new("char").array(7)),
        SyntaxNode::variable(&[NS, "bar"], "n", TypeSpec::new("int"), Some("3")),
        default_s1(),
        SyntaxNode::variable(&[], "CONST_3", TypeSpec::new("long long").constant(), Some("3")),
        SyntaxNode::new(
            &[],
            DeclSyntax::Variable {
                name: "PRIMES".into(),
                ty: TypeSpec::new("int").constant().array(3),
                initializer: Some(Initializer::List(vec!["2".into(), "3".into(), "5".into()])),
            },
        ),
        SyntaxNode::macro_def("DEFINE_1", "'1'"),
    ]
}

pub fn for_test_nodes(stage: ForTestStage) -> Vec<SyntaxNode> {
    let mut nodes = header_nodes();
    if stage >= ForTestStage::BuildFunction {
        nodes.push(SyntaxNode::function(
            &[NS],
            "build_s1",
            TypeSpec::new("S1"),
            vec![TypeSpec::new("int"), TypeSpec::new("char").constant().pointer(1)],
        ));
    }
    if stage >= ForTestStage::PureVirtual {
        nodes.push(c2(vec![pure_virtual_method()]));
    }
    if stage >= ForTestStage::Composition {
        nodes.push(c1(stage >= ForTestStage::Destructor));
    }
    if stage >= ForTestStage::PassVariants {
        nodes.push(SyntaxNode::function(&[NS], "use_s1_value", TypeSpec::void(), vec![TypeSpec::new("S1")]));
        nodes.push(SyntaxNode::function(
            &[NS],
            "use_s1_pointer",
            TypeSpec::void(),
            vec![TypeSpec::new("S1").pointer(1)],
        ));
        nodes.push(SyntaxNode::function(
            &[NS],
            "use_s1_reference",
            TypeSpec::void(),
            vec![TypeSpec::new("S1").constant().reference()],
        ));
    }
    nodes
}

pub fn for_test_version(stage: ForTestStage) -> SourceVersion {
    let mut version = SourceVersion::new(&format!("{:?}", stage).to_lowercase(), for_test_nodes(stage));
    version.header = Some("for_test.hpp".to_string());
    version
}

/// Replaces the node declaring `name` (by local name) or appends it.
pub fn replace_node(nodes: &mut Vec<SyntaxNode>, replacement: SyntaxNode) {
    let name = replacement.decl.name().map(str::to_string);
    match nodes
        .iter()
        .position(|n| n.scope == replacement.scope && n.decl.name().map(str::to_string) == name)
    {
        Some(index) => nodes[index] = replacement,
        None => nodes.push(replacement),
    }
}

pub fn build_model(label: &str, nodes: &[SyntaxNode]) -> DeclarationModel {
    let config = Config::default();
    ModelBuilder::new(&config)
        .build_nodes(label, nodes)
        .unwrap_or_else(|e| panic!("fixture failed to build: {}", e))
}

pub fn annotate(label: &str, nodes: &[SyntaxNode]) -> AnnotatedModel {
    let config = Config::default();
    LayoutEstimator::new(&config).estimate(build_model(label, nodes))
}
