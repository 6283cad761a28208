// Tue Jan 13 2026 - Alex

//! Cython `.pxd` declarations for the public surface of a header.

use crate::model::{
    Constant, ConstantOrigin, ConstantValue, Entity, Enumeration, Function, Method, MethodKind, MethodRole,
    QualifiedName, Record, RecordTag, TypeBase, TypeRef, TypedefAlias,
};
use crate::output::ModelVisitor;
use itertools::Itertools;
use std::path::{Path, PathBuf};

const INDENT: &str = "    ";

/// Emits one `cdef extern from` block per namespace run.
///
/// Cython does not nest extern blocks, so leaving a namespace reopens the
/// enclosing one the next time it declares something. Blocks that would
/// stay empty are never written.
#[derive(Debug, Default)]
pub struct PxdWriter {
    header: String,
    lines: Vec<String>,
    namespaces: Vec<QualifiedName>,
    block_open: bool,
}

impl PxdWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<dir>/<header stem>.pxd`
    pub fn file_name(directory: &Path, header: &str) -> PathBuf {
        let stem = Path::new(header)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bindings".to_string());
        directory.join(format!("{}.pxd", stem))
    }

    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn into_string(self) -> String {
        self.render()
    }

    fn block_header(&self) -> String {
        match self.namespaces.last() {
            Some(namespace) => format!(
                "cdef extern from \"{}\" namespace \"{}\":",
                self.header,
                namespace.to_path()
            ),
            None => format!("cdef extern from \"{}\":", self.header),
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        if !self.block_open {
            if !self.lines.is_empty() {
                self.lines.push(String::new());
            }
            let header = self.block_header();
            self.lines.push(header);
            self.block_open = true;
        }
        self.lines.push(format!("{}{}", INDENT.repeat(depth), text));
    }

    fn doc(&mut self, entity: &Entity) {
        if let Some(doc) = &entity.doc {
            for line in doc.lines() {
                self.line(1, &format!("# {}", line.trim()));
            }
        }
    }

    fn method(&mut self, class: &str, method: &Method) {
        let params = method.params.iter().map(|p| declare(p, "")).join(", ");
        match method.role {
            MethodRole::Destructor => {}
            MethodRole::Constructor => self.line(2, &format!("{}({})", class, params)),
            MethodRole::Ordinary => {
                if method.kind == MethodKind::Static {
                    self.line(2, "@staticmethod");
                }
                let suffix = if method.is_const { " const" } else { "" };
                self.line(2, &format!("{}({}){}", declare(&method.ret, &method.name), params, suffix));
            }
        }
    }
}

/// Cython declarator for `name` of type `ty`; an empty name gives an abstract declarator.
pub fn declare(ty: &TypeRef, name: &str) -> String {
    let mut out = String::new();
    if ty.is_const() {
        out.push_str("const ");
    }
    match &ty.base {
        TypeBase::Primitive(primitive) => out.push_str(primitive.spelling()),
        TypeBase::Named(named) => out.push_str(named.name()),
    }
    out.push_str(&"*".repeat(ty.pointer_depth as usize));
    if ty.is_reference {
        out.push('&');
    }
    if !name.is_empty() {
        out.push(' ');
        out.push_str(name);
    }
    if ty.is_array() {
        out.push_str(&format!("[{}]", ty.array_extent));
    }
    out
}

impl ModelVisitor for PxdWriter {
    fn on_file_begin(&mut self, header: &str) {
        self.header = header.to_string();
        self.lines.clear();
        self.namespaces.clear();
        self.block_open = false;
    }

    fn on_file_end(&mut self) {
        if self.lines.is_empty() {
            self.line(1, "pass");
        }
    }

    fn on_namespace_begin(&mut self, namespace: &QualifiedName) {
        self.namespaces.push(namespace.clone());
        self.block_open = false;
    }

    fn on_namespace_end(&mut self, _namespace: &QualifiedName) {
        self.namespaces.pop();
        self.block_open = false;
    }

    fn on_typedef(&mut self, entity: &Entity, alias: &TypedefAlias) {
        self.doc(entity);
        self.line(1, &format!("ctypedef {}", declare(&alias.target, entity.name.name())));
    }

    fn on_enum(&mut self, entity: &Entity, enumeration: &Enumeration) {
        self.doc(entity);
        self.line(1, &format!("cdef enum {}:", entity.name.name()));
        if enumeration.members.is_empty() {
            self.line(2, "pass");
        }
        for member in &enumeration.members {
            self.line(2, &format!("{} = {}", member.name, member.value));
        }
    }

    fn on_constant(&mut self, entity: &Entity, constant: &Constant) {
        if constant.origin == ConstantOrigin::Macro {
            log::trace!("No pxd declaration for macro {}", entity.name);
            return;
        }
        self.doc(entity);
        match constant.value {
            ConstantValue::Integer(value) if !constant.ty.is_array() => {
                self.line(1, &format!("cdef enum: {} = {}", entity.name.name(), value));
            }
            _ => {
                let ty = constant.ty.clone().with_const();
                self.line(1, &declare(&ty, entity.name.name()));
            }
        }
    }

    fn on_record(&mut self, entity: &Entity, record: &Record) {
        let name = entity.name.name();
        let keyword = match record.tag {
            RecordTag::Struct if record.methods.is_empty() => "cdef struct",
            _ => "cdef cppclass",
        };
        self.doc(entity);
        if !record.is_complete {
            self.line(1, &format!("{} {}", keyword, name));
            return;
        }
        let base = record
            .base
            .as_ref()
            .map(|b| format!("({})", b.name()))
            .unwrap_or_default();
        self.line(1, &format!("{} {}{}:", keyword, name, base));

        let before = self.lines.len();
        for field in &record.fields {
            self.line(2, &declare(&field.ty, &field.name));
        }
        for method in &record.methods {
            self.method(name, method);
        }
        if self.lines.len() == before {
            self.line(2, "pass");
        }
    }

    fn on_function(&mut self, entity: &Entity, function: &Function) {
        self.doc(entity);
        let params = function.params.iter().map(|p| declare(&p.ty, "")).join(", ");
        self.line(
            1,
            &format!("{}({})", declare(&function.ret, entity.name.name()), params),
        );
    }
}
