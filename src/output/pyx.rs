// Mon Jan 19 2026 - Alex

//! Python-side `_proxy.pyx` module re-exporting enums and constants
//! declared through the matching `.pxd`.

use crate::model::{Constant, ConstantOrigin, ConstantValue, Entity, Enumeration};
use crate::output::ModelVisitor;
use std::path::{Path, PathBuf};

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct PyxWriter {
    module: String,
    lines: Vec<String>,
}

impl PyxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<dir>/<header stem>_proxy.pyx`
    pub fn file_name(directory: &Path, header: &str) -> PathBuf {
        directory.join(format!("{}_proxy.pyx", module_name(header)))
    }

    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn into_string(self) -> String {
        self.render()
    }

    fn line(&mut self, text: String) {
        self.lines.push(text);
    }
}

/// Module name `cimport` uses for the declarations of `header`.
fn module_name(header: &str) -> String {
    Path::new(header)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bindings".to_string())
}

/// Python spelling of a scalar literal; arrays have none.
fn python_literal(value: &ConstantValue) -> Option<String> {
    match value {
        ConstantValue::Bool(true) => Some("True".to_string()),
        ConstantValue::Bool(false) => Some("False".to_string()),
        ConstantValue::Array(_) => None,
        other => Some(other.to_string()),
    }
}

impl ModelVisitor for PyxWriter {
    fn on_file_begin(&mut self, header: &str) {
        self.module = module_name(header);
        self.lines.clear();
        self.line("# distutils: language = c++".to_string());
        self.line(format!("cimport {}", self.module));
        self.line("import enum".to_string());
    }

    fn on_enum(&mut self, entity: &Entity, enumeration: &Enumeration) {
        self.line(String::new());
        self.line(format!("class {}(enum.IntEnum):", entity.name.name()));
        if enumeration.members.is_empty() {
            self.line(format!("{}pass", INDENT));
        }
        for member in &enumeration.members {
            let text = format!("{}{} = {}.{}", INDENT, member.name, self.module, member.name);
            self.line(text);
        }
    }

    fn on_constant(&mut self, entity: &Entity, constant: &Constant) {
        let name = entity.name.name();
        match (constant.origin, &constant.value) {
            (ConstantOrigin::Macro, value) => match python_literal(value) {
                Some(literal) => self.line(format!("{} = {}", name, literal)),
                None => log::trace!("No Python literal for macro {}", entity.name),
            },
            (ConstantOrigin::Variable, ConstantValue::Integer(_)) if !constant.ty.is_array() => {
                let text = format!("{} = {}.{}", name, self.module, name);
                self.line(text);
            }
            _ => log::trace!("No pyx export for constant {}", entity.name),
        }
    }
}
