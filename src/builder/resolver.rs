// Sun Jan 18 2026 - Alex

//! Second pass: resolve written types against the complete name table.

use crate::builder::registry::{NameTable, Pending, PendingSource};
use crate::model::name::display_scope;
use crate::model::{
    Constant, ConstantOrigin, ConstantValue, CycleKind, Entity, EntityBody, EntityKind, Enumeration,
    Enumerator, Field, Function, Method, MethodKind, MethodRole, ModelError, Param, PrimitiveType,
    QualifiedName, Qualifiers, Record, TypeRef, TypedefAlias,
};
use crate::syntax::{
    parse_integer_value, parse_literal, parse_literal_list, DeclSyntax, EnumeratorSyntax, Initializer,
    MethodSyntax, RecordSyntax, TypeSpec,
};
use std::collections::{HashMap, HashSet};

const ELABORATED: [&str; 4] = ["struct ", "class ", "enum ", "typename "];

/// Where a written base name landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Primitive(PrimitiveType),
    Entity(QualifiedName, EntityKind),
}

/// Output of pass 2 for one entity.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub entity: Entity,
    /// Indices of methods written with an explicit `override`.
    pub explicit_overrides: Vec<usize>,
}

pub type AliasTable = HashMap<QualifiedName, Result<TypeRef, ModelError>>;

/// Looks `base` up the way C++ unqualified lookup walks scopes: innermost
/// first, then each enclosing namespace out to the global scope.
pub fn lookup(table: &NameTable, base: &str, scope: &[String]) -> Option<Lookup> {
    let mut written = base.trim();
    for keyword in ELABORATED {
        if let Some(rest) = written.strip_prefix(keyword) {
            written = rest.trim();
        }
    }
    if let Some(primitive) = PrimitiveType::from_name(written) {
        return Some(Lookup::Primitive(primitive));
    }

    let absolute = written.starts_with("::");
    let path = QualifiedName::parse(written);
    let depths: Vec<usize> = if absolute {
        vec![0]
    } else {
        (0..=scope.len()).rev().collect()
    };
    for depth in depths {
        let mut segments = scope[..depth].to_vec();
        segments.extend(path.scope().iter().cloned());
        let candidate = QualifiedName::new(segments, path.name());
        match table.kind_of(&candidate) {
            Some(kind @ (EntityKind::TypedefAlias | EntityKind::Enum | EntityKind::Struct | EntityKind::Class)) => {
                return Some(Lookup::Entity(candidate, kind));
            }
            _ => continue,
        }
    }
    None
}

/// Applies use-site modifiers to a freshly looked-up base.
fn apply(base: TypeRef, spec: &TypeSpec) -> TypeRef {
    let mut ty = base.with_pointer(spec.pointer_depth).with_extent(spec.array_extent);
    ty.is_reference = spec.is_reference;
    ty.qualifiers = qualifiers_of(spec);
    ty
}

fn qualifiers_of(spec: &TypeSpec) -> Qualifiers {
    let mut qualifiers = Qualifiers::empty();
    if spec.is_const {
        qualifiers |= Qualifiers::CONST;
    }
    if spec.is_volatile {
        qualifiers |= Qualifiers::VOLATILE;
    }
    qualifiers
}

/// Stacks use-site modifiers on top of a collapsed alias target.
fn compose(target: &TypeRef, spec: &TypeSpec, entity: &str) -> Result<TypeRef, ModelError> {
    if target.is_array() && spec.is_indirect() {
        return Err(ModelError::Unsupported {
            entity: entity.to_string(),
            reason: format!("pointer or reference to array alias `{}`", spec.base),
        });
    }
    if target.is_reference && spec.pointer_depth > 0 {
        return Err(ModelError::Unsupported {
            entity: entity.to_string(),
            reason: format!("pointer to reference alias `{}`", spec.base),
        });
    }
    let extent = match (target.array_extent, spec.array_extent) {
        (0, e) | (e, 0) => e,
        (a, b) => a.saturating_mul(b),
    };
    Ok(TypeRef {
        base: target.base.clone(),
        pointer_depth: target.pointer_depth.saturating_add(spec.pointer_depth),
        is_reference: target.is_reference || spec.is_reference,
        qualifiers: target.qualifiers | qualifiers_of(spec),
        array_extent: extent,
    })
}

fn unresolved(spec: &TypeSpec, scope: &[String]) -> ModelError {
    ModelError::Resolution {
        symbol: spec.base.clone(),
        scope: display_scope(scope),
    }
}

/// Collapses every typedef to its canonical target, detecting alias cycles.
pub struct AliasCollapser<'a> {
    table: &'a NameTable,
    targets: HashMap<QualifiedName, &'a TypeSpec>,
    done: AliasTable,
    visiting: Vec<QualifiedName>,
}

impl<'a> AliasCollapser<'a> {
    pub fn new(table: &'a NameTable, pending: &[Pending<'a>]) -> Self {
        let targets = pending
            .iter()
            .filter_map(|p| match &p.source {
                PendingSource::Node(node) => match &node.decl {
                    DeclSyntax::Typedef { target, .. } => Some((p.name.clone(), target)),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        Self {
            table,
            targets,
            done: HashMap::new(),
            visiting: Vec::new(),
        }
    }

    pub fn collapse_all(mut self) -> AliasTable {
        let mut names: Vec<QualifiedName> = self.targets.keys().cloned().collect();
        names.sort();
        for name in &names {
            let _ = self.collapse(name);
        }
        self.done
    }

    fn collapse(&mut self, name: &QualifiedName) -> Result<TypeRef, ModelError> {
        if let Some(result) = self.done.get(name) {
            return result.clone();
        }
        if let Some(start) = self.visiting.iter().position(|n| n == name) {
            let mut path = self.visiting[start..].to_vec();
            path.push(name.clone());
            return Err(ModelError::Cycle {
                kind: CycleKind::TypedefAlias,
                path,
            });
        }
        let Some(spec) = self.targets.get(name).copied() else {
            return Err(ModelError::Resolution {
                symbol: name.to_string(),
                scope: display_scope(name.scope()),
            });
        };

        self.visiting.push(name.clone());
        let entity = name.to_string();
        let result = match lookup(self.table, &spec.base, name.scope()) {
            None => Err(unresolved(spec, name.scope())),
            Some(Lookup::Primitive(p)) => Ok(apply(TypeRef::primitive(p), spec)),
            Some(Lookup::Entity(target, EntityKind::TypedefAlias)) => self
                .collapse(&target)
                .and_then(|canonical| compose(&canonical, spec, &entity)),
            Some(Lookup::Entity(target, _)) => Ok(apply(TypeRef::named(target), spec)),
        };
        self.visiting.pop();
        log::trace!("Alias {} -> {:?}", name, result);
        self.done.insert(name.clone(), result.clone());
        result
    }
}

/// Read-only resolution context shared by every pass-2 worker.
pub struct Resolver<'a> {
    table: &'a NameTable,
    aliases: &'a AliasTable,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a NameTable, aliases: &'a AliasTable) -> Self {
        Self { table, aliases }
    }

    pub fn resolve(&self, spec: &TypeSpec, scope: &[String], entity: &str) -> Result<TypeRef, ModelError> {
        match lookup(self.table, &spec.base, scope) {
            None => Err(unresolved(spec, scope)),
            Some(Lookup::Primitive(p)) => Ok(apply(TypeRef::primitive(p), spec)),
            Some(Lookup::Entity(name, EntityKind::TypedefAlias)) => match self.aliases.get(&name) {
                Some(Ok(target)) => compose(target, spec, entity),
                Some(Err(err)) => Err(err.clone()),
                None => Err(unresolved(spec, scope)),
            },
            Some(Lookup::Entity(name, _)) => Ok(apply(TypeRef::named(name), spec)),
        }
    }

    pub fn resolve_entity(&self, pending: &Pending<'_>) -> Result<Resolved, Vec<ModelError>> {
        let body = match &pending.source {
            PendingSource::ImplicitNamespace => EntityBody::Namespace,
            PendingSource::Macro(literal) => EntityBody::Constant(Constant {
                ty: literal.ty.clone(),
                value: literal.value.clone(),
                origin: ConstantOrigin::Macro,
            }),
            PendingSource::Node(node) => match &node.decl {
                DeclSyntax::Namespace { .. } => EntityBody::Namespace,
                DeclSyntax::Macro { .. } => {
                    return Err(vec![ModelError::Unsupported {
                        entity: pending.name.to_string(),
                        reason: "macro registered without a literal body".to_string(),
                    }])
                }
                DeclSyntax::Typedef { .. } => match self.aliases.get(&pending.name) {
                    Some(Ok(target)) => EntityBody::TypedefAlias(TypedefAlias { target: target.clone() }),
                    Some(Err(err)) => return Err(vec![err.clone()]),
                    None => return Err(vec![unresolved(&TypeSpec::new(pending.name.name()), pending.name.scope())]),
                },
                DeclSyntax::Enum { underlying, members, .. } => {
                    EntityBody::Enum(self.resolve_enum(&pending.name, underlying.as_deref(), members)?)
                }
                DeclSyntax::Variable { ty, initializer, .. } => {
                    EntityBody::Constant(self.resolve_constant(&pending.name, ty, initializer.as_ref())?)
                }
                DeclSyntax::Function(function) => {
                    let scope = pending.name.scope();
                    let entity = pending.name.to_string();
                    let mut errors = Vec::new();
                    let ret = self.resolve(&function.ret, scope, &entity).map_err(|e| errors.push(e)).ok();
                    let mut params = Vec::with_capacity(function.params.len());
                    for param in &function.params {
                        match self.resolve(&param.ty, scope, &entity) {
                            Ok(ty) => params.push(Param {
                                name: param.name.clone(),
                                ty,
                            }),
                            Err(e) => errors.push(e),
                        }
                    }
                    match ret {
                        Some(ret) if errors.is_empty() => EntityBody::Function(Function { ret, params }),
                        _ => return Err(errors),
                    }
                }
                DeclSyntax::Record(record) => {
                    let (resolved, explicit_overrides) = self.resolve_record(&pending.name, record)?;
                    let body = match pending.kind {
                        EntityKind::Class => EntityBody::Class(resolved),
                        _ => EntityBody::Struct(resolved),
                    };
                    return Ok(Resolved {
                        entity: self.entity(pending, body),
                        explicit_overrides,
                    });
                }
            },
        };
        Ok(Resolved {
            entity: self.entity(pending, body),
            explicit_overrides: Vec::new(),
        })
    }

    fn entity(&self, pending: &Pending<'_>, body: EntityBody) -> Entity {
        let mut entity = Entity::new(pending.name.clone(), body);
        entity.visibility = pending.visibility;
        entity.doc = pending.doc.clone();
        entity
    }

    fn resolve_enum(
        &self,
        name: &QualifiedName,
        underlying: Option<&str>,
        members: &[EnumeratorSyntax],
    ) -> Result<Enumeration, Vec<ModelError>> {
        let mut errors = Vec::new();
        let underlying = match underlying {
            None => PrimitiveType::Int,
            Some(written) => match lookup(self.table, written, name.scope()) {
                Some(Lookup::Primitive(p)) if p.is_integer() => p,
                Some(Lookup::Entity(alias, EntityKind::TypedefAlias)) => {
                    match self.aliases.get(&alias).and_then(|r| r.as_ref().ok()) {
                        Some(target) if target.as_primitive().map(|p| p.is_integer()).unwrap_or(false) => {
                            target.as_primitive().unwrap_or(PrimitiveType::Int)
                        }
                        _ => {
                            errors.push(ModelError::Unsupported {
                                entity: name.to_string(),
                                reason: format!("underlying type `{}` is not an integer", written),
                            });
                            PrimitiveType::Int
                        }
                    }
                }
                _ => {
                    errors.push(ModelError::Unsupported {
                        entity: name.to_string(),
                        reason: format!("underlying type `{}` is not an integer", written),
                    });
                    PrimitiveType::Int
                }
            },
        };

        let mut seen = HashSet::new();
        let mut next: i128 = 0;
        let mut resolved = Vec::with_capacity(members.len());
        for member in members {
            if !seen.insert(member.name.as_str()) {
                errors.push(ModelError::Duplicate(format!("{}::{}", name, member.name)));
                continue;
            }
            let (value, explicit) = match member.value.as_deref() {
                None => (next, false),
                Some(token) => match parse_integer_value(token) {
                    Some(value) => (value, true),
                    None => {
                        errors.push(ModelError::InvalidLiteral {
                            entity: format!("{}::{}", name, member.name),
                            token: token.to_string(),
                        });
                        continue;
                    }
                },
            };
            next = value + 1;
            resolved.push(Enumerator {
                name: member.name.clone(),
                value,
                explicit,
            });
        }

        if errors.is_empty() {
            Ok(Enumeration {
                underlying,
                members: resolved,
            })
        } else {
            Err(errors)
        }
    }

    fn resolve_constant(
        &self,
        name: &QualifiedName,
        spec: &TypeSpec,
        initializer: Option<&Initializer>,
    ) -> Result<Constant, Vec<ModelError>> {
        let entity = name.to_string();
        let ty = self.resolve(spec, name.scope(), &entity).map_err(|e| vec![e])?;
        if ty.as_primitive().is_none() || ty.is_reference {
            return Err(vec![ModelError::Unsupported {
                entity,
                reason: format!("constant of non-primitive type `{}`", ty),
            }]);
        }
        let value = match initializer {
            None => {
                return Err(vec![ModelError::Unsupported {
                    entity,
                    reason: "constant without an initializer".to_string(),
                }])
            }
            Some(Initializer::Scalar(token)) => parse_literal(token).map(|p| p.value).ok_or_else(|| {
                vec![ModelError::InvalidLiteral {
                    entity: entity.clone(),
                    token: token.clone(),
                }]
            })?,
            Some(Initializer::List(tokens)) => parse_literal_list(tokens)
                .map(|(values, _)| ConstantValue::Array(values))
                .ok_or_else(|| {
                    vec![ModelError::InvalidLiteral {
                        entity: entity.clone(),
                        token: format!("{{{}}}", tokens.join(", ")),
                    }]
                })?,
        };
        Ok(Constant {
            ty,
            value,
            origin: ConstantOrigin::Variable,
        })
    }

    fn resolve_record(
        &self,
        name: &QualifiedName,
        syntax: &RecordSyntax,
    ) -> Result<(Record, Vec<usize>), Vec<ModelError>> {
        let entity = name.to_string();
        let scope = name.as_scope();
        let mut errors = Vec::new();
        let mut record = Record::new(syntax.tag);
        record.is_complete = syntax.is_definition;

        match syntax.bases.as_slice() {
            [] => {}
            [base] if base.is_virtual => errors.push(ModelError::Unsupported {
                entity: entity.clone(),
                reason: format!("virtual inheritance from `{}`", base.name),
            }),
            [base] => match self.resolve_base(&base.name, name.scope(), &entity) {
                Ok(base) => record.base = Some(base),
                Err(e) => errors.push(e),
            },
            bases => errors.push(ModelError::Unsupported {
                entity: entity.clone(),
                reason: format!("multiple inheritance ({} bases)", bases.len()),
            }),
        }

        let mut field_names = HashSet::new();
        for field in &syntax.fields {
            if field.is_static {
                log::debug!("Skipping static member {}::{}", name, field.name);
                continue;
            }
            if !field_names.insert(field.name.as_str()) {
                errors.push(ModelError::Duplicate(format!("{}::{}", name, field.name)));
                continue;
            }
            match self.resolve(&field.ty, &scope, &entity) {
                Ok(ty) if ty.is_by_value() && ty.as_primitive() == Some(PrimitiveType::Void) => {
                    errors.push(ModelError::Unsupported {
                        entity: format!("{}::{}", name, field.name),
                        reason: "field of type void".to_string(),
                    })
                }
                Ok(ty) => record.fields.push(Field::new(&field.name, ty)),
                Err(e) => errors.push(e),
            }
        }

        let mut explicit_overrides = Vec::new();
        let mut signatures = HashSet::new();
        for syntax_method in &syntax.methods {
            match self.resolve_method(name, &scope, syntax_method) {
                Ok(method) => {
                    if !signatures.insert(method.slot_key()) {
                        errors.push(ModelError::Duplicate(format!("{}::{}", name, method.signature())));
                        continue;
                    }
                    if syntax_method.is_override {
                        explicit_overrides.push(record.methods.len());
                    }
                    record.methods.push(method);
                }
                Err(mut method_errors) => errors.append(&mut method_errors),
            }
        }

        if errors.is_empty() {
            Ok((record, explicit_overrides))
        } else {
            Err(errors)
        }
    }

    fn resolve_base(&self, written: &str, scope: &[String], entity: &str) -> Result<QualifiedName, ModelError> {
        let ty = self.resolve(&TypeSpec::new(written), scope, entity)?;
        match ty.embedded_name() {
            Some(base) if matches!(self.table.kind_of(base), Some(EntityKind::Struct | EntityKind::Class)) => {
                Ok(base.clone())
            }
            _ => Err(ModelError::Unsupported {
                entity: entity.to_string(),
                reason: format!("base `{}` is not a class", written),
            }),
        }
    }

    fn resolve_method(
        &self,
        record: &QualifiedName,
        scope: &[String],
        syntax: &MethodSyntax,
    ) -> Result<Method, Vec<ModelError>> {
        let entity = format!("{}::{}", record, syntax.name);
        let role = if syntax.name == record.name() {
            MethodRole::Constructor
        } else if syntax.name.starts_with('~') {
            MethodRole::Destructor
        } else {
            MethodRole::Ordinary
        };
        let kind = match (syntax.is_static, syntax.is_pure, syntax.is_virtual || syntax.is_pure) {
            (true, _, true) => {
                return Err(vec![ModelError::Unsupported {
                    entity,
                    reason: "static method declared virtual".to_string(),
                }])
            }
            (true, _, false) => MethodKind::Static,
            (false, true, _) => MethodKind::PureVirtual,
            (false, false, true) => MethodKind::Virtual,
            (false, false, false) => MethodKind::NonVirtual,
        };
        if role == MethodRole::Constructor && kind.is_virtual() {
            return Err(vec![ModelError::Unsupported {
                entity,
                reason: "virtual constructor".to_string(),
            }]);
        }

        let mut errors = Vec::new();
        let ret = match role {
            MethodRole::Ordinary => self.resolve(&syntax.ret, scope, &entity).map_err(|e| errors.push(e)).ok(),
            _ => Some(TypeRef::void()),
        };
        let mut params = Vec::with_capacity(syntax.params.len());
        for param in &syntax.params {
            match self.resolve(&param.ty, scope, &entity) {
                Ok(ty) => params.push(ty),
                Err(e) => errors.push(e),
            }
        }
        match ret {
            Some(ret) if errors.is_empty() => {
                let mut method = Method::new(&syntax.name, ret, kind);
                method.params = params;
                method.role = role;
                method.is_const = syntax.is_const;
                Ok(method)
            }
            _ => Err(errors),
        }
    }
}
