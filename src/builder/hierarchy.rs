// Sun Jan 18 2026 - Alex

use crate::model::{CycleKind, Entity, EntityBody, MethodKind, MethodRole, ModelError, QualifiedName, SlotKey};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap, HashSet};

/// One record in the class graph.
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub name: QualifiedName,
    pub base: Option<QualifiedName>,
    /// Records stored by value in this record's fields.
    pub embeds: Vec<QualifiedName>,
}

impl ClassNode {
    pub fn is_root(&self) -> bool {
        self.base.is_none()
    }

    fn edges(&self) -> impl Iterator<Item = (&QualifiedName, bool)> {
        self.base
            .iter()
            .map(|b| (b, true))
            .chain(self.embeds.iter().map(|e| (e, false)))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Base and by-value containment relations between the records of one version.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    nodes: IndexMap<QualifiedName, ClassNode>,
}

impl ClassHierarchy {
    pub fn from_entities(entities: &IndexMap<QualifiedName, Entity>) -> Self {
        let mut nodes = IndexMap::new();
        for (name, entity) in entities {
            let Some(record) = entity.as_record() else {
                continue;
            };
            let embeds = record
                .fields
                .iter()
                .filter_map(|f| f.ty.embedded_name())
                .filter(|n| entities.get(*n).and_then(Entity::as_record).is_some())
                .cloned()
                .collect();
            nodes.insert(
                name.clone(),
                ClassNode {
                    name: name.clone(),
                    base: record.base.clone(),
                    embeds,
                },
            );
        }
        Self { nodes }
    }

    pub fn node(&self, name: &QualifiedName) -> Option<&ClassNode> {
        self.nodes.get(name)
    }

    /// Every base-chain and by-value containment cycle, each reported once
    /// with its full path.
    pub fn find_cycles(&self) -> Vec<ModelError> {
        let mut errors = Vec::new();
        let mut reported: HashSet<BTreeSet<QualifiedName>> = HashSet::new();

        for start in self.nodes.keys() {
            let mut path = vec![start.clone()];
            let mut current = self.nodes.get(start).and_then(|n| n.base.clone());
            while let Some(base) = current {
                if let Some(pos) = path.iter().position(|n| *n == base) {
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(base);
                    if reported.insert(cycle.iter().cloned().collect()) {
                        errors.push(ModelError::Cycle {
                            kind: CycleKind::BaseChain,
                            path: rotate(cycle),
                        });
                    }
                    break;
                }
                current = self.nodes.get(&base).and_then(|n| n.base.clone());
                path.push(base);
            }
        }

        let mut marks: HashMap<&QualifiedName, Mark> =
            self.nodes.keys().map(|n| (n, Mark::Unvisited)).collect();
        for start in self.nodes.keys() {
            if marks.get(start) == Some(&Mark::Unvisited) {
                let mut stack = Vec::new();
                self.visit(start, &mut marks, &mut stack, &mut reported, &mut errors);
            }
        }
        errors
    }

    fn visit<'a>(
        &'a self,
        name: &'a QualifiedName,
        marks: &mut HashMap<&'a QualifiedName, Mark>,
        stack: &mut Vec<(&'a QualifiedName, bool)>,
        reported: &mut HashSet<BTreeSet<QualifiedName>>,
        errors: &mut Vec<ModelError>,
    ) {
        marks.insert(name, Mark::InProgress);
        let Some(node) = self.nodes.get(name) else {
            marks.insert(name, Mark::Done);
            return;
        };
        for (next, via_base) in node.edges() {
            match marks.get(next).copied() {
                Some(Mark::Unvisited) => {
                    stack.push((name, via_base));
                    self.visit(next, marks, stack, reported, errors);
                    stack.pop();
                }
                Some(Mark::InProgress) => {
                    let mut hops: Vec<(&QualifiedName, bool)> = stack.clone();
                    hops.push((name, via_base));
                    let Some(pos) = hops.iter().position(|(n, _)| *n == next) else {
                        continue;
                    };
                    let hops = &hops[pos..];
                    // pure base cycles were already reported above
                    if hops.iter().all(|(_, base)| *base) {
                        continue;
                    }
                    let mut cycle: Vec<QualifiedName> = hops.iter().map(|(n, _)| (*n).clone()).collect();
                    cycle.push(next.clone());
                    if reported.insert(cycle.iter().cloned().collect()) {
                        errors.push(ModelError::Cycle {
                            kind: CycleKind::Containment,
                            path: rotate(cycle),
                        });
                    }
                }
                _ => {}
            }
        }
        marks.insert(name, Mark::Done);
    }

    /// Length of the base chain above `name`. Only meaningful once
    /// [`find_cycles`](Self::find_cycles) came back empty.
    pub fn depth(&self, name: &QualifiedName) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(name).and_then(|n| n.base.as_ref());
        while let Some(base) = current {
            depth += 1;
            if depth > self.nodes.len() {
                break;
            }
            current = self.nodes.get(base).and_then(|n| n.base.as_ref());
        }
        depth
    }

    /// Records ordered so every base precedes its subclasses.
    pub fn bases_first(&self) -> Vec<QualifiedName> {
        let mut names: Vec<(usize, &QualifiedName)> =
            self.nodes.keys().map(|n| (self.depth(n), n)).collect();
        names.sort_by_key(|(depth, _)| *depth);
        names.into_iter().map(|(_, n)| n.clone()).collect()
    }
}

/// Starts a closed cycle path at its smallest member so the same cycle
/// always prints the same way.
fn rotate(mut cycle: Vec<QualifiedName>) -> Vec<QualifiedName> {
    cycle.pop();
    let Some(min) = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    else {
        return cycle;
    };
    cycle.rotate_left(min);
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    cycle
}

/// Marks overriding methods, turning implicit overrides virtual, and
/// rejects `override` markers that match nothing.
pub fn resolve_overrides(
    entities: &mut IndexMap<QualifiedName, Entity>,
    hierarchy: &ClassHierarchy,
    explicit: &HashMap<QualifiedName, Vec<usize>>,
) -> Vec<ModelError> {
    let mut errors = Vec::new();

    for name in hierarchy.bases_first() {
        let mut inherited: HashMap<SlotKey, QualifiedName> = HashMap::new();
        let mut current = hierarchy.node(&name).and_then(|n| n.base.clone());
        while let Some(base) = current {
            if let Some(record) = entities.get(&base).and_then(Entity::as_record) {
                for method in record.virtual_methods() {
                    inherited.entry(method.slot_key()).or_insert_with(|| base.clone());
                }
            }
            current = hierarchy.node(&base).and_then(|n| n.base.clone());
        }

        let marked = explicit.get(&name).map(Vec::as_slice).unwrap_or(&[]);
        let Some(entity) = entities.get_mut(&name) else {
            continue;
        };
        let record = match &mut entity.body {
            EntityBody::Struct(record) | EntityBody::Class(record) => record,
            _ => continue,
        };
        for (index, method) in record.methods.iter_mut().enumerate() {
            let eligible = method.role != MethodRole::Constructor && method.kind != MethodKind::Static;
            match inherited.get(&method.slot_key()) {
                Some(base) if eligible => {
                    method.overrides = Some(base.clone());
                    if method.kind == MethodKind::NonVirtual {
                        log::debug!("{}::{} is implicitly virtual", name, method.name);
                        method.kind = MethodKind::Virtual;
                    }
                }
                _ if marked.contains(&index) => errors.push(ModelError::InvalidOverride {
                    record: name.to_string(),
                    method: method.signature().to_string(),
                }),
                _ => {}
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, Record, RecordTag, TypeRef};

    fn record(name: &str, base: Option<&str>, embeds: &[&str]) -> (QualifiedName, Entity) {
        let mut record = Record::new(RecordTag::Class);
        record.base = base.map(QualifiedName::parse);
        for (i, embedded) in embeds.iter().enumerate() {
            record
                .fields
                .push(Field::new(&format!("f{}", i), TypeRef::named(QualifiedName::parse(embedded))));
        }
        let name = QualifiedName::parse(name);
        (name.clone(), Entity::new(name, EntityBody::Class(record)))
    }

    #[test]
    fn test_base_cycle_reported_once() {
        let entities: IndexMap<_, _> = vec![record("A", Some("B"), &[]), record("B", Some("A"), &[])]
            .into_iter()
            .collect();
        let errors = ClassHierarchy::from_entities(&entities).find_cycles();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "base-class cycle: A -> B -> A");
    }

    #[test]
    fn test_containment_cycle() {
        let entities: IndexMap<_, _> = vec![record("X", None, &["Y"]), record("Y", None, &["X"])]
            .into_iter()
            .collect();
        let errors = ClassHierarchy::from_entities(&entities).find_cycles();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ModelError::Cycle { kind: CycleKind::Containment, path } if path.len() == 3
        ));
    }

    #[test]
    fn test_bases_first_order() {
        let entities: IndexMap<_, _> = vec![
            record("C", Some("B"), &[]),
            record("B", Some("A"), &[]),
            record("A", None, &[]),
        ]
        .into_iter()
        .collect();
        let hierarchy = ClassHierarchy::from_entities(&entities);
        assert!(hierarchy.find_cycles().is_empty());
        let order: Vec<String> = hierarchy.bases_first().iter().map(|n| n.to_string()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert!(hierarchy.node(&QualifiedName::parse("A")).unwrap().is_root());
    }
}
