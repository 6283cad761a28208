// Fri Jan 16 2026 - Alex

pub mod name;
pub mod primitive;
pub mod type_ref;
pub mod constant;
pub mod record;
pub mod entity;
pub mod declaration;
pub mod error;

pub use name::{QualifiedName, ANONYMOUS_SEGMENT};
pub use primitive::PrimitiveType;
pub use type_ref::{Qualifiers, TypeBase, TypeRef};
pub use constant::{Constant, ConstantOrigin, ConstantValue};
pub use record::{Field, Method, MethodKind, MethodRole, MethodSignature, Record, RecordTag, SlotKey};
pub use entity::{Entity, EntityBody, EntityKind, Enumeration, Enumerator, Function, Param, TypedefAlias, Visibility};
pub use declaration::{DeclarationModel, SkippedDeclaration};
pub use error::{CycleKind, ModelError};
