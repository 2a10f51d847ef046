//! Decoded class-file types: units, members, body facts, raw references.

use bytemetrics_core::types::SmallVec2;
use serde::{Deserialize, Serialize};

/// Access flag bits that decide a unit's kind.
pub mod access {
    pub const INTERFACE: u16 = 0x0200;
    pub const ANNOTATION: u16 = 0x2000;
    pub const ENUM: u16 = 0x4000;
    pub const MODULE: u16 = 0x8000;
}

/// What kind of program construct a unit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Module,
}

impl UnitKind {
    /// Classify from class-level access flags.
    pub fn from_access_flags(flags: u16) -> Self {
        if flags & access::MODULE != 0 {
            Self::Module
        } else if flags & access::ANNOTATION != 0 {
            Self::Annotation
        } else if flags & access::INTERFACE != 0 {
            Self::Interface
        } else if flags & access::ENUM != 0 {
            Self::Enum
        } else {
            Self::Class
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Annotation => "annotation",
            Self::Module => "module",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A symbolic reference to a field or method of some unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberRef {
    /// Internal name of the owning unit (`tags/File`).
    pub owner: String,
    pub name: String,
    pub descriptor: String,
}

impl MemberRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Identifier of this reference read as a field: `owner#name`.
    pub fn field_id(&self) -> String {
        field_id(&self.owner, &self.name)
    }

    /// Identifier of this reference read as a method: `owner#name(desc)ret`.
    pub fn method_id(&self) -> String {
        method_id(&self.owner, &self.name, &self.descriptor)
    }
}

/// Field identifier used by RFC and LCOM4.
pub fn field_id(owner: &str, name: &str) -> String {
    format!("{owner}#{name}")
}

/// Method identifier used by RFC and LCOM4.
pub fn method_id(owner: &str, name: &str, descriptor: &str) -> String {
    format!("{owner}#{name}{descriptor}")
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

/// A declared method, constructor, or static initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    /// Internal names from the `Exceptions` attribute.
    pub exceptions: Vec<String>,
    /// `None` for abstract and native methods.
    pub body: Option<MethodBody>,
}

impl MethodInfo {
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }
}

/// Facts collected from one method's `Code` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBody {
    /// Every `get*`/`put*` field instruction, in code order.
    pub field_accesses: Vec<MemberRef>,
    /// Every `invoke*` instruction except `invokedynamic`, in code order.
    pub invocations: Vec<MemberRef>,
    /// Units named by `new`, `checkcast`, `instanceof`, array creation and `ldc`.
    pub type_uses: Vec<String>,
    /// Catch types from the exception table (`finally` handlers excluded).
    pub caught: Vec<String>,
}

/// How a decoded reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceKind {
    Superclass,
    Contract,
    FieldType,
    MethodReturn,
    MethodParameter,
    MethodException,
    InstructionTypeUse,
    GenericArgument,
}

impl ReferenceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Superclass => "SUPERCLASS",
            Self::Contract => "CONTRACT",
            Self::FieldType => "FIELD_TYPE",
            Self::MethodReturn => "METHOD_RETURN",
            Self::MethodParameter => "METHOD_PARAMETER",
            Self::MethodException => "METHOD_EXCEPTION",
            Self::InstructionTypeUse => "INSTRUCTION_TYPE_USE",
            Self::GenericArgument => "GENERIC_ARGUMENT",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A cross-unit reference as decoded, before resolution against the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawReference {
    pub kind: ReferenceKind,
    /// Key of the referencing unit.
    pub source: String,
    /// Key of the referenced unit (erased, array element unwrapped).
    pub target: String,
    /// Declaring member of the reference site; `None` for class-level references.
    pub site: Option<String>,
    /// Field or method named by an instruction reference.
    pub target_member: Option<String>,
}

/// One decoded compiled unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedUnit {
    /// Internal name, e.g. `tags/impl/Todo` or `tags/impl/Todo$1`.
    pub key: String,
    pub kind: UnitKind,
    pub access_flags: u16,
    pub major_version: u16,
    pub minor_version: u16,
    pub superclass: Option<String>,
    pub contracts: SmallVec2<String>,
    pub signature: Option<String>,
    /// Value of the `SourceFile` attribute, e.g. `Todo.java`.
    pub source_file: Option<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub references: Vec<RawReference>,
}

impl DecodedUnit {
    /// Every distinct cross-unit reference found in this unit, in discovery order.
    pub fn references(&self) -> impl Iterator<Item = &RawReference> + '_ {
        self.references.iter()
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Package part of the key (`tags/impl`), `None` for the default package.
    pub fn package_name(&self) -> Option<&str> {
        self.key.rfind('/').map(|idx| &self.key[..idx])
    }

    /// Simple name without package (`Todo$1`).
    pub fn simple_name(&self) -> &str {
        self.key.rfind('/').map_or(self.key.as_str(), |idx| &self.key[idx + 1..])
    }

    /// Name of the outermost enclosing unit (`Todo` for `Todo$1`).
    pub fn outer_simple_name(&self) -> &str {
        let simple = self.simple_name();
        simple.split('$').find(|part| !part.is_empty()).unwrap_or(simple)
    }

    /// Identifiers of every declared method.
    pub fn method_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.methods
            .iter()
            .map(move |m| method_id(&self.key, &m.name, &m.descriptor))
    }

    /// Identifiers of every declared field.
    pub fn field_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.fields.iter().map(move |f| field_id(&self.key, &f.name))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, UnitKind::Interface | UnitKind::Annotation)
    }
}
