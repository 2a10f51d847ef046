//! Class-file decoder: bytes in, `DecodedUnit` with its references out.

use bytemetrics_core::config::DecodeConfig;
use bytemetrics_core::constants::CLASS_FILE_MAGIC;
use bytemetrics_core::errors::DecodeError;
use bytemetrics_core::types::{FxHashSet, SmallVec2};

use super::bytecode::walk_code;
use super::constant_pool::ConstantPool;
use super::descriptor::{
    class_constant_target, parse_field_descriptor, parse_method_descriptor, SignatureParser,
};
use super::reader::ClassReader;
use super::types::{
    field_id, method_id, DecodedUnit, FieldInfo, MethodBody, MethodInfo, RawReference,
    ReferenceKind, UnitKind,
};

const ATTR_CODE: &str = "Code";
const ATTR_EXCEPTIONS: &str = "Exceptions";
const ATTR_SIGNATURE: &str = "Signature";
const ATTR_SOURCE_FILE: &str = "SourceFile";

/// Decoder with an artifact size limit.
#[derive(Debug, Clone)]
pub struct ClassDecoder {
    max_artifact_size: u64,
}

impl ClassDecoder {
    pub fn new(config: &DecodeConfig) -> Self {
        Self {
            max_artifact_size: config.effective_max_artifact_size(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedUnit, DecodeError> {
        let size = bytes.len() as u64;
        if size > self.max_artifact_size {
            return Err(DecodeError::TooLarge {
                size,
                max: self.max_artifact_size,
            });
        }
        decode(bytes)
    }
}

impl Default for ClassDecoder {
    fn default() -> Self {
        Self::new(&DecodeConfig::default())
    }
}

/// Decode one class file. Needs nothing but the bytes.
pub fn decode(bytes: &[u8]) -> Result<DecodedUnit, DecodeError> {
    let mut reader = ClassReader::new(bytes);

    let magic = reader.u32()?;
    if magic != CLASS_FILE_MAGIC {
        return Err(DecodeError::BadMagic { found: magic });
    }
    let minor_version = reader.u16()?;
    let major_version = reader.u16()?;
    let pool = ConstantPool::parse(&mut reader)?;

    let access_flags = reader.u16()?;
    let key = pool.class_name(reader.u16()?)?.to_string();
    let superclass = pool.optional_class_name(reader.u16()?)?.map(str::to_string);

    let contract_count = reader.u16()?;
    let mut contracts = SmallVec2::new();
    for _ in 0..contract_count {
        contracts.push(pool.class_name(reader.u16()?)?.to_string());
    }

    let field_count = reader.u16()?;
    let mut fields = Vec::with_capacity(field_count as usize);
    for _ in 0..field_count {
        fields.push(read_field(&mut reader, &pool)?);
    }

    let method_count = reader.u16()?;
    let mut methods = Vec::with_capacity(method_count as usize);
    for _ in 0..method_count {
        methods.push(read_method(&mut reader, &pool)?);
    }

    let mut signature = None;
    let mut source_file = None;
    let attribute_count = reader.u16()?;
    for _ in 0..attribute_count {
        let (name, mut data) = read_attribute(&mut reader, &pool)?;
        match name {
            ATTR_SIGNATURE => signature = Some(pool.utf8(data.u16()?)?.to_string()),
            ATTR_SOURCE_FILE => source_file = Some(pool.utf8(data.u16()?)?.to_string()),
            _ => {}
        }
    }

    let mut unit = DecodedUnit {
        key,
        kind: UnitKind::from_access_flags(access_flags),
        access_flags,
        major_version,
        minor_version,
        superclass,
        contracts,
        signature,
        source_file,
        fields,
        methods,
        references: Vec::new(),
    };
    unit.references = collect_references(&unit)?;

    tracing::debug!(
        key = %unit.key,
        kind = %unit.kind,
        fields = unit.fields.len(),
        methods = unit.methods.len(),
        references = unit.references.len(),
        "decoded unit"
    );

    Ok(unit)
}

/// Read one attribute header and return its name with a reader over its body.
fn read_attribute<'a, 'p>(
    reader: &mut ClassReader<'a>,
    pool: &'p ConstantPool,
) -> Result<(&'p str, ClassReader<'a>), DecodeError> {
    let name = pool.utf8(reader.u16()?)?;
    let length = reader.u32()? as usize;
    Ok((name, ClassReader::new(reader.bytes(length)?)))
}

fn read_field(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<FieldInfo, DecodeError> {
    let access_flags = reader.u16()?;
    let name = pool.utf8(reader.u16()?)?.to_string();
    let descriptor = pool.utf8(reader.u16()?)?.to_string();
    let mut signature = None;

    let attribute_count = reader.u16()?;
    for _ in 0..attribute_count {
        let (attr, mut data) = read_attribute(reader, pool)?;
        if attr == ATTR_SIGNATURE {
            signature = Some(pool.utf8(data.u16()?)?.to_string());
        }
    }

    Ok(FieldInfo {
        access_flags,
        name,
        descriptor,
        signature,
    })
}

fn read_method(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<MethodInfo, DecodeError> {
    let access_flags = reader.u16()?;
    let name = pool.utf8(reader.u16()?)?.to_string();
    let descriptor = pool.utf8(reader.u16()?)?.to_string();
    let mut signature = None;
    let mut exceptions = Vec::new();
    let mut body = None;

    let attribute_count = reader.u16()?;
    for _ in 0..attribute_count {
        let (attr, mut data) = read_attribute(reader, pool)?;
        match attr {
            ATTR_CODE => body = Some(read_code(&mut data, pool)?),
            ATTR_EXCEPTIONS => {
                let count = data.u16()?;
                for _ in 0..count {
                    exceptions.push(pool.class_name(data.u16()?)?.to_string());
                }
            }
            ATTR_SIGNATURE => signature = Some(pool.utf8(data.u16()?)?.to_string()),
            _ => {}
        }
    }

    Ok(MethodInfo {
        access_flags,
        name,
        descriptor,
        signature,
        exceptions,
        body,
    })
}

fn read_code(data: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<MethodBody, DecodeError> {
    let _max_stack = data.u16()?;
    let _max_locals = data.u16()?;
    let code_length = data.u32()? as usize;
    let code = data.bytes(code_length)?;
    let mut body = walk_code(code, pool)?;

    let handler_count = data.u16()?;
    for _ in 0..handler_count {
        data.skip(6)?;
        // catch_type 0 is a finally handler.
        if let Some(caught) = pool.optional_class_name(data.u16()?)? {
            body.caught.push(caught.to_string());
        }
    }
    // Nested attributes (line numbers, stack maps) carry no references.
    Ok(body)
}

/// Builds the per-unit reference list, one entry per distinct
/// `(kind, site, target)`.
struct ReferenceCollector<'u> {
    source: &'u str,
    seen: FxHashSet<(ReferenceKind, Option<String>, String)>,
    references: Vec<RawReference>,
}

impl<'u> ReferenceCollector<'u> {
    fn new(source: &'u str) -> Self {
        Self {
            source,
            seen: FxHashSet::default(),
            references: Vec::new(),
        }
    }

    fn push(
        &mut self,
        kind: ReferenceKind,
        site: Option<&str>,
        target: &str,
        target_member: Option<String>,
    ) {
        let site = site.map(str::to_string);
        if !self.seen.insert((kind, site.clone(), target.to_string())) {
            return;
        }
        self.references.push(RawReference {
            kind,
            source: self.source.to_string(),
            target: target.to_string(),
            site,
            target_member,
        });
    }

    fn push_generics(&mut self, site: Option<&str>, names: Vec<String>) {
        for name in names {
            self.push(ReferenceKind::GenericArgument, site, &name, None);
        }
    }
}

fn collect_references(unit: &DecodedUnit) -> Result<Vec<RawReference>, DecodeError> {
    let mut refs = ReferenceCollector::new(&unit.key);

    if let Some(superclass) = &unit.superclass {
        refs.push(ReferenceKind::Superclass, None, superclass, None);
    }
    for contract in &unit.contracts {
        refs.push(ReferenceKind::Contract, None, contract, None);
    }
    if let Some(signature) = &unit.signature {
        refs.push_generics(None, SignatureParser::class_signature(signature)?);
    }

    for field in &unit.fields {
        let site = field_id(&unit.key, &field.name);
        if let Some(target) = parse_field_descriptor(&field.descriptor)?.class_name() {
            refs.push(ReferenceKind::FieldType, Some(&site), target, None);
        }
        if let Some(signature) = &field.signature {
            refs.push_generics(Some(&site), SignatureParser::field_signature(signature)?);
        }
    }

    for method in &unit.methods {
        let site = method_id(&unit.key, &method.name, &method.descriptor);
        let descriptor = parse_method_descriptor(&method.descriptor)?;
        for parameter in &descriptor.parameters {
            if let Some(target) = parameter.class_name() {
                refs.push(ReferenceKind::MethodParameter, Some(&site), target, None);
            }
        }
        if let Some(target) = descriptor.return_type.as_ref().and_then(|t| t.class_name()) {
            refs.push(ReferenceKind::MethodReturn, Some(&site), target, None);
        }
        for exception in &method.exceptions {
            refs.push(ReferenceKind::MethodException, Some(&site), exception, None);
        }
        if let Some(signature) = &method.signature {
            refs.push_generics(Some(&site), SignatureParser::method_signature(signature)?);
        }

        let Some(body) = &method.body else { continue };
        for caught in &body.caught {
            refs.push(ReferenceKind::InstructionTypeUse, Some(&site), caught, None);
        }
        for access in &body.field_accesses {
            if let Some(owner) = class_constant_target(&access.owner)? {
                refs.push(
                    ReferenceKind::InstructionTypeUse,
                    Some(&site),
                    &owner,
                    Some(access.field_id()),
                );
            }
        }
        for call in &body.invocations {
            if let Some(owner) = class_constant_target(&call.owner)? {
                refs.push(
                    ReferenceKind::InstructionTypeUse,
                    Some(&site),
                    &owner,
                    Some(call.method_id()),
                );
            }
        }
        for used in &body.type_uses {
            refs.push(ReferenceKind::InstructionTypeUse, Some(&site), used, None);
        }
    }

    Ok(refs.references)
}
