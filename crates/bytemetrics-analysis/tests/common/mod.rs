//! Class-file assembler for tests.
//!
//! Produces real class-file bytes (major version 52) from a small builder so
//! tests exercise the decoder end to end.

#![allow(dead_code)]

use std::collections::HashMap;

use byteorder::{BigEndian, WriteBytesExt};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_ENUM: u16 = 0x4000;

/// One instruction, with symbolic operands resolved at build time.
#[derive(Debug, Clone)]
pub enum Insn {
    Nop,
    Aload0,
    Pop,
    Return,
    Areturn,
    GetField(&'static str, &'static str, &'static str),
    PutField(&'static str, &'static str, &'static str),
    GetStatic(&'static str, &'static str, &'static str),
    PutStatic(&'static str, &'static str, &'static str),
    InvokeVirtual(&'static str, &'static str, &'static str),
    InvokeSpecial(&'static str, &'static str, &'static str),
    InvokeStatic(&'static str, &'static str, &'static str),
    InvokeInterface(&'static str, &'static str, &'static str),
    InvokeDynamic(&'static str, &'static str),
    New(&'static str),
    ANewArray(&'static str),
    CheckCast(&'static str),
    InstanceOf(&'static str),
    MultiANewArray(&'static str, u8),
    LdcClass(&'static str),
    LdcWClass(&'static str),
    LdcString(&'static str),
    Ldc2Long(i64),
    /// `tableswitch` with `high - low + 1` jump offsets, all to the switch itself.
    TableSwitch { low: i32, high: i32 },
    LookupSwitch { keys: Vec<i32> },
    WideIload(u16),
    WideIinc(u16, i16),
    Bipush(i8),
    Goto(i16),
}

#[derive(Debug, Clone)]
struct FieldSpec {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
}

/// A method to emit. `code: None` produces no `Code` attribute.
#[derive(Debug, Clone, Default)]
pub struct MethodSpec {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub code: Option<Vec<Insn>>,
    pub exceptions: Vec<String>,
    /// Exception-table catch types; `None` is a `finally` handler.
    pub catches: Vec<Option<String>>,
    pub signature: Option<String>,
}

impl MethodSpec {
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            access: ACC_PUBLIC,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            code: Some(vec![Insn::Return]),
            ..Default::default()
        }
    }

    pub fn code(mut self, code: Vec<Insn>) -> Self {
        self.code = Some(code);
        self
    }

    pub fn abstract_body(mut self) -> Self {
        self.access |= ACC_ABSTRACT;
        self.code = None;
        self
    }

    pub fn throws(mut self, exception: &str) -> Self {
        self.exceptions.push(exception.to_string());
        self
    }

    pub fn catches(mut self, catch_type: Option<&str>) -> Self {
        self.catches.push(catch_type.map(str::to_string));
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }
}

#[derive(Debug, Default)]
struct ConstantPoolWriter {
    entries: Vec<u8>,
    next: u16,
    seen: HashMap<Vec<u8>, u16>,
}

impl ConstantPoolWriter {
    fn new() -> Self {
        Self {
            next: 1,
            ..Default::default()
        }
    }

    fn add(&mut self, encoded: Vec<u8>, slots: u16) -> u16 {
        if let Some(&index) = self.seen.get(&encoded) {
            return index;
        }
        let index = self.next;
        self.entries.extend_from_slice(&encoded);
        self.seen.insert(encoded, index);
        self.next += slots;
        index
    }

    fn utf8(&mut self, value: &str) -> u16 {
        let mut encoded = vec![1];
        encoded.write_u16::<BigEndian>(value.len() as u16).unwrap();
        encoded.extend_from_slice(value.as_bytes());
        self.add(encoded, 1)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.pair(7, name_index, None)
    }

    fn string(&mut self, value: &str) -> u16 {
        let index = self.utf8(value);
        self.pair(8, index, None)
    }

    fn long(&mut self, value: i64) -> u16 {
        let mut encoded = vec![5];
        encoded.write_i64::<BigEndian>(value).unwrap();
        self.add(encoded, 2)
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let n = self.utf8(name);
        let d = self.utf8(descriptor);
        self.pair(12, n, Some(d))
    }

    fn member(&mut self, tag: u8, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class = self.class(owner);
        let nat = self.name_and_type(name, descriptor);
        self.pair(tag, class, Some(nat))
    }

    fn invoke_dynamic(&mut self, name: &str, descriptor: &str) -> u16 {
        let nat = self.name_and_type(name, descriptor);
        self.pair(18, 0, Some(nat))
    }

    fn pair(&mut self, tag: u8, first: u16, second: Option<u16>) -> u16 {
        let mut encoded = vec![tag];
        encoded.write_u16::<BigEndian>(first).unwrap();
        if let Some(second) = second {
            encoded.write_u16::<BigEndian>(second).unwrap();
        }
        self.add(encoded, 1)
    }
}

/// Builder for one class file.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    name: String,
    access: u16,
    superclass: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
    source_file: Option<String>,
    signature: Option<String>,
    raw_attributes: Vec<(String, Vec<u8>)>,
}

impl ClassFileBuilder {
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            access: ACC_PUBLIC,
            superclass: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            source_file: None,
            signature: None,
            raw_attributes: Vec::new(),
        }
    }

    pub fn interface(name: &str) -> Self {
        let mut builder = Self::class(name);
        builder.access = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        builder
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    pub fn no_superclass(mut self) -> Self {
        self.superclass = None;
        self
    }

    pub fn implements(mut self, contract: &str) -> Self {
        self.interfaces.push(contract.to_string());
        self
    }

    pub fn source_file(mut self, name: &str) -> Self {
        self.source_file = Some(name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push(FieldSpec {
            access: 0,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
        });
        self
    }

    pub fn generic_field(mut self, name: &str, descriptor: &str, signature: &str) -> Self {
        self.fields.push(FieldSpec {
            access: 0,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: Some(signature.to_string()),
        });
        self
    }

    /// Method with a body.
    pub fn method(mut self, name: &str, descriptor: &str, code: Vec<Insn>) -> Self {
        self.methods.push(MethodSpec::new(name, descriptor).code(code));
        self
    }

    pub fn abstract_method(mut self, name: &str, descriptor: &str) -> Self {
        self.methods.push(MethodSpec::new(name, descriptor).abstract_body());
        self
    }

    pub fn method_spec(mut self, spec: MethodSpec) -> Self {
        self.methods.push(spec);
        self
    }

    /// Default constructor calling `super()`.
    pub fn default_constructor(self) -> Self {
        let superclass = self
            .superclass
            .clone()
            .unwrap_or_else(|| "java/lang/Object".to_string());
        let superclass: &'static str = Box::leak(superclass.into_boxed_str());
        self.method(
            "<init>",
            "()V",
            vec![
                Insn::Aload0,
                Insn::InvokeSpecial(superclass, "<init>", "()V"),
                Insn::Return,
            ],
        )
    }

    /// An extra class attribute the decoder does not know.
    pub fn raw_attribute(mut self, name: &str, body: Vec<u8>) -> Self {
        self.raw_attributes.push((name.to_string(), body));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = ConstantPoolWriter::new();

        let this_index = pool.class(&self.name);
        let super_index = self.superclass.as_deref().map_or(0, |s| pool.class(s));
        let interface_indices: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let mut body = Vec::new();
        body.write_u16::<BigEndian>(self.access).unwrap();
        body.write_u16::<BigEndian>(this_index).unwrap();
        body.write_u16::<BigEndian>(super_index).unwrap();
        body.write_u16::<BigEndian>(interface_indices.len() as u16).unwrap();
        for index in interface_indices {
            body.write_u16::<BigEndian>(index).unwrap();
        }

        body.write_u16::<BigEndian>(self.fields.len() as u16).unwrap();
        for field in &self.fields {
            body.write_u16::<BigEndian>(field.access).unwrap();
            body.write_u16::<BigEndian>(pool.utf8(&field.name)).unwrap();
            body.write_u16::<BigEndian>(pool.utf8(&field.descriptor)).unwrap();
            match &field.signature {
                Some(signature) => {
                    body.write_u16::<BigEndian>(1).unwrap();
                    write_u16_attribute(&mut body, &mut pool, "Signature", signature);
                }
                None => body.write_u16::<BigEndian>(0).unwrap(),
            }
        }

        body.write_u16::<BigEndian>(self.methods.len() as u16).unwrap();
        for method in &self.methods {
            write_method(&mut body, &mut pool, method);
        }

        let mut attributes: Vec<Vec<u8>> = Vec::new();
        if let Some(source_file) = &self.source_file {
            let mut attr = Vec::new();
            write_u16_attribute(&mut attr, &mut pool, "SourceFile", source_file);
            attributes.push(attr);
        }
        if let Some(signature) = &self.signature {
            let mut attr = Vec::new();
            write_u16_attribute(&mut attr, &mut pool, "Signature", signature);
            attributes.push(attr);
        }
        for (name, raw) in &self.raw_attributes {
            let mut attr = Vec::new();
            attr.write_u16::<BigEndian>(pool.utf8(name)).unwrap();
            attr.write_u32::<BigEndian>(raw.len() as u32).unwrap();
            attr.extend_from_slice(raw);
            attributes.push(attr);
        }
        body.write_u16::<BigEndian>(attributes.len() as u16).unwrap();
        for attr in attributes {
            body.extend_from_slice(&attr);
        }

        let mut out = Vec::new();
        out.write_u32::<BigEndian>(0xCAFE_BABE).unwrap();
        out.write_u16::<BigEndian>(0).unwrap();
        out.write_u16::<BigEndian>(52).unwrap();
        out.write_u16::<BigEndian>(pool.next).unwrap();
        out.extend_from_slice(&pool.entries);
        out.extend_from_slice(&body);
        out
    }
}

/// Attribute whose body is a single constant-pool index to a Utf8 value.
fn write_u16_attribute(out: &mut Vec<u8>, pool: &mut ConstantPoolWriter, name: &str, value: &str) {
    let name_index = pool.utf8(name);
    let value_index = pool.utf8(value);
    out.write_u16::<BigEndian>(name_index).unwrap();
    out.write_u32::<BigEndian>(2).unwrap();
    out.write_u16::<BigEndian>(value_index).unwrap();
}

fn write_method(out: &mut Vec<u8>, pool: &mut ConstantPoolWriter, method: &MethodSpec) {
    out.write_u16::<BigEndian>(method.access).unwrap();
    out.write_u16::<BigEndian>(pool.utf8(&method.name)).unwrap();
    out.write_u16::<BigEndian>(pool.utf8(&method.descriptor)).unwrap();

    let mut attributes: Vec<Vec<u8>> = Vec::new();
    if let Some(code) = &method.code {
        let bytes = assemble(pool, code);
        let mut attr = Vec::new();
        attr.write_u16::<BigEndian>(pool.utf8("Code")).unwrap();
        let mut content = Vec::new();
        content.write_u16::<BigEndian>(10).unwrap();
        content.write_u16::<BigEndian>(10).unwrap();
        content.write_u32::<BigEndian>(bytes.len() as u32).unwrap();
        content.extend_from_slice(&bytes);
        content.write_u16::<BigEndian>(method.catches.len() as u16).unwrap();
        for catch in &method.catches {
            content.write_u16::<BigEndian>(0).unwrap();
            content.write_u16::<BigEndian>(bytes.len() as u16).unwrap();
            content.write_u16::<BigEndian>(0).unwrap();
            let catch_type = catch.as_deref().map_or(0, |c| pool.class(c));
            content.write_u16::<BigEndian>(catch_type).unwrap();
        }
        content.write_u16::<BigEndian>(0).unwrap();
        attr.write_u32::<BigEndian>(content.len() as u32).unwrap();
        attr.extend_from_slice(&content);
        attributes.push(attr);
    }
    if !method.exceptions.is_empty() {
        let mut attr = Vec::new();
        attr.write_u16::<BigEndian>(pool.utf8("Exceptions")).unwrap();
        attr.write_u32::<BigEndian>(2 + 2 * method.exceptions.len() as u32).unwrap();
        attr.write_u16::<BigEndian>(method.exceptions.len() as u16).unwrap();
        for exception in &method.exceptions {
            attr.write_u16::<BigEndian>(pool.class(exception)).unwrap();
        }
        attributes.push(attr);
    }
    if let Some(signature) = &method.signature {
        let mut attr = Vec::new();
        write_u16_attribute(&mut attr, pool, "Signature", signature);
        attributes.push(attr);
    }

    out.write_u16::<BigEndian>(attributes.len() as u16).unwrap();
    for attr in attributes {
        out.extend_from_slice(&attr);
    }
}

fn assemble(pool: &mut ConstantPoolWriter, code: &[Insn]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    for insn in code {
        let pc = out.len();
        match insn {
            Insn::Nop => out.push(0x00),
            Insn::Aload0 => out.push(0x2a),
            Insn::Pop => out.push(0x57),
            Insn::Return => out.push(0xb1),
            Insn::Areturn => out.push(0xb0),
            Insn::GetStatic(o, n, d) => op_u16(&mut out, 0xb2, pool.member(9, o, n, d)),
            Insn::PutStatic(o, n, d) => op_u16(&mut out, 0xb3, pool.member(9, o, n, d)),
            Insn::GetField(o, n, d) => op_u16(&mut out, 0xb4, pool.member(9, o, n, d)),
            Insn::PutField(o, n, d) => op_u16(&mut out, 0xb5, pool.member(9, o, n, d)),
            Insn::InvokeVirtual(o, n, d) => op_u16(&mut out, 0xb6, pool.member(10, o, n, d)),
            Insn::InvokeSpecial(o, n, d) => op_u16(&mut out, 0xb7, pool.member(10, o, n, d)),
            Insn::InvokeStatic(o, n, d) => op_u16(&mut out, 0xb8, pool.member(10, o, n, d)),
            Insn::InvokeInterface(o, n, d) => {
                op_u16(&mut out, 0xb9, pool.member(11, o, n, d));
                out.push(1);
                out.push(0);
            }
            Insn::InvokeDynamic(n, d) => {
                op_u16(&mut out, 0xba, pool.invoke_dynamic(n, d));
                out.push(0);
                out.push(0);
            }
            Insn::New(c) => op_u16(&mut out, 0xbb, pool.class(c)),
            Insn::ANewArray(c) => op_u16(&mut out, 0xbd, pool.class(c)),
            Insn::CheckCast(c) => op_u16(&mut out, 0xc0, pool.class(c)),
            Insn::InstanceOf(c) => op_u16(&mut out, 0xc1, pool.class(c)),
            Insn::MultiANewArray(c, dims) => {
                op_u16(&mut out, 0xc5, pool.class(c));
                out.push(*dims);
            }
            Insn::LdcClass(c) => {
                let index = pool.class(c);
                assert!(index <= u8::MAX as u16, "ldc index out of range");
                out.push(0x12);
                out.push(index as u8);
            }
            Insn::LdcWClass(c) => op_u16(&mut out, 0x13, pool.class(c)),
            Insn::LdcString(s) => {
                let index = pool.string(s);
                op_u16(&mut out, 0x13, index);
            }
            Insn::Ldc2Long(v) => op_u16(&mut out, 0x14, pool.long(*v)),
            Insn::TableSwitch { low, high } => {
                out.push(0xaa);
                pad(&mut out, pc);
                out.write_i32::<BigEndian>(0).unwrap();
                out.write_i32::<BigEndian>(*low).unwrap();
                out.write_i32::<BigEndian>(*high).unwrap();
                for _ in *low..=*high {
                    out.write_i32::<BigEndian>(0).unwrap();
                }
            }
            Insn::LookupSwitch { keys } => {
                out.push(0xab);
                pad(&mut out, pc);
                out.write_i32::<BigEndian>(0).unwrap();
                out.write_i32::<BigEndian>(keys.len() as i32).unwrap();
                for key in keys {
                    out.write_i32::<BigEndian>(*key).unwrap();
                    out.write_i32::<BigEndian>(0).unwrap();
                }
            }
            Insn::WideIload(index) => {
                out.push(0xc4);
                out.push(0x15);
                out.write_u16::<BigEndian>(*index).unwrap();
            }
            Insn::WideIinc(index, delta) => {
                out.push(0xc4);
                out.push(0x84);
                out.write_u16::<BigEndian>(*index).unwrap();
                out.write_i16::<BigEndian>(*delta).unwrap();
            }
            Insn::Bipush(v) => {
                out.push(0x10);
                out.push(*v as u8);
            }
            Insn::Goto(offset) => {
                out.push(0xa7);
                out.write_i16::<BigEndian>(*offset).unwrap();
            }
        }
    }
    out
}

fn op_u16(out: &mut Vec<u8>, opcode: u8, operand: u16) {
    out.push(opcode);
    out.write_u16::<BigEndian>(operand).unwrap();
}

fn pad(out: &mut Vec<u8>, pc: usize) {
    for _ in 0..(4 - (pc + 1) % 4) % 4 {
        out.push(0);
    }
}

/// Decode `builder` or panic with the decode error.
pub fn decode(builder: &ClassFileBuilder) -> bytemetrics_analysis::DecodedUnit {
    bytemetrics_analysis::decode(&builder.build()).expect("builder output must decode")
}

/// Artifacts for `builders`, named after their class.
pub fn artifacts(builders: &[ClassFileBuilder]) -> Vec<bytemetrics_analysis::Artifact> {
    builders
        .iter()
        .map(|b| bytemetrics_analysis::Artifact::new(format!("{}.class", b.name), b.build()))
        .collect()
}

/// Run the default analyzer over `builders`, asserting a clean run.
pub fn analyze(builders: &[ClassFileBuilder]) -> bytemetrics_analysis::Analysis {
    let result = bytemetrics_analysis::Analyzer::default().analyze(&artifacts(builders));
    assert!(result.is_clean(), "unexpected errors: {:?}", result.errors);
    result.data
}
