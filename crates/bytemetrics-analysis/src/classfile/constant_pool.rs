//! Constant pool parsing and typed lookups.

use bytemetrics_core::errors::DecodeError;

use super::reader::ClassReader;
use super::types::MemberRef;

/// One constant pool entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Slot 0 and the shadow slot after a Long or Double.
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Constant {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Unusable => "unusable slot",
            Self::Utf8(_) => "Utf8",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Class { .. } => "Class",
            Self::String { .. } => "String",
            Self::FieldRef { .. } => "Fieldref",
            Self::MethodRef { .. } => "Methodref",
            Self::InterfaceMethodRef { .. } => "InterfaceMethodref",
            Self::NameAndType { .. } => "NameAndType",
            Self::MethodHandle { .. } => "MethodHandle",
            Self::MethodType { .. } => "MethodType",
            Self::Dynamic { .. } => "Dynamic",
            Self::InvokeDynamic { .. } => "InvokeDynamic",
            Self::Module { .. } => "Module",
            Self::Package { .. } => "Package",
        }
    }
}

/// The parsed constant pool of one class file, indexed from 1.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    /// Parse `constant_pool_count - 1` entries from the reader.
    pub fn parse(reader: &mut ClassReader<'_>) -> Result<Self, DecodeError> {
        let count = reader.u16()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        let mut index: u16 = 1;
        while index < count {
            let tag = reader.u8()?;
            let constant = match tag {
                1 => {
                    let len = reader.u16()? as usize;
                    Constant::Utf8(decode_modified_utf8(reader.bytes(len)?))
                }
                3 => Constant::Integer(reader.i32()?),
                4 => Constant::Float(reader.f32()?),
                5 => Constant::Long(reader.i64()?),
                6 => Constant::Double(reader.f64()?),
                7 => Constant::Class {
                    name_index: reader.u16()?,
                },
                8 => Constant::String {
                    string_index: reader.u16()?,
                },
                9 => Constant::FieldRef {
                    class_index: reader.u16()?,
                    name_and_type_index: reader.u16()?,
                },
                10 => Constant::MethodRef {
                    class_index: reader.u16()?,
                    name_and_type_index: reader.u16()?,
                },
                11 => Constant::InterfaceMethodRef {
                    class_index: reader.u16()?,
                    name_and_type_index: reader.u16()?,
                },
                12 => Constant::NameAndType {
                    name_index: reader.u16()?,
                    descriptor_index: reader.u16()?,
                },
                15 => Constant::MethodHandle {
                    reference_kind: reader.u8()?,
                    reference_index: reader.u16()?,
                },
                16 => Constant::MethodType {
                    descriptor_index: reader.u16()?,
                },
                17 => Constant::Dynamic {
                    bootstrap_method_attr_index: reader.u16()?,
                    name_and_type_index: reader.u16()?,
                },
                18 => Constant::InvokeDynamic {
                    bootstrap_method_attr_index: reader.u16()?,
                    name_and_type_index: reader.u16()?,
                },
                19 => Constant::Module {
                    name_index: reader.u16()?,
                },
                20 => Constant::Package {
                    name_index: reader.u16()?,
                },
                _ => return Err(DecodeError::UnknownConstantTag { tag, index }),
            };

            let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
            entries.push(constant);
            index += 1;
            if wide {
                entries.push(Constant::Unusable);
                index = index.saturating_add(1);
            }
        }

        Ok(Self { entries })
    }

    /// Number of slots, including slot 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: u16) -> Result<&Constant, DecodeError> {
        match self.entries.get(index as usize) {
            Some(Constant::Unusable) | None => Err(DecodeError::BadConstantIndex { index }),
            Some(constant) => Ok(constant),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str, DecodeError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Internal name held by a Class constant.
    pub fn class_name(&self, index: u16) -> Result<&str, DecodeError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "Class",
            }),
        }
    }

    /// Like `class_name`, but index 0 means "none".
    pub fn optional_class_name(&self, index: u16) -> Result<Option<&str>, DecodeError> {
        if index == 0 {
            Ok(None)
        } else {
            self.class_name(index).map(Some)
        }
    }

    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str), DecodeError> {
        match self.get(index)? {
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            _ => Err(DecodeError::UnexpectedConstant {
                index,
                expected: "NameAndType",
            }),
        }
    }

    /// Resolve a Fieldref, Methodref or InterfaceMethodref.
    pub fn member_ref(&self, index: u16) -> Result<MemberRef, DecodeError> {
        match self.get(index)? {
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            }
            | Constant::MethodRef {
                class_index,
                name_and_type_index,
            }
            | Constant::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => {
                let owner = self.class_name(*class_index)?;
                let (name, descriptor) = self.name_and_type(*name_and_type_index)?;
                Ok(MemberRef::new(owner, name, descriptor))
            }
            other => {
                tracing::trace!(index, found = other.kind_name(), "expected a member reference");
                Err(DecodeError::UnexpectedConstant {
                    index,
                    expected: "member reference",
                })
            }
        }
    }
}

/// Decode the JVM's modified UTF-8.
///
/// Supplementary characters arrive as two encoded surrogates, so the bytes
/// are decoded to UTF-16 units first. Malformed sequences become U+FFFD.
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    if bytes.iter().all(|b| *b != 0 && *b < 0x80) {
        return bytes.iter().map(|b| *b as char).collect();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        if b0 & 0x80 == 0 {
            units.push(b0 as u16);
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            match bytes.get(i + 1) {
                Some(b1) if b1 & 0xC0 == 0x80 => {
                    units.push((((b0 & 0x1F) as u16) << 6) | (b1 & 0x3F) as u16);
                    i += 2;
                }
                _ => {
                    units.push(0xFFFD);
                    i += 1;
                }
            }
        } else if b0 & 0xF0 == 0xE0 {
            match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(b1), Some(b2)) if b1 & 0xC0 == 0x80 && b2 & 0xC0 == 0x80 => {
                    units.push(
                        (((b0 & 0x0F) as u16) << 12)
                            | (((b1 & 0x3F) as u16) << 6)
                            | (b2 & 0x3F) as u16,
                    );
                    i += 3;
                }
                _ => {
                    units.push(0xFFFD);
                    i += 1;
                }
            }
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }
    String::from_utf16_lossy(&units)
}
