//! Field/method descriptors and generic signatures.
//!
//! Descriptors give the erased top-level types of fields, parameters and
//! return values. Signatures are only consulted for what erasure drops: the
//! class names that appear inside type arguments and type-parameter bounds.

use bytemetrics_core::errors::DecodeError;

/// Most array dimensions a descriptor may declare.
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Deepest nesting of reference types a signature may contain.
pub const MAX_SIGNATURE_DEPTH: usize = 512;

/// An erased field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Primitive, by descriptor letter (`I`, `J`, `Z`, ...).
    Base(char),
    /// Internal class name.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Class name of the type, looking through arrays. `None` for primitives.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Base(_) => None,
            Self::Object(name) => Some(name),
            Self::Array(element) => element.class_name(),
        }
    }
}

/// A parsed method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,
    /// `None` for `void`.
    pub return_type: Option<FieldType>,
}

fn malformed(descriptor: &str) -> DecodeError {
    DecodeError::MalformedDescriptor {
        descriptor: descriptor.to_string(),
    }
}

struct DescriptorCursor<'s> {
    text: &'s str,
    pos: usize,
}

impl<'s> DescriptorCursor<'s> {
    fn new(text: &'s str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn next(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek().ok_or_else(|| malformed(self.text))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, byte: u8) -> Result<(), DecodeError> {
        if self.next()? == byte {
            Ok(())
        } else {
            Err(malformed(self.text))
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Consume up to (not including) the first byte in `stops`.
    fn take_until(&mut self, stops: &[u8]) -> Result<&'s str, DecodeError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if stops.contains(&byte) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start || self.at_end() {
            return Err(malformed(self.text));
        }
        Ok(&self.text[start..self.pos])
    }

    fn field_type(&mut self) -> Result<FieldType, DecodeError> {
        let mut dimensions = 0;
        while self.peek() == Some(b'[') {
            self.pos += 1;
            dimensions += 1;
            if dimensions > MAX_ARRAY_DIMENSIONS {
                return Err(malformed(self.text));
            }
        }
        let mut field_type = match self.next()? {
            b @ (b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => FieldType::Base(b as char),
            b'L' => {
                let name = self.take_until(b";")?;
                self.expect(b';')?;
                FieldType::Object(name.to_string())
            }
            _ => return Err(malformed(self.text)),
        };
        for _ in 0..dimensions {
            field_type = FieldType::Array(Box::new(field_type));
        }
        Ok(field_type)
    }
}

pub fn parse_field_descriptor(descriptor: &str) -> Result<FieldType, DecodeError> {
    let mut cursor = DescriptorCursor::new(descriptor);
    let field_type = cursor.field_type()?;
    if !cursor.at_end() {
        return Err(malformed(descriptor));
    }
    Ok(field_type)
}

pub fn parse_method_descriptor(descriptor: &str) -> Result<MethodDescriptor, DecodeError> {
    let mut cursor = DescriptorCursor::new(descriptor);
    cursor.expect(b'(')?;
    let mut parameters = Vec::new();
    while cursor.peek() != Some(b')') {
        parameters.push(cursor.field_type()?);
    }
    cursor.expect(b')')?;
    let return_type = if cursor.peek() == Some(b'V') {
        cursor.next()?;
        None
    } else {
        Some(cursor.field_type()?)
    };
    if !cursor.at_end() {
        return Err(malformed(descriptor));
    }
    Ok(MethodDescriptor {
        parameters,
        return_type,
    })
}

/// Target unit of a Class constant: plain internal names pass through,
/// array descriptors are unwrapped, primitive arrays yield `None`.
pub fn class_constant_target(name: &str) -> Result<Option<String>, DecodeError> {
    if name.starts_with('[') {
        Ok(parse_field_descriptor(name)?.class_name().map(str::to_string))
    } else {
        Ok(Some(name.to_string()))
    }
}

/// Recursive-descent reader for generic signatures, collecting class names
/// found in type arguments and type-parameter bounds. Nesting deeper than
/// [`MAX_SIGNATURE_DEPTH`] is rejected as malformed.
pub struct SignatureParser<'s> {
    cursor: DescriptorCursor<'s>,
    generic_arguments: Vec<String>,
    depth: usize,
}

impl<'s> SignatureParser<'s> {
    fn new(signature: &'s str) -> Self {
        Self {
            cursor: DescriptorCursor::new(signature),
            generic_arguments: Vec::new(),
            depth: 0,
        }
    }

    /// `[TypeParameters] SuperclassSignature SuperinterfaceSignature*`
    pub fn class_signature(signature: &'s str) -> Result<Vec<String>, DecodeError> {
        let mut parser = Self::new(signature);
        parser.type_parameters()?;
        while !parser.cursor.at_end() {
            parser.class_type(false)?;
        }
        Ok(parser.generic_arguments)
    }

    /// `[TypeParameters] ( JavaTypeSignature* ) Result ThrowsSignature*`
    pub fn method_signature(signature: &'s str) -> Result<Vec<String>, DecodeError> {
        let mut parser = Self::new(signature);
        parser.type_parameters()?;
        parser.cursor.expect(b'(')?;
        while parser.cursor.peek() != Some(b')') {
            parser.java_type(false)?;
        }
        parser.cursor.expect(b')')?;
        if parser.cursor.peek() == Some(b'V') {
            parser.cursor.next()?;
        } else {
            parser.java_type(false)?;
        }
        while parser.cursor.peek() == Some(b'^') {
            parser.cursor.next()?;
            parser.reference_type(false)?;
        }
        parser.finish()
    }

    /// `ReferenceTypeSignature`
    pub fn field_signature(signature: &'s str) -> Result<Vec<String>, DecodeError> {
        let mut parser = Self::new(signature);
        parser.reference_type(false)?;
        parser.finish()
    }

    fn finish(self) -> Result<Vec<String>, DecodeError> {
        if self.cursor.at_end() {
            Ok(self.generic_arguments)
        } else {
            Err(malformed(self.cursor.text))
        }
    }

    fn type_parameters(&mut self) -> Result<(), DecodeError> {
        if self.cursor.peek() != Some(b'<') {
            return Ok(());
        }
        self.cursor.next()?;
        loop {
            self.cursor.take_until(b":")?;
            // Class bound, possibly empty when only interface bounds follow.
            self.cursor.expect(b':')?;
            if !matches!(self.cursor.peek(), Some(b':') | Some(b'>')) {
                self.reference_type(true)?;
            }
            while self.cursor.peek() == Some(b':') {
                self.cursor.next()?;
                self.reference_type(true)?;
            }
            if self.cursor.peek() == Some(b'>') {
                self.cursor.next()?;
                return Ok(());
            }
        }
    }

    fn java_type(&mut self, emit: bool) -> Result<(), DecodeError> {
        match self.cursor.peek() {
            Some(b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => {
                self.cursor.next()?;
                Ok(())
            }
            _ => self.reference_type(emit),
        }
    }

    fn reference_type(&mut self, emit: bool) -> Result<(), DecodeError> {
        if self.depth >= MAX_SIGNATURE_DEPTH {
            return Err(malformed(self.cursor.text));
        }
        self.depth += 1;
        let result = self.nested_reference_type(emit);
        self.depth -= 1;
        result
    }

    fn nested_reference_type(&mut self, emit: bool) -> Result<(), DecodeError> {
        match self.cursor.peek() {
            Some(b'L') => self.class_type(emit),
            Some(b'T') => {
                self.cursor.next()?;
                self.cursor.take_until(b";")?;
                self.cursor.expect(b';')
            }
            Some(b'[') => {
                self.cursor.next()?;
                self.java_type(emit)
            }
            _ => Err(malformed(self.cursor.text)),
        }
    }

    fn class_type(&mut self, emit: bool) -> Result<(), DecodeError> {
        self.cursor.expect(b'L')?;
        let mut name = self.cursor.take_until(b"<.;")?.to_string();
        self.type_arguments()?;
        while self.cursor.peek() == Some(b'.') {
            self.cursor.next()?;
            let inner = self.cursor.take_until(b"<.;")?;
            name.push('$');
            name.push_str(inner);
            self.type_arguments()?;
        }
        self.cursor.expect(b';')?;
        if emit {
            self.generic_arguments.push(name);
        }
        Ok(())
    }

    fn type_arguments(&mut self) -> Result<(), DecodeError> {
        if self.cursor.peek() != Some(b'<') {
            return Ok(());
        }
        self.cursor.next()?;
        loop {
            match self.cursor.peek() {
                Some(b'>') => {
                    self.cursor.next()?;
                    return Ok(());
                }
                Some(b'*') => {
                    self.cursor.next()?;
                }
                Some(b'+' | b'-') => {
                    self.cursor.next()?;
                    self.reference_type(true)?;
                }
                Some(_) => self.reference_type(true)?,
                None => return Err(malformed(self.cursor.text)),
            }
        }
    }
}
