//! Big-endian cursor over class-file bytes.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use bytemetrics_core::errors::DecodeError;

/// Bounds-checked big-endian reader. Every read past the end reports
/// `DecodeError::Truncated` with the offending offset.
pub struct ClassReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ClassReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_u8()
            .map_err(|_| DecodeError::Truncated { offset, needed: 1 })
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_u16::<BigEndian>()
            .map_err(|_| DecodeError::Truncated { offset, needed: 2 })
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_u32::<BigEndian>()
            .map_err(|_| DecodeError::Truncated { offset, needed: 4 })
    }

    pub fn i32(&mut self) -> Result<i32, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_i32::<BigEndian>()
            .map_err(|_| DecodeError::Truncated { offset, needed: 4 })
    }

    pub fn i64(&mut self) -> Result<i64, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_i64::<BigEndian>()
            .map_err(|_| DecodeError::Truncated { offset, needed: 8 })
    }

    pub fn f32(&mut self) -> Result<f32, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_f32::<BigEndian>()
            .map_err(|_| DecodeError::Truncated { offset, needed: 4 })
    }

    pub fn f64(&mut self) -> Result<f64, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_f64::<BigEndian>()
            .map_err(|_| DecodeError::Truncated { offset, needed: 8 })
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let offset = self.position();
        if self.remaining() < len {
            return Err(DecodeError::Truncated { offset, needed: len });
        }
        let data: &'a [u8] = self.cursor.get_ref();
        self.cursor.set_position((offset + len) as u64);
        Ok(&data[offset..offset + len])
    }

    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.bytes(len).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian() {
        let mut reader = ClassReader::new(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34]);
        assert_eq!(reader.u32().unwrap(), 0xCAFE_BABE);
        assert_eq!(reader.u16().unwrap(), 52);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_truncated_read_reports_offset() {
        let mut reader = ClassReader::new(&[0x01, 0x02, 0x03]);
        reader.u16().unwrap();
        let err = reader.u16().unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 2, needed: 2 });
    }

    #[test]
    fn test_bytes_borrows_slice() {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = ClassReader::new(&data);
        reader.skip(1).unwrap();
        assert_eq!(reader.bytes(3).unwrap(), &[2, 3, 4]);
        assert_eq!(reader.position(), 4);
        assert!(reader.bytes(2).is_err());
    }
}
