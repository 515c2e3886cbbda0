use crate::class_file::Serialize;
use crate::{ByteCursor, Error};
use byteorder::WriteBytesExt;
use std::collections::HashMap;
use std::io::Seek;

/// Constants as in the constant pool
///
/// Only the entry kinds this codec models are present; any other tag is
/// rejected during decoding.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    /// Constant raw string value
    ///
    /// The `u16` length on the wire is authoritative; the bytes are kept
    /// verbatim and are not required to be valid UTF-8.
    Utf8(Vec<u8>),

    /// Class or an interface
    Class { name_index: u16 },

    /// Constant object of type `java.lang.String`
    String { string_index: u16 },

    /// Field
    FieldRef {
        class_index: u16,
        name_and_type_index: u16,
    },

    /// Method
    MethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
}

impl Constant {
    pub fn parse(cursor: &mut ByteCursor) -> Result<Constant, Error> {
        let tag = cursor.u8()?;
        let constant = match tag {
            1 => {
                let length = cursor.u16()? as usize;
                Constant::Utf8(cursor.take(length)?.to_vec())
            }
            7 => Constant::Class {
                name_index: cursor.u16()?,
            },
            8 => Constant::String {
                string_index: cursor.u16()?,
            },
            9 => Constant::FieldRef {
                class_index: cursor.u16()?,
                name_and_type_index: cursor.u16()?,
            },
            10 => Constant::MethodRef {
                class_index: cursor.u16()?,
                name_and_type_index: cursor.u16()?,
            },
            12 => Constant::NameAndType {
                name_index: cursor.u16()?,
                descriptor_index: cursor.u16()?,
            },
            tag => return Err(Error::UnsupportedConstantTag { tag }),
        };
        Ok(constant)
    }
}

impl Serialize for Constant {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Constant::Utf8(bytes) => {
                1u8.serialize(writer)?;
                (bytes.len() as u16).serialize(writer)?;
                writer.write_all(bytes)?;
            }
            Constant::Class { name_index } => {
                7u8.serialize(writer)?;
                name_index.serialize(writer)?;
            }
            Constant::String { string_index } => {
                8u8.serialize(writer)?;
                string_index.serialize(writer)?;
            }
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            } => {
                9u8.serialize(writer)?;
                class_index.serialize(writer)?;
                name_and_type_index.serialize(writer)?;
            }
            Constant::MethodRef {
                class_index,
                name_and_type_index,
            } => {
                10u8.serialize(writer)?;
                class_index.serialize(writer)?;
                name_and_type_index.serialize(writer)?;
            }
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => {
                12u8.serialize(writer)?;
                name_index.serialize(writer)?;
                descriptor_index.serialize(writer)?;
            }
        };
        Ok(())
    }
}

/// The 1-indexed constant pool of a class file
///
/// Entry `n` of the pool lives at `entries[n - 1]`; index 0 is never a valid
/// reference. The `Utf8` contents are additionally indexed by value so that
/// name lookups (attribute names on the encode path) do not rescan the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantPool {
    entries: Vec<Constant>,
    by_utf8: HashMap<Vec<u8>, u16>,
}

impl ConstantPool {
    pub fn new(entries: Vec<Constant>) -> ConstantPool {
        let mut by_utf8 = HashMap::new();
        for (slot, entry) in entries.iter().enumerate() {
            if let Constant::Utf8(bytes) = entry {
                // first occurrence wins, matching a front-to-back scan
                by_utf8
                    .entry(bytes.clone())
                    .or_insert((slot + 1) as u16);
            }
        }
        ConstantPool { entries, by_utf8 }
    }

    /// Reads `constant_pool_count`, then `constant_pool_count - 1` entries
    pub fn parse(cursor: &mut ByteCursor) -> Result<ConstantPool, Error> {
        let count = cursor.u16()?;
        let mut entries = Vec::with_capacity(count.saturating_sub(1) as usize);
        for _ in 1..count {
            entries.push(Constant::parse(cursor)?);
        }
        let pool = ConstantPool::new(entries);
        pool.validate()?;
        Ok(pool)
    }

    /// The `constant_pool_count` as encoded on the wire: entry count plus one
    pub fn count(&self) -> u16 {
        self.entries.len() as u16 + 1
    }

    pub fn entries(&self) -> &[Constant] {
        &self.entries
    }

    pub fn get(&self, index: u16) -> Result<&Constant, Error> {
        self.check_index(index)?;
        Ok(&self.entries[(index - 1) as usize])
    }

    /// Resolve `index` to the raw bytes of a `Utf8` entry
    pub fn get_utf8(&self, index: u16) -> Result<&[u8], Error> {
        match self.get(index)? {
            Constant::Utf8(bytes) => Ok(bytes),
            _ => Err(Error::NotUtf8 { index }),
        }
    }

    /// Pool index of the first `Utf8` entry holding `name`, if any
    pub fn utf8_index(&self, name: &[u8]) -> Option<u16> {
        self.by_utf8.get(name).copied()
    }

    /// Fails unless `1 <= index < constant_pool_count`
    pub fn check_index(&self, index: u16) -> Result<u16, Error> {
        if index == 0 || index >= self.count() {
            return Err(Error::BadConstantIndex {
                index,
                count: self.count(),
            });
        }
        Ok(index)
    }

    /// Check that every cross-reference held by a pool entry is in range
    pub fn validate(&self) -> Result<(), Error> {
        for entry in &self.entries {
            match *entry {
                Constant::Utf8(_) => {}
                Constant::Class { name_index } => {
                    self.check_index(name_index)?;
                }
                Constant::String { string_index } => {
                    self.check_index(string_index)?;
                }
                Constant::FieldRef {
                    class_index,
                    name_and_type_index,
                }
                | Constant::MethodRef {
                    class_index,
                    name_and_type_index,
                } => {
                    self.check_index(class_index)?;
                    self.check_index(name_and_type_index)?;
                }
                Constant::NameAndType {
                    name_index,
                    descriptor_index,
                } => {
                    self.check_index(name_index)?;
                    self.check_index(descriptor_index)?;
                }
            }
        }
        Ok(())
    }
}

impl Serialize for ConstantPool {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.count().serialize(writer)?;
        for entry in &self.entries {
            entry.serialize(writer)?;
        }
        Ok(())
    }
}
