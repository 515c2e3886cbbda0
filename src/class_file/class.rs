use crate::class_file::{Attribute, ConstantPool, Method, Serialize, Version};
use crate::{ByteCursor, ClassAccessFlags, Error};
use byteorder::WriteBytesExt;
use std::fs;
use std::io::{Cursor, Seek};
use std::path::Path;

/// Representation of the [`class` file format of the JVM][0]
///
/// This is also the model the assembly parser produces, so both the binary
/// decode path and the textual encode path meet in this one type.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    pub version: Version,
    pub constant_pool: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Magic header that goes at the front of the serialized class file
    const MAGIC: u32 = 0xCAFE_BABE;

    /// Decode a complete class file
    ///
    /// The whole input must be in memory; any structural violation aborts
    /// the decode with no partial result.
    pub fn parse(bytes: &[u8]) -> Result<ClassFile, Error> {
        let mut cursor = ByteCursor::new(bytes);

        let magic = cursor.u32()?;
        if magic != ClassFile::MAGIC {
            return Err(Error::MalformedHeader { magic });
        }
        let version = Version::parse(&mut cursor)?;
        let constant_pool = ConstantPool::parse(&mut cursor)?;

        let access_flags = ClassAccessFlags::parse(&mut cursor)?;
        let this_class = constant_pool.check_index(cursor.u16()?)?;
        // zero means "no superclass" (only java/lang/Object and modules)
        let super_class = cursor.u16()?;
        if super_class != 0 {
            constant_pool.check_index(super_class)?;
        }

        let interfaces_count = cursor.u16()?;
        if interfaces_count != 0 {
            return Err(Error::UnsupportedFeature {
                what: "interface entries",
            });
        }
        let fields_count = cursor.u16()?;
        if fields_count != 0 {
            return Err(Error::UnsupportedFeature {
                what: "field entries",
            });
        }

        let method_count = cursor.u16()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            methods.push(Method::parse(&mut cursor, &constant_pool)?);
        }

        let attribute_count = cursor.u16()?;
        let mut attributes = Vec::with_capacity(attribute_count as usize);
        for _ in 0..attribute_count {
            attributes.push(Attribute::parse(&mut cursor, &constant_pool)?);
        }

        if cursor.remaining() != 0 {
            log::warn!(
                "{} trailing bytes after the class file structure",
                cursor.remaining()
            );
        }
        log::debug!(
            "decoded class file: version {}.{}, {} pool entries, {} methods",
            version.major_version,
            version.minor_version,
            constant_pool.entries().len(),
            methods.len()
        );

        Ok(ClassFile {
            version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces: Vec::new(),
            methods,
            attributes,
        })
    }

    /// Encode the class file into bytes
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut writer = Cursor::new(Vec::new());
        self.serialize(&mut writer).map_err(Error::IoError)?;
        Ok(writer.into_inner())
    }

    /// Save the class file to disk
    pub fn save_to_path<P: AsRef<Path>>(
        &self,
        path: P,
        create_missing_directories: bool,
    ) -> std::io::Result<()> {
        let path = path.as_ref();
        if create_missing_directories {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut class_file = fs::File::create(path)?;
        self.serialize(&mut class_file)
    }
}

impl Serialize for ClassFile {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        ClassFile::MAGIC.serialize(writer)?;
        self.version.serialize(writer)?;
        self.constant_pool.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        self.this_class.serialize(writer)?;
        self.super_class.serialize(writer)?;
        self.interfaces.serialize(writer)?;
        // no field entries are modeled
        0u16.serialize(writer)?;
        self.methods.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod class_file_tests {
    use super::*;

    #[test]
    fn bad_magic_is_malformed_header() {
        let bytes = [0xCA, 0xFE, 0xBA, 0xBF, 0x00, 0x00, 0x00, 0x34];
        match ClassFile::parse(&bytes) {
            Err(Error::MalformedHeader { magic: 0xCAFEBABF }) => {}
            other => panic!("expected MalformedHeader, got {:?}", other),
        }
    }

    #[test]
    fn nonzero_interface_count_is_unsupported() {
        let bytes = [
            0xCA, 0xFE, 0xBA, 0xBE, // magic
            0x00, 0x00, 0x00, 0x34, // version
            0x00, 0x02, 1, 0x00, 0x01, b'A', // pool: Utf8 "A"
            0x00, 0x21, // access flags
            0x00, 0x01, // this
            0x00, 0x00, // super
            0x00, 0x01, // one interface
            0x00, 0x01,
        ];
        match ClassFile::parse(&bytes) {
            Err(Error::UnsupportedFeature {
                what: "interface entries",
            }) => {}
            other => panic!("expected UnsupportedFeature, got {:?}", other),
        }
    }

    #[test]
    fn this_class_must_be_in_range() {
        let bytes = [
            0xCA, 0xFE, 0xBA, 0xBE, // magic
            0x00, 0x00, 0x00, 0x34, // version
            0x00, 0x02, 1, 0x00, 0x01, b'A', // pool: Utf8 "A"
            0x00, 0x21, // access flags
            0x00, 0x02, // this, out of range
            0x00, 0x00, // super
        ];
        match ClassFile::parse(&bytes) {
            Err(Error::BadConstantIndex { index: 2, count: 2 }) => {}
            other => panic!("expected BadConstantIndex, got {:?}", other),
        }
    }
}
