use crate::class_file::{Attribute, ConstantPool, Serialize};
use crate::{ByteCursor, Error, MethodAccessFlags};
use byteorder::WriteBytesExt;
use std::io::Seek;

/// Method declared by a class
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.6
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub access_flags: MethodAccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
}

impl Method {
    pub fn parse(cursor: &mut ByteCursor, pool: &ConstantPool) -> Result<Method, Error> {
        let access_flags = MethodAccessFlags::parse(cursor)?;
        let name_index = pool.check_index(cursor.u16()?)?;
        let descriptor_index = pool.check_index(cursor.u16()?)?;
        let attribute_count = cursor.u16()?;
        let mut attributes = Vec::with_capacity(attribute_count as usize);
        for _ in 0..attribute_count {
            attributes.push(Attribute::parse(cursor, pool)?);
        }
        Ok(Method {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}

impl Serialize for Method {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.access_flags.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}
