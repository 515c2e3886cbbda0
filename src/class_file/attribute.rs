use crate::class_file::{
    bytecode, write_backpatched_u32, ConstantPool, Instruction, Serialize, StackMapFrame,
};
use crate::{ByteCursor, Error, InnerClassAccessFlags};
use byteorder::WriteBytesExt;
use std::io::Seek;

/// Attributes (used in classes, methods, and even on some attributes)
///
/// An attribute is a named, length-prefixed block; the payload layout is
/// selected by resolving `name_index` to its `Utf8` string in the constant
/// pool. The byte length on the wire is recomputed by backpatching whenever
/// the attribute is serialized.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name_index: u16,
    pub info: AttributeInfo,
}

/// Payload of one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeInfo {
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.3
    Code {
        max_stack: u16,
        max_locals: u16,
        code: Vec<Instruction>,
        attributes: Vec<Attribute>,
    },

    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.12
    LineNumberTable { entries: Vec<LineNumberEntry> },

    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.4
    StackMapTable { frames: Vec<StackMapFrame> },

    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.10
    SourceFile { sourcefile_index: u16 },

    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.29
    NestMembers { classes: Vec<u16> },

    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.6
    InnerClasses { entries: Vec<InnerClassEntry> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberEntry {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerClassEntry {
    pub inner_class: u16,

    /// Zero when the inner class is not a member of a class
    pub outer_class: u16,

    /// Zero when the inner class is anonymous
    pub inner_name: u16,

    pub access_flags: InnerClassAccessFlags,
}

impl AttributeInfo {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeInfo::Code { .. } => "Code",
            AttributeInfo::LineNumberTable { .. } => "LineNumberTable",
            AttributeInfo::StackMapTable { .. } => "StackMapTable",
            AttributeInfo::SourceFile { .. } => "SourceFile",
            AttributeInfo::NestMembers { .. } => "NestMembers",
            AttributeInfo::InnerClasses { .. } => "InnerClasses",
        }
    }
}

impl Attribute {
    pub fn parse(cursor: &mut ByteCursor, pool: &ConstantPool) -> Result<Attribute, Error> {
        let name_index = cursor.u16()?;
        let declared = cursor.u32()?;
        let name = pool.get_utf8(name_index)?;
        let start = cursor.position();
        let info = match name {
            b"Code" => parse_code_attribute(cursor, pool)?,
            b"LineNumberTable" => parse_line_number_table(cursor)?,
            b"StackMapTable" => parse_stack_map_table(cursor)?,
            b"SourceFile" => AttributeInfo::SourceFile {
                sourcefile_index: {
                    let index = cursor.u16()?;
                    pool.get_utf8(index)?;
                    index
                },
            },
            b"NestMembers" => parse_nest_members(cursor, pool)?,
            b"InnerClasses" => parse_inner_classes(cursor, pool)?,
            other => {
                return Err(Error::UnsupportedAttribute {
                    name: String::from_utf8_lossy(other).into_owned(),
                })
            }
        };
        let actual = (cursor.position() - start) as u32;
        if actual != declared {
            return Err(Error::AttributeLengthMismatch {
                name: info.name(),
                declared,
                actual,
            });
        }
        Ok(Attribute { name_index, info })
    }
}

fn parse_code_attribute(cursor: &mut ByteCursor, pool: &ConstantPool) -> Result<AttributeInfo, Error> {
    let max_stack = cursor.u16()?;
    let max_locals = cursor.u16()?;
    let code_length = cursor.u32()? as usize;
    let code = bytecode::parse_code(cursor.take(code_length)?)?;
    let exception_table_count = cursor.u16()?;
    if exception_table_count != 0 {
        return Err(Error::UnsupportedFeature {
            what: "Code exception table entries",
        });
    }
    let attribute_count = cursor.u16()?;
    let mut attributes = Vec::with_capacity(attribute_count as usize);
    for _ in 0..attribute_count {
        attributes.push(Attribute::parse(cursor, pool)?);
    }
    Ok(AttributeInfo::Code {
        max_stack,
        max_locals,
        code,
        attributes,
    })
}

fn parse_line_number_table(cursor: &mut ByteCursor) -> Result<AttributeInfo, Error> {
    let count = cursor.u16()?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        entries.push(LineNumberEntry {
            start_pc: cursor.u16()?,
            line_number: cursor.u16()?,
        });
    }
    Ok(AttributeInfo::LineNumberTable { entries })
}

fn parse_stack_map_table(cursor: &mut ByteCursor) -> Result<AttributeInfo, Error> {
    let count = cursor.u16()?;
    let mut frames = Vec::with_capacity(count as usize);
    for _ in 0..count {
        frames.push(StackMapFrame::parse(cursor)?);
    }
    Ok(AttributeInfo::StackMapTable { frames })
}

fn parse_nest_members(cursor: &mut ByteCursor, pool: &ConstantPool) -> Result<AttributeInfo, Error> {
    let count = cursor.u16()?;
    let mut classes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        classes.push(pool.check_index(cursor.u16()?)?);
    }
    Ok(AttributeInfo::NestMembers { classes })
}

fn parse_inner_classes(cursor: &mut ByteCursor, pool: &ConstantPool) -> Result<AttributeInfo, Error> {
    let count = cursor.u16()?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let inner_class = pool.check_index(cursor.u16()?)?;
        // outer class and inner name are optional; zero means absent
        let outer_class = cursor.u16()?;
        if outer_class != 0 {
            pool.check_index(outer_class)?;
        }
        let inner_name = cursor.u16()?;
        if inner_name != 0 {
            pool.check_index(inner_name)?;
        }
        let access_flags = InnerClassAccessFlags::parse(cursor)?;
        entries.push(InnerClassEntry {
            inner_class,
            outer_class,
            inner_name,
            access_flags,
        });
    }
    Ok(AttributeInfo::InnerClasses { entries })
}

impl Serialize for Attribute {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.name_index.serialize(writer)?;
        write_backpatched_u32(writer, |writer| self.info.serialize(writer))
    }
}

impl Serialize for AttributeInfo {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            AttributeInfo::Code {
                max_stack,
                max_locals,
                code,
                attributes,
            } => {
                max_stack.serialize(writer)?;
                max_locals.serialize(writer)?;
                write_backpatched_u32(writer, |writer| {
                    for instruction in code {
                        instruction.serialize(writer)?;
                    }
                    Ok(())
                })?;
                // no exception table entries are modeled
                0u16.serialize(writer)?;
                attributes.serialize(writer)?;
            }
            AttributeInfo::LineNumberTable { entries } => entries.serialize(writer)?,
            AttributeInfo::StackMapTable { frames } => frames.serialize(writer)?,
            AttributeInfo::SourceFile { sourcefile_index } => {
                sourcefile_index.serialize(writer)?;
            }
            AttributeInfo::NestMembers { classes } => classes.serialize(writer)?,
            AttributeInfo::InnerClasses { entries } => entries.serialize(writer)?,
        };
        Ok(())
    }
}

impl Serialize for LineNumberEntry {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.line_number.serialize(writer)?;
        Ok(())
    }
}

impl Serialize for InnerClassEntry {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.inner_class.serialize(writer)?;
        self.outer_class.serialize(writer)?;
        self.inner_name.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        Ok(())
    }
}
