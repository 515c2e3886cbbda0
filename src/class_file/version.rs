use super::Serialize;
use crate::{ByteCursor, Error};
use byteorder::WriteBytesExt;
use std::io::{Result, Seek};

/// Version of the class file, which is used to verify that the JVM has the
/// necessary features to interpret the class
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Clone, Copy)]
pub struct Version {
    pub minor_version: u16,
    pub major_version: u16,
}

impl Version {
    /// JVM class file version corresponding to Java SE 8 (released March 2014)
    pub const JAVA8: Version = Version {
        minor_version: 0,
        major_version: 52,
    };

    /// The minor version precedes the major version on the wire
    pub fn parse(cursor: &mut ByteCursor) -> std::result::Result<Version, Error> {
        let minor_version = cursor.u16()?;
        let major_version = cursor.u16()?;
        Ok(Version {
            minor_version,
            major_version,
        })
    }
}

impl Serialize for Version {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        self.minor_version.serialize(writer)?;
        self.major_version.serialize(writer)?;
        Ok(())
    }
}
