use byteorder::{BigEndian, WriteBytesExt};
use std::io::{Result, Seek, SeekFrom};

/// Utility trait for serializing data inside class files
///
/// Java class files have some peculiarities that make it useful to define an
/// extra trait (instead of just using `serde`):
///
///   - tags are always `u8`
///   - when serializing a sequence, the length of the sequence is usually `u16`
///   - attribute payloads are prefixed by a byte count that is only known
///     once the payload has been written, so writers must support seeking
///     back over an already-written length field (see [`write_backpatched_u32`])
///
pub trait Serialize: Sized {
    /// Serialize construct into a binary output stream
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()>;
}

impl Serialize for u8 {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(*self)
    }
}

impl Serialize for u16 {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(*self)
    }
}

impl Serialize for u32 {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(*self)
    }
}

impl Serialize for i8 {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        writer.write_i8(*self)
    }
}

impl Serialize for i16 {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        writer.write_i16::<BigEndian>(*self)
    }
}

/// Size in `u16` is the first thing serialized/deserialized
impl<A: Serialize> Serialize for Vec<A> {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        (self.len() as u16).serialize(writer)?;
        for elem in self {
            elem.serialize(writer)?;
        }
        Ok(())
    }
}

/// Write a `u32` byte count whose value is only known after the content it
/// prefixes has been written.
///
/// Writes a zero placeholder, runs `body`, then seeks back and overwrites
/// the placeholder with the number of bytes `body` appended before resuming
/// at the end of the stream.
pub fn write_backpatched_u32<W, F>(writer: &mut W, body: F) -> Result<()>
where
    W: WriteBytesExt + Seek,
    F: FnOnce(&mut W) -> Result<()>,
{
    let patch_at = writer.stream_position()?;
    0u32.serialize(writer)?;
    body(writer)?;
    let end = writer.stream_position()?;
    let length = (end - patch_at - 4) as u32;
    writer.seek(SeekFrom::Start(patch_at))?;
    length.serialize(writer)?;
    writer.seek(SeekFrom::Start(end))?;
    Ok(())
}
