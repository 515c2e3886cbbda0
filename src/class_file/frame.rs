use crate::class_file::Serialize;
use crate::{ByteCursor, Error};
use byteorder::WriteBytesExt;
use std::io::{Result, Seek};

/// One item of the type state the bytecode verifier tracks for a local
/// variable or operand stack slot
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.4
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum VerificationType {
    Top,
    Integer,
    Float,
    Double,
    Long,
    Null,

    /// In the constructor, the `this` parameter starts with this type then
    /// turns into an object type after `<init>` is called
    UninitializedThis,

    /// Object type, pointing at a `Class` entry in the constant pool
    Object(u16),

    /// State of an object after `new` has been called but `<init>` has not;
    /// the payload is the code offset of the `new` instruction
    Uninitialized(u16),
}

impl VerificationType {
    pub fn parse(cursor: &mut ByteCursor) -> std::result::Result<VerificationType, Error> {
        let tag = cursor.u8()?;
        let item = match tag {
            0 => VerificationType::Top,
            1 => VerificationType::Integer,
            2 => VerificationType::Float,
            3 => VerificationType::Double,
            4 => VerificationType::Long,
            5 => VerificationType::Null,
            6 => VerificationType::UninitializedThis,
            7 => VerificationType::Object(cursor.u16()?),
            8 => VerificationType::Uninitialized(cursor.u16()?),
            tag => return Err(Error::UnsupportedStackMapTag { tag }),
        };
        Ok(item)
    }
}

impl Serialize for VerificationType {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        match self {
            VerificationType::Top => 0u8.serialize(writer)?,
            VerificationType::Integer => 1u8.serialize(writer)?,
            VerificationType::Float => 2u8.serialize(writer)?,
            VerificationType::Double => 3u8.serialize(writer)?,
            VerificationType::Long => 4u8.serialize(writer)?,
            VerificationType::Null => 5u8.serialize(writer)?,
            VerificationType::UninitializedThis => 6u8.serialize(writer)?,
            VerificationType::Object(index) => {
                7u8.serialize(writer)?;
                index.serialize(writer)?;
            }
            VerificationType::Uninitialized(offset) => {
                8u8.serialize(writer)?;
                offset.serialize(writer)?;
            }
        };
        Ok(())
    }
}

/// A delta-encoded snapshot of the verifier type state at one bytecode offset
///
/// The frame kind is selected by the numeric range of the leading tag byte,
/// not by discrete values. The variants deliberately stay distinct even
/// where they describe the same abstract frame (`SameFrame` with tag 3 and
/// `SameFrameExtended` with delta 3 are different byte sequences), so a
/// decoded table re-encodes to the exact bytes it came from.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.4
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackMapFrame {
    /// Same locals as the previous frame, empty stack; the tag byte itself
    /// is the offset delta. Tags 0-63
    SameFrame { offset_delta: u8 },

    /// Same locals as the previous frame, one stack item; the offset delta
    /// is the tag byte minus 64. Tags 64-127
    SameLocals1StackItem {
        offset_delta: u8,
        stack: VerificationType,
    },

    /// `SameLocals1StackItem` with an explicit 16-bit offset delta. Tag 247
    SameLocals1StackItemExtended {
        offset_delta: u16,
        stack: VerificationType,
    },

    /// Previous frame without its last `chopped` locals, empty stack;
    /// `chopped` must be 1 to 3 and is encoded as `251 - tag`. Tags 248-250
    ChopFrame { chopped: u8, offset_delta: u16 },

    /// `SameFrame` with an explicit 16-bit offset delta. Tag 251
    SameFrameExtended { offset_delta: u16 },

    /// Previous frame with 1 to 3 extra locals, empty stack; the local
    /// count is encoded as `tag - 251`. Tags 252-254
    AppendFrame {
        offset_delta: u16,
        locals: Vec<VerificationType>,
    },

    /// Exactly the locals and stack given. Tag 255
    FullFrame {
        offset_delta: u16,
        locals: Vec<VerificationType>,
        stack: Vec<VerificationType>,
    },
}

impl StackMapFrame {
    pub fn parse(cursor: &mut ByteCursor) -> std::result::Result<StackMapFrame, Error> {
        let tag = cursor.u8()?;
        let frame = match tag {
            0..=63 => StackMapFrame::SameFrame { offset_delta: tag },
            64..=127 => StackMapFrame::SameLocals1StackItem {
                offset_delta: tag - 64,
                stack: VerificationType::parse(cursor)?,
            },
            // 128-246 are reserved by the JVM spec
            128..=246 => return Err(Error::UnsupportedStackMapTag { tag }),
            247 => StackMapFrame::SameLocals1StackItemExtended {
                offset_delta: cursor.u16()?,
                stack: VerificationType::parse(cursor)?,
            },
            248..=250 => StackMapFrame::ChopFrame {
                chopped: 251 - tag,
                offset_delta: cursor.u16()?,
            },
            251 => StackMapFrame::SameFrameExtended {
                offset_delta: cursor.u16()?,
            },
            252..=254 => {
                let offset_delta = cursor.u16()?;
                let mut locals = Vec::with_capacity((tag - 251) as usize);
                for _ in 251..tag {
                    locals.push(VerificationType::parse(cursor)?);
                }
                StackMapFrame::AppendFrame {
                    offset_delta,
                    locals,
                }
            }
            255 => {
                let offset_delta = cursor.u16()?;
                let local_count = cursor.u16()?;
                let mut locals = Vec::with_capacity(local_count as usize);
                for _ in 0..local_count {
                    locals.push(VerificationType::parse(cursor)?);
                }
                let stack_count = cursor.u16()?;
                let mut stack = Vec::with_capacity(stack_count as usize);
                for _ in 0..stack_count {
                    stack.push(VerificationType::parse(cursor)?);
                }
                StackMapFrame::FullFrame {
                    offset_delta,
                    locals,
                    stack,
                }
            }
        };
        Ok(frame)
    }
}

impl Serialize for StackMapFrame {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        match self {
            // `same_frame`
            StackMapFrame::SameFrame { offset_delta } => {
                assert!(*offset_delta < 64, "same_frame delta fits in the tag byte");
                offset_delta.serialize(writer)?;
            }

            // `same_locals_1_stack_item_frame`
            StackMapFrame::SameLocals1StackItem {
                offset_delta,
                stack,
            } => {
                assert!(
                    *offset_delta < 64,
                    "same_locals_1_stack_item_frame delta fits in the tag byte"
                );
                (64 + offset_delta).serialize(writer)?;
                stack.serialize(writer)?;
            }

            // `same_locals_1_stack_item_frame_extended`
            StackMapFrame::SameLocals1StackItemExtended {
                offset_delta,
                stack,
            } => {
                247u8.serialize(writer)?;
                offset_delta.serialize(writer)?;
                stack.serialize(writer)?;
            }

            // `chop_frame`
            StackMapFrame::ChopFrame {
                chopped,
                offset_delta,
            } => {
                assert!(0 < *chopped && *chopped < 4, "chop_frame chops 1-3 locals");
                (251 - chopped).serialize(writer)?;
                offset_delta.serialize(writer)?;
            }

            // `same_frame_extended`
            StackMapFrame::SameFrameExtended { offset_delta } => {
                251u8.serialize(writer)?;
                offset_delta.serialize(writer)?;
            }

            // `append_frame`
            StackMapFrame::AppendFrame {
                offset_delta,
                locals,
            } => {
                let added = locals.len();
                assert!(0 < added && added < 4, "append_frame adds 1-3 locals");
                (251 + added as u8).serialize(writer)?;
                offset_delta.serialize(writer)?;
                for local in locals {
                    local.serialize(writer)?;
                }
            }

            // `full_frame`
            StackMapFrame::FullFrame {
                offset_delta,
                locals,
                stack,
            } => {
                255u8.serialize(writer)?;
                offset_delta.serialize(writer)?;
                locals.serialize(writer)?;
                stack.serialize(writer)?;
            }
        };
        Ok(())
    }
}

#[cfg(test)]
mod stack_map_tests {
    use super::*;
    use std::io::Cursor;

    fn encode(frame: &StackMapFrame) -> Vec<u8> {
        let mut writer = Cursor::new(Vec::new());
        frame.serialize(&mut writer).unwrap();
        writer.into_inner()
    }

    /// Minimal wire image for a frame starting with `tag`, padded with
    /// enough plausible payload for every range
    fn frame_bytes(tag: u8) -> Vec<u8> {
        let mut bytes = vec![tag];
        match tag {
            0..=63 => {}
            64..=127 => bytes.push(1), // one Integer stack item
            128..=246 => {}
            247 => bytes.extend([0x00, 0x05, 1]),
            248..=251 => bytes.extend([0x00, 0x05]),
            252..=254 => {
                bytes.extend([0x00, 0x05]);
                for _ in 251..tag {
                    bytes.push(1);
                }
            }
            255 => bytes.extend([0x00, 0x05, 0x00, 0x01, 1, 0x00, 0x01, 5]),
        }
        bytes
    }

    #[test]
    fn every_tag_classifies_exactly_once() {
        for tag in 0..=255u8 {
            let bytes = frame_bytes(tag);
            let result = StackMapFrame::parse(&mut ByteCursor::new(&bytes));
            match (tag, result) {
                (0..=63, Ok(StackMapFrame::SameFrame { offset_delta })) => {
                    assert_eq!(offset_delta, tag);
                }
                (64..=127, Ok(StackMapFrame::SameLocals1StackItem { offset_delta, .. })) => {
                    assert_eq!(offset_delta, tag - 64);
                }
                (128..=246, Err(Error::UnsupportedStackMapTag { tag: reported })) => {
                    assert_eq!(reported, tag);
                }
                (247, Ok(StackMapFrame::SameLocals1StackItemExtended { .. })) => {}
                (248..=250, Ok(StackMapFrame::ChopFrame { chopped, .. })) => {
                    assert_eq!(chopped, 251 - tag);
                }
                (251, Ok(StackMapFrame::SameFrameExtended { .. })) => {}
                (252..=254, Ok(StackMapFrame::AppendFrame { ref locals, .. })) => {
                    assert_eq!(locals.len(), (tag - 251) as usize);
                }
                (255, Ok(StackMapFrame::FullFrame { .. })) => {}
                (tag, result) => panic!("tag {} misclassified: {:?}", tag, result),
            }
        }
    }

    #[test]
    fn decoded_frames_reencode_to_the_same_bytes() {
        for tag in (0..=255u8).filter(|t| !(128..=246).contains(t)) {
            let bytes = frame_bytes(tag);
            let frame = StackMapFrame::parse(&mut ByteCursor::new(&bytes)).unwrap();
            assert_eq!(encode(&frame), bytes, "tag {}", tag);
        }
    }

    #[test]
    fn scenario_byte_0x40() {
        let bytes = [0x40, 7, 0x00, 0x09]; // one Object stack item
        let frame = StackMapFrame::parse(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(
            frame,
            StackMapFrame::SameLocals1StackItem {
                offset_delta: 0,
                stack: VerificationType::Object(9),
            }
        );
    }

    #[test]
    fn full_frame_reads_locals_then_stack() {
        let bytes = [
            0xFF, 0x00, 0x0A, // offset delta 10
            0x00, 0x02, 1, 8, 0x00, 0x04, // locals: Integer, Uninitialized(4)
            0x00, 0x01, 6, // stack: UninitializedThis
        ];
        let frame = StackMapFrame::parse(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(
            frame,
            StackMapFrame::FullFrame {
                offset_delta: 10,
                locals: vec![
                    VerificationType::Integer,
                    VerificationType::Uninitialized(4)
                ],
                stack: vec![VerificationType::UninitializedThis],
            }
        );
        assert_eq!(encode(&frame), bytes);
    }

    #[test]
    fn truncated_frame_is_out_of_bounds() {
        match StackMapFrame::parse(&mut ByteCursor::new(&[247, 0x00])) {
            Err(Error::OutOfBounds { .. }) => {}
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }
}
