mod common;

use common::{hello_world_class, hello_world_image, Image};
use jasm::class_file::{
    Attribute, AttributeInfo, ClassFile, Constant, ConstantPool, Instruction, InnerClassEntry,
    LineNumberEntry, Method, Operand, StackMapFrame, VerificationType, Version,
};
use jasm::{ClassAccessFlags, InnerClassAccessFlags, MethodAccessFlags};
use pretty_assertions::assert_eq;

#[test]
fn hello_world_decodes_to_the_expected_model() {
    let class = ClassFile::parse(&hello_world_image()).unwrap();
    assert_eq!(class, hello_world_class());
}

#[test]
fn hello_world_survives_a_byte_exact_round_trip() {
    let image = hello_world_image();
    let class = ClassFile::parse(&image).unwrap();
    assert_eq!(class.encode().unwrap(), image);
}

#[test]
fn encoding_the_model_reproduces_the_backpatched_lengths() {
    // the image carries hand-computed length fields (21-byte attribute,
    // 9-byte instruction stream); the encoder must arrive at the same values
    assert_eq!(hello_world_class().encode().unwrap(), hello_world_image());
}

#[test]
fn minimal_class_with_a_one_entry_pool() {
    let mut image = Image::new();
    image.u32(0xCAFEBABE);
    image.u16(0); // minor
    image.u16(58); // major
    image.u16(2); // pool count
    image.utf8("Main"); // 1
    image.u16(0x0021); // access flags
    image.u16(1); // this
    image.u16(0); // super
    image.u16(0); // interfaces
    image.u16(0); // fields
    image.u16(0); // methods
    image.u16(0); // attributes
    let bytes = image.into_bytes();

    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(class.constant_pool.entries().len(), 1);
    assert_eq!(
        class.constant_pool.entries()[0],
        Constant::Utf8(b"Main".to_vec())
    );
    assert_eq!(
        class.access_flags,
        ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER
    );
    assert_eq!(class.this_class, 1);
    assert_eq!(class.super_class, 0);
    assert!(class.methods.is_empty());
    assert_eq!(class.encode().unwrap(), bytes);
}

#[test]
fn attribute_tree_with_frames_and_line_numbers_round_trips() {
    let constant_pool = ConstantPool::new(vec![
        Constant::Utf8(b"Nest".to_vec()),              // 1
        Constant::Class { name_index: 1 },             // 2
        Constant::Utf8(b"Nest$Inner".to_vec()),        // 3
        Constant::Class { name_index: 3 },             // 4
        Constant::Utf8(b"run".to_vec()),               // 5
        Constant::Utf8(b"()V".to_vec()),               // 6
        Constant::Utf8(b"Code".to_vec()),              // 7
        Constant::Utf8(b"LineNumberTable".to_vec()),   // 8
        Constant::Utf8(b"StackMapTable".to_vec()),     // 9
        Constant::Utf8(b"SourceFile".to_vec()),        // 10
        Constant::Utf8(b"Nest.java".to_vec()),         // 11
        Constant::Utf8(b"NestMembers".to_vec()),       // 12
        Constant::Utf8(b"InnerClasses".to_vec()),      // 13
    ]);
    let class = ClassFile {
        version: Version {
            minor_version: 0,
            major_version: 58,
        },
        constant_pool,
        access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        this_class: 2,
        super_class: 0,
        interfaces: Vec::new(),
        methods: vec![Method {
            access_flags: MethodAccessFlags::PUBLIC,
            name_index: 5,
            descriptor_index: 6,
            attributes: vec![Attribute {
                name_index: 7,
                info: AttributeInfo::Code {
                    max_stack: 1,
                    max_locals: 2,
                    code: vec![
                        Instruction {
                            opcode: 0x2A, // aload_0
                            operand: Operand::None,
                        },
                        Instruction {
                            opcode: 0xB1, // return
                            operand: Operand::None,
                        },
                    ],
                    attributes: vec![
                        Attribute {
                            name_index: 8,
                            info: AttributeInfo::LineNumberTable {
                                entries: vec![
                                    LineNumberEntry {
                                        start_pc: 0,
                                        line_number: 4,
                                    },
                                    LineNumberEntry {
                                        start_pc: 1,
                                        line_number: 5,
                                    },
                                ],
                            },
                        },
                        Attribute {
                            name_index: 9,
                            info: AttributeInfo::StackMapTable {
                                frames: vec![
                                    StackMapFrame::SameFrame { offset_delta: 1 },
                                    StackMapFrame::SameLocals1StackItem {
                                        offset_delta: 0,
                                        stack: VerificationType::Object(2),
                                    },
                                    StackMapFrame::ChopFrame {
                                        chopped: 2,
                                        offset_delta: 8,
                                    },
                                    StackMapFrame::SameFrameExtended { offset_delta: 70 },
                                    StackMapFrame::AppendFrame {
                                        offset_delta: 3,
                                        locals: vec![
                                            VerificationType::Long,
                                            VerificationType::Top,
                                        ],
                                    },
                                    StackMapFrame::FullFrame {
                                        offset_delta: 12,
                                        locals: vec![
                                            VerificationType::Object(4),
                                            VerificationType::Integer,
                                        ],
                                        stack: vec![VerificationType::Null],
                                    },
                                ],
                            },
                        },
                    ],
                },
            }],
        }],
        attributes: vec![
            Attribute {
                name_index: 10,
                info: AttributeInfo::SourceFile {
                    sourcefile_index: 11,
                },
            },
            Attribute {
                name_index: 12,
                info: AttributeInfo::NestMembers { classes: vec![4] },
            },
            Attribute {
                name_index: 13,
                info: AttributeInfo::InnerClasses {
                    entries: vec![InnerClassEntry {
                        inner_class: 4,
                        outer_class: 2,
                        inner_name: 1,
                        access_flags: InnerClassAccessFlags::PUBLIC
                            | InnerClassAccessFlags::STATIC,
                    }],
                },
            },
        ],
    };

    let bytes = class.encode().unwrap();
    // the decode re-checks every backpatched length field on the way in
    let decoded = ClassFile::parse(&bytes).unwrap();
    assert_eq!(decoded, class);
    assert_eq!(decoded.encode().unwrap(), bytes);
}

#[test]
fn declared_attribute_length_is_validated() {
    let mut image = Image::new();
    image.u32(0xCAFEBABE);
    image.u16(0);
    image.u16(58);
    image.u16(3); // pool count
    image.utf8("SourceFile"); // 1
    image.utf8("Main.java"); // 2
    image.u16(0x0021);
    image.u16(1);
    image.u16(0);
    image.u16(0); // interfaces
    image.u16(0); // fields
    image.u16(0); // methods
    image.u16(1); // one class attribute
    image.u16(1); // "SourceFile"
    image.u32(3); // wrong: payload is 2 bytes
    image.u16(2);
    image.u8(0); // padding the lie
    let bytes = image.into_bytes();

    match ClassFile::parse(&bytes) {
        Err(jasm::Error::AttributeLengthMismatch {
            name: "SourceFile",
            declared: 3,
            actual: 2,
        }) => {}
        other => panic!("expected AttributeLengthMismatch, got {:?}", other),
    }
}

#[test]
fn truncated_file_is_out_of_bounds() {
    let image = hello_world_image();
    match ClassFile::parse(&image[..image.len() - 4]) {
        Err(jasm::Error::OutOfBounds { .. }) => {}
        other => panic!("expected OutOfBounds, got {:?}", other),
    }
}
