//! Shared fixture: the hello-world class both as a wire image built byte by
//! byte and as the model the codec should produce for it.

use jasm::class_file::{
    Attribute, AttributeInfo, ClassFile, Constant, ConstantPool, Instruction, Method, Operand,
    Version,
};
use jasm::{ClassAccessFlags, MethodAccessFlags};

pub struct Image {
    bytes: Vec<u8>,
}

impl Image {
    pub fn new() -> Image {
        Image { bytes: Vec::new() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn utf8(&mut self, text: &str) {
        self.u8(1);
        self.u16(text.len() as u16);
        self.bytes.extend_from_slice(text.as_bytes());
    }

    pub fn class(&mut self, name_index: u16) {
        self.u8(7);
        self.u16(name_index);
    }

    pub fn string(&mut self, string_index: u16) {
        self.u8(8);
        self.u16(string_index);
    }

    pub fn field_ref(&mut self, class_index: u16, name_and_type_index: u16) {
        self.u8(9);
        self.u16(class_index);
        self.u16(name_and_type_index);
    }

    pub fn method_ref(&mut self, class_index: u16, name_and_type_index: u16) {
        self.u8(10);
        self.u16(class_index);
        self.u16(name_and_type_index);
    }

    pub fn name_and_type(&mut self, name_index: u16, descriptor_index: u16) {
        self.u8(12);
        self.u16(name_index);
        self.u16(descriptor_index);
    }
}

/// Wire image of a class whose single `main` method prints "Hello, world!",
/// with every length field computed by hand
pub fn hello_world_image() -> Vec<u8> {
    let mut image = Image::new();
    image.u32(0xCAFEBABE);
    image.u16(0); // minor version
    image.u16(58); // major version

    image.u16(22); // constant pool count
    image.utf8("Main"); // 1
    image.class(1); // 2
    image.utf8("java/lang/Object"); // 3
    image.class(3); // 4
    image.utf8("java/lang/System"); // 5
    image.class(5); // 6
    image.utf8("java/io/PrintStream"); // 7
    image.class(7); // 8
    image.utf8("Hello, world!"); // 9
    image.string(9); // 10
    image.utf8("out"); // 11
    image.utf8("Ljava/io/PrintStream;"); // 12
    image.name_and_type(11, 12); // 13
    image.field_ref(6, 13); // 14
    image.utf8("println"); // 15
    image.utf8("(Ljava/lang/String;)V"); // 16
    image.name_and_type(15, 16); // 17
    image.method_ref(8, 17); // 18
    image.utf8("main"); // 19
    image.utf8("([Ljava/lang/String;)V"); // 20
    image.utf8("Code"); // 21

    image.u16(0x0021); // ACC_PUBLIC | ACC_SUPER
    image.u16(2); // this
    image.u16(4); // super
    image.u16(0); // interfaces
    image.u16(0); // fields

    image.u16(1); // methods
    image.u16(0x0009); // ACC_PUBLIC | ACC_STATIC
    image.u16(19); // name
    image.u16(20); // descriptor
    image.u16(1); // one attribute
    image.u16(21); // "Code"
    image.u32(21); // attribute length
    image.u16(2); // max_stack
    image.u16(1); // max_locals
    image.u32(9); // code length
    image.u8(0xB2); // getstatic
    image.u16(14);
    image.u8(0x12); // ldc
    image.u8(10);
    image.u8(0xB6); // invokevirtual
    image.u16(18);
    image.u8(0xB1); // return
    image.u16(0); // exception table
    image.u16(0); // code attributes

    image.u16(0); // class attributes
    image.into_bytes()
}

/// The model [`hello_world_image`] decodes to
pub fn hello_world_class() -> ClassFile {
    let constant_pool = ConstantPool::new(vec![
        Constant::Utf8(b"Main".to_vec()),
        Constant::Class { name_index: 1 },
        Constant::Utf8(b"java/lang/Object".to_vec()),
        Constant::Class { name_index: 3 },
        Constant::Utf8(b"java/lang/System".to_vec()),
        Constant::Class { name_index: 5 },
        Constant::Utf8(b"java/io/PrintStream".to_vec()),
        Constant::Class { name_index: 7 },
        Constant::Utf8(b"Hello, world!".to_vec()),
        Constant::String { string_index: 9 },
        Constant::Utf8(b"out".to_vec()),
        Constant::Utf8(b"Ljava/io/PrintStream;".to_vec()),
        Constant::NameAndType {
            name_index: 11,
            descriptor_index: 12,
        },
        Constant::FieldRef {
            class_index: 6,
            name_and_type_index: 13,
        },
        Constant::Utf8(b"println".to_vec()),
        Constant::Utf8(b"(Ljava/lang/String;)V".to_vec()),
        Constant::NameAndType {
            name_index: 15,
            descriptor_index: 16,
        },
        Constant::MethodRef {
            class_index: 8,
            name_and_type_index: 17,
        },
        Constant::Utf8(b"main".to_vec()),
        Constant::Utf8(b"([Ljava/lang/String;)V".to_vec()),
        Constant::Utf8(b"Code".to_vec()),
    ]);
    ClassFile {
        version: Version {
            minor_version: 0,
            major_version: 58,
        },
        constant_pool,
        access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        this_class: 2,
        super_class: 4,
        interfaces: Vec::new(),
        methods: vec![Method {
            access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
            name_index: 19,
            descriptor_index: 20,
            attributes: vec![Attribute {
                name_index: 21,
                info: AttributeInfo::Code {
                    max_stack: 2,
                    max_locals: 1,
                    code: vec![
                        Instruction {
                            opcode: 0xB2,
                            operand: Operand::U16(14),
                        },
                        Instruction {
                            opcode: 0x12,
                            operand: Operand::U8(10),
                        },
                        Instruction {
                            opcode: 0xB6,
                            operand: Operand::U16(18),
                        },
                        Instruction {
                            opcode: 0xB1,
                            operand: Operand::None,
                        },
                    ],
                    attributes: Vec::new(),
                },
            }],
        }],
        attributes: Vec::new(),
    }
}
