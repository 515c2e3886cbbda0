use jasm::asm;
use jasm::class_file::ClassFile;
use jasm::Error;

use clap::{Arg, ArgAction, Command};
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Error> {
    env_logger::init();

    let matches = Command::new("JVM class file assembler")
        .version("0.1.0")
        .about("Assemble textual class descriptions into JVM class files")
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Output class file path (defaults to INPUT with a .class extension)"),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .action(ArgAction::SetTrue)
                .help("Decode INPUT as a class file and check that it round-trips"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Input assembly source (or class file with --dump)")
                .required(true)
                .index(1),
        )
        .get_matches();

    let input = matches.get_one::<String>("INPUT").unwrap();

    if matches.get_flag("dump") {
        let bytes = fs::read(input).map_err(Error::IoError)?;
        let class = ClassFile::parse(&bytes)?;
        log::info!(
            "{}: version {}.{}, {} constant pool entries, {} methods",
            input,
            class.version.major_version,
            class.version.minor_version,
            class.constant_pool.entries().len(),
            class.methods.len()
        );
        let encoded = class.encode()?;
        if encoded == bytes {
            log::info!("round trip OK ({} bytes)", bytes.len());
        } else {
            log::error!(
                "round trip mismatch: {} bytes in, {} bytes out",
                bytes.len(),
                encoded.len()
            );
        }
        return Ok(());
    }

    log::info!("Reading and assembling '{}'", input);
    let source = fs::read_to_string(input).map_err(Error::IoError)?;
    let class = asm::parse_assembly(&source)?;

    let output = match matches.get_one::<String>("output") {
        Some(path) => PathBuf::from(path),
        None => Path::new(input).with_extension("class"),
    };
    log::info!("Writing '{}'", output.display());
    class.save_to_path(&output, true).map_err(Error::IoError)?;

    Ok(())
}
