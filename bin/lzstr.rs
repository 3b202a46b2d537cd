#![forbid(unsafe_code)]
use std::io::{Read, Write};
use std::path::PathBuf;
use std::{env, ffi, fs, io, process};

use lzstr::{Decoder, Encoder, Format};

fn main() -> CodingResult {
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(|ParamError| explain());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let mut files = flags.files;
    let input = files.pop().unwrap_or_else(explain);
    if !files.is_empty() {
        return explain();
    }
    let operation = flags.operation.unwrap_or_else(explain);
    let format = flags.format;

    let data = match input {
        Input::File(file) => fs::read(file)?,
        Input::Stdin => {
            let mut data = vec![];
            io::stdin().lock().read_to_end(&mut data)?;
            data
        }
    };

    let out = io::stdout();
    let mut out = out.lock();

    match operation {
        Operation::Encode => {
            let text = String::from_utf8(data)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            let encoder = Encoder::new(format);
            match format {
                // Raw output is not necessarily valid UTF-16, so it is written as bytes.
                Format::Raw => out.write_all(&encoder.encode_to_be_bytes(&text))?,
                _ => out.write_all(encoder.encode_to_string(&text).as_bytes())?,
            }
        }
        Operation::Decode => {
            let decoder = Decoder::new(format);
            let result = match format {
                Format::Raw => decoder.decode_be_bytes(&data),
                _ => {
                    let text = String::from_utf8(data)
                        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
                    decoder.decode_str(&text)
                }
            };
            let text = result.map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            out.write_all(text.as_bytes())?;
        }
    }

    out.flush()
}

struct Flags {
    files: Vec<Input>,
    operation: Option<Operation>,
    format: Format,
}

struct ParamError;

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Encode,
    Decode,
}

fn explain<T>() -> T {
    println!(
        "Usage: lzstr [-e|-d] [-f <format>] <file>\n\
        Arguments:\n\
        -e\t operation encode\n\
        -d\t operation decode\n\
        -f\t format: raw, base64 (default), uri, utf16\n\
        <file>\tfilepath or '-' for stdin"
    );
    process::exit(1);
}

impl Default for Flags {
    fn default() -> Flags {
        Flags {
            files: vec![],
            operation: None,
            format: Format::Base64,
        }
    }
}

fn command() -> clap::Command<'static> {
    clap::Command::new("lzstr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress text into text-safe alphabets")
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .takes_value(false),
        )
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .takes_value(false),
        )
        .group(
            clap::ArgGroup::new("operation")
                .args(&["decode", "encode"])
                .multiple(false)
                .required(true),
        )
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .takes_value(true)
                .default_value("base64")
                .value_parser(["raw", "base64", "uri", "utf16"]),
        )
        .arg(
            clap::Arg::new("file")
                .default_value("-")
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    fn from_args(mut args: impl Iterator<Item = ffi::OsString>) -> Result<Self, ParamError> {
        let mut flags = Flags::default();
        let matches = command().get_matches_from(args.by_ref());

        if matches.contains_id("decode") {
            flags.operation = Some(Operation::Decode);
        } else if matches.contains_id("encode") {
            flags.operation = Some(Operation::Encode);
        }

        match matches.get_one::<String>("format").map(String::as_str) {
            Some("raw") => flags.format = Format::Raw,
            Some("base64") => flags.format = Format::Base64,
            Some("uri") => flags.format = Format::UriComponent,
            Some("utf16") => flags.format = Format::Utf16,
            Some(_) => unreachable!("unparsed format"),
            _ => {}
        }

        match matches.get_one::<PathBuf>("file") {
            None => flags.files = vec![Input::Stdin],
            Some(p) if *p == PathBuf::from("-") => flags.files = vec![Input::Stdin],
            Some(p) => flags.files = vec![Input::File(p.clone())],
        }

        Ok(flags)
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
