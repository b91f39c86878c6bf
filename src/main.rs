//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::fs;
use std::io;
use std::path::Path;

use log::{error, info, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use wbwt::tools::cli::{wbopts_init, Mode, WbOpts};
use wbwt::{compress, decompress, deserialize, serialize, MAX_NOTE_CHARS};

fn main() -> io::Result<()> {
    let options = wbopts_init();

    TermLogger::init(
        options.level,
        Config::default(),
        TerminalMode::Stdout,
        ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    if options.files.is_empty() {
        error!("No input files given. Try wbwt --help.");
        return Ok(());
    }

    match options.op_mode {
        Mode::Pack => pack(&options),
        Mode::Unpack => unpack(&options),
    }
}

/// Compress each input file into a sibling .wbwt frame.
fn pack(opts: &WbOpts) -> io::Result<()> {
    for fname in &opts.files {
        let text = fs::read_to_string(fname)?;
        if text.chars().count() > MAX_NOTE_CHARS {
            error!(
                "{} is longer than the {} character note limit, skipping.",
                fname, MAX_NOTE_CHARS
            );
            continue;
        }

        let frame = serialize(&compress(&text));
        info!(
            "{}: {} bytes of text into a {} byte frame.",
            fname,
            text.len(),
            frame.len()
        );
        if frame.len() >= text.len() {
            warn!("{} did not shrink; keeping the frame anyway.", fname);
        }

        let outname = format!("{}.wbwt", fname);
        write_output(&outname, &frame, opts.force_overwrite)?;
        if !opts.keep_input_files {
            fs::remove_file(fname)?;
        }
    }
    Ok(())
}

/// Decompress each .wbwt frame back into its text file.
fn unpack(opts: &WbOpts) -> io::Result<()> {
    for fname in &opts.files {
        let frame = fs::read(fname)?;
        let text = deserialize(&frame)
            .and_then(|payload| decompress(&payload))
            .map_err(|e| {
                error!("{}: {}", fname, e);
                io::Error::new(io::ErrorKind::InvalidData, e.to_string())
            })?;
        info!("{}: restored {} bytes of text.", fname, text.len());

        let outname = match fname.strip_suffix(".wbwt") {
            Some(stem) => stem.to_string(),
            None => format!("{}.txt", fname),
        };
        write_output(&outname, text.as_bytes(), opts.force_overwrite)?;
        if !opts.keep_input_files {
            fs::remove_file(fname)?;
        }
    }
    Ok(())
}

fn write_output(name: &str, data: &[u8], force: bool) -> io::Result<()> {
    if !force && Path::new(name).exists() {
        error!("{} already exists; use --force to overwrite.", name);
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "output file exists",
        ));
    }
    fs::write(name, data)
}
