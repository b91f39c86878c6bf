//! Command line handling for the wbwt binary.

use std::process::exit;
use std::{fmt::Display, fmt::Formatter};

use log::LevelFilter;

/// Pack (text to frame) or unpack (frame to text).
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Pack,
    Unpack,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct WbOpts {
    /// Compress or decompress
    pub op_mode: Mode,
    /// Names of files to process
    pub files: Vec<String>,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub level: LevelFilter,
}

impl WbOpts {
    pub fn new() -> Self {
        Self {
            op_mode: Mode::Pack,
            files: vec![],
            keep_input_files: false,
            force_overwrite: false,
            level: LevelFilter::Error,
        }
    }
}

impl Default for WbOpts {
    fn default() -> Self {
        Self::new()
    }
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn wbopts_init() -> WbOpts {
    let mut cli = WbOpts::new();

    let args = std::env::args().skip(1);
    for mut arg in args {
        if arg.starts_with("--") {
            match arg.as_str() {
                "--help" => help(),
                "--pack" => cli.op_mode = Mode::Pack,
                "--unpack" => cli.op_mode = Mode::Unpack,
                "--keep" => cli.keep_input_files = true,
                "--force" => cli.force_overwrite = true,
                "--quiet" => cli.level = LevelFilter::Off,
                "--version" => version(),
                other => eprintln!("Unexpected command line argument: {}", other),
            }
        } else if arg.starts_with('-') {
            arg.remove(0);
            while !arg.is_empty() {
                // Stacked -v flags raise the log level step by step.
                if arg.starts_with('v') {
                    let mut count = 0;
                    while arg.starts_with('v') {
                        arg.remove(0);
                        count += 1;
                    }
                    cli.level = match count {
                        1 => LevelFilter::Warn,
                        2 => LevelFilter::Info,
                        3 => LevelFilter::Debug,
                        _ => LevelFilter::Trace,
                    };
                    continue;
                }
                match arg.remove(0) {
                    'h' => help(),
                    'z' => cli.op_mode = Mode::Pack,
                    'd' => cli.op_mode = Mode::Unpack,
                    'k' => cli.keep_input_files = true,
                    'f' => cli.force_overwrite = true,
                    'q' => cli.level = LevelFilter::Off,
                    'V' => version(),
                    other => {
                        eprintln!("Unexpected command line argument: -{}", other);
                        help()
                    }
                }
            }
        } else {
            cli.files.push(arg);
        }
    }
    cli
}

/// Prints help information
fn help() {
    println!(
        "
   usage: wbwt [flags and input files in any order]

   -h --help           print this message
   -z --pack           compress text files to .wbwt frames
   -d --unpack         decompress .wbwt frames back to text
   -k --keep           keep (don't delete) input files
   -f --force          overwrite existing output files
   -q --quiet          suppress noncritical messages
   -v                  be verbose (stack up to -vvvv for trace output)
   -V --version        display software version

    If invoked with no flags, the default action is to compress.
   "
    );
    exit(0);
}

fn version() {
    println!("Version: {}, written in Rust", VERSION);
    exit(0);
}
