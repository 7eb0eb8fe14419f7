//! Entrypoint for CLI
use std::{
    env,
    error::Error,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use jack_compiler::{compile_str, JackError, JackResult};
use log::{debug, error, info};
use rayon::prelude::*;

static USAGE: &str = r#"
usage: jackc PATH [--no-xml]

arguments:
    PATH        A single .jack source file, or a directory whose
                .jack files are each compiled as separate units

options:
    --no-xml    Only write the .vm instruction stream, skipping the
                parse trace (Name.xml) and token listing (NameT.xml)

examples:
    jackc Main.jack
    jackc Square/
"#;

const SOURCE_EXT: &str = "jack";

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    let cmd = match parse_args() {
        Some(cmd) => cmd,
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    };

    let sources = collect_sources(&cmd.path)?;
    if sources.is_empty() {
        error!("no .{SOURCE_EXT} files found at {}", cmd.path.display());
        std::process::exit(64)
    }

    let start = Instant::now();

    // Units share no state, so each one compiles on its own worker.
    let failures = sources
        .par_iter()
        .filter(|path| match compile_file(path, cmd.write_xml) {
            Ok(()) => false,
            Err(err) => {
                report_error(path, &err);
                true
            }
        })
        .count();

    info!(
        "compiled {} of {} units in {}ms",
        sources.len() - failures,
        sources.len(),
        start.elapsed().as_nanos() as f64 / 1000000.0
    );

    if failures > 0 {
        std::process::exit(1)
    }

    Ok(())
}

fn compile_file(path: &Path, write_xml: bool) -> JackResult<()> {
    debug!("compiling {}", path.display());

    let source_code = fs::read_to_string(path)?;
    let unit = compile_str(&source_code)?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(unit.class_name.as_str());
    if stem != unit.class_name.as_str() {
        // The instruction stream is qualified with the class name,
        // not the file name.
        info!("{} defines class {}", path.display(), unit.class_name);
    }

    fs::write(path.with_extension("vm"), &unit.vm)?;

    if write_xml {
        fs::write(path.with_extension("xml"), &unit.trace)?;
        fs::write(path.with_file_name(format!("{stem}T.xml")), &unit.tokens)?;
    }

    Ok(())
}

/// Print the error with the offending source line and a caret.
fn report_error(path: &Path, err: &JackError) {
    error!("{}: {}", path.display(), err);

    let span = match err.span() {
        Some(span) => span,
        None => return,
    };

    if let Ok(source_code) = fs::read_to_string(path) {
        let (line, _) = span.surrounding_line(&source_code);
        let padding = " ".repeat(span.column.saturating_sub(1) as usize);
        let marker = "^".repeat(span.size.max(1) as usize);
        eprintln!("{:>5} | {}", span.line, line);
        eprintln!("      | {padding}{marker}");
    }
}

/// Resolve the input path to the list of units to compile.
fn collect_sources(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    if path.is_dir() {
        let mut sources = vec![];
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_file() && has_source_ext(&entry_path) {
                sources.push(entry_path);
            }
        }
        sources.sort();
        Ok(sources)
    } else if has_source_ext(path) {
        Ok(vec![path.to_path_buf()])
    } else {
        Ok(vec![])
    }
}

fn has_source_ext(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == SOURCE_EXT)
}

fn parse_args() -> Option<Cmd> {
    let mut path = None;
    let mut write_xml = true;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-xml" => write_xml = false,
            "-h" | "--help" => return None,
            _ if arg.starts_with('-') => return None,
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => return None,
        }
    }

    Some(Cmd {
        path: path?,
        write_xml,
    })
}

fn print_usage() {
    println!("jackc v{}", env!("CARGO_PKG_VERSION"));
    println!("{USAGE}");
}

struct Cmd {
    path: PathBuf,
    write_xml: bool,
}
