// minic: check a MiniC source file and print every diagnostic found

use std::fs;
use std::path::Path;
use std::process;

use log::info;
use minic::{compile, tokenize};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("minic");

    let show_tokens = args.iter().skip(1).any(|arg| arg == "--tokens");
    let Some(source_file) = args.iter().skip(1).find(|arg| !arg.starts_with("--")) else {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} [--tokens] <file.c>", program_name);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} demos/sample.c           # A program with no errors", program_name);
        eprintln!("  {} demos/errors.c           # One of each diagnostic", program_name);
        process::exit(1);
    };

    if !Path::new(source_file).exists() {
        eprintln!("Error: File '{}' not found", source_file);
        process::exit(1);
    }

    let source = fs::read_to_string(source_file)?;

    if show_tokens {
        for token in tokenize(&source) {
            println!("{:>4}:{:<3} {:?}", token.location.line, token.location.column, token.kind);
        }
    }

    let compilation = match compile(&source) {
        Ok(compilation) => compilation,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    for err in &compilation.lex_errors {
        eprintln!("{}", err);
    }
    info!("parsed {} top-level declarations", compilation.unit.decls.len());

    let report = compilation.check();
    for diagnostic in &report.diagnostics {
        eprintln!("{}", diagnostic);
    }

    let lex_errors = &compilation.lex_errors;
    let failed = !report.ok || !report.diagnostics.is_empty() || !lex_errors.is_empty();
    if failed {
        eprintln!(
            "{}: {} lexical error(s), {} semantic diagnostic(s)",
            source_file,
            lex_errors.len(),
            report.diagnostics.len()
        );
        process::exit(1);
    }

    eprintln!("{}: OK", source_file);
    Ok(())
}
