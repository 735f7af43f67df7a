// ==============================================================================
// CLI for the Binder IDL Compiler
// ==============================================================================
//
// One subcommand, mirroring the upstream tool's primary entry point:
//   - `bidl compile [OPTIONS] INPUT [OUTPUT]`

use std::fs;
use std::io::{self, Write as _};
use std::path::PathBuf;

use bidl::{Compiler, Target};
use lexopt::prelude::*;

const MAIN_HELP: &str = "\
bidl - binder IDL compiler

Usage: bidl <COMMAND>

Commands:
  compile       Compile an interface or parcelable declaration to JSON

Options:
  -h, --help    Print help";

const COMPILE_HELP: &str = "\
Usage: bidl compile [OPTIONS] INPUT [OUTPUT]

Options:
  -I, --import-dir <DIR>     Additional directory to search for imports (repeatable)
  -p, --preprocessed <FILE>  A preprocessed manifest to load before compiling (repeatable)
      --managed              Validate against the managed-backend type namespace instead of native
  -h, --help                 Print help";

struct CompileArgs {
    input: Option<String>,
    output: Option<String>,
    import_dirs: Vec<PathBuf>,
    manifests: Vec<PathBuf>,
    managed: bool,
}

fn parse_compile_args(parser: &mut lexopt::Parser) -> Result<CompileArgs, lexopt::Error> {
    let mut import_dirs = Vec::new();
    let mut manifests = Vec::new();
    let mut managed = false;
    let mut positionals: Vec<String> = Vec::new();

    while let Some(arg) = parser.next()? {
        match arg {
            Short('I') | Long("import-dir") => {
                let val: String = parser.value()?.string()?;
                import_dirs.push(PathBuf::from(val));
            }
            Short('p') | Long("preprocessed") => {
                let val: String = parser.value()?.string()?;
                manifests.push(PathBuf::from(val));
            }
            Long("managed") => managed = true,
            Short('h') | Long("help") => {
                println!("{COMPILE_HELP}");
                std::process::exit(0);
            }
            Value(val) => {
                positionals.push(val.string()?);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    let input = positionals.first().cloned();
    let output = positionals.get(1).cloned();

    Ok(CompileArgs {
        input,
        output,
        import_dirs,
        manifests,
        managed,
    })
}

fn main() -> miette::Result<()> {
    miette::set_hook(Box::new(|_| Box::new(miette::MietteHandlerOpts::new().build())))?;

    let mut parser = lexopt::Parser::from_env();

    let subcommand = match parser.next() {
        Ok(Some(Value(val))) => val.string().map_err(|e| miette::miette!("{e}"))?,
        Ok(Some(Short('h') | Long("help"))) => {
            println!("{MAIN_HELP}");
            return Ok(());
        }
        Ok(Some(other)) => {
            let err = other.unexpected();
            eprintln!("error: {err}\n\n{MAIN_HELP}");
            std::process::exit(2);
        }
        Ok(None) => {
            eprintln!("error: a subcommand is required\n\n{MAIN_HELP}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    match subcommand.as_str() {
        "compile" => {
            let args = parse_compile_args(&mut parser).map_err(|e| miette::miette!("{e}"))?;
            run_compile(args)
        }
        other => {
            eprintln!("error: unknown subcommand `{other}`\n\n{MAIN_HELP}");
            std::process::exit(2);
        }
    }
}

fn run_compile(args: CompileArgs) -> miette::Result<()> {
    let input = args
        .input
        .ok_or_else(|| miette::miette!("missing required argument INPUT\n\n{COMPILE_HELP}"))?;

    let mut builder = Compiler::new();
    for dir in &args.import_dirs {
        builder.import_dir(dir);
    }
    for manifest in &args.manifests {
        builder.preprocessed(manifest);
    }
    builder.target(if args.managed { Target::Managed } else { Target::Native });

    let output = builder.compile(PathBuf::from(&input).as_path()).map_err(|e| {
        let first = e.0.into_iter().next().expect("CompileError is never empty");
        miette::Report::new(first)
    })?;

    let json_str = serde_json::to_string_pretty(&output.json)
        .map_err(|e| miette::miette!("serialize JSON: {e}"))?;

    write_output(&args.output, &json_str)
}

/// Write output to a file or stdout.
fn write_output(output: &Option<String>, content: &str) -> miette::Result<()> {
    let file_path = output.as_deref().filter(|s| *s != "-");

    match file_path {
        None => {
            if let Err(e) = writeln!(io::stdout(), "{content}") {
                if e.kind() == io::ErrorKind::BrokenPipe {
                    return Ok(());
                }
                return Err(miette::miette!("{e}: write to stdout"));
            }
            Ok(())
        }
        Some(file_path) => {
            let path = PathBuf::from(file_path);
            fs::write(&path, format!("{content}\n")).map_err(|e| miette::miette!("{e}: write {}", path.display()))
        }
    }
}
