use clap::{Arg, ArgAction, Command};
use std::path::Path;

use taxscan::machine::{FileSystemDisk, RootStateMachine, SequentialIdGenerator, ShellEnv};
use taxscan::problem;
use taxscan::scanning::{self, ScanOptions, UnknownPolicy};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt::init();

    let matches = Command::new("taxscan")
        .version(VERSION)
        .propagate_version(true)
        .about("The taxscan scripting notation scanner.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("check")
                .about("Scan the given source file and report any errors")
                .arg(
                    Arg::new("reject-unknown")
                        .long("reject-unknown")
                        .action(ArgAction::SetTrue)
                        .help("Fail when an instruction name opening a block is not a known command."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the source you want to scan."),
                ),
        )
        .subcommand(
            Command::new("print")
                .about("Scan the given source file and print its taxonomy")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit the taxonomy tree as JSON instead of text."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the source you want to scan."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let filename = required_filename(submatches);
            let options = ScanOptions {
                unknown_instructions: if submatches.get_flag("reject-unknown") {
                    UnknownPolicy::Reject
                } else {
                    UnknownPolicy::AssumeCommand
                },
            };
            let (source, file) = scan_one(filename, options);
            if file.is_failed() {
                for error in &file.errors {
                    eprintln!(
                        "{}",
                        problem::full_compilation_error(error, filename, &source)
                    );
                }
                std::process::exit(1);
            }
            println!(
                "{}: {} instruction{}",
                filename.display(),
                file.routine
                    .instructions
                    .len(),
                if file
                    .routine
                    .instructions
                    .len()
                    == 1
                {
                    ""
                } else {
                    "s"
                }
            );
        }
        Some(("print", submatches)) => {
            let filename = required_filename(submatches);
            let (source, file) = scan_one(filename, ScanOptions::default());
            if file.is_failed() {
                for error in &file.errors {
                    eprintln!(
                        "{}",
                        problem::full_compilation_error(error, filename, &source)
                    );
                }
                std::process::exit(1);
            }
            if submatches.get_flag("json") {
                match serde_json::to_string_pretty(&file) {
                    Ok(json) => println!("{}", json),
                    Err(error) => {
                        eprintln!("error: {}", error);
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", file);
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: taxscan [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn required_filename(submatches: &clap::ArgMatches) -> &Path {
    match submatches.get_one::<String>("filename") {
        Some(filename) => Path::new(filename),
        None => {
            // clap enforces the positional argument
            eprintln!("usage: taxscan check FILENAME");
            std::process::exit(1);
        }
    }
}

fn scan_one(
    filename: &Path,
    options: ScanOptions,
) -> (String, taxscan::language::FileTaxonomy) {
    let source = match scanning::load(filename) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    };

    let mut machine = RootStateMachine::new(
        ShellEnv::default(),
        FileSystemDisk::default(),
        SequentialIdGenerator::default(),
    );
    machine.init();

    let file = scanning::scan(&source, &machine, options);
    (source, file)
}
