//! Fable interpreter CLI.
//!
//! `fable <script>` runs a file; with no arguments an interactive session
//! starts.

use std::io::{BufRead, Write};

use fablec::Session;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => repl(),
        Some("--help" | "-h") => print_usage(),
        Some("--version" | "-V") => println!("fable {}", env!("CARGO_PKG_VERSION")),
        Some(path) => run_file(path),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("Usage: fable [script]");
    println!();
    println!("With no arguments an interactive session starts.");
    println!();
    println!("Options:");
    println!("  -h, --help       Show this help");
    println!("  -V, --version    Show the version");
}

fn run_file(path: &str) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read {path}: {error}");
            std::process::exit(1);
        }
    };
    let mut session = Session::new();
    let report = session.eval(&source);
    for line in &report.lines {
        println!("{line}");
    }
    if !report.ok {
        std::process::exit(1);
    }
}

fn repl() {
    println!("fable {}", env!("CARGO_PKG_VERSION"));
    let mut session = Session::new();
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!(">>> ");
        let _ = std::io::stdout().flush();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("error: {error}");
                break;
            }
        }
        if line.trim().is_empty() {
            continue;
        }
        for out in session.eval(&line).lines {
            println!("{out}");
        }
    }
}
