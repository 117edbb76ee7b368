mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use clap::{Parser, Subcommand};
use monkey_core::{
    environment::prelude::Environment,
    eval::eval,
    parser::prelude::parse_module,
    utils::prelude::Error,
};

#[derive(Parser)]
#[command(name = "monkeyc", about = "Interpreter for the Monkey language")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluates a source file and prints the result
    Run {
        /// Path of source file
        path: PathBuf,
        /// Print ast instead of evaluating
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Runs Read Evaluate Print Loop (the default)
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
}

fn main() {
    match Cli::parse().command.unwrap_or(Command::Repl) {
        Command::Run { path, print_ast } => run(path, print_ast),
        Command::Repl => {
            let user = std::env::var("USER").unwrap_or_else(|_| String::from("stranger"));
            println!("Hello there {user:?}! Welcome to 🐵.\nPlease start typing commands.");

            let _ = repl::start();
        }
        Command::Rlpl => {
            let _ = rlpl::start();
        }
        Command::Rppl => {
            let _ = rppl::start();
        }
    }
}

fn run(path: PathBuf, print_ast: bool) {
    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    cli::print_running(&path.to_string_lossy());
    let start = std::time::Instant::now();

    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => {
            Error::StdIo { err: err.kind() }.pretty(&mut buf);
            buf_writer.print(&buf).expect("Writing error to stderr");

            return;
        }
    };

    match parse_module(&src) {
        Ok(program) => {
            if print_ast {
                println!("{program:#?}");
            } else {
                let env = Rc::new(RefCell::new(Environment::new()));

                println!("{}", eval(&program, env));
            }

            cli::print_finished(std::time::Instant::now() - start);
        }
        Err(errors) => {
            Error::Parse { path, src, errors }.pretty(&mut buf);
            buf_writer.print(&buf).expect("Writing error to stderr");
        }
    }
}
