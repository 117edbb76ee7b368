use std::{cell::RefCell, io::Write, rc::Rc};

use monkey_core::{
    environment::prelude::Environment,
    eval::eval,
    lexer::prelude::Lexer,
    parser::prelude::Parser,
};

const PROMPT: &str = "\n🐵> ";

pub fn start() -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let env = Rc::new(RefCell::new(Environment::new()));

    loop {
        let mut input = String::from("");

        print!("{}", PROMPT);
        std::io::stdout().flush()?;
        if stdin.read_line(&mut input)? == 0 {
            return Ok(());
        }

        if let Some('\n') = input.chars().next_back() {
            input.pop();
        }
        if let Some('\r') = input.chars().next_back() {
            input.pop();
        }

        if input == ".exit" {
            return Ok(());
        }

        let mut parser = Parser::new(Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c))));
        let program = parser.parse();

        if !parser.errors.is_empty() {
            println!("Found {} error(s):", parser.errors.len());
            for error in &parser.errors {
                println!("- {}", error.message());
            }
        } else {
            // bindings accumulate, the environment lives across lines
            println!("{}", eval(&program, env.clone()));
        }
    }
}
