use std::io::Write;

use monkey_core::lexer::prelude::{Lexer, Token};

const PROMPT: &str = "\n🐵> ";

pub fn start() -> std::io::Result<()> {
    let stdin = std::io::stdin();

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

        let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

        loop {
            let (start, token, end) = lexer.next_token();

            println!("[{start}..{end}] {token:?}");

            if token == Token::Eof {
                break;
            }
        }
    }
}
