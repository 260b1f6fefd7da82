use std::{env, process};

use nexlang::Nex;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut nex = Nex::new();

    let exit_code = match args.len() {
        n if n > 2 => {
            println!("Usage: nex [script]");
            nexlang::EXIT_USAGE
        }
        2 => nex.run_file(&args[1]),
        _ => nex.run_prompt(),
    };

    process::exit(exit_code);
}
