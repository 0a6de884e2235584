// SPDX-License-Identifier: Apache-2.0

//! Print the token stream of a JSON file, or of stdin when no file is
//! given. Scan errors are reported inline with their location.

use std::env;
use std::fs::File;
use std::io::{self, BufReader};

use treejson::{dump_tokens, IoSource, Tokenizer};

fn main() {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [file.json]", args[0]);
        std::process::exit(1);
    }

    let mut stdout = io::stdout();
    let result = match args.get(1) {
        Some(path) => {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("Error: Unable to open file '{}': {}", path, e);
                    std::process::exit(1);
                }
            };
            let mut tokenizer = Tokenizer::new(IoSource::new(BufReader::new(file)));
            dump_tokens(&mut tokenizer, &mut stdout)
        }
        None => {
            let mut tokenizer = Tokenizer::new(IoSource::new(io::stdin().lock()));
            dump_tokens(&mut tokenizer, &mut stdout)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: Unable to write output: {}", e);
        std::process::exit(1);
    }
}
