// SPDX-License-Identifier: Apache-2.0

//! Parse a JSON file and print a short report on the resulting tree.

use std::env;

use treejson::{parse_file, Kind, Value};

fn describe(value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value.kind() {
        Kind::Null => println!("{pad}null"),
        Kind::Int => println!("{pad}int {}", value.as_int().unwrap_or_default()),
        Kind::Bool => println!("{pad}bool {}", value.as_bool().unwrap_or_default()),
        Kind::Float => println!("{pad}float {}", value.as_float().unwrap_or_default()),
        Kind::Str => match value.as_str() {
            Some(text) => println!("{pad}string \"{}\"", text),
            None => println!(
                "{pad}string ({} bytes, not UTF-8)",
                value.as_bytes().map_or(0, <[u8]>::len)
            ),
        },
        Kind::Array => {
            let array = value.as_array().unwrap();
            println!("{pad}array of {}", array.len());
            for item in array {
                describe(item, indent + 1);
            }
        }
        Kind::Map => {
            let map = value.as_map().unwrap();
            println!(
                "{pad}map of {} ({} buckets, {} collisions)",
                map.len(),
                map.bucket_count(),
                map.collisions()
            );
            for (key, item) in map {
                println!("{pad}  key \"{}\":", String::from_utf8_lossy(key));
                describe(item, indent + 2);
            }
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} file.json", args[0]);
        std::process::exit(1);
    }

    match parse_file(&args[1]) {
        Ok(value) => describe(&value, 0),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
