// Apply a mapping document to a JSON file
// Usage: cargo run --example apply_document <mapping.json> [input.json]
// Reads the input from stdin when no input file is given.

use jsonmap_core::MappingDocument;
use serde_json::Value;
use std::env;
use std::io::Read;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let Some(mapping_path) = args.get(1) else {
        eprintln!("usage: apply_document <mapping.json> [input.json]");
        std::process::exit(2);
    };

    let mapping = MappingDocument::from_path(mapping_path)?.build()?;

    let input = match args.get(2) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let source: Value = serde_json::from_str(&input)?;

    let result = mapping.apply(source)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
