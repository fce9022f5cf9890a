//! # Platen CLI
//!
//! Usage:
//!   platen input.json -o output.prn
//!   echo '{ ... }' | platen -o output.prn
//!   platen input.json --layout          (print the layout tree as JSON)
//!   platen input.json --strict -o output.prn
//!   platen --example > receipt.json
//!
//! Set `RUST_LOG=warn` (or `debug`) to see diagnostics.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use platen::model::Document;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_receipt_json());
        return;
    }

    // Read input
    let input = match read_input(&args) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("✗ Failed to read input: {}", e);
            process::exit(1);
        }
    };

    let mut document: Document = match serde_json::from_str(&input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("✗ {}", platen::error::PlatenError::from(e));
            process::exit(1);
        }
    };
    if args.iter().any(|a| a == "--strict") {
        document.options.strict_mode = true;
    }

    if args.iter().any(|a| a == "--layout") {
        let result = platen::layout_document(&document);
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("✗ Failed to serialize layout: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "output.prn".to_string());

    // Render
    match platen::render(&document) {
        Ok(output) => {
            if let Err(e) = fs::write(&output_path, &output.commands) {
                eprintln!("✗ Failed to write {}: {}", output_path, e);
                process::exit(1);
            }
            eprintln!(
                "✓ Written {} bytes to {}",
                output.commands.len(),
                output_path
            );
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn read_input(args: &[String]) -> io::Result<String> {
    match args.get(1) {
        Some(path) if !path.starts_with('-') => fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn example_receipt_json() -> &'static str {
    r##"{
  "page": {
    "size": "Fanfold",
    "margin": { "top": 120, "right": 180, "bottom": 120, "left": 180 }
  },
  "options": {
    "charTable": "Pc437",
    "initialStyle": { "printQuality": "Lq" }
  },
  "data": {
    "customer": { "name": "Widget Industries", "member": true }
  },
  "root": {
    "kind": { "type": "Stack", "direction": "Column" },
    "style": { "width": "Fill" },
    "children": [
      {
        "kind": { "type": "Text", "content": "ACME HARDWARE", "align": "Center" },
        "style": { "bold": true, "doubleWidth": true }
      },
      {
        "kind": { "type": "Text", "content": "123 Main Street, Springfield", "align": "Center" }
      },
      { "kind": { "type": "Spacer" } },
      {
        "kind": { "type": "Flex" },
        "style": { "width": "Fill" },
        "children": [
          { "kind": { "type": "Text", "content": "Invoice: INV-1042" } },
          { "kind": { "type": "Spacer", "flex": true } },
          { "kind": { "type": "Text", "content": "Date: 2026-03-14" } }
        ]
      },
      { "kind": { "type": "Line", "fillChar": "═" } },
      {
        "kind": {
          "type": "Grid",
          "columns": ["Fill", { "Dots": 360 }, { "Dots": 540 }],
          "columnGap": 36
        },
        "style": { "width": "Fill" },
        "children": [
          { "kind": { "type": "Text", "content": "Item" }, "style": { "bold": true } },
          { "kind": { "type": "Text", "content": "Qty", "align": "Right" }, "style": { "bold": true } },
          { "kind": { "type": "Text", "content": "Amount", "align": "Right" }, "style": { "bold": true } },

          { "kind": { "type": "Text", "content": "Hex bolts M8 x 40, zinc plated, box of 100", "overflow": "Ellipsis" } },
          { "kind": { "type": "Text", "content": "2", "align": "Right" } },
          { "kind": { "type": "Text", "content": "$ 37.90", "align": "Right" } },

          { "kind": { "type": "Text", "content": "Wood glue 500ml" } },
          { "kind": { "type": "Text", "content": "1", "align": "Right" } },
          { "kind": { "type": "Text", "content": "$ 8.50", "align": "Right" } },

          { "kind": { "type": "Text", "content": "Sandpaper assortment" } },
          { "kind": { "type": "Text", "content": "4", "align": "Right" } },
          { "kind": { "type": "Text", "content": "$ 50.00", "align": "Right" } }
        ]
      },
      { "kind": { "type": "Line" } },
      {
        "kind": { "type": "Flex" },
        "style": { "width": "Fill", "bold": true },
        "children": [
          { "kind": { "type": "Text", "content": "TOTAL" } },
          { "kind": { "type": "Spacer", "flex": true } },
          { "kind": { "type": "Text", "content": "$ 96.40" } }
        ]
      },
      { "kind": { "type": "Spacer" } },
      {
        "kind": { "type": "Text", "content": "Thank you, valued member!", "align": "Center" },
        "style": { "italic": true },
        "visibility": {
          "when": { "op": "Truthy", "path": "customer.member" },
          "fallback": {
            "kind": { "type": "Text", "content": "Thank you for your business.", "align": "Center" }
          }
        }
      },
      {
        "kind": { "type": "Text", "content": "PAID" },
        "style": {
          "position": { "Absolute": { "posX": 2160, "posY": 360 } },
          "doubleWidth": true,
          "doubleHeight": true,
          "bold": true
        }
      }
    ]
  }
}
"##
}
