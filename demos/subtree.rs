//! Cut one stanza out of a configuration reply
//!
//! # Usage
//!
//! ```bash
//! cargo run --example subtree -- config.xml "configuration/interfaces/interface[name='ge-0/0/0']"
//! ```
//!
//! The reply is stripped of namespaces before selection, so paths use plain
//! Junos element names. Set `RUST_LOG=trace` to see how many elements the
//! path matched.

use std::env;
use std::fs;
use std::process;

use jxmlkit::{conf_transform, remove_namespaces, SerializeOptions, XmlParser, XmlSerializer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let (Some(path), Some(xpath)) = (args.next(), args.next()) else {
        eprintln!("Usage: subtree <config.xml> <xpath>");
        process::exit(2);
    };

    let mut doc = XmlParser::parse(&fs::read_to_string(path)?)?;
    remove_namespaces(&mut doc);
    // Drop the reply wrapper so paths start at <configuration>
    if doc.tag == "rpc-reply" {
        if let Some(config) = doc.first_element() {
            doc = config.clone();
        }
    }

    match conf_transform(&doc, &xpath)? {
        Some(stanza) => {
            let xml = XmlSerializer::new(SerializeOptions::pretty()).to_string(&stanza)?;
            println!("{}", xml);
        }
        None => {
            eprintln!("Nothing matched '{}'", xpath);
            process::exit(1);
        }
    }

    Ok(())
}
