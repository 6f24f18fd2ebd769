//! Print the details of an `<rpc-error>` reply
//!
//! # Usage
//!
//! ```bash
//! cargo run --example rpc_error -- reply.xml
//! ```
//!
//! Without an argument a sample `<load-configuration>` failure is used.

use std::env;
use std::fs;

use jxmlkit::{rpc_error, XmlParser};

const SAMPLE_REPLY: &str = r#"<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <rpc-error>
    <error-severity>error</error-severity>
    <source-daemon>dcd</source-daemon>
    <error-path>[edit interfaces]</error-path>
    <error-info><bad-element>ge-0/0/99</bad-element></error-info>
    <error-message>syntax error</error-message>
  </rpc-error>
</rpc-reply>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let xml = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE_REPLY.to_string(),
    };

    let mut reply = XmlParser::parse(&xml)?;
    let record = rpc_error(&mut reply);

    println!("=== rpc-error ===\n");
    println!("{}\n", record);
    println!("severity:    {}", record.severity.as_deref().unwrap_or("-"));
    println!("daemon:      {}", record.source.as_deref().unwrap_or("-"));
    println!("edit path:   {}", record.edit_path.as_deref().unwrap_or("-"));
    println!("bad element: {}", record.bad_element.as_deref().unwrap_or("-"));
    println!("message:     {}", record.message.as_deref().unwrap_or("-"));

    Ok(())
}
