//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_toon::{to_string, to_value, value, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with the value! macro
    let config = value!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Config as TOON:\n{}\n", to_string(&config)?);

    // Access values dynamically
    if let Value::Obj(obj) = &config {
        if let Some(Value::Str(host)) = obj.get("host") {
            println!("Accessing field 'host': {}", host);
        }

        if let Some(port) = obj.get("port").and_then(Value::as_i64) {
            println!("Accessing field 'port': {}", port);
        }

        if let Some(Value::List(features)) = obj.get("features") {
            println!("Accessing field 'features': {} items\n", features.len());
        }
    }

    // Convert existing struct to Value
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!("User as Value:\n{}\n", to_string(&user_value)?);

    // Runtime type checking
    println!("Type checks:");
    println!("  is_obj:  {}", user_value.is_obj());
    println!("  is_list: {}", user_value.is_list());
    println!("  is_str:  {}", user_value.is_str());

    Ok(())
}
