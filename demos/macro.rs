//! Using the value! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use serde_toon::{to_string, value, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let null_val = value!(null);
    let bool_val = value!(true);
    let number = value!(42);
    let text = value!("Hello, TOON!");

    println!("Primitives:");
    println!("  null:   {}", to_string(&null_val)?);
    println!("  bool:   {}", to_string(&bool_val)?);
    println!("  number: {}", to_string(&number)?);
    println!("  text:   {}\n", to_string(&text)?);

    let numbers = value!([1, 2, 3, 4, 5]);
    let mixed = value!([1, "two", true, null]);

    println!("Arrays:");
    println!("  Numbers: {}", to_string(&numbers)?);
    println!("  Mixed:   {}\n", to_string(&mixed)?);

    let user = value!({
        "id": 123,
        "name": "Alice",
        "email": "alice@example.com",
        "active": true
    });

    println!("Objects:");
    println!("{}\n", to_string(&user)?);

    let config = value!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "name": "mydb"
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}\n", to_string(&config)?);

    let items = vec![
        value!({"id": 1, "status": "active"}),
        value!({"id": 2, "status": "pending"}),
        value!({"id": 3, "status": "completed"}),
    ];

    let summary = value!({
        "total": 3,
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}\n", to_string(&summary)?);

    if let Value::Obj(obj) = &config {
        if let Some(app) = obj.get("app").and_then(Value::as_obj) {
            if let Some(name) = app.get("name").and_then(Value::as_str) {
                println!("Accessing values:");
                println!("  App name: {}", name);
            }
        }

        if let Some(features) = obj.get("features").and_then(Value::as_list) {
            println!("  Features: {}", features.len());
        }
    }

    Ok(())
}
