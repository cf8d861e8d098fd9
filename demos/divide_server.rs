//! Divide server demo.
//!
//! Exposes a single "divide" procedure and serves it on the given address:
//!
//! ```text
//! cargo run --example divide_server -- 127.0.0.1 8000
//! ```

use wirecall::{Args, ParamSpec, Schema, Server, Value, WireType, WirecallError};

fn divide_schema() -> Schema {
    Schema::new(vec![
        ParamSpec::required(1, "num1", WireType::I32),
        ParamSpec::optional(2, "num2", Value::I32(1)),
    ])
}

async fn divide(args: Args) -> wirecall::Result<f32> {
    let num1 = args.i32("num1")?;
    let num2 = args.i32_or("num2", 1);
    if num2 == 0 {
        return Err(WirecallError::invalid_operation());
    }
    Ok(num1 as f32 / num2 as f32)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut argv = std::env::args().skip(1);
    let host = argv.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = argv.next().unwrap_or_else(|| "8000".to_string());

    let server = Server::builder()
        .procedure("divide", divide_schema(), divide)
        .bind(format!("{host}:{port}").parse()?)
        .await?;

    println!("serving divide on {}", server.local_addr()?);
    server.serve().await?;
    Ok(())
}
