//! Divide client demo.
//!
//! Calls the divide server started by the `divide_server` example:
//!
//! ```text
//! cargo run --example divide_client -- 127.0.0.1 8000
//! ```

use wirecall::{Args, Channel, ClientStub, ParamSpec, Schema, Value, WireType, WirecallError};

fn divide_schema() -> Schema {
    Schema::new(vec![
        ParamSpec::required(1, "num1", WireType::I32),
        ParamSpec::optional(2, "num2", Value::I32(1)),
    ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut argv = std::env::args().skip(1);
    let host = argv.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = argv.next().unwrap_or_else(|| "8000".to_string()).parse()?;

    let mut stub = ClientStub::builder()
        .schema("divide", divide_schema())
        .connect(&Channel::new(host, port))
        .await?;

    let value = stub
        .invoke(
            "divide",
            &Args::new().with_i32("num1", 200).with_i32("num2", 100),
        )
        .await?;
    println!("divide(200, 100) = {value}");

    match stub
        .invoke(
            "divide",
            &Args::new().with_i32("num1", 200).with_i32("num2", 0),
        )
        .await
    {
        Ok(value) => println!("divide(200, 0) = {value}"),
        Err(WirecallError::Application(message)) => println!("divide(200, 0) failed: {message}"),
        Err(e) => return Err(e.into()),
    }

    let value = stub
        .invoke("divide", &Args::new().with_i32("num1", 100))
        .await?;
    println!("divide(100) = {value}");

    Ok(())
}
