//! Sends one example record to a running prediction service.

use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "predict-client", about = "POST an example record to /predict")]
struct Cli {
    #[arg(long, default_value = "http://localhost:5000/predict")]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let payload = json!({
        "UDI": 90,
        "Product ID": "M14949",
        "Type": "M",
        "Air temperature [K]": 298.9,
        "Process temperature [K]": 308.9,
        "Rotational speed [rpm]": 1487,
        "Torque [Nm]": 39.5,
        "Tool wear [min]": 30,
        "Machine failure": 0,
        "TWF": 0,
        "HDF": 0,
        "PWF": 0,
        "OSF": 0,
        "RNF": 0
    });

    let response = reqwest::Client::new()
        .post(&cli.url)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?;
    let body: Value = response.json().await?;

    println!("The prediction for the provided data is: {}", body["prediction"]);
    Ok(())
}
