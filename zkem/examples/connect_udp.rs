//! Connect to a terminal and read its clock

use zkem::{Device, DeviceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Change to your device IP
    let ip = std::env::var("DEVICE_IP").unwrap_or_else(|_| "192.168.1.201".to_string());

    println!("Connecting to {} via UDP...", ip);

    let mut device = Device::new(DeviceConfig::new(ip));

    device.connect().await?;
    println!("✓ Connected (session {})", device.session_id());

    let time = device.get_time().await?;
    println!("✓ Device time: {}", time);

    device.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
