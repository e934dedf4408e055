//! Download users and the attendance log
//!
//! Set `CLEAR_LOG=1` to erase the log on the device after a successful
//! download.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use zkem::{Device, DeviceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ip = std::env::var("DEVICE_IP").unwrap_or_else(|_| "192.168.1.201".to_string());
    let clear = std::env::var("CLEAR_LOG").is_ok_and(|v| v == "1");

    let config = DeviceConfig::new(ip).with_timeout(Duration::from_secs(10));
    let mut device = Device::new(config);

    device.connect().await.context("connect")?;

    // Lock the keypad while reading
    device.disable().await?;

    let result = download(&mut device, clear).await;

    device.enable().await?;
    device.disconnect().await?;

    result
}

async fn download(device: &mut Device, clear: bool) -> anyhow::Result<()> {
    device.get_user_data().await.context("user data")?;
    let users = device.unpack_user_data();
    println!("{} users", users.len());
    for user in &users {
        println!("  {}", user);
    }

    device.get_attendance_log().await.context("attendance log")?;
    let log = device.unpack_attendance_log();
    println!("{} punches", log.len());
    for record in &log {
        println!("  {}", record);
    }

    if clear {
        device.clear_attendance_log().await?;
        println!("Attendance log cleared");
    }

    Ok(())
}
