use anyhow::Result;
use colored::Colorize;
use launchpad_core::ports;
use std::time::Duration;

pub fn run(port: u16) -> Result<()> {
    if ports::is_port_free(port) {
        println!("{}", format!("Port {} is already free.", port).green());
        return Ok(());
    }

    let inspector = ports::system_inspector();
    ports::reclaim(inspector.as_ref(), port, Duration::from_secs(5))?;
    if !ports::is_port_free(port) {
        anyhow::bail!("port {} is in use but its owner could not be identified", port);
    }
    println!("{}", format!("Port {} freed.", port).green());
    Ok(())
}
