//! Ping every host of an inventory while streaming ansible's output
//!
//! ```text
//! ANSIBLE_INSTALL_PATH=/usr/local/bin cargo run -p ansible-command --example adhoc_ping -- /etc/ansible/hosts
//! ```

use ansible_command::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let inventory = std::env::args().nth(1);
    let settings = Settings::from_env()?;

    smol::block_on(async {
        let mut command = AdHoc::with_settings(&settings).hosts("all").module("ping");
        if let Some(inventory) = inventory {
            command = command.inventory(inventory);
        }

        let events = command.subscribe();
        let printer = smol::spawn(async move {
            while let Ok(event) = events.recv().await {
                match event {
                    CommandEvent::Stdout(chunk) => print!("{}", String::from_utf8_lossy(&chunk)),
                    CommandEvent::Stderr(chunk) => eprint!("{}", String::from_utf8_lossy(&chunk)),
                    CommandEvent::Close(code) => println!("-- closed with {:?}", code),
                }
            }
        });

        let result = command.exec(ExecOptions::default()).await?;
        // Dropping the command closes the channel and ends the printer
        drop(command);
        printer.await;

        for host in result.host_results()? {
            println!("{}: {:?}", host.host, host.status);
        }

        result.into_success()?;
        Ok::<_, anyhow::Error>(())
    })
}
