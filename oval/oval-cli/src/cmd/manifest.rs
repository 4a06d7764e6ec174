use crate::cmd::RegistryArguments;
use feed_common::cli::{CommandDefaults, client::ClientArguments};
use oval_walker::manifest::Registry;

/// Fetch and show the manifest of each feed.
#[derive(clap::Args, Debug)]
pub struct Manifest {
    #[command(flatten)]
    client: ClientArguments,

    #[command(flatten)]
    registry: RegistryArguments,
}

impl CommandDefaults for Manifest {
    fn progress(&self) -> bool {
        false
    }
}

impl Manifest {
    pub async fn run(self) -> anyhow::Result<()> {
        let registry: Registry = self.registry.try_into()?;
        let fetcher = self.client.new_fetcher().await?;

        for entry in &registry {
            let url = entry.manifest_url();

            match fetcher.fetch::<Option<String>>(&url).await {
                Ok(Some(manifest)) => {
                    println!("{url}:");
                    println!("{}", manifest.trim_end());
                    println!();
                }
                Ok(None) => {
                    println!("{url}: <<none>>");
                    println!();
                }
                Err(err) => {
                    println!("{url} (Err): {err}");
                    println!();
                }
            }
        }

        Ok(())
    }
}
