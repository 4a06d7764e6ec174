use crate::cmd::RegistryArguments;
use feed_common::cli::CommandDefaults;
use oval_walker::{manifest::Registry, provider::provenance};

/// List the URLs of all feeds of a registry, without contacting them.
#[derive(clap::Args, Debug)]
pub struct Urls {
    #[command(flatten)]
    registry: RegistryArguments,
}

impl CommandDefaults for Urls {
    fn progress(&self) -> bool {
        false
    }
}

impl Urls {
    pub fn run(self) -> anyhow::Result<()> {
        let registry: Registry = self.registry.try_into()?;

        for url in provenance(&registry) {
            println!("{url}");
        }

        Ok(())
    }
}
