use lawnbackup_format::{Backup, META_VERSION};

use crate::cli::InfoArgs;

pub fn info(args: InfoArgs) -> anyhow::Result<()> {
    let backup = Backup::new(args.archive);

    match backup.meta() {
        Some(meta) => {
            println!("Name:      {}", meta.name());
            println!("Created:   {}", meta.timestamp());
            println!("Contents:  {}", meta.contents());
            println!("Format:    v{}", META_VERSION);
        }
        None => {
            println!(
                "No readable metadata; `{}` may be foreign or corrupted",
                backup.source().display()
            );
        }
    }
    Ok(())
}
