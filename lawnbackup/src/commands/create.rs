use anyhow::Context;
use lawnbackup_format::{ensure_backup_folder, try_create, EXTENSION};

use crate::cli::CreateArgs;
use crate::host::{MarkerFlag, Profile};

pub fn create(args: CreateArgs) -> anyhow::Result<()> {
    let profile = Profile::new(args.profile);
    let contents = super::mask(args.homescreen, args.settings, args.all)?;

    let output = match args.output {
        Some(path) => path,
        None => {
            let folder = ensure_backup_folder(&profile)
                .context("cannot create the default backup folder")?;
            folder.join(format!("{}.{}", args.name, EXTENSION))
        }
    };

    let flag = MarkerFlag::new(profile.root());
    try_create(&output, &args.name, contents, &profile, &flag).with_context(|| {
        format!(
            "cannot create backup archive `{}`; discard any partial output",
            output.display()
        )
    })?;

    println!("Wrote {}", output.display());
    Ok(())
}
