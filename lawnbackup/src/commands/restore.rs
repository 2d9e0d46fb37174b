use anyhow::Context;
use lawnbackup_format::{Backup, OperationGuard};

use crate::cli::RestoreArgs;
use crate::host::{MarkerFlag, Profile};

pub fn restore(args: RestoreArgs) -> anyhow::Result<()> {
    let profile = Profile::new(args.profile);
    let contents = super::mask(args.homescreen, args.settings, args.all)?;

    let backup = Backup::new(args.archive);
    if let Some(meta) = backup.meta() {
        println!("Restoring \"{}\" ({})", meta.name(), meta.timestamp());
    }

    let flag = MarkerFlag::new(profile.root());
    let _guard = OperationGuard::raise(&flag);

    backup.try_restore(&profile, contents).context(
        "restore failed; application state may be partially overwritten and inconsistent",
    )?;

    println!("Restore complete");
    Ok(())
}
