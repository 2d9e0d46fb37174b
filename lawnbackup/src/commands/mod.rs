mod create;
mod info;
mod list;
mod restore;

pub use create::create;
pub use info::info;
pub use list::list;
pub use restore::restore;

use lawnbackup_format::Contents;

/// Resolve the category selection flags into a content mask, refusing an
/// empty selection.
fn mask(homescreen: bool, settings: bool, all: bool) -> anyhow::Result<Contents> {
    let contents = if all {
        Contents::HOMESCREEN | Contents::SETTINGS
    } else {
        let mut contents = Contents::empty();
        if homescreen {
            contents |= Contents::HOMESCREEN;
        }
        if settings {
            contents |= Contents::SETTINGS;
        }
        contents
    };

    if contents.is_empty() {
        anyhow::bail!("nothing selected; pass --homescreen, --settings or --all");
    }
    Ok(contents)
}
