use std::fs::File;

use anyhow::Context;
use humansize::{file_size_opts as options, FileSize};
use lawnbackup_format::zip::ZipReader;

use crate::cli::ListArgs;

pub fn list(args: ListArgs) -> anyhow::Result<()> {
    let file = File::open(&args.archive)
        .with_context(|| format!("cannot open `{}`", args.archive.display()))?;
    let reader = ZipReader::open(file)
        .with_context(|| format!("`{}` is not a backup archive", args.archive.display()))?;

    println!("Method    Compressed     Length         CRC-32      Name");
    println!("--------  -------------  -------------  ----------  --------");
    for entry in reader.entries() {
        let compressed = entry
            .compressed_size()
            .file_size(options::BINARY)
            .unwrap_or_else(|_| "-".into());
        let length = entry
            .uncompressed_size()
            .file_size(options::BINARY)
            .unwrap_or_else(|_| "-".into());

        println!(
            "{:8}  {:>13}  {:>13}  {:#010x}  {}",
            entry.method_name(),
            compressed,
            length,
            entry.crc32(),
            entry.name(),
        );
    }

    Ok(())
}
