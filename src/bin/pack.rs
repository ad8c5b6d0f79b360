//! Packer entry point: walk a source directory into a page store.

use std::path::PathBuf;

use clap::Parser;

use pagevault::logger;
use pagevault::pack::pack_tree;
use pagevault::store::PageWriter;

#[derive(Parser)]
#[command(
    name = "pagevault-pack",
    about = "Pack a directory of static files into a page store"
)]
struct Args {
    /// Source directory to pack
    source: PathBuf,

    /// Page store file to create or update
    #[arg(default_value = "pages.db")]
    store: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let root = args.source.canonicalize().map_err(|e| {
        format!(
            "Source directory '{}' is not accessible: {e}",
            args.source.display()
        )
    })?;

    // A store that cannot be opened is fatal; a file that cannot be
    // stored is not.
    let writer = PageWriter::open(&args.store)?;

    logger::log_pack_start(&root, &args.store);
    let summary = pack_tree(&root, &writer);
    logger::log_pack_summary(summary.stored, summary.failed);

    Ok(())
}
