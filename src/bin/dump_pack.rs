//! Print the levels stored in `.bin` pack blobs.
//!
//! Usage:
//!   dump_pack [--summary|-s] FILE.bin ...
//!
//! Without `--summary`, every level is followed by its text board.

use anyhow::Context;
use flowpack::decode_pack;
use flowpack::dump::{render_board, summary};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let summary_only = if let Some(pos) = args.iter().position(|a| a == "--summary" || a == "-s") {
        args.remove(pos);
        true
    } else {
        false
    };
    if args.is_empty() {
        anyhow::bail!("usage: dump_pack [--summary|-s] FILE.bin ...");
    }

    for path in &args {
        let path = Path::new(path);
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let levels = decode_pack(&bytes).with_context(|| format!("decode {}", path.display()))?;
        println!("{}: {} level(s)", path.display(), levels.len());
        for (i, level) in levels.iter().enumerate() {
            println!("level {} {}", i, summary(level));
            if !summary_only {
                print!("{}", render_board(level));
            }
        }
    }
    Ok(())
}
