//! Convert level-pack text files into `<packname>.bin` pack blobs.
//!
//! Usage:
//!   convert_levels [OPTIONS] [INPUT ...]
//!
//! Each INPUT is a level-pack file (one level per line) or a directory whose files are
//! all converted. Defaults to the `levels` directory.
//!
//! Options:
//!   --out DIR, -o DIR   Output directory for `.bin` files (default: current directory)
//!   --dump, -d          Print a text board for every encoded level
//!   --strict            Abort on the first malformed level instead of skipping it
//!
//! Log verbosity follows `RUST_LOG` (default `info`; `debug` prints every level).

use anyhow::Context;
use flowpack::dump::{render_board, summary};
use flowpack::pack::{encode_pack, pack_name, PackOptions};
use flowpack::LevelRecord;
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

fn take_flag(args: &mut Vec<String>, long: &str, short: Option<&str>) -> bool {
    if let Some(pos) = args.iter().position(|a| a == long || Some(a.as_str()) == short) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn take_value(args: &mut Vec<String>, long: &str, short: &str) -> anyhow::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == long || a == short) else {
        return Ok(None);
    };
    args.remove(pos);
    if pos >= args.len() {
        anyhow::bail!("{} needs a value", long);
    }
    Ok(Some(args.remove(pos)))
}

/// Expand directories into their (sorted) regular files.
fn collect_inputs(args: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for arg in args {
        let path = PathBuf::from(arg);
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(&path).with_context(|| format!("read {}", path.display()))? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    entries.push(entry.path());
                }
            }
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

struct PackTotals {
    levels: usize,
    skipped: usize,
}

fn convert_file(path: &Path, out_dir: &Path, options: PackOptions, dump: bool) -> anyhow::Result<PackTotals> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = pack_name(&file_name);
    info!("level pack {}", path.display());

    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let report = encode_pack(BufReader::new(file), options)
        .with_context(|| format!("convert {}", path.display()))?;

    if dump {
        for (i, bytes) in report.pack.records().iter().enumerate() {
            let record = LevelRecord::decode(bytes)?;
            println!("{} - {} - {}x{}", name, i, record.width, record.height);
            println!("{}", summary(&record));
            print!("{}", render_board(&record));
        }
    }

    let totals = PackTotals {
        levels: report.pack.len(),
        skipped: report.skipped.len(),
    };
    if report.pack.is_empty() {
        warn!("{}: no levels encoded, nothing written", path.display());
        return Ok(totals);
    }

    let out_path = out_dir.join(format!("{}.bin", name));
    let out = File::create(&out_path).with_context(|| format!("create {}", out_path.display()))?;
    let mut w = BufWriter::new(out);
    let written = report.pack.write_to(&mut w)?;
    w.flush()?;
    info!(
        "{}: {} levels, {} bytes",
        out_path.display(),
        report.pack.len(),
        written
    );
    Ok(totals)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let dump = take_flag(&mut args, "--dump", Some("-d"));
    let strict = take_flag(&mut args, "--strict", None);
    let out_dir = take_value(&mut args, "--out", "-o")?
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if args.is_empty() {
        args.push("levels".to_string());
    }

    std::fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let options = PackOptions { strict };

    let mut total_levels = 0usize;
    let mut total_skipped = 0usize;
    for path in collect_inputs(&args)? {
        let totals = convert_file(&path, &out_dir, options, dump)?;
        total_levels += totals.levels;
        total_skipped += totals.skipped;
    }
    eprintln!(
        "convert: {} level(s) encoded, {} skipped",
        total_levels, total_skipped
    );
    Ok(())
}
