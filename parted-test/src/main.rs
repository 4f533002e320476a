// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{env, fs, process};

use log::info;
use parted::fs::format_to_partition_type;

/// Demonstrates the report parsing APIs on a captured parted report:
/// - Table label detection
/// - Partition record extraction
/// - Filesystem format to partition type mapping
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut args = env::args().skip(1);
    let (Some(device), Some(report)) = (args.next(), args.next()) else {
        eprintln!("usage: parted-test <device> <captured-report-file>");
        process::exit(1);
    };

    let text = fs::read_to_string(&report)?;
    let lines = text.lines().collect::<Vec<_>>();
    let (partitions, label) = parted::parse(&device, &lines);

    info!("{device}: partition table {label}, {} partitions", partitions.len());
    for partition in &partitions {
        info!("  ├─{partition}");
        if let Some(filesystem) = &partition.filesystem {
            let type_tag = format_to_partition_type(filesystem).unwrap_or("-");
            info!("  │   filesystem {filesystem}, creation type tag {type_tag}");
        }
    }

    Ok(())
}
