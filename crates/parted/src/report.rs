// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Best-effort scanning of the report text
//!
//! The report format drifts across tool versions and carries arbitrary banner
//! text, so parsing is deliberately lenient: lines that do not look like a
//! partition row are skipped, numeric fields that fail to parse become zero,
//! and nothing in here ever fails.

use std::path::PathBuf;

use log::debug;
use regex::Regex;

use crate::{fs, Partition, TableLabel};

/// Parse the captured output of a `parted -s <dev> -- unit s print` invocation.
///
/// `device` is the base device node the report was captured from, used to
/// synthesize per-partition device paths. Partitions are returned in the order
/// the rows appear in the report. When no `Partition Table:` header is present
/// the label is [`TableLabel::Unknown`] and rows keep only their sector
/// geometry.
///
/// # Examples
///
/// ```
/// let lines = ["Partition Table: msdos", " 1  2048s  206847s  204800s  primary  ext4  boot"];
/// let (partitions, label) = parted::parse("/dev/sda", &lines);
/// assert_eq!(label, parted::TableLabel::Msdos);
/// assert_eq!(partitions[0].filesystem.as_deref(), Some("ext4"));
/// ```
pub fn parse<S>(device: &str, lines: &[S]) -> (Vec<Partition>, TableLabel)
where
    S: AsRef<str>,
{
    let header = Regex::new(r"Partition Table:\s+(\w+)").unwrap();
    let row = Regex::new(r"(\d+)\s+(\d+)s\s+(\d+)s\s+(\d+)s").unwrap();

    let mut partitions = Vec::new();
    // None until the first header line; latched for the rest of the call.
    let mut label: Option<TableLabel> = None;

    for line in lines {
        let line = line.as_ref();
        if label.is_none() {
            if let Some(m) = header.captures(line) {
                let l = m[1].parse().unwrap_or(TableLabel::Unknown);
                debug!("partition table label: {l}");
                label = Some(l);
            }
        }

        let Some(m) = row.captures(line) else {
            continue;
        };
        let number = m[1].parse().unwrap_or(0);
        let start = m[2].parse().unwrap_or(0);
        let end = m[3].parse().unwrap_or(0);
        let size = m[4].parse().unwrap_or(0);

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (disk_type, filesystem, flags) = trailing_columns(label.unwrap_or_default(), &tokens);
        let bootable = flags.is_some_and(|f| f.contains("boot"));

        let partition = Partition {
            number,
            bootable,
            start,
            end,
            size,
            disk_type: disk_type.map(str::to_owned),
            filesystem: filesystem.map(str::to_owned),
            device: partition_device(device, number),
        };
        debug!("parsed row: {partition:?}");
        partitions.push(partition);
    }

    (partitions, label.unwrap_or_default())
}

/// Interpret the tokens after the four sector fields as (type, filesystem, flags).
///
/// Column order differs per table format, and the filesystem column is omitted
/// outright when a partition has none, so the filesystem slot is resolved by
/// vocabulary membership rather than position.
fn trailing_columns<'a>(
    label: TableLabel,
    tokens: &[&'a str],
) -> (Option<&'a str>, Option<&'a str>, Option<&'a str>) {
    match label {
        TableLabel::Msdos => {
            let disk_type = tokens.get(4).copied();
            let filesystem = tokens.get(5).copied().filter(|t| fs::is_filesystem_name(t));
            let flags = if filesystem.is_some() {
                tokens.get(6)
            } else {
                tokens.get(5)
            };
            (disk_type, filesystem, flags.copied())
        }
        TableLabel::Gpt => {
            let filesystem = tokens.get(4).copied().filter(|t| fs::is_filesystem_name(t));
            let type_at = if filesystem.is_some() { 5 } else { 4 };
            (
                tokens.get(type_at).copied(),
                filesystem,
                tokens.get(type_at + 1).copied(),
            )
        }
        TableLabel::Unknown => (None, None, None),
    }
}

/// Synthesize the partition device path for the given base device and number.
///
/// A disk whose node already ends in a digit (e.g. nvme0n1) needs a `p`
/// separator before the partition number.
fn partition_device(device: &str, number: u32) -> PathBuf {
    if device.ends_with(|c: char| c.is_ascii_digit()) {
        PathBuf::from(format!("{device}p{number}"))
    } else {
        PathBuf::from(format!("{device}{number}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MSDOS_REPORT: &str = "\
Model: ATA QEMU HARDDISK (scsi)
Disk /dev/sda: 41943040s
Sector size (logical/physical): 512B/512B
Partition Table: msdos
Disk Flags:

Number  Start    End        Size       Type     File system  Flags
 1      2048s    206847s    204800s    83       ext4         boot
 2      206848s  4401151s   4194304s   primary  linux-swap
 3      4401152s 41943039s  37541888s  primary               lvm
";

    const GPT_REPORT: &str = "\
Model: Virtio Block Device (virtblk)
Disk /dev/vda: 41943040s
Sector size (logical/physical): 512B/512B
Partition Table: gpt
Disk Flags:

Number  Start     End        Size       File system  Name       Flags
 1      2048s     4095s      2048s                   bios_grub
 2      4096s     1052671s   1048576s   fat32        EFI        boot, esp
 3      1052672s  41940991s  40888320s  ext4         root
";

    fn report_lines(report: &str) -> Vec<&str> {
        report.lines().collect()
    }

    #[test_log::test]
    fn test_msdos_report() {
        let (partitions, label) = parse("/dev/sda", &report_lines(MSDOS_REPORT));
        assert_eq!(label, TableLabel::Msdos);
        assert_eq!(partitions.len(), 3);

        let first = &partitions[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.start, 2048);
        assert_eq!(first.end, 206847);
        assert_eq!(first.size, 204800);
        assert_eq!(first.disk_type.as_deref(), Some("83"));
        assert_eq!(first.filesystem.as_deref(), Some("ext4"));
        assert!(first.bootable);
        assert_eq!(first.device, PathBuf::from("/dev/sda1"));

        let swap = &partitions[1];
        assert_eq!(swap.filesystem.as_deref(), Some("linux-swap"));
        assert!(!swap.bootable);
    }

    #[test_log::test]
    fn test_msdos_missing_filesystem_does_not_shift_columns() {
        let (partitions, _) = parse("/dev/sda", &report_lines(MSDOS_REPORT));
        // Row 3 has no filesystem column; the lvm flag must not be taken for one
        let third = &partitions[2];
        assert_eq!(third.disk_type.as_deref(), Some("primary"));
        assert_eq!(third.filesystem, None);
        assert!(!third.bootable);
    }

    #[test_log::test]
    fn test_gpt_filesystem_and_type_never_swap() {
        let (partitions, label) = parse("/dev/vda", &report_lines(GPT_REPORT));
        assert_eq!(label, TableLabel::Gpt);
        assert_eq!(partitions.len(), 3);

        // No filesystem column: the name token lands in disk_type
        assert_eq!(partitions[0].filesystem, None);
        assert_eq!(partitions[0].disk_type.as_deref(), Some("bios_grub"));
        assert!(!partitions[0].bootable);

        // Filesystem present and consumed before the name column
        assert_eq!(partitions[1].filesystem.as_deref(), Some("fat32"));
        assert_eq!(partitions[1].disk_type.as_deref(), Some("EFI"));
        assert!(partitions[1].bootable);

        assert_eq!(partitions[2].filesystem.as_deref(), Some("ext4"));
        assert_eq!(partitions[2].disk_type.as_deref(), Some("root"));
        assert!(!partitions[2].bootable);
    }

    #[test_log::test]
    fn test_device_name_synthesis() {
        let (partitions, _) = parse("/dev/nvme0n1", &report_lines(MSDOS_REPORT));
        assert_eq!(partitions[0].device, PathBuf::from("/dev/nvme0n1p1"));
        assert_eq!(partitions[1].device, PathBuf::from("/dev/nvme0n1p2"));

        let (partitions, _) = parse("/dev/sda", &report_lines(MSDOS_REPORT));
        assert_eq!(partitions[0].device, PathBuf::from("/dev/sda1"));
    }

    #[test_log::test]
    fn test_label_latches_on_first_header() {
        // An unrecognized label freezes detection; a later gpt header must not win
        let lines = [
            "Partition Table: loop",
            "Partition Table: gpt",
            " 1      2048s    4095s    2048s    ext4",
        ];
        let (partitions, label) = parse("/dev/sda", &lines);
        assert_eq!(label, TableLabel::Unknown);
        assert_eq!(partitions.len(), 1);
        // Geometry survives, trailing columns are not interpreted
        assert_eq!(partitions[0].start, 2048);
        assert_eq!(partitions[0].disk_type, None);
        assert_eq!(partitions[0].filesystem, None);
    }

    #[test_log::test]
    fn test_empty_and_garbage_input() {
        let (partitions, label) = parse("/dev/sda", &Vec::<String>::new());
        assert!(partitions.is_empty());
        assert_eq!(label, TableLabel::Unknown);

        let lines = ["Error: /dev/sda: unrecognised disk label", "", "   "];
        let (partitions, label) = parse("/dev/sda", &lines);
        assert!(partitions.is_empty());
        assert_eq!(label, TableLabel::Unknown);
    }

    #[test_log::test]
    fn test_reparse_is_identical() {
        let lines = report_lines(GPT_REPORT);
        let first = parse("/dev/vda", &lines);
        let second = parse("/dev/vda", &lines);
        assert_eq!(first, second);
    }
}
