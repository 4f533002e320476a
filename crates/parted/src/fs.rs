// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Filesystem name vocabulary and type-code classification
//!
//! parted omits the file system column outright when a partition carries no
//! filesystem, so rows can only be disambiguated by testing tokens against a
//! closed vocabulary of names the tool is known to print.

use phf::phf_set;

/// Filesystem names parted prints in its file system column
static FILESYSTEM_NAMES: phf::Set<&'static str> = phf_set! {
    "ext2", "ext3", "ext4", "xfs",
    "fat16", "fat32",
    "hfs", "hfs+", "hfsx",
    "linux-swap", "linux-swap(v1)",
    "ntfs", "reiserfs", "ufs", "btrfs",
};

/// Whether `token` is a filesystem name parted is known to print.
///
/// Matching is case-insensitive and exact; a prefix such as `ext` never
/// matches a longer name.
pub fn is_filesystem_name(token: &str) -> bool {
    FILESYSTEM_NAMES.contains(token.to_lowercase().as_str())
}

/// Map a requested filesystem format to the partition type tag passed to the
/// tool when creating the partition.
///
/// The whole ext family and xfs intentionally collapse to the generic `ext2`
/// type tag: the partition type only marks the family, the actual filesystem
/// is established later by mkfs. `None` means the caller has no type
/// preference to express.
pub fn format_to_partition_type(format: &str) -> Option<&'static str> {
    if format == "swap" {
        Some("linux-swap")
    } else if format.starts_with("ext") || format == "xfs" {
        Some("ext2")
    } else if format.starts_with("fat") {
        Some("fat32")
    } else if format == "ntfs" {
        Some("ntfs")
    } else {
        None
    }
}
