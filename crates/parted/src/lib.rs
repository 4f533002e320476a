// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Parsing of captured `parted` partition reports
//!
//! This crate turns the line-oriented output of a `parted -s <dev> -- unit s print`
//! style invocation into structured partition records. The tool is never invoked
//! here and no disk is touched; callers capture the report themselves and hand
//! over the lines.

use std::{fmt, path::PathBuf, str::FromStr};

use thiserror::Error;

pub mod fs;
mod report;

pub use report::parse;

/// Errors that can occur in strict conversions
#[derive(Debug, Error)]
pub enum Error {
    /// The partition table label is not a recognized variant
    #[error("unknown partition table label")]
    UnknownLabel,
}

/// The partition table format named in the report's `Partition Table:` header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableLabel {
    /// GUID Partition Table
    Gpt,

    /// Master Boot Record
    Msdos,

    /// No header seen, or the header carried an unrecognized token
    #[default]
    Unknown,
}

impl fmt::Display for TableLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpt => f.write_str("gpt"),
            Self::Msdos => f.write_str("msdos"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl FromStr for TableLabel {
    type Err = Error;

    /// Attempt to convert a header token to a table label
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gpt" => Ok(Self::Gpt),
            "msdos" => Ok(Self::Msdos),
            _ => Err(Error::UnknownLabel),
        }
    }
}

/// One row of the parsed partition table
/// - Offsets in sectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Partition number on the disk
    pub number: u32,
    /// Whether the row's flags field carries the boot flag
    pub bootable: bool,
    /// Starting sector of the partition
    pub start: u64,
    /// Ending sector of the partition
    pub end: u64,
    /// Size of partition in sectors
    pub size: u64,
    /// Partition type code (an MBR id or a GPT type name), if reported
    pub disk_type: Option<String>,
    /// Recognized filesystem name, if the row carries one
    pub filesystem: Option<String>,
    /// Path to the partition device in /dev
    pub device: PathBuf,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{device} {size:.2} GiB",
            device = self.device.display(),
            size = self.size as f64 * 512.0 / (1024.0 * 1024.0 * 1024.0)
        )
    }
}
