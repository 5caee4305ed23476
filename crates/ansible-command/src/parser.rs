//! Best-effort extraction of per-host JSON results from ansible output
//!
//! Understands the legacy human readable format, where each host result
//! starts with a `<host> | FAILED >> {` or `<host> | success >> {` line and
//! the JSON body ends at a line consisting of a single `}`. Anything outside
//! such blocks is ignored.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Outcome reported for a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostStatus {
    /// `FAILED`
    Failed,
    /// `success`
    Success,
}

/// Decoded result block for one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResult {
    /// Host name as printed by ansible
    pub host: String,
    /// Reported status
    pub status: HostStatus,
    /// JSON body of the block
    pub data: serde_json::Value,
}

struct Block {
    host: String,
    status: HostStatus,
    lines: Vec<String>,
}

/// Extract every complete host block from `output`
///
/// A block still open at the end of the output is dropped.
pub fn parse_output(output: &str) -> Result<Vec<HostResult>> {
    let marker = Regex::new(r"^(.*) \| (FAILED|success) >> \{$")?;
    let mut results = Vec::new();
    let mut current: Option<Block> = None;

    for line in output.lines() {
        if let Some(caps) = marker.captures(line) {
            current = Some(Block {
                host: caps[1].to_string(),
                status: if &caps[2] == "FAILED" {
                    HostStatus::Failed
                } else {
                    HostStatus::Success
                },
                lines: vec!["{".to_string()],
            });
        } else if line == "}" {
            if let Some(mut block) = current.take() {
                block.lines.push("}".to_string());
                let data = serde_json::from_str(&block.lines.concat()).map_err(|source| {
                    Error::Parse {
                        host: block.host.clone(),
                        source,
                    }
                })?;
                results.push(HostResult {
                    host: block.host,
                    status: block.status,
                    data,
                });
            }
        } else if let Some(block) = current.as_mut() {
            block.lines.push(line.to_string());
        }
    }

    Ok(results)
}
