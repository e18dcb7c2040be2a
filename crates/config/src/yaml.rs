// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Read a yaml file and substitute `$VAR` / `${VAR}` references from the environment
pub fn load_yaml_with_env(file_path: &Path) -> Result<String> {
    let content = fs::read_to_string(file_path)?;
    expand_env(&content)
}

pub fn expand_env(content: &str) -> Result<String> {
    let expanded = shellexpand::env(content).context("Unable to expand environment variables")?;
    Ok(expanded.into_owned())
}
