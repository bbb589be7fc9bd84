// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use serde_json::json;

use crate::cli::{OutputFormat, VersionArgs};
use crate::error::BinResult;

fn components() -> [(&'static str, &'static str); 4] {
    [
        ("siig-bin", crate::VERSION),
        ("siig-core", siig_core::VERSION),
        ("siig-api", siig_api::VERSION),
        ("siig-config", siig_config::VERSION),
    ]
}

/// `siig version`
pub fn version(args: VersionArgs) -> BinResult<()> {
    match args.format {
        OutputFormat::Text => {
            for (name, version) in components() {
                println!("{:<12} {}", name, version);
            }
            println!(
                "{:<12} {}-{}",
                "target",
                std::env::consts::ARCH,
                std::env::consts::OS
            );
        }
        OutputFormat::Json => {
            let versions: serde_json::Map<_, _> = components()
                .into_iter()
                .map(|(name, version)| (name.to_string(), json!(version)))
                .collect();
            let output = json!({
                "versions": versions,
                "arch": std::env::consts::ARCH,
                "os": std::env::consts::OS,
            });
            println!("{}", output);
        }
    }
    Ok(())
}
