use std::process::Command;

use anyhow::{Context, Result};

/// Package, `--features` list, and whether default features stay on.
const FEATURE_COMBINATIONS: &[(&str, &[&str], bool)] = &[
    ("beautywiki-common", &[], true),
    ("beautywiki-common", &["platform"], true),
    ("beautywiki-infra", &[], true),
    ("beautywiki-infra", &[], false),
];

/// Check that all required feature combinations compile successfully.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, (package, features, default_features)) in FEATURE_COMBINATIONS.iter().enumerate()
    {
        let mut label =
            if features.is_empty() { "default".to_string() } else { features.join(",") };
        if !*default_features {
            label = format!("{label} (no-default-features)");
        }

        println!(
            "\n[{}/{}] cargo check -p {package}: {label}",
            index + 1,
            FEATURE_COMBINATIONS.len()
        );

        let mut command = Command::new("cargo");
        command.args(["check", "--all-targets", "-p", *package]);
        if !features.is_empty() {
            command.arg("--features").arg(features.join(","));
        }
        if !*default_features {
            command.arg("--no-default-features");
        }

        let status = command
            .status()
            .with_context(|| format!("Failed to run cargo check for {package} '{label}'"))?;

        if !status.success() {
            anyhow::bail!("{package} feature combination '{label}' failed to compile");
        }

        println!("✅ {package} '{label}' compiled successfully");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());

    Ok(())
}
