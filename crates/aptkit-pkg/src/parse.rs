//! Parsers for `dpkg-query` and `apt list --upgradable` output

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{Package, PackageStatus};

/// `dpkg-query -f` format producing the tab-separated records read by
/// [`parse_dpkg_query_output`]
pub const DPKG_QUERY_FORMAT: &str = "${Package}\t${Architecture}\t${db:Status-Status}\t${Version}\t${Installed-Size}\t${Binary:summary}\n";

/// Diagnostic printed by dpkg-query when a pattern matches nothing
pub const NO_PACKAGES_FOUND: &str = "no packages found matching";

// name[/origin] version arch [upgradable from: old]
static UPGRADABLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^ ]+) ([^ ]+) ([^ ]+)(?: \[upgradable from: [^\[\]]*\])?")
        .expect("upgradable line regex is valid")
});

/// Parse tab-separated `dpkg-query` records, one package per line
///
/// Fields are name, architecture, status, version and optionally
/// installed size and summary. The summary keeps any further tabs. Lines
/// with fewer than four fields are skipped and an unparseable size
/// becomes 0.
#[must_use]
pub fn parse_dpkg_query_output(output: &str) -> Vec<Package> {
    let mut packages = Vec::new();

    for line in output.lines() {
        let fields: Vec<&str> = line.splitn(6, '\t').collect();
        if fields.len() < 4 {
            if !line.trim().is_empty() {
                debug!(line, "skipping short dpkg-query record");
            }
            continue;
        }

        let installed_size_kb = fields
            .get(4)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let short_description = fields
            .get(5)
            .filter(|s| !s.is_empty())
            .map(|s| (*s).to_string());

        packages.push(Package {
            name: fields[0].to_string(),
            architecture: fields[1].to_string(),
            status: PackageStatus::from(fields[2]),
            version: fields[3].to_string(),
            installed_size_kb,
            short_description,
        });
    }

    packages
}

/// Parse `apt list --upgradable` output
///
/// The repository origin after `/` is stripped from the name and the
/// `[upgradable from: ...]` annotation is ignored. Lines not matching the
/// grammar are skipped.
#[must_use]
pub fn parse_list_upgradable_output(output: &str) -> Vec<Package> {
    let mut packages = Vec::new();

    for line in output.lines() {
        // Header and CLI stability warning
        if line.starts_with("Listing...") || line.starts_with("WARNING:") {
            continue;
        }

        let Some(caps) = UPGRADABLE_LINE.captures(line) else {
            continue;
        };

        // "libgweather-common/zesty-updates,zesty-updates" -> "libgweather-common"
        let name = caps[1].split('/').next().unwrap_or_default();

        packages.push(Package::new(
            name,
            PackageStatus::Upgradable,
            &caps[3],
            &caps[2],
        ));
    }

    packages
}
