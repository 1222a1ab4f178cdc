/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::Write;

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    // built does not record the build date anymore
    let path = std::path::Path::new(&std::env::var("OUT_DIR").unwrap()).join("built.rs");
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .expect("Failed to open built.rs");
    writeln!(
        file,
        "#[allow(dead_code)]\npub const BUILD_DATE: &str = \"{}\";",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .expect("Failed to write the build date");
}
