//! Pure formatting functions for UI output.
//!
//! Status lines go to stderr so that stdout carries only machine-readable
//! results (the resolved version or the metadata JSON).

use console::style;

use crate::metadata::{BuildManifest, ResolvedMetadata};

/// Format an error line
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red(), message)
}

/// Format a success line with a green checkmark
pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

/// Format a status line with a yellow arrow
pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{}", format_success(message));
}

/// Print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{}", format_status(message));
}

/// Summarise an allocation.
///
/// Shows the tag and artifact names, and the snapshot commit when there is one.
pub fn display_allocation(metadata: &ResolvedMetadata) {
    eprintln!(
        "\n{} {} build {}",
        style("Allocated").bold(),
        metadata.variant,
        metadata.build_number
    );
    eprintln!("  Tag:      {}", style(&metadata.tag_name).green());
    eprintln!("  Artifact: {}", style(&metadata.artifact_name).green());
    if let Some(commit) = &metadata.commit {
        eprintln!("  Commit:   {}", commit);
    }
}

/// Summarise a packaged artifact
pub fn display_manifest(manifest: &BuildManifest) {
    eprintln!("\n{}", style("Built artifact").bold());
    eprintln!("  Path:   {}", manifest.artifact_path.display());
    eprintln!("  SHA256: {}", style(&manifest.artifact_sha256).cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_keeps_message() {
        console::set_colors_enabled(false);
        assert_eq!(format_error("boom"), "ERROR: boom");
    }

    #[test]
    fn test_format_success_and_status() {
        console::set_colors_enabled(false);
        assert_eq!(format_success("done"), "✓ done");
        assert_eq!(format_status("working"), "→ working");
    }
}
