//! Progress bar display for deployments

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display across the package catalog
pub struct ProgressDisplay {
    package_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with the total package count
    pub fn new(total_packages: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let package_pb = ProgressBar::new(total_packages);
        package_pb.set_style(style);

        Self { package_pb }
    }

    /// Update to show the package currently being deployed
    pub fn update_package(&self, resource_id: &str, current: usize, total: usize) {
        self.package_pb
            .set_message(format!("({}/{}) {}", current, total, resource_id));
    }

    /// Increment package progress
    pub fn inc_package(&self) {
        self.package_pb.inc(1);
    }

    /// Finish the bar after a complete run
    pub fn finish(&self) {
        self.package_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.package_pb.abandon();
    }
}

/// Print a status line without tearing an active progress bar
pub fn emit(progress: Option<&ProgressDisplay>, line: &str) {
    match progress {
        Some(display) => display.package_pb.println(line),
        None => println!("{}", line),
    }
}
