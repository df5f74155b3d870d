//! Dashboard remote test run.

use super::ActionSubmitter;
use crate::page::Page;
use crate::render::render_test_banner;
use crate::transport::Transport;
use crate::types::TestRunReport;

impl<T: Transport, P: Page> ActionSubmitter<T, P> {
    /// Trigger the server-side test suite and show the result in a banner
    /// that dismisses itself after the configured duration.
    pub async fn run_tests(&self) -> Option<TestRunReport> {
        match self.api.run_tests(&self.test_endpoint).await {
            Ok(report) => {
                tracing::info!(
                    passed = report.passed(),
                    exit_code = ?report.exit_code(),
                    "remote tests finished"
                );
                self.page.show_banner(render_test_banner(&report));
                tokio::time::sleep(self.timing.banner_dismiss()).await;
                self.page.dismiss_banner();
                Some(report)
            }
            Err(e) => {
                tracing::error!(endpoint = %self.test_endpoint, error = %e, "remote tests failed");
                self.page.alert(&format!("Test failed: {e}"));
                None
            }
        }
    }
}
