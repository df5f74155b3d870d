//! Action submitters: one mutation request per user action.
//!
//! | Action | Request | Response handling |
//! |---|---|---|
//! | **Login / signup** | JSON post | navigate on success, alert on failure |
//! | **Session login** | JSON post | stay put; the cookie covers later requests |
//! | **Settings fields** | form post | inline status message |
//! | **Delete account** | confirm → form post | inline message, delayed `/logout` |
//! | **Delete recipe** | confirm → `DELETE` | alert, then `/dashboard` |
//! | **Cookbook toggle / save** | post | alert, then refresh the button |
//! | **Rating** | JSON post | alert, then reload |
//! | **Create recipe** | required-field check → form post | navigate to the new recipe |
//! | **Remote tests** | get | banner, auto-dismissed |
//!
//! Every failure ends here as a visible message; nothing is retried and
//! nothing propagates to the caller beyond the returned [`ActionOutcome`].
//!
//! The module is split by page:
//! - **account**: login, session login, signup, settings, account deletion
//! - **recipe**: recipe page and creation form actions
//! - **diagnostics**: the dashboard's remote test run

mod account;
mod diagnostics;
mod recipe;

pub use account::{
    BLANK_FIELD, DELETE_ACCOUNT_PROMPT, GENERIC_FAILURE, LOGIN_FAILED, UNEXPECTED_RESPONSE,
};
pub use recipe::{CREATE_REQUIRED_FIELDS, DELETE_RECIPE_PROMPT};

use crate::api::Api;
use crate::config::{ClientConfig, TimingConfig};
use crate::page::Page;
use crate::transport::Transport;

/// Which path an action took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the action and its success effects ran.
    Completed,
    /// The request failed or was refused; an error was shown.
    Failed,
    /// The user declined the confirmation prompt; nothing was sent.
    Declined,
    /// Client-side validation failed; nothing was sent.
    Invalid,
}

pub struct ActionSubmitter<T, P> {
    api: Api<T>,
    page: P,
    timing: TimingConfig,
    test_endpoint: String,
}

impl<T: Transport, P: Page> ActionSubmitter<T, P> {
    pub fn new(api: Api<T>, page: P, config: &ClientConfig) -> Self {
        Self {
            api,
            page,
            timing: config.timing.clone(),
            test_endpoint: config.test_runner.endpoint.clone(),
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }
}
