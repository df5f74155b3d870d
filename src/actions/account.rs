//! Login, signup and account settings.

use super::{ActionOutcome, ActionSubmitter};
use crate::api::{ApiError, SettingField};
use crate::forms::FormData;
use crate::page::{Page, Tone};
use crate::transport::Transport;
use crate::types::{Credentials, LoginResponse, MessageResponse};

pub const LOGIN_FAILED: &str = "Login failed. Please check your username and password.";
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again later.";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from server";
pub const BLANK_FIELD: &str = "Please fill out this field.";
pub const DELETE_ACCOUNT_PROMPT: &str =
    "Are you sure you want to delete your account? This action cannot be undone.";

impl<T: Transport, P: Page> ActionSubmitter<T, P> {
    /// Log in and follow the server's redirect.
    pub async fn login(&self, credentials: &Credentials) -> ActionOutcome {
        match self.authenticate(credentials).await {
            Some(reply) => {
                self.page.navigate(&reply.redirect);
                ActionOutcome::Completed
            }
            None => ActionOutcome::Failed,
        }
    }

    /// Log in without leaving the current page. Later requests through the
    /// same transport carry the session cookie.
    pub async fn start_session(&self, credentials: &Credentials) -> ActionOutcome {
        match self.authenticate(credentials).await {
            Some(_) => ActionOutcome::Completed,
            None => ActionOutcome::Failed,
        }
    }

    /// Rejected credentials (any error status) get the login-specific
    /// alert; anything else is reported as a generic failure.
    async fn authenticate(&self, credentials: &Credentials) -> Option<LoginResponse> {
        match self.api.login(credentials).await {
            Ok(reply) => {
                tracing::info!(username = %credentials.username, "logged in");
                Some(reply)
            }
            Err(e @ ApiError::Status { .. }) => {
                tracing::error!(username = %credentials.username, error = %e, "login rejected");
                self.page.alert(LOGIN_FAILED);
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "login failed");
                self.page.alert(GENERIC_FAILURE);
                None
            }
        }
    }

    /// Posts every form field as one JSON object.
    pub async fn signup(&self, form: &FormData) -> ActionOutcome {
        match self.api.signup(form).await {
            Ok(reply) if reply.success => {
                self.page
                    .alert(reply.message.as_deref().unwrap_or("User created successfully"));
                self.page.navigate("/");
                ActionOutcome::Completed
            }
            Ok(reply) => {
                tracing::error!(message = ?reply.message, "signup refused");
                self.page
                    .alert(reply.message.as_deref().unwrap_or(GENERIC_FAILURE));
                ActionOutcome::Failed
            }
            Err(e) => {
                tracing::error!(error = %e, "signup failed");
                self.page
                    .alert(e.server_detail().as_deref().unwrap_or(GENERIC_FAILURE));
                ActionOutcome::Failed
            }
        }
    }

    /// Submit one settings form. The field's own value must be non-blank.
    pub async fn update_setting(&self, field: SettingField, form: &FormData) -> ActionOutcome {
        if form.require(&[field.form_key()]).is_err() {
            self.page.show_message(BLANK_FIELD, Tone::Error);
            return ActionOutcome::Invalid;
        }
        let result = self.api.update_setting(field, form).await;
        self.report_message(field.path(), "setting updated", result)
    }

    /// Confirmation-gated. On success the message stays up for the
    /// configured delay before the page moves to `/logout`.
    pub async fn delete_account(&self, form: &FormData) -> ActionOutcome {
        if !self.page.confirm(DELETE_ACCOUNT_PROMPT) {
            return ActionOutcome::Declined;
        }
        let result = self.api.delete_account(form).await;
        match self.report_message("/delete_account", "account deleted", result) {
            ActionOutcome::Completed => {
                tokio::time::sleep(self.timing.logout_delay()).await;
                self.page.navigate("/logout");
                ActionOutcome::Completed
            }
            other => other,
        }
    }

    /// Inline status line handling shared by the settings forms. `event`
    /// names the success in the log.
    fn report_message(
        &self,
        path: &str,
        event: &str,
        result: Result<MessageResponse, ApiError>,
    ) -> ActionOutcome {
        let failure = match result {
            Ok(MessageResponse {
                message: Some(message),
            }) => {
                tracing::info!(path, "{event}");
                self.page.show_message(&message, Tone::Success);
                return ActionOutcome::Completed;
            }
            Ok(MessageResponse { message: None }) => UNEXPECTED_RESPONSE.to_string(),
            Err(e) => {
                tracing::error!(path, error = %e, "account form rejected");
                e.server_detail().unwrap_or_else(|| e.to_string())
            }
        };
        self.page
            .show_message(&format!("An error occurred: {failure}"), Tone::Error);
        ActionOutcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;
    use crate::config::ClientConfig;
    use crate::test_helpers::*;
    use crate::transport::{Method, RequestBody};
    use serde_json::json;
    use std::time::Duration;

    fn submitter<'a>(
        transport: &'a FakeTransport,
        page: &'a RecordingPage,
    ) -> ActionSubmitter<&'a FakeTransport, &'a RecordingPage> {
        ActionSubmitter::new(Api::new(transport), page, &ClientConfig::default())
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "ada".into(),
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn login_navigates_to_server_redirect() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/login",
            200,
            json!({ "message": "Login successful", "redirect": "/dashboard" }),
        );
        let page = RecordingPage::new();

        let outcome = submitter(&transport, &page).login(&credentials()).await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(page.navigations(), vec!["/dashboard"]);
        assert_eq!(
            transport.requests()[0].body,
            RequestBody::Json(json!({ "username": "ada", "password": "hunter2" }))
        );
    }

    #[tokio::test]
    async fn login_rejected_shows_login_alert() {
        let transport = FakeTransport::new();
        transport.respond(Method::Post, "/login", 401, json!({ "message": "Login failed" }));
        let page = RecordingPage::new();

        let outcome = submitter(&transport, &page).login(&credentials()).await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.alerts(), vec![LOGIN_FAILED]);
        assert!(page.navigations().is_empty());
    }

    #[tokio::test]
    async fn login_unreachable_shows_generic_alert() {
        let transport = FakeTransport::new();
        let page = RecordingPage::new();
        submitter(&transport, &page).login(&credentials()).await;
        assert_eq!(page.alerts(), vec![GENERIC_FAILURE]);
    }

    #[tokio::test]
    async fn session_login_stays_on_page() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/login",
            200,
            json!({ "message": "Login successful", "redirect": "/dashboard" }),
        );
        let page = RecordingPage::new();

        let outcome = submitter(&transport, &page).start_session(&credentials()).await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(page.events().is_empty());
    }

    #[tokio::test]
    async fn rejected_session_login_alerts() {
        let transport = FakeTransport::new();
        transport.respond(Method::Post, "/login", 401, json!({ "message": "Login failed" }));
        let page = RecordingPage::new();

        let outcome = submitter(&transport, &page).start_session(&credentials()).await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.alerts(), vec![LOGIN_FAILED]);
    }

    #[tokio::test]
    async fn signup_success_alerts_then_goes_home() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/signup",
            200,
            json!({ "success": true, "message": "User created successfully" }),
        );
        let page = RecordingPage::new();
        let form = FormData::new()
            .with("username", "ada")
            .with("password", "pw")
            .with("email", "ada@example.org");

        let outcome = submitter(&transport, &page).signup(&form).await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(
            page.events(),
            vec![
                PageEvent::Alert("User created successfully".into()),
                PageEvent::Navigate("/".into()),
            ]
        );
        assert_eq!(
            transport.requests()[0].body,
            RequestBody::Json(json!({
                "username": "ada",
                "password": "pw",
                "email": "ada@example.org"
            }))
        );
    }

    #[tokio::test]
    async fn signup_conflict_shows_server_message() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/signup",
            409,
            json!({ "success": false, "message": "Username or email already exists" }),
        );
        let page = RecordingPage::new();

        let outcome = submitter(&transport, &page)
            .signup(&FormData::new().with("username", "ada"))
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.alerts(), vec!["Username or email already exists"]);
        assert!(page.navigations().is_empty());
    }

    #[tokio::test]
    async fn signup_unreachable_shows_generic_alert() {
        let transport = FakeTransport::new();
        let page = RecordingPage::new();

        let outcome = submitter(&transport, &page)
            .signup(&FormData::new().with("username", "ada"))
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(page.alerts(), vec![GENERIC_FAILURE]);
        assert!(page.navigations().is_empty());
    }

    #[tokio::test]
    async fn setting_update_shows_success_message() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/change_username",
            200,
            json!({ "message": "Username updated successfully" }),
        );
        let page = RecordingPage::new();
        let form = FormData::new().with("new_username", "ada2");

        let outcome = submitter(&transport, &page)
            .update_setting(SettingField::Username, &form)
            .await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert_eq!(
            page.events(),
            vec![PageEvent::Message(
                "Username updated successfully".into(),
                Tone::Success
            )]
        );
    }

    #[tokio::test]
    async fn setting_and_account_deletion_log_their_own_event() {
        let (logs, _guard) = LogCapture::install();
        let transport = FakeTransport::new();
        transport.respond(Method::Post, "/change_email", 200, json!({ "message": "Email updated" }));
        transport.respond(
            Method::Post,
            "/delete_account",
            200,
            json!({ "message": "Account deleted" }),
        );
        let page = RecordingPage::new();
        let mut config = ClientConfig::default();
        config.timing.logout_delay_ms = 0;
        let submitter = ActionSubmitter::new(Api::new(&transport), &page, &config);

        submitter
            .update_setting(SettingField::Email, &FormData::new().with("new_email", "a@b.c"))
            .await;
        let after_setting = logs.contents();
        submitter
            .delete_account(&FormData::new().with("password", "pw"))
            .await;
        let after_delete = logs.contents();

        assert!(after_setting.contains("setting updated"));
        assert!(!after_setting.contains("account deleted"));
        let deletion = &after_delete[after_setting.len()..];
        assert!(deletion.contains("account deleted"));
        assert!(!deletion.contains("setting updated"));
    }

    #[tokio::test]
    async fn setting_update_error_shows_details_inline() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/update_diet_restrictions",
            500,
            json!({ "error": "Failed to update", "details": "unknown restriction" }),
        );
        let page = RecordingPage::new();
        let form = FormData::new().with("diet_restrictions", "Carnivore");

        let outcome = submitter(&transport, &page)
            .update_setting(SettingField::DietRestrictions, &form)
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(
            page.events(),
            vec![PageEvent::Message(
                "An error occurred: Failed to update (unknown restriction)".into(),
                Tone::Error
            )]
        );
    }

    #[tokio::test]
    async fn setting_update_without_message_is_unexpected() {
        let transport = FakeTransport::new();
        transport.respond(Method::Post, "/change_email", 200, json!({}));
        let page = RecordingPage::new();
        let form = FormData::new().with("new_email", "a@b.c");

        submitter(&transport, &page)
            .update_setting(SettingField::Email, &form)
            .await;

        assert_eq!(
            page.events(),
            vec![PageEvent::Message(
                format!("An error occurred: {UNEXPECTED_RESPONSE}"),
                Tone::Error
            )]
        );
    }

    #[tokio::test]
    async fn blank_setting_is_rejected_before_sending() {
        let transport = FakeTransport::new();
        let page = RecordingPage::new();
        let form = FormData::new().with("new_password", "  ");

        let outcome = submitter(&transport, &page)
            .update_setting(SettingField::Password, &form)
            .await;

        assert_eq!(outcome, ActionOutcome::Invalid);
        assert!(transport.requests().is_empty());
        assert_eq!(
            page.events(),
            vec![PageEvent::Message(BLANK_FIELD.into(), Tone::Error)]
        );
    }

    #[tokio::test]
    async fn declined_account_deletion_sends_nothing() {
        let transport = FakeTransport::new();
        let page = RecordingPage::declining();

        let outcome = submitter(&transport, &page)
            .delete_account(&FormData::new().with("password", "pw"))
            .await;

        assert_eq!(outcome, ActionOutcome::Declined);
        assert!(transport.requests().is_empty());
        assert_eq!(
            page.events(),
            vec![PageEvent::Confirm(DELETE_ACCOUNT_PROMPT.into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn account_deletion_logs_out_after_delay() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/delete_account",
            200,
            json!({ "message": "Account deleted" }),
        );
        let page = RecordingPage::new();
        let start = tokio::time::Instant::now();

        let outcome = submitter(&transport, &page)
            .delete_account(&FormData::new().with("password", "pw"))
            .await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(start.elapsed() >= Duration::from_millis(2000));
        assert_eq!(
            page.events(),
            vec![
                PageEvent::Confirm(DELETE_ACCOUNT_PROMPT.into()),
                PageEvent::Message("Account deleted".into(), Tone::Success),
                PageEvent::Navigate("/logout".into()),
            ]
        );
    }

    #[tokio::test]
    async fn failed_account_deletion_stays_on_page() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/delete_account",
            403,
            json!({ "message": "Incorrect password" }),
        );
        let page = RecordingPage::new();

        let outcome = submitter(&transport, &page)
            .delete_account(&FormData::new().with("password", "nope"))
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert!(page.navigations().is_empty());
        assert!(page.events().contains(&PageEvent::Message(
            "An error occurred: Incorrect password".into(),
            Tone::Error
        )));
    }
}
