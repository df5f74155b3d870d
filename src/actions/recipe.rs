//! Recipe page actions: delete, cookbook membership, rating, and the
//! recipe creation form.

use super::{ActionOutcome, ActionSubmitter};
use crate::api::ApiError;
use crate::forms::FormData;
use crate::naming::recipe_detail_path;
use crate::page::{CookbookButton, Page};
use crate::transport::Transport;
use crate::types::{MessageResponse, RatingSubmission};

pub const DELETE_RECIPE_PROMPT: &str = "Are you sure you want to delete this recipe?";
pub const CREATE_REQUIRED_FIELDS: [&str; 3] = ["recipe_name", "ingredients", "instructions"];

const RECIPE_DELETED: &str = "Recipe deleted successfully.";
const DELETE_REFUSED: &str = "Failed to delete the recipe.";
const DELETE_ERROR: &str = "An error occurred while deleting the recipe.";
const COOKBOOK_ERROR: &str = "Error updating cookbook.";
const SAVE_ERROR: &str = "Failed to save recipe.";
const RATING_ERROR: &str = "An error occurred while submitting the rating.";
const CREATE_MISSING: &str =
    "Please fill out all required fields: Recipe Name, Ingredients, and Instructions.";

impl<T: Transport, P: Page> ActionSubmitter<T, P> {
    pub async fn delete_recipe(&self, name: &str) -> ActionOutcome {
        if !self.page.confirm(DELETE_RECIPE_PROMPT) {
            return ActionOutcome::Declined;
        }
        match self.api.delete_recipe(name).await {
            Ok(()) => {
                tracing::info!(recipe = name, "recipe deleted");
                self.page.alert(RECIPE_DELETED);
                self.page.navigate("/dashboard");
                ActionOutcome::Completed
            }
            Err(e @ ApiError::Status { .. }) => {
                tracing::error!(recipe = name, error = %e, "delete refused");
                self.page.alert(DELETE_REFUSED);
                ActionOutcome::Failed
            }
            Err(e) => {
                tracing::error!(recipe = name, error = %e, "delete failed");
                self.page.alert(DELETE_ERROR);
                ActionOutcome::Failed
            }
        }
    }

    /// Flip cookbook membership, then re-read it from the server so the
    /// button matches what was actually stored.
    pub async fn toggle_cookbook(&self, name: &str) -> ActionOutcome {
        let result = self.api.toggle_cookbook(name).await;
        self.report_cookbook(name, result, COOKBOOK_ERROR).await
    }

    /// Add without toggling. An "already saved" conflict is reported with
    /// the server's own message.
    pub async fn save_to_cookbook(&self, name: &str) -> ActionOutcome {
        let result = self.api.save_to_cookbook(name).await;
        self.report_cookbook(name, result, SAVE_ERROR).await
    }

    async fn report_cookbook(
        &self,
        name: &str,
        result: Result<MessageResponse, ApiError>,
        fallback: &str,
    ) -> ActionOutcome {
        let outcome = match result {
            Ok(reply) => {
                self.page
                    .alert(reply.message.as_deref().unwrap_or("Cookbook updated."));
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(recipe = name, error = %e, "cookbook update failed");
                self.page
                    .alert(e.server_detail().as_deref().unwrap_or(fallback));
                ActionOutcome::Failed
            }
        };
        self.refresh_cookbook_button(name).await;
        outcome
    }

    /// Query membership and update the button. Failures leave the button
    /// as it was.
    pub async fn refresh_cookbook_button(&self, name: &str) -> Option<CookbookButton> {
        match self.api.check_cookbook(name).await {
            Ok(status) => {
                let button = CookbookButton::new(status.in_cookbook);
                self.page.set_cookbook_button(button);
                Some(button)
            }
            Err(e) => {
                tracing::warn!(recipe = name, error = %e, "could not check cookbook status");
                None
            }
        }
    }

    /// Send `recipe_name` and `rating` from the form. The rating value is
    /// not checked here.
    pub async fn submit_rating(&self, form: &FormData) -> ActionOutcome {
        let submission = RatingSubmission::from_form_value(
            form.get("recipe_name").unwrap_or_default(),
            form.get("rating"),
        );
        match self.api.rate_recipe(&submission).await {
            Ok(reply) => {
                if let Some(error) = reply.error {
                    self.page.alert(&rating_error(&error, reply.details.as_deref()));
                    return ActionOutcome::Failed;
                }
                self.page
                    .alert(reply.message.as_deref().unwrap_or("Rating submitted."));
                self.page.reload();
                ActionOutcome::Completed
            }
            Err(ApiError::Status {
                body: Some(body), ..
            }) if body.error.is_some() => {
                let error = body.error.as_deref().unwrap_or_default();
                tracing::error!(recipe = %submission.recipe_name, error, "rating rejected");
                self.page.alert(&rating_error(error, body.details.as_deref()));
                ActionOutcome::Failed
            }
            Err(e) => {
                tracing::error!(recipe = %submission.recipe_name, error = %e, "rating failed");
                self.page.alert(RATING_ERROR);
                ActionOutcome::Failed
            }
        }
    }

    /// Check the required fields, post the form, and open the new recipe.
    pub async fn create_recipe(&self, form: &FormData) -> ActionOutcome {
        if let Err(e) = form.require(&CREATE_REQUIRED_FIELDS) {
            tracing::debug!(error = %e, "create form incomplete");
            self.page.alert(CREATE_MISSING);
            return ActionOutcome::Invalid;
        }
        let name = form.get("recipe_name").unwrap_or_default();
        match self.api.create_recipe(form).await {
            Ok(()) => {
                tracing::info!(recipe = name, "recipe created");
                self.page.navigate(&recipe_detail_path(name));
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(recipe = name, error = %e, "create failed");
                let alert = match e.server_detail() {
                    Some(detail) => format!("Failed to create the recipe: {detail}"),
                    None => "Failed to create the recipe.".to_string(),
                };
                self.page.alert(&alert);
                ActionOutcome::Failed
            }
        }
    }
}

fn rating_error(error: &str, details: Option<&str>) -> String {
    match details {
        Some(details) => format!("Error: {error} ({details})"),
        None => format!("Error: {error}"),
    }
}
