//! Typed backend API.
//!
//! One method per endpoint. Each builds an [`ApiRequest`], sends it through
//! the injected [`Transport`], and parses the reply into the endpoint's
//! schema from [`crate::types`]. A non-2xx status becomes
//! [`ApiError::Status`] carrying whatever error fields the body had; a 2xx
//! body that does not match the schema becomes [`ApiError::Decode`].

use crate::forms::FormData;
use crate::naming::action_path;
use crate::transport::{ApiRequest, ApiResponse, RequestBody, Transport, TransportError};
use crate::types::{
    CollectionResponse, CookbookStatus, Credentials, ErrorBody, LoginResponse, MessageResponse,
    RatingResponse, RatingSubmission, SignupResponse, TestRunReport,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{path} returned HTTP {status}{}", summary_suffix(.body))]
    Status {
        path: String,
        status: u16,
        body: Option<ErrorBody>,
    },
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn summary_suffix(body: &Option<ErrorBody>) -> String {
    body.as_ref()
        .and_then(ErrorBody::summary)
        .map(|s| format!(": {s}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Server-supplied error text, when the failure carried any.
    pub fn server_detail(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => body.as_ref().and_then(ErrorBody::summary),
            _ => None,
        }
    }
}

/// The three server-owned recipe collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// All recipes, filterable with `?search=`.
    Recipes,
    Cookbook,
    Recommended,
}

impl CollectionKind {
    pub fn path(self) -> &'static str {
        match self {
            CollectionKind::Recipes => "/api/recipes",
            CollectionKind::Cookbook => "/api/cookbook",
            CollectionKind::Recommended => "/api/recommended",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CollectionKind::Recipes => "recipes",
            CollectionKind::Cookbook => "cookbook",
            CollectionKind::Recommended => "recommended",
        }
    }
}

/// Single-field account settings forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Username,
    Password,
    Email,
    SecurityKey,
    DietRestrictions,
}

impl SettingField {
    pub fn path(self) -> &'static str {
        match self {
            SettingField::Username => "/change_username",
            SettingField::Password => "/change_password",
            SettingField::Email => "/change_email",
            SettingField::SecurityKey => "/update_security_key",
            SettingField::DietRestrictions => "/update_diet_restrictions",
        }
    }

    /// Form field carrying the new value.
    pub fn form_key(self) -> &'static str {
        match self {
            SettingField::Username => "new_username",
            SettingField::Password => "new_password",
            SettingField::Email => "new_email",
            SettingField::SecurityKey => "security_key",
            SettingField::DietRestrictions => "diet_restrictions",
        }
    }
}

pub struct Api<T> {
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn exchange(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                path,
                status: response.status,
                body: serde_json::from_str(&response.body).ok(),
            })
        }
    }

    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let path = request.path.clone();
        let response = self.exchange(request).await?;
        serde_json::from_str(&response.body).map_err(|source| ApiError::Decode { path, source })
    }

    /// Fetch a collection. `search` is sent only when it has non-blank text.
    pub async fn collection(
        &self,
        kind: CollectionKind,
        search: Option<&str>,
    ) -> Result<CollectionResponse, ApiError> {
        let mut request = ApiRequest::get(kind.path());
        if let Some(q) = search.filter(|q| !q.trim().is_empty()) {
            request = request.with_query("search", q);
        }
        self.call(request).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(credentials).map_err(|source| ApiError::Decode {
            path: "/login".into(),
            source,
        })?;
        self.call(ApiRequest::post("/login", RequestBody::Json(body)))
            .await
    }

    pub async fn signup(&self, form: &FormData) -> Result<SignupResponse, ApiError> {
        self.call(ApiRequest::post("/signup", RequestBody::Json(form.to_json())))
            .await
    }

    pub async fn update_setting(
        &self,
        field: SettingField,
        form: &FormData,
    ) -> Result<MessageResponse, ApiError> {
        self.call(ApiRequest::post(
            field.path(),
            RequestBody::Form(form.fields().to_vec()),
        ))
        .await
    }

    pub async fn delete_account(&self, form: &FormData) -> Result<MessageResponse, ApiError> {
        self.call(ApiRequest::post(
            "/delete_account",
            RequestBody::Form(form.fields().to_vec()),
        ))
        .await
    }

    /// The reply body is not interpreted; only the status matters.
    pub async fn delete_recipe(&self, name: &str) -> Result<(), ApiError> {
        self.exchange(ApiRequest::delete(action_path("/delete-recipe", name)))
            .await
            .map(|_| ())
    }

    pub async fn toggle_cookbook(&self, name: &str) -> Result<MessageResponse, ApiError> {
        self.call(ApiRequest::post(
            action_path("/toggle-cookbook", name),
            RequestBody::Empty,
        ))
        .await
    }

    pub async fn save_to_cookbook(&self, name: &str) -> Result<MessageResponse, ApiError> {
        self.call(ApiRequest::post(
            action_path("/save-to-cookbook", name),
            RequestBody::Empty,
        ))
        .await
    }

    pub async fn check_cookbook(&self, name: &str) -> Result<CookbookStatus, ApiError> {
        self.call(ApiRequest::get(action_path("/check-cookbook", name)))
            .await
    }

    pub async fn rate_recipe(
        &self,
        submission: &RatingSubmission,
    ) -> Result<RatingResponse, ApiError> {
        let body = serde_json::to_value(submission).map_err(|source| ApiError::Decode {
            path: "/rate-recipe".into(),
            source,
        })?;
        self.call(ApiRequest::post("/rate-recipe", RequestBody::Json(body)))
            .await
    }

    /// Plain form post; the server answers with a redirect to the new page,
    /// so only the status is checked.
    pub async fn create_recipe(&self, form: &FormData) -> Result<(), ApiError> {
        self.exchange(ApiRequest::post(
            "/create-recipe",
            RequestBody::Form(form.fields().to_vec()),
        ))
        .await
        .map(|_| ())
    }

    pub async fn run_tests(&self, endpoint: &str) -> Result<TestRunReport, ApiError> {
        self.call(ApiRequest::get(endpoint)).await
    }
}
