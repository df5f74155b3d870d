//! Fetch-and-render controller for recipe collections.
//!
//! A [`CollectionController`] owns one [`Region`] and fills it from one of
//! the backend's collection endpoints:
//!
//! ```text
//! load_collection(kind, query)
//!   token ← next request token
//!   GET kind.path()[?search=query]
//!   token still latest?  no → drop result (Superseded)
//!   ok   → region := cards for every recipe, server order
//!   fail → region := single error indicator, log the cause
//! ```
//!
//! ## Overlapping loads
//!
//! Loads are never cancelled, so a slow earlier search can finish after a
//! fast later one. Each call takes a token from a monotonic counter before
//! sending, and only the holder of the newest token may write the region.
//! The region therefore always shows the answer to the most recently
//! *issued* request, regardless of arrival order.

use crate::api::{Api, CollectionKind};
use crate::naming::recipe_detail_path;
use crate::page::{Page, Region};
use crate::render::{CardStyle, render_collection, render_load_error};
use crate::transport::Transport;
use std::sync::atomic::{AtomicU64, Ordering};

impl CollectionKind {
    /// The cookbook lists saved recipes without ratings.
    pub fn card_style(self) -> CardStyle {
        match self {
            CollectionKind::Cookbook => CardStyle::Plain,
            CollectionKind::Recipes | CollectionKind::Recommended => CardStyle::Rated,
        }
    }
}

/// Item-level action exposed by a rendered card: its "View Recipe" target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAction {
    pub recipe_name: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The region now shows these cards, in order.
    Rendered(Vec<CardAction>),
    /// The region now shows the error indicator.
    Failed,
    /// A newer load was issued before this one resolved; nothing written.
    Superseded,
}

pub struct CollectionController<T, R> {
    api: Api<T>,
    region: R,
    latest: AtomicU64,
}

impl<T: Transport, R: Region> CollectionController<T, R> {
    pub fn new(api: Api<T>, region: R) -> Self {
        Self {
            api,
            region,
            latest: AtomicU64::new(0),
        }
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    pub fn into_region(self) -> R {
        self.region
    }

    /// Fetch `kind` (filtered by `query` when non-blank) and re-render the
    /// region from the response.
    pub async fn load_collection(&self, kind: CollectionKind, query: Option<&str>) -> LoadOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.collection(kind, query).await;

        if self.latest.load(Ordering::SeqCst) != token {
            tracing::debug!(
                collection = kind.label(),
                token,
                "dropping superseded collection response"
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(response) => {
                self.region
                    .replace(render_collection(&response.recipes, kind.card_style()));
                tracing::debug!(
                    collection = kind.label(),
                    count = response.recipes.len(),
                    "rendered collection"
                );
                LoadOutcome::Rendered(
                    response
                        .recipes
                        .iter()
                        .map(|r| CardAction {
                            recipe_name: r.name.clone(),
                            target: recipe_detail_path(&r.name),
                        })
                        .collect(),
                )
            }
            Err(e) => {
                tracing::error!(collection = kind.label(), error = %e, "error loading recipes");
                self.region.replace(render_load_error());
                LoadOutcome::Failed
            }
        }
    }
}

/// The card's "View Recipe" handler.
pub fn view_recipe<P: Page>(page: &P, action: &CardAction) {
    page.navigate(&action.target);
}
