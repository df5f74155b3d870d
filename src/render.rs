//! HTML fragments for recipe collections and page widgets.
//!
//! Every function here is a pure transformation from data to [`Markup`]:
//! no network, no page state. Interpolated values are escaped by maud, so
//! recipe names and descriptions are safe to render as-is.
//!
//! ## Recipe card
//!
//! ```text
//! div.recipe-card [data-recipe-name]
//! ├── div.recipe-image        <img> when the recipe has an image
//! ├── div.recipe-heading
//! │   ├── h3.recipe-title
//! │   └── div.recipe-rating   ★★★☆☆ (rated style only)
//! ├── p.recipe-description
//! └── a.view-recipe           → /recipe/<slug>
//! ```
//!
//! Class names are kept alongside the utility classes the site stylesheet
//! expects, so fragments drop into the existing pages unchanged.

use crate::naming::recipe_detail_path;
use crate::stars::render_stars;
use crate::types::{RecipeSummary, TestRunReport};
use maud::{DOCTYPE, Markup, html};

pub const LOAD_ERROR_TEXT: &str = "Error loading recipes.";

/// Whether cards show the star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// Search results and recommendations.
    Rated,
    /// The cookbook list.
    Plain,
}

/// Render one recipe card.
pub fn render_card(recipe: &RecipeSummary, style: CardStyle) -> Markup {
    let detail = recipe_detail_path(&recipe.name);
    html! {
        div.recipe-card."bg-white"."rounded-lg".shadow."p-4".flex."flex-col" data-recipe-name=(recipe.name) {
            div.recipe-image."h-48"."w-full"."overflow-hidden"."rounded-lg" {
                @if !recipe.image.is_empty() {
                    img src=(recipe.image) alt=(recipe.name) class="w-full h-full object-cover";
                }
            }
            div.recipe-heading."flex-grow".flex."justify-between"."items-center" {
                h3.recipe-title."font-bold"."text-lg"."mt-2" { (recipe.name) }
                @if style == CardStyle::Rated {
                    div.recipe-rating."text-yellow-400"."text-lg" { (render_stars(recipe.average_rating)) }
                }
            }
            p.recipe-description."text-gray-600" { (recipe.description) }
            a.view-recipe."mt-3"."px-4"."py-2"."bg-green-500"."text-white".rounded href=(detail) {
                "View Recipe"
            }
        }
    }
}

/// Render every recipe, in the order given.
pub fn render_collection(recipes: &[RecipeSummary], style: CardStyle) -> Markup {
    html! {
        @for recipe in recipes {
            (render_card(recipe, style))
        }
    }
}

/// The single indicator shown in place of a collection that failed to load.
pub fn render_load_error() -> Markup {
    html! {
        p.load-error { (LOAD_ERROR_TEXT) }
    }
}

/// Pass/fail banner for a remote test run. A legacy reply's own message
/// sits between the headline and the output.
pub fn render_test_banner(report: &TestRunReport) -> Markup {
    let passed = report.passed();
    let headline = if passed { "Tests passed" } else { "Tests failed" };
    html! {
        div.test-banner.test-banner-pass[passed].test-banner-fail[!passed] role="status" {
            strong { (headline) }
            @if let Some(code) = report.exit_code() {
                " (exit code " (code) ")"
            }
            @if let Some(message) = report.message() {
                p.test-message { (message) }
            }
            @if let Some(detail) = report.detail() {
                pre.test-output { (detail) }
            }
        }
    }
}

/// Wrap a fragment into a standalone document, for saving rendered
/// collections to disk.
pub fn render_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                div.recipes-container {
                    (content)
                }
            }
        }
    }
}
