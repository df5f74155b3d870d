//! # Recipe Box
//!
//! Client for a recipe-sharing backend. Users search and browse recipes,
//! keep a personal cookbook, get recommendations, rate recipes and manage
//! their account. The server owns every piece of data; this crate fetches
//! it, renders it, and submits mutations.
//!
//! # Architecture: Two Kinds of Interaction
//!
//! Every user interaction is one of two shapes:
//!
//! ```text
//! Collection load   query  →  GET /api/<kind>  →  cards  →  Region
//! Action            form   →  POST/DELETE      →  alert / message / navigate  →  Page
//! ```
//!
//! Both are stateless request/response round-trips. Nothing is cached
//! between loads and nothing is retried; every failure becomes something
//! the user can see.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collection`] | Fetch-and-render controller with last-issued-wins ordering |
//! | [`actions`] | Action submitters: login, signup, settings, delete, cookbook, rating, create, remote tests |
//! | [`render`] | Maud fragments: recipe card, collection, error indicator, test banner, document wrapper |
//! | [`stars`] | Numeric average → five-glyph star string |
//! | [`api`] | One typed method per backend endpoint |
//! | [`transport`] | The "perform request" capability and its `reqwest` implementation |
//! | [`page`] | The "render into region" and "page effects" capabilities |
//! | [`types`] | Wire schemas for every endpoint |
//! | [`forms`] | Submitted form fields and required-field checks |
//! | [`naming`] | Recipe slugs and percent-encoded action paths |
//! | [`config`] | `recipe-box.toml` loading, validation and merging |
//! | [`output`] | Terminal host: prints page effects, captures the region |
//!
//! # Design Decisions
//!
//! ## Injected Capabilities
//!
//! The controller and submitters never touch the network or the screen
//! directly. They receive a [`transport::Transport`] to perform requests and
//! a [`page::Region`] / [`page::Page`] to show results. Production wires in
//! [`transport::HttpTransport`] and the terminal host from [`output`];
//! tests wire in a scripted fake and a recorder, so every behavior
//! (including request races) is checked without a server.
//!
//! ## Last Issued Wins
//!
//! Search loads are never cancelled. Each load takes a token from a
//! monotonic counter, and only the newest token may write the region.
//! See [`collection`] for the details.
//!
//! ## Maud for Fragments
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Recipe names and
//! descriptions come from other users, and Maud escapes every interpolation,
//! so server data can never inject markup into a card.
//!
//! ## Parse at the Boundary
//!
//! Responses are deserialized into the types in [`types`] right after the
//! status check. A body that does not match its schema is an error like any
//! other failed request, so the rendering code only ever sees well-formed
//! data.

pub mod actions;
pub mod api;
pub mod collection;
pub mod config;
pub mod forms;
pub mod naming;
pub mod output;
pub mod page;
pub mod render;
pub mod stars;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
