//! Headless recipe creation form.
//!
//! The crate models the "new recipe" page of a recipe site without any UI:
//! a [`RecipeForm`] holds the draft, validates it, turns an uploaded image
//! into a data URL, and submits the result to the backend.
//!
//! # Example
//! ```no_run
//! use recipe_form::{ListKind, RecipeClient, RecipeForm, RecordingNavigator};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut form = RecipeForm::builder().base_url("http://localhost:3000").build()?;
//! form.set_title("Pasta");
//! form.set_cuisine("Italian");
//! let row = form.row_keys(ListKind::Ingredients)[0];
//! form.set_ingredient_name(row, "Flour");
//! form.set_ingredient_quantity(row, "2");
//! let step = form.row_keys(ListKind::Instructions)[0];
//! form.set_instruction(step, "Mix well");
//!
//! let client = RecipeClient::new(form.config())?;
//! let mut navigator = RecordingNavigator::default();
//! form.submit(&client, &mut navigator).await;
//! println!("{:?}", navigator.last());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod image;
pub mod model;
pub mod rows;
pub mod submit;
pub mod validation;

pub use builder::RecipeFormBuilder;
pub use client::RecipeClient;
pub use config::FormConfig;
pub use error::FormError;
pub use form::{FileSelection, ListKind, RecipeForm, PAGE_TITLE};
pub use image::{encode_data_url, ImageFile, InMemoryImageFile, LocalImageFile, ONE_MB};
pub use model::{Ingredient, IngredientPayload, RecipeDraft, RecipePayload, UserReference};
pub use rows::{RowKey, RowList};
pub use submit::{Navigator, RecordingNavigator, SubmitPhase};
pub use validation::{FieldPath, ValidationErrors};

/// Validate a JSON draft and submit it in one go.
///
/// Returns the id of the created recipe.
///
/// # Errors
/// Returns the validation errors, the submit failure, or a draft parse error.
pub async fn create_recipe_from_json(
    document: &str,
    owner: UserReference,
    config: FormConfig,
) -> Result<String, FormError> {
    let draft = RecipeDraft::from_json(document, owner)?;
    let payload = validation::check(&draft).map_err(FormError::Validation)?;
    let client = RecipeClient::new(&config)?;
    client.create(&payload).await
}
