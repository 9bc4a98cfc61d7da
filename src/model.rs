use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rows::RowList;

/// Opaque reference to the signed-in user, supplied by the host application.
/// The form only forwards it to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserReference(pub Value);

impl UserReference {
    pub fn new(value: Value) -> Self {
        UserReference(value)
    }
}

/// One ingredient row as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,
    /// Raw quantity text; parsed during validation.
    #[serde(default, deserialize_with = "quantity_text")]
    pub quantity: String,
    #[serde(default)]
    pub measurement: String,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        measurement: impl Into<String>,
    ) -> Self {
        Ingredient {
            name: name.into(),
            quantity: quantity.into(),
            measurement: measurement.into(),
        }
    }
}

// Draft documents may carry quantities either as numbers or as text.
fn quantity_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// The in-memory recipe being composed.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub owner: UserReference,
    pub title: String,
    pub cuisine: String,
    pub description: String,
    pub ingredients: RowList<Ingredient>,
    pub instructions: RowList<String>,
    pub image_urls: RowList<String>,
    /// Data URL of the uploaded image, if any.
    pub image_file: Option<String>,
}

impl RecipeDraft {
    /// Empty draft with one blank ingredient, instruction and image URL slot.
    pub fn new(owner: UserReference) -> Self {
        RecipeDraft {
            owner,
            title: String::new(),
            cuisine: String::new(),
            description: String::new(),
            ingredients: RowList::default(),
            instructions: RowList::default(),
            image_urls: RowList::default(),
            image_file: None,
        }
    }

    /// Build a draft from a JSON document using the backend's field names.
    ///
    /// Missing lists fall back to a single blank row so the editing
    /// invariants hold from the start.
    pub fn from_json(document: &str, owner: UserReference) -> Result<Self, serde_json::Error> {
        let doc: DraftDocument = serde_json::from_str(document)?;

        fn rows<T: Default>(values: Vec<T>) -> RowList<T> {
            if values.is_empty() {
                RowList::default()
            } else {
                RowList::from_values(values)
            }
        }

        Ok(RecipeDraft {
            owner: doc.owner.unwrap_or(owner),
            title: doc.recipe,
            cuisine: doc.cuisine,
            description: doc.description,
            ingredients: rows(doc.ingredients),
            instructions: rows(doc.instructions),
            image_urls: rows(doc.imageurl),
            image_file: doc.imagefile.filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DraftDocument {
    #[serde(default)]
    owner: Option<UserReference>,
    #[serde(default, alias = "title")]
    recipe: String,
    #[serde(default)]
    cuisine: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    instructions: Vec<String>,
    #[serde(default)]
    imageurl: Vec<String>,
    #[serde(default)]
    imagefile: Option<String>,
}

/// Validated ingredient ready for the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientPayload {
    pub name: String,
    pub quantity: f64,
    pub measurement: String,
}

/// Request body for `POST /api/recipes/create`.
///
/// Only produced by a successful validation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipePayload {
    pub owner: UserReference,
    #[serde(rename = "recipe")]
    pub title: String,
    pub cuisine: String,
    pub description: String,
    pub ingredients: Vec<IngredientPayload>,
    pub instructions: Vec<String>,
    #[serde(rename = "imageurl")]
    pub image_urls: Vec<String>,
    #[serde(rename = "imagefile")]
    pub image_file: String,
}
