//! Field rules for the recipe form.
//!
//! [`check`] walks a [`RecipeDraft`] once, collecting one message per field and,
//! when nothing fails, producing the [`RecipePayload`] sent to the backend.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use reqwest::Url;

use crate::model::{IngredientPayload, RecipeDraft, RecipePayload};
use crate::rows::RowKey;

pub const REQUIRED: &str = "This field is required";
pub const TOO_SHORT: &str = "Must be at least 3 characters";
pub const TOO_LONG: &str = "Cannot exceed 100 characters";
pub const NOT_A_NUMBER: &str = "Only numbers allowed";
pub const NOT_POSITIVE: &str = "No negative numbers";
pub const NO_INGREDIENTS: &str = "Minimum 1 ingredient required";
pub const NO_INSTRUCTIONS: &str = "Minimum 1 instruction required";
pub const INVALID_URL: &str = "Must be a valid Url";

const MIN_TEXT_CHARS: usize = 3;
const MAX_DESCRIPTION_CHARS: usize = 100;

/// Address of a single input in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    Title,
    Cuisine,
    Description,
    Ingredients,
    IngredientName(RowKey),
    IngredientQuantity(RowKey),
    IngredientMeasurement(RowKey),
    Instructions,
    Instruction(RowKey),
    ImageUrl(RowKey),
}

impl FieldPath {
    /// Label rendered next to the input. Required inputs carry a `*`.
    pub fn label(&self) -> &'static str {
        match self {
            FieldPath::Title => "Recipe*",
            FieldPath::Cuisine => "Cuisine*",
            FieldPath::Description => "Description",
            FieldPath::Ingredients => "Ingredients",
            FieldPath::IngredientName(_) => "Name*",
            FieldPath::IngredientQuantity(_) => "Quantity*",
            FieldPath::IngredientMeasurement(_) => "Measurement",
            FieldPath::Instructions => "Instructions",
            FieldPath::Instruction(_) => "Instructions*",
            FieldPath::ImageUrl(_) => "Imageurl",
        }
    }

    /// Row this field belongs to, if any.
    pub fn row(&self) -> Option<RowKey> {
        match self {
            FieldPath::IngredientName(key)
            | FieldPath::IngredientQuantity(key)
            | FieldPath::IngredientMeasurement(key)
            | FieldPath::Instruction(key)
            | FieldPath::ImageUrl(key) => Some(*key),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Title => write!(f, "recipe"),
            FieldPath::Cuisine => write!(f, "cuisine"),
            FieldPath::Description => write!(f, "description"),
            FieldPath::Ingredients => write!(f, "ingredients"),
            FieldPath::IngredientName(key) => write!(f, "ingredients[{key}].name"),
            FieldPath::IngredientQuantity(key) => write!(f, "ingredients[{key}].quantity"),
            FieldPath::IngredientMeasurement(key) => {
                write!(f, "ingredients[{key}].measurement")
            }
            FieldPath::Instructions => write!(f, "instructions"),
            FieldPath::Instruction(key) => write!(f, "instructions[{key}]"),
            FieldPath::ImageUrl(key) => write!(f, "imageurl[{key}]"),
        }
    }
}

/// Field path to message map; empty when the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FieldPath, &'static str>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &FieldPath) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    pub fn contains(&self, field: &FieldPath) -> bool {
        self.errors.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldPath, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: FieldPath, message: &'static str) {
        self.errors.entry(field).or_insert(message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// Validate the draft without producing a payload.
pub fn validate(draft: &RecipeDraft) -> ValidationErrors {
    check(draft).err().unwrap_or_default()
}

/// Validate the draft and, if every rule passes, build the request body.
pub fn check(draft: &RecipeDraft) -> Result<RecipePayload, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if let Some(message) = required_text(&draft.title) {
        errors.insert(FieldPath::Title, message);
    }
    if let Some(message) = required_text(&draft.cuisine) {
        errors.insert(FieldPath::Cuisine, message);
    }
    if draft.description.chars().count() > MAX_DESCRIPTION_CHARS {
        errors.insert(FieldPath::Description, TOO_LONG);
    }

    if draft.ingredients.is_empty() {
        errors.insert(FieldPath::Ingredients, NO_INGREDIENTS);
    }
    let mut ingredients = Vec::with_capacity(draft.ingredients.len());
    for (key, ingredient) in draft.ingredients.iter() {
        if let Some(message) = required_text(&ingredient.name) {
            errors.insert(FieldPath::IngredientName(key), message);
        }
        match parse_quantity(&ingredient.quantity) {
            Ok(quantity) => ingredients.push(IngredientPayload {
                name: ingredient.name.clone(),
                quantity,
                measurement: ingredient.measurement.clone(),
            }),
            Err(message) => errors.insert(FieldPath::IngredientQuantity(key), message),
        }
    }

    if draft.instructions.is_empty() {
        errors.insert(FieldPath::Instructions, NO_INSTRUCTIONS);
    }
    for (key, instruction) in draft.instructions.iter() {
        if instruction.is_empty() {
            errors.insert(FieldPath::Instruction(key), REQUIRED);
        }
    }

    // Blank URL slots are accepted; only filled-in entries are checked.
    for (key, url) in draft.image_urls.iter() {
        if !url.is_empty() && !is_valid_url(url) {
            errors.insert(FieldPath::ImageUrl(key), INVALID_URL);
        }
    }

    if !errors.is_empty() {
        debug!("Draft failed validation with {} errors", errors.len());
        return Err(errors);
    }

    Ok(RecipePayload {
        owner: draft.owner.clone(),
        title: draft.title.clone(),
        cuisine: draft.cuisine.clone(),
        description: draft.description.clone(),
        ingredients,
        instructions: draft.instructions.values().cloned().collect(),
        image_urls: draft.image_urls.values().cloned().collect(),
        image_file: draft.image_file.clone().unwrap_or_default(),
    })
}

/// Validate a single field of the draft.
pub fn validate_field(draft: &RecipeDraft, field: FieldPath) -> Option<&'static str> {
    validate(draft).get(&field)
}

fn required_text(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some(REQUIRED)
    } else if value.chars().count() < MIN_TEXT_CHARS {
        Some(TOO_SHORT)
    } else {
        None
    }
}

/// Parse a quantity the way a numeric text input is read: interior and
/// surrounding whitespace is ignored, and the result must be finite and > 0.
///
/// Only a truly empty value is "required"; whitespace alone is not a number.
pub fn parse_quantity(raw: &str) -> Result<f64, &'static str> {
    if raw.is_empty() {
        return Err(REQUIRED);
    }
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(NOT_A_NUMBER);
    }
    let value: f64 = compact.parse().map_err(|_| NOT_A_NUMBER)?;
    if !value.is_finite() {
        return Err(NOT_A_NUMBER);
    }
    if value <= 0.0 {
        return Err(NOT_POSITIVE);
    }
    Ok(value)
}

/// Absolute http, https or ftp URL with a host and no embedded whitespace.
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    match Url::parse(candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https" | "ftp")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ingredient, UserReference};

    fn valid_draft() -> RecipeDraft {
        let mut draft = RecipeDraft::new(UserReference::default());
        draft.title = "Pasta".to_string();
        draft.cuisine = "Italian".to_string();
        let first = draft.ingredients.first_key().unwrap();
        *draft.ingredients.get_mut(first).unwrap() = Ingredient::new("Flour", "2", "cups");
        let first = draft.instructions.first_key().unwrap();
        *draft.instructions.get_mut(first).unwrap() = "Mix well".to_string();
        draft
    }

    #[test]
    fn test_valid_draft_has_no_errors() {
        let draft = valid_draft();
        assert!(validate(&draft).is_empty());
        let payload = check(&draft).unwrap();
        assert_eq!(payload.ingredients[0].quantity, 2.0);
        assert_eq!(payload.image_urls, vec![String::new()]);
    }

    #[test]
    fn test_empty_draft_reports_required_fields() {
        let draft = RecipeDraft::new(UserReference::default());
        let errors = validate(&draft);
        let ingredient = draft.ingredients.first_key().unwrap();
        let instruction = draft.instructions.first_key().unwrap();

        assert_eq!(errors.get(&FieldPath::Title), Some(REQUIRED));
        assert_eq!(errors.get(&FieldPath::Cuisine), Some(REQUIRED));
        assert_eq!(errors.get(&FieldPath::IngredientName(ingredient)), Some(REQUIRED));
        assert_eq!(errors.get(&FieldPath::IngredientQuantity(ingredient)), Some(REQUIRED));
        assert_eq!(errors.get(&FieldPath::Instruction(instruction)), Some(REQUIRED));
        assert!(!errors.contains(&FieldPath::Description));
    }

    #[test]
    fn test_short_title_and_cuisine() {
        let mut draft = valid_draft();
        draft.title = "Pa".to_string();
        draft.cuisine = "It".to_string();
        let errors = validate(&draft);
        assert_eq!(errors.get(&FieldPath::Title), Some(TOO_SHORT));
        assert_eq!(errors.get(&FieldPath::Cuisine), Some(TOO_SHORT));
    }

    #[test]
    fn test_description_length_limit_counts_characters() {
        let mut draft = valid_draft();
        draft.description = "é".repeat(100);
        assert!(validate(&draft).is_empty());
        draft.description.push('é');
        assert_eq!(validate(&draft).get(&FieldPath::Description), Some(TOO_LONG));
    }

    #[test]
    fn test_quantity_parsing() {
        assert_eq!(parse_quantity("2.5"), Ok(2.5));
        assert_eq!(parse_quantity(" 3 "), Ok(3.0));
        assert_eq!(parse_quantity("-1"), Err(NOT_POSITIVE));
        assert_eq!(parse_quantity("0"), Err(NOT_POSITIVE));
        assert_eq!(parse_quantity("abc"), Err(NOT_A_NUMBER));
        assert_eq!(parse_quantity("inf"), Err(NOT_A_NUMBER));
        assert_eq!(parse_quantity(""), Err(REQUIRED));
        assert_eq!(parse_quantity("   "), Err(NOT_A_NUMBER));
        assert_eq!(parse_quantity("\t"), Err(NOT_A_NUMBER));
    }

    #[test]
    fn test_missing_rows_are_reported() {
        let mut draft = valid_draft();
        draft.ingredients = crate::rows::RowList::from_values(Vec::new());
        draft.instructions = crate::rows::RowList::from_values(Vec::new());
        let errors = validate(&draft);
        assert_eq!(errors.get(&FieldPath::Ingredients), Some(NO_INGREDIENTS));
        assert_eq!(errors.get(&FieldPath::Instructions), Some(NO_INSTRUCTIONS));
    }

    #[test]
    fn test_url_rules() {
        assert!(is_valid_url("https://example.com/pasta.jpg"));
        assert!(is_valid_url("ftp://files.example.com/a.png"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.com/pasta.jpg"));
        assert!(!is_valid_url("mailto:chef@example.com"));
        assert!(!is_valid_url("https://example.com/a b.jpg"));
    }

    #[test]
    fn test_blank_image_url_passes_but_bad_one_fails() {
        let mut draft = valid_draft();
        let bad = draft.image_urls.append("nope".to_string());
        let errors = validate(&draft);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(&FieldPath::ImageUrl(bad)), Some(INVALID_URL));
    }

    #[test]
    fn test_field_path_display_uses_row_keys() {
        let draft = valid_draft();
        let key = draft.ingredients.first_key().unwrap();
        assert_eq!(
            FieldPath::IngredientQuantity(key).to_string(),
            "ingredients[row-0].quantity"
        );
        assert_eq!(FieldPath::Title.label(), "Recipe*");
        assert_eq!(FieldPath::IngredientQuantity(key).row(), Some(key));
    }
}
