//! The recipe form controller.
//!
//! [`RecipeForm`] owns the draft, which fields the user has visited, and the
//! submit lifecycle. A view layer reads its projections (values, visible
//! errors, button states, banner) and forwards user events to it.

use std::collections::HashSet;

use log::{debug, warn};

use crate::client::RecipeClient;
use crate::config::FormConfig;
use crate::error::FormError;
use crate::image::{encode_data_url, ImageFile};
use crate::model::{Ingredient, RecipeDraft, RecipePayload, UserReference};
use crate::rows::RowKey;
use crate::submit::{Navigator, SubmitMachine, SubmitPhase};
use crate::validation::{self, FieldPath, ValidationErrors};

/// Heading shown above the form.
pub const PAGE_TITLE: &str = "New Recipe";

/// The three growable lists of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Ingredients,
    Instructions,
    ImageUrls,
}

impl ListKind {
    /// Label of the button that appends a row.
    pub fn add_label(&self) -> &'static str {
        match self {
            ListKind::Ingredients => "Add Ingredient",
            ListKind::Instructions => "Add Instruction",
            ListKind::ImageUrls => "Add Image",
        }
    }

    fn owns(&self, field: &FieldPath, key: RowKey) -> bool {
        match (self, field) {
            (
                ListKind::Ingredients,
                FieldPath::IngredientName(k)
                | FieldPath::IngredientQuantity(k)
                | FieldPath::IngredientMeasurement(k),
            ) => *k == key,
            (ListKind::Instructions, FieldPath::Instruction(k)) => *k == key,
            (ListKind::ImageUrls, FieldPath::ImageUrl(k)) => *k == key,
            _ => false,
        }
    }
}

/// What the host should do with the file input after a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSelection {
    /// The image was encoded into the draft.
    Accepted,
    /// The image was rejected; clear the file input. The reason is in the banner.
    Cleared,
}

#[derive(Debug)]
pub struct RecipeForm {
    draft: RecipeDraft,
    touched: HashSet<FieldPath>,
    submit: SubmitMachine,
    config: FormConfig,
}

impl RecipeForm {
    /// A fresh form for `owner` with one blank row in each list.
    pub fn new(owner: UserReference, config: FormConfig) -> Self {
        Self::from_draft(RecipeDraft::new(owner), config)
    }

    /// Start from an existing draft.
    pub fn from_draft(draft: RecipeDraft, config: FormConfig) -> Self {
        RecipeForm {
            draft,
            touched: HashSet::new(),
            submit: SubmitMachine::default(),
            config,
        }
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    // ----- scalar fields -----

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.draft.title = value.into();
    }

    pub fn set_cuisine(&mut self, value: impl Into<String>) {
        self.draft.cuisine = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
    }

    // ----- row fields -----

    /// Edit one ingredient row. Returns false if the row does not exist.
    pub fn edit_ingredient(&mut self, key: RowKey, edit: impl FnOnce(&mut Ingredient)) -> bool {
        match self.draft.ingredients.get_mut(key) {
            Some(ingredient) => {
                edit(ingredient);
                true
            }
            None => false,
        }
    }

    pub fn set_ingredient_name(&mut self, key: RowKey, value: impl Into<String>) -> bool {
        let value = value.into();
        self.edit_ingredient(key, |i| i.name = value)
    }

    pub fn set_ingredient_quantity(&mut self, key: RowKey, value: impl Into<String>) -> bool {
        let value = value.into();
        self.edit_ingredient(key, |i| i.quantity = value)
    }

    pub fn set_ingredient_measurement(&mut self, key: RowKey, value: impl Into<String>) -> bool {
        let value = value.into();
        self.edit_ingredient(key, |i| i.measurement = value)
    }

    pub fn set_instruction(&mut self, key: RowKey, value: impl Into<String>) -> bool {
        match self.draft.instructions.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn set_image_url(&mut self, key: RowKey, value: impl Into<String>) -> bool {
        match self.draft.image_urls.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    // ----- list editing -----

    /// Keys of the rows of `kind`, in display order.
    pub fn row_keys(&self, kind: ListKind) -> Vec<RowKey> {
        match kind {
            ListKind::Ingredients => self.draft.ingredients.keys().collect(),
            ListKind::Instructions => self.draft.instructions.keys().collect(),
            ListKind::ImageUrls => self.draft.image_urls.keys().collect(),
        }
    }

    pub fn row_count(&self, kind: ListKind) -> usize {
        match kind {
            ListKind::Ingredients => self.draft.ingredients.len(),
            ListKind::Instructions => self.draft.instructions.len(),
            ListKind::ImageUrls => self.draft.image_urls.len(),
        }
    }

    /// Whether the add button for any list is enabled.
    pub fn can_add_row(&self) -> bool {
        self.submit.is_idle()
    }

    /// Append a blank row. Disabled while a submit is in flight and after
    /// the recipe was created.
    pub fn add_row(&mut self, kind: ListKind) -> Option<RowKey> {
        if !self.can_add_row() {
            return None;
        }
        let key = match kind {
            ListKind::Ingredients => self.draft.ingredients.append(Ingredient::default()),
            ListKind::Instructions => self.draft.instructions.append(String::new()),
            ListKind::ImageUrls => self.draft.image_urls.append(String::new()),
        };
        debug!("Added {:?} row {}", kind, key);
        Some(key)
    }

    /// Whether a delete button is shown and enabled for this row.
    pub fn can_remove_row(&self, kind: ListKind, key: RowKey) -> bool {
        if !self.submit.is_idle() {
            return false;
        }
        match kind {
            ListKind::Ingredients => self.draft.ingredients.is_removable(key),
            ListKind::Instructions => self.draft.instructions.is_removable(key),
            ListKind::ImageUrls => self.draft.image_urls.is_removable(key),
        }
    }

    /// Remove a row. The first row and any row during a submit are kept.
    pub fn remove_row(&mut self, kind: ListKind, key: RowKey) -> bool {
        if !self.can_remove_row(kind, key) {
            return false;
        }
        let removed = match kind {
            ListKind::Ingredients => self.draft.ingredients.remove(key),
            ListKind::Instructions => self.draft.instructions.remove(key),
            ListKind::ImageUrls => self.draft.image_urls.remove(key),
        };
        if removed {
            self.touched.retain(|field| !kind.owns(field, key));
            debug!("Removed {:?} row {}", kind, key);
        }
        removed
    }

    // ----- validation display -----

    /// Mark a field as visited so its error becomes visible.
    pub fn touch(&mut self, field: FieldPath) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: &FieldPath) -> bool {
        self.touched.contains(field)
    }

    /// Every current validation error, visited or not.
    pub fn errors(&self) -> ValidationErrors {
        validation::validate(&self.draft)
    }

    /// Error to show next to `field`, if it was visited and is invalid.
    pub fn visible_error(&self, field: FieldPath) -> Option<&'static str> {
        if !self.is_touched(&field) {
            return None;
        }
        validation::validate_field(&self.draft, field)
    }

    /// All errors on visited fields.
    pub fn visible_errors(&self) -> Vec<(FieldPath, &'static str)> {
        self.errors()
            .iter()
            .filter(|(field, _)| self.is_touched(field))
            .collect()
    }

    fn touch_all(&mut self) {
        let mut fields = vec![
            FieldPath::Title,
            FieldPath::Cuisine,
            FieldPath::Description,
            FieldPath::Ingredients,
            FieldPath::Instructions,
        ];
        for key in self.draft.ingredients.keys() {
            fields.push(FieldPath::IngredientName(key));
            fields.push(FieldPath::IngredientQuantity(key));
            fields.push(FieldPath::IngredientMeasurement(key));
        }
        fields.extend(self.draft.instructions.keys().map(FieldPath::Instruction));
        fields.extend(self.draft.image_urls.keys().map(FieldPath::ImageUrl));
        self.touched.extend(fields);
    }

    // ----- image upload -----

    /// Encode the picked image into the draft.
    ///
    /// Oversized or unreadable files leave the draft untouched and put the
    /// reason in the banner.
    pub async fn select_image_file(&mut self, file: &dyn ImageFile) -> FileSelection {
        match encode_data_url(file, self.config.max_image_bytes).await {
            Ok(data_url) => {
                self.draft = RecipeDraft {
                    image_file: Some(data_url),
                    ..self.draft.clone()
                };
                FileSelection::Accepted
            }
            Err(err) => {
                warn!("Image {} rejected: {}", file.name(), err);
                self.submit.report(err);
                FileSelection::Cleared
            }
        }
    }

    pub fn clear_image_file(&mut self) {
        self.draft.image_file = None;
    }

    // ----- submission -----

    pub fn phase(&self) -> &SubmitPhase {
        self.submit.phase()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_submitting()
    }

    pub fn can_submit(&self) -> bool {
        self.submit.is_idle()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Submitting"
        } else {
            "Submit"
        }
    }

    /// Page-level banner text.
    pub fn error_message(&self) -> Option<String> {
        self.submit.error_message()
    }

    /// Validate and enter Submitting, returning the body to send.
    ///
    /// Every field is marked visited so all errors show. The banner from a
    /// previous attempt is cleared.
    ///
    /// # Errors
    /// - [`FormError::SubmitInFlight`] if a request is already running
    /// - [`FormError::AlreadySubmitted`] once the recipe has been created
    /// - [`FormError::Validation`] if any rule fails; the form stays Idle
    pub fn begin_submit(&mut self) -> Result<RecipePayload, FormError> {
        match self.phase() {
            SubmitPhase::Idle => {}
            SubmitPhase::Submitting => return Err(FormError::SubmitInFlight),
            SubmitPhase::Succeeded(_) => return Err(FormError::AlreadySubmitted),
        }
        self.touch_all();
        self.submit.clear_error();

        let payload = validation::check(&self.draft).map_err(FormError::Validation)?;
        self.submit.start()?;
        Ok(payload)
    }

    /// Record the backend's answer. On success the navigator is sent to the
    /// new recipe's detail route.
    pub fn finish_submit(
        &mut self,
        result: Result<String, FormError>,
        navigator: &mut dyn Navigator,
    ) -> &SubmitPhase {
        if let Some(id) = self.submit.finish(result) {
            let path = self.config.detail_path(id);
            debug!("Navigating to {}", path);
            navigator.navigate(&path);
        }
        self.submit.phase()
    }

    /// Run a whole submit: validate, POST, then navigate or show the error.
    ///
    /// Returns the resulting phase. Validation failures keep the form Idle
    /// with errors visible on every field.
    pub async fn submit(
        &mut self,
        client: &RecipeClient,
        navigator: &mut dyn Navigator,
    ) -> SubmitPhase {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(err) => {
                debug!("Submit not started: {}", err);
                return self.phase().clone();
            }
        };
        let result = client.create(&payload).await;
        self.finish_submit(result, navigator).clone()
    }
}
