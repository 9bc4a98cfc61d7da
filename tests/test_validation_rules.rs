use recipe_form::validation::{
    check, validate, INVALID_URL, NOT_A_NUMBER, NOT_POSITIVE, NO_INGREDIENTS, REQUIRED, TOO_LONG,
    TOO_SHORT,
};
use recipe_form::{FieldPath, Ingredient, RecipeDraft, RowList, UserReference};

fn draft_with(ingredients: Vec<Ingredient>, instructions: Vec<&str>) -> RecipeDraft {
    let mut draft = RecipeDraft::new(UserReference::default());
    draft.title = "Shakshuka".to_string();
    draft.cuisine = "Tunisian".to_string();
    draft.ingredients = RowList::from_values(ingredients);
    draft.instructions = RowList::from_values(instructions.into_iter().map(String::from));
    draft
}

#[test]
fn test_valid_drafts_have_no_errors() {
    let drafts = vec![
        draft_with(vec![Ingredient::new("Eggs", "4", "")], vec!["Crack eggs"]),
        draft_with(
            vec![
                Ingredient::new("Tomatoes", "2.5", "cups"),
                Ingredient::new("Paprika", "0.5", "tsp"),
                Ingredient::new("Cumin", "1e-1", "tsp"),
            ],
            vec!["Simmer the sauce", "Add eggs", "Cover"],
        ),
    ];

    for mut draft in drafts {
        draft.description = "x".repeat(100);
        draft.image_urls = RowList::from_values(vec![
            "https://example.com/a.jpg".to_string(),
            String::new(),
        ]);
        let errors = validate(&draft);
        assert!(errors.is_empty(), "unexpected errors: {}", errors);
    }
}

#[test]
fn test_quantity_rules() {
    for (quantity, expected) in [
        ("-1", Some(NOT_POSITIVE)),
        ("abc", Some(NOT_A_NUMBER)),
        ("", Some(REQUIRED)),
        ("   ", Some(NOT_A_NUMBER)),
        ("2.5", None),
    ] {
        let draft = draft_with(vec![Ingredient::new("Flour", quantity, "")], vec!["Mix"]);
        let key = draft.ingredients.first_key().unwrap();
        assert_eq!(
            validate(&draft).get(&FieldPath::IngredientQuantity(key)),
            expected,
            "quantity {:?}",
            quantity
        );
    }
}

#[test]
fn test_ingredient_name_and_measurement() {
    let draft = draft_with(
        vec![
            Ingredient::new("Oil", "1", ""),
            Ingredient::new("Eg", "1", ""),
        ],
        vec!["Fry"],
    );
    let keys: Vec<_> = draft.ingredients.keys().collect();
    let errors = validate(&draft);

    assert!(!errors.contains(&FieldPath::IngredientName(keys[0])));
    assert_eq!(errors.get(&FieldPath::IngredientName(keys[1])), Some(TOO_SHORT));
    assert!(!errors.contains(&FieldPath::IngredientMeasurement(keys[0])));
}

#[test]
fn test_description_over_limit() {
    let mut draft = draft_with(vec![Ingredient::new("Eggs", "4", "")], vec!["Crack eggs"]);
    draft.description = "x".repeat(101);
    assert_eq!(validate(&draft).get(&FieldPath::Description), Some(TOO_LONG));
}

#[test]
fn test_no_ingredients() {
    let draft = draft_with(Vec::new(), vec!["Nothing to do"]);
    assert_eq!(validate(&draft).get(&FieldPath::Ingredients), Some(NO_INGREDIENTS));
}

#[test]
fn test_invalid_image_url_is_keyed_to_its_row() {
    let mut draft = draft_with(vec![Ingredient::new("Eggs", "4", "")], vec!["Crack eggs"]);
    let bad = draft.image_urls.append("www.example.com/pic.png".to_string());
    let errors = validate(&draft);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(&FieldPath::ImageUrl(bad)), Some(INVALID_URL));
}

#[test]
fn test_check_builds_payload_in_row_order() {
    let draft = draft_with(
        vec![
            Ingredient::new("Tomatoes", "3", ""),
            Ingredient::new("Eggs", "4", "large"),
        ],
        vec!["Cook tomatoes", "Add eggs"],
    );
    let payload = check(&draft).unwrap();

    assert_eq!(payload.title, "Shakshuka");
    assert_eq!(payload.ingredients[1].name, "Eggs");
    assert_eq!(payload.ingredients[1].quantity, 4.0);
    assert_eq!(payload.ingredients[1].measurement, "large");
    assert_eq!(payload.instructions, vec!["Cook tomatoes", "Add eggs"]);
    assert_eq!(payload.image_file, "");
}

#[test]
fn test_validation_does_not_mutate_draft() {
    let draft = draft_with(vec![Ingredient::new("Eggs", " 4 ", "")], vec![""]);
    let before = format!("{:?}", draft);
    let _ = validate(&draft);
    let _ = check(&draft);
    assert_eq!(format!("{:?}", draft), before);
}
