use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};
use recipe_form::{
    FileSelection, FormConfig, LocalImageFile, Navigator, RecipeClient, RecipeForm, SubmitPhase,
    UserReference, PAGE_TITLE,
};

/// Fill in the new-recipe form from a JSON draft and submit it
#[derive(Parser, Debug)]
#[command(name = "recipe-form", version, about)]
struct Args {
    /// JSON draft using the backend field names (recipe, cuisine, ingredients, ...)
    draft: PathBuf,

    /// Image file to attach as a data URL
    #[arg(long)]
    image: Option<PathBuf>,

    /// Backend base URL (overrides RECIPE_FORM__BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Owner reference as JSON, used when the draft has none
    #[arg(long)]
    owner: Option<String>,

    /// Only validate the draft, do not submit
    #[arg(long)]
    check: bool,
}

/// Prints the route the browser would be sent to.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&mut self, path: &str) {
        println!("{}", path);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = FormConfig::load()?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    debug!("Using config: {:?}", config);

    let owner = match args.owner {
        Some(raw) => UserReference::new(serde_json::from_str(&raw)?),
        None => UserReference::default(),
    };
    let document = tokio::fs::read_to_string(&args.draft).await?;
    let mut form = RecipeForm::builder()
        .config(config)
        .owner(owner)
        .draft_json(document)
        .build()?;

    eprintln!("{}", PAGE_TITLE);

    if let Some(path) = args.image {
        let file = LocalImageFile::open(&path).await?;
        if form.select_image_file(&file).await == FileSelection::Cleared {
            if let Some(message) = form.error_message() {
                eprintln!("{}", message);
            }
            return Ok(ExitCode::FAILURE);
        }
    }

    if args.check {
        let errors = form.errors();
        if errors.is_empty() {
            eprintln!("Draft is valid");
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("{}", errors);
        return Ok(ExitCode::FAILURE);
    }

    let client = RecipeClient::new(form.config())?;
    match form.submit(&client, &mut PrintNavigator).await {
        SubmitPhase::Succeeded(_) => Ok(ExitCode::SUCCESS),
        _ => {
            for (field, message) in form.visible_errors() {
                eprintln!("{} ({}): {}", field.label(), field, message);
            }
            if let Some(message) = form.error_message() {
                error!("{}", message);
                eprintln!("{}", message);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
