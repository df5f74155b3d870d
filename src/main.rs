use clap::{Parser, Subcommand, ValueEnum};
use recipe_box::actions::{ActionOutcome, ActionSubmitter};
use recipe_box::api::{Api, CollectionKind, SettingField};
use recipe_box::collection::CollectionController;
use recipe_box::config::{self, ClientConfig};
use recipe_box::forms::FormData;
use recipe_box::output::{self, CapturedRegion, TerminalPage};
use recipe_box::render::{render_document, render_load_error};
use recipe_box::transport::HttpTransport;
use recipe_box::types::Credentials;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let describe = env!("RECIPE_BOX_GIT_DESCRIBE");
    if describe.is_empty() || describe.trim_start_matches('v') == env!("CARGO_PKG_VERSION") {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("dev@{describe}").into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "recipe-box")]
#[command(about = "Browse, search and manage recipes on a recipe-box server")]
#[command(long_about = "\
Browse, search and manage recipes on a recipe-box server

Collections are rendered as HTML recipe cards (stdout, or --output FILE);
a numbered summary of the cards goes to stderr. Actions print what the
page would show: alerts, inline messages, navigations.

Each run is its own session. Pass --username and --password to log in
first; the session cookie then covers the command's requests.

Examples:

  recipe-box recipes --search pasta --output pasta.html
  recipe-box login --username ada --password hunter2
  recipe-box --username ada --password hunter2 cookbook
  recipe-box --username ada --password hunter2 rate \"Miso Soup\" 4
  recipe-box create-recipe --field recipe_name=Dal \\
      --field ingredients=lentils --field instructions=simmer

Run 'recipe-box gen-config' to generate a documented recipe-box.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Backend origin, overrides the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    /// Log requests and decisions to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Log in as this user before running the command
    #[arg(long, global = true, requires = "password")]
    username: Option<String>,

    /// Password for --username
    #[arg(long, global = true, requires = "username")]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that render a collection.
#[derive(clap::Args, Clone)]
struct RenderArgs {
    /// Write the rendered page here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Search all recipes
    Recipes {
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Show your saved recipes
    Cookbook(RenderArgs),
    /// Show recommendations for your diet restrictions
    Recommended(RenderArgs),
    /// Log in with --username and --password
    Login,
    /// Create an account from key=value fields
    Signup {
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Change one account setting
    Settings {
        field: SettingArg,
        #[arg(long)]
        value: String,
        /// Extra form fields, e.g. the current password
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Delete your account (asks for confirmation)
    DeleteAccount {
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Delete a recipe (asks for confirmation)
    DeleteRecipe { name: String },
    /// Add a recipe to, or remove it from, your cookbook
    ToggleCookbook { name: String },
    /// Add a recipe to your cookbook
    SaveToCookbook { name: String },
    /// Show whether a recipe is in your cookbook
    CheckCookbook { name: String },
    /// Rate a recipe
    Rate { name: String, rating: String },
    /// Create a recipe from key=value fields
    CreateRecipe {
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Run the server-side test suite
    RunTests,
    /// Print a stock recipe-box.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum SettingArg {
    Username,
    Password,
    Email,
    SecurityKey,
    DietRestrictions,
}

impl From<SettingArg> for SettingField {
    fn from(arg: SettingArg) -> Self {
        match arg {
            SettingArg::Username => SettingField::Username,
            SettingArg::Password => SettingField::Password,
            SettingArg::Email => SettingField::Email,
            SettingArg::SecurityKey => SettingField::SecurityKey,
            SettingArg::DietRestrictions => SettingField::DietRestrictions,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut client_config = config::load_config(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        client_config.base_url = base_url;
        client_config.validate()?;
    }
    tracing::info!(base_url = %client_config.base_url, "using backend");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let credentials = match (cli.username, cli.password) {
        (Some(username), Some(password)) => Some(Credentials { username, password }),
        _ => None,
    };
    let outcome = runtime.block_on(run(cli.command, credentials, &client_config, cli.yes))?;

    if let Some(summary) = outcome.and_then(output::format_action_outcome) {
        eprintln!("{summary}");
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one command. Returns the action outcome for action commands,
/// `None` for collection loads.
///
/// With credentials, every command except `login` itself first opens a
/// session on the same transport, so its requests are authenticated.
async fn run(
    command: Command,
    credentials: Option<Credentials>,
    client_config: &ClientConfig,
    assume_yes: bool,
) -> Result<Option<ActionOutcome>, Box<dyn std::error::Error>> {
    let transport = HttpTransport::new(client_config)?;
    let page = TerminalPage::new(assume_yes);
    let submitter = ActionSubmitter::new(Api::new(&transport), &page, client_config);

    if let Some(credentials) = credentials.as_ref().filter(|_| !matches!(command, Command::Login)) {
        let session = submitter.start_session(credentials).await;
        if session != ActionOutcome::Completed {
            return Ok(Some(session));
        }
    }

    let outcome = match command {
        Command::Recipes { search, render } => {
            load(&transport, CollectionKind::Recipes, search.as_deref(), &render).await?;
            return Ok(None);
        }
        Command::Cookbook(render) => {
            load(&transport, CollectionKind::Cookbook, None, &render).await?;
            return Ok(None);
        }
        Command::Recommended(render) => {
            load(&transport, CollectionKind::Recommended, None, &render).await?;
            return Ok(None);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(None);
        }
        Command::Login => match &credentials {
            Some(credentials) => submitter.login(credentials).await,
            None => return Err("login needs --username and --password".into()),
        },
        Command::Signup { fields } => submitter.signup(&FormData::from_pairs(fields)?).await,
        Command::Settings {
            field,
            value,
            fields,
        } => {
            let field = SettingField::from(field);
            let mut form = FormData::from_pairs(fields)?;
            form.push(field.form_key(), &value);
            submitter.update_setting(field, &form).await
        }
        Command::DeleteAccount { fields } => {
            submitter
                .delete_account(&FormData::from_pairs(fields)?)
                .await
        }
        Command::DeleteRecipe { name } => submitter.delete_recipe(&name).await,
        Command::ToggleCookbook { name } => submitter.toggle_cookbook(&name).await,
        Command::SaveToCookbook { name } => submitter.save_to_cookbook(&name).await,
        Command::CheckCookbook { name } => match submitter.refresh_cookbook_button(&name).await {
            Some(_) => ActionOutcome::Completed,
            None => ActionOutcome::Failed,
        },
        Command::Rate { name, rating } => {
            let form = FormData::new()
                .with("recipe_name", &name)
                .with("rating", &rating);
            submitter.submit_rating(&form).await
        }
        Command::CreateRecipe { fields } => {
            submitter
                .create_recipe(&FormData::from_pairs(fields)?)
                .await
        }
        Command::RunTests => match submitter.run_tests().await {
            Some(report) if report.passed() => ActionOutcome::Completed,
            _ => ActionOutcome::Failed,
        },
    };
    Ok(Some(outcome))
}

/// Load one collection and write it out as a standalone page.
async fn load(
    transport: &HttpTransport,
    kind: CollectionKind,
    search: Option<&str>,
    render: &RenderArgs,
) -> std::io::Result<()> {
    let controller = CollectionController::new(Api::new(transport), CapturedRegion::new());
    let outcome = controller.load_collection(kind, search).await;
    output::print_load_outcome(&outcome);

    let markup = controller
        .into_region()
        .into_markup()
        .unwrap_or_else(render_load_error);
    let title = format!("Recipe Box: {}", kind.label());
    write_page(render.output.as_deref(), &render_document(&title, markup).into_string())
}

fn write_page(path: Option<&Path>, html: &str) -> std::io::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, html)?;
            eprintln!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            println!("{html}");
            Ok(())
        }
    }
}
