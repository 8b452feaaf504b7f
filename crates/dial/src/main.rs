use clap::{Parser, Subcommand};
use dial::countries::CountryCatalog;
use dial::format;
use dial::plan::PlanConfig;
use dial::store::PlanSelection;

#[derive(Parser, Debug)]
#[command(name = "dial", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Preset quantities in ascending order (e.g. 5,10,15,20)
    #[arg(short = 's', long, value_delimiter = ',', global = true)]
    shortcuts: Option<Vec<f64>>,

    /// Two-letter code of the country the plan is for
    #[arg(short = 'c', long, global = true)]
    country: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show usage estimates and price for a quantity.
    Quote { quantity: f64 },
    /// Select by dial position, as a drag would, and show where it lands.
    Drag { fraction: f64 },
    /// List countries, optionally filtered by name
    Countries {
        #[arg(short = 'q', long)]
        search: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = PlanConfig::default();
    if let Some(shortcuts) = cli.shortcuts {
        config.shortcuts = shortcuts;
    }
    if let Some(country) = cli.country {
        config.country = country;
    }

    let catalog = CountryCatalog::builtin()?;

    match cli.command {
        Commands::Quote { quantity } => {
            let mut store = config.build_store(catalog)?;
            store.set_by_quantity(quantity)?;
            print_selection(store.snapshot());
        }
        Commands::Drag { fraction } => {
            let mut store = config.build_store(catalog)?;
            store.set_by_fraction(fraction)?;
            print_selection(store.snapshot());
        }
        Commands::Countries { search } => {
            for country in catalog.search(search.as_deref().unwrap_or_default()) {
                println!("{}  {}", country.code, country.label());
            }
        }
    }
    Ok(())
}

fn print_selection(selection: &PlanSelection) {
    let shortcut = selection
        .active_shortcut()
        .map(|i| format::volume(selection.shortcuts.values()[i], &selection.unit))
        .unwrap_or_else(|| "-".to_string());

    println!("volume    {}", selection.volume_label());
    println!("position  {:.3}", selection.fraction);
    println!("price     {}", selection.price);
    println!("internet  {} h", selection.budgets.internet_hours);
    println!("music     {} h", selection.budgets.music_hours);
    println!("video     {} h", selection.budgets.video_hours);
    println!("preset    {shortcut}");
    println!("plan      {} on {}", selection.plan_type, selection.network);
    println!("country   {}", selection.country.label());
}
