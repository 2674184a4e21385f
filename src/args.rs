use clap::{Args, Parser, Subcommand};

use crate::listings::criteria::{parse_minimum, FilterCriteria, PriceRange};

#[derive(Parser, Debug)]
#[command(name = "brokerage-site")]
#[command(about = "Brantford listings site and listings API tools")]
#[command(version)]
pub struct Cli {
    /// Settings file without extension (TOML, YAML or JSON); missing is fine
    #[arg(short, long, default_value = "config/settings")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web site (default)
    Serve {
        /// Overrides server.addr
        #[arg(long)]
        addr: Option<String>,
    },

    /// Print one page of a search with reconciled totals
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print reconciled totals for a search
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Look up one listing and its similar listings
    Listing { mls_number: String },

    /// Load a search for the map, then read viewport JSON lines from stdin
    /// and print what each settled viewport shows
    Viewport {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Free-text search (address or MLS number)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Price range as "min-max", e.g. 300000-500000
    #[arg(long)]
    pub price: Option<String>,

    /// Minimum bedrooms, e.g. 3 or 3+
    #[arg(long)]
    pub beds: Option<String>,

    /// Minimum bathrooms
    #[arg(long)]
    pub baths: Option<String>,

    #[arg(long = "type")]
    pub property_type: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            price_range: self.price.as_deref().and_then(PriceRange::parse),
            bedrooms: self.beds.as_deref().and_then(parse_minimum),
            bathrooms: self.baths.as_deref().and_then(parse_minimum),
            property_type: self.property_type.clone(),
            query: self.query.clone(),
        }
    }
}
