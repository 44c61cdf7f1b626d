use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;

mod table_display;

use table_display::display_page;
use todo_grid::api_client::{spawn_initial_fetch, ApiClient};
use todo_grid::config::config::Config;
use todo_grid::data::data_view::{SortConfig, SortDirection};
use todo_grid::data::datatable::Field;
use todo_grid::state::events::StateEvent;
use todo_grid::state::table_state::TableState;
use todo_grid::ui::table_app::{run_table_app, TableApp};
use todo_grid::utils::app_paths::AppPaths;
use todo_grid::utils::logging::init_tracing;

#[derive(Debug, Default)]
struct Options {
    url: Option<String>,
    page_size: Option<usize>,
    print: bool,
    page: Option<usize>,
    search: Option<(Field, String)>,
    sort: Option<SortConfig>,
    generate_config: bool,
    help: bool,
}

fn parse_field(name: &str) -> Result<Field> {
    Field::parse(name).ok_or_else(|| anyhow!("Unknown field '{}' (expected id, userId or title)", name))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{} requires a value", flag))
        };

        match arg.as_str() {
            "--url" => options.url = Some(value("--url")?),
            "--page-size" => {
                let size: usize = value("--page-size")?
                    .parse()
                    .context("--page-size must be a number")?;
                if size == 0 {
                    bail!("--page-size must be at least 1");
                }
                options.page_size = Some(size);
            }
            "--page" => {
                options.page = Some(value("--page")?.parse().context("--page must be a number")?)
            }
            "--search" => {
                let spec = value("--search")?;
                let (field, text) = spec
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--search expects FIELD=TEXT"))?;
                options.search = Some((parse_field(field)?, text.to_string()));
            }
            "--sort" => {
                let spec = value("--sort")?;
                let (field, direction) = match spec.split_once(':') {
                    Some((field, "desc")) => (field, SortDirection::Descending),
                    Some((field, "asc")) => (field, SortDirection::Ascending),
                    Some((_, other)) => bail!("Unknown sort direction '{}'", other),
                    None => (spec.as_str(), SortDirection::Ascending),
                };
                options.sort = Some(SortConfig::new(parse_field(field)?, direction));
            }
            "--print" => options.print = true,
            "--generate-config" => options.generate_config = true,
            "-h" | "--help" => options.help = true,
            other => bail!("Unknown argument '{}' (see --help)", other),
        }
    }

    Ok(options)
}

fn print_help() {
    println!("{}", "todo-grid - interactive todo table".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  todo-grid [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}            - Fetch todos from URL", "--url URL".green());
    println!("  {}        - Rows per page", "--page-size N".green());
    println!("  {}              - Print one page and exit", "--print".green());
    println!("  {}             - Page to print", "--page N".green());
    println!("  {} - Filter, e.g. title=quis", "--search FIELD=TEXT".green());
    println!("  {} - Sort, e.g. userId:desc", "--sort FIELD[:desc]".green());
    println!("  {}    - Print a commented config file", "--generate-config".green());
    println!();
    println!("{}", "Table keys:".yellow());
    println!("  {}   - Select row / column", "arrows".green());
    println!("  {}    - Sort by selected column", "Enter".green());
    println!("  {}      - Move selected column", "< >".green());
    println!("  {}      - Edit / delete selected row", "e d".green());
    println!("  {}      - Next / previous page", "n p".green());
    println!("  {}        - Search", "/".green());
    println!("  {}        - Choose search category", "c".green());
    println!("  {}       - Diagnostics log", "F5".green());
    println!("  {}        - Quit", "q".green());
    println!();
    println!("Headers can be clicked to sort and dragged to reorder.");
}

fn main() -> Result<()> {
    let options = parse_args(std::env::args().skip(1))?;

    if options.help {
        print_help();
        return Ok(());
    }
    if options.generate_config {
        print!("{}", Config::create_default_with_comments());
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("{} {}", "Using default config:".yellow(), e);
        Config::default()
    });
    if let Some(url) = options.url {
        config.source.url = url;
    }
    if let Some(page_size) = options.page_size {
        config.display.page_size = page_size;
    }

    let log_path = init_tracing(AppPaths::log_dir().ok().as_deref());

    let mut state = TableState::new(
        config.display.page_size,
        config.behavior.default_category,
        options.sort.unwrap_or_else(|| config.behavior.initial_sort()),
    );
    let client = ApiClient::new(&config.source.url);
    let runtime = tokio::runtime::Runtime::new()?;

    if options.print {
        let records = runtime
            .block_on(client.fetch_todos())
            .with_context(|| format!("Could not load todos from {}", client.url()))?;
        state.apply(StateEvent::RecordsLoaded(records));
        if let Some((field, text)) = options.search {
            state.apply(StateEvent::CategorySelected(field));
            state.apply(StateEvent::SearchChanged(text));
        }
        if let Some(page) = options.page {
            if !state.apply(StateEvent::PageRequested(page)) && page != 1 {
                bail!("Page {} does not exist ({} pages)", page, state.total_pages());
            }
        }
        display_page(&state.view(), state.columns());
        return Ok(());
    }

    if let Some((field, text)) = options.search {
        state.apply(StateEvent::CategorySelected(field));
        state.apply(StateEvent::SearchChanged(text));
    }

    let records = spawn_initial_fetch(runtime.handle(), client);
    let app = TableApp::new(state, config.display.use_glyphs).with_pending_records(records);
    run_table_app(app)?;

    if let Some(path) = log_path {
        println!("Log written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_search_and_sort() {
        let options = parse(&["--search", "title=quis ut", "--sort", "userId:desc"]).unwrap();
        assert_eq!(options.search, Some((Field::Title, "quis ut".to_string())));
        assert_eq!(
            options.sort,
            Some(SortConfig::new(Field::UserId, SortDirection::Descending))
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&["--page-size", "0"]).is_err());
        assert!(parse(&["--sort", "completed"]).is_err());
        assert!(parse(&["--url"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }
}
