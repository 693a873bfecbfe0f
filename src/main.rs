mod active_filters;
mod booking;
mod catalog;
mod config;
mod error;
mod filter;
mod logging;
mod models;
mod notify;
mod profile;
mod query;
mod screen;
mod tui;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use booking::{BookingFlow, BookingStep, Calendar, TIMEZONES, TIME_SLOTS};
use catalog::Catalog;
use config::Config;
use filter::FilterCriteria;
use models::{CompanyType, MentorRecord, RatingSort, Role, Slot};
use profile::{services_for_tab, stars, ServiceTab};
use screen::MentorsScreen;

#[derive(Parser)]
#[command(name = "mentors")]
#[command(about = "Browse mentors, filter them, and book their services")]
struct Cli {
    /// Path to a catalog JSON file (overrides MENTORS_CATALOG and config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List mentors matching a search and filters
    List {
        /// Case-insensitive text matched against name, company, title and bio
        #[arg(short, long, default_value = "")]
        search: String,

        /// Role filter, repeatable (se-sde, ds-ai-ml, product, design, devops)
        #[arg(short, long)]
        role: Vec<Role>,

        /// Company type filter, repeatable (faang, startups, mncs, others)
        #[arg(short, long)]
        company: Vec<CompanyType>,

        /// Availability (this-week, next-week, anytime)
        #[arg(long)]
        slot: Option<Slot>,

        /// Rating order (low-to-high, high-to-low)
        #[arg(long)]
        sort: Option<RatingSort>,
    },

    /// Show a mentor profile
    Show {
        /// Mentor ID
        id: i64,

        /// Service tab (all, call, dm, package, webinar, product)
        #[arg(short, long, default_value = "all")]
        tab: ServiceTab,
    },

    /// Book one of a mentor's services
    Book {
        /// Mentor ID
        mentor_id: i64,

        /// Service ID on that mentor's profile
        service_id: i64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Time slot, e.g. "6:00 - 6:30PM"
        #[arg(short, long)]
        time: Option<String>,

        /// Timezone id (ist, utc, gmt, est, pst, sgt)
        #[arg(short = 'z', long)]
        timezone: Option<String>,

        /// Question for the mentor (priority DMs)
        #[arg(short, long)]
        question: Option<String>,

        /// Show the calendar this many months after (or before, if negative) the date
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        month_offset: i32,
    },

    /// Print the filter vocabularies and timezones
    Facets,

    /// Browse mentors interactively
    Browse,

    /// Validate a catalog file
    Check {
        /// Catalog JSON file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let _log_guard = match cli.command {
        Commands::Browse => {
            let dir = config::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("logs");
            Some(logging::init_to_file(cli.verbose, &dir)?)
        }
        _ => {
            logging::init(cli.verbose)?;
            None
        }
    };

    match cli.command {
        Commands::List {
            search,
            role,
            company,
            slot,
            sort,
        } => {
            let catalog = open_catalog(&config, cli.catalog.as_deref())?;
            let criteria = build_criteria(search, &role, &company, slot, sort);
            print_list(&catalog, &criteria);
        }

        Commands::Show { id, tab } => {
            let catalog = open_catalog(&config, cli.catalog.as_deref())?;
            let mentor = catalog
                .get(id)
                .ok_or_else(|| anyhow!("Mentor #{} not found", id))?;
            print_profile(mentor, tab);
        }

        Commands::Book {
            mentor_id,
            service_id,
            date,
            time,
            timezone,
            question,
            month_offset,
        } => {
            let catalog = open_catalog(&config, cli.catalog.as_deref())?;
            let mentor = catalog
                .get(mentor_id)
                .ok_or_else(|| anyhow!("Mentor #{} not found", mentor_id))?;
            let service = mentor.service(service_id).ok_or_else(|| {
                anyhow!("Service #{} not found for {}", service_id, mentor.name)
            })?;

            let today = chrono::Local::now().date_naive();
            let mut flow = BookingFlow::new(service, today, &config.default_timezone)
                .context("Invalid default_timezone in config")?;
            if let Some(date) = date {
                flow.select_date(date)?;
            }
            if let Some(tz) = timezone {
                flow.select_timezone(&tz)?;
            }
            if let Some(slot) = time {
                flow.select_time_slot(&slot)?;
            }
            if let Some(q) = question {
                flow.set_question(q);
            }
            print_booking(mentor, &flow, month_offset);
        }

        Commands::Facets => print_facets(),

        Commands::Browse => {
            let catalog = open_catalog(&config, cli.catalog.as_deref())?;
            let screen = MentorsScreen::new(catalog, Duration::from_millis(config.toast_duration_ms));
            tui::run_browse(screen)?;
        }

        Commands::Check { path } => {
            let catalog = Catalog::load(&path)
                .with_context(|| format!("Catalog {} is invalid", path.display()))?;
            if catalog.is_empty() {
                println!("{}: catalog has no mentors", path.display());
                return Ok(());
            }
            println!("{}: {} mentor(s)", path.display(), catalog.len());
            let warnings = catalog.vocabulary_warnings();
            if warnings.is_empty() {
                println!("All role, company type and availability values are filterable.");
            } else {
                println!("\nValues outside the filter vocabularies (never matched by a filter):");
                for w in warnings {
                    println!("  #{:<4} {:<14} {}", w.mentor_id, w.field, w.value);
                }
            }
        }
    }

    Ok(())
}

fn open_catalog(config: &Config, cli_override: Option<&Path>) -> Result<Catalog> {
    let path = config.catalog_path(cli_override);
    Catalog::open(path.as_deref())
}

fn build_criteria(
    search: String,
    roles: &[Role],
    companies: &[CompanyType],
    slot: Option<Slot>,
    sort: Option<RatingSort>,
) -> FilterCriteria {
    let mut criteria = FilterCriteria::new();
    criteria.set_search_term(search);
    for role in roles {
        if !criteria.selected_roles().contains(role) {
            criteria.toggle_role(*role);
        }
    }
    for company in companies {
        if !criteria.selected_company_types().contains(company) {
            criteria.toggle_company_type(*company);
        }
    }
    if let Some(slot) = slot {
        criteria.toggle_slot(slot);
    }
    if let Some(sort) = sort {
        criteria.toggle_rating_sort(sort);
    }
    criteria
}

fn print_list(catalog: &Catalog, criteria: &FilterCriteria) {
    let tags = active_filters::active_tags(criteria);
    if !tags.is_empty() {
        let chips: Vec<String> = tags.iter().map(|t| format!("[{}]", t.label)).collect();
        println!("Filters: {}\n", chips.join(" "));
    }

    let result = query::evaluate(catalog.mentors(), criteria);
    if result.is_empty {
        println!("{}", notify::NO_RESULTS_MESSAGE);
        return;
    }

    println!(
        "{:<5} {:<18} {:<14} {:<10} {:<10} {:<10} {:>6}",
        "ID", "NAME", "COMPANY", "ROLE", "TYPE", "SLOT", "RATING"
    );
    println!("{}", "-".repeat(79));
    for m in &result.mentors {
        println!(
            "{:<5} {:<18} {:<14} {:<10} {:<10} {:<10} {:>6.1}",
            m.id,
            truncate(&m.name, 16),
            truncate(&m.company, 12),
            m.role,
            m.company_type,
            m.availability,
            m.rating
        );
    }
}

fn print_profile(mentor: &MentorRecord, tab: ServiceTab) {
    let verified = if mentor.is_verified { " (verified)" } else { "" };
    println!("{}{}", mentor.name, verified);
    println!("{} at {}", mentor.title, mentor.company);
    println!(
        "{} {:.1}  {} Reviews  {} Sessions",
        stars(mentor.rating),
        mentor.rating,
        mentor.reviews,
        mentor.sessions
    );
    println!();
    println!("{}", textwrap::fill(&mentor.bio, 78));

    println!("\n--- Services: {} ---", tab.label());
    let services = services_for_tab(&mentor.services, tab);
    if services.is_empty() {
        println!("Nothing offered here yet.");
    }
    for service in services {
        println!(
            "\n#{} {}\n   {} | {} | Rs {}",
            service.id,
            service.title,
            service.kind.type_label(),
            service.kind.detail_label(),
            service.amount
        );
        for line in textwrap::fill(&service.description, 74).lines() {
            println!("   {}", line);
        }
    }

    if !mentor.testimonials.is_empty() {
        println!("\n--- Reviews ---");
        for review in &mentor.testimonials {
            let author = review.author.as_deref().unwrap_or("Anonymous");
            println!("\n{} {:.1} - {}", stars(review.rating), review.rating, author);
            for line in textwrap::fill(&review.content, 74).lines() {
                println!("   {}", line);
            }
        }
    }
}

fn print_booking(mentor: &MentorRecord, flow: &BookingFlow, month_offset: i32) {
    let service = flow.service();
    println!("{} with {}", service.title, mentor.name);
    println!(
        "Service type: {}  |  {}  |  Amount: Rs {}",
        service.kind.type_label(),
        service.kind.detail_label(),
        service.amount
    );
    println!();

    match flow.confirm() {
        Ok(summary) => {
            println!("Booking confirmed: {} ({})", summary.service_title, summary.service_type);
            if let Some(date) = summary.date {
                println!("  Date:     {}", booking::format_booking_date(date));
            }
            if let Some(slot) = &summary.time_slot {
                println!("  Time:     {}", slot);
            }
            if let Some(tz) = summary.timezone {
                println!("  Timezone: {}", tz);
            }
            if let Some(q) = &summary.question {
                println!("  Question: {}", q);
            }
            println!("  Amount:   Rs {}", summary.amount);
        }
        Err(reason) => {
            println!("Cannot confirm yet: {}", reason);
            if flow.current_step() == BookingStep::TimeSlot {
                println!();
                let calendar = Calendar::new(flow.date()).shifted(month_offset);
                print_calendar(&calendar, flow.date());
                println!("\nTime slots for {}:", booking::format_booking_date(flow.date()));
                for slot in TIME_SLOTS {
                    println!("  {}", slot);
                }
                println!("\nTimezone: {}", flow.timezone().label);
                println!("Pick one with --time \"<slot>\"");
            } else if flow.current_step() == BookingStep::Question {
                println!("Add your question with --question \"<text>\"");
            }
        }
    }
}

fn print_calendar(calendar: &Calendar, selected: NaiveDate) {
    println!("{}", calendar.title());
    println!("Su  Mo  Tu  We  Th  Fr  Sa");
    let mut line = "    ".repeat(calendar.leading_blank_days() as usize);
    let mut column = calendar.leading_blank_days();
    for date in calendar.dates() {
        let day = chrono::Datelike::day(&date);
        if date == selected {
            line.push_str(&format!("{:>2}* ", day));
        } else {
            line.push_str(&format!("{:>2}  ", day));
        }
        column += 1;
        if column == 7 {
            println!("{}", line.trim_end());
            line.clear();
            column = 0;
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
}

fn print_facets() {
    println!("Roles:");
    for r in Role::ALL {
        println!("  {:<12} {}", r.as_str(), r.label());
    }
    println!("\nCompany types:");
    for c in CompanyType::ALL {
        println!("  {:<12} {}", c.as_str(), c.label());
    }
    println!("\nSlots:");
    for s in Slot::ALL {
        println!("  {:<12} {}", s.as_str(), s.label());
    }
    println!("\nRating sort:");
    for r in RatingSort::ALL {
        println!("  {:<12} {}", r.as_str(), r.label());
    }
    println!("\nTimezones:");
    for tz in TIMEZONES {
        let offset = tz.offset().map(|o| o.to_string()).unwrap_or_default();
        println!("  {:<12} {:<8} {}", tz.id, offset, tz.label);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
