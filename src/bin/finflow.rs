use std::{fs::File, io::BufWriter, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use finflow_rs::{
    ApiClient, DataService, Error, EvaluationWindow, Session, SessionContext,
    api::DEFAULT_PAGE_SIZE,
    export::write_csv,
    models::{CategoryId, ExpenseId, NewExpense},
    report::{format_currency, render_dashboard},
    timezone::{DEFAULT_TIMEZONE, now_in},
    window::parse_date,
};

/// Track spending against budgets with the Finflow expense API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the expense API, e.g. "https://finflow.example.com".
    #[arg(long, env = "FINFLOW_API_URL")]
    api_url: String,

    /// The session token printed by `finflow log-in`.
    #[arg(long, env = "FINFLOW_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// The user ID printed by `finflow log-in`.
    #[arg(long, env = "FINFLOW_USER_ID")]
    user_id: Option<i64>,

    /// The canonical time zone used for calendar days, e.g. "Pacific/Auckland".
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the session variables to export.
    LogIn {
        #[arg(long)]
        email: String,
    },
    /// Print this month's spending by category, the last seven days and budget alerts.
    Summary,
    /// Write this month's dashboard as an HTML page.
    Report {
        #[arg(long, default_value = "dashboard.html")]
        output: PathBuf,
    },
    /// List expenses with their IDs, one page at a time. Defaults to this month.
    List {
        /// The first day to include, as YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// The last day to include, as YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        category: Option<CategoryId>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u64,
    },
    /// Write expenses to a CSV file. Defaults to this month.
    Export {
        #[arg(long, default_value = "expenses.csv")]
        output: PathBuf,
        /// The first day to include, as YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// The last day to include, as YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        category: Option<CategoryId>,
    },
    /// Record a new expense.
    Add {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "")]
        description: String,
        /// The day of the expense as YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Change an expense. The expense is looked up in this month unless a range is given.
    Edit {
        id: ExpenseId,
        /// The first day to search for the expense, as YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// The last day to search for the expense, as YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        category: Option<CategoryId>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        /// The new day of the expense as YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete expenses by ID.
    Delete {
        #[arg(required = true)]
        ids: Vec<ExpenseId>,
    },
    /// Show or change budgets.
    #[command(subcommand)]
    Budget(BudgetCommand),
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Show the budgets and how much of each has been spent this month.
    Show,
    /// Set the total monthly budget.
    SetTotal {
        /// Leave out to remove the total budget.
        amount: Option<f64>,
    },
    /// Set the budget for a category, replacing any existing budget for it.
    SetCategory { category: CategoryId, amount: f64 },
    /// Remove the budget for a category.
    DeleteCategory { category: CategoryId },
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(&error);

            if error.requires_log_in() {
                eprintln!("Run `finflow log-in --email <EMAIL>` and export the printed variables.");
            }

            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: Args) -> Result<(), Error> {
    let session = match (args.token, args.user_id) {
        (Some(token), Some(user_id)) => SessionContext::with_session(Session {
            token,
            user_id,
            user_name: String::new(),
            user_photo: None,
        }),
        _ => SessionContext::new(),
    };

    let service = DataService::new(ApiClient::new(&args.api_url, session)?);
    let now = now_in(&args.timezone)?;

    match args.command {
        Command::LogIn { email } => log_in(&service, &email).await,
        Command::Summary => summary(&service, now).await,
        Command::Report { output } => report(&service, now, output).await,
        Command::List {
            from,
            to,
            category,
            page,
            page_size,
        } => {
            let window = date_window(now, from.as_deref(), to.as_deref())?;
            list(&service, window, category, page, page_size).await
        }
        Command::Export {
            output,
            from,
            to,
            category,
        } => {
            let window = date_window(now, from.as_deref(), to.as_deref())?;
            export(&service, window, category, output).await
        }
        Command::Add {
            category,
            amount,
            description,
            date,
        } => {
            let date = date_at(date.as_deref(), now)?;
            let expense = NewExpense::build(category, amount, &description, date, now)?;

            service.add_expense(expense).await?;
            println!("Added {} to category {category}", format_currency(amount));

            Ok(())
        }
        Command::Edit {
            id,
            from,
            to,
            category,
            amount,
            description,
            date,
        } => {
            let window = date_window(now, from.as_deref(), to.as_deref())?;
            let mut expense = service.find_expense(window, id).await?;

            if let Some(category) = category {
                expense.category_id = category;
            }
            if let Some(amount) = amount {
                expense.amount = amount;
            }
            if let Some(description) = description {
                expense.description = description;
            }
            if date.is_some() {
                expense.date = date_at(date.as_deref(), now)?;
            }

            service.update_expense(&expense, now).await?;
            println!("Updated expense {id}");

            Ok(())
        }
        Command::Delete { ids } => {
            service.delete_expenses(&ids).await?;
            println!("Deleted {} expense(s)", ids.len());

            Ok(())
        }
        Command::Budget(command) => budget(&service, now, command).await,
    }
}

async fn log_in(service: &DataService, email: &str) -> Result<(), Error> {
    let password = rpassword::prompt_password("Password: ")?;
    let session = service.client().log_in(email, &password).await?;

    if !session.user_name.is_empty() {
        eprintln!("Logged in as {}", session.user_name);
    }

    println!("export FINFLOW_TOKEN={}", session.token);
    println!("export FINFLOW_USER_ID={}", session.user_id);

    Ok(())
}

async fn summary(service: &DataService, now: OffsetDateTime) -> Result<(), Error> {
    let dashboard = service.dashboard(now).await?;
    let categories = service.categories().await?;

    println!("Spent this month: {}", format_currency(dashboard.total_spent));

    if let Some(remaining) = dashboard.total_budget_usage.remaining() {
        println!("Remaining budget: {}", format_currency(remaining));
    }

    println!();
    println!("By category:");
    for total in &dashboard.category_totals {
        println!(
            "  {:<24} {:>12} {:>5.1}%",
            total.category_name,
            format_currency(total.amount),
            total.percentage
        );
    }

    println!();
    println!("Last seven days:");
    for day in &dashboard.daily_totals {
        let marker = if day.is_maximum { "*" } else { "" };
        println!("  {} {:>12} {marker}", day.date, format_currency(day.amount));
    }

    if dashboard.over_budget.total {
        println!();
        println!("Over the total budget!");
    }

    for category_id in &dashboard.over_budget.categories {
        println!(
            "Over budget in {}",
            categories.lookup(*category_id).display_name()
        );
    }

    Ok(())
}

async fn report(service: &DataService, now: OffsetDateTime, output: PathBuf) -> Result<(), Error> {
    let dashboard = service.dashboard(now).await?;
    let categories = service.categories().await?;

    let page = render_dashboard(&dashboard, &categories);
    std::fs::write(&output, page.into_string())?;

    println!("Wrote the dashboard to {}", output.display());

    Ok(())
}

async fn list(
    service: &DataService,
    window: EvaluationWindow,
    category: Option<CategoryId>,
    page: u64,
    page_size: u64,
) -> Result<(), Error> {
    let expense_page = service
        .expense_page(window, category, page, page_size)
        .await?;
    let categories = service.categories().await?;
    let offset = window.start.offset();

    if expense_page.expenses.is_empty() {
        println!("No expenses found.");
    } else {
        println!(
            "{:>8}  {:<10}  {:<20} {:>12}  Description",
            "ID", "Date", "Category", "Amount"
        );
    }

    for expense in &expense_page.expenses {
        println!(
            "{:>8}  {}  {:<20} {:>12}  {}",
            expense.id,
            expense.date.to_offset(offset).date(),
            categories.lookup(expense.category_id).display_name(),
            format_currency(expense.amount),
            expense.description
        );
    }

    println!();
    println!("Page {} of {}", page.max(1), expense_page.total_pages);

    Ok(())
}

async fn export(
    service: &DataService,
    window: EvaluationWindow,
    category: Option<CategoryId>,
    output: PathBuf,
) -> Result<(), Error> {
    let expenses = service.expenses(window, category).await?;
    let categories = service.categories().await?;

    let file = File::create(&output)?;
    write_csv(
        BufWriter::new(file),
        &expenses,
        &categories,
        window.start.offset(),
    )?;

    println!("Wrote {} expense(s) to {}", expenses.len(), output.display());

    Ok(())
}

async fn budget(
    service: &DataService,
    now: OffsetDateTime,
    command: BudgetCommand,
) -> Result<(), Error> {
    match command {
        BudgetCommand::Show => {
            let dashboard = service.dashboard(now).await?;
            let total = &dashboard.total_budget_usage;

            match total.budget {
                Some(budget) => println!(
                    "Total: {} of {}{}",
                    format_currency(total.spent),
                    format_currency(budget),
                    if total.is_over { " (over budget)" } else { "" }
                ),
                None => println!("Total: {} (no budget set)", format_currency(total.spent)),
            }

            for usage in &dashboard.budget_usage {
                println!(
                    "{} ({}): {} of {}{}",
                    usage.category_name,
                    usage.category_id,
                    format_currency(usage.spent),
                    format_currency(usage.budget),
                    if usage.is_over { " (over budget)" } else { "" }
                );
            }

            Ok(())
        }
        BudgetCommand::SetTotal { amount } => {
            service.save_total_budget(amount).await?;

            match amount {
                Some(amount) => println!("Set the total budget to {}", format_currency(amount)),
                None => println!("Removed the total budget"),
            }

            Ok(())
        }
        BudgetCommand::SetCategory { category, amount } => {
            service.add_category_budgets(&[(category, amount)]).await?;
            println!("Set the budget for category {category} to {}", format_currency(amount));

            Ok(())
        }
        BudgetCommand::DeleteCategory { category } => {
            service.delete_category_budget(category).await?;
            println!("Removed the budget for category {category}");

            Ok(())
        }
    }
}

/// The window selected with `--from` and `--to`, defaulting to the month so far.
fn date_window(
    now: OffsetDateTime,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<EvaluationWindow, Error> {
    if from.is_none() && to.is_none() {
        return Ok(EvaluationWindow::current_month(now));
    }

    let month = EvaluationWindow::current_month(now);
    let start = from.map(parse_date).transpose()?.unwrap_or(month.start.date());
    let end = to.map(parse_date).transpose()?.unwrap_or(now.date());

    EvaluationWindow::from_dates(start, end, now.offset())
}

/// The instant for an expense recorded on `date`, at the current time of day.
fn date_at(date: Option<&str>, now: OffsetDateTime) -> Result<OffsetDateTime, Error> {
    match date {
        Some(text) => {
            let date = parse_date(text)?;
            Ok(PrimitiveDateTime::new(date, now.time()).assume_offset(now.offset()))
        }
        None => Ok(now),
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string());
}
