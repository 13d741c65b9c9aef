use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::{CategoryReport, Intensity, LedgerService};
use crate::domain::{BudgetLevel, Category, Cents, Expense, format_cents, parse_cents};
use crate::settings::AppConfig;

/// Outlay - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "A local-first personal expense tracker with category budgets")]
#[command(version)]
pub struct Cli {
    /// Config file path (TOML, optional)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Ledger file path (overrides config)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Budgets file path (overrides config)
    #[arg(long, global = true)]
    pub budgets: Option<PathBuf>,

    /// Output format: table, json
    #[arg(long, global = true, default_value = "table")]
    pub format: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        name: String,

        /// Amount spent (e.g., "12.50" or "12")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Category: Food, Transport, Bills, Entertainment, Misc
        #[arg(short, long)]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all expenses
    List,

    /// Category-wise spending summary
    Summary,

    /// Per-expense bar chart
    Chart,

    /// Show the largest expenses
    Top {
        /// Number of expenses to show
        #[arg(default_value = "5")]
        n: usize,
    },

    /// Expenses of one month with a category breakdown
    Monthly {
        /// Month (1-12)
        month: u32,

        /// Year (e.g., 2024)
        year: i32,
    },

    /// Search expenses
    #[command(subcommand)]
    Search(SearchCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Export expenses to a CSV file
    Export {
        /// Output file
        output: PathBuf,

        /// Only export this month (1-12, requires --year)
        #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Year of --month
        #[arg(long, requires = "month")]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum SearchCommands {
    /// Match name, notes or category (case-insensitive substring)
    Keyword {
        /// Text to look for
        text: String,
    },

    /// Match category exactly (case-insensitive)
    Category {
        /// Category name
        name: String,
    },

    /// Expenses dated within a range (inclusive)
    Range {
        /// Start date (YYYY-MM-DD)
        from: String,

        /// End date (YYYY-MM-DD)
        to: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the budget for a category (0 clears it)
    Set {
        /// Category: Food, Transport, Bills, Entertainment, Misc
        category: String,

        /// Budget amount (e.g., "400" or "400.00"); zero or less removes the budget
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Show budgets and current spend against them
    Show,
}

impl Cli {
    /// Resolve store paths and the log level from config file, environment and flags.
    pub fn settings(&self) -> Result<AppConfig> {
        let mut settings =
            AppConfig::load(self.config.as_deref()).context("Failed to load configuration")?;
        if let Some(ledger) = &self.ledger {
            settings.ledger_file = ledger.clone();
        }
        if let Some(budgets) = &self.budgets {
            settings.budgets_file = budgets.clone();
        }
        if self.verbose {
            settings.log_level = "debug".to_string();
        }
        Ok(settings)
    }

    pub fn run(self, settings: &AppConfig) -> Result<()> {
        // Load failures are reported through tracing at warn level.
        let mut service = LedgerService::open_paths(&settings.ledger_file, &settings.budgets_file);

        let json = self.format == "json";

        match self.command {
            Commands::Add {
                name,
                amount,
                category,
                date,
                notes,
            } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '12.50' or '12'")?;
                let category: Category = category.parse()?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Local::now().date_naive(),
                };

                let result = service.add_expense(name, category.as_str(), amount_cents, date, notes);
                println!(
                    "Expense added: {} {} ({}, {})",
                    result.expense.name(),
                    format_cents(result.expense.amount_cents()),
                    result.expense.category(),
                    result.expense.date()
                );

                if let Some(alert) = &result.alert {
                    let label = match alert.level {
                        BudgetLevel::Exceeded => "Budget exceeded",
                        _ => "Nearing budget",
                    };
                    println!(
                        "Warning: {} for {} (Spent: {} / {})",
                        label,
                        alert.category,
                        format_cents(alert.spent),
                        format_cents(alert.limit)
                    );
                }

                if let Some(err) = result.save_error {
                    return Err(err).context("Expense kept in memory but could not be saved");
                }
            }

            Commands::List => {
                print_expenses(service.all_expenses().iter(), "All Expenses", json)?;
            }

            Commands::Summary => {
                let report = service.category_report();
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_category_report(&report);
                }
            }

            Commands::Chart => {
                let chart = service.expense_chart();
                if json {
                    println!("{}", serde_json::to_string_pretty(&chart)?);
                } else {
                    println!("Expense Chart (per item)");
                    println!();
                    for bar in &chart {
                        let marker = match bar.intensity {
                            Intensity::High => '#',
                            Intensity::Medium => '=',
                            Intensity::Low => '-',
                        };
                        println!(
                            "{:<15} | {} {}",
                            truncate(bar.expense.name(), 15),
                            bar_of(bar.share_of_max, 50, marker),
                            format_cents(bar.expense.amount_cents())
                        );
                    }
                }
            }

            Commands::Top { n } => {
                print_expenses(
                    service.top_n(n).into_iter(),
                    &format!("Top {} Expenses", n),
                    json,
                )?;
            }

            Commands::Monthly { month, year } => {
                let report = service.monthly_report(month, year)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else if report.is_empty() {
                    println!("No data for {}/{}.", month, year);
                } else {
                    print_expenses(
                        report.expenses.iter().copied(),
                        &format!("Monthly Report: {}/{}", month, year),
                        false,
                    )?;
                    println!();
                    println!("Category Breakdown:");
                    for (category, amount) in &report.breakdown {
                        println!("{:<15} : {:>10}", category, format_cents(*amount));
                    }
                }
            }

            Commands::Search(cmd) => match cmd {
                SearchCommands::Keyword { text } => {
                    let found = service.filter_by_keyword(&text);
                    print_search(found, &format!("Keyword: {}", text), json)?;
                }
                SearchCommands::Category { name } => {
                    let found = service.filter_by_category(&name);
                    print_search(found, &format!("Category: {}", name), json)?;
                }
                SearchCommands::Range { from, to } => {
                    let from_date = parse_date(&from)?;
                    let to_date = parse_date(&to)?;
                    let found = service.filter_by_date_range(from_date, to_date);
                    print_search(
                        found,
                        &format!("Date range: {} to {}", from_date, to_date),
                        json,
                    )?;
                }
            },

            Commands::Budget(cmd) => run_budget_command(&mut service, cmd, json)?,

            Commands::Export {
                output,
                month,
                year,
            } => {
                let count = match (month, year) {
                    (Some(month), Some(year)) => service.export_month(month, year, &output)?,
                    _ => service.export_all(&output)?,
                };
                println!("Exported {} rows to {}", count, output.display());
            }
        }

        Ok(())
    }
}

fn run_budget_command(service: &mut LedgerService, cmd: BudgetCommands, json: bool) -> Result<()> {
    match cmd {
        BudgetCommands::Set { category, amount } => {
            let category: Category = category.parse()?;
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '400.00' or '400'")?;

            service.set_budget(category.as_str(), amount_cents)?;
            println!("Budget set for {}: {}", category, format_cents(amount_cents));
        }

        BudgetCommands::Show => {
            let overview = service.budget_overview();
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
                return Ok(());
            }

            println!(
                "{:<15} {:>12} {:>12} {:>12} {:<10}",
                "CATEGORY", "BUDGET", "SPENT", "REMAINING", "STATUS"
            );
            println!("{}", "-".repeat(65));
            for status in overview {
                if status.level == BudgetLevel::Unset {
                    println!(
                        "{:<15} {:>12} {:>12} {:>12} {:<10}",
                        status.category,
                        "-",
                        format_cents(status.spent),
                        "-",
                        "no budget set"
                    );
                } else {
                    println!(
                        "{:<15} {:>12} {:>12} {:>12} {:<10}",
                        status.category,
                        format_cents(status.limit),
                        format_cents(status.spent),
                        format_cents(status.remaining()),
                        status.level
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_search(found: Vec<&Expense>, title: &str, json: bool) -> Result<()> {
    if !json && found.is_empty() {
        println!("Search ({})", title);
        println!("No matching expenses.");
        return Ok(());
    }
    print_expenses(found.into_iter(), &format!("Search ({})", title), json)
}

fn print_expenses<'a>(
    expenses: impl Iterator<Item = &'a Expense>,
    title: &str,
    json: bool,
) -> Result<()> {
    let expenses: Vec<&Expense> = expenses.collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }

    println!("{}", title);
    println!();
    println!(
        "{:<15} {:<15} {:>10} {:>12} {:<20}",
        "NAME", "CATEGORY", "AMOUNT", "DATE", "NOTES"
    );
    println!("{}", "-".repeat(80));
    let mut total: Cents = 0;
    for expense in &expenses {
        println!(
            "{:<15} {:<15} {:>10} {:>12} {:<20}",
            truncate(expense.name(), 15),
            truncate(expense.category(), 15),
            format_cents(expense.amount_cents()),
            expense.date(),
            truncate(expense.notes(), 20)
        );
        total += expense.amount_cents();
    }
    println!("{}", "-".repeat(80));
    println!("Total: {}", format_cents(total));
    Ok(())
}

fn print_category_report(report: &CategoryReport) {
    println!("Category-wise Summary");
    println!();
    for summary in &report.categories {
        println!(
            "{:<15} | {} {} ({:.1}%)",
            summary.category,
            bar_of(summary.share_of_max, 30, '#'),
            format_cents(summary.total),
            summary.percentage
        );
    }
    if report.other != 0 {
        println!("{:<15} | {}", "(other)", format_cents(report.other));
    }
    println!("Total Expenses: {}", format_cents(report.total));
}

fn bar_of(share: f64, width: usize, marker: char) -> String {
    let len = (share.clamp(0.0, 1.0) * width as f64) as usize;
    std::iter::repeat_n(marker, len).collect()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, crate::domain::DATE_FORMAT)
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_of() {
        assert_eq!(bar_of(0.5, 10, '#'), "#####");
        assert_eq!(bar_of(0.0, 10, '#'), "");
        assert_eq!(bar_of(2.0, 4, '#'), "####");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 15), "short");
        assert_eq!(truncate("a very long expense name", 10), "a very ...");
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "outlay", "add", "Lunch", "12.50", "-c", "food", "--date", "2024-03-05",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Add { ref category, .. } if category == "food"));
    }

    #[test]
    fn test_export_month_requires_year() {
        assert!(Cli::try_parse_from(["outlay", "export", "out.csv", "--month", "3"]).is_err());
    }

    #[test]
    fn test_export_month_out_of_range_is_rejected() {
        assert!(
            Cli::try_parse_from(["outlay", "export", "out.csv", "--month", "13", "--year", "2024"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from(["outlay", "export", "out.csv", "--month", "12", "--year", "2024"])
                .is_ok()
        );
    }

    #[test]
    fn test_budget_set_accepts_negative_amount() {
        let cli = Cli::try_parse_from(["outlay", "budget", "set", "Food", "-5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Budget(BudgetCommands::Set { ref amount, .. }) if amount == "-5"
        ));

        let cli = Cli::try_parse_from(["outlay", "add", "Refund", "-12.50", "-c", "Misc"]).unwrap();
        assert!(matches!(cli.command, Commands::Add { ref amount, .. } if amount == "-12.50"));
    }
}
