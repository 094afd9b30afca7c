use crate::infra::{load_records, InMemoryRecordStore};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use playbook::config::AppConfig;
use playbook::error::AppError;
use playbook::playbook::{
    build_report, player_detail, roster_view, Base, MeetingDraft, Period, PlaybookReport,
    PlaybookService, PlaybookServiceError, PlayerDetail, ProfileDraft, ProfileId, ProfileStatus,
    ReportOptions, RosterQuery, RosterSort, RosterView, StoreError, UpcomingDateDraft,
    EXPENSE_KIND,
};
use playbook::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON snapshot with profiles, meetings, and upcoming dates
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Optional meeting CSV export merged into the snapshot
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// weekly, monthly, or yearly
    #[arg(long, default_value = "weekly", value_parser = crate::infra::parse_period)]
    pub(crate) period: Period,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Leaderboard size
    #[arg(long, value_parser = crate::infra::parse_top)]
    pub(crate) top: Option<usize>,
    /// Leave benched profiles off the leaderboard
    #[arg(long)]
    pub(crate) exclude_benched: bool,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// name, date, or status
    #[arg(long, default_value = "date", value_parser = crate::infra::parse_sort)]
    pub(crate) sort: RosterSort,
    /// Case-insensitive name filter
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct PlayerArgs {
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Profile id to show
    #[arg(long)]
    pub(crate) id: String,
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Period for the demo report
    #[arg(long, default_value = "weekly", value_parser = crate::infra::parse_period)]
    pub(crate) period: Period,
    /// Also print the report payload as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

/// Configuration and logging for the one-shot subcommands, set up the same way
/// as for `serve`.
fn load_cli_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

/// Configured report options with the command-line flags applied on top.
pub(crate) fn report_options(
    config: &AppConfig,
    top: Option<usize>,
    exclude_benched: bool,
) -> ReportOptions {
    let mut options = config.playbook.report_options();
    options.exclude_benched = exclude_benched;
    if let Some(top) = top {
        options.top_n = top;
    }
    options
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = load_cli_config()?;
    let ReportArgs {
        snapshot,
        csv,
        period,
        now,
        top,
        exclude_benched,
        json,
    } = args;

    let records = load_records(&snapshot, csv.as_deref())?;
    let now = now.unwrap_or_else(Utc::now);
    let options = report_options(&config, top, exclude_benched);

    let report = build_report(&records, period, now, &options);
    if json {
        print_json(&report);
    } else {
        let source = if csv.is_some() {
            "JSON snapshot + meeting CSV"
        } else {
            "JSON snapshot"
        };
        render_report(&report, source);
    }
    Ok(())
}

pub(crate) fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    load_cli_config()?;
    let RosterArgs {
        snapshot,
        sort,
        search,
    } = args;

    let records = load_records(&snapshot, None)?;
    let query = RosterQuery { sort, search };
    let view = roster_view(&records.profiles, &records.meetings, &query);
    render_roster(&view, sort);
    Ok(())
}

pub(crate) fn run_player(args: PlayerArgs) -> Result<(), AppError> {
    load_cli_config()?;
    let PlayerArgs { snapshot, id, now } = args;

    let records = load_records(&snapshot, None)?;
    let profile_id = ProfileId(id);
    let Some(profile) = records.profile(&profile_id) else {
        return Err(PlaybookServiceError::from(StoreError::NotFound).into());
    };

    let now = now.unwrap_or_else(Utc::now);
    let detail = player_detail(profile, &records.meetings, &records.upcoming_dates, now);
    render_player(&detail);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = load_cli_config()?;
    let DemoArgs { period, json } = args;
    let now = Utc::now();

    println!("Playbook demo");
    let store = Arc::new(InMemoryRecordStore::default());
    let service = PlaybookService::new(store, report_options(&config, None, false));
    let featured = seed_demo_roster(&service, now)?;

    let report = service.report(period, now, None)?;
    render_report(&report, "Synthetic roster");
    if json {
        print_json(&report);
    }

    let view = service.roster(&RosterQuery::default())?;
    println!();
    render_roster(&view, RosterSort::default());

    let detail = service.player(&featured, now)?;
    println!();
    render_player(&detail);

    let rejected = service.add_meeting(&featured, meeting("date", 40.0, None, None, 11, now), now);
    if let Err(err) = rejected {
        println!("\nValidation check: a date without a rating is rejected ({err})");
    }

    Ok(())
}

fn seed_demo_roster(
    service: &PlaybookService<InMemoryRecordStore>,
    now: DateTime<Utc>,
) -> Result<ProfileId, PlaybookServiceError> {
    let jess = service.add_profile(profile("Jess", ProfileStatus::Wifey, 8, false), now)?;
    let kim = service.add_profile(profile("Kim", ProfileStatus::Dating, 9, false), now)?;
    let ava = service.add_profile(profile("Ava", ProfileStatus::Situationship, 7, true), now)?;
    service.add_profile(profile("Mia", ProfileStatus::Prospect, 6, false), now)?;

    let entries = [
        (&jess.id, meeting("date", 85.0, Some(Base::Home), Some((8, 9)), 2, now)),
        (&jess.id, meeting("date", 120.0, Some(Base::Home), Some((9, 8)), 9, now)),
        (&jess.id, meeting(EXPENSE_KIND, 60.0, None, None, 20, now)),
        (&kim.id, meeting("drinks", 45.0, Some(Base::Strikeout), Some((6, 0)), 4, now)),
        (&kim.id, meeting("dinner", 140.0, Some(Base::Home), Some((7, 6)), 12, now)),
        (&ava.id, meeting("date", 30.0, None, Some((5, 0)), 40, now)),
    ];
    for (profile_id, draft) in entries {
        service.add_meeting(profile_id, draft, now)?;
    }

    service.schedule(UpcomingDateDraft {
        profile_id: kim.id.clone(),
        kind: "dinner".to_string(),
        date: now + Duration::days(3),
        notes: Some("Rooftop reservation".to_string()),
    })?;

    Ok(jess.id)
}

fn profile(name: &str, status: ProfileStatus, looks: u8, bench: bool) -> ProfileDraft {
    ProfileDraft {
        name: name.to_string(),
        status,
        looks_rating: Some(looks),
        bench,
        notes: None,
        likes: Vec::new(),
        dislikes: Vec::new(),
        image_url: None,
    }
}

/// `ratings` is (date rating, performance rating); a zero performance rating
/// leaves it unset.
fn meeting(
    kind: &str,
    amount: f64,
    base: Option<Base>,
    ratings: Option<(u8, u8)>,
    days_ago: i64,
    now: DateTime<Utc>,
) -> MeetingDraft {
    let (rating, performance_rating) = match ratings {
        Some((rating, 0)) => (Some(rating), None),
        Some((rating, performance)) => (Some(rating), Some(performance)),
        None => (None, None),
    };
    MeetingDraft {
        kind: kind.to_string(),
        amount_spent: amount,
        base,
        rating,
        performance_rating,
        date: Some(now - Duration::days(days_ago)),
        notes: None,
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("JSON payload unavailable: {err}"),
    }
}

pub(crate) fn render_report(report: &PlaybookReport, source: &str) {
    println!(
        "{} playbook (generated {})",
        report.period_label,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("Data source: {source}");

    let totals = &report.totals;
    println!(
        "\nSince {}: ${:.2} spent | {} dates | {} hookups",
        totals.window_start.format("%Y-%m-%d"),
        totals.total_spent,
        totals.total_dates,
        totals.total_hookups
    );

    println!("\nCost per nut");
    for (label, value) in report.series.points() {
        println!("- {label}: ${value}");
    }

    if report.top_profiles.is_empty() {
        println!("\nTop performers: none rated yet");
    } else {
        println!("\nTop performers ({} profiles tracked)", report.profile_count);
        for (index, ranked) in report.top_profiles.iter().enumerate() {
            println!(
                "{}. {} ({}) {:.1}",
                index + 1,
                ranked.profile.name,
                ranked.profile.status.label(),
                ranked.rating
            );
        }
    }

    let headline = &report.headline;
    println!("\nHeadline");
    match headline.average_rating {
        Some(average) => println!("- Average rating: {average:.1}"),
        None => println!("- Average rating: N/A"),
    }
    println!("- Lifetime dates: {}", headline.total_dates);
    if let Some(best) = &headline.best_player {
        println!("- Best player: {} ({:.1})", best.name, best.value);
    }
    if let Some(investment) = &headline.biggest_investment {
        println!("- Biggest investment: {} (${:.2})", investment.name, investment.value);
    }

    if !report.insights.is_empty() {
        println!("\nInsights");
        for insight in &report.insights {
            println!("- {}: {}", insight.title, insight.text);
        }
    }
}

pub(crate) fn render_roster(view: &RosterView, sort: RosterSort) {
    println!("Roster sorted by {} ({} profiles)", sort.label(), view.len());
    if view.is_empty() {
        println!("No profiles match.");
        return;
    }

    for (heading, cards) in [("Active", &view.active), ("Bench", &view.bench)] {
        if cards.is_empty() {
            continue;
        }
        println!("\n{heading}");
        for card in cards {
            println!(
                "- {} [{}] {} meetings | CPN {} | avg date {:.1}",
                card.profile.name,
                card.status_label,
                card.meeting_count,
                card.cpn,
                card.avg_date_rating
            );
        }
    }
}

pub(crate) fn render_player(detail: &PlayerDetail) {
    println!("{} ({})", detail.profile.name, detail.status_label);
    let rating = &detail.rating;
    println!(
        "Overall {:.1} | looks {:.1} | date {:.1} | performance {:.1}",
        rating.overall, rating.looks, rating.avg_date_rating, rating.avg_performance_rating
    );
    println!(
        "Spent ${:.2} | {} home runs | CPN {}",
        detail.spend.total_spent, detail.spend.outcome_count, detail.spend.cpn
    );

    println!("\nHistory ({} entries)", detail.meeting_count());
    for entry in &detail.meetings {
        let outcome = entry.outcome().map(Base::label).unwrap_or("-");
        println!(
            "- {} {} ${:.2} {}",
            entry.date.format("%Y-%m-%d"),
            entry.kind,
            entry.spend(),
            outcome
        );
    }

    if detail.upcoming.is_empty() {
        println!("\nUpcoming: nothing scheduled");
    } else {
        println!("\nUpcoming");
        for entry in &detail.upcoming {
            println!(
                "- {} {}",
                entry.date.date.format("%Y-%m-%d %H:%M"),
                entry.date.kind
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playbook::playbook::{OutcomeRule, WeekStart};
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn cli_options_start_from_the_configured_playbook_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        std::env::set_var("PLAYBOOK_OUTCOME_RULE", "home_only");
        std::env::set_var("PLAYBOOK_WEEK_START", "monday");
        let config = AppConfig::load();
        std::env::remove_var("PLAYBOOK_OUTCOME_RULE");
        std::env::remove_var("PLAYBOOK_WEEK_START");
        let config = config.expect("config loads");

        let options = report_options(&config, Some(5), true);
        assert_eq!(options.outcome_rule, OutcomeRule::HomeOnly);
        assert_eq!(options.week_start, WeekStart::Monday);
        assert_eq!(options.top_n, 5);
        assert!(options.exclude_benched);

        let options = report_options(&config, None, false);
        assert_eq!(options.top_n, config.playbook.top_n);
        assert!(!options.exclude_benched);
    }

    #[test]
    fn demo_roster_seeds_through_the_guard() {
        let now = Utc::now();
        let service = PlaybookService::new(
            Arc::new(InMemoryRecordStore::default()),
            ReportOptions::default(),
        );

        let featured = seed_demo_roster(&service, now).expect("demo data is valid");
        let report = service
            .report(Period::Monthly, now, None)
            .expect("report builds");

        assert_eq!(report.profile_count, 4);
        assert_eq!(report.top_profiles.len(), 3);
        assert_eq!(report.top_profiles[0].profile.id, featured);
        assert_eq!(report.headline.total_dates, 6);

        let roster = service
            .roster(&RosterQuery::default())
            .expect("roster builds");
        assert_eq!(roster.active.len(), 3);
        assert_eq!(roster.bench.len(), 1);
    }
}
