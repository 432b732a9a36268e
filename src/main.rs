//! Farm Monitor command-line client.
//!
//! Lists and edits farm records, shows the dashboard and alerts, follows the
//! live event feed, and serves the browser dashboard.

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand, ValueEnum};
use farm_monitor::forms::{
    AcknowledgeForm, ActiveFilter, FarmerFilter, FarmerForm, MaintenanceForm, MaintenancePriority,
    SortBy, SortOrder,
};
use farm_monitor::models::{CreateFarmerRequest, EventSeverity, SensorType};
use farm_monitor::views::{cards, charts, table};
use farm_monitor::{
    submit, AuthStore, ClientConfig, DashboardError, Exporter, FeedObserver, LiveFeed, PageRequest,
    QueryState, Resources, SubmitOutcome, Toast, User, WebConfig, DEFAULT_EVENTS_PAGE_SIZE,
    DEFAULT_PAGE_SIZE, DEFAULT_WEB_PORT,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "farm_monitor")]
#[command(about = "Farm equipment monitoring console")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Manage farmers, farms, pumps and sensors, follow equipment events and serve a live dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend REST base URL
    #[arg(long, env = "FARM_API_BASE_URL", default_value = farm_monitor::DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Backend live-feed WebSocket URL
    #[arg(long, env = "FARM_WS_URL", default_value = farm_monitor::DEFAULT_WS_URL)]
    ws_url: String,

    /// File the sign-in state is kept in
    #[arg(long, env = "FARM_AUTH_FILE", default_value = "farm_monitor_auth.json")]
    auth_file: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = farm_monitor::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List farmers
    Farmers(FarmersArgs),

    /// Show one farmer
    Farmer { id: String },

    /// Register a farmer
    AddFarmer(AddFarmerArgs),

    /// List the farms of a farmer
    Farms {
        farmer_id: String,
        #[command(flatten)]
        page: PageArgs,
    },

    /// List pumps
    Pumps {
        /// Only pumps of this farm
        #[arg(long)]
        farm: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// List sensors
    Sensors {
        /// Only sensors of this farm
        #[arg(long)]
        farm: Option<String>,
        /// Only sensors of this type (TEMPERATURE, HUMIDITY, SOIL_MOISTURE)
        #[arg(long = "type")]
        sensor_type: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// List equipment events
    Events(EventsArgs),

    /// Acknowledge an event
    Ack {
        event_id: String,
        /// Who is acknowledging
        #[arg(long = "by")]
        acknowledged_by: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Schedule maintenance for a pump
    ScheduleMaintenance(MaintenanceArgs),

    /// Show the dashboard overview
    Stats,

    /// Show active alerts
    Alerts,

    /// Show upcoming maintenance
    Maintenance,

    /// Export dashboard data as CSV
    Export(ExportArgs),

    /// Follow the live event feed
    Watch,

    /// Serve the browser dashboard
    Serve(ServeArgs),

    /// Store credentials for later requests
    Login(LoginArgs),

    /// Forget stored credentials
    Logout,
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Page size
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    size: u32,
}

impl PageArgs {
    fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    All,
    Active,
    Inactive,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Name,
    Email,
    RegistrationDate,
}

#[derive(Args, Debug)]
struct FarmersArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Filter by name or email
    #[arg(long)]
    search: Option<String>,

    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    status: StatusArg,

    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

impl FarmersArgs {
    fn filter(&self) -> FarmerFilter {
        FarmerFilter {
            search: self.search.clone(),
            active: match self.status {
                StatusArg::All => ActiveFilter::All,
                StatusArg::Active => ActiveFilter::Active,
                StatusArg::Inactive => ActiveFilter::Inactive,
            },
            sort_by: self.sort.map(|sort| match sort {
                SortArg::Name => SortBy::Name,
                SortArg::Email => SortBy::Email,
                SortArg::RegistrationDate => SortBy::RegistrationDate,
            }),
            sort_order: if self.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            },
        }
    }
}

#[derive(Args, Debug)]
struct AddFarmerArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    dob: String,
}

#[derive(Args, Debug)]
struct EventsArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_EVENTS_PAGE_SIZE)]
    size: u32,

    /// Only events of this severity (INFO, WARNING, CRITICAL)
    #[arg(long)]
    severity: Option<String>,

    /// Only unacknowledged events
    #[arg(long)]
    unacknowledged: bool,
}

#[derive(Args, Debug)]
struct MaintenanceArgs {
    pump_id: String,
    /// Scheduled date, YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long)]
    description: String,
    /// Estimated duration in hours
    #[arg(long, default_value_t = 2.0)]
    duration: f64,
    /// LOW, MEDIUM, HIGH or URGENT
    #[arg(long, default_value = "MEDIUM")]
    priority: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportKind {
    Summary,
    Events,
    Alerts,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(value_enum)]
    kind: ExportKind,

    /// Directory to write into
    #[arg(long, default_value = ".")]
    dir: String,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Web server bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Static files directory (optional)
    #[arg(long)]
    static_dir: Option<String>,

    /// Send CORS headers
    #[arg(long)]
    cors: bool,

    /// Do not connect to the live feed
    #[arg(long)]
    no_live: bool,

    /// Maximum WebSocket connections
    #[arg(long, default_value_t = 32)]
    max_connections: usize,
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// Bearer token issued by the backend
    #[arg(long)]
    token: String,
    /// Farmer id sent as X-Farmer-Id
    #[arg(long)]
    farmer_id: String,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    email: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = client_config(&cli);
    config.validate()?;
    let auth = Arc::new(
        AuthStore::load(&cli.auth_file)
            .with_context(|| format!("Failed to load auth state from {}", cli.auth_file))?,
    );
    let resources = Resources::from_config(&config, Arc::clone(&auth))?;

    match &cli.command {
        Commands::Login(args) => login_command(&auth, args)?,
        Commands::Logout => {
            auth.logout()?;
            println!("Signed out");
        }
        Commands::Farmers(args) => farmers_command(&resources, args).await?,
        Commands::Farmer { id } => {
            let farmer = required(resources.farmer(id).await, "farmer")?;
            println!("{}", cards::farmer_card(&farmer));
        }
        Commands::AddFarmer(args) => add_farmer_command(&resources, args).await?,
        Commands::Farms { farmer_id, page } => {
            let state = resources.farms(farmer_id, page.request()).await;
            println!("{}", table::farms_table().render_state(&state));
        }
        Commands::Pumps { farm, page } => match farm {
            Some(farm) => {
                let pumps = required(resources.pumps_by_farm(farm).await, "pumps")?;
                println!("{}", table::pumps_table().render_rows(&pumps));
            }
            None => {
                let state = resources.pumps(page.request()).await;
                println!("{}", table::pumps_table().render_state(&state));
            }
        },
        Commands::Sensors {
            farm,
            sensor_type,
            page,
        } => sensors_command(&resources, farm.as_deref(), sensor_type.as_deref(), *page).await?,
        Commands::Events(args) => events_command(&resources, args).await?,
        Commands::Ack {
            event_id,
            acknowledged_by,
            notes,
        } => {
            let mut form = AcknowledgeForm::new(acknowledged_by.clone());
            if let Some(notes) = notes {
                form = form.with_notes(notes.clone());
            }
            let toasts = resources.notifier().subscribe();
            let outcome = submit(
                &form,
                |request| async move { resources.acknowledge_event(event_id, &request).await },
                |_| {},
            )
            .await;
            finish(outcome, toasts)?;
        }
        Commands::ScheduleMaintenance(args) => maintenance_command(&resources, args).await?,
        Commands::Stats => stats_command(&resources).await?,
        Commands::Alerts => {
            let alerts = resources.active_alerts().await;
            if alerts.is_empty() {
                println!("No active alerts");
            }
            for alert in alerts {
                println!(
                    "[{}] {} {}: {} ({})",
                    alert.severity.to_string().to_uppercase(),
                    alert.equipment_type,
                    alert.equipment_id,
                    alert.message,
                    farm_monitor::views::format::format_relative_time(&alert.timestamp)
                );
            }
        }
        Commands::Maintenance => {
            let schedule = required(resources.upcoming_maintenance().await, "maintenance schedule")?;
            if schedule.is_empty() {
                println!("No upcoming maintenance");
            }
            for item in schedule {
                println!(
                    "{}  {} {} ({:?})",
                    farm_monitor::views::format::format_date(&item.scheduled_date),
                    item.equipment_type,
                    item.equipment_name,
                    item.status
                );
            }
        }
        Commands::Export(args) => export_command(&resources, args).await?,
        Commands::Watch => watch_command(&config, &resources).await?,
        Commands::Serve(args) => serve_command(&config, &resources, args).await?,
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn client_config(cli: &Cli) -> ClientConfig {
    ClientConfig::new(cli.api_url.clone())
        .with_ws_url(cli.ws_url.clone())
        .with_timeout_ms(cli.timeout_ms)
        .with_auth_path(Some(cli.auth_file.clone()))
}

fn print_banner() {
    println!("🌾 Farm Monitor");
    println!("   Version: {}", farm_monitor::VERSION);
    println!();
}

/// Unwrap a loaded query or turn its failure into an error.
fn required<T>(state: QueryState<T>, what: &str) -> anyhow::Result<T> {
    match state {
        QueryState::Success(data) => Ok(data),
        QueryState::Error(message) => bail!("Failed to load {}: {}", what, message),
        QueryState::Disabled | QueryState::Loading => bail!("No {} requested", what),
    }
}

fn print_toasts(toasts: &mut broadcast::Receiver<Toast>) {
    while let Ok(toast) = toasts.try_recv() {
        println!("{}", toast);
    }
}

/// Print the toasts a submission raised, then report its outcome.
fn finish<T>(outcome: SubmitOutcome<T>, mut toasts: broadcast::Receiver<Toast>) -> anyhow::Result<()> {
    print_toasts(&mut toasts);
    if let Some(errors) = outcome.field_errors() {
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field, message);
        }
    }
    match outcome.into_result() {
        Ok(_) => Ok(()),
        Err(DashboardError::Validation(_)) => bail!("Form has errors"),
        Err(e) => Err(e.into()),
    }
}

fn login_command(auth: &AuthStore, args: &LoginArgs) -> anyhow::Result<()> {
    let user = User {
        id: args.farmer_id.clone(),
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email: args.email.clone(),
    };
    auth.login(user, args.token.clone())?;
    println!("Signed in as farmer {}", args.farmer_id);
    Ok(())
}

async fn farmers_command(resources: &Resources, args: &FarmersArgs) -> anyhow::Result<()> {
    let view = table::farmers_table();
    let state = resources.farmers(args.page.request()).await;
    let filter = args.filter();
    match state {
        QueryState::Success(mut page) if filter != FarmerFilter::default() => {
            page.content = filter.apply(&page.content);
            println!("{}", view.render_page(&page));
        }
        state => println!("{}", view.render_state(&state)),
    }
    Ok(())
}

async fn add_farmer_command(resources: &Resources, args: &AddFarmerArgs) -> anyhow::Result<()> {
    let form = FarmerForm {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email: args.email.clone(),
        phone_number: args.phone.clone(),
        address: args.address.clone(),
        date_of_birth: args.dob.clone(),
        ..FarmerForm::new()
    };
    let toasts = resources.notifier().subscribe();
    let outcome = submit(
        &form,
        |payload| async move {
            let request = CreateFarmerRequest::from(payload);
            resources.create_farmer(&request).await
        },
        |payload| info!("Registered {} {}", payload.first_name, payload.last_name),
    )
    .await;
    if let SubmitOutcome::Submitted(farmer) = &outcome {
        println!("{}", cards::farmer_card(farmer));
    }
    finish(outcome, toasts)
}

async fn sensors_command(
    resources: &Resources,
    farm: Option<&str>,
    sensor_type: Option<&str>,
    page: PageArgs,
) -> anyhow::Result<()> {
    let view = table::sensors_table();
    if let Some(raw) = sensor_type {
        let Some(kind) = SensorType::parse(raw) else {
            bail!("Unknown sensor type: {}", raw);
        };
        let sensors = required(resources.sensors_by_type(kind).await, "sensors")?;
        println!("{}", view.render_rows(&sensors));
    } else if let Some(farm) = farm {
        let sensors = required(resources.sensors_by_farm(farm).await, "sensors")?;
        println!("{}", view.render_rows(&sensors));
    } else {
        let state = resources.sensors(page.request()).await;
        println!("{}", view.render_state(&state));
    }
    Ok(())
}

async fn events_command(resources: &Resources, args: &EventsArgs) -> anyhow::Result<()> {
    let page = PageRequest::new(args.page, args.size);
    let state = match (&args.severity, args.unacknowledged) {
        (Some(raw), _) => {
            let Some(severity) = EventSeverity::parse(raw) else {
                bail!("Unknown severity: {}", raw);
            };
            resources.events_by_severity(severity, page).await
        }
        (None, true) => resources.unacknowledged_events(page).await,
        (None, false) => resources.events(page).await,
    };
    println!("{}", table::events_table().render_state(&state));
    Ok(())
}

async fn maintenance_command(resources: &Resources, args: &MaintenanceArgs) -> anyhow::Result<()> {
    let Some(priority) = MaintenancePriority::parse(&args.priority) else {
        bail!("Unknown priority: {}", args.priority);
    };
    let form = MaintenanceForm {
        scheduled_date: args.date.clone(),
        description: args.description.clone(),
        estimated_duration: args.duration,
        priority,
        ..MaintenanceForm::new(args.pump_id.clone())
    };
    let toasts = resources.notifier().subscribe();
    let pump_id = args.pump_id.as_str();
    let outcome = submit(
        &form,
        |request| async move { resources.schedule_maintenance(pump_id, &request).await },
        |_| {},
    )
    .await;
    finish(outcome, toasts)
}

async fn stats_command(resources: &Resources) -> anyhow::Result<()> {
    print_banner();
    let (stats, distribution, server) = tokio::join!(
        resources.overview_stats(),
        resources.status_distribution(),
        resources.dashboard_statistics(),
    );

    println!("{}", charts::render_kpis(&stats.kpis()));
    println!();
    println!("Equipment status:");
    println!("{}", charts::render_distribution(&distribution.status_data));
    println!();
    println!("Equipment types:");
    println!("{}", charts::render_slices(&distribution.equipment_type_data));

    match server {
        QueryState::Success(server) if !server.daily_event_counts.is_empty() => {
            println!();
            println!("Events per day:");
            println!(
                "{}",
                charts::render_series(&charts::daily_series(&server.daily_event_counts))
            );
        }
        QueryState::Error(message) => warn!("Event statistics unavailable: {}", message),
        _ => {}
    }

    if !stats.recent_events.is_empty() {
        println!();
        println!("Recent events:");
        println!("{}", table::events_table().render_rows(&stats.recent_events));
    }
    Ok(())
}

async fn export_command(resources: &Resources, args: &ExportArgs) -> anyhow::Result<()> {
    let exporter = Exporter::new(&args.dir);
    let path = match args.kind {
        ExportKind::Summary => {
            exporter
                .export_dashboard_summary(&resources.overview_stats().await)
                .await?
        }
        ExportKind::Events => {
            let data = resources.dashboard_data().await;
            exporter.export_events(data.events()).await?
        }
        ExportKind::Alerts => exporter.export_alerts(&resources.active_alerts().await).await?,
    };
    println!("Exported {}", path.display());
    Ok(())
}

/// Prints connection changes of the live feed.
struct ConsoleObserver;

#[async_trait]
impl FeedObserver for ConsoleObserver {
    async fn on_connect(&self) {
        println!("● Live feed connected");
    }

    async fn on_disconnect(&self) {
        println!("○ Live feed disconnected");
    }

    async fn on_error(&self, error: &DashboardError) {
        eprintln!("✗ Live feed error: {}", error);
    }
}

async fn watch_command(config: &ClientConfig, resources: &Resources) -> anyhow::Result<()> {
    let feed = LiveFeed::from_config(config)?
        .with_observer(Arc::new(ConsoleObserver))
        .start(resources.cache().clone());
    let mut messages = Box::pin(feed.messages());
    println!("Watching {} (Ctrl-C to stop)", config.ws_url);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            message = messages.next() => {
                let Some(message) = message else { break };
                match message.as_event() {
                    Some(event) if !event.id.is_empty() => println!(
                        "{} [{}] {} {}: {}",
                        farm_monitor::views::format::format_date_time(&event.timestamp),
                        event.severity,
                        event.event_type,
                        event.equipment_id,
                        event.message
                    ),
                    _ => println!("{}", message.0),
                }
            }
        }
    }

    feed.disconnect().await;
    Ok(())
}

async fn serve_command(
    config: &ClientConfig,
    resources: &Resources,
    args: &ServeArgs,
) -> anyhow::Result<()> {
    print_banner();
    let web_config = WebConfig::new(args.host.clone(), args.port)
        .with_static_path(args.static_dir.clone())
        .with_cors(args.cors)
        .with_max_websocket_connections(args.max_connections);

    info!("Web server configuration:");
    info!("  - Bind address: {}:{}", args.host, args.port);
    info!("  - CORS enabled: {}", args.cors);
    info!("  - Max WebSocket connections: {}", args.max_connections);
    info!("  - Backend: {}", config.api_base_url);

    let feed = LiveFeed::from_config(config)?
        .with_enabled(!args.no_live)
        .start(resources.cache().clone());
    farm_monitor::start_web_server(web_config, resources.clone(), Some(&feed)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["farm_monitor", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, DEFAULT_WEB_PORT);
        assert!(!args.cors);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_farmers_filter_flags() {
        let cli = Cli::try_parse_from([
            "farm_monitor",
            "farmers",
            "--search",
            "doe",
            "--status",
            "active",
            "--sort",
            "registration-date",
            "--desc",
            "-d",
        ])
        .unwrap();
        assert!(cli.debug);
        let Commands::Farmers(args) = cli.command else {
            panic!("expected farmers");
        };
        let filter = args.filter();
        assert_eq!(filter.active, ActiveFilter::Active);
        assert_eq!(filter.sort_by, Some(SortBy::RegistrationDate));
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert_eq!(args.page.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_ack_requires_author() {
        assert!(Cli::try_parse_from(["farm_monitor", "ack", "e-1"]).is_err());
        assert!(Cli::try_parse_from(["farm_monitor", "ack", "e-1", "--by", "ops"]).is_ok());
    }

    #[test]
    fn test_required_state() {
        assert_eq!(required(QueryState::Success(3), "x").unwrap(), 3);
        assert!(required::<u8>(QueryState::Error("boom".into()), "x").is_err());
    }
}
