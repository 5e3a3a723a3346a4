//! CLI commands

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use medportal_client::{
    ChatConversation, FileStore, MemoryStore, PortalClient, SessionStore, Storages,
};
use medportal_core::chat::SymptomCheckRequest;
use medportal_core::{
    AppointmentInput, AppointmentQuery, DoctorQuery, ListParams, Page, RegisterData, StaffQuery,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::console::{ConsoleNavigator, ConsoleNotifier};

/// Everything a command needs: the session store and, through it, the client
pub struct App {
    session: SessionStore,
}

impl App {
    /// Wire a file-backed durable area and an in-process session area
    pub fn open(config: &CliConfig, state_dir: &Path) -> Result<Self> {
        let credentials = CliConfig::credentials_path(state_dir);
        let durable = FileStore::open(&credentials).with_context(|| {
            format!("failed to open credential store {}", credentials.display())
        })?;
        let storages = Storages::new(Arc::new(durable), Arc::new(MemoryStore::new()));

        let client = PortalClient::builder()
            .config(config.client_config())
            .storages(storages)
            .notifier(Arc::new(ConsoleNotifier))
            .navigator(Arc::new(ConsoleNavigator))
            .build()?;

        Ok(Self {
            session: SessionStore::new(client),
        })
    }

    fn client(&self) -> &PortalClient {
        self.session.client()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with an email address or username
    Login {
        /// Email or username
        identifier: String,

        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "MEDPORTAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Keep the session after this command exits
        #[arg(long)]
        remember: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user, validating the stored session
    Whoami,

    /// Create a new account
    Register {
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, default_value = "patient")]
        role: String,

        #[arg(long)]
        phone: Option<String>,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,

        #[arg(long)]
        gender: Option<String>,

        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "MEDPORTAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Patient records
    Patients {
        #[command(subcommand)]
        command: PatientCommands,
    },

    /// Doctor directory
    Doctors {
        #[command(subcommand)]
        command: DoctorCommands,
    },

    /// Appointments
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },

    /// Chat with the AI assistant, one message per line on stdin
    Chat,

    /// Run the AI symptom checker
    Symptoms {
        /// Free-text description of the symptoms
        text: String,

        #[arg(long)]
        patient_id: Option<i64>,
    },

    /// Administration
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Hospital portal
    Hospital {
        #[command(subcommand)]
        command: HospitalCommands,
    },
}

#[derive(clap::Args)]
pub struct PageArgs {
    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    per_page: Option<u32>,

    #[arg(long)]
    search: Option<String>,
}

impl From<PageArgs> for ListParams {
    fn from(args: PageArgs) -> Self {
        Self {
            page: args.page,
            per_page: args.per_page,
            search: args.search,
        }
    }
}

#[derive(Subcommand)]
pub enum PatientCommands {
    /// List patients
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one patient
    Get { id: i64 },
}

#[derive(Subcommand)]
pub enum DoctorCommands {
    /// List doctors
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        specialization: Option<String>,

        /// Only doctors accepting appointments
        #[arg(long)]
        available: bool,
    },

    /// Show one doctor
    Get { id: i64 },

    /// List known specializations
    Specializations,
}

#[derive(Subcommand)]
pub enum AppointmentCommands {
    /// List appointments
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        status: Option<String>,
    },

    /// Book an appointment
    Book {
        #[arg(long)]
        doctor_id: i64,

        /// Date and time, e.g. 2026-11-02T10:30:00
        #[arg(long)]
        date: String,

        #[arg(long, default_value = "consultation")]
        appointment_type: String,

        #[arg(long)]
        symptoms: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Show dashboard statistics
    Dashboard,

    /// List users
    Users {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Activate or deactivate a user
    ToggleUser { id: i64 },
}

#[derive(Subcommand)]
pub enum HospitalCommands {
    /// Log in to the hospital portal (always remembered)
    Login {
        email: String,

        #[arg(long, env = "MEDPORTAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the hospital portal session
    Logout,

    /// Show the logged-in hospital
    Profile,

    /// List hospital staff
    Staff {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        role: Option<String>,
    },

    /// List registered hospitals
    List,
}

impl Commands {
    pub async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::Login {
                identifier,
                password,
                remember,
            } => {
                let password = password_or_prompt(password).await?;
                if !app.session.login(&identifier, &password, remember).await {
                    bail!("login failed");
                }
                if !remember {
                    eprintln!(
                        "Session not remembered; it ends when this command exits. Use --remember to stay logged in."
                    );
                }
                Ok(())
            }
            Self::Logout => {
                app.session.logout();
                Ok(())
            }
            Self::Whoami => {
                let state = app.session.initialize().await;
                match state.user {
                    Some(user) => print_json(&user),
                    None => bail!("not logged in"),
                }
            }
            Self::Register {
                email,
                first_name,
                last_name,
                role,
                phone,
                date_of_birth,
                gender,
                password,
            } => {
                let password = password_or_prompt(password).await?;
                let mut data = RegisterData::new(email, password, first_name, last_name, role);
                data.phone = phone;
                data.date_of_birth = date_of_birth;
                data.gender = gender;
                if !app.session.register(&data).await {
                    bail!("registration failed");
                }
                Ok(())
            }
            Self::Patients { command } => command.execute(app.client()).await,
            Self::Doctors { command } => command.execute(app.client()).await,
            Self::Appointments { command } => command.execute(app.client()).await,
            Self::Chat => chat(app.client()).await,
            Self::Symptoms { text, patient_id } => {
                let request = SymptomCheckRequest {
                    symptoms: text,
                    patient_id,
                    additional_info: None,
                };
                print_json(&app.client().ai().symptom_checker(&request).await?)
            }
            Self::Admin { command } => command.execute(app.client()).await,
            Self::Hospital { command } => command.execute(app.client()).await,
        }
    }
}

impl PatientCommands {
    async fn execute(self, client: &PortalClient) -> Result<()> {
        match self {
            Self::List { page } => print_page(&client.patients().list(&page.into()).await?),
            Self::Get { id } => print_json(&client.patients().get(id).await?),
        }
    }
}

impl DoctorCommands {
    async fn execute(self, client: &PortalClient) -> Result<()> {
        match self {
            Self::List {
                page,
                specialization,
                available,
            } => {
                let query = DoctorQuery {
                    list: page.into(),
                    specialization,
                    available_only: available.then_some(true),
                };
                print_page(&client.doctors().list(&query).await?)
            }
            Self::Get { id } => print_json(&client.doctors().get(id).await?),
            Self::Specializations => {
                for name in client.doctors().specializations().await? {
                    println!("{name}");
                }
                Ok(())
            }
        }
    }
}

impl AppointmentCommands {
    async fn execute(self, client: &PortalClient) -> Result<()> {
        match self {
            Self::List { page, status } => {
                let query = AppointmentQuery {
                    list: page.into(),
                    status,
                    ..Default::default()
                };
                print_page(&client.appointments().list(&query).await?)
            }
            Self::Book {
                doctor_id,
                date,
                appointment_type,
                symptoms,
            } => {
                let input = AppointmentInput {
                    doctor_id: Some(doctor_id),
                    appointment_date: Some(date),
                    appointment_type: Some(appointment_type),
                    symptoms,
                    ..Default::default()
                };
                let appointment = client.appointments().create(&input).await?;
                info!(appointment_id = appointment.id, "appointment booked");
                print_json(&appointment)
            }
        }
    }
}

impl AdminCommands {
    async fn execute(self, client: &PortalClient) -> Result<()> {
        match self {
            Self::Dashboard => print_json(&client.admin().dashboard().await?),
            Self::Users { page } => print_page(&client.admin().users(&page.into()).await?),
            Self::ToggleUser { id } => print_json(&client.admin().toggle_user_status(id).await?),
        }
    }
}

impl HospitalCommands {
    async fn execute(self, client: &PortalClient) -> Result<()> {
        let hospital = client.hospital();
        match self {
            Self::Login { email, password } => {
                let password = password_or_prompt(password).await?;
                let response = hospital.login(&email, &password).await?;
                let name = response
                    .hospital
                    .as_ref()
                    .map_or("hospital portal", |h| h.name.as_str());
                eprintln!("Logged in to {name} as {}", response.user.display_name());
                Ok(())
            }
            Self::Logout => {
                hospital.logout()?;
                eprintln!("Logged out of the hospital portal");
                Ok(())
            }
            Self::Profile => print_json(&hospital.profile().await?),
            Self::Staff { page, role } => {
                let query = StaffQuery {
                    list: page.into(),
                    role,
                };
                print_page(&hospital.staff(&query).await?)
            }
            Self::List => print_page(&hospital.hospitals().await?),
        }
    }
}

/// Read-eval loop over stdin; `exit` or end of input stops it
async fn chat(client: &PortalClient) -> Result<()> {
    let mut conversation = ChatConversation::new(client.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Chatting with the MedPortal assistant. Type `exit` to leave.");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }
        match conversation.send(line).await {
            Ok(None) => {}
            Ok(Some(reply)) => {
                if let Some(turn) = conversation.history().last() {
                    println!("{}", turn.message);
                }
                for suggestion in &reply.suggestions {
                    println!("  - {suggestion}");
                }
                if let Some(disclaimer) = &reply.disclaimer {
                    eprintln!("{disclaimer}");
                }
            }
            Err(err) => {
                debug!(error = %err, "chat turn failed");
                if let Some(turn) = conversation.history().last() {
                    println!("{}", turn.message);
                }
            }
        }
    }
    Ok(())
}

async fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut stderr = tokio::io::stderr();
    stderr.write_all(b"Password: ").await?;
    stderr.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("a password is required");
    }
    Ok(password)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_page<T: Serialize>(page: &Page<T>) -> Result<()> {
    print_json(&page.items)?;
    eprintln!(
        "page {} of {} ({} total)",
        page.current_page, page.pages, page.total
    );
    Ok(())
}
