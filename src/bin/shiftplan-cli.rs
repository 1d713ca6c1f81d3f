#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write as _;
use shiftplan::{
    config::{export_config_json, load_config_from_file, ConfigStore},
    io,
    model::{Employee, EmployeeId, LeaveInterval, Role},
    render::{ScheduleRenderer, TextSchedule},
    storage::{JsonStorage, Storage},
    LeaveIndex, Scheduler, SelectionPolicy, ShiftConfig,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planification des équipes (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'effectif (employés + congés)
    #[arg(long, global = true, default_value = "workforce.json")]
    data: String,

    /// Répertoire des configurations de shifts nommées
    #[arg(long, global = true, default_value = "shifts")]
    config_dir: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un employé
    AddEmployee {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// cashier | forecourt | autre rôle libre
        #[arg(long)]
        role: Role,
    },

    /// Importer des employés depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Lister les employés
    ListEmployees,

    /// Déposer une demande de congé (statut pending)
    RequestLeave {
        #[arg(long)]
        employee: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD, inclus
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Importer des congés depuis un CSV (statut fourni par le fichier)
    ImportLeave {
        #[arg(long)]
        csv: String,
    },

    /// Lister les demandes de congé
    ListLeave,

    /// Générer le planning
    Generate {
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Graine pour un planning reproductible
        #[arg(long)]
        seed: Option<u64>,
        /// random | least-assigned
        #[arg(long, default_value = "random")]
        policy: SelectionPolicy,
        /// Configuration des shifts (JSON), référence sinon
        #[arg(long, conflicts_with = "config_name")]
        config: Option<String>,
        /// Configuration nommée du répertoire `--config-dir`
        #[arg(long)]
        config_name: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Écrire la configuration de référence des shifts
    InitConfig {
        #[arg(long, default_value = "shifts.json")]
        out: String,
    },

    /// Enregistrer une configuration nommée (fichier JSON, référence sinon)
    SaveConfig {
        #[arg(long)]
        name: String,
        #[arg(long)]
        from: Option<String>,
    },

    /// Lister les configurations nommées
    ListConfigs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;
    let configs = ConfigStore::new(&cli.config_dir);
    let mut workforce = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::AddEmployee { id, name, role } => {
            workforce
                .add_employee(Employee::new(id, name, role))
                .map_err(anyhow::Error::msg)?;
            storage.save(&workforce)?;
            0
        }
        Commands::ImportEmployees { csv } => {
            let employees = io::import_employees_csv(csv)?;
            let count = employees.len();
            for e in employees {
                workforce.add_employee(e).map_err(anyhow::Error::msg)?;
            }
            storage.save(&workforce)?;
            println!("Imported {count} employee(s)");
            0
        }
        Commands::ListEmployees => {
            for e in &workforce.employees {
                println!("{} | {} | {}", e.id, e.name, e.role);
            }
            0
        }
        Commands::RequestLeave {
            employee,
            start,
            end,
            reason,
        } => {
            let leave = LeaveInterval::new(
                EmployeeId::new(employee),
                io::parse_date(&start)?,
                io::parse_date(&end)?,
            )
            .with_reason(reason);
            let id = workforce.request_leave(leave).map_err(anyhow::Error::msg)?;
            storage.save(&workforce)?;
            println!("Leave request {} submitted", id.as_str());
            0
        }
        Commands::ImportLeave { csv } => {
            let leaves = io::import_leave_csv(csv)?;
            let count = leaves.len();
            for l in leaves {
                workforce.request_leave(l).map_err(anyhow::Error::msg)?;
            }
            storage.save(&workforce)?;
            println!("Imported {count} leave request(s)");
            0
        }
        Commands::ListLeave => {
            for l in &workforce.leave_requests {
                let name = workforce
                    .find_employee(&l.employee_id)
                    .map(|e| e.name.as_str())
                    .unwrap_or("Unknown");
                println!(
                    "{} | {} | {} → {} | {}",
                    l.id.as_str(),
                    name,
                    l.start,
                    l.end,
                    l.status.as_str()
                );
            }
            0
        }
        Commands::Generate {
            start,
            days,
            seed,
            policy,
            config,
            config_name,
            out_json,
            out_csv,
        } => {
            if workforce.employees.is_empty() {
                bail!("aucun employé enregistré dans {}", cli.data);
            }
            let config = match (config, config_name) {
                (Some(path), _) => load_config_from_file(path)?,
                (None, Some(name)) => configs.load(&name)?,
                (None, None) => ShiftConfig::reference(),
            };
            let scheduler = Scheduler::new(config)?.with_policy(policy);
            let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
            let mut rng = StdRng::seed_from_u64(seed);
            let leaves = LeaveIndex::new(&workforce.leave_requests);

            #[cfg(feature = "logging")]
            tracing::info!(seed, days, ?policy, approved_leave = leaves.len(), "generating schedule");

            let schedule = scheduler.generate(
                &workforce.employees,
                &leaves,
                io::parse_date(&start)?,
                days,
                &mut rng,
            )?;

            if let Some(path) = out_json {
                io::export_schedule_json(path, &schedule)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &schedule)?;
            }
            print!("{}", TextSchedule.render(&schedule));
            eprintln!("seed: {seed}");

            let shortages = schedule.shortages().count();
            if shortages == 0 {
                0
            } else {
                eprintln!("Found {shortages} shortage(s)");
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::InitConfig { out } => {
            export_config_json(&out, &ShiftConfig::reference())?;
            println!("Reference shift configuration written to {out}");
            0
        }
        Commands::SaveConfig { name, from } => {
            let config = match from {
                Some(path) => load_config_from_file(path)?,
                None => ShiftConfig::reference(),
            };
            let path = configs.save(&name, &config)?;
            println!("Shift configuration {name} saved to {}", path.display());
            0
        }
        Commands::ListConfigs => {
            for info in configs.list()? {
                let modified = info
                    .modified
                    .map(|m| m.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                let shifts: Vec<&str> =
                    info.config.shifts.iter().map(|s| s.name.as_str()).collect();
                println!("{} | {} | {}", info.name, shifts.join(","), modified);
            }
            0
        }
    };

    std::io::stdout().flush()?;
    std::process::exit(code);
}
