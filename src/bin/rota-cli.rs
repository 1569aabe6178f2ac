#![forbid(unsafe_code)]
use anyhow::Result;
use rota::{
    io::{self, PlanInput, PlanSnapshot},
    model::PersonId,
    scheduler::{ConsistencyReport, PlanError, ShiftPlan},
    storage::{JsonStorage, Storage},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification de permanences
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Document JSON d'entrée (horizon, personnes, tâches)
    #[arg(long, global = true, default_value = "plan.json")]
    input: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Écrire un document d'entrée d'exemple
    Init {
        #[arg(long)]
        out: String,
    },

    /// Construire le planning et exporter les résultats
    Run {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_grid_csv: Option<String>,
        #[arg(long)]
        out_timetable_csv: Option<String>,
    },

    /// Construire le planning et signaler les jours incohérents
    Check {
        /// Export CSV des avertissements (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Afficher l'emploi du temps d'une personne
    Show {
        #[arg(long)]
        person: String,
    },
}

fn build(input: &str) -> Result<(ShiftPlan, ConsistencyReport)> {
    let mut plan = io::load_plan_input(input)?.into_plan();
    let report = plan.run();
    Ok((plan, report))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Init { out } => {
            let storage = JsonStorage::open(&out)?;
            storage.save(&PlanInput::sample())?;
            println!("Sample input written to {}", storage.path().display());
            0
        }
        Commands::Run {
            out_json,
            out_grid_csv,
            out_timetable_csv,
        } => {
            let (plan, report) = build(&cli.input)?;
            if let Some(path) = out_json {
                JsonStorage::open(path)?.save(&PlanSnapshot::capture(&plan))?;
            }
            if let Some(path) = out_grid_csv {
                io::export_grid_csv(path, &plan)?;
            }
            if let Some(path) = out_timetable_csv {
                io::export_timetables_csv(path, &plan)?;
            }
            for person in plan.people() {
                println!("{}", person.allocation_text());
            }
            println!(
                "{} day(s) off capacity, {} advisory(ies)",
                report.mismatched_days().count(),
                plan.advisories().len()
            );
            0
        }
        Commands::Check { report: out } => {
            let (plan, report) = build(&cli.input)?;
            if report.is_consistent() {
                println!("OK: plan consistent");
                0
            } else {
                for stats in report.mismatched_days() {
                    eprintln!(
                        "{}, on duty seats filled/allocated = {}/{}, plus analyst = {}",
                        plan.horizon().label(stats.day),
                        stats.on_duty,
                        stats.capacity,
                        stats.analysts
                    );
                }
                eprintln!("Found {} advisory(ies)", report.advisories.len());
                if let Some(path) = out {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["day", "person", "message"])?;
                    for a in &report.advisories {
                        let day = a.day.map(|d| plan.horizon().label(d)).unwrap_or_default();
                        let person = a.person.as_ref().map(|p| p.as_str()).unwrap_or("");
                        w.write_record([day.as_str(), person, a.to_string().as_str()])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Show { person } => {
            let (plan, _) = build(&cli.input)?;
            let p = plan
                .person(&PersonId::new(&person))
                .ok_or(PlanError::UnknownPerson(person))?;
            println!("{}", p.allocation_text());
            println!("{}", p.attendance());
            0
        }
    };

    std::process::exit(code);
}
