use clap::{Arg, Command};
use lab_backend::{
    config::SeedConfig,
    db::build_pool,
    init_tracing,
    services::seed_service::{LabLeaderOutcome, SeedService},
    utils::AvatarService,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("Lab Seeder")
        .version("1.0")
        .about("Bootstraps the lab leader account and maintains placeholder avatars")
        .arg(
            Arg::new("lab-leader-email")
                .long("lab-leader-email")
                .value_name("EMAIL")
                .help("Email of the lab leader account to create")
                .requires("lab-leader-password"),
        )
        .arg(
            Arg::new("lab-leader-password")
                .long("lab-leader-password")
                .value_name("PASSWORD")
                .help("Password of the lab leader account")
                .requires("lab-leader-email"),
        )
        .arg(
            Arg::new("lab-leader-name")
                .long("lab-leader-name")
                .value_name("NAME")
                .help("Display name of the lab leader account")
                .default_value("Lab Leader"),
        )
        .arg(
            Arg::new("reassign-avatars")
                .long("reassign-avatars")
                .help("Assign new placeholder pictures to users")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("only-missing")
                .long("only-missing")
                .help("Only touch users that have no picture")
                .requires("reassign-avatars")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print what would change without writing")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let email = matches.get_one::<String>("lab-leader-email");
    let reassign = matches.get_flag("reassign-avatars");
    if email.is_none() && !reassign {
        eprintln!("Nothing to do: pass --lab-leader-email/--lab-leader-password or --reassign-avatars");
        std::process::exit(2);
    }

    let config = SeedConfig::from_env()?;
    init_tracing(&config.logging());

    let dry_run = matches.get_flag("dry-run");
    let pool = build_pool(&config.database())?;
    let mut conn = pool.get()?;
    let avatars = AvatarService::new(&config.avatars())?;

    if let (Some(email), Some(password)) =
        (email, matches.get_one::<String>("lab-leader-password"))
    {
        let name = matches
            .get_one::<String>("lab-leader-name")
            .map(String::as_str)
            .unwrap_or("Lab Leader");
        let outcome = SeedService::ensure_lab_leader(
            &mut conn,
            config.bcrypt_cost,
            &avatars,
            name,
            email,
            password,
            dry_run,
        )?;
        match outcome {
            LabLeaderOutcome::Created(id) => println!("Created lab leader {} ({})", email, id),
            LabLeaderOutcome::AlreadyExists { user_id, role } => println!(
                "User {} already exists ({}, role {}); left unchanged",
                email,
                user_id,
                role.as_str()
            ),
            LabLeaderOutcome::WouldCreate { email } => {
                println!("[dry-run] would create lab leader {}", email)
            }
        }
    }

    if reassign {
        let only_missing = matches.get_flag("only-missing");
        let changes = SeedService::reassign_avatars(&mut conn, &avatars, only_missing, dry_run)?;
        for change in &changes {
            println!(
                "{}{}: {} -> {}",
                if dry_run { "[dry-run] " } else { "" },
                change.email,
                change.old_image.as_deref().unwrap_or("<none>"),
                change.new_image
            );
        }
        println!(
            "{} user(s) {}",
            changes.len(),
            if dry_run { "would be updated" } else { "updated" }
        );
    }

    Ok(())
}
