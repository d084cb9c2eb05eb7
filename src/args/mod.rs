use crate::{Config, Directories, Draft};

use std::path::PathBuf;
use std::process::exit;

mod dirs;
mod dump;
mod edit;
mod init;
mod unknown;
mod verify;

static HELP_MESSAGE: &str = "
flags:
    -h, --help      prints this message
    -v, --version   prints the version

subcommands:
    list            list the users on the roster
                      --search <term> keeps names containing the term
    show <id>       show the details for one user
    add             add a user (field flags below)
    edit <id>       edit a user (field flags below)
    rm <id>         remove a user and renumber the rest
                      -y, --yes skips the confirmation prompt
    config          opens the `roster.toml` in your editor
    dirs            prints the configuration and data directories
    dump            dump the database to stdout (schema)
    init            initialize the config file

field flags (add/edit):
    --name, --email, --phone, --street, --city, --company, --website
";

const CONFIG_FILE: &str = "roster.toml";

/// What the user asked the binary to do
#[derive(Debug)]
pub enum Action {
    List { search: Option<String> },
    Show { id: u64 },
    Add { fields: Fields },
    Edit { id: u64, fields: Fields },
    Remove { id: u64, assume_yes: bool },
}

/// Field flags shared by `add` and `edit`
#[derive(Debug, Default)]
pub struct Fields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
}

impl Fields {
    fn parse(args: &mut pico_args::Arguments) -> Self {
        fn opt(args: &mut pico_args::Arguments, key: &'static str) -> Option<String> {
            args.opt_value_from_str(key)
                .unwrap_or_exit(|err| eprintln!("invalid value for {}: {}", key, err))
        }

        Self {
            name: opt(args, "--name"),
            email: opt(args, "--email"),
            phone: opt(args, "--phone"),
            street: opt(args, "--street"),
            city: opt(args, "--city"),
            company: opt(args, "--company"),
            website: opt(args, "--website"),
        }
    }

    /// Lay the provided flags over a draft, through its typed setters
    pub fn apply(self, draft: &mut Draft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(phone) = self.phone {
            draft.phone = phone;
        }
        if let Some(street) = self.street {
            draft.set_street(street);
        }
        if let Some(city) = self.city {
            draft.set_city(city);
        }
        if let Some(company) = self.company {
            draft.set_company_name(company);
        }
        if let Some(website) = self.website {
            draft.website = Some(website);
        }
    }
}

pub fn handle_args() -> (Config, Action) {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        println!("roster. revision: {}", env!("ROSTER_GIT_REVISION"));
        println!("{}", HELP_MESSAGE);
        exit(0);
    }

    if args.contains(["-v", "--version"]) {
        println!("revision: {}", env!("ROSTER_GIT_REVISION"));
        exit(0);
    }

    let cmd = args
        .subcommand()
        // this happens when its not valid utf-8
        .unwrap_or_exit(|err| eprintln!("cannot parse subcommand: {}", err));

    let action = match cmd.as_deref() {
        Some("config") => edit::config(),
        Some("dirs") => dirs::dirs(),
        Some("dump") => dump::dump(),
        Some("init") => init::init(),

        Some("list") | None => Action::List {
            search: args
                .opt_value_from_str("--search")
                .unwrap_or_exit(|err| eprintln!("invalid search term: {}", err)),
        },
        Some("show") => Action::Show {
            id: free_id(&mut args),
        },
        Some("add") => Action::Add {
            fields: Fields::parse(&mut args),
        },
        Some("edit") => {
            let fields = Fields::parse(&mut args);
            Action::Edit {
                id: free_id(&mut args),
                fields,
            }
        }
        Some("rm") => {
            let assume_yes = args.contains(["-y", "--yes"]);
            Action::Remove {
                id: free_id(&mut args),
                assume_yes,
            }
        }
        Some(cmd) => unknown::command(cmd),
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("unrecognized arguments: {:?}", rest);
        exit(1);
    }

    (verify::config(), action)
}

fn free_id(args: &mut pico_args::Arguments) -> u64 {
    args.free_from_str()
        .unwrap_or_exit(|err| eprintln!("expected a user id: {}", err))
}

fn get_config_path() -> PathBuf {
    Directories::config().unwrap_or_exit(|err| {
        eprintln!("ERROR! cannot get configuration directory: {}", err);
    })
}

fn get_data_path() -> PathBuf {
    Directories::data().unwrap_or_exit(|err| {
        eprintln!("ERROR! cannot get data directory: {}", err);
    })
}

trait ResultExt<T, E> {
    fn unwrap_or_exit<F>(self, quit: F) -> T
    where
        F: FnOnce(E);
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn unwrap_or_exit<F>(self, quit: F) -> T
    where
        F: FnOnce(E),
    {
        self.unwrap_or_else(|err| {
            quit(err);
            exit(1);
        })
    }
}
