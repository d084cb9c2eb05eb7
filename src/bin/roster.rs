use roster::args::{self, Action, Fields};
use roster::{config, database};
use roster::{Client, Directories, Draft, Error, KeyValueStore, Roster, User};

use std::path::PathBuf;

type Store = KeyValueStore<'static>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // this uses reverse order (least specific to most specific)
    // the last one will always override previous ones
    let envs = &[
        Directories::config()?.join(".env"),
        PathBuf::from(".env"),
    ];

    config::load_env_from(envs);
    alto_logger::init(alto_logger::Style::MultiLine, Default::default())?;

    let (config, action) = args::handle_args();

    database::initialize_conn_string(
        Directories::database()?
            .into_os_string()
            .to_string_lossy(),
    );

    let client = Client::new(config.api.resolve());
    let store = KeyValueStore::fetch("users")?;

    match action {
        Action::List { search } => list(client, store, search).await,
        Action::Show { id } => show(client, store, id).await,
        Action::Add { fields } => add(client, store, fields).await,
        Action::Edit { id, fields } => edit(client, store, id, fields).await,
        Action::Remove { id, assume_yes } => remove(client, store, id, assume_yes).await,
    }

    Ok(())
}

async fn list(client: Client, store: Store, search: Option<String>) {
    let roster = Roster::load(client, store).await.or_fail();

    let users = match &search {
        Some(term) => roster.search(term).collect::<Vec<_>>(),
        None => roster.users().iter().collect(),
    };

    if users.is_empty() {
        println!("no users found");
        return;
    }

    for user in users {
        println!(
            "{:>4}  {:<24} {:<12} {}",
            user.id, user.name, user.username, user.email
        );
    }
}

async fn show(client: Client, store: Store, id: u64) {
    let roster = Roster::load(client, store).await.or_fail();
    let user = roster.user(id).await.or_fail();
    print_detail(&user);
}

async fn add(client: Client, store: Store, fields: Fields) {
    let mut roster = Roster::load(client, store).await.or_fail();

    let mut draft = Draft::new();
    fields.apply(&mut draft);

    let user = roster.create(draft).await.or_fail();
    println!("created {}", user);
}

async fn edit(client: Client, store: Store, id: u64, fields: Fields) {
    let mut roster = Roster::load(client, store).await.or_fail();
    let existing = roster.user(id).await.or_fail();

    let mut draft = Draft::from(&existing);
    fields.apply(&mut draft);

    let user = roster.update(id, draft).await.or_fail();
    println!("updated {}", user);
}

async fn remove(client: Client, store: Store, id: u64, assume_yes: bool) {
    let mut roster = Roster::load(client, store).await.or_fail();

    let gate = move |user: &User| assume_yes || ask(user);
    match roster.delete(id, gate).await.or_fail() {
        Some(user) => {
            println!("removed {}", user);
            println!("the remaining ids were renumbered");
        }
        None => println!("kept {}", id),
    }
}

fn ask(user: &User) -> bool {
    use std::io::Write as _;

    print!("delete {}? this cannot be undone [y/N] ", user);
    std::io::stdout().flush().ok();

    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}

fn print_detail(user: &User) {
    println!("{}", user);
    println!("  username: {}", user.username);
    println!("  email:    {}", user.email);
    println!("  phone:    {}", user.phone);
    println!("  address:  {}, {}", user.address.street, user.address.city);
    if let Some(name) = &user.company.name {
        println!("  company:  {}", name);
    }
    if let Some(website) = &user.website {
        println!("  website:  {}", website);
    }
}

// each error kind gets its own message; absence and failure never blur
fn fail(err: Error) -> ! {
    use std::error::Error as _;

    match &err {
        Error::Invalid(errors) => {
            eprintln!("ERROR! some fields are invalid");
            print_field_errors(errors);
        }
        Error::NotFound { id } => eprintln!("ERROR! no user with id {}", id),
        Error::Fetch(..) => eprintln!("ERROR! cannot fetch users. please try again later"),
        Error::Write(..) => {
            eprintln!("ERROR! the user service rejected the change. please try again")
        }
        Error::Store(..) => eprintln!("ERROR! cannot save the roster locally"),
    }

    let mut source = err.source();
    while let Some(cause) = source {
        log::debug!("caused by: {}", cause);
        source = cause.source();
    }

    std::process::exit(1)
}

fn print_field_errors(errors: &validator::ValidationErrors) {
    use validator::ValidationErrorsKind;

    let mut fields = errors.errors().iter().collect::<Vec<_>>();
    fields.sort_by_key(|(field, _)| *field);

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    print_field_error(field, err);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                let mut inner = nested.errors().iter().collect::<Vec<_>>();
                inner.sort_by_key(|(field, _)| *field);
                for (sub, kind) in inner {
                    if let ValidationErrorsKind::Field(list) = kind {
                        for err in list {
                            print_field_error(&format!("{}.{}", field, sub), err);
                        }
                    }
                }
            }
            ValidationErrorsKind::List(..) => {}
        }
    }
}

fn print_field_error(field: &str, err: &validator::ValidationError) {
    match &err.message {
        Some(message) => eprintln!("  {}: {}", field, message),
        None => eprintln!("  {}: invalid ({})", field, err.code),
    }
}

trait OrFail<T> {
    fn or_fail(self) -> T;
}

impl<T> OrFail<T> for Result<T, Error> {
    fn or_fail(self) -> T {
        self.unwrap_or_else(|err| fail(err))
    }
}
