use super::*;

pub fn config() -> ! {
    let file = get_config_path().join(CONFIG_FILE);
    let file = file.to_string_lossy();
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".into());
    std::process::Command::new(&editor)
        .arg(file.as_ref())
        .spawn()
        .unwrap_or_exit(|err| eprintln!("error running `{}`: {}", editor, err));
    exit(0)
}
