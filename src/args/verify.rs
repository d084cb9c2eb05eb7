use super::*;

use anyhow::Context as _;

/// Load `roster.toml`, falling back to the defaults when it doesn't exist
///
/// A missing file isn't an error (the defaults point at the demo API); a
/// malformed one is.
pub fn config() -> Config {
    let path = match Directories::config() {
        Ok(dir) => dir.join(CONFIG_FILE),
        Err(err) => {
            print_backtrace(err.context("cannot find configuration file path"));
            exit(1)
        }
    };

    if !path.is_file() {
        log::debug!("no configuration file at `{}`, using defaults", path.display());
        return Config::default();
    }

    let loaded = Config::load(&path).with_context(|| {
        format!("cannot verify configuration file at\n--> {}", path.display())
    });

    match loaded {
        Ok(config) => config,
        Err(err) => {
            print_backtrace(err);
            exit(1)
        }
    }
}

fn print_backtrace(error: anyhow::Error) {
    for (i, cause) in error.chain().enumerate() {
        if i > 0 {
            eprintln!();
            eprintln!("because");
            eprint!("  ");
        }
        eprintln!("{}", cause);
    }
}
