use super::*;

pub fn command(cmd: &str) -> ! {
    eprintln!("unknown subcommand: {}", cmd);
    println!("{}", HELP_MESSAGE);
    exit(1)
}
